//! Interface selection and report driving
//!
//! The [`Reporter`] picks the interfaces to report on, runs the assembler once
//! per wireless-capable interface and keeps going when one of them fails.

use crate::error::IwResult;
use crate::provider::{CapabilityProvider, InterfaceEnumerator};
use crate::report::{no_wireless_notice, InterfaceStatus};
use crate::validation;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// iwconfig-style text blocks
    #[default]
    Text,
    /// JSON array of per-interface outcomes
    Json,
}

/// What happened for one interface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    NoWireless { name: String },
    Report(InterfaceStatus),
    /// A required query failed; the report for this interface was dropped
    Failed { name: String, error: String },
}

impl Outcome {
    pub fn name(&self) -> &str {
        match self {
            Outcome::NoWireless { name } | Outcome::Failed { name, .. } => name,
            Outcome::Report(status) => &status.name,
        }
    }
}

/// Per-run counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reported: usize,
    pub no_wireless: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                Outcome::NoWireless { .. } => summary.no_wireless += 1,
                Outcome::Report(_) => summary.reported += 1,
                Outcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

pub struct Reporter<'a, P: ?Sized, E: ?Sized> {
    provider: &'a P,
    enumerator: &'a E,
}

impl<'a, P, E> Reporter<'a, P, E>
where
    P: CapabilityProvider + ?Sized,
    E: InterfaceEnumerator + ?Sized,
{
    pub fn new(provider: &'a P, enumerator: &'a E) -> Self {
        Self { provider, enumerator }
    }

    /// Query the selected interfaces in enumeration order
    ///
    /// With no target every enumerated interface is covered. A target is only
    /// reported if it is one of the enumerated interfaces; otherwise the result
    /// is empty. Errors only come from the enumeration itself.
    pub fn collect(&self, target: Option<&str>) -> IwResult<Vec<Outcome>> {
        let all = self.enumerator.all_interface_names()?;

        let selected: Vec<&String> = match target {
            None => all.iter().collect(),
            Some(name) => {
                if let Err(e) = validation::validate_interface_name(name) {
                    warn!("Ignoring interface argument: {}", e);
                    return Ok(Vec::new());
                }
                match all.iter().find(|n| n.as_str() == name) {
                    Some(found) => vec![found],
                    None => {
                        debug!("{} is not a network interface", name);
                        return Ok(Vec::new());
                    }
                }
            }
        };

        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let wireless = self.enumerator.wireless_interface_names()?;
        Ok(selected
            .into_iter()
            .map(|name| self.outcome(name, &wireless))
            .collect())
    }

    /// Collect and write the selected interfaces in the requested format
    pub fn run<W: Write>(&self, target: Option<&str>, format: OutputFormat, out: &mut W) -> IwResult<RunSummary> {
        let outcomes = self.collect(target)?;
        match format {
            OutputFormat::Text => write_text(&outcomes, out)?,
            OutputFormat::Json => write_json(&outcomes, out)?,
        }
        Ok(RunSummary::from_outcomes(&outcomes))
    }

    fn outcome(&self, name: &str, wireless: &[String]) -> Outcome {
        if !wireless.iter().any(|w| w == name) {
            return Outcome::NoWireless { name: name.to_string() };
        }

        match InterfaceStatus::query(self.provider, name) {
            Ok(status) => Outcome::Report(status),
            Err(e) => {
                warn!("{:<8.16}  report failed: {}", name, e);
                Outcome::Failed {
                    name: name.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Text blocks for every outcome; failed interfaces print nothing
pub fn write_text<W: Write>(outcomes: &[Outcome], out: &mut W) -> IwResult<()> {
    for outcome in outcomes {
        match outcome {
            Outcome::NoWireless { name } => out.write_all(no_wireless_notice(name).as_bytes())?,
            Outcome::Report(status) => out.write_all(status.render().as_bytes())?,
            Outcome::Failed { .. } => {}
        }
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(outcomes: &[Outcome], out: &mut W) -> IwResult<()> {
    serde_json::to_writer_pretty(&mut *out, outcomes)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockInterfaceEnumerator;
    use crate::test_support::FakeProvider;

    fn enumerator(all: &[&str], wireless: &[&str]) -> MockInterfaceEnumerator {
        let all: Vec<String> = all.iter().map(|s| s.to_string()).collect();
        let wireless: Vec<String> = wireless.iter().map(|s| s.to_string()).collect();
        let mut mock = MockInterfaceEnumerator::new();
        mock.expect_all_interface_names()
            .returning(move || Ok(all.clone()));
        mock.expect_wireless_interface_names()
            .returning(move || Ok(wireless.clone()));
        mock
    }

    fn run_text(reporter: &Reporter<FakeProvider, MockInterfaceEnumerator>, target: Option<&str>) -> (String, RunSummary) {
        let mut out = Vec::new();
        let summary = reporter.run(target, OutputFormat::Text, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_non_wireless_target() {
        let provider = FakeProvider::managed("wlan0");
        let enumerator = enumerator(&["eth1", "lo", "wlan0"], &["wlan0"]);
        let reporter = Reporter::new(&provider, &enumerator);

        let (text, summary) = run_text(&reporter, Some("eth1"));
        assert_eq!(text, "eth1       no wireless extensions.\n\n");
        assert_eq!(summary, RunSummary { reported: 0, no_wireless: 1, failed: 0 });
    }

    #[test]
    fn test_unknown_target_emits_nothing() {
        let provider = FakeProvider::managed("wlan0");
        let mut enumerator = MockInterfaceEnumerator::new();
        enumerator
            .expect_all_interface_names()
            .times(1)
            .returning(|| Ok(vec!["lo".to_string(), "wlan0".to_string()]));
        enumerator.expect_wireless_interface_names().never();
        let reporter = Reporter::new(&provider, &enumerator);

        let (text, summary) = run_text(&reporter, Some("wlan9"));
        assert!(text.is_empty());
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_invalid_target_emits_nothing() {
        let provider = FakeProvider::managed("wlan0");
        let enumerator = enumerator(&["wlan0"], &["wlan0"]);
        let reporter = Reporter::new(&provider, &enumerator);

        let (text, _) = run_text(&reporter, Some("wlan0; reboot"));
        assert!(text.is_empty());
    }

    #[test]
    fn test_all_interfaces_in_enumeration_order() {
        let provider = FakeProvider::managed("wlan0");
        let enumerator = enumerator(&["eth0", "wlan0", "lo"], &["wlan0"]);
        let reporter = Reporter::new(&provider, &enumerator);

        let outcomes = reporter.collect(None).unwrap();
        let names: Vec<&str> = outcomes.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["eth0", "wlan0", "lo"]);

        let (text, summary) = run_text(&reporter, None);
        let eth0 = text.find("eth0     ").unwrap();
        let wlan0 = text.find("wlan0     IEEE").unwrap();
        let lo = text.find("lo         no wireless").unwrap();
        assert!(eth0 < wlan0 && wlan0 < lo);
        assert_eq!(summary, RunSummary { reported: 1, no_wireless: 2, failed: 0 });
    }

    #[test]
    fn test_failure_does_not_stop_iteration() {
        // wlan1 claims wireless support but every query on it fails
        let provider = FakeProvider::managed("wlan0");
        let enumerator = enumerator(&["wlan1", "wlan0"], &["wlan0", "wlan1"]);
        let reporter = Reporter::new(&provider, &enumerator);

        let outcomes = reporter.collect(None).unwrap();
        assert!(matches!(&outcomes[0], Outcome::Failed { name, .. } if name == "wlan1"));
        assert!(matches!(&outcomes[1], Outcome::Report(s) if s.name == "wlan0"));

        let (text, summary) = run_text(&reporter, None);
        assert!(!text.contains("wlan1"));
        assert!(text.starts_with("wlan0     IEEE 802.11bg"));
        assert_eq!(summary, RunSummary { reported: 1, no_wireless: 0, failed: 1 });
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let provider = FakeProvider::managed("wlan0").with_interface("wlan1");
        let enumerator = enumerator(&["wlan0", "wlan1"], &["wlan0", "wlan1"]);
        let reporter = Reporter::new(&provider, &enumerator);

        let (text, _) = run_text(&reporter, None);
        assert!(text.contains("Missed beacon: 5\n\nwlan1     IEEE"));
        assert!(text.ends_with("Missed beacon: 5\n\n"));
    }

    #[test]
    fn test_enumeration_failure_propagates() {
        let provider = FakeProvider::managed("wlan0");
        let mut enumerator = MockInterfaceEnumerator::new();
        enumerator
            .expect_all_interface_names()
            .returning(|| Err(crate::error::IwError::NotSupported("no sysfs".to_string())));
        let reporter = Reporter::new(&provider, &enumerator);

        assert!(reporter.collect(None).is_err());
    }

    #[test]
    fn test_json_output() {
        let mut provider = FakeProvider::managed("wlan0");
        provider.tx_power = None;
        let enumerator = enumerator(&["eth0", "wlan0"], &["wlan0"]);
        let reporter = Reporter::new(&provider, &enumerator);

        let mut out = Vec::new();
        reporter.run(None, OutputFormat::Json, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json[0]["outcome"], "no_wireless");
        assert_eq!(json[0]["name"], "eth0");
        assert_eq!(json[1]["outcome"], "report");
        assert_eq!(json[1]["essid"], "HomeNet");
        assert_eq!(json[1]["tx_power"]["state"], "absent");
        assert_eq!(json[1]["bit_rate"]["mode"], "Auto");
    }
}
