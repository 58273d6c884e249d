//! Report assembly for one interface
//!
//! [`InterfaceStatus::query`] reads every tracked attribute of a
//! wireless-capable interface. The always-present fields must succeed; the
//! optional ones go through [`probe`] and may come back absent. The
//! [`Display`](fmt::Display) impl lays the result out in the iwconfig style.

use crate::error::IwResult;
use crate::format::{self, format_field};
use crate::probe::{probe, AttributeValue};
use crate::provider::{CapabilityProvider, DiscardCounters, LinkQuality};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Snapshot of one interface's wireless state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceStatus {
    pub name: String,
    pub protocol_name: String,
    pub essid: String,
    pub mode: String,
    pub frequency: String,
    pub access_point: String,
    pub bit_rate: AttributeValue,
    pub tx_power: AttributeValue,
    pub sensitivity: AttributeValue,
    pub retry_limit: AttributeValue,
    pub rts_threshold: AttributeValue,
    pub frag_threshold: AttributeValue,
    pub encryption_key: String,
    pub power_management: String,
    pub link_quality: LinkQuality,
    pub discard: DiscardCounters,
    pub missed_beacon: u32,
}

impl InterfaceStatus {
    /// Query all attributes of a wireless-capable interface
    ///
    /// Fails if any always-present field cannot be read. Optional fields the
    /// driver does not implement are recorded as absent.
    pub fn query<P: CapabilityProvider + ?Sized>(provider: &P, name: &str) -> IwResult<Self> {
        debug!("Querying wireless status of {}", name);

        let protocol_name = provider.protocol_name(name)?;
        let essid = provider.essid(name)?;
        let mode = format::mode_name(provider.mode(name)?).to_string();
        let frequency = format::format_frequency(provider.frequency(name)?);
        let access_point = format::format_access_point(&provider.access_point(name)?);
        let encryption_key = format::format_encryption(&provider.encryption(name)?);
        let power_management = format::on_off(provider.power_management(name)?.disabled).to_string();
        let stats = provider.statistics(name)?;

        Ok(Self {
            name: name.to_string(),
            protocol_name,
            essid,
            mode,
            frequency,
            access_point,
            bit_rate: probe(|| provider.bit_rate(name))?,
            tx_power: probe(|| provider.tx_power(name))?,
            sensitivity: probe(|| provider.sensitivity(name))?,
            retry_limit: probe(|| provider.retry_limit(name))?,
            rts_threshold: probe(|| provider.rts_threshold(name))?,
            frag_threshold: probe(|| provider.frag_threshold(name))?,
            encryption_key,
            power_management,
            link_quality: stats.quality,
            discard: stats.discard,
            missed_beacon: stats.missed_beacon,
        })
    }

    /// Bit rate, tx power and sensitivity fragments, in display order
    pub fn rate_fragments(&self) -> [Option<String>; 3] {
        [
            format_field(&self.bit_rate, &format::BIT_RATE),
            format_field(&self.tx_power, &format::TX_POWER),
            format_field(&self.sensitivity, &format::SENSITIVITY),
        ]
    }

    /// Retry limit, RTS and fragmentation threshold fragments, in display order
    pub fn threshold_fragments(&self) -> [Option<String>; 3] {
        [
            format_field(&self.retry_limit, &format::RETRY_LIMIT),
            format_field(&self.rts_threshold, &format::RTS_THRESHOLD),
            format_field(&self.frag_threshold, &format::FRAG_THRESHOLD),
        ]
    }

    /// Full text block, including the trailing blank line
    pub fn render(&self) -> String {
        self.to_string()
    }
}

/// Join the surviving fragments of a line group
///
/// Each fragment is preceded by a single space; absent ones leave nothing.
pub fn field_line(fragments: &[Option<String>]) -> String {
    let mut line = String::from("\t ");
    for fragment in fragments.iter().flatten() {
        line.push(' ');
        line.push_str(fragment);
    }
    line
}

/// Block printed for an interface without wireless extensions
pub fn no_wireless_notice(name: &str) -> String {
    format!("{:<8.16}   no wireless extensions.\n\n", name)
}

impl fmt::Display for InterfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8.16}  {}  ESSID:\"{}\" ", self.name, self.protocol_name, self.essid)?;
        writeln!(
            f,
            "\t  Mode:{}  Frequency:{}  Access Point:{}",
            self.mode, self.frequency, self.access_point
        )?;
        writeln!(f, "{}", field_line(&self.rate_fragments()))?;
        writeln!(f, "{}", field_line(&self.threshold_fragments()))?;
        writeln!(f, "\t  Encryption key:{}", self.encryption_key)?;
        writeln!(f, "\t  Power Management:{}", self.power_management)?;
        writeln!(
            f,
            "\t  Link Quality:{}/100  Signal level:{}dBm  Noise level:{}dBm",
            self.link_quality.quality, self.link_quality.signal_level, self.link_quality.noise_level
        )?;
        writeln!(
            f,
            "\t  Rx invalid nwid:{}  Rx invalid crypt:{}  Rx invalid frag:{}",
            self.discard.nwid, self.discard.crypt, self.discard.fragment
        )?;
        writeln!(
            f,
            "\t  Tx excessive retries:{}  Invalid misc:{}   Missed beacon: {}",
            self.discard.retries, self.discard.misc, self.missed_beacon
        )?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IwError;
    use crate::probe::Mode;
    use crate::provider::Param;
    use crate::test_support::FakeProvider;

    #[test]
    fn test_no_wireless_notice() {
        assert_eq!(no_wireless_notice("eth1"), "eth1       no wireless extensions.\n\n");
        assert_eq!(
            no_wireless_notice("enx0123456789ab"),
            "enx0123456789ab   no wireless extensions.\n\n"
        );
    }

    #[test]
    fn test_field_line_skips_absent() {
        let line = field_line(&[Some("Bit Rate:54Mb/s   ".to_string()), None, Some("Sensitivity:1/65535".to_string())]);
        assert_eq!(line, "\t  Bit Rate:54Mb/s    Sensitivity:1/65535");
        assert_eq!(field_line(&[None, None, None]), "\t ");
    }

    #[test]
    fn test_full_report() {
        let provider = FakeProvider::managed("wlan0");
        let status = InterfaceStatus::query(&provider, "wlan0").unwrap();

        let expected = concat!(
            "wlan0     IEEE 802.11bg  ESSID:\"HomeNet\" \n",
            "\t  Mode:Managed  Frequency:2.412GHz  Access Point:00:1A:2B:3C:4D:5E\n",
            "\t  Bit Rate:54Mb/s    Tx-Power=20 dBm    Sensitivity:0/65535\n",
            "\t  Retry limit:7   RTS thr:off    Fragment thr:off\n",
            "\t  Encryption key:off\n",
            "\t  Power Management:on\n",
            "\t  Link Quality:60/100  Signal level:-50dBm  Noise level:-95dBm\n",
            "\t  Rx invalid nwid:0  Rx invalid crypt:1  Rx invalid frag:2\n",
            "\t  Tx excessive retries:3  Invalid misc:4   Missed beacon: 5\n",
            "\n",
        );
        assert_eq!(status.render(), expected);
    }

    #[test]
    fn test_unsupported_tx_power_leaves_no_trace() {
        let mut provider = FakeProvider::managed("wlan0");
        provider.tx_power = None;
        let status = InterfaceStatus::query(&provider, "wlan0").unwrap();

        assert_eq!(status.tx_power, AttributeValue::Absent);
        let rate_line = field_line(&status.rate_fragments());
        assert_eq!(rate_line, "\t  Bit Rate:54Mb/s    Sensitivity:0/65535");
        assert!(!status.render().contains("Tx-Power"));
    }

    #[test]
    fn test_all_optional_fields_unsupported() {
        let mut provider = FakeProvider::managed("wlan0");
        provider.bit_rate = None;
        provider.tx_power = None;
        provider.sensitivity = None;
        provider.retry_limit = None;
        provider.rts_threshold = None;
        provider.frag_threshold = None;

        let rendered = InterfaceStatus::query(&provider, "wlan0").unwrap().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "\t ");
        assert_eq!(lines[3], "\t ");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_query_is_idempotent() {
        let provider = FakeProvider::managed("wlan0");
        let first = InterfaceStatus::query(&provider, "wlan0").unwrap();
        let second = InterfaceStatus::query(&provider, "wlan0").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_fixed_rate_marker() {
        let mut provider = FakeProvider::managed("wlan0");
        provider.bit_rate = Some(Param::fixed(11_000_000));
        let status = InterfaceStatus::query(&provider, "wlan0").unwrap();
        assert_eq!(status.bit_rate.mode(), Some(Mode::Fixed));
        assert!(status.render().contains("Bit Rate=11Mb/s   "));
    }

    #[test]
    fn test_required_field_failure_aborts() {
        let mut provider = FakeProvider::managed("wlan0");
        provider.failing.insert("essid");
        let err = InterfaceStatus::query(&provider, "wlan0").unwrap_err();
        assert!(matches!(err, IwError::QueryFailed { attribute: "essid", .. }));
    }

    #[test]
    fn test_optional_field_query_failure_aborts() {
        let mut provider = FakeProvider::managed("wlan0");
        provider.failing.insert("RTS threshold");
        assert!(InterfaceStatus::query(&provider, "wlan0").is_err());
    }
}
