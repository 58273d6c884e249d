//! In-memory provider for unit tests

use crate::error::{IwError, IwResult};
use crate::provider::{CapabilityProvider, DiscardCounters, Encryption, LinkQuality, Param, Statistics};
use std::collections::HashSet;
use std::io;

/// Provider backed by fixed values
///
/// `None` for an optional attribute means the driver does not support it.
/// Attribute names in `failing` fail with a query error instead.
pub struct FakeProvider {
    pub interfaces: Vec<String>,
    pub bit_rate: Option<Param>,
    pub tx_power: Option<Param>,
    pub sensitivity: Option<Param>,
    pub retry_limit: Option<Param>,
    pub rts_threshold: Option<Param>,
    pub frag_threshold: Option<Param>,
    pub failing: HashSet<&'static str>,
}

impl FakeProvider {
    /// A managed-mode station associated at 54Mb/s
    pub fn managed(interface: &str) -> Self {
        Self {
            interfaces: vec![interface.to_string()],
            bit_rate: Some(Param::auto(54_000_000)),
            tx_power: Some(Param::fixed(20)),
            sensitivity: Some(Param::auto(0)),
            retry_limit: Some(Param::auto(7)),
            rts_threshold: Some(Param::off()),
            frag_threshold: Some(Param::off()),
            failing: HashSet::new(),
        }
    }

    /// Answer for another interface with the same values
    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    fn check(&self, interface: &str, attribute: &'static str) -> IwResult<()> {
        if !self.interfaces.iter().any(|i| i == interface) || self.failing.contains(attribute) {
            return Err(IwError::QueryFailed {
                interface: interface.to_string(),
                attribute,
                source: io::Error::from_raw_os_error(libc::ENODEV),
            });
        }
        Ok(())
    }

    fn optional(&self, interface: &str, attribute: &'static str, value: Option<Param>) -> IwResult<Param> {
        self.check(interface, attribute)?;
        value.ok_or_else(|| IwError::Unsupported {
            interface: interface.to_string(),
            attribute,
        })
    }
}

impl CapabilityProvider for FakeProvider {
    fn protocol_name(&self, interface: &str) -> IwResult<String> {
        self.check(interface, "protocol name")?;
        Ok("IEEE 802.11bg".to_string())
    }

    fn essid(&self, interface: &str) -> IwResult<String> {
        self.check(interface, "essid")?;
        Ok("HomeNet".to_string())
    }

    fn mode(&self, interface: &str) -> IwResult<u32> {
        self.check(interface, "mode")?;
        Ok(2)
    }

    fn frequency(&self, interface: &str) -> IwResult<f64> {
        self.check(interface, "frequency")?;
        Ok(2.412e9)
    }

    fn access_point(&self, interface: &str) -> IwResult<[u8; 6]> {
        self.check(interface, "access point")?;
        Ok([0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e])
    }

    fn bit_rate(&self, interface: &str) -> IwResult<Param> {
        self.optional(interface, "bit rate", self.bit_rate)
    }

    fn tx_power(&self, interface: &str) -> IwResult<Param> {
        self.optional(interface, "tx power", self.tx_power)
    }

    fn sensitivity(&self, interface: &str) -> IwResult<Param> {
        self.optional(interface, "sensitivity", self.sensitivity)
    }

    fn retry_limit(&self, interface: &str) -> IwResult<Param> {
        self.optional(interface, "retry limit", self.retry_limit)
    }

    fn rts_threshold(&self, interface: &str) -> IwResult<Param> {
        self.optional(interface, "RTS threshold", self.rts_threshold)
    }

    fn frag_threshold(&self, interface: &str) -> IwResult<Param> {
        self.optional(interface, "fragmentation threshold", self.frag_threshold)
    }

    fn encryption(&self, interface: &str) -> IwResult<Encryption> {
        self.check(interface, "encryption")?;
        Ok(Encryption { disabled: true, key: Vec::new() })
    }

    fn power_management(&self, interface: &str) -> IwResult<Param> {
        self.check(interface, "power management")?;
        Ok(Param::auto(0))
    }

    fn statistics(&self, interface: &str) -> IwResult<Statistics> {
        self.check(interface, "statistics")?;
        Ok(Statistics {
            quality: LinkQuality { quality: 60, signal_level: -50, noise_level: -95 },
            discard: DiscardCounters { nwid: 0, crypt: 1, fragment: 2, retries: 3, misc: 4 },
            missed_beacon: 5,
        })
    }
}
