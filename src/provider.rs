//! Capability provider and interface enumeration seams
//!
//! A [`CapabilityProvider`] answers one question per wireless attribute for a
//! named interface. Accessors return [`IwError::Unsupported`] when the driver
//! has no handler for the attribute; every other error means the query itself
//! broke.
//!
//! [`IwError::Unsupported`]: crate::error::IwError::Unsupported

use crate::error::IwResult;
use serde::{Deserialize, Serialize};

/// A tunable driver parameter as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub value: i64,
    /// Set explicitly by the user rather than negotiated
    pub fixed: bool,
    /// Feature switched off
    pub disabled: bool,
}

impl Param {
    pub fn auto(value: i64) -> Self {
        Self { value, fixed: false, disabled: false }
    }

    pub fn fixed(value: i64) -> Self {
        Self { value, fixed: true, disabled: false }
    }

    pub fn off() -> Self {
        Self { value: 0, fixed: false, disabled: true }
    }
}

/// Encryption state of the current key slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encryption {
    pub disabled: bool,
    /// Key material, empty when the driver hides it
    pub key: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkQuality {
    pub quality: u8,
    /// dBm
    pub signal_level: i32,
    /// dBm
    pub noise_level: i32,
}

/// Frames dropped per reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscardCounters {
    pub nwid: u32,
    pub crypt: u32,
    pub fragment: u32,
    pub retries: u32,
    pub misc: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub quality: LinkQuality,
    pub discard: DiscardCounters,
    pub missed_beacon: u32,
}

/// Read-only access to the wireless attributes of an interface
pub trait CapabilityProvider {
    /// Wireless protocol family name, e.g. "IEEE 802.11bgn"
    fn protocol_name(&self, interface: &str) -> IwResult<String>;
    fn essid(&self, interface: &str) -> IwResult<String>;
    /// Raw operating mode index
    fn mode(&self, interface: &str) -> IwResult<u32>;
    /// Frequency in Hz, or a channel number when below 1000
    fn frequency(&self, interface: &str) -> IwResult<f64>;
    fn access_point(&self, interface: &str) -> IwResult<[u8; 6]>;
    /// Bits per second
    fn bit_rate(&self, interface: &str) -> IwResult<Param>;
    /// dBm
    fn tx_power(&self, interface: &str) -> IwResult<Param>;
    fn sensitivity(&self, interface: &str) -> IwResult<Param>;
    fn retry_limit(&self, interface: &str) -> IwResult<Param>;
    /// Bytes
    fn rts_threshold(&self, interface: &str) -> IwResult<Param>;
    /// Bytes
    fn frag_threshold(&self, interface: &str) -> IwResult<Param>;
    fn encryption(&self, interface: &str) -> IwResult<Encryption>;
    fn power_management(&self, interface: &str) -> IwResult<Param>;
    fn statistics(&self, interface: &str) -> IwResult<Statistics>;
}

/// Host-provided interface listing
#[cfg_attr(test, mockall::automock)]
pub trait InterfaceEnumerator {
    /// Every network interface, in enumeration order
    fn all_interface_names(&self) -> IwResult<Vec<String>>;
    /// The subset that answers Wireless Extensions queries
    fn wireless_interface_names(&self) -> IwResult<Vec<String>>;
}
