//! iwstatus - Wireless Interface Status Library
//!
//! Reports the live configuration and link statistics of wireless network
//! interfaces in the layout of the classic `iwconfig` status output:
//! - Capability provider seam and the Linux Wireless Extensions backend
//! - Per-field probing that tolerates drivers missing an attribute
//! - Field formatting with fixed (`=`) and automatic (`:`) markers
//! - Report assembly and per-interface iteration

pub mod error;
pub mod validation;
pub mod config;
pub mod provider;
pub mod probe;
pub mod format;
pub mod report;
pub mod reporter;
pub mod wext;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use error::{IwError, IwResult};
pub use config::IwConfig;
pub use provider::{
    CapabilityProvider, InterfaceEnumerator, Param, Encryption, Statistics,
    LinkQuality, DiscardCounters,
};
pub use probe::{probe, AttributeValue, Mode, Value};
pub use format::{format_field, Field};
pub use report::{InterfaceStatus, no_wireless_notice};
pub use reporter::{Reporter, Outcome, OutputFormat, RunSummary};
pub use wext::Wext;
