//! Error types for iwstatus

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IwError {
    /// The driver has no Wireless Extensions handler for this attribute
    #[error("{interface}: {attribute} not supported by driver")]
    Unsupported { interface: String, attribute: &'static str },
    /// Query reached the driver but failed (permission, device gone, ...)
    #[error("{interface}: failed to read {attribute}: {source}")]
    QueryFailed {
        interface: String,
        attribute: &'static str,
        #[source]
        source: io::Error,
    },
    /// Host facility unavailable (no sysfs, no control socket)
    #[error("Not supported: {0}")]
    NotSupported(String),
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl IwError {
    /// Whether this error only means "the driver does not implement it"
    pub fn is_unsupported(&self) -> bool {
        matches!(self, IwError::Unsupported { .. })
    }
}

impl From<serde_json::Error> for IwError {
    fn from(error: serde_json::Error) -> Self {
        IwError::ParseError(error.to_string())
    }
}

pub type IwResult<T> = Result<T, IwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_classification() {
        let unsupported = IwError::Unsupported {
            interface: "wlan0".to_string(),
            attribute: "bit rate",
        };
        assert!(unsupported.is_unsupported());

        let failed = IwError::QueryFailed {
            interface: "wlan0".to_string(),
            attribute: "bit rate",
            source: io::Error::from_raw_os_error(libc::EPERM),
        };
        assert!(!failed.is_unsupported());
        assert!(failed.to_string().starts_with("wlan0: failed to read bit rate"));
    }
}
