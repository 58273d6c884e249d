//! Per-field probing
//!
//! Turns one provider accessor call into an [`AttributeValue`]. A driver that
//! does not implement the attribute yields [`AttributeValue::Absent`]; any
//! other failure is returned to the caller untouched.

use crate::error::IwResult;
use crate::provider::{LinkQuality, Param};
use serde::Serialize;
use tracing::debug;

/// How the current value came about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// Set by the user
    Fixed,
    /// Negotiated by driver or firmware
    Auto,
    /// Feature switched off
    Disabled,
}

impl Mode {
    /// Derive the mode from driver flags; `disabled` wins over `fixed`
    pub fn from_flags(fixed: bool, disabled: bool) -> Self {
        if disabled {
            Mode::Disabled
        } else if fixed {
            Mode::Fixed
        } else {
            Mode::Auto
        }
    }
}

/// Payload of a present attribute
///
/// Every Wireless Extensions parameter read today arrives as a
/// [`Value::Scalar`]. `Text` and `Quality` carry string and link-quality
/// payloads for providers that report them, and the formatter renders them
/// too.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Scalar(i64),
    Text(String),
    Quality(LinkQuality),
}

impl Value {
    pub fn as_scalar(&self) -> Option<i64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

/// Outcome of probing one optional attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AttributeValue {
    /// Driver does not support the attribute on this interface
    Absent,
    Present { mode: Mode, value: Value },
}

impl AttributeValue {
    pub fn is_present(&self) -> bool {
        matches!(self, AttributeValue::Present { .. })
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            AttributeValue::Present { mode, .. } => Some(*mode),
            AttributeValue::Absent => None,
        }
    }
}

impl From<Param> for AttributeValue {
    fn from(param: Param) -> Self {
        AttributeValue::Present {
            mode: Mode::from_flags(param.fixed, param.disabled),
            value: Value::Scalar(param.value),
        }
    }
}

/// Run one accessor, absorbing only the "unsupported" outcome
pub fn probe<F>(accessor: F) -> IwResult<AttributeValue>
where
    F: FnOnce() -> IwResult<Param>,
{
    match accessor() {
        Ok(param) => Ok(param.into()),
        Err(e) if e.is_unsupported() => {
            debug!("{}", e);
            Ok(AttributeValue::Absent)
        }
        Err(e) => Err(e),
    }
}
