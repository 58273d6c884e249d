//! Field formatting
//!
//! [`format_field`] lays out one probed attribute as `label`, marker, value,
//! unit and pad. The marker is `=` for a user-fixed value and `:` for an
//! automatic one. The remaining helpers convert raw driver values into their
//! human units before layout.

use crate::probe::{AttributeValue, Mode, Value};
use crate::provider::Encryption;

const KILO: f64 = 1e3;
const MEGA: f64 = 1e6;
const GIGA: f64 = 1e9;

/// Operating mode names, indexed by the Wireless Extensions mode number
const MODE_NAMES: [&str; 8] = [
    "Auto",
    "Ad-Hoc",
    "Managed",
    "Master",
    "Repeater",
    "Secondary",
    "Monitor",
    "Mesh",
];

/// Layout of one optional report field
#[derive(Clone, Copy)]
pub struct Field {
    pub label: &'static str,
    /// Converts the probed value to its display string
    pub display: fn(&Value) -> String,
    /// Appended after the value, dropped when the field is off
    pub unit: &'static str,
    /// Trailing padding after the value
    pub pad: &'static str,
    /// Trailing padding after `off`
    pub off_pad: &'static str,
    /// Whether a user-fixed value is marked with `=`
    pub shows_fixed: bool,
}

impl Field {
    fn effective_mode(&self, mode: Mode) -> Mode {
        match mode {
            Mode::Fixed if !self.shows_fixed => Mode::Auto,
            other => other,
        }
    }
}

pub const BIT_RATE: Field = Field {
    label: "Bit Rate",
    display: display_bit_rate,
    unit: "",
    pad: "   ",
    off_pad: "   ",
    shows_fixed: true,
};

pub const TX_POWER: Field = Field {
    label: "Tx-Power",
    display: display_dbm,
    unit: "",
    pad: "   ",
    off_pad: "   ",
    shows_fixed: true,
};

pub const SENSITIVITY: Field = Field {
    label: "Sensitivity",
    display: display_integer,
    unit: "/65535",
    pad: "",
    off_pad: "",
    shows_fixed: true,
};

pub const RETRY_LIMIT: Field = Field {
    label: "Retry limit",
    display: display_integer,
    unit: "",
    pad: "  ",
    off_pad: "  ",
    shows_fixed: false,
};

pub const RTS_THRESHOLD: Field = Field {
    label: "RTS thr",
    display: display_integer,
    unit: " B",
    pad: "   ",
    off_pad: "   ",
    shows_fixed: true,
};

pub const FRAG_THRESHOLD: Field = Field {
    label: "Fragment thr",
    display: display_integer,
    unit: " B",
    pad: "   ",
    off_pad: "",
    shows_fixed: true,
};

/// Marker between label and value, `None` for a disabled field
pub fn marker(mode: Mode) -> Option<char> {
    match mode {
        Mode::Fixed => Some('='),
        Mode::Auto => Some(':'),
        Mode::Disabled => None,
    }
}

/// Render one probed field, or `None` when the driver does not support it
pub fn format_field(attribute: &AttributeValue, field: &Field) -> Option<String> {
    match attribute {
        AttributeValue::Absent => None,
        AttributeValue::Present { mode, value } => match marker(field.effective_mode(*mode)) {
            Some(marker) => Some(format!(
                "{}{}{}{}{}",
                field.label,
                marker,
                (field.display)(value),
                field.unit,
                field.pad
            )),
            None => Some(format!("{}:off{}", field.label, field.off_pad)),
        },
    }
}

fn display_bit_rate(value: &Value) -> String {
    match value.as_scalar() {
        Some(bps) => format_bit_rate(bps),
        None => display_integer(value),
    }
}

fn display_dbm(value: &Value) -> String {
    format!("{} dBm", display_integer(value))
}

fn display_integer(value: &Value) -> String {
    match value {
        Value::Scalar(v) => v.to_string(),
        Value::Text(s) => s.clone(),
        Value::Quality(q) => q.quality.to_string(),
    }
}

/// Three decimals at most, trailing zeros dropped
fn trim_decimal(value: f64) -> String {
    let s = format!("{:.3}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Bits per second with a k/M/G suffix, e.g. `54Mb/s`, `5.5Mb/s`
pub fn format_bit_rate(bps: i64) -> String {
    let rate = bps as f64;
    if rate >= GIGA {
        format!("{}Gb/s", trim_decimal(rate / GIGA))
    } else if rate >= MEGA {
        format!("{}Mb/s", trim_decimal(rate / MEGA))
    } else if rate >= KILO {
        format!("{}kb/s", trim_decimal(rate / KILO))
    } else {
        format!("{}b/s", bps)
    }
}

/// Frequency in Hz, e.g. `2.412GHz`; drivers report a bare channel below 1000
pub fn format_frequency(freq: f64) -> String {
    if freq < KILO {
        format!("Channel {}", freq as i64)
    } else if freq >= GIGA {
        format!("{:.3}GHz", freq / GIGA)
    } else if freq >= MEGA {
        format!("{:.3}MHz", freq / MEGA)
    } else {
        format!("{:.3}kHz", freq / KILO)
    }
}

pub fn mode_name(mode: u32) -> &'static str {
    MODE_NAMES.get(mode as usize).copied().unwrap_or("Unknown/bug")
}

/// Access point address, `Not-Associated` when unset
pub fn format_access_point(mac: &[u8; 6]) -> String {
    if mac.iter().all(|&b| b == 0) {
        return "Not-Associated".to_string();
    }
    mac.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// `off`, `on` for a hidden key, or the key as `XXXX-XXXX-XX` hex
pub fn format_encryption(encryption: &Encryption) -> String {
    if encryption.disabled {
        return "off".to_string();
    }
    if encryption.key.is_empty() {
        return "on".to_string();
    }
    encryption
        .key
        .chunks(2)
        .map(|pair| pair.iter().map(|b| format!("{:02X}", b)).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn on_off(disabled: bool) -> &'static str {
    if disabled { "off" } else { "on" }
}
