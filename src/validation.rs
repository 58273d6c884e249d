//! Input validation and sanitization
//!
//! Interface names come from the command line and ESSIDs come straight from
//! the driver; both are checked here before they reach a request buffer or
//! the terminal.

use crate::error::{IwError, IwResult};

/// Longest name that fits an `ifreq` name buffer with its terminating NUL
pub const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Maximum ESSID length defined by 802.11
pub const MAX_ESSID_LEN: usize = 32;

/// Check that a name can be a Linux interface name
///
/// Follows the kernel's own rules rather than a character whitelist, so names
/// such as `wifi+1` pass: non-empty, at most 15 bytes, not `.` or `..`, and
/// free of NUL, `/`, `:` and whitespace.
pub fn validate_interface_name(name: &str) -> IwResult<()> {
    if name.is_empty() {
        return Err(IwError::InvalidParameter(
            "Interface name cannot be empty".to_string()
        ));
    }

    if name.len() > MAX_INTERFACE_NAME_LEN {
        return Err(IwError::InvalidParameter(
            format!("Interface name too long (max {} bytes)", MAX_INTERFACE_NAME_LEN)
        ));
    }

    if name == "." || name == ".." {
        return Err(IwError::InvalidParameter(
            format!("Invalid interface name '{}'", name)
        ));
    }

    if let Some(c) = name.chars().find(|&c| c == '\0' || c == '/' || c == ':' || c.is_whitespace()) {
        return Err(IwError::InvalidParameter(
            format!("Invalid interface name {:?}: contains {:?}", name, c)
        ));
    }

    Ok(())
}

/// Make a raw ESSID safe for display
///
/// Stops at the first NUL, caps the length at 32 bytes and escapes anything
/// that is not printable ASCII as `\xNN`.
pub fn sanitize_essid(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let bytes = &raw[..end.min(MAX_ESSID_LEN)];

    let mut essid = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            essid.push(b as char);
        } else {
            essid.push_str(&format!("\\x{:02x}", b));
        }
    }
    essid
}
