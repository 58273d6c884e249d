//! Linux Wireless Extensions backend
//!
//! Reads wireless attributes with `SIOCGIW*` ioctls on a datagram control
//! socket and lists interfaces from sysfs. A driver without a handler for a
//! request answers `EOPNOTSUPP`, which is reported as
//! [`IwError::Unsupported`]; any other errno is a failed query.

use crate::config::ConfigPaths;
use crate::error::{IwError, IwResult};
use crate::provider::{
    CapabilityProvider, DiscardCounters, Encryption, InterfaceEnumerator, LinkQuality, Param,
    Statistics,
};
use crate::validation;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

// Request numbers from <linux/wireless.h>
const SIOCGIWNAME: u32 = 0x8B01;
const SIOCGIWFREQ: u32 = 0x8B05;
const SIOCGIWMODE: u32 = 0x8B07;
const SIOCGIWSENS: u32 = 0x8B09;
const SIOCGIWSTATS: u32 = 0x8B0F;
const SIOCGIWAP: u32 = 0x8B15;
const SIOCGIWESSID: u32 = 0x8B1B;
const SIOCGIWRATE: u32 = 0x8B21;
const SIOCGIWRTS: u32 = 0x8B23;
const SIOCGIWFRAG: u32 = 0x8B25;
const SIOCGIWTXPOW: u32 = 0x8B27;
const SIOCGIWRETRY: u32 = 0x8B29;
const SIOCGIWENCODE: u32 = 0x8B2B;
const SIOCGIWPOWER: u32 = 0x8B2D;

const IFNAMSIZ: usize = 16;
const IW_ESSID_MAX_SIZE: usize = 32;
const IW_ENCODING_TOKEN_MAX: usize = 64;

const IW_ENCODE_NOKEY: u16 = 0x0800;
const IW_ENCODE_DISABLED: u16 = 0x8000;

const IW_TXPOW_TYPE: u16 = 0x00FF;
const IW_TXPOW_MWATT: u16 = 0x0001;

/// Ask the driver to clear the "updated" bits after reading statistics
const IW_STATS_CLEAR_UPDATED: u16 = 1;

#[repr(C)]
#[allow(dead_code)]
#[derive(Clone, Copy)]
struct IwPoint {
    pointer: *mut libc::c_void,
    length: u16,
    flags: u16,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct IwParam {
    value: i32,
    fixed: u8,
    disabled: u8,
    flags: u16,
}

#[repr(C)]
#[allow(dead_code)]
#[derive(Clone, Copy)]
struct IwFreq {
    m: i32,
    e: i16,
    i: u8,
    flags: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
union IwReqData {
    name: [u8; IFNAMSIZ],
    point: IwPoint,
    param: IwParam,
    freq: IwFreq,
    mode: u32,
    ap_addr: libc::sockaddr,
}

/// `struct iwreq`
#[repr(C)]
#[allow(dead_code)]
struct IwReq {
    ifr_name: [u8; IFNAMSIZ],
    u: IwReqData,
}

impl IwReq {
    fn new(interface: &str) -> IwResult<Self> {
        validation::validate_interface_name(interface)?;

        let mut ifr_name = [0u8; IFNAMSIZ];
        ifr_name[..interface.len()].copy_from_slice(interface.as_bytes());
        Ok(Self {
            ifr_name,
            u: IwReqData { name: [0; IFNAMSIZ] },
        })
    }
}

#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
struct IwQuality {
    qual: u8,
    level: u8,
    noise: u8,
    updated: u8,
}

#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
struct IwStatistics {
    status: u16,
    qual: IwQuality,
    discard_nwid: u32,
    discard_code: u32,
    discard_fragment: u32,
    discard_retries: u32,
    discard_misc: u32,
    miss_beacon: u32,
}

impl From<IwStatistics> for Statistics {
    fn from(raw: IwStatistics) -> Self {
        Statistics {
            quality: LinkQuality {
                quality: raw.qual.qual,
                signal_level: level_dbm(raw.qual.level),
                noise_level: level_dbm(raw.qual.noise),
            },
            discard: DiscardCounters {
                nwid: raw.discard_nwid,
                crypt: raw.discard_code,
                fragment: raw.discard_fragment,
                retries: raw.discard_retries,
                misc: raw.discard_misc,
            },
            missed_beacon: raw.miss_beacon,
        }
    }
}

/// Signal and noise levels are unsigned bytes offset by 0x100 when in dBm
fn level_dbm(raw: u8) -> i32 {
    let level = raw as i32;
    if level >= 64 { level - 0x100 } else { level }
}

fn mwatt_to_dbm(mwatt: i32) -> i64 {
    if mwatt <= 0 {
        return 0;
    }
    (10.0 * (mwatt as f64).log10()).ceil() as i64
}

/// Map an ioctl errno onto the two error classes
fn classify(interface: &str, attribute: &'static str, err: io::Error) -> IwError {
    match err.raw_os_error() {
        Some(code) if code == libc::EOPNOTSUPP => IwError::Unsupported {
            interface: interface.to_string(),
            attribute,
        },
        _ => IwError::QueryFailed {
            interface: interface.to_string(),
            attribute,
            source: err,
        },
    }
}

/// Wireless Extensions controller
pub struct Wext {
    socket: OwnedFd,
    sys_class_net: PathBuf,
    proc_net_wireless: PathBuf,
}

impl Wext {
    /// Open the control socket used for all queries
    pub fn new(paths: &ConfigPaths) -> IwResult<Self> {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(IwError::NotSupported(format!(
                "Cannot open control socket: {}",
                io::Error::last_os_error()
            )));
        }

        Ok(Self {
            socket: unsafe { OwnedFd::from_raw_fd(fd) },
            sys_class_net: paths.sys_class_net.clone(),
            proc_net_wireless: paths.proc_net_wireless.clone(),
        })
    }

    /// Whether the driver answers Wireless Extensions requests at all
    pub fn is_wireless(&self, interface: &str) -> bool {
        match self.protocol_name(interface) {
            Ok(_) => true,
            Err(e) => {
                trace!("{} is not wireless: {}", interface, e);
                false
            }
        }
    }

    // === Helper functions ===

    fn ioctl(&self, interface: &str, attribute: &'static str, request: u32, req: &mut IwReq) -> IwResult<()> {
        let ret = unsafe { libc::ioctl(self.socket.as_raw_fd(), request as _, req as *mut IwReq) };
        if ret < 0 {
            return Err(classify(interface, attribute, io::Error::last_os_error()));
        }
        Ok(())
    }

    fn get(&self, interface: &str, attribute: &'static str, request: u32) -> IwResult<IwReq> {
        let mut req = IwReq::new(interface)?;
        self.ioctl(interface, attribute, request, &mut req)?;
        Ok(req)
    }

    fn get_param(&self, interface: &str, attribute: &'static str, request: u32) -> IwResult<Param> {
        let req = self.get(interface, attribute, request)?;
        let param = unsafe { req.u.param };
        Ok(Param {
            value: param.value as i64,
            fixed: param.fixed != 0,
            disabled: param.disabled != 0,
        })
    }

    fn proc_statistics(&self, interface: &str) -> IwResult<Statistics> {
        debug!("Falling back to {:?} for {} statistics", self.proc_net_wireless, interface);
        let file = fs::File::open(&self.proc_net_wireless)?;
        parse_proc_net_wireless(BufReader::new(file), interface)?.ok_or_else(|| IwError::Unsupported {
            interface: interface.to_string(),
            attribute: "statistics",
        })
    }
}

impl CapabilityProvider for Wext {
    fn protocol_name(&self, interface: &str) -> IwResult<String> {
        let req = self.get(interface, "protocol name", SIOCGIWNAME)?;
        let name = unsafe { req.u.name };
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        Ok(String::from_utf8_lossy(&name[..end]).into_owned())
    }

    fn essid(&self, interface: &str) -> IwResult<String> {
        let mut buf = [0u8; IW_ESSID_MAX_SIZE + 1];
        let mut req = IwReq::new(interface)?;
        req.u.point = IwPoint {
            pointer: buf.as_mut_ptr().cast(),
            length: buf.len() as u16,
            flags: 0,
        };
        self.ioctl(interface, "essid", SIOCGIWESSID, &mut req)?;

        let point = unsafe { req.u.point };
        let len = (point.length as usize).min(buf.len());
        Ok(validation::sanitize_essid(&buf[..len]))
    }

    fn mode(&self, interface: &str) -> IwResult<u32> {
        let req = self.get(interface, "mode", SIOCGIWMODE)?;
        Ok(unsafe { req.u.mode })
    }

    fn frequency(&self, interface: &str) -> IwResult<f64> {
        let req = self.get(interface, "frequency", SIOCGIWFREQ)?;
        let freq = unsafe { req.u.freq };
        Ok(freq.m as f64 * 10f64.powi(freq.e as i32))
    }

    fn access_point(&self, interface: &str) -> IwResult<[u8; 6]> {
        let req = self.get(interface, "access point", SIOCGIWAP)?;
        let addr = unsafe { req.u.ap_addr };
        let mut mac = [0u8; 6];
        for (dst, src) in mac.iter_mut().zip(addr.sa_data.iter()) {
            *dst = *src as u8;
        }
        Ok(mac)
    }

    fn bit_rate(&self, interface: &str) -> IwResult<Param> {
        self.get_param(interface, "bit rate", SIOCGIWRATE)
    }

    fn tx_power(&self, interface: &str) -> IwResult<Param> {
        let req = self.get(interface, "tx power", SIOCGIWTXPOW)?;
        let param = unsafe { req.u.param };
        let value = if param.flags & IW_TXPOW_TYPE == IW_TXPOW_MWATT {
            mwatt_to_dbm(param.value)
        } else {
            param.value as i64
        };
        Ok(Param {
            value,
            fixed: param.fixed != 0,
            disabled: param.disabled != 0,
        })
    }

    fn sensitivity(&self, interface: &str) -> IwResult<Param> {
        self.get_param(interface, "sensitivity", SIOCGIWSENS)
    }

    fn retry_limit(&self, interface: &str) -> IwResult<Param> {
        self.get_param(interface, "retry limit", SIOCGIWRETRY)
    }

    fn rts_threshold(&self, interface: &str) -> IwResult<Param> {
        self.get_param(interface, "RTS threshold", SIOCGIWRTS)
    }

    fn frag_threshold(&self, interface: &str) -> IwResult<Param> {
        self.get_param(interface, "fragmentation threshold", SIOCGIWFRAG)
    }

    fn encryption(&self, interface: &str) -> IwResult<Encryption> {
        let mut key = [0u8; IW_ENCODING_TOKEN_MAX];
        let mut req = IwReq::new(interface)?;
        req.u.point = IwPoint {
            pointer: key.as_mut_ptr().cast(),
            length: key.len() as u16,
            flags: 0,
        };
        self.ioctl(interface, "encryption", SIOCGIWENCODE, &mut req)?;

        let point = unsafe { req.u.point };
        let len = if point.flags & IW_ENCODE_NOKEY != 0 {
            0
        } else {
            (point.length as usize).min(key.len())
        };
        Ok(Encryption {
            disabled: point.flags & IW_ENCODE_DISABLED != 0,
            key: key[..len].to_vec(),
        })
    }

    fn power_management(&self, interface: &str) -> IwResult<Param> {
        self.get_param(interface, "power management", SIOCGIWPOWER)
    }

    fn statistics(&self, interface: &str) -> IwResult<Statistics> {
        let mut stats = IwStatistics::default();
        let mut req = IwReq::new(interface)?;
        req.u.point = IwPoint {
            pointer: (&mut stats as *mut IwStatistics).cast(),
            length: std::mem::size_of::<IwStatistics>() as u16,
            flags: IW_STATS_CLEAR_UPDATED,
        };

        match self.ioctl(interface, "statistics", SIOCGIWSTATS, &mut req) {
            Ok(()) => Ok(stats.into()),
            Err(e) if e.is_unsupported() => self.proc_statistics(interface),
            Err(e) => Err(e),
        }
    }
}

impl InterfaceEnumerator for Wext {
    fn all_interface_names(&self) -> IwResult<Vec<String>> {
        list_interfaces(&self.sys_class_net)
    }

    fn wireless_interface_names(&self) -> IwResult<Vec<String>> {
        Ok(self
            .all_interface_names()?
            .into_iter()
            .filter(|name| self.is_wireless(name))
            .collect())
    }
}

/// List all network interfaces under a sysfs `class/net` directory, sorted
pub fn list_interfaces(net_path: &Path) -> IwResult<Vec<String>> {
    if !net_path.exists() {
        return Err(IwError::NotSupported(format!(
            "{} not available",
            net_path.display()
        )));
    }

    let mut interfaces = Vec::new();
    for entry in fs::read_dir(net_path)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            interfaces.push(name.to_string());
        }
    }

    interfaces.sort();
    Ok(interfaces)
}

/// Find an interface's row in `/proc/net/wireless`
///
/// ```text
/// Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
///  face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
///  wlan0: 0000   54.  -56.  -256        0      0      0      0      0        0
/// ```
pub fn parse_proc_net_wireless<R: BufRead>(reader: R, interface: &str) -> IwResult<Option<Statistics>> {
    for line in reader.lines().skip(2) {
        let line = line?;
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != interface {
            continue;
        }

        let fields: Vec<&str> = rest.split_whitespace().collect();
        if fields.len() < 10 {
            return Err(IwError::ParseError(format!(
                "Short /proc/net/wireless row for {}: {:?}",
                interface, line
            )));
        }

        let number = |idx: usize| -> IwResult<f64> {
            let field = fields[idx].trim_end_matches('.');
            field.parse::<f64>().map_err(|_| {
                IwError::ParseError(format!("Invalid value {:?} for {}", fields[idx], interface))
            })
        };

        return Ok(Some(Statistics {
            quality: LinkQuality {
                quality: number(1)?.clamp(0.0, 255.0) as u8,
                signal_level: number(2)? as i32,
                noise_level: number(3)? as i32,
            },
            discard: DiscardCounters {
                nwid: number(4)? as u32,
                crypt: number(5)? as u32,
                fragment: number(6)? as u32,
                retries: number(7)? as u32,
                misc: number(8)? as u32,
            },
            missed_beacon: number(9)? as u32,
        }));
    }
    Ok(None)
}
