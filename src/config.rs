//! Configuration management for iwstatus

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{IwError, IwResult};

/// System-wide configuration file, read when present
pub const DEFAULT_CONFIG_PATH: &str = "/etc/iwstatus/config.toml";

/// Main iwstatus configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IwConfig {
    /// Kernel interface paths
    #[serde(default)]
    pub paths: ConfigPaths,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPaths {
    /// Directory listing every network interface
    #[serde(default = "default_sys_class_net")]
    pub sys_class_net: PathBuf,
    /// Per-interface wireless statistics table
    #[serde(default = "default_proc_net_wireless")]
    pub proc_net_wireless: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_sys_class_net() -> PathBuf {
    PathBuf::from("/sys/class/net")
}

fn default_proc_net_wireless() -> PathBuf {
    PathBuf::from("/proc/net/wireless")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self {
            sys_class_net: default_sys_class_net(),
            proc_net_wireless: default_proc_net_wireless(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl IwConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> IwResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| IwError::ConfigError(format!("Failed to read config {:?}: {}", path.as_ref(), e)))?;

        toml::from_str(&content)
            .map_err(|e| IwError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one, the system-wide file is used
    /// if it is there and the built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> IwResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let system = Path::new(DEFAULT_CONFIG_PATH);
                if system.exists() {
                    Self::load(system)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
