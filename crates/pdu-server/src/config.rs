//! Gateway configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:5000"
//! max_body_bytes = 16384
//!
//! [drivers]
//! timeout_secs = 10
//! snmp_tool = "snmpset"
//! max_outlets = 48
//! redfish_insecure = false
//! enable_simulated = false
//! ```
//!
//! Every key is optional. A missing file means defaults.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use pdu_control::DriverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the config file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/pdu-gateway/config.toml";

/// Error loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5000)),
            max_body_bytes: 16 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub drivers: DriverConfig,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
