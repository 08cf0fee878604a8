//! TOML configuration file for the client.
//!
//! An optional file lets deployments pin the server address and transport
//! settings instead of repeating them on every command line:
//!
//! ```toml
//! host = "riemann.internal"
//! port = 5555
//! transport = "udp"
//! timeout_ms = 2000
//! max_datagram_size = 16384
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default = "...")]` so a partial file (or an
//! empty one) still produces a complete configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use riemann_core::protocol::messages::{
    DEFAULT_HOST, DEFAULT_MAX_DATAGRAM_SIZE, DEFAULT_MAX_FRAME_SIZE, DEFAULT_PORT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::network::{TransportConfig, TransportKind};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfigFile {
    /// Server hostname or IP address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `"tcp"` or `"udp"`.
    #[serde(default)]
    pub transport: TransportKind,
    /// Connect and round-trip deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Largest datagram the UDP transport will send.
    #[serde(default = "default_max_datagram_size")]
    pub max_datagram_size: usize,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_timeout_ms() -> u64 {
    5_000
}
fn default_max_datagram_size() -> usize {
    DEFAULT_MAX_DATAGRAM_SIZE
}

impl Default for ClientConfigFile {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            transport: TransportKind::default(),
            timeout_ms: default_timeout_ms(),
            max_datagram_size: default_max_datagram_size(),
        }
    }
}

impl ClientConfigFile {
    /// Converts the file schema into runtime transport settings.
    pub fn into_transport_config(self) -> TransportConfig {
        TransportConfig {
            host: self.host,
            port: self.port,
            kind: self.transport,
            timeout: Duration::from_millis(self.timeout_ms),
            max_datagram_size: self.max_datagram_size,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is not valid TOML for this schema.
pub fn parse_config(text: &str) -> Result<ClientConfigFile, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Loads configuration from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if its content is invalid.
pub fn load_config(path: &Path) -> Result<ClientConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
