//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON. Every section
//! defaults sensibly so a completely empty `{}` file is valid, and the
//! defaults alone give a working loopback server.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "QUICKCUT_PORT";
/// Environment variable overriding `server.host`.
pub const HOST_ENV: &str = "QUICKCUT_HOST";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tools: ToolsConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::InvalidInput(format!("config parse error: {e}")))
    }

    /// Load configuration from a file, propagating read and parse errors.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply `QUICKCUT_HOST` / `QUICKCUT_PORT` overrides from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(HOST_ENV).ok().as_deref(),
            std::env::var(PORT_ENV).ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, host: Option<&str>, port: Option<&str>) {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid {PORT_ENV} value {port:?}"),
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        match self.server.host.parse::<IpAddr>() {
            Ok(ip) if !ip.is_loopback() => warnings.push(format!(
                "server.host {ip} is not a loopback address; any host on the network can read and cut local files"
            )),
            Ok(_) => {}
            Err(_) if self.server.host != "localhost" => {
                warnings.push(format!("server.host {:?} is not an IP address", self.server.host));
            }
            Err(_) => {}
        }

        if self.export.max_workers == Some(0) {
            warnings.push("export.max_workers is 0; the default pool size will be used".into());
        }

        if self.export.cut_timeout_secs == Some(0) {
            warnings.push("export.cut_timeout_secs is 0; every cut would time out".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the preview page (`index.html` and assets).
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5050,
            static_dir: Some(PathBuf::from("./static")),
        }
    }
}

/// Paths to external CLI tools. Unset entries are looked up in `PATH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub touch_path: Option<PathBuf>,
    pub setfile_path: Option<PathBuf>,
}

/// Segment export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Concurrent cut workers. `None` (or 0) sizes the pool to the logical
    /// CPU count, with a floor of 4.
    pub max_workers: Option<usize>,
    /// Per-invocation limit for the cut tool. `None` waits indefinitely.
    pub cut_timeout_secs: Option<u64>,
}
