//! Configuration file management.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete daemon configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Finance API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Payout history settings.
    #[serde(default)]
    pub payout: PayoutConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Finance API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token. Empty = no Authorization header.
    #[serde(default)]
    pub api_token: String,
    /// Whole-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// ISO currency code amounts are rendered in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Payout history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// Page size when the UI does not ask for one.
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// IPC socket path. Empty = $data_dir/finboard.sock.
    #[serde(default)]
    pub socket_path: String,
    /// Per-subscriber event buffer.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

// Default value functions

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_currency() -> String {
    finboard_types::DEFAULT_CURRENCY.to_string()
}

fn default_per_page() -> u32 {
    finboard_types::DEFAULT_PER_PAGE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_buffer() -> usize {
    256
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            socket_path: String::new(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Token to send, if any.
    pub fn token(&self) -> Option<String> {
        Some(self.api_token.clone()).filter(|t| !t.is_empty())
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if the file does not exist. `FINBOARD_API_URL`
    /// overrides `api.base_url`.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("FINBOARD_API_URL") {
            if !url.is_empty() {
                config.api.base_url = url;
            }
        }
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::default_data_dir()
    }

    /// Get the IPC socket path.
    pub fn socket_path(&self) -> PathBuf {
        if self.advanced.socket_path.is_empty() {
            self.data_dir().join("finboard.sock")
        } else {
            PathBuf::from(&self.advanced.socket_path)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("FINBOARD_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Finboard")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".finboard")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/finboard"))
}
