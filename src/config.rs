//! Configuration file for the logger

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{LogLevel, SyslogFacility};

/// Logger settings as stored on disk
///
/// Every field is optional in the file; missing ones take the same defaults
/// as a freshly constructed logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Least severe level to emit: a name ("warning") or a number 0-3
    #[serde(alias = "log_level")]
    pub minimum_level: LogLevel,

    /// Write entries to standard error
    pub log_to_stdout: bool,

    /// Write entries to the system logger
    pub log_to_syslog: bool,

    /// Tag prefixed to system logger entries
    #[serde(alias = "syslog_name", skip_serializing_if = "Option::is_none")]
    pub syslog_tag: Option<String>,

    /// Syslog facility (default: user)
    pub syslog_facility: SyslogFacility,

    /// Process name reported to syslog (default: executable name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_process: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            minimum_level: LogLevel::Debug,
            log_to_stdout: true,
            log_to_syslog: true,
            syslog_tag: None,
            syslog_facility: SyslogFacility::User,
            syslog_process: None,
        }
    }
}

impl LoggerConfig {
    /// Load configuration from the default file, or return defaults if not found
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Get the base configuration directory (~/.tiger)
/// Falls back to ./.tiger if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".tiger")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tiger"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("syslogger.toml")
}
