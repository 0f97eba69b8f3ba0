//! The leveled logging facade
//!
//! [`LegacySyslogger`] looks a bit like a regular logging object so callers can
//! move to a richer logging API later. Each message is filtered against a
//! minimum level, prefixed with the level's letter, then written to standard
//! error and/or the system logger depending on configuration.
//!
//! ```no_run
//! use legacy_syslogger::logging::{LegacySyslogger, LogLevel};
//!
//! let logger = LegacySyslogger::new();
//! logger.log(LogLevel::Warning, "Unable to biggle")?; // W: Unable to biggle
//! logger.warning("Could not frob; continuing")?;
//! logger.error("Abandon ship, all ye who run this")?;
//! # Ok::<(), legacy_syslogger::logging::SinkError>(())
//! ```

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::LoggerConfig;

use super::error::{ConfigError, SinkError};
use super::level::LogLevel;
use super::sink::{Sink, StderrSink, SyslogIdentity, SyslogSink};

/// Current configuration of a [`LegacySyslogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Least severe level still emitted
    pub minimum_level: LogLevel,
    /// Write to standard error (the name is historical; the sink is stderr)
    pub log_to_stdout: bool,
    /// Write to the system logger
    pub log_to_syslog: bool,
    /// Prefix for system logger entries
    pub syslog_tag: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            minimum_level: LogLevel::Debug,
            log_to_stdout: true,
            log_to_syslog: true,
            syslog_tag: None,
        }
    }
}

impl Settings {
    /// Payload sent to the system logger for an already prefixed message
    pub fn syslog_payload(&self, prefixed: &str) -> String {
        match self.syslog_tag.as_deref() {
            Some(tag) if !tag.is_empty() => format!("{}: {}", tag, prefixed),
            _ => prefixed.to_string(),
        }
    }
}

/// Leveled logger writing to standard error and the system logger
///
/// All methods take `&self`; settings sit behind a lock so a shared logger can
/// be reconfigured while in use.
pub struct LegacySyslogger {
    settings: RwLock<Settings>,
    stderr: Box<dyn Sink>,
    syslog: Box<dyn Sink>,
}

impl LegacySyslogger {
    /// Logger with default settings writing to the real stderr and syslog
    pub fn new() -> Self {
        Self::with_sinks(StderrSink::new(), SyslogSink::default())
    }

    /// Logger with default settings and the given sinks
    pub fn with_sinks(stderr: impl Sink + 'static, syslog: impl Sink + 'static) -> Self {
        Self {
            settings: RwLock::new(Settings::default()),
            stderr: Box::new(stderr),
            syslog: Box::new(syslog),
        }
    }

    /// Logger configured from a config file, using the configured syslog identity
    pub fn from_config(config: &LoggerConfig) -> Self {
        let identity = SyslogIdentity {
            process: config
                .syslog_process
                .clone()
                .unwrap_or_else(super::sink::default_process_name),
            facility: config.syslog_facility,
        };
        let logger = Self::with_sinks(StderrSink::new(), SyslogSink::new(identity));
        logger.apply(config);
        logger
    }

    /// Replace all four settings with the ones from `config`
    pub fn apply(&self, config: &LoggerConfig) {
        *self.write_settings() = Settings {
            minimum_level: config.minimum_level,
            log_to_stdout: config.log_to_stdout,
            log_to_syslog: config.log_to_syslog,
            syslog_tag: config.syslog_tag.clone(),
        };
    }

    fn read_settings(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_settings(&self) -> RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> Settings {
        self.read_settings().clone()
    }

    /// Minimum level at which to emit a log entry
    pub fn minimum_level(&self) -> LogLevel {
        self.read_settings().minimum_level
    }

    pub fn set_minimum_level(&self, level: LogLevel) {
        self.write_settings().minimum_level = level;
    }

    /// Whether entries go to standard error
    pub fn log_to_stdout(&self) -> bool {
        self.read_settings().log_to_stdout
    }

    pub fn set_log_to_stdout(&self, enabled: bool) {
        self.write_settings().log_to_stdout = enabled;
    }

    /// Whether entries go to the system logger
    pub fn log_to_syslog(&self) -> bool {
        self.read_settings().log_to_syslog
    }

    pub fn set_log_to_syslog(&self, enabled: bool) {
        self.write_settings().log_to_syslog = enabled;
    }

    /// Tag prefixed to system logger entries
    pub fn syslog_tag(&self) -> Option<String> {
        self.read_settings().syslog_tag.clone()
    }

    pub fn set_syslog_tag<S: Into<String>>(&self, tag: Option<S>) {
        self.write_settings().syslog_tag = tag.map(Into::into);
    }

    /// Set a property from an untyped value, validating it first
    ///
    /// `value` of `None` clears the syslog tag; for the other properties it
    /// is rejected like any other wrongly typed value. On error the property
    /// keeps its previous value.
    pub fn set_property(&self, name: &str, value: Option<&toml::Value>) -> Result<(), ConfigError> {
        match name {
            "minimum_level" | "log_level" => {
                let level = level_from_value(value)?;
                self.set_minimum_level(level);
            }
            "log_to_stdout" => {
                let enabled = bool_from_value("log_to_stdout", value)?;
                self.set_log_to_stdout(enabled);
            }
            "log_to_syslog" => {
                let enabled = bool_from_value("log_to_syslog", value)?;
                self.set_log_to_syslog(enabled);
            }
            "syslog_tag" | "syslog_name" => {
                let tag = match value {
                    None => None,
                    Some(toml::Value::String(s)) => Some(s.clone()),
                    Some(other) => {
                        return Err(ConfigError::NotString {
                            property: "syslog_tag",
                            value: other.to_string(),
                        })
                    }
                };
                self.set_syslog_tag(tag);
            }
            other => return Err(ConfigError::UnknownProperty(other.to_string())),
        }
        Ok(())
    }

    /// Emit `msg` if `level` is at least as severe as the minimum level
    ///
    /// The prefixed message goes to stderr and/or syslog depending on the
    /// flags. A stderr failure is returned before syslog is attempted.
    pub fn log(&self, level: LogLevel, msg: &str) -> Result<(), SinkError> {
        let settings = self.settings();
        if !level.passes(settings.minimum_level) {
            return Ok(());
        }

        let msg = level.format_message(msg);

        if settings.log_to_stdout {
            self.stderr.emit(level, &msg)?;
        }

        if settings.log_to_syslog {
            self.syslog.emit(level, &settings.syslog_payload(&msg))?;
        }

        Ok(())
    }

    /// Shorthand for `log(LogLevel::Debug, msg)`
    pub fn debug(&self, msg: &str) -> Result<(), SinkError> {
        self.log(LogLevel::Debug, msg)
    }

    /// Shorthand for `log(LogLevel::Info, msg)`
    pub fn info(&self, msg: &str) -> Result<(), SinkError> {
        self.log(LogLevel::Info, msg)
    }

    /// Shorthand for `log(LogLevel::Warning, msg)`
    pub fn warning(&self, msg: &str) -> Result<(), SinkError> {
        self.log(LogLevel::Warning, msg)
    }

    /// Shorthand for `log(LogLevel::Error, msg)`
    pub fn error(&self, msg: &str) -> Result<(), SinkError> {
        self.log(LogLevel::Error, msg)
    }
}

impl Default for LegacySyslogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LegacySyslogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacySyslogger")
            .field("settings", &*self.read_settings())
            .finish_non_exhaustive()
    }
}

fn level_from_value(value: Option<&toml::Value>) -> Result<LogLevel, ConfigError> {
    match value {
        Some(toml::Value::Integer(i)) => LogLevel::try_from(*i),
        Some(toml::Value::String(s)) => s.parse(),
        Some(other) => Err(ConfigError::InvalidLevel(other.to_string())),
        None => Err(ConfigError::InvalidLevel("None".to_string())),
    }
}

fn bool_from_value(
    property: &'static str,
    value: Option<&toml::Value>,
) -> Result<bool, ConfigError> {
    match value {
        Some(toml::Value::Boolean(b)) => Ok(*b),
        Some(other) => Err(ConfigError::NotBoolean {
            property,
            value: other.to_string(),
        }),
        None => Err(ConfigError::NotBoolean {
            property,
            value: "None".to_string(),
        }),
    }
}
