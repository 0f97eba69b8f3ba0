//! Log levels and their prefixes
//!
//! Levels are ranked by severity with the most severe level having the lowest
//! value. A message passes a filter floor when its value is less than or equal
//! to the floor's value.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ConfigError;

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Execution cannot, or should not, continue
    Error = 0,
    /// Something unexpected happened but execution continues
    Warning = 1,
    /// Informational output such as progress messages
    Info = 2,
    /// Only of interest when debugging
    #[default]
    Debug = 3,
}

impl LogLevel {
    /// All levels, most severe first
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Numeric rank (0 = most severe)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Single character prefix put in front of every emitted message
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Error => "E",
            LogLevel::Warning => "W",
            LogLevel::Info => "I",
            LogLevel::Debug => "D",
        }
    }

    /// Lowercase name, used in config files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Whether a message at this level gets through the given floor
    pub fn passes(self, floor: LogLevel) -> bool {
        self.value() <= floor.value()
    }

    /// Prefix a message the way every sink receives it: `"W: message"`
    pub fn format_message(self, msg: &str) -> String {
        format!("{}: {}", self.prefix(), msg)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, ConfigError> {
        match value {
            0 => Ok(LogLevel::Error),
            1 => Ok(LogLevel::Warning),
            2 => Ok(LogLevel::Info),
            3 => Ok(LogLevel::Debug),
            other => Err(ConfigError::InvalidLevel(other.to_string())),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "err" | "0" => Ok(LogLevel::Error),
            "warning" | "warn" | "1" => Ok(LogLevel::Warning),
            "info" | "2" => Ok(LogLevel::Info),
            "debug" | "3" => Ok(LogLevel::Debug),
            _ => Err(ConfigError::InvalidLevel(s.to_string())),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl<'de> Visitor<'de> for LevelVisitor {
            type Value = LogLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a level name (error, warning, info, debug) or an integer 0-3")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<LogLevel, E> {
                LogLevel::try_from(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LogLevel, E> {
                i64::try_from(v)
                    .map_err(|_| E::custom(ConfigError::InvalidLevel(v.to_string())))
                    .and_then(|v| LogLevel::try_from(v).map_err(E::custom))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LogLevel, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}
