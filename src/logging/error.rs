//! Error types for the logging facade

use thiserror::Error;

/// An invalid value was assigned to a logger setting
///
/// Returned synchronously by the validated setters. The setting keeps its
/// previous value whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Value is not one of the four defined levels
    #[error("{0} not an acceptable log level")]
    InvalidLevel(String),

    /// Flag property assigned something other than a boolean
    #[error("{property} must be true or false, got {value}")]
    NotBoolean {
        property: &'static str,
        value: String,
    },

    /// Tag assigned something other than a string or nothing
    #[error("{property} must be a string, got {value}")]
    NotString {
        property: &'static str,
        value: String,
    },

    /// No setting with this name exists
    #[error("unknown logger property '{0}'")]
    UnknownProperty(String),
}

/// A sink failed to deliver a message
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write to standard error")]
    Stderr(#[source] std::io::Error),

    #[error("system logger unavailable: {0}")]
    SyslogUnavailable(String),

    #[error("failed to write to system logger")]
    Syslog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_level_cites_value() {
        let err = ConfigError::InvalidLevel("7".to_string());
        assert_eq!(err.to_string(), "7 not an acceptable log level");
    }

    #[test]
    fn test_not_boolean_names_property() {
        let err = ConfigError::NotBoolean {
            property: "log_to_stdout",
            value: "\"yes\"".to_string(),
        };
        assert!(err.to_string().starts_with("log_to_stdout must be true or false"));
    }

    #[test]
    fn test_stderr_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SinkError::Stderr(io);
        assert!(err.source().is_some());
    }
}
