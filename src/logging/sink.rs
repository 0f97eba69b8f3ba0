//! Output destinations for the logging facade
//!
//! A sink receives a finished payload (already prefixed and, for the system
//! logger, already tagged) and delivers it in a single write. Sinks are
//! injected into [`LegacySyslogger`](super::LegacySyslogger) so tests can use
//! a [`MemorySink`](super::MemorySink) in place of the real destinations.

use std::io::Write;

use super::error::SinkError;
use super::level::LogLevel;

/// A destination that accepts one finished message per call
pub trait Sink: Send + Sync {
    /// Deliver a single payload
    fn emit(&self, level: LogLevel, payload: &str) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&self, level: LogLevel, payload: &str) -> Result<(), SinkError> {
        (**self).emit(level, payload)
    }
}

/// Writes each payload as one line on the process's standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StderrSink {
    fn emit(&self, _level: LogLevel, payload: &str) -> Result<(), SinkError> {
        let mut stderr = std::io::stderr().lock();
        write_line(&mut stderr, payload).map_err(SinkError::Stderr)
    }
}

/// Write `payload` plus a newline with a single `write_all`, then flush
pub fn write_line<W: Write>(writer: &mut W, payload: &str) -> std::io::Result<()> {
    let mut line = String::with_capacity(payload.len() + 1);
    line.push_str(payload);
    line.push('\n');

    writer.write_all(line.as_bytes())?;
    writer.flush()
}

/// Identity used when talking to the system logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogIdentity {
    /// Process name shown in each syslog entry
    pub process: String,
    /// Facility name (`user`, `daemon`, `local0`...)
    pub facility: SyslogFacility,
}

impl Default for SyslogIdentity {
    fn default() -> Self {
        Self {
            process: default_process_name(),
            facility: SyslogFacility::User,
        }
    }
}

/// File name of the running executable, or the crate name if unavailable
pub fn default_process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Syslog facilities that can be selected in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyslogFacility {
    Kern,
    #[default]
    User,
    Mail,
    Daemon,
    Auth,
    Syslog,
    Lpr,
    News,
    Uucp,
    Cron,
    Authpriv,
    Ftp,
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
}

#[cfg(unix)]
mod unix {
    use std::sync::{Mutex, PoisonError};

    use syslog::{Facility, Formatter3164, Logger, LoggerBackend, Severity};

    use super::{LogLevel, Sink, SinkError, SyslogFacility, SyslogIdentity};

    impl From<SyslogFacility> for Facility {
        fn from(facility: SyslogFacility) -> Self {
            match facility {
                SyslogFacility::Kern => Facility::LOG_KERN,
                SyslogFacility::User => Facility::LOG_USER,
                SyslogFacility::Mail => Facility::LOG_MAIL,
                SyslogFacility::Daemon => Facility::LOG_DAEMON,
                SyslogFacility::Auth => Facility::LOG_AUTH,
                SyslogFacility::Syslog => Facility::LOG_SYSLOG,
                SyslogFacility::Lpr => Facility::LOG_LPR,
                SyslogFacility::News => Facility::LOG_NEWS,
                SyslogFacility::Uucp => Facility::LOG_UUCP,
                SyslogFacility::Cron => Facility::LOG_CRON,
                SyslogFacility::Authpriv => Facility::LOG_AUTHPRIV,
                SyslogFacility::Ftp => Facility::LOG_FTP,
                SyslogFacility::Local0 => Facility::LOG_LOCAL0,
                SyslogFacility::Local1 => Facility::LOG_LOCAL1,
                SyslogFacility::Local2 => Facility::LOG_LOCAL2,
                SyslogFacility::Local3 => Facility::LOG_LOCAL3,
                SyslogFacility::Local4 => Facility::LOG_LOCAL4,
                SyslogFacility::Local5 => Facility::LOG_LOCAL5,
                SyslogFacility::Local6 => Facility::LOG_LOCAL6,
                SyslogFacility::Local7 => Facility::LOG_LOCAL7,
            }
        }
    }

    /// Syslog severity used for each level
    pub fn severity(level: LogLevel) -> Severity {
        match level {
            LogLevel::Error => Severity::LOG_ERR,
            LogLevel::Warning => Severity::LOG_WARNING,
            LogLevel::Info => Severity::LOG_INFO,
            LogLevel::Debug => Severity::LOG_DEBUG,
        }
    }

    type Connection = Logger<LoggerBackend, Formatter3164>;

    /// Sends payloads to the local syslog daemon
    ///
    /// The connection is opened on the first write. If opening fails the error
    /// is returned and the next write tries again.
    pub struct SyslogSink {
        identity: SyslogIdentity,
        connection: Mutex<Option<Connection>>,
    }

    impl SyslogSink {
        pub fn new(identity: SyslogIdentity) -> Self {
            Self {
                identity,
                connection: Mutex::new(None),
            }
        }

        pub fn identity(&self) -> &SyslogIdentity {
            &self.identity
        }

        fn connect(&self) -> Result<Connection, SinkError> {
            let formatter = Formatter3164 {
                facility: self.identity.facility.into(),
                hostname: None,
                process: self.identity.process.clone(),
                pid: std::process::id(),
            };

            let logger = syslog::unix(formatter)
                .map_err(|e| SinkError::SyslogUnavailable(e.to_string()))?;
            tracing::debug!(
                process = %self.identity.process,
                "Connected to system logger"
            );
            Ok(logger)
        }
    }

    impl Default for SyslogSink {
        fn default() -> Self {
            Self::new(SyslogIdentity::default())
        }
    }

    impl Sink for SyslogSink {
        fn emit(&self, level: LogLevel, payload: &str) -> Result<(), SinkError> {
            let mut guard = self
                .connection
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if guard.is_none() {
                *guard = Some(self.connect()?);
            }

            let Some(logger) = guard.as_mut() else {
                return Err(SinkError::SyslogUnavailable(
                    "connection was not established".to_string(),
                ));
            };

            let result = match severity(level) {
                Severity::LOG_ERR => logger.err(payload),
                Severity::LOG_WARNING => logger.warning(payload),
                Severity::LOG_INFO => logger.info(payload),
                _ => logger.debug(payload),
            };

            result.map_err(|e| {
                // Drop the connection so the next write reconnects
                *guard = None;
                tracing::warn!("System logger write failed: {}", e);
                SinkError::Syslog(Box::new(e))
            })
        }
    }

}

#[cfg(unix)]
pub use unix::{severity, SyslogSink};

/// Placeholder on platforms without a syslog daemon; every write fails
#[cfg(not(unix))]
#[derive(Debug, Default)]
pub struct SyslogSink {
    identity: SyslogIdentity,
}

#[cfg(not(unix))]
impl SyslogSink {
    pub fn new(identity: SyslogIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &SyslogIdentity {
        &self.identity
    }
}

#[cfg(not(unix))]
impl Sink for SyslogSink {
    fn emit(&self, _level: LogLevel, _payload: &str) -> Result<(), SinkError> {
        Err(SinkError::SyslogUnavailable(
            "no system logger on this platform".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoWrite;

    impl Write for NoWrite {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, "I: x").unwrap();
        assert_eq!(out, b"I: x\n");

        write_line(&mut out, "E: y").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "I: x\nE: y\n");
    }

    #[test]
    fn test_write_line_reports_failure() {
        let err = write_line(&mut NoWrite, "W: lost").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_stderr_sink_writes() {
        // Goes to the test harness's captured stderr
        StderrSink::new()
            .emit(LogLevel::Info, "I: stderr sink test")
            .unwrap();
    }

    #[test]
    fn test_default_identity() {
        let identity = SyslogIdentity::default();
        assert_eq!(identity.facility, SyslogFacility::User);
        assert!(!identity.process.is_empty());
    }

    #[test]
    fn test_facility_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            facility: SyslogFacility,
        }

        let parsed: Wrapper = toml::from_str("facility = \"local3\"").unwrap();
        assert_eq!(parsed.facility, SyslogFacility::Local3);
        let parsed: Wrapper = toml::from_str("facility = \"daemon\"").unwrap();
        assert_eq!(parsed.facility, SyslogFacility::Daemon);
        assert!(toml::from_str::<Wrapper>("facility = \"local9\"").is_err());
    }

    #[test]
    fn test_syslog_sink_keeps_identity() {
        let identity = SyslogIdentity {
            process: "svc".to_string(),
            facility: SyslogFacility::Daemon,
        };
        let sink = SyslogSink::new(identity.clone());
        assert_eq!(sink.identity(), &identity);
    }
}
