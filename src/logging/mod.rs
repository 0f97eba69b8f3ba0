//! Leveled logging facade
//!
//! Provides [`LegacySyslogger`], which filters messages by level, prefixes them,
//! and writes them to standard error and the system logger, along with the
//! sink abstraction it dispatches through.

mod buffer;
mod error;
mod level;
mod logger;
mod sink;

pub use buffer::{CapturedEntry, MemorySink, DEFAULT_CAPACITY};
pub use error::{ConfigError, SinkError};
pub use level::LogLevel;
pub use logger::{LegacySyslogger, Settings};
pub use sink::{
    default_process_name, write_line, Sink, StderrSink, SyslogFacility, SyslogIdentity, SyslogSink,
};

#[cfg(unix)]
pub use sink::severity;
