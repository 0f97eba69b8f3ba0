//! legacy-syslogger - leveled logging to stderr and syslog
//!
//! This library provides a small logging facade for code moving off an older
//! logging helper, together with a couple of filesystem utilities.

pub mod config;
pub mod diagnostics;
pub mod fs;
pub mod logging;
