//! Diagnostics for the command line tool
//!
//! The facade's own output and the tool's internal tracing share standard
//! error, so tracing stays at `warn` unless `RUST_LOG` or `--verbose` asks
//! for more.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "legacy_syslogger=debug"
    } else {
        "legacy_syslogger=warn"
    }
}

/// Install the global tracing subscriber writing to stderr
pub fn init_tracing(verbose: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "legacy_syslogger=warn");
        assert_eq!(default_filter(true), "legacy_syslogger=debug");
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(default_filter(false)).is_ok());
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }
}
