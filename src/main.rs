use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use legacy_syslogger::config::LoggerConfig;
use legacy_syslogger::diagnostics;
use legacy_syslogger::fs;
use legacy_syslogger::logging::{LegacySyslogger, LogLevel};

#[derive(Parser)]
#[command(name = "legacy-syslogger")]
#[command(about = "Leveled logging to stderr and syslog, plus file helpers", long_about = None)]
struct Cli {
    /// Config file (default: ~/.tiger/syslogger.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Show the tool's own debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a message
    Log {
        /// Level of the message (error, warning, info, debug or 0-3)
        #[arg(short, long, default_value = "info")]
        level: LogLevel,

        /// Minimum level to emit, overriding the config file
        #[arg(short, long)]
        min_level: Option<LogLevel>,

        /// Tag for syslog entries, overriding the config file
        #[arg(short, long)]
        tag: Option<String>,

        /// Do not write to standard error
        #[arg(long)]
        no_stderr: bool,

        /// Do not write to the system logger
        #[arg(long)]
        no_syslog: bool,

        /// Message words, joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print the age of a file in seconds
    Age { path: String },
    /// Create a file if it does not exist
    Touch {
        /// Create missing parent directories
        #[arg(short = 'p', long)]
        create_dirs: bool,

        path: String,
    },
    /// Print the effective configuration
    Config,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn load_config(path: Option<&str>) -> Result<LoggerConfig> {
    match path {
        Some(p) => LoggerConfig::load_from(&expand(p)),
        None => LoggerConfig::load(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Log {
            level,
            min_level,
            tag,
            no_stderr,
            no_syslog,
            message,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let logger = LegacySyslogger::from_config(&config);

            if let Some(min_level) = min_level {
                logger.set_minimum_level(min_level);
            }
            if tag.is_some() {
                logger.set_syslog_tag(tag);
            }
            if no_stderr {
                logger.set_log_to_stdout(false);
            }
            if no_syslog {
                logger.set_log_to_syslog(false);
            }

            tracing::debug!(?logger, "Logging at {}", level);
            logger
                .log(level, &message.join(" "))
                .context("Failed to deliver log message")?;
        }
        Commands::Age { path } => {
            let age = fs::file_age(expand(&path))?;
            println!("{}", age.as_secs());
        }
        Commands::Touch { create_dirs, path } => {
            fs::touch(expand(&path), create_dirs)?;
        }
        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
