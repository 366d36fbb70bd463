//! Logging setup.
//!
//! The terminal is owned by the browser screen, so regular logging goes to
//! a file only. Console logging writes to stderr.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Crates whose debug output drowns the client's own.
const NOISY_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=info", "rustls=warn"];

/// Parse a configured level, falling back to `INFO`.
fn parse_level(level: &str) -> Level {
    match level.trim() {
        l if l.eq_ignore_ascii_case("warning") => Level::WARN,
        l => l.parse().unwrap_or(Level::INFO),
    }
}

fn build_filter(level: &str) -> EnvFilter {
    NOISY_TARGETS.iter().fold(
        EnvFilter::from_default_env().add_directive(parse_level(level).into()),
        |filter, target| match target.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

/// Open the log file for appending, creating its directory.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(File::options().create(true).append(true).open(path)?)
}

/// Install file logging for the session.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = Arc::new(open_log_file(Path::new(&config.file))?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .init();

    Ok(())
}

/// Install stderr logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(build_filter(level))
        .init();
}
