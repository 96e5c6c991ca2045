//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::adapters::toml_config::LogFormat;

/// Build the event filter: `RUST_LOG` wins, else the configured level
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// Logs go to stderr so they interleave sanely with ffmpeg's own output.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = build_filter(level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_ok() {
        tracing::debug!("Logging initialized at {} ({:?})", level, format);
    }
}
