use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines, e.g. `Access denied to IP address: 10.0.0.5`.
    Pretty,
    /// One JSON object per event with flattened fields.
    Json,
}

pub fn default_log_format() -> LogFormat {
    if io::stdout().is_terminal() {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

/// Initialize the global tracing subscriber.
///
/// - Uses RUST_LOG for filtering (defaults to "info" if not set)
/// - Writes to stdout, where access decisions are expected
/// - Does nothing if a global subscriber is already installed
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(io::stdout);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    if let Err(err) = result {
        tracing::debug!("logging already initialized: {err}");
    }
}
