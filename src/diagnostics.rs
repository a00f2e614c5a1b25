//! Shared helpers for user-facing messages and log setup.

use tracing_subscriber::EnvFilter;

const ERROR_PREFIX: &str = "unnest-spec";

/// Prefix an error message so it can be traced back to this tool when it
/// surfaces inside a larger pipeline.
pub fn error_message(msg: impl AsRef<str>) -> String {
    format!("{}: {}", ERROR_PREFIX, msg.as_ref())
}

pub fn warn(msg: impl AsRef<str>) {
    tracing::warn!("{}", msg.as_ref());
}

/// Install the stderr subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second install (e.g. from tests) is harmless; keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
