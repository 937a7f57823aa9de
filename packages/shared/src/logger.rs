//! Logger setup built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `name` (a binary or crate name, `-`
/// normalized to `_`) and `tower_http` log at `default_level`.
///
/// Calling this more than once is harmless: later calls are ignored.
pub fn setup_logger(name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={level},tower_http={level}",
            name.replace('-', "_"),
            level = default_level
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
