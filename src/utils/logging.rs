use std::sync::LazyLock;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered to this crate. Without an explicit
/// level the filter falls back to RUST_LOG, then to warnings only.
pub fn enable_logging(log_level: Option<LevelFilter>) {
    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace("-", "_"),
        )))
        .with_writer(std::io::stderr)
        .init();
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
