//! Log output for the command line.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber writing to stderr, filtered by `filter`
/// (same syntax as `RUST_LOG`). An unparsable filter falls back to `warn`.
pub fn init(filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}
