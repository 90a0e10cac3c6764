//! Logging setup.
//!
//! Installs a `tracing_subscriber::fmt` subscriber writing to stderr, so diagnostics
//! never interleave with a report sent to stdout. `RUST_LOG` overrides `--log-level`.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level `{}`", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
