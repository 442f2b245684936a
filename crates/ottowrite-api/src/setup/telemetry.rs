//! Tracing subscriber initialization.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. JSON output in production, human
/// readable output everywhere else. `RUST_LOG` overrides the default filter.
pub fn init_tracing(is_production: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if is_production {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;
    }

    Ok(())
}
