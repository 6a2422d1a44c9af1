//! Tracing initialization.
//!
//! Log output goes to stdout through the `tracing_subscriber` fmt layer. The filter is taken from
//! `RUST_LOG` when set; otherwise it is `info`, or debug-level for this crate and the HTTP layer
//! when `debug` is enabled in the configuration.

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `debug` is on and `RUST_LOG` is unset
const DEBUG_FILTER: &str = "plantid=debug,tower_http=debug,info";

/// Initialize tracing with a console subscriber
pub fn init_telemetry(verbose: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!(verbose, "Telemetry initialized");
    Ok(())
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose { EnvFilter::new(DEBUG_FILTER) } else { EnvFilter::new("info") }
}
