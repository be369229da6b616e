//! Structured logging setup.
//!
//! Uses `tracing-subscriber` with an `EnvFilter`: set `RUST_LOG` to control
//! verbosity (e.g. `RUST_LOG=drctl=debug,sqlx=warn`). Defaults to `info`
//! when `RUST_LOG` is not set.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// Errors if a subscriber is already installed, so call it once from main.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
