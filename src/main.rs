//! vibe-monitor — rolling vibration chart for the climate/vibration sensor board.
//!
//! Run with:  `RUST_LOG=info vibe-monitor`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("vibe-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    vibe_dashboard::run().map_err(Into::into)
}
