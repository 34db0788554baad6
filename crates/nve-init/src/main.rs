//! NVE boot step
//!
//! Runs once during boot, after block devices are up: reads the factory
//! MAC addresses out of the NVE partition and publishes them for the Wi-Fi
//! and Bluetooth stacks. A missing or unreadable identifier is never a
//! fatal boot condition; the step logs what happened and exits cleanly so
//! the rest of the boot sequence continues.

use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use nve_config::NveConfig;
use nve_reader::{FsSink, NveLoader};

fn main() -> Result<()> {
    setup_logging();

    let start = Instant::now();
    info!("NVE loader starting...");

    let config = match NveConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            warn!("Invalid configuration, falling back to defaults: {}", e);
            NveConfig::default()
        }
    };

    let mut sink = FsSink::new(config.ready.flag.clone());
    let loader = NveLoader::new(config);

    match loader.run(&mut sink) {
        Ok(summary) => info!(
            "Published {} of {} MAC entries in {:?}",
            summary.published,
            summary.attempted,
            start.elapsed()
        ),
        Err(e) => warn!("Unable to load NVE identifiers: {}", e),
    }

    Ok(())
}

/// Setup logging to console
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(false))
        .init();
}
