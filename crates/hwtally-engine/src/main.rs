//! hwtally binary
//!
//! Tallies a JSON inventory of host facts for every configured product and
//! prints the completed product totals as JSON.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hwtally_common::HostFacts;
use hwtally_engine::{TallyConfig, TallyRunner, ENGINE_VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting hwtally v{}", ENGINE_VERSION);

    // Load configuration
    let mut config = TallyConfig::load()?;
    if let Some(path) = std::env::args().nth(1) {
        config.input_path = Some(path);
    }
    info!("Loaded configuration: {:?}", config);

    let Some(input_path) = config.input_path.as_deref() else {
        bail!("no inventory given: pass a hosts JSON file or set HWTALLY_INPUT");
    };

    let raw = tokio::fs::read_to_string(input_path)
        .await
        .with_context(|| format!("reading inventory {}", input_path))?;
    let hosts: Vec<HostFacts> =
        serde_json::from_str(&raw).with_context(|| format!("parsing inventory {}", input_path))?;
    info!(hosts = hosts.len(), "Loaded inventory");

    let runner = TallyRunner::with_defaults();
    let tally = runner
        .tally_account_sharded(&config.products, Arc::from(hosts), config.shard_size)
        .await;

    println!("{}", serde_json::to_string_pretty(&tally.completed)?);

    for (product_id, err) in &tally.failed {
        error!(product_id = %product_id, error = %err, "Product tally failed, totals withheld");
    }
    if !tally.is_complete() {
        bail!("{} product tally(s) failed", tally.failed.len());
    }

    Ok(())
}
