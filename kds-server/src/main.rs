use std::sync::Arc;

use kds_server::{Config, KitchenCore, MemoryTransport, StaticBranchDirectory};
use shared::BranchKitchenConfig;

/// Branch ids served by this instance, `KITCHEN_BRANCHES=1,2,3`
fn enabled_branches() -> Vec<i64> {
    std::env::var("KITCHEN_BRANCHES")
        .ok()
        .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_else(|| vec![1])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, config, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    kds_server::utils::logger::init(&config.log_level, &config.work_dir);

    tracing::info!("Kitchen display server starting...");

    // 2. Branch directory (embedded deployment reads it from the environment)
    let branch_ids = enabled_branches();
    let branches = Arc::new(StaticBranchDirectory::new());
    for &branch_id in &branch_ids {
        branches.set(BranchKitchenConfig::enabled(branch_id));
    }

    // 3. Open storage and wire the core
    let core = KitchenCore::open(config, branches, Arc::new(MemoryTransport::new()))?;
    for &branch_id in &branch_ids {
        core.enable_kitchen(branch_id)?;
    }

    // 4. Background SLA sweep until shutdown
    let sweep = core.spawn_sla_sweep();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    sweep.abort();
    Ok(())
}
