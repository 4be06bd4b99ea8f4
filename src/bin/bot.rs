//! Autoplay client.
//!
//! Connects to a running server as a player and plays with the heuristic
//! planner, reconnecting after every game over.

use anyhow::Result;

use stackbot::adapter::bot::{pacing_for, run_bot};
use stackbot::adapter::BotConfig;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BotConfig::from_env();
    log::info!(
        "playing against {} (plan {}, humanize {})",
        config.addr,
        config.plan_target.as_str(),
        config.humanize
    );

    let pacing = pacing_for(&config);
    let report = run_bot(config, pacing).await?;
    log::info!("played {} games, {} pieces", report.games, report.pieces);
    Ok(())
}
