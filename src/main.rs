//! Game server (default binary).
//!
//! Serves sessions over the TCP line protocol until Ctrl-C, then stops and
//! joins every running session.

use anyhow::Result;

use stackbot::adapter::{run_server, ServerConfig, SessionManager};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    let manager = SessionManager::from_config(&config);
    log::info!(
        "gravity {:?}, spectator buffer {}",
        config.gravity,
        config.spectator_buffer
    );

    let result = tokio::select! {
        result = run_server(config, manager.clone(), None) => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("interrupted");
            Ok(())
        }
    };

    for summary in manager.shutdown().await {
        log::info!(
            "session {}: {} pieces, {} lines",
            summary.id,
            summary.pieces,
            summary.lines
        );
    }
    result
}
