//! Autoplay client
//!
//! Connects as a player and feeds every snapshot to the [`Autopilot`]. A plan
//! is executed one command at a time on the pacing policy's clock; a newer
//! spawn snapshot replaces whatever is left of the current plan. On game over
//! the connection is closed and, after a pause, a new game is started.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{sleep, sleep_until, Instant};

use crate::config::BotConfig;
use crate::core::Snapshot;
use crate::engine::{Autopilot, Decision, HumanPacing, NoPacing, Pacing};
use crate::protocol::Role;
use crate::types::Command;

/// How one connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameOutcome {
    pub pieces: u32,
    /// `false` when the server closed the connection first
    pub game_over: bool,
    /// Plans replaced before they finished
    pub abandoned_plans: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BotReport {
    pub games: u32,
    pub pieces: u32,
}

/// Pacing policy selected by the configuration.
pub fn pacing_for(config: &BotConfig) -> Box<dyn Pacing> {
    if config.humanize {
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or(1)
        });
        Box::new(HumanPacing::new(seed))
    } else {
        Box::new(NoPacing)
    }
}

/// Play games until the configured limit (forever without one).
///
/// A failed connect ends the loop with an error; a game that breaks after
/// connecting is logged and counted.
pub async fn run_bot(config: BotConfig, mut pacing: impl Pacing) -> anyhow::Result<BotReport> {
    let autopilot = Autopilot::new(config.plan_target);
    let mut report = BotReport::default();

    loop {
        if config.games.is_some_and(|limit| report.games >= limit) {
            break;
        }
        if report.games > 0 {
            sleep(config.reconnect_pause).await;
        }

        let stream = TcpStream::connect(&config.addr)
            .await
            .with_context(|| format!("connect to {}", config.addr))?;
        log::info!(
            "game {} connected to {}, planning for the {} piece",
            report.games + 1,
            config.addr,
            autopilot.plan_target().as_str()
        );

        report.games += 1;
        match play_game(stream, &autopilot, &mut pacing).await {
            Ok(outcome) => {
                report.pieces += outcome.pieces;
                log::info!(
                    "game {} finished: {} pieces, game over: {}, {} plans abandoned",
                    report.games,
                    outcome.pieces,
                    outcome.game_over,
                    outcome.abandoned_plans
                );
            }
            Err(e) => log::warn!("game {} failed: {:#}", report.games, e),
        }
    }

    Ok(report)
}

/// Play one game on an open connection.
pub async fn play_game(
    stream: TcpStream,
    autopilot: &Autopilot,
    pacing: &mut impl Pacing,
) -> anyhow::Result<GameOutcome> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    writer.write_all(Role::Player.as_str().as_bytes()).await?;
    writer.write_all(b"\n").await?;

    let mut outcome = GameOutcome::default();
    let mut pending: VecDeque<Command> = VecDeque::new();
    let mut next_at = Instant::now();

    loop {
        tokio::select! {
            biased;

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let snapshot: Snapshot = serde_json::from_str(&line)
                    .with_context(|| format!("bad snapshot line {:?}", line))?;
                if snapshot.is_lock() {
                    outcome.pieces += 1;
                }

                match autopilot.decide(&snapshot) {
                    Decision::Stop => {
                        outcome.game_over = true;
                        break;
                    }
                    Decision::Ignore => {}
                    Decision::Execute(plan) => {
                        if !pending.is_empty() {
                            outcome.abandoned_plans += 1;
                            log::debug!("abandoning {} queued commands", pending.len());
                        }
                        pending = plan.into_iter().collect();
                        next_at = Instant::now() + pacing.think_delay();
                    }
                }
            }
            _ = sleep_until(next_at), if !pending.is_empty() => {
                if let Some(command) = pending.pop_front() {
                    if pacing.keep_action() {
                        writer.write_all(command.as_str().as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                    } else {
                        log::debug!("skipped {}", command.as_str());
                    }
                }
                next_at = Instant::now() + pacing.action_delay();
            }
        }
    }

    let _ = writer.shutdown().await;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlanTarget;
    use tokio::net::TcpListener;

    #[test]
    fn pacing_follows_humanize_flag() {
        let mut config = BotConfig {
            humanize: false,
            ..BotConfig::default()
        };
        let mut pacing = pacing_for(&config);
        assert_eq!(pacing.think_delay(), std::time::Duration::ZERO);

        config.humanize = true;
        config.seed = Some(9);
        let mut pacing = pacing_for(&config);
        assert!(pacing.think_delay() >= std::time::Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn stops_on_game_over_line() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = socket.into_split();
            let mut lines = BufReader::new(reader).lines();
            assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("play"));
            writer.write_all(b"{\"event\":\"gameover\"}\n").await.unwrap();
            // Client closes its side after game over
            assert_eq!(lines.next_line().await.unwrap(), None);
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let outcome = play_game(stream, &Autopilot::new(PlanTarget::Next), &mut NoPacing)
            .await
            .unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.pieces, 0);
        server.await.unwrap();
    }
}
