//! Session actor - one task owns one engine
//!
//! Commands, gravity ticks and the stop signal are serialized through a
//! single `select!` loop, so the engine needs no locking. After every step the
//! queued snapshots are forwarded to the player channel and the spectator
//! broadcast, in emission order.
//!
//! The stop branch is polled first. Once it fires the loop exits without
//! flushing, so nothing is emitted after teardown begins, and the gravity
//! interval is dropped together with the task.

use std::fmt;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::{GameEngine, PieceSource, Snapshot};
use crate::types::Command;

/// Opaque session token issued by the [`SessionManager`](crate::manager::SessionManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a session task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    GameOver,
    Stopped,
    /// Every command sender was dropped
    Abandoned,
}

/// Final counters of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub pieces: u32,
    pub lines: u32,
    pub end: SessionEnd,
}

/// Player side of a running session.
#[derive(Debug)]
pub struct SessionHandle {
    pub id: SessionId,
    pub commands: mpsc::Sender<Command>,
    pub snapshots: mpsc::UnboundedReceiver<Snapshot>,
}

pub(crate) struct SessionTask<S> {
    pub id: SessionId,
    pub engine: GameEngine<S>,
    pub commands: mpsc::Receiver<Command>,
    pub player: mpsc::UnboundedSender<Snapshot>,
    pub spectators: broadcast::Sender<Snapshot>,
    pub stop: oneshot::Receiver<()>,
    pub gravity: Duration,
}

impl<S: PieceSource> SessionTask<S> {
    pub async fn run(mut self) -> SessionSummary {
        let mut ticker = interval_at(Instant::now() + self.gravity, self.gravity);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("session {} started", self.id);

        let end = loop {
            self.flush();
            if self.engine.is_game_over() {
                break SessionEnd::GameOver;
            }

            tokio::select! {
                biased;

                _ = &mut self.stop => break SessionEnd::Stopped,
                command = self.commands.recv() => match command {
                    Some(command) => {
                        self.engine.apply(command);
                    }
                    None => break SessionEnd::Abandoned,
                },
                _ = ticker.tick() => {
                    self.engine.fall();
                }
            }
        };

        let summary = SessionSummary {
            id: self.id,
            pieces: self.engine.pieces_locked(),
            lines: self.engine.lines_cleared(),
            end,
        };
        log::info!(
            "session {} ended ({:?}): {} pieces, {} lines",
            summary.id,
            summary.end,
            summary.pieces,
            summary.lines
        );
        summary
    }

    fn flush(&mut self) {
        for snapshot in self.engine.drain_emissions() {
            // Spectators come and go; no receivers is not an error.
            let _ = self.spectators.send(snapshot.clone());
            let _ = self.player.send(snapshot);
        }
    }
}
