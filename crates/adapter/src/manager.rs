//! Session manager - registry of running sessions
//!
//! The manager owns every session task. `deregister` and `shutdown` signal
//! the task to stop and then join it, so when they return the session's
//! gravity timer is gone and nothing more will be emitted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::core::{BagSource, GameEngine, PieceSource, Snapshot};
use crate::session::{SessionHandle, SessionId, SessionSummary, SessionTask};

const COMMAND_BUFFER: usize = 64;

struct Entry {
    stop: oneshot::Sender<()>,
    task: JoinHandle<SessionSummary>,
    spectators: broadcast::Sender<Snapshot>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    sessions: HashMap<SessionId, Entry>,
}

#[derive(Clone)]
pub struct SessionManager {
    gravity: Duration,
    spectator_buffer: usize,
    seed: u32,
    registry: Arc<RwLock<Registry>>,
}

impl SessionManager {
    pub fn new(gravity: Duration, spectator_buffer: usize, seed: Option<u32>) -> Self {
        Self {
            gravity,
            spectator_buffer: spectator_buffer.max(1),
            seed: seed.unwrap_or_else(time_seed),
            registry: Arc::new(RwLock::new(Registry::default())),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.gravity, config.spectator_buffer, config.seed)
    }

    /// Start a session with a 7-bag generator seeded from the manager's seed.
    pub async fn register(&self) -> SessionHandle {
        let seed = self.seed;
        self.register_with(move |id| BagSource::new(seed.wrapping_add(id.as_u64() as u32)))
            .await
    }

    /// Start a session whose piece source is built from its id.
    pub async fn register_with<S, F>(&self, make_source: F) -> SessionHandle
    where
        S: PieceSource + Send + 'static,
        F: FnOnce(SessionId) -> S,
    {
        let mut registry = self.registry.write().await;
        registry.next_id += 1;
        let id = SessionId::new(registry.next_id);

        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (player_tx, player_rx) = mpsc::unbounded_channel();
        let (spectators, _) = broadcast::channel(self.spectator_buffer);
        let (stop_tx, stop_rx) = oneshot::channel();

        let task = SessionTask {
            id,
            engine: GameEngine::new(make_source(id)),
            commands: cmd_rx,
            player: player_tx,
            spectators: spectators.clone(),
            stop: stop_rx,
            gravity: self.gravity,
        };

        registry.sessions.insert(
            id,
            Entry {
                stop: stop_tx,
                task: tokio::spawn(task.run()),
                spectators,
            },
        );

        SessionHandle {
            id,
            commands: cmd_tx,
            snapshots: player_rx,
        }
    }

    /// Stop a session and wait for its task. `None` if the id is unknown.
    pub async fn deregister(&self, id: SessionId) -> Option<SessionSummary> {
        let entry = self.registry.write().await.sessions.remove(&id)?;
        stop_and_join(id, entry).await
    }

    /// Ids of sessions whose game is still running, ascending.
    pub async fn alive(&self) -> Vec<SessionId> {
        let registry = self.registry.read().await;
        let mut ids: Vec<SessionId> = registry
            .sessions
            .iter()
            .filter(|(_, entry)| !entry.task.is_finished())
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    /// Subscribe to a running session's snapshots.
    pub async fn watch(&self, id: SessionId) -> Option<broadcast::Receiver<Snapshot>> {
        let registry = self.registry.read().await;
        let entry = registry.sessions.get(&id)?;
        if entry.task.is_finished() {
            return None;
        }
        Some(entry.spectators.subscribe())
    }

    /// Stop and join every session.
    pub async fn shutdown(&self) -> Vec<SessionSummary> {
        let entries: Vec<(SessionId, Entry)> = self.registry.write().await.sessions.drain().collect();
        log::info!("shutting down {} sessions", entries.len());

        let mut summaries = Vec::with_capacity(entries.len());
        for (id, entry) in entries {
            summaries.extend(stop_and_join(id, entry).await);
        }
        summaries
    }
}

async fn stop_and_join(id: SessionId, entry: Entry) -> Option<SessionSummary> {
    // Already gone after game over; the send then fails harmlessly.
    let _ = entry.stop.send(());
    match entry.task.await {
        Ok(summary) => Some(summary),
        Err(e) => {
            log::error!("session {} task failed: {}", id, e);
            None
        }
    }
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SequenceSource;
    use crate::session::SessionEnd;
    use crate::types::{Command, PieceKind};

    fn manager() -> SessionManager {
        SessionManager::new(Duration::from_secs(60), 16, Some(1))
    }

    #[tokio::test]
    async fn ids_are_unique_and_listed() {
        let manager = manager();
        let a = manager.register().await;
        let b = manager.register().await;
        assert_ne!(a.id, b.id);
        assert_eq!(manager.alive().await, vec![a.id, b.id]);

        manager.shutdown().await;
        assert!(manager.alive().await.is_empty());
    }

    #[tokio::test]
    async fn deregister_stops_and_joins() {
        let manager = manager();
        let mut handle = manager.register().await;
        assert!(handle.snapshots.recv().await.unwrap().is_spawn());

        let summary = manager.deregister(handle.id).await.unwrap();
        assert_eq!(summary.end, SessionEnd::Stopped);
        assert!(handle.commands.send(Command::Left).await.is_err());
        assert!(manager.deregister(handle.id).await.is_none());
        assert!(manager.alive().await.is_empty());
    }

    #[tokio::test]
    async fn spectators_see_player_moves() {
        let manager = manager();
        let mut handle = manager
            .register_with(|_| SequenceSource::repeat(PieceKind::T))
            .await;
        handle.snapshots.recv().await.unwrap();

        let mut spectator = manager.watch(handle.id).await.unwrap();
        handle.commands.send(Command::Right).await.unwrap();

        let seen = spectator.recv().await.unwrap();
        let played = handle.snapshots.recv().await.unwrap();
        assert_eq!(seen, played);
        assert_eq!(seen.live.unwrap().x, 5);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn finished_sessions_are_not_alive() {
        let manager = SessionManager::new(Duration::from_millis(1), 16, None);
        let mut handle = manager
            .register_with(|_| SequenceSource::repeat(PieceKind::I))
            .await;
        while handle.snapshots.recv().await.is_some() {}

        // The player channel closes when the task returns.
        tokio::task::yield_now().await;
        let id = handle.id;
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while manager.alive().await.contains(&id) {
            assert!(tokio::time::Instant::now() < deadline);
            tokio::task::yield_now().await;
        }
        assert!(manager.watch(id).await.is_none());

        let summary = manager.deregister(id).await.unwrap();
        assert_eq!(summary.end, SessionEnd::GameOver);
    }

    #[tokio::test]
    async fn watch_unknown_session() {
        assert!(manager().watch(SessionId::new(99)).await.is_none());
    }
}
