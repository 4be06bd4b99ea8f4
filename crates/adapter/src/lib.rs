//! Adapter crate - sessions and the TCP line protocol
//!
//! Everything async lives here. Each game runs as its own tokio task
//! ([`session`]) registered with a [`SessionManager`]. The [`server`] exposes
//! sessions over TCP and the [`bot`] plays them from the other end.
//!
//! # Protocol Overview
//!
//! One message per line. The first line picks the role:
//!
//! - `play`: the server starts a session. The client sends commands
//!   (`left`, `right`, `down`, `drop`, `cw`, `ccw`; anything else is ignored)
//!   and receives every snapshot as a JSON line. The connection closes after
//!   `{"event":"gameover"}`.
//! - `watch`: `?` is answered with `{"alive":[ids]}`; a numeric id
//!   subscribes to that session's snapshots, replacing any earlier
//!   subscription.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: play
//! Server -> Client: {"live":[3,0,4,1,18],"next":5,"board":[[0,0,...],...]}
//! Client -> Server: left
//! Server -> Client: {"live":[3,0,3,1,18],"next":5}
//! Client -> Server: drop
//! Server -> Client: {"live":[3,0,3,19,0],"next":5,"board":[...],"event":"lock"}
//! Server -> Client: {"live":[5,0,4,2,17],"next":1,"board":[...]}
//! ```
//!
//! # Environment Variables
//!
//! See [`config`]: `STACKBOT_HOST`, `STACKBOT_PORT`, `STACKBOT_GRAVITY_MS`,
//! `STACKBOT_SPECTATOR_BUFFER`, `STACKBOT_SEED` and the `STACKBOT_BOT_*`
//! client settings.
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 10340
//! play
//! ```

pub mod bot;
pub mod config;
pub mod manager;
pub mod protocol;
pub mod server;
pub mod session;

pub use stackbot_core as core;
pub use stackbot_engine as engine;
pub use stackbot_types as types;

pub use bot::{play_game, run_bot, BotReport, GameOutcome};
pub use config::{BotConfig, ServerConfig};
pub use manager::SessionManager;
pub use server::run_server;
pub use session::{SessionEnd, SessionHandle, SessionId, SessionSummary};
