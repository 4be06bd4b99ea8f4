//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block game and nothing else.
//! It has **no dependencies** on timers, networking, or I/O:
//!
//! - **Deterministic**: the same piece source produces the same game
//! - **Synchronous**: every operation runs to completion and queues its snapshots
//! - **Portable**: the session actor, the headless self-play loop and the
//!   benchmarks all drive the same engine
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision checks, locking and line clearing
//! - [`pieces`]: the piece catalog, validity predicate and kick rule
//! - [`game_state`]: the engine state machine ([`GameEngine`])
//! - [`snapshot`]: what the engine emits, with its JSON wire shape
//! - [`rng`]: piece sources (7-bag, fixed sequences)
//!
//! # Game Rules
//!
//! - Pieces spawn at rotation 0, anchor column 4, on the highest valid row
//! - Rotations are tried in place first, then with a small fixed kick list
//! - A piece that cannot fall locks immediately (no lock delay)
//! - Full rows are removed after every lock
//! - If the next piece has nowhere to spawn the game is over
//!
//! # Example
//!
//! ```
//! use stackbot_core::{GameEngine, SequenceSource};
//! use stackbot_core::types::{Command, PieceKind};
//!
//! let mut engine = GameEngine::new(SequenceSource::repeat(PieceKind::O));
//! engine.apply(Command::Left);
//! engine.apply(Command::Drop);
//!
//! assert_eq!(engine.pieces_locked(), 1);
//! // spawn, move, lock, spawn
//! assert_eq!(engine.drain_emissions().count(), 4);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use stackbot_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardGrid};
pub use game_state::{GameEngine, LivePiece, Phase};
pub use pieces::{get_shape, is_valid, rotation_count, try_rotate};
pub use rng::{BagSource, PieceSource, SequenceSource, SimpleRng};
pub use snapshot::{EngineEvent, LiveSnapshot, Snapshot};
