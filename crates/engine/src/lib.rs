//! Planner crate - placement search and command planning
//!
//! Everything here is synchronous and deterministic except the pacing
//! policy, which only produces delays for the caller to honour.
//!
//! - [`search`]: scores every placement of a piece and picks the best
//! - [`translate`]: turns a target placement into a command sequence
//! - [`autopilot`]: decides what to do with each incoming snapshot
//! - [`pacing`]: think/keypress delays and dropped keypresses
//! - [`selfplay`]: drives a [`GameEngine`](crate::core::GameEngine) with the
//!   autopilot, without timers or sockets

pub mod autopilot;
pub mod pacing;
pub mod search;
pub mod selfplay;
pub mod translate;

pub use stackbot_core as core;
pub use stackbot_types as types;

pub use autopilot::{Autopilot, Decision, PlanTarget};
pub use pacing::{HumanPacing, NoPacing, Pacing};
pub use search::{choose_target, BoardMetrics, PlacementCandidate, Target};
pub use selfplay::SelfPlayReport;
pub use translate::{translate, Plan};
