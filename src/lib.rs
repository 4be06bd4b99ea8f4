//! stackbot (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` so binaries, integration
//! tests and benchmarks share one import path: `stackbot::{types, core,
//! engine, adapter}`.

pub use stackbot_adapter as adapter;
pub use stackbot_core as core;
pub use stackbot_engine as engine;
pub use stackbot_types as types;
