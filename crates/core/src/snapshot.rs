//! Snapshots - the engine's externally visible state
//!
//! Wire shape (one JSON object per emission):
//!
//! ```text
//! { "live": [kind, rotation, x, y, dropDistance],
//!   "next": kind,
//!   "board": [[0..7; 10]; 20],   // spawn and lock snapshots only
//!   "event": "lock" | "gameover" }
//! ```
//!
//! The game-over emission is just `{"event":"gameover"}`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::board::BoardGrid;
use crate::types::PieceKind;

/// Position of the live piece plus how far it can still fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    pub drop_distance: u8,
}

impl Serialize for LiveSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (
            self.kind.id(),
            self.rotation,
            self.x,
            self.y,
            self.drop_distance,
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LiveSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (id, rotation, x, y, drop_distance) = <(u8, u8, i8, i8, u8)>::deserialize(deserializer)?;
        let kind = PieceKind::from_id(id)
            .ok_or_else(|| D::Error::custom(format!("unknown piece id {}", id)))?;
        Ok(Self {
            kind,
            rotation,
            x,
            y,
            drop_distance,
        })
    }
}

/// Terminal and lock events carried by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineEvent {
    /// A piece was committed into the board (after line clear)
    Lock,
    /// No further piece can spawn
    GameOver,
}

/// One emission of a game engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "piece_id")]
    pub next: Option<PieceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EngineEvent>,
}

impl Snapshot {
    /// The bare game-over emission
    pub fn game_over() -> Self {
        Self {
            live: None,
            next: None,
            board: None,
            event: Some(EngineEvent::GameOver),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.event == Some(EngineEvent::GameOver)
    }

    pub fn is_lock(&self) -> bool {
        self.event == Some(EngineEvent::Lock)
    }

    /// A fresh piece just appeared: the snapshot carries the board and no event.
    pub fn is_spawn(&self) -> bool {
        self.board.is_some() && self.event.is_none() && self.live.is_some()
    }
}

mod piece_id {
    use super::*;

    pub fn serialize<S>(value: &Option<PieceKind>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(kind) => serializer.serialize_u8(kind.id()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PieceKind>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<u8>::deserialize(deserializer)? {
            Some(id) => PieceKind::from_id(id)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unknown piece id {}", id))),
            None => Ok(None),
        }
    }
}
