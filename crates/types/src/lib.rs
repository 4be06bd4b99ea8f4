//! Shared types - data structures and constants used by every layer
//!
//! All types here are plain data with no external dependencies, so the core
//! engine, the planner and the network adapter can agree on them without
//! pulling each other in.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn anchor column**: 4
//!
//! # Piece Ids
//!
//! Pieces travel over the wire as small integers. Board cells reuse the same
//! ids, with 0 meaning empty:
//!
//! | Id | Kind |
//! |----|------|
//! | 1 | O |
//! | 2 | I |
//! | 3 | T |
//! | 4 | L |
//! | 5 | J |
//! | 6 | S |
//! | 7 | Z |
//!
//! # Examples
//!
//! ```
//! use stackbot_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_id(2), Some(PieceKind::I));
//! assert_eq!(PieceKind::T.id(), 3);
//!
//! assert_eq!(Command::from_str("ccw"), Some(Command::Ccw));
//! assert_eq!(Command::from_str("jump"), None);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Anchor column used for every freshly spawned piece.
pub const SPAWN_X: i8 = 4;

/// Default gravity interval: one `fall()` every 500ms.
pub const GRAVITY_INTERVAL_MS: u64 = 500;

/// The seven piece kinds, numbered as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    O = 1,
    I = 2,
    T = 3,
    L = 4,
    J = 5,
    S = 6,
    Z = 7,
}

impl PieceKind {
    /// Every kind in id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Look a kind up by its wire id (1-7).
    ///
    /// # Examples
    ///
    /// ```
    /// use stackbot_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(1), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_id(7), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_id(0), None);
    /// assert_eq!(PieceKind::from_id(8), None);
    /// ```
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::O),
            2 => Some(PieceKind::I),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::L),
            5 => Some(PieceKind::J),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Wire id, also the value written into board cells when this kind locks.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Single-letter name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::O => "o",
            PieceKind::I => "i",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }
}

/// Discrete input commands accepted by a game engine.
///
/// Human players and the autoplay agent use the same vocabulary; the agent's
/// plans are sequences of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Shift one column left
    Left,
    /// Shift one column right
    Right,
    /// Soft drop: one gravity step
    Down,
    /// Hard drop: fall as far as possible and lock
    Drop,
    /// Rotate to the next rotation state
    Cw,
    /// Rotate to the previous rotation state
    Ccw,
}

impl Command {
    /// Parse a command name. Names are exact and lowercase, as sent on the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackbot_types::Command;
    ///
    /// assert_eq!(Command::from_str("left"), Some(Command::Left));
    /// assert_eq!(Command::from_str("drop"), Some(Command::Drop));
    /// assert_eq!(Command::from_str("LEFT"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Command::Left),
            "right" => Some(Command::Right),
            "down" => Some(Command::Down),
            "drop" => Some(Command::Drop),
            "cw" => Some(Command::Cw),
            "ccw" => Some(Command::Ccw),
            _ => None,
        }
    }

    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Down => "down",
            Command::Drop => "drop",
            Command::Cw => "cw",
            Command::Ccw => "ccw",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;
