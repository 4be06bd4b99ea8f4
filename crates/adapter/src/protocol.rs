//! Line protocol
//!
//! Every message is one line. The first line a client sends picks its role:
//!
//! ```text
//! play    -> commands in (left/right/down/drop/cw/ccw), snapshots out
//! watch   -> "?" lists sessions, "<id>" subscribes to one
//! ```
//!
//! Server replies are JSON objects: snapshots, `{"alive":[1,2]}`, or
//! `{"error":{"code":"...","message":"..."}}`.

use serde::{Deserialize, Serialize};

use crate::core::Snapshot;
use crate::session::SessionId;
use crate::types::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Spectator,
}

impl Role {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        match line.trim() {
            "play" => Ok(Role::Player),
            "watch" => Ok(Role::Spectator),
            _ => Err(ProtocolError::UnknownRole),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "play",
            Role::Spectator => "watch",
        }
    }
}

/// Player line to engine command. Unknown commands are ignored by the caller.
pub fn parse_command(line: &str) -> Option<Command> {
    Command::from_str(line.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectatorRequest {
    ListAlive,
    Watch(SessionId),
}

impl SpectatorRequest {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        if line == "?" {
            return Ok(SpectatorRequest::ListAlive);
        }
        line.parse::<u64>()
            .map(|raw| SpectatorRequest::Watch(SessionId::new(raw)))
            .map_err(|_| ProtocolError::BadRequest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    UnknownRole,
    BadRequest,
    UnknownSession,
}

impl ProtocolError {
    pub fn code(self) -> &'static str {
        match self {
            ProtocolError::UnknownRole => "unknown_role",
            ProtocolError::BadRequest => "bad_request",
            ProtocolError::UnknownSession => "unknown_session",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ProtocolError::UnknownRole => "first line must be \"play\" or \"watch\"",
            ProtocolError::BadRequest => "expected \"?\" or a session id",
            ProtocolError::UnknownSession => "no running session with that id",
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ProtocolError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: ErrorBody,
}

impl From<ProtocolError> for ErrorReply {
    fn from(err: ProtocolError) -> Self {
        Self {
            error: ErrorBody {
                code: err.code().to_string(),
                message: err.message().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliveReply {
    pub alive: Vec<u64>,
}

impl AliveReply {
    pub fn new(ids: &[SessionId]) -> Self {
        Self {
            alive: ids.iter().map(|id| id.as_u64()).collect(),
        }
    }
}

pub fn snapshot_line(snapshot: &Snapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

pub fn error_line(err: ProtocolError) -> serde_json::Result<String> {
    serde_json::to_string(&ErrorReply::from(err))
}

pub fn alive_line(ids: &[SessionId]) -> serde_json::Result<String> {
    serde_json::to_string(&AliveReply::new(ids))
}
