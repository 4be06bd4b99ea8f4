//! Game state module - the per-session game engine
//!
//! [`GameEngine`] owns one board, at most one live piece and the id of the
//! piece that spawns next. Every mutation goes through a handful of
//! operations (`spawn`, `move_by`, `rotate`, `fall`, `hard_drop`) and each
//! visible change queues a [`Snapshot`]; the owner drains the queue after
//! every command or gravity tick.
//!
//! Geometric failures (blocked moves, rotations with no valid kick) are
//! silent no-ops: nothing changes and nothing is emitted. Game over is a
//! one-way door; once entered, every operation is a no-op.

use crate::board::Board;
use crate::pieces::{self, PieceShape};
use crate::rng::{BagSource, PieceSource};
use crate::snapshot::{EngineEvent, LiveSnapshot, Snapshot};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LivePiece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl LivePiece {
    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        pieces::get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered by the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        pieces::is_valid(board, self.kind, self.rotation, self.x, self.y)
    }

    /// Same piece shifted by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// A live piece is active
    Falling,
    /// The live piece is being committed; no piece exists
    Locking,
    /// Terminal: no further piece exists
    GameOver,
}

/// One game: board, live piece, pending next piece and the emission queue.
#[derive(Debug, Clone)]
pub struct GameEngine<S = BagSource> {
    board: Board,
    live: Option<LivePiece>,
    next: PieceKind,
    phase: Phase,
    source: S,
    emitted: Vec<Snapshot>,
    pieces_locked: u32,
    lines_cleared: u32,
}

impl<S: PieceSource> GameEngine<S> {
    /// Start a game on an empty board. The first piece spawns immediately.
    pub fn new(source: S) -> Self {
        Self::with_board(Board::new(), source)
    }

    /// Start a game on a pre-filled board. The first piece spawns immediately,
    /// so the engine may already be over when this returns.
    pub fn with_board(board: Board, mut source: S) -> Self {
        let next = source.next_piece();
        let mut engine = Self {
            board,
            live: None,
            next,
            phase: Phase::Locking,
            source,
            emitted: Vec::new(),
            pieces_locked: 0,
            lines_cleared: 0,
        };
        engine.spawn();
        engine
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn live(&self) -> Option<LivePiece> {
        self.live
    }

    /// Kind of the piece that spawns after the live one
    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Take every snapshot queued since the last drain, oldest first.
    pub fn drain_emissions(&mut self) -> std::vec::Drain<'_, Snapshot> {
        self.emitted.drain(..)
    }

    /// Number of snapshots waiting to be drained
    pub fn pending_emissions(&self) -> usize {
        self.emitted.len()
    }

    /// Apply a named command. Returns whether the state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Left => self.move_by(-1),
            Command::Right => self.move_by(1),
            Command::Down => self.fall(),
            Command::Drop => self.hard_drop(),
            Command::Cw => self.rotate(1),
            Command::Ccw => self.rotate(-1),
        }
    }

    /// Spawn the pending next piece at rotation 0, column 4.
    ///
    /// Scans anchor rows downward from the one that puts the top mino on row 0
    /// and takes the first valid row. If none is valid the game is over.
    /// No-op while a piece is live or after game over.
    pub fn spawn(&mut self) -> bool {
        if self.phase == Phase::GameOver || self.live.is_some() {
            return false;
        }

        let kind = self.next;
        let start = pieces::spawn_row(kind, 0);
        let found = (start..BOARD_HEIGHT as i8)
            .find(|&y| pieces::is_valid(&self.board, kind, 0, SPAWN_X, y));

        match found {
            Some(y) => {
                self.commit(LivePiece {
                    kind,
                    rotation: 0,
                    x: SPAWN_X,
                    y,
                });
                self.next = self.source.next_piece();
                self.phase = Phase::Falling;
                self.emit(true);
                true
            }
            None => {
                log::debug!(
                    "no spawn row for {} after {} pieces, game over",
                    kind.as_str(),
                    self.pieces_locked
                );
                self.phase = Phase::GameOver;
                self.live = None;
                self.emitted.push(Snapshot::game_over());
                false
            }
        }
    }

    /// Shift the live piece horizontally by `dx` columns if the target is valid.
    pub fn move_by(&mut self, dx: i8) -> bool {
        let Some(piece) = self.active() else {
            return false;
        };

        let moved = piece.shifted(dx, 0);
        if !moved.is_valid(&self.board) {
            return false;
        }

        self.commit(moved);
        self.emit(false);
        true
    }

    /// Rotate by `direction` (+1 clockwise, -1 counter-clockwise) with kicks.
    pub fn rotate(&mut self, direction: i8) -> bool {
        let Some(piece) = self.active() else {
            return false;
        };

        let board = &self.board;
        let result = pieces::try_rotate(
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
            direction,
            |rotation, x, y| pieces::is_valid(board, piece.kind, rotation, x, y),
        );

        let Some((rotation, (dx, dy))) = result else {
            return false;
        };

        self.commit(LivePiece {
            rotation,
            ..piece.shifted(dx, dy)
        });
        self.emit(false);
        true
    }

    /// One gravity step: advance a row, or lock and spawn the next piece.
    ///
    /// Returns `false` only when there is no live piece.
    pub fn fall(&mut self) -> bool {
        let Some(piece) = self.active() else {
            return false;
        };

        let lowered = piece.shifted(0, 1);
        if lowered.is_valid(&self.board) {
            self.commit(lowered);
            self.emit(false);
        } else {
            self.lock_and_spawn(piece);
        }
        true
    }

    /// Drop the live piece as far as it goes, then lock it.
    pub fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.active() else {
            return false;
        };

        let distance = pieces::drop_distance(&self.board, piece.kind, piece.rotation, piece.x, piece.y);
        let landed = piece.shifted(0, distance as i8);
        self.commit(landed);
        self.lock_and_spawn(landed);
        true
    }

    /// Rows the live piece can still fall
    pub fn drop_distance(&self) -> Option<u8> {
        let piece = self.live?;
        Some(pieces::drop_distance(
            &self.board,
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
        ))
    }

    /// Current state as a snapshot (without queueing it)
    pub fn snapshot(&self, include_board: bool) -> Snapshot {
        if self.phase == Phase::GameOver {
            return Snapshot::game_over();
        }
        Snapshot {
            live: self.live.map(|p| live_snapshot(p, self.drop_distance().unwrap_or(0))),
            next: Some(self.next),
            board: include_board.then(|| self.board.to_grid()),
            event: None,
        }
    }

    fn active(&self) -> Option<LivePiece> {
        match self.phase {
            Phase::Falling => self.live,
            Phase::Locking | Phase::GameOver => None,
        }
    }

    fn commit(&mut self, piece: LivePiece) {
        debug_assert!(piece.is_valid(&self.board), "committed invalid piece {:?}", piece);
        self.live = Some(piece);
    }

    fn emit(&mut self, include_board: bool) {
        let snapshot = self.snapshot(include_board);
        self.emitted.push(snapshot);
    }

    fn lock_and_spawn(&mut self, piece: LivePiece) {
        self.phase = Phase::Locking;
        self.live = None;

        let locked = self
            .board
            .lock_piece(&piece.shape(), piece.x, piece.y, piece.kind);
        debug_assert!(locked, "lock of invalid piece {:?}", piece);

        let cleared = self.board.clear_full_rows();
        self.pieces_locked += 1;
        self.lines_cleared += cleared.len() as u32;

        self.emitted.push(Snapshot {
            live: Some(live_snapshot(piece, 0)),
            next: Some(self.next),
            board: Some(self.board.to_grid()),
            event: Some(EngineEvent::Lock),
        });

        self.spawn();
    }
}

fn live_snapshot(piece: LivePiece, drop_distance: u8) -> LiveSnapshot {
    LiveSnapshot {
        kind: piece.kind,
        rotation: piece.rotation,
        x: piece.x,
        y: piece.y,
        drop_distance,
    }
}
