//! Move search - brute-force placement scoring
//!
//! For a board and a piece kind, every (rotation, column) pair is dropped
//! straight down from anchor row 0, locked into a copy of the board, and
//! scored:
//!
//! ```text
//! score = 200 * cleared_rows
//!       -  80 * holes
//!       - 0.8 * bumpiness
//!       - 1.5 * max_height
//!       + 0.3 * x
//! ```
//!
//! A pair is skipped when the piece cannot be placed where the drop stops, so
//! states reaching two or more rows above their anchor never qualify.
//! Metrics are measured on the locked board before full rows are removed.
//! Enumeration is rotation ascending, then column ascending; the first
//! maximum wins, so the result is fully deterministic.

use crate::core::pieces;
use crate::core::Board;
use crate::types::{PieceKind, BOARD_WIDTH};

pub const CLEARED_ROW_WEIGHT: f64 = 200.0;
pub const HOLE_WEIGHT: f64 = 80.0;
pub const BUMPINESS_WEIGHT: f64 = 0.8;
pub const MAX_HEIGHT_WEIGHT: f64 = 1.5;
pub const COLUMN_WEIGHT: f64 = 0.3;

/// Where the planner wants the piece: rotation index and anchor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub rotation: u8,
    pub x: i8,
}

/// Heuristic features of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardMetrics {
    pub cleared_rows: u32,
    pub holes: u32,
    pub bumpiness: u32,
    pub max_height: u32,
}

impl BoardMetrics {
    pub fn measure(board: &Board) -> Self {
        let heights = board.column_heights();
        let bumpiness = heights
            .windows(2)
            .map(|w| (w[0] as i32 - w[1] as i32).unsigned_abs())
            .sum();

        Self {
            cleared_rows: board.count_full_rows() as u32,
            holes: board.count_holes() as u32,
            bumpiness,
            max_height: heights.iter().copied().max().unwrap_or(0) as u32,
        }
    }

    /// Weighted score of these metrics for a piece anchored at column `x`
    pub fn score(&self, x: i8) -> f64 {
        CLEARED_ROW_WEIGHT * self.cleared_rows as f64
            - HOLE_WEIGHT * self.holes as f64
            - BUMPINESS_WEIGHT * self.bumpiness as f64
            - MAX_HEIGHT_WEIGHT * self.max_height as f64
            + COLUMN_WEIGHT * x as f64
    }
}

/// One simulated placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementCandidate {
    pub rotation: u8,
    pub x: i8,
    pub landing_y: i8,
    /// Board after locking, full rows not yet removed
    pub board: Board,
    pub metrics: BoardMetrics,
    pub score: f64,
}

impl PlacementCandidate {
    pub fn target(&self) -> Target {
        Target {
            rotation: self.rotation,
            x: self.x,
        }
    }
}

/// Simulate dropping `kind` at `rotation`/`x` from anchor row 0. `None` if
/// the piece does not fit where the drop stops.
pub fn simulate(board: &Board, kind: PieceKind, rotation: u8, x: i8) -> Option<PlacementCandidate> {
    let landing_y = pieces::drop_distance(board, kind, rotation, x, 0) as i8;
    if !pieces::is_valid(board, kind, rotation, x, landing_y) {
        return None;
    }

    let mut locked = board.clone();
    locked.lock_piece(&pieces::get_shape(kind, rotation), x, landing_y, kind);

    let metrics = BoardMetrics::measure(&locked);
    Some(PlacementCandidate {
        rotation,
        x,
        landing_y,
        board: locked,
        metrics,
        score: metrics.score(x),
    })
}

/// Every valid placement of `kind`, in enumeration order.
pub fn candidates(board: &Board, kind: PieceKind) -> Vec<PlacementCandidate> {
    let mut out = Vec::new();
    for rotation in 0..pieces::rotation_count(kind) {
        let (min_dx, max_dx) = pieces::horizontal_extent(kind, rotation);
        for x in -min_dx..BOARD_WIDTH as i8 - max_dx {
            out.extend(simulate(board, kind, rotation, x));
        }
    }
    out
}

/// Highest scoring placement; ties go to the earliest in enumeration order.
pub fn best_candidate(board: &Board, kind: PieceKind) -> Option<PlacementCandidate> {
    let mut best: Option<PlacementCandidate> = None;
    for candidate in candidates(board, kind) {
        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

/// Choose where to put `kind` on `board`, or `None` if nothing fits.
pub fn choose_target(board: &Board, kind: PieceKind) -> Option<Target> {
    best_candidate(board, kind).map(|c| c.target())
}
