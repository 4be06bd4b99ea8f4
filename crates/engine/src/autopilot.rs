//! Autopilot - turns spawn snapshots into command plans
//!
//! Only spawn snapshots (board present, no event) trigger planning. Moves
//! and locks are ignored; game over ends the session.

use crate::core::{Board, Snapshot};
use crate::search;
use crate::translate::{self, Plan};
use crate::types::PieceKind;

/// Which piece kind the planner searches placements for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanTarget {
    /// The upcoming piece. The plan is still executed on the live one.
    #[default]
    Next,
    /// The piece that is actually falling
    Live,
}

impl PlanTarget {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "next" => Some(PlanTarget::Next),
            "live" => Some(PlanTarget::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTarget::Next => "next",
            PlanTarget::Live => "live",
        }
    }
}

/// What to do with one incoming snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not a planning point
    Ignore,
    /// The game is over
    Stop,
    /// Send these commands in order
    Execute(Plan),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot {
    plan_target: PlanTarget,
}

impl Autopilot {
    pub fn new(plan_target: PlanTarget) -> Self {
        Self { plan_target }
    }

    pub fn plan_target(&self) -> PlanTarget {
        self.plan_target
    }

    pub fn decide(&self, snapshot: &Snapshot) -> Decision {
        if snapshot.is_game_over() {
            return Decision::Stop;
        }
        if !snapshot.is_spawn() {
            return Decision::Ignore;
        }

        let Some(board) = snapshot.board.as_ref().and_then(Board::from_grid) else {
            log::warn!("spawn snapshot carried an unreadable board");
            return Decision::Ignore;
        };
        let Some(kind) = self.planned_kind(snapshot) else {
            return Decision::Ignore;
        };

        Decision::Execute(plan(&board, kind))
    }

    fn planned_kind(&self, snapshot: &Snapshot) -> Option<PieceKind> {
        match self.plan_target {
            PlanTarget::Next => snapshot.next,
            PlanTarget::Live => snapshot.live.map(|live| live.kind),
        }
    }
}

/// Search and translate in one step; a bare drop when nothing fits.
pub fn plan(board: &Board, kind: PieceKind) -> Plan {
    match search::choose_target(board, kind) {
        Some(target) => translate::translate(kind, target),
        None => translate::fallback(),
    }
}
