//! Move translator - target placement to command sequence
//!
//! Assumes the piece starts at rotation 0 and column [`SPAWN_X`]. Rotation
//! comes first, then horizontal moves, then a single drop. Nothing here
//! checks the path; blocked commands are simply no-ops in the engine.

use arrayvec::ArrayVec;

use crate::core::pieces;
use crate::search::Target;
use crate::types::{Command, PieceKind, BOARD_WIDTH, SPAWN_X};

/// Longest plan: 2 rotations, a full board of shifts and a drop.
pub const MAX_PLAN_LEN: usize = 16;

pub type Plan = ArrayVec<Command, MAX_PLAN_LEN>;

/// Rotation commands needed to reach `rotation` from state 0.
///
/// More than two clockwise steps are replaced by the counter-clockwise
/// complement (`4 - steps`).
pub fn rotation_commands(kind: PieceKind, rotation: u8) -> (Command, u8) {
    let steps = rotation % pieces::rotation_count(kind);
    if steps > 2 {
        (Command::Ccw, 4 - steps)
    } else {
        (Command::Cw, steps)
    }
}

pub fn translate(kind: PieceKind, target: Target) -> Plan {
    let mut plan = Plan::new();

    let (rotate, turns) = rotation_commands(kind, target.rotation);
    for _ in 0..turns {
        plan.push(rotate);
    }

    // Shifts past the board are no-ops anyway; clamping keeps the plan bounded.
    let width = BOARD_WIDTH as i8;
    let dx = (target.x as i16 - SPAWN_X as i16).clamp(-width as i16, width as i16);
    let shift = if dx < 0 { Command::Left } else { Command::Right };
    for _ in 0..dx.unsigned_abs() {
        plan.push(shift);
    }

    plan.push(Command::Drop);
    plan
}

/// Plan for the case where the search found nothing: just drop.
pub fn fallback() -> Plan {
    let mut plan = Plan::new();
    plan.push(Command::Drop);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command::*;

    fn plan(kind: PieceKind, rotation: u8, x: i8) -> Vec<Command> {
        translate(kind, Target { rotation, x }).to_vec()
    }

    #[test]
    fn spawn_position_is_a_bare_drop() {
        assert_eq!(plan(PieceKind::T, 0, 4), vec![Drop]);
    }

    #[test]
    fn three_turns_become_one_ccw() {
        assert_eq!(plan(PieceKind::T, 3, 4), vec![Ccw, Drop]);
        assert_eq!(plan(PieceKind::T, 2, 4), vec![Cw, Cw, Drop]);
        assert_eq!(plan(PieceKind::L, 1, 4), vec![Cw, Drop]);
    }

    #[test]
    fn rotation_is_taken_modulo_state_count() {
        // I has two states: target 3 is state 1
        assert_eq!(plan(PieceKind::I, 3, 4), vec![Cw, Drop]);
        assert_eq!(plan(PieceKind::O, 2, 4), vec![Drop]);
    }

    #[test]
    fn rotation_then_shift_then_drop() {
        assert_eq!(plan(PieceKind::T, 1, 2), vec![Cw, Left, Left, Drop]);
        assert_eq!(plan(PieceKind::J, 3, 8), vec![Ccw, Right, Right, Right, Right, Drop]);
    }

    #[test]
    fn far_targets_are_clamped() {
        let p = plan(PieceKind::I, 0, 100);
        assert_eq!(p.len(), BOARD_WIDTH as usize + 1);
        assert_eq!(p.last(), Some(&Drop));
    }
}
