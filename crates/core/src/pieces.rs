//! Pieces module - the piece catalog and the rotation kick rule
//!
//! Every kind has 1, 2 or 4 rotation states matching its real symmetry. Each
//! state is four (dx, dy) offsets from the anchor cell; negative dy is above
//! the anchor, so pieces hang upward from where they are anchored.

use crate::board::Board;
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Offset of a single mino relative to piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the anchor
pub type PieceShape = [MinoOffset; 4];

const O_STATES: [PieceShape; 1] = [[(0, 0), (1, 0), (0, -1), (1, -1)]];

const I_STATES: [PieceShape; 2] = [
    [(0, 0), (0, -1), (0, -2), (0, -3)],
    [(-1, 0), (0, 0), (1, 0), (2, 0)],
];

const T_STATES: [PieceShape; 4] = [
    [(-1, -1), (0, -1), (1, -1), (0, 0)],
    [(-1, -1), (0, -1), (0, -2), (0, 0)],
    [(-1, 0), (0, 0), (1, 0), (0, -1)],
    [(0, 0), (0, -1), (0, -2), (1, -1)],
];

const L_STATES: [PieceShape; 4] = [
    [(0, -2), (0, -1), (0, 0), (1, 0)],
    [(0, 0), (0, -1), (1, -1), (2, -1)],
    [(-1, -2), (0, -2), (0, -1), (0, 0)],
    [(-1, 0), (0, 0), (1, 0), (1, -1)],
];

const J_STATES: [PieceShape; 4] = [
    [(-1, 0), (0, 0), (0, -1), (0, -2)],
    [(0, -1), (0, 0), (1, 0), (2, 0)],
    [(0, 0), (0, -1), (0, -2), (1, -2)],
    [(-1, -1), (0, -1), (1, -1), (1, 0)],
];

const S_STATES: [PieceShape; 2] = [
    [(0, -2), (0, -1), (1, -1), (1, 0)],
    [(-1, 0), (0, 0), (0, -1), (1, -1)],
];

const Z_STATES: [PieceShape; 2] = [
    [(1, -2), (1, -1), (0, -1), (0, 0)],
    [(-1, -1), (0, -1), (0, 0), (1, 0)],
];

/// All rotation states of a kind, in rotation-index order
pub fn rotations(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::O => &O_STATES,
        PieceKind::I => &I_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
    }
}

/// Number of rotation states for a kind (1, 2 or 4)
pub fn rotation_count(kind: PieceKind) -> u8 {
    rotations(kind).len() as u8
}

/// Get the shape for a kind and rotation index (taken modulo the state count)
pub fn get_shape(kind: PieceKind, rotation: u8) -> PieceShape {
    let states = rotations(kind);
    states[rotation as usize % states.len()]
}

/// Smallest dy of a rotation state (the topmost mino's offset)
pub fn min_dy(kind: PieceKind, rotation: u8) -> i8 {
    get_shape(kind, rotation)
        .iter()
        .map(|&(_, dy)| dy)
        .min()
        .unwrap_or(0)
}

/// Horizontal extent (min dx, max dx) of a rotation state
pub fn horizontal_extent(kind: PieceKind, rotation: u8) -> (i8, i8) {
    let shape = get_shape(kind, rotation);
    let min = shape.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
    let max = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    (min, max)
}

/// Anchor row at which a rotation state's top mino sits on row 0
pub fn spawn_row(kind: PieceKind, rotation: u8) -> i8 {
    -min_dy(kind, rotation)
}

/// The catalog predicate: every mino in bounds and on an empty cell
#[inline]
pub fn is_valid(board: &Board, kind: PieceKind, rotation: u8, x: i8, y: i8) -> bool {
    get_shape(kind, rotation)
        .iter()
        .all(|&(dx, dy)| board.is_valid(x + dx, y + dy))
}

/// Whether a blocked rotation may be rescued by kicks: some mino of the
/// rotated shape touches the side walls or pokes above the top.
pub fn kick_eligible(kind: PieceKind, rotation: u8, x: i8, y: i8) -> bool {
    get_shape(kind, rotation).iter().any(|&(dx, dy)| {
        let nx = x + dx;
        let ny = y + dy;
        nx <= 0 || nx >= BOARD_WIDTH as i8 - 1 || ny < 0
    })
}

/// Kick offsets tried after the unshifted rotation, in order:
/// down one row, then +1, -1, +2, -2 columns.
pub const KICK_OFFSETS: [MinoOffset; 5] = [(0, 1), (1, 0), (-1, 0), (2, 0), (-2, 0)];

/// Try to rotate a piece by `direction` (+1 clockwise, -1 counter-clockwise).
///
/// Tries the same anchor first; when that fails and the rotated shape is
/// kick-eligible at the current anchor, tries [`KICK_OFFSETS`] in order.
/// Returns the new rotation index and the applied (dx, dy) offset, or `None`
/// if no candidate validates.
pub fn try_rotate(
    kind: PieceKind,
    rotation: u8,
    x: i8,
    y: i8,
    direction: i8,
    is_valid: impl Fn(u8, i8, i8) -> bool,
) -> Option<(u8, MinoOffset)> {
    let count = rotation_count(kind) as i8;
    let new_rotation = (rotation as i8 + direction).rem_euclid(count) as u8;

    if is_valid(new_rotation, x, y) {
        return Some((new_rotation, (0, 0)));
    }

    if !kick_eligible(kind, new_rotation, x, y) {
        return None;
    }

    KICK_OFFSETS
        .iter()
        .find(|&&(dx, dy)| is_valid(new_rotation, x + dx, y + dy))
        .map(|&offset| (new_rotation, offset))
}

/// Rows a piece can still fall from (x, y) before it would become invalid.
pub fn drop_distance(board: &Board, kind: PieceKind, rotation: u8, x: i8, y: i8) -> u8 {
    let mut d: i8 = 0;
    while y + d < BOARD_HEIGHT as i8 && is_valid(board, kind, rotation, x, y + d + 1) {
        d += 1;
    }
    d as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts_match_symmetry() {
        assert_eq!(rotation_count(PieceKind::O), 1);
        assert_eq!(rotation_count(PieceKind::I), 2);
        assert_eq!(rotation_count(PieceKind::S), 2);
        assert_eq!(rotation_count(PieceKind::Z), 2);
        assert_eq!(rotation_count(PieceKind::T), 4);
        assert_eq!(rotation_count(PieceKind::L), 4);
        assert_eq!(rotation_count(PieceKind::J), 4);
    }

    #[test]
    fn test_rotation_index_wraps() {
        assert_eq!(get_shape(PieceKind::I, 3), get_shape(PieceKind::I, 1));
        assert_eq!(get_shape(PieceKind::O, 2), get_shape(PieceKind::O, 0));
    }

    #[test]
    fn test_every_state_has_four_distinct_minos() {
        for kind in PieceKind::ALL {
            for shape in rotations(kind) {
                for i in 0..4 {
                    for j in i + 1..4 {
                        assert_ne!(shape[i], shape[j], "{:?} has duplicate minos", kind);
                    }
                }
            }
        }
    }

    #[test]
    fn test_spawn_row_puts_top_mino_on_row_zero() {
        assert_eq!(spawn_row(PieceKind::I, 0), 3);
        assert_eq!(spawn_row(PieceKind::I, 1), 0);
        assert_eq!(spawn_row(PieceKind::O, 0), 1);
        assert_eq!(spawn_row(PieceKind::T, 2), 1);
    }

    #[test]
    fn test_kick_eligibility_uses_walls_and_ceiling() {
        // Horizontal I anchored at column 8 reaches column 10
        assert!(kick_eligible(PieceKind::I, 1, 8, 10));
        // Vertical I anchored at row 2 pokes above the top
        assert!(kick_eligible(PieceKind::I, 0, 5, 2));
        // Middle of the board
        assert!(!kick_eligible(PieceKind::T, 0, 5, 10));
    }

    #[test]
    fn test_drop_distance_on_empty_board() {
        let board = Board::new();
        assert_eq!(drop_distance(&board, PieceKind::O, 0, 4, 1), 18);
        assert_eq!(drop_distance(&board, PieceKind::I, 1, 4, 19), 0);
    }
}
