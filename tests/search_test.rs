//! Move search and translation through the public facade

use stackbot::core::{Board, GameEngine, SequenceSource};
use stackbot::engine::search::{self, best_candidate, candidates, choose_target, BoardMetrics};
use stackbot::engine::{translate, Target};
use stackbot::types::{PieceKind, BOARD_WIDTH};

#[test]
fn empty_board_choice_has_best_score_and_fewest_holes() {
    let board = Board::new();

    for kind in PieceKind::ALL {
        let all = candidates(&board, kind);
        let best = best_candidate(&board, kind).expect("empty board has placements");

        let max_score = all.iter().map(|c| c.score).fold(f64::MIN, f64::max);
        let min_holes = all.iter().map(|c| c.metrics.holes).min().unwrap();
        assert_eq!(best.score, max_score, "{:?}", kind);
        assert_eq!(best.metrics.holes, min_holes, "{:?}", kind);

        let expected_holes = match kind {
            PieceKind::S | PieceKind::Z => 1,
            _ => 0,
        };
        assert_eq!(best.metrics.holes, expected_holes, "{:?}", kind);
    }
}

#[test]
fn first_maximum_wins_ties() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        let all = candidates(&board, kind);
        let best = best_candidate(&board, kind).unwrap();
        let first = all.iter().position(|c| c.score == best.score).unwrap();
        assert_eq!(all[first].target(), best.target());
    }
}

#[test]
fn search_is_deterministic() {
    let mut board = Board::new();
    for (x, h) in [3u8, 1, 0, 4, 2, 2, 0, 1, 5, 0].iter().enumerate() {
        for y in 0..*h {
            board.set(x as i8, 19 - y as i8, Some(PieceKind::J));
        }
    }

    for kind in PieceKind::ALL {
        let a = choose_target(&board, kind);
        let b = choose_target(&board.clone(), kind);
        assert_eq!(a, b);
        assert!(a.is_some());
    }
}

#[test]
fn metrics_are_taken_before_rows_are_removed() {
    let mut board = Board::new();
    for x in 0..6 {
        board.set(x, 19, Some(PieceKind::L));
    }

    let placed = search::simulate(&board, PieceKind::I, 1, 7).unwrap();
    assert_eq!(placed.landing_y, 19);
    assert_eq!(placed.metrics.cleared_rows, 1);
    // Still counted with the full row in place
    assert_eq!(placed.metrics.max_height, 1);
    assert_eq!(placed.metrics, BoardMetrics::measure(&placed.board));
}

#[test]
fn search_starts_every_pair_at_anchor_row_zero() {
    let mut board = Board::new();
    for x in 0..BOARD_WIDTH as i8 {
        if x != 3 {
            board.set(x, 19, Some(PieceKind::Z));
        }
    }

    // A vertical I would fill the gap, but it reaches above row 0 at anchor row 0.
    assert!(search::simulate(&board, PieceKind::I, 0, 3).is_none());
    assert_eq!(candidates(&board, PieceKind::I).len(), 7);
    assert_eq!(candidates(&board, PieceKind::T).len(), 16);
    assert_ne!(choose_target(&board, PieceKind::I), Some(Target { rotation: 0, x: 3 }));
}

#[test]
fn translated_plan_reaches_the_searched_placement() {
    // From a fresh spawn on an empty board every plan lands where searched.
    for kind in PieceKind::ALL {
        let board = Board::new();
        let best = best_candidate(&board, kind).unwrap();

        let mut engine = GameEngine::new(SequenceSource::repeat(kind));
        for command in translate(kind, best.target()) {
            engine.apply(command);
        }
        assert_eq!(engine.pieces_locked(), 1);

        let mut expected = best.board.clone();
        expected.clear_full_rows();
        assert_eq!(engine.board(), &expected, "{:?}", kind);
    }
}

#[test]
fn ccw_threshold() {
    let plan = translate(PieceKind::T, Target { rotation: 3, x: 4 });
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].as_str(), "ccw");
}
