//! Headless self-play: the autopilot driving an engine directly
//!
//! No timers and no transport. Each spawn snapshot is planned and the whole
//! plan is applied synchronously, so the loop advances one piece per step.

use crate::autopilot::{Autopilot, Decision};
use crate::core::{GameEngine, PieceSource, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelfPlayReport {
    pub pieces: u32,
    pub lines: u32,
    pub game_over: bool,
}

/// Play until game over or until `max_pieces` pieces have locked.
pub fn run<S: PieceSource>(
    engine: &mut GameEngine<S>,
    autopilot: &Autopilot,
    max_pieces: u32,
) -> SelfPlayReport {
    let mut pending: Vec<Snapshot> = engine.drain_emissions().collect();

    while engine.pieces_locked() < max_pieces {
        let mut plan = None;
        for snapshot in &pending {
            match autopilot.decide(snapshot) {
                Decision::Stop => {
                    plan = None;
                    break;
                }
                Decision::Ignore => {}
                // A newer spawn supersedes an older one
                Decision::Execute(p) => plan = Some(p),
            }
        }

        let Some(plan) = plan else {
            break;
        };
        for command in plan {
            engine.apply(command);
        }
        pending = engine.drain_emissions().collect();
    }

    let report = SelfPlayReport {
        pieces: engine.pieces_locked(),
        lines: engine.lines_cleared(),
        game_over: engine.is_game_over(),
    };
    log::debug!(
        "self-play finished: {} pieces, {} lines, game over: {}",
        report.pieces,
        report.lines,
        report.game_over
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autopilot::PlanTarget;
    use crate::core::{BagSource, SequenceSource};
    use crate::types::PieceKind;

    #[test]
    fn stops_at_piece_limit() {
        let mut engine = GameEngine::new(BagSource::new(5));
        let report = run(&mut engine, &Autopilot::new(PlanTarget::Live), 20);
        assert_eq!(report.pieces, 20);
        assert!(!report.game_over);
    }

    #[test]
    fn i_pieces_alone_never_fill_a_row() {
        // Only the horizontal I is ever planned, and four-wide pieces cannot fill ten columns.
        let mut engine = GameEngine::new(SequenceSource::repeat(PieceKind::I));
        let report = run(&mut engine, &Autopilot::new(PlanTarget::Live), 10);
        assert_eq!(report.lines, 0);
        assert!(report.pieces > 0);
    }

    #[test]
    fn deterministic_for_a_seed() {
        let play = || {
            let mut engine = GameEngine::new(BagSource::new(11));
            run(&mut engine, &Autopilot::default(), 50)
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn squares_fill_rows_without_holes() {
        let mut engine = GameEngine::new(SequenceSource::repeat(PieceKind::O));
        let report = run(&mut engine, &Autopilot::default(), 100);
        assert!(!report.game_over);
        assert!(report.lines >= 30, "only {} lines", report.lines);
        assert_eq!(engine.board().count_holes(), 0);
    }
}
