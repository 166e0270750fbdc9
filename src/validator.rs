//! King-safety filter.

use crate::game::GameState;
use crate::rules;
use crate::types::Move;

pub fn is_legal(state: &GameState, mv: &Move) -> bool {
    !leaves_own_king_in_check(state, mv)
}

/// Play `mv` on a copy and look for raw attacks on the mover's king.
///
/// King safety depends on the board alone, so only the board is copied and
/// the live state is never touched. Attacks come from pseudo-legal moves,
/// never from this filter.
pub fn leaves_own_king_in_check(state: &GameState, mv: &Move) -> bool {
    let Some(mover) = state.board().piece_at(mv.from()) else {
        return true;
    };
    let color = mover.color;
    let mut probe = state.board().clone();
    probe.execute_move(mv);
    rules::is_in_check(&probe, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::from_fen;
    use crate::types::{MoveType, Position};

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // bishop on e2 pinned by the rook on e8
        let state = from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let off_line = Move::new(pos("e2"), pos("d3"), MoveType::Normal);
        assert!(!is_legal(&state, &off_line));
    }

    #[test]
    fn king_may_not_step_into_attack() {
        let state = from_fen("3r2k1/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!is_legal(&state, &Move::new(pos("e1"), pos("d1"), MoveType::Normal)));
        assert!(is_legal(&state, &Move::new(pos("e1"), pos("f1"), MoveType::Normal)));
    }

    #[test]
    fn capturing_the_checker_is_legal() {
        let state = from_fen("6k1/8/8/8/8/8/3q4/4K3 w - - 0 1").unwrap();
        assert!(is_legal(&state, &Move::new(pos("e1"), pos("d2"), MoveType::Capture)));
    }

    #[test]
    fn en_passant_exposing_king_is_illegal() {
        // both pawns leave the fifth rank, opening the rook onto the king
        let state = from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2").unwrap();
        let ep = Move::new(pos("e5"), pos("d6"), MoveType::EnPassant);
        assert!(!is_legal(&state, &ep));
    }

    #[test]
    fn probe_leaves_state_untouched() {
        let state = from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let before = state.clone();
        is_legal(&state, &Move::new(pos("e2"), pos("d3"), MoveType::Normal));
        assert_eq!(state, before);
    }
}
