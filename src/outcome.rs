//! End-of-game classification.

use std::fmt;

use crate::game::GameState;
use crate::movegen::MoveGenerator;
use crate::types::{Color, Piece, PieceType};

const FIFTY_MOVE_HALFMOVES: u32 = 100;
const REPETITIONS_FOR_DRAW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverType {
    Checkmate,
    Resign,
    DrawByAgreement,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
    Stalemate,
}

impl GameOverType {
    pub fn is_draw(&self) -> bool {
        !matches!(self, GameOverType::Checkmate | GameOverType::Resign)
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Checkmate => "checkmate",
            Self::Resign => "resignation",
            Self::DrawByAgreement => "draw by agreement",
            Self::InsufficientMaterial => "insufficient material",
            Self::ThreefoldRepetition => "threefold repetition",
            Self::FiftyMoveRule => "fifty-move rule",
            Self::Stalemate => "stalemate",
        }
    }
}

impl fmt::Display for GameOverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

pub fn is_game_over(state: &GameState) -> bool {
    game_over_type(state).is_some()
}

/// Why the game is over, or `None` while it goes on.
///
/// Several conditions can hold at once. A side to move that is in check when
/// the game is over counts as checkmated; otherwise the first match wins in
/// this order: resignation, agreed draw, insufficient material, threefold
/// repetition, fifty-move rule, stalemate.
pub fn game_over_type(state: &GameState) -> Option<GameOverType> {
    let reason = if state.resigned_color().is_some() {
        GameOverType::Resign
    } else if state.draw_agreed() {
        GameOverType::DrawByAgreement
    } else if is_insufficient_material(state) {
        GameOverType::InsufficientMaterial
    } else if is_threefold_repetition(state) {
        GameOverType::ThreefoldRepetition
    } else if is_fifty_move_rule(state) {
        GameOverType::FiftyMoveRule
    } else if !MoveGenerator::new(state).has_legal_move() {
        GameOverType::Stalemate
    } else {
        return None;
    };
    if state.is_in_check() {
        Some(GameOverType::Checkmate)
    } else {
        Some(reason)
    }
}

/// Checkmate goes to the side that delivered it, resignation to the other
/// side. Draws and running games have no winner.
pub fn winner(state: &GameState) -> Option<Color> {
    match game_over_type(state)? {
        GameOverType::Checkmate => Some(state.turn().other_color()),
        GameOverType::Resign => state.resigned_color().map(|c| c.other_color()),
        _ => None,
    }
}

/// K vs K, K+B or K+N vs K, and K+B vs K+B with both bishops on the same
/// square color.
pub fn is_insufficient_material(state: &GameState) -> bool {
    let others: Vec<&Piece> = state
        .board()
        .pieces()
        .filter(|p| p.piece_type != PieceType::King)
        .collect();
    match others.as_slice() {
        [] => true,
        [single] => matches!(single.piece_type, PieceType::Bishop | PieceType::Knight),
        [a, b] => {
            a.piece_type == PieceType::Bishop
                && b.piece_type == PieceType::Bishop
                && a.color != b.color
                && a.position.parity() == b.position.parity()
        }
        _ => false,
    }
}

pub fn is_threefold_repetition(state: &GameState) -> bool {
    let history = state.position_history();
    let Some(current) = history.last() else {
        return false;
    };
    history.iter().filter(|key| *key == current).count() >= REPETITIONS_FOR_DRAW
}

pub fn is_fifty_move_rule(state: &GameState) -> bool {
    state.halfmove_clock() >= FIFTY_MOVE_HALFMOVES
}
