use thiserror::Error;

use crate::types::{PieceType, Position};

/// Everything that can go wrong inside the rules core.
///
/// Illegal move *requests* are not errors: `MoveGenerator::resolve` answers
/// those with `None`. These variants cover malformed input and moves that
/// cannot be applied at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("position out of range: rank {rank}, file {file} (both must be in 0..=7)")]
    OutOfRange { rank: i8, file: i8 },

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid SAN move: {0}")]
    InvalidSan(String),

    #[error("invalid move token: {0}")]
    InvalidToken(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("no piece at {0}")]
    NoPieceAt(Position),

    #[error("promotion move applied without a promotion piece")]
    PromotionPieceMissing,

    #[error("cannot promote to {}", .0.to_human())]
    InvalidPromotion(PieceType),

    #[error("no moves to undo")]
    NothingToUndo,

    #[error("no moves to redo")]
    NothingToRedo,
}
