//! Coordinate move tokens (`e2e4`, `e7e8q`) for saving and sending moves.
//!
//! A token only names two squares and an optional promotion letter. The move
//! type is recovered from the position the token is decoded against.

use crate::error::ChessError;
use crate::game::GameState;
use crate::types::{Move, PieceType, Position};

pub fn encode(mv: &Move) -> String {
    mv.to_algebraic()
}

/// Square in file-letter/rank-digit form, e.g. `e4`.
pub fn parse_square(text: &str) -> Result<Position, ChessError> {
    Position::from_algebraic(text)
}

/// Decode `token` into the legal move it names in `state`.
///
/// A promotion without a suffix comes back pending.
pub fn decode(token: &str, state: &GameState) -> Result<Move, ChessError> {
    let invalid = || ChessError::InvalidToken(token.to_string());
    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        return Err(invalid());
    }
    let from = parse_square(&token[0..2]).map_err(|_| invalid())?;
    let to = parse_square(&token[2..4]).map_err(|_| invalid())?;
    let suffix = token[4..].chars().next();

    let resolved = state
        .resolve(from, to)
        .ok_or_else(|| ChessError::IllegalMove(token.to_string()))?;

    match (resolved.is_pending_promotion(), suffix) {
        (_, None) => Ok(resolved),
        (true, Some(letter)) => match PieceType::from_char(letter) {
            Some(kind) if kind.can_promote_to() && letter.is_ascii_lowercase() => {
                Ok(resolved.with_promotion(kind))
            }
            _ => Err(invalid()),
        },
        (false, Some(_)) => Err(invalid()),
    }
}
