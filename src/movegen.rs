use tracing::trace;

use crate::game::GameState;
use crate::rules;
use crate::types::{Move, PieceType, Position, PIECES_CAN_PROMOTE_TO};
use crate::validator;

/// Legal move generation for one position.
///
/// Piece rules and the special moves are unioned first, then every candidate
/// goes through the king-safety filter. Promotions come out pending: one move
/// per destination with no piece chosen. Use [`expand_promotions`] to get the
/// four concrete choices.
pub struct MoveGenerator<'a> {
    state: &'a GameState,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    /// Candidates for the piece on `from` before the king-safety filter.
    pub fn pseudo_legal_moves(&self, from: Position) -> Vec<Move> {
        let board = self.state.board();
        let Some(piece) = board.piece_at(from) else {
            return vec![];
        };
        let mut moves = rules::pseudo_legal_moves(board, from);
        let rights = self.state.rights();
        match piece.piece_type {
            PieceType::Pawn => rights.add_en_passant_moves(board, from, &mut moves),
            PieceType::King => rights.add_castling_moves(board, from, &mut moves),
            _ => {}
        }
        moves
    }

    /// Legal moves of the piece on `from`, whichever color it is.
    pub fn legal_moves(&self, from: Position) -> Vec<Move> {
        self.pseudo_legal_moves(from)
            .into_iter()
            .filter(|m| validator::is_legal(self.state, m))
            .collect()
    }

    /// Every legal move of the side to move.
    pub fn collect(&self) -> Vec<Move> {
        self.state
            .board()
            .pieces_of_color(self.state.turn())
            .iter()
            .flat_map(|p| self.legal_moves(p.position))
            .collect()
    }

    /// Stops at the first legal move found.
    pub fn has_legal_move(&self) -> bool {
        self.state
            .board()
            .pieces_of_color(self.state.turn())
            .iter()
            .any(|p| {
                self.pseudo_legal_moves(p.position)
                    .iter()
                    .any(|m| validator::is_legal(self.state, m))
            })
    }

    /// Turn a from/to request into the one legal move it stands for.
    ///
    /// `None` means the request is illegal: empty origin, piece of the wrong
    /// color, or no legal move to `to`.
    pub fn resolve(&self, from: Position, to: Position) -> Option<Move> {
        let Some(piece) = self.state.board().piece_at(from) else {
            trace!(%from, "resolve: no piece on origin");
            return None;
        };
        if piece.color != self.state.turn() {
            trace!(%from, color = %piece.color, "resolve: not this side's turn");
            return None;
        }
        let found = self
            .legal_moves(from)
            .into_iter()
            .find(|m| m.to() == to);
        if found.is_none() {
            trace!(%from, %to, "resolve: no legal move to destination");
        }
        found
    }
}

/// Replace each pending promotion by its four concrete choices.
pub fn expand_promotions(moves: Vec<Move>) -> Vec<Move> {
    let mut expanded = Vec::with_capacity(moves.len());
    for m in moves {
        if m.is_pending_promotion() {
            expanded.extend(PIECES_CAN_PROMOTE_TO.iter().map(|&kind| m.with_promotion(kind)));
        } else {
            expanded.push(m);
        }
    }
    expanded
}
