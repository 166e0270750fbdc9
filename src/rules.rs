//! Per-piece movement geometry.
//!
//! Everything here is pseudo-legal: moves obey how a piece moves and what
//! occupies the target squares, but nothing here looks at whether the mover's
//! own king ends up in check. Check detection below is built on the same raw
//! moves, which keeps it free of any recursion into legality filtering.

use crate::board::Board;
use crate::types::{Color, Move, MoveType, Piece, PieceType, Position};

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
// castling is generated separately
const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// Outcome of looking at a single target square.
enum PotentialMove {
    /// Square can be entered; holds the enemy piece if it is a capture.
    Valid(Option<Piece>),
    /// Friendly piece in the way.
    Invalid,
}

impl PotentialMove {
    fn continue_search_in_direction(&self) -> bool {
        matches!(self, PotentialMove::Valid(None))
    }
}

fn check_move_target(board: &Board, piece: &Piece, candidate: Position) -> PotentialMove {
    match board.piece_at(candidate) {
        Some(other) if other.color == piece.color => PotentialMove::Invalid,
        Some(other) => PotentialMove::Valid(Some(*other)),
        None => PotentialMove::Valid(None),
    }
}

fn move_type_for(captured: Option<Piece>) -> MoveType {
    match captured {
        Some(_) => MoveType::Capture,
        None => MoveType::Normal,
    }
}

/// Pseudo-legal moves of the piece on `from`; empty if the square is empty.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<Move> {
    let Some(piece) = board.piece_at(from) else {
        return vec![];
    };
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, piece),
        PieceType::Knight => step_moves(board, piece, &KNIGHT_OFFSETS),
        PieceType::Bishop => sliding_moves(board, piece, &BISHOP_DIRECTIONS),
        PieceType::Rook => sliding_moves(board, piece, &ROOK_DIRECTIONS),
        PieceType::Queen => sliding_moves(board, piece, &QUEEN_DIRECTIONS),
        PieceType::King => step_moves(board, piece, &KING_OFFSETS),
    }
}

/// Walk each direction one square at a time: stop at the edge, stop after a
/// capture, stop before a friendly piece.
fn sliding_moves(board: &Board, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Move> {
    let mut moves = vec![];
    for &(rank_delta, file_delta) in directions {
        let mut current = piece.position;
        while let Some(candidate) = current.offset(rank_delta, file_delta) {
            let potential_move = check_move_target(board, piece, candidate);
            match potential_move {
                PotentialMove::Invalid => break,
                PotentialMove::Valid(captured) => {
                    moves.push(Move::new(piece.position, candidate, move_type_for(captured)));
                    if !potential_move.continue_search_in_direction() {
                        break;
                    }
                }
            }
            current = candidate;
        }
    }
    moves
}

/// Knight and king: every offset is checked on its own.
fn step_moves(board: &Board, piece: &Piece, offsets: &[(i8, i8)]) -> Vec<Move> {
    offsets
        .iter()
        .filter_map(|&(rank_delta, file_delta)| piece.position.offset(rank_delta, file_delta))
        .filter_map(|candidate| match check_move_target(board, piece, candidate) {
            PotentialMove::Valid(captured) => {
                Some(Move::new(piece.position, candidate, move_type_for(captured)))
            }
            PotentialMove::Invalid => None,
        })
        .collect()
}

fn pawn_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    let mut moves = vec![];
    let from = piece.position;
    let direction = piece.color.pawn_direction();
    let promotes = |to: Position| to.rank() == piece.color.promotion_rank();

    // pushes
    if let Some(one_step) = from.offset(direction, 0) {
        if board.is_empty(one_step) {
            if promotes(one_step) {
                moves.push(Move::pending_promotion(from, one_step));
            } else {
                moves.push(Move::new(from, one_step, MoveType::Normal));
                if from.rank() == piece.color.pawn_starting_rank() {
                    if let Some(two_step) = one_step.offset(direction, 0) {
                        if board.is_empty(two_step) {
                            moves.push(Move::new(from, two_step, MoveType::Normal));
                        }
                    }
                }
            }
        }
    }

    // captures, only onto enemy pieces
    for file_delta in [-1, 1] {
        let Some(target) = from.offset(direction, file_delta) else {
            continue;
        };
        if board
            .piece_at(target)
            .is_some_and(|other| other.color != piece.color)
        {
            if promotes(target) {
                moves.push(Move::pending_promotion(from, target));
            } else {
                moves.push(Move::new(from, target, MoveType::Capture));
            }
        }
    }
    moves
}

/// Does any piece of color `by` have a pseudo-legal move landing on `square`?
///
/// Pawns only capture onto occupied squares, so for an empty square the
/// caller has to put the defending piece there first.
pub fn is_square_attacked(board: &Board, square: Position, by: Color) -> bool {
    board
        .pieces()
        .filter(|p| p.color == by)
        .any(|p| {
            pseudo_legal_moves(board, p.position)
                .iter()
                .any(|m| m.to() == square)
        })
}

/// Is the king of `color` attacked? A board without that king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color.other_color()),
        None => false,
    }
}
