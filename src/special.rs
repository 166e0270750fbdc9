//! Castling rights and the en-passant target.
//!
//! These rights cannot be recovered from the board alone, so they travel
//! with the game state and are updated once per committed move.

use crate::board::Board;
use crate::rules;
use crate::types::{Color, Move, MoveType, Piece, PieceType, Position};

const KING_HOME_FILE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// File the king lands on.
    pub fn king_destination_file(&self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    pub fn rook_home_file(&self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// File the rook lands on after castling.
    pub fn rook_destination_file(&self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    pub fn from_king_destination(file: u8) -> Option<CastleSide> {
        match file {
            6 => Some(CastleSide::Kingside),
            2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    fn from_rook_home(file: u8) -> Option<CastleSide> {
        match file {
            7 => Some(CastleSide::Kingside),
            0 => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// Has-moved flags for each king and castling rook, plus the en-passant
/// target square.
///
/// The en-passant target is only set right after a pawn's double step and is
/// cleared by the next applied move, whatever that move is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpecialMoveRights {
    white_king_moved: bool,
    white_kingside_rook_moved: bool,
    white_queenside_rook_moved: bool,
    black_king_moved: bool,
    black_kingside_rook_moved: bool,
    black_queenside_rook_moved: bool,
    en_passant_target: Option<Position>,
}

impl SpecialMoveRights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant_target
    }

    pub fn set_en_passant_target(&mut self, target: Option<Position>) {
        self.en_passant_target = target;
    }

    pub fn king_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    pub fn set_king_moved(&mut self, color: Color, moved: bool) {
        match color {
            Color::White => self.white_king_moved = moved,
            Color::Black => self.black_king_moved = moved,
        }
    }

    pub fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside_rook_moved,
            (Color::White, CastleSide::Queenside) => self.white_queenside_rook_moved,
            (Color::Black, CastleSide::Kingside) => self.black_kingside_rook_moved,
            (Color::Black, CastleSide::Queenside) => self.black_queenside_rook_moved,
        }
    }

    pub fn set_rook_moved(&mut self, color: Color, side: CastleSide, moved: bool) {
        let flag = match (color, side) {
            (Color::White, CastleSide::Kingside) => &mut self.white_kingside_rook_moved,
            (Color::White, CastleSide::Queenside) => &mut self.white_queenside_rook_moved,
            (Color::Black, CastleSide::Kingside) => &mut self.black_kingside_rook_moved,
            (Color::Black, CastleSide::Queenside) => &mut self.black_queenside_rook_moved,
        };
        *flag = moved;
    }

    /// Flag-only view: neither the king nor that rook has moved.
    pub fn may_castle(&self, color: Color, side: CastleSide) -> bool {
        !self.king_moved(color) && !self.rook_moved(color, side)
    }

    /// Push the en-passant capture for the pawn on `pawn_pos`, if there is one.
    pub fn add_en_passant_moves(&self, board: &Board, pawn_pos: Position, into: &mut Vec<Move>) {
        let Some(target) = self.en_passant_target else {
            return;
        };
        let candidate = Move::new(pawn_pos, target, MoveType::EnPassant);
        if self.is_en_passant_valid(board, &candidate) {
            into.push(candidate);
        }
    }

    pub fn is_en_passant_valid(&self, board: &Board, mv: &Move) -> bool {
        if self.en_passant_target != Some(mv.to()) {
            return false;
        }
        let Some(mover) = board.piece_at(mv.from()) else {
            return false;
        };
        if mover.piece_type != PieceType::Pawn {
            return false;
        }

        let (from, to) = (mv.from(), mv.to());
        let rank_delta = to.rank() as i8 - from.rank() as i8;
        let file_delta = to.file() as i8 - from.file() as i8;
        if rank_delta != mover.color.pawn_direction() || file_delta.abs() != 1 {
            return false;
        }
        if !board.is_empty(to) {
            return false;
        }

        // the double-stepped pawn sits beside the mover, on the target's file
        let captured_square = Position::new_unchecked(from.rank(), to.file());
        board
            .piece_at(captured_square)
            .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color != mover.color)
    }

    /// Push every castling move available to the king on `king_pos`.
    pub fn add_castling_moves(&self, board: &Board, king_pos: Position, into: &mut Vec<Move>) {
        for side in CastleSide::BOTH {
            if self.is_castling_valid(board, king_pos, side) {
                let to = Position::new_unchecked(king_pos.rank(), side.king_destination_file());
                into.push(Move::new(king_pos, to, MoveType::Castle));
            }
        }
    }

    pub fn is_castling_valid(&self, board: &Board, king_pos: Position, side: CastleSide) -> bool {
        let Some(king) = board.piece_at(king_pos) else {
            return false;
        };
        let us = king.color;
        if king.piece_type != PieceType::King
            || king_pos.rank() != us.back_rank()
            || king_pos.file() != KING_HOME_FILE
        {
            return false;
        }
        if !self.may_castle(us, side) {
            return false;
        }

        let rank = king_pos.rank();
        let rook_pos = Position::new_unchecked(rank, side.rook_home_file());
        let rook_ok = board
            .piece_at(rook_pos)
            .is_some_and(|p| p.piece_type == PieceType::Rook && p.color == us);
        if !rook_ok {
            return false;
        }

        let (low, high) = if rook_pos.file() > KING_HOME_FILE {
            (KING_HOME_FILE + 1, rook_pos.file())
        } else {
            (rook_pos.file() + 1, KING_HOME_FILE)
        };
        if (low..high).any(|file| !board.is_empty(Position::new_unchecked(rank, file))) {
            return false;
        }

        if rules::is_in_check(board, us) {
            return false;
        }

        // the king may not cross or land on an attacked square
        let destination = side.king_destination_file();
        let transit: Vec<u8> = if destination > KING_HOME_FILE {
            (KING_HOME_FILE + 1..=destination).collect()
        } else {
            (destination..KING_HOME_FILE).collect()
        };
        transit
            .into_iter()
            .map(|file| Position::new_unchecked(rank, file))
            .all(|square| !king_attacked_on(board, king_pos, square, us))
    }

    /// Update the rights for `mv`, which is about to be played on `board`.
    ///
    /// Must run before the board is touched: the mover is read from `mv.from()`.
    pub fn after_move_applied(&mut self, board: &Board, mv: &Move) {
        match board.piece_at(mv.from()).copied() {
            Some(mover) => {
                self.update_has_moved_flags(board, &mover, mv);
                self.update_en_passant_target(&mover, mv);
            }
            None => self.en_passant_target = None,
        }
    }

    fn update_has_moved_flags(&mut self, board: &Board, mover: &Piece, mv: &Move) {
        let us = mover.color;
        match mover.piece_type {
            PieceType::King => self.set_king_moved(us, true),
            PieceType::Rook if mv.from().rank() == us.back_rank() => {
                if let Some(side) = CastleSide::from_rook_home(mv.from().file()) {
                    self.set_rook_moved(us, side, true);
                }
            }
            _ => {}
        }

        // capturing a rook on its home square ends that castling right
        let them = us.other_color();
        let captured_rook = board
            .piece_at(mv.to())
            .is_some_and(|p| p.piece_type == PieceType::Rook && p.color == them);
        if captured_rook && mv.to().rank() == them.back_rank() {
            if let Some(side) = CastleSide::from_rook_home(mv.to().file()) {
                self.set_rook_moved(them, side, true);
            }
        }
    }

    fn update_en_passant_target(&mut self, mover: &Piece, mv: &Move) {
        self.en_passant_target = None;
        if mover.piece_type != PieceType::Pawn {
            return;
        }
        let (from, to) = (mv.from(), mv.to());
        if from.rank().abs_diff(to.rank()) == 2 && from.rank() == mover.color.pawn_starting_rank() {
            let middle = (from.rank() + to.rank()) / 2;
            self.en_passant_target = Some(Position::new_unchecked(middle, from.file()));
        }
    }
}

/// Would the king on `king_from` be attacked standing on `square`?
///
/// Uses raw attacks on a scratch board, never the legal-move path.
fn king_attacked_on(board: &Board, king_from: Position, square: Position, us: Color) -> bool {
    let mut probe = board.clone();
    let king = probe.remove_piece_at(king_from);
    probe.set_piece_at(square, king);
    rules::is_square_attacked(&probe, square, us.other_color())
}
