use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::special::CastleSide;
use crate::types::{Color, Move, MoveType, Piece, PieceType, Position};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

static STANDARD_BOARD: Lazy<Board> = Lazy::new(|| {
    let mut board = Board::empty();
    for (file, piece_type) in BACK_RANK.iter().enumerate() {
        let file = file as u8;
        for color in [Color::White, Color::Black] {
            let home = Position::new_unchecked(color.back_rank(), file);
            let pawn = Position::new_unchecked(color.pawn_starting_rank(), file);
            board.set_piece_at(home, Some(Piece::new(color, *piece_type, home)));
            board.set_piece_at(pawn, Some(Piece::new(color, PieceType::Pawn, pawn)));
        }
    }
    board
});

/// Fixed 8x8 grid of optional pieces.
///
/// The board knows nothing about legality. `set_piece_at` is a raw write that
/// keeps each piece's `position` in step with the slot holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// Standard starting array.
    pub fn new() -> Board {
        STANDARD_BOARD.clone()
    }

    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.squares[pos.index()].as_ref()
    }

    pub fn set_piece_at(&mut self, pos: Position, piece: Option<Piece>) {
        self.squares[pos.index()] = piece.map(|p| Piece { position: pos, ..p });
    }

    /// Take the piece off `pos`, returning it.
    pub fn remove_piece_at(&mut self, pos: Position) -> Option<Piece> {
        self.squares[pos.index()].take()
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.squares[pos.index()].is_none()
    }

    /// True exactly when `Position::new(rank, file)` would succeed.
    pub fn is_inside(rank: i8, file: i8) -> bool {
        (0..8).contains(&rank) && (0..8).contains(&file)
    }

    /// All pieces, scanning from a8 to h1.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    pub fn pieces_of_color(&self, color: Color) -> Vec<Piece> {
        self.pieces().filter(|p| p.color == color).copied().collect()
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|p| p.color == color && p.piece_type == PieceType::King)
            .map(|p| p.position)
    }

    pub fn count(&self, color: Color, piece_type: PieceType) -> usize {
        self.pieces()
            .filter(|p| p.color == color && p.piece_type == piece_type)
            .count()
    }

    /// Move the pieces for `mv` without asking whether it is legal.
    ///
    /// Handles the en-passant victim, the castling rook and the promoted
    /// piece. A pending promotion leaves a pawn on the last rank.
    pub fn execute_move(&mut self, mv: &Move) {
        let Some(mover) = self.remove_piece_at(mv.from()) else {
            return;
        };
        let rank = mv.from().rank();
        match mv.move_type() {
            MoveType::EnPassant => {
                self.remove_piece_at(Position::new_unchecked(rank, mv.to().file()));
            }
            MoveType::Castle => {
                if let Some(side) = CastleSide::from_king_destination(mv.to().file()) {
                    let rook = self.remove_piece_at(Position::new_unchecked(rank, side.rook_home_file()));
                    self.set_piece_at(
                        Position::new_unchecked(rank, side.rook_destination_file()),
                        rook,
                    );
                }
            }
            _ => {}
        }
        let placed = match (mv.move_type(), mv.promotion_piece()) {
            (MoveType::Promotion, Some(piece_type)) => Piece { piece_type, ..mover },
            _ => mover,
        };
        self.set_piece_at(mv.to(), Some(placed));
    }

    /// Text diagram, eighth rank first.
    pub fn draw_board(&self) -> String {
        self.squares
            .chunks(8)
            .enumerate()
            .map(|(rank, row)| {
                let cells = row
                    .iter()
                    .map(|slot| slot.as_ref().map_or(".", |p| p.to_symbol()))
                    .join(" ");
                format!("{} {}", 8 - rank, cells)
            })
            .chain(std::iter::once("  a b c d e f g h".to_string()))
            .join("\n")
    }
}
