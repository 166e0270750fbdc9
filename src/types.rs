use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Parse the active-color field of a FEN string.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Color of a FEN piece letter: uppercase is white, anything else black.
    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Rank delta of a single pawn step. Rank 0 is the eighth rank, so white
    /// pawns move towards lower indices.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Rank index the pawns of this color start on.
    pub fn pawn_starting_rank(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Rank index where pawns of this color promote.
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank index of this color's king and rooks in the initial array.
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

impl PieceType {
    /// Case-insensitive piece letter as used by FEN, SAN and move tokens.
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    pub fn can_promote_to(&self) -> bool {
        PIECES_CAN_PROMOTE_TO.contains(self)
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A square on the board.
///
/// Indices use a top-left origin: rank 0 is the eighth rank and file 0 is the
/// a-file, so `a8` is `(0, 0)` and `h1` is `(7, 7)`. A `Position` can only be
/// built with both coordinates in `0..=7`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    rank: u8,
    file: u8,
}

impl Position {
    pub fn new(rank: i8, file: i8) -> Result<Position, ChessError> {
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Ok(Position {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            Err(ChessError::OutOfRange { rank, file })
        }
    }

    /// Only for coordinates known to be on the board (home squares and the like).
    pub(crate) const fn new_unchecked(rank: u8, file: u8) -> Position {
        debug_assert!(rank < 8 && file < 8);
        Position { rank, file }
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// The square `rank_delta`/`file_delta` away, or `None` past the board edge.
    pub fn offset(&self, rank_delta: i8, file_delta: i8) -> Option<Position> {
        Position::new(self.rank as i8 + rank_delta, self.file as i8 + file_delta).ok()
    }

    /// Same parity means same square color, which is all bishop logic needs.
    pub fn parity(&self) -> u8 {
        (self.rank + self.file) % 2
    }

    pub fn from_algebraic(s: &str) -> Result<Position, ChessError> {
        let mut chars = s.chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(ChessError::InvalidSquare(s.to_string()));
        };
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = file_char as i8 - 'a' as i8;
        let rank = 8 - (rank_char as i8 - '0' as i8);
        Position::new(rank, file)
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(&self) -> char {
        (b'0' + 8 - self.rank) as char
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_algebraic(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
    pub position: Position,
}

impl Piece {
    pub fn new(color: Color, piece_type: PieceType, position: Position) -> Piece {
        Piece {
            color,
            piece_type,
            position,
        }
    }

    pub fn from_fen_char(c: char, position: Position) -> Option<Piece> {
        PieceType::from_char(c).map(|piece_type| Piece {
            color: Color::from_case(c),
            piece_type,
            position,
        })
    }

    pub fn to_fen_char(&self) -> char {
        match self.color {
            Color::White => self.piece_type.to_char(),
            Color::Black => self.piece_type.to_char().to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::Pawn) => "♙",
            (Color::White, PieceType::Rook) => "♖",
            (Color::White, PieceType::Knight) => "♘",
            (Color::White, PieceType::Bishop) => "♗",
            (Color::White, PieceType::Queen) => "♕",
            (Color::White, PieceType::King) => "♔",
            (Color::Black, PieceType::Pawn) => "♟︎",
            (Color::Black, PieceType::Rook) => "♜",
            (Color::Black, PieceType::Knight) => "♞",
            (Color::Black, PieceType::Bishop) => "♝",
            (Color::Black, PieceType::Queen) => "♛",
            (Color::Black, PieceType::King) => "♚",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    Capture,
    Castle,
    EnPassant,
    /// Pawn reaching the last rank, with or without a capture.
    Promotion,
}

/// A move from one square to another.
///
/// The type is decided when the move is generated. A `Promotion` move may be
/// *pending* (no piece chosen yet) while a caller collects the player's
/// choice; `GameState::apply_move` refuses pending promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Position,
    to: Position,
    move_type: MoveType,
    promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Position, to: Position, move_type: MoveType) -> Self {
        Self {
            from,
            to,
            move_type,
            promotion: None,
        }
    }

    pub fn promotion(from: Position, to: Position, piece_type: PieceType) -> Self {
        Self {
            from,
            to,
            move_type: MoveType::Promotion,
            promotion: Some(piece_type),
        }
    }

    pub fn pending_promotion(from: Position, to: Position) -> Self {
        Self::new(from, to, MoveType::Promotion)
    }

    /// Copy of this move with the promotion piece filled in.
    pub fn with_promotion(&self, piece_type: PieceType) -> Self {
        Self {
            promotion: Some(piece_type),
            ..*self
        }
    }

    pub fn from(&self) -> Position {
        self.from
    }

    pub fn to(&self) -> Position {
        self.to
    }

    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn promotion_piece(&self) -> Option<PieceType> {
        self.promotion
    }

    pub fn is_pending_promotion(&self) -> bool {
        self.move_type == MoveType::Promotion && self.promotion.is_none()
    }

    pub fn is_castle(&self) -> bool {
        self.move_type == MoveType::Castle
    }

    /// Coordinate form, e.g. `e2e4` or `e7e8q`.
    pub fn to_algebraic(&self) -> String {
        match self.promotion {
            Some(piece_type) => format!(
                "{}{}{}",
                self.from,
                self.to,
                piece_type.to_char().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_char() {
        assert_eq!(Color::from_char('w'), Some(Color::White));
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('g'), None);
    }

    #[test]
    fn test_color_from_case() {
        assert_eq!(Color::from_case('K'), Color::White);
        assert_eq!(Color::from_case('k'), Color::Black);
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
    }

    #[test]
    fn test_piece_type_from_char() {
        assert_eq!(PieceType::from_char('p'), Some(PieceType::Pawn));
        assert_eq!(PieceType::from_char('R'), Some(PieceType::Rook));
        assert_eq!(PieceType::from_char('n'), Some(PieceType::Knight));
        assert_eq!(PieceType::from_char('B'), Some(PieceType::Bishop));
        assert_eq!(PieceType::from_char('Q'), Some(PieceType::Queen));
        assert_eq!(PieceType::from_char('k'), Some(PieceType::King));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_can_promote_to() {
        assert!(PieceType::Queen.can_promote_to());
        assert!(PieceType::Knight.can_promote_to());
        assert!(!PieceType::Pawn.can_promote_to());
        assert!(!PieceType::King.can_promote_to());
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_ok());
        assert!(Position::new(7, 7).is_ok());
        assert_eq!(
            Position::new(8, 0),
            Err(ChessError::OutOfRange { rank: 8, file: 0 })
        );
        assert_eq!(
            Position::new(0, -1),
            Err(ChessError::OutOfRange { rank: 0, file: -1 })
        );
    }

    #[test]
    fn test_position_from_algebraic() {
        assert_eq!(Position::from_algebraic("a8"), Position::new(0, 0));
        assert_eq!(Position::from_algebraic("h1"), Position::new(7, 7));
        assert_eq!(Position::from_algebraic("e4"), Position::new(4, 4));
        assert!(Position::from_algebraic("i1").is_err());
        assert!(Position::from_algebraic("a9").is_err());
        assert!(Position::from_algebraic("e44").is_err());
        assert!(Position::from_algebraic("").is_err());
    }

    #[test]
    fn test_position_to_algebraic() {
        let pos = Position::new(6, 4).unwrap();
        assert_eq!(pos.to_algebraic(), "e2");
        assert_eq!(pos.to_string(), "e2");
        assert_eq!("e2".parse::<Position>().unwrap(), pos);
    }

    #[test]
    fn test_offset_stops_at_edge() {
        let a8 = Position::new(0, 0).unwrap();
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(1, 1), Position::new(1, 1).ok());
    }

    #[test]
    fn test_move_promotion_helpers() {
        let from = Position::from_algebraic("e7").unwrap();
        let to = Position::from_algebraic("e8").unwrap();
        let pending = Move::pending_promotion(from, to);
        assert!(pending.is_pending_promotion());
        let chosen = pending.with_promotion(PieceType::Knight);
        assert!(!chosen.is_pending_promotion());
        assert_eq!(chosen.to_algebraic(), "e7e8n");
        assert_eq!(pending.to_algebraic(), "e7e8");
    }
}
