//! Forsyth-Edwards Notation import and export.
//!
//! Import is lenient about missing trailing fields, which default to
//! `w KQkq - 0 1`, but strict about everything that is present.

use tracing::debug;

use crate::board::Board;
use crate::error::ChessError;
use crate::game::GameState;
use crate::special::{CastleSide, SpecialMoveRights};
use crate::types::{Color, Piece, PieceType, Position};

const CASTLING_LETTERS: [(char, Color, CastleSide); 4] = [
    ('K', Color::White, CastleSide::Kingside),
    ('Q', Color::White, CastleSide::Queenside),
    ('k', Color::Black, CastleSide::Kingside),
    ('q', Color::Black, CastleSide::Queenside),
];

fn invalid(fen: &str, reason: &str) -> ChessError {
    ChessError::InvalidFen(format!("{reason} in '{fen}'"))
}

/// Full six-field FEN of the state, with the real clocks.
pub fn to_fen(state: &GameState) -> String {
    format!(
        "{} {} {}",
        position_key(state),
        state.halfmove_clock(),
        state.fullmove_number()
    )
}

/// The first four FEN fields: placement, side to move, castling and
/// en-passant. Two states with equal keys are the same position for
/// repetition purposes.
pub fn position_key(state: &GameState) -> String {
    let en_passant = state
        .rights()
        .en_passant_target()
        .map_or_else(|| "-".to_string(), |p| p.to_algebraic());
    format!(
        "{} {} {} {}",
        placement(state.board()),
        state.turn().to_char(),
        castling_field(state),
        en_passant
    )
}

fn placement(board: &Board) -> String {
    let mut out = String::with_capacity(72);
    for rank in 0..8 {
        let mut empty = 0;
        for file in 0..8 {
            match board.piece_at(Position::new_unchecked(rank, file)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.to_fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank < 7 {
            out.push('/');
        }
    }
    out
}

/// A letter needs the flags and both pieces standing on their home squares.
fn castling_field(state: &GameState) -> String {
    let board = state.board();
    let rights = state.rights();
    let field: String = CASTLING_LETTERS
        .iter()
        .filter(|(_, color, side)| {
            let rank = color.back_rank();
            let is_home = |file: u8, piece_type: PieceType| {
                board
                    .piece_at(Position::new_unchecked(rank, file))
                    .is_some_and(|p| p.color == *color && p.piece_type == piece_type)
            };
            rights.may_castle(*color, *side)
                && is_home(4, PieceType::King)
                && is_home(side.rook_home_file(), PieceType::Rook)
        })
        .map(|(letter, _, _)| *letter)
        .collect();
    if field.is_empty() {
        "-".to_string()
    } else {
        field
    }
}

pub fn from_fen(fen: &str) -> Result<GameState, ChessError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.is_empty() {
        return Err(invalid(fen, "empty string"));
    }
    if fields.len() > 6 {
        return Err(invalid(fen, "more than six fields"));
    }

    let board = parse_placement(fen, fields[0])?;
    for color in [Color::White, Color::Black] {
        if board.count(color, PieceType::King) != 1 {
            return Err(invalid(
                fen,
                &format!("{} must have exactly one king", color.to_human()),
            ));
        }
    }

    let turn = match fields.get(1) {
        None => Color::White,
        Some(field) => {
            let mut chars = field.chars();
            match (chars.next().and_then(Color::from_char), chars.next()) {
                (Some(color), None) => color,
                _ => return Err(invalid(fen, "active color must be 'w' or 'b'")),
            }
        }
    };

    let mut rights = parse_castling(fen, fields.get(2).copied().unwrap_or("KQkq"))?;
    rights.set_en_passant_target(parse_en_passant(
        fen,
        fields.get(3).copied().unwrap_or("-"),
        turn,
    )?);

    let halfmove_clock = parse_counter(fen, fields.get(4).copied(), 0)?;
    let fullmove_number = parse_counter(fen, fields.get(5).copied(), 1)?;
    if fullmove_number == 0 {
        return Err(invalid(fen, "fullmove number starts at 1"));
    }

    let state = GameState::from_parts(board, turn, rights, halfmove_clock, fullmove_number);
    debug!(fen, "loaded position");
    Ok(state)
}

fn parse_placement(fen: &str, field: &str) -> Result<Board, ChessError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(invalid(fen, "placement must have 8 ranks"));
    }

    let mut board = Board::empty();
    for (rank, row) in rows.iter().enumerate() {
        let mut file: u8 = 0;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(invalid(fen, &format!("bad empty-square count '{c}'")));
                }
                file += skip as u8;
            } else {
                if file >= 8 {
                    return Err(invalid(fen, &format!("rank {} is too long", 8 - rank)));
                }
                let pos = Position::new_unchecked(rank as u8, file);
                let piece = Piece::from_fen_char(c, pos)
                    .ok_or_else(|| invalid(fen, &format!("unknown piece '{c}'")))?;
                board.set_piece_at(pos, Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(invalid(fen, &format!("rank {} is too long", 8 - rank)));
            }
        }
        if file != 8 {
            return Err(invalid(fen, &format!("rank {} is too short", 8 - rank)));
        }
    }
    Ok(board)
}

/// A missing letter marks that rook as moved; missing both letters of a
/// color marks its king as moved.
fn parse_castling(fen: &str, field: &str) -> Result<SpecialMoveRights, ChessError> {
    let letters: Vec<char> = if field == "-" {
        vec![]
    } else {
        field.chars().collect()
    };
    for (i, c) in letters.iter().enumerate() {
        if !CASTLING_LETTERS.iter().any(|(letter, _, _)| letter == c) || letters[..i].contains(c) {
            return Err(invalid(fen, &format!("bad castling field '{field}'")));
        }
    }

    let mut rights = SpecialMoveRights::new();
    for (letter, color, side) in CASTLING_LETTERS {
        rights.set_rook_moved(color, side, !letters.contains(&letter));
    }
    for color in [Color::White, Color::Black] {
        let any_side = CastleSide::BOTH
            .iter()
            .any(|side| !rights.rook_moved(color, *side));
        rights.set_king_moved(color, !any_side);
    }
    Ok(rights)
}

/// The target must sit on the rank the opponent's pawn just crossed.
fn parse_en_passant(fen: &str, field: &str, turn: Color) -> Result<Option<Position>, ChessError> {
    if field == "-" {
        return Ok(None);
    }
    let square = Position::from_algebraic(field)
        .map_err(|_| invalid(fen, &format!("bad en-passant square '{field}'")))?;
    let mover = turn.other_color();
    let expected_rank = (mover.pawn_starting_rank() as i8 + mover.pawn_direction()) as u8;
    if square.rank() != expected_rank {
        return Err(invalid(fen, &format!("en-passant square '{field}' on the wrong rank")));
    }
    Ok(Some(square))
}

fn parse_counter(fen: &str, field: Option<&str>, default: u32) -> Result<u32, ChessError> {
    match field {
        None => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| invalid(fen, &format!("bad move counter '{text}'"))),
    }
}
