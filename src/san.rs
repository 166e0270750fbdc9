//! Standard Algebraic Notation.

use crate::error::ChessError;
use crate::game::GameState;
use crate::movegen::{expand_promotions, MoveGenerator};
use crate::outcome::GameOverType;
use crate::types::{Move, MoveType, Piece, PieceType, Position};

const EN_PASSANT_SUFFIX: &str = " e.p.";

/// SAN of `mv` played from `before`, e.g. `Nbd2`, `exd6`, `e8=Q+`, `O-O`.
pub fn to_san(before: &GameState, mv: &Move) -> Result<String, ChessError> {
    to_san_with_ep(before, mv, false)
}

/// Like [`to_san`], optionally marking en-passant captures with ` e.p.`.
pub fn to_san_with_ep(
    before: &GameState,
    mv: &Move,
    include_ep_suffix: bool,
) -> Result<String, ChessError> {
    let board = before.board();
    let (from, to) = (mv.from(), mv.to());
    let mover = *board.piece_at(from).ok_or(ChessError::NoPieceAt(from))?;

    let mut san = String::new();
    if mover.piece_type == PieceType::King && from.file().abs_diff(to.file()) == 2 {
        san.push_str(if to.file() > from.file() { "O-O" } else { "O-O-O" });
    } else {
        let is_en_passant = mv.move_type() == MoveType::EnPassant;
        let is_capture = is_en_passant || !board.is_empty(to);

        if mover.piece_type == PieceType::Pawn {
            if is_capture {
                san.push(from.file_char());
            }
        } else {
            san.push(mover.piece_type.to_char());
            san.push_str(&disambiguation(before, &mover, to));
        }
        if is_capture {
            san.push('x');
        }
        san.push_str(&to.to_algebraic());

        if mv.move_type() == MoveType::Promotion {
            let kind = mv.promotion_piece().ok_or(ChessError::PromotionPieceMissing)?;
            san.push('=');
            san.push(kind.to_char());
        }
        if include_ep_suffix && is_en_passant {
            san.push_str(EN_PASSANT_SUFFIX);
        }
    }

    let mut after = before.clone();
    after.apply_move(mv)?;
    if after.game_over_type() == Some(GameOverType::Checkmate) {
        san.push('#');
    } else if after.is_in_check() {
        san.push('+');
    }
    Ok(san)
}

/// Origin file, rank or both, when another piece of the same kind could
/// also reach `to`.
fn disambiguation(state: &GameState, mover: &Piece, to: Position) -> String {
    let from = mover.position;
    let rivals: Vec<Position> = state
        .board()
        .pieces()
        .filter(|p| {
            p.color == mover.color && p.piece_type == mover.piece_type && p.position != from
        })
        .filter(|p| state.legal_moves(p.position).iter().any(|m| m.to() == to))
        .map(|p| p.position)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|p| p.file() != from.file()) {
        from.file_char().to_string()
    } else if rivals.iter().all(|p| p.rank() != from.rank()) {
        from.rank_char().to_string()
    } else {
        from.to_algebraic()
    }
}

/// Drop the parts of a SAN string that carry no move information.
fn normalize(san: &str) -> String {
    let trimmed = san.trim();
    let trimmed = trimmed.strip_suffix(EN_PASSANT_SUFFIX).unwrap_or(trimmed);
    let trimmed = trimmed.trim_end_matches(&['+', '#', '!', '?'][..]);
    let trimmed = trimmed.strip_suffix(EN_PASSANT_SUFFIX).unwrap_or(trimmed);
    trimmed.replace('0', "O")
}

/// Find the legal move whose SAN reads `text`.
///
/// Check marks, annotation glyphs, ` e.p.` and zero-for-O castling are
/// accepted; everything else has to match exactly.
pub fn from_san(state: &GameState, text: &str) -> Result<Move, ChessError> {
    let wanted = normalize(text);
    if wanted.is_empty() {
        return Err(ChessError::InvalidSan(text.to_string()));
    }
    let candidates = expand_promotions(MoveGenerator::new(state).collect());
    for mv in candidates {
        if normalize(&to_san(state, &mv)?) == wanted {
            return Ok(mv);
        }
    }
    Err(ChessError::InvalidSan(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn san_of(fen: &str, from: &str, to: &str, promotion: Option<PieceType>) -> String {
        let state = GameState::from_fen(fen).unwrap();
        let mut mv = state.resolve(pos(from), pos(to)).unwrap();
        if let Some(kind) = promotion {
            mv = mv.with_promotion(kind);
        }
        to_san(&state, &mv).unwrap()
    }

    #[test]
    fn plain_moves() {
        let start = crate::board::STARTING_POSITION_FEN;
        assert_eq!(san_of(start, "e2", "e4", None), "e4");
        assert_eq!(san_of(start, "g1", "f3", None), "Nf3");
    }

    #[test]
    fn captures() {
        let fen = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";
        assert_eq!(san_of(fen, "e4", "d5", None), "exd5");
        let fen = "4k3/8/8/3p4/8/8/8/3QK3 w - - 0 1";
        assert_eq!(san_of(fen, "d1", "d5", None), "Qxd5");
    }

    #[test]
    fn castling() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(san_of(fen, "e1", "g1", None), "O-O");
        assert_eq!(san_of(fen, "e1", "c1", None), "O-O-O");
    }

    #[test]
    fn disambiguation_by_file_rank_and_both() {
        // knights on b1 and f1 both reach d2
        let fen = "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1";
        assert_eq!(san_of(fen, "b1", "d2", None), "Nbd2");
        // rooks on a1 and a5 share the file
        let fen = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
        assert_eq!(san_of(fen, "a1", "a3", None), "R1a3");
        // queens on a1, a3 and c1 all reach b2
        let fen = "4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1";
        assert_eq!(san_of(fen, "a1", "b2", None), "Qa1b2");
    }

    #[test]
    fn promotion_and_check_marks() {
        let fen = "8/P7/8/8/8/8/8/k3K3 w - - 0 1";
        assert_eq!(san_of(fen, "a7", "a8", Some(PieceType::Queen)), "a8=Q+");
        assert_eq!(san_of(fen, "a7", "a8", Some(PieceType::Knight)), "a8=N");
    }

    #[test]
    fn pending_promotion_has_no_san() {
        let state = GameState::from_fen("8/P7/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        let pending = state.resolve(pos("a7"), pos("a8")).unwrap();
        assert_eq!(to_san(&state, &pending), Err(ChessError::PromotionPieceMissing));
    }

    #[test]
    fn checkmate_mark() {
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        assert_eq!(san_of(fen, "a1", "a8", None), "Ra8#");
    }

    #[test]
    fn check_that_runs_out_the_fifty_moves_is_marked() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 99 80";
        assert_eq!(san_of(fen, "a1", "a8", None), "Ra8#");
        let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 20 80";
        assert_eq!(san_of(fen, "a1", "a8", None), "Ra8+");
    }

    #[test]
    fn en_passant_suffix_is_optional() {
        let state = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let ep = state.resolve(pos("e5"), pos("d6")).unwrap();
        assert_eq!(to_san(&state, &ep).unwrap(), "exd6");
        assert_eq!(to_san_with_ep(&state, &ep, true).unwrap(), "exd6 e.p.");
    }

    #[test]
    fn parse_san_back_to_moves() {
        let state = GameState::new();
        assert_eq!(
            from_san(&state, "Nf3").unwrap(),
            Move::new(pos("g1"), pos("f3"), MoveType::Normal)
        );
        assert!(from_san(&state, "Nf4").is_err());
        assert!(from_san(&state, "").is_err());

        let state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(from_san(&state, "0-0-0").unwrap().is_castle());

        let state = GameState::from_fen("8/P7/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        assert_eq!(
            from_san(&state, "a8=R").unwrap(),
            Move::promotion(pos("a7"), pos("a8"), PieceType::Rook)
        );
        assert_eq!(
            from_san(&state, "a8=Q+").unwrap().promotion_piece(),
            Some(PieceType::Queen)
        );

        let state = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(
            from_san(&state, "exd6 e.p.").unwrap().move_type(),
            MoveType::EnPassant
        );
    }
}
