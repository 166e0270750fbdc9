use tracing::debug;

use crate::board::Board;
use crate::error::ChessError;
use crate::fen;
use crate::movegen::MoveGenerator;
use crate::outcome::{self, GameOverType};
use crate::rules;
use crate::san;
use crate::special::SpecialMoveRights;
use crate::types::{Color, Move, MoveType, PieceType, Position};

/// One game in progress.
///
/// Owns the board together with everything the board alone cannot tell:
/// whose turn it is, castling and en-passant rights, the clocks, the
/// history of position keys and the resignation/draw flags. The board is
/// only ever changed by [`GameState::apply_move`]; legality probes work on
/// copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Color,
    rights: SpecialMoveRights,
    halfmove_clock: u32,
    fullmove_number: u32,
    position_history: Vec<String>,
    resigned: Option<Color>,
    draw_agreed: bool,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// Standard starting position, white to move.
    pub fn new() -> GameState {
        GameState::from_parts(Board::new(), Color::White, SpecialMoveRights::new(), 0, 1)
    }

    pub fn from_fen(fen: &str) -> Result<GameState, ChessError> {
        fen::from_fen(fen)
    }

    /// History starts out holding the key of this very position.
    pub(crate) fn from_parts(
        board: Board,
        turn: Color,
        rights: SpecialMoveRights,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> GameState {
        let mut state = GameState {
            board,
            turn,
            rights,
            halfmove_clock,
            fullmove_number,
            position_history: vec![],
            resigned: None,
            draw_agreed: false,
        };
        state.position_history.push(fen::position_key(&state));
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn rights(&self) -> &SpecialMoveRights {
        &self.rights
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Position keys, oldest first, ending with the current one.
    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    pub fn resigned_color(&self) -> Option<Color> {
        self.resigned
    }

    pub fn draw_agreed(&self) -> bool {
        self.draw_agreed
    }

    pub fn resign(&mut self, color: Color) {
        debug!(%color, "resigned");
        self.resigned = Some(color);
    }

    pub fn set_draw_agreed(&mut self, agreed: bool) {
        self.draw_agreed = agreed;
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.board.find_king(color)
    }

    /// Commit `mv`. The move is expected to come from the legal move list
    /// (or [`MoveGenerator::resolve`]); legality is not checked again here.
    ///
    /// Fails without touching the state if `from` is empty or if a
    /// promotion has no piece, or a piece a pawn cannot become.
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), ChessError> {
        let mover = *self
            .board
            .piece_at(mv.from())
            .ok_or(ChessError::NoPieceAt(mv.from()))?;
        if mv.move_type() == MoveType::Promotion {
            match mv.promotion_piece() {
                None => return Err(ChessError::PromotionPieceMissing),
                Some(kind) if !kind.can_promote_to() => {
                    return Err(ChessError::InvalidPromotion(kind))
                }
                Some(_) => {}
            }
        }

        let resets_clock = mover.piece_type == PieceType::Pawn
            || !self.board.is_empty(mv.to())
            || mv.move_type() == MoveType::EnPassant;
        if resets_clock {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.turn == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        // rights read the mover before the board changes
        self.rights.after_move_applied(&self.board, mv);
        self.board.execute_move(mv);
        self.turn = self.turn.other_color();
        self.position_history.push(fen::position_key(self));

        debug!(
            mv = %mv,
            piece = mover.piece_type.to_human(),
            turn = %self.turn,
            "applied move"
        );
        Ok(())
    }

    pub fn legal_moves(&self, from: Position) -> Vec<Move> {
        MoveGenerator::new(self).legal_moves(from)
    }

    pub fn all_legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new(self).collect()
    }

    pub fn resolve(&self, from: Position, to: Position) -> Option<Move> {
        MoveGenerator::new(self).resolve(from, to)
    }

    /// Is the side to move in check?
    pub fn is_in_check(&self) -> bool {
        rules::is_in_check(&self.board, self.turn)
    }

    pub fn is_game_over(&self) -> bool {
        outcome::is_game_over(self)
    }

    pub fn game_over_type(&self) -> Option<GameOverType> {
        outcome::game_over_type(self)
    }

    pub fn winner(&self) -> Option<Color> {
        outcome::winner(self)
    }

    /// Deep copy for undo history.
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    /// Replace everything with `snapshot`. Whether the snapshot comes from
    /// this game is up to the caller.
    pub fn restore_from(&mut self, snapshot: GameState) {
        *self = snapshot;
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(self)
    }

    /// SAN of `mv`, which must be legal in this position.
    pub fn to_san(&self, mv: &Move) -> Result<String, ChessError> {
        san::to_san(self, mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::special::CastleSide;
    use pretty_assertions::assert_eq;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn play(state: &mut GameState, from: &str, to: &str) {
        let mv = state.resolve(pos(from), pos(to)).unwrap();
        state.apply_move(&mv).unwrap();
    }

    #[test]
    fn clocks_follow_the_moves() {
        let mut state = GameState::new();
        play(&mut state, "g1", "f3");
        assert_eq!((state.halfmove_clock(), state.fullmove_number()), (1, 1));
        play(&mut state, "g8", "f6");
        assert_eq!((state.halfmove_clock(), state.fullmove_number()), (2, 2));
        play(&mut state, "e2", "e4");
        assert_eq!((state.halfmove_clock(), state.fullmove_number()), (0, 2));
        play(&mut state, "f6", "e4");
        assert_eq!((state.halfmove_clock(), state.fullmove_number()), (0, 3));
        assert_eq!(state.turn(), Color::White);
    }

    #[test]
    fn clocks_stop_at_their_limit() {
        let mut state =
            GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 4294967295 4294967295").unwrap();
        play(&mut state, "e8", "d8");
        assert_eq!(state.halfmove_clock(), u32::MAX);
        assert_eq!(state.fullmove_number(), u32::MAX);
    }

    #[test]
    fn history_grows_by_one_per_move() {
        let mut state = GameState::new();
        assert_eq!(state.position_history().len(), 1);
        play(&mut state, "e2", "e4");
        play(&mut state, "e7", "e5");
        assert_eq!(state.position_history().len(), 3);
        assert_eq!(
            state.position_history().last().unwrap(),
            &fen::position_key(&state)
        );
    }

    #[test]
    fn probes_do_not_touch_history() {
        let state = GameState::new();
        let before = state.clone();
        let _ = state.all_legal_moves();
        let _ = state.is_game_over();
        assert_eq!(state, before);
    }

    #[test]
    fn pending_promotion_is_rejected() {
        let mut state = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let pending = state.resolve(pos("a7"), pos("a8")).unwrap();
        let before = state.clone();
        assert_eq!(
            state.apply_move(&pending),
            Err(ChessError::PromotionPieceMissing)
        );
        assert_eq!(state, before);

        assert_eq!(
            state.apply_move(&pending.with_promotion(PieceType::King)),
            Err(ChessError::InvalidPromotion(PieceType::King))
        );

        state
            .apply_move(&pending.with_promotion(PieceType::Queen))
            .unwrap();
        assert_eq!(
            state.board().piece_at(pos("a8")).unwrap().piece_type,
            PieceType::Queen
        );
        assert!(state.board().is_empty(pos("a7")));
    }

    #[test]
    fn empty_origin_is_rejected() {
        let mut state = GameState::new();
        let mv = Move::new(pos("e4"), pos("e5"), MoveType::Normal);
        assert_eq!(state.apply_move(&mv), Err(ChessError::NoPieceAt(pos("e4"))));
    }

    #[test]
    fn castling_moves_the_rook_and_spends_rights() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut state, "e1", "g1");
        assert_eq!(
            state.board().piece_at(pos("f1")).unwrap().piece_type,
            PieceType::Rook
        );
        assert!(state.board().is_empty(pos("h1")));
        assert!(state.rights().king_moved(Color::White));
        assert!(state.to_fen().starts_with("r3k2r/8/8/8/8/8/8/R4RK1 b kq -"));

        play(&mut state, "e8", "c8");
        assert_eq!(
            state.board().piece_at(pos("d8")).unwrap().piece_type,
            PieceType::Rook
        );
        assert!(!state.rights().may_castle(Color::Black, CastleSide::Queenside));
        assert!(!state.rights().may_castle(Color::White, CastleSide::Queenside));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut state = GameState::new();
        play(&mut state, "e2", "e4");
        play(&mut state, "a7", "a6");
        play(&mut state, "e4", "e5");
        play(&mut state, "d7", "d5");
        assert_eq!(state.rights().en_passant_target(), Some(pos("d6")));

        let ep = state.resolve(pos("e5"), pos("d6")).unwrap();
        assert_eq!(ep.move_type(), MoveType::EnPassant);
        state.apply_move(&ep).unwrap();
        assert!(state.board().is_empty(pos("d5")));
        assert_eq!(state.rights().en_passant_target(), None);
        assert_eq!(state.halfmove_clock(), 0);
    }

    #[test]
    fn snapshot_and_restore() {
        let mut state = GameState::new();
        let snapshot = state.snapshot();
        play(&mut state, "d2", "d4");
        state.resign(Color::Black);
        assert_ne!(state, snapshot);
        state.restore_from(snapshot.clone());
        assert_eq!(state, snapshot);
        assert_eq!(state.resigned_color(), None);
    }

    #[test]
    fn king_position_tracks_the_king() {
        let mut state = GameState::new();
        play(&mut state, "e2", "e4");
        play(&mut state, "e7", "e5");
        play(&mut state, "e1", "e2");
        assert_eq!(state.king_position(Color::White), Some(pos("e2")));
        assert_eq!(state.king_position(Color::Black), Some(pos("e8")));
    }
}
