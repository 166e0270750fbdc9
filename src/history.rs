use chrono::prelude::*;
use tracing::debug;

use crate::board::STARTING_POSITION_FEN;
use crate::error::ChessError;
use crate::game::GameState;
use crate::san;
use crate::token;
use crate::types::{Color, Move};

/// A played move together with the state just before it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    mv: Move,
    before: GameState,
}

/// Undo/redo stacks for one game.
///
/// Recording a new move throws away whatever could have been redone.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mv: Move, before: GameState) {
        self.undo_stack.push(Entry { mv, before });
        self.redo_stack.clear();
    }

    /// Snapshot, apply and record in one step.
    pub fn play(&mut self, state: &mut GameState, mv: &Move) -> Result<(), ChessError> {
        let before = state.snapshot();
        state.apply_move(mv)?;
        self.record(*mv, before);
        Ok(())
    }

    /// Put `state` back to where it was before the last move.
    pub fn undo(&mut self, state: &mut GameState) -> Result<Move, ChessError> {
        let entry = self.undo_stack.pop().ok_or(ChessError::NothingToUndo)?;
        state.restore_from(entry.before.clone());
        let mv = entry.mv;
        self.redo_stack.push(entry);
        debug!(mv = %mv, "undo");
        Ok(mv)
    }

    /// Play the last undone move again. On failure the entry stays redoable.
    pub fn redo(&mut self, state: &mut GameState) -> Result<Move, ChessError> {
        let entry = self.redo_stack.pop().ok_or(ChessError::NothingToRedo)?;
        if let Err(err) = state.apply_move(&entry.mv) {
            self.redo_stack.push(entry);
            return Err(err);
        }
        let mv = entry.mv;
        self.undo_stack.push(entry);
        debug!(mv = %mv, "redo");
        Ok(mv)
    }

    pub fn peek_last_move(&self) -> Option<&Move> {
        self.undo_stack.last().map(|e| &e.mv)
    }

    pub fn peek_redo_move(&self) -> Option<&Move> {
        self.redo_stack.last().map(|e| &e.mv)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Played moves, earliest first.
    pub fn moves(&self) -> Vec<Move> {
        self.undo_stack.iter().map(|e| e.mv).collect()
    }

    /// Token log suitable for [`MoveHistory::replay`].
    pub fn tokens(&self) -> Vec<String> {
        self.undo_stack.iter().map(|e| token::encode(&e.mv)).collect()
    }

    /// SAN of every played move, earliest first.
    pub fn san_moves(&self) -> Result<Vec<String>, ChessError> {
        self.undo_stack
            .iter()
            .map(|e| san::to_san(&e.before, &e.mv))
            .collect()
    }

    /// Rebuild a game by decoding and playing each token from `start`.
    pub fn replay<S: AsRef<str>>(
        start: GameState,
        tokens: &[S],
    ) -> Result<(GameState, MoveHistory), ChessError> {
        let mut state = start;
        let mut history = MoveHistory::new();
        for token in tokens {
            let mv = token::decode(token.as_ref(), &state)?;
            history.play(&mut state, &mv)?;
        }
        debug!(moves = history.len(), "replayed game");
        Ok((state, history))
    }

    /// PGN of the game so far; `current` is the state after the last move.
    pub fn to_pgn(&self, current: &GameState) -> Result<String, ChessError> {
        let start = self.undo_stack.first().map_or(current, |e| &e.before);
        let start_fen = start.to_fen();
        let result = pgn_result(current);

        let mut pgn = String::new();
        pgn.push_str("[Event \"Casual game\"]\n");
        pgn.push_str("[Site \"?\"]\n");
        pgn.push_str(format!("[Date \"{}\"]\n", Local::now().format("%Y.%m.%d")).as_str());
        pgn.push_str("[Round \"1\"]\n");
        pgn.push_str("[White \"?\"]\n");
        pgn.push_str("[Black \"?\"]\n");
        pgn.push_str(format!("[Result \"{}\"]\n", result).as_str());
        if start_fen != STARTING_POSITION_FEN {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(format!("[FEN \"{}\"]\n", start_fen).as_str());
        }
        pgn.push('\n');

        for (i, entry) in self.undo_stack.iter().enumerate() {
            let number = entry.before.fullmove_number();
            match entry.before.turn() {
                Color::White => pgn.push_str(&format!("{}. ", number)),
                Color::Black if i == 0 => pgn.push_str(&format!("{}... ", number)),
                Color::Black => {}
            }
            pgn.push_str(&san::to_san(&entry.before, &entry.mv)?);
            pgn.push(' ');
        }
        pgn.push_str(result);
        Ok(pgn)
    }
}

fn pgn_result(state: &GameState) -> &'static str {
    match state.game_over_type() {
        None => "*",
        Some(_) => match state.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        },
    }
}
