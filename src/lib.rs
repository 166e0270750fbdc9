pub mod types;
pub mod error;
pub mod board;
pub mod rules;
pub mod special;
pub mod validator;
pub mod movegen;
pub mod game;
pub mod outcome;
pub mod fen;
pub mod san;
pub mod token;
pub mod history;
pub mod perft;

pub use error::ChessError;
pub use game::GameState;
pub use history::MoveHistory;
pub use outcome::GameOverType;
pub use types::{Color, Move, MoveType, Piece, PieceType, Position};
