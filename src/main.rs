//! Command-line front end for the rules engine.
//!
//! Usage: cargo run --release -- play e2e4 e7e5 g1f3
//!        cargo run --release -- perft --depth 4 --divide

use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use itertools::Itertools;
use rand::prelude::*;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chess_rules::board::STARTING_POSITION_FEN;
use chess_rules::movegen::expand_promotions;
use chess_rules::perft::{perft, perft_divide};
use chess_rules::{san, token, ChessError, GameState, MoveHistory};

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Legal moves, notation and game results for standard chess")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply move tokens to a position and print the resulting board and FEN
    Fen {
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Move tokens such as e2e4 or e7e8q
        #[arg(long, num_args = 0..)]
        moves: Vec<String>,
    },

    /// List legal moves, for one square or for the side to move
    Moves {
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        #[arg(long)]
        square: Option<String>,
    },

    /// Replay a game from move tokens and print it as PGN
    Play {
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Take back this many moves at the end
        #[arg(long, default_value_t = 0)]
        undo: usize,

        tokens: Vec<String>,
    },

    /// Count move paths to a fixed depth
    Perft {
        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },

    /// Play random legal moves until the game ends
    Random {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 400)]
        max_plies: usize,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("chess_rules=info".parse()?))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Fen { fen, moves } => {
            let (state, _) = MoveHistory::replay(GameState::from_fen(&fen)?, &moves)?;
            print_position(&state);
        }
        Command::Moves { fen, square } => {
            let state = GameState::from_fen(&fen)?;
            let moves = match square {
                Some(square) => state.legal_moves(token::parse_square(&square)?),
                None => state.all_legal_moves(),
            };
            let lines: Vec<String> = expand_promotions(moves)
                .iter()
                .map(|m| san::to_san(&state, m).map(|san| format!("{:<6} {}", token::encode(m), san)))
                .collect::<Result<_, ChessError>>()?;
            println!("{}", lines.iter().join("\n"));
        }
        Command::Play { fen, undo, tokens } => {
            let (mut state, mut history) = MoveHistory::replay(GameState::from_fen(&fen)?, &tokens)?;
            for _ in 0..undo {
                let taken_back = history.undo(&mut state)?;
                println!("took back {}", taken_back);
            }
            println!("{}", history.san_moves()?.iter().join(" "));
            println!();
            println!("{}", history.to_pgn(&state)?);
            println!();
            print_position(&state);
        }
        Command::Perft { depth, fen, divide } => {
            let state = GameState::from_fen(&fen)?;
            let now = Instant::now();
            let nodes = if divide {
                let divided = perft_divide(&state, depth);
                for (m, count) in &divided {
                    println!("{}: {}", m, count);
                }
                divided.iter().map(|(_, count)| count).sum()
            } else {
                perft(&state, depth)
            };
            let elapsed = now.elapsed().as_secs_f32();
            println!("nodes {} (depth {}, {:.3}s)", nodes, depth, elapsed);
        }
        Command::Random { seed, max_plies } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut state = GameState::new();
            let mut history = MoveHistory::new();
            while !state.is_game_over() && history.len() < max_plies {
                let moves = expand_promotions(state.all_legal_moves());
                let m = moves
                    .choose(&mut rng)
                    .ok_or_else(|| eyre!("no legal moves in a running game"))?;
                history.play(&mut state, m)?;
            }
            println!("{}", history.to_pgn(&state)?);
            println!();
            print_position(&state);
        }
    }
    Ok(())
}

fn print_position(state: &GameState) {
    println!("{}", state.board().draw_board());
    println!();
    println!("{}", state.to_fen());
    match state.game_over_type() {
        Some(reason) => {
            let result = state
                .winner()
                .map_or("draw".to_string(), |c| format!("{} wins", c));
            info!(%reason, "game over");
            println!("game over: {} ({})", reason, result);
        }
        None if state.is_in_check() => println!("{} to move, in check", state.turn()),
        None => println!("{} to move", state.turn()),
    }
}
