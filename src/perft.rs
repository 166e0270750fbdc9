use rayon::prelude::*;

use crate::game::GameState;
use crate::movegen::{expand_promotions, MoveGenerator};
use crate::types::Move;

/// Number of move paths of length `depth` from `state`.
///
/// Each promotion counts once per piece kind, which is what published perft
/// tables expect.
pub fn perft(state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = expand_promotions(MoveGenerator::new(state).collect());
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in moves {
        let mut next = state.clone();
        if next.apply_move(&m).is_ok() {
            nodes += perft(&next, depth - 1);
        }
    }
    nodes
}

/// Per-root-move node counts, one rayon task per root move. Sorted by the
/// move's coordinate form, which makes it easy to diff against other engines.
pub fn perft_divide(state: &GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return vec![];
    }
    let moves = expand_promotions(MoveGenerator::new(state).collect());
    let mut divided: Vec<(Move, u64)> = moves
        .into_par_iter()
        .filter_map(|m| {
            let mut next = state.clone();
            next.apply_move(&m).ok()?;
            Some((m, perft(&next, depth - 1)))
        })
        .collect();
    divided.sort_by_key(|(m, _)| m.to_algebraic());
    divided
}

/// Perft from starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// | Depth | Nodes     | Captures | E.p. | Castles | Promotions | Checks | Checkmates |
/// | ----- | --------- | -------- | ---- | ------- | ---------- | ------ | ---------- |
/// | 0     | 1         | 0        | 0    | 0       | 0          | 0      | 0          |
/// | 1     | 20        | 0        | 0    | 0       | 0          | 0      | 0          |
/// | 2     | 400       | 0        | 0    | 0       | 0          | 0      | 0          |
/// | 3     | 8,902     | 34       | 0    | 0       | 0          | 12     | 0          |
/// | 4     | 197,281   | 1576     | 0    | 0       | 0          | 469    | 8          |
/// | 5     | 4,865,609 | 82,719   | 258  | 0       | 0          | 27,351 | 347        |
pub fn expected_start_node_count(depth: u8) -> Option<u64> {
    match depth {
        0 => Some(1),
        1 => Some(20),
        2 => Some(400),
        3 => Some(8902),
        4 => Some(197_281),
        5 => Some(4_865_609),
        6 => Some(119_060_324),
        _ => None,
    }
}
