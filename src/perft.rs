//! Perft: count the leaf nodes of the legal move tree to a fixed depth.
//!
//! Counts are compared against published results to validate move generation and the
//! apply/unmake cycle. Starting position, see https://www.chessprogramming.org/Perft_Results
//!
//! | Depth | Nodes         | Captures    | E.p.    | Castles | Checks     | Checkmates |
//! | ----- | ------------- | ----------- | ------- | ------- | ---------- | ---------- |
//! | 1     | 20            | 0           | 0       | 0       | 0          | 0          |
//! | 2     | 400           | 0           | 0       | 0       | 0          | 0          |
//! | 3     | 8,902         | 34          | 0       | 0       | 12         | 0          |
//! | 4     | 197,281       | 1,576       | 0       | 0       | 469        | 8          |
//! | 5     | 4,865,609     | 82,719      | 258     | 0       | 27,351     | 347        |
//! | 6     | 119,060,324   | 2,812,008   | 5,248   | 0       | 809,099    | 10,828     |
//! | 7     | 3,195,901,860 | 108,329,926 | 319,617 | 883,453 | 33,103,848 | 435,767    |

use log::debug;
use rayon::prelude::*;

use crate::movegen::generate_legal_moves;
use crate::moves::Move;
use crate::position::Position;
use crate::tables::Tables;

/// Number of leaf nodes `depth` plies below `position`.
///
/// Moves are applied and unmade in place, so `position` is left as it was found.
pub fn perft(position: &mut Position, tables: &Tables, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(position, tables);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in moves {
        position.apply_move(m);
        nodes += perft(position, tables, depth - 1);
        position.unmake_move();
    }
    nodes
}

/// Perft split by root move, in generation order
pub fn divide(position: &mut Position, tables: &Tables, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    generate_legal_moves(position, tables)
        .into_iter()
        .map(|m| {
            position.apply_move(m);
            let nodes = perft(position, tables, depth - 1);
            position.unmake_move();
            (m, nodes)
        })
        .collect()
}

/// Like [`perft`], searching the root moves in parallel. Every branch works on its own copy
/// of the position; the tables are shared.
pub fn perft_parallel(position: &Position, tables: &Tables, depth: u8) -> u64 {
    if depth <= 1 {
        return perft(&mut position.clone(), tables, depth);
    }

    let moves = generate_legal_moves(position, tables);
    debug!(
        "perft depth {} over {} root moves on {} threads",
        depth,
        moves.len(),
        rayon::current_num_threads()
    );
    moves
        .par_iter()
        .map(|&m| {
            let mut branch = position.clone();
            branch.apply_move(m);
            perft(&mut branch, tables, depth - 1)
        })
        .sum()
}
