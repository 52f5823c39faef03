//! Perft runner - count legal move tree nodes from the starting position
//!
//! Usage: cargo run --release --bin perft -- 5 --moves e2e4 e7e5 --divide
//!
//! Set RUST_LOG=debug (or trace, for every move) to see the library's logging.

use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;

use magic_movegen::perft::{divide, perft, perft_parallel};
use magic_movegen::{generate_legal_moves, parse_move, Position, Tables};

#[derive(Parser, Debug)]
#[command(name = "perft")]
#[command(about = "Count leaf nodes of the legal move tree")]
struct Args {
    /// Depth in plies
    depth: u8,

    /// Moves in coordinate notation (e.g. e2e4) played from the starting position first
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,

    /// Print the node count below every root move
    #[arg(long)]
    divide: bool,

    /// Split the root moves across all cores
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let args = Args::parse();

    let tables = Tables::new();
    let mut position = Position::new();
    for text in &args.moves {
        let legal = generate_legal_moves(&position, &tables);
        let mv = parse_move(&legal, text)
            .map_err(|e| eyre!("{e} after {} moves", position.undo_log().len()))?;
        position.apply_move(mv);
    }

    let start = Instant::now();
    let nodes = if args.divide {
        let split = divide(&mut position, &tables, args.depth);
        for (mv, count) in split.iter().sorted_by_key(|(mv, _)| mv.to_string()) {
            println!("{mv}: {count}");
        }
        println!();
        split.iter().map(|(_, count)| count).sum()
    } else if args.parallel {
        perft_parallel(&position, &tables, args.depth)
    } else {
        perft(&mut position, &tables, args.depth)
    };
    let elapsed = start.elapsed();

    let knps = if elapsed.as_millis() > 0 {
        nodes as u128 / elapsed.as_millis()
    } else {
        0
    };
    println!("Nodes searched: {nodes}");
    println!("Time: {} ms ({} knps)", elapsed.as_millis(), knps);
    Ok(())
}
