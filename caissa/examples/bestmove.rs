/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use clap::Parser;

use caissa::{evaluate, find_best_move, Board, DEFAULT_SEARCH_DEPTH};

/// Search a position for the best move at a fixed depth.
#[derive(Debug, Parser)]
struct Cli {
    /// The FEN string of the position to search (defaults to the starting position).
    #[arg(required = false)]
    fen: Option<String>,

    /// Search depth, in plies.
    #[arg(short, long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    depth: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let board = if let Some(fen) = &args.fen {
        Board::from_fen(fen)?
    } else {
        Board::default()
    };
    let side = board.side_to_move();

    println!("{board}\n");
    println!(
        "Material balance for {side}: {:+} centipawns",
        evaluate(&board, side)
    );

    let now = Instant::now();
    match find_best_move(&board, side, args.depth) {
        Some(best) => println!(
            "Best move for {side} at depth {}: {best} ({:.1?})",
            args.depth,
            now.elapsed()
        ),
        None => println!("No legal moves for {side}."),
    }

    Ok(())
}
