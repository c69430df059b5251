/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{legal_moves, Board};

/// Counts the number of positions reachable from `board` in exactly `depth`
/// plies.
///
/// The classic move generator validation: known node counts exist for
/// standard positions, and any rules bug shows up as a count mismatch.
///
/// # Example
/// ```
/// # use caissa::*;
/// let board = Board::default();
/// assert_eq!(perft(&board, 1), 20);
/// assert_eq!(perft(&board, 2), 400);
/// ```
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    // Recursively accumulate the nodes from the remaining depths
    legal_moves(board, board.side_to_move())
        .into_iter()
        .fold(0, |nodes, mv| {
            nodes + perft(&board.with_move_made(mv), depth - 1)
        })
}

/// Performs a split perft, printing the number of nodes reachable after each
/// move available from the root, and returning the total.
pub fn splitperft(board: &Board, depth: usize) -> u64 {
    let mut total_nodes = 0;

    for mv in legal_moves(board, board.side_to_move()) {
        let nodes = if depth > 0 {
            perft(&board.with_move_made(mv), depth - 1)
        } else {
            1
        };
        println!("{mv}\t{nodes}");
        total_nodes += nodes;
    }

    total_nodes
}
