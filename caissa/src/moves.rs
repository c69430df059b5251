/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use caissa_types::{Piece, Square, MAX_NUM_MOVES};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// A single move: a piece travelling from one square to another.
///
/// Moves are plain value objects produced fresh by each generation call.
/// They do not mutate anything themselves, and they carry no explicit
/// capture/castle/promotion markers; those side effects are resolved from
/// board context when the move is applied with [`Board::make_move`].
///
/// [`Board::make_move`]: crate::Board::make_move
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
}

impl Move {
    /// Creates a new [`Move`] for `piece` from `from` to `to`.
    #[inline(always)]
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self { from, to, piece }
    }

    /// Fetches the source [`Square`] of this move.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination [`Square`] of this move.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the moving [`Piece`].
    #[inline(always)]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// The UCI representation of this move, such as `e2e4`.
    ///
    /// # Example
    /// ```
    /// # use caissa::*;
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn);
    /// assert_eq!(Move::new(Square::E2, Square::E4, pawn).to_uci(), "e2e4");
    /// ```
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.from, self.to, self.piece)
    }
}
