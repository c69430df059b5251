/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::Result;

use caissa_types::{Color, Square};

use super::{
    find_best_move, is_king_in_check, legal_moves, Board, Move, MoveList, DEFAULT_SEARCH_DEPTH,
};

/// Terminal classification of a position, evaluated for the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    /// The side to move has at least one legal move; play continues.
    Ongoing,

    /// The side to move is in check with no legal moves; `winner` delivered it.
    Checkmate { winner: Color },

    /// The side to move is not in check but has no legal moves; a draw.
    Stalemate,

    /// A king is missing from the board entirely. Only reachable from an
    /// illegal position, handled explicitly instead of failing deeper in the
    /// attack detector.
    KingCaptured { winner: Color },
}

/// High-level abstraction of a game of chess.
///
/// A [`Game`] owns its [`Board`] value outright: generation, search, and any
/// rendering synchronization all read the same explicit state, with no
/// ambient "one true board" hiding elsewhere. It answers an interactive
/// caller's questions (is this move legal, apply it, is the game over, what
/// would the engine play) strictly synchronously. Illegal requests are
/// refused with `false`, never with an error.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Game {
    board: Board,
}

impl Game {
    /// Creates a new [`Game`] from the provided [`Board`].
    #[inline(always)]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    /// Creates a new [`Game`] from the provided FEN string.
    #[inline(always)]
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Board::from_fen(fen)?))
    }

    /// Fetches the internal [`Board`] of this game.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Mutably fetches the internal [`Board`] of this game.
    #[inline(always)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Restores the starting position, discarding the game in progress.
    #[inline(always)]
    pub fn reset(&mut self) {
        self.board = Board::default();
    }

    /// Generates all legal moves for the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> MoveList {
        legal_moves(&self.board, self.board.side_to_move())
    }

    /// Returns `true` if the side to move is currently in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        is_king_in_check(&self.board, self.board.side_to_move())
    }

    /// Returns `true` if moving from `from` to `to` is legal for the side to
    /// move.
    ///
    /// An empty source square, an opponent's piece, or a destination the
    /// piece cannot legally reach all simply answer `false`.
    ///
    /// # Example
    /// ```
    /// # use caissa::{Game, Square};
    /// let game = Game::default();
    /// assert!(game.is_move_legal(Square::G1, Square::F3));
    /// assert!(!game.is_move_legal(Square::G1, Square::G3));
    /// assert!(!game.is_move_legal(Square::E4, Square::E5));
    /// ```
    #[inline(always)]
    pub fn is_move_legal(&self, from: Square, to: Square) -> bool {
        self.find_legal(from, to).is_some()
    }

    /// Commits the move from `from` to `to` if it is legal for the side to
    /// move, permanently mutating the game.
    ///
    /// Returns `false`, changing nothing, when no such legal move exists.
    /// There is no undo for a committed move; only the search uses the
    /// reversible [`Board::make_move`]/[`Board::unmake_move`] pair.
    pub fn try_move(&mut self, from: Square, to: Square) -> bool {
        match self.find_legal(from, to) {
            Some(mv) => {
                self.board.make_move(mv);
                true
            }
            None => false,
        }
    }

    /// Classifies the current position for the side to move.
    ///
    /// A missing king is checked first and bypasses move generation; it
    /// outranks every other verdict since the position is already broken.
    pub fn status(&self) -> GameStatus {
        let side = self.board.side_to_move();

        if self.board.king_square(side).is_none() {
            return GameStatus::KingCaptured {
                winner: side.opponent(),
            };
        }
        if self.board.king_square(side.opponent()).is_none() {
            return GameStatus::KingCaptured { winner: side };
        }

        if !self.legal_moves().is_empty() {
            return GameStatus::Ongoing;
        }

        if self.is_in_check() {
            GameStatus::Checkmate {
                winner: side.opponent(),
            }
        } else {
            GameStatus::Stalemate
        }
    }

    /// The winning [`Color`], if the game has been decided.
    #[inline(always)]
    pub fn winner(&self) -> Option<Color> {
        match self.status() {
            GameStatus::Checkmate { winner } | GameStatus::KingCaptured { winner } => Some(winner),
            _ => None,
        }
    }

    /// Returns `true` if the game has ended in a draw.
    #[inline(always)]
    pub fn is_draw(&self) -> bool {
        self.status() == GameStatus::Stalemate
    }

    /// The engine's preferred move for the side to move, searched at
    /// [`DEFAULT_SEARCH_DEPTH`].
    ///
    /// Returns `None` when the side to move has no legal moves; check before
    /// applying.
    #[inline(always)]
    pub fn best_move(&self) -> Option<Move> {
        find_best_move(&self.board, self.board.side_to_move(), DEFAULT_SEARCH_DEPTH)
    }

    /// Restores the board placement from a [`Board::state_string`] snapshot.
    ///
    /// A string shorter than 64 characters is rejected without mutation,
    /// returning `false`.
    #[inline(always)]
    pub fn set_state_string(&mut self, state: &str) -> bool {
        self.board.set_state_string(state)
    }

    /// Finds the legal move matching `from` and `to`, if one exists.
    fn find_legal(&self, from: Square, to: Square) -> Option<Move> {
        self.legal_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to)
    }
}

impl Deref for Game {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl Default for Game {
    #[inline(always)]
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.board)
    }
}
