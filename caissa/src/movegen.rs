/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use caissa_types::{Color, Piece, PieceKind, Rank, Square};

use super::{Board, Move, MoveList};

/// Most destination squares any single piece can attack (a queen in the open).
const MAX_PIECE_TARGETS: usize = 27;

/// Fixed-capacity scratch list of destination squares for one piece.
type TargetList = ArrayVec<Square, MAX_PIECE_TARGETS>;

/// Jump offsets `(file, rank)` for a knight.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Step offsets `(file, rank)` for a king.
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Ray directions for a rook.
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Ray directions for a bishop.
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Ray directions for a queen.
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// The rank direction `color`'s pawns advance in.
#[inline(always)]
const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Every square attacked by `piece` standing on `from`.
///
/// This is the single per-piece movement dispatch shared by the attack
/// detector and the move generator, so the rules cannot drift between the
/// two call sites.
///
/// Note: for Pawns, this yields only the two forward diagonals, never pushes.
/// Attack targets decide whether a square is safe for the enemy King; if
/// pushes were included, the King could never step in front of a pawn.
/// Ray pieces include the first blocker of either color (a defended piece
/// still makes its square unsafe), and the King's range is always its 8
/// neighbors regardless of check status.
pub(crate) fn attack_targets(board: &Board, piece: Piece, from: Square) -> TargetList {
    let mut targets = TargetList::new();

    match piece.kind() {
        PieceKind::Pawn => {
            let forward = pawn_direction(piece.color());
            for file_delta in [-1, 1] {
                if let Some(to) = from.offset(file_delta, forward) {
                    targets.push(to);
                }
            }
        }
        PieceKind::Knight => leaper_targets(from, &KNIGHT_OFFSETS, &mut targets),
        PieceKind::King => leaper_targets(from, &KING_OFFSETS, &mut targets),
        PieceKind::Bishop => slider_targets(board, from, &BISHOP_DIRECTIONS, &mut targets),
        PieceKind::Rook => slider_targets(board, from, &ROOK_DIRECTIONS, &mut targets),
        PieceKind::Queen => slider_targets(board, from, &QUEEN_DIRECTIONS, &mut targets),
    }

    targets
}

/// Collects the in-bounds destinations of a fixed-offset (leaping) piece.
fn leaper_targets(from: Square, offsets: &[(i8, i8)], targets: &mut TargetList) {
    for &(file_delta, rank_delta) in offsets {
        if let Some(to) = from.offset(file_delta, rank_delta) {
            targets.push(to);
        }
    }
}

/// Walks each ray until it leaves the board or hits a blocker.
///
/// The blocker's square is included; whether it is a capture or a defended
/// friend is the caller's concern.
fn slider_targets(board: &Board, from: Square, directions: &[(i8, i8)], targets: &mut TargetList) {
    for &(file_delta, rank_delta) in directions {
        let mut square = from;
        while let Some(to) = square.offset(file_delta, rank_delta) {
            targets.push(to);
            if board.has(to) {
                break;
            }
            square = to;
        }
    }
}

/// Returns `true` iff any piece of `by` has `square` among its attack targets.
///
/// This is deliberately an *unfiltered* query: it asks whether a piece could
/// land on `square` by its movement rules alone, ignoring whether doing so
/// would expose its own king. Filtering here would recurse straight back
/// into check detection.
///
/// # Example
/// ```
/// # use caissa::*;
/// let board = Board::default();
/// // The knight on b1 covers c3; nobody reaches e5 yet.
/// assert!(is_square_attacked(&board, Square::C3, Color::White));
/// assert!(!is_square_attacked(&board, Square::E5, Color::White));
/// ```
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .iter()
        .filter(|(_, piece)| piece.color() == by)
        .any(|(from, piece)| attack_targets(board, piece, from).contains(&square))
}

/// Returns `true` if `color`'s king currently stands on a square attacked by
/// the opponent.
///
/// A board with no king of `color` is already illegal; this reports "not in
/// check" for it and leaves the verdict to the game-end classifier.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(square) => is_square_attacked(board, square, color.opponent()),
        None => false,
    }
}

/// Generates all pseudo-legal moves for `color` into `moves`.
///
/// Pseudo-legal means obeying piece movement rules only; the output may
/// contain moves that leave the mover's own king in check. Use
/// [`legal_moves`] for the filtered list.
pub fn pseudo_legal_moves(board: &Board, color: Color, moves: &mut MoveList) {
    for (from, piece) in board.iter() {
        if piece.color() != color {
            continue;
        }

        match piece.kind() {
            PieceKind::Pawn => pawn_moves(board, piece, from, moves),
            PieceKind::King => {
                normal_moves(board, piece, from, moves);
                castling_moves(board, color, from, moves);
            }
            _ => normal_moves(board, piece, from, moves),
        }
    }
}

/// Attack targets filtered to non-friendly destinations.
fn normal_moves(board: &Board, piece: Piece, from: Square, moves: &mut MoveList) {
    for to in attack_targets(board, piece, from) {
        if board.color_at(to) != Some(piece.color()) {
            moves.push(Move::new(from, to, piece));
        }
    }
}

/// Pawn moves: diagonal captures (including en passant) plus the forward
/// pushes, which are not attacks and so live outside the shared dispatch.
fn pawn_moves(board: &Board, piece: Piece, from: Square, moves: &mut MoveList) {
    let color = piece.color();

    // A diagonal is a move only when it captures: either an enemy piece on
    // the destination, or the pawn that just double-pushed past the (empty)
    // en passant target.
    for to in attack_targets(board, piece, from) {
        let takes_enemy = board.color_at(to) == Some(color.opponent());
        let takes_en_passant = Some(to) == board.ep_square() && !board.has(to);
        if takes_enemy || takes_en_passant {
            moves.push(Move::new(from, to, piece));
        }
    }

    // Single push onto an empty square; double push from the pawn rank when
    // both the stepping-stone and the destination are empty.
    let Some(single) = from.forward_by(color, 1) else {
        return;
    };
    if board.has(single) {
        return;
    }
    moves.push(Move::new(from, single, piece));

    if from.rank() == Rank::second(color) {
        if let Some(double) = from.forward_by(color, 2) {
            if !board.has(double) {
                moves.push(Move::new(from, double, piece));
            }
        }
    }
}

/// Castling candidates for the king on `from`.
///
/// A castle is offered when the corresponding rights flag is set, the king
/// stands on its home square, every square between king and rook corner is
/// empty, the king's start, passing, and landing squares are all unattacked,
/// and a friendly rook actually occupies the corner. The rights flag alone is
/// not proof of the rook: rights survive the rook being captured at home, so
/// the presence re-check is what keeps the empty-corner castle off the list.
fn castling_moves(board: &Board, color: Color, from: Square, moves: &mut MoveList) {
    if from != Square::E1.rank_relative_to(color) {
        return;
    }

    let rights = board.castling_rights_for(color);
    let by = color.opponent();
    let king = Piece::new(color, PieceKind::King);
    let rook = Piece::new(color, PieceKind::Rook);

    if rights.short() && board.piece_at(Square::H1.rank_relative_to(color)) == Some(rook) {
        let passing = Square::F1.rank_relative_to(color);
        let landing = Square::G1.rank_relative_to(color);

        if !board.has(passing)
            && !board.has(landing)
            && !is_square_attacked(board, from, by)
            && !is_square_attacked(board, passing, by)
            && !is_square_attacked(board, landing, by)
        {
            moves.push(Move::new(from, landing, king));
        }
    }

    if rights.long() && board.piece_at(Square::A1.rank_relative_to(color)) == Some(rook) {
        let passing = Square::D1.rank_relative_to(color);
        let landing = Square::C1.rank_relative_to(color);
        // The rook passes over b1/b8, so it must be empty too, though the
        // king never touches it and it may be attacked.
        let rook_path = Square::B1.rank_relative_to(color);

        if !board.has(passing)
            && !board.has(landing)
            && !board.has(rook_path)
            && !is_square_attacked(board, from, by)
            && !is_square_attacked(board, passing, by)
            && !is_square_attacked(board, landing, by)
        {
            moves.push(Move::new(from, landing, king));
        }
    }
}

/// Generates all fully legal moves for `color`: pseudo-legal candidates that
/// do not leave their own king attacked.
///
/// Each candidate is vetted by simulation: apply it to a scratch copy, ask
/// [`is_king_in_check`], revert, and keep the survivors. No pin or check-ray
/// precomputation; the simulation *is* the filter, and it dominates the cost
/// of a generation call.
///
/// # Example
/// ```
/// # use caissa::*;
/// let board = Board::default();
/// assert_eq!(legal_moves(&board, Color::White).len(), 20);
/// ```
pub fn legal_moves(board: &Board, color: Color) -> MoveList {
    let mut candidates = MoveList::new();
    pseudo_legal_moves(board, color, &mut candidates);

    let mut sim = *board;
    let mut moves = MoveList::new();
    for mv in candidates {
        let undo = sim.make_move(mv);
        if !is_king_in_check(&sim, color) {
            moves.push(mv);
        }
        sim.unmake_move(mv, undo);
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_move(moves: &MoveList, from: Square, to: Square) -> bool {
        moves.iter().any(|mv| mv.from() == from && mv.to() == to)
    }

    #[test]
    fn twenty_legal_moves_from_the_starting_position() {
        let board = Board::default();
        assert_eq!(legal_moves(&board, Color::White).len(), 20);
        assert_eq!(legal_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn lone_kings_are_not_in_check() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!is_king_in_check(&board, Color::White));
        assert!(!is_king_in_check(&board, Color::Black));
    }

    #[test]
    fn adjacent_kings_attack_each_other_without_crashing() {
        // Illegal position, but the detector must still answer.
        let board = Board::from_fen("8/8/8/8/8/4k3/4K3/8 w - - 0 1").unwrap();
        assert!(is_king_in_check(&board, Color::White));
        assert!(is_king_in_check(&board, Color::Black));
    }

    #[test]
    fn kingless_board_reports_no_check() {
        let board = Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!is_king_in_check(&board, Color::Black));
    }

    #[test]
    fn pawns_attack_diagonally_but_never_forward() {
        let board = Board::from_fen("8/8/8/8/8/4p3/8/8 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, Square::D2, Color::Black));
        assert!(is_square_attacked(&board, Square::F2, Color::Black));
        assert!(!is_square_attacked(&board, Square::E2, Color::Black));
    }

    #[test]
    fn sliders_stop_at_blockers_but_attack_them() {
        let board = Board::from_fen("8/8/8/8/1R2p3/8/8/8 w - - 0 1").unwrap();
        // The rook reaches the black pawn's square but not past it.
        assert!(is_square_attacked(&board, Square::E4, Color::White));
        assert!(!is_square_attacked(&board, Square::F4, Color::White));
        // A defended friendly square still counts as attacked.
        let board = Board::from_fen("8/8/8/8/1R2P3/8/8/8 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, Square::E4, Color::White));
    }

    #[test]
    fn en_passant_capture_is_generated_and_removes_the_passed_pawn() {
        let mut board = Board::from_fen("k7/8/8/8/4p3/8/3P4/K7 w - - 0 1").unwrap();
        board.make_move(Move::new(
            Square::D2,
            Square::D4,
            board.piece_at(Square::D2).unwrap(),
        ));
        assert_eq!(board.ep_square(), Some(Square::D3));

        let moves = legal_moves(&board, Color::Black);
        assert!(contains_move(&moves, Square::E4, Square::D3));

        let ep = *moves
            .iter()
            .find(|mv| mv.from() == Square::E4 && mv.to() == Square::D3)
            .unwrap();
        board.make_move(ep);

        // The capture lands on the passed-over square and removes the pawn
        // from the square it actually occupied.
        assert!(board.has(Square::D3));
        assert!(!board.has(Square::D4));
    }

    #[test]
    fn en_passant_expires_if_not_taken_immediately() {
        let mut board = Board::from_fen("k7/8/8/8/4p3/8/3P4/K7 w - - 0 1").unwrap();
        board.make_move(Move::new(
            Square::D2,
            Square::D4,
            board.piece_at(Square::D2).unwrap(),
        ));

        // Black declines; the target is gone on their next turn.
        board.make_move(Move::new(
            Square::A8,
            Square::B8,
            board.piece_at(Square::A8).unwrap(),
        ));
        board.make_move(Move::new(
            Square::A1,
            Square::B1,
            board.piece_at(Square::A1).unwrap(),
        ));

        let moves = legal_moves(&board, Color::Black);
        assert!(!contains_move(&moves, Square::E4, Square::D3));
    }

    #[test]
    fn castling_is_offered_with_clear_safe_paths() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(contains_move(&moves, Square::E1, Square::G1));
        assert!(contains_move(&moves, Square::E1, Square::C1));

        let moves = legal_moves(&board, Color::Black);
        assert!(contains_move(&moves, Square::E8, Square::G8));
        assert!(contains_move(&moves, Square::E8, Square::C8));
    }

    #[test]
    fn castling_requires_empty_squares_between_king_and_rook() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4KB1R w K - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(!contains_move(&moves, Square::E1, Square::G1));

        // Queenside: even b1, which the king never crosses, must be empty.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(!contains_move(&moves, Square::E1, Square::C1));
    }

    #[test]
    fn castling_refused_while_passing_through_an_attacked_square() {
        // A rook on f2 covers f1, the square the king would pass through.
        let board = Board::from_fen("4k3/8/8/8/8/8/5r2/4K2R w K - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(!contains_move(&moves, Square::E1, Square::G1));

        // With the attacker gone the same castle is available.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(contains_move(&moves, Square::E1, Square::G1));
    }

    #[test]
    fn castling_refused_while_in_check() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4r3/4K2R w K - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(!contains_move(&moves, Square::E1, Square::G1));
    }

    #[test]
    fn no_castle_offered_without_a_rook_on_the_corner() {
        // Rights say castling is fine; the missing rook says otherwise.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w KQ - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);
        assert!(!contains_move(&moves, Square::E1, Square::G1));
        assert!(!contains_move(&moves, Square::E1, Square::C1));
    }

    #[test]
    fn rights_outlive_a_captured_rook_but_the_castle_stays_off_the_list() {
        // The knight on b8 keeps the capturing rook's check off the king.
        let mut board = Board::from_fen("rn2k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board.make_move(Move::new(
            Square::A1,
            Square::A8,
            board.piece_at(Square::A1).unwrap(),
        ));

        // The historical gap: Black's long flag is still raised.
        assert!(board.castling_rights_for(Color::Black).long());
        // White's own long flag died with the rook leaving a1.
        assert!(!board.castling_rights_for(Color::White).long());

        // Yet with a white rook sitting on a8, no long castle is generated,
        // while the untouched kingside castle still is.
        let moves = legal_moves(&board, Color::Black);
        assert!(!contains_move(&moves, Square::E8, Square::C8));
        assert!(contains_move(&moves, Square::E8, Square::G8));
    }

    #[test]
    fn pinned_pieces_may_not_expose_their_king() {
        // The rook on e2 is pinned to the e-file by the enemy rook on e8.
        let board = Board::from_fen("4r3/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board, Color::White);

        for mv in moves.iter().filter(|mv| mv.from() == Square::E2) {
            assert_eq!(
                mv.to().file(),
                Square::E2.file(),
                "pinned rook escaped the file with {mv}",
            );
        }
        // Along the pin ray it still moves freely, including the capture.
        assert!(contains_move(&moves, Square::E2, Square::E8));
        assert!(contains_move(&moves, Square::E2, Square::E3));
    }

    #[test]
    fn check_evasions_are_the_only_moves_in_check() {
        // Back-rank check: the king must step off the rank or the checker
        // must be blocked/captured.
        let board = Board::from_fen("4k3/8/8/8/8/8/7P/r3K3 w - - 0 1").unwrap();
        assert!(is_king_in_check(&board, Color::White));
        let moves = legal_moves(&board, Color::White);

        assert!(!moves.is_empty());
        for mv in &moves {
            let next = board.with_move_made(*mv);
            assert!(
                !is_king_in_check(&next, Color::White),
                "{mv} leaves the king in check",
            );
        }
        // The h-pawn cannot help against a rank check from a2.
        assert!(!contains_move(&moves, Square::H2, Square::H3));
    }
}
