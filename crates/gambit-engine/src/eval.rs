//! Static evaluation.
//!
//! Material plus pawn-structure penalties plus mobility, scored per side and
//! subtracted. The returned score is always White-positive: greater is
//! better for White, and the search maximizes or minimizes accordingly.

use gambit_core::{Kind, Side};

use crate::attacks::pawn_captures;
use crate::movegen::pseudo_legal_moves;
use crate::{Bitboard, Board};

const KING_WEIGHT: f64 = 2000.0;
const QUEEN_WEIGHT: f64 = 90.0;
const ROOK_WEIGHT: f64 = 50.0;
const BISHOP_WEIGHT: f64 = 30.0;
const KNIGHT_WEIGHT: f64 = 30.0;
const PAWN_WEIGHT: f64 = 10.0;

/// Penalty applied per doubled, blocked, or isolated pawn.
const PAWN_STRUCTURE_PENALTY: f64 = 5.0;

/// Bonus per pseudo-legal move available to the scored side.
const MOBILITY_WEIGHT: f64 = 1.0;

/// Evaluates the position, White-positive.
pub fn evaluate(board: &Board) -> f64 {
    side_score(board, Side::White) - side_score(board, Side::Black)
}

fn side_score(board: &Board, side: Side) -> f64 {
    let mut score = KING_WEIGHT * f64::from(board.pieces_of(side, Kind::King).count())
        + QUEEN_WEIGHT * f64::from(board.pieces_of(side, Kind::Queen).count())
        + ROOK_WEIGHT * f64::from(board.pieces_of(side, Kind::Rook).count())
        + BISHOP_WEIGHT * f64::from(board.pieces_of(side, Kind::Bishop).count())
        + KNIGHT_WEIGHT * f64::from(board.pieces_of(side, Kind::Knight).count())
        + PAWN_WEIGHT * f64::from(board.pieces_of(side, Kind::Pawn).count());

    let faults = doubled_pawns(board, side) + blocked_pawns(board, side) + isolated_pawns(board, side);
    score -= PAWN_STRUCTURE_PENALTY * f64::from(faults);

    score += MOBILITY_WEIGHT * pseudo_legal_moves(board, side).len() as f64;

    score
}

/// Pawns with a same-color pawn directly in front of them.
fn doubled_pawns(board: &Board, side: Side) -> u32 {
    let pawns = board.pieces_of(side, Kind::Pawn);
    let behind_own = match side {
        Side::White => pawns & pawns.south(),
        Side::Black => pawns & pawns.north(),
    };
    behind_own.count()
}

/// Pawns whose advance square is occupied and whose diagonal-forward
/// squares hold no enemy piece to capture.
fn blocked_pawns(board: &Board, side: Side) -> u32 {
    let occupied = board.occupied();
    let enemy = board.side_pieces(side.opposite());
    let mut blocked = 0;
    for pawn in board.pieces_of(side, Kind::Pawn) {
        let front = pawn.offset(side.forward());
        let advance_blocked = front.is_some_and(|f| occupied.contains(f));
        if advance_blocked && (pawn_captures(pawn, side) & enemy).is_empty() {
            blocked += 1;
        }
    }
    blocked
}

/// Pawns with no same-color pawn on either neighboring file.
fn isolated_pawns(board: &Board, side: Side) -> u32 {
    let pawns = board.pieces_of(side, Kind::Pawn);
    let mut isolated = 0;
    for pawn in pawns {
        let file = pawn.file();
        let mut neighbors = Bitboard::EMPTY;
        if file > 0 {
            neighbors |= Bitboard::file(file - 1);
        }
        if file < 7 {
            neighbors |= Bitboard::file(file + 1);
        }
        if (pawns & neighbors).is_empty() {
            isolated += 1;
        }
    }
    isolated
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_core::Square;

    /// Builds the side-swapped vertical mirror of a position.
    fn mirrored(board: &Board) -> Board {
        let mut flipped = Board::empty();
        for index in 0..64u8 {
            let piece = board.squares[index as usize];
            if piece.is_piece() {
                let sq = Square::from_index(index ^ 56).expect("index < 64");
                flipped.squares[sq.index() as usize] = piece.flipped();
            }
        }
        flipped.side_to_move = board.side_to_move.opposite();
        flipped.halfmove_clock = board.halfmove_clock;
        flipped.fullmove_number = board.fullmove_number;
        flipped.rebuild_bitboards();
        flipped
    }

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(evaluate(&Board::startpos()), 0.0);
    }

    #[test]
    fn mirrored_positions_negate() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w - - 2 3",
            "8/2p5/3p4/1P5r/1R3p1k/8/4P1P1/K7 w - - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            let flipped = mirrored(&board);
            assert_eq!(
                evaluate(&board),
                -evaluate(&flipped),
                "mirror symmetry broken for {}",
                fen
            );
        }
    }

    #[test]
    fn material_advantage_counts() {
        // White has an extra queen.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(evaluate(&board) > 80.0);

        // Black has an extra rook.
        let board = Board::from_fen("3rk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&board) < -40.0);
    }

    #[test]
    fn doubled_pawns_detected() {
        let board = Board::from_fen("4k3/8/8/8/8/4P3/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(doubled_pawns(&board, Side::White), 1);
        assert_eq!(doubled_pawns(&board, Side::Black), 0);

        let board = Board::from_fen("4k3/4p3/4p3/4p3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(doubled_pawns(&board, Side::Black), 2);
    }

    #[test]
    fn blocked_pawns_detected() {
        // White pawn e4 faces a black pawn on e5 with nothing to capture.
        let board = Board::from_fen("4k3/8/8/4p3/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(blocked_pawns(&board, Side::White), 1);
        assert_eq!(blocked_pawns(&board, Side::Black), 1);

        // With a capture available the pawn is not counted as blocked.
        let board = Board::from_fen("4k3/8/8/3pp3/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(blocked_pawns(&board, Side::White), 0);
    }

    #[test]
    fn isolated_pawns_detected() {
        // The a- and h-pawns have no neighbors; e- and d-pawns do.
        let board = Board::from_fen("4k3/8/8/8/8/8/P2PP2P/4K3 w - - 0 1").unwrap();
        assert_eq!(isolated_pawns(&board, Side::White), 2);
    }

    #[test]
    fn mobility_rewards_open_pieces() {
        // Identical material; White's rook is free while Black's rook is
        // boxed into the corner.
        let open = Board::from_fen("rk6/pp6/8/8/8/8/6PP/6KR w - - 0 1").unwrap();
        let score = evaluate(&open);
        assert!(score.abs() > 0.0);
    }
}
