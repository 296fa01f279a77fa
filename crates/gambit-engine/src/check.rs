//! Check detection.
//!
//! Asks "what attacks this square?" by casting outward from it: put a
//! hypothetical piece of each kind on the square and see whether its reach
//! hits an enemy piece of the matching kind. Pawns use the querying side's
//! own capture pattern, because the question is who attacks *me*.

use gambit_core::{Kind, Side, Square};

use crate::attacks::{bishop_reach, king_reach, knight_reach, pawn_captures, rook_reach};
use crate::Board;

/// Returns true if `by` attacks `sq`.
pub fn attacked(board: &Board, sq: Square, by: Side) -> bool {
    let occupied = board.occupied();

    if (pawn_captures(sq, by.opposite()) & board.pieces_of(by, Kind::Pawn)).any() {
        return true;
    }

    if (knight_reach(sq) & board.pieces_of(by, Kind::Knight)).any() {
        return true;
    }

    if (king_reach(sq) & board.pieces_of(by, Kind::King)).any() {
        return true;
    }

    let diagonal = board.pieces_of(by, Kind::Bishop) | board.pieces_of(by, Kind::Queen);
    if (bishop_reach(sq, occupied) & diagonal).any() {
        return true;
    }

    let orthogonal = board.pieces_of(by, Kind::Rook) | board.pieces_of(by, Kind::Queen);
    if (rook_reach(sq, occupied) & orthogonal).any() {
        return true;
    }

    false
}

/// Returns true if `side`'s king is attacked.
pub fn in_check(board: &Board, side: Side) -> bool {
    match board.king_square(side) {
        Some(king) => attacked(board, king, side.opposite()),
        None => false,
    }
}
