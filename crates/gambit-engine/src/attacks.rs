//! Attack set generation.
//!
//! Knight, king, and pawn-capture reaches come from compile-time lookup
//! tables indexed by square; slider reaches are blocker-masked ray crosses
//! over the live occupancy. All tables are built once and read-only, so
//! concurrent searches share them without synchronization.

use gambit_core::{Side, Square};

use crate::bitboard::{diagonal_rays, orthogonal_rays, Bitboard};

const KNIGHT_REACH: [Bitboard; 64] = compute_knight_reach();
const KING_REACH: [Bitboard; 64] = compute_king_reach();
const PAWN_CAPTURES: [[Bitboard; 64]; 2] = compute_pawn_captures();

/// Returns the up-to-eight knight jump targets from a square.
#[inline]
pub fn knight_reach(sq: Square) -> Bitboard {
    KNIGHT_REACH[sq.index() as usize]
}

/// Returns the up-to-eight king step targets from a square.
#[inline]
pub fn king_reach(sq: Square) -> Bitboard {
    KING_REACH[sq.index() as usize]
}

/// Returns the two diagonal squares a pawn of `side` on `sq` attacks.
#[inline]
pub fn pawn_captures(sq: Square, side: Side) -> Bitboard {
    PAWN_CAPTURES[side.index()][sq.index() as usize]
}

/// Returns the squares a rook on `sq` attacks through `occupied`.
#[inline]
pub fn rook_reach(sq: Square, occupied: Bitboard) -> Bitboard {
    orthogonal_rays(sq, occupied)
}

/// Returns the squares a bishop on `sq` attacks through `occupied`.
#[inline]
pub fn bishop_reach(sq: Square, occupied: Bitboard) -> Bitboard {
    diagonal_rays(sq, occupied)
}

/// Returns the squares a queen on `sq` attacks through `occupied`.
#[inline]
pub fn queen_reach(sq: Square, occupied: Bitboard) -> Bitboard {
    orthogonal_rays(sq, occupied) | diagonal_rays(sq, occupied)
}

/// The four independent pawn target sets for one side. Each bitboard holds
/// destination squares; the generator recovers origins by the side's step
/// deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PawnTargets {
    /// Capture targets toward the queenside (file a).
    pub west: Bitboard,
    /// Capture targets toward the kingside (file h).
    pub east: Bitboard,
    /// Single-advance targets (destination empty).
    pub single: Bitboard,
    /// Double-advance targets (intermediate and destination empty, origin on
    /// the side's pawn rank).
    pub double: Bitboard,
}

/// Computes the pawn target sets for `side`.
///
/// Black's sets are produced by rotating pawns, occupancy, and enemy pieces
/// 180 degrees, running the White arithmetic, and rotating the results back.
/// Rotation swaps the queenside and kingside diagonals, so the west and east
/// sets trade places on the way out.
pub fn pawn_targets(
    pawns: Bitboard,
    occupied: Bitboard,
    enemy: Bitboard,
    side: Side,
) -> PawnTargets {
    match side {
        Side::White => white_pawn_targets(pawns, occupied, enemy),
        Side::Black => {
            let rotated = white_pawn_targets(
                pawns.rotate_180(),
                occupied.rotate_180(),
                enemy.rotate_180(),
            );
            PawnTargets {
                west: rotated.east.rotate_180(),
                east: rotated.west.rotate_180(),
                single: rotated.single.rotate_180(),
                double: rotated.double.rotate_180(),
            }
        }
    }
}

fn white_pawn_targets(pawns: Bitboard, occupied: Bitboard, enemy: Bitboard) -> PawnTargets {
    let empty = !occupied;
    let single = pawns.north() & empty;
    PawnTargets {
        west: pawns.north_west() & enemy,
        east: pawns.north_east() & enemy,
        single,
        double: (pawns & Bitboard::RANK_2).north().north() & empty & single.north(),
    }
}

const fn compute_knight_reach() -> [Bitboard; 64] {
    let mut reach = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut bits = 0u64;

        if rank < 6 && file < 7 {
            bits |= 1u64 << (sq + 17);
        }
        if rank < 6 && file > 0 {
            bits |= 1u64 << (sq + 15);
        }
        if rank > 1 && file < 7 {
            bits |= 1u64 << (sq - 15);
        }
        if rank > 1 && file > 0 {
            bits |= 1u64 << (sq - 17);
        }
        if rank < 7 && file < 6 {
            bits |= 1u64 << (sq + 10);
        }
        if rank < 7 && file > 1 {
            bits |= 1u64 << (sq + 6);
        }
        if rank > 0 && file < 6 {
            bits |= 1u64 << (sq - 6);
        }
        if rank > 0 && file > 1 {
            bits |= 1u64 << (sq - 10);
        }

        reach[sq as usize] = Bitboard(bits);
        sq += 1;
    }

    reach
}

const fn compute_king_reach() -> [Bitboard; 64] {
    let mut reach = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut bits = 0u64;

        if rank < 7 {
            bits |= 1u64 << (sq + 8);
        }
        if rank > 0 {
            bits |= 1u64 << (sq - 8);
        }
        if file < 7 {
            bits |= 1u64 << (sq + 1);
        }
        if file > 0 {
            bits |= 1u64 << (sq - 1);
        }
        if rank < 7 && file < 7 {
            bits |= 1u64 << (sq + 9);
        }
        if rank < 7 && file > 0 {
            bits |= 1u64 << (sq + 7);
        }
        if rank > 0 && file < 7 {
            bits |= 1u64 << (sq - 7);
        }
        if rank > 0 && file > 0 {
            bits |= 1u64 << (sq - 9);
        }

        reach[sq as usize] = Bitboard(bits);
        sq += 1;
    }

    reach
}

const fn compute_pawn_captures() -> [[Bitboard; 64]; 2] {
    let mut reach = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;

        let mut white = 0u64;
        if rank < 7 && file < 7 {
            white |= 1u64 << (sq + 9);
        }
        if rank < 7 && file > 0 {
            white |= 1u64 << (sq + 7);
        }
        reach[0][sq as usize] = Bitboard(white);

        let mut black = 0u64;
        if rank > 0 && file < 7 {
            black |= 1u64 << (sq - 7);
        }
        if rank > 0 && file > 0 {
            black |= 1u64 << (sq - 9);
        }
        reach[1][sq as usize] = Bitboard(black);

        sq += 1;
    }

    reach
}
