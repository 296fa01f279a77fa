//! Zobrist hashing for transposition keys.
//!
//! Every (piece code, square) pair, the side to move, each castling bit, and
//! each en-passant file gets a fixed pseudo-random 64-bit key; a position's
//! key is the XOR of the keys of its features. Two move orders reaching the
//! same position therefore produce the same key.

use gambit_core::{Piece, Side};

use crate::Board;

/// Key tables, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Keys indexed by [piece code][square]. Codes that are not real pieces
    /// keep keys too; they are simply never used.
    pieces: [[u64; 64]; Piece::CODES],
    /// XORed in when Black is to move.
    black_to_move: u64,
    /// Keys for the four castling-rights bits.
    castling: [u64; 4],
    /// Keys for the en-passant target file.
    en_passant: [u64; 8],
}

impl ZobristKeys {
    const fn new() -> Self {
        // xorshift64; const-evaluable and plenty random for hashing.
        const fn next(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[0u64; 64]; Piece::CODES];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut code = 0;
        while code < Piece::CODES {
            let mut square = 0;
            while square < 64 {
                state = next(state);
                pieces[code][square] = state;
                square += 1;
            }
            code += 1;
        }

        state = next(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }
}

static KEYS: ZobristKeys = ZobristKeys::new();

impl Board {
    /// Computes the position's transposition key from scratch.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = 0u64;

        for index in 0..64u8 {
            let piece = self.squares[index as usize];
            if piece.is_piece() {
                hash ^= KEYS.pieces[piece.code() as usize][index as usize];
            }
        }

        if self.side_to_move == Side::Black {
            hash ^= KEYS.black_to_move;
        }

        let rights = self.castling.raw();
        let mut bit = 0;
        while bit < 4 {
            if rights >> bit & 1 == 1 {
                hash ^= KEYS.castling[bit as usize];
            }
            bit += 1;
        }

        if let Some(ep) = self.en_passant {
            hash ^= KEYS.en_passant[ep.file() as usize];
        }

        hash
    }
}
