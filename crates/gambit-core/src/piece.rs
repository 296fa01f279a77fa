//! Piece codes.
//!
//! A piece is a 4-bit code: bit 3 carries the side, bits 0-2 carry the kind.
//! The empty square is code 0. This layout makes "flip side" a single XOR
//! with `0b1000` and lets the board index its bitboard table directly by
//! piece code.

use crate::Side;

/// The six piece kinds. The discriminants are the low three bits of the
/// piece code; 0 is reserved for the empty square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl Kind {
    /// All kinds in code order.
    pub const ALL: [Kind; 6] = [
        Kind::Pawn,
        Kind::Knight,
        Kind::Bishop,
        Kind::Rook,
        Kind::Queen,
        Kind::King,
    ];

    /// The four pieces a pawn may promote to.
    pub const PROMOTIONS: [Kind; 4] = [Kind::Knight, Kind::Bishop, Kind::Rook, Kind::Queen];

    /// Creates a kind from the low three bits of a piece code.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Kind::Pawn),
            2 => Some(Kind::Knight),
            3 => Some(Kind::Bishop),
            4 => Some(Kind::Rook),
            5 => Some(Kind::Queen),
            6 => Some(Kind::King),
            _ => None,
        }
    }

    /// Returns the lowercase letter used in move notation for promotions.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Kind::Pawn => 'p',
            Kind::Knight => 'n',
            Kind::Bishop => 'b',
            Kind::Rook => 'r',
            Kind::Queen => 'q',
            Kind::King => 'k',
        }
    }

    /// Parses a promotion letter.
    #[inline]
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'p' | 'P' => Some(Kind::Pawn),
            'n' | 'N' => Some(Kind::Knight),
            'b' | 'B' => Some(Kind::Bishop),
            'r' | 'R' => Some(Kind::Rook),
            'q' | 'Q' => Some(Kind::Queen),
            'k' | 'K' => Some(Kind::King),
            _ => None,
        }
    }
}

/// A 4-bit piece code: `side | kind`, with 0 for the empty square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    /// The empty square.
    pub const EMPTY: Piece = Piece(0);

    /// Number of distinct codes; sizes the board's bitboard table.
    pub const CODES: usize = 16;

    /// Creates a piece from side and kind.
    #[inline]
    pub const fn new(side: Side, kind: Kind) -> Self {
        Piece(side.code() | kind as u8)
    }

    /// Returns the raw 4-bit code.
    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Returns true if this is the empty square.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if a piece is present.
    #[inline]
    pub const fn is_piece(self) -> bool {
        self.0 != 0
    }

    /// Returns the side of a non-empty piece.
    #[inline]
    pub const fn side(self) -> Side {
        debug_assert!(self.0 != 0);
        if self.0 & 0b1000 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    /// Returns the kind, or `None` for the empty square.
    #[inline]
    pub const fn kind(self) -> Option<Kind> {
        Kind::from_code(self.0 & 0b0111)
    }

    /// Returns true if this piece is `side`'s piece of the given kind.
    #[inline]
    pub const fn is(self, side: Side, kind: Kind) -> bool {
        self.0 == side.code() | kind as u8
    }

    /// Returns the same kind for the opposite side. Meaningless for EMPTY.
    #[inline]
    pub const fn flipped(self) -> Piece {
        Piece(self.0 ^ 0b1000)
    }

    /// Returns the FEN character: uppercase for White, lowercase for Black.
    pub fn to_fen_char(self) -> Option<char> {
        let kind = self.kind()?;
        let c = kind.letter();
        Some(match self.side() {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        })
    }

    /// Parses a FEN piece character.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        match Kind::from_letter(c) {
            Some(kind) => Some(Piece::new(side, kind)),
            None => None,
        }
    }
}

impl std::fmt::Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_fen_char() {
            Some(c) => write!(f, "Piece({})", c),
            None => write!(f, "Piece(-)"),
        }
    }
}
