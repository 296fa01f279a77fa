//! The make/unmake state machine.
//!
//! `apply` and `unapply` mutate both board representations in lockstep and
//! maintain the auxiliary counters. Because every move carries its pre-move
//! snapshot of the halfmove clock, castling mask, and en-passant target,
//! `unapply` restores the position exactly from the move record alone.

use gambit_core::{Kind, Move, Piece, Side, Square};

use crate::Board;

/// The rook's from/to squares for a castling king move.
fn castle_rook_squares(side: Side, king_to: Square) -> (Square, Square) {
    match (side, king_to) {
        (Side::White, Square::G1) => (Square::H1, Square::F1),
        (Side::White, Square::C1) => (Square::A1, Square::D1),
        (Side::Black, Square::G8) => (Square::H8, Square::F8),
        (Side::Black, Square::C8) => (Square::A8, Square::D8),
        _ => unreachable!("castle destination must be a king's two-square step"),
    }
}

/// The square the captured pawn actually occupies for a capture move:
/// the destination, except en passant where the victim sits one rank
/// behind the target.
fn capture_square(m: Move) -> Square {
    if m.is_en_passant() {
        m.to
            .offset(-m.piece.side().forward())
            .expect("en-passant victim is on the board")
    } else {
        m.to
    }
}

impl Board {
    /// Applies a move. The mover must be the side to move.
    pub fn apply(&mut self, m: Move) {
        let side = m.piece.side();
        let enemy = side.opposite();
        debug_assert!(side == self.side_to_move);

        self.remove(m.piece, m.from);

        let mut enemy_touched = false;
        if m.is_capture() {
            self.remove(m.capture, capture_square(m));
            enemy_touched = true;
        }

        let placed = if m.is_promotion() { m.promotion } else { m.piece };
        self.place(placed, m.to);

        if m.castle {
            let rook = Piece::new(side, Kind::Rook);
            let (rook_from, rook_to) = castle_rook_squares(side, m.to);
            self.remove(rook, rook_from);
            self.place(rook, rook_to);
        }

        self.recompute_side(side);
        if enemy_touched {
            self.recompute_side(enemy);
        }

        if side == Side::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = enemy;

        if m.is_capture() || m.piece.kind() == Some(Kind::Pawn) {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.update_castling_rights(m, side);

        // A double pawn push leaves its skipped square as the en-passant
        // target; every other move clears it.
        let step = m.to.index() as i8 - m.from.index() as i8;
        self.en_passant = if m.piece.kind() == Some(Kind::Pawn) && step.abs() == 16 {
            m.from.offset(step / 2)
        } else {
            None
        };

        debug_assert!(self.is_consistent(), "apply broke the dual representation");
    }

    /// Undoes a move made by [`apply`](Board::apply), restoring the exact
    /// prior state from the move record.
    pub fn unapply(&mut self, m: Move) {
        let side = m.piece.side();
        let enemy = side.opposite();

        let placed = if m.is_promotion() { m.promotion } else { m.piece };
        self.remove(placed, m.to);
        self.place(m.piece, m.from);

        if m.castle {
            let rook = Piece::new(side, Kind::Rook);
            let (rook_from, rook_to) = castle_rook_squares(side, m.to);
            self.remove(rook, rook_to);
            self.place(rook, rook_from);
        }

        let mut enemy_touched = false;
        if m.is_capture() {
            self.place(m.capture, capture_square(m));
            enemy_touched = true;
        }

        self.recompute_side(side);
        if enemy_touched {
            self.recompute_side(enemy);
        }

        if side == Side::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = side;

        self.halfmove_clock = m.prior_halfmoves;
        self.castling = m.prior_castling;
        self.en_passant = m.prior_en_passant;

        debug_assert!(self.is_consistent(), "unapply broke the dual representation");
    }

    /// Clears castling bits for king moves, rook moves off their home
    /// squares, and captures into a rook home square.
    fn update_castling_rights(&mut self, m: Move, side: Side) {
        if self.castling.raw() == 0 {
            return;
        }

        match m.piece.kind() {
            Some(Kind::King) => self.castling.clear_side(side),
            Some(Kind::Rook) => match m.from {
                Square::H1 => self.castling.clear_kingside(Side::White),
                Square::A1 => self.castling.clear_queenside(Side::White),
                Square::H8 => self.castling.clear_kingside(Side::Black),
                Square::A8 => self.castling.clear_queenside(Side::Black),
                _ => {}
            },
            _ => {}
        }

        match m.to {
            Square::H1 => self.castling.clear_kingside(Side::White),
            Square::A1 => self.castling.clear_queenside(Side::White),
            Square::H8 => self.castling.clear_kingside(Side::Black),
            Square::A8 => self.castling.clear_queenside(Side::Black),
            _ => {}
        }
    }
}
