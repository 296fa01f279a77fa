//! The opening book consumed by the search.
//!
//! The book is an opaque map from (board array, side to move) to candidate
//! moves, populated once by an external ingest step and read-only afterward.
//! Entries deliberately store only coordinates: the same position can be
//! reached with different clocks or rights than the archived game had, so
//! the search re-resolves a picked entry against the live position.

use std::collections::HashMap;

use gambit_core::{Kind, Piece, Side, Square};
use rand::Rng;

use crate::Board;

/// A book entry: just enough to identify the move in the live position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    pub from: Square,
    pub to: Square,
    /// Promotion kind, if the archived move promoted.
    pub promotion: Option<Kind>,
}

type BookKey = ([Piece; 64], Side);

/// Position -> candidate moves, with duplicates suppressed.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: HashMap<BookKey, Vec<BookMove>>,
}

impl OpeningBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the book has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of known positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Records a candidate move for the given position. Duplicate moves for
    /// the same position are ignored.
    pub fn insert(&mut self, board: &Board, m: BookMove) {
        let candidates = self
            .entries
            .entry((board.squares, board.side_to_move))
            .or_default();
        if !candidates.contains(&m) {
            candidates.push(m);
        }
    }

    /// Returns the candidate moves for a position, if any.
    pub fn lookup(&self, board: &Board) -> Option<&[BookMove]> {
        self.entries
            .get(&(board.squares, board.side_to_move))
            .map(|candidates| candidates.as_slice())
    }

    /// Picks a uniformly random candidate for the position.
    pub fn pick<R: Rng>(&self, board: &Board, rng: &mut R) -> Option<BookMove> {
        let candidates = self.lookup(board)?;
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn entry(from: &str, to: &str) -> BookMove {
        BookMove {
            from: sq(from),
            to: sq(to),
            promotion: None,
        }
    }

    #[test]
    fn empty_book_knows_nothing() {
        let book = OpeningBook::new();
        assert!(book.is_empty());
        assert!(book.lookup(&Board::startpos()).is_none());
    }

    #[test]
    fn insert_and_lookup() {
        let board = Board::startpos();
        let mut book = OpeningBook::new();
        book.insert(&board, entry("e2", "e4"));
        book.insert(&board, entry("d2", "d4"));
        assert_eq!(book.len(), 1);
        assert_eq!(book.lookup(&board).unwrap().len(), 2);
    }

    #[test]
    fn duplicates_are_suppressed() {
        let board = Board::startpos();
        let mut book = OpeningBook::new();
        book.insert(&board, entry("e2", "e4"));
        book.insert(&board, entry("e2", "e4"));
        assert_eq!(book.lookup(&board).unwrap().len(), 1);
    }

    #[test]
    fn key_includes_side_to_move() {
        let white = Board::startpos();
        let mut black = white.clone();
        black.side_to_move = Side::Black;

        let mut book = OpeningBook::new();
        book.insert(&white, entry("e2", "e4"));
        assert!(book.lookup(&white).is_some());
        assert!(book.lookup(&black).is_none());
    }

    #[test]
    fn pick_only_returns_candidates() {
        let board = Board::startpos();
        let mut book = OpeningBook::new();
        let candidates = [entry("e2", "e4"), entry("d2", "d4"), entry("g1", "f3")];
        for c in candidates {
            book.insert(&board, c);
        }

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let picked = book.pick(&board, &mut rng).unwrap();
            assert!(candidates.contains(&picked));
        }
    }
}
