//! The front-end surface.
//!
//! [`Game`] is what the interfaces around the engine talk to: create or
//! inject a position, ask for legal destinations, turn a pair of squares
//! into a validated move, play and undo, detect the end of the game, and
//! request a best move.

use gambit_core::{FenError, Kind, Move, Side, Square};
use rand::Rng;
use thiserror::Error;

use crate::movegen::legal_moves;
use crate::search::{best_move, SearchConfig};
use crate::{Board, OpeningBook};

/// Errors reported to the caller. The game state is unchanged on error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("no moves have been played")]
    NothingToUndo,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Checkmate.
    Win(Side),
    /// No legal moves, king not attacked.
    Stalemate,
    /// Halfmove clock reached 100.
    FiftyMoveRule,
}

/// A playable game: the board plus the moves that led to it.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: Vec<Move>,
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Game {
            board: Board::startpos(),
            history: Vec::new(),
        }
    }

    /// Creates a game from position notation.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Game {
            board: Board::from_fen(fen)?,
            history: Vec::new(),
        })
    }

    /// Replaces the game state from position notation. The move history is
    /// cleared; the bitboards are rebuilt from the injected array.
    pub fn set_from_fen(&mut self, fen: &str) -> Result<(), GameError> {
        self.board = Board::from_fen(fen)?;
        self.history.clear();
        Ok(())
    }

    /// Serializes the current position.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Returns the current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the moves played so far.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns all legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board)
    }

    /// Returns the legal destination squares for the piece on `from`.
    /// Asking about an empty square is an input error.
    pub fn legal_targets(&self, from: Square) -> Result<Vec<Square>, GameError> {
        if self.board.piece_at(from).is_empty() {
            return Err(GameError::EmptySquare(from));
        }
        Ok(self
            .legal_moves()
            .into_iter()
            .filter(|m| m.from == from)
            .map(|m| m.to)
            .collect())
    }

    /// Converts a source/destination pair into the legal move it denotes,
    /// or rejects it. Promotions default to the queen unless a kind is
    /// given.
    pub fn move_from_squares(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Kind>,
    ) -> Result<Move, GameError> {
        if self.board.piece_at(from).is_empty() {
            return Err(GameError::EmptySquare(from));
        }
        let wanted = promotion.unwrap_or(Kind::Queen);
        self.legal_moves()
            .into_iter()
            .find(|m| {
                m.from == from
                    && m.to == to
                    && (!m.is_promotion() || m.promotion.kind() == Some(wanted))
            })
            .ok_or_else(|| GameError::IllegalMove(format!("{}{}", from, to)))
    }

    /// Plays a move after validating it is legal here.
    pub fn play(&mut self, m: Move) -> Result<(), GameError> {
        if !self.legal_moves().contains(&m) {
            return Err(GameError::IllegalMove(m.to_coords()));
        }
        self.board.apply(m);
        self.history.push(m);
        Ok(())
    }

    /// Unapplies the most recent move and returns it.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let m = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.board.unapply(m);
        Ok(m)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        crate::in_check(&self.board, self.board.side_to_move)
    }

    /// Returns how the game ended, or `None` while it is still running.
    /// Mate and stalemate take precedence over the clock: a mate delivered
    /// on the hundredth halfmove is still a win.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.legal_moves().is_empty() {
            return Some(if self.is_check() {
                Outcome::Win(self.board.side_to_move.opposite())
            } else {
                Outcome::Stalemate
            });
        }
        if self.board.halfmove_clock >= 100 {
            return Some(Outcome::FiftyMoveRule);
        }
        None
    }

    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Computes the best move under the given limits, consulting the book
    /// first. Returns `None` when the game is over.
    pub fn best_move<R: Rng>(
        &self,
        config: &SearchConfig,
        book: Option<&OpeningBook>,
        rng: &mut R,
    ) -> Option<Move> {
        best_move(&self.board, config, book, rng)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
