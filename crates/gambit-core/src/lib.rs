//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the engine:
//! - [`Side`], [`Kind`], and [`Piece`] for the 4-bit piece encoding
//! - [`Square`] for board coordinates
//! - [`CastlingRights`] for the 4-bit castling mask
//! - [`Move`] for self-reversing move records
//! - Position notation (FEN) field parsing and validation

mod castling;
mod fen;
mod moves;
mod piece;
mod side;
mod square;

pub use castling::CastlingRights;
pub use fen::{FenError, FenFields};
pub use moves::Move;
pub use piece::{Kind, Piece};
pub use side::Side;
pub use square::Square;
