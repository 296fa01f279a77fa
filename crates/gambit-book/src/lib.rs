//! Opening book ingest.
//!
//! Builds the engine's read-only [`OpeningBook`](gambit_engine::OpeningBook)
//! from an archive of historical games. Each game is replayed through the
//! engine for a bounded number of plies, recording the move that was played
//! from every position along the way. The engine itself only ever sees the
//! finished map.

mod archive;

pub use archive::{
    book_from_archive, book_from_reader, load_book, Archive, ArchiveError, ArchiveGame,
    DEFAULT_BOOK_PLIES,
};
