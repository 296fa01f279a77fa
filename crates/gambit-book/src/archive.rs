//! Game-archive parsing and replay.
//!
//! The archive is a JSON document: a list of games, each carrying its moves
//! in coordinate notation. Ingest replays every game from the starting
//! position for up to [`DEFAULT_BOOK_PLIES`] plies, inserting the played
//! move into the book entry for each visited position. A move that fails to
//! parse or is illegal where it appears aborts ingest with an error; the
//! caller is expected to proceed without a book in that case.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use gambit_core::{Kind, Square};
use gambit_engine::{BookMove, Game, OpeningBook};

/// How many plies of each archived game feed the book.
pub const DEFAULT_BOOK_PLIES: usize = 12;

/// Errors raised while building the book. Any of these means the archive is
/// corrupt; the engine then runs bookless.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read game archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse game archive: {0}")]
    Json(#[from] serde_json::Error),

    #[error("game {game}: unparsable move '{text}'")]
    MalformedMove { game: usize, text: String },

    #[error("game {game}: illegal move '{text}'")]
    IllegalMove { game: usize, text: String },
}

/// One archived game: its moves in coordinate notation, oldest first.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveGame {
    pub moves: Vec<String>,
}

/// A parsed game archive.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Archive {
    pub games: Vec<ArchiveGame>,
}

/// Loads and replays an archive file into a book.
pub fn load_book(path: impl AsRef<Path>) -> Result<OpeningBook, ArchiveError> {
    book_from_reader(BufReader::new(File::open(path)?))
}

/// Replays an archive read from any source into a book.
pub fn book_from_reader(reader: impl Read) -> Result<OpeningBook, ArchiveError> {
    let archive: Archive = serde_json::from_reader(reader)?;
    book_from_archive(&archive, DEFAULT_BOOK_PLIES)
}

/// Replays up to `max_plies` of every archived game, recording each played
/// move under the position it was played from.
pub fn book_from_archive(archive: &Archive, max_plies: usize) -> Result<OpeningBook, ArchiveError> {
    let mut book = OpeningBook::new();

    for (game_index, archived) in archive.games.iter().enumerate() {
        let mut game = Game::new();
        for text in archived.moves.iter().take(max_plies) {
            let entry = parse_coords(text).ok_or_else(|| ArchiveError::MalformedMove {
                game: game_index,
                text: text.clone(),
            })?;
            let m = game
                .move_from_squares(entry.from, entry.to, entry.promotion)
                .map_err(|_| ArchiveError::IllegalMove {
                    game: game_index,
                    text: text.clone(),
                })?;

            book.insert(game.board(), entry);
            game.play(m).map_err(|_| ArchiveError::IllegalMove {
                game: game_index,
                text: text.clone(),
            })?;
        }
    }

    Ok(book)
}

/// Parses coordinate notation ("e2e4", "e7e8q") into a book entry.
fn parse_coords(text: &str) -> Option<BookMove> {
    if text.len() < 4 || text.len() > 5 {
        return None;
    }
    let from = Square::from_algebraic(&text[0..2])?;
    let to = Square::from_algebraic(&text[2..4])?;
    let promotion = match text.chars().nth(4) {
        Some(c) => match Kind::from_letter(c) {
            promo @ Some(Kind::Knight | Kind::Bishop | Kind::Rook | Kind::Queen) => promo,
            _ => return None,
        },
        None => None,
    };
    Some(BookMove {
        from,
        to,
        promotion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_engine::Board;
    use std::io::Write;

    fn archive_of(games: &[&[&str]]) -> Archive {
        Archive {
            games: games
                .iter()
                .map(|moves| ArchiveGame {
                    moves: moves.iter().map(|m| m.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn replay_populates_positions_along_the_line() {
        let archive = archive_of(&[&["e2e4", "e7e5", "g1f3"]]);
        let book = book_from_archive(&archive, DEFAULT_BOOK_PLIES).unwrap();
        assert_eq!(book.len(), 3);

        let start = Board::startpos();
        let candidates = book.lookup(&start).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].from, Square::from_algebraic("e2").unwrap());
        assert_eq!(candidates[0].to, Square::from_algebraic("e4").unwrap());
    }

    #[test]
    fn shared_positions_merge_without_duplicates() {
        let archive = archive_of(&[
            &["e2e4", "e7e5"],
            &["e2e4", "c7c5"],
            &["d2d4", "d7d5"],
        ]);
        let book = book_from_archive(&archive, DEFAULT_BOOK_PLIES).unwrap();

        let start = Board::startpos();
        let first_moves = book.lookup(&start).unwrap();
        // e2e4 appears twice in the archive but once in the book.
        assert_eq!(first_moves.len(), 2);
    }

    #[test]
    fn ply_limit_truncates_long_games() {
        let archive = archive_of(&[&["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]]);
        let book = book_from_archive(&archive, 2).unwrap();
        // Only the first two positions were recorded.
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn malformed_move_aborts_ingest() {
        let archive = archive_of(&[&["e2e4", "nonsense"]]);
        assert!(matches!(
            book_from_archive(&archive, DEFAULT_BOOK_PLIES),
            Err(ArchiveError::MalformedMove { game: 0, .. })
        ));
    }

    #[test]
    fn illegal_move_aborts_ingest() {
        let archive = archive_of(&[&["e2e4", "e7e4"]]);
        assert!(matches!(
            book_from_archive(&archive, DEFAULT_BOOK_PLIES),
            Err(ArchiveError::IllegalMove { game: 0, .. })
        ));
    }

    #[test]
    fn json_archive_roundtrip() {
        let json = r#"[
            {"moves": ["e2e4", "e7e5"]},
            {"moves": ["d2d4"]}
        ]"#;
        let book = book_from_reader(json.as_bytes()).unwrap();
        assert!(!book.is_empty());

        let start = Board::startpos();
        assert_eq!(book.lookup(&start).unwrap().len(), 2);
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let result = book_from_reader("{not json".as_bytes());
        assert!(matches!(result, Err(ArchiveError::Json(_))));
    }

    #[test]
    fn load_book_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"moves": ["e2e4", "e7e5", "g1f3"]}}]"#).unwrap();

        let book = load_book(file.path()).unwrap();
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_book("/definitely/not/here.json");
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn promotion_moves_parse() {
        let entry = parse_coords("e7e8q").unwrap();
        assert_eq!(entry.promotion, Some(Kind::Queen));
        assert!(parse_coords("e7e8x").is_none());
        assert!(parse_coords("e7e8k").is_none());
        assert!(parse_coords("e7").is_none());
    }
}
