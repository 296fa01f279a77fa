//! Iterative-deepening alpha-beta search.
//!
//! The driver consults the opening book, then deepens from depth 0 upward
//! under a wall-clock budget. Each depth iteration scores every root move;
//! an iteration that finishes before the deadline commits its score array,
//! and a cancelled iteration is discarded wholesale, because a partially
//! searched depth is biased toward the moves it happened to visit first.
//! White maximizes, Black minimizes, and ties at the root are broken
//! uniformly at random.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use gambit_core::{Move, Side};
use rand::Rng;

use crate::eval::evaluate;
use crate::movegen::legal_moves;
use crate::tt::TranspositionMap;
use crate::{in_check, Board, OpeningBook};

/// Sentinel magnitude for mate scores; reduced by the mating distance so
/// that nearer mates sort first.
pub const MATE_SCORE: f64 = 1.0e6;

/// How many nodes are visited between wall-clock reads. The stop flag
/// itself is checked at every node.
const TIME_CHECK_INTERVAL: u64 = 4096;

/// Search limits and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest iteration to run.
    pub max_depth: u32,
    /// Wall-clock budget; `None` searches to `max_depth` without a timer.
    pub budget: Option<Duration>,
    /// Fan the root moves out over worker threads.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 4,
            budget: Some(Duration::from_secs(5)),
            parallel: false,
        }
    }
}

/// The outcome of a completed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// The chosen move.
    pub best: Move,
    /// Its committed score, White-positive.
    pub score: f64,
    /// The deepest fully completed iteration.
    pub depth: u32,
}

/// Shared context for all tasks of one search.
struct SearchShared<'a> {
    tt: &'a TranspositionMap,
    stop: &'a AtomicBool,
    deadline: Option<Instant>,
}

impl SearchShared<'_> {
    /// Polled at every node. Reads the clock only every
    /// `TIME_CHECK_INTERVAL` nodes so the timer never dominates search cost;
    /// once tripped, the flag cancels every task.
    fn cancelled(&self, nodes: &mut u64) -> bool {
        *nodes += 1;
        if *nodes % TIME_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stop.store(true, Ordering::Relaxed);
                }
            }
        }
        self.stop.load(Ordering::Relaxed)
    }
}

/// Picks the best move: the opening book if it knows the position, else a
/// full search. Returns `None` when no legal move exists.
pub fn best_move<R: Rng>(
    board: &Board,
    config: &SearchConfig,
    book: Option<&OpeningBook>,
    rng: &mut R,
) -> Option<Move> {
    if let Some(book) = book {
        if let Some(entry) = book.pick(board, rng) {
            // Book lines were recorded from other games; replay the entry
            // against this position to get a move with the right snapshot.
            let resolved = legal_moves(board).into_iter().find(|m| {
                m.from == entry.from
                    && m.to == entry.to
                    && m.promotion.kind() == entry.promotion
            });
            if let Some(m) = resolved {
                return Some(m);
            }
        }
    }

    analyze(board, config, rng).map(|result| result.best)
}

/// Runs the iterative-deepening search and reports the chosen move, its
/// score, and the deepest completed iteration.
pub fn analyze<R: Rng>(board: &Board, config: &SearchConfig, rng: &mut R) -> Option<SearchResult> {
    let root_moves = legal_moves(board);
    if root_moves.is_empty() {
        return None;
    }

    let tt = TranspositionMap::new();
    let stop = AtomicBool::new(false);
    let shared = SearchShared {
        tt: &tt,
        stop: &stop,
        deadline: config.budget.map(|budget| Instant::now() + budget),
    };

    let mut committed: Option<(Vec<f64>, u32)> = None;
    for depth in 0..=config.max_depth {
        let scores = if config.parallel {
            root_scores_parallel(board, &root_moves, depth, &shared)
        } else {
            root_scores(board, &root_moves, depth, &shared)
        };
        match scores {
            Some(scores) => committed = Some((scores, depth)),
            None => break,
        }
    }

    let (scores, depth) = committed?;

    let best_score = match board.side_to_move {
        Side::White => scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Side::Black => scores.iter().copied().fold(f64::INFINITY, f64::min),
    };
    let tied: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, &score)| score == best_score)
        .map(|(i, _)| i)
        .collect();
    let pick = tied[rng.random_range(0..tied.len())];

    Some(SearchResult {
        best: root_moves[pick],
        score: best_score,
        depth,
    })
}

/// Scores every root move at one iteration depth on the calling thread.
/// Returns `None` if the iteration was cancelled.
fn root_scores(
    board: &Board,
    root_moves: &[Move],
    stop_depth: u32,
    shared: &SearchShared<'_>,
) -> Option<Vec<f64>> {
    let mut scratch = board.clone();
    let mut nodes = 0u64;
    let mut scores = Vec::with_capacity(root_moves.len());

    for &m in root_moves {
        scratch.apply(m);
        let score = minimax(
            &mut scratch,
            1,
            stop_depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            shared,
            &mut nodes,
        );
        scratch.unapply(m);
        scores.push(score?);
    }

    Some(scores)
}

/// The parallel root: one task per root move, each on its own clone of the
/// position, all sharing the transposition map and the stop flag. Results
/// come back through a channel with one slot per root move, in any order.
fn root_scores_parallel(
    board: &Board,
    root_moves: &[Move],
    stop_depth: u32,
    shared: &SearchShared<'_>,
) -> Option<Vec<f64>> {
    let (sender, receiver) = mpsc::sync_channel::<(usize, Option<f64>)>(root_moves.len());

    thread::scope(|scope| {
        for (index, &m) in root_moves.iter().enumerate() {
            let sender = sender.clone();
            let mut task_board = board.clone();
            let shared_ref = &*shared;
            scope.spawn(move || {
                let mut nodes = 0u64;
                task_board.apply(m);
                let score = minimax(
                    &mut task_board,
                    1,
                    stop_depth,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    shared_ref,
                    &mut nodes,
                );
                let _ = sender.send((index, score));
            });
        }
        drop(sender);

        let mut scores = vec![0.0; root_moves.len()];
        for (index, score) in receiver {
            scores[index] = score?;
        }
        Some(scores)
    })
}

/// Alpha-beta over legal moves. Returns `None` when cancelled; the caller
/// discards the whole iteration.
fn minimax(
    board: &mut Board,
    depth: u32,
    stop_depth: u32,
    mut alpha: f64,
    mut beta: f64,
    shared: &SearchShared<'_>,
    nodes: &mut u64,
) -> Option<f64> {
    if shared.cancelled(nodes) {
        return None;
    }

    let moves = legal_moves(board);
    if moves.is_empty() {
        // Mate is a huge sentinel against the side to move; stalemate is a
        // dead draw. Checked before the clock so a mate delivered on the
        // hundredth halfmove still counts as mate.
        return Some(if in_check(board, board.side_to_move) {
            match board.side_to_move {
                Side::White => -(MATE_SCORE - f64::from(depth)),
                Side::Black => MATE_SCORE - f64::from(depth),
            }
        } else {
            0.0
        });
    }

    if board.halfmove_clock >= 100 {
        return Some(0.0);
    }

    if depth >= stop_depth {
        let score = evaluate(board);
        shared.tt.store(board.zobrist_hash(), depth, score);
        return Some(score);
    }

    let ordered = order_moves(board, moves, shared);

    match board.side_to_move {
        Side::White => {
            let mut best = f64::NEG_INFINITY;
            for m in ordered {
                board.apply(m);
                let score = minimax(board, depth + 1, stop_depth, alpha, beta, shared, nodes);
                board.unapply(m);
                best = best.max(score?);
                alpha = alpha.max(best);
                if best >= beta {
                    break;
                }
            }
            Some(best)
        }
        Side::Black => {
            let mut best = f64::INFINITY;
            for m in ordered {
                board.apply(m);
                let score = minimax(board, depth + 1, stop_depth, alpha, beta, shared, nodes);
                board.unapply(m);
                best = best.min(score?);
                beta = beta.min(best);
                if best <= alpha {
                    break;
                }
            }
            Some(best)
        }
    }
}

/// Reorders moves so that likely-best ones are searched first: each move is
/// applied, its resulting position probed in the shared map (0 when absent),
/// and unapplied; the maximizer tries high scores first, the minimizer low.
fn order_moves(board: &mut Board, moves: Vec<Move>, shared: &SearchShared<'_>) -> Vec<Move> {
    let mut scored: Vec<(f64, Move)> = moves
        .into_iter()
        .map(|m| {
            board.apply(m);
            let score = shared
                .tt
                .probe(board.zobrist_hash())
                .map_or(0.0, |entry| entry.score);
            board.unapply(m);
            (score, m)
        })
        .collect();

    match board.side_to_move {
        Side::White => scored.sort_by(|a, b| b.0.total_cmp(&a.0)),
        Side::Black => scored.sort_by(|a, b| a.0.total_cmp(&b.0)),
    }

    scored.into_iter().map(|(_, m)| m).collect()
}
