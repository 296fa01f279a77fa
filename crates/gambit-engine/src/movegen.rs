//! Pseudo-legal and legal move generation.
//!
//! Generation is parametric over the side so the evaluator's mobility term
//! can score either player without touching the side to move. Every emitted
//! move carries the position's pre-move snapshot, so it can be unmade
//! without any external history.

use gambit_core::{Kind, Move, Piece, Side, Square};

use crate::attacks::{king_reach, knight_reach, pawn_captures, pawn_targets, queen_reach};
use crate::bitboard::{diagonal_rays, orthogonal_rays};
use crate::check::{attacked, in_check};
use crate::{Bitboard, Board};

/// Generates every pseudo-legal move for `side`: movement rules are obeyed
/// and own pieces are not captured, but the king may be left attacked.
pub fn pseudo_legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);

    pawn_moves(board, side, &mut moves);
    knight_moves(board, side, &mut moves);
    slider_moves(board, side, Kind::Bishop, &mut moves);
    slider_moves(board, side, Kind::Rook, &mut moves);
    slider_moves(board, side, Kind::Queen, &mut moves);
    king_moves(board, side, &mut moves);
    castling_moves(board, side, &mut moves);

    moves
}

/// Generates the legal moves for the side to move: pseudo-legal moves whose
/// maker does not leave their own king attacked.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let side = board.side_to_move;
    let mut moves = pseudo_legal_moves(board, side);
    let mut scratch = board.clone();
    moves.retain(|&m| {
        scratch.apply(m);
        let safe = !in_check(&scratch, side);
        scratch.unapply(m);
        safe
    });
    moves
}

/// Builds a plain move, reading the captured piece off the board.
fn basic(board: &Board, piece: Piece, from: Square, to: Square) -> Move {
    Move {
        piece,
        from,
        to,
        capture: board.piece_at(to),
        castle: false,
        promotion: Piece::EMPTY,
        prior_halfmoves: board.halfmove_clock,
        prior_castling: board.castling,
        prior_en_passant: board.en_passant,
    }
}

fn pawn_moves(board: &Board, side: Side, moves: &mut Vec<Move>) {
    let pawns = board.pieces_of(side, Kind::Pawn);
    if pawns.is_empty() {
        return;
    }

    let piece = Piece::new(side, Kind::Pawn);
    let enemy = board.side_pieces(side.opposite());
    let targets = pawn_targets(pawns, board.occupied(), enemy, side);

    let forward = side.forward();
    let (west_step, east_step) = match side {
        Side::White => (7i8, 9i8),
        Side::Black => (-9i8, -7i8),
    };

    for to in targets.single {
        let from = to.offset(-forward).expect("push origin is on the board");
        push_pawn_move(board, side, from, to, Piece::EMPTY, moves);
    }

    for to in targets.double {
        let from = to.offset(-2 * forward).expect("double push origin is on the board");
        moves.push(basic(board, piece, from, to));
    }

    for to in targets.west {
        let from = to.offset(-west_step).expect("capture origin is on the board");
        push_pawn_move(board, side, from, to, board.piece_at(to), moves);
    }

    for to in targets.east {
        let from = to.offset(-east_step).expect("capture origin is on the board");
        push_pawn_move(board, side, from, to, board.piece_at(to), moves);
    }

    // En passant: the captured pawn stands one rank behind the target.
    if let Some(ep) = board.en_passant {
        let victim = Piece::new(side.opposite(), Kind::Pawn);
        for from in pawns {
            if pawn_captures(from, side).contains(ep) {
                moves.push(Move {
                    piece,
                    from,
                    to: ep,
                    capture: victim,
                    castle: false,
                    promotion: Piece::EMPTY,
                    prior_halfmoves: board.halfmove_clock,
                    prior_castling: board.castling,
                    prior_en_passant: board.en_passant,
                });
            }
        }
    }
}

/// Pushes a pawn move, fanning out into the four promotions on the last
/// rank.
fn push_pawn_move(
    board: &Board,
    side: Side,
    from: Square,
    to: Square,
    capture: Piece,
    moves: &mut Vec<Move>,
) {
    let piece = Piece::new(side, Kind::Pawn);
    let template = Move {
        piece,
        from,
        to,
        capture,
        castle: false,
        promotion: Piece::EMPTY,
        prior_halfmoves: board.halfmove_clock,
        prior_castling: board.castling,
        prior_en_passant: board.en_passant,
    };

    if to.rank() == side.promotion_rank() {
        for kind in Kind::PROMOTIONS {
            moves.push(Move {
                promotion: Piece::new(side, kind),
                ..template
            });
        }
    } else {
        moves.push(template);
    }
}

fn knight_moves(board: &Board, side: Side, moves: &mut Vec<Move>) {
    let piece = Piece::new(side, Kind::Knight);
    let own = board.side_pieces(side);
    for from in board.pieces_of(side, Kind::Knight) {
        for to in knight_reach(from) & !own {
            moves.push(basic(board, piece, from, to));
        }
    }
}

fn slider_moves(board: &Board, side: Side, kind: Kind, moves: &mut Vec<Move>) {
    let piece = Piece::new(side, kind);
    let own = board.side_pieces(side);
    let occupied = board.occupied();
    for from in board.pieces_of(side, kind) {
        let reach = match kind {
            Kind::Bishop => diagonal_rays(from, occupied),
            Kind::Rook => orthogonal_rays(from, occupied),
            _ => queen_reach(from, occupied),
        };
        for to in reach & !own {
            moves.push(basic(board, piece, from, to));
        }
    }
}

fn king_moves(board: &Board, side: Side, moves: &mut Vec<Move>) {
    let piece = Piece::new(side, Kind::King);
    let own = board.side_pieces(side);
    if let Some(from) = board.king_square(side) {
        for to in king_reach(from) & !own {
            moves.push(basic(board, piece, from, to));
        }
    }
}

/// Emits castling moves when the right is intact, the traversal squares are
/// empty, the king's path is unattacked, and the king is not in check.
fn castling_moves(board: &Board, side: Side, moves: &mut Vec<Move>) {
    if !board.castling.kingside(side) && !board.castling.queenside(side) {
        return;
    }
    if in_check(board, side) {
        return;
    }

    let enemy = side.opposite();
    let occupied = board.occupied();
    let piece = Piece::new(side, Kind::King);

    let (from, kingside_to, queenside_to) = match side {
        Side::White => (Square::E1, Square::G1, Square::C1),
        Side::Black => (Square::E8, Square::G8, Square::C8),
    };

    let castle = |to: Square| Move {
        piece,
        from,
        to,
        capture: Piece::EMPTY,
        castle: true,
        promotion: Piece::EMPTY,
        prior_halfmoves: board.halfmove_clock,
        prior_castling: board.castling,
        prior_en_passant: board.en_passant,
    };

    if board.castling.kingside(side) {
        let (f, g) = match side {
            Side::White => (Square::F1, Square::G1),
            Side::Black => (Square::F8, Square::G8),
        };
        let between = Bitboard::from_square(f) | Bitboard::from_square(g);
        if (occupied & between).is_empty()
            && !attacked(board, f, enemy)
            && !attacked(board, g, enemy)
        {
            moves.push(castle(kingside_to));
        }
    }

    if board.castling.queenside(side) {
        let (b, c, d) = match side {
            Side::White => (Square::new(1, 0), Square::C1, Square::D1),
            Side::Black => (Square::new(1, 7), Square::C8, Square::D8),
        };
        let between =
            Bitboard::from_square(b) | Bitboard::from_square(c) | Bitboard::from_square(d);
        if (occupied & between).is_empty()
            && !attacked(board, d, enemy)
            && !attacked(board, c, enemy)
        {
            moves.push(castle(queenside_to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn coords(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.to_coords()).collect()
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let board = Board::startpos();
        assert_eq!(legal_moves(&board).len(), 20);
    }

    #[test]
    fn moves_carry_snapshots() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 3 5").unwrap();
        for m in legal_moves(&board) {
            assert_eq!(m.prior_halfmoves, 3);
            assert_eq!(m.prior_castling, board.castling);
            assert_eq!(m.prior_en_passant, Some(sq("e3")));
        }
    }

    #[test]
    fn promotion_fans_out() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board);
        let promotions: Vec<&Move> = moves.iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promotions.len(), 4);
        let kinds: Vec<Option<Kind>> =
            promotions.iter().map(|m| m.promotion.kind()).collect();
        for kind in Kind::PROMOTIONS {
            assert!(kinds.contains(&Some(kind)));
        }
    }

    #[test]
    fn capture_promotion_fans_out() {
        let board = Board::from_fen("1n6/P7/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board);
        // Four straight promotions plus four capture promotions onto b8.
        let promotions = moves.iter().filter(|m| m.is_promotion()).count();
        assert_eq!(promotions, 8);
        let captures = moves
            .iter()
            .filter(|m| m.is_promotion() && m.is_capture())
            .count();
        assert_eq!(captures, 4);
    }

    #[test]
    fn en_passant_capture_generated() {
        let board =
            Board::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1")
                .unwrap();
        let moves = legal_moves(&board);
        let ep: Vec<&Move> = moves.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].from, sq("f5"));
        assert_eq!(ep[0].to, sq("e6"));
        assert_eq!(ep[0].capture, Piece::new(Side::Black, Kind::Pawn));
    }

    #[test]
    fn castling_both_wings() {
        let board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = legal_moves(&board);
        let castles = coords(
            &moves
                .iter()
                .filter(|m| m.castle)
                .copied()
                .collect::<Vec<_>>(),
        );
        assert!(castles.contains(&"e1g1".to_string()));
        assert!(castles.contains(&"e1c1".to_string()));
    }

    #[test]
    fn no_castling_without_rights() {
        let board = Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1").unwrap();
        assert!(legal_moves(&board).iter().all(|m| !m.castle));
    }

    #[test]
    fn no_castling_through_attack() {
        // Black rook on f4 covers f1, so kingside is out; the queenside
        // path is clean.
        let board =
            Board::from_fen("r3k2r/pppppppp/8/8/5r2/8/PPPPP1PP/R3K2R w KQ - 0 1").unwrap();
        let castles: Vec<Move> = legal_moves(&board)
            .into_iter()
            .filter(|m| m.castle)
            .collect();
        let castles = coords(&castles);
        assert!(!castles.contains(&"e1g1".to_string()));
        assert!(castles.contains(&"e1c1".to_string()));
    }

    #[test]
    fn no_castling_out_of_check() {
        // White rook on the open e-file checks the black king.
        let board =
            Board::from_fen("r3k2r/pppp1ppp/8/4R3/8/8/PPPP1PPP/4K3 b kq - 0 1").unwrap();
        assert!(in_check(&board, Side::Black));
        assert!(legal_moves(&board).iter().all(|m| !m.castle));
    }

    #[test]
    fn no_castling_through_occupied_square() {
        let board = Board::startpos();
        // f1/g1 occupied by bishop and knight.
        assert!(legal_moves(&board).iter().all(|m| !m.castle));
    }

    #[test]
    fn legal_filter_respects_pins() {
        // The e-file pawn shields the king from the rook and so cannot
        // leave the file... but pushing straight ahead stays legal.
        let board = Board::from_fen("4r3/8/8/8/8/3p4/4P3/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board);
        let pawn_moves: Vec<String> = coords(
            &moves
                .iter()
                .filter(|m| m.piece.kind() == Some(Kind::Pawn))
                .copied()
                .collect::<Vec<_>>(),
        );
        assert!(pawn_moves.contains(&"e2e3".to_string()));
        assert!(pawn_moves.contains(&"e2e4".to_string()));
        assert!(!pawn_moves.contains(&"e2d3".to_string()));
    }

    #[test]
    fn pseudo_legal_is_side_parametric() {
        let board = Board::startpos();
        // Black has 20 pseudo-legal replies even though it is White's turn.
        assert_eq!(pseudo_legal_moves(&board, Side::Black).len(), 20);
    }

    #[test]
    fn check_detector_matches_king_capture_replies() {
        // For a handful of positions: the side to move is in check iff some
        // enemy pseudo-legal move lands on its king square.
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "4r3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/7B/8/8/4K3 b - - 0 1",
            "4k3/8/8/8/8/5n2/8/4K3 w - - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            let side = board.side_to_move;
            let king = board.king_square(side).unwrap();
            let king_capture_exists = pseudo_legal_moves(&board, side.opposite())
                .iter()
                .any(|m| m.to == king);
            assert_eq!(in_check(&board, side), king_capture_exists, "fen: {}", fen);
        }
    }
}
