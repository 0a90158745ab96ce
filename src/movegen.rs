//! Pseudo-legal move generation. Every move this module produces is legal
//! except possibly "leaves the mover's own king in check" — callers make
//! the move and ask `Board::was_legal_move` to filter that out, the
//! make-first-test-after pattern mailbox engines use to avoid a separate
//! attack-simulation pass per candidate.

use crate::board::Board;
use crate::castle::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::piece::{Color, Kind};
use crate::r#move::{Move, MoveSink, Promotion};
use crate::square::{BISHOP_RAYS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_RAYS, Square};

const PROMOTIONS: [Promotion; 4] = [Promotion::Queen, Promotion::Rook, Promotion::Bishop, Promotion::Knight];

/// Append every pseudo-legal move for the side to move into `sink`,
/// returning how many were added. Requires `board.side_info_current()` —
/// castling legality reads the opponent's attack table.
pub fn generate_moves<S: MoveSink>(board: &Board, sink: &mut S) -> usize {
    let mut counting = CountingSink { inner: sink, count: 0 };
    let us = board.side_to_move();
    for idx in 0..64u8 {
        let sq = Square::new(idx);
        let piece = board.piece_at(sq);
        let Some((color, kind)) = piece.color_and_kind() else { continue };
        if color != us {
            continue;
        }
        match kind {
            Kind::Pawn => gen_pawn(board, sq, us, &mut counting),
            Kind::Knight => gen_leaper(board, sq, us, &KNIGHT_OFFSETS, &mut counting),
            Kind::King => {
                gen_leaper(board, sq, us, &KING_OFFSETS, &mut counting);
                gen_castling(board, sq, us, &mut counting);
            }
            Kind::Bishop => gen_slider(board, sq, us, &BISHOP_RAYS, &mut counting),
            Kind::Rook => gen_slider(board, sq, us, &ROOK_RAYS, &mut counting),
            Kind::Queen => {
                gen_slider(board, sq, us, &BISHOP_RAYS, &mut counting);
                gen_slider(board, sq, us, &ROOK_RAYS, &mut counting);
            }
        }
    }
    counting.count
}

/// True iff a pseudo-legal move from `from` to `to` would promote a pawn
/// (it reaches the back rank) — used by a UI layer to know when to prompt
/// for a promotion piece before calling `Move::new_promotion`.
pub fn is_promotion(board: &Board, from: Square, to: Square) -> bool {
    let is_pawn = board.piece_at(from).color_and_kind().is_some_and(|(_, k)| k == Kind::Pawn);
    is_pawn && (to.rank() == 0 || to.rank() == 7)
}

/// Adapts any `MoveSink` into one that also counts pushes, so
/// `generate_moves` can report how many moves it added without requiring
/// every `MoveSink` implementor to expose a length.
struct CountingSink<'a, S: MoveSink> {
    inner: &'a mut S,
    count: usize,
}

impl<S: MoveSink> MoveSink for CountingSink<'_, S> {
    #[inline(always)]
    fn push(&mut self, mv: Move) {
        self.inner.push(mv);
        self.count += 1;
    }
}

fn push_or_capture<S: MoveSink>(board: &Board, from: Square, to: Square, us: Color, sink: &mut S) -> bool {
    let occupant = board.piece_at(to);
    if occupant.is_empty() {
        sink.push(Move::new(from, to));
        true
    } else if occupant.color() != us {
        sink.push(Move::new(from, to));
        false
    } else {
        false
    }
}

fn gen_leaper<S: MoveSink>(board: &Board, from: Square, us: Color, offsets: &[i16], sink: &mut S) {
    let mbx = from.mbx();
    for &delta in offsets {
        if let Some(to) = mbx.offset(delta).to_square() {
            let occupant = board.piece_at(to);
            if occupant.is_empty() || occupant.color() != us {
                sink.push(Move::new(from, to));
            }
        }
    }
}

fn gen_slider<S: MoveSink>(board: &Board, from: Square, us: Color, rays: &[i16], sink: &mut S) {
    let mbx = from.mbx();
    for &dir in rays {
        let mut cur = mbx.offset(dir);
        while let Some(to) = cur.to_square() {
            if !push_or_capture(board, from, to, us, sink) {
                break;
            }
            cur = cur.offset(dir);
        }
    }
}

fn gen_pawn<S: MoveSink>(board: &Board, from: Square, us: Color, sink: &mut S) {
    let mbx = from.mbx();
    let push_dir = crate::square::pawn_push_dir(us == Color::White);
    let start_rank = if us == Color::White { 1 } else { 6 };
    let promo_rank = if us == Color::White { 7 } else { 0 };

    if let Some(one) = mbx.offset(push_dir).to_square() {
        if board.piece_at(one).is_empty() {
            push_pawn_move(from, one, promo_rank, sink);
            if from.rank() == start_rank {
                if let Some(two) = mbx.offset(push_dir * 2).to_square() {
                    if board.piece_at(two).is_empty() {
                        sink.push(Move::new_special(from, two));
                    }
                }
            }
        }
    }

    for &file_delta in &[-1i16, 1i16] {
        if let Some(to) = mbx.offset(push_dir + file_delta).to_square() {
            let occupant = board.piece_at(to);
            // The tracked en passant square is the *capturing* pawn's square
            // (same rank as `from`), not the diagonal landing square `to`.
            let is_ep = occupant.is_empty() && board.en_passant_pawn == Some(Square::from_file_rank(to.file(), from.rank()));
            if is_ep {
                sink.push(Move::new_special(from, to));
            } else if !occupant.is_empty() && occupant.color() != us {
                push_pawn_move(from, to, promo_rank, sink);
            }
        }
    }
}

fn push_pawn_move<S: MoveSink>(from: Square, to: Square, promo_rank: u8, sink: &mut S) {
    if to.rank() == promo_rank {
        for &promo in &PROMOTIONS {
            sink.push(Move::new_promotion(from, to, promo));
        }
    } else {
        sink.push(Move::new(from, to));
    }
}

fn gen_castling<S: MoveSink>(board: &Board, king_sq: Square, us: Color, sink: &mut S) {
    let rank = king_sq.rank();
    let (king_flag, queen_flag) = match us {
        Color::White => (CASTLE_WK, CASTLE_WQ),
        Color::Black => (CASTLE_BK, CASTLE_BQ),
    };

    if board.castle_flags & king_flag != 0 {
        let f = Square::from_file_rank(5, rank);
        let g = Square::from_file_rank(6, rank);
        if board.piece_at(f).is_empty() && board.piece_at(g).is_empty() {
            let mv = Move::new_special(king_sq, g);
            if board.is_legal_move(mv) {
                sink.push(mv);
            }
        }
    }
    if board.castle_flags & queen_flag != 0 {
        let d = Square::from_file_rank(3, rank);
        let c = Square::from_file_rank(2, rank);
        let b = Square::from_file_rank(1, rank);
        if board.piece_at(d).is_empty() && board.piece_at(c).is_empty() && board.piece_at(b).is_empty() {
            let mv = Move::new_special(king_sq, c);
            if board.is_legal_move(mv) {
                sink.push(mv);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::r#move::MoveList;

    #[test]
    fn startpos_has_twenty_moves() {
        let mut b = Board::new();
        b.update_side_info();
        let mut moves = MoveList::new();
        let count = generate_moves(&b, &mut moves);
        assert_eq!(count, 20);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn is_promotion_detects_pawn_reaching_back_rank() {
        let mut b: Board = "8/P7/8/8/8/8/8/k6K w - - 0 1".parse().unwrap();
        b.update_side_info();
        let a7 = Square::from_file_rank(0, 6);
        let a8 = Square::from_file_rank(0, 7);
        let a6 = Square::from_file_rank(0, 5);
        assert!(is_promotion(&b, a7, a8));
        assert!(!is_promotion(&b, a7, a6));
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let mut b: Board = "8/P7/8/8/8/8/8/k6K w - - 0 1".parse().unwrap();
        b.update_side_info();
        let mut moves = MoveList::new();
        generate_moves(&b, &mut moves);
        let promos = moves.iter().filter(|m| m.is_promotion()).count();
        assert_eq!(promos, 4);
    }

    #[test]
    fn castling_rights_gate_generation() {
        let mut b: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        b.update_side_info();
        let mut moves = MoveList::new();
        generate_moves(&b, &mut moves);
        let e1 = Square::from_file_rank(4, 0);
        let castles = moves.iter().filter(|m| m.from() == e1 && (m.to().file() as i16 - e1.file() as i16).abs() == 2).count();
        assert_eq!(castles, 2);
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let mut b: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        b.update_side_info();
        let mut moves = MoveList::new();
        generate_moves(&b, &mut moves);
        let e5 = Square::from_file_rank(4, 4);
        let d6 = Square::from_file_rank(3, 5);
        let ep = moves.iter().find(|m| m.from() == e5 && m.to() == d6);
        assert!(ep.is_some_and(|m| m.is_special()));
    }
}
