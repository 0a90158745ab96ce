//! Make/unmake. `make_move` always pushes an `UndoFrame`; it never checks
//! legality itself — callers either pre-filter with `is_legal_move` (the
//! castling-through-check case, checkable before the board changes) or make
//! the move and ask `was_legal_move` (the general case: did it leave the
//! mover's own king in check).

use super::Board;
use crate::castle::rights_cleared_by_square;
use crate::piece::{Kind, Piece};
use crate::r#move::Move;
use crate::square::Square;
use crate::zobrist::{ep_file_to_hash, xor_castling_rights_delta, zobrist_keys};

use super::UndoFrame;

impl Board {
    /// Apply a pseudo-legal move. Castling, en passant, and promotion are
    /// all recognized from the moved piece and the from/to squares rather
    /// than from any tag on `mv`. The Zobrist hash is updated incrementally
    /// alongside every square/flag change rather than recomputed from
    /// scratch.
    pub fn make_move(&mut self, mv: Move) {
        let from = mv.from();
        let to = mv.to();
        let moved_piece = self.piece_at(from);
        let color = moved_piece.color();
        let kind = moved_piece.kind();
        let keys = zobrist_keys();

        let hash_before = self.zobrist_hash;
        let prev_castle_flags = self.castle_flags;
        let prev_en_passant_pawn = self.en_passant_pawn;
        let prev_halfmove_clock = self.halfmove_clock;

        if let Some(file) = ep_file_to_hash(self) {
            self.zobrist_hash ^= keys.ep_file[file as usize];
        }

        let is_ep_capture = kind == Kind::Pawn && from.file() != to.file() && self.piece_at(to).is_empty();
        let mut captured = if is_ep_capture {
            let cap_sq = prev_en_passant_pawn.expect("en passant move implies a tracked ep pawn");
            let cap_piece = self.piece_at(cap_sq);
            self.set_piece(cap_sq, Piece::Empty);
            self.zobrist_hash ^= keys.piece_square(cap_piece, cap_sq);
            Some((cap_piece, cap_sq))
        } else {
            None
        };
        if captured.is_none() && !self.piece_at(to).is_empty() {
            let cap_piece = self.piece_at(to);
            self.zobrist_hash ^= keys.piece_square(cap_piece, to);
            captured = Some((cap_piece, to));
        }

        let is_castle = kind == Kind::King && (to.index() as i16 - from.index() as i16).abs() == 2;
        let castle_rook = if is_castle {
            let rank = from.rank();
            let kingside = to.file() > from.file();
            let (rook_from_file, rook_to_file) = if kingside { (7, 5) } else { (0, 3) };
            let rook_from = Square::from_file_rank(rook_from_file, rank);
            let rook_to = Square::from_file_rank(rook_to_file, rank);
            let rook_piece = self.piece_at(rook_from);
            self.set_piece(rook_from, Piece::Empty);
            self.set_piece(rook_to, rook_piece);
            self.zobrist_hash ^= keys.piece_square(rook_piece, rook_from);
            self.zobrist_hash ^= keys.piece_square(rook_piece, rook_to);
            Some((rook_from, rook_to, rook_piece))
        } else {
            None
        };

        self.set_piece(from, Piece::Empty);
        self.zobrist_hash ^= keys.piece_square(moved_piece, from);
        let placed_piece = match mv.promotion() {
            Some(promo) => promo.to_piece(color),
            None => moved_piece,
        };
        self.set_piece(to, placed_piece);
        self.zobrist_hash ^= keys.piece_square(placed_piece, to);

        let new_castle_flags = self.castle_flags & !(rights_cleared_by_square(from) | rights_cleared_by_square(to));
        xor_castling_rights_delta(&mut self.zobrist_hash, keys, self.castle_flags, new_castle_flags);
        self.castle_flags = new_castle_flags;

        let is_double_push = kind == Kind::Pawn && (to.rank() as i16 - from.rank() as i16).abs() == 2;
        self.en_passant_pawn = if is_double_push { Some(to) } else { None };

        self.halfmove_clock = if kind == Kind::Pawn || captured.is_some() { 0 } else { self.halfmove_clock + 1 };

        self.ply_number += 1;
        self.zobrist_hash ^= keys.turn;
        self.invalidate_side_info();
        self.normalize_en_passant_status();

        if let Some(file) = ep_file_to_hash(self) {
            self.zobrist_hash ^= keys.ep_file[file as usize];
        }

        #[cfg(feature = "paranoid_hash")]
        self.assert_hash();

        self.undo_stack.push(UndoFrame {
            mv,
            moved_piece,
            captured,
            castle_rook,
            prev_castle_flags,
            prev_en_passant_pawn,
            prev_halfmove_clock,
            hash_before,
        });
    }

    /// Reverse the last `make_move`. Panics if the undo journal is empty —
    /// callers must make exactly what they unmake. The Zobrist hash is
    /// restored from the frame's stored pre-move value rather than
    /// reversed incrementally.
    pub fn undo_move(&mut self) {
        let frame = self.undo_stack.pop().expect("undo_move with no prior make_move");

        let from = frame.mv.from();
        let to = frame.mv.to();

        self.set_piece(from, frame.moved_piece);
        self.set_piece(to, Piece::Empty);

        if let Some((piece, sq)) = frame.captured {
            self.set_piece(sq, piece);
        }

        if let Some((rook_from, rook_to, rook_piece)) = frame.castle_rook {
            self.set_piece(rook_to, Piece::Empty);
            self.set_piece(rook_from, rook_piece);
        }

        self.castle_flags = frame.prev_castle_flags;
        self.en_passant_pawn = frame.prev_en_passant_pawn;
        self.halfmove_clock = frame.prev_halfmove_clock;
        self.ply_number -= 1;
        self.zobrist_hash = frame.hash_before;
        self.invalidate_side_info();

        #[cfg(feature = "paranoid_hash")]
        self.assert_hash();
    }

    /// Clear `en_passant_pawn` unless a side-to-move pawn actually stands
    /// adjacent to it — Polyglot-style hashing and FEN emission only ever
    /// see a capturable ep square, never a merely-historical one.
    pub fn normalize_en_passant_status(&mut self) {
        let Some(pawn_sq) = self.en_passant_pawn else { return };
        let capturer = Piece::make(self.side_to_move(), Kind::Pawn);
        let rank = pawn_sq.rank();
        let file = pawn_sq.file();
        let adjacent = [file.checked_sub(1), (file < 7).then_some(file + 1)];
        let capturable = adjacent
            .into_iter()
            .flatten()
            .any(|f| self.piece_at(Square::from_file_rank(f, rank)) == capturer);
        if !capturable {
            self.en_passant_pawn = None;
        }
    }

    /// Post-move check: does the side that just moved leave its own king
    /// safe? Requires fresh side info, which it computes itself.
    pub fn was_legal_move(&mut self) -> bool {
        self.update_side_info();
        let mover_king = self.xside().king;
        self.side().attacks[mover_king.index() as usize] == 0
    }

    /// Pre-move check for the one case that can't be judged by
    /// `was_legal_move` alone: a king may not castle through or out of
    /// check, even though only its final square is tested once the move is
    /// made. Every other move is pseudo-legal-safe to make and test after.
    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.side_info_guard();
        let from = mv.from();
        let to = mv.to();
        if self.piece_at(from).kind() != Kind::King || (to.index() as i16 - from.index() as i16).abs() != 2 {
            return true;
        }
        let step: i16 = if to.file() > from.file() { 1 } else { -1 };
        let mid = Square::from_file_rank((from.file() as i16 + step) as u8, from.rank());
        [from, mid, to]
            .iter()
            .all(|&sq| self.xside().attacks[sq.index() as usize] == 0)
    }
}
