//! Polyglot-style position hashing: a fixed, process-wide random key table
//! generated once and held behind a `OnceCell`.

use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::board::Board;
use crate::castle::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::piece::{Color, Piece};
use crate::square::Square;

#[cfg(feature = "deterministic_keys")]
const KEY_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

fn make_rng() -> StdRng {
    #[cfg(feature = "deterministic_keys")]
    {
        StdRng::seed_from_u64(KEY_SEED)
    }
    #[cfg(not(feature = "deterministic_keys"))]
    {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        StdRng::from_seed(seed)
    }
}

/// `piece[raw 1..=12][square 0..64]`, `castling[K,Q,k,q]`, `ep_file[a..h]`,
/// `turn` (xored in when white is to move).
pub struct ZobristKeys {
    piece: [[u64; 64]; 13], // indexed by Piece::raw(); index 0 (Empty) unused
    pub(crate) castling: [u64; 4],
    pub(crate) ep_file: [u64; 8],
    pub(crate) turn: u64,
}

impl ZobristKeys {
    #[inline(always)]
    pub(crate) fn piece_square(&self, piece: Piece, sq: Square) -> u64 {
        self.piece[piece.raw() as usize][sq.index() as usize]
    }
}

pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate(make_rng()))
}

fn generate(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[0u64; 64]; 13],
        castling: [0u64; 4],
        ep_file: [0u64; 8],
        turn: 0,
    };

    for raw in 1..=12usize {
        for sq in 0..64 {
            keys.piece[raw][sq] = non_zero(&mut rng);
        }
    }
    for i in 0..4 {
        keys.castling[i] = non_zero(&mut rng);
    }
    for f in 0..8 {
        keys.ep_file[f] = non_zero(&mut rng);
    }
    keys.turn = non_zero(&mut rng);

    keys
}

/// XOR the castling-rights keys whose bit differs between `old_flags` and
/// `new_flags` into `hash`. Only the bits that actually changed need
/// touching, since XOR is its own inverse.
pub(crate) fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old_flags: u8, new_flags: u8) {
    let changed = old_flags ^ new_flags;
    if changed & CASTLE_WK != 0 {
        *hash ^= keys.castling[0];
    }
    if changed & CASTLE_WQ != 0 {
        *hash ^= keys.castling[1];
    }
    if changed & CASTLE_BK != 0 {
        *hash ^= keys.castling[2];
    }
    if changed & CASTLE_BQ != 0 {
        *hash ^= keys.castling[3];
    }
}

/// `Some(file)` iff `board.en_passant_pawn` implies an ep square that at
/// least one side-to-move pawn could legally (pseudo-legally) capture onto,
/// per Polyglot's "only hash ep when it's actually capturable" rule.
pub(crate) fn ep_file_to_hash(board: &Board) -> Option<u8> {
    let pawn_sq = board.en_passant_pawn?;
    // A capturing pawn stands on the same rank as the pawn it would take,
    // one file to either side — not the rank it passed over.
    let rank = pawn_sq.rank();
    let ep_file = pawn_sq.file();
    let capturer = Piece::make(board.side_to_move(), crate::piece::Kind::Pawn);

    let adjacent_files = [ep_file.checked_sub(1), (ep_file < 7).then_some(ep_file + 1)];
    for file in adjacent_files.into_iter().flatten() {
        let sq = Square::from_file_rank(file, rank);
        if board.piece_at(sq) == capturer {
            return Some(ep_file);
        }
    }
    None
}

/// Full from-scratch recompute of the Polyglot-style hash for `board`.
/// Used both as the authoritative definition and, under `paranoid_hash`, to
/// cross-check the incrementally maintained hash after every move.
pub fn hash64(board: &Board) -> u64 {
    let keys = zobrist_keys();
    let mut h = 0u64;

    for sq_idx in 0..64u8 {
        let sq = Square::new(sq_idx);
        let piece = board.piece_at(sq);
        if !piece.is_empty() {
            h ^= keys.piece_square(piece, sq);
        }
    }

    if board.castle_flags & CASTLE_WK != 0 {
        h ^= keys.castling[0];
    }
    if board.castle_flags & CASTLE_WQ != 0 {
        h ^= keys.castling[1];
    }
    if board.castle_flags & CASTLE_BK != 0 {
        h ^= keys.castling[2];
    }
    if board.castle_flags & CASTLE_BQ != 0 {
        h ^= keys.castling[3];
    }

    if let Some(file) = ep_file_to_hash(board) {
        h ^= keys.ep_file[file as usize];
    }

    if board.side_to_move() == Color::White {
        h ^= keys.turn;
    }

    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn startpos_hash_is_stable() {
        let b = Board::new();
        assert_eq!(hash64(&b), hash64(&b));
    }

    #[test]
    fn side_to_move_flips_hash() {
        let mut b = Board::new();
        let h_white = hash64(&b);
        b.ply_number += 1; // flip side to move without touching pieces
        let h_black = hash64(&b);
        assert_ne!(h_white, h_black);
    }

    #[test]
    fn capturable_ep_square_contributes_to_the_hash() {
        // e5 stands next to d5, so the d-file ep key must be folded in; the
        // otherwise-identical position with no ep right must hash
        // differently.
        let with_ep: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3".parse().unwrap();
        let without_ep: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQ - 0 3".parse().unwrap();
        assert_ne!(hash64(&with_ep), hash64(&without_ep));
        assert_eq!(ep_file_to_hash(&with_ep), Some(3));
        assert_eq!(ep_file_to_hash(&without_ep), None);
    }
}
