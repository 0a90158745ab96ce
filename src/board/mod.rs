mod fen;
mod make_unmake;
mod side_info;
mod undo;

use std::fmt;
use std::str::FromStr;

use crate::castle::CastleFlags;
use crate::piece::{Color, Piece};
use crate::square::{Mbx, Square};
use crate::zobrist;

pub use fen::{BoardError, START_POS};
pub(crate) use undo::UndoFrame;

/// Attacker-class flags packed into one byte per square, saturating where a
/// count is kept: bits 7..6 pawn-count, 5..4 minor-count, 3..2 rook-count,
/// bit 1 queen-present, bit 0 king-present.
pub const ATTACK_KING: u8 = 1;
pub const ATTACK_QUEEN: u8 = 2;
pub const ATTACK_ROOK: u8 = 4;
pub const ATTACK_MINOR: u8 = 16;
pub const ATTACK_PAWN: u8 = 64;

/// Per-color derived view: who attacks what, and where the king is.
/// Rebuilt wholesale by `update_side_info`, never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    pub attacks: [u8; 64],
    pub king: Square,
}

impl Side {
    fn empty() -> Self {
        Side {
            attacks: [0u8; 64],
            king: Square::new(0),
        }
    }
}

/// Core mutable chess position: mailbox squares, castling/ep/clock state,
/// derived side info, and the undo journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [i8; 120],

    pub castle_flags: CastleFlags,
    pub en_passant_pawn: Option<Square>,
    pub halfmove_clock: u32,

    /// Monotone ply counter; `ply_number & 1` is the side to move (0=white).
    pub ply_number: u32,

    /// Opaque rating delta, preserved across FEN round-trips, ignored by
    /// everything else in this crate.
    pub elo_diff: i32,

    sides: [Side; 2],
    /// `ply_number` as of the last `update_side_info` call; compared with
    /// `i64` so the "never computed" sentinel (-1) can't alias a real ply.
    side_info_ply: i64,

    /// Maintained incrementally by `make_move`/`undo_move`; `hash64()` just
    /// returns this rather than recomputing from scratch every call.
    pub(crate) zobrist_hash: u64,

    pub(crate) undo_stack: Vec<UndoFrame>,
}

impl Board {
    /// An empty board (no pieces), White to move, no rights.
    pub fn new_empty() -> Self {
        Board {
            squares: [crate::square::OFF_BOARD as i8; 120],
            castle_flags: 0,
            en_passant_pawn: None,
            halfmove_clock: 0,
            ply_number: 0,
            elo_diff: 0,
            sides: [Side::empty(), Side::empty()],
            side_info_ply: -1,
            zobrist_hash: 0,
            undo_stack: Vec::with_capacity(256),
        }
        .with_real_squares_cleared()
    }

    fn with_real_squares_cleared(mut self) -> Self {
        for i in 0..64u8 {
            let mbx = Square::new(i).mbx();
            self.squares[mbx.0 as usize] = Piece::Empty.raw();
        }
        self.zobrist_hash = zobrist::hash64(&self);
        self
    }

    /// The standard chess starting position.
    pub fn new() -> Self {
        let mut b = Board::new_empty();
        b.set_up(START_POS).expect("START_POS is valid FEN");
        b
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        if self.ply_number & 1 == 0 { Color::White } else { Color::Black }
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.ply_number / 2 + 1
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Piece {
        let raw = self.squares[sq.mbx().0 as usize];
        Piece::from_raw(raw).expect("on-board cell always holds a valid piece")
    }

    #[inline(always)]
    pub(crate) fn piece_at_mbx(&self, mbx: Mbx) -> Option<Piece> {
        let raw = self.squares[mbx.0 as usize];
        if raw == crate::square::OFF_BOARD {
            None
        } else {
            Piece::from_raw(raw)
        }
    }

    #[inline(always)]
    pub(crate) fn set_piece(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.mbx().0 as usize] = piece.raw();
    }

    /// This side's derived attack/king view. Panics (via `debug_assert`) if
    /// stale — callers must run `update_side_info` first.
    #[inline(always)]
    pub fn side(&self) -> &Side {
        self.side_info_guard();
        &self.sides[self.side_to_move() as usize]
    }

    #[inline(always)]
    pub fn xside(&self) -> &Side {
        self.side_info_guard();
        &self.sides[self.side_to_move().opposite() as usize]
    }

    fn side_info_guard(&self) {
        debug_assert_eq!(
            self.side_info_ply, self.ply_number as i64,
            "side info is stale: call update_side_info() after setup/make/undo"
        );
    }

    pub fn side_info_current(&self) -> bool {
        self.side_info_ply == self.ply_number as i64
    }

    /// Recompute both sides' attack tables and king squares from `squares`.
    /// Idempotent: a no-op if already current for this `ply_number`.
    pub fn update_side_info(&mut self) {
        if self.side_info_current() {
            return;
        }
        side_info::rebuild(self);
        self.side_info_ply = self.ply_number as i64;
    }

    fn invalidate_side_info(&mut self) {
        self.side_info_ply = -1;
    }

    /// True iff the side to move is in check. Requires current side info.
    pub fn in_check(&self) -> bool {
        self.xside().attacks[self.side().king.index() as usize] != 0
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.side_info_guard();
        self.sides[color as usize].king
    }

    /// Polyglot-style hash of the current position, maintained
    /// incrementally by `make_move`/`undo_move`.
    pub fn hash64(&self) -> u64 {
        self.zobrist_hash
    }

    /// Cross-check the incrementally maintained hash against a from-scratch
    /// recomputation. Only compiled in under `paranoid_hash`.
    #[cfg(feature = "paranoid_hash")]
    pub(crate) fn assert_hash(&self) {
        let full = zobrist::hash64(self);
        debug_assert_eq!(
            self.zobrist_hash, full,
            "zobrist hash mismatch: incremental={:#018x} full={:#018x}",
            self.zobrist_hash, full
        );
    }

    /// Number of times the current position's hash appears in the undo
    /// journal since the last irreversible move (pawn push or capture),
    /// plus the current occurrence itself.
    pub fn repetition_count(&self) -> u32 {
        let current = self.hash64();
        let window = self.halfmove_clock as usize;
        let mut count = 1u32;
        for frame in self.undo_stack.iter().rev().take(window) {
            if frame.hash_before == current {
                count += 1;
            }
        }
        count
    }

    pub fn is_threefold(&self) -> bool {
        self.repetition_count() >= 3
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::new_empty();
        board.set_up(s)?;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
