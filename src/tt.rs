//! Transposition table: bucketed open addressing with lockless slot
//! verification (`key == hash ^ data`) and priority-based replacement.
//! Grounded directly on the original engine's `ttable.c`, which is the
//! behavioral source of truth here — the bitfield `struct ttSlot` declared
//! in its own header doesn't match what that file actually reads and
//! writes, so this module follows the `.c` file's `slot.key`/`slot.data`
//! usage instead and gives it one consistent 16-byte layout.

use tracing::debug;

use crate::r#move::Move;

/// Slots per bucket. Must stay a power of two; `mask`'s low bits are
/// always clear so `hash & mask` lands on a bucket boundary.
pub const BUCKET_LEN: usize = 4;

const DEPTH_BITS: u32 = 7;
const DATE_BITS: u32 = 8;
const DATE_MASK: u8 = ((1u16 << DATE_BITS) - 1) as u8;

const MOVE_SHIFT: u32 = 0;
const SCORE_SHIFT: u32 = 16;
const DEPTH_SHIFT: u32 = 32;
const DATE_SHIFT: u32 = 39;
const UPPER_BIT: u32 = 47;
const LOWER_BIT: u32 = 48;
const HARD_BIT: u32 = 49;
const WIN_LOSS_BIT: u32 = 50;

/// Evaluation scores beyond this magnitude encode mate distance or
/// endgame-tablebase DTZ rather than a material/positional evaluation, and
/// get rebased by ply-from-root on store/load.
pub const MAX_EVAL: i32 = 29_000;
pub const MIN_EVAL: i32 = -29_000;
/// Above `MAX_EVAL + 1` and at or below this, a score is a DTZ value
/// rather than a literal mate-in-N; such scores are never stored at
/// `halfmove_clock == 0` since storing them would poison the position
/// right after the clock resets.
const MAX_DTZ: i32 = 30_000;
const MIN_DTZ: i32 = -30_000;

/// One 16-byte table slot. `key` is the probed hash XORed with `data`;
/// any single-word torn write between threads would make `key ^ data`
/// disagree with the probing hash and the slot reads as a miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtSlot {
    pub(crate) key: u64,
    pub(crate) data: u64,
}

const _: () = assert!(std::mem::size_of::<TtSlot>() == 16);

impl TtSlot {
    pub const EMPTY: TtSlot = TtSlot { key: 0, data: 0 };

    #[inline(always)]
    fn move_bits(&self) -> u16 {
        ((self.data >> MOVE_SHIFT) & 0xFFFF) as u16
    }

    #[inline(always)]
    fn depth_field(&self) -> u8 {
        ((self.data >> DEPTH_SHIFT) & 0x7F) as u8
    }

    #[inline(always)]
    fn date_field(&self) -> u8 {
        ((self.data >> DATE_SHIFT) & 0xFF) as u8
    }

    #[inline(always)]
    fn flag(&self, bit: u32) -> bool {
        (self.data >> bit) & 1 != 0
    }

    pub fn best_move(&self) -> Option<Move> {
        let mv = Move::from_bits(self.move_bits());
        if mv == Move::NONE { None } else { Some(mv) }
    }

    pub fn score(&self) -> i32 {
        (((self.data >> SCORE_SHIFT) & 0xFFFF) as u16 as i16) as i32
    }

    pub fn depth(&self) -> u8 {
        self.depth_field()
    }

    pub fn is_upper_bound(&self) -> bool {
        self.flag(UPPER_BIT)
    }

    pub fn is_lower_bound(&self) -> bool {
        self.flag(LOWER_BIT)
    }

    pub fn is_hard_bound(&self) -> bool {
        self.flag(HARD_BIT)
    }

    pub fn is_win_loss_score(&self) -> bool {
        self.flag(WIN_LOSS_BIT)
    }

    /// Set the move a caller wants persisted on the next `tt_write`; every
    /// other field carried in `self.data` is untouched until the write
    /// recomputes them.
    pub fn with_move(self, mv: Option<Move>) -> TtSlot {
        let bits = mv.map_or(0u64, |m| m.bits() as u64);
        TtSlot { key: self.key, data: (self.data & !0xFFFFu64) | bits }
    }
}

fn pack_data(move_bits: u16, score: i16, depth: u8, date: u8, upper: bool, lower: bool, hard: bool, win_loss: bool) -> u64 {
    let mut data = move_bits as u64;
    data |= (score as u16 as u64) << SCORE_SHIFT;
    data |= ((depth & 0x7F) as u64) << DEPTH_SHIFT;
    data |= (date as u64) << DATE_SHIFT;
    if upper {
        data |= 1 << UPPER_BIT;
    }
    if lower {
        data |= 1 << LOWER_BIT;
    }
    if hard {
        data |= 1 << HARD_BIT;
    }
    if win_loss {
        data |= 1 << WIN_LOSS_BIT;
    }
    data
}

/// Replacement priority: `(-age << DEPTH_BITS) + depth`. Higher wins;
/// older, shallower entries are replaced first.
fn prio(slot: &TtSlot, now: u8) -> i32 {
    let age = now.wrapping_sub(slot.date_field()) & DATE_MASK;
    -((age as i32) << DEPTH_BITS) + slot.depth_field() as i32
}

/// Public-domain xorshift64* (Vigna), used only to derive a fresh
/// `base_hash` — not a cryptographic primitive.
fn xorshift64star(mut x: u64) -> u64 {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    x.wrapping_mul(0x2545_F491_4F6C_DD1D)
}

/// Bucketed, lockless-hashed transposition table. Sized in bytes, rounded
/// down to the largest power-of-two bucket count that fits.
pub struct TranspositionTable {
    slots: Vec<TtSlot>,
    mask: usize,
    now: u8,
    base_hash: u64,
}

impl TranspositionTable {
    pub fn new(bytes: usize) -> Self {
        let mut tt = TranspositionTable { slots: Vec::new(), mask: 0, now: 0, base_hash: 0 };
        tt.set_size(bytes);
        tt
    }

    /// Resize to the largest power-of-two bucketed table fitting `bytes`
    /// (never smaller than one bucket). Shrinking keeps, per aliased
    /// destination slot, whichever source slot has the higher replacement
    /// priority; growing replicates the old modular image into new slots.
    pub fn set_size(&mut self, bytes: usize) {
        let slot_size = std::mem::size_of::<TtSlot>();
        let min_bytes = BUCKET_LEN * slot_size;
        let bytes = bytes.max(min_bytes);

        let mut size = min_bytes;
        let mut mask = 0usize;
        while size <= bytes.saturating_sub(size) {
            mask = (mask << 1) + BUCKET_LEN;
            size *= 2;
        }
        let new_count = mask + BUCKET_LEN;

        if self.slots.is_empty() {
            self.slots = vec![TtSlot::EMPTY; new_count];
        } else if new_count < self.slots.len() {
            let mut folded = vec![TtSlot::EMPTY; new_count];
            for &s in self.slots.iter() {
                let dest = (s.key ^ s.data) as usize % new_count;
                if prio(&s, self.now) > prio(&folded[dest], self.now) {
                    folded[dest] = s;
                }
            }
            self.slots = folded;
        } else if new_count > self.slots.len() {
            let old_len = self.slots.len();
            let grown = (0..new_count).map(|i| self.slots[i % old_len]).collect();
            self.slots = grown;
        }

        self.mask = mask;
        debug!(slots = self.slots.len(), bytes, "tt resized");
    }

    /// Look up `hash`. On a hit, mate/DTZ scores are rebased to be
    /// root-relative by `ply_from_root`. On a miss, returns an otherwise
    /// empty slot whose `key` already holds the probe value, ready to be
    /// handed straight to `tt_write`.
    pub fn tt_read(&self, hash: u64, ply_from_root: u32) -> TtSlot {
        let probe = hash ^ self.base_hash;
        let bucket = (probe as usize) & self.mask;
        for i in 0..BUCKET_LEN {
            let local = self.slots[bucket + i];
            let key = local.key ^ local.data;
            if key == probe {
                let found = TtSlot { key, data: local.data };
                if found.is_win_loss_score() {
                    let score = found.score();
                    let rebased = if score >= 0 { score - ply_from_root as i32 } else { score + ply_from_root as i32 };
                    return TtSlot { key, data: with_score(local.data, rebased as i16) };
                }
                return found;
            }
        }
        TtSlot { key: probe, data: 0 }
    }

    /// Store a search result. `slot` should be whatever `tt_read` returned
    /// for this hash (optionally with `with_move` applied) — its existing
    /// score/bound fields gate whether an older hard bound should be kept
    /// instead of overwritten. Returns the score actually applicable after
    /// any early-exit or DTZ suppression.
    pub fn tt_write(&mut self, slot: TtSlot, depth: u8, score: i32, alpha: i32, beta: i32, halfmove_clock: u32, ply_from_root: u32) -> i32 {
        if slot.is_hard_bound()
            && ((slot.is_lower_bound() && score <= slot.score()) || (slot.is_upper_bound() && score >= slot.score()))
        {
            return slot.score();
        }

        let mut final_score = score;
        let is_upper = score <= alpha;
        let is_lower = score >= beta;
        let mut is_hard = false;
        let mut is_win_loss = false;

        if score > MAX_EVAL {
            if score > MAX_EVAL + 1 {
                if halfmove_clock == 0 && score <= MAX_DTZ {
                    return score;
                }
                final_score += ply_from_root as i32;
                is_win_loss = true;
            }
            is_hard = is_lower;
        } else if score < MIN_EVAL {
            if score < MIN_EVAL - 1 {
                if halfmove_clock == 0 && score >= MIN_DTZ {
                    return score;
                }
                final_score -= ply_from_root as i32;
                is_win_loss = true;
            }
            is_hard = is_upper;
        }

        let hash = slot.key;
        let bucket = (hash as usize) & self.mask;

        let mut chosen = 0usize;
        let mut best_prio = i32::MAX;
        let mut reused_existing = false;
        for i in 0..BUCKET_LEN {
            let local = self.slots[bucket + i];
            if (local.key ^ local.data) == hash {
                chosen = i;
                reused_existing = true;
                break;
            }
            let p = prio(&local, self.now);
            if p < best_prio {
                best_prio = p;
                chosen = i;
            }
        }
        let _ = reused_existing;

        let data = pack_data(slot.move_bits(), final_score as i16, depth, self.now, is_upper, is_lower, is_hard, is_win_loss);
        self.slots[bucket + chosen] = TtSlot { key: hash ^ data, data };

        score
    }

    /// O(1) logical clear: every existing key now misses, without
    /// touching the backing memory.
    pub fn tt_clear_fast(&mut self) {
        self.base_hash = !xorshift64star(!self.base_hash);
        debug!("tt cleared (fast)");
    }

    /// Fraction of (up to 10,000 sampled) slots written this search
    /// generation.
    pub fn tt_calc_load(&self) -> f64 {
        let m = self.slots.len().min(10_000);
        if m == 0 {
            return 0.0;
        }
        let n = self.slots[..m].iter().filter(|s| s.date_field() == self.now).count();
        n as f64 / m as f64
    }

    /// Advance the aging counter; called once per new root search so
    /// entries from prior searches age out of `prio`'s favor.
    pub fn new_search(&mut self) {
        self.now = self.now.wrapping_add(1);
    }
}

#[inline(always)]
fn with_score(data: u64, score: i16) -> u64 {
    (data & !(0xFFFFu64 << SCORE_SHIFT)) | ((score as u16 as u64) << SCORE_SHIFT)
}
