//! Attack-table construction: walk every piece on the board and, for each
//! square it attacks, bump the defending side's attacker-class byte.
//! O(pieces × rays); rebuilt wholesale, never patched incrementally.

use tracing::trace;

use super::{ATTACK_KING, ATTACK_QUEEN, Board};
use crate::piece::{Color, Kind};
use crate::square::{BISHOP_RAYS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_RAYS, Square, pawn_push_dir};

#[inline(always)]
fn bump_count_field(byte: u8, shift: u8) -> u8 {
    let mask = 0b11u8 << shift;
    let count = (byte & mask) >> shift;
    if count >= 2 {
        byte
    } else {
        (byte & !mask) | ((count + 1) << shift)
    }
}

pub(super) fn rebuild(board: &mut Board) {
    trace!(ply = board.ply_number, "rebuilding attack side info");
    for side in 0..2 {
        board.sides[side].attacks = [0u8; 64];
    }

    for idx in 0..64u8 {
        let sq = Square::new(idx);
        let Some((color, kind)) = board.piece_at(sq).color_and_kind() else {
            continue;
        };

        match kind {
            Kind::King => {
                board.sides[color as usize].king = sq;
                mark_leaps(&mut board.sides[color as usize].attacks, sq, &KING_OFFSETS, ATTACK_KING, None);
            }
            Kind::Knight => {
                mark_leaps(&mut board.sides[color as usize].attacks, sq, &KNIGHT_OFFSETS, 0, Some(4));
            }
            Kind::Pawn => mark_pawn(&mut board.sides[color as usize].attacks, sq, color),
            Kind::Bishop => mark_rays(board, color, sq, &BISHOP_RAYS, 0, Some(4)),
            Kind::Rook => mark_rays(board, color, sq, &ROOK_RAYS, 0, Some(2)),
            Kind::Queen => {
                mark_rays(board, color, sq, &BISHOP_RAYS, ATTACK_QUEEN, None);
                mark_rays(board, color, sq, &ROOK_RAYS, ATTACK_QUEEN, Some(2));
            }
        }
    }
}

/// Bump/OR the attacker-class for a single-hop leaper (king, knight) at
/// every landing square reachable from `from`. `presence_bit` is OR'd in
/// directly (king); `count_shift` bumps a saturating 2-bit count field
/// (knight, folded into the "minor" field).
fn mark_leaps(attacks: &mut [u8], from: Square, offsets: &[i16], presence_bit: u8, count_shift: Option<u8>) {
    let mbx = from.mbx();
    for &delta in offsets {
        if let Some(to) = mbx.offset(delta).to_square() {
            let cell = &mut attacks[to.index() as usize];
            if presence_bit != 0 {
                *cell |= presence_bit;
            }
            if let Some(shift) = count_shift {
                *cell = bump_count_field(*cell, shift);
            }
        }
    }
}

fn mark_pawn(attacks: &mut [u8], from: Square, color: Color) {
    let dir = pawn_push_dir(color == Color::White);
    let mbx = from.mbx();
    for &file_delta in &[-1i16, 1i16] {
        if let Some(to) = mbx.offset(dir + file_delta).to_square() {
            let cell = &mut attacks[to.index() as usize];
            *cell = bump_count_field(*cell, 6);
        }
    }
}

/// Walk each ray direction from `from` until the board edge or a blocker,
/// marking every square passed through (including the blocker itself, since
/// a slider attacks the square a blocking piece sits on).
fn mark_rays(board: &mut Board, color: Color, from: Square, rays: &[i16], presence_bit: u8, count_shift: Option<u8>) {
    // Borrow-split: read board.squares for blockers while writing into
    // board.sides[color].attacks.
    let mbx = from.mbx();
    for &dir in rays {
        let mut cur = mbx.offset(dir);
        while let Some(to) = cur.to_square() {
            {
                let cell = &mut board.sides[color as usize].attacks[to.index() as usize];
                if presence_bit != 0 {
                    *cell |= presence_bit;
                }
                if let Some(shift) = count_shift {
                    *cell = bump_count_field(*cell, shift);
                }
            }
            if !board.piece_at(to).is_empty() {
                break;
            }
            cur = cur.offset(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ATTACK_ROOK;
    use crate::board::Board;
    use crate::square::Square;

    #[test]
    fn startpos_no_checks() {
        let mut b = Board::new();
        b.update_side_info();
        assert!(!b.in_check());
    }

    #[test]
    fn opening_king_sees_no_attackers() {
        let mut b = Board::new();
        b.update_side_info();
        assert_eq!(b.side().attacks[b.xside().king.index() as usize], 0);
    }

    #[test]
    fn queen_rook_ray_bumps_the_rook_count_field() {
        let mut b: Board = "4k3/8/8/8/4Q3/8/8/4K3 w - - 0 1".parse().unwrap();
        b.update_side_info();
        let e1 = Square::from_file_rank(4, 0);
        assert_ne!(b.side().attacks[e1.index() as usize] & ATTACK_ROOK, 0);
    }
}
