#[cfg(test)]
mod tests {
    use chesscore::TranspositionTable;

    /// Four slots, one bucket — every hash below collides by construction,
    /// which is what lets these tests pin down the exact eviction choice.
    const ONE_BUCKET_BYTES: usize = 4 * 16;

    #[test]
    fn eviction_prefers_the_shallowest_entry_in_a_full_bucket() {
        let mut tt = TranspositionTable::new(ONE_BUCKET_BYTES);

        let entries = [(1u64, 1u8, 10i32), (2u64, 5u8, 20), (3u64, 3u8, 30), (4u64, 2u8, 40)];
        for &(hash, depth, score) in &entries {
            let slot = tt.tt_read(hash, 0);
            tt.tt_write(slot, depth, score, -1000, 1000, 10, 0);
        }

        // The bucket is now full; a fifth distinct hash must evict one of
        // the four. Depth 1 (hash 1) is the shallowest, so it goes.
        let slot = tt.tt_read(5u64, 0);
        tt.tt_write(slot, 4, 50, -1000, 1000, 10, 0);

        assert_eq!(tt.tt_read(1u64, 0).best_move(), None);
        assert_eq!(tt.tt_read(1u64, 0).score(), 0);

        // The deepest surviving entry (hash 2, depth 5) must still be there.
        let survivor = tt.tt_read(2u64, 0);
        assert_eq!(survivor.score(), 20);
        assert_eq!(survivor.depth(), 5);
    }

    #[test]
    fn aging_outweighs_depth_when_choosing_what_to_evict() {
        let mut tt = TranspositionTable::new(ONE_BUCKET_BYTES);

        let old_hash = 11u64;
        let slot = tt.tt_read(old_hash, 0);
        tt.tt_write(slot, 20, 5, -1000, 1000, 10, 0);

        tt.new_search();
        tt.new_search();

        for hash in [22u64, 33, 44] {
            let slot = tt.tt_read(hash, 0);
            tt.tt_write(slot, 1, 7, -1000, 1000, 10, 0);
        }

        // One more write forces an eviction. Despite carrying ten times the
        // depth of its rivals, the two-generations-stale entry loses —
        // `prio`'s age term (shifted by DEPTH_BITS) dominates depth.
        let slot = tt.tt_read(55u64, 0);
        tt.tt_write(slot, 1, 9, -1000, 1000, 10, 0);

        assert_eq!(tt.tt_read(old_hash, 0).best_move(), None);
        assert_eq!(tt.tt_read(22u64, 0).score(), 7);
    }

    #[test]
    fn hard_bound_resists_a_weaker_overwrite() {
        let mut tt = TranspositionTable::new(1 << 16);
        let hash = 0xABCDu64;

        // A fail-high at a true mate score is marked a hard lower bound.
        let slot = tt.tt_read(hash, 2);
        tt.tt_write(slot, 8, 29_050, -1000, 100, 1, 2);

        let refreshed = tt.tt_read(hash, 2);
        assert_eq!(refreshed.score(), 29_050);
        assert!(refreshed.is_hard_bound());

        // A later, weaker fail-high at the same hash must not overwrite it.
        let result = tt.tt_write(refreshed, 4, 29_040, -1000, 100, 1, 2);
        assert_eq!(result, 29_050);
        assert_eq!(tt.tt_read(hash, 2).score(), 29_050);
    }

    #[test]
    fn clear_fast_does_not_disturb_the_load_estimate() {
        let mut tt = TranspositionTable::new(ONE_BUCKET_BYTES);
        // Every slot starts zeroed, and a zeroed date field equals the
        // table's initial generation counter, so a brand new table reads as
        // fully loaded until entries from a later generation appear —
        // inherited as-is from the original engine's ttCalcLoad.
        assert_eq!(tt.tt_calc_load(), 1.0);

        // Advance the generation before writing so the untouched slots
        // (still date 0) no longer count toward the load estimate.
        tt.new_search();
        let slot = tt.tt_read(1u64, 0);
        tt.tt_write(slot, 2, 1, -1000, 1000, 10, 0);

        let before = tt.tt_calc_load();
        assert_eq!(before, 0.25);
        tt.tt_clear_fast();
        // tt_clear_fast only perturbs `base_hash`, used to compute probe
        // keys; it never touches a slot's stored generation.
        assert_eq!(tt.tt_calc_load(), before);
        assert!(tt.tt_read(1u64, 0).best_move().is_none());
    }
}
