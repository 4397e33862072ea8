//! Property-based tests for the universal properties the sequencer's
//! contract is defined by.

use proptest::prelude::*;
use sequencer_core::Sequencer;

// =============================================================================
// Strictly increasing, contiguous positions for successful single writes
// =============================================================================

proptest! {
    #[test]
    fn prop_single_writes_strictly_increasing_and_contiguous(
        initial in 0i64..1_000_000,
        writes in 1usize..200,
    ) {
        let seq: Sequencer<Vec<u8>> = Sequencer::with_capacity(0, initial, 4096, writes + 1);

        let mut last = None;
        for i in 0..writes {
            let pos = seq.try_write(vec![i as u8], 0);
            prop_assert_ne!(pos, -1, "queue sized to never reject here");
            if let Some(prev) = last {
                prop_assert_eq!(pos, prev + 1, "positions must be contiguous");
            } else {
                prop_assert_eq!(pos, initial, "first write must get initial_position");
            }
            last = Some(pos);
        }
    }
}

// =============================================================================
// Batch writes fill [first, first+n) and return first + n - 1
// =============================================================================

proptest! {
    #[test]
    fn prop_batch_write_fills_contiguous_range(
        initial in 0i64..1_000_000,
        n in 1usize..100,
    ) {
        let seq: Sequencer<Vec<u8>> = Sequencer::with_capacity(0, initial, 4096, 1);
        let entries: Vec<Vec<u8>> = (0..n).map(|i| vec![i as u8]).collect();

        let highest = seq.try_write_batch(entries, 0);
        prop_assert_eq!(highest, initial + n as i64 - 1);

        let batch = seq.try_read().unwrap();
        prop_assert_eq!(batch.first_position(), initial);
        prop_assert_eq!(batch.len(), n);
        for i in 0..n {
            prop_assert_eq!(batch.position_of(i), Some(initial + i as i64));
        }
    }
}

// =============================================================================
// A rejected write never moves the position counter
// =============================================================================

proptest! {
    #[test]
    fn prop_rejected_write_does_not_move_position(
        initial in 0i64..1_000_000,
        capacity in 1usize..16,
    ) {
        let seq: Sequencer<Vec<u8>> = Sequencer::with_capacity(0, initial, 4096, capacity);

        for i in 0..capacity {
            prop_assert_eq!(seq.try_write(vec![i as u8], 0), initial + i as i64);
        }
        // Queue is now full; this write must be rejected...
        prop_assert_eq!(seq.try_write(vec![0], 0), -1);

        // ...and the next successful write receives the position the
        // rejected one would have received.
        let _ = seq.try_read().unwrap();
        prop_assert_eq!(seq.try_write(vec![0], 0), initial + capacity as i64);
    }
}

// =============================================================================
// can_write_events is a pure function of its inputs and max_fragment_size
// =============================================================================

proptest! {
    #[test]
    fn prop_can_write_events_matches_closed_form(
        event_count in 0usize..10_000,
        batch_size in 0usize..1_000_000,
        max_fragment_size in 1usize..2_000_000,
    ) {
        let seq: Sequencer<Vec<u8>> = Sequencer::new(0, 0, max_fragment_size);
        let overhead = sequencer_core::HEADER_LENGTH + sequencer_core::FRAME_ALIGNMENT;
        let framed = batch_size
            .saturating_add(event_count.saturating_mul(overhead))
            .saturating_add(sequencer_core::FRAME_ALIGNMENT);
        let expected = framed <= max_fragment_size;

        prop_assert_eq!(seq.can_write_events(event_count, batch_size), expected);
    }
}

// =============================================================================
// After close, every write is rejected; buffered batches still drain
// =============================================================================

proptest! {
    #[test]
    fn prop_close_rejects_all_future_writes_but_drains_buffered(
        pre_close_writes in 0usize..20,
        post_close_attempts in 0usize..10,
    ) {
        let seq: Sequencer<Vec<u8>> = Sequencer::with_capacity(0, 0, 4096, 32);

        for i in 0..pre_close_writes {
            prop_assert_ne!(seq.try_write(vec![i as u8], 0), -1);
        }
        seq.close();
        prop_assert!(seq.is_closed());

        for _ in 0..post_close_attempts {
            prop_assert_eq!(seq.try_write(vec![0], 0), -1);
        }

        let mut drained = 0;
        while seq.try_read().is_some() {
            drained += 1;
        }
        prop_assert_eq!(drained, pre_close_writes);
    }
}

// =============================================================================
// FIFO: the sequence read back matches the sequence of successful writes
// =============================================================================

proptest! {
    #[test]
    fn prop_fifo_read_order_matches_write_order(
        initial in 0i64..1_000_000,
        writes in 1usize..100,
    ) {
        let seq: Sequencer<Vec<u8>> = Sequencer::with_capacity(0, initial, 4096, writes + 1);

        let mut expected = Vec::with_capacity(writes);
        for i in 0..writes {
            let pos = seq.try_write(vec![i as u8], 0);
            expected.push(pos);
        }

        let mut observed = Vec::with_capacity(writes);
        while let Some(batch) = seq.try_read() {
            observed.push(batch.first_position());
        }

        prop_assert_eq!(observed, expected);
    }
}
