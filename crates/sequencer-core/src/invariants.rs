//! Debug assertion macros for sequencer invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds. Mirrors the invariant-macro convention
//! used for the ring buffer this crate's workspace sibling was built
//! against.

// =============================================================================
// INV-POS-01: Monotonic, Contiguous Position Assignment
// =============================================================================

/// Assert that an accepted batch was assigned the exact position that was
/// snapshotted before it, i.e. no other writer could have intervened
/// between snapshot and enqueue inside the same critical section.
///
/// Used in: `Sequencer::try_write`, `Sequencer::try_write_batch`.
macro_rules! debug_assert_position_contiguous {
    ($snapshotted:expr, $assigned:expr) => {
        debug_assert_eq!(
            $snapshotted, $assigned,
            "INV-POS-01 violated: batch assigned first_position {} but position counter was {} at snapshot time",
            $assigned, $snapshotted
        )
    };
}

/// Assert that the position counter only ever advances.
///
/// Used in: `Sequencer::try_write`, `Sequencer::try_write_batch` after a
/// successful enqueue.
macro_rules! debug_assert_position_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new > $old,
            "INV-POS-01 violated: position went from {} to {} (must strictly increase)",
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-Q-01: Bounded Queue
// =============================================================================

/// Assert the queue never holds more batches than its fixed capacity.
///
/// Used in: `Sequencer::try_write`, `Sequencer::try_write_batch` on every
/// critical-section exit.
macro_rules! debug_assert_bounded_queue {
    ($len:expr, $capacity:expr) => {
        debug_assert!(
            $len <= $capacity,
            "INV-Q-01 violated: queue length {} exceeds capacity {}",
            $len,
            $capacity
        )
    };
}

// =============================================================================
// INV-FIFO-01: Non-Decreasing Read Order
// =============================================================================

/// Assert that successive `try_read`/`peek` calls never observe a batch
/// with a lower first_position than the previously read batch.
///
/// Used in: `Sequencer::try_read` (debug builds only; tracked via a
/// per-sequencer `last_read_position` cell).
macro_rules! debug_assert_fifo_order {
    ($previous:expr, $current:expr) => {
        debug_assert!(
            $previous.map_or(true, |p| $current >= p),
            "INV-FIFO-01 violated: read batch at position {} after previously reading position {:?}",
            $current,
            $previous
        )
    };
}

pub(crate) use debug_assert_bounded_queue;
pub(crate) use debug_assert_fifo_order;
pub(crate) use debug_assert_position_contiguous;
pub(crate) use debug_assert_position_monotonic;
