//! Debug assertion macros for the async adapter layer.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`).

// =============================================================================
// INV-STREAM-01: Backpressure Relief Signaling
// =============================================================================

/// Assert that backpressure was signaled after draining batches.
///
/// **Invariant**: `drained_count > 0 -> backpressure_notify.notify_waiters()`
macro_rules! debug_assert_backpressure_signaled {
    ($drained:expr, $signaled:expr) => {
        debug_assert!(
            $drained == 0 || $signaled,
            "INV-STREAM-01 violated: drained {} batches but did not signal backpressure relief",
            $drained
        )
    };
}

// =============================================================================
// INV-STREAM-02: Stream Ends Only After Close And Drain
// =============================================================================

/// Assert the stream only reports exhaustion once the sequencer is closed
/// and its queue is empty.
macro_rules! debug_assert_stream_end_is_final {
    ($closed:expr, $queue_empty:expr) => {
        debug_assert!(
            $closed && $queue_empty,
            "INV-STREAM-02 violated: stream reported exhaustion while closed={} queue_empty={}",
            $closed,
            $queue_empty
        )
    };
}

pub(crate) use debug_assert_backpressure_signaled;
pub(crate) use debug_assert_stream_end_is_final;
