//! Configuration for stream behavior.

use std::time::Duration;

/// Configuration for async stream behavior.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Poll interval for the hybrid polling strategy.
    ///
    /// Even with event-driven notify, this interval acts as a safety net
    /// to catch missed notifications.
    ///
    /// Default: 10ms
    pub poll_interval: Duration,

    /// Upper bound on how many batches a single poll drains from the
    /// sequencer before yielding control back to the executor.
    ///
    /// Default: 64
    pub batch_hint: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            batch_hint: 64,
        }
    }
}

impl StreamConfig {
    /// Low-latency preset: shorter poll interval, smaller batch hint.
    #[must_use]
    pub fn low_latency() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
            batch_hint: 16,
        }
    }

    /// High-throughput preset: longer poll interval, larger batch hint.
    #[must_use]
    pub fn high_throughput() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            batch_hint: 256,
        }
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the batch hint.
    #[must_use]
    pub fn with_batch_hint(mut self, hint: usize) -> Self {
        self.batch_hint = hint;
        self
    }
}
