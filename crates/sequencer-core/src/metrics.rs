use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Non-blocking, side-effect-only metrics adapter.
///
/// All fields are plain atomics so observation never takes a lock and
/// never blocks the critical section that calls into it — the sequencer
/// updates `queue_size` on every exit from its critical section (both
/// success and rejection) and on every `try_read`, and observes batch size
/// after a successful enqueue.
#[derive(Debug, Default)]
pub struct Metrics {
    queue_size: AtomicUsize,
    batches_observed: AtomicU64,
    entries_observed: AtomicU64,
    max_batch_size: AtomicU64,
    rejections_full: AtomicU64,
    rejections_closed: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a successfully enqueued batch of `n` entries.
    pub(crate) fn observe_batch_size(&self, n: usize) {
        self.batches_observed.fetch_add(1, Ordering::Relaxed);
        self.entries_observed.fetch_add(n as u64, Ordering::Relaxed);
        self.max_batch_size.fetch_max(n as u64, Ordering::Relaxed);
    }

    /// Sets the current queue depth gauge.
    pub(crate) fn set_queue_size(&self, k: usize) {
        self.queue_size.store(k, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection_full(&self) {
        self.rejections_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection_closed(&self) {
        self.rejections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a consistent-enough snapshot for reporting. Individual fields
    /// are read independently (no lock spans them all), matching the
    /// non-blocking contract — a snapshot may interleave slightly with a
    /// concurrent update, which is acceptable for a metrics adapter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_size: self.queue_size.load(Ordering::Relaxed),
            batches_observed: self.batches_observed.load(Ordering::Relaxed),
            entries_observed: self.entries_observed.load(Ordering::Relaxed),
            max_batch_size: self.max_batch_size.load(Ordering::Relaxed),
            rejections_full: self.rejections_full.load(Ordering::Relaxed),
            rejections_closed: self.rejections_closed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Metrics`], cheap to pass around and log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Current number of batches buffered in the queue.
    pub queue_size: usize,
    /// Total batches successfully enqueued over the sequencer's lifetime.
    pub batches_observed: u64,
    /// Total entries successfully enqueued over the sequencer's lifetime.
    pub entries_observed: u64,
    /// Largest single batch successfully enqueued so far.
    pub max_batch_size: u64,
    /// Writes rejected because the queue was full.
    pub rejections_full: u64,
    /// Writes rejected because the sequencer was closed.
    pub rejections_closed: u64,
}

impl MetricsSnapshot {
    /// Mean entries per accepted batch, or `0.0` if none were observed.
    #[must_use]
    pub fn mean_batch_size(&self) -> f64 {
        if self.batches_observed == 0 {
            0.0
        } else {
            self.entries_observed as f64 / self.batches_observed as f64
        }
    }
}
