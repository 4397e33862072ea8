//! Async reader implementing `futures::Stream` over a shared [`Sequencer`].

use crate::config::StreamConfig;
#[cfg(debug_assertions)]
use crate::invariants::{debug_assert_backpressure_signaled, debug_assert_stream_end_is_final};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::Notify;
use tokio::time::{interval, Interval};

use futures_core::{Future, Stream};
use pin_project_lite::pin_project;
use sequencer_core::{AppendEntry, SequencedBatch, Sequencer};

pin_project! {
    /// Async stream of sequenced batches drained from a shared sequencer.
    ///
    /// Uses the same hybrid event-driven-plus-poll-interval strategy the
    /// stream layer this crate started from uses: a wake-up fires
    /// `data_notify`, but `poll_timer` is a safety net against a missed
    /// notification (the sequencer only signals a registered consumer, and
    /// there is exactly one).
    pub struct SequencedReader<E> {
        sequencer: Arc<Sequencer<E>>,
        data_notify: Arc<Notify>,
        backpressure_notify: Arc<Notify>,
        config: StreamConfig,
        #[pin]
        poll_timer: Interval,
        buffer: VecDeque<SequencedBatch<E>>,
        data_pending: bool,
    }
}

impl<E: AppendEntry> SequencedReader<E> {
    pub(crate) fn new(
        sequencer: Arc<Sequencer<E>>,
        data_notify: Arc<Notify>,
        backpressure_notify: Arc<Notify>,
        config: StreamConfig,
    ) -> Self {
        Self {
            sequencer,
            data_notify,
            backpressure_notify,
            poll_timer: interval(config.poll_interval),
            buffer: VecDeque::with_capacity(config.batch_hint.min(64)),
            config,
            data_pending: false,
        }
    }

    /// Closes the sequencer for new writes. Already-buffered batches still
    /// drain through the stream before it reports exhaustion.
    ///
    /// Also wakes any writer parked on `backpressure_notify` and this
    /// reader's own `data_notify` wait, so closing from the consumer side
    /// is observed promptly instead of only on the next `poll_timer` tick.
    /// Mirrors the teacher's `ShutdownHandle::trigger` waking blocked
    /// senders as part of closing.
    pub fn close(&self) {
        self.sequencer.close();
        self.backpressure_notify.notify_waiters();
        self.data_notify.notify_waiters();
    }

    /// Number of batches currently buffered inside the reader, not counting
    /// whatever is still queued inside the sequencer.
    #[must_use]
    pub fn buffered_count(&self) -> usize {
        self.buffer.len()
    }
}

fn drain_into<E: AppendEntry>(
    sequencer: &Sequencer<E>,
    buffer: &mut VecDeque<SequencedBatch<E>>,
    limit: usize,
) -> usize {
    let mut drained = 0;
    while drained < limit {
        match sequencer.try_read() {
            Some(batch) => {
                buffer.push_back(batch);
                drained += 1;
            }
            None => break,
        }
    }
    drained
}

impl<E: AppendEntry> Stream for SequencedReader<E> {
    type Item = SequencedBatch<E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if let Some(batch) = this.buffer.pop_front() {
            return Poll::Ready(Some(batch));
        }

        if *this.data_pending {
            *this.data_pending = false;
            let drained = drain_into(this.sequencer, this.buffer, this.config.batch_hint.max(1));
            let signaled = drained > 0;
            if signaled {
                this.backpressure_notify.notify_waiters();
            }
            #[cfg(debug_assertions)]
            debug_assert_backpressure_signaled!(drained, signaled);

            if let Some(batch) = this.buffer.pop_front() {
                return Poll::Ready(Some(batch));
            }
        }

        let data_notified = this.data_notify.notified();
        tokio::pin!(data_notified);
        if let Poll::Ready(()) = data_notified.as_mut().poll(cx) {
            *this.data_pending = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        if let Poll::Ready(_) = this.poll_timer.as_mut().poll_tick(cx) {
            let drained = drain_into(this.sequencer, this.buffer, this.config.batch_hint);
            if drained > 0 {
                this.backpressure_notify.notify_waiters();
                #[cfg(debug_assertions)]
                debug_assert_backpressure_signaled!(drained, true);
                if let Some(batch) = this.buffer.pop_front() {
                    return Poll::Ready(Some(batch));
                }
            }
        }

        if this.sequencer.is_closed() {
            let drained = drain_into(this.sequencer, this.buffer, usize::MAX);
            if drained > 0 {
                this.backpressure_notify.notify_waiters();
            }
            if let Some(batch) = this.buffer.pop_front() {
                return Poll::Ready(Some(batch));
            }

            #[cfg(debug_assertions)]
            debug_assert_stream_end_is_final!(this.sequencer.is_closed(), this.buffer.is_empty());
            return Poll::Ready(None);
        }

        Poll::Pending
    }
}
