//! Async writer implementing `futures::Sink` over a shared [`Sequencer`].

use crate::error::SequencerStreamError;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Future;
use futures_sink::Sink;
use pin_project_lite::pin_project;
use sequencer_core::{AppendEntry, Position, Sequencer};
use tokio::sync::Notify;

pin_project! {
    /// Async handle for appending entries to a shared sequencer.
    ///
    /// Unlike a dedicated-ring producer, any number of `AppendWriter` clones
    /// may write to the same sequencer concurrently — the sequencer is
    /// itself the multi-producer coordination point, so there is no
    /// per-writer ring to keep exclusive. `AppendWriter` is `Clone`.
    pub struct AppendWriter<E> {
        sequencer: Arc<Sequencer<E>>,
        backpressure_notify: Arc<Notify>,
        data_notify: Arc<Notify>,
        pending_item: Option<E>,
    }
}

impl<E> Clone for AppendWriter<E> {
    fn clone(&self) -> Self {
        Self {
            sequencer: Arc::clone(&self.sequencer),
            backpressure_notify: Arc::clone(&self.backpressure_notify),
            data_notify: Arc::clone(&self.data_notify),
            pending_item: None,
        }
    }
}

impl<E: AppendEntry> AppendWriter<E> {
    pub(crate) fn new(
        sequencer: Arc<Sequencer<E>>,
        backpressure_notify: Arc<Notify>,
        data_notify: Arc<Notify>,
    ) -> Self {
        Self {
            sequencer,
            backpressure_notify,
            data_notify,
            pending_item: None,
        }
    }

    /// Non-blocking single-entry write. Mirrors [`Sequencer::try_write`].
    pub fn try_write(&self, entry: E, source_position: Position) -> Position {
        self.sequencer.try_write(entry, source_position)
    }

    /// Non-blocking batch write. Mirrors [`Sequencer::try_write_batch`].
    pub fn try_write_batch<I>(&self, entries: I, source_position: Position) -> Position
    where
        I: IntoIterator<Item = E>,
    {
        self.sequencer.try_write_batch(entries, source_position)
    }

    /// Returns `true` if the underlying sequencer is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sequencer.is_closed()
    }

    /// Closes the underlying sequencer. Idempotent.
    ///
    /// Also wakes any writer parked in [`write`](Self::write) or in
    /// `Sink::poll_ready`/`poll_flush` waiting on `backpressure_notify`, and
    /// any reader parked on `data_notify` — otherwise a writer blocked on a
    /// full queue with no consumer left draining it would never re-check
    /// `is_closed()` and would hang forever. Mirrors the teacher's
    /// `ShutdownHandle::trigger`/`ShutdownSignal::shutdown` waking blocked
    /// senders as part of closing.
    pub fn close(&self) {
        self.sequencer.close();
        self.backpressure_notify.notify_waiters();
        self.data_notify.notify_waiters();
    }
}

impl<E: AppendEntry + Clone> AppendWriter<E> {
    /// Writes a single entry, waiting for queue space if it is full.
    ///
    /// `try_write`'s sentinel contract consumes the entry on every call,
    /// accepted or not, so a retry loop needs its own copy to offer again
    /// after a rejection — hence the `Clone` bound here. Callers that can't
    /// or don't want to clone should call
    /// [`try_write`](Self::try_write) directly and handle `-1` themselves.
    ///
    /// Returns [`SequencerStreamError::Closed`] if the sequencer is closed
    /// either before the write or while waiting for backpressure relief.
    pub async fn write(
        &self,
        entry: E,
        source_position: Position,
    ) -> Result<Position, SequencerStreamError> {
        loop {
            if self.sequencer.is_closed() {
                return Err(SequencerStreamError::Closed);
            }

            let position = self.sequencer.try_write(entry.clone(), source_position);
            if position != -1 {
                return Ok(position);
            }

            self.backpressure_notify.notified().await;
        }
    }
}

impl<E: AppendEntry + Clone> Sink<E> for AppendWriter<E> {
    type Error = SequencerStreamError;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.project();

        if this.sequencer.is_closed() {
            return Poll::Ready(Err(SequencerStreamError::Closed));
        }

        if let Some(item) = this.pending_item.as_ref() {
            let position = this.sequencer.try_write(item.clone(), 0);
            if position != -1 {
                *this.pending_item = None;
                return Poll::Ready(Ok(()));
            }

            let notified = this.backpressure_notify.notified();
            tokio::pin!(notified);
            return match notified.poll(cx) {
                Poll::Ready(()) => {
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
                Poll::Pending => Poll::Pending,
            };
        }

        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: E) -> Result<(), Self::Error> {
        let this = self.project();

        if this.sequencer.is_closed() {
            return Err(SequencerStreamError::Closed);
        }

        *this.pending_item = Some(item);
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.project();

        if this.sequencer.is_closed() {
            return Poll::Ready(Err(SequencerStreamError::Closed));
        }

        if let Some(item) = this.pending_item.as_ref() {
            let position = this.sequencer.try_write(item.clone(), 0);
            if position != -1 {
                *this.pending_item = None;
                return Poll::Ready(Ok(()));
            }

            let notified = this.backpressure_notify.notified();
            tokio::pin!(notified);
            return match notified.poll(cx) {
                Poll::Ready(()) => {
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
                Poll::Pending => Poll::Pending,
            };
        }

        Poll::Ready(Ok(()))
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.as_mut().poll_flush(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
            Poll::Ready(Ok(())) => {}
        }

        let this = self.project();
        this.sequencer.close();
        this.backpressure_notify.notify_waiters();
        this.data_notify.notify_waiters();
        Poll::Ready(Ok(()))
    }
}
