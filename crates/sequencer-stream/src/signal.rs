//! [`ConsumerSignal`] backed by a `tokio::sync::Notify`.

use sequencer_core::ConsumerSignal;
use std::sync::Arc;
use tokio::sync::Notify;

/// Wakes a single async consumer task waiting on a sequencer's queue.
///
/// `Notify` already coalesces: any number of `signal()` calls between two
/// `notified().await` completions collapse into a single wake-up, which is
/// exactly the permit semantics a sequencer's consumer hook wants.
#[derive(Debug, Clone)]
pub(crate) struct NotifyConsumerSignal {
    notify: Arc<Notify>,
}

impl NotifyConsumerSignal {
    pub(crate) fn new(notify: Arc<Notify>) -> Self {
        Self { notify }
    }
}

impl ConsumerSignal for NotifyConsumerSignal {
    fn signal(&self) {
        self.notify.notify_one();
    }
}
