/// A one-shot-coalescing wake-up primitive registered once by the single
/// consumer.
///
/// `signal()` must be safe to call from any thread, including from inside
/// the sequencer's critical section: it must not block, panic, or
/// re-enter the sequencer. A host scheduler whose own signal primitive can
/// block or re-enter should wrap it so this contract holds.
///
/// Kept as a plain trait rather than an inheritance hierarchy, per the
/// small-capability-trait guidance this crate follows for dynamically
/// dispatched collaborators (entries, signals) — see [`crate::AppendEntry`].
pub trait ConsumerSignal: Send + Sync {
    /// Wakes the registered consumer. Idempotent under coalescing: firing
    /// it multiple times between consumer wake-ups is equivalent to firing
    /// it once.
    fn signal(&self);
}

/// A [`ConsumerSignal`] that does nothing.
///
/// Useful as a default before a real consumer registers, and in tests that
/// only care about queue/position behavior and never register a consumer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSignal;

impl ConsumerSignal for NoopSignal {
    fn signal(&self) {}
}
