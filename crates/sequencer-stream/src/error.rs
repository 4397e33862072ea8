//! Error types for sequencer-stream operations.

use thiserror::Error;

/// Errors that can occur in async sequencer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerStreamError {
    /// The sequencer is closed for new writes.
    #[error("sequencer is closed")]
    Closed,
}

impl SequencerStreamError {
    /// `true` if this error indicates the sequencer is permanently unusable.
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}
