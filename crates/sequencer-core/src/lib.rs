//! Append sequencer for the head of a partitioned, replicated log-stream
//! pipeline.
//!
//! Producers submit batches of append entries; the [`Sequencer`] assigns a
//! monotonically increasing log [`position`](Position) to every entry,
//! buffers accepted batches in a bounded queue, and hands them off to a
//! single downstream consumer. This crate defines position semantics,
//! back-pressure behavior (reject rather than block), ordering guarantees,
//! and the producer/consumer contract the rest of a log-stream pipeline
//! builds on.
//!
//! Persistence, replication, leadership, entry serialization, and fan-out
//! to multiple readers are out of scope — this crate only coordinates
//! position assignment and hand-off.
//!
//! # Example
//!
//! ```
//! use sequencer_core::{Sequencer, DEFAULT_QUEUE_CAPACITY};
//!
//! let seq: Sequencer<Vec<u8>> = Sequencer::new(0, 2, 1024);
//! assert_eq!(seq.try_write(vec![1, 2, 3], 0), 2);
//! assert_eq!(seq.try_write(vec![4, 5, 6], 0), 3);
//!
//! let batch = seq.try_read().unwrap();
//! assert_eq!(batch.first_position(), 2);
//! assert_eq!(DEFAULT_QUEUE_CAPACITY, 128);
//! ```

mod batch;
mod frame;
#[cfg(debug_assertions)]
mod invariants;
mod metrics;
mod sequencer;
mod signal;

pub use batch::{AppendEntry, SequencedBatch};
pub use frame::{FRAME_ALIGNMENT, HEADER_LENGTH};
pub use metrics::{Metrics, MetricsSnapshot};
pub use sequencer::{Sequencer, DEFAULT_QUEUE_CAPACITY};
pub use signal::{ConsumerSignal, NoopSignal};

/// A log position: a 64-bit integer uniquely identifying an entry within a
/// partition's log. Strictly increasing, contiguous, never reset.
pub type Position = i64;
