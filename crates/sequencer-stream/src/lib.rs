//! Async Stream/Sink adapters for `sequencer-core`.
//!
//! This crate wraps a [`sequencer_core::Sequencer`] with async wake-up and
//! backpressure, so a consumer can `await` the next batch instead of
//! polling `try_read` in a spin loop, and a producer can `await` queue
//! space instead of retrying `try_write` by hand.
//!
//! # Features
//!
//! - **Hybrid polling**: event-driven via `Notify`, with a configurable
//!   poll interval as a safety net against a missed wake-up.
//! - **Backpressure**: writers await when the queue is full, woken when
//!   space is freed by a drain.
//! - **Graceful shutdown**: closing the sequencer lets the stream drain
//!   fully before reporting exhaustion.
//!
//! # Example
//!
//! ```ignore
//! use sequencer_core::Sequencer;
//! use sequencer_stream::{sequenced_channel, StreamConfig};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sequencer = Sequencer::<Vec<u8>>::new(0, 0, 4096);
//!     let (writer, mut reader) = sequenced_channel(sequencer, StreamConfig::default());
//!
//!     writer.write(vec![1, 2, 3], 0).await.unwrap();
//!     writer.close();
//!
//!     while let Some(batch) = reader.next().await {
//!         println!("batch at position {}", batch.first_position());
//!     }
//! }
//! ```

mod channel;
mod config;
mod error;
mod invariants;
mod reader;
mod signal;
mod writer;

pub use channel::{sequenced_channel, sequenced_channel_shared, SequencerPosition};
pub use config::StreamConfig;
pub use error::SequencerStreamError;
pub use reader::SequencedReader;
pub use writer::AppendWriter;

pub use tokio_stream::StreamExt;
