//! Construction of a writer/reader pair over a shared sequencer.

use crate::config::StreamConfig;
use crate::reader::SequencedReader;
use crate::signal::NotifyConsumerSignal;
use crate::writer::AppendWriter;
use sequencer_core::{AppendEntry, Position, Sequencer};
use std::sync::Arc;
use tokio::sync::Notify;

/// Wraps a [`Sequencer`] with the `Notify` pair that drives async wake-up
/// and backpressure relief, returning a cloneable [`AppendWriter`] and a
/// single [`SequencedReader`].
///
/// # Example
///
/// ```ignore
/// use sequencer_stream::sequenced_channel;
/// use sequencer_core::Sequencer;
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() {
///     let sequencer = Sequencer::<Vec<u8>>::new(0, 0, 4096);
///     let (writer, mut reader) = sequenced_channel(sequencer, Default::default());
///
///     writer.write(vec![1, 2, 3], 0).await.unwrap();
///     writer.close();
///
///     while let Some(batch) = reader.next().await {
///         println!("batch at {}", batch.first_position());
///     }
/// }
/// ```
pub fn sequenced_channel<E: AppendEntry>(
    sequencer: Sequencer<E>,
    config: StreamConfig,
) -> (AppendWriter<E>, SequencedReader<E>) {
    sequenced_channel_shared(Arc::new(sequencer), config)
}

/// As [`sequenced_channel`], but takes an already-shared sequencer so the
/// caller retains its own `Arc` (e.g. to read `metrics()` from elsewhere).
pub fn sequenced_channel_shared<E: AppendEntry>(
    sequencer: Arc<Sequencer<E>>,
    config: StreamConfig,
) -> (AppendWriter<E>, SequencedReader<E>) {
    let data_notify = Arc::new(Notify::new());
    let backpressure_notify = Arc::new(Notify::new());

    sequencer.register_consumer(Arc::new(NotifyConsumerSignal::new(Arc::clone(&data_notify))));

    let writer = AppendWriter::new(
        Arc::clone(&sequencer),
        Arc::clone(&backpressure_notify),
        Arc::clone(&data_notify),
    );
    let reader = SequencedReader::new(sequencer, data_notify, backpressure_notify, config);

    (writer, reader)
}

/// Position type used throughout this crate's API, re-exported so callers
/// depending only on `sequencer-stream` don't need a direct
/// `sequencer-core` dependency just to name it.
pub type SequencerPosition = Position;
