//! Demonstration of sequencer-stream features.
//!
//! Run with: `cargo run -p sequencer-stream --bin demo`

use futures_util::SinkExt;
use sequencer_core::Sequencer;
use sequencer_stream::{sequenced_channel, StreamConfig, StreamExt};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== sequencer-stream Demo ===\n");

    demo_basic_usage().await?;
    demo_multiple_producers().await?;
    demo_backpressure().await?;
    demo_sink_trait().await?;
    demo_configuration_presets().await?;
    demo_graceful_shutdown().await?;

    println!("\n=== All demos completed successfully! ===");
    Ok(())
}

/// Demo 1: Basic channel creation and write/read.
async fn demo_basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 1: Basic Usage ---");

    let sequencer: Sequencer<u64> = Sequencer::new(0, 0, 4096);
    let (writer, mut reader) = sequenced_channel(sequencer, StreamConfig::default());

    let producer = tokio::spawn(async move {
        for i in 0..5 {
            let pos = writer.write(i, 0).await.expect("write failed");
            println!("  Wrote entry {i} at position {pos}");
        }
        writer.close();
    });

    let mut count = 0;
    while let Ok(Some(batch)) = timeout(Duration::from_millis(200), reader.next()).await {
        println!(
            "  Read batch at position {} ({} entries)",
            batch.first_position(),
            batch.len()
        );
        count += 1;
        if count >= 5 {
            break;
        }
    }

    producer.await?;
    println!("  \u{2713} Basic usage complete\n");
    Ok(())
}

/// Demo 2: Multiple concurrent producers writing to one sequencer.
async fn demo_multiple_producers() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 2: Multiple Producers ---");

    let sequencer: Sequencer<String> = Sequencer::new(0, 0, 4096);
    let (writer, mut reader) = sequenced_channel(sequencer, StreamConfig::default());

    let w1 = writer.clone();
    let w2 = writer.clone();
    let w3 = writer.clone();

    let p1 = tokio::spawn(async move {
        for i in 0..3 {
            w1.write(format!("P1-{i}"), 0).await.ok();
        }
    });
    let p2 = tokio::spawn(async move {
        for i in 0..3 {
            w2.write(format!("P2-{i}"), 0).await.ok();
        }
    });
    let p3 = tokio::spawn(async move {
        for i in 0..3 {
            w3.write(format!("P3-{i}"), 0).await.ok();
        }
    });

    let _ = tokio::join!(p1, p2, p3);
    writer.close();

    let mut received = Vec::new();
    while let Some(batch) = reader.next().await {
        received.extend(batch.into_entries());
    }

    println!("  Received {} entries: {:?}", received.len(), received);
    println!("  \u{2713} Multiple producers complete\n");
    Ok(())
}

/// Demo 3: Backpressure with a deliberately small queue.
async fn demo_backpressure() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 3: Backpressure Handling ---");

    let sequencer: Sequencer<u64> = Sequencer::with_capacity(0, 0, 4096, 4);
    let (writer, mut reader) = sequenced_channel(sequencer, StreamConfig::default());

    let mut sent = 0;
    let mut full_count = 0;
    for i in 0..16 {
        if writer.try_write(i, 0) != -1 {
            sent += 1;
        } else {
            full_count += 1;
        }
    }
    println!("  Sent {sent} entries, {full_count} rejected (queue full)");

    let mut drained = 0;
    while let Ok(Some(_)) = timeout(Duration::from_millis(50), reader.next()).await {
        drained += 1;
    }
    println!("  Drained {drained} entries");

    println!("  Using async write() with automatic backpressure...");
    let producer = tokio::spawn(async move {
        for i in 0..20u64 {
            writer.write(i, 0).await.ok();
        }
        writer.close();
    });

    let consumer = tokio::spawn(async move {
        let mut count = 0;
        while let Ok(Some(_)) = timeout(Duration::from_millis(200), reader.next()).await {
            count += 1;
        }
        count
    });

    producer.await?;
    let consumed: u32 = consumer.await?;
    println!("  Consumer received {consumed} entries with backpressure");
    println!("  \u{2713} Backpressure handling complete\n");
    Ok(())
}

/// Demo 4: Using the Sink trait directly.
async fn demo_sink_trait() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 4: Sink Trait ---");

    let sequencer: Sequencer<i32> = Sequencer::new(0, 0, 4096);
    let (mut writer, mut reader) = sequenced_channel(sequencer, StreamConfig::default());

    writer.send(42).await?;
    println!("  Sent 42 via Sink::send");

    if let Ok(Some(batch)) = timeout(Duration::from_millis(100), reader.next()).await {
        println!("  Received via Stream: {:?}", batch.entries());
    }

    writer.close();
    println!("  \u{2713} Sink trait demo complete\n");
    Ok(())
}

/// Demo 5: Stream configuration presets.
async fn demo_configuration_presets() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 5: Configuration Presets ---");

    let low_latency = StreamConfig::low_latency();
    println!(
        "  Low-latency: poll_interval={:?}, batch_hint={}",
        low_latency.poll_interval, low_latency.batch_hint
    );

    let sequencer: Sequencer<u64> = Sequencer::new(0, 0, 4096);
    let (writer, mut reader) = sequenced_channel(sequencer, low_latency);
    writer.write(1, 0).await?;
    if let Ok(Some(batch)) = timeout(Duration::from_millis(50), reader.next()).await {
        println!("  Received entry at position {} with low-latency config", batch.first_position());
    }

    let high_throughput = StreamConfig::high_throughput();
    println!(
        "  High-throughput: poll_interval={:?}, batch_hint={}",
        high_throughput.poll_interval, high_throughput.batch_hint
    );

    let sequencer: Sequencer<u64> = Sequencer::new(0, 0, 4096);
    let (writer, mut reader) = sequenced_channel(sequencer, high_throughput);
    for i in 0..10u64 {
        writer.write(i, 0).await?;
    }
    let mut count = 0;
    while let Ok(Some(_)) = timeout(Duration::from_millis(100), reader.next()).await {
        count += 1;
    }
    println!("  Received {count} entries with high-throughput config");

    let custom = StreamConfig::default()
        .with_poll_interval(Duration::from_millis(25))
        .with_batch_hint(128);
    println!(
        "  Custom: poll_interval={:?}, batch_hint={}",
        custom.poll_interval, custom.batch_hint
    );

    println!("  \u{2713} Configuration presets complete\n");
    Ok(())
}

/// Demo 6: Graceful shutdown — close lets already-queued writes drain.
async fn demo_graceful_shutdown() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 6: Graceful Shutdown ---");

    let sequencer: Sequencer<u64> = Sequencer::new(0, 0, 4096);
    let (writer, mut reader) = sequenced_channel(sequencer, StreamConfig::default());

    let producer_writer = writer.clone();
    let producer = tokio::spawn(async move {
        let mut sent = 0u64;
        loop {
            if producer_writer.is_closed() {
                println!("  Producer observed shutdown after {sent} writes");
                break;
            }
            match producer_writer.try_write(sent, 0) {
                -1 => tokio::time::sleep(Duration::from_millis(1)).await,
                _ => sent += 1,
            }
        }
        sent
    });

    let consumer = tokio::spawn(async move {
        let mut received = 0u64;
        while let Some(_batch) = reader.next().await {
            received += 1;
            if received % 100 == 0 {
                tokio::task::yield_now().await;
            }
        }
        println!("  Consumer received {received} batches before the stream ended");
        received
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("  Triggering shutdown via writer.close()...");
    writer.close();

    let (sent, received) = tokio::join!(producer, consumer);
    let sent = sent?;
    let received = received?;

    println!("  Final: sent={sent}, received={received}");
    println!("  \u{2713} Graceful shutdown complete (all in-flight entries drained)\n");
    Ok(())
}
