// In demos/batch_publish.rs
//
// Stage envelopes in a MessageBatch and push them with a single cursor
// publication per call, then drain the ring in batches.
use nanomq::Core::timestamp_ns;
use nanomq::SPSC::{Message, MessageBatch, RingBuffer};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const BATCH_SIZE: usize = 100;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let payloads: Vec<Vec<u8>> = (0..BATCH_SIZE)
        .map(|i| format!("Batch message #{i}").into_bytes())
        .collect();

    let mut batch = MessageBatch::new();
    let now = timestamp_ns();
    for (i, payload) in payloads.iter().enumerate() {
        let staged = batch.add(Message::new(i as u64 + 1, now, 7, payload)?);
        assert!(staged, "batch capacity exceeded");
    }

    let mut ring = RingBuffer::<Message<'_>, 256>::new()?;

    let start = Instant::now();
    let published = ring.try_push_batch(batch.as_slice());
    let elapsed = start.elapsed();
    batch.advance(published);

    info!(
        published,
        left_over = batch.len(),
        ?elapsed,
        per_message_ns = elapsed.as_nanos() as f64 / published.max(1) as f64,
        "batch published"
    );

    let mut out = vec![Message::default(); 32];
    let mut verified = 0;
    loop {
        let n = ring.try_pop_batch(&mut out);
        if n == 0 {
            break;
        }
        verified += out[..n].iter().filter(|m| m.verify_checksum()).count();
    }
    info!(verified, "batch drained");
    Ok(())
}
