// In demos/producer_consumer.rs
//
// One producer thread publishes checksummed envelopes, one consumer thread
// verifies them. Runs until <num_messages> are delivered or Ctrl+C.
use nanomq::SPSC::{ChannelBuilder, Message};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CAPACITY: usize = 1024;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let num_messages: usize = match args.get(1).map(|s| s.parse()) {
        Some(Ok(n)) => n,
        _ => {
            eprintln!("Usage: {} <num_messages>", args[0]);
            std::process::exit(1);
        }
    };

    // Payloads must outlive the envelopes that borrow them.
    let payloads: Vec<Vec<u8>> = (0..num_messages)
        .map(|i| format!("message_{i}").into_bytes())
        .collect();

    let keep_running = Arc::new(AtomicBool::new(true));
    let keep_running_for_handler = Arc::clone(&keep_running);
    ctrlc::set_handler(move || {
        keep_running_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let (mut producer, mut consumer) = ChannelBuilder::new()
        .with_topic_id(1)
        .build::<Message<'_>, CAPACITY>()?;

    info!(topic_id = producer.topic_id(), capacity = CAPACITY, num_messages, "channel ready");
    let start = Instant::now();

    thread::scope(|s| {
        let running = &keep_running;
        let payloads = &payloads;

        s.spawn(move || {
            for payload in payloads {
                loop {
                    if !running.load(Ordering::Relaxed) {
                        return;
                    }
                    match producer.publish(payload) {
                        Ok(Some(_)) => break,
                        // Ring full: back off and retry
                        Ok(None) => thread::sleep(Duration::from_micros(10)),
                        Err(e) => {
                            warn!(error = %e, "publish failed");
                            return;
                        }
                    }
                }
            }
        });

        s.spawn(move || {
            let mut received = 0usize;
            let mut corrupted = 0usize;
            while received < payloads.len() && running.load(Ordering::Relaxed) {
                match consumer.pop_timeout(Duration::from_millis(100)) {
                    Some(msg) => {
                        if !msg.verify_checksum() {
                            corrupted += 1;
                        }
                        received += 1;
                        if received % 100_000 == 0 {
                            info!(received, "progress");
                        }
                    }
                    None if consumer.is_disconnected() => break,
                    None => {}
                }
            }
            info!(received, corrupted, "consumer finished");
        });
    });

    let elapsed = start.elapsed();
    info!(
        ?elapsed,
        throughput = num_messages as f64 / elapsed.as_secs_f64(),
        "done (messages/sec)"
    );
    Ok(())
}
