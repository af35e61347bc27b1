use nanomq::SPSC::{channel, RingBuffer};
use std::thread;

#[test]
fn concurrent_producer_consumer_preserves_order() {
    const NUM_ITEMS: u64 = 100_000;

    // Repeated runs to shake out ordering bugs.
    for _ in 0..5 {
        let (mut producer, mut consumer) = RingBuffer::<u64, 1024>::new().unwrap().split();

        let p = thread::spawn(move || {
            for i in 0..NUM_ITEMS {
                let mut item = i;
                while let Err(rejected) = producer.try_push(item) {
                    item = rejected;
                    thread::yield_now();
                }
            }
        });

        let c = thread::spawn(move || {
            let mut expected = 0;
            while expected < NUM_ITEMS {
                match consumer.try_pop() {
                    Some(value) => {
                        assert_eq!(value, expected);
                        expected += 1;
                    }
                    None => thread::yield_now(),
                }
            }
            consumer
        });

        p.join().unwrap();
        let consumer = c.join().unwrap();
        assert!(consumer.is_empty());
        assert!(consumer.is_disconnected());
    }
}

#[test]
fn small_ring_under_contention() {
    // A tiny ring forces the full/empty paths on almost every call.
    const NUM_ITEMS: u32 = 100_000;
    let (mut producer, mut consumer) = channel::<u32, 4>().unwrap();

    let p = thread::spawn(move || {
        for i in 0..NUM_ITEMS {
            while producer.try_push(i).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    let mut expected = 0;
    while expected < NUM_ITEMS {
        if let Some(value) = consumer.try_pop() {
            assert_eq!(value, expected);
            expected += 1;
        } else {
            std::hint::spin_loop();
        }
    }
    p.join().unwrap();
    assert_eq!(consumer.try_pop(), None);
}

#[test]
fn concurrent_batches_preserve_order() {
    const NUM_ITEMS: u64 = 100_000;
    let (mut producer, mut consumer) = channel::<u64, 256>().unwrap();

    let p = thread::spawn(move || {
        let items: Vec<u64> = (0..NUM_ITEMS).collect();
        let mut sent = 0;
        let mut rng = fastrand::Rng::with_seed(7);
        while sent < items.len() {
            let end = (sent + rng.usize(1..64)).min(items.len());
            sent += producer.try_push_batch(&items[sent..end]);
            thread::yield_now();
        }
    });

    let mut expected = 0;
    let mut out = vec![0u64; 48];
    while expected < NUM_ITEMS {
        let n = consumer.try_pop_batch(&mut out);
        for v in &out[..n] {
            assert_eq!(*v, expected);
            expected += 1;
        }
        if n == 0 {
            thread::yield_now();
        }
    }
    p.join().unwrap();
    assert!(consumer.is_empty());
}

#[test]
fn boxed_values_cross_threads() {
    const NUM_ITEMS: usize = 10_000;
    let (mut producer, mut consumer) = channel::<Box<String>, 64>().unwrap();

    let p = thread::spawn(move || {
        for i in 0..NUM_ITEMS {
            let mut item = Box::new(format!("message_{i}"));
            while let Err(rejected) = producer.try_push(item) {
                item = rejected;
                thread::yield_now();
            }
        }
    });

    for i in 0..NUM_ITEMS {
        let value = loop {
            if let Some(v) = consumer.try_pop() {
                break v;
            }
            thread::yield_now();
        };
        assert_eq!(*value, format!("message_{i}"));
    }
    p.join().unwrap();
}
