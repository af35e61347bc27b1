use nanomq::SPSC::RingBuffer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn basic_push_pop() {
    let mut rb = RingBuffer::<i32, 16>::new().unwrap();

    assert!(rb.is_empty());
    assert!(!rb.is_full());
    assert_eq!(rb.capacity(), 16);

    for i in 0..10 {
        assert!(rb.try_push(i).is_ok());
    }

    assert!(!rb.is_empty());
    assert_eq!(rb.len(), 10);

    for i in 0..10 {
        assert_eq!(rb.try_pop(), Some(i));
    }

    assert!(rb.is_empty());
    assert_eq!(rb.try_pop(), None);
}

#[test]
fn full_queue_keeps_one_slot_free() {
    let mut rb = RingBuffer::<i32, 16>::new().unwrap();

    // Fill the queue (capacity - 1 items)
    for i in 0..15 {
        assert!(!rb.is_full());
        assert!(rb.try_push(i).is_ok());
    }

    assert!(rb.is_full());
    assert_eq!(rb.try_push(999), Err(999));
    assert_eq!(rb.len(), 15);
}

#[test]
fn push_on_full_leaves_state_unchanged() {
    let mut rb = RingBuffer::<u64, 8>::new().unwrap();
    for i in 0..7 {
        rb.try_push(i).unwrap();
    }
    let before = format!("{:?}", rb);

    for _ in 0..3 {
        assert!(rb.try_push(42).is_err());
    }

    assert_eq!(format!("{:?}", rb), before);
    assert_eq!(rb.len(), 7);
    for i in 0..7 {
        assert_eq!(rb.try_pop(), Some(i));
    }
}

#[test]
fn fifo_across_wraparound() {
    let mut rb = RingBuffer::<u32, 4>::new().unwrap();
    let mut next_in = 0u32;
    let mut next_out = 0u32;

    // Interleave pushes and pops so the cursors wrap many times.
    for round in 0..100 {
        let pushes = 1 + round % 3;
        for _ in 0..pushes {
            if rb.try_push(next_in).is_ok() {
                next_in += 1;
            }
        }
        while let Some(v) = rb.try_pop() {
            assert_eq!(v, next_out);
            next_out += 1;
        }
    }
    assert_eq!(next_in, next_out);
}

#[test]
fn batch_operations() {
    let mut rb = RingBuffer::<i32, 256>::new().unwrap();

    let items: Vec<i32> = (0..100).collect();
    assert_eq!(rb.try_push_batch(&items), 100);
    assert_eq!(rb.len(), 100);

    let mut popped = vec![0; 50];
    assert_eq!(rb.try_pop_batch(&mut popped), 50);
    assert_eq!(popped, (0..50).collect::<Vec<_>>());
    assert_eq!(rb.len(), 50);
}

#[test]
fn batch_push_reserves_one_slot() {
    let mut rb = RingBuffer::<u8, 16>::new().unwrap();

    let items = [7u8; 32];
    assert_eq!(rb.try_push_batch(&items), 15);
    assert!(rb.is_full());
    assert_eq!(rb.try_push_batch(&items), 0);
    assert!(rb.try_push(1).is_err());
}

#[test]
fn batch_counts_are_clamped() {
    let mut rb = RingBuffer::<u32, 32>::new().unwrap();

    // Empty pop and empty input move nothing.
    let mut out = [0u32; 8];
    assert_eq!(rb.try_pop_batch(&mut out), 0);
    assert_eq!(rb.try_push_batch(&[]), 0);

    assert_eq!(rb.try_push_batch(&[1, 2, 3]), 3);
    let mut out = [0u32; 8];
    assert_eq!(rb.try_pop_batch(&mut out), 3);
    assert_eq!(out, [1, 2, 3, 0, 0, 0, 0, 0]);
}

#[test]
fn batch_wraps_around_the_end() {
    let mut rb = RingBuffer::<u32, 8>::new().unwrap();

    // Move both cursors to index 6.
    for i in 0..6 {
        rb.try_push(i).unwrap();
    }
    for _ in 0..6 {
        rb.try_pop().unwrap();
    }

    assert_eq!(rb.try_push_batch(&[10, 11, 12, 13, 14]), 5);
    let mut out = [0u32; 5];
    assert_eq!(rb.try_pop_batch(&mut out), 5);
    assert_eq!(out, [10, 11, 12, 13, 14]);
    assert!(rb.is_empty());
}

#[test]
fn random_batches_match_a_model() {
    let mut rb = RingBuffer::<u64, 64>::new().unwrap();
    let mut model = std::collections::VecDeque::new();
    let mut next = 0u64;
    let mut rng = fastrand::Rng::with_seed(0x5eed);

    for _ in 0..2_000 {
        if rng.bool() {
            let want = rng.usize(0..40);
            let items: Vec<u64> = (next..next + want as u64).collect();
            let pushed = rb.try_push_batch(&items);
            assert_eq!(pushed, want.min(63 - model.len()));
            model.extend(&items[..pushed]);
            next += pushed as u64;
        } else {
            let mut out = vec![0u64; rng.usize(0..40)];
            let popped = rb.try_pop_batch(&mut out);
            assert_eq!(popped, out.len().min(model.len()));
            for v in &out[..popped] {
                assert_eq!(Some(*v), model.pop_front());
            }
        }
        assert_eq!(rb.len(), model.len());
    }
}

#[derive(Clone)]
struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn remaining_elements_are_dropped_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    {
        let mut rb = RingBuffer::<DropCounter, 8>::new().unwrap();
        for _ in 0..5 {
            assert!(rb.try_push(DropCounter(drops.clone())).is_ok());
        }
        // Popped values are moved out and dropped here.
        drop(rb.try_pop());
        drop(rb.try_pop());
        assert_eq!(drops.load(Ordering::SeqCst), 2);
    }
    assert_eq!(drops.load(Ordering::SeqCst), 5);
}

#[test]
fn rejected_push_returns_the_item() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut rb = RingBuffer::<DropCounter, 2>::new().unwrap();

    assert!(rb.try_push(DropCounter(drops.clone())).is_ok());
    let rejected = rb.try_push(DropCounter(drops.clone()));
    assert!(rejected.is_err());
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    drop(rejected);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    drop(rb);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
}

struct PanicOnDrop {
    drops: Arc<AtomicUsize>,
    panics: bool,
}

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
        if self.panics {
            panic!("drop of a stale output slot");
        }
    }
}

#[test]
fn batch_pop_survives_a_panicking_drop() {
    let drops = Arc::new(AtomicUsize::new(0));
    let value = |panics| PanicOnDrop {
        drops: drops.clone(),
        panics,
    };

    let mut rb = RingBuffer::<PanicOnDrop, 8>::new().unwrap();
    for _ in 0..3 {
        assert!(rb.try_push(value(false)).is_ok());
    }
    let mut out = vec![value(false), value(true), value(false)];

    let popped = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        rb.try_pop_batch(&mut out)
    }));
    assert!(popped.is_err());

    // The two elements moved out before the panic are gone from the ring.
    assert_eq!(rb.len(), 1);
    assert!(rb.try_pop().is_some());
    assert!(rb.try_pop().is_none());

    drop(out);
    drop(rb);
    // Three ring elements plus three original output values, each once.
    assert_eq!(drops.load(Ordering::SeqCst), 6);
}

#[test]
fn zero_sized_elements() {
    let mut rb = RingBuffer::<(), 4>::new().unwrap();
    for _ in 0..3 {
        assert!(rb.try_push(()).is_ok());
    }
    assert!(rb.try_push(()).is_err());
    assert_eq!(rb.len(), 3);
    assert_eq!(rb.try_pop(), Some(()));
}
