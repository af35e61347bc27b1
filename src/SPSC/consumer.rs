// src/SPSC/consumer.rs

use crate::SPSC::Buffer::RingBuffer;
use crossbeam_utils::Backoff;
use std::sync::atomic::{fence, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// The read end of an SPSC ring.
///
/// There is exactly one `Consumer` per ring and every pop takes `&mut self`.
pub struct Consumer<T, const N: usize> {
    pub(crate) ring: Arc<RingBuffer<T, N>>,
    pub(crate) topic_id: u32,
}

impl<T, const N: usize> Consumer<T, N> {
    pub(crate) fn new(ring: Arc<RingBuffer<T, N>>, topic_id: u32) -> Self {
        Self { ring, topic_id }
    }

    /// Pop one item if available.
    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        // Safety: this handle is the only consumer and we hold it mutably.
        unsafe { self.ring.consume() }
    }

    /// Pop up to `out.len()` items into the front of `out`.
    /// Returns the number popped.
    #[inline]
    pub fn try_pop_batch(&mut self, out: &mut [T]) -> usize {
        unsafe { self.ring.consume_batch(out) }
    }

    /// Pop, retrying with spin-then-yield backoff until `timeout` elapses.
    ///
    /// # Returns
    /// * `Some(item)` if an item arrived in time
    /// * `None` if the timeout was reached, or the producer has been dropped
    ///   and everything it pushed has been drained
    pub fn pop_timeout(&mut self, timeout: Duration) -> Option<T> {
        // A timeout too large to represent (e.g. `Duration::MAX`) never expires.
        let deadline = Instant::now().checked_add(timeout);
        let backoff = Backoff::new();

        loop {
            if let Some(item) = self.try_pop() {
                return Some(item);
            }

            if self.is_disconnected() {
                // Pair with the producer's release when its handle dropped,
                // so its last pushes are visible to this final attempt.
                fence(Ordering::Acquire);
                let last = self.try_pop();
                if last.is_none() {
                    trace!(topic_id = self.topic_id, "pop abandoned: producer dropped");
                }
                return last;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                trace!(topic_id = self.topic_id, ?timeout, "pop timed out");
                return None;
            }
            backoff.snooze();
        }
    }

    /// True if the producer handle has been dropped.
    pub fn is_disconnected(&self) -> bool {
        Arc::strong_count(&self.ring) == 1
    }

    /// Approximate number of queued elements.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns the topic ID for this consumer
    pub fn topic_id(&self) -> u32 {
        self.topic_id
    }
}

impl<T, const N: usize> Drop for Consumer<T, N> {
    fn drop(&mut self) {
        debug!(
            topic_id = self.topic_id,
            producer_attached = !self.is_disconnected(),
            unread = self.ring.len(),
            "consumer dropped"
        );
    }
}
