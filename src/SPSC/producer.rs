// In src/SPSC/producer.rs
use crate::error::Result;
use crate::Core::clock::timestamp_ns;
use crate::SPSC::Buffer::RingBuffer;
use crate::SPSC::Structs::Message_Structs::{Message, MessageFlags};
use crossbeam_utils::Backoff;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// The write end of an SPSC ring.
///
/// There is exactly one `Producer` per ring and every push takes `&mut self`,
/// so the single-producer contract cannot be broken from safe code. Waiting
/// policies (`push_timeout`) live here, outside the ring itself.
pub struct Producer<T, const N: usize> {
    pub(crate) ring: Arc<RingBuffer<T, N>>,
    pub(crate) topic_id: u32,
    /// Next id handed out by `publish`; 0 is reserved for "no message".
    pub(crate) next_id: u64,
}

impl<T, const N: usize> Producer<T, N> {
    pub(crate) fn new(ring: Arc<RingBuffer<T, N>>, topic_id: u32) -> Self {
        Self {
            ring,
            topic_id,
            next_id: 1,
        }
    }

    /// Try to push one item; hands it back if the ring is full.
    #[inline]
    pub fn try_push(&mut self, item: T) -> std::result::Result<(), T> {
        // Safety: this handle is the only producer and we hold it mutably.
        unsafe { self.ring.produce(item) }
    }

    /// Push as many of `items` as currently fit. Returns the number pushed.
    #[inline]
    pub fn try_push_batch(&mut self, items: &[T]) -> usize
    where
        T: Clone,
    {
        unsafe { self.ring.produce_batch(items) }
    }

    /// Push, retrying with spin-then-yield backoff until `timeout` elapses.
    ///
    /// Gives the item back if the deadline passes or the consumer has been
    /// dropped (nobody would ever make room).
    pub fn push_timeout(&mut self, item: T, timeout: Duration) -> std::result::Result<(), T> {
        // A timeout too large to represent (e.g. `Duration::MAX`) never expires.
        let deadline = Instant::now().checked_add(timeout);
        let backoff = Backoff::new();
        let mut item = item;

        loop {
            match self.try_push(item) {
                Ok(()) => return Ok(()),
                Err(rejected) => item = rejected,
            }

            if self.is_disconnected() {
                trace!(topic_id = self.topic_id, "push abandoned: consumer dropped");
                return Err(item);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                trace!(topic_id = self.topic_id, ?timeout, "push timed out");
                return Err(item);
            }
            backoff.snooze();
        }
    }

    /// True if the consumer handle has been dropped.
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

    /// Returns the topic ID for this producer
    pub fn topic_id(&self) -> u32 {
        self.topic_id
    }
}

impl<'a, const N: usize> Producer<Message<'a>, N> {
    /// Wrap `payload` in an envelope and push it.
    ///
    /// The envelope gets the next message id, the current timestamp, this
    /// producer's topic id and the payload checksum.
    ///
    /// # Returns
    /// * `Ok(Some(id))` if the message was queued
    /// * `Ok(None)` if the ring is full (the id is not consumed)
    /// * `Err(_)` if the payload is too large
    pub fn publish(&mut self, payload: &'a [u8]) -> Result<Option<u64>> {
        self.publish_with_flags(payload, MessageFlags::empty())
    }

    /// [`Producer::publish`] with `flags` set on the envelope.
    pub fn publish_with_flags(
        &mut self,
        payload: &'a [u8],
        flags: MessageFlags,
    ) -> Result<Option<u64>> {
        let id = self.next_id;
        let mut message = Message::new(id, timestamp_ns(), self.topic_id, payload)?;
        message.set_flag(flags);

        match self.try_push(message) {
            Ok(()) => {
                self.next_id += 1;
                Ok(Some(id))
            }
            Err(_) => Ok(None),
        }
    }

    /// Publish a batch of payloads with a single cursor publication.
    ///
    /// All payloads are validated before anything is pushed. Returns how many
    /// (from the front of `payloads`) were queued.
    pub fn publish_batch(&mut self, payloads: &[&'a [u8]]) -> Result<usize> {
        if payloads.is_empty() {
            return Ok(0);
        }

        let now = timestamp_ns();
        let messages = payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| {
                Message::new(self.next_id + i as u64, now, self.topic_id, *payload)
            })
            .collect::<Result<Vec<_>>>()?;

        let pushed = self.try_push_batch(&messages);
        self.next_id += pushed as u64;
        Ok(pushed)
    }
}

impl<T, const N: usize> Drop for Producer<T, N> {
    fn drop(&mut self) {
        debug!(
            topic_id = self.topic_id,
            consumer_attached = !self.is_disconnected(),
            pending = self.ring.len(),
            "producer dropped"
        );
    }
}
