use std::mem::{needs_drop, size_of};
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::Arc;

use tracing::debug;

use super::layout::Cursors;
use super::Buffer::RingBuffer;
use crate::error::Result;
use crate::Core::alloc::AlignedStorage;
use crate::SPSC::{Consumer, Producer};

impl<T, const N: usize> RingBuffer<T, N> {
    /// Index wrap mask, `N - 1`.
    const MASK: usize = N - 1;

    /// Evaluated on monomorphization; rejects capacities that cannot be masked.
    const CAPACITY_CHECK: () = assert!(
        N >= 2 && N.is_power_of_two(),
        "RingBuffer capacity must be a power of two and at least 2"
    );

    /// Allocate an empty ring with `N` cache-line aligned slots.
    ///
    /// Fails only if the backing storage cannot be obtained.
    pub fn new() -> Result<Self> {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;

        let storage = AlignedStorage::new(N)?;
        debug!(capacity = N, slot_size = size_of::<T>(), "ring buffer created");

        Ok(Self {
            cursors: Cursors::new(),
            storage,
        })
    }

    /// Number of slots, `N`. The ring holds at most `N - 1` elements.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Try to push a single item.
    ///
    /// Returns the item back in `Err` if the ring is full; the ring is left
    /// untouched in that case.
    #[inline]
    pub fn try_push(&mut self, item: T) -> std::result::Result<(), T> {
        // Safety: `&mut self` rules out any concurrent producer.
        unsafe { self.produce(item) }
    }

    /// Try to pop a single item. Returns `None` if the ring is empty.
    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        // Safety: `&mut self` rules out any concurrent consumer.
        unsafe { self.consume() }
    }

    /// Push as many of `items` as fit, in order.
    ///
    /// Returns how many were pushed (possibly 0). The new `head` is published
    /// once, after all of them have been written.
    #[inline]
    pub fn try_push_batch(&mut self, items: &[T]) -> usize
    where
        T: Clone,
    {
        unsafe { self.produce_batch(items) }
    }

    /// Pop up to `out.len()` items into the front of `out`, in order.
    ///
    /// Returns how many were popped; `out[count..]` is left untouched.
    #[inline]
    pub fn try_pop_batch(&mut self, out: &mut [T]) -> usize {
        unsafe { self.consume_batch(out) }
    }

    /// True if the ring held no elements at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.cursors.tail.load(Acquire) == self.cursors.head.load(Acquire)
    }

    /// True if the ring held `N - 1` elements at the time of the call.
    pub fn is_full(&self) -> bool {
        let head = self.cursors.head.load(Acquire);
        ((head + 1) & Self::MASK) == self.cursors.tail.load(Acquire)
    }

    /// Approximate number of elements.
    ///
    /// When the other side is running concurrently the value may already be
    /// stale when the caller looks at it.
    pub fn len(&self) -> usize {
        let head = self.cursors.head.load(Acquire);
        let tail = self.cursors.tail.load(Acquire);
        head.wrapping_sub(tail) & Self::MASK
    }

    /// Share the ring between one [`Producer`] and one [`Consumer`].
    pub fn split(self) -> (Producer<T, N>, Consumer<T, N>) {
        self.split_with_topic(0)
    }

    pub(crate) fn split_with_topic(self, topic_id: u32) -> (Producer<T, N>, Consumer<T, N>) {
        let ring = Arc::new(self);
        (
            Producer::new(Arc::clone(&ring), topic_id),
            Consumer::new(ring, topic_id),
        )
    }

    /// Producer side of `try_push`.
    ///
    /// # Safety
    /// Caller must be the only thread calling `produce`/`produce_batch`.
    pub(crate) unsafe fn produce(&self, item: T) -> std::result::Result<(), T> {
        // Only the producer stores head, so its own last write is visible.
        let head = self.cursors.head.load(Relaxed);
        let next = (head + 1) & Self::MASK;

        if next == self.cursors.tail.load(Acquire) {
            return Err(item); // full
        }

        // The consumer cannot observe this slot until head is published.
        self.storage.slot_ptr(head).cast::<T>().write(item);
        self.cursors.head.store(next, Release);
        Ok(())
    }

    /// Consumer side of `try_pop`.
    ///
    /// # Safety
    /// Caller must be the only thread calling `consume`/`consume_batch`.
    pub(crate) unsafe fn consume(&self) -> Option<T> {
        let tail = self.cursors.tail.load(Relaxed);

        if tail == self.cursors.head.load(Acquire) {
            return None; // empty
        }

        // Acquire on head makes the producer's slot write visible.
        let item = self.storage.slot_ptr(tail).cast::<T>().read();
        self.cursors.tail.store((tail + 1) & Self::MASK, Release);
        Some(item)
    }

    /// # Safety
    /// Same contract as [`RingBuffer::produce`].
    pub(crate) unsafe fn produce_batch(&self, items: &[T]) -> usize
    where
        T: Clone,
    {
        let head = self.cursors.head.load(Relaxed);
        let tail = self.cursors.tail.load(Acquire);

        // Free slots, keeping one slot reserved like the single push.
        let available = tail.wrapping_sub(head).wrapping_sub(1) & Self::MASK;
        let count = items.len().min(available);
        if count == 0 {
            return 0;
        }

        let mut cursor = head;
        for item in &items[..count] {
            self.storage.slot_ptr(cursor).cast::<T>().write(item.clone());
            cursor = (cursor + 1) & Self::MASK;
        }

        self.cursors.head.store(cursor, Release);
        count
    }

    /// # Safety
    /// Same contract as [`RingBuffer::consume`].
    pub(crate) unsafe fn consume_batch(&self, out: &mut [T]) -> usize {
        let tail = self.cursors.tail.load(Relaxed);
        let head = self.cursors.head.load(Acquire);

        let available = head.wrapping_sub(tail) & Self::MASK;
        let count = out.len().min(available);
        if count == 0 {
            return 0;
        }

        // Assigning into `out` drops the old values, which may panic. The
        // guard publishes every slot already moved out, even while unwinding.
        let mut guard = TailGuard {
            tail: &self.cursors.tail,
            cursor: tail,
        };
        for dst in &mut out[..count] {
            let item = self.storage.slot_ptr(guard.cursor).cast::<T>().read();
            guard.cursor = (guard.cursor + 1) & Self::MASK;
            *dst = item;
        }

        count
    }
}

/// Stores the consumer's advanced cursor when dropped.
struct TailGuard<'a> {
    tail: &'a AtomicUsize,
    cursor: usize,
}

impl Drop for TailGuard<'_> {
    fn drop(&mut self) {
        self.tail.store(self.cursor, Release);
    }
}

impl<T, const N: usize> Drop for RingBuffer<T, N> {
    fn drop(&mut self) {
        if !needs_drop::<T>() {
            return;
        }

        // Exclusive access: both handles (if any) are gone.
        let head = *self.cursors.head.get_mut();
        let mut tail = *self.cursors.tail.get_mut();
        while tail != head {
            unsafe { self.storage.slot_ptr(tail).cast::<T>().drop_in_place() };
            tail = (tail + 1) & Self::MASK;
        }
    }
}
