// This is the bounded ring shared by exactly one producer and one consumer

use super::layout::Cursors;
use crate::Core::alloc::AlignedStorage;

/// A bounded, lock-free, single-producer single-consumer (SPSC) ring buffer.
///
/// `N` is the number of slots and must be a power of two (at least 2), which
/// lets indices wrap with `index & (N - 1)`. One slot is always left empty so
/// that `head == tail` means empty and `head + 1 == tail` means full; the ring
/// therefore holds at most `N - 1` elements.
///
/// ### Concurrency Design:
/// - **Producer (push)**: reads its own `head` relaxed, observes `tail` with
///   acquire, writes the slot with a plain write and publishes the new `head`
///   with release.
/// - **Consumer (pop)**: symmetric on `tail`, observing `head` with acquire.
///
/// The release store of a cursor and the matching acquire load on the other
/// side are the only synchronization; no operation blocks, spins or retries.
///
/// Push and pop take `&mut self` here, which makes single-threaded use safe.
/// For two threads, [`RingBuffer::split`] hands out one [`Producer`] and one
/// [`Consumer`] so each side can only ever have a single caller.
///
/// A capacity that is not a power of two does not compile:
///
/// ```compile_fail
/// let ring = nanomq::SPSC::RingBuffer::<u32, 12>::new();
/// ```
///
/// [`Producer`]: crate::SPSC::Producer
/// [`Consumer`]: crate::SPSC::Consumer
pub struct RingBuffer<T, const N: usize> {
    /// Producer and consumer cursors, each on its own cache line.
    pub(crate) cursors: Cursors,

    /// `N` cache-line aligned slots. A slot is initialized iff its index lies
    /// in `[tail, head)` modulo `N`.
    pub(crate) storage: AlignedStorage<T>,
}

// Values move from the producer thread to the consumer thread, so `T: Send`
// is all that sharing the ring between them needs.
unsafe impl<T: Send, const N: usize> Send for RingBuffer<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}
