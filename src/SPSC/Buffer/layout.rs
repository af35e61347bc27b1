use crossbeam_utils::CachePadded;
use std::sync::atomic::AtomicUsize;

/// Cache line size assumed by every layout in this crate.
pub const CACHE_LINE_SIZE: usize = 64;

/// The two cursors of one SPSC ring.
///
/// Each cursor lives on its own cache line (`CachePadded` pads to 128 bytes
/// on x86_64 and aarch64 to also defeat the adjacent-line prefetcher), and the
/// slot array is a separate allocation, so the producer, the consumer and the
/// data never share a line.
#[repr(C)]
pub struct Cursors {
    /// Next slot the producer writes. Stored by the producer only.
    pub head: CachePadded<AtomicUsize>,

    /// Next slot the consumer reads. Stored by the consumer only.
    pub tail: CachePadded<AtomicUsize>,
}

impl Cursors {
    pub fn new() -> Self {
        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for Cursors {
    fn default() -> Self {
        Self::new()
    }
}
