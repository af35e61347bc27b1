use crate::Core::alloc::AlignedStorage;
use crate::SPSC::{Consumer, Message, Producer, RingBuffer};
use std::fmt;
use std::sync::atomic::Ordering;

/// Debug function for AlignedStorage
///
/// Shows the slot count, alignment and base address; slot contents may be
/// uninitialized and are never read.
pub fn debug_aligned_storage<T>(storage: &AlignedStorage<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AlignedStorage")
        .field("ptr", &format_args!("{:p}", storage.as_ptr()))
        .field("slots", &storage.len())
        .field("align", &storage.align())
        .field("bytes", &storage.size_bytes())
        .finish()
}

/// Debug function for RingBuffer
///
/// Shows capacity and a relaxed snapshot of the cursors
pub fn debug_ring_buffer<T, const N: usize>(buffer: &RingBuffer<T, N>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingBuffer")
        .field("capacity", &N)
        .field("head", &buffer.cursors.head.load(Ordering::Relaxed))
        .field("tail", &buffer.cursors.tail.load(Ordering::Relaxed))
        .field("len", &buffer.len())
        .field("storage", &format_args!("{:p}", buffer.storage.as_ptr()))
        .finish()
}

pub fn debug_producer<T, const N: usize>(producer: &Producer<T, N>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("topic_id", &producer.topic_id)
        .field("next_id", &producer.next_id)
        .field("ring", &*producer.ring)
        .finish()
}

pub fn debug_consumer<T, const N: usize>(consumer: &Consumer<T, N>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("topic_id", &consumer.topic_id)
        .field("ring", &*consumer.ring)
        .finish()
}

/// Debug function for Message
///
/// Prints the header and the payload length, not the payload bytes
pub fn debug_message(message: &Message<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Message")
        .field("header", &message.header)
        .field("payload_len", &message.payload().len())
        .finish()
}
