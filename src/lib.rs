//! NanoMQ core: a bounded, lock-free SPSC ring buffer and the 64-byte
//! message envelope it is specialized to carry.
//!
//! Brokers, transports and logs are expected to sit on top of these two
//! pieces: one [`SPSC::RingBuffer`] per topic partition, the
//! [`SPSC::MessageHeader`] encoded verbatim on the wire or on disk.

// Module naming follows project convention (SPSC = Single-Producer Single-Consumer)
#[allow(non_snake_case)]
pub mod SPSC;
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod Debug;
pub mod error;

pub use error::{QueueError, Result};
