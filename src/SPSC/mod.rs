
mod builder;
mod consumer;
mod producer;

pub use builder::{channel, ChannelBuilder};
pub use consumer::Consumer;
pub use producer::Producer;

pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub mod layout;
    pub use Buffer::RingBuffer; // re-export for stable path
    pub use layout::{Cursors, CACHE_LINE_SIZE};
}

pub mod Structs {
    pub mod Message_Structs;
    pub use Message_Structs::{
        Message, MessageBatch, MessageFlags, MessageHeader, HEADER_SIZE, MAX_BATCH_SIZE,
        MAX_PAYLOAD_SIZE,
    }; // re-export for stable path
}

pub use Buffer::RingBuffer;
pub use Structs::{
    Message, MessageBatch, MessageFlags, MessageHeader, HEADER_SIZE, MAX_BATCH_SIZE, MAX_PAYLOAD_SIZE,
};
