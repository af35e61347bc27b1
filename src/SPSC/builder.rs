use super::{Consumer, Producer};
use crate::error::Result;
use crate::SPSC::Buffer::RingBuffer;
use tracing::debug;

/// Configures and creates a connected producer/consumer pair.
///
/// Element type and capacity are compile-time parameters of
/// [`ChannelBuilder::build`]; the builder carries the runtime settings.
#[derive(Debug, Clone)]
pub struct ChannelBuilder {
    topic_id: u32,
}

impl Default for ChannelBuilder {
    fn default() -> Self {
        Self {
            topic_id: 0, // Default topic ID
        }
    }
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topic the channel carries. Stamped on envelopes built by
    /// [`Producer::publish`].
    pub fn with_topic_id(mut self, topic_id: u32) -> Self {
        self.topic_id = topic_id;
        self
    }

    pub fn topic_id(&self) -> u32 {
        self.topic_id
    }

    /// Allocate a ring of `N` slots and split it into its two handles.
    pub fn build<T, const N: usize>(self) -> Result<(Producer<T, N>, Consumer<T, N>)> {
        let ring = RingBuffer::<T, N>::new()?;
        debug!(topic_id = self.topic_id, capacity = N, "channel built");
        Ok(ring.split_with_topic(self.topic_id))
    }
}

/// Shorthand for `ChannelBuilder::new().build::<T, N>()`.
pub fn channel<T, const N: usize>() -> Result<(Producer<T, N>, Consumer<T, N>)> {
    ChannelBuilder::new().build()
}
