//! Error types for queue construction and envelope decoding.
//!
//! Full and empty queues are not errors: they are reported through the
//! return value of the `try_*` operations.

/// Result type alias for NanoMQ operations
pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The slot array cannot be described by a valid `Layout`
    #[error("Invalid layout: {slots} slots of {slot_size} bytes aligned to {align}")]
    Layout {
        slots: usize,
        slot_size: usize,
        align: usize,
    },

    /// The global allocator could not provide the backing storage
    #[error("Allocation failed: {bytes} bytes aligned to {align}")]
    Allocation { bytes: usize, align: usize },

    /// Payload exceeds `MAX_PAYLOAD_SIZE`
    #[error("Payload too large ({size} > {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A wire/log record is shorter than its header says
    #[error("Truncated record: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },
}

impl From<QueueError> for std::io::Error {
    fn from(err: QueueError) -> Self {
        let kind = match err {
            QueueError::Layout { .. } | QueueError::PayloadTooLarge { .. } => {
                std::io::ErrorKind::InvalidInput
            }
            QueueError::Allocation { .. } => std::io::ErrorKind::OutOfMemory,
            QueueError::Truncated { .. } => std::io::ErrorKind::UnexpectedEof,
        };
        std::io::Error::new(kind, err)
    }
}
