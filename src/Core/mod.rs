pub mod alloc;
pub mod checksum;
pub mod clock;

pub use alloc::AlignedStorage;
pub use checksum::{calculate_crc32, CRC32_CHECK};
pub use clock::timestamp_ns;
