//! Payload integrity code.
//!
//! All producers and consumers use the same variant: CRC-32/IEEE 802.3
//! (reflected polynomial `0xEDB88320`, init and xorout `0xFFFFFFFF`),
//! the one used by Ethernet, zlib and PNG.

/// CRC-32/IEEE of the ASCII bytes `"123456789"`.
pub const CRC32_CHECK: u32 = 0xCBF4_3926;

/// Compute the CRC-32/IEEE code of `bytes`.
///
/// Pure and deterministic: identical input always yields the identical code.
#[inline]
pub fn calculate_crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}
