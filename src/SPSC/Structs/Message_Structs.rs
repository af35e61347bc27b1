// Message envelope carried by the SPSC ring: a one-cache-line header plus a
// borrowed payload

use bitflags::bitflags;
use tracing::trace;

use crate::error::{QueueError, Result};
use crate::Core::checksum::calculate_crc32;
use crate::SPSC::Buffer::layout::CACHE_LINE_SIZE;

/// Encoded size of a [`MessageHeader`] on the wire and on disk.
pub const HEADER_SIZE: usize = 64;

/// Largest payload a [`Message`] may reference (64 KiB).
pub const MAX_PAYLOAD_SIZE: usize = 65536;

/// Capacity of a [`MessageBatch`].
pub const MAX_BATCH_SIZE: usize = 256;

bitflags! {
    /// Independent message feature bits. Any combination is valid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MessageFlags: u32 {
        /// Payload is LZ4 compressed
        const COMPRESSED = 1 << 0;
        /// Payload is encrypted
        const ENCRYPTED = 1 << 1;
        /// Must be persisted to disk
        const PERSISTENT = 1 << 2;
        /// High-priority message
        const PRIORITY = 1 << 3;
    }
}

/// Fixed 64-byte message header, exactly one cache line.
///
/// This is a binary contract: field order, widths and the little-endian
/// encoding produced by [`MessageHeader::to_bytes`] must stay bit-stable, as
/// transports and logs store the header verbatim.
///
/// | offset | field     | width |
/// |--------|-----------|-------|
/// | 0      | id        | 8     |
/// | 8      | timestamp | 8     |
/// | 16     | topic_id  | 4     |
/// | 20     | size      | 4     |
/// | 24     | crc32     | 4     |
/// | 28     | flags     | 4     |
/// | 32     | reserved  | 32    |
#[repr(C, align(64))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Caller-assigned unique id; 0 means "no message".
    pub id: u64,
    /// Nanoseconds since the UNIX epoch.
    pub timestamp: u64,
    pub topic_id: u32,
    /// Payload length in bytes.
    pub size: u32,
    /// CRC-32/IEEE of the payload bytes.
    pub crc32: u32,
    /// Raw [`MessageFlags`] bits.
    pub flags: u32,
    pub reserved: [u8; 32],
}

const _: () = assert!(std::mem::size_of::<MessageHeader>() == CACHE_LINE_SIZE);
const _: () = assert!(std::mem::align_of::<MessageHeader>() == CACHE_LINE_SIZE);
const _: () = assert!(HEADER_SIZE == CACHE_LINE_SIZE);

impl MessageHeader {
    /// The all-zero header (id 0, no message).
    pub const EMPTY: Self = Self {
        id: 0,
        timestamp: 0,
        topic_id: 0,
        size: 0,
        crc32: 0,
        flags: 0,
        reserved: [0; 32],
    };

    /// True for the reserved "no message" id.
    pub fn is_null(&self) -> bool {
        self.id == 0
    }

    /// Flags as a typed set; unknown bits are preserved.
    pub fn message_flags(&self) -> MessageFlags {
        MessageFlags::from_bits_retain(self.flags)
    }

    /// Encode in wire order, little-endian.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..8].copy_from_slice(&self.id.to_le_bytes());
        buf[8..16].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[16..20].copy_from_slice(&self.topic_id.to_le_bytes());
        buf[20..24].copy_from_slice(&self.size.to_le_bytes());
        buf[24..28].copy_from_slice(&self.crc32.to_le_bytes());
        buf[28..32].copy_from_slice(&self.flags.to_le_bytes());
        buf[32..64].copy_from_slice(&self.reserved);
        buf
    }

    /// Decode a header produced by [`MessageHeader::to_bytes`].
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Self {
        let u64_at = |at: usize| {
            let mut b = [0u8; 8];
            b.copy_from_slice(&buf[at..at + 8]);
            u64::from_le_bytes(b)
        };
        let u32_at = |at: usize| {
            let mut b = [0u8; 4];
            b.copy_from_slice(&buf[at..at + 4]);
            u32::from_le_bytes(b)
        };

        let mut reserved = [0u8; 32];
        reserved.copy_from_slice(&buf[32..64]);

        Self {
            id: u64_at(0),
            timestamp: u64_at(8),
            topic_id: u32_at(16),
            size: u32_at(20),
            crc32: u32_at(24),
            flags: u32_at(28),
            reserved,
        }
    }

    /// Decode a header from the front of `buf`.
    pub fn read_from(buf: &[u8]) -> Result<Self> {
        let head: &[u8; HEADER_SIZE] = buf
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(QueueError::Truncated {
                needed: HEADER_SIZE,
                available: buf.len(),
            })?;
        Ok(Self::from_bytes(head))
    }
}

/// Header plus a borrowed payload.
///
/// The envelope never owns or frees the payload: the borrow keeps it alive
/// for as long as the message is used, which allows zero-copy transit through
/// shared memory or memory-mapped regions.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub header: MessageHeader,
    payload: &'a [u8],
}

impl<'a> Message<'a> {
    /// The "no message" envelope: zero header, empty payload.
    pub const EMPTY: Message<'static> = Message {
        header: MessageHeader::EMPTY,
        payload: &[],
    };

    /// Build a message over `payload`, recording its size and checksum.
    pub fn new(id: u64, timestamp: u64, topic_id: u32, payload: &'a [u8]) -> Result<Self> {
        let mut message = Self {
            header: MessageHeader {
                id,
                timestamp,
                topic_id,
                ..MessageHeader::EMPTY
            },
            payload,
        };
        message.update_checksum()?;
        Ok(message)
    }

    /// Reassemble a message from a received header and payload, without
    /// recomputing anything. Use [`Message::verify_checksum`] to validate.
    pub fn from_parts(header: MessageHeader, payload: &'a [u8]) -> Self {
        Self { header, payload }
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Rebind the payload. `size` and `crc32` are NOT recomputed, so
    /// verification fails until [`Message::update_checksum`] is called
    /// (unless the new bytes are identical).
    pub fn set_payload(&mut self, payload: &'a [u8]) {
        self.payload = payload;
    }

    /// Recompute `size` and `crc32` from the current payload.
    pub fn update_checksum(&mut self) -> Result<()> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(QueueError::PayloadTooLarge {
                size: self.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        self.header.size = self.payload.len() as u32;
        self.header.crc32 = calculate_crc32(self.payload);
        Ok(())
    }

    /// Recompute the checksum of the referenced payload and compare it with
    /// the stored one. A payload whose length differs from `size` fails.
    pub fn verify_checksum(&self) -> bool {
        if self.payload.len() != self.header.size as usize {
            trace!(
                id = self.header.id,
                size = self.header.size,
                payload_len = self.payload.len(),
                "payload length does not match header"
            );
            return false;
        }

        let actual = calculate_crc32(self.payload);
        if actual != self.header.crc32 {
            trace!(
                id = self.header.id,
                expected = self.header.crc32,
                actual,
                "checksum mismatch"
            );
            return false;
        }
        true
    }

    pub fn id(&self) -> u64 {
        self.header.id
    }

    pub fn timestamp_ns(&self) -> u64 {
        self.header.timestamp
    }

    pub fn topic_id(&self) -> u32 {
        self.header.topic_id
    }

    pub fn is_null(&self) -> bool {
        self.header.is_null()
    }

    /// True if any bit of `flag` is set.
    pub fn has_flag(&self, flag: MessageFlags) -> bool {
        self.header.message_flags().intersects(flag)
    }

    pub fn set_flag(&mut self, flag: MessageFlags) {
        self.header.flags |= flag.bits();
    }

    pub fn clear_flag(&mut self, flag: MessageFlags) {
        self.header.flags &= !flag.bits();
    }

    /// Append the encoded header followed by the payload bytes.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.reserve(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(self.payload);
    }

    /// Decode one record written by [`Message::encode_into`].
    ///
    /// The payload borrows `buf`. Returns the message and the number of bytes
    /// consumed; the checksum is not verified here. Records claiming more than
    /// [`MAX_PAYLOAD_SIZE`] bytes are rejected.
    pub fn decode(buf: &'a [u8]) -> Result<(Self, usize)> {
        let header = MessageHeader::read_from(buf)?;
        let size = header.size as usize;
        if size > MAX_PAYLOAD_SIZE {
            return Err(QueueError::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        let end = HEADER_SIZE
            .checked_add(size)
            .ok_or(QueueError::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_SIZE,
            })?;
        let payload = buf.get(HEADER_SIZE..end).ok_or(QueueError::Truncated {
            needed: end,
            available: buf.len(),
        })?;
        Ok((Self { header, payload }, end))
    }
}

impl Default for Message<'_> {
    fn default() -> Self {
        Message::EMPTY
    }
}

impl std::fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_message(self, f)
    }
}

/// Bounded group of messages staged for a single batch push.
#[derive(Clone, Debug, Default)]
pub struct MessageBatch<'a> {
    messages: Vec<Message<'a>>,
}

impl<'a> MessageBatch<'a> {
    pub fn new() -> Self {
        Self {
            messages: Vec::with_capacity(MAX_BATCH_SIZE),
        }
    }

    /// Stage a message. Returns `false` (and keeps nothing) when full.
    pub fn add(&mut self, message: Message<'a>) -> bool {
        if self.is_full() {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Drop the first `count` messages, e.g. those a partial push accepted.
    pub fn advance(&mut self, count: usize) {
        let count = count.min(self.messages.len());
        self.messages.drain(..count);
    }

    pub fn as_slice(&self) -> &[Message<'a>] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_full(&self) -> bool {
        self.messages.len() >= MAX_BATCH_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
