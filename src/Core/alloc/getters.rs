use super::*;

/// Getter methods for AlignedStorage
///
/// Used by the ring buffer and by the debug proxies to inspect the
/// allocation without exposing the fields.
impl<T> AlignedStorage<T> {
    /// Number of slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the storage holds no slots
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment of the first slot in bytes (at least `CACHE_LINE_SIZE`)
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Total size of the allocation in bytes
    pub fn size_bytes(&self) -> usize {
        self.layout.size()
    }

    /// Base address of the slot array
    pub fn as_ptr(&self) -> *const MaybeUninit<T> {
        self.ptr.as_ptr()
    }
}
