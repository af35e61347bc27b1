use crate::error::{QueueError, Result};
use crate::SPSC::Buffer::layout::CACHE_LINE_SIZE;
use std::alloc::{alloc, dealloc, Layout};
use std::mem::{align_of, size_of, MaybeUninit};
use std::ptr::NonNull;
use tracing::{debug, error};
mod debug;
mod getters;

/// Fixed-size, cache-line aligned array of uninitialized slots.
///
/// The memory is acquired once in [`AlignedStorage::new`] and released in
/// `Drop`, so every exit path (including a failed construction of whatever
/// owns it) returns it to the allocator. The storage never runs destructors
/// of the values written into it; that is the owner's job, since only the
/// owner knows which slots are live.
pub struct AlignedStorage<T> {
    ptr: NonNull<MaybeUninit<T>>,
    len: usize,
    layout: Layout,
}

impl<T> AlignedStorage<T> {
    /// Allocate `len` slots aligned to at least `CACHE_LINE_SIZE`.
    pub fn new(len: usize) -> Result<Self> {
        let slot_size = size_of::<T>();
        let align = align_of::<T>().max(CACHE_LINE_SIZE);

        let layout = slot_size
            .checked_mul(len)
            .and_then(|bytes| Layout::from_size_align(bytes, align).ok())
            .ok_or(QueueError::Layout {
                slots: len,
                slot_size,
                align,
            })?;

        // Zero-sized requests (ZSTs or len == 0) never touch the allocator.
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = unsafe { alloc(layout) };
            match NonNull::new(raw as *mut MaybeUninit<T>) {
                Some(ptr) => ptr,
                None => {
                    error!(bytes = layout.size(), align, "aligned slot allocation failed");
                    return Err(QueueError::Allocation {
                        bytes: layout.size(),
                        align,
                    });
                }
            }
        };

        debug!(slots = len, slot_size, align, bytes = layout.size(), "aligned storage acquired");

        Ok(Self { ptr, len, layout })
    }

    /// Raw pointer to slot `index`.
    ///
    /// The pointer is valid for reads and writes of one `MaybeUninit<T>`;
    /// whether the slot holds an initialized value is tracked by the owner.
    ///
    /// # Safety
    /// `index` must be less than [`AlignedStorage::len`].
    #[inline]
    pub(crate) unsafe fn slot_ptr(&self, index: usize) -> *mut MaybeUninit<T> {
        debug_assert!(index < self.len, "slot index {index} out of bounds ({})", self.len);
        self.ptr.as_ptr().add(index)
    }
}

impl<T> Drop for AlignedStorage<T> {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, self.layout) };
        }
    }
}

// The storage is plain memory; thread-safety of the slot contents is decided
// by the owner, exactly like `Vec<T>`.
unsafe impl<T: Send> Send for AlignedStorage<T> {}
unsafe impl<T: Send> Sync for AlignedStorage<T> {}
