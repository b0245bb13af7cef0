use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::any::type_name;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// The backing storage of a `DynamicArray`: one heap allocation with room for `capacity` items.
///
/// The buffer does not know which slots hold initialized values. It never reads, writes or drops
/// items - that is the responsibility of the owner, who must drop any initialized items before
/// the buffer itself is dropped. Dropping the buffer only releases the memory.
///
/// No allocation exists if the capacity is zero or if `T` is zero-sized. In that case the pointer
/// is dangling (but non-null and well-aligned), which is valid for zero-length and zero-sized
/// accesses.
///
/// Allocation failure is not reported to the caller. It is routed to
/// [`handle_alloc_error`], which reports the failed layout and aborts the process.
#[derive(Debug)]
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,

    /// Number of item slots. For zero-sized `T` this is purely logical.
    capacity: usize,

    _owns: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    /// Creates a buffer with zero capacity. Does not allocate.
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Creates a buffer with room for exactly `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if the total size of the buffer would exceed `isize::MAX` bytes.
    ///
    /// Aborts the process if the memory cannot be allocated.
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let layout = Self::layout(capacity);

        if layout.size() == 0 {
            return Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            };
        }

        // SAFETY: The layout has a non-zero size, checked above.
        let ptr = unsafe { alloc(layout) };

        let Some(ptr) = NonNull::new(ptr.cast::<T>()) else {
            // Running out of memory is not something we recover from.
            handle_alloc_error(layout);
        };

        Self {
            ptr,
            capacity,
            _owns: PhantomData,
        }
    }

    #[must_use]
    fn layout(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).unwrap_or_else(|_| {
            panic!(
                "capacity overflow: {capacity} items of {} do not fit in a single allocation",
                type_name::<T>()
            )
        })
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the buffer owns a heap allocation.
    #[cfg(any(test, debug_assertions))]
    #[must_use]
    pub(crate) fn is_allocated(&self) -> bool {
        Self::layout(self.capacity).size() != 0
    }

    /// Pointer to the first slot. Dangling if nothing is allocated.
    #[must_use]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to the slot at `index`.
    ///
    /// `index == capacity` is permitted and yields the one-past-the-end pointer. Obtaining the
    /// pointer is safe; dereferencing it is subject to the usual rules and to the owner's
    /// knowledge of which slots are initialized.
    #[must_use]
    pub(crate) fn slot(&self, index: usize) -> *mut T {
        debug_assert!(
            index <= self.capacity,
            "slot {index} is out of bounds in buffer of capacity {} for {}",
            self.capacity,
            type_name::<T>()
        );

        self.ptr.as_ptr().wrapping_add(index)
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        let layout = Self::layout(self.capacity);

        if layout.size() == 0 {
            return;
        }

        // SAFETY: The pointer came from `alloc()` with this same layout, as the capacity never
        // changes after construction and we only allocate for non-zero-sized layouts.
        unsafe {
            dealloc(self.ptr.as_ptr().cast(), layout);
        }
    }
}
