use std::any::type_name;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::{mem, ptr, slice};

use tracing::{debug, trace};

use crate::{DynamicArrayBuilder, Error, RawBuffer, Result};

/// The index returned by [`DynamicArray::find_first()`] and [`DynamicArray::find_last()`] when
/// no element matches.
///
/// No array can ever hold `usize::MAX + 1` elements, so this value is never a valid index.
pub const NOT_FOUND: usize = usize::MAX;

/// A growable array that stores its elements contiguously on the heap.
///
/// The array distinguishes between its length (the number of elements it holds) and its
/// capacity (the number of elements it has room for). Inserting into a full array reallocates
/// the backing buffer with double the capacity (or capacity 1 if the array had none). The
/// capacity only ever shrinks on explicit request, via [`shrink()`][Self::shrink] or
/// [`resize()`][Self::resize].
///
/// # Checked and unchecked access
///
/// Indexed operations come in two flavors:
///
/// * [`at()`][Self::at], [`update_at()`][Self::update_at], [`insert_at()`][Self::insert_at],
///   [`delete_at()`][Self::delete_at] and friends validate the index and return an [`Error`] if
///   the caller got it wrong.
/// * The `[]` operator has no error path. Using it with an invalid index is a bug in the caller
///   and panics. [`get_unchecked()`][Self::get_unchecked] skips the check entirely.
///
/// # Out of memory
///
/// Allocation failure is not a recoverable error. If the array cannot obtain memory for its
/// buffer, the process is aborted via [`std::alloc::handle_alloc_error`].
///
/// # Examples
///
/// ```
/// use dynamic_array::{DynamicArray, NOT_FOUND};
///
/// let mut array = DynamicArray::new();
/// array.push_back(1);
/// array.push_back(2);
/// array.push_back(3);
///
/// array.delete_at(1).unwrap();
/// array.insert_at(1, 9).unwrap();
///
/// assert_eq!(array[1], 9);
/// assert_eq!(array.find_first(&9), 1);
/// assert_eq!(array.find_first(&42), NOT_FOUND);
///
/// array.shrink();
/// assert_eq!(array.capacity(), 3);
/// ```
pub struct DynamicArray<T> {
    buffer: RawBuffer<T>,

    /// Slots `0..len` of the buffer are initialized, the rest are not.
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Creates an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::new(),
            len: 0,
        }
    }

    /// Creates a builder that can be used to configure a dynamic array before creating it.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let array = DynamicArray::<u64>::builder().capacity(100).build();
    /// assert_eq!(array.capacity(), 100);
    /// ```
    pub fn builder() -> DynamicArrayBuilder<T> {
        DynamicArrayBuilder::new()
    }

    #[must_use]
    pub(crate) fn new_inner(capacity: usize) -> Self {
        Self {
            buffer: RawBuffer::with_capacity(capacity),
            len: 0,
        }
    }

    /// The number of elements in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The number of elements the array can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns `true` if the array contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_full(&self) -> bool {
        self.len == self.buffer.capacity()
    }

    /// Returns a raw pointer to the first slot of the buffer.
    ///
    /// The pointer is dangling (but non-null and aligned) if the array has not allocated.
    /// It is invalidated by any operation that reallocates.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Returns a raw mutable pointer to the first slot of the buffer.
    ///
    /// The pointer is dangling (but non-null and aligned) if the array has not allocated.
    /// It is invalidated by any operation that reallocates.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_ptr()
    }

    fn as_slice(&self) -> &[T] {
        // SAFETY: The first `len` slots are initialized and the pointer is non-null and aligned
        // even when nothing is allocated (in which case `len` is zero or `T` is zero-sized).
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: As in `as_slice()`, and we hold an exclusive reference to the array.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_ptr(), self.len) }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;

        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfBounds { index, len })
    }

    /// Returns an exclusive reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;

        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })
    }

    /// Returns a reference to the element at `index` without checking the bounds.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `index < len()`.
    #[must_use]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(
            index < self.len,
            "get_unchecked({index}) out of bounds in dynamic array of length {}",
            self.len
        );

        let slot = self.buffer.slot(index);

        // SAFETY: The caller guarantees that the slot is within the initialized region.
        unsafe { &*slot }
    }

    /// Returns an exclusive reference to the element at `index` without checking the bounds.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `index < len()`.
    #[must_use]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(
            index < self.len,
            "get_unchecked_mut({index}) out of bounds in dynamic array of length {}",
            self.len
        );

        let slot = self.buffer.slot(index);

        // SAFETY: The caller guarantees that the slot is within the initialized region and we
        // hold an exclusive reference to the array.
        unsafe { &mut *slot }
    }

    /// Returns a reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the array is empty.
    pub fn front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(Error::Empty)
    }

    /// Returns an exclusive reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the array is empty.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice().first_mut().ok_or(Error::Empty)
    }

    /// Returns a reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the array is empty.
    pub fn back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(Error::Empty)
    }

    /// Returns an exclusive reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the array is empty.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice().last_mut().ok_or(Error::Empty)
    }

    /// Replaces the element at `index` with `value`, dropping the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= len()`. The array is left unchanged.
    pub fn update_at(&mut self, index: usize, value: T) -> Result<()> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    /// Appends `value` to the end of the array.
    ///
    /// If the array is full, the capacity is doubled first (or set to 1 if it was zero).
    ///
    /// # Panics
    ///
    /// Panics if the doubled capacity would overflow.
    pub fn push_back(&mut self, value: T) {
        if self.is_full() {
            self.grow();
        }

        // SAFETY: The array is not full, so slot `len` is within the buffer and uninitialized.
        unsafe {
            self.buffer.slot(self.len).write(value);
        }

        // Cannot overflow because len < capacity before the increment.
        self.len = self.len.wrapping_add(1);

        #[cfg(debug_assertions)]
        self.integrity_check();
    }

    /// Inserts `value` at `index`, shifting the elements at `index..len` one position right.
    ///
    /// Any `index` in `0..=len()` is valid. Inserting at `len()` is equivalent to
    /// [`push_back()`][Self::push_back].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index > len()`. The value is dropped and the array is
    /// left unchanged.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }

        if self.is_full() {
            self.grow();
        }

        let target = self.buffer.slot(index);

        // Guarded by the bounds check above.
        let shifted_count = self.len.wrapping_sub(index);

        // SAFETY: The array is not full, so `index..=len` are all slots within the buffer.
        // `ptr::copy()` permits the source and destination ranges to overlap.
        unsafe {
            ptr::copy(target, target.wrapping_add(1), shifted_count);
        }

        // SAFETY: The previous value in this slot was moved one position right, so the slot
        // is logically uninitialized and writing does not leak anything.
        unsafe {
            target.write(value);
        }

        // Cannot overflow because len < capacity before the increment.
        self.len = self.len.wrapping_add(1);

        #[cfg(debug_assertions)]
        self.integrity_check();

        Ok(())
    }

    /// Removes and returns the element at `index`, shifting the elements after it one position
    /// left. The relative order of the remaining elements is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= len()`.
    pub fn delete_at(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }

        let target = self.buffer.slot(index);

        // SAFETY: index < len, so the slot is initialized. We take ownership of the value and
        // overwrite the slot below, so it is never read or dropped again.
        let removed = unsafe { target.read() };

        // Guarded by the bounds check above.
        let shifted_count = self.len.wrapping_sub(index).wrapping_sub(1);

        // SAFETY: Both ranges lie within the initialized region `0..len`.
        unsafe {
            ptr::copy(target.wrapping_add(1), target, shifted_count);
        }

        // Guarded by the bounds check above, which implies len > 0.
        self.len = self.len.wrapping_sub(1);

        #[cfg(debug_assertions)]
        self.integrity_check();

        Ok(removed)
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the array is empty.
    pub fn pop_back(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }

        // Guarded by the emptiness check above.
        self.len = self.len.wrapping_sub(1);

        // SAFETY: The slot at the old `len - 1` is initialized and is no longer covered by `len`,
        // so ownership of the value moves to the caller.
        Ok(unsafe { self.buffer.slot(self.len).read() })
    }

    /// Removes all elements. The capacity is retained.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drops the elements at `new_len..len`. Does nothing if `new_len >= len`.
    fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        // Guarded by the check above.
        let dropped_count = self.len.wrapping_sub(new_len);

        // Shrink first, so a panicking destructor cannot cause a double drop.
        self.len = new_len;

        let tail = ptr::slice_from_raw_parts_mut(self.buffer.slot(new_len), dropped_count);

        // SAFETY: The tail was initialized and is no longer covered by `len`, so the values are
        // dropped exactly once.
        unsafe {
            ptr::drop_in_place(tail);
        }
    }

    /// Reallocates the buffer so that the capacity equals the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let mut array = DynamicArray::builder().capacity(10).build();
    /// array.push_back('x');
    ///
    /// array.shrink();
    /// assert_eq!(array.capacity(), 1);
    /// ```
    pub fn shrink(&mut self) {
        self.reallocate(self.len);
    }

    fn grow(&mut self) {
        let new_capacity = match self.buffer.capacity() {
            0 => 1,
            capacity => capacity.checked_mul(2).unwrap_or_else(|| {
                panic!(
                    "capacity overflow: cannot double capacity {capacity} of dynamic array of {}",
                    type_name::<T>()
                )
            }),
        };

        self.reallocate(new_capacity);
    }

    /// Replaces the buffer with one of exactly `new_capacity` slots, moving the elements across.
    ///
    /// If `new_capacity < len`, the elements that do not fit are dropped and the array is
    /// truncated. Does nothing if the capacity already matches.
    pub(crate) fn reallocate(&mut self, new_capacity: usize) {
        let old_capacity = self.buffer.capacity();

        if new_capacity == old_capacity {
            return;
        }

        if new_capacity < self.len {
            debug!(
                len = self.len,
                new_capacity,
                item_type = type_name::<T>(),
                "reallocation truncates dynamic array"
            );

            self.truncate(new_capacity);
        }

        let new_buffer = RawBuffer::<T>::with_capacity(new_capacity);

        // SAFETY: Both buffers have room for `len` items and are distinct allocations (or
        // dangling with zero-sized reads). The values are moved bitwise; the old buffer never
        // touches its contents so nothing is dropped twice.
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), new_buffer.as_ptr(), self.len);
        }

        // The old buffer only releases its memory on drop.
        drop(mem::replace(&mut self.buffer, new_buffer));

        trace!(
            old_capacity,
            new_capacity,
            len = self.len,
            item_type = type_name::<T>(),
            "reallocated dynamic array"
        );

        #[cfg(debug_assertions)]
        self.integrity_check();
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    pub(crate) fn integrity_check(&self) {
        assert!(
            self.len <= self.buffer.capacity(),
            "len {} exceeds capacity {} in dynamic array of {}",
            self.len,
            self.buffer.capacity(),
            type_name::<T>()
        );

        if size_of::<T>() != 0 {
            assert_eq!(
                self.buffer.is_allocated(),
                self.buffer.capacity() > 0,
                "buffer allocation state does not match capacity {} in dynamic array of {}",
                self.buffer.capacity(),
                type_name::<T>()
            );
        }
    }
}

impl<T: Default> DynamicArray<T> {
    /// Creates an array of `len` elements, each set to `T::default()`.
    ///
    /// The capacity is exactly `len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` items would exceed the maximum size of a single allocation.
    ///
    /// Aborts the process if the memory cannot be allocated.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut array = Self::new_inner(len);
        array.resize(len);
        array
    }

    /// Changes the length of the array to `new_len`.
    ///
    /// * If `new_len > capacity()`, the buffer is first reallocated to exactly `new_len` slots.
    /// * If `new_len < len()`, the elements at `new_len..` are dropped. The capacity is kept.
    /// * If `new_len > len()`, the new slots are filled with `T::default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let mut array = DynamicArray::<u8>::new();
    /// array.push_back(5);
    ///
    /// array.resize(3);
    /// assert_eq!(array.len(), 3);
    /// assert_eq!(*array.at(2).unwrap(), 0);
    ///
    /// array.resize(1);
    /// assert_eq!(*array.back().unwrap(), 5);
    /// ```
    pub fn resize(&mut self, new_len: usize) {
        if new_len > self.buffer.capacity() {
            self.reallocate(new_len);
        }

        if new_len < self.len {
            self.truncate(new_len);
            return;
        }

        while self.len < new_len {
            // SAFETY: len < new_len <= capacity, so the slot is within the buffer and
            // uninitialized.
            unsafe {
                self.buffer.slot(self.len).write(T::default());
            }

            // Cannot overflow because len < capacity before the increment.
            self.len = self.len.wrapping_add(1);
        }

        #[cfg(debug_assertions)]
        self.integrity_check();
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Creates an array of `len` clones of `value`.
    ///
    /// The capacity is exactly `len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` items would exceed the maximum size of a single allocation.
    ///
    /// Aborts the process if the memory cannot be allocated.
    #[must_use]
    pub fn from_elem(len: usize, value: &T) -> Self {
        let mut array = Self::new_inner(len);

        for _ in 0..len {
            array.push_back(value.clone());
        }

        array
    }

    /// Overwrites every element with a clone of `value`. The length does not change.
    pub fn fill(&mut self, value: &T) {
        for element in self.as_mut_slice() {
            element.clone_from(value);
        }
    }
}

impl<T: PartialEq> DynamicArray<T> {
    /// Returns the index of the first element equal to `value`, or [`NOT_FOUND`] if there is
    /// no such element.
    #[must_use]
    pub fn find_first(&self, value: &T) -> usize {
        self.as_slice()
            .iter()
            .position(|element| element == value)
            .unwrap_or(NOT_FOUND)
    }

    /// Returns the index of the last element equal to `value`, or [`NOT_FOUND`] if there is
    /// no such element.
    #[must_use]
    pub fn find_last(&self, value: &T) -> usize {
        self.as_slice()
            .iter()
            .rposition(|element| element == value)
            .unwrap_or(NOT_FOUND)
    }

    /// Removes every element equal to `value` in a single pass. The remaining elements keep
    /// their relative order and are compacted to the front. The capacity is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let mut array = DynamicArray::new();
    /// for value in [1, 2, 1, 3, 1] {
    ///     array.push_back(value);
    /// }
    ///
    /// array.delete_equal(&1);
    ///
    /// assert_eq!(array.len(), 2);
    /// assert_eq!(array[0], 2);
    /// assert_eq!(array[1], 3);
    /// ```
    pub fn delete_equal(&mut self, value: &T) {
        let original_len = self.len;

        // Elements are not covered by `len` while we shuffle them, so a panic in `eq()` or in a
        // destructor leaks the rest instead of dropping anything twice.
        self.len = 0;

        let mut kept: usize = 0;

        for index in 0..original_len {
            let current = self.buffer.slot(index);

            // SAFETY: index < original_len and this slot has not been moved from or dropped yet.
            let is_match = unsafe { &*current } == value;

            if is_match {
                // SAFETY: The value is initialized and this is the only place it is dropped.
                unsafe {
                    ptr::drop_in_place(current);
                }
            } else {
                if kept != index {
                    let destination = self.buffer.slot(kept);

                    // SAFETY: kept < index, so the destination was already vacated by a move
                    // or a drop, and the two slots do not overlap.
                    unsafe {
                        ptr::copy_nonoverlapping(current, destination, 1);
                    }
                }

                // Cannot overflow because kept <= index < original_len.
                kept = kept.wrapping_add(1);
            }
        }

        self.len = kept;

        #[cfg(debug_assertions)]
        self.integrity_check();
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        self.clear();

        // The buffer releases its memory when it is dropped after us.
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Creates an independent deep copy of the elements. The capacity of the copy equals
    /// the length of the source.
    fn clone(&self) -> Self {
        let mut copy = Self::new_inner(self.len);

        for element in self.as_slice() {
            copy.push_back(element.clone());
        }

        copy
    }

    /// Replaces the contents of `self` with a deep copy of `source`.
    ///
    /// The existing buffer is reused if it is large enough. `&mut self` and `&source` can never
    /// refer to the same array, so there is no self-assignment case to guard against.
    fn clone_from(&mut self, source: &Self) {
        if self.buffer.capacity() < source.len {
            *self = source.clone();
            return;
        }

        self.clear();

        for element in source.as_slice() {
            self.push_back(element.clone());
        }
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    /// Two arrays are equal if they hold equal elements in the same order.
    /// The capacity is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len()`. Use [`at()`][DynamicArray::at] for a checked alternative.
    fn index(&self, index: usize) -> &T {
        let len = self.len;

        self.as_slice().get(index).unwrap_or_else(|| {
            panic!("index {index} out of bounds in dynamic array of length {len}")
        })
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    /// # Panics
    ///
    /// Panics if `index >= len()`. Use [`at_mut()`][DynamicArray::at_mut] for a checked
    /// alternative.
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;

        self.as_mut_slice().get_mut(index).unwrap_or_else(|| {
            panic!("index {index} out of bounds in dynamic array of length {len}")
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("len", &self.len)
            .field("capacity", &self.buffer.capacity())
            .field("elements", &self.as_slice())
            .finish_non_exhaustive()
    }
}

// SAFETY: The array exclusively owns its elements through a raw pointer, so moving it between
// threads is the same as moving the elements, which is fine as long as T itself is Send.
unsafe impl<T: Send> Send for DynamicArray<T> {}

// SAFETY: Shared access only ever hands out shared references to the elements, so sharing the
// array between threads is fine as long as T itself is Sync.
unsafe impl<T: Sync> Sync for DynamicArray<T> {}
