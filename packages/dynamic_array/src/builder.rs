use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::DynamicArray;

/// Builder for creating an instance of [`DynamicArray`].
///
/// You only need to use this builder if you want to reserve capacity up front.
/// [`DynamicArray::new()`][1] creates an empty array that allocates on first insertion.
///
/// # Examples
///
/// ```
/// use dynamic_array::DynamicArray;
///
/// let array = DynamicArray::<u32>::builder().capacity(16).build();
///
/// assert_eq!(array.len(), 0);
/// assert_eq!(array.capacity(), 16);
/// ```
///
/// [1]: DynamicArray::new
#[must_use]
pub struct DynamicArrayBuilder<T> {
    capacity: usize,

    _item: PhantomData<T>,
}

impl<T> fmt::Debug for DynamicArrayBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArrayBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T> DynamicArrayBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            _item: PhantomData,
        }
    }

    /// Sets the number of items the array can hold before it first needs to reallocate.
    ///
    /// The default is zero, in which case nothing is allocated until the first insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let mut array = DynamicArray::<String>::builder().capacity(2).build();
    ///
    /// array.push_back("a".to_string());
    /// array.push_back("b".to_string());
    ///
    /// // Still the reserved capacity - no growth was needed.
    /// assert_eq!(array.capacity(), 2);
    /// ```
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds an empty dynamic array with exactly the configured capacity.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity exceeds the maximum size of a single allocation.
    ///
    /// Aborts the process if the memory cannot be allocated.
    #[must_use]
    pub fn build(self) -> DynamicArray<T> {
        DynamicArray::new_inner(self.capacity)
    }
}
