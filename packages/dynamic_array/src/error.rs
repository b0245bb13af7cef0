use thiserror::Error;

/// Errors returned when a caller violates the access contract of a [`DynamicArray`][1].
///
/// These are the only recoverable failures of the container. Running out of memory is not
/// represented here because it is never reported as a recoverable error.
///
/// [1]: crate::DynamicArray
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The index does not refer to an element of the array.
    ///
    /// For insertion the valid range is `0..=len` because appending at `len` is allowed.
    /// For every other indexed operation the valid range is `0..len`.
    #[error("index {index} is out of bounds for dynamic array of length {len}")]
    OutOfBounds {
        /// The index the caller asked for.
        index: usize,

        /// The length of the array at the time of the call.
        len: usize,
    },

    /// The operation requires at least one element but the array is empty.
    #[error("dynamic array is empty")]
    Empty,
}

/// A specialized `Result` type for dynamic array operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
