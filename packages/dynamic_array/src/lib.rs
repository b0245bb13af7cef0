#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A growable, contiguous, indexable array with explicit capacity management.
//!
//! This crate provides [`DynamicArray`], a heap-allocated sequence of elements that tracks how
//! many elements it holds (its length) separately from how many it has room for (its capacity).
//! It supports random access, insertion and removal at any position, linear search and
//! deep copying.
//!
//! # Key Features
//!
//! - **Predictable growth**: capacity doubles (starting from 1) whenever an insertion finds the
//!   array full, and only shrinks when you ask for it
//! - **Checked access**: [`at()`][DynamicArray::at], [`insert_at()`][DynamicArray::insert_at],
//!   [`delete_at()`][DynamicArray::delete_at] and friends return an [`Error`] on invalid
//!   indexes instead of panicking
//! - **Unchecked access**: the `[]` operator and
//!   [`get_unchecked()`][DynamicArray::get_unchecked] for callers that already know the index
//!   is valid
//! - **Linear search**: [`find_first()`][DynamicArray::find_first] and
//!   [`find_last()`][DynamicArray::find_last] return [`NOT_FOUND`] when nothing matches
//! - **Value semantics**: cloning an array deep-copies its elements into a new buffer
//!
//! # Out of memory
//!
//! Failing to allocate memory is treated as fatal. The process is aborted via
//! [`std::alloc::handle_alloc_error`] instead of returning an error.
//!
//! # Thread safety
//!
//! The array performs no internal synchronization. It is [`Send`] and [`Sync`] whenever the
//! element type is, so it can be moved between threads or shared behind a `Mutex`.
//!
//! # Examples
//!
//! ```rust
//! use dynamic_array::{DynamicArray, Error, NOT_FOUND};
//!
//! let mut array = DynamicArray::new();
//! array.push_back("apple");
//! array.push_back("banana");
//! array.push_back("apple");
//!
//! assert_eq!(array.len(), 3);
//! assert_eq!(array.find_first(&"apple"), 0);
//! assert_eq!(array.find_last(&"apple"), 2);
//! assert_eq!(array.find_first(&"cherry"), NOT_FOUND);
//!
//! // Invalid indexes are reported, not panicked on.
//! assert_eq!(array.at(3), Err(Error::OutOfBounds { index: 3, len: 3 }));
//!
//! array.delete_equal(&"apple");
//! assert_eq!(*array.front().unwrap(), "banana");
//! ```

mod builder;
mod dynamic_array;
mod error;
mod raw_buffer;

pub use builder::*;
pub use dynamic_array::*;
pub use error::*;
pub(crate) use raw_buffer::*;
