//! Walks through the basic operations of `DynamicArray`, printing the array after each step.

use dynamic_array::{DynamicArray, NOT_FOUND};

fn main() {
    let mut array = DynamicArray::new();

    for value in [1, 2, 3] {
        array.push_back(value);
    }
    println!("After pushing 1, 2, 3: {array:?}");

    let removed = array.delete_at(1).expect("index 1 exists");
    println!("Removed {removed} at index 1: {array:?}");

    array.insert_at(1, 9).expect("index 1 is within 0..=len");
    println!("Inserted 9 at index 1: {array:?}");

    println!("find_first(9) = {}", array.find_first(&9));
    assert_eq!(array.find_first(&42), NOT_FOUND);
    println!("find_first(42) = NOT_FOUND");

    // Invalid indexes are reported as errors.
    if let Err(error) = array.at(10) {
        println!("at(10) failed: {error}");
    }

    array.shrink();
    println!("After shrink, capacity = {}", array.capacity());

    let copy = array.clone();
    array.clear();
    println!("Original after clear: {array:?}");
    println!("Copy is unaffected: {copy:?}");
}
