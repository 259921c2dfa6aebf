use alloc::boxed::Box;
use alloc::collections::TryReserveError;

use crate::Bean;
use crate::info::TypeInfo;

/// An indexed, growable sequence.
///
/// Growing pads with the element type's default, so a list of `Option<T>`
/// is padded with `None`.
///
/// # Examples
///
/// ```
/// use st_bean::ops::List;
///
/// let mut list: Vec<Option<String>> = Vec::new();
/// List::set(&mut list, 3, Box::new(String::from("x"))).unwrap();
///
/// assert_eq!(list, [None, None, None, Some(String::from("x"))]);
/// ```
pub trait List {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Option<&dyn Bean>;

    /// Returns the element at `index` mutably.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Bean>;

    /// Grows the list to at least `len` elements.
    ///
    /// Fails without changing the list if the memory cannot be reserved.
    fn ensure_len(&mut self, len: usize) -> Result<(), TryReserveError>;

    /// Removes every element.
    fn clear(&mut self);

    /// Returns the declared element type.
    fn item_info(&self) -> &'static TypeInfo;

    /// Sets the element at `index`, growing the list first if needed.
    ///
    /// The value is handed back if the list cannot grow that far.
    fn set(&mut self, index: usize, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
        let Some(len) = index.checked_add(1) else {
            return Err(value);
        };
        if self.ensure_len(len).is_err() {
            return Err(value);
        }
        match self.get_mut(index) {
            Some(slot) => slot.set(value),
            None => Err(value),
        }
    }

    /// Returns `true` if the list has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
