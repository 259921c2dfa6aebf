use alloc::boxed::Box;

use crate::Bean;
use crate::info::TypeInfo;

/// An unindexed collection of unique values.
pub trait Set {
    /// Returns the number of values.
    fn len(&self) -> usize;

    /// Inserts a value; returns `Ok(false)` if it was already present.
    fn insert(&mut self, value: Box<dyn Bean>) -> Result<bool, Box<dyn Bean>>;

    /// Removes every value.
    fn clear(&mut self);

    /// Returns the declared element type.
    fn item_info(&self) -> &'static TypeInfo;

    /// Returns `true` if the set has no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
