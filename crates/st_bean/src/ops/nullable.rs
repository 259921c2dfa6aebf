use alloc::boxed::Box;

use crate::Bean;
use crate::info::TypeInfo;

/// A value that may be null, implemented by `Option<T>`.
pub trait Nullable {
    /// Returns the value, or `None` when null.
    fn value(&self) -> Option<&dyn Bean>;

    /// Returns the value mutably, or `None` when null.
    fn value_mut(&mut self) -> Option<&mut dyn Bean>;

    /// Replaces the value; `None` makes it null.
    ///
    /// Accepts either the item type or the option type itself.
    fn replace(&mut self, value: Option<Box<dyn Bean>>) -> Result<(), Box<dyn Bean>>;

    /// Returns the declared type of the value.
    fn item_info(&self) -> &'static TypeInfo;

    /// Returns `true` if the value is null.
    fn is_null(&self) -> bool {
        self.value().is_none()
    }
}
