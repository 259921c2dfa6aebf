use alloc::boxed::Box;

use crate::Bean;
use crate::info::TypeInfo;

/// Named property access, implemented by `#[derive(Bean)]` for structs.
///
/// Path evaluators only talk to beans through this trait, so a type may
/// implement it by hand to expose computed properties or to narrow the
/// declared type of a property.
///
/// # Examples
///
/// ```
/// use st_bean::derive::Bean;
/// use st_bean::ops::PropertyAccessor;
///
/// #[derive(Bean)]
/// struct Point {
///     x: i32,
///     #[bean(rename = "ordinate")]
///     y: i32,
/// }
///
/// let mut point = Point { x: 1, y: 2 };
/// point.set("ordinate", Box::new(5_i32)).unwrap();
///
/// assert_eq!(point.y, 5);
/// assert!(point.declared_type("x").unwrap().is::<i32>());
/// assert!(point.get("y").is_none());
/// ```
pub trait PropertyAccessor {
    /// Returns the value of the property `name`.
    ///
    /// `None` means the bean has no such property.
    fn get(&self, name: &str) -> Option<&dyn Bean>;

    /// Returns the value of the property `name` mutably.
    fn get_mut(&mut self, name: &str) -> Option<&mut dyn Bean>;

    /// Returns the declared type of the property `name`.
    fn declared_type(&self, name: &str) -> Option<&'static TypeInfo>;

    /// Returns the names of all properties.
    fn property_names(&self) -> &'static [&'static str];

    /// Sets the property `name`.
    ///
    /// Returns the value unchanged when the property does not exist or the
    /// value does not fit its type.
    fn set(&mut self, name: &str, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
        match self.get_mut(name) {
            Some(property) => property.set(value),
            None => Err(value),
        }
    }
}
