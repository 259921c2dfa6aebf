use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::TypeInfo;
use crate::ops::{List, Map, Nullable, PropertyAccessor, Set};

// -----------------------------------------------------------------------------
// Bean

/// A value whose properties, elements and entries can be reached at runtime.
///
/// Implemented by [`#[derive(Bean)]`](crate::derive::Bean) for structs and
/// unit enums, and by the standard scalars and collections.
///
/// The shape of a bean is exposed through [`Bean::bean_ref`] and
/// [`Bean::bean_mut`], which a path evaluator walks node by node.
///
/// # Manual implementation
///
/// ```
/// use st_bean::{Bean, BeanMut, BeanRef};
/// use st_bean::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
///
/// #[derive(Default)]
/// struct Token(u64);
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::new::<Token>(TypeKind::Scalar).with_default::<Token>())
///     }
/// }
///
/// impl Bean for Token {
///     fn bean_info(&self) -> &'static TypeInfo { Self::type_info() }
///     fn bean_ref(&self) -> BeanRef<'_> { BeanRef::Scalar(self) }
///     fn bean_mut(&mut self) -> BeanMut<'_> { BeanMut::Scalar(self) }
///     fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
///         *self = value.take::<Self>()?;
///         Ok(())
///     }
/// }
///
/// let mut token = Token(1);
/// token.set(Box::new(Token(7))).unwrap();
/// assert_eq!(token.0, 7);
/// ```
pub trait Bean: Any + Send + Sync {
    /// Returns the [`TypeInfo`] of the underlying value.
    ///
    /// For `Box<dyn Bean>` this is the info of the boxed value.
    fn bean_info(&self) -> &'static TypeInfo;

    /// Returns an immutable view of the bean's shape.
    fn bean_ref(&self) -> BeanRef<'_>;

    /// Returns a mutable view of the bean's shape.
    fn bean_mut(&mut self) -> BeanMut<'_>;

    /// Replaces `self` with `value` if it has a compatible type.
    ///
    /// Returns the value unchanged when the types do not match.
    fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>>;

    /// Debug formatting used by `impl Debug for dyn Bean`.
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bean_info().type_name())
    }
}

impl dyn Bean {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }

    /// Returns the innermost bean, looking through any `Box<dyn Bean>` layers.
    pub fn innermost(&self) -> &dyn Bean {
        match self.downcast_ref::<Box<dyn Bean>>() {
            Some(inner) => (**inner).innermost(),
            None => self,
        }
    }

    /// Returns the innermost bean mutably, looking through any `Box<dyn Bean>` layers.
    pub fn innermost_mut(&mut self) -> &mut dyn Bean {
        if self.is::<Box<dyn Bean>>() {
            match self.downcast_mut::<Box<dyn Bean>>() {
                Some(inner) => (**inner).innermost_mut(),
                None => unreachable!("type is already checked"),
            }
        } else {
            self
        }
    }

    /// Takes the value out of the box if it is of type `T`.
    ///
    /// Returns the box unchanged otherwise.
    pub fn take<T: Any>(self: Box<dyn Bean>) -> Result<T, Box<dyn Bean>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            match any.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => unreachable!("type is already checked"),
            }
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for dyn Bean {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug(f)
    }
}

// -----------------------------------------------------------------------------
// BeanRef / BeanMut

/// An immutable view of a bean's shape.
pub enum BeanRef<'a> {
    Struct(&'a dyn PropertyAccessor),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Set(&'a dyn Set),
    Option(&'a dyn Nullable),
    Scalar(&'a dyn Bean),
}

/// A mutable view of a bean's shape.
pub enum BeanMut<'a> {
    Struct(&'a mut dyn PropertyAccessor),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Set(&'a mut dyn Set),
    Option(&'a mut dyn Nullable),
    Scalar(&'a mut dyn Bean),
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Bean;

    #[test]
    fn take_returns_box_on_mismatch() {
        let value: Box<dyn Bean> = Box::new(String::from("x"));
        let value = value.take::<u32>().unwrap_err();
        assert_eq!(value.take::<String>().unwrap(), "x");
    }

    #[test]
    fn set_requires_matching_type() {
        let mut number = 3_i32;
        assert!(number.set(Box::new(4_i64)).is_err());
        assert!(number.set(Box::new(5_i32)).is_ok());
        assert_eq!(number, 5);
    }
}
