//! Static type information.
//!
//! [`TypeInfo`] describes a bean type without an instance: its [`TypeKind`],
//! the element and key types of containers, the declared properties of
//! structs and the constructors used to create default and key values.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod type_info;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use type_info::{DefaultFn, LiteralFn, PropertyInfo, TypeInfo, TypeKind};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Implemented by [`#[derive(Bean)]`](crate::derive::Bean) and by every
/// built-in bean type.
///
/// # Examples
///
/// ```
/// use st_bean::info::{TypeKind, Typed};
///
/// let info = <Vec<Option<i64>> as Typed>::type_info();
///
/// assert_eq!(info.kind(), TypeKind::List);
/// assert!(info.item_info().unwrap().item_info().unwrap().is::<i64>());
/// ```
pub trait Typed: 'static {
    /// Returns the static [`TypeInfo`] of this type.
    fn type_info() -> &'static TypeInfo;
}
