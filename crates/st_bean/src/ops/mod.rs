//! Capability traits behind [`BeanRef`](crate::BeanRef) and
//! [`BeanMut`](crate::BeanMut).

// -----------------------------------------------------------------------------
// Modules

mod list;
mod map;
mod nullable;
mod property;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use list::List;
pub use map::Map;
pub use nullable::Nullable;
pub use property::PropertyAccessor;
pub use set::Set;
