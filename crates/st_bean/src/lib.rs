//! Runtime property access for plain Rust structs.
//!
//! A [`Bean`] exposes its shape through [`BeanRef`]/[`BeanMut`]: named
//! properties ([`PropertyAccessor`](ops::PropertyAccessor)), indexed lists,
//! keyed maps, sets, nullable values and scalars. Every bean type also has a
//! static [`TypeInfo`](info::TypeInfo) that describes declared property and
//! element types without needing an instance.
//!
//! ```
//! use st_bean::{Bean, derive};
//! use st_bean::ops::PropertyAccessor;
//!
//! #[derive(derive::Bean, Default)]
//! #[bean(default)]
//! struct Person {
//!     name: Option<String>,
//!     age: u32,
//! }
//!
//! let mut person = Person::default();
//! PropertyAccessor::set(&mut person, "age", Box::new(41_u32)).unwrap();
//!
//! let age = PropertyAccessor::get(&person, "age").unwrap();
//! assert_eq!(age.downcast_ref::<u32>(), Some(&41));
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `st_bean` in doc testing.
// But `macro_utils::Manifest` can only choose one, so we must have an
// `extern self` to ensure `st_bean` can be used as an alias for `crate`.
extern crate self as st_bean;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bean;
mod impls;
mod instantiate;
mod literal;

pub mod info;
pub mod ops;

pub mod derive {
    //! `#[derive(Bean)]` for named structs, unit structs and unit enums.
    //!
    //! - `#[bean(default)]` on the type records its `Default` impl as the
    //!   factory used when a null property of this type is auto-created.
    //! - `#[bean(skip)]` on a field hides it from property access.
    //! - `#[bean(rename = "...")]` on a field changes its property name.
    pub use st_bean_derive::Bean;
}

// -----------------------------------------------------------------------------
// Exports

pub use bean::{Bean, BeanMut, BeanRef};
pub use instantiate::{Factory, Instantiators, KindFactory};
pub use literal::{FromLiteral, Literal};
