//! URL bindings: patterns such as `/user/{id}/{$event=view}.action` bound to
//! bean types, and the [`UrlBindingFactory`] that maps request URIs back to
//! the binding that handles them.
//!
//! # Features
//!
//! - `auto_register` (default): [`register_url_binding!`] and
//!   [`UrlBindingFactory::from_registered`], backed by `inventory`.

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod binding;
mod error;
mod factory;
mod parser;

#[cfg(feature = "auto_register")]
mod registration;

// -----------------------------------------------------------------------------
// Exports

pub use binding::{UrlBinding, UrlBindingComponent, UrlBindingParameter};
pub use error::{ParseError, UrlBindingConflict};
pub use factory::UrlBindingFactory;
pub use parser::parse_pattern;

#[cfg(feature = "auto_register")]
pub use registration::UrlBindingRegistration;

#[doc(hidden)]
#[cfg(feature = "auto_register")]
pub mod __macro_exports {
    pub use inventory;
    pub use st_bean::info::Typed;
}
