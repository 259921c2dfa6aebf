//! Static URL binding registration, collected with [`inventory`].
//!
//! ```no_run
//! use st_url::{UrlBindingFactory, register_url_binding};
//! # use st_bean::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
//! # struct UserAction;
//! # impl Typed for UserAction {
//! #     fn type_info() -> &'static TypeInfo {
//! #         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
//! #         CELL.get_or_init(|| TypeInfo::new::<UserAction>(TypeKind::Struct))
//! #     }
//! # }
//!
//! register_url_binding!(UserAction, "/user/{id}");
//!
//! let factory = UrlBindingFactory::from_registered().unwrap();
//! assert!(factory.binding_for_type::<UserAction>().is_some());
//! ```

use st_bean::info::TypeInfo;

use crate::{ParseError, UrlBinding, UrlBindingFactory};

/// A pattern submitted by [`register_url_binding!`](crate::register_url_binding).
pub struct UrlBindingRegistration {
    pub bean_type: fn() -> &'static TypeInfo,
    pub pattern: &'static str,
}

inventory::collect!(UrlBindingRegistration);

/// Registers a URL binding pattern for a type at link time.
///
/// The bindings are picked up by [`UrlBindingFactory::from_registered`].
#[macro_export]
macro_rules! register_url_binding {
    ($ty:ty, $pattern:expr $(,)?) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::UrlBindingRegistration {
                bean_type: <$ty as $crate::__macro_exports::Typed>::type_info,
                pattern: $pattern,
            }
        }
    };
}

impl UrlBindingFactory {
    /// Creates a factory holding every binding submitted through
    /// [`register_url_binding!`](crate::register_url_binding).
    ///
    /// # Errors
    ///
    /// A registered pattern does not parse.
    pub fn from_registered() -> Result<Self, ParseError> {
        let factory = Self::new();
        for registration in inventory::iter::<UrlBindingRegistration> {
            let binding = UrlBinding::parse((registration.bean_type)(), registration.pattern)?;
            factory.add_binding(binding);
        }
        log::debug!("Collected {} registered URL bindings", factory.len());
        Ok(factory)
    }
}
