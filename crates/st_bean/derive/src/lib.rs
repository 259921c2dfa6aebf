//! See [`Bean`].
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static BEAN_ATTRIBUTE_NAME: &str = "bean";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod impl_enum;
mod impl_struct;

// -----------------------------------------------------------------------------
// Macros

/// # Bean Derivation
///
/// `#[derive(Bean)]` implements `Typed` and `Bean` and, for structs,
/// `PropertyAccessor`. Unit-only enums also get `FromLiteral`, matching
/// variant names.
///
/// - Named structs: every field is a property named after the field.
/// - Unit structs: a struct bean without properties.
/// - Unit-only enums: scalar beans whose default is the first variant.
///
/// Tuple structs and enums with fields are rejected.
///
/// Every field type must implement `Bean + Typed`. Generic type parameters
/// get the same bounds added to the generated impls. Lifetime parameters are
/// not supported since beans are `'static`.
///
/// ## Type attributes
///
/// - `#[bean(default)]`: the type implements `Default`, which is recorded as
///   its factory for auto-created null properties.
///
/// ## Field attributes
///
/// - `#[bean(skip)]`: the field is not a property.
/// - `#[bean(rename = "name")]`: the property name used in paths.
///
/// ```rust, ignore
/// #[derive(Bean, Default)]
/// #[bean(default)]
/// struct Order {
///     #[bean(rename = "orderId")]
///     id: u64,
///     lines: Vec<Option<Line>>,
///     #[bean(skip)]
///     cache: Cache,
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let result = match &ast.data {
        syn::Data::Struct(data) => impl_struct::impl_struct(&ast, data),
        syn::Data::Enum(data) => impl_enum::impl_enum(&ast, data),
        syn::Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "`Bean` cannot be derived for unions",
        )),
    };

    result.unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Path of the `st_bean` crate as seen from the deriving crate.
fn st_bean_path() -> syn::Path {
    st_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("st_bean"))
}
