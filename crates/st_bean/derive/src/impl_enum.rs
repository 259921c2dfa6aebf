use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields, LitStr};

use crate::attributes::{FieldAttributes, TypeAttributes};

/// Implement `Typed`, `Bean` and `FromLiteral` for a unit-only enum.
pub(crate) fn impl_enum(ast: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    // Enums always default to their first variant.
    TypeAttributes::parse(&ast.attrs)?;

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`Bean` enums cannot be generic",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`Bean` enums need at least one variant",
        ));
    }

    let mut idents = Vec::with_capacity(data.variants.len());
    let mut names = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`Bean` enums may only have unit variants",
            ));
        }
        let attrs = FieldAttributes::parse(&variant.attrs)?;
        if attrs.skip {
            return Err(syn::Error::new_spanned(variant, "variants cannot be skipped"));
        }
        let name = attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span()));
        idents.push(&variant.ident);
        names.push(name);
    }
    let first = idents[0];

    let bean = crate::st_bean_path();
    let ident = &ast.ident;

    Ok(quote! {
        impl #bean::info::Typed for #ident {
            fn type_info() -> &'static #bean::info::TypeInfo {
                static CELL: #bean::info::NonGenericTypeInfoCell = #bean::info::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    #bean::info::TypeInfo::new::<Self>(#bean::info::TypeKind::Enum)
                        .with_variants(&[#(#names),*])
                        .with_default_fn(|| ::std::boxed::Box::new(#ident::#first) as ::std::boxed::Box<dyn #bean::Bean>)
                        .with_literal::<Self>()
                })
            }
        }

        impl #bean::Bean for #ident {
            #[inline]
            fn bean_info(&self) -> &'static #bean::info::TypeInfo {
                <Self as #bean::info::Typed>::type_info()
            }

            #[inline]
            fn bean_ref(&self) -> #bean::BeanRef<'_> {
                #bean::BeanRef::Scalar(self)
            }

            #[inline]
            fn bean_mut(&mut self) -> #bean::BeanMut<'_> {
                #bean::BeanMut::Scalar(self)
            }

            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn #bean::Bean>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn #bean::Bean>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }

            fn debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(match self {
                    #(#ident::#idents => #names,)*
                })
            }
        }

        impl #bean::FromLiteral for #ident {
            fn from_literal(literal: &#bean::Literal) -> ::core::option::Option<Self> {
                match literal {
                    #bean::Literal::Str(text) => match &**text {
                        #(#names => ::core::option::Option::Some(#ident::#idents),)*
                        _ => ::core::option::Option::None,
                    },
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
