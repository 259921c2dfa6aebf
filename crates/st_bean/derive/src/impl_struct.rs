use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, Generics, Ident, LitStr, Type, parse_quote};

use crate::attributes::{FieldAttributes, TypeAttributes};

/// An active field: property name, field ident and field type.
struct Property<'a> {
    name: LitStr,
    ident: &'a Ident,
    ty: &'a Type,
}

fn collect_properties(data: &DataStruct) -> syn::Result<Vec<Property<'_>>> {
    let named = match &data.fields {
        Fields::Named(named) => named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(unnamed) => {
            return Err(syn::Error::new_spanned(
                unnamed,
                "`Bean` requires named fields; tuple structs have no property names",
            ));
        }
    };

    let mut properties = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let attrs = FieldAttributes::parse(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
        if properties.iter().any(|p: &Property<'_>| p.name.value() == name.value()) {
            return Err(syn::Error::new_spanned(&name, "duplicate property name"));
        }
        properties.push(Property {
            name,
            ident,
            ty: &field.ty,
        });
    }
    Ok(properties)
}

/// Adds `Bean + Typed` to every type parameter.
pub(crate) fn bounded_generics(generics: &Generics, bean: &syn::Path) -> syn::Result<Generics> {
    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "`Bean` types must be 'static and cannot have lifetime parameters",
        ));
    }
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#bean::Bean));
        param.bounds.push(parse_quote!(#bean::info::Typed));
    }
    Ok(generics)
}

/// Implement `Typed`, `Bean` and `PropertyAccessor` for a struct.
pub(crate) fn impl_struct(ast: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream> {
    let type_attrs = TypeAttributes::parse(&ast.attrs)?;
    let properties = collect_properties(data)?;

    let bean = crate::st_bean_path();
    let ident = &ast.ident;
    let generics = bounded_generics(&ast.generics, &bean)?;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let names: Vec<&LitStr> = properties.iter().map(|p| &p.name).collect();
    let fields: Vec<&Ident> = properties.iter().map(|p| p.ident).collect();
    let types: Vec<&Type> = properties.iter().map(|p| p.ty).collect();

    let properties_tokens = if properties.is_empty() {
        quote!()
    } else {
        quote! {
            .with_properties([
                #(#bean::info::PropertyInfo::new::<#types>(#names),)*
            ])
        }
    };
    let default_tokens = if type_attrs.default {
        quote!(.with_default::<Self>())
    } else {
        quote!()
    };
    let build_info = quote! {
        #bean::info::TypeInfo::new::<Self>(#bean::info::TypeKind::Struct)
            #properties_tokens
            #default_tokens
    };
    let cell_tokens = if ast.generics.params.is_empty() {
        quote! {
            static CELL: #bean::info::NonGenericTypeInfoCell = #bean::info::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #build_info)
        }
    } else {
        quote! {
            static CELL: #bean::info::GenericTypeInfoCell = #bean::info::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #build_info)
        }
    };

    Ok(quote! {
        impl #impl_generics #bean::info::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #bean::info::TypeInfo {
                #cell_tokens
            }
        }

        impl #impl_generics #bean::Bean for #ident #ty_generics #where_clause {
            #[inline]
            fn bean_info(&self) -> &'static #bean::info::TypeInfo {
                <Self as #bean::info::Typed>::type_info()
            }

            #[inline]
            fn bean_ref(&self) -> #bean::BeanRef<'_> {
                #bean::BeanRef::Struct(self)
            }

            #[inline]
            fn bean_mut(&mut self) -> #bean::BeanMut<'_> {
                #bean::BeanMut::Struct(self)
            }

            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn #bean::Bean>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn #bean::Bean>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics #bean::ops::PropertyAccessor for #ident #ty_generics #where_clause {
            fn get(&self, name: &str) -> ::core::option::Option<&dyn #bean::Bean> {
                match name {
                    #(#names => ::core::option::Option::Some(&self.#fields),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn get_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #bean::Bean> {
                match name {
                    #(#names => ::core::option::Option::Some(&mut self.#fields),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn declared_type(
                &self,
                name: &str,
            ) -> ::core::option::Option<&'static #bean::info::TypeInfo> {
                match name {
                    #(#names => ::core::option::Option::Some(
                        <#types as #bean::info::Typed>::type_info()
                    ),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn property_names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }
        }
    })
}
