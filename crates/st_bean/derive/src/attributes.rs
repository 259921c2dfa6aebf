//! Parsing of `#[bean(...)]` attributes.

use syn::{Attribute, LitStr};

use crate::BEAN_ATTRIBUTE_NAME;

/// Attributes on the deriving type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub default: bool,
}

/// Attributes on a struct field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: bool,
    pub rename: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(BEAN_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    result.default = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown type attribute, expected `default`"))
                }
            })?;
        }
        Ok(result)
    }
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(BEAN_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    result.rename = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute, expected `skip` or `rename`"))
                }
            })?;
        }
        Ok(result)
    }
}
