use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};

use st_bean::info::TypeInfo;

use crate::ParseError;

// -----------------------------------------------------------------------------
// UrlBindingParameter

/// A `{name}` or `{name=default}` placeholder of a [`UrlBinding`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlBindingParameter {
    name: Box<str>,
    default: Option<Box<str>>,
    value: Option<Box<str>>,
}

impl UrlBindingParameter {
    /// The parameter that selects the event handler. It never has a default.
    pub const EVENT: &'static str = "$event";

    /// Creates a parameter without a value.
    ///
    /// # Errors
    ///
    /// The name is empty, or the [`EVENT`](Self::EVENT) parameter has a default.
    pub fn new(name: &str, default: Option<&str>) -> Result<Self, ParseError> {
        if name.is_empty() {
            return Err(ParseError::new(name, 0, "a parameter must have a name"));
        }
        if name == Self::EVENT && default.is_some() {
            return Err(ParseError::new(
                name,
                0,
                "the `$event` parameter may not have a default value",
            ));
        }
        Ok(Self {
            name: name.into(),
            default: default.map(Into::into),
            value: None,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The value extracted from a URI, or the default if there is none.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().or(self.default.as_deref())
    }

    /// The value extracted from a URI, ignoring the default.
    #[inline]
    pub fn raw_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub(crate) fn with_value(&self, value: &str) -> Self {
        Self {
            value: Some(value.into()),
            ..self.clone()
        }
    }
}

impl fmt::Display for UrlBindingParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        f.write_str(&self.name)?;
        if let Some(default) = &self.default {
            f.write_char('=')?;
            f.write_str(default)?;
        }
        f.write_char('}')
    }
}

// -----------------------------------------------------------------------------
// UrlBindingComponent

/// One piece of a [`UrlBinding`] after its leading path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlBindingComponent {
    Literal(Box<str>),
    Parameter(UrlBindingParameter),
}

impl UrlBindingComponent {
    #[inline]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(literal) => Some(literal),
            Self::Parameter(_) => None,
        }
    }

    #[inline]
    pub fn as_parameter(&self) -> Option<&UrlBindingParameter> {
        match self {
            Self::Literal(_) => None,
            Self::Parameter(parameter) => Some(parameter),
        }
    }
}

impl fmt::Display for UrlBindingComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.write_str(literal),
            Self::Parameter(parameter) => fmt::Display::fmt(parameter, f),
        }
    }
}

// -----------------------------------------------------------------------------
// UrlBinding

/// A parsed URL pattern bound to a bean type, e.g. `/user/{id}/{$event}.action`.
///
/// The pattern is split into a leading literal `path` (`/user`) and the
/// components that follow it (`/`, `{id}`, `/`, `{$event}`, `.action`). A
/// trailing literal after at least one parameter is the `suffix`.
///
/// `Display` prints the pattern without escapes; [`to_pattern`](Self::to_pattern)
/// prints it in a form that parses back to an equal binding.
#[derive(Clone)]
pub struct UrlBinding {
    bean_type: &'static TypeInfo,
    path: Box<str>,
    components: Vec<UrlBindingComponent>,
    suffix: Option<Box<str>>,
}

impl UrlBinding {
    /// Creates a binding from already parsed pieces.
    pub fn new(bean_type: &'static TypeInfo, path: &str, components: Vec<UrlBindingComponent>) -> Self {
        let has_parameters = components.iter().any(|c| c.as_parameter().is_some());
        let suffix = match components.last() {
            Some(UrlBindingComponent::Literal(literal)) if has_parameters => Some(literal.clone()),
            _ => None,
        };
        Self {
            bean_type,
            path: path.into(),
            components,
            suffix,
        }
    }

    /// Parses `pattern` for `bean_type`.
    ///
    /// # Errors
    ///
    /// See [`parse_pattern`](crate::parse_pattern).
    pub fn parse(bean_type: &'static TypeInfo, pattern: &str) -> Result<Self, ParseError> {
        crate::parse_pattern(bean_type, pattern)
    }

    #[inline]
    pub fn bean_type(&self) -> &'static TypeInfo {
        self.bean_type
    }

    /// The literal part before the first parameter.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn components(&self) -> &[UrlBindingComponent] {
        &self.components
    }

    /// The trailing literal, if the binding has parameters and ends with a literal.
    #[inline]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &UrlBindingParameter> {
        self.components.iter().filter_map(UrlBindingComponent::as_parameter)
    }

    pub fn parameter(&self, name: &str) -> Option<&UrlBindingParameter> {
        self.parameters().find(|p| p.name() == name)
    }

    pub(crate) fn literals(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(UrlBindingComponent::as_literal)
    }

    pub(crate) fn components_mut(&mut self) -> &mut [UrlBindingComponent] {
        &mut self.components
    }

    /// Whether `other` has the same path and the same sequence of literals
    /// and parameters, ignoring parameter names and defaults.
    pub fn same_shape(&self, other: &UrlBinding) -> bool {
        self.path == other.path
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| match (a, b) {
                    (UrlBindingComponent::Literal(a), UrlBindingComponent::Literal(b)) => a == b,
                    (UrlBindingComponent::Parameter(_), UrlBindingComponent::Parameter(_)) => true,
                    _ => false,
                })
    }

    /// Renders the binding as a pattern, escaping every special character.
    pub fn to_pattern(&self) -> String {
        let mut out = String::with_capacity(self.path.len() + 16);
        escape_into(&mut out, &self.path, &['\\', '{', '}', '=']);
        for component in &self.components {
            match component {
                UrlBindingComponent::Literal(literal) => {
                    escape_into(&mut out, literal, &['\\', '{', '}', '=']);
                }
                UrlBindingComponent::Parameter(parameter) => {
                    out.push('{');
                    escape_into(&mut out, parameter.name(), &['\\', '}', '=']);
                    if let Some(default) = parameter.default_value() {
                        out.push('=');
                        escape_into(&mut out, default, &['\\', '}']);
                    }
                    out.push('}');
                }
            }
        }
        out
    }
}

fn escape_into(out: &mut String, text: &str, special: &[char]) {
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

impl PartialEq for UrlBinding {
    fn eq(&self, other: &Self) -> bool {
        self.bean_type.type_id() == other.bean_type.type_id()
            && self.path == other.path
            && self.components == other.components
    }
}

impl Eq for UrlBinding {}

impl fmt::Display for UrlBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        self.components.iter().try_for_each(|c| fmt::Display::fmt(c, f))
    }
}

impl fmt::Debug for UrlBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlBinding")
            .field("bean_type", &self.bean_type.type_name())
            .field("pattern", &format_args!("{self}"))
            .finish()
    }
}
