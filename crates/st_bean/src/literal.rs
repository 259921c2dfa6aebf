use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

// -----------------------------------------------------------------------------
// Literal

/// A typed value written in a property path, such as the `3` in `list[3]`
/// or the `'key'` in `map['key']`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(Box<str>),
}

impl Literal {
    /// Returns the value as a non-negative index, if it is an integer.
    pub fn as_index(&self) -> Option<usize> {
        match *self {
            Literal::Int(v) => usize::try_from(v).ok(),
            Literal::Long(v) => usize::try_from(v).ok(),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Literal::Int(v) => Some(v as i64),
            Literal::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Literal::Int(v) => Some(v as f64),
            Literal::Long(v) => Some(v as f64),
            Literal::Float(v) => Some(v as f64),
            Literal::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => fmt::Display::fmt(v, f),
            Literal::Long(v) => fmt::Display::fmt(v, f),
            Literal::Float(v) => fmt::Display::fmt(v, f),
            Literal::Double(v) => fmt::Display::fmt(v, f),
            Literal::Bool(v) => fmt::Display::fmt(v, f),
            Literal::Char(v) => fmt::Display::fmt(v, f),
            Literal::Str(v) => f.pad(v),
        }
    }
}

// -----------------------------------------------------------------------------
// FromLiteral

/// Conversion from a path [`Literal`], used to build map keys.
///
/// `String` accepts every literal through its textual form; numbers accept
/// any literal that converts without loss of integer range.
pub trait FromLiteral: Sized {
    /// Converts the literal, or returns `None` if it does not fit.
    fn from_literal(literal: &Literal) -> Option<Self>;
}

impl FromLiteral for String {
    fn from_literal(literal: &Literal) -> Option<Self> {
        Some(literal.to_string())
    }
}

impl FromLiteral for bool {
    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromLiteral for char {
    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Char(c) => Some(*c),
            Literal::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

macro_rules! impl_from_literal_int {
    ($($ty:ty),*) => {$(
        impl FromLiteral for $ty {
            fn from_literal(literal: &Literal) -> Option<Self> {
                match literal {
                    Literal::Str(s) => s.parse().ok(),
                    other => other.as_i64().and_then(|v| <$ty>::try_from(v).ok()),
                }
            }
        }
    )*};
}

impl_from_literal_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromLiteral for f64 {
    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Str(s) => s.parse().ok(),
            other => other.as_f64(),
        }
    }
}

impl FromLiteral for f32 {
    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Float(v) => Some(*v),
            Literal::Str(s) => s.parse().ok(),
            other => other.as_f64().map(|v| v as f32),
        }
    }
}
