use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;

use thiserror::Error;

/// A malformed URL binding pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Encountered an error at offset {offset} while parsing URL binding `{pattern}`: {message}")]
pub struct ParseError {
    /// The pattern that failed to parse.
    pub pattern: Box<str>,
    /// Byte offset in `pattern` where the problem was found.
    pub offset: usize,
    /// What went wrong.
    pub message: Cow<'static, str>,
}

impl ParseError {
    pub(crate) fn new(pattern: &str, offset: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            pattern: pattern.into(),
            offset,
            message: message.into(),
        }
    }
}

/// More than one binding matches a URI equally well.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The URL `{uri}` matches more than one binding: {bean_types:?}")]
pub struct UrlBindingConflict {
    /// The requested URI.
    pub uri: Box<str>,
    /// Type names of the tied bean types, sorted.
    pub bean_types: Vec<&'static str>,
}
