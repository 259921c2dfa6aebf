use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ParseError

/// A malformed property expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Encountered an error at offset {offset} while parsing `{path}`: {message}")]
pub struct ParseError {
    /// Byte offset in `path` where the problem was found.
    pub offset: usize,
    /// The expression that failed to parse.
    pub path: Box<str>,
    /// What went wrong.
    pub message: Cow<'static, str>,
}

impl ParseError {
    pub(crate) fn new(path: &str, offset: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            offset,
            path: path.into(),
            message: message.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// EvaluationError

/// The reason an [`EvaluationError`] was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvaluationErrorKind {
    /// The bean has no property with the node's name.
    NoSuchProperty { bean_type: &'static str },
    /// The declared type is `Box<dyn Bean>` and there is no instance to look at.
    NotEnoughTypeInformation,
    /// A null value had to be created but its type has no factory.
    Instantiation { type_name: &'static str },
    /// A value of the wrong type was assigned.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A list index that is not a non-negative integer, or a map key that
    /// does not convert to the key type.
    InvalidIndex { expected: &'static str },
    /// A node was applied to a value that has neither properties nor entries.
    NotIndexable { type_name: &'static str },
}

impl fmt::Display for EvaluationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchProperty { bean_type } => {
                write!(f, "bean type `{bean_type}` does not contain this property")
            }
            Self::NotEnoughTypeInformation => {
                f.write_str("not enough type information available to evaluate the expression")
            }
            Self::Instantiation { type_name } => {
                write!(f, "could not create a default instance of `{type_name}`")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected a value of type `{expected}`, found `{found}`")
            }
            Self::InvalidIndex { expected } => {
                write!(f, "the index cannot be used as `{expected}`")
            }
            Self::NotIndexable { type_name } => {
                write!(f, "values of type `{type_name}` have no properties or entries")
            }
        }
    }
}

/// A failure while walking a bean graph along a property expression.
///
/// Carries the node that failed and the type of the root bean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (node `{segment}` of `{expression}` on a `{root_type}`)")]
pub struct EvaluationError {
    kind: EvaluationErrorKind,
    expression: Box<str>,
    segment: Box<str>,
    root_type: &'static str,
}

impl EvaluationError {
    pub(crate) fn new(
        kind: EvaluationErrorKind,
        expression: &str,
        segment: &str,
        root_type: &'static str,
    ) -> Self {
        Self {
            kind,
            expression: expression.into(),
            segment: segment.into(),
            root_type,
        }
    }

    /// Returns the reason of the failure.
    #[inline]
    pub fn kind(&self) -> &EvaluationErrorKind {
        &self.kind
    }

    /// Returns the full expression that was evaluated.
    #[inline]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the text of the node that failed.
    #[inline]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns the type name of the root bean.
    #[inline]
    pub fn root_type(&self) -> &'static str {
        self.root_type
    }
}

// -----------------------------------------------------------------------------
// Error

/// Any error of the [`BeanUtil`](crate::BeanUtil) facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{EvaluationError, EvaluationErrorKind, ParseError};

    #[test]
    fn messages_name_the_node_and_root() {
        let err = EvaluationError::new(
            EvaluationErrorKind::NoSuchProperty { bean_type: "Person" },
            "person.nmae",
            "nmae",
            "Order",
        );
        assert_eq!(
            err.to_string(),
            "bean type `Person` does not contain this property \
             (node `nmae` of `person.nmae` on a `Order`)"
        );

        let err = ParseError::new("a['b", 2, "unterminated quote");
        assert_eq!(
            err.to_string(),
            "Encountered an error at offset 2 while parsing `a['b`: unterminated quote"
        );
    }
}
