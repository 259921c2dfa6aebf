//! Property path expressions over [`st_bean`] graphs.
//!
//! A path such as `person.addresses[2]['zip']` is parsed once into a
//! [`PropertyExpression`], then evaluated against a root bean by a
//! [`PropertyExpressionEvaluation`]: read, written with creation of missing
//! intermediate values, cleared, or queried for its declared type.
//! [`BeanUtil`] bundles both steps behind a shared [`ExpressionCache`].

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bean_util;
mod cache;
mod error;
mod evaluation;
mod split;

pub mod expression;

// -----------------------------------------------------------------------------
// Exports

pub use bean_util::BeanUtil;
pub use cache::ExpressionCache;
pub use error::{Error, EvaluationError, EvaluationErrorKind, ParseError};
pub use evaluation::{DEFAULT_LIST_GROWTH_LIMIT, PropertyExpressionEvaluation};
pub use expression::{Node, PropertyExpression};
pub use split::{PropertySplit, property_split};
