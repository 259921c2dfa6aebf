use alloc::boxed::Box;
use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use st_utils::hash::HashMap;

use crate::{ParseError, PropertyExpression};

/// Parsed expressions keyed by their source text.
///
/// One cache is usually built at startup and shared between threads through
/// an `Arc`. Two threads racing on the same text always end up with the same
/// `Arc<PropertyExpression>`.
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<Box<str>, Arc<PropertyExpression>>>,
}

impl ExpressionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached expression for `source`, parsing it on first use.
    ///
    /// Parse failures are not cached.
    pub fn get_or_parse(&self, source: &str) -> Result<Arc<PropertyExpression>, ParseError> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(expr) = entries.get(source) {
                return Ok(Arc::clone(expr));
            }
        }

        let parsed = Arc::new(PropertyExpression::parse(source)?);
        log::debug!("Parsed property expression `{source}`");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let expr = entries.entry(source.into()).or_insert(parsed);
        Ok(Arc::clone(expr))
    }

    /// Number of cached expressions.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached expression.
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
