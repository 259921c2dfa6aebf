//! Parsed property expressions.

mod node;
mod parser;

use alloc::boxed::Box;
use core::fmt;
use core::str::FromStr;

use crate::ParseError;

pub use node::Node;

/// A parsed property path such as `person.addresses[0]['zip']`.
///
/// Parsing never looks at a bean; all type decisions happen at evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyExpression {
    source: Box<str>,
    nodes: Box<[Node]>,
}

impl PropertyExpression {
    /// Parses `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unbalanced quotes or brackets, a quote in
    /// the middle of a node, an empty `[]`, a trailing `\`, or an expression
    /// without any node.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let nodes = parser::parse(source)?;
        Ok(Self {
            source: source.into(),
            nodes: nodes.into_boxed_slice(),
        })
    }

    /// The text the expression was parsed from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The nodes, root first. Never empty.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The last node.
    #[inline]
    pub fn leaf(&self) -> &Node {
        // `parse` rejects expressions without nodes.
        &self.nodes[self.nodes.len() - 1]
    }
}

impl fmt::Display for PropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.source)
    }
}

impl FromStr for PropertyExpression {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use st_bean::Literal;

    use super::PropertyExpression;

    fn texts(expr: &PropertyExpression) -> Vec<&str> {
        expr.nodes().iter().map(|n| n.text()).collect()
    }

    #[test]
    fn dotted_path() {
        let expr = PropertyExpression::parse("foo.bar.splat").unwrap();
        assert_eq!(texts(&expr), ["foo", "bar", "splat"]);
        assert_eq!(expr.leaf().text(), "splat");
        assert_eq!(expr.to_string(), "foo.bar.splat");
        assert!(expr.nodes().iter().all(|n| !n.is_bracketed()));
    }

    #[test]
    fn escaped_quotes_are_plain_text() {
        let expr = PropertyExpression::parse(r#"fo\"o\".bar.splat"#).unwrap();
        assert_eq!(texts(&expr), [r#"fo"o""#, "bar", "splat"]);
        assert!(!expr.nodes()[0].is_quoted());
    }

    #[test]
    fn brackets() {
        for source in ["foo[index].bar", "foo['index'].bar", r#"foo["index"].bar"#] {
            let expr = PropertyExpression::parse(source).unwrap();
            assert_eq!(texts(&expr), ["foo", "index", "bar"], "{source}");
            assert!(expr.nodes()[1].is_bracketed());
            assert_eq!(expr.nodes()[1].value(), &Literal::Str("index".into()));
        }

        let expr = PropertyExpression::parse("foo[index][bar]").unwrap();
        assert_eq!(texts(&expr), ["foo", "index", "bar"]);
        assert!(expr.nodes()[2].is_bracketed());
    }

    #[test]
    fn adjacent_quotes_are_rejected() {
        let err = PropertyExpression::parse("foo['bar''splat']").unwrap_err();
        assert_eq!(&*err.path, "foo['bar''splat']");
    }

    #[test]
    fn typed_indexes() {
        let value = |source: &str| PropertyExpression::parse(source).unwrap().leaf().value().clone();

        assert_eq!(value("foo[123]"), Literal::Int(123));
        assert_eq!(value("foo[123.4]"), Literal::Double(123.4));
        assert_eq!(value("foo[123l]"), Literal::Long(123));
        assert_eq!(value("foo[123F]"), Literal::Float(123.0));
        assert_eq!(value("foo[false]"), Literal::Bool(false));
        assert_eq!(value("foo[tRue]"), Literal::Bool(true));
        assert_eq!(value("foo['x']"), Literal::Char('x'));
        assert_eq!(value(r#"foo["x"]"#), Literal::Str("x".into()));
        assert_eq!(value("foo['123']"), Literal::Str("123".into()));

        let expr = PropertyExpression::parse("foo[123l]").unwrap();
        assert_eq!(expr.leaf().text(), "123l");
    }

    #[test]
    fn quoted_keys_keep_dots_and_brackets() {
        let expr = PropertyExpression::parse("map['a.b[c]'].d").unwrap();
        assert_eq!(texts(&expr), ["map", "a.b[c]", "d"]);
        assert!(expr.nodes()[1].is_quoted());

        let expr = PropertyExpression::parse("map['']").unwrap();
        assert_eq!(expr.leaf().text(), "");
    }

    #[test]
    fn offsets_point_into_the_source() {
        let expr = PropertyExpression::parse("ab.cd[12]").unwrap();
        let offsets: Vec<_> = expr.nodes().iter().map(|n| n.offset()).collect();
        assert_eq!(offsets, [0, 3, 6]);
    }

    #[test]
    fn malformed_expressions() {
        for source in [
            "",
            ".",
            "foo[",
            "foo]",
            "foo[]",
            "foo[[1]]",
            "foo['bar",
            "foo['bar'x]",
            "'foo'bar",
            "fo'o'",
            "foo\\",
        ] {
            assert!(PropertyExpression::parse(source).is_err(), "{source:?} should not parse");
        }
    }

    #[test]
    fn from_str_and_equality() {
        let a: PropertyExpression = "a.b[0]".parse().unwrap();
        let b = PropertyExpression::parse("a.b[0]").unwrap();
        assert_eq!(a, b);
    }
}
