use alloc::boxed::Box;

use st_bean::Literal;

/// One step of a [`PropertyExpression`](super::PropertyExpression).
///
/// `foo.bar[3]['baz']` has the nodes `foo`, `bar`, `3` and `baz`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    text: Box<str>,
    value: Literal,
    bracketed: bool,
    quoted: bool,
    offset: usize,
}

impl Node {
    pub(crate) fn new(text: Box<str>, value: Literal, bracketed: bool, quoted: bool, offset: usize) -> Self {
        Self {
            text,
            value,
            bracketed,
            quoted,
            offset,
        }
    }

    /// The unescaped text of the node, without quotes.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The typed value of the node.
    #[inline]
    pub fn value(&self) -> &Literal {
        &self.value
    }

    /// Returns `true` if the node was written inside `[...]`.
    #[inline]
    pub fn is_bracketed(&self) -> bool {
        self.bracketed
    }

    /// Returns `true` if the node was a quoted string.
    #[inline]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Byte offset of the node in the expression source.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

// -----------------------------------------------------------------------------
// Literal inference

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn unsigned(s: &str) -> &str {
    s.strip_prefix('-').unwrap_or(s)
}

/// `-?\d+`
fn is_integer(s: &str) -> bool {
    is_digits(unsigned(s))
}

/// `-?\d+\.\d+`
fn is_decimal(s: &str) -> bool {
    match unsigned(s).split_once('.') {
        Some((int, frac)) => is_digits(int) && is_digits(frac),
        None => false,
    }
}

/// Infers the value of an unquoted node.
///
/// Integers that overflow `i32` become longs, and numbers that overflow
/// their type stay strings.
pub(crate) fn infer_literal(text: &str) -> Literal {
    if is_integer(text) {
        if let Ok(v) = text.parse::<i32>() {
            return Literal::Int(v);
        }
        if let Ok(v) = text.parse::<i64>() {
            return Literal::Long(v);
        }
    } else if is_decimal(text) {
        if let Ok(v) = text.parse::<f64>() {
            return Literal::Double(v);
        }
    } else if let Some(number) = text.strip_suffix(['l', 'L'])
        && is_integer(number)
    {
        if let Ok(v) = number.parse::<i64>() {
            return Literal::Long(v);
        }
    } else if let Some(number) = text.strip_suffix(['f', 'F'])
        && (is_integer(number) || is_decimal(number))
    {
        if let Ok(v) = number.parse::<f32>() {
            return Literal::Float(v);
        }
    } else if text.eq_ignore_ascii_case("true") {
        return Literal::Bool(true);
    } else if text.eq_ignore_ascii_case("false") {
        return Literal::Bool(false);
    }
    Literal::Str(text.into())
}

#[cfg(test)]
mod tests {
    use st_bean::Literal;

    use super::infer_literal;

    #[test]
    fn numbers() {
        assert_eq!(infer_literal("123"), Literal::Int(123));
        assert_eq!(infer_literal("-7"), Literal::Int(-7));
        assert_eq!(infer_literal("3000000000"), Literal::Long(3_000_000_000));
        assert_eq!(infer_literal("123.4"), Literal::Double(123.4));
        assert_eq!(infer_literal("123l"), Literal::Long(123));
        assert_eq!(infer_literal("123F"), Literal::Float(123.0));
        assert_eq!(infer_literal("1.5f"), Literal::Float(1.5));
    }

    #[test]
    fn booleans_ignore_case() {
        assert_eq!(infer_literal("false"), Literal::Bool(false));
        assert_eq!(infer_literal("tRue"), Literal::Bool(true));
    }

    #[test]
    fn everything_else_is_a_string() {
        assert_eq!(infer_literal("index"), Literal::Str("index".into()));
        assert_eq!(infer_literal("1.2.3"), Literal::Str("1.2.3".into()));
        assert_eq!(infer_literal("-"), Literal::Str("-".into()));
        assert_eq!(infer_literal("12a"), Literal::Str("12a".into()));
        assert_eq!(infer_literal("L"), Literal::Str("L".into()));
    }
}
