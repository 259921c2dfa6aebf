use crate::ParseError;

/// A property path cut at its last separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySplit<'a> {
    /// Everything before the last top-level `.`, if there is one.
    pub parent: Option<&'a str>,
    /// The last node, including any trailing `[...]` on it.
    pub child: &'a str,
}

/// Splits `path` at the last `.` that is neither quoted nor inside brackets.
///
/// ```
/// use st_path::property_split;
///
/// let split = property_split("a.b['c.d'].e").unwrap();
/// assert_eq!(split.parent, Some("a.b['c.d']"));
/// assert_eq!(split.child, "e");
/// ```
///
/// # Errors
///
/// Unbalanced quotes or brackets are a [`ParseError`].
pub fn property_split(path: &str) -> Result<PropertySplit<'_>, ParseError> {
    let mut last_dot: Option<usize> = None;
    let mut quote: Option<(char, usize)> = None;
    let mut bracket: Option<usize> = None;
    let mut escaped = false;

    for (at, c) in path.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (q, Some((open, _))) if q == open => quote = None,
            (_, Some(_)) => {}
            ('\'' | '"', None) => quote = Some((c, at)),
            ('[', None) => {
                if bracket.is_some() {
                    return Err(ParseError::new(path, at, "nested `[` is not allowed"));
                }
                bracket = Some(at);
            }
            (']', None) => {
                if bracket.take().is_none() {
                    return Err(ParseError::new(path, at, "`]` without a matching `[`"));
                }
            }
            ('.', None) if bracket.is_none() => last_dot = Some(at),
            _ => {}
        }
    }

    if escaped {
        return Err(ParseError::new(path, path.len() - 1, "trailing escape character"));
    }
    if let Some((_, open)) = quote {
        return Err(ParseError::new(path, open, "unterminated quoted string"));
    }
    if let Some(open) = bracket {
        return Err(ParseError::new(path, open, "unterminated `[`"));
    }

    Ok(match last_dot {
        Some(dot) => PropertySplit {
            parent: Some(&path[..dot]),
            child: &path[dot + 1..],
        },
        None => PropertySplit {
            parent: None,
            child: path,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{PropertySplit, property_split};

    fn split(path: &str) -> (Option<&str>, &str) {
        let PropertySplit { parent, child } = property_split(path).unwrap();
        (parent, child)
    }

    #[test]
    fn last_unquoted_dot() {
        assert_eq!(split("a.b['c.d'].e"), (Some("a.b['c.d']"), "e"));
        assert_eq!(split("a.b['c.d']"), (Some("a"), "b['c.d']"));
        assert_eq!(split("a.b.c"), (Some("a.b"), "c"));
        assert_eq!(split("a[1.5]"), (None, "a[1.5]"));
        assert_eq!(split("single"), (None, "single"));
        assert_eq!(split(r#"a["x'.y"]"#), (None, r#"a["x'.y"]"#));
        assert_eq!(split(r"a\.b"), (None, r"a\.b"));
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        assert!(property_split("a.b['c.d].e").is_err());
        assert!(property_split("a.b[c.d").is_err());
        assert!(property_split("a.b]").is_err());
        assert!(property_split("a\\").is_err());
    }
}
