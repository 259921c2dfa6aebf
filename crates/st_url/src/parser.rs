use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use st_bean::info::TypeInfo;

use crate::{ParseError, UrlBinding, UrlBindingComponent, UrlBindingParameter};

/// Whether `c` may appear in an identifier. The trailing run of other
/// characters of the leading literal is split off the path.
fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Splits `/foo/` into the path `/foo` and the literal `/`.
fn split_path(literal: String) -> (String, Option<String>) {
    match literal.char_indices().rev().find(|&(_, c)| is_identifier_part(c)) {
        Some((at, c)) => {
            let mut path = literal;
            let rest = path.split_off(at + c.len_utf8());
            (path, (!rest.is_empty()).then_some(rest))
        }
        None => (literal, None),
    }
}

/// Parses a URL binding pattern such as `/user/{id}/{$event=view}.action`.
///
/// - `\` escapes the next character anywhere.
/// - `{` opens a parameter and `}` closes it. Inside a parameter `{` is a
///   plain character and the first `=` separates the name from the default.
/// - The pattern must start with a literal, which becomes the binding path.
///
/// # Errors
///
/// An empty pattern, a pattern starting with a parameter, a trailing `\`,
/// an unterminated parameter, a parameter without a name, a default for
/// `$event`, or a `}` or `=` outside a parameter.
pub fn parse_pattern(bean_type: &'static TypeInfo, pattern: &str) -> Result<UrlBinding, ParseError> {
    let err = |offset: usize, message: &'static str| ParseError::new(pattern, offset, message);

    if pattern.is_empty() {
        return Err(err(0, "the pattern is empty"));
    }

    let mut path: Option<String> = None;
    let mut components: Vec<UrlBindingComponent> = Vec::new();
    let mut buf = String::new();

    let mut chars = pattern.char_indices();
    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(err(at, "the pattern must not end with an escape character"));
                };
                buf.push(escaped);
            }
            '{' => {
                let literal = mem::take(&mut buf);
                if path.is_none() {
                    if literal.is_empty() {
                        return Err(err(at, "the pattern must start with a literal path"));
                    }
                    let (leading, rest) = split_path(literal);
                    path = Some(leading);
                    if let Some(rest) = rest {
                        components.push(UrlBindingComponent::Literal(rest.into()));
                    }
                } else if !literal.is_empty() {
                    components.push(UrlBindingComponent::Literal(literal.into()));
                }

                let mut name = String::new();
                let mut default: Option<String> = None;
                let mut closed = false;
                while let Some((inner_at, c)) = chars.next() {
                    let c = match c {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => escaped,
                            None => {
                                return Err(err(
                                    inner_at,
                                    "the pattern must not end with an escape character",
                                ));
                            }
                        },
                        '}' => {
                            closed = true;
                            break;
                        }
                        '=' if default.is_none() => {
                            default = Some(String::new());
                            continue;
                        }
                        c => c,
                    };
                    default.as_mut().unwrap_or(&mut name).push(c);
                }
                if !closed {
                    return Err(err(at, "unterminated `{` in the pattern"));
                }

                let default = default.filter(|d| !d.is_empty());
                let parameter = UrlBindingParameter::new(&name, default.as_deref())
                    .map_err(|e| ParseError::new(pattern, at, e.message))?;
                components.push(UrlBindingComponent::Parameter(parameter));
            }
            '}' => return Err(err(at, "`}` without a matching `{`")),
            '=' => return Err(err(at, "`=` is only allowed inside a parameter")),
            c => buf.push(c),
        }
    }

    match path {
        Some(_) if !buf.is_empty() => components.push(UrlBindingComponent::Literal(buf.into())),
        Some(_) => {}
        None => path = Some(buf),
    }
    let path = path.unwrap_or_default();

    Ok(UrlBinding::new(bean_type, &path, components))
}
