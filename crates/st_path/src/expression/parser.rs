use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use st_bean::Literal;

use super::node::{Node, infer_literal};
use crate::ParseError;

/// Splits `source` into nodes.
///
/// - `.` separates nodes, `[...]` wraps one node.
/// - `\` escapes the next character anywhere.
/// - `'...'` and `"..."` quote a whole node, whose value is then never
///   re-typed. A single-quoted single character is a `Char`.
pub(super) fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    let err = |offset: usize, message: &'static str| ParseError::new(source, offset, message);

    let mut nodes: Vec<Node> = Vec::new();
    let mut buf = String::new();
    let mut start = 0_usize;
    let mut bracket: Option<usize> = None;

    let flush = |nodes: &mut Vec<Node>, buf: &mut String, start: usize, bracketed: bool| {
        if !buf.is_empty() {
            let value = infer_literal(buf);
            let text = mem::take(buf).into_boxed_str();
            nodes.push(Node::new(text, value, bracketed, false, start));
        }
    };

    let mut chars = source.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(err(at, "trailing escape character"));
                };
                if buf.is_empty() {
                    start = at;
                }
                buf.push(escaped);
            }
            '\'' | '"' => {
                if !buf.is_empty() {
                    return Err(err(at, "a quote may only appear at the start of a node"));
                }
                let mut closed = false;
                while let Some((inner_at, q)) = chars.next() {
                    if q == '\\' {
                        let Some((_, escaped)) = chars.next() else {
                            return Err(err(inner_at, "trailing escape character"));
                        };
                        buf.push(escaped);
                    } else if q == c {
                        closed = true;
                        break;
                    } else {
                        buf.push(q);
                    }
                }
                if !closed {
                    return Err(err(at, "unterminated quoted string"));
                }

                let next = chars.peek().map(|&(_, n)| n);
                match (bracket.is_some(), next) {
                    (true, Some(']')) | (false, None | Some('.' | '[')) => {}
                    (true, _) => return Err(err(at, "expected `]` after a quoted index")),
                    (false, _) => return Err(err(at, "expected `.` or `[` after a quoted node")),
                }

                let mut single = buf.chars();
                let value = match (c, single.next(), single.next()) {
                    ('\'', Some(ch), None) => Literal::Char(ch),
                    _ => Literal::Str(buf.as_str().into()),
                };
                let text = mem::take(&mut buf).into_boxed_str();
                nodes.push(Node::new(text, value, bracket.is_some(), true, at));

                if bracket.take().is_some() {
                    chars.next();
                }
            }
            '[' => {
                if bracket.is_some() {
                    return Err(err(at, "nested `[` is not allowed"));
                }
                flush(&mut nodes, &mut buf, start, false);
                bracket = Some(at);
            }
            ']' => {
                let Some(open) = bracket.take() else {
                    return Err(err(at, "`]` without a matching `[`"));
                };
                if buf.is_empty() {
                    return Err(err(open, "empty index `[]`"));
                }
                flush(&mut nodes, &mut buf, start, true);
            }
            '.' if bracket.is_none() => flush(&mut nodes, &mut buf, start, false),
            _ => {
                if buf.is_empty() {
                    start = at;
                }
                buf.push(c);
            }
        }
    }

    if let Some(open) = bracket {
        return Err(err(open, "unterminated `[`"));
    }
    flush(&mut nodes, &mut buf, start, false);

    if nodes.is_empty() {
        return Err(err(0, "the expression contains no nodes"));
    }
    Ok(nodes)
}
