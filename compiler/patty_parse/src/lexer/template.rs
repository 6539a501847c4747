//! Template literal scanning and escape cooking.
//!
//! Scanning works on bytes: every delimiter is ASCII, so byte positions of
//! delimiters are always char boundaries.

use std::ops::Range;

use patty_ir::{Span, StringInterner};

use crate::error::LexError;
use crate::token::TemplateParts;

/// Byte length of a template literal's remainder, given the source right
/// after the opening backtick. Includes the closing backtick.
pub(super) fn template_len(rest: &str) -> Option<usize> {
    let mut quasis = Vec::new();
    let mut exprs = Vec::new();
    scan(rest.as_bytes(), 0, &mut quasis, &mut exprs)
}

/// Split a complete template literal (backticks included) into cooked text
/// segments and expression source spans.
pub(super) fn split(
    literal: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<TemplateParts, LexError> {
    let mut quasis = Vec::new();
    let mut exprs = Vec::new();
    scan(literal.as_bytes(), 1, &mut quasis, &mut exprs)
        .ok_or(LexError::UnterminatedTemplate { span })?;

    let at = |range: &Range<usize>| {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        Span::new(
            span.start.saturating_add(start),
            span.start.saturating_add(end),
        )
    };

    let mut cooked = Vec::with_capacity(quasis.len());
    for range in &quasis {
        let raw = literal.get(range.clone()).unwrap_or("");
        let text = unescape(raw).ok_or(LexError::InvalidEscape { span: at(range) })?;
        cooked.push((interner.intern(&text), at(range)));
    }

    Ok(TemplateParts {
        quasis: cooked,
        exprs: exprs.iter().map(at).collect(),
    })
}

/// Scan template text from `i` (just past a backtick) to the closing
/// backtick, returning the index after it.
fn scan(
    bytes: &[u8],
    mut i: usize,
    quasis: &mut Vec<Range<usize>>,
    exprs: &mut Vec<Range<usize>>,
) -> Option<usize> {
    let mut quasi_start = i;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                quasis.push(quasi_start..i);
                return Some(i + 1);
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                quasis.push(quasi_start..i);
                let expr_start = i + 2;
                let close = skip_braced(bytes, expr_start)?;
                exprs.push(expr_start..close);
                i = close + 1;
                quasi_start = i;
            }
            _ => i += 1,
        }
    }
    None
}

/// Index of the `}` closing a `${` expression that starts at `i`.
fn skip_braced(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            quote @ (b'"' | b'\'') => {
                i = skip_string(bytes, i + 1, quote)?;
                continue;
            }
            b'`' => {
                i = scan(bytes, i + 1, &mut Vec::new(), &mut Vec::new())?;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn hex_value(digits: &str) -> Option<char> {
    u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
}

/// Cook escape sequences. `None` on a malformed escape.
pub(crate) fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next()?;
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            '1'..='9' | '0' => return None,
            // Line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let digits: String = chars.by_ref().take(2).collect();
                if digits.len() != 2 {
                    return None;
                }
                out.push(hex_value(&digits)?);
            }
            'u' => {
                let digits: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    let digits: String = chars.by_ref().take_while(|&c| c != '}').collect();
                    if digits.is_empty() || digits.len() > 6 {
                        return None;
                    }
                    digits
                } else {
                    let digits: String = chars.by_ref().take(4).collect();
                    if digits.len() != 4 {
                        return None;
                    }
                    digits
                };
                out.push(hex_value(&digits)?);
            }
            other => out.push(other),
        }
    }
    Some(out)
}
