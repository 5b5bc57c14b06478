//! Conversion of JavaScript object literals to JSON.
//!
//! Chart data on market value pages is embedded as a JavaScript literal, not
//! as JSON: strings use single quotes, may contain `\'` and `\xNN` escapes,
//! and keys may be bare identifiers. This module rewrites such a literal into
//! JSON text so it can be deserialized strictly with `serde_json`. Anything
//! that is not plain data (calls, expressions, unknown identifiers) is
//! rejected rather than guessed at.

use std::iter::Peekable;
use std::str::Chars;

/// Find the bracketed array that follows `marker` and return its contents.
///
/// `marker` must end with the opening `[`. Brackets inside strings are
/// ignored. If the array is never closed the rest of the text is returned, so
/// the caller fails on it instead of treating it as missing.
pub fn bracketed_after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let body = &text[start..];

    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..i]);
                }
            }
            _ => {}
        }
    }

    Some(body)
}

/// Rewrite a JavaScript data literal as JSON
pub fn to_json(literal: &str) -> Result<String, String> {
    let mut out = String::with_capacity(literal.len() + 16);
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => read_string(&mut chars, c, &mut out)?,
            c if c.is_ascii_digit() || c == '-' || c == '.' || c == '+' => {
                out.push(c);
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || matches!(n, '.' | '+' | '-') {
                        out.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut ident = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '$' {
                        ident.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                write_identifier(&ident, &mut chars, &mut out)?;
            }
            ',' => {
                // JavaScript allows a trailing comma before a closing bracket
                if !closes_next(&mut chars) {
                    out.push(',');
                }
            }
            '{' | '}' | '[' | ']' | ':' => out.push(c),
            c if c.is_whitespace() => out.push(c),
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(out)
}

fn closes_next(chars: &mut Peekable<Chars<'_>>) -> bool {
    let rest: String = chars.clone().skip_while(|c| c.is_whitespace()).take(1).collect();
    rest == "}" || rest == "]"
}

fn write_identifier(
    ident: &str,
    chars: &mut Peekable<Chars<'_>>,
    out: &mut String,
) -> Result<(), String> {
    let is_key = chars.clone().find(|c| !c.is_whitespace()) == Some(':');

    if is_key {
        out.push('"');
        out.push_str(ident);
        out.push('"');
        return Ok(());
    }

    match ident {
        "true" | "false" | "null" => {
            out.push_str(ident);
            Ok(())
        }
        "undefined" => {
            out.push_str("null");
            Ok(())
        }
        other => Err(format!("unsupported identifier '{other}'")),
    }
}

fn read_string(
    chars: &mut Peekable<Chars<'_>>,
    quote: char,
    out: &mut String,
) -> Result<(), String> {
    out.push('"');

    loop {
        let c = chars.next().ok_or("unterminated string")?;
        match c {
            c if c == quote => break,
            '\\' => {
                let escaped = chars.next().ok_or("unterminated escape")?;
                match escaped {
                    '\'' => out.push('\''),
                    '"' => out.push_str("\\\""),
                    'x' => {
                        let hex: String = chars.by_ref().take(2).collect();
                        if hex.len() != 2 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                            return Err(format!("invalid hex escape '\\x{hex}'"));
                        }
                        out.push_str("\\u00");
                        out.push_str(&hex);
                    }
                    '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u' => {
                        out.push('\\');
                        out.push(escaped);
                    }
                    // line continuation
                    '\n' => {}
                    other => out.push(other),
                }
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }

    out.push('"');
    Ok(())
}
