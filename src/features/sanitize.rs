//! Safe text output
//!
//! Cell content may carry markup on purpose, so it is not escaped wholesale.
//! The only rewrite is for bare ampersands, which must become `&amp;` unless
//! they already start an entity. Line breaks can optionally be turned into
//! `<br />` elements.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// An ampersand, optionally followed by the rest of a named, decimal or hex entity
    static ref AMPERSAND: Regex =
        Regex::new(r"(?i)&(#[0-9]+;|#x[0-9a-f]+;|[a-z][a-z0-9]*;)?").unwrap();
}

/// Encode ampersands that are not part of an entity
///
/// ```rust
/// use gridmark::features::sanitize::encode_ampersands;
///
/// assert_eq!(encode_ampersands("R&D &amp; more"), "R&amp;D &amp; more");
/// ```
pub fn encode_ampersands(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    AMPERSAND.replace_all(text, |caps: &Captures| {
        if caps.get(1).is_some() {
            caps.get(0).map_or(String::new(), |m| m.as_str().to_string())
        } else {
            "&amp;".to_string()
        }
    })
}

/// Insert `<br />` before every line break (`\r\n`, `\n` or `\r`)
pub fn nl2br(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                result.push_str("<br />\r");
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    result.push('\n');
                }
            }
            '\n' => result.push_str("<br />\n"),
            other => result.push(other),
        }
    }

    result
}

/// Prepare a string for output inside the table markup
pub fn safe_output(text: &str, convert_line_breaks: bool) -> String {
    let encoded = encode_ampersands(text);
    if convert_line_breaks {
        nl2br(&encoded)
    } else {
        encoded.into_owned()
    }
}
