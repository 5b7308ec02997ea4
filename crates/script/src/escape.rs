//! Backslash escaping for tokens interpolated into lftp statements.
//!
//! lftp scripts are handed to the binary as a single `-c` argument, so path
//! and credential tokens must not be able to terminate a statement or open a
//! quoting context of their own. The escaper prefixes a backslash to every
//! character in a fixed metacharacter set; it never quotes whole tokens.

use std::borrow::Cow;

/// Returns `true` for characters that must be escaped before interpolation.
///
/// The set covers the statement separator, both quote styles, shell expansion
/// introducers and ASCII whitespace.
const fn is_metacharacter(ch: char) -> bool {
    matches!(ch, '&' | '"' | '\'' | '$' | '`' | '\\' | ';') || ch.is_ascii_whitespace()
}

/// Escapes `token` for safe interpolation into a composed statement.
///
/// Tokens free of metacharacters are returned borrowed, so escaping clean
/// input is allocation-free and a no-op.
#[must_use]
pub fn escape(token: &str) -> Cow<'_, str> {
    if !token.chars().any(is_metacharacter) {
        return Cow::Borrowed(token);
    }

    let mut escaped = String::with_capacity(token.len() + 4);
    for ch in token.chars() {
        if is_metacharacter(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}
