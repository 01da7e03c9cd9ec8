//! snake_case conversion for identifiers and JSON object keys.
//!
//! The boundary rule is the one outgoing responses and query lookups have
//! always used: every match of `(\w[^A-Z])([A-Z])`, taken left to right and
//! without overlap, gets an underscore between the two groups, and the whole
//! text is then lowercased. A run of capitals is never split, so `UserID`
//! becomes `user_id` while `HTTPServer` collapses to `httpserver`.

use lazy_regex::regex;

/// Convert a single identifier (a field name, a query key) to snake_case.
pub fn to_snake_case(identifier: &str) -> String {
    // `\w` spelled out as the ASCII word class.
    regex!(r"([0-9A-Za-z_][^A-Z])([A-Z])")
        .replace_all(identifier, "${1}_${2}")
        .to_lowercase()
}

/// Rewrite every object key of a JSON text to snake_case.
///
/// Only string literals followed by optional whitespace and a `:` are
/// treated as keys. String values are copied through untouched, escapes
/// included. Input that is not well-formed JSON is still scanned the same
/// way and never rejected.
pub fn snake_case_json_keys(json: &str) -> String {
    let mut out = String::with_capacity(json.len() + json.len() / 8);
    let mut rest = json;

    while let Some(open) = rest.find('"') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = string_literal_end(after_open) else {
            // Unterminated literal: nothing left that could be a key.
            out.push_str(&rest[open..]);
            return out;
        };

        let literal = &after_open[..close];
        let tail = &after_open[close + 1..];

        out.push('"');
        if tail.trim_start().starts_with(':') {
            out.push_str(&to_snake_case(literal));
        } else {
            out.push_str(literal);
        }
        out.push('"');

        rest = tail;
    }

    out.push_str(rest);
    out
}

/// Byte offset of the closing quote of a string literal whose opening quote
/// has already been consumed.
fn string_literal_end(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, byte) in s.bytes().enumerate() {
        match byte {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(idx),
            _ => {}
        }
    }
    None
}
