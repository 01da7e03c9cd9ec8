//! Query-string binding.
//!
//! Maps a flat query mapping onto a destination type's fields by the
//! snake_case naming convention, with dedicated handling for pagination,
//! sorting, keyword search and the authenticated customer id.

pub mod binder;
pub mod descriptor;
pub mod pagination;

use std::collections::HashMap;

pub use binder::{bind, bind_new, bind_with, Anonymous, IdentityExtractor};
pub use descriptor::{FieldDescriptor, FieldKind, FieldTable, FieldTableBuilder, QueryParams};
pub use pagination::{Pagination, PaginationFilter, DEFAULT_LIMIT};

/// Raw query parameters of one request.
pub type QueryMap = HashMap<String, String>;

/// Parse an integer the way query values have always been read: optional
/// sign, then `0x`, `0o` or `0b` prefixes, or a leading `0` for octal.
pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..]),
        _ => (10, unsigned),
    };

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

pub(crate) fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}
