//! Header filtering for audit records
//!
//! Request and response headers are copied into the audit record through a
//! deny-list filter so that session and identity credentials never reach the
//! log sink.

use std::collections::HashMap;

/// Header multimap: name → list of values, as headers arrive on the wire.
pub type HeaderMap = HashMap<String, Vec<String>>;

/// Request headers that carry caller credentials and are never recorded.
pub const REQUEST_HEADER_DENYLIST: &[&str] = &["Cookie", "Authorization"];

/// Response headers that set cookies and are never recorded.
pub const RESPONSE_HEADER_DENYLIST: &[&str] = &["Cookie", "Set-Cookie"];

/// Copy `headers` into a new map, excluding every entry whose name appears in
/// `deny_list`. Names are compared case-sensitively against the keys as
/// stored; the input is not mutated.
pub fn filter_headers(headers: &HeaderMap, deny_list: &[&str]) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| !deny_list.contains(&name.as_str()))
        .map(|(name, values)| (name.clone(), values.clone()))
        .collect()
}

/// First value for `name`, compared case-insensitively.
///
/// Used for content-type sniffing, where the sender may use any casing.
pub fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(stored, _)| stored.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}
