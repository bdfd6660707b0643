//! Policy-driven redaction of JSON bodies
//!
//! Two independent passes run over every captured body before it is embedded
//! in a record. The path-based pass redacts the payload of Secret-type
//! resources wholesale, because those carry opaque sensitive data under
//! conventional field names. The key-pattern pass catches ad hoc sensitive
//! fields (passwords, tokens) identified only by name, at any nesting depth.
//!
//! Redaction is best-effort: a body that does not parse as a JSON object is
//! passed through unchanged rather than dropped, trading strict coverage of
//! malformed payloads for an intact audit trail.

use crate::error::{AuditError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Fixed placeholder substituted for sensitive values.
pub const REDACTED: &str = "[redacted]";

/// Keys that hold a Secret resource's payload, in lookup order. Only the
/// first one present as an object is redacted.
const SECRET_DATA_KEYS: [&str; 2] = ["data", "stringData"];

/// Default sensitive-key pattern: conventional credential field names,
/// matched case-insensitively anywhere in the key.
static DEFAULT_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)password|passwd|secret|token|credential|bearer|authorization|api[-_]?key|private[-_]?key")
        .unwrap()
});

/// What to redact: a pattern matched against JSON object keys, plus the
/// path markers that identify Secret-type resources.
///
/// Compiled once at startup and shared read-only by every session.
#[derive(Debug, Clone)]
pub struct RedactionPolicy {
    key_pattern: Regex,
    secret_path_markers: Vec<String>,
}

impl RedactionPolicy {
    /// Policy with the given sensitive-key pattern and the default Secret
    /// path marker.
    pub fn new(key_pattern: Regex) -> Self {
        Self {
            key_pattern,
            secret_path_markers: vec!["secrets".to_string()],
        }
    }

    /// Compile a policy from a pattern string.
    pub fn from_pattern(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?))
    }

    /// Replace the Secret path markers.
    pub fn with_secret_path_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_path_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a JSON object key names a sensitive field.
    pub fn matches_key(&self, key: &str) -> bool {
        self.key_pattern.is_match(key)
    }

    /// Whether a request path addresses a Secret-type resource.
    pub fn is_secret_path(&self, path: &str) -> bool {
        self.secret_path_markers
            .iter()
            .any(|marker| path.contains(marker.as_str()))
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PATTERN.clone())
    }
}

/// Redact a raw JSON body for the given request path.
///
/// Returns the input bytes verbatim when nothing needed redacting, when the
/// body is not a JSON object, or when it does not parse at all; returns a
/// compact re-serialization when either pass changed the structure.
/// Idempotent: redacting already-redacted output yields identical bytes.
pub fn redact<'a>(path: &str, body: &'a [u8], policy: &RedactionPolicy) -> Result<Cow<'a, [u8]>> {
    let Ok(Value::Object(mut map)) = serde_json::from_slice::<Value>(body) else {
        return Ok(Cow::Borrowed(body));
    };

    let mut changed = false;

    if policy.is_secret_path(path) {
        changed = conceal_secret_data(&mut map);
    }

    if conceal_object(&mut map, policy) {
        changed = true;
    }

    if !changed {
        return Ok(Cow::Borrowed(body));
    }

    let out = serde_json::to_vec(&Value::Object(map)).map_err(AuditError::Serialize)?;
    Ok(Cow::Owned(out))
}

/// Replace every value under the first data-bearing key that is present and
/// object-typed. Presence alone counts as a change; a key of the wrong type
/// falls through to the next candidate.
fn conceal_secret_data(map: &mut Map<String, Value>) -> bool {
    for key in SECRET_DATA_KEYS {
        if let Some(Value::Object(data)) = map.get_mut(key) {
            for value in data.values_mut() {
                *value = Value::String(REDACTED.to_string());
            }
            return true;
        }
    }
    false
}

/// Recursive key-pattern pass. String values of matching keys are replaced;
/// nested objects are descended into. Other value types, arrays included,
/// are left as they are.
fn conceal_object(map: &mut Map<String, Value>, policy: &RedactionPolicy) -> bool {
    let mut changed = false;
    for (key, value) in map.iter_mut() {
        match value {
            Value::String(_) => {
                if policy.matches_key(key) {
                    *value = Value::String(REDACTED.to_string());
                    changed = true;
                }
            }
            Value::Object(nested) => {
                if conceal_object(nested, policy) {
                    changed = true;
                }
            }
            _ => {}
        }
    }
    changed
}
