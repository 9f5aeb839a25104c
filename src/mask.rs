//! Field masking for volatile and sensitive request data
//!
//! Masked fields are removed before they participate in fingerprinting or
//! are written to disk. Each collection shape (JSON mapping, headers, query
//! parameters, cookies, form fields) has its own masking function so the
//! dispatch is explicit rather than inferred from the value's shape.

use regex::Regex;
use serde_json::Value;

/// Specifier for a field to mask: exact name or pattern
#[derive(Debug, Clone)]
pub enum MaskSpecifier {
    /// Matches a field name exactly (case-sensitive)
    Exact(String),
    /// Matches any field name the pattern matches
    Pattern(Regex),
}

impl MaskSpecifier {
    /// Check whether this specifier matches a field name
    #[must_use]
    pub fn matches(&self, field: &str) -> bool {
        match self {
            Self::Exact(name) => name == field,
            Self::Pattern(pattern) => pattern.is_match(field),
        }
    }
}

impl From<&str> for MaskSpecifier {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_string())
    }
}

impl From<String> for MaskSpecifier {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<Regex> for MaskSpecifier {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

/// A field is masked if ANY configured specifier matches its name
fn is_masked(field: &str, specifiers: &[MaskSpecifier]) -> bool {
    specifiers.iter().any(|s| s.matches(field))
}

/// Remove matching pairs from a flat key/value collection
///
/// Relative order of the surviving pairs is preserved; sorting, when needed,
/// happens later in the canonicalizer.
fn retain_unmasked(
    pairs: &[(String, String)],
    specifiers: &[MaskSpecifier],
) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter(|(key, _)| !is_masked(key, specifiers))
        .cloned()
        .collect()
}

/// Mask header fields
#[must_use]
pub fn mask_headers(
    headers: &[(String, String)],
    specifiers: &[MaskSpecifier],
) -> Vec<(String, String)> {
    retain_unmasked(headers, specifiers)
}

/// Mask query parameters
#[must_use]
pub fn mask_query_params(
    params: &[(String, String)],
    specifiers: &[MaskSpecifier],
) -> Vec<(String, String)> {
    retain_unmasked(params, specifiers)
}

/// Mask cookie fields
#[must_use]
pub fn mask_cookies(
    cookies: &[(String, String)],
    specifiers: &[MaskSpecifier],
) -> Vec<(String, String)> {
    retain_unmasked(cookies, specifiers)
}

/// Mask form fields (url-encoded or multipart)
#[must_use]
pub fn mask_form_fields(
    fields: &[(String, String)],
    specifiers: &[MaskSpecifier],
) -> Vec<(String, String)> {
    retain_unmasked(fields, specifiers)
}

/// Mask a JSON value, removing matching keys recursively
///
/// Recurses into nested objects and arrays. Non-object leaves (strings,
/// numbers, booleans, null) pass through unchanged; masking a bare leaf is
/// a no-op, not an error.
#[must_use]
pub fn mask_json(value: &Value, specifiers: &[MaskSpecifier]) -> Value {
    match value {
        Value::Object(map) => {
            let masked = map
                .iter()
                .filter(|(key, _)| !is_masked(key, specifiers))
                .map(|(key, val)| (key.clone(), mask_json(val, specifiers)))
                .collect();
            Value::Object(masked)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| mask_json(v, specifiers)).collect())
        }
        leaf => leaf.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specs(names: &[&str]) -> Vec<MaskSpecifier> {
        names.iter().map(|n| MaskSpecifier::from(*n)).collect()
    }

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_mask_headers_removes_matching() {
        let headers = pairs(&[("date", "now"), ("accept", "json"), ("cookie", "a=1")]);
        let masked = mask_headers(&headers, &specs(&["date", "cookie"]));

        assert_eq!(masked, pairs(&[("accept", "json")]));
    }

    #[test]
    fn test_mask_preserves_order_of_survivors() {
        let params = pairs(&[("z", "1"), ("cachebust", "42"), ("a", "2")]);
        let masked = mask_query_params(&params, &specs(&["cachebust"]));

        assert_eq!(masked, pairs(&[("z", "1"), ("a", "2")]));
    }

    #[test]
    fn test_mask_is_case_sensitive() {
        let headers = pairs(&[("Date", "now")]);
        let masked = mask_headers(&headers, &specs(&["date"]));

        assert_eq!(masked.len(), 1, "Exact matching must be case-sensitive");
    }

    #[test]
    fn test_mask_pattern_specifier() {
        let pattern = Regex::new("^x-request-.*").unwrap();
        let headers = pairs(&[("x-request-id", "abc"), ("x-api-key", "k")]);
        let masked = mask_headers(&headers, &[MaskSpecifier::Pattern(pattern)]);

        assert_eq!(masked, pairs(&[("x-api-key", "k")]));
    }

    #[test]
    fn test_mask_json_nested() {
        let value = json!({
            "name": "John",
            "token": "volatile",
            "nest": { "token": "volatile", "keep": 1 },
            "list": [{ "token": "volatile" }, 2]
        });

        let masked = mask_json(&value, &specs(&["token"]));

        assert_eq!(
            masked,
            json!({
                "name": "John",
                "nest": { "keep": 1 },
                "list": [{}, 2]
            })
        );
    }

    #[test]
    fn test_mask_json_leaf_passthrough() {
        let masked = mask_json(&json!(1), &specs(&["anything"]));
        assert_eq!(masked, json!(1));

        let masked = mask_json(&json!("text"), &specs(&["anything"]));
        assert_eq!(masked, json!("text"));

        let masked = mask_json(&Value::Null, &specs(&["anything"]));
        assert_eq!(masked, Value::Null);
    }

    #[test]
    fn test_mask_does_not_mutate_input() {
        let headers = pairs(&[("date", "now")]);
        let _ = mask_headers(&headers, &specs(&["date"]));

        assert_eq!(headers, pairs(&[("date", "now")]));
    }

    #[test]
    fn test_mask_idempotent() {
        let value = json!({ "keep": 1, "drop": 2, "nest": { "drop": 3 } });
        let specifiers = specs(&["drop"]);

        let once = mask_json(&value, &specifiers);
        let twice = mask_json(&once, &specifiers);

        assert_eq!(once, twice, "Masking must be idempotent");
    }
}
