//! On-disk snapshot record schema
//!
//! Headers and cookies are stored as sorted flat lists of pairs, not as
//! dictionaries, and bodies as decoded text, so serialization of the same
//! exchange is byte-stable across runs and the files stay diff-friendly in
//! version control.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{decode_pairs, parse_multipart, RequestDescriptor};
use crate::mask::{mask_cookies, mask_form_fields, mask_headers, mask_json, MaskSpecifier};

/// Persisted request+response exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// The request that produced the exchange
    pub request: RecordedRequest,
    /// The response that was served
    pub response: RecordedResponse,
}

/// Request half of a snapshot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Absolute request URL
    pub url: String,
    /// Request body as decoded text, masked
    ///
    /// Structured bodies are stored in a canonical masked form rather than
    /// their wire framing: JSON as compact text, url-encoded and multipart
    /// forms both as sorted-input `k=v&...` pairs. Multipart boundaries are
    /// not preserved, so the stored body will not match a declared
    /// `multipart/form-data` content-type header.
    pub body: String,
    /// Masked request headers, sorted
    pub headers: Vec<(String, String)>,
    /// Masked request cookies, sorted
    pub cookies: Vec<(String, String)>,
}

/// Response half of a snapshot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    /// HTTP status code
    pub status: u16,
    /// Status reason phrase
    pub status_text: String,
    /// Response headers, sorted
    pub headers: Vec<(String, String)>,
    /// Response body as decoded text
    pub body: String,
}

impl RecordedRequest {
    /// Build the stored form of a request, with masking applied
    ///
    /// Header names are lowercased before matching, the same normalization
    /// the canonicalizer applies, so a specifier that masks a field out of
    /// the key also keeps it off the disk regardless of wire casing.
    #[must_use]
    pub fn from_descriptor(req: &RequestDescriptor, specifiers: &[MaskSpecifier]) -> Self {
        let normalized: Vec<(String, String)> = req
            .headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.clone()))
            .collect();
        let mut headers = mask_headers(&normalized, specifiers);
        sort_pairs(&mut headers);

        let mut cookies = mask_cookies(&req.cookies, specifiers);
        sort_pairs(&mut cookies);

        Self {
            method: req.method.to_uppercase(),
            url: req.url.clone(),
            body: masked_body_text(req, specifiers),
            headers,
            cookies,
        }
    }
}

/// Stored body text with field masking applied where the body is structured
///
/// Form bodies (url-encoded and multipart alike) are re-encoded as `k=v&...`
/// pairs after masking; see [`RecordedRequest::body`].
fn masked_body_text(req: &RequestDescriptor, specifiers: &[MaskSpecifier]) -> String {
    if req.body.is_empty() {
        return String::new();
    }

    let text = req.body_text();

    match req.content_type() {
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
            encode_form(&mask_form_fields(&decode_pairs(&text), specifiers))
        }
        Some(ct) if ct.starts_with("multipart/form-data") => {
            let boundary = ct.split(';').find_map(|attr| {
                attr.trim()
                    .strip_prefix("boundary=")
                    .map(|b| b.trim_matches('"'))
            });
            match boundary {
                Some(b) => encode_form(&mask_form_fields(&parse_multipart(&text, b), specifiers)),
                None => text,
            }
        }
        Some(ct) if ct.starts_with("application/json") => mask_json_text(&text, specifiers),
        Some(_) => text,
        None => mask_json_text(&text, specifiers),
    }
}

fn mask_json_text(text: &str, specifiers: &[MaskSpecifier]) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => mask_json(&value, specifiers).to_string(),
        Err(_) => text.to_string(),
    }
}

fn encode_form(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Stable sort by key; duplicate keys keep their relative order
pub(crate) fn sort_pairs(pairs: &mut [(String, String)]) {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
}
