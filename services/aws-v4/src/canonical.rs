//! Canonical request construction.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! \n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every function here is total: any path, query or header value produces
//! some deterministic output instead of an error, since all of them may carry
//! attacker controlled bytes.

use std::fmt;
use std::fmt::Write;

use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256,
};
use amzsign_core::hash::hex_sha256;
use amzsign_core::{Error, Result, SigningRequest};
use http::header;
use http::HeaderMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode};

/// CanonicalRequest is the normalized form of a request that gets hashed
/// into the string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Percent-encoded path with literal `/` separators.
    pub path: String,
    /// Sorted, percent-encoded query string.
    pub query: String,
    /// `name:value` lines of every signed header, sorted by name.
    pub headers: String,
    /// Sorted signed header names joined by `;`.
    pub signed_headers: String,
    /// `UNSIGNED-PAYLOAD` or hex encoded SHA256 of the body.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request of `req`.
    ///
    /// The headers of `req` must already be normalized, every header present
    /// is signed except `authorization`.
    pub fn build(req: &SigningRequest, body: Option<&[u8]>) -> Result<Self> {
        let (headers, signed_headers) = canonical_headers(&req.headers);

        Ok(CanonicalRequest {
            method: req.method.as_str().to_string(),
            path: canonical_uri_path(&req.path),
            query: canonical_query_string(&req.query),
            headers,
            signed_headers,
            payload_hash: payload_hash(&req.headers, body)?,
        })
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        writeln!(f, "{}", self.headers)?;
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Canonicalize the path of a request.
///
/// The path is decoded first so that both `/a/b c` and `/a/b%20c` end up as
/// `/a/b%20c`. Separators, including an encoded `%2F`, stay literal `/`.
pub fn canonical_uri_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let decoded = percent_decode_str(path).decode_utf8_lossy();
    utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string()
}

/// Canonicalize a raw query string.
///
/// Pairs are form-decoded, re-encoded with [`AWS_QUERY_ENCODE_SET`] and
/// sorted by encoded key, then by encoded value. Keys without value render as
/// `key=`.
///
/// ```
/// use amzsign_aws_v4::canonical_query_string;
///
/// assert_eq!(canonical_query_string("?b=2&a=(1)"), "a=%281%29&b=2");
/// assert_eq!(canonical_query_string(""), "");
/// ```
pub fn canonical_query_string(raw: &str) -> String {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    if raw.is_empty() {
        return String::new();
    }

    let mut pairs = form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(&v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    let mut s = String::with_capacity(raw.len() + 16);
    for (idx, (k, v)) in pairs.iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

/// Render the header block and the signed header list.
///
/// `HeaderMap` keeps names lowercase, so sorting by name is a case-insensitive
/// sort of the original names.
fn canonical_headers(headers: &HeaderMap) -> (String, String) {
    let mut names = headers
        .keys()
        .filter(|k| **k != header::AUTHORIZATION)
        .map(|k| k.as_str())
        .collect::<Vec<_>>();
    names.sort_unstable();

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut lines = String::with_capacity(256);
    for (idx, name) in names.iter().enumerate() {
        if idx != 0 {
            lines.push('\n');
        }
        lines.push_str(name);
        lines.push(':');
        for (i, value) in headers.get_all(*name).iter().enumerate() {
            if i != 0 {
                lines.push(',');
            }
            lines.push_str(&header_value_normalize(value.as_bytes()));
        }
    }

    (lines, names.join(";"))
}

/// Trim surrounding whitespace of a header value and collapse inner runs of
/// spaces into one.
///
/// Bytes that are not valid UTF-8 are replaced instead of rejected.
fn header_value_normalize(value: &[u8]) -> String {
    let value = String::from_utf8_lossy(value);
    let value = value.trim();

    let mut s = String::with_capacity(value.len());
    for (idx, word) in value.split(' ').filter(|w| !w.is_empty()).enumerate() {
        if idx != 0 {
            s.push(' ');
        }
        s.push_str(word);
    }
    s
}

/// Decide the payload hash of the request.
///
/// - no body: `UNSIGNED-PAYLOAD`
/// - explicit `x-amz-content-sha256: UNSIGNED-PAYLOAD` with an empty body: `UNSIGNED-PAYLOAD`
/// - explicit `x-amz-content-sha256: UNSIGNED-PAYLOAD` with a non-empty body: rejected,
///   it's impossible to tell whether the caller wanted the body signed
/// - otherwise: hex encoded SHA256 of the body
fn payload_hash(headers: &HeaderMap, body: Option<&[u8]>) -> Result<String> {
    let Some(body) = body else {
        return Ok(UNSIGNED_PAYLOAD.to_string());
    };

    let explicit_unsigned = headers
        .get(X_AMZ_CONTENT_SHA_256)
        .is_some_and(|v| v.as_bytes() == UNSIGNED_PAYLOAD.as_bytes());
    if explicit_unsigned {
        if !body.is_empty() {
            return Err(Error::request_invalid(format!(
                "{X_AMZ_CONTENT_SHA_256} is {UNSIGNED_PAYLOAD} but a {} bytes body is given",
                body.len()
            )));
        }
        return Ok(UNSIGNED_PAYLOAD.to_string());
    }

    Ok(hex_sha256(body))
}

/// Write the canonical request into a string.
pub(crate) fn canonical_request_string(creq: &CanonicalRequest) -> Result<String> {
    // 512 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(512);
    write!(f, "{creq}")?;
    Ok(f)
}
