use std::fmt;
use std::fmt::Write;
use std::mem;
use std::str::FromStr;

use crate::canonical::{canonical_request_string, CanonicalRequest};
use crate::constants::{
    AWS4_HMAC_SHA256, AWS4_KEY_PREFIX, AWS4_REQUEST, UNSIGNED_PAYLOAD, URL_ESCAPE_SET,
    X_AMZ_CONTENT_SHA_256, X_AMZ_DATE,
};
use crate::{Config, Credential};
use amzsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use amzsign_core::time::{format_iso8601, parse_iso8601};
use amzsign_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderMap, HeaderValue, Method, Uri};
use log::debug;
use percent_encoding::utf8_percent_encode;

/// Scope of a signature: `<date>/<region>/<service>/aws4_request`.
///
/// The date is always taken from the signing timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    date: String,
    region: String,
    service: String,
}

impl Scope {
    /// Create a scope from a `YYYYMMDDThhmmssZ` timestamp.
    pub fn new(timestamp: &str, region: &str, service: &str) -> Result<Self> {
        parse_iso8601(timestamp)?;

        Ok(Self {
            date: timestamp[..8].to_string(),
            region: region.to_string(),
            service: service.to_string(),
        })
    }

    /// Date of the scope: "20220313"
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Region of the scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service of the scope.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date, self.region, self.service
        )
    }
}

/// SignatureResult is everything produced by signing one request.
#[derive(Debug, Clone)]
pub struct SignatureResult {
    /// Value of the `authorization` header.
    pub authorization: String,
    /// Hex encoded signature.
    pub signature: String,
    /// Scope the signature is valid for.
    pub scope: Scope,
    /// Signed header names joined by `;`.
    pub signed_headers: String,
    /// Headers added to the request before signing.
    ///
    /// A subset of `x-amz-date`, `x-amz-content-sha256` and `host`.
    pub injected_headers: HeaderMap,
}

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new builder for AWS V4 signer.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Create a signer for the service and region of `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.service()?, config.region()?))
    }

    /// Sign a decomposed request in place.
    ///
    /// Missing `x-amz-date`, `x-amz-content-sha256` (only without body) and
    /// `host` headers are injected, then `authorization` is inserted.
    pub fn sign_signing_request(
        &self,
        ctx: &Context,
        req: &mut SigningRequest,
        cred: &Credential,
        body: Option<&[u8]>,
    ) -> Result<SignatureResult> {
        let injected_headers = canonicalize_header(ctx, req, body.is_some())?;

        let creq = CanonicalRequest::build(req, body)?;
        let creq_string = canonical_request_string(&creq)?;
        debug!("calculated canonical request: {creq_string}");

        // Read the timestamp back so the scope and the canonical request
        // always point to the same instant.
        let timestamp = req
            .headers
            .get(X_AMZ_DATE)
            .ok_or_else(|| Error::request_invalid("x-amz-date is missing after normalization"))?
            .to_str()
            .map_err(|e| Error::request_invalid("x-amz-date is not ascii").with_source(e))?
            .to_string();

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = Scope::new(&timestamp, &self.region, &self.service)?;
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(&timestamp, &scope, &creq_string)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(&cred.secret_access_key, &scope);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let authorization = format!(
            "{AWS4_HMAC_SHA256} Credential={}/{},SignedHeaders={},Signature={}",
            cred.access_key_id, scope, creq.signed_headers, signature
        );
        let mut value = HeaderValue::from_str(&authorization)?;
        value.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, value);

        Ok(SignatureResult {
            authorization,
            signature,
            scope,
            signed_headers: creq.signed_headers,
            injected_headers,
        })
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        body: Option<&[u8]>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let mut signed_req = SigningRequest::build(req)?;
        let result = self.sign_signing_request(ctx, &mut signed_req, cred, body);

        // Apply to the request, headers must be given back even if signing failed.
        signed_req.apply(req)?;
        result.map(|_| ())
    }
}

/// Sign a request described by method, url, headers and body.
///
/// `headers` is updated in place: the injected headers and `authorization`
/// are added, caller supplied values are never overwritten.
///
/// `url` may contain raw spaces or non-ASCII characters, they are escaped
/// before parsing. Existing `%XX` escapes are kept.
///
/// ```
/// use amzsign_aws_v4::{sign, Config};
/// use amzsign_core::Context;
/// use http::{HeaderMap, Method};
///
/// let config = Config {
///     access_key_id: Some("AKIDEXAMPLE".to_string()),
///     secret_access_key: Some("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string()),
///     region: Some("us-east-1".to_string()),
///     service: Some("s3".to_string()),
/// };
///
/// let mut headers = HeaderMap::new();
/// let result = sign(
///     &Context::new(),
///     &config,
///     &Method::GET,
///     "https://examplebucket.s3.amazonaws.com/test.txt",
///     &mut headers,
///     None,
/// )
/// .unwrap();
///
/// assert!(result.authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
/// assert_eq!(headers["x-amz-content-sha256"], "UNSIGNED-PAYLOAD");
/// assert_eq!(headers["host"], "examplebucket.s3.amazonaws.com");
/// ```
pub fn sign(
    ctx: &Context,
    config: &Config,
    method: &Method,
    url: &str,
    headers: &mut HeaderMap,
    body: Option<&[u8]>,
) -> Result<SignatureResult> {
    let cred = config.credential()?;
    let signer = RequestSigner::from_config(config)?;

    let url = utf8_percent_encode(url, &URL_ESCAPE_SET).to_string();
    let uri = Uri::from_str(&url)?;
    let mut req = SigningRequest::from_uri(method.clone(), uri, HeaderMap::new())?;
    req.headers = mem::take(headers);

    let result = signer.sign_signing_request(ctx, &mut req, &cred, body);
    mem::swap(headers, &mut req.headers);
    result
}

/// Inject the headers every signed request needs, returning the injected ones.
fn canonicalize_header(
    ctx: &Context,
    req: &mut SigningRequest,
    has_body: bool,
) -> Result<HeaderMap> {
    let mut injected = HeaderMap::new();

    // Insert DATE header if not present.
    if !req.headers.contains_key(X_AMZ_DATE) {
        let now = ctx.now()?;
        let timestamp = format_iso8601(now);
        if timestamp.len() != 16 {
            return Err(Error::clock_unavailable(format!(
                "clock returned {now} which can't be used as signing time"
            )));
        }
        injected.insert(X_AMZ_DATE, HeaderValue::try_from(timestamp)?);
    }

    // Insert X_AMZ_CONTENT_SHA_256 header if not present and there is no body.
    if !has_body && !req.headers.contains_key(X_AMZ_CONTENT_SHA_256) {
        injected.insert(
            X_AMZ_CONTENT_SHA_256,
            HeaderValue::from_static(UNSIGNED_PAYLOAD),
        );
    }

    // Insert HOST header if not present.
    if !req.headers.contains_key(header::HOST) {
        injected.insert(header::HOST, HeaderValue::from_str(req.host())?);
    }

    for (name, value) in injected.iter() {
        req.headers.insert(name.clone(), value.clone());
    }

    Ok(injected)
}

// StringToSign:
//
// AWS4-HMAC-SHA256
// 20220313T072004Z
// 20220313/<region>/<service>/aws4_request
// <hashed_canonical_request>
fn string_to_sign(timestamp: &str, scope: &Scope, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

/// Derive the signing key for `scope` from a secret access key.
///
/// The key only depends on the secret and the scope, so it can be reused
/// for every request signed within the same day, region and service.
pub fn generate_signing_key(secret: &str, scope: &Scope) -> Vec<u8> {
    // Sign secret
    let secret = format!("{AWS4_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), scope.date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), scope.region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), scope.service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
