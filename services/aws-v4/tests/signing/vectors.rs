//! Offline signing vectors from the AWS SigV4 test suite.

use amzsign_aws_v4::{generate_signing_key, sign, Config, Credential, RequestSigner, Scope};
use amzsign_core::hash::{hex_hmac_sha256, hex_sha256};
use amzsign_core::{Context, ErrorKind, FixedClock, Signer};
use chrono::{TimeZone, Utc};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request};
use pretty_assertions::assert_eq;
use test_case::test_case;

const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

fn ctx() -> Context {
    Context::new().with_clock(FixedClock::new(
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
    ))
}

fn config() -> Config {
    Config {
        access_key_id: Some("AKIDEXAMPLE".to_string()),
        secret_access_key: Some(SECRET_ACCESS_KEY.to_string()),
        region: Some("us-east-1".to_string()),
        service: Some("service".to_string()),
    }
}

fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (k, v) in pairs {
        map.append(
            HeaderName::from_bytes(k.as_bytes()).expect("header name must be valid"),
            HeaderValue::from_str(v).expect("header value must be valid"),
        );
    }
    map
}

#[test_case(
    Method::GET, "https://example.amazonaws.com/", &[],
    "host;x-amz-date",
    "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31";
    "get vanilla"
)]
#[test_case(
    Method::GET, "https://example.amazonaws.com/?Param2=value2&Param1=value1", &[],
    "host;x-amz-date",
    "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500";
    "get vanilla query order key case"
)]
#[test_case(
    Method::GET, "https://example.amazonaws.com/",
    &[("My-Header1", " value1"), ("My-Header2", "\"a   b   c\"")],
    "host;my-header1;my-header2;x-amz-date",
    "acc3ed3afb60bb290fc8d2dd0098b9911fcaa05412b367055dee359757a9c736";
    "get header value trim"
)]
#[test_case(
    Method::POST, "https://example.amazonaws.com/?Param1=value1", &[],
    "host;x-amz-date",
    "28038455d6de14eafc1f9222cf5aa6f1a96197d7deb8263271d420d138af7f11";
    "post vanilla query"
)]
fn test_published_vectors(
    method: Method,
    url: &str,
    extra: &[(&str, &str)],
    signed_headers: &str,
    signature: &str,
) {
    let mut hs = headers(extra);
    hs.insert("host", HeaderValue::from_static("example.amazonaws.com"));
    hs.insert("x-amz-date", HeaderValue::from_static("20150830T123600Z"));

    let result = sign(&ctx(), &config(), &method, url, &mut hs, Some(b"".as_slice()))
        .expect("sign must succeed");

    assert_eq!(result.signed_headers, signed_headers);
    assert_eq!(result.signature, signature);
    assert_eq!(
        result.authorization,
        format!(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request,SignedHeaders={signed_headers},Signature={signature}"
        )
    );
    assert_eq!(hs["authorization"], result.authorization.as_str());
    assert!(result.injected_headers.is_empty());
}

#[test]
fn test_unsigned_payload_injects_headers() {
    let mut hs = HeaderMap::new();
    let result = sign(
        &ctx(),
        &config(),
        &Method::GET,
        "https://example.amazonaws.com/",
        &mut hs,
        None,
    )
    .expect("sign must succeed");

    assert_eq!(result.injected_headers.len(), 3);
    assert_eq!(hs["host"], "example.amazonaws.com");
    assert_eq!(hs["x-amz-date"], "20150830T123600Z");
    assert_eq!(hs["x-amz-content-sha256"], "UNSIGNED-PAYLOAD");
    assert_eq!(result.signed_headers, "host;x-amz-content-sha256;x-amz-date");
    assert_eq!(
        result.signature,
        "9b02fb7b5d0076fa47a0adda28c71e74ba4588334bc0139b8cd6bb87f16afe16"
    );
    assert_eq!(
        result.scope.to_string(),
        "20150830/us-east-1/service/aws4_request"
    );
}

#[test]
fn test_signing_is_deterministic() {
    let sign_once = || {
        let mut hs = headers(&[("content-type", "text/plain")]);
        sign(
            &ctx(),
            &config(),
            &Method::PUT,
            "https://example.amazonaws.com/a/b%20c?z=1&a=2",
            &mut hs,
            Some(b"hello".as_slice()),
        )
        .expect("sign must succeed")
        .authorization
    };

    assert_eq!(sign_once(), sign_once());
}

#[test]
fn test_resign_replaces_authorization() {
    let mut hs = HeaderMap::new();
    let first = sign(
        &ctx(),
        &config(),
        &Method::GET,
        "https://example.amazonaws.com/",
        &mut hs,
        None,
    )
    .expect("sign must succeed");

    // The stale authorization header is neither signed nor duplicated.
    let second = sign(
        &ctx(),
        &config(),
        &Method::GET,
        "https://example.amazonaws.com/",
        &mut hs,
        None,
    )
    .expect("sign must succeed");

    assert_eq!(first.authorization, second.authorization);
    assert_eq!(hs.get_all("authorization").iter().count(), 1);
    assert!(second.injected_headers.is_empty());
}

#[test_case("https://[::1/key"; "unterminated ipv6 host")]
#[test_case("https://example.amazonaws.com:port/key"; "non numeric port")]
#[test_case("/only/a/path"; "no authority")]
#[test_case(""; "empty")]
fn test_malformed_url(url: &str) {
    let mut hs = headers(&[("content-type", "text/plain")]);
    let err = sign(&ctx(), &config(), &Method::GET, url, &mut hs, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UrlInvalid);
    // Caller headers survive a failed signing attempt untouched.
    assert_eq!(hs.len(), 1);
    assert_eq!(hs["content-type"], "text/plain");
}

#[test_case(
    "https://example.amazonaws.com/a/b c/d",
    "https://example.amazonaws.com/a/b%20c/d";
    "raw space in path"
)]
#[test_case(
    "https://example.amazonaws.com/?k=a b",
    "https://example.amazonaws.com/?k=a%20b";
    "raw space in query"
)]
#[test_case(
    "https://example.amazonaws.com/文件名.txt",
    "https://example.amazonaws.com/%E6%96%87%E4%BB%B6%E5%90%8D.txt";
    "unicode path"
)]
#[test_case(
    "https://example.amazonaws.com/{a|b}",
    "https://example.amazonaws.com/%7Ba%7Cb%7D";
    "braces and pipe"
)]
fn test_raw_url_signs_like_encoded_url(raw: &str, encoded: &str) {
    let sign_url = |url: &str| {
        let mut hs = HeaderMap::new();
        sign(&ctx(), &config(), &Method::GET, url, &mut hs, None)
            .expect("sign must succeed")
            .authorization
    };

    assert_eq!(sign_url(raw), sign_url(encoded));
}

#[test]
fn test_raw_space_path_is_signed_as_encoded_path() {
    // Canonical request for `GET /a/b%20c/d` with unsigned payload, signed by hand.
    let creq = "GET\n/a/b%20c/d\n\nhost:example.amazonaws.com\nx-amz-content-sha256:UNSIGNED-PAYLOAD\nx-amz-date:20150830T123600Z\n\nhost;x-amz-content-sha256;x-amz-date\nUNSIGNED-PAYLOAD";
    let sts = format!(
        "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/service/aws4_request\n{}",
        hex_sha256(creq.as_bytes())
    );
    let scope = Scope::new("20150830T123600Z", "us-east-1", "service").unwrap();
    let expected = hex_hmac_sha256(
        &generate_signing_key(SECRET_ACCESS_KEY, &scope),
        sts.as_bytes(),
    );

    let mut hs = HeaderMap::new();
    let result = sign(
        &ctx(),
        &config(),
        &Method::GET,
        "https://example.amazonaws.com/a/b c/d",
        &mut hs,
        None,
    )
    .expect("sign must succeed");

    assert_eq!(result.signature, expected);
}

#[test]
fn test_incomplete_config() {
    let mut hs = HeaderMap::new();
    let cfg = Config {
        region: None,
        ..config()
    };

    let err = sign(
        &ctx(),
        &cfg,
        &Method::GET,
        "https://example.amazonaws.com/",
        &mut hs,
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(hs.is_empty());
}

#[test]
fn test_signer_matches_free_function() {
    let signer = Signer::new(
        ctx(),
        RequestSigner::new("service", "us-east-1"),
        Credential::new("AKIDEXAMPLE", SECRET_ACCESS_KEY),
    );

    let (mut parts, _) = Request::get("https://example.amazonaws.com/?Param2=value2&Param1=value1")
        .body(())
        .expect("request must be valid")
        .into_parts();
    signer.sign(&mut parts, None).expect("sign must succeed");

    let mut hs = HeaderMap::new();
    let result = sign(
        &ctx(),
        &config(),
        &Method::GET,
        "https://example.amazonaws.com/?Param2=value2&Param1=value1",
        &mut hs,
        None,
    )
    .expect("sign must succeed");

    assert_eq!(parts.headers["authorization"], result.authorization.as_str());
    // The query is signed in canonical order but never rewritten on the request.
    assert_eq!(parts.uri.query(), Some("Param2=value2&Param1=value1"));
}

#[test]
fn test_signer_rejects_incomplete_credential() {
    let signer = Signer::new(
        ctx(),
        RequestSigner::new("service", "us-east-1"),
        Credential::new("AKIDEXAMPLE", ""),
    );

    let (mut parts, _) = Request::get("https://example.amazonaws.com/")
        .body(())
        .expect("request must be valid")
        .into_parts();

    let err = signer.sign(&mut parts, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(parts.headers.is_empty());
}
