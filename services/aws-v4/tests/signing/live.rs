use super::{init_signing_test, send_signed_request};
use anyhow::Result;
use http::{Method, Request, StatusCode};
use log::warn;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use std::str::FromStr;

#[tokio::test]
async fn test_head_object() -> Result<()> {
    let Some((ctx, config, url)) = init_signing_test() else {
        warn!("AMZSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let mut req = Request::new(Vec::new());
    *req.method_mut() = Method::HEAD;
    *req.uri_mut() = http::Uri::from_str(&format!("{}/{}", url, "not_exist_file"))?;

    let (status, _body) = send_signed_request(&ctx, &config, req, None).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_head_object_with_special_characters() -> Result<()> {
    let Some((ctx, config, url)) = init_signing_test() else {
        warn!("AMZSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let mut req = Request::new(Vec::new());
    *req.method_mut() = Method::HEAD;
    *req.uri_mut() = http::Uri::from_str(&format!(
        "{}/{}",
        url,
        utf8_percent_encode("!@#$%^&*()_+-=;:'><,?.txt", NON_ALPHANUMERIC)
    ))?;

    let (status, _body) = send_signed_request(&ctx, &config, req, None).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object_unsigned_payload() -> Result<()> {
    let Some((ctx, config, url)) = init_signing_test() else {
        warn!("AMZSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let mut req = Request::new(Vec::new());
    req.headers_mut()
        .insert("x-amz-content-sha256", "UNSIGNED-PAYLOAD".parse()?);
    req.headers_mut().insert("content-length", "0".parse()?);
    *req.method_mut() = Method::PUT;
    *req.uri_mut() = http::Uri::from_str(&format!("{}/{}", url, "put_object_unsigned"))?;

    let (status, _body) =
        send_signed_request(&ctx, &config, req, Some(b"".as_slice())).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object_with_body() -> Result<()> {
    let Some((ctx, config, url)) = init_signing_test() else {
        warn!("AMZSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let body = b"Hello, World!".to_vec();
    let body_digest = hex::encode(Sha256::digest(&body).as_slice());

    let mut req = Request::new(body.clone());
    req.headers_mut()
        .insert("x-amz-content-sha256", body_digest.parse()?);
    *req.method_mut() = Method::PUT;
    *req.uri_mut() = http::Uri::from_str(&format!("{}/{}", url, "put_object_test"))?;

    let (status, _body) = send_signed_request(&ctx, &config, req, Some(&body)).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_list_bucket() -> Result<()> {
    let Some((ctx, config, url)) = init_signing_test() else {
        warn!("AMZSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let mut req = Request::new(Vec::new());
    *req.method_mut() = Method::GET;
    *req.uri_mut() =
        http::Uri::from_str(&format!("{url}?list-type=2&delimiter=/&encoding-type=url"))?;

    let (status, _body) = send_signed_request(&ctx, &config, req, None).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}
