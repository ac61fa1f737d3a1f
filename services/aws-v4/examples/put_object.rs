//! Upload an empty object to S3 with a signed `PUT`.
//!
//! ```shell
//! export AWS_ACCESS_KEY_ID=...
//! export AWS_SECRET_ACCESS_KEY=...
//! export AWS_REGION=us-east-1
//! export BUCKET_NAME=my-bucket
//! cargo run --example put_object -- test/1
//! ```

use std::env;
use std::time::Duration;

use amzsign_aws_v4::{sign, Config, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256};
use amzsign_core::{Context, OsEnv};
use anyhow::{anyhow, Result};
use http::{header, HeaderMap, HeaderValue, Method};
use log::{info, warn};
use reqwest::Client;

const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    let ctx = Context::new().with_env(OsEnv);
    let config = Config {
        service: Some("s3".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);

    let bucket = env::var("BUCKET_NAME").map_err(|_| anyhow!("BUCKET_NAME must be set"))?;
    let key = env::args().nth(1).unwrap_or_else(|| "test/1".to_string());
    let url = format!(
        "https://{bucket}.s3.{}.amazonaws.com/{key}",
        config.region()?
    );

    let client = Client::new();
    tokio::select! {
        res = put_with_retry(&client, &ctx, &config, &url) => res,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, giving up on {url}");
            Ok(())
        }
    }
}

async fn put_with_retry(client: &Client, ctx: &Context, config: &Config, url: &str) -> Result<()> {
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=MAX_ATTEMPTS {
        match put_object(client, ctx, config, url).await {
            Ok(()) => {
                info!("uploaded {url} after {attempt} attempt(s)");
                return Ok(());
            }
            Err(err) if attempt < MAX_ATTEMPTS => {
                warn!("attempt {attempt} failed: {err:#}, retry in {backoff:?}");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(err) => return Err(err.context(format!("upload {url} failed"))),
        }
    }

    Ok(())
}

async fn put_object(client: &Client, ctx: &Context, config: &Config, url: &str) -> Result<()> {
    // Sign every attempt again so each one carries a fresh timestamp.
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
    headers.insert(
        X_AMZ_CONTENT_SHA_256,
        HeaderValue::from_static(UNSIGNED_PAYLOAD),
    );

    let result = sign(ctx, config, &Method::PUT, url, &mut headers, Some(b"".as_slice()))?;
    info!("signed {url} with scope {}", result.scope);

    let resp = client.put(url).headers(headers).body(Vec::new()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("HTTP status code {status}: {body}"));
    }

    Ok(())
}
