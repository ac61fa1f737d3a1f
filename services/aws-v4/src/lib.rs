//! AWS Signature Version 4 signer.
//!
//! This crate computes the `authorization` header AWS expects on every API
//! request. It never loads credentials by itself, the caller passes them in
//! through a [`Config`] or a [`Credential`].
//!
//! ## Quick Start
//!
//! ```
//! use amzsign_aws_v4::{Credential, RequestSigner};
//! use amzsign_core::{Context, Signer};
//!
//! # fn main() -> amzsign_core::Result<()> {
//! let signer = Signer::new(
//!     Context::new(),
//!     RequestSigner::new("s3", "us-east-1"),
//!     Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
//! );
//!
//! let (mut parts, _) = http::Request::get("https://examplebucket.s3.amazonaws.com/test.txt")
//!     .body(())
//!     .expect("request must be valid")
//!     .into_parts();
//! signer.sign(&mut parts, None)?;
//!
//! assert!(parts.headers.contains_key("authorization"));
//! assert_eq!(parts.headers["x-amz-content-sha256"], "UNSIGNED-PAYLOAD");
//! # Ok(())
//! # }
//! ```
//!
//! ## Signing without `http::Request`
//!
//! [`sign`] takes a method, a url and a header map, and reports everything
//! it computed in a [`SignatureResult`].
//!
//! ## Payload
//!
//! - `body: None` signs the request as `UNSIGNED-PAYLOAD` and adds the
//!   `x-amz-content-sha256` header.
//! - `body: Some(bytes)` signs the sha256 of the bytes. The header is not
//!   added, but a caller supplied value must match the body.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod canonical;
pub use canonical::canonical_query_string;
pub use canonical::canonical_uri_path;
pub use canonical::CanonicalRequest;

mod sign_request;
pub use sign_request::generate_signing_key;
pub use sign_request::sign;
pub use sign_request::RequestSigner;
pub use sign_request::Scope;
pub use sign_request::SignatureResult;

mod constants;
pub use constants::AWS4_HMAC_SHA256;
pub use constants::UNSIGNED_PAYLOAD;
pub use constants::X_AMZ_CONTENT_SHA_256;
pub use constants::X_AMZ_DATE;
