//! Core components for signing AWS API requests.
//!
//! This crate provides the foundational types and traits shared by the amzsign
//! signers. It knows nothing about a specific signing scheme; service crates such
//! as `amzsign-aws-v4` build on it.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the environment and the clock used while signing
//! - **Traits**: Abstract interfaces for request signing (`SignRequest`) and credential validation (`SigningCredential`)
//! - **Signer**: Ties a context, a request signer and a credential together
//!
//! ## Example
//!
//! ```no_run
//! use amzsign_core::{Context, Result, SignRequest, Signer, SigningCredential};
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyRequestSigner;
//!
//! impl SignRequest for MyRequestSigner {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &mut Parts,
//!         _credential: Option<&Self::Credential>,
//!         _body: Option<&[u8]>,
//!     ) -> Result<()> {
//!         // Build your signature here
//!         todo!()
//!     }
//! }
//!
//! # fn example() -> Result<()> {
//! let cred = MyCredential {
//!     key: "my-access-key".to_string(),
//!     secret: "my-secret-key".to_string(),
//! };
//! let signer = Signer::new(Context::new(), MyRequestSigner, cred);
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting and parsing
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Clock, Context, Env, FixedClock, NoopEnv, OsEnv, StaticEnv, SystemClock};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
