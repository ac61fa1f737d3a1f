use crate::{Context, Error, Result, SignRequest, SigningCredential};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// It owns a static credential: amzsign doesn't load, refresh or cache
/// credentials, callers hand them in.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: K,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(ctx: Context, builder: impl SignRequest<Credential = K>, credential: K) -> Self {
        Self {
            ctx,
            builder: Arc::new(builder),
            credential,
        }
    }

    /// Signing request.
    pub fn sign(&self, req: &mut http::request::Parts, body: Option<&[u8]>) -> Result<()> {
        if !self.credential.is_valid() {
            return Err(Error::credential_invalid("credential is incomplete"));
        }

        self.builder
            .sign_request(&self.ctx, req, Some(&self.credential), body)
    }
}
