use std::fmt::{Debug, Formatter};

use crate::constants::*;
use crate::Credential;
use amzsign_core::utils::Redact;
use amzsign_core::{Context, Error, Result};
use log::debug;

/// Config for signing aws requests.
///
/// Everything the signer needs is passed in explicitly. Use
/// [`Config::from_env`] to fill the gaps from the environment of a [`Context`].
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `service` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AMZSIGN_SERVICE`]
    ///
    /// For example, `s3`, `dynamodb` or `sts`.
    pub service: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl Config {
    /// Load unset fields from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.access_key_id.is_none() {
            self.access_key_id = ctx.env_var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = ctx.env_var(AWS_SECRET_ACCESS_KEY);
        }
        if self.region.is_none() {
            self.region = ctx
                .env_var(AWS_REGION)
                .or_else(|| ctx.env_var(AWS_DEFAULT_REGION));
        }
        if self.service.is_none() {
            self.service = ctx.env_var(AMZSIGN_SERVICE);
        }

        debug!("config loaded from env: {self:?}");
        self
    }

    /// Build the credential pair of this config.
    pub fn credential(&self) -> Result<Credential> {
        Ok(Credential {
            access_key_id: required(&self.access_key_id, "access_key_id")?.to_string(),
            secret_access_key: required(&self.secret_access_key, "secret_access_key")?
                .to_string(),
        })
    }

    /// Region of the signing scope.
    pub fn region(&self) -> Result<&str> {
        required(&self.region, "region")
    }

    /// Service of the signing scope.
    pub fn service(&self) -> Result<&str> {
        required(&self.service, "service")
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::config_invalid(format!("{name} is required"))),
    }
}
