use crate::{constants::*, Credential};
use async_trait::async_trait;
use kraken_rest_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads Kraken credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `KRAKEN_API_KEY`: The api key
/// - `KRAKEN_API_SECRET`: The base64 encoded private key
///
/// Both must be set, otherwise no credential is provided.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(KRAKEN_API_KEY), envs.get(KRAKEN_API_SECRET)) {
            (Some(key), Some(secret)) => Ok(Some(Credential::new(key.as_str(), secret)?)),
            _ => Ok(None),
        }
    }
}
