use crate::Credential;
use async_trait::async_trait;
use kraken_rest_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a fixed credential.
///
/// The secret is decoded when the provider is built, so a malformed secret
/// fails before any request can be made.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider from the api key and the base64 encoded secret.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self> {
        Ok(Self {
            credential: Credential::new(api_key, api_secret)?,
        })
    }
}

impl From<Credential> for StaticCredentialProvider {
    fn from(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
