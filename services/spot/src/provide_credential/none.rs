use crate::Credential;
use async_trait::async_trait;
use kraken_rest_core::{Context, ProvideCredential, Result};

/// NoCredentialProvider never provides a credential.
///
/// A client built with it is public-only: public endpoints work as usual and
/// every private request is rejected before it reaches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCredentialProvider;

#[async_trait]
impl ProvideCredential for NoCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(None)
    }
}
