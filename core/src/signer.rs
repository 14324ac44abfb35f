use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Signer is the main struct used to authorize the request.
///
/// It loads the credential once, caches it while it stays valid and hands it
/// to the [`SignRequest`] implementation for every request. Signatures
/// themselves are never cached.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Authorize the request.
    ///
    /// Fails with [`crate::ErrorKind::Cancelled`] without touching the request
    /// if `cancel` already fired.
    pub async fn sign(
        &self,
        cancel: &CancellationToken,
        req: &mut http::Request<Bytes>,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::cancelled(format!(
                "authorize request to {} aborted: cancelled before signing",
                req.uri().path()
            )));
        }

        let credential = self.credential.lock().expect("lock poisoned").clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            let credential = self.loader.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = credential.clone();
            credential
        };

        self.builder
            .sign_request(&self.ctx, req, credential.as_ref())
            .await
    }
}
