//! Plug a custom credential provider and request signer into [`Signer`].

use async_trait::async_trait;
use bytes::Bytes;
use kraken_rest_core::hash::base64_hmac_sha512;
use kraken_rest_core::{
    Context, Error, ProvideCredential, Result, SignRequest, Signer, SigningCredential,
    SigningRequest, StaticEnv,
};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
struct MyCredential {
    api_key: String,
    api_secret: String,
}

impl SigningCredential for MyCredential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

#[derive(Debug)]
struct MyCredentialLoader;

#[async_trait]
impl ProvideCredential for MyCredentialLoader {
    type Credential = MyCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let (Some(api_key), Some(api_secret)) =
            (ctx.env_var("MY_API_KEY"), ctx.env_var("MY_API_SECRET"))
        else {
            return Ok(None);
        };

        Ok(Some(MyCredential {
            api_key,
            api_secret,
        }))
    }
}

/// Signs `path ++ body` and stamps a nonce into the form.
#[derive(Debug)]
struct MyRequestSigner;

#[async_trait]
impl SignRequest for MyRequestSigner {
    type Credential = MyCredential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::Request<Bytes>,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("no credential loaded"))?;

        let mut signing = SigningRequest::build(req)?;
        signing.form_push("nonce", ctx.nonce().to_string());
        let body = SigningRequest::form_to_string(&signing.form);
        let signature = base64_hmac_sha512(
            cred.api_secret.as_bytes(),
            &[signing.path.as_bytes(), body.as_bytes()],
        );

        signing.headers.insert("x-api-key", cred.api_key.parse()?);
        signing.headers.insert("x-api-signature", signature.parse()?);
        signing.apply(req, body)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([
            ("MY_API_KEY".to_string(), "demo-api-key".to_string()),
            ("MY_API_SECRET".to_string(), "demo-api-secret".to_string()),
        ]),
    });
    let signer = Signer::new(ctx, MyCredentialLoader, MyRequestSigner);

    let mut req = http::Request::builder()
        .method(http::Method::POST)
        .uri("https://api.example.com/v1/orders")
        .body(Bytes::from_static(b"pair=XBTUSD"))?;

    signer.sign(&CancellationToken::new(), &mut req).await?;
    println!("headers: {:?}", req.headers());
    println!("body: {}", String::from_utf8_lossy(req.body()));

    Ok(())
}
