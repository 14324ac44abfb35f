//! Kraken REST API request signer
use std::mem;

use bytes::Bytes;
use http::header::HeaderName;
use http::HeaderValue;
use log::debug;

use super::constants::*;
use super::credential::Credential;
use kraken_rest_core::hash::{base64_hmac_sha512, sha256};
use kraken_rest_core::{Context, Error, Result, SignRequest, SigningRequest};

/// SignedFields is the form payload of a private request.
///
/// It always holds exactly one `nonce` and at most one `otp`. The output of
/// [`SignedFields::encode`] is both the signed message and the request body,
/// so the fields must not change between signing and sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFields {
    fields: Vec<(String, String)>,
}

impl SignedFields {
    /// Validate the given form pairs.
    pub fn new(fields: Vec<(String, String)>) -> Result<Self> {
        let count = |key: &str| fields.iter().filter(|(k, _)| k == key).count();

        match count(NONCE) {
            1 => {}
            0 => return Err(Error::request_invalid("signed fields must contain a nonce")),
            n => {
                return Err(Error::request_invalid(format!(
                    "signed fields must contain exactly one nonce, got {n}"
                )))
            }
        }
        if count(OTP) > 1 {
            return Err(Error::request_invalid(
                "signed fields must contain at most one otp",
            ));
        }

        Ok(Self { fields })
    }

    /// The nonce value as sent on the wire.
    pub fn nonce(&self) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == NONCE)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// The one-time password, if any.
    pub fn otp(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == OTP)
            .map(|(_, v)| v.as_str())
    }

    /// Form encode the fields, sorted by key.
    pub fn encode(&self) -> String {
        SigningRequest::form_to_string(&self.fields)
    }
}

/// Compute the `API-Sign` value of a private request.
///
/// ```text
/// base64(HMAC-SHA512(secret, path + SHA256(nonce + postdata)))
/// ```
///
/// `postdata` is [`SignedFields::encode`]. The nonce is part of the digest
/// twice: in front of the body and inside it.
pub fn sign(path: &str, fields: &SignedFields, secret: &[u8]) -> String {
    sign_encoded(path, fields.nonce(), &fields.encode(), secret)
}

fn sign_encoded(path: &str, nonce: &str, postdata: &str, secret: &[u8]) -> String {
    let digest = sha256(&[nonce.as_bytes(), postdata.as_bytes()]);
    base64_hmac_sha512(secret, &[path.as_bytes(), digest.as_slice()])
}

/// Check whether the path targets a public endpoint that must go out unsigned.
pub fn is_public_path(path: &str) -> bool {
    path.contains(PUBLIC_MARKER)
}

/// RequestSigner that implements Kraken REST API authentication.
///
/// - Public endpoints are left untouched, with or without a credential.
/// - Private endpoints get a nonce (unless the caller already set one), a
///   signature over the form body and the `API-Key` / `API-Sign` headers.
/// - Private endpoints without a credential are rejected.
///
/// Reference: [Spot REST Authentication](https://docs.kraken.com/api/docs/guides/spot-rest-auth)
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::Request<Bytes>,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        if is_public_path(req.uri().path()) {
            debug!("request to {} is public, skip signing", req.uri().path());
            return Ok(());
        }

        let cred = credential.ok_or_else(|| {
            Error::credential_invalid(format!(
                "private endpoint {} requires a credential, but the client is public-only",
                req.uri().path()
            ))
        })?;

        let mut signing = SigningRequest::build(req)?;
        if signing.form_values(NONCE).next().is_none() {
            signing.form_push(NONCE, ctx.nonce().to_string());
        }

        let fields = SignedFields::new(mem::take(&mut signing.form))?;
        let postdata = fields.encode();
        let signature = sign_encoded(&signing.path, fields.nonce(), &postdata, &cred.secret);
        debug!(
            "signed private request to {} with nonce {}",
            signing.path,
            fields.nonce()
        );

        signing
            .headers
            .insert(HeaderName::from_static(API_KEY), cred.api_key.parse()?);
        signing.headers.insert(HeaderName::from_static(API_SIGN), {
            let mut value: HeaderValue = signature.parse()?;
            value.set_sensitive(true);

            value
        });

        signing.apply(req, postdata)
    }
}
