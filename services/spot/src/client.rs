//! Dispatcher for Kraken REST API requests.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use bytes::Bytes;
use http::header::{HeaderName, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::constants::*;
use crate::{
    Config, Credential, NoCredentialProvider, RequestSigner, StaticCredentialProvider,
};
use kraken_rest_core::{
    collect_body, media_type, Body, Context, Error, ProvideCredential, Result, Signer,
    SigningRequest, FORM_CONTENT_TYPE,
};

/// Request describes one call to the REST API.
///
/// It is consumed by [`Client::send`] and never retained.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    content_type: Option<String>,
    form: Vec<(String, String)>,
    headers: HeaderMap,
}

impl Request {
    /// Create a request for the given method and path, e.g. `/0/public/Time`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            content_type: None,
            form: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Create a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a form field to the body.
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Declare the body content type.
    ///
    /// Only `application/x-www-form-urlencoded` is supported, which is also
    /// the default.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attach the one-time password of an account protected by a second factor.
    pub fn otp(self, otp: impl Into<String>) -> Self {
        self.form(OTP, otp)
    }

    /// Attach an extra header.
    ///
    /// `content-type`, `user-agent`, `api-key` and `api-sign` are managed by
    /// the client and silently dropped.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// Envelope is the wrapper around every JSON response.
///
/// Errors reported by the exchange are data: they are not turned into
/// pipeline errors, callers must inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope<T> {
    /// Business errors, e.g. `EGeneral:Invalid arguments`.
    #[serde(default)]
    pub error: Vec<String>,
    /// Result of the call, absent when the call failed.
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Turn the envelope into its result, or the reported errors.
    pub fn into_result(self) -> std::result::Result<T, Vec<String>> {
        match (self.error.is_empty(), self.result) {
            (true, Some(result)) => Ok(result),
            (_, _) => Err(self.error),
        }
    }
}

/// Payload is a successfully classified response.
pub enum Payload<T> {
    /// A JSON body decoded into the caller's type, with the response head.
    Decoded {
        /// Status and headers of the response.
        head: http::response::Parts,
        /// The decoded body.
        value: T,
    },
    /// A binary body (`application/octet-stream` or `application/zip`).
    ///
    /// The body is still open: the caller reads it and is responsible for
    /// dropping it on every path.
    Stream(http::Response<Body>),
}

impl<T: Debug> Debug for Payload<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Decoded { head, value } => f
                .debug_struct("Decoded")
                .field("head", head)
                .field("value", value)
                .finish(),
            Payload::Stream(resp) => f
                .debug_struct("Stream")
                .field("status", &resp.status())
                .field("headers", resp.headers())
                .finish_non_exhaustive(),
        }
    }
}

impl<T> Payload<T> {
    /// Return the decoded value, failing if the response was a stream.
    pub fn into_decoded(self) -> Result<T> {
        match self {
            Payload::Decoded { value, .. } => Ok(value),
            Payload::Stream(resp) => Err(Error::content_type(format!(
                "expected a JSON payload, got stream of {:?}",
                resp.headers().get(CONTENT_TYPE)
            ))),
        }
    }

    /// Return the stream, failing if the response was decoded JSON.
    pub fn into_stream(self) -> Result<http::Response<Body>> {
        match self {
            Payload::Stream(resp) => Ok(resp),
            Payload::Decoded { .. } => Err(Error::content_type(
                "expected a binary stream, got a JSON payload",
            )),
        }
    }
}

/// Response body of `/0/public/Time`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerTime {
    /// Unix timestamp in seconds.
    pub unixtime: i64,
    /// RFC 1123 formatted time.
    #[serde(default)]
    pub rfc1123: String,
}

/// Client sends requests to the Kraken REST API.
///
/// It builds each request, asks its [`Signer`] to authorize it, sends it
/// through the context's transport and classifies the response. The client
/// holds no mutable state of its own and is cheap to clone.
#[derive(Clone, Debug)]
pub struct Client {
    signer: Signer<Credential>,
    base_url: String,
    user_agent: HeaderValue,
}

impl Client {
    /// Create a client from the config.
    ///
    /// With both `api_key` and `api_secret` set, the client can call private
    /// endpoints; a malformed secret fails here. Without them, the client is
    /// public-only.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        match (config.api_key.clone(), config.api_secret.clone()) {
            (Some(key), Some(secret)) => {
                let provider = StaticCredentialProvider::new(&key, &secret)?;
                Self::with_credential_provider(ctx, config, provider)
            }
            (None, None) => Self::with_credential_provider(ctx, config, NoCredentialProvider),
            _ => Err(Error::config_invalid(
                "api_key and api_secret must be configured together",
            )),
        }
    }

    /// Create a client that loads its credential from the given provider.
    pub fn with_credential_provider(
        ctx: Context,
        config: Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            Error::config_invalid(format!("invalid user agent {:?}", config.user_agent))
                .with_source(e)
        })?;
        let base_url = config.base_url().to_string();
        base_url.parse::<http::Uri>().map_err(|e| {
            Error::config_invalid(format!("invalid base url {base_url}")).with_source(e)
        })?;

        Ok(Self {
            signer: Signer::new(ctx, provider, RequestSigner::new()),
            base_url,
            user_agent,
        })
    }

    /// Fetch a nonce from the context's nonce source.
    ///
    /// Only needed when the caller wants to put the nonce into the form
    /// itself; otherwise the signer injects one.
    pub fn nonce(&self) -> i64 {
        self.signer.context().nonce()
    }

    /// Send the request and classify the response.
    ///
    /// - `application/json` bodies are decoded into `T`.
    /// - `application/octet-stream` and `application/zip` bodies are returned
    ///   as an open stream.
    /// - Any status other than `200 OK` is an [`ErrorKind::Status`] error and
    ///   the body is not read.
    ///
    /// Nothing is retried.
    ///
    /// [`ErrorKind::Status`]: kraken_rest_core::ErrorKind::Status
    pub async fn send<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        req: Request,
    ) -> Result<Payload<T>> {
        let mut req = self.build(req)?;
        self.signer.sign(cancel, &mut req).await?;

        let path = req.uri().path().to_string();
        if cancel.is_cancelled() {
            return Err(Error::cancelled(format!(
                "send request to {path} aborted: cancelled before dispatch"
            )));
        }

        debug!("sending {} request to {}", req.method(), path);
        let resp = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(Error::cancelled(format!(
                    "send request to {path} aborted: cancelled in flight"
                )));
            }
            resp = self.signer.context().http_send(req) => resp?,
        };

        classify(&path, resp).await
    }

    /// Send the request and decode its JSON envelope.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        req: Request,
    ) -> Result<Envelope<T>> {
        self.send::<Envelope<T>>(cancel, req).await?.into_decoded()
    }

    /// Get the server time.
    pub async fn server_time(&self, cancel: &CancellationToken) -> Result<Envelope<ServerTime>> {
        self.send_json(cancel, Request::get("/0/public/Time")).await
    }

    /// Get the balances of all assets held by the account.
    pub async fn balance(
        &self,
        cancel: &CancellationToken,
        otp: Option<&str>,
    ) -> Result<Envelope<HashMap<String, String>>> {
        let mut req = Request::post("/0/private/Balance");
        if let Some(otp) = otp {
            req = req.otp(otp);
        }
        self.send_json(cancel, req).await
    }

    /// Download a finished data export.
    ///
    /// A ready export comes back as [`Payload::Stream`] holding the zip
    /// archive. An unknown or unfinished export is reported by the exchange
    /// as a JSON envelope, returned as [`Payload::Decoded`] so its errors can
    /// be inspected.
    pub async fn retrieve_export(
        &self,
        cancel: &CancellationToken,
        id: &str,
        otp: Option<&str>,
    ) -> Result<Payload<Envelope<serde_json::Value>>> {
        let mut req = Request::post("/0/private/RetrieveExport").form("id", id);
        if let Some(otp) = otp {
            req = req.otp(otp);
        }
        self.send(cancel, req).await
    }

    fn build(&self, req: Request) -> Result<http::Request<Bytes>> {
        let mut url = format!("{}{}", self.base_url, req.path);
        if !req.query.is_empty() {
            url.push('?');
            url.push_str(&SigningRequest::form_to_string(&req.query));
        }

        let body = if req.form.is_empty() {
            Bytes::new()
        } else {
            match req.content_type.as_deref().map(media_type).as_deref() {
                None | Some(FORM_CONTENT_TYPE) => {
                    Bytes::from(SigningRequest::form_to_string(&req.form))
                }
                Some(other) => {
                    return Err(Error::config_invalid(format!(
                        "build request to {} failed: unsupported body content type {other}",
                        req.path
                    )))
                }
            }
        };

        let mut headers = req.headers;
        for name in [
            CONTENT_TYPE,
            USER_AGENT,
            HeaderName::from_static(API_KEY),
            HeaderName::from_static(API_SIGN),
        ] {
            headers.remove(name);
        }
        headers.insert(USER_AGENT, self.user_agent.clone());
        if !body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }

        let mut built = http::Request::builder()
            .method(req.method)
            .uri(url)
            .body(body)?;
        *built.headers_mut() = headers;

        Ok(built)
    }
}

async fn classify<T: DeserializeOwned>(
    path: &str,
    resp: http::Response<Body>,
) -> Result<Payload<T>> {
    let (head, body) = resp.into_parts();

    if head.status != StatusCode::OK {
        warn!("request to {path} got unexpected status {}", head.status);
        drop(body);
        return Err(Error::status_error(
            head.status,
            format!("request to {path} got status {}", head.status),
        ));
    }

    let content_type = head
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(media_type)
        .unwrap_or_default();

    match content_type.as_str() {
        CONTENT_TYPE_JSON => {
            let bs = collect_body(body).await?;
            let value = serde_json::from_slice(&bs).map_err(|e| {
                Error::decode(format!("decode response of {path} failed")).with_source(e)
            })?;
            debug!("request to {path} decoded {} bytes of json", bs.len());
            Ok(Payload::Decoded { head, value })
        }
        CONTENT_TYPE_OCTET_STREAM | CONTENT_TYPE_ZIP => {
            debug!("request to {path} returned a {content_type} stream");
            Ok(Payload::Stream(http::Response::from_parts(head, body)))
        }
        other => {
            drop(body);
            Err(Error::content_type(format!(
                "request to {path} returned unsupported content type {other:?}"
            )))
        }
    }
}
