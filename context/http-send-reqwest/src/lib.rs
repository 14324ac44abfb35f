//! [`HttpSend`] implementation backed by [`reqwest`].
//!
//! Response bodies are handed back as a stream: nothing is buffered here, so
//! bulk exports can be read chunk by chunk by the caller.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use kraken_rest_core::{Body, Error, HttpSend, Result};
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests through a shared [`reqwest::Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Body>> {
        let uri = req.uri().to_string();
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid(format!("convert request to {uri} failed")).with_source(e)
        })?;

        let resp: http::Response<reqwest::Body> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport(format!("send request to {uri} failed")).with_source(e))?
            .into();

        Ok(resp.map(|body| {
            body.map_err(|e| Error::transport("read response body failed").with_source(e))
                .boxed_unsync()
        }))
    }
}
