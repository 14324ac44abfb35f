use std::fmt::Debug;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::BodyExt;

use crate::{Error, Result};

/// Body is the streaming response body returned by [`HttpSend`].
///
/// The underlying connection stays open until the body is fully read or dropped.
pub type Body = UnsyncBoxBody<Bytes, Error>;

/// Read the whole body into memory, releasing the underlying connection.
pub async fn collect_body(body: Body) -> Result<Bytes> {
    Ok(body.collect().await?.to_bytes())
}

/// HttpSend is used to send http request to the exchange.
///
/// The response body is returned as a stream so that bulk exports can be
/// consumed without buffering them in memory.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Body>>;
}
