use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{self, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use http_body::Frame;
use http_body_util::BodyExt;
use kraken_rest_core::{Body, Error, HttpSend, Result};

/// Body that records whether it has been dropped, i.e. whether the
/// connection behind it was released.
pub struct TrackedBody {
    data: Option<Bytes>,
    closed: Arc<AtomicBool>,
}

impl http_body::Body for TrackedBody {
    type Data = Bytes;
    type Error = Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _: &mut task::Context<'_>,
    ) -> Poll<Option<std::result::Result<Frame<Bytes>, Error>>> {
        Poll::Ready(self.data.take().map(|bs| Ok(Frame::data(bs))))
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: http::Method,
    pub uri: http::Uri,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

/// MockHttpSend answers every request with the same canned response and
/// records the requests it received.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Bytes,
    pub closed: Arc<AtomicBool>,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new(status: u16, content_type: Option<&'static str>, body: &'static [u8]) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("status must be valid"),
            content_type,
            body: Bytes::from_static(body),
            closed: Arc::new(AtomicBool::new(false)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn json(body: &'static str) -> Self {
        Self::new(200, Some("application/json"), body.as_bytes())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Body>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });

        let body = TrackedBody {
            data: Some(self.body.clone()),
            closed: self.closed.clone(),
        };
        let mut resp = http::Response::builder().status(self.status);
        if let Some(ct) = self.content_type {
            resp = resp.header(CONTENT_TYPE, ct);
        }
        Ok(resp.body(body.boxed_unsync())?)
    }
}

/// FailingHttpSend simulates a connection failure.
#[derive(Debug, Default)]
pub struct FailingHttpSend;

#[async_trait]
impl HttpSend for FailingHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Body>> {
        Err(Error::transport(format!("connect to {} failed", req.uri()))
            .with_source(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)))
    }
}

/// HangingHttpSend accepts requests but never answers them.
#[derive(Debug, Clone, Default)]
pub struct HangingHttpSend {
    started: Arc<AtomicUsize>,
}

impl HangingHttpSend {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpSend for HangingHttpSend {
    async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Body>> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}
