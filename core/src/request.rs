use std::mem;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use http::HeaderValue;

use crate::{Error, Result};

/// Content type of every outgoing request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Media type of a `content-type` value, lowercased and without parameters.
///
/// ```
/// use kraken_rest_core::media_type;
///
/// assert_eq!(media_type("Application/JSON; charset=utf-8"), "application/json");
/// ```
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Signing context for request.
///
/// It takes the parts of a request that are relevant for signing out of the
/// request, lets the signer inspect and rewrite them, and puts them back with
/// [`SigningRequest::apply`].
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP path, as sent on the wire.
    pub path: String,
    /// Form fields decoded from the request body.
    pub form: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::Request.
    ///
    /// The body must be empty or `application/x-www-form-urlencoded`.
    pub fn build(req: &mut http::Request<Bytes>) -> Result<Self> {
        if !req.body().is_empty() {
            if let Some(ct) = req.headers().get(CONTENT_TYPE) {
                if media_type(ct.to_str()?) != FORM_CONTENT_TYPE {
                    return Err(Error::request_invalid(format!(
                        "request body must be {FORM_CONTENT_TYPE} to be signed, got {}",
                        ct.to_str()?
                    )));
                }
            }
        }

        Ok(SigningRequest {
            path: req.uri().path().to_string(),
            form: Self::form_parse(req.body()),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(req.headers_mut()),
        })
    }

    /// Apply the signing context back to http::Request.
    ///
    /// The body is replaced by `body`, which must be the exact bytes that were
    /// signed. Path and query are left untouched.
    pub fn apply(mut self, req: &mut http::Request<Bytes>, body: String) -> Result<()> {
        if !body.is_empty() && !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }

        // Return headers back.
        mem::swap(req.headers_mut(), &mut self.headers);
        *req.body_mut() = Bytes::from(body);

        Ok(())
    }

    /// Get form values for the given key, in the order they appear.
    pub fn form_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.form
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Push a new form pair into form list.
    #[inline]
    pub fn form_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.form.push((key.into(), value.into()));
    }

    /// Parse `application/x-www-form-urlencoded` bytes into owned pairs.
    pub fn form_parse(input: &[u8]) -> Vec<(String, String)> {
        form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Convert form pairs into a `application/x-www-form-urlencoded` string
    /// sorted by key.
    ///
    /// The sort is stable: values sharing a key keep their relative order.
    ///
    /// ```shell
    /// [(b, 2), (a, x y)] => "a=x+y&b=2"
    /// ```
    pub fn form_to_string(form: &[(String, String)]) -> String {
        let mut sorted: Vec<&(String, String)> = form.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut s = form_urlencoded::Serializer::new(String::with_capacity(16));
        for (k, v) in sorted {
            s.append_pair(k, v);
        }
        s.finish()
    }
}
