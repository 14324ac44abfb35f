//! Kraken spot REST API signing and dispatch for kraken-rest.
//!
//! This crate authorizes and sends requests to the Kraken spot REST API and
//! classifies the responses. Endpoint specific schemas are not part of it:
//! callers decode JSON into their own types and read binary exports as
//! streams.
//!
//! ## Overview
//!
//! Private requests carry a nonce and an optional one-time password in their
//! form body, are signed with HMAC-SHA512 over the path and the SHA256 of
//! `nonce + body`, and send the api key and signature in the `API-Key` and
//! `API-Sign` headers. Public requests (paths containing `/public/`) go out
//! unsigned.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kraken_rest_core::{Context, OsEnv};
//! use kraken_rest_http_send_reqwest::ReqwestHttpSend;
//! use kraken_rest_spot::{Client, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> kraken_rest_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads KRAKEN_API_KEY and KRAKEN_API_SECRET when they are set.
//!     let config = Config::default().from_env(&ctx);
//!     let client = Client::new(ctx, config)?;
//!
//!     let cancel = CancellationToken::new();
//!     let time = client.server_time(&cancel).await?;
//!     println!("server time: {:?}", time.result);
//!
//!     let balance = client.balance(&cancel, None).await?;
//!     if !balance.error.is_empty() {
//!         println!("exchange reported: {:?}", balance.error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! The pipeline reports transport and protocol failures only. A call that
//! returns `Ok` may still carry business errors in [`Envelope::error`].
//!
//! ## Public-only mode
//!
//! A client built without credentials can call public endpoints. Every
//! private call fails with `ErrorKind::CredentialInvalid` before any network
//! I/O.

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{is_public_path, sign, RequestSigner, SignedFields};

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::{Client, Envelope, Payload, Request, ServerTime};
