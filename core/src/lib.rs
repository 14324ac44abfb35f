//! Core components for signing and dispatching Kraken REST API requests.
//!
//! This crate provides the foundational types and traits for the kraken-rest ecosystem.
//! It defines the abstractions the service crate builds its request pipeline on.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds the http transport, environment access and nonce source
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and request authorization (`SignRequest`)
//! - **Signer**: The orchestrator that loads the credential once and authorizes every request
//!
//! ## Example
//!
//! ```no_run
//! use kraken_rest_core::{Context, Signer, ProvideCredential, SignRequest, SigningCredential, Result};
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential { key: "my-api-key".to_string() }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! #[async_trait]
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut http::Request<Bytes>,
//!         cred: Option<&Self::Credential>,
//!     ) -> Result<()> {
//!         if let Some(cred) = cred {
//!             req.headers_mut().insert("x-api-key", cred.key.parse()?);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::default(), MyLoader, MyBuilder);
//!
//! let mut req = http::Request::post("https://api.kraken.com/0/private/Balance")
//!     .body(Bytes::new())?;
//! signer.sign(&CancellationToken::new(), &mut req).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{Context, Env, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};
mod http;
pub use self::http::{collect_body, Body, HttpSend};
mod nonce;
pub use nonce::{ClockNonceSource, CounterNonceSource, NonceSource};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::{media_type, SigningRequest, FORM_CONTENT_TYPE};
mod signer;
pub use signer::Signer;
