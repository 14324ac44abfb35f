// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};

use kraken_rest_core::hash::base64_decode;
use kraken_rest_core::utils::Redact;
use kraken_rest_core::{Error, Result, SigningCredential};

/// Credential for the Kraken REST API.
///
/// The secret is decoded once here; it is immutable afterwards and shared
/// read-only by every signing operation.
#[derive(Clone)]
pub struct Credential {
    /// Api key sent in the `API-Key` header.
    pub api_key: String,
    /// Decoded private key used as HMAC key.
    pub secret: Vec<u8>,
}

impl Credential {
    /// Create a new credential from the api key and the base64 encoded secret.
    ///
    /// A secret that is not valid base64 is a permanent configuration error.
    pub fn new(api_key: impl Into<String>, secret: &str) -> Result<Self> {
        let api_key = api_key.into();
        let secret = base64_decode(secret).map_err(|e| {
            Error::config_invalid(format!(
                "api secret for key {:?} is not valid base64",
                Redact::from(&api_key)
            ))
            .with_source(e)
        })?;

        Ok(Self { api_key, secret })
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("secret", &Redact::from(&self.secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret.is_empty()
    }
}
