use std::fmt::{Debug, Formatter};

use super::constants::*;
use kraken_rest_core::utils::Redact;
use kraken_rest_core::Context;

/// Config carries all the configuration for the Kraken spot REST client.
#[derive(Clone)]
pub struct Config {
    /// `api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `KRAKEN_API_KEY`
    pub api_key: Option<String>,
    /// `api_secret` is the base64 encoded private key, it will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `KRAKEN_API_SECRET`
    pub api_secret: Option<String>,
    /// `base_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `KRAKEN_BASE_URL`
    /// - default to `https://api.kraken.com`
    pub base_url: Option<String>,
    /// `user_agent` is attached to every request.
    ///
    /// - default to `kraken-rest/<version>`
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(Redact::from))
            .field("api_secret", &self.api_secret.as_ref().map(Redact::from))
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(KRAKEN_API_KEY) {
            self.api_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(KRAKEN_API_SECRET) {
            self.api_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(KRAKEN_BASE_URL) {
            self.base_url.get_or_insert(v);
        }

        self
    }

    /// Base url with any trailing `/` removed.
    pub(crate) fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}
