//! Gate configuration.
//!
//! Provides [`GateConfig`] for configuring the HookGate server. Values are
//! loaded from environment variables; the shared secret is never part of the
//! serialized or debug representation.

use std::fmt;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{HookGateError, HookGateResult};

/// HookGate configuration.
///
/// # Examples
///
/// ```
/// use hookgate_core::GateConfig;
///
/// let config = GateConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8080");
/// assert!(config.auth_token.is_none());
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    /// Bind address for the gateway (e.g. `"0.0.0.0:8080"`).
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// Shared secret (the sender's auth token). When absent every request is rejected.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,

    /// Substring removed from the request URL before signing, for deployments
    /// behind a reverse proxy that rewrites the path.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub remove_url_part: Option<String>,

    /// Scheme used to rebuild the request URL when the request line carries
    /// only a path.
    #[builder(default = String::from("https"))]
    pub url_scheme: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8080"),
            auth_token: None,
            remove_url_part: None,
            url_scheme: String::from("https"),
            log_level: String::from("info"),
        }
    }
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("remove_url_part", &self.remove_url_part)
            .field("url_scheme", &self.url_scheme)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl GateConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `TWILIO_AUTH_TOKEN` | *(unset)* |
    /// | `HOOKGATE_REMOVE_URL_PART` | *(unset)* |
    /// | `HOOKGATE_URL_SCHEME` | `https` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// Empty values for the optional variables are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        config.auth_token = lookup("TWILIO_AUTH_TOKEN").filter(|v| !v.is_empty());
        config.remove_url_part = lookup("HOOKGATE_REMOVE_URL_PART").filter(|v| !v.is_empty());
        if let Some(v) = lookup("HOOKGATE_URL_SCHEME") {
            config.url_scheme = v.to_ascii_lowercase();
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the configuration can be served.
    ///
    /// A missing auth token is not an error: the gate then rejects everything.
    pub fn validate(&self) -> HookGateResult<()> {
        if self.gateway_listen.is_empty() {
            return Err(HookGateError::Config("gateway_listen is empty".to_owned()));
        }
        if !matches!(self.url_scheme.as_str(), "http" | "https") {
            return Err(HookGateError::InvalidScheme(self.url_scheme.clone()));
        }
        Ok(())
    }
}
