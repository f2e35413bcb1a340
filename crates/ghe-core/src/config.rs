//! Connection configuration for GitHub Enterprise clients.
//!
//! [`EnterpriseConfig`] is the serializable, validated description of where
//! the API lives and how to authenticate against it. API crates turn it into
//! a [`ServiceClientBuilder`](crate::client::ServiceClientBuilder).

use crate::client::{ServiceClientBuilder, ADMIN_DEFAULT_TIMEOUT};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a GitHub Enterprise API client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnterpriseConfig {
    /// API base URL (e.g. `https://ghe.example.com/api/v3/`)
    #[validate(url)]
    pub api_url: String,

    /// Access token; never serialized and redacted from `Debug`
    #[serde(default, skip_serializing, deserialize_with = "deserialize_token")]
    pub token: Option<SecretString>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional `User-Agent` override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    ADMIN_DEFAULT_TIMEOUT
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl EnterpriseConfig {
    /// Create a new configuration for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            token: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_url).map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))
    }

    /// Validate the configuration and produce a transport builder for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when validation fails, or
    /// [`Error::InvalidEndpoint`] when the URL cannot serve as a base.
    pub fn service_builder(&self, service: &'static str) -> Result<ServiceClientBuilder, Error> {
        self.validate()?;

        let mut builder = ServiceClientBuilder::new(service, &self.api_url, self.timeout())?
            .with_tls_verify(self.tls_verify);

        if let Some(token) = &self.token {
            builder = builder.with_token(token.expose_secret());
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.with_user_agent(user_agent.clone());
        }

        Ok(builder)
    }
}

impl Default for EnterpriseConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api/v3/".to_string(),
            token: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
        }
    }
}
