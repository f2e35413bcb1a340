//! Asynchronous admin API client implementation.

use crate::models::{AdminMessage, TeamLdapMapping, User, UserLdapMapping};
use crate::Result;
use ghe_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder, ADMIN_DEFAULT_TIMEOUT};
use ghe_core::config::EnterpriseConfig;
use ghe_core::error::describe_body;
use ghe_core::Error;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const SERVICE: &str = "admin";
const USER_AGENT: &str = concat!("ghe-admin/", env!("CARGO_PKG_VERSION"));

/// Builder for [`AdminClient`].
#[derive(Debug, Clone)]
pub struct AdminClientBuilder {
    inner: ServiceClientBuilder,
}

impl AdminClientBuilder {
    /// Create a builder for the specified API base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            SERVICE,
            base_url,
            Duration::from_secs(ADMIN_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a validated [`EnterpriseConfig`].
    pub fn from_config(config: &EnterpriseConfig) -> Result<Self> {
        let mut builder = config.service_builder(SERVICE)?;
        if config.user_agent.is_none() {
            builder = builder.with_user_agent(USER_AGENT);
        }
        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, password);
        self
    }

    /// Configure a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AdminClient> {
        let inner = self.inner.build()?;
        Ok(AdminClient { inner })
    }
}

/// Asynchronous admin API client.
///
/// Operations are single round-trips with no retry. Dropping a returned
/// future cancels the request.
#[derive(Clone)]
pub struct AdminClient {
    inner: ServiceClient,
}

impl AdminClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        AdminClientBuilder::new(base_url)?.build()
    }

    /// Wrap an existing transport, sharing its connection pool and credentials.
    #[must_use]
    pub fn from_service_client(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Update the LDAP mapping of a user.
    ///
    /// Only the fields present in `mapping` are sent.
    pub async fn update_user_ldap_mapping(
        &self,
        user: &str,
        mapping: &UserLdapMapping,
    ) -> Result<UserLdapMapping> {
        let path = format!("admin/ldap/users/{user}/mapping");
        self.send_json(Method::PATCH, &path, Some(mapping)).await
    }

    /// Update the LDAP mapping of a team.
    ///
    /// Only the fields present in `mapping` are sent.
    pub async fn update_team_ldap_mapping(
        &self,
        team: i64,
        mapping: &TeamLdapMapping,
    ) -> Result<TeamLdapMapping> {
        let path = format!("admin/ldap/teams/{team}/mapping");
        self.send_json(Method::PATCH, &path, Some(mapping)).await
    }

    /// Create a user.
    ///
    /// The server requires `login` and `email`; they are not checked here.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        self.send_json(Method::POST, "admin/users", Some(user)).await
    }

    /// Rename a user.
    ///
    /// The rename runs as a server-side job; the returned message describes
    /// it and is not followed up on.
    pub async fn rename_user(&self, old_login: &str, new_login: &str) -> Result<AdminMessage> {
        let path = format!("admin/users/{old_login}");
        let body = User::default().with_login(new_login);
        self.send_json(Method::PATCH, &path, Some(&body)).await
    }

    async fn send_json<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.inner
            .send_json(method, path, body, map_status_to_error)
            .await
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    let message = describe_body(&text);
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST => Error::BadRequest(message),
        StatusCode::UNAUTHORIZED => {
            Error::Unauthorized(format!("admin authentication failed: {message}"))
        }
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::CONFLICT => Error::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY => Error::ValidationFailed(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("admin API temporarily unavailable: {message}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("admin API server error {status}: {message}"))
        }
        _ => Error::HttpError(format!("admin API error {status}: {message}")),
    }
}
