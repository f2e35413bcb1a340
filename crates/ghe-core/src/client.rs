//! HTTP transport shared by the API crates.
//!
//! [`ServiceClient`] owns the base URL, credentials and the pooled
//! `reqwest` client. API crates hand it a relative path, an optional body and
//! a status mapper; it performs exactly one round-trip per call. There is no
//! retry loop here: a failed request is reported to the caller as-is.
//!
//! Every call is an ordinary future. Dropping it (for example through
//! `tokio::time::timeout` or `tokio::select!`) aborts the in-flight request.

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for admin API requests, in seconds
pub const ADMIN_DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout, in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default idle timeout for connection pools, in seconds
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Media type requested from the API unless overridden
pub const DEFAULT_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

const DEFAULT_USER_AGENT: &str = concat!("ghe-core/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
///
/// Configures timeouts, connection pooling and logging of the underlying
/// `reqwest` client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(ADMIN_DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum Credentials {
    Token(SecretString),
    Basic {
        username: String,
        password: SecretString,
    },
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: &'static str,
    base_url: Url,
    http_config: ClientConfig,
    user_agent: String,
    media_type: String,
    credentials: Option<Credentials>,
    tls_verify: bool,
}

impl ServiceClientBuilder {
    /// Create a builder for `service` rooted at `base_url`.
    ///
    /// A trailing slash is appended to the base path when missing so that
    /// relative operation paths resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL cannot be parsed or
    /// cannot serve as a base.
    pub fn new(service: &'static str, base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url.as_ref())?;

        Ok(Self {
            service,
            base_url,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            credentials: None,
            tls_verify: true,
        })
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the `Accept` media type.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Authenticate with an OAuth or personal access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Token(SecretString::from(token.into())));
        self
    }

    /// Authenticate with HTTP basic credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        });
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(self.http_config.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression);

        if !self.tls_verify {
            warn!(service = self.service, "TLS verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!(
                "Failed to build {} HTTP client: {err}",
                self.service
            ))
        })?;

        let media_type = HeaderValue::from_str(&self.media_type).map_err(|err| {
            Error::ConfigError(format!("Invalid media type `{}`: {err}", self.media_type))
        })?;

        Ok(ServiceClient {
            service: self.service,
            http,
            base_url: self.base_url,
            media_type,
            credentials: self.credentials,
            enable_logging: self.http_config.enable_logging,
        })
    }
}

/// Shared HTTP transport for API operation handles.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ServiceClient {
    service: &'static str,
    http: Client,
    base_url: Url,
    media_type: HeaderValue,
    credentials: Option<Credentials>,
    enable_logging: bool,
}

impl ServiceClient {
    /// Return the base URL all operation paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the service label used in log records.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Resolve a relative operation path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for empty or absolute paths and for
    /// paths that would escape the base URL.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.is_empty() || path.starts_with('/') {
            return Err(Error::InvalidRequest(format!(
                "path `{path}` must be relative to the API base URL"
            )));
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))?;

        let base = &self.base_url;
        let same_origin = url.scheme() == base.scheme()
            && url.host_str() == base.host_str()
            && url.port_or_known_default() == base.port_or_known_default();

        if !same_origin || !url.path().starts_with(base.path()) {
            return Err(Error::InvalidRequest(format!(
                "path `{path}` resolves outside the API base URL"
            )));
        }

        Ok(url)
    }

    /// Send a single request and return the successful response.
    ///
    /// `customize` can attach headers or a body. Non-2xx responses are read
    /// as text and turned into an error by `map_status`.
    ///
    /// # Errors
    ///
    /// Returns request-construction errors from [`Self::build_url`],
    /// transport errors converted from `reqwest`, or whatever `map_status`
    /// produces for a non-success status.
    pub async fn execute<F, M>(
        &self,
        method: Method,
        path: &str,
        customize: F,
        map_status: M,
    ) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
        M: FnOnce(StatusCode, String) -> Error,
    {
        let url = self.build_url(path)?;

        if self.enable_logging {
            debug!(service = self.service, %method, path, "sending request");
        }

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, self.media_type.clone());
        request = self.authorize(request);
        request = customize(request);

        let response = request.send().await.map_err(|err| {
            let error = Error::from(err);
            if error.should_log() {
                warn!(service = self.service, path, %error, "request failed");
            }
            error
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let error = map_status(status, text);
        if error.should_log() {
            warn!(service = self.service, path, %status, %error, "server reported failure");
        }
        Err(error)
    }

    /// Send `body` as JSON (when present) and decode the JSON response as `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the body cannot be serialized,
    /// [`Error::ParseError`] if the response cannot be decoded, and any error
    /// from [`Self::execute`].
    ///
    /// An empty success body is decoded as `{}`, so a record type comes back
    /// with every field absent.
    pub async fn send_json<B, R, M>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        map_status: M,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
        M: FnOnce(StatusCode, String) -> Error,
    {
        let payload = body.map(serde_json::to_vec).transpose().map_err(|err| {
            Error::InvalidRequest(format!("Failed to serialize body for `{path}`: {err}"))
        })?;

        let response = self
            .execute(
                method,
                path,
                |mut request| {
                    if let Some(bytes) = payload {
                        request = request.header(CONTENT_TYPE, "application/json").body(bytes);
                    }
                    request
                },
                map_status,
            )
            .await?;

        let bytes = response.bytes().await?;
        let document: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            &b"{}"[..]
        } else {
            &bytes[..]
        };

        serde_json::from_slice(document).map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(Credentials::Token(token)) => request.bearer_auth(token.expose_secret()),
            Some(Credentials::Basic { username, password }) => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
            None => request,
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|err| Error::InvalidEndpoint(format!("Invalid base URL `{raw}`: {err}")))?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "`{raw}` cannot be used as a base URL"
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::InvalidEndpoint(format!(
            "base URL `{raw}` must not carry a query or fragment"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
