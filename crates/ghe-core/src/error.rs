//! Error types for GitHub Enterprise API operations.
//!
//! Every failure an operation can produce is one of two kinds: the request
//! could not be constructed, or the transport/decode step failed. Both are
//! reported through [`Error`]; HTTP status codes are folded into dedicated
//! variants by each API crate's status mapper.

use serde::Deserialize;
use thiserror::Error;

/// Main error type for GitHub Enterprise API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Request could not be built (bad path, unserializable body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Base URL or joined endpoint is malformed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Server could not be reached or reported itself unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Operation timed out
    #[error("Timeout waiting for server: {0}")]
    Timeout(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or rejected credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Server rejected the payload's fields (422)
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Specialized result type for GitHub Enterprise API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error document returned by the API alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Human-readable summary
    #[serde(default)]
    pub message: String,
    /// Per-field failures, mostly on 422
    #[serde(default)]
    pub errors: Vec<ApiFieldError>,
    /// Link to the API documentation for the failing endpoint
    #[serde(default)]
    pub documentation_url: Option<String>,
}

/// A single field failure inside an [`ApiErrorBody`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApiFieldError {
    /// Resource the field belongs to
    #[serde(default)]
    pub resource: String,
    /// Field name
    #[serde(default)]
    pub field: String,
    /// Machine-readable failure code (`missing_field`, `already_exists`, ...)
    #[serde(default)]
    pub code: String,
    /// Free-form message, used with code `custom`
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, returning `None` when it is not the API's JSON shape.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str::<Self>(text)
            .ok()
            .filter(|body| !body.message.is_empty())
    }

    /// Render the body as a single line, e.g. `Validation Failed [User.login: already_exists]`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return self.message.clone();
        }

        let details: Vec<String> = self
            .errors
            .iter()
            .map(|err| match &err.message {
                Some(message) if !message.is_empty() => message.clone(),
                _ => format!("{}.{}: {}", err.resource, err.field, err.code),
            })
            .collect();

        format!("{} [{}]", self.message, details.join(", "))
    }
}

/// Build an error message from a raw response body, preferring the API's JSON summary.
#[must_use]
pub fn describe_body(text: &str) -> String {
    ApiErrorBody::parse(text).map_or_else(|| text.to_string(), |body| body.summary())
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::ParseError(_) => "PARSE_ERROR",
        }
    }

    /// Returns true for failures of the transport itself rather than API refusals.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable(_) | Self::Timeout(_) | Self::ConfigError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let cases = [
            (Error::InvalidRequest("x".into()), "INVALID_REQUEST"),
            (Error::InvalidEndpoint("x".into()), "INVALID_ENDPOINT"),
            (Error::ConfigError("x".into()), "CONFIG_ERROR"),
            (Error::ServiceUnavailable("x".into()), "SERVICE_UNAVAILABLE"),
            (Error::Timeout("x".into()), "TIMEOUT"),
            (Error::HttpError("x".into()), "HTTP_ERROR"),
            (Error::BadRequest("x".into()), "BAD_REQUEST"),
            (Error::Unauthorized("x".into()), "UNAUTHORIZED"),
            (Error::Forbidden("x".into()), "FORBIDDEN"),
            (Error::NotFound("x".into()), "NOT_FOUND"),
            (Error::Conflict("x".into()), "CONFLICT"),
            (Error::ValidationFailed("x".into()), "VALIDATION_FAILED"),
            (Error::ParseError("x".into()), "PARSE_ERROR"),
        ];

        for (err, code) in cases {
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("user octocat".to_string());
        assert_eq!(err.to_string(), "Not found: user octocat");

        let err = Error::InvalidRequest("path must be relative".to_string());
        assert_eq!(err.to_string(), "Invalid request: path must be relative");
    }

    #[test]
    fn test_should_log() {
        assert!(Error::ServiceUnavailable("down".to_string()).should_log());
        assert!(Error::Timeout("slow".to_string()).should_log());
        assert!(!Error::NotFound("missing".to_string()).should_log());
        assert!(!Error::ValidationFailed("bad".to_string()).should_log());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::ParseError(_)));
    }

    #[test]
    fn test_api_error_body_summary() {
        let text = r#"{
            "message": "Validation Failed",
            "errors": [
                {"resource": "User", "field": "login", "code": "already_exists"},
                {"resource": "User", "field": "email", "code": "custom", "message": "email is reserved"}
            ],
            "documentation_url": "https://developer.github.com/enterprise/v3/users/administration/"
        }"#;

        let body = ApiErrorBody::parse(text).unwrap();
        assert_eq!(body.errors.len(), 2);
        assert_eq!(
            body.summary(),
            "Validation Failed [User.login: already_exists, email is reserved]"
        );
    }

    #[test]
    fn test_describe_body_falls_back_to_raw_text() {
        assert_eq!(describe_body("upstream exploded"), "upstream exploded");
        assert_eq!(describe_body(r#"{"message":"Not Found"}"#), "Not Found");
        assert_eq!(describe_body(r#"{"unrelated":true}"#), r#"{"unrelated":true}"#);
    }

    #[test]
    fn test_error_clone_and_eq() {
        let err = Error::Conflict("exists".to_string());
        assert_eq!(err.clone(), err);
        assert_ne!(err, Error::Conflict("other".to_string()));
    }
}
