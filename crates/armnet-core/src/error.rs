//! Error types for networking resource operations.
//!
//! This module provides the error hierarchy shared by every armnet crate,
//! including HTTP status code mapping and structured error responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for networking resource operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Resource manager endpoint is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource ID does not follow the provider layout
    #[error("Invalid resource ID: {0}")]
    InvalidResourceId(String),

    /// Invalid argument passed to a fluent setter or operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// More than one child could serve as the default
    #[error("Ambiguous default: {0}")]
    AmbiguousDefault(String),

    /// A child references a sibling that does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for service: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected because of authentication or authorization
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error reported by the resource provider in an error envelope
    #[error("Provider error: {code}: {message}")]
    ProviderError {
        /// Provider error code
        code: String,
        /// Error message
        message: String,
    },

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for networking resource operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
    /// Optional request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error envelope returned by the resource manager (`{"error": {...}}`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProviderErrorEnvelope {
    /// Wrapped error body
    pub error: ProviderErrorBody,
}

/// Body of a resource manager error envelope.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProviderErrorBody {
    /// Provider error code (e.g. `InUseSubnetCannotBeDeleted`)
    pub code: String,
    /// Provider error message
    #[serde(default)]
    pub message: String,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidResourceId(_) => "INVALID_RESOURCE_ID",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::AmbiguousDefault(_) => "AMBIGUOUS_DEFAULT",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Conflict(_) => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ProviderError { .. } => "PROVIDER_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Builds an error from a non-success response body.
    ///
    /// Bodies carrying a provider error envelope become [`Error::ProviderError`];
    /// anything else falls back to [`Error::HttpError`] with the raw text.
    #[must_use]
    pub fn from_provider_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProviderErrorEnvelope>(body) {
            Ok(envelope) => Self::ProviderError {
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => Self::HttpError(format!("status {status}: {body}")),
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Converts the error into an `ErrorResponse` with a request ID.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: None,
            },
            request_id,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_) | Self::ConfigError(_) | Self::ProviderError { .. }
        )
    }

    /// Returns true for failures that a retry may resolve.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
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
        Self::ValidationError(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::ConfigError(format!("invalid subscription ID: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            Error::InvalidResourceId("test".to_string()).error_code(),
            "INVALID_RESOURCE_ID"
        );
        assert_eq!(
            Error::InvalidArgument("test".to_string()).error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            Error::AmbiguousDefault("test".to_string()).error_code(),
            "AMBIGUOUS_DEFAULT"
        );
        assert_eq!(
            Error::InvalidReference("test".to_string()).error_code(),
            "INVALID_REFERENCE"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::Unauthorized("test".to_string()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            Error::ProviderError {
                code: "test".to_string(),
                message: "msg".to_string()
            }
            .error_code(),
            "PROVIDER_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::InternalError("test".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::AmbiguousDefault("3 private frontends".to_string());
        assert_eq!(err.to_string(), "Ambiguous default: 3 private frontends");

        let err = Error::ProviderError {
            code: "InUseSubnetCannotBeDeleted".to_string(),
            message: "subnet is in use".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Provider error: InUseSubnetCannotBeDeleted: subnet is in use"
        );
    }

    #[test]
    fn test_from_provider_body_with_envelope() {
        let body = r#"{"error":{"code":"InvalidResourceName","message":"bad name"}}"#;
        let err = Error::from_provider_body(400, body);
        assert_eq!(
            err,
            Error::ProviderError {
                code: "InvalidResourceName".to_string(),
                message: "bad name".to_string()
            }
        );
    }

    #[test]
    fn test_from_provider_body_plain_text() {
        let err = Error::from_provider_body(400, "oops");
        assert_eq!(err, Error::HttpError("status 400: oops".to_string()));
    }

    #[test]
    fn test_into_error_response() {
        let err = Error::NotFound("vnet-1".to_string());
        let response = err.clone().into_error_response();

        assert_eq!(response.error.code, "NOT_FOUND");
        assert_eq!(response.error.message, "Not found: vnet-1");
        assert!(response.request_id.is_none());

        let response_with_id = err.into_error_response_with_id(Some("req-456".to_string()));
        assert_eq!(response_with_id.request_id, Some("req-456".to_string()));
    }

    #[test]
    fn test_should_log() {
        assert!(Error::InternalError("test".to_string()).should_log());
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::ProviderError {
            code: "test".to_string(),
            message: "msg".to_string()
        }
        .should_log());

        assert!(!Error::NotFound("test".to_string()).should_log());
        assert!(!Error::InvalidArgument("test".to_string()).should_log());
    }

    #[test]
    fn test_is_transient() {
        assert!(Error::Timeout("t".to_string()).is_transient());
        assert!(Error::ServiceUnavailable("t".to_string()).is_transient());
        assert!(!Error::NotFound("t".to_string()).is_transient());
        assert!(!Error::Conflict("t".to_string()).is_transient());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_uuid_error() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let converted: Error = err.into();
        assert_eq!(converted.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::ParseError(_)));
    }

    #[test]
    fn test_error_response_serialization_no_request_id() {
        let response = ErrorResponse {
            error: ErrorDetail {
                code: "TEST_ERROR".to_string(),
                message: "Test message".to_string(),
                details: None,
            },
            request_id: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("TEST_ERROR"));
        assert!(!json.contains("request_id"));
    }
}
