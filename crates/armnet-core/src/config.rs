//! Configuration for the resource manager client.
//!
//! [`ArmClientConfig`] carries the endpoint, subscription and API version used by
//! every resource crate, and is validated with `validator` on construction.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Public cloud resource manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com/";

/// API version used for `Microsoft.Network` requests unless overridden.
pub const DEFAULT_API_VERSION: &str = "2023-09-01";

/// Configuration for a resource manager client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ArmClientConfig {
    /// Resource manager base URL
    #[validate(url)]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Subscription every resource lives in
    #[validate(custom(function = "validate_subscription_id"))]
    pub subscription_id: String,

    /// `api-version` query parameter sent with each request
    #[validate(length(min = 10))]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for transient failures
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    60
}

const fn default_max_retries() -> u32 {
    3
}

fn validate_subscription_id(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("subscription_id"))
}

impl ArmClientConfig {
    /// Create a configuration for the given subscription using public cloud defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription ID is not a UUID.
    pub fn new(subscription_id: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            endpoint: default_endpoint(),
            subscription_id: subscription_id.into(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        };
        config.validated()
    }

    /// Validate the configuration, returning it unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the failed fields.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Set the resource manager endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_endpoint(&self) -> Result<Url, Error> {
        Url::parse(&self.endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint URL: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUB: &str = "00000000-1111-2222-3333-444444444444";

    #[test]
    fn test_config_new() {
        let config = ArmClientConfig::new(SUB).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_rejects_bad_subscription() {
        let err = ArmClientConfig::new("my-subscription").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_config_builder() {
        let config = ArmClientConfig::new(SUB)
            .unwrap()
            .with_endpoint("http://localhost:9000/")
            .with_api_version("2022-05-01")
            .with_timeout(30)
            .with_max_retries(0);

        assert_eq!(config.endpoint, "http://localhost:9000/");
        assert_eq!(config.api_version, "2022-05-01");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = ArmClientConfig::new(SUB).unwrap();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        config.max_retries = 11;
        assert!(config.validate().is_err());

        config.max_retries = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_invalid_endpoint() {
        let config = ArmClientConfig::new(SUB).unwrap().with_endpoint("nope");
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let json = format!(r#"{{"subscription_id":"{SUB}"}}"#);
        let config: ArmClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.parse_endpoint().unwrap().host_str(), Some("management.azure.com"));
    }
}
