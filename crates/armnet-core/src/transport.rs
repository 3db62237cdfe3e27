//! HTTP transport for resource manager requests.
//!
//! [`ResourceTransport`] is the seam between the fluent wrappers and the wire:
//! it moves untyped JSON documents to and from resource paths. [`ArmClient`]
//! implements it with `reqwest`; [`ArmContext`] binds a transport to a
//! subscription and API version and adds typed helpers on top.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

use crate::client::{ClientConfig, RetryPolicy, ARM_CONNECT_TIMEOUT};
use crate::config::{ArmClientConfig, DEFAULT_API_VERSION};
use crate::error::{Error, Result};
use crate::query::QueryParams;
use crate::resource_id::ResourceId;
use crate::types::Page;

const USER_AGENT: &str = concat!("armnet/", env!("CARGO_PKG_VERSION"));

/// Moves JSON documents between the SDK and resource paths.
///
/// Paths are resource IDs or collection paths starting with `/subscriptions/`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceTransport: Send + Sync {
    /// GET a single document.
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value>;

    /// PUT a document and return the provider's representation of it.
    async fn put(&self, path: &str, query: &QueryParams, body: Value) -> Result<Value>;

    /// DELETE a resource.
    async fn delete(&self, path: &str, query: &QueryParams) -> Result<()>;

    /// GET a collection, following `nextLink` until exhausted.
    async fn list(&self, path: &str, query: &QueryParams) -> Result<Vec<Value>>;

    /// POST an action (`/start`, `/reset`, ...). Actions are sent at most once;
    /// an accepted action may come back with an empty (`null`) body.
    async fn post(&self, path: &str, query: &QueryParams, body: Option<Value>) -> Result<Value>;
}

/// Builder for [`ArmClient`].
pub struct ArmClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    token: Option<SecretString>,
}

impl ArmClientBuilder {
    /// Create a new builder from the provided base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid resource manager URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            token: None,
        })
    }

    /// Create a builder from an [`ArmClientConfig`], applying its timeout and retry limit.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured endpoint is invalid.
    pub fn from_config(config: &ArmClientConfig) -> Result<Self> {
        let base_url = config.parse_endpoint()?;
        let retry_policy = RetryPolicy::new().with_max_retries(config.max_retries);
        Ok(Self {
            base_url,
            http_config: ClientConfig::new()
                .with_timeout(config.timeout())
                .with_retry_policy(retry_policy),
            token: None,
        })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Build the client instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ArmClient> {
        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(ARM_CONNECT_TIMEOUT));

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build HTTP client: {err}"))
        })?;

        Ok(ArmClient {
            http,
            base_url: self.base_url,
            retry_policy: self.http_config.retry_policy,
            token: self.token,
        })
    }
}

/// `reqwest`-backed [`ResourceTransport`].
pub struct ArmClient {
    http: Client,
    base_url: Url,
    retry_policy: RetryPolicy,
    token: Option<SecretString>,
}

impl ArmClient {
    /// Construct directly from a base URL, without authentication.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ArmClientBuilder::new(base_url)?.build()
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);
        self.base_url
            .join(normalized)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid resource path `{path}`: {err}")))
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut last_error: Option<Error> = None;
        let mut attempt = 0;
        let path = url.path().to_string();
        // POST actions are not idempotent and are sent once.
        let max_retries = if method == Method::POST {
            0
        } else {
            self.retry_policy.max_retries
        };

        loop {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .query(query)
                .header("Accept", "application/json");

            if let Some(token) = &self.token {
                request = request.bearer_auth(token.expose_secret());
            }
            if let Some(payload) = body {
                request = request.json(payload);
            }

            info!(method = %method, path = %path, attempt, "resource manager request");

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let bytes = response.bytes().await.map_err(|err| {
                        Error::HttpError(format!("Failed to read response body: {err}"))
                    })?;

                    if status.is_success() {
                        return decode_body(&path, status, &bytes);
                    }

                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    let error = match status {
                        StatusCode::NOT_FOUND => return Err(Error::NotFound(path)),
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            return Err(Error::Unauthorized(text))
                        }
                        StatusCode::CONFLICT => return Err(Error::Conflict(text)),
                        StatusCode::TOO_MANY_REQUESTS
                        | StatusCode::BAD_GATEWAY
                        | StatusCode::SERVICE_UNAVAILABLE
                        | StatusCode::GATEWAY_TIMEOUT => Error::ServiceUnavailable(format!(
                            "resource manager temporarily unavailable: {text}"
                        )),
                        status if status.is_server_error() => Error::ServiceUnavailable(
                            format!("resource manager error {status}: {text}"),
                        ),
                        status => return Err(Error::from_provider_body(status.as_u16(), &text)),
                    };
                    last_error = Some(error);
                }
                Err(err) => {
                    let error = Error::from(err);
                    if error.is_transient() {
                        last_error = Some(error);
                    } else {
                        return Err(error);
                    }
                }
            }

            attempt += 1;
            if attempt > max_retries {
                break;
            }
            let delay = self.retry_policy.delay_for_attempt(attempt);
            if delay > Duration::from_millis(0) {
                debug!("Retrying resource manager request after {:?}", delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::ServiceUnavailable("resource manager request failed after retries".to_string())
        }))
    }
}

fn decode_body(path: &str, status: StatusCode, bytes: &[u8]) -> Result<Value> {
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|err| Error::ParseError(format!("Failed to parse response for `{path}`: {err}")))
}

#[async_trait]
impl ResourceTransport for ArmClient {
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value> {
        let url = self.build_url(path)?;
        self.execute(Method::GET, url, query.pairs(), None).await
    }

    async fn put(&self, path: &str, query: &QueryParams, body: Value) -> Result<Value> {
        let url = self.build_url(path)?;
        let created = self.execute(Method::PUT, url, query.pairs(), Some(&body)).await?;
        if created.is_null() {
            // Accepted without a body; read back the provider's view.
            debug!(path, "PUT returned no body, reading resource back");
            return self.get(path, query).await;
        }
        Ok(created)
    }

    async fn delete(&self, path: &str, query: &QueryParams) -> Result<()> {
        let url = self.build_url(path)?;
        self.execute(Method::DELETE, url, query.pairs(), None)
            .await
            .map(|_| ())
    }

    async fn list(&self, path: &str, query: &QueryParams) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut url = self.build_url(path)?;
        let mut pairs = query.pairs();

        loop {
            let body = self.execute(Method::GET, url, pairs, None).await?;
            let page: Page<Value> = serde_json::from_value(body).map_err(|err| {
                Error::ParseError(format!("Failed to parse page for `{path}`: {err}"))
            })?;
            items.extend(page.value);

            match page.next_link {
                Some(next) if !next.is_empty() => {
                    url = Url::parse(&next)?;
                    // nextLink already carries the query string.
                    pairs = &[];
                }
                _ => return Ok(items),
            }
        }
    }

    async fn post(&self, path: &str, query: &QueryParams, body: Option<Value>) -> Result<Value> {
        let url = self.build_url(path)?;
        self.execute(Method::POST, url, query.pairs(), body.as_ref())
            .await
    }
}

/// A transport bound to a subscription and API version, with typed helpers.
#[derive(Clone)]
pub struct ArmContext {
    transport: Arc<dyn ResourceTransport>,
    subscription_id: String,
    api_version: String,
}

impl std::fmt::Debug for ArmContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmContext")
            .field("subscription_id", &self.subscription_id)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl ArmContext {
    /// Bind a transport to a subscription using the default API version.
    #[must_use]
    pub fn new(transport: Arc<dyn ResourceTransport>, subscription_id: impl Into<String>) -> Self {
        Self {
            transport,
            subscription_id: subscription_id.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Build an [`ArmClient`] from configuration and a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid.
    pub fn from_config(config: &ArmClientConfig, token: impl Into<String>) -> Result<Self> {
        let client = ArmClientBuilder::from_config(config)?
            .with_token(token)
            .build()?;
        Ok(Self::new(Arc::new(client), config.subscription_id.clone())
            .with_api_version(config.api_version.clone()))
    }

    /// Override the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Subscription this context operates in.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// API version sent with each request.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// ID of a top-level networking resource in this subscription.
    #[must_use]
    pub fn resource_id(&self, resource_group: &str, resource_type: &str, name: &str) -> ResourceId {
        ResourceId::network(&self.subscription_id, resource_group, resource_type, name)
    }

    /// Collection path of a resource type inside a resource group.
    #[must_use]
    pub fn resource_group_path(&self, resource_group: &str, resource_type: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{resource_group}/providers/{}/{resource_type}",
            self.subscription_id,
            crate::resource_id::NETWORK_NAMESPACE
        )
    }

    /// Collection path of a resource type across the subscription.
    #[must_use]
    pub fn subscription_path(&self, resource_type: &str) -> String {
        format!(
            "/subscriptions/{}/providers/{}/{resource_type}",
            self.subscription_id,
            crate::resource_id::NETWORK_NAMESPACE
        )
    }

    fn query(&self) -> QueryParams {
        QueryParams::with_api_version(&self.api_version)
    }

    /// Fetch and decode a document.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and returns [`Error::ParseError`] on decode failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.transport.get(path, &self.query()).await?;
        decode(path, value)
    }

    /// Fetch a document with extra query parameters.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and returns [`Error::ParseError`] on decode failure.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&'static str, String)],
    ) -> Result<T> {
        let mut query = self.query();
        for (key, value) in extra {
            query.push(*key, value);
        }
        let value = self.transport.get(path, &query).await?;
        decode(path, value)
    }

    /// Fetch a document, mapping [`Error::NotFound`] to `None`.
    ///
    /// # Errors
    ///
    /// Propagates every other transport or decode error.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Serialize and PUT a document, decoding the provider's response.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and returns [`Error::ParseError`] on (de)serialization failure.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(body)?;
        let value = self.transport.put(path, &self.query(), payload).await?;
        decode(path, value)
    }

    /// DELETE a resource.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.transport.delete(path, &self.query()).await
    }

    /// List and decode a collection.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and returns [`Error::ParseError`] on decode failure.
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.transport
            .list(path, &self.query())
            .await?
            .into_iter()
            .map(|value| decode(path, value))
            .collect()
    }

    /// POST an action and decode its result.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and returns [`Error::ParseError`] on decode failure.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> Result<T> {
        let value = self.transport.post(path, &self.query(), body).await?;
        decode(path, value)
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|err| Error::ParseError(format!("Failed to decode `{path}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VNET: &str =
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet1";

    fn client(server: &MockServer) -> ArmClient {
        ArmClientBuilder::new(server.uri())
            .unwrap()
            .with_token("secret-token")
            .with_retry_policy(
                RetryPolicy::new()
                    .with_max_retries(2)
                    .with_initial_delay(Duration::from_millis(1)),
            )
            .build()
            .unwrap()
    }

    fn query() -> QueryParams {
        QueryParams::with_api_version("2023-09-01")
    }

    #[tokio::test]
    async fn get_sends_token_and_api_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VNET))
            .and(query_param("api-version", "2023-09-01"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "vnet1"})))
            .mount(&server)
            .await;

        let value = client(&server).get(VNET, &query()).await.unwrap();
        assert_eq!(value["name"], "vnet1");
    }

    #[tokio::test]
    async fn get_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VNET))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).get(VNET, &query()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn provider_error_envelope_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(VNET))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": "NetcfgInvalidSubnet", "message": "Subnet is not valid"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .put(VNET, &query(), json!({"location": "westus"}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::ProviderError {
                code: "NetcfgInvalidSubnet".into(),
                message: "Subnet is not valid".into()
            }
        );
    }

    #[tokio::test]
    async fn transient_failure_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VNET))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(VNET))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "vnet1"})))
            .mount(&server)
            .await;

        let value = client(&server).get(VNET, &query()).await.unwrap();
        assert_eq!(value["name"], "vnet1");
    }

    #[tokio::test]
    async fn post_action_is_not_retried() {
        let server = MockServer::start().await;
        let action = format!("{VNET}/restart");
        Mock::given(method("POST"))
            .and(path(action.as_str()))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).post(&action, &query(), None).await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn retries_exhausted_returns_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VNET))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server).get(VNET, &query()).await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn put_without_body_reads_back() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(VNET))
            .and(body_json(json!({"location": "westus"})))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(VNET))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "vnet1"})))
            .expect(1)
            .mount(&server)
            .await;

        let value = client(&server)
            .put(VNET, &query(), json!({"location": "westus"}))
            .await
            .unwrap();
        assert_eq!(value["name"], "vnet1");
    }

    #[tokio::test]
    async fn list_follows_next_link() {
        let server = MockServer::start().await;
        let collection =
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks";
        Mock::given(method("GET"))
            .and(path(collection))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "a"}],
                "nextLink": format!("{}/page2?api-version=2023-09-01", server.uri())
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "b"}]})))
            .mount(&server)
            .await;

        let items = client(&server).list(collection, &query()).await.unwrap();
        let names: Vec<_> = items.iter().map(|v| v["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn context_decodes_typed_documents() {
        let mut transport = MockResourceTransport::new();
        transport
            .expect_get()
            .withf(|path, query| {
                path == VNET
                    && query.pairs().to_vec() == vec![("api-version", "2022-01-01".to_string())]
            })
            .returning(|_, _| Ok(json!({"name": "vnet1"})));

        let context = ArmContext::new(Arc::new(transport), "sub").with_api_version("2022-01-01");
        let named: Named = context.get(VNET).await.unwrap();
        assert_eq!(named.name, "vnet1");
    }

    #[tokio::test]
    async fn context_get_optional_maps_not_found() {
        let mut transport = MockResourceTransport::new();
        transport
            .expect_get()
            .returning(|path, _| Err(Error::NotFound(path.to_string())));

        let context = ArmContext::new(Arc::new(transport), "sub");
        let missing: Option<Named> = context.get_optional(VNET).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn context_reports_decode_failures() {
        let mut transport = MockResourceTransport::new();
        transport.expect_get().returning(|_, _| Ok(json!({"id": 1})));

        let context = ArmContext::new(Arc::new(transport), "sub");
        let err = context.get::<Named>(VNET).await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn context_paths() {
        let transport = MockResourceTransport::new();
        let context = ArmContext::new(Arc::new(transport), "sub");
        assert_eq!(
            context.resource_id("rg", "virtualNetworks", "vnet1").to_string(),
            VNET
        );
        assert_eq!(
            context.resource_group_path("rg", "virtualNetworks"),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks"
        );
        assert_eq!(
            context.subscription_path("publicIPAddresses"),
            "/subscriptions/sub/providers/Microsoft.Network/publicIPAddresses"
        );
    }
}
