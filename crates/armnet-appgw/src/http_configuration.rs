//! Backend HTTP configurations.

use armnet_core::children::{insert_child, referenced_name, Child};
use armnet_core::types::SubResource;

use crate::gateway::ApplicationGateway;
use crate::models::{
    ApplicationGatewayProtocol, BackendHttpConfigurationInner, BackendHttpConfigurationProperties,
    CookieBasedAffinity,
};

const DEFAULT_PORT: u16 = 80;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u32 = 30;

/// How an application gateway talks to a backend pool.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendHttpConfiguration {
    inner: BackendHttpConfigurationInner,
}

impl Child for BackendHttpConfiguration {
    type Properties = BackendHttpConfigurationProperties;

    fn from_inner(inner: BackendHttpConfigurationInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &BackendHttpConfigurationInner {
        &self.inner
    }
}

impl BackendHttpConfiguration {
    /// Settings with the gateway defaults: HTTP on port 80, no affinity.
    pub(crate) fn named(name: impl Into<String>) -> Self {
        let mut inner = BackendHttpConfigurationInner::named(name);
        let props = inner.properties_mut();
        props.port = Some(DEFAULT_PORT);
        props.protocol = Some(ApplicationGatewayProtocol::Http);
        props.cookie_based_affinity = Some(CookieBasedAffinity::Disabled);
        props.request_timeout = Some(DEFAULT_REQUEST_TIMEOUT_SECONDS);
        Self { inner }
    }

    fn props(&self) -> Option<&BackendHttpConfigurationProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut BackendHttpConfigurationProperties {
        self.inner.properties_mut()
    }

    /// Configuration name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Port on the backends.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.props().and_then(|p| p.port)
    }

    /// Protocol spoken to the backends.
    #[must_use]
    pub fn protocol(&self) -> Option<ApplicationGatewayProtocol> {
        self.props().and_then(|p| p.protocol)
    }

    /// Whether cookie-based affinity is on.
    #[must_use]
    pub fn cookie_based_affinity(&self) -> bool {
        self.props()
            .and_then(|p| p.cookie_based_affinity)
            .is_some_and(|a| a == CookieBasedAffinity::Enabled)
    }

    /// Request timeout in seconds.
    #[must_use]
    pub fn request_timeout(&self) -> Option<u32> {
        self.props().and_then(|p| p.request_timeout)
    }

    /// Name of the probe used.
    #[must_use]
    pub fn probe_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.probe.as_ref()))
    }
}

/// Definition or update of a backend HTTP configuration.
#[derive(Debug, Clone)]
pub struct BackendHttpConfigurationDefinition {
    parent: ApplicationGateway,
    config: BackendHttpConfiguration,
}

impl BackendHttpConfigurationDefinition {
    pub(crate) fn new(parent: ApplicationGateway, config: BackendHttpConfiguration) -> Self {
        Self { parent, config }
    }

    /// Port on the backends.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.props_mut().port = Some(port);
        self
    }

    /// Protocol spoken to the backends.
    #[must_use]
    pub fn with_protocol(mut self, protocol: ApplicationGatewayProtocol) -> Self {
        self.config.props_mut().protocol = Some(protocol);
        self
    }

    /// Turn on cookie-based affinity.
    #[must_use]
    pub fn with_cookie_based_affinity(mut self) -> Self {
        self.config.props_mut().cookie_based_affinity = Some(CookieBasedAffinity::Enabled);
        self
    }

    /// Turn off cookie-based affinity.
    #[must_use]
    pub fn without_cookie_based_affinity(mut self) -> Self {
        self.config.props_mut().cookie_based_affinity = Some(CookieBasedAffinity::Disabled);
        self
    }

    /// Request timeout in seconds.
    #[must_use]
    pub fn with_request_timeout(mut self, seconds: u32) -> Self {
        self.config.props_mut().request_timeout = Some(seconds);
        self
    }

    /// Use a probe of this gateway.
    #[must_use]
    pub fn with_probe(mut self, name: impl Into<String>) -> Self {
        self.config.props_mut().probe = Some(SubResource::new(name));
        self
    }

    /// Stop using a probe.
    #[must_use]
    pub fn without_probe(mut self) -> Self {
        self.config.props_mut().probe = None;
        self
    }

    /// Add the configuration to its gateway.
    #[must_use]
    pub fn attach(self) -> ApplicationGateway {
        let Self { mut parent, config } = self;
        insert_child(parent.backend_http_configurations_mut(), config);
        parent
    }
}
