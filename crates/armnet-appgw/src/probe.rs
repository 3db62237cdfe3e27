//! Health probes.

use armnet_core::children::{insert_child, Child};
use armnet_core::Error;

use crate::gateway::ApplicationGateway;
use crate::models::{ApplicationGatewayProtocol, ProbeInner, ProbeProperties};
use crate::Result;

const DEFAULT_INTERVAL_SECONDS: u32 = 30;
const DEFAULT_TIMEOUT_SECONDS: u32 = 30;
const DEFAULT_UNHEALTHY_THRESHOLD: u32 = 3;

/// A health probe of an application gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    inner: ProbeInner,
}

impl Child for Probe {
    type Properties = ProbeProperties;

    fn from_inner(inner: ProbeInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &ProbeInner {
        &self.inner
    }
}

impl Probe {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        let mut inner = ProbeInner::named(name);
        let props = inner.properties_mut();
        props.protocol = Some(ApplicationGatewayProtocol::Http);
        props.interval = Some(DEFAULT_INTERVAL_SECONDS);
        props.timeout = Some(DEFAULT_TIMEOUT_SECONDS);
        props.unhealthy_threshold = Some(DEFAULT_UNHEALTHY_THRESHOLD);
        Self { inner }
    }

    fn props(&self) -> Option<&ProbeProperties> {
        self.inner.properties.as_ref()
    }

    /// Probe name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Protocol of the probe request.
    #[must_use]
    pub fn protocol(&self) -> Option<ApplicationGatewayProtocol> {
        self.props().and_then(|p| p.protocol)
    }

    /// Host name sent with the probe.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.props().and_then(|p| p.host.as_deref())
    }

    /// Path requested.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.props().and_then(|p| p.path.as_deref())
    }

    /// Seconds between probes.
    #[must_use]
    pub fn time_between_probes_in_seconds(&self) -> Option<u32> {
        self.props().and_then(|p| p.interval)
    }

    /// Seconds before a probe times out.
    #[must_use]
    pub fn timeout_in_seconds(&self) -> Option<u32> {
        self.props().and_then(|p| p.timeout)
    }

    /// Failed probes before a backend is unhealthy.
    #[must_use]
    pub fn retries_before_unhealthy(&self) -> Option<u32> {
        self.props().and_then(|p| p.unhealthy_threshold)
    }
}

/// Definition or update of a probe.
#[derive(Debug, Clone)]
pub struct ProbeDefinition {
    parent: ApplicationGateway,
    probe: Probe,
}

impl ProbeDefinition {
    pub(crate) fn new(parent: ApplicationGateway, probe: Probe) -> Self {
        Self { parent, probe }
    }

    fn props_mut(&mut self) -> &mut ProbeProperties {
        self.probe.inner.properties_mut()
    }

    /// Host name sent with the probe.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.props_mut().host = Some(host.into());
        self
    }

    /// Path requested, starting with `/`.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.props_mut().path = Some(path.into());
        self
    }

    /// Probe over HTTPS instead of HTTP.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.props_mut().protocol = Some(ApplicationGatewayProtocol::Https);
        self
    }

    /// Seconds between probes.
    #[must_use]
    pub fn with_time_between_probes_in_seconds(mut self, seconds: u32) -> Self {
        self.props_mut().interval = Some(seconds);
        self
    }

    /// Seconds before a probe times out.
    #[must_use]
    pub fn with_timeout_in_seconds(mut self, seconds: u32) -> Self {
        self.props_mut().timeout = Some(seconds);
        self
    }

    /// Failed probes before a backend is unhealthy.
    #[must_use]
    pub fn with_retries_before_unhealthy(mut self, retries: u32) -> Self {
        self.props_mut().unhealthy_threshold = Some(retries);
        self
    }

    /// Add the probe to its gateway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without a host, or when the path
    /// is missing or does not start with `/`.
    pub fn attach(self) -> Result<ApplicationGateway> {
        let Self { mut parent, probe } = self;
        if probe.host().map_or(true, str::is_empty) {
            return Err(Error::InvalidArgument(format!("probe `{}` has no host", probe.name())));
        }
        if !probe.path().is_some_and(|path| path.starts_with('/')) {
            return Err(Error::InvalidArgument(format!(
                "probe `{}` needs a path starting with `/`",
                probe.name()
            )));
        }
        insert_child(parent.probes_mut(), probe);
        Ok(parent)
    }
}
