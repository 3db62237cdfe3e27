//! Health probes and their definition stages.

use armnet_core::children::{insert_child, Child};
use armnet_core::Error;

use crate::load_balancer::LoadBalancer;
use crate::models::{ProbeInner, ProbeProperties, ProbeProtocol};
use crate::Result;

const DEFAULT_INTERVAL_SECONDS: u32 = 15;
const DEFAULT_NUMBER_OF_PROBES: u32 = 2;
const DEFAULT_REQUEST_PATH: &str = "/";

/// A health probe of a load balancer.
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
    fn props(&self) -> Option<&ProbeProperties> {
        self.inner.properties.as_ref()
    }

    /// Probe name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Probe protocol.
    #[must_use]
    pub fn protocol(&self) -> Option<ProbeProtocol> {
        self.props().and_then(|p| p.protocol)
    }

    /// Port probed.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.props().and_then(|p| p.port)
    }

    /// Seconds between probes.
    #[must_use]
    pub fn interval_in_seconds(&self) -> Option<u32> {
        self.props().and_then(|p| p.interval_in_seconds)
    }

    /// Failed probes before an endpoint leaves rotation.
    #[must_use]
    pub fn number_of_probes(&self) -> Option<u32> {
        self.props().and_then(|p| p.number_of_probes)
    }

    /// Path requested by HTTP probes.
    #[must_use]
    pub fn request_path(&self) -> Option<&str> {
        self.props().and_then(|p| p.request_path.as_deref())
    }
}

/// Definition or update of a probe.
#[derive(Debug, Clone)]
pub struct ProbeDefinition {
    parent: LoadBalancer,
    probe: Probe,
}

impl ProbeDefinition {
    pub(crate) fn new(parent: LoadBalancer, probe: Probe) -> Self {
        Self { parent, probe }
    }

    pub(crate) fn fresh(parent: LoadBalancer, name: String, protocol: ProbeProtocol) -> Self {
        let mut inner = ProbeInner::named(name);
        let props = inner.properties_mut();
        props.protocol = Some(protocol);
        props.interval_in_seconds = Some(DEFAULT_INTERVAL_SECONDS);
        props.number_of_probes = Some(DEFAULT_NUMBER_OF_PROBES);
        if protocol != ProbeProtocol::Tcp {
            props.request_path = Some(DEFAULT_REQUEST_PATH.to_string());
        }
        Self::new(parent, Probe::from_inner(inner))
    }

    fn props_mut(&mut self) -> &mut ProbeProperties {
        self.probe.inner.properties_mut()
    }

    /// Port to probe.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.props_mut().port = Some(port);
        self
    }

    /// Seconds between probes.
    #[must_use]
    pub fn with_interval_in_seconds(mut self, seconds: u32) -> Self {
        self.props_mut().interval_in_seconds = Some(seconds);
        self
    }

    /// Failed probes before an endpoint leaves rotation.
    #[must_use]
    pub fn with_number_of_probes(mut self, count: u32) -> Self {
        self.props_mut().number_of_probes = Some(count);
        self
    }

    /// Path requested by HTTP probes.
    #[must_use]
    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.props_mut().request_path = Some(path.into());
        self
    }

    /// Add the probe to its load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without a port, or for a TCP probe
    /// with a request path.
    pub fn attach(self) -> Result<LoadBalancer> {
        let Self { mut parent, probe } = self;
        if probe.port().is_none() {
            return Err(Error::InvalidArgument(format!("probe `{}` has no port", probe.name())));
        }
        if probe.protocol() == Some(ProbeProtocol::Tcp) && probe.request_path().is_some() {
            return Err(Error::InvalidArgument(format!(
                "TCP probe `{}` cannot have a request path",
                probe.name()
            )));
        }
        insert_child(parent.probes_mut(), probe);
        Ok(parent)
    }
}
