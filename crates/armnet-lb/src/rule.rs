//! Load-balancing rules and their definition stages.

use armnet_core::children::{insert_child, referenced_name, Child};
use armnet_core::naming::random_resource_name;
use armnet_core::resource_id::ids_equal;
use armnet_core::types::{SubResource, TransportProtocol};
use armnet_core::Error;

use crate::frontend::Frontend;
use crate::load_balancer::LoadBalancer;
use crate::models::{LoadBalancingRuleInner, LoadBalancingRuleProperties, LoadDistribution};
use crate::Result;

pub(crate) const FRONTEND_PREFIX: &str = "frontend";
pub(crate) const FRONTEND_NAME_LEN: usize = 14;

/// A load-balancing rule.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancingRule {
    inner: LoadBalancingRuleInner,
}

impl Child for LoadBalancingRule {
    type Properties = LoadBalancingRuleProperties;

    fn from_inner(inner: LoadBalancingRuleInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &LoadBalancingRuleInner {
        &self.inner
    }
}

impl LoadBalancingRule {
    fn props(&self) -> Option<&LoadBalancingRuleProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut LoadBalancingRuleProperties {
        self.inner.properties_mut()
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Name of the frontend receiving the traffic.
    #[must_use]
    pub fn frontend_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.frontend_ip_configuration.as_ref()))
    }

    /// Name of the backend pool.
    #[must_use]
    pub fn backend_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.backend_address_pool.as_ref()))
    }

    /// Name of the health probe.
    #[must_use]
    pub fn probe_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.probe.as_ref()))
    }

    /// Transport protocol.
    #[must_use]
    pub fn protocol(&self) -> Option<TransportProtocol> {
        self.props().and_then(|p| p.protocol)
    }

    /// Frontend port.
    #[must_use]
    pub fn frontend_port(&self) -> Option<u16> {
        self.props().and_then(|p| p.frontend_port)
    }

    /// Backend port.
    #[must_use]
    pub fn backend_port(&self) -> Option<u16> {
        self.props().and_then(|p| p.backend_port)
    }

    /// TCP idle timeout in minutes.
    #[must_use]
    pub fn idle_timeout_in_minutes(&self) -> Option<u32> {
        self.props().and_then(|p| p.idle_timeout_in_minutes)
    }

    /// Whether floating IP (direct server return) is on.
    #[must_use]
    pub fn is_floating_ip_enabled(&self) -> bool {
        self.props().and_then(|p| p.enable_floating_ip).unwrap_or(false)
    }

    /// Session affinity.
    #[must_use]
    pub fn load_distribution(&self) -> Option<LoadDistribution> {
        self.props().and_then(|p| p.load_distribution)
    }
}

/// Definition or update of a load-balancing rule.
#[derive(Debug, Clone)]
pub struct LoadBalancingRuleDefinition {
    parent: LoadBalancer,
    rule: LoadBalancingRule,
}

impl LoadBalancingRuleDefinition {
    pub(crate) fn new(parent: LoadBalancer, rule: LoadBalancingRule) -> Self {
        Self { parent, rule }
    }

    /// Receive traffic on a frontend of this balancer.
    #[must_use]
    pub fn from_frontend(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().frontend_ip_configuration = Some(SubResource::new(name));
        self
    }

    /// Receive traffic on the frontend holding a public IP address.
    ///
    /// Reuses the frontend that already holds the address, or adds one.
    #[must_use]
    pub fn from_existing_public_ip(mut self, public_ip_id: &str) -> Self {
        let existing = self
            .parent
            .frontends()
            .values()
            .find(|f| f.public_ip_address_id().is_some_and(|id| ids_equal(id, public_ip_id)))
            .map(|f| f.name().to_string());
        let name = match existing {
            Some(name) => name,
            None => {
                let name = random_resource_name(FRONTEND_PREFIX, FRONTEND_NAME_LEN);
                insert_child(self.parent.frontends_mut(), Frontend::public(name.clone(), public_ip_id));
                name
            }
        };
        self.from_frontend(name)
    }

    /// Port on the frontend.
    #[must_use]
    pub fn from_frontend_port(mut self, port: u16) -> Self {
        self.rule.props_mut().frontend_port = Some(port);
        self
    }

    /// Send traffic to a backend pool of this balancer.
    #[must_use]
    pub fn to_backend(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().backend_address_pool = Some(SubResource::new(name));
        self
    }

    /// Port on the backends. Defaults to the frontend port.
    #[must_use]
    pub fn to_backend_port(mut self, port: u16) -> Self {
        self.rule.props_mut().backend_port = Some(port);
        self
    }

    /// Probe deciding endpoint health.
    #[must_use]
    pub fn with_probe(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().probe = Some(SubResource::new(name));
        self
    }

    /// Transport protocol. Defaults to TCP.
    #[must_use]
    pub fn with_protocol(mut self, protocol: TransportProtocol) -> Self {
        self.rule.props_mut().protocol = Some(protocol);
        self
    }

    /// TCP idle timeout in minutes.
    #[must_use]
    pub fn with_idle_timeout(mut self, minutes: u32) -> Self {
        self.rule.props_mut().idle_timeout_in_minutes = Some(minutes);
        self
    }

    /// Turn floating IP on or off.
    #[must_use]
    pub fn with_floating_ip(mut self, enabled: bool) -> Self {
        self.rule.props_mut().enable_floating_ip = Some(enabled);
        self
    }

    /// Session affinity.
    #[must_use]
    pub fn with_load_distribution(mut self, distribution: LoadDistribution) -> Self {
        self.rule.props_mut().load_distribution = Some(distribution);
        self
    }

    /// Add the rule to its load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without a frontend port.
    pub fn attach(self) -> Result<LoadBalancer> {
        let Self { mut parent, mut rule } = self;
        let Some(frontend_port) = rule.frontend_port() else {
            return Err(Error::InvalidArgument(format!(
                "load-balancing rule `{}` has no frontend port",
                rule.name()
            )));
        };
        let props = rule.props_mut();
        props.backend_port.get_or_insert(frontend_port);
        props.protocol.get_or_insert(TransportProtocol::Tcp);
        insert_child(parent.load_balancing_rules_mut(), rule);
        Ok(parent)
    }
}
