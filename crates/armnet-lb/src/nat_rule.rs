//! Inbound NAT rules.

use armnet_core::children::{insert_child, referenced_name, Child};
use armnet_core::types::{SubResource, TransportProtocol};
use armnet_core::Error;

use crate::load_balancer::LoadBalancer;
use crate::models::{InboundNatRuleInner, InboundNatRuleProperties};
use crate::Result;

/// An inbound NAT rule, forwarding one frontend port to one backend NIC.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundNatRule {
    inner: InboundNatRuleInner,
}

impl Child for InboundNatRule {
    type Properties = InboundNatRuleProperties;

    fn from_inner(inner: InboundNatRuleInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &InboundNatRuleInner {
        &self.inner
    }
}

impl InboundNatRule {
    fn props(&self) -> Option<&InboundNatRuleProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut InboundNatRuleProperties {
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

    /// ID of the NIC IP configuration traffic is forwarded to.
    #[must_use]
    pub fn backend_ip_configuration_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.backend_ip_configuration.as_ref())
            .and_then(SubResource::id)
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

    /// Whether floating IP is on.
    #[must_use]
    pub fn is_floating_ip_enabled(&self) -> bool {
        self.props().and_then(|p| p.enable_floating_ip).unwrap_or(false)
    }
}

/// Definition or update of an inbound NAT rule.
#[derive(Debug, Clone)]
pub struct InboundNatRuleDefinition {
    parent: LoadBalancer,
    rule: InboundNatRule,
}

impl InboundNatRuleDefinition {
    pub(crate) fn new(parent: LoadBalancer, rule: InboundNatRule) -> Self {
        Self { parent, rule }
    }

    /// Receive traffic on a frontend of this balancer.
    #[must_use]
    pub fn from_frontend(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().frontend_ip_configuration = Some(SubResource::new(name));
        self
    }

    /// Port on the frontend.
    #[must_use]
    pub fn from_frontend_port(mut self, port: u16) -> Self {
        self.rule.props_mut().frontend_port = Some(port);
        self
    }

    /// Port on the backend. Defaults to the frontend port.
    #[must_use]
    pub fn to_backend_port(mut self, port: u16) -> Self {
        self.rule.props_mut().backend_port = Some(port);
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

    /// Add the rule to its load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without a frontend port.
    pub fn attach(self) -> Result<LoadBalancer> {
        let Self { mut parent, mut rule } = self;
        let Some(frontend_port) = rule.frontend_port() else {
            return Err(Error::InvalidArgument(format!(
                "inbound NAT rule `{}` has no frontend port",
                rule.name()
            )));
        };
        let props = rule.props_mut();
        props.backend_port.get_or_insert(frontend_port);
        props.protocol.get_or_insert(TransportProtocol::Tcp);
        insert_child(parent.inbound_nat_rules_mut(), rule);
        Ok(parent)
    }
}
