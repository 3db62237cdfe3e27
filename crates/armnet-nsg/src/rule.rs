//! Security rules and their definition stages.

use armnet_core::children::{insert_child, Child};
use armnet_core::Error;

use crate::models::{
    SecurityRuleAccess, SecurityRuleDirection, SecurityRuleInner, SecurityRuleProperties,
    SecurityRuleProtocol,
};
use crate::nsg::NetworkSecurityGroup;
use crate::Result;

const ANY: &str = "*";
const MIN_PRIORITY: u32 = 100;
const MAX_PRIORITY: u32 = 4096;

/// A security rule of a network security group.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRule {
    inner: SecurityRuleInner,
}

impl Child for SecurityRule {
    type Properties = SecurityRuleProperties;

    fn from_inner(inner: SecurityRuleInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &SecurityRuleInner {
        &self.inner
    }
}

impl SecurityRule {
    fn props(&self) -> Option<&SecurityRuleProperties> {
        self.inner.properties.as_ref()
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Allow or deny.
    #[must_use]
    pub fn access(&self) -> Option<SecurityRuleAccess> {
        self.props().and_then(|p| p.access)
    }

    /// Inbound or outbound.
    #[must_use]
    pub fn direction(&self) -> Option<SecurityRuleDirection> {
        self.props().and_then(|p| p.direction)
    }

    /// Protocol matched.
    #[must_use]
    pub fn protocol(&self) -> Option<SecurityRuleProtocol> {
        self.props().and_then(|p| p.protocol)
    }

    /// Evaluation priority.
    #[must_use]
    pub fn priority(&self) -> Option<u32> {
        self.props().and_then(|p| p.priority)
    }

    /// Source address prefix.
    #[must_use]
    pub fn source_address_prefix(&self) -> Option<&str> {
        self.props().and_then(|p| p.source_address_prefix.as_deref())
    }

    /// Source port range.
    #[must_use]
    pub fn source_port_range(&self) -> Option<&str> {
        self.props().and_then(|p| p.source_port_range.as_deref())
    }

    /// Destination address prefix.
    #[must_use]
    pub fn destination_address_prefix(&self) -> Option<&str> {
        self.props().and_then(|p| p.destination_address_prefix.as_deref())
    }

    /// Destination port range.
    #[must_use]
    pub fn destination_port_range(&self) -> Option<&str> {
        self.props().and_then(|p| p.destination_port_range.as_deref())
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.props().and_then(|p| p.description.as_deref())
    }
}

/// Definition or update of a security rule.
#[derive(Debug, Clone)]
pub struct SecurityRuleDefinition {
    parent: NetworkSecurityGroup,
    inner: SecurityRuleInner,
}

impl SecurityRuleDefinition {
    pub(crate) fn new(parent: NetworkSecurityGroup, inner: SecurityRuleInner) -> Self {
        Self { parent, inner }
    }

    fn props(&mut self) -> &mut SecurityRuleProperties {
        self.inner.properties_mut()
    }

    fn with_access_direction(mut self, access: SecurityRuleAccess, direction: SecurityRuleDirection) -> Self {
        let props = self.props();
        props.access = Some(access);
        props.direction = Some(direction);
        self
    }

    /// Allow inbound traffic.
    #[must_use]
    pub fn allow_inbound(self) -> Self {
        self.with_access_direction(SecurityRuleAccess::Allow, SecurityRuleDirection::Inbound)
    }

    /// Allow outbound traffic.
    #[must_use]
    pub fn allow_outbound(self) -> Self {
        self.with_access_direction(SecurityRuleAccess::Allow, SecurityRuleDirection::Outbound)
    }

    /// Deny inbound traffic.
    #[must_use]
    pub fn deny_inbound(self) -> Self {
        self.with_access_direction(SecurityRuleAccess::Deny, SecurityRuleDirection::Inbound)
    }

    /// Deny outbound traffic.
    #[must_use]
    pub fn deny_outbound(self) -> Self {
        self.with_access_direction(SecurityRuleAccess::Deny, SecurityRuleDirection::Outbound)
    }

    /// Match traffic from a CIDR or service tag.
    #[must_use]
    pub fn from_address(mut self, cidr: impl Into<String>) -> Self {
        self.props().source_address_prefix = Some(cidr.into());
        self
    }

    /// Match traffic from any address.
    #[must_use]
    pub fn from_any_address(self) -> Self {
        self.from_address(ANY)
    }

    /// Match a single source port.
    #[must_use]
    pub fn from_port(mut self, port: u16) -> Self {
        self.props().source_port_range = Some(port.to_string());
        self
    }

    /// Match a source port range.
    #[must_use]
    pub fn from_port_range(mut self, from: u16, to: u16) -> Self {
        self.props().source_port_range = Some(format!("{from}-{to}"));
        self
    }

    /// Match any source port.
    #[must_use]
    pub fn from_any_port(mut self) -> Self {
        self.props().source_port_range = Some(ANY.to_string());
        self
    }

    /// Match traffic to a CIDR or service tag.
    #[must_use]
    pub fn to_address(mut self, cidr: impl Into<String>) -> Self {
        self.props().destination_address_prefix = Some(cidr.into());
        self
    }

    /// Match traffic to any address.
    #[must_use]
    pub fn to_any_address(self) -> Self {
        self.to_address(ANY)
    }

    /// Match a single destination port.
    #[must_use]
    pub fn to_port(mut self, port: u16) -> Self {
        self.props().destination_port_range = Some(port.to_string());
        self
    }

    /// Match a destination port range.
    #[must_use]
    pub fn to_port_range(mut self, from: u16, to: u16) -> Self {
        self.props().destination_port_range = Some(format!("{from}-{to}"));
        self
    }

    /// Match any destination port.
    #[must_use]
    pub fn to_any_port(mut self) -> Self {
        self.props().destination_port_range = Some(ANY.to_string());
        self
    }

    /// Match one protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: SecurityRuleProtocol) -> Self {
        self.props().protocol = Some(protocol);
        self
    }

    /// Match every protocol.
    #[must_use]
    pub fn with_any_protocol(self) -> Self {
        self.with_protocol(SecurityRuleProtocol::Any)
    }

    /// Set the priority, checked when the rule is attached.
    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.props().priority = Some(priority);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.props().description = Some(description.into());
        self
    }

    /// Validate the rule and add it to its group.
    ///
    /// Unset addresses, ports and protocol match anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the access or direction is
    /// missing or the priority is outside 100 to 4096.
    pub fn attach(mut self) -> Result<NetworkSecurityGroup> {
        let name = self.inner.name.clone().unwrap_or_default();
        let props = self.props();
        if props.access.is_none() || props.direction.is_none() {
            return Err(Error::InvalidArgument(format!(
                "security rule `{name}` needs an access and a direction"
            )));
        }
        match props.priority {
            Some(priority) if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) => {}
            Some(priority) => {
                return Err(Error::InvalidArgument(format!(
                    "security rule `{name}` priority {priority} is outside {MIN_PRIORITY}..={MAX_PRIORITY}"
                )))
            }
            None => {
                return Err(Error::InvalidArgument(format!(
                    "security rule `{name}` has no priority"
                )))
            }
        }
        for field in [
            &mut props.source_address_prefix,
            &mut props.destination_address_prefix,
            &mut props.source_port_range,
            &mut props.destination_port_range,
        ] {
            field.get_or_insert_with(|| ANY.to_string());
        }
        props.protocol.get_or_insert(SecurityRuleProtocol::Any);

        let Self { mut parent, inner } = self;
        insert_child(parent.rules_mut(), SecurityRule::from_inner(inner));
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport};
    use armnet_core::TopLevelResource;

    fn nsg() -> NetworkSecurityGroup {
        NetworkSecurityGroup::define(context(MockTransport::new()), "nsg1".into())
    }

    #[test]
    fn priority_is_checked_at_attach() {
        let definition = nsg().define_rule("ssh").allow_inbound().with_priority(99);
        assert!(matches!(definition.attach(), Err(Error::InvalidArgument(_))));

        let definition = nsg().define_rule("ssh").allow_inbound().with_priority(4097);
        assert!(definition.attach().is_err());

        let nsg = nsg()
            .define_rule("ssh")
            .allow_inbound()
            .with_priority(4096)
            .attach()
            .unwrap();
        assert_eq!(nsg.security_rules()["ssh"].priority(), Some(4096));
    }

    #[test]
    fn access_and_direction_are_required() {
        let err = nsg().define_rule("r").with_priority(200).attach().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn unset_matchers_default_to_any() {
        let nsg = nsg()
            .define_rule("web")
            .allow_inbound()
            .from_address("10.0.0.0/8")
            .to_port(443)
            .with_protocol(SecurityRuleProtocol::Tcp)
            .with_priority(100)
            .with_description("https in")
            .attach()
            .unwrap();

        let rule = &nsg.security_rules()["web"];
        assert_eq!(rule.source_address_prefix(), Some("10.0.0.0/8"));
        assert_eq!(rule.source_port_range(), Some("*"));
        assert_eq!(rule.destination_address_prefix(), Some("*"));
        assert_eq!(rule.destination_port_range(), Some("443"));
        assert_eq!(rule.protocol(), Some(SecurityRuleProtocol::Tcp));
        assert_eq!(rule.direction(), Some(SecurityRuleDirection::Inbound));
        assert_eq!(rule.description(), Some("https in"));
    }

    #[test]
    fn port_ranges_use_dash_notation() {
        let nsg = nsg()
            .define_rule("range")
            .deny_outbound()
            .from_port_range(1000, 2000)
            .to_any_port()
            .with_any_protocol()
            .with_priority(300)
            .attach()
            .unwrap();
        assert_eq!(nsg.security_rules()["range"].source_port_range(), Some("1000-2000"));
        assert_eq!(nsg.security_rules()["range"].access(), Some(SecurityRuleAccess::Deny));
    }
}
