//! Wire models for network security groups.

use armnet_core::types::{ChildResource, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Network security group as exchanged with the provider.
pub type NetworkSecurityGroupInner = TrackedResource<NetworkSecurityGroupProperties>;

/// Security rule as nested in a group.
pub type SecurityRuleInner = ChildResource<SecurityRuleProperties>;

/// Properties of a network security group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroupProperties {
    /// Custom rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_rules: Option<Vec<SecurityRuleInner>>,
    /// Built-in rules, managed by the provider.
    #[serde(default, skip_serializing)]
    pub default_security_rules: Option<Vec<SecurityRuleInner>>,
    /// NICs the group is applied to.
    #[serde(default, skip_serializing)]
    pub network_interfaces: Option<Vec<SubResource>>,
    /// Subnets the group is applied to.
    #[serde(default, skip_serializing)]
    pub subnets: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a security rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleProperties {
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Protocol matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<SecurityRuleProtocol>,
    /// Source port or range, `*` for any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,
    /// Destination port or range, `*` for any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,
    /// Source CIDR, tag or `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,
    /// Destination CIDR, tag or `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,
    /// Allow or deny.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<SecurityRuleAccess>,
    /// Evaluation order, lower first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// Traffic direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SecurityRuleDirection>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Whether matching traffic is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityRuleAccess {
    /// Allow
    Allow,
    /// Deny
    Deny,
}

/// Direction of matched traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityRuleDirection {
    /// Inbound
    Inbound,
    /// Outbound
    Outbound,
}

/// Protocol matched by a security rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityRuleProtocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// ICMP
    Icmp,
    /// Any protocol
    #[serde(rename = "*")]
    Any,
}
