//! Wire models for load balancers.

use armnet_core::types::{ChildResource, IpAllocationMethod, SubResource, TrackedResource, TransportProtocol};
use serde::{Deserialize, Serialize};

/// Load balancer as exchanged with the provider.
pub type LoadBalancerInner = TrackedResource<LoadBalancerProperties>;

/// Frontend IP configuration as nested in a balancer.
pub type FrontendInner = ChildResource<FrontendProperties>;

/// Backend address pool as nested in a balancer.
pub type BackendInner = ChildResource<BackendProperties>;

/// Health probe as nested in a balancer.
pub type ProbeInner = ChildResource<ProbeProperties>;

/// Load-balancing rule as nested in a balancer.
pub type LoadBalancingRuleInner = ChildResource<LoadBalancingRuleProperties>;

/// Inbound NAT rule as nested in a balancer.
pub type InboundNatRuleInner = ChildResource<InboundNatRuleProperties>;

/// Properties of a load balancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerProperties {
    /// Frontend IP configurations.
    #[serde(
        rename = "frontendIPConfigurations",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub frontend_ip_configurations: Option<Vec<FrontendInner>>,
    /// Backend address pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_address_pools: Option<Vec<BackendInner>>,
    /// Health probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probes: Option<Vec<ProbeInner>>,
    /// Load-balancing rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing_rules: Option<Vec<LoadBalancingRuleInner>>,
    /// Inbound NAT rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_nat_rules: Option<Vec<InboundNatRuleInner>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
    /// Immutable GUID assigned by the provider.
    #[serde(default, skip_serializing)]
    pub resource_guid: Option<String>,
}

/// Properties of a frontend IP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendProperties {
    /// Private address of an internal frontend.
    #[serde(rename = "privateIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    /// Static or dynamic private address.
    #[serde(
        rename = "privateIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<IpAllocationMethod>,
    /// Subnet of an internal frontend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
    /// Public IP address of an internet-facing frontend.
    #[serde(rename = "publicIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,
    /// Balancing rules using this frontend.
    #[serde(default, skip_serializing)]
    pub load_balancing_rules: Option<Vec<SubResource>>,
    /// NAT rules using this frontend.
    #[serde(default, skip_serializing)]
    pub inbound_nat_rules: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a backend address pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendProperties {
    /// NIC IP configurations in the pool.
    #[serde(rename = "backendIPConfigurations", default, skip_serializing)]
    pub backend_ip_configurations: Option<Vec<SubResource>>,
    /// Balancing rules sending traffic to the pool.
    #[serde(default, skip_serializing)]
    pub load_balancing_rules: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a health probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeProperties {
    /// Probe protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ProbeProtocol>,
    /// Port probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Seconds between probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_in_seconds: Option<u32>,
    /// Failed probes before an endpoint is taken out of rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_probes: Option<u32>,
    /// Path requested by HTTP probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_path: Option<String>,
    /// Balancing rules using this probe.
    #[serde(default, skip_serializing)]
    pub load_balancing_rules: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a load-balancing rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingRuleProperties {
    /// Frontend receiving the traffic.
    #[serde(rename = "frontendIPConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub frontend_ip_configuration: Option<SubResource>,
    /// Pool the traffic is spread over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_address_pool: Option<SubResource>,
    /// Probe deciding endpoint health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<SubResource>,
    /// Transport protocol matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TransportProtocol>,
    /// Port on the frontend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<u16>,
    /// Port on the backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_port: Option<u16>,
    /// Idle timeout for TCP connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<u32>,
    /// Direct server return.
    #[serde(rename = "enableFloatingIP", default, skip_serializing_if = "Option::is_none")]
    pub enable_floating_ip: Option<bool>,
    /// Session affinity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_distribution: Option<LoadDistribution>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of an inbound NAT rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundNatRuleProperties {
    /// Frontend receiving the traffic.
    #[serde(rename = "frontendIPConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub frontend_ip_configuration: Option<SubResource>,
    /// NIC IP configuration the traffic is forwarded to.
    #[serde(rename = "backendIPConfiguration", default, skip_serializing)]
    pub backend_ip_configuration: Option<SubResource>,
    /// Transport protocol matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TransportProtocol>,
    /// Port on the frontend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<u16>,
    /// Port on the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_port: Option<u16>,
    /// Idle timeout for TCP connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<u32>,
    /// Direct server return.
    #[serde(rename = "enableFloatingIP", default, skip_serializing_if = "Option::is_none")]
    pub enable_floating_ip: Option<bool>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Protocol of a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeProtocol {
    /// TCP connect
    Tcp,
    /// HTTP GET expecting 200
    Http,
    /// HTTPS GET expecting 200
    Https,
}

/// Session affinity of a balancing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadDistribution {
    /// Five-tuple hash.
    Default,
    /// Client IP affinity.
    #[serde(rename = "SourceIP")]
    SourceIp,
    /// Client IP and protocol affinity.
    #[serde(rename = "SourceIPProtocol")]
    SourceIpProtocol,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_uses_provider_spelling() {
        let mut rule = LoadBalancingRuleInner::named("http");
        let props = rule.properties_mut();
        props.frontend_ip_configuration = Some(SubResource::new("fe"));
        props.enable_floating_ip = Some(false);
        props.load_distribution = Some(LoadDistribution::SourceIp);
        props.protocol = Some(TransportProtocol::Tcp);
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            value["properties"],
            json!({
                "frontendIPConfiguration": {"id": "fe"},
                "protocol": "Tcp",
                "enableFloatingIP": false,
                "loadDistribution": "SourceIP"
            })
        );
    }

    #[test]
    fn backend_ip_configurations_are_read_only() {
        let backend: BackendInner = serde_json::from_value(json!({
            "name": "pool",
            "properties": {"backendIPConfigurations": [{"id": "nic-config"}]}
        }))
        .unwrap();
        assert_eq!(
            backend.properties.as_ref().unwrap().backend_ip_configurations.as_ref().unwrap().len(),
            1
        );
        assert_eq!(serde_json::to_value(&backend).unwrap()["properties"], json!({}));
    }
}
