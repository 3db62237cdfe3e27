//! Wire models for application gateways.

use armnet_core::types::{ChildResource, IpAllocationMethod, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Application gateway as exchanged with the provider.
pub type ApplicationGatewayInner = TrackedResource<ApplicationGatewayProperties>;

/// Gateway IP configuration (the subnet the gateway runs in).
pub type IpConfigurationInner = ChildResource<IpConfigurationProperties>;

/// Frontend IP configuration.
pub type FrontendInner = ChildResource<FrontendProperties>;

/// Frontend port.
pub type FrontendPortInner = ChildResource<FrontendPortProperties>;

/// Backend address pool.
pub type BackendInner = ChildResource<BackendProperties>;

/// Backend HTTP settings.
pub type BackendHttpConfigurationInner = ChildResource<BackendHttpConfigurationProperties>;

/// Health probe.
pub type ProbeInner = ChildResource<ProbeProperties>;

/// HTTP listener.
pub type ListenerInner = ChildResource<ListenerProperties>;

/// Request routing rule.
pub type RequestRoutingRuleInner = ChildResource<RequestRoutingRuleProperties>;

/// Properties of an application gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGatewayProperties {
    /// Size, tier and instance count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<ApplicationGatewaySku>,
    /// Whether the gateway is running.
    #[serde(default, skip_serializing)]
    pub operational_state: Option<OperationalState>,
    /// Subnets the gateway instances run in.
    #[serde(rename = "gatewayIPConfigurations", default, skip_serializing_if = "Option::is_none")]
    pub gateway_ip_configurations: Option<Vec<IpConfigurationInner>>,
    /// Frontend IP configurations.
    #[serde(rename = "frontendIPConfigurations", default, skip_serializing_if = "Option::is_none")]
    pub frontend_ip_configurations: Option<Vec<FrontendInner>>,
    /// Frontend ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_ports: Option<Vec<FrontendPortInner>>,
    /// Backend address pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_address_pools: Option<Vec<BackendInner>>,
    /// Backend HTTP settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_http_settings_collection: Option<Vec<BackendHttpConfigurationInner>>,
    /// Health probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probes: Option<Vec<ProbeInner>>,
    /// HTTP listeners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_listeners: Option<Vec<ListenerInner>>,
    /// Request routing rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_routing_rules: Option<Vec<RequestRoutingRuleInner>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// SKU of an application gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGatewaySku {
    /// Size, e.g. `Standard_Medium`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tier, e.g. `Standard` or `WAF`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Number of instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// Run state of an application gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationalState {
    /// Stopped
    Stopped,
    /// Starting
    Starting,
    /// Running
    Running,
    /// Stopping
    Stopping,
    /// A state this client does not know.
    #[serde(other)]
    Unknown,
}

/// Properties of a gateway IP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpConfigurationProperties {
    /// Subnet the gateway runs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a frontend IP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendProperties {
    /// Private address of an internal frontend.
    #[serde(rename = "privateIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    /// Static or dynamic private address.
    #[serde(rename = "privateIPAllocationMethod", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_allocation_method: Option<IpAllocationMethod>,
    /// Subnet of an internal frontend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
    /// Public IP address of an internet-facing frontend.
    #[serde(rename = "publicIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a frontend port.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendPortProperties {
    /// Port number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a backend address pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendProperties {
    /// Addresses in the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_addresses: Option<Vec<BackendAddress>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// One backend address: an IP address or a host name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackendAddress {
    /// IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Fully qualified domain name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

/// Properties of backend HTTP settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendHttpConfigurationProperties {
    /// Port on the backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Protocol spoken to the backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ApplicationGatewayProtocol>,
    /// Cookie-based session affinity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_based_affinity: Option<CookieBasedAffinity>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u32>,
    /// Probe deciding backend health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a health probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeProperties {
    /// Protocol of the probe request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ApplicationGatewayProtocol>,
    /// Host name sent with the probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Path requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Seconds between probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Seconds before a probe times out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Failed probes before a backend is marked unhealthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold: Option<u32>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of an HTTP listener.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListenerProperties {
    /// Frontend the listener accepts traffic on.
    #[serde(rename = "frontendIPConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub frontend_ip_configuration: Option<SubResource>,
    /// Frontend port the listener accepts traffic on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<SubResource>,
    /// Protocol accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ApplicationGatewayProtocol>,
    /// Host name matched, for multi-site listeners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a request routing rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestRoutingRuleProperties {
    /// Rule type; only `Basic` rules are built by this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
    /// Listener the rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_listener: Option<SubResource>,
    /// Pool traffic is sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_address_pool: Option<SubResource>,
    /// Settings used towards the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_http_settings: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Protocol of listeners, backend settings and probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationGatewayProtocol {
    /// HTTP
    Http,
    /// HTTPS
    Https,
}

/// Cookie-based session affinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookieBasedAffinity {
    /// Enabled
    Enabled,
    /// Disabled
    Disabled,
}
