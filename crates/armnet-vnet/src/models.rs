//! Wire models for virtual networks, subnets and peerings.

use armnet_core::types::{ChildResource, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Virtual network as exchanged with the provider.
pub type VirtualNetworkInner = TrackedResource<VirtualNetworkProperties>;

/// Subnet as nested in a virtual network.
pub type SubnetInner = ChildResource<SubnetProperties>;

/// Peering as nested in a virtual network.
pub type PeeringInner = ChildResource<PeeringProperties>;

/// Properties of a virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkProperties {
    /// Address prefixes of the network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_space: Option<AddressSpace>,
    /// DNS servers handed out by DHCP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_options: Option<DhcpOptions>,
    /// Subnets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<SubnetInner>>,
    /// Peerings with other networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_network_peerings: Option<Vec<PeeringInner>>,
    /// Whether DDoS protection is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ddos_protection: Option<bool>,
    /// DDoS protection plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddos_protection_plan: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
    /// Provider-assigned GUID.
    #[serde(default, skip_serializing)]
    pub resource_guid: Option<String>,
}

/// A list of address prefixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    /// CIDR blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefixes: Option<Vec<String>>,
}

/// DHCP options of a virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DhcpOptions {
    /// DNS server addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
}

/// Properties of a subnet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetProperties {
    /// Address prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    /// Network security group applied to the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,
    /// Route table applied to the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_table: Option<SubResource>,
    /// Service endpoints enabled on the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_endpoints: Option<Vec<ServiceEndpoint>>,
    /// NIC IP configurations placed in the subnet.
    #[serde(default, skip_serializing)]
    pub ip_configurations: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Service endpoint of a subnet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Service type, e.g. `Microsoft.Storage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Regions the endpoint applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
}

/// Properties of a network peering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeeringProperties {
    /// The peered network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_virtual_network: Option<SubResource>,
    /// Whether VMs in the remote network may reach this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_virtual_network_access: Option<bool>,
    /// Whether traffic forwarded by the remote network is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_forwarded_traffic: Option<bool>,
    /// Whether the remote network may use this network's gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_gateway_transit: Option<bool>,
    /// Whether this network uses the remote network's gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_remote_gateways: Option<bool>,
    /// Address space of the remote network.
    #[serde(default, skip_serializing)]
    pub remote_address_space: Option<AddressSpace>,
    /// Connection state.
    #[serde(default, skip_serializing)]
    pub peering_state: Option<PeeringState>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Connection state of a peering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeeringState {
    /// Only one side exists.
    Initiated,
    /// Both sides exist and traffic flows.
    Connected,
    /// The remote side was removed.
    Disconnected,
    /// A state this crate does not know.
    #[serde(other)]
    Unknown,
}

/// Result of an IP address availability check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressAvailability {
    /// Whether the address is free.
    #[serde(default)]
    pub available: bool,
    /// Free addresses near the requested one.
    #[serde(default, rename = "availableIPAddresses")]
    pub available_ip_addresses: Vec<String>,
}
