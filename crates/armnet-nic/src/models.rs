//! Wire models for network interfaces.

use armnet_core::types::{ChildResource, IpAllocationMethod, IpVersion, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Network interface as exchanged with the provider.
pub type NetworkInterfaceInner = TrackedResource<NetworkInterfaceProperties>;

/// IP configuration as nested in a network interface.
pub type NicIpConfigurationInner = ChildResource<NicIpConfigurationProperties>;

/// Properties of a network interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    /// IP configurations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configurations: Option<Vec<NicIpConfigurationInner>>,
    /// DNS settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<NicDnsSettings>,
    /// Whether the NIC forwards traffic not addressed to it.
    #[serde(rename = "enableIPForwarding", default, skip_serializing_if = "Option::is_none")]
    pub enable_ip_forwarding: Option<bool>,
    /// Whether accelerated networking is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_accelerated_networking: Option<bool>,
    /// Network security group applied to the NIC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,
    /// Virtual machine the NIC is attached to.
    #[serde(default, skip_serializing)]
    pub virtual_machine: Option<SubResource>,
    /// MAC address.
    #[serde(default, skip_serializing)]
    pub mac_address: Option<String>,
    /// Whether this is the VM's primary NIC.
    #[serde(default, skip_serializing)]
    pub primary: Option<bool>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// DNS settings of a network interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NicDnsSettings {
    /// DNS servers, overriding the network's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
    /// Servers in effect, including inherited ones.
    #[serde(default, skip_serializing)]
    pub applied_dns_servers: Option<Vec<String>>,
    /// Host name label inside the network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_dns_name_label: Option<String>,
    /// Fully qualified internal name.
    #[serde(default, skip_serializing)]
    pub internal_fqdn: Option<String>,
}

/// Properties of a NIC IP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NicIpConfigurationProperties {
    /// Private address.
    #[serde(rename = "privateIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    /// Static or dynamic private address.
    #[serde(rename = "privateIPAllocationMethod", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_allocation_method: Option<IpAllocationMethod>,
    /// Private address family.
    #[serde(rename = "privateIPAddressVersion", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address_version: Option<IpVersion>,
    /// Subnet the configuration lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
    /// Associated public IP address.
    #[serde(rename = "publicIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,
    /// Whether this is the NIC's primary configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    /// Load balancer backend pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_backend_address_pools: Option<Vec<SubResource>>,
    /// Load balancer inbound NAT rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_inbound_nat_rules: Option<Vec<SubResource>>,
    /// Application gateway backend pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_gateway_backend_address_pools: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}
