//! Wire models for virtual network gateways and ExpressRoute circuits.

use armnet_core::types::{ChildResource, IpAllocationMethod, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Virtual network gateway as exchanged with the provider.
pub type VirtualNetworkGatewayInner = TrackedResource<VirtualNetworkGatewayProperties>;

/// IP configuration of a virtual network gateway.
pub type GatewayIpConfigurationInner = ChildResource<GatewayIpConfigurationProperties>;

/// ExpressRoute circuit as exchanged with the provider.
pub type ExpressRouteCircuitInner = TrackedResource<ExpressRouteCircuitProperties>;

/// Peering of an ExpressRoute circuit.
pub type CircuitPeeringInner = ChildResource<CircuitPeeringProperties>;

/// Properties of a virtual network gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkGatewayProperties {
    /// IP configurations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configurations: Option<Vec<GatewayIpConfigurationInner>>,
    /// VPN or ExpressRoute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_type: Option<GatewayType>,
    /// Route- or policy-based VPN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn_type: Option<VpnType>,
    /// Gateway SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<VirtualNetworkGatewaySku>,
    /// Whether BGP is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_bgp: Option<bool>,
    /// Whether both instances are active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_active: Option<bool>,
    /// BGP speaker settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_settings: Option<BgpSettings>,
    /// Point-to-site settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn_client_configuration: Option<VpnClientConfiguration>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
    /// Immutable GUID assigned by the provider.
    #[serde(default, skip_serializing)]
    pub resource_guid: Option<String>,
}

/// Properties of a gateway IP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayIpConfigurationProperties {
    /// Static or dynamic private address.
    #[serde(rename = "privateIPAllocationMethod", default, skip_serializing_if = "Option::is_none")]
    pub private_ip_allocation_method: Option<IpAllocationMethod>,
    /// The network's `GatewaySubnet`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
    /// Public IP address.
    #[serde(rename = "publicIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Kind of virtual network gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayType {
    /// Site-to-site and point-to-site VPN.
    Vpn,
    /// ExpressRoute.
    ExpressRoute,
}

/// Routing of a VPN gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VpnType {
    /// Route-based (dynamic routing).
    RouteBased,
    /// Policy-based (static routing).
    PolicyBased,
}

/// SKU of a virtual network gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkGatewaySku {
    /// SKU name, e.g. `VpnGw1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SKU tier, the same as the name for current SKUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Reported capacity.
    #[serde(default, skip_serializing)]
    pub capacity: Option<u32>,
}

/// BGP speaker settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BgpSettings {
    /// Autonomous system number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    /// Peering address of the speaker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_peering_address: Option<String>,
    /// Weight of routes learned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_weight: Option<u32>,
}

/// Point-to-site settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpnClientConfiguration {
    /// Addresses handed to VPN clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn_client_address_pool: Option<AddressPool>,
}

/// A list of CIDR prefixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressPool {
    /// Prefixes.
    #[serde(default)]
    pub address_prefixes: Vec<String>,
}

/// Properties of an ExpressRoute circuit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpressRouteCircuitProperties {
    /// Whether classic networks may use the circuit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_classic_operations: Option<bool>,
    /// Circuit provisioning state.
    #[serde(default, skip_serializing)]
    pub circuit_provisioning_state: Option<String>,
    /// Provisioning state on the provider's side.
    #[serde(default, skip_serializing)]
    pub service_provider_provisioning_state: Option<ServiceProviderProvisioningState>,
    /// Peerings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peerings: Option<Vec<CircuitPeeringInner>>,
    /// Key handed to the connectivity provider.
    #[serde(default, skip_serializing)]
    pub service_key: Option<String>,
    /// Notes from the connectivity provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_notes: Option<String>,
    /// Connectivity provider, location and bandwidth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_properties: Option<ServiceProviderProperties>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Connectivity provider of a circuit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderProperties {
    /// Provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_name: Option<String>,
    /// Peering location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peering_location: Option<String>,
    /// Bandwidth in Mbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_in_mbps: Option<u32>,
}

/// Provisioning state on the connectivity provider's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceProviderProvisioningState {
    /// NotProvisioned
    NotProvisioned,
    /// Provisioning
    Provisioning,
    /// Provisioned
    Provisioned,
    /// Deprovisioning
    Deprovisioning,
    /// A state this client does not know.
    #[serde(other)]
    Unknown,
}

/// Properties of a circuit peering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CircuitPeeringProperties {
    /// Peering type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peering_type: Option<PeeringType>,
    /// Enabled or disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// ASN on the cloud side.
    #[serde(default, skip_serializing)]
    pub azure_asn: Option<u32>,
    /// ASN on the customer side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_asn: Option<u64>,
    /// /30 subnet of the primary link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_peer_address_prefix: Option<String>,
    /// /30 subnet of the secondary link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_peer_address_prefix: Option<String>,
    /// Cloud-side port of the primary link.
    #[serde(default, skip_serializing)]
    pub primary_azure_port: Option<String>,
    /// Cloud-side port of the secondary link.
    #[serde(default, skip_serializing)]
    pub secondary_azure_port: Option<String>,
    /// VLAN ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Type of an ExpressRoute peering. Also its name within the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeeringType {
    /// Public services peering.
    AzurePublicPeering,
    /// Private network peering.
    AzurePrivatePeering,
    /// Microsoft services peering.
    MicrosoftPeering,
}

impl PeeringType {
    /// Wire spelling, used as the peering's name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AzurePublicPeering => "AzurePublicPeering",
            Self::AzurePrivatePeering => "AzurePrivatePeering",
            Self::MicrosoftPeering => "MicrosoftPeering",
        }
    }
}

/// Tier of an ExpressRoute circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitSkuTier {
    /// Standard
    Standard,
    /// Premium
    Premium,
}

/// Billing family of an ExpressRoute circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitSkuFamily {
    /// Metered outbound data.
    MeteredData,
    /// Unlimited data.
    UnlimitedData,
}

impl CircuitSkuTier {
    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }
}

impl CircuitSkuFamily {
    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MeteredData => "MeteredData",
            Self::UnlimitedData => "UnlimitedData",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn peering_type_spelling_matches_serde() {
        for kind in [
            PeeringType::AzurePublicPeering,
            PeeringType::AzurePrivatePeering,
            PeeringType::MicrosoftPeering,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn circuit_read_only_fields_are_not_sent() {
        let props: ExpressRouteCircuitProperties = serde_json::from_value(json!({
            "serviceKey": "key",
            "circuitProvisioningState": "Enabled",
            "serviceProviderProvisioningState": "Provisioned",
            "allowClassicOperations": false
        }))
        .unwrap();
        assert_eq!(
            props.service_provider_provisioning_state,
            Some(ServiceProviderProvisioningState::Provisioned)
        );
        assert_eq!(serde_json::to_value(&props).unwrap(), json!({"allowClassicOperations": false}));
    }
}
