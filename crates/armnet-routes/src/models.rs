//! Wire models for route tables.

use armnet_core::types::{ChildResource, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Route table as exchanged with the provider.
pub type RouteTableInner = TrackedResource<RouteTableProperties>;

/// Route as nested in a route table.
pub type RouteInner = ChildResource<RouteProperties>;

/// Properties of a route table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTableProperties {
    /// Routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteInner>>,
    /// Whether routes learned over BGP are withheld from the subnets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_bgp_route_propagation: Option<bool>,
    /// Subnets the table is applied to.
    #[serde(default, skip_serializing)]
    pub subnets: Option<Vec<SubResource>>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Properties of a route.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteProperties {
    /// Destination CIDR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    /// Kind of next hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hop_type: Option<NextHopType>,
    /// Next hop address, for virtual appliance hops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hop_ip_address: Option<String>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

/// Where matching traffic is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextHopType {
    /// The network's gateway.
    VirtualNetworkGateway,
    /// Within the virtual network.
    VnetLocal,
    /// The internet.
    Internet,
    /// A network virtual appliance, by IP address.
    VirtualAppliance,
    /// Dropped.
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_routes() {
        let table: RouteTableInner = serde_json::from_value(json!({
            "name": "rt",
            "properties": {
                "disableBgpRoutePropagation": true,
                "routes": [{"name": "r1", "properties": {
                    "addressPrefix": "0.0.0.0/0",
                    "nextHopType": "VirtualAppliance",
                    "nextHopIpAddress": "10.0.0.4"
                }}]
            }
        }))
        .unwrap();
        let props = table.properties.unwrap();
        let route = props.routes.unwrap().remove(0).properties.unwrap();
        assert_eq!(route.next_hop_type, Some(NextHopType::VirtualAppliance));
        assert_eq!(props.disable_bgp_route_propagation, Some(true));
    }
}
