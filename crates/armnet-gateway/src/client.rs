//! Collection operations on gateways and circuits.

use armnet_core::ResourceCollection;

use crate::circuit::ExpressRouteCircuit;
use crate::vnet_gateway::VirtualNetworkGateway;

/// Entry point for virtual network gateways in one subscription.
pub type VirtualNetworkGatewayClient = ResourceCollection<VirtualNetworkGateway>;

/// Entry point for ExpressRoute circuits in one subscription.
pub type ExpressRouteCircuitClient = ResourceCollection<ExpressRouteCircuit>;
