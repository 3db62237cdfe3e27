//! Virtual network gateways and ExpressRoute circuits.

#![deny(missing_docs)]

pub mod circuit;
pub mod client;
pub mod ip_configuration;
pub mod models;
pub mod peering;
pub mod vnet_gateway;

#[cfg(test)]
mod testing;

pub use circuit::ExpressRouteCircuit;
pub use client::{ExpressRouteCircuitClient, VirtualNetworkGatewayClient};
pub use ip_configuration::GatewayIpConfiguration;
pub use models::{CircuitSkuFamily, CircuitSkuTier, GatewayType, PeeringType, VpnType};
pub use peering::{CircuitPeering, CircuitPeeringDefinition};
pub use vnet_gateway::VirtualNetworkGateway;

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
