//! Virtual networks, subnets and network peerings.
//!
//! [`NetworkClient`] is the entry point. A [`Network`] owns its subnets by
//! value; peerings are exposed read-only on the network and managed through
//! [`NetworkPeering`], which keeps both ends of a peering consistent.

#![deny(missing_docs)]

pub mod cidr;
pub mod client;
pub mod models;
pub mod network;
pub mod peering;
pub mod subnet;

#[cfg(test)]
mod testing;

pub use cidr::Ipv4Cidr;
pub use client::NetworkClient;
pub use models::{
    IpAddressAvailability, PeeringInner, PeeringState, SubnetInner, VirtualNetworkInner,
};
pub use network::Network;
pub use peering::{GatewayUse, NetworkPeering};
pub use subnet::{Subnet, SubnetDefinition};

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
