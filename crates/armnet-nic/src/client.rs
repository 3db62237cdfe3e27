//! Collection operations on network interfaces.

use armnet_core::ResourceCollection;

use crate::nic::NetworkInterface;

/// Entry point for network interfaces in one subscription.
pub type NetworkInterfaceClient = ResourceCollection<NetworkInterface>;
