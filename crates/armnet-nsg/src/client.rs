//! Collection operations on network security groups.

use armnet_core::ResourceCollection;

use crate::nsg::NetworkSecurityGroup;

/// Entry point for network security groups in one subscription.
pub type NetworkSecurityGroupClient = ResourceCollection<NetworkSecurityGroup>;
