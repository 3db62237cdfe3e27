//! Collection operations on application gateways.

use armnet_core::ResourceCollection;

use crate::gateway::ApplicationGateway;

/// Entry point for application gateways in one subscription.
pub type ApplicationGatewayClient = ResourceCollection<ApplicationGateway>;
