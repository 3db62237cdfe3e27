//! Collection operations on load balancers.

use armnet_core::ResourceCollection;

use crate::load_balancer::LoadBalancer;

/// Entry point for load balancers in one subscription.
pub type LoadBalancerClient = ResourceCollection<LoadBalancer>;
