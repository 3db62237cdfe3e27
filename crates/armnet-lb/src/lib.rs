//! Load balancers: frontends, backend pools, probes, balancing rules and
//! inbound NAT rules.
//!
//! Rules refer to their frontend, backend and probe by name while a balancer
//! is being defined; the names are turned into child IDs when it is put.

#![deny(missing_docs)]

pub mod backend;
pub mod client;
pub mod frontend;
pub mod load_balancer;
pub mod models;
pub mod nat_rule;
pub mod probe;
pub mod rule;

#[cfg(test)]
mod testing;

pub use backend::Backend;
pub use client::LoadBalancerClient;
pub use frontend::{Frontend, FrontendDefinition};
pub use load_balancer::LoadBalancer;
pub use models::{LoadBalancerInner, LoadDistribution, ProbeProtocol};
pub use nat_rule::{InboundNatRule, InboundNatRuleDefinition};
pub use probe::{Probe, ProbeDefinition};
pub use rule::{LoadBalancingRule, LoadBalancingRuleDefinition};

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
