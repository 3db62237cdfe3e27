//! Application gateways: layer 7 load balancing with listeners, backend
//! pools, backend HTTP configurations, probes and request routing rules.

#![deny(missing_docs)]

pub mod backend;
pub mod client;
pub mod frontend;
pub mod gateway;
pub mod http_configuration;
pub mod ip_configuration;
pub mod listener;
pub mod models;
pub mod probe;
pub mod rule;

#[cfg(test)]
mod testing;

pub use backend::{Backend, BackendDefinition};
pub use client::ApplicationGatewayClient;
pub use frontend::{Frontend, FrontendDefinition, FrontendPort};
pub use gateway::ApplicationGateway;
pub use http_configuration::{BackendHttpConfiguration, BackendHttpConfigurationDefinition};
pub use ip_configuration::GatewayIpConfiguration;
pub use listener::{Listener, ListenerDefinition};
pub use models::{ApplicationGatewayInner, ApplicationGatewayProtocol, ApplicationGatewaySku, OperationalState};
pub use probe::{Probe, ProbeDefinition};
pub use rule::{RequestRoutingRule, RequestRoutingRuleDefinition};

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
