//! Network interfaces and their IP configurations.

#![deny(missing_docs)]

pub mod client;
pub mod ip_configuration;
pub mod models;
pub mod nic;

#[cfg(test)]
mod testing;

pub use client::NetworkInterfaceClient;
pub use ip_configuration::{NicIpConfiguration, NicIpConfigurationDefinition};
pub use models::{NetworkInterfaceInner, NicIpConfigurationInner};
pub use nic::NetworkInterface;

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
