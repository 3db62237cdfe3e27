//! Network security groups and their security rules.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod nsg;
pub mod rule;

#[cfg(test)]
mod testing;

pub use client::NetworkSecurityGroupClient;
pub use models::{
    NetworkSecurityGroupInner, SecurityRuleAccess, SecurityRuleDirection, SecurityRuleInner,
    SecurityRuleProtocol,
};
pub use nsg::NetworkSecurityGroup;
pub use rule::{SecurityRule, SecurityRuleDefinition};

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
