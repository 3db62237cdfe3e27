//! Public IP addresses for the armnet networking SDK.
//!
//! [`PublicIpClient`] locates and lists addresses; [`PublicIpAddress`] is the
//! fluent wrapper used to define, update and inspect a single address.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod public_ip;

#[cfg(test)]
mod testing;

pub use client::PublicIpClient;
pub use models::{PublicIpAddressInner, PublicIpAddressProperties, PublicIpDnsSettings, PublicIpSku};
pub use public_ip::PublicIpAddress;

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
