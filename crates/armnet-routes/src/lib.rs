//! Route tables and their routes.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod route;
pub mod route_table;

#[cfg(test)]
mod testing;

pub use client::RouteTableClient;
pub use models::{NextHopType, RouteInner, RouteTableInner};
pub use route::{Route, RouteDefinition};
pub use route_table::RouteTable;

/// Convenient result alias sharing the `armnet-core` error type.
pub type Result<T> = armnet_core::Result<T>;
