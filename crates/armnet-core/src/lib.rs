//! # armnet-core
//!
//! Core types and utilities shared by the armnet networking resource crates.
//!
//! This crate provides error handling, configuration, resource identifiers,
//! wire envelopes and the HTTP transport used by the fluent resource wrappers.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`resource_id`] - Parsing and building of hierarchical resource IDs
//! - [`types`] - Wire envelopes shared by all networking resources
//! - [`config`] - Configuration structures for the resource manager client
//! - [`client`] - HTTP client settings and retry policy
//! - [`transport`] - Transport trait, reqwest implementation and typed context
//! - [`children`] - Child collection indexing and default resolution
//! - [`fluent`] - Shared state of top-level fluent wrappers
//! - [`naming`] - Random resource name generation
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod children;
pub mod client;
pub mod config;
pub mod error;
pub mod fluent;
pub mod naming;
pub mod query;
pub mod resource_id;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fluent::{ResourceCollection, ResourceScope, TopLevelResource};
pub use resource_id::ResourceId;
pub use transport::{ArmClient, ArmClientBuilder, ArmContext, ResourceTransport};
pub use types::{ChildResource, SubResource, TrackedResource};
