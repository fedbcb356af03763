//! Domain models for product roadmap management.
//!
//! This module contains the core domain types: the four entity kinds
//! (products, interfaces, features, releases), the opaque identifiers that
//! link them, and configuration.

mod config;
pub use config::Config;

/// Opaque entity identifier types.
pub mod id;
pub use id::EntityId;

mod priority;
pub use priority::Priority;

/// Product domain model.
pub mod product;
pub use product::Product;

/// Interface domain model.
pub mod interface;
pub use interface::Interface;

/// Feature domain model.
pub mod feature;
pub use feature::Feature;

/// Release domain model.
pub mod release;
pub use release::Release;
