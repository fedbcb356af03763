//! Plain-text Product Roadmap Management
//!
//! A roadmap workspace is a directory of JSON collection files describing
//! products, the interfaces they expose, the features behind those
//! interfaces, and the releases that ship them. Parent entities hold ordered
//! lists of child identifiers; the [`reconcile`] module keeps those lists
//! free of dangling references after deletions.

pub mod domain;
pub use domain::{Config, EntityId, Feature, Interface, Priority, Product, Release};

/// Referential-integrity reconciliation across entity collections.
pub mod reconcile;
pub use reconcile::{ChangeReport, Reconciliation};

/// Filesystem storage and workspace management for roadmap collections.
pub mod storage;
pub use storage::{Boundary, DanglingReference, Workspace};
