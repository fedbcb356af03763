mod collection;
/// Workspace directory management for roadmap collections.
pub mod workspace;

pub use collection::LoadError;
pub use workspace::{
    Boundary, DanglingReference, EntityKind, ReferenceError, Workspace, WorkspaceError,
};
