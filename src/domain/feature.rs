use serde::{Deserialize, Serialize};

use crate::domain::{EntityId, Priority};

/// A feature is a unit of planned capability behind an interface.
///
/// Features own an ordered list of [`Release`](crate::Release) identifiers,
/// which is a reconciled boundary, and an ordered list of requirement
/// identifiers, which is carried as data only: requirements live outside
/// this tool, so their list is never pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier of the feature.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Planning priority.
    #[serde(default)]
    pub priority: Priority,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Identifier of the interface this feature belongs to.
    pub interface_id: EntityId,
    /// Ordered identifiers of the releases that ship this feature.
    #[serde(default)]
    pub releases: Vec<EntityId>,
    /// Ordered identifiers of externally managed requirements.
    #[serde(default)]
    pub requirements: Vec<EntityId>,
}

impl Feature {
    /// Constructs a new feature owned by the given interface.
    #[must_use]
    pub fn new(
        interface_id: EntityId,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: EntityId::mint(),
            name: name.into(),
            priority,
            description: description.into(),
            interface_id,
            releases: Vec::new(),
            requirements: Vec::new(),
        }
    }
}
