use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

/// An interface is a surface a product exposes (an app, an API, a console).
///
/// Interfaces hold an ordered list of [`Feature`](crate::Feature)
/// identifiers. They carry no back-reference to their owning product; that
/// relationship lives solely in the product's `interfaces` list, which is
/// why deleting a product never leaves anything to prune on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Stable identifier of the interface.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Ordered identifiers of the features behind this interface.
    #[serde(default)]
    pub features: Vec<EntityId>,
}

impl Interface {
    /// Constructs a new interface with a freshly minted id.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: EntityId::mint(),
            name: name.into(),
            description: description.into(),
            features: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Interface;

    #[test]
    fn deserializes_without_feature_list() {
        let interface: Interface =
            serde_json::from_str(r#"{"id": "i1", "name": "Mobile app"}"#).unwrap();
        assert!(interface.features.is_empty());
    }
}
