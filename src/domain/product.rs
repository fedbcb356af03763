use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

/// A product is the root of the roadmap hierarchy.
///
/// Products own an ordered list of [`Interface`](crate::Interface)
/// identifiers. The list records intent, not existence: an interface may be
/// deleted from its own collection at any time, leaving a dangling reference
/// here until the next reconciliation pass prunes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier of the product.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Ordered identifiers of the interfaces this product exposes.
    #[serde(default)]
    pub interfaces: Vec<EntityId>,
    /// Whether the product has been persisted since it was last modified.
    #[serde(default)]
    pub saved: bool,
    /// When the product was last persisted, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Constructs a new, unsaved product with a freshly minted id.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: EntityId::mint(),
            name: name.into(),
            description: description.into(),
            interfaces: Vec::new(),
            saved: false,
            saved_at: None,
        }
    }

    /// Records that the product was persisted at the given instant.
    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.saved = true;
        self.saved_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::Product;

    #[test]
    fn new_products_start_unsaved() {
        let product = Product::new("Billing", "Invoicing and payments");
        assert!(!product.saved);
        assert!(product.saved_at.is_none());
        assert!(product.interfaces.is_empty());
    }

    #[test]
    fn mark_saved_records_timestamp() {
        let mut product = Product::new("Billing", "");
        let now = chrono::Utc::now();
        product.mark_saved(now);
        assert!(product.saved);
        assert_eq!(product.saved_at, Some(now));
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let product: Product =
            serde_json::from_str(r#"{"id": "p1", "name": "Billing"}"#).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert!(product.interfaces.is_empty());
        assert!(!product.saved);
    }
}
