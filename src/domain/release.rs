use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EntityId, Priority};

/// A release is a dated shipment of a feature.
///
/// Releases are leaves of the hierarchy: they reference their owning feature
/// but hold no child-reference list of their own, so the reconciler reads
/// this collection only to build a validity index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Stable identifier of the release.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Planned or actual release date.
    pub release_date: NaiveDate,
    /// Planning priority.
    #[serde(default)]
    pub priority: Priority,
    /// Identifier of the feature this release ships.
    pub feature_id: EntityId,
}

impl Release {
    /// Constructs a new release for the given feature.
    #[must_use]
    pub fn new(
        feature_id: EntityId,
        name: impl Into<String>,
        description: impl Into<String>,
        release_date: NaiveDate,
        priority: Priority,
    ) -> Self {
        Self {
            id: EntityId::mint(),
            name: name.into(),
            description: description.into(),
            release_date,
            priority,
            feature_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Release;

    #[test]
    fn release_date_round_trips_as_iso_string() {
        let release: Release = serde_json::from_str(
            r#"{"id": "r1", "name": "v1.0", "release_date": "2026-03-01", "feature_id": "f1"}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&release).unwrap();
        assert_eq!(json["release_date"], "2026-03-01");
    }
}
