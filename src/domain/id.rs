//! Opaque entity identifiers.
//!
//! Every entity in a roadmap workspace is addressed by an [`EntityId`]. Ids
//! are opaque strings: freshly minted ids are UUIDv4 strings, but the type
//! accepts any non-structured string so that collections written by other
//! tools (or hand-edited) remain loadable.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, stable identifier for a roadmap entity.
///
/// Identifiers are compared byte-for-byte and carry no internal structure.
/// They are unique within a collection but the type does not enforce this;
/// uniqueness is the responsibility of whichever store owns the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Mints a fresh identifier backed by a new UUIDv4.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
