use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Priority;

/// Configuration for a roadmap workspace.
///
/// This struct holds settings that control how collections are persisted and
/// how destructive operations behave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether a reconciliation pass runs automatically after a deletion.
    ///
    /// When `true` (the default), deleting an entity immediately prunes the
    /// dangling references it leaves behind. When `false`, references are
    /// left in place until an explicit `sync`.
    pub auto_reconcile: bool,

    /// Whether collection files are written with pretty-printed JSON.
    pub pretty_json: bool,

    /// The priority assumed when a feature or release is created without
    /// one.
    pub default_priority: Priority,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_reconcile: default_auto_reconcile(),
            pretty_json: default_pretty_json(),
            default_priority: Priority::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

const fn default_auto_reconcile() -> bool {
    true
}

const fn default_pretty_json() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_auto_reconcile")]
        auto_reconcile: bool,

        #[serde(default = "default_pretty_json")]
        pretty_json: bool,

        #[serde(default)]
        default_priority: Priority,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                auto_reconcile,
                pretty_json,
                default_priority,
            } => Self {
                auto_reconcile,
                pretty_json,
                default_priority,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            auto_reconcile: config.auto_reconcile,
            pretty_json: config.pretty_json,
            default_priority: config.default_priority,
        }
    }
}
