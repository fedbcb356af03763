//! A filesystem backed store of roadmap collections.
//!
//! The [`Workspace`] owns the four entity collections for one roadmap
//! directory. Each collection is loaded from its own JSON file on open and
//! written back by [`Workspace::flush`]; in between, all reads and writes
//! are in-memory. The workspace is the single caller of the reconciliation
//! core and is responsible for committing its results.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{
    domain::{Config, EntityId, Feature, Interface, Priority, Product, Release},
    reconcile::{self, ChangeReport, validity_index},
    storage::collection::{self, LoadError},
};

const PRODUCTS_FILE: &str = "products.json";
const INTERFACES_FILE: &str = "interfaces.json";
const FEATURES_FILE: &str = "features.json";
const RELEASES_FILE: &str = "releases.json";

/// The four entity kinds a workspace manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A product.
    Product,
    /// An interface.
    Interface,
    /// A feature.
    Feature,
    /// A release.
    Release,
}

impl EntityKind {
    /// Returns the lowercase singular name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Interface => "interface",
            Self::Feature => "feature",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parent→child boundary of the reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Product interface lists referencing the interface collection.
    ProductInterface,
    /// Interface feature lists referencing the feature collection.
    InterfaceFeature,
    /// Feature release lists referencing the release collection.
    FeatureRelease,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ProductInterface => "product → interface",
            Self::InterfaceFeature => "interface → feature",
            Self::FeatureRelease => "feature → release",
        };
        f.write_str(label)
    }
}

/// A reference held by a parent entity whose target no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Which boundary the reference belongs to.
    pub boundary: Boundary,
    /// Identifier of the parent holding the reference.
    pub parent: EntityId,
    /// The referenced identifier with no backing entity.
    pub missing: EntityId,
}

/// Errors that can occur when opening a workspace.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// A collection file exists but could not be loaded.
    #[error("failed to load {}: {source}", path.display())]
    Load {
        /// Path of the offending collection file.
        path: PathBuf,
        /// The underlying load failure.
        source: LoadError,
    },
}

/// Errors that can occur when an operation names a missing entity.
#[derive(Debug, thiserror::Error)]
#[error("{kind} {id} not found")]
pub struct NotFound {
    /// The kind of the missing entity.
    pub kind: EntityKind,
    /// The identifier that was looked up.
    pub id: EntityId,
}

/// Alias kept for readability at call sites that report reference failures.
pub type ReferenceError = NotFound;

#[derive(Debug, Default, Clone, Copy)]
struct Dirty {
    products: bool,
    interfaces: bool,
    features: bool,
    releases: bool,
}

/// A filesystem backed store of roadmap collections.
#[derive(Debug)]
pub struct Workspace {
    /// The root of the directory collections are stored in.
    root: PathBuf,
    config: Config,
    products: Vec<Product>,
    interfaces: Vec<Interface>,
    features: Vec<Feature>,
    releases: Vec<Release>,
    dirty: Dirty,
}

impl Workspace {
    /// Opens the workspace at the given root, loading all four collections.
    ///
    /// Absent collection files load as empty collections. The configuration
    /// is read from `.roadmap/config.toml`; a missing or unreadable config
    /// falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Load`] if a collection file exists but
    /// cannot be read or parsed.
    pub fn open(root: PathBuf) -> Result<Self, WorkspaceError> {
        let config = load_config(&root);

        let products = load_collection(&root, PRODUCTS_FILE)?;
        let interfaces = load_collection(&root, INTERFACES_FILE)?;
        let features = load_collection(&root, FEATURES_FILE)?;
        let releases = load_collection(&root, RELEASES_FILE)?;

        Ok(Self {
            root,
            config,
            products,
            interfaces,
            features,
            releases,
            dirty: Dirty::default(),
        })
    }

    /// The workspace configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// All products, in file order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All interfaces, in file order.
    #[must_use]
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// All features, in file order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// All releases, in file order.
    #[must_use]
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Looks up a product by id.
    #[must_use]
    pub fn product(&self, id: &EntityId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Looks up an interface by id.
    #[must_use]
    pub fn interface(&self, id: &EntityId) -> Option<&Interface> {
        self.interfaces.iter().find(|interface| &interface.id == id)
    }

    /// Looks up a feature by id.
    #[must_use]
    pub fn feature(&self, id: &EntityId) -> Option<&Feature> {
        self.features.iter().find(|feature| &feature.id == id)
    }

    /// Looks up a release by id.
    #[must_use]
    pub fn release(&self, id: &EntityId) -> Option<&Release> {
        self.releases.iter().find(|release| &release.id == id)
    }

    /// Creates a new product.
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &Product {
        self.products.push(Product::new(name, description));
        self.dirty.products = true;
        self.products.last().expect("just pushed")
    }

    /// Creates a new interface and links it into the owning product's
    /// interface list.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist.
    pub fn add_interface(
        &mut self,
        product_id: &EntityId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&Interface, ReferenceError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| &product.id == product_id)
            .ok_or_else(|| NotFound {
                kind: EntityKind::Product,
                id: product_id.clone(),
            })?;

        let interface = Interface::new(name, description);
        product.interfaces.push(interface.id.clone());
        self.interfaces.push(interface);
        self.dirty.products = true;
        self.dirty.interfaces = true;
        Ok(self.interfaces.last().expect("just pushed"))
    }

    /// Creates a new feature and links it into the owning interface's
    /// feature list.
    ///
    /// When no priority is given, the configured default applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the interface does not exist.
    pub fn add_feature(
        &mut self,
        interface_id: &EntityId,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: Option<Priority>,
    ) -> Result<&Feature, ReferenceError> {
        let priority = priority.unwrap_or(self.config.default_priority);
        let interface = self
            .interfaces
            .iter_mut()
            .find(|interface| &interface.id == interface_id)
            .ok_or_else(|| NotFound {
                kind: EntityKind::Interface,
                id: interface_id.clone(),
            })?;

        let feature = Feature::new(interface_id.clone(), name, description, priority);
        interface.features.push(feature.id.clone());
        self.features.push(feature);
        self.dirty.interfaces = true;
        self.dirty.features = true;
        Ok(self.features.last().expect("just pushed"))
    }

    /// Creates a new release and links it into the owning feature's release
    /// list.
    ///
    /// When no priority is given, the configured default applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature does not exist.
    pub fn add_release(
        &mut self,
        feature_id: &EntityId,
        name: impl Into<String>,
        description: impl Into<String>,
        release_date: chrono::NaiveDate,
        priority: Option<Priority>,
    ) -> Result<&Release, ReferenceError> {
        let priority = priority.unwrap_or(self.config.default_priority);
        let feature = self
            .features
            .iter_mut()
            .find(|feature| &feature.id == feature_id)
            .ok_or_else(|| NotFound {
                kind: EntityKind::Feature,
                id: feature_id.clone(),
            })?;

        let release = Release::new(feature_id.clone(), name, description, release_date, priority);
        feature.releases.push(release.id.clone());
        self.releases.push(release);
        self.dirty.features = true;
        self.dirty.releases = true;
        Ok(self.releases.last().expect("just pushed"))
    }

    /// Deletes an entity from its collection.
    ///
    /// Deletion removes only the entity itself; references to it held by
    /// parents become dangling. When `auto_reconcile` is configured, a
    /// reconciliation pass runs immediately and its report is returned;
    /// otherwise the dangling references remain until an explicit
    /// [`Workspace::reconcile`].
    ///
    /// # Errors
    ///
    /// Returns an error if no entity of the given kind has the given id.
    pub fn delete(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<ChangeReport>, ReferenceError> {
        let removed = match kind {
            EntityKind::Product => remove_by_id(&mut self.products, id, |p| &p.id),
            EntityKind::Interface => remove_by_id(&mut self.interfaces, id, |i| &i.id),
            EntityKind::Feature => remove_by_id(&mut self.features, id, |f| &f.id),
            EntityKind::Release => remove_by_id(&mut self.releases, id, |r| &r.id),
        };

        if !removed {
            return Err(NotFound {
                kind,
                id: id.clone(),
            });
        }

        match kind {
            EntityKind::Product => self.dirty.products = true,
            EntityKind::Interface => self.dirty.interfaces = true,
            EntityKind::Feature => self.dirty.features = true,
            EntityKind::Release => self.dirty.releases = true,
        }

        if self.config.auto_reconcile {
            Ok(Some(self.reconcile()))
        } else {
            Ok(None)
        }
    }

    /// Runs a reconciliation pass and commits the collections it changed.
    ///
    /// Only collections flagged in the returned report are replaced and
    /// marked dirty; untouched collections keep their current values and
    /// are not rewritten by the next flush.
    pub fn reconcile(&mut self) -> ChangeReport {
        let outcome = reconcile::reconcile(
            &self.products,
            &self.interfaces,
            &self.features,
            &self.releases,
        );

        if outcome.report.products_changed {
            self.products = outcome.products;
            self.dirty.products = true;
        }
        if outcome.report.interfaces_changed {
            self.interfaces = outcome.interfaces;
            self.dirty.interfaces = true;
        }
        if outcome.report.features_changed {
            self.features = outcome.features;
            self.dirty.features = true;
        }

        outcome.report
    }

    /// Finds every reference whose target entity no longer exists.
    ///
    /// This is the read-only counterpart of [`Workspace::reconcile`], used
    /// by `validate` and `status` to report without mutating.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        let valid = validity_index(self.interfaces.iter().map(|interface| &interface.id));
        for product in &self.products {
            for id in &product.interfaces {
                if !valid.contains(id) {
                    dangling.push(DanglingReference {
                        boundary: Boundary::ProductInterface,
                        parent: product.id.clone(),
                        missing: id.clone(),
                    });
                }
            }
        }

        let valid = validity_index(self.features.iter().map(|feature| &feature.id));
        for interface in &self.interfaces {
            for id in &interface.features {
                if !valid.contains(id) {
                    dangling.push(DanglingReference {
                        boundary: Boundary::InterfaceFeature,
                        parent: interface.id.clone(),
                        missing: id.clone(),
                    });
                }
            }
        }

        let valid = validity_index(self.releases.iter().map(|release| &release.id));
        for feature in &self.features {
            for id in &feature.releases {
                if !valid.contains(id) {
                    dangling.push(DanglingReference {
                        boundary: Boundary::FeatureRelease,
                        parent: feature.id.clone(),
                        missing: id.clone(),
                    });
                }
            }
        }

        dangling
    }

    /// Persists every dirty collection and clears the dirty flags.
    ///
    /// Products are stamped as saved before they are written.
    ///
    /// # Errors
    ///
    /// Returns an error if a collection file cannot be written.
    pub fn flush(&mut self) -> io::Result<()> {
        let pretty = self.config.pretty_json;

        if self.dirty.products {
            let now = Utc::now();
            for product in &mut self.products {
                product.mark_saved(now);
            }
            collection::save(&self.root.join(PRODUCTS_FILE), &self.products, pretty)?;
            self.dirty.products = false;
        }
        if self.dirty.interfaces {
            collection::save(&self.root.join(INTERFACES_FILE), &self.interfaces, pretty)?;
            self.dirty.interfaces = false;
        }
        if self.dirty.features {
            collection::save(&self.root.join(FEATURES_FILE), &self.features, pretty)?;
            self.dirty.features = false;
        }
        if self.dirty.releases {
            collection::save(&self.root.join(RELEASES_FILE), &self.releases, pretty)?;
            self.dirty.releases = false;
        }

        Ok(())
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(".roadmap").join("config.toml");
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn load_collection<T: serde::de::DeserializeOwned>(
    root: &Path,
    file: &str,
) -> Result<Vec<T>, WorkspaceError> {
    let path = root.join(file);
    collection::load(&path).map_err(|source| WorkspaceError::Load { path, source })
}

fn remove_by_id<T>(entities: &mut Vec<T>, id: &EntityId, key: impl Fn(&T) -> &EntityId) -> bool {
    entities
        .iter()
        .position(|entity| key(entity) == id)
        .map(|index| entities.remove(index))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(root: &Path) -> Workspace {
        Workspace::open(root.to_path_buf()).expect("failed to open workspace")
    }

    fn date(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    /// Builds product → interface → feature → release and returns the ids.
    fn seed(workspace: &mut Workspace) -> (EntityId, EntityId, EntityId, EntityId) {
        let product_id = workspace.add_product("Billing", "").id.clone();
        let interface_id = workspace
            .add_interface(&product_id, "Mobile app", "")
            .unwrap()
            .id
            .clone();
        let feature_id = workspace
            .add_feature(&interface_id, "Search", "", None)
            .unwrap()
            .id
            .clone();
        let release_id = workspace
            .add_release(&feature_id, "v1.0", "", date("2026-03-01"), None)
            .unwrap()
            .id
            .clone();
        (product_id, interface_id, feature_id, release_id)
    }

    #[test]
    fn open_on_empty_directory_yields_empty_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = open(tmp.path());

        assert!(workspace.products().is_empty());
        assert!(workspace.interfaces().is_empty());
        assert!(workspace.features().is_empty());
        assert!(workspace.releases().is_empty());
    }

    #[test]
    fn created_entities_survive_flush_and_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = open(tmp.path());
        let (product_id, interface_id, feature_id, release_id) = seed(&mut workspace);
        workspace.flush().unwrap();

        let reloaded = open(tmp.path());
        assert_eq!(reloaded.product(&product_id).unwrap().interfaces, [
            interface_id.clone()
        ]);
        assert_eq!(reloaded.interface(&interface_id).unwrap().features, [
            feature_id.clone()
        ]);
        assert_eq!(reloaded.feature(&feature_id).unwrap().releases, [
            release_id.clone()
        ]);
        assert_eq!(reloaded.release(&release_id).unwrap().feature_id, feature_id);
    }

    #[test]
    fn flushed_products_are_stamped_as_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = open(tmp.path());
        let product_id = workspace.add_product("Billing", "").id.clone();
        workspace.flush().unwrap();

        let reloaded = open(tmp.path());
        let product = reloaded.product(&product_id).unwrap();
        assert!(product.saved);
        assert!(product.saved_at.is_some());
    }

    #[test]
    fn delete_with_auto_reconcile_prunes_parent_reference() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = open(tmp.path());
        let (product_id, interface_id, ..) = seed(&mut workspace);

        let report = workspace
            .delete(EntityKind::Interface, &interface_id)
            .unwrap()
            .expect("auto_reconcile is on by default");

        assert!(report.products_changed);
        assert!(workspace.product(&product_id).unwrap().interfaces.is_empty());
        assert!(workspace.dangling_references().is_empty());
    }

    #[test]
    fn delete_without_auto_reconcile_leaves_dangling_reference() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join(".roadmap");
        std::fs::create_dir_all(&config_dir).unwrap();
        let config = Config {
            auto_reconcile: false,
            ..Config::default()
        };
        config.save(&config_dir.join("config.toml")).unwrap();

        let mut workspace = open(tmp.path());
        let (product_id, interface_id, ..) = seed(&mut workspace);

        let report = workspace
            .delete(EntityKind::Interface, &interface_id)
            .unwrap();
        assert!(report.is_none());

        let dangling = workspace.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].boundary, Boundary::ProductInterface);
        assert_eq!(dangling[0].parent, product_id);
        assert_eq!(dangling[0].missing, interface_id);

        // An explicit pass cleans up.
        let report = workspace.reconcile();
        assert!(report.products_changed);
        assert!(workspace.dangling_references().is_empty());
    }

    #[test]
    fn reconcile_only_rewrites_changed_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = open(tmp.path());
        let (_, _, feature_id, release_id) = seed(&mut workspace);
        workspace.flush().unwrap();

        // Delete the release under a fresh workspace so only the
        // feature→release boundary is affected.
        let mut workspace = open(tmp.path());
        workspace
            .delete(EntityKind::Release, &release_id)
            .unwrap()
            .expect("auto_reconcile is on by default");
        workspace.flush().unwrap();

        let reloaded = open(tmp.path());
        assert!(reloaded.feature(&feature_id).unwrap().releases.is_empty());
        assert!(reloaded.release(&release_id).is_none());
        // Untouched boundaries keep their references.
        assert_eq!(reloaded.products()[0].interfaces.len(), 1);
        assert_eq!(reloaded.interfaces()[0].features.len(), 1);
    }

    #[test]
    fn delete_unknown_id_returns_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = open(tmp.path());

        let error = workspace
            .delete(EntityKind::Product, &EntityId::from("nope"))
            .unwrap_err();
        assert_eq!(error.kind, EntityKind::Product);
        assert_eq!(error.id, EntityId::from("nope"));
    }

    #[test]
    fn add_feature_uses_configured_default_priority() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join(".roadmap");
        std::fs::create_dir_all(&config_dir).unwrap();
        let config = Config {
            default_priority: Priority::High,
            ..Config::default()
        };
        config.save(&config_dir.join("config.toml")).unwrap();

        let mut workspace = open(tmp.path());
        let product_id = workspace.add_product("Billing", "").id.clone();
        let interface_id = workspace
            .add_interface(&product_id, "API", "")
            .unwrap()
            .id
            .clone();
        let feature = workspace
            .add_feature(&interface_id, "Search", "", None)
            .unwrap();

        assert_eq!(feature.priority, Priority::High);
    }

    #[test]
    fn add_interface_to_missing_product_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = open(tmp.path());

        let error = workspace
            .add_interface(&EntityId::from("nope"), "API", "")
            .unwrap_err();
        assert_eq!(error.kind, EntityKind::Product);
    }

    #[test]
    fn open_rejects_malformed_collection_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(PRODUCTS_FILE), "{broken").unwrap();

        let error = Workspace::open(tmp.path().to_path_buf()).unwrap_err();
        let WorkspaceError::Load { path, .. } = error;
        assert!(path.ends_with(PRODUCTS_FILE));
    }
}
