//! Referential-integrity reconciliation across entity collections.
//!
//! Entities are created and deleted by their own collection owners; parents
//! record children as ordered identifier lists. Deleting a child therefore
//! leaves a dangling identifier behind in its parent's list. A
//! reconciliation pass takes a snapshot of all four collections, prunes each
//! parent's list down to the identifiers that still exist, and reports which
//! collections were mutated so the caller can decide what to persist.
//!
//! The pass is pure and idempotent: it never creates or deletes entities,
//! only rewrites reference lists, and running it twice without intervening
//! mutation reports no changes on the second run. All validity indexes are
//! built from the snapshot taken at the call boundary; since pruning never
//! removes an entity from its own collection, this is indistinguishable
//! from rebuilding each index mid-pass.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::domain::{EntityId, Feature, Interface, Product, Release};

/// Summary of which collections a reconciliation pass mutated.
///
/// A collection counts as changed only when at least one of its entities had
/// a reference actually removed; rewriting a list with identical content
/// does not set the flag. Releases have no reference list of their own, so
/// the report carries no flag for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    /// At least one product's interface list was pruned.
    pub products_changed: bool,
    /// At least one interface's feature list was pruned.
    pub interfaces_changed: bool,
    /// At least one feature's release list was pruned.
    pub features_changed: bool,
    /// Logical OR of the three collection flags.
    pub any_changed: bool,
}

impl ChangeReport {
    const fn new(
        products_changed: bool,
        interfaces_changed: bool,
        features_changed: bool,
    ) -> Self {
        Self {
            products_changed,
            interfaces_changed,
            features_changed,
            any_changed: products_changed || interfaces_changed || features_changed,
        }
    }
}

/// The result of a reconciliation pass.
///
/// Holds new values for the three collections that carry reference lists,
/// alongside the [`ChangeReport`]. The release collection is read-only input
/// to the pass (releases are leaves) and is not returned. Committing the new
/// values back to whatever store owns them is the caller's decision; the
/// pass itself performs no persistence.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Products with their interface lists pruned.
    pub products: Vec<Product>,
    /// Interfaces with their feature lists pruned.
    pub interfaces: Vec<Interface>,
    /// Features with their release lists pruned.
    pub features: Vec<Feature>,
    /// Which collections were mutated.
    pub report: ChangeReport,
}

/// Builds the set of identifiers presently in a collection.
///
/// The index is an O(1) membership oracle for one boundary of the pass. It
/// is rebuilt fresh on every pass; an empty collection yields an empty set.
#[must_use]
pub fn validity_index<'a, I>(ids: I) -> HashSet<&'a EntityId>
where
    I: IntoIterator<Item = &'a EntityId>,
{
    ids.into_iter().collect()
}

/// Retains only identifiers present in the validity index, preserving the
/// relative order of survivors. Returns whether anything was removed.
///
/// An equal length before and after means every identifier survived, so the
/// content is unchanged and the parent is not counted as changed.
fn prune(references: &mut Vec<EntityId>, valid: &HashSet<&EntityId>) -> bool {
    let before = references.len();
    references.retain(|id| valid.contains(id));
    references.len() != before
}

/// Runs one reconciliation pass over snapshots of the four collections.
///
/// The three boundaries are pruned in dependency order: Product→Interface,
/// Interface→Feature, Feature→Release. Feature requirement lists reference
/// externally managed entities and are left untouched.
#[must_use]
#[instrument(skip_all, fields(
    products = products.len(),
    interfaces = interfaces.len(),
    features = features.len(),
    releases = releases.len(),
))]
pub fn reconcile(
    products: &[Product],
    interfaces: &[Interface],
    features: &[Feature],
    releases: &[Release],
) -> Reconciliation {
    let mut products = products.to_vec();
    let mut interfaces = interfaces.to_vec();
    let mut features = features.to_vec();

    let valid_interfaces = validity_index(interfaces.iter().map(|interface| &interface.id));
    let mut products_changed = false;
    for product in &mut products {
        products_changed |= prune(&mut product.interfaces, &valid_interfaces);
    }

    let valid_features = validity_index(features.iter().map(|feature| &feature.id));
    let mut interfaces_changed = false;
    for interface in &mut interfaces {
        interfaces_changed |= prune(&mut interface.features, &valid_features);
    }

    let valid_releases = validity_index(releases.iter().map(|release| &release.id));
    let mut features_changed = false;
    for feature in &mut features {
        features_changed |= prune(&mut feature.releases, &valid_releases);
    }

    let report = ChangeReport::new(products_changed, interfaces_changed, features_changed);
    if report.any_changed {
        tracing::debug!(
            products = report.products_changed,
            interfaces = report.interfaces_changed,
            features = report.features_changed,
            "pruned dangling references"
        );
    }

    Reconciliation {
        products,
        interfaces,
        features,
        report,
    }
}
