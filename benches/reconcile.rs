//! This bench test simulates reconciling a large hierarchy in which a
//! fraction of the child references point at deleted entities.

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use roadmap::{reconcile::reconcile, EntityId, Feature, Interface, Priority, Product, Release};

/// Generates a hierarchy of interlinked entities. Every tenth child is
/// deleted after linking, leaving its parent holding a dangling reference.
fn preseed(
    products: usize,
    interfaces_per: usize,
    features_per: usize,
) -> (Vec<Product>, Vec<Interface>, Vec<Feature>, Vec<Release>) {
    let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

    let mut all_products = Vec::new();
    let mut all_interfaces = Vec::new();
    let mut all_features = Vec::new();
    let mut all_releases = Vec::new();

    for p in 0..products {
        let mut product = Product::new(format!("product-{p}"), String::new());
        for i in 0..interfaces_per {
            let mut interface = Interface::new(format!("interface-{p}-{i}"), String::new());
            product.interfaces.push(interface.id.clone());
            for f in 0..features_per {
                let mut feature = Feature::new(
                    interface.id.clone(),
                    format!("feature-{p}-{i}-{f}"),
                    String::new(),
                    Priority::Medium,
                );
                interface.features.push(feature.id.clone());
                let release = Release::new(
                    feature.id.clone(),
                    format!("release-{p}-{i}-{f}"),
                    String::new(),
                    date,
                    Priority::Medium,
                );
                feature.releases.push(release.id.clone());
                if f % 10 == 0 {
                    // Dangling: the feature keeps the reference, the
                    // release itself is never stored.
                    feature.releases.push(EntityId::mint());
                } else {
                    all_releases.push(release);
                }
                all_features.push(feature);
            }
            if i % 10 == 0 {
                interface.features.push(EntityId::mint());
            }
            all_interfaces.push(interface);
        }
        all_products.push(product);
    }

    (all_products, all_interfaces, all_features, all_releases)
}

fn reconcile_large_hierarchy(c: &mut Criterion) {
    let (products, interfaces, features, releases) = preseed(10, 10, 20);

    c.bench_function("reconcile 2000 features", |b| {
        b.iter(|| reconcile(&products, &interfaces, &features, &releases));
    });
}

criterion_group!(benches, reconcile_large_hierarchy);
criterion_main!(benches);
