//! Sample catalog shared by the unit and integration tests.
//!
//! ```text
//! catalog (100)
//! ├── shirts (101)
//! │   ├── P-SHIRT (200)  variants V-SHIRT-S (201), V-SHIRT-M (202), V-SHARED (260)
//! │   └── summer (102)
//! │       └── P-TEE (210)  variant V-TEE (211)
//! ├── shoes (103)
//! │   └── P-SNEAKER (220)  variant V-SHARED (260)
//! │       └── P-ADDON (250)  (parent link points at a product)
//! └── B-OUTFIT (230)  (bundle of V-SHIRT-S)
//! ```

use std::sync::Arc;

use catalogsync_core::{CatalogContent, ContentReference, EntryData, NodeContent};

use crate::cache::InMemoryObjectCache;
use crate::graph::{InMemoryContentGraph, Relation, RelationKind};

pub const ROOT: u64 = 100;
pub const SHIRTS: u64 = 101;
pub const SUMMER: u64 = 102;
pub const SHOES: u64 = 103;
pub const SHIRT: u64 = 200;
pub const SHIRT_S: u64 = 201;
pub const SHIRT_M: u64 = 202;
pub const TEE: u64 = 210;
pub const TEE_ONE: u64 = 211;
pub const SNEAKER: u64 = 220;
pub const OUTFIT: u64 = 230;
pub const ADDON: u64 = 250;
pub const SHARED: u64 = 260;

pub fn link(id: u64) -> ContentReference {
    ContentReference::published(id).unwrap()
}

pub fn versioned(id: u64, version: u32) -> ContentReference {
    ContentReference::new(id, version).unwrap()
}

/// Catalog-internal entry id the host uses for content `id` in events.
pub fn entry_id(id: u64) -> i64 {
    id as i64 + 5_000
}

/// Catalog-internal node id the host uses for content `id` in events.
pub fn node_id(id: u64) -> i64 {
    id as i64 + 9_000
}

pub struct Catalog {
    pub graph: Arc<InMemoryContentGraph>,
    pub cache: Arc<InMemoryObjectCache>,
}

fn node(graph: &InMemoryContentGraph, id: u64, code: &str, parent: Option<u64>) {
    let mut n = NodeContent::new(link(id), code, code);
    if let Some(p) = parent {
        n = n.with_parent(link(p));
    }
    graph.insert(node_id(id), CatalogContent::Node(n)).unwrap();
}

fn entry(data: EntryData, parent: u64) -> EntryData {
    data.with_parent(link(parent))
}

pub fn catalog() -> Catalog {
    let cache = Arc::new(InMemoryObjectCache::new());
    let graph = InMemoryContentGraph::with_cache(cache.clone());

    node(&graph, ROOT, "catalog", None);
    node(&graph, SHIRTS, "shirts", Some(ROOT));
    node(&graph, SUMMER, "summer", Some(SHIRTS));
    node(&graph, SHOES, "shoes", Some(ROOT));

    let products = [
        (SHIRT, "P-SHIRT", SHIRTS),
        (TEE, "P-TEE", SUMMER),
        (SNEAKER, "P-SNEAKER", SHOES),
        (ADDON, "P-ADDON", SNEAKER),
    ];
    for (id, code, parent) in products {
        let data = entry(EntryData::new(link(id), code, code), parent)
            .with_asset(format!("https://cdn.example.com/{code}.jpg"));
        graph.insert(entry_id(id), CatalogContent::product(data)).unwrap();
    }

    let variations = [
        (SHIRT_S, "V-SHIRT-S", SHIRTS),
        (SHIRT_M, "V-SHIRT-M", SHIRTS),
        (TEE_ONE, "V-TEE", SUMMER),
        (SHARED, "V-SHARED", SHOES),
    ];
    for (id, code, parent) in variations {
        let data = entry(EntryData::new(link(id), code, code), parent);
        graph.insert(entry_id(id), CatalogContent::variation(data)).unwrap();
    }

    let bundle = entry(EntryData::new(link(OUTFIT), "B-OUTFIT", "Outfit"), ROOT);
    graph.insert(entry_id(OUTFIT), CatalogContent::other_entry(bundle)).unwrap();

    for (product, variation) in [
        (SHIRT, SHIRT_S),
        (SHIRT, SHIRT_M),
        (SHIRT, SHARED),
        (TEE, TEE_ONE),
        (SNEAKER, SHARED),
    ] {
        graph
            .add_relation(Relation::product_variation(link(product), link(variation)))
            .unwrap();
    }

    graph
        .add_relation(Relation::new(RelationKind::BundleEntry, link(OUTFIT), link(SHIRT_S)))
        .unwrap();

    graph
        .set_associations(&link(SHIRT), vec![link(SNEAKER), link(TEE)])
        .unwrap();

    Catalog {
        graph: Arc::new(graph),
        cache,
    }
}
