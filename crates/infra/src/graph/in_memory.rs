use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use catalogsync_core::{
    CatalogContent, CatalogContentType, ContentIdentity, ContentReference, NodeContent,
};

use super::{ContentGraph, GraphError, Relation, RelationKind};
use crate::cache::{
    DEFAULT_ASSOCIATION_CACHE_PREFIX, InMemoryObjectCache, ObjectCache, association_cache_key,
};

#[derive(Debug, Default)]
struct GraphState {
    content: HashMap<ContentIdentity, CatalogContent>,
    relations: Vec<Relation>,
    associations: HashMap<ContentIdentity, Vec<ContentReference>>,
    catalog_ids: HashMap<(CatalogContentType, i64), ContentIdentity>,
    codes: HashMap<String, ContentIdentity>,
}

/// In-memory catalog graph for tests/dev.
///
/// Holds one version per content item; loads ignore the requested version.
/// Association lists are read cache-aside through the shared object cache
/// and, like the host, are NOT evicted when updated through
/// [`InMemoryContentGraph::set_associations`].
#[derive(Debug)]
pub struct InMemoryContentGraph<C = InMemoryObjectCache> {
    state: RwLock<GraphState>,
    cache: Arc<C>,
    association_cache_prefix: String,
    batches: Mutex<Vec<Vec<ContentReference>>>,
}

impl InMemoryContentGraph {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(InMemoryObjectCache::new()))
    }
}

impl Default for InMemoryContentGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ObjectCache> InMemoryContentGraph<C> {
    pub fn with_cache(cache: Arc<C>) -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
            cache,
            association_cache_prefix: DEFAULT_ASSOCIATION_CACHE_PREFIX.to_string(),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_association_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.association_cache_prefix = prefix.into();
        self
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, GraphState>, GraphError> {
        self.state
            .read()
            .map_err(|_| GraphError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, GraphState>, GraphError> {
        self.state
            .write()
            .map_err(|_| GraphError::Unavailable("lock poisoned".to_string()))
    }

    /// Add or replace content, registering its catalog-internal id and code.
    pub fn insert(&self, catalog_id: i64, content: CatalogContent) -> Result<(), GraphError> {
        let identity = content.content_link().identity();
        let kind = match &content {
            CatalogContent::Entry(_) => CatalogContentType::CatalogEntry,
            CatalogContent::Node(_) => CatalogContentType::CatalogNode,
        };

        let mut state = self.write()?;
        if let CatalogContent::Entry(entry) = &content {
            state.codes.insert(entry.code().to_string(), identity);
        }
        state.catalog_ids.insert((kind, catalog_id), identity);
        state.content.insert(identity, content);
        Ok(())
    }

    pub fn remove(
        &self,
        reference: &ContentReference,
    ) -> Result<Option<CatalogContent>, GraphError> {
        let identity = reference.identity();
        let mut state = self.write()?;
        state.codes.retain(|_, id| *id != identity);
        state.catalog_ids.retain(|_, id| *id != identity);
        state
            .relations
            .retain(|r| !r.parent.same_entity(reference) && !r.child.same_entity(reference));
        Ok(state.content.remove(&identity))
    }

    /// Add a relation between two items already in the graph.
    pub fn add_relation(&self, relation: Relation) -> Result<(), GraphError> {
        let mut state = self.write()?;
        for end in [relation.parent, relation.child] {
            if !state.content.contains_key(&end.identity()) {
                return Err(GraphError::NotFound(end));
            }
        }
        if !state.relations.contains(&relation) {
            state.relations.push(relation);
        }
        Ok(())
    }

    /// Replace the association list of `owner` in the backing store only.
    pub fn set_associations(
        &self,
        owner: &ContentReference,
        targets: Vec<ContentReference>,
    ) -> Result<(), GraphError> {
        self.write()?.associations.insert(owner.identity(), targets);
        Ok(())
    }

    /// Every batch passed to `get_items`, oldest first.
    pub fn batch_requests(&self) -> Vec<Vec<ContentReference>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

fn sorted_by_id(mut items: Vec<CatalogContent>) -> Vec<CatalogContent> {
    items.sort_by_key(|c| c.content_link().id());
    items
}

impl<C: ObjectCache> ContentGraph for InMemoryContentGraph<C> {
    fn try_get(
        &self,
        reference: &ContentReference,
        _language: &str,
    ) -> Result<Option<CatalogContent>, GraphError> {
        Ok(self.read()?.content.get(&reference.identity()).cloned())
    }

    fn get_items(
        &self,
        references: &[ContentReference],
        _language: &str,
    ) -> Result<Vec<CatalogContent>, GraphError> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(references.to_vec());
        }

        let state = self.read()?;
        Ok(references
            .iter()
            .filter_map(|r| state.content.get(&r.identity()).cloned())
            .collect())
    }

    fn get_parents(
        &self,
        reference: &ContentReference,
        kind: RelationKind,
    ) -> Result<Vec<Relation>, GraphError> {
        Ok(self
            .read()?
            .relations
            .iter()
            .filter(|r| r.kind == kind && r.child.same_entity(reference))
            .copied()
            .collect())
    }

    fn get_children_relations(
        &self,
        reference: &ContentReference,
        kind: RelationKind,
    ) -> Result<Vec<Relation>, GraphError> {
        Ok(self
            .read()?
            .relations
            .iter()
            .filter(|r| r.kind == kind && r.parent.same_entity(reference))
            .copied()
            .collect())
    }

    fn get_children(
        &self,
        reference: &ContentReference,
        _language: &str,
    ) -> Result<Vec<CatalogContent>, GraphError> {
        let state = self.read()?;
        let children = state
            .content
            .values()
            .filter(|c| {
                let parent = match c {
                    CatalogContent::Entry(e) => e.data().parent_link,
                    CatalogContent::Node(n) => n.parent_link,
                };
                parent.is_some_and(|p| p.same_entity(reference))
            })
            .cloned()
            .collect();
        Ok(sorted_by_id(children))
    }

    fn catalog_roots(&self, _language: &str) -> Result<Vec<NodeContent>, GraphError> {
        let state = self.read()?;
        let mut roots: Vec<NodeContent> = state
            .content
            .values()
            .filter_map(|c| match c {
                CatalogContent::Node(n) if n.parent_link.is_none() => Some(n.clone()),
                _ => None,
            })
            .collect();
        roots.sort_by_key(|n| n.content_link.id());
        Ok(roots)
    }

    fn get_associations(
        &self,
        reference: &ContentReference,
    ) -> Result<Vec<ContentReference>, GraphError> {
        let key = association_cache_key(&self.association_cache_prefix, reference.id());

        if let Some(cached) = self.cache.get(&key) {
            return serde_json::from_value(cached).map_err(|e| GraphError::CorruptCache {
                key,
                reason: e.to_string(),
            });
        }

        let targets = self
            .read()?
            .associations
            .get(&reference.identity())
            .cloned()
            .unwrap_or_default();

        let value = serde_json::to_value(&targets).map_err(|e| GraphError::CorruptCache {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.cache.insert(key, value);
        Ok(targets)
    }

    fn reference_for_id(
        &self,
        id: i64,
        kind: CatalogContentType,
        version: u32,
    ) -> Option<ContentReference> {
        let state = self.state.read().ok()?;
        let identity = state.catalog_ids.get(&(kind, id))?;
        ContentReference::new(identity.get(), version).ok()
    }

    fn reference_for_code(&self, code: &str) -> Option<ContentReference> {
        let state = self.state.read().ok()?;
        let identity = state.codes.get(code)?;
        ContentReference::published(identity.get()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogsync_core::EntryData;

    fn link(id: u64) -> ContentReference {
        ContentReference::published(id).unwrap()
    }

    fn entry(id: u64, code: &str, name: &str) -> EntryData {
        EntryData::new(link(id), code, name).with_parent(link(101))
    }

    fn graph() -> InMemoryContentGraph {
        let g = InMemoryContentGraph::new();
        let root = NodeContent::new(link(100), "root", "Root");
        let shirts = NodeContent::new(link(101), "shirts", "Shirts").with_parent(link(100));

        g.insert(1, CatalogContent::Node(root)).unwrap();
        g.insert(2, CatalogContent::Node(shirts)).unwrap();
        g.insert(10, CatalogContent::product(entry(200, "P-1", "Shirt"))).unwrap();
        g.insert(11, CatalogContent::variation(entry(201, "V-1", "Shirt M"))).unwrap();
        g.add_relation(Relation::product_variation(link(200), link(201))).unwrap();
        g
    }

    #[test]
    fn key_conversion_respects_content_type_and_version() {
        let g = graph();

        assert_eq!(
            g.reference_for_id(10, CatalogContentType::CatalogEntry, 0),
            Some(link(200))
        );
        assert_eq!(g.reference_for_id(10, CatalogContentType::CatalogNode, 0), None);
        assert_eq!(
            g.reference_for_id(2, CatalogContentType::CatalogNode, 3),
            Some(ContentReference::new(101, 3).unwrap())
        );
        assert_eq!(g.reference_for_code("V-1"), Some(link(201)));
        assert_eq!(g.reference_for_code("nope"), None);
    }

    #[test]
    fn relations_are_queryable_from_both_ends() {
        let g = graph();
        let versioned_variation = ContentReference::new(201, 7).unwrap();

        let parents = g
            .get_parents(&versioned_variation, RelationKind::ProductVariation)
            .unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].parent, link(200));

        let children = g
            .get_children_relations(&link(200), RelationKind::ProductVariation)
            .unwrap();
        assert_eq!(children.iter().map(|r| r.child).collect::<Vec<_>>(), vec![link(201)]);
        assert!(g.get_parents(&link(201), RelationKind::BundleEntry).unwrap().is_empty());
    }

    #[test]
    fn relation_kinds_are_kept_apart() {
        let g = graph();
        g.insert(12, CatalogContent::other_entry(entry(300, "B-1", "Bundle"))).unwrap();
        g.insert(13, CatalogContent::other_entry(entry(301, "K-1", "Package"))).unwrap();
        g.add_relation(Relation::new(RelationKind::BundleEntry, link(300), link(201))).unwrap();
        g.add_relation(Relation::new(RelationKind::PackageEntry, link(301), link(200))).unwrap();

        let variation_parents = g.get_parents(&link(201), RelationKind::ProductVariation).unwrap();
        assert_eq!(variation_parents, vec![Relation::product_variation(link(200), link(201))]);

        let bundles = g.get_parents(&link(201), RelationKind::BundleEntry).unwrap();
        assert_eq!(bundles.iter().map(|r| r.parent).collect::<Vec<_>>(), vec![link(300)]);

        let packaged = g.get_children_relations(&link(301), RelationKind::PackageEntry).unwrap();
        assert_eq!(packaged.iter().map(|r| r.child).collect::<Vec<_>>(), vec![link(200)]);
        assert!(g.get_parents(&link(200), RelationKind::ProductVariation).unwrap().is_empty());
    }

    #[test]
    fn relations_to_unknown_content_are_rejected() {
        let g = graph();

        let err = g
            .add_relation(Relation::product_variation(link(200), link(999)))
            .unwrap_err();
        assert_eq!(err, GraphError::NotFound(link(999)));

        let err = g
            .add_relation(Relation::new(RelationKind::BundleEntry, link(998), link(201)))
            .unwrap_err();
        assert_eq!(err, GraphError::NotFound(link(998)));
        assert!(g.get_parents(&link(201), RelationKind::BundleEntry).unwrap().is_empty());
    }

    #[test]
    fn children_and_roots_follow_parent_links() {
        let g = graph();

        let roots = g.catalog_roots(INVARIANT).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].code, "root");

        let children = g.get_children(&link(101), INVARIANT).unwrap();
        let ids: Vec<u64> = children.iter().map(|c| c.content_link().id()).collect();
        assert_eq!(ids, vec![200, 201]);
    }

    #[test]
    fn associations_stay_cached_until_evicted() {
        let g = graph();
        g.set_associations(&link(200), vec![link(201)]).unwrap();
        assert_eq!(g.get_associations(&link(200)).unwrap(), vec![link(201)]);

        g.set_associations(&link(200), vec![]).unwrap();
        assert_eq!(g.get_associations(&link(200)).unwrap(), vec![link(201)]);

        g.cache().remove(&association_cache_key(DEFAULT_ASSOCIATION_CACHE_PREFIX, 200));
        assert!(g.get_associations(&link(200)).unwrap().is_empty());
    }

    #[test]
    fn get_items_omits_missing_and_records_batches() {
        let g = graph();

        let items = g.get_items(&[link(200), link(999)], INVARIANT).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(g.batch_requests(), vec![vec![link(200), link(999)]]);
    }

    #[test]
    fn remove_drops_relations_and_keys() {
        let g = graph();
        g.remove(&link(201)).unwrap();

        assert!(g.try_get(&link(201), INVARIANT).unwrap().is_none());
        assert!(g
            .get_children_relations(&link(200), RelationKind::ProductVariation)
            .unwrap()
            .is_empty());
        assert_eq!(g.reference_for_code("V-1"), None);
    }

    const INVARIANT: &str = super::super::INVARIANT_LANGUAGE;
}
