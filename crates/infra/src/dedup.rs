//! Identity-based deduplication.
//!
//! Two rules are in play:
//! - [`ReferenceSet`]: references compared ignoring version. Used while
//!   collecting what to batch-load, so edits across versions of one entity
//!   collapse into a single load request.
//! - [`ContentSet`]: loaded objects compared by content identity
//!   ([`Entity::id`]). Used while collecting what to export.
//!
//! Both keep first-insertion order so logs and tests are reproducible, but
//! callers must not rely on any particular order.

use std::collections::HashSet;

use catalogsync_core::{ContentIdentity, ContentReference, Entity};

#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    seen: HashSet<ContentIdentity>,
    refs: Vec<ContentReference>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `reference` unless the same entity is already present (any
    /// version). The first version seen is kept.
    pub fn insert(&mut self, reference: ContentReference) -> bool {
        if self.seen.insert(reference.identity()) {
            self.refs.push(reference);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, reference: &ContentReference) -> bool {
        self.seen.contains(&reference.identity())
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn as_slice(&self) -> &[ContentReference] {
        &self.refs
    }

    pub fn into_vec(self) -> Vec<ContentReference> {
        self.refs
    }
}

impl Extend<ContentReference> for ReferenceSet {
    fn extend<I: IntoIterator<Item = ContentReference>>(&mut self, iter: I) {
        for r in iter {
            self.insert(r);
        }
    }
}

impl FromIterator<ContentReference> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = ContentReference>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl PartialEq for ReferenceSet {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for ReferenceSet {}

/// Loaded business objects, unique by content identity.
#[derive(Debug, Clone)]
pub struct ContentSet<T: Entity> {
    seen: HashSet<T::Id>,
    items: Vec<T>,
}

impl<T: Entity> Default for ContentSet<T> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }
}

impl<T: Entity> ContentSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.insert(item.id()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn contains_id(&self, id: &T::Id) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Entity> Extend<T> for ContentSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Entity> FromIterator<T> for ContentSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Entity> IntoIterator for ContentSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Entity> IntoIterator for &'a ContentSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Identity equality: same entities, regardless of version or order.
impl<T: Entity> PartialEq for ContentSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl<T: Entity> Eq for ContentSet<T> {}
