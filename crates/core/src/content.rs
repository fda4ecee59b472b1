//! Catalog content as loaded from the host graph.
//!
//! The host models content as a class hierarchy and callers switch on the
//! runtime type. Here the hierarchy is a closed sum type: an entry is a
//! product, a variation, or some other entry kind (bundles, packages), and
//! everything else in the catalog is a node.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::CatalogError;
use crate::id::{ContentIdentity, ContentReference};

/// Fields shared by every catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    pub content_link: ContentReference,
    /// Primary parent node (the category the entry lives in).
    pub parent_link: Option<ContentReference>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Media assigned to the entry, in display order.
    #[serde(default)]
    pub asset_urls: Vec<String>,
}

impl EntryData {
    pub fn new(
        content_link: ContentReference,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            content_link,
            parent_link: None,
            code: code.into(),
            name: name.into(),
            description: None,
            asset_urls: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_link: ContentReference) -> Self {
        self.parent_link = Some(parent_link);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_asset(mut self, url: impl Into<String>) -> Self {
        self.asset_urls.push(url.into());
        self
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductContent(pub EntryData);

/// A variant/SKU. Subordinate to one or more products through a
/// product-variation relation held by the graph, never embedded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationContent(pub EntryData);

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContent {
    pub content_link: ContentReference,
    pub parent_link: Option<ContentReference>,
    pub code: String,
    pub name: String,
}

impl NodeContent {
    pub fn new(
        content_link: ContentReference,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            content_link,
            parent_link: None,
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn with_parent(mut self, parent_link: ContentReference) -> Self {
        self.parent_link = Some(parent_link);
        self
    }
}

/// Any catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EntryContent {
    Product(ProductContent),
    Variation(VariationContent),
    /// An entry that is neither a product nor a variation.
    Other(EntryData),
}

impl EntryContent {
    pub fn data(&self) -> &EntryData {
        match self {
            EntryContent::Product(p) => &p.0,
            EntryContent::Variation(v) => &v.0,
            EntryContent::Other(d) => d,
        }
    }

    pub fn content_link(&self) -> ContentReference {
        self.data().content_link
    }

    pub fn code(&self) -> &str {
        &self.data().code
    }

    pub fn as_product(&self) -> Option<&ProductContent> {
        match self {
            EntryContent::Product(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_product(self) -> Option<ProductContent> {
        match self {
            EntryContent::Product(p) => Some(p),
            _ => None,
        }
    }
}

/// Anything the catalog content provider can load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CatalogContent {
    Entry(EntryContent),
    Node(NodeContent),
}

impl CatalogContent {
    pub fn product(data: EntryData) -> Self {
        CatalogContent::Entry(EntryContent::Product(ProductContent(data)))
    }

    pub fn variation(data: EntryData) -> Self {
        CatalogContent::Entry(EntryContent::Variation(VariationContent(data)))
    }

    pub fn other_entry(data: EntryData) -> Self {
        CatalogContent::Entry(EntryContent::Other(data))
    }

    pub fn content_link(&self) -> ContentReference {
        match self {
            CatalogContent::Entry(e) => e.content_link(),
            CatalogContent::Node(n) => n.content_link,
        }
    }

    pub fn into_entry(self) -> Option<EntryContent> {
        match self {
            CatalogContent::Entry(e) => Some(e),
            CatalogContent::Node(_) => None,
        }
    }

    pub fn into_product(self) -> Option<ProductContent> {
        self.into_entry().and_then(EntryContent::into_product)
    }

    pub fn into_node(self) -> Option<NodeContent> {
        match self {
            CatalogContent::Node(n) => Some(n),
            CatalogContent::Entry(_) => None,
        }
    }
}

impl ProductContent {
    pub fn content_link(&self) -> ContentReference {
        self.0.content_link
    }

    pub fn code(&self) -> &str {
        &self.0.code
    }

    pub fn parent_link(&self) -> Option<ContentReference> {
        self.0.parent_link
    }
}

impl VariationContent {
    pub fn content_link(&self) -> ContentReference {
        self.0.content_link
    }

    pub fn code(&self) -> &str {
        &self.0.code
    }
}

impl TryFrom<CatalogContent> for ProductContent {
    type Error = CatalogError;

    fn try_from(value: CatalogContent) -> Result<Self, Self::Error> {
        let link = value.content_link();
        value
            .into_product()
            .ok_or_else(|| CatalogError::wrong_kind(link, "product"))
    }
}

impl TryFrom<CatalogContent> for NodeContent {
    type Error = CatalogError;

    fn try_from(value: CatalogContent) -> Result<Self, Self::Error> {
        let link = value.content_link();
        value
            .into_node()
            .ok_or_else(|| CatalogError::wrong_kind(link, "node"))
    }
}

macro_rules! impl_content_entity {
    ($t:ty, |$s:ident| $link:expr) => {
        impl Entity for $t {
            type Id = ContentIdentity;

            fn id(&self) -> Self::Id {
                let $s = self;
                $link.identity()
            }
        }
    };
}

impl_content_entity!(ProductContent, |s| s.0.content_link);
impl_content_entity!(VariationContent, |s| s.0.content_link);
impl_content_entity!(NodeContent, |s| s.content_link);
impl_content_entity!(EntryContent, |s| s.content_link());
impl_content_entity!(CatalogContent, |s| s.content_link());
