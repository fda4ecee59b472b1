//! Wire payloads for the remote API.
//!
//! Field names are snake_case and `None` fields are omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalogsync_core::{NodeContent, ProductContent, VariationContent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPayload {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&VariationContent> for VariantPayload {
    fn from(value: &VariationContent) -> Self {
        Self {
            id: value.0.code.clone(),
            name: value.0.name.clone(),
            image_url: value.0.asset_urls.first().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantPayload>>,
}

impl ProductPayload {
    pub fn new(product: &ProductContent, variants: Vec<VariantPayload>) -> Self {
        Self {
            id: product.0.code.clone(),
            name: product.0.name.clone(),
            description: product.0.description.clone(),
            image_url: product.0.asset_urls.first().cloned(),
            variants: if variants.is_empty() { None } else { Some(variants) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsRequest {
    pub products: Vec<ProductPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPayload {
    pub product_id: String,
    pub url: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsRequest {
    pub assets: Vec<AssetPayload>,
}

impl AssetsRequest {
    pub fn for_products<'a>(products: impl IntoIterator<Item = &'a ProductContent>) -> Self {
        let assets = products
            .into_iter()
            .flat_map(|p| {
                p.0.asset_urls.iter().enumerate().map(|(position, url)| AssetPayload {
                    product_id: p.0.code.clone(),
                    url: url.clone(),
                    position,
                })
            })
            .collect();
        Self { assets }
    }
}

/// Product code → associated product codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationsRequest {
    pub recommendations: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPayload {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FolderPayload>>,
}

impl FolderPayload {
    pub fn new(node: &NodeContent, children: Vec<FolderPayload>) -> Self {
        Self {
            id: node.code.clone(),
            name: node.name.clone(),
            children: if children.is_empty() { None } else { Some(children) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldersRequest {
    pub folders: Vec<FolderPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogsync_core::{ContentReference, EntryData};

    fn product(id: u64, code: &str) -> ProductContent {
        ProductContent(EntryData::new(ContentReference::published(id).unwrap(), code, "Shirt"))
    }

    #[test]
    fn product_payload_omits_missing_fields() {
        let json = serde_json::to_value(ProductPayload::new(&product(1, "P-1"), vec![])).unwrap();

        assert_eq!(json, serde_json::json!({ "id": "P-1", "name": "Shirt" }));
    }

    #[test]
    fn product_payload_carries_variants_and_first_asset() {
        let mut p = product(1, "P-1");
        p.0 = p.0.with_description("Cotton").with_asset("a.png").with_asset("b.png");
        let link = ContentReference::published(2).unwrap();
        let variant = VariationContent(EntryData::new(link, "V-1", "Shirt M"));

        let payload = ProductPayload::new(&p, vec![VariantPayload::from(&variant)]);
        let json = serde_json::to_value(payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "P-1",
                "name": "Shirt",
                "description": "Cotton",
                "image_url": "a.png",
                "variants": [{ "id": "V-1", "name": "Shirt M" }]
            })
        );
    }

    #[test]
    fn assets_are_numbered_per_product() {
        let mut a = product(1, "P-1");
        a.0 = a.0.with_asset("a0.png").with_asset("a1.png");
        let mut b = product(2, "P-2");
        b.0 = b.0.with_asset("b0.png");

        let req = AssetsRequest::for_products([&a, &b]);
        let positions: Vec<(&str, usize)> =
            req.assets.iter().map(|x| (x.product_id.as_str(), x.position)).collect();
        assert_eq!(positions, vec![("P-1", 0), ("P-1", 1), ("P-2", 0)]);
    }
}
