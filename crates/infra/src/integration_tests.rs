//! Integration tests for the full bridge.
//!
//! Tests: host event → EventSource → CatalogContentEvents → resolver → dispatcher
//! → exporter
//!
//! Verifies:
//! - Hooks are registered once and released on shutdown
//! - Each host event produces the expected export calls
//! - The association cache is evicted before recommendations are read
//! - The first failing export aborts the rest and surfaces to the host

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use catalogsync_core::{CatalogContent, ProductContent};
    use catalogsync_events::{
        AssociationChange, AssociationChanged, CatalogKey, ChangeEvent, ContentCreated,
        ContentDeleting, ContentMoved, ContentPublished, CreationCause, EventKind,
        InMemoryEventSource, PriceUpdated,
    };

    use crate::cache::InMemoryObjectCache;
    use crate::export::{
        CatalogExporter, ExportAction, ExportEndpoints, RecordingExporter, RecordingSink,
        SinkCall,
    };
    use crate::fixtures::*;
    use crate::graph::{ContentGraph, INVARIANT_LANGUAGE, InMemoryContentGraph};
    use crate::{CatalogContentEvents, RouterOptions, SyncError};

    type RecordingBridge = CatalogContentEvents<
        Arc<InMemoryContentGraph>,
        Arc<RecordingExporter>,
        Arc<InMemoryObjectCache>,
    >;

    type SinkBridge = CatalogContentEvents<
        Arc<InMemoryContentGraph>,
        CatalogExporter<Arc<InMemoryContentGraph>, Arc<RecordingSink>>,
        Arc<InMemoryObjectCache>,
    >;

    fn endpoints() -> ExportEndpoints {
        ExportEndpoints {
            products_url: "https://api.example.com/products".into(),
            assets_url: "https://api.example.com/assets".into(),
            recommendations_url: "https://api.example.com/recommendations".into(),
            folders_url: "https://api.example.com/folders".into(),
        }
    }

    fn setup_with(exporter: RecordingExporter) -> (RecordingBridge, InMemoryEventSource, Catalog) {
        catalogsync_observability::init_for_tests();

        let catalog = catalog();
        let bridge = CatalogContentEvents::new(
            catalog.graph.clone(),
            catalog.cache.clone(),
            Arc::new(exporter),
            RouterOptions::default(),
        );
        let source = InMemoryEventSource::new();
        bridge.initialize(&source);
        (bridge, source, catalog)
    }

    fn setup() -> (RecordingBridge, InMemoryEventSource, Catalog) {
        setup_with(RecordingExporter::new())
    }

    fn setup_http() -> (SinkBridge, InMemoryEventSource, Catalog) {
        catalogsync_observability::init_for_tests();

        let catalog = catalog();
        let exporter = CatalogExporter::new(
            catalog.graph.clone(),
            Arc::new(RecordingSink::new()),
            endpoints(),
            INVARIANT_LANGUAGE,
        );
        let bridge = CatalogContentEvents::new(
            catalog.graph.clone(),
            catalog.cache.clone(),
            exporter,
            RouterOptions::default(),
        );
        let source = InMemoryEventSource::new();
        bridge.initialize(&source);
        (bridge, source, catalog)
    }

    fn product(catalog: &Catalog, id: u64) -> ProductContent {
        catalog
            .graph
            .try_get(&link(id), INVARIANT_LANGUAGE)
            .unwrap()
            .and_then(CatalogContent::into_product)
            .unwrap()
    }

    #[test]
    fn initialize_registers_every_hook_once() {
        let (bridge, source, _catalog) = setup();

        assert!(bridge.is_initialized());
        bridge.initialize(&source);
        for kind in EventKind::ALL {
            assert_eq!(source.subscriber_count(kind), 1, "{kind}");
        }

        bridge.uninitialize(&source);
        assert!(!bridge.is_initialized());
        for kind in EventKind::ALL {
            assert_eq!(source.subscriber_count(kind), 0, "{kind}");
        }
    }

    #[test]
    fn events_after_uninitialize_are_not_exported() {
        let (bridge, source, _catalog) = setup();
        bridge.uninitialize(&source);

        source
            .raise(&ChangeEvent::Published(ContentPublished { content_link: Some(link(SHIRT)) }))
            .unwrap();

        assert!(bridge.exporter().actions().is_empty());
    }

    #[test]
    fn published_variation_exports_its_product() {
        let (bridge, source, catalog) = setup();

        source
            .raise(&ChangeEvent::Published(ContentPublished {
                content_link: Some(versioned(SHIRT_M, 7)),
            }))
            .unwrap();

        let shirt = product(&catalog, SHIRT);
        assert_eq!(
            bridge.exporter().actions(),
            vec![
                ExportAction::ExportProduct(shirt.clone()),
                ExportAction::ExportProductAssets(vec![shirt.clone()]),
                ExportAction::ExportProductRecommendations(vec![shirt]),
            ]
        );
    }

    #[test]
    fn copied_shared_variation_exports_both_products_once_each() {
        let (bridge, source, catalog) = setup();

        source
            .raise(&ChangeEvent::Created(ContentCreated {
                content_link: Some(link(SHARED)),
                cause: CreationCause::Copy,
            }))
            .unwrap();

        let products = vec![product(&catalog, SHIRT), product(&catalog, SNEAKER)];
        let actions = bridge.exporter().actions();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[2], ExportAction::ExportProductAssets(products.clone()));
        assert_eq!(actions[3], ExportAction::ExportProductRecommendations(products));
    }

    #[test]
    fn new_content_is_not_exported() {
        let (bridge, source, _catalog) = setup();

        source
            .raise(&ChangeEvent::Created(ContentCreated {
                content_link: Some(link(SHIRT)),
                cause: CreationCause::New,
            }))
            .unwrap();

        assert!(bridge.exporter().actions().is_empty());
    }

    #[test]
    fn empty_and_foreign_references_are_ignored() {
        let (bridge, source, _catalog) = setup();

        source.raise(&ChangeEvent::Deleting(ContentDeleting { content_link: None })).unwrap();
        source
            .raise(&ChangeEvent::Moved(ContentMoved {
                content_link: Some(link(42)),
                target_link: None,
            }))
            .unwrap();

        let empty = ChangeEvent::Deleting(ContentDeleting { content_link: None });
        assert_eq!(bridge.handle(&empty).unwrap(), 0);
        assert!(bridge.exporter().actions().is_empty());
    }

    #[test]
    fn moved_node_exports_children_then_tree() {
        let (bridge, source, catalog) = setup();

        source
            .raise(&ChangeEvent::Moved(ContentMoved {
                content_link: Some(link(SUMMER)),
                target_link: Some(link(SHOES)),
            }))
            .unwrap();

        let summer = catalog
            .graph
            .try_get(&link(SUMMER), INVARIANT_LANGUAGE)
            .unwrap()
            .and_then(CatalogContent::into_node)
            .unwrap();
        assert_eq!(
            bridge.exporter().actions(),
            vec![
                ExportAction::ExportChildProducts(summer),
                ExportAction::StartFullCategoryExport { excluding: Vec::new() },
            ]
        );
    }

    #[test]
    fn price_keys_of_one_product_export_it_once() {
        let (bridge, source, catalog) = setup();

        source
            .raise(&ChangeEvent::PriceUpdated(PriceUpdated {
                catalog_keys: vec![CatalogKey::new("V-SHIRT-S"), CatalogKey::new("V-SHIRT-M")],
            }))
            .unwrap();

        assert_eq!(
            bridge.exporter().actions(),
            vec![ExportAction::ExportProduct(product(&catalog, SHIRT))]
        );
    }

    #[test]
    fn deleting_a_node_leaves_it_out_of_the_category_tree() {
        let (bridge, source, _catalog) = setup_http();

        source
            .raise(&ChangeEvent::Deleting(ContentDeleting { content_link: Some(link(SHOES)) }))
            .unwrap();

        assert_eq!(
            bridge.exporter().sink().calls(),
            vec![
                SinkCall::Delete {
                    url: "https://api.example.com/products".into(),
                    ids: vec!["P-SNEAKER".into(), "V-SHARED".into()],
                },
                SinkCall::Post {
                    url: "https://api.example.com/folders".into(),
                    payload: json!({
                        "folders": [{
                            "id": "catalog",
                            "name": "catalog",
                            "children": [{
                                "id": "shirts",
                                "name": "shirts",
                                "children": [{ "id": "summer", "name": "summer" }]
                            }]
                        }]
                    }),
                },
            ]
        );
    }

    #[test]
    fn deleting_a_product_deletes_it_and_its_variants() {
        let (bridge, source, _catalog) = setup_http();

        source
            .raise(&ChangeEvent::Deleting(ContentDeleting { content_link: Some(link(SHIRT)) }))
            .unwrap();

        let calls = bridge.exporter().sink().calls();
        assert_eq!(calls.len(), 3);
        for call in calls {
            match call {
                SinkCall::Delete { mut ids, .. } => {
                    ids.sort();
                    assert_eq!(ids, vec!["P-SHIRT", "V-SHARED", "V-SHIRT-M", "V-SHIRT-S"]);
                }
                other => panic!("expected a delete, got {other:?}"),
            }
        }
    }

    #[test]
    fn association_update_reads_fresh_associations() {
        let (bridge, source, catalog) = setup_http();

        // Warm the host cache, then change the backing store behind it.
        let warmed = catalog.graph.get_associations(&link(SHIRT)).unwrap();
        assert_eq!(warmed, vec![link(SNEAKER), link(TEE)]);
        catalog.graph.set_associations(&link(SHIRT), vec![link(TEE)]).unwrap();
        assert_eq!(catalog.graph.get_associations(&link(SHIRT)).unwrap().len(), 2);

        source
            .raise(&ChangeEvent::AssociationChanged(AssociationChanged {
                changes: vec![AssociationChange {
                    parent_entry_id: entry_id(SHIRT),
                    association_name: Some("cross-sell".into()),
                }],
            }))
            .unwrap();

        assert_eq!(
            bridge.exporter().sink().calls(),
            vec![SinkCall::Post {
                url: "https://api.example.com/recommendations".into(),
                payload: json!({ "recommendations": { "P-SHIRT": ["P-TEE"] } }),
            }]
        );
    }

    #[test]
    fn first_export_failure_aborts_and_reaches_the_host() {
        let (bridge, source, _catalog) =
            setup_with(RecordingExporter::failing_on("export_product"));
        let event = ChangeEvent::Published(ContentPublished { content_link: Some(link(TEE)) });

        let err = source.raise(&event).unwrap_err();
        assert_eq!(err.handler, "catalog_content_events");
        assert_eq!(err.event_type, event.event_type());
        assert_eq!(bridge.exporter().action_names(), vec!["export_product"]);

        bridge.exporter().clear();
        assert!(matches!(bridge.handle(&event), Err(SyncError::Export(_))));
    }
}
