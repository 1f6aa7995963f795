//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::path::Path;
use std::sync::Arc;

use geox::{
    compile, GxDataStoreKey, GxDataStoreRegistry, GxDriverRegistry, GxEntityType, GxError, GxFeatureContext,
    GxGeometryType, GxMemoryDriver, GxOutputName,
};
use proptest::prelude::*;

struct Stop {
    name: String,
}

fn stop_context() -> GxFeatureContext<Stop> {
    GxFeatureContext::builder(GxEntityType::ServiceNode)
        .string("name", |s: &Stop| s.name.clone())
        .geometry(GxGeometryType::Point, |_: &Stop| None)
        .build()
        .unwrap()
}

fn memory_registry() -> GxDataStoreRegistry {
    let mut drivers = GxDriverRegistry::new();
    drivers.register("mem", Arc::new(GxMemoryDriver::new()));
    GxDataStoreRegistry::new(drivers)
}

fn token() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_]{0,7}"
}

#[test]
fn test_mode_partitioned_name() {
    let name = GxOutputName::for_layer("layer", "0", "planit_service")
        .unwrap()
        .with_mode("bus")
        .unwrap();
    assert_eq!(name.schema_name(), "layer_0_mode_bus_planit_service");
    assert_eq!(
        name.file_path(Path::new("out"), ".shp"),
        Path::new("out").join("layer_0_mode_bus_planit_service.shp")
    );
}

#[test]
fn test_geometry_suffix_is_last() {
    let name = GxOutputName::new("planit_zones_od")
        .unwrap()
        .with_geometry(GxGeometryType::Polygon);
    assert_eq!(name.schema_name(), "planit_zones_od_polygon");
}

#[test]
fn test_blank_parts_are_rejected() {
    assert!(matches!(GxOutputName::new("  "), Err(GxError::Naming { .. })));
    assert!(matches!(
        GxOutputName::for_layer("", "0", "planit_nodes"),
        Err(GxError::Naming { .. })
    ));
    assert!(GxOutputName::new("nodes/of/layer").is_err());
}

proptest! {
    #[test]
    fn prop_creation_and_writer_names_agree(layer in token(), mode in token(), base in token()) {
        let created = GxOutputName::for_layer("layer", &layer, &base).unwrap().with_mode(&mode).unwrap();
        let reopened = GxOutputName::for_layer("layer", &layer, &base).unwrap().with_mode(&mode).unwrap();
        prop_assert_eq!(created.schema_name(), reopened.schema_name());

        let path = created.file_path(Path::new("out"), "mem");
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap().to_string();
        prop_assert_eq!(stem, created.schema_name());

        let key = GxDataStoreKey::entity(GxEntityType::ServiceNode);
        let mut registry = memory_registry();
        registry.open(key, &path).unwrap();
        let schema = compile(&stop_context(), None, created.schema_name()).schema;
        registry.register_schema(key, &schema).unwrap();

        let store = registry.get(key).unwrap();
        prop_assert!(store.feature_writer(&reopened.schema_name()).is_ok());
    }
}
