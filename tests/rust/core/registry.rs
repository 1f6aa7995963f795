//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::path::Path;
use std::sync::Arc;

use geox::{
    compile, GxDataStoreKey, GxDataStoreRegistry, GxDriverRegistry, GxEntityType, GxError, GxFeatureContext,
    GxGeometryType, GxMemoryDriver,
};

struct Marker;

fn context() -> GxFeatureContext<Marker> {
    GxFeatureContext::builder(GxEntityType::Node)
        .long("id", |_: &Marker| 1)
        .geometry(GxGeometryType::Point, |_: &Marker| None)
        .build()
        .unwrap()
}

fn registry() -> (GxDataStoreRegistry, GxMemoryDriver) {
    let memory = GxMemoryDriver::new();
    let mut drivers = GxDriverRegistry::new();
    drivers.register("mem", Arc::new(memory.clone()));
    (GxDataStoreRegistry::new(drivers), memory)
}

#[test]
fn test_open_twice_reuses_the_store() {
    let (mut registry, memory) = registry();
    let key = GxDataStoreKey::entity(GxEntityType::Node);

    let first = registry.open(key, Path::new("out/layer_0_planit_nodes.mem")).unwrap().path().to_path_buf();
    let second = registry.open(key, Path::new("out/layer_1_planit_nodes.mem")).unwrap().path().to_path_buf();

    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
    assert_eq!(memory.stores().len(), 1);
}

#[test]
fn test_geometry_keys_are_distinct_stores() {
    let (mut registry, memory) = registry();
    registry
        .open(GxDataStoreKey::with_geometry(GxEntityType::OdZone, GxGeometryType::Point), Path::new("z_point.mem"))
        .unwrap();
    registry
        .open(GxDataStoreKey::with_geometry(GxEntityType::OdZone, GxGeometryType::Polygon), Path::new("z_polygon.mem"))
        .unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(memory.stores().len(), 2);
}

#[test]
fn test_registering_a_schema_twice_recreates_it() {
    let (mut registry, memory) = registry();
    let key = GxDataStoreKey::entity(GxEntityType::Node);
    registry.open(key, Path::new("nodes.mem")).unwrap();
    let schema = compile(&context(), None, "planit_nodes").schema;

    registry.register_schema(key, &schema).unwrap();
    registry.register_schema(key, &schema).unwrap();

    let state = memory.store_with_schema("planit_nodes").unwrap();
    assert_eq!(state.recreated, 1);
    assert_eq!(state.schemas.len(), 1);
}

#[test]
fn test_register_on_unopened_key_is_a_configuration_error() {
    let (mut registry, _) = registry();
    let schema = compile(&context(), None, "planit_nodes").schema;
    let result = registry.register_schema(GxDataStoreKey::entity(GxEntityType::Link), &schema);
    assert!(matches!(result, Err(GxError::Configuration { .. })));
}

#[test]
fn test_reset_releases_everything_after_a_failed_open() {
    let (mut registry, memory) = registry();
    registry.open(GxDataStoreKey::entity(GxEntityType::Node), Path::new("nodes.mem")).unwrap();
    registry.open(GxDataStoreKey::entity(GxEntityType::Link), Path::new("links.mem")).unwrap();

    let failed = registry.open(GxDataStoreKey::entity(GxEntityType::LinkSegment), Path::new("segments.shp"));
    assert!(matches!(failed, Err(GxError::Driver { .. })));

    assert_eq!(registry.reset(), 2);
    assert!(registry.is_empty());
    let stores = memory.stores();
    assert_eq!(stores.len(), 2);
    assert!(stores.iter().all(|state| state.disposed));
}

#[test]
fn test_dropping_the_registry_disposes_stores() {
    let (mut registry, memory) = registry();
    registry.open(GxDataStoreKey::entity(GxEntityType::Node), Path::new("nodes.mem")).unwrap();
    drop(registry);
    assert!(memory.stores()[0].disposed);
}
