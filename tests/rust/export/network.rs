//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use geox::datastore::GxMemoryStoreState;
use geox::schema::parse_field_spec;
use geox::{
    GxAttributeValue, GxCoordTransform, GxCrs, GxDriverRegistry, GxError, GxLink, GxLinkSegment,
    GxLinkSegmentType, GxMemoryDriver, GxMode, GxModeKind, GxNetwork, GxNetworkExporter, GxNetworkLayer,
    GxNetworkSettings, GxNode, GxSessionOptions, GxWriterSettings,
};

fn road_layer(xml_id: &str) -> GxNetworkLayer {
    let car = Arc::new(GxMode::new(0, "car", GxModeKind::Car).with_max_speed(130.0));
    let n1 = Arc::new(GxNode::new(1, "n1").with_position(4.9, 52.37));
    let n2 = Arc::new(GxNode::new(2, "n2").with_position(4.91, 52.38));
    let link = Arc::new(GxLink::new(1, "l1", n1.clone(), n2.clone(), 1.2));
    let road = Arc::new(GxLinkSegmentType::new(1, "road", "road").with_mode(&car, 50.0, 40.0));

    let mut layer = GxNetworkLayer::new(0, xml_id);
    layer.modes.push(car);
    layer.nodes.extend([n1, n2]);
    layer.links.push(link.clone());
    layer.link_segments.push(Arc::new(GxLinkSegment::new(1, "s1", link.clone(), true, road.clone())));
    layer.link_segments.push(Arc::new(GxLinkSegment::new(2, "s2", link, false, road)));
    layer
}

fn memory_options(dir: &Path, destination: Option<GxCrs>) -> (GxSessionOptions, GxMemoryDriver) {
    let memory = GxMemoryDriver::new();
    let mut drivers = GxDriverRegistry::new();
    drivers.register("mem", Arc::new(memory.clone()));
    let mut writer = GxWriterSettings::new(dir).with_file_extension("mem");
    if let Some(crs) = destination {
        writer = writer.with_destination_crs(crs);
    }
    (GxSessionOptions::new(writer).with_drivers(drivers), memory)
}

fn value(state: &GxMemoryStoreState, schema: &str, row: usize, column: &str) -> GxAttributeValue {
    let fields = parse_field_spec(&state.schemas[schema].field_spec).unwrap();
    let index = fields.iter().position(|f| f.column_name() == column).unwrap();
    state.rows_of(schema)[row].values[index].clone()
}

#[test]
fn test_two_nodes_and_a_link() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), Some(GxCrs::epsg(4326)));
    let network = GxNetwork::new(Some(GxCrs::epsg(4326))).with_layer(road_layer("road"));

    let report = GxNetworkExporter::new(options, GxNetworkSettings::default())
        .write(&network)
        .unwrap();

    assert_eq!(
        report.schemas(),
        vec!["layer_road_planit_nodes", "layer_road_planit_links", "layer_road_planit_link_segments"]
    );
    assert_eq!(report.stores_released, 3);

    let nodes = memory.store_with_schema("layer_road_planit_nodes").unwrap();
    assert!(nodes.schemas["layer_road_planit_nodes"].field_spec.ends_with("*geom:Point:srid=4326"));
    assert_eq!(nodes.rows_of("layer_road_planit_nodes").len(), 2);
    assert_eq!(value(&nodes, "layer_road_planit_nodes", 0, "mapped_id"), GxAttributeValue::String("n1".into()));
    assert_eq!(value(&nodes, "layer_road_planit_nodes", 1, "mapped_id"), GxAttributeValue::String("n2".into()));

    let links = memory.store_with_schema("layer_road_planit_links").unwrap();
    assert_eq!(value(&links, "layer_road_planit_links", 0, "node_a"), GxAttributeValue::String("n1".into()));
    assert_eq!(value(&links, "layer_road_planit_links", 0, "node_b"), GxAttributeValue::String("n2".into()));

    let segments = memory.store_with_schema("layer_road_planit_link_segments").unwrap();
    let schema = "layer_road_planit_link_segments";
    assert_eq!(segments.rows_of(schema).len(), 2);
    assert_eq!(value(&segments, schema, 0, "car_ban"), GxAttributeValue::Boolean(false));
    assert_eq!(value(&segments, schema, 0, "car_spd"), GxAttributeValue::Double(50.0));
    assert_eq!(value(&segments, schema, 1, "node_up"), GxAttributeValue::String("n2".into()));
    assert_eq!(value(&segments, schema, 1, "geom_opp"), GxAttributeValue::Boolean(true));

    assert!(memory.stores().iter().all(|state| state.disposed));
}

#[test]
fn test_layers_share_stores_with_distinct_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), None);
    let network = GxNetwork::new(None)
        .with_layer(road_layer("road"))
        .with_layer(road_layer("rail"));

    let settings = GxNetworkSettings::default().with_persist_link_segments(false);
    let report = GxNetworkExporter::new(options, settings).write(&network).unwrap();

    assert_eq!(report.feature_classes.len(), 4);
    assert_eq!(memory.stores().len(), 2);
    let nodes = memory.store_with_schema("layer_rail_planit_nodes").unwrap();
    assert_eq!(
        nodes.schemas.keys().cloned().collect::<Vec<_>>(),
        vec!["layer_rail_planit_nodes".to_string(), "layer_road_planit_nodes".to_string()]
    );
    assert!(report.warnings.iter().any(|w| w.contains("no destination CRS")));
}

#[test]
fn test_csv_output() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GxWriterSettings::new(dir.path()).with_destination_crs(GxCrs::epsg(4326));
    let network = GxNetwork::new(Some(GxCrs::epsg(4326))).with_layer(road_layer("road"));

    let report = GxNetworkExporter::new(GxSessionOptions::new(writer), GxNetworkSettings::default())
        .write(&network)
        .unwrap();

    let path = dir.path().join("layer_road_planit_nodes.csv");
    assert_eq!(report.feature_class("layer_road_planit_nodes").unwrap().path.as_deref(), Some(path.as_path()));
    let content = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "mapped_id,id,node_id,xml_id,ext_id,name,geom");
    assert_eq!(lines[1], "n1,1,1,n1,,,POINT (4.9 52.37)");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_destination_without_source_crs_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), Some(GxCrs::epsg(4326)));
    let network = GxNetwork::new(None).with_layer(road_layer("road"));

    let result = GxNetworkExporter::new(options, GxNetworkSettings::default()).write(&network);

    assert!(matches!(result, Err(GxError::Configuration { .. })));
    assert!(memory.stores().is_empty());
}

#[test]
fn test_transform_failure_names_layer_and_releases_stores() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), Some(GxCrs::epsg(28992)));
    let failing = GxCoordTransform::new(|_| Err(GxError::transform("outside projection bounds")));
    let options = options.with_transformer(Arc::new(failing));
    let network = GxNetwork::new(Some(GxCrs::epsg(4326))).with_layer(road_layer("road"));

    let result = GxNetworkExporter::new(options, GxNetworkSettings::default()).write(&network);

    match result {
        Err(GxError::Write { context, entity, message }) => {
            assert_eq!(context, "[layer: road]");
            assert_eq!(entity, "node");
            assert!(message.contains("outside projection bounds"));
        }
        other => panic!("unexpected {:?}", other),
    }
    let stores = memory.stores();
    assert_eq!(stores.len(), 1);
    assert!(stores[0].disposed);
}

#[test]
fn test_transform_applies_to_geometries() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), Some(GxCrs::epsg(3857)));
    let shift = GxCoordTransform::new(|c: geo_types::Coord<f64>| Ok(geo_types::coord! { x: c.x * 2.0, y: c.y * 2.0 }));
    let options = options.with_transformer(Arc::new(shift));
    let network = GxNetwork::new(Some(GxCrs::epsg(4326))).with_layer(road_layer("road"));

    GxNetworkExporter::new(options, GxNetworkSettings::default().with_persist_links(false))
        .write(&network)
        .unwrap();

    let nodes = memory.store_with_schema("layer_road_planit_nodes").unwrap();
    let geometry = value(&nodes, "layer_road_planit_nodes", 0, "geom");
    assert_eq!(geometry.to_text(), "POINT (9.8 104.74)");
}

#[test]
fn test_layers_with_the_same_id_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), None);
    let network = GxNetwork::new(None)
        .with_layer(road_layer("road"))
        .with_layer(road_layer("road"));

    let settings = GxNetworkSettings::default()
        .with_persist_links(false)
        .with_persist_link_segments(false);
    let result = GxNetworkExporter::new(options, settings).write(&network);

    match result {
        Err(GxError::Naming { message }) => {
            assert!(message.contains("layer_road_planit_nodes"));
            assert!(message.contains("node"));
        }
        other => panic!("unexpected {:?}", other),
    }
    let nodes = memory.store_with_schema("layer_road_planit_nodes").unwrap();
    assert_eq!(nodes.rows_of("layer_road_planit_nodes").len(), 2);
    assert!(memory.stores().iter().all(|state| state.disposed));
}

#[test]
fn test_mode_banned_on_every_segment_keeps_its_columns() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path(), None);
    let mut layer = road_layer("road");
    layer.modes.push(Arc::new(GxMode::new(1, "bus", GxModeKind::Bus)));
    let network = GxNetwork::new(None).with_layer(layer);

    let settings = GxNetworkSettings::default().with_persist_nodes(false).with_persist_links(false);
    GxNetworkExporter::new(options, settings).write(&network).unwrap();

    let schema = "layer_road_planit_link_segments";
    let segments = memory.store_with_schema(schema).unwrap();
    let spec = &segments.schemas[schema].field_spec;
    assert!(spec.contains("car_ban:Boolean,car_spd:Double,car_spdc:Double,bus_ban:Boolean,bus_spd:Double,bus_spdc:Double"));
    for row in 0..2 {
        assert_eq!(value(&segments, schema, row, "bus_ban"), GxAttributeValue::Boolean(true));
        assert!(value(&segments, schema, row, "bus_spd").is_null());
        assert_eq!(value(&segments, schema, row, "car_ban"), GxAttributeValue::Boolean(false));
    }
}
