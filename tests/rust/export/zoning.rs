//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use geo_types::{polygon, Point};
use geox::{
    GxAccessZone, GxConnectoid, GxConnectoidEdge, GxConnectoidSegment, GxCrs, GxDriverRegistry, GxEntityType,
    GxGeometryType, GxMemoryDriver, GxNode, GxSessionOptions, GxWriterSettings, GxZone, GxZoneKind, GxZoning,
    GxZoningExporter, GxZoningSettings,
};

fn area(offset: f64) -> geo_types::Polygon<f64> {
    polygon![
        (x: offset, y: 0.0),
        (x: offset + 1.0, y: 0.0),
        (x: offset + 1.0, y: 1.0),
        (x: offset, y: 1.0),
    ]
}

fn od_zones() -> Vec<Arc<GxZone>> {
    vec![
        Arc::new(GxZone::new(1, "z1", GxZoneKind::Od).with_geometry(area(0.0))),
        Arc::new(GxZone::new(2, "z2", GxZoneKind::Od).with_geometry(Point::new(5.0, 5.0))),
        Arc::new(GxZone::new(3, "z3", GxZoneKind::Od).with_geometry(area(2.0))),
    ]
}

fn memory_options(dir: &Path) -> (GxSessionOptions, GxMemoryDriver) {
    let memory = GxMemoryDriver::new();
    let mut drivers = GxDriverRegistry::new();
    drivers.register("mem", Arc::new(memory.clone()));
    let writer = GxWriterSettings::new(dir).with_file_extension("mem");
    (GxSessionOptions::new(writer).with_drivers(drivers), memory)
}

#[test]
fn test_mixed_zones_split_into_two_feature_classes() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path());
    let mut zoning = GxZoning::new(None);
    zoning.od_zones = od_zones();

    let report = GxZoningExporter::new(options, GxZoningSettings::default()).write(&zoning).unwrap();

    assert_eq!(report.schemas(), vec!["planit_zones_od_point", "planit_zones_od_polygon"]);
    assert_eq!(report.feature_class("planit_zones_od_point").unwrap().rows, 1);
    assert_eq!(report.feature_class("planit_zones_od_polygon").unwrap().rows, 2);
    assert_eq!(
        report.feature_class("planit_zones_od_polygon").unwrap().geometry_type,
        GxGeometryType::Polygon
    );

    let polygons = memory.store_with_schema("planit_zones_od_polygon").unwrap();
    assert!(polygons.schemas["planit_zones_od_polygon"].field_spec.ends_with("*geom:Polygon"));
    assert_eq!(memory.stores().len(), 2);
}

#[test]
fn test_single_shape_has_no_suffix_and_skips_zones_without_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let (options, _) = memory_options(dir.path());
    let mut zoning = GxZoning::new(None);
    zoning.transfer_zones = vec![
        Arc::new(GxZone::new(1, "t1", GxZoneKind::Transfer).with_geometry(Point::new(1.0, 1.0))),
        Arc::new(GxZone::new(2, "t2", GxZoneKind::Transfer)),
    ];

    let report = GxZoningExporter::new(options, GxZoningSettings::default()).write(&zoning).unwrap();

    assert_eq!(report.schemas(), vec!["planit_zones_transfer"]);
    assert_eq!(report.rows_of(GxEntityType::TransferZone), 1);
    assert_eq!(report.skipped_of(GxEntityType::TransferZone), 1);
    assert!(report.warnings.iter().any(|w| w.contains("without geometry")));
}

#[test]
fn test_connectoids_and_virtual_network() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path());
    let zones = od_zones();
    let access = Arc::new(GxNode::new(7, "n7").with_position(0.5, 0.5));
    let centroid = Arc::new(GxNode::new(100, "centroid_z1").with_position(0.4, 0.4));
    let edge = Arc::new(GxConnectoidEdge::new(1, "ce1", centroid, access.clone(), 0.1));

    let mut zoning = GxZoning::new(None);
    zoning.od_zones = zones.clone();
    zoning.od_connectoids = vec![Arc::new(
        GxConnectoid::undirected(1, "c1", access).with_access_zone(GxAccessZone::new(zones[0].clone()).with_length(0.1)),
    )];
    zoning.virtual_network.connectoid_edges.push(edge.clone());
    zoning
        .virtual_network
        .connectoid_segments
        .push(Arc::new(GxConnectoidSegment::new(1, "cs1", edge.clone(), true)));
    zoning
        .virtual_network
        .connectoid_segments
        .push(Arc::new(GxConnectoidSegment::new(2, "cs2", edge, false)));

    let report = GxZoningExporter::new(options, GxZoningSettings::default()).write(&zoning).unwrap();

    assert_eq!(
        report.schemas(),
        vec![
            "planit_zones_od_point",
            "planit_zones_od_polygon",
            "planit_connectoids_od",
            "planit_connectoid_edges",
            "planit_connectoid_segments",
        ]
    );
    assert_eq!(report.rows_of(GxEntityType::ConnectoidSegment), 2);
    let connectoids = memory.rows_of("planit_connectoids_od");
    assert_eq!(connectoids.len(), 1);
}

#[test]
fn test_empty_virtual_network_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path());
    let zoning = GxZoning::new(None);

    let report = GxZoningExporter::new(options, GxZoningSettings::default()).write(&zoning).unwrap();

    assert!(report.feature_classes.is_empty());
    assert!(memory.stores().is_empty());
}

#[test]
fn test_geojson_output_carries_crs() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GxWriterSettings::new(dir.path())
        .with_file_extension(".geojson")
        .with_destination_crs(GxCrs::epsg(4326));
    let mut zoning = GxZoning::new(Some(GxCrs::epsg(4326)));
    zoning.od_zones = od_zones();

    GxZoningExporter::new(GxSessionOptions::new(writer), GxZoningSettings::default())
        .write(&zoning)
        .unwrap();

    let content = fs::read_to_string(dir.path().join("planit_zones_od_polygon.geojson")).unwrap();
    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(document["type"], "FeatureCollection");
    assert_eq!(document["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::4326");
    assert_eq!(document["features"].as_array().unwrap().len(), 2);
    assert_eq!(document["features"][0]["properties"]["mapped_id"], "z1");
    assert_eq!(document["features"][0]["geometry"]["type"], "Polygon");
}
