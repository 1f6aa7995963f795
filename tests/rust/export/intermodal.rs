//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use geo_types::Point;
use geox::export::{GxManifest, MANIFEST_FILE_NAME};
use geox::{
    GxConnectoid, GxAccessZone, GxCrs, GxDriverRegistry, GxEntityType, GxExportConfig, GxIntermodalExporter,
    GxLink, GxLinkSegment, GxLinkSegmentType, GxMemoryDriver, GxMode, GxModeKind, GxNetwork, GxNetworkLayer,
    GxNode, GxRoutedService, GxRoutedServices, GxRoutedServicesLayer, GxServiceNetwork, GxServiceNetworkLayer,
    GxServiceNode, GxSessionOptions, GxWriterSettings, GxZone, GxZoneKind, GxZoning,
};

struct Model {
    network: GxNetwork,
    zoning: GxZoning,
    service_network: GxServiceNetwork,
    routed: GxRoutedServices,
}

fn model() -> Model {
    let bus = Arc::new(GxMode::new(1, "bus", GxModeKind::Bus));
    let n1 = Arc::new(GxNode::new(1, "n1").with_position(4.9, 52.37));
    let n2 = Arc::new(GxNode::new(2, "n2").with_position(4.91, 52.38));
    let link = Arc::new(GxLink::new(1, "l1", n1.clone(), n2.clone(), 1.2));
    let street = Arc::new(GxLinkSegmentType::new(1, "street", "street").with_mode(&bus, 50.0, 40.0));

    let mut layer = GxNetworkLayer::new(0, "road");
    layer.modes.push(bus.clone());
    layer.nodes.extend([n1.clone(), n2]);
    layer.links.push(link.clone());
    layer.link_segments.push(Arc::new(GxLinkSegment::new(1, "s1", link, true, street)));

    let zone = Arc::new(GxZone::new(1, "z1", GxZoneKind::Od).with_geometry(Point::new(4.8, 52.3)));
    let mut zoning = GxZoning::new(Some(GxCrs::epsg(4326)));
    zoning.od_zones.push(zone.clone());
    zoning.od_connectoids.push(Arc::new(
        GxConnectoid::undirected(1, "c1", n1.clone()).with_access_zone(GxAccessZone::new(zone).with_length(0.4)),
    ));

    let mut services = GxServiceNetworkLayer::new(0, "pt");
    services.service_nodes.push(Arc::new(GxServiceNode::new(1, "sn1").with_parent(n1)));

    Model {
        network: GxNetwork::new(Some(GxCrs::epsg(4326))).with_layer(layer),
        zoning,
        service_network: GxServiceNetwork::new(Some(GxCrs::epsg(4326))).with_layer(services),
        routed: GxRoutedServices::new(Some(GxCrs::epsg(4326))).with_layer(
            GxRoutedServicesLayer::new(0, "rs").with_service(Arc::new(GxRoutedService::new(1, "b1", bus))),
        ),
    }
}

fn memory_exporter(dir: &Path) -> (GxIntermodalExporter, GxMemoryDriver) {
    let memory = GxMemoryDriver::new();
    let mut drivers = GxDriverRegistry::new();
    drivers.register("mem", Arc::new(memory.clone()));
    let writer = GxWriterSettings::new(dir).with_file_extension("mem");
    let options = GxSessionOptions::new(writer.clone()).with_drivers(drivers);
    (GxIntermodalExporter::new(options, GxExportConfig::new(writer)), memory)
}

#[test]
fn test_feature_classes_follow_fixed_order() {
    let dir = tempfile::tempdir().unwrap();
    let (exporter, memory) = memory_exporter(dir.path());
    let model = model();

    let report = exporter
        .write_with_services(&model.network, &model.zoning, &model.service_network, &model.routed)
        .unwrap();

    assert_eq!(
        report.schemas(),
        vec![
            "layer_road_planit_nodes",
            "layer_road_planit_links",
            "layer_road_planit_link_segments",
            "planit_zones_od",
            "planit_connectoids_od",
            "layer_pt_planit_service_nodes",
            "layer_pt_planit_service_legs",
            "layer_pt_planit_service_leg_segments",
            "layer_rs_mode_bus_planit_service",
        ]
    );
    assert_eq!(report.rows_of(GxEntityType::Node), 2);
    assert_eq!(report.rows_of(GxEntityType::RoutedService), 1);
    assert!(memory.stores().iter().all(|store| store.disposed));
    assert_eq!(report.stores_released, memory.stores().len());
}

#[test]
fn test_write_without_services_skips_service_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let (exporter, _) = memory_exporter(dir.path());
    let model = model();

    let report = exporter.write(&model.network, &model.zoning).unwrap();

    assert_eq!(report.schemas().len(), 5);
    assert!(report.schemas().iter().all(|schema| !schema.contains("service")));
    assert_eq!(report.rows_of(GxEntityType::ServiceNode), 0);
}

#[test]
fn test_csv_export_writes_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GxWriterSettings::new(dir.path())
        .with_destination_crs(GxCrs::epsg(4326))
        .with_manifest(true);
    let exporter = GxIntermodalExporter::from_config(GxExportConfig::new(writer));
    let model = model();

    let report = exporter.write(&model.network, &model.zoning).unwrap();

    let manifest_path = report.manifest.clone().unwrap();
    assert_eq!(manifest_path, dir.path().join(MANIFEST_FILE_NAME));
    let manifest = GxManifest::from_json(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.files.len(), 5);
    assert_eq!(manifest.total_rows, report.total_rows());

    let nodes = manifest
        .files
        .iter()
        .find(|file| file.schema == "layer_road_planit_nodes")
        .unwrap();
    let bytes = fs::read(dir.path().join("layer_road_planit_nodes.csv")).unwrap();
    assert_eq!(nodes.hash, blake3::hash(&bytes).to_hex().to_string());
    assert_eq!(nodes.size, bytes.len() as u64);
    assert_eq!(nodes.rows, 2);
}
