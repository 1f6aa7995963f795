//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::path::Path;
use std::sync::Arc;

use geox::{
    GxAttributeValue, GxDriverRegistry, GxEntityType, GxLink, GxLinkSegment, GxLinkSegmentType, GxMemoryDriver,
    GxMode, GxModeKind, GxNode, GxRoutedService, GxRoutedServices, GxRoutedServicesExporter,
    GxRoutedServicesLayer, GxRoutedServicesSettings, GxRoutedTrip, GxServiceLeg, GxServiceLegSegment,
    GxServiceNetwork, GxServiceNetworkExporter, GxServiceNetworkLayer, GxServiceNetworkSettings, GxServiceNode,
    GxSessionOptions, GxTripKind, GxWriterSettings,
};

struct Fixture {
    service_network: GxServiceNetwork,
    routed: GxRoutedServices,
}

fn fixture() -> Fixture {
    let bus = Arc::new(GxMode::new(1, "bus", GxModeKind::Bus));
    let tram = Arc::new(GxMode::new(2, "tram", GxModeKind::Tram));

    let n1 = Arc::new(GxNode::new(1, "n1").with_position(0.0, 0.0));
    let n2 = Arc::new(GxNode::new(2, "n2").with_position(1.0, 0.0));
    let link = Arc::new(GxLink::new(1, "l1", n1.clone(), n2.clone(), 0.1));
    let segment_type = Arc::new(GxLinkSegmentType::new(1, "t1", "street").with_mode(&bus, 50.0, 40.0));
    let segment = Arc::new(GxLinkSegment::new(1, "s1", link, true, segment_type));

    let sn1 = Arc::new(GxServiceNode::new(1, "sn1").with_parent(n1));
    let sn2 = Arc::new(GxServiceNode::new(2, "sn2").with_parent(n2));
    let leg = Arc::new(GxServiceLeg::new(1, "sl1", sn1.clone(), sn2.clone()).with_length(0.1));
    let leg_segment = Arc::new(GxServiceLegSegment::new(1, "sls1", leg.clone(), true).with_physical_segment(segment));

    let mut layer = GxServiceNetworkLayer::new(0, "pt");
    layer.service_nodes.extend([sn1, sn2]);
    layer.legs.push(leg);
    layer.leg_segments.push(leg_segment.clone());

    let trip = Arc::new(GxRoutedTrip::new(1, "trip1", GxTripKind::Schedule).with_leg_segment(leg_segment));
    let routed_layer = GxRoutedServicesLayer::new(0, "rs")
        .with_service(Arc::new(GxRoutedService::new(1, "tram_1", tram).with_name("1").with_trip(trip.clone())))
        .with_service(Arc::new(GxRoutedService::new(2, "bus_10", bus.clone()).with_trip(trip)))
        .with_service(Arc::new(GxRoutedService::new(3, "bus_11", bus)));

    Fixture {
        service_network: GxServiceNetwork::new(None).with_layer(layer),
        routed: GxRoutedServices::new(None).with_layer(routed_layer),
    }
}

fn memory_options(dir: &Path) -> (GxSessionOptions, GxMemoryDriver) {
    let memory = GxMemoryDriver::new();
    let mut drivers = GxDriverRegistry::new();
    drivers.register("mem", Arc::new(memory.clone()));
    let writer = GxWriterSettings::new(dir).with_file_extension("mem");
    (GxSessionOptions::new(writer).with_drivers(drivers), memory)
}

#[test]
fn test_service_network_layers() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path());
    let fixture = fixture();

    let report = GxServiceNetworkExporter::new(options, GxServiceNetworkSettings::default())
        .write(&fixture.service_network)
        .unwrap();

    assert_eq!(
        report.schemas(),
        vec![
            "layer_pt_planit_service_nodes",
            "layer_pt_planit_service_legs",
            "layer_pt_planit_service_leg_segments",
        ]
    );
    assert_eq!(report.rows_of(GxEntityType::ServiceNode), 2);
    let segments = memory.rows_of("layer_pt_planit_service_leg_segments");
    assert_eq!(segments.len(), 1);
    assert!(segments[0].values.contains(&GxAttributeValue::String("s1".into())));
    assert!(!segments[0].values.last().unwrap().is_null());
}

#[test]
fn test_routed_services_split_by_mode() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path());
    let fixture = fixture();

    let report = GxRoutedServicesExporter::new(options, GxRoutedServicesSettings::default())
        .write(&fixture.routed)
        .unwrap();

    assert_eq!(
        report.schemas(),
        vec!["layer_rs_mode_bus_planit_service", "layer_rs_mode_tram_planit_service"]
    );
    assert_eq!(report.feature_class("layer_rs_mode_bus_planit_service").unwrap().rows, 2);
    assert_eq!(report.feature_class("layer_rs_mode_bus_planit_service").unwrap().null_geometries, 1);
    assert_eq!(memory.stores().len(), 1);

    let tram = memory.rows_of("layer_rs_mode_tram_planit_service");
    assert_eq!(tram.len(), 1);
    assert!(tram[0].values.contains(&GxAttributeValue::String("trip1".into())));
    assert!(tram[0].values.last().unwrap().as_geometry().is_some());
}

#[test]
fn test_routed_services_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let (options, memory) = memory_options(dir.path());
    let settings = GxRoutedServicesSettings::default().with_persist_services(false);

    let report = GxRoutedServicesExporter::new(options, settings).write(&fixture().routed).unwrap();

    assert!(report.feature_classes.is_empty());
    assert!(memory.stores().is_empty());
}
