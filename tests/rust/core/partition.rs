//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::collections::BTreeSet;

use geo_types::{line_string, polygon, Geometry, Point};
use geox::{partition_by_geometry, GxGeometryType};
use proptest::prelude::*;

#[derive(Debug)]
struct Zone {
    id: usize,
    geometry: Option<Geometry<f64>>,
}

fn shape(kind: u8) -> Option<Geometry<f64>> {
    match kind {
        0 => None,
        1 => Some(Geometry::Point(Point::new(1.0, 2.0))),
        2 => Some(Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)])),
        _ => Some(Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)])),
    }
}

#[test]
fn test_three_zones_two_polygons_one_point() {
    let zones = vec![
        Zone { id: 1, geometry: shape(2) },
        Zone { id: 2, geometry: shape(1) },
        Zone { id: 3, geometry: shape(2) },
    ];
    let partition = partition_by_geometry(&zones, |z| z.geometry.as_ref(), "od zones");

    assert_eq!(partition.buckets.len(), 2);
    assert!(partition.is_mixed());
    assert_eq!(partition.bucket(GxGeometryType::Polygon).unwrap().len(), 2);
    assert_eq!(partition.bucket(GxGeometryType::Point).unwrap().len(), 1);
    assert!(partition.skipped.is_empty());

    let polygon_ids: Vec<usize> = partition
        .bucket(GxGeometryType::Polygon)
        .unwrap()
        .members
        .iter()
        .map(|z| z.id)
        .collect();
    assert_eq!(polygon_ids, vec![1, 3]);
}

#[test]
fn test_single_shape_is_not_mixed() {
    let zones = vec![Zone { id: 1, geometry: shape(1) }, Zone { id: 2, geometry: None }];
    let partition = partition_by_geometry(&zones, |z| z.geometry.as_ref(), "transfer zones");
    assert!(!partition.is_mixed());
    assert_eq!(partition.placed(), 1);
    assert_eq!(partition.skipped.len(), 1);
    assert_eq!(partition.skipped[0].id, 2);
}

proptest! {
    #[test]
    fn prop_partition_is_complete_and_disjoint(kinds in proptest::collection::vec(0u8..4, 0..40)) {
        let zones: Vec<Zone> = kinds.iter().enumerate().map(|(id, kind)| Zone { id, geometry: shape(*kind) }).collect();
        let partition = partition_by_geometry(&zones, |z| z.geometry.as_ref(), "zones");

        let mut seen = BTreeSet::new();
        for bucket in &partition.buckets {
            for member in &bucket.members {
                prop_assert!(seen.insert(member.id));
                prop_assert_eq!(
                    GxGeometryType::classify(member.geometry.as_ref().unwrap()),
                    bucket.geometry_type
                );
            }
        }
        for member in &partition.skipped {
            prop_assert!(member.geometry.is_none());
            prop_assert!(seen.insert(member.id));
        }
        prop_assert_eq!(seen.len(), zones.len());
        prop_assert_eq!(partition.placed() + partition.skipped.len(), zones.len());
    }
}
