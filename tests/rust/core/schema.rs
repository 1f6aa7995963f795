//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.

use std::sync::Arc;

use geox::features::node_context;
use geox::schema::parse_field_spec;
use geox::{
    compile, GxAttributeType, GxCrs, GxEntityType, GxFeatureContext, GxGeometryType, GxIdMapperType, GxIdMappers,
    GxSchemaWarning,
};
use proptest::prelude::*;

struct Row;

fn context_with(columns: usize) -> GxFeatureContext<Row> {
    let mut builder = GxFeatureContext::builder(GxEntityType::Link);
    for index in 0..columns {
        builder = builder.long(&format!("c{}", index), move |_: &Row| index as i64);
    }
    builder
        .geometry(GxGeometryType::LineString, |_: &Row| None)
        .build()
        .unwrap()
}

#[test]
fn test_node_schema_carries_srid() {
    let ids = GxIdMappers::new(GxIdMapperType::Xml);
    let context = node_context(&ids).unwrap();
    let compilation = compile(&context, Some(&GxCrs::epsg(4326)), "layer_0_planit_nodes");

    assert!(compilation.warning.is_none());
    assert!(compilation.schema.field_spec.starts_with("mapped_id:String,id:Long,"));
    assert!(compilation.schema.field_spec.ends_with("*geom:Point:srid=4326"));
    assert_eq!(compilation.schema.srid().as_deref(), Some("4326"));
}

#[test]
fn test_crs_without_identifier_warns() {
    let context = context_with(1);
    let compilation = compile(&context, Some(&GxCrs::new("local grid")), "links");
    assert_eq!(compilation.schema.field_spec, "c0:Long,*geom:LineString");
    assert!(matches!(compilation.warning, Some(GxSchemaWarning::MissingSrid { .. })));

    let compilation = compile(&context, None, "links");
    assert!(matches!(
        compilation.warning,
        Some(GxSchemaWarning::MissingSrid { crs: None, .. })
    ));
}

#[test]
fn test_field_spec_parses_back() {
    let ids = GxIdMappers::default();
    let modes = vec![Arc::new(geox::GxMode::new(0, "car", geox::GxModeKind::Car))];
    let context = geox::features::link_segment_context(&ids, &modes).unwrap();
    let schema = compile(&context, Some(&GxCrs::epsg(28992)), "segments").schema;
    let fields = parse_field_spec(&schema.field_spec).unwrap();

    assert_eq!(fields.len(), context.len());
    let last = fields.last().unwrap();
    assert!(last.default_geometry);
    assert_eq!(last.field_type, GxAttributeType::Geometry(GxGeometryType::LineString));
    assert_eq!(last.srid.as_deref(), Some("28992"));
    assert!(fields.iter().any(|f| f.name == "car_spdc" && f.field_type == GxAttributeType::Double));
}

proptest! {
    #[test]
    fn prop_schema_has_one_field_per_attribute(columns in 0usize..12, with_srid in any::<bool>()) {
        let context = context_with(columns);
        let crs = if with_srid { GxCrs::epsg(4326) } else { GxCrs::new("unnamed") };
        let compilation = compile(&context, Some(&crs), "links");
        let spec = &compilation.schema.field_spec;

        prop_assert_eq!(spec.split(',').count(), columns + 1);
        let last = spec.split(',').last().unwrap();
        prop_assert!(last.starts_with("*geom:LineString"));
        prop_assert_eq!(spec.contains(":srid="), with_srid);
        prop_assert_eq!(compilation.warning.is_none(), with_srid);
    }
}
