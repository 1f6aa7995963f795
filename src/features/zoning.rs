//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Feature contexts of the zoning and its virtual network.
//!
//! Connectoids flatten their access zones into comma separated lists:
//! `zones` holds the mapped zone ids, `modes` holds `zone:mode` pairs (or
//! `zone:ALL` when the zone does not restrict modes) and `lengths_km` holds
//! `zone:length` pairs with one decimal, `NaN` when the length is unknown.

use geo_types::Geometry;

use crate::context::{GxEntityType, GxFeatureContext};
use crate::errors::{GxError, Result};
use crate::features::{join_ids, mapped_and_id, xml_and_external};
use crate::geometry::GxGeometryType;
use crate::model::{GxConnectoid, GxConnectoidAccess, GxConnectoidEdge, GxConnectoidSegment, GxIdMappers, GxZone};

/// Marker written for access zones without explicit modes.
pub const ALL_MODES: &str = "ALL";
pub const PHYS_NODE_DOWNSTREAM: &str = "PHYS_NODE_DOWNSTREAM";
pub const PHYS_NODE_UPSTREAM: &str = "PHYS_NODE_UPSTREAM";

/// Zone context for one geometry bucket.
pub fn zone_context(
    ids: &GxIdMappers,
    entity_type: GxEntityType,
    geometry_type: GxGeometryType,
) -> Result<GxFeatureContext<GxZone>> {
    if !matches!(entity_type, GxEntityType::OdZone | GxEntityType::TransferZone) {
        return Err(GxError::configuration(format!("{} is not a zone entity type", entity_type)));
    }
    let builder = mapped_and_id(GxFeatureContext::builder(entity_type), &ids.zone);
    xml_and_external(builder)
        .optional_string("name", |z: &GxZone| z.name.clone())
        .geometry(geometry_type, |z: &GxZone| z.geometry.clone())
        .build()
}

/// Od connectoids are written undirected, transfer connectoids directed.
pub fn connectoid_context(ids: &GxIdMappers, entity_type: GxEntityType) -> Result<GxFeatureContext<GxConnectoid>> {
    let directed = match entity_type {
        GxEntityType::OdConnectoid => false,
        GxEntityType::TransferConnectoid => true,
        other => {
            return Err(GxError::configuration(format!("{} is not a connectoid entity type", other)));
        }
    };

    let node = ids.node.clone();
    let zones = ids.zone.clone();
    let mode_zones = ids.zone.clone();
    let modes = ids.mode.clone();
    let length_zones = ids.zone.clone();

    let builder = mapped_and_id(GxFeatureContext::builder(entity_type), &ids.connectoid);
    let mut builder = xml_and_external(builder)
        .optional_string("name", |c: &GxConnectoid| c.name.clone())
        .string("phys_node", move |c: &GxConnectoid| node(c.access_node()))
        .string("zones", move |c: &GxConnectoid| {
            join_ids(c.access_zones.iter().map(|a| a.zone.as_ref()), &zones)
        })
        .string("modes", move |c: &GxConnectoid| {
            c.access_zones
                .iter()
                .map(|access| {
                    let zone = mode_zones(&access.zone);
                    if access.has_explicit_modes() {
                        access
                            .allowed_modes
                            .iter()
                            .map(|mode| format!("{}:{}", zone, modes(mode)))
                            .collect::<Vec<_>>()
                            .join(",")
                    } else {
                        format!("{}:{}", zone, ALL_MODES)
                    }
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .string("lengths_km", move |c: &GxConnectoid| {
            c.access_zones
                .iter()
                .map(|access| {
                    format!("{}:{:.1}", length_zones(&access.zone), access.length_km.unwrap_or(f64::NAN))
                })
                .collect::<Vec<_>>()
                .join(",")
        });

    if directed {
        let segment = ids.link_segment.clone();
        builder = builder
            .optional_string("phys_segm", move |c: &GxConnectoid| {
                c.access_segment().map(|s| segment(s))
            })
            .optional_string("segm2node", |c: &GxConnectoid| match &c.access {
                GxConnectoidAccess::Segment { node_downstream: true, .. } => {
                    Some(PHYS_NODE_DOWNSTREAM.to_string())
                }
                GxConnectoidAccess::Segment { .. } => Some(PHYS_NODE_UPSTREAM.to_string()),
                GxConnectoidAccess::Node(_) => None,
            });
    }

    builder
        .geometry(GxGeometryType::Point, |c: &GxConnectoid| c.position().map(Geometry::Point))
        .build()
}

pub fn connectoid_edge_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxConnectoidEdge>> {
    let node_a = ids.node.clone();
    let node_b = ids.node.clone();
    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::ConnectoidEdge), &ids.connectoid_edge)
        .long("link_id", |e: &GxConnectoidEdge| e.edge_id);
    xml_and_external(builder)
        .optional_string("name", |e: &GxConnectoidEdge| e.name.clone())
        .double("length_km", |e: &GxConnectoidEdge| Some(e.length_km))
        .string("node_a", move |e: &GxConnectoidEdge| node_a(&e.vertex_a))
        .string("node_b", move |e: &GxConnectoidEdge| node_b(&e.vertex_b))
        .geometry(GxGeometryType::LineString, |e: &GxConnectoidEdge| e.geometry().map(Geometry::LineString))
        .build()
}

pub fn connectoid_segment_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxConnectoidSegment>> {
    let parent = ids.connectoid_edge.clone();
    let vertex_up = ids.node.clone();
    let vertex_down = ids.node.clone();
    let builder = mapped_and_id(
        GxFeatureContext::builder(GxEntityType::ConnectoidSegment),
        &ids.connectoid_segment,
    )
    .long("segment_id", |s: &GxConnectoidSegment| s.segment_id);
    xml_and_external(builder)
        .string("parent_id", move |s: &GxConnectoidSegment| parent(&s.parent))
        .float("cap_pcuh", |s: &GxConnectoidSegment| s.capacity_pcuh.map(|c| c as f32))
        .boolean("geom_opp", |s: &GxConnectoidSegment| !s.is_parent_geometry_in_segment_direction())
        .string("vertx_up", move |s: &GxConnectoidSegment| vertex_up(s.upstream_vertex()))
        .string("vertx_down", move |s: &GxConnectoidSegment| vertex_down(s.downstream_vertex()))
        .geometry(GxGeometryType::LineString, |s: &GxConnectoidSegment| {
            s.parent.geometry().map(Geometry::LineString)
        })
        .build()
}
