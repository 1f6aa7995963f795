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

//! Feature contexts of the physical network.

use std::sync::Arc;

use geo_types::Geometry;

use crate::context::{GxEntityType, GxFeatureContext};
use crate::errors::Result;
use crate::features::{mapped_and_id, xml_and_external};
use crate::geometry::GxGeometryType;
use crate::mode_names::short_mode_name;
use crate::model::{GxIdMappers, GxLink, GxLinkSegment, GxMode, GxNode};

pub fn node_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxNode>> {
    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::Node), &ids.node)
        .long("node_id", |n: &GxNode| n.node_id);
    xml_and_external(builder)
        .optional_string("name", |n: &GxNode| n.name.clone())
        .geometry(GxGeometryType::Point, |n: &GxNode| n.position.map(Geometry::Point))
        .build()
}

/// Links without explicit geometry are written as the line between their nodes.
pub fn link_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxLink>> {
    let node_a = ids.node.clone();
    let node_b = ids.node.clone();
    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::Link), &ids.link)
        .long("link_id", |l: &GxLink| l.link_id);
    xml_and_external(builder)
        .optional_string("name", |l: &GxLink| l.name.clone())
        .double("length_km", |l: &GxLink| Some(l.length_km))
        .string("node_a", move |l: &GxLink| node_a(&l.node_a))
        .string("node_b", move |l: &GxLink| node_b(&l.node_b))
        .geometry(GxGeometryType::LineString, |l: &GxLink| {
            l.geometry_or_nodes().map(Geometry::LineString)
        })
        .build()
}

/// Fixed link segment columns followed by `<mode>_ban`, `<mode>_spd` and
/// `<mode>_spdc` for every supported mode, in the given order.
pub fn link_segment_context(ids: &GxIdMappers, supported_modes: &[Arc<GxMode>]) -> Result<GxFeatureContext<GxLinkSegment>> {
    let parent = ids.link.clone();
    let node_up = ids.node.clone();
    let node_down = ids.node.clone();
    let segment_type = ids.link_segment_type.clone();

    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::LinkSegment), &ids.link_segment)
        .long("segment_id", |s: &GxLinkSegment| s.segment_id);
    let mut builder = xml_and_external(builder)
        .string("parent_id", move |s: &GxLinkSegment| parent(&s.parent))
        .integer("lanes", |s: &GxLinkSegment| s.lanes)
        .float("cap_pcuh", |s: &GxLinkSegment| Some(s.capacity_or_default_pcuh() as f32))
        .float("speed_kmh", |s: &GxLinkSegment| s.physical_speed_kmh.map(|v| v as f32))
        .boolean("geom_opp", |s: &GxLinkSegment| !s.is_parent_geometry_in_segment_direction())
        .string("node_up", move |s: &GxLinkSegment| node_up(s.upstream_node()))
        .string("node_down", move |s: &GxLinkSegment| node_down(s.downstream_node()))
        .string("type_id", move |s: &GxLinkSegment| segment_type(&s.segment_type))
        .string("type_name", |s: &GxLinkSegment| s.segment_type.name.clone())
        .float("dens_pcukm", |s: &GxLinkSegment| {
            Some(s.segment_type.max_density_per_lane_or_default() as f32)
        });

    for mode in supported_modes {
        let short = short_mode_name(mode, &ids.mode)?;
        let banned = mode.clone();
        let speed = mode.clone();
        let critical = mode.clone();
        builder = builder
            .boolean(&format!("{}_ban", short), move |s: &GxLinkSegment| !s.is_mode_allowed(&banned))
            .double(&format!("{}_spd", short), move |s: &GxLinkSegment| s.modelled_speed_limit_kmh(&speed))
            .double(&format!("{}_spdc", short), move |s: &GxLinkSegment| {
                s.segment_type.critical_speed_kmh(&critical)
            });
    }

    builder
        .geometry(GxGeometryType::LineString, |s: &GxLinkSegment| s.geometry().map(Geometry::LineString))
        .build()
}
