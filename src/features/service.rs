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

//! Feature contexts of service network layers.

use geo_types::Geometry;

use crate::context::{GxEntityType, GxFeatureContext};
use crate::errors::Result;
use crate::features::{join_ids, mapped_and_id, xml_and_external};
use crate::geometry::GxGeometryType;
use crate::model::{GxIdMappers, GxServiceLeg, GxServiceLegSegment, GxServiceNode};

/// `parent` lists the mapped physical parent nodes.
pub fn service_node_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxServiceNode>> {
    let parents = ids.node.clone();
    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::ServiceNode), &ids.service_node);
    xml_and_external(builder)
        .string("parent", move |n: &GxServiceNode| {
            join_ids(n.parent_nodes.iter().map(|p| p.as_ref()), &parents)
        })
        .geometry(GxGeometryType::Point, |n: &GxServiceNode| n.position().map(Geometry::Point))
        .build()
}

pub fn service_leg_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxServiceLeg>> {
    let node_a = ids.service_node.clone();
    let node_b = ids.service_node.clone();
    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::ServiceLeg), &ids.service_leg);
    xml_and_external(builder)
        .optional_string("name", |l: &GxServiceLeg| l.name.clone())
        .double("length_km", |l: &GxServiceLeg| l.length_km)
        .string("snode_a", move |l: &GxServiceLeg| node_a(&l.node_a))
        .string("snode_b", move |l: &GxServiceLeg| node_b(&l.node_b))
        .geometry(GxGeometryType::LineString, |l: &GxServiceLeg| {
            l.geometry_or_nodes().map(Geometry::LineString)
        })
        .build()
}

/// `phys_segs` lists the traversed physical link segments in travel order.
pub fn service_leg_segment_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxServiceLegSegment>> {
    let parent = ids.service_leg.clone();
    let physical = ids.link_segment.clone();
    let node_up = ids.service_node.clone();
    let node_down = ids.service_node.clone();
    let builder = mapped_and_id(
        GxFeatureContext::builder(GxEntityType::ServiceLegSegment),
        &ids.service_leg_segment,
    );
    xml_and_external(builder)
        .string("parent_id", move |s: &GxServiceLegSegment| parent(&s.parent))
        .string("phys_segs", move |s: &GxServiceLegSegment| {
            join_ids(s.physical_segments.iter().map(|p| p.as_ref()), &physical)
        })
        .string("snode_up", move |s: &GxServiceLegSegment| node_up(s.upstream_service_node()))
        .string("snode_down", move |s: &GxServiceLegSegment| node_down(s.downstream_service_node()))
        .geometry(GxGeometryType::LineString, |s: &GxServiceLegSegment| {
            s.geometry().map(Geometry::LineString)
        })
        .build()
}
