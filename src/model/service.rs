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

//! # Service Network Model
//!
//! Service nodes sit on top of physical nodes, service legs connect them and
//! directed service leg segments follow physical link segments.

use std::sync::Arc;

use geo_types::{Coord, LineString, Point};

use crate::geometry::GxCrs;
use crate::model::network::{line_between, GxLinkSegment, GxNetworkLayer, GxNode};

#[derive(Clone, Debug, PartialEq)]
pub struct GxServiceNode {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub parent_nodes: Vec<Arc<GxNode>>,
}

impl GxServiceNode {
    pub fn new(id: i64, xml_id: impl Into<String>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            parent_nodes: Vec::new(),
        }
    }

    pub fn with_parent(mut self, node: Arc<GxNode>) -> Self {
        self.parent_nodes.push(node);
        self
    }

    /// Position of the first physical parent node that has one.
    pub fn position(&self) -> Option<Point<f64>> {
        self.parent_nodes.iter().find_map(|node| node.position)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxServiceLeg {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub node_a: Arc<GxServiceNode>,
    pub node_b: Arc<GxServiceNode>,
    /// Average length over the directions the leg is used in.
    pub length_km: Option<f64>,
    pub geometry: Option<LineString<f64>>,
}

impl GxServiceLeg {
    pub fn new(id: i64, xml_id: impl Into<String>, node_a: Arc<GxServiceNode>, node_b: Arc<GxServiceNode>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            node_a,
            node_b,
            length_km: None,
            geometry: None,
        }
    }

    pub fn with_length(mut self, length_km: f64) -> Self {
        self.length_km = Some(length_km);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Explicit geometry, or the straight line between the service nodes.
    pub fn geometry_or_nodes(&self) -> Option<LineString<f64>> {
        self.geometry
            .clone()
            .or_else(|| line_between(self.node_a.position(), self.node_b.position()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxServiceLegSegment {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub parent: Arc<GxServiceLeg>,
    pub direction_ab: bool,
    pub physical_segments: Vec<Arc<GxLinkSegment>>,
}

impl GxServiceLegSegment {
    pub fn new(id: i64, xml_id: impl Into<String>, parent: Arc<GxServiceLeg>, direction_ab: bool) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            parent,
            direction_ab,
            physical_segments: Vec::new(),
        }
    }

    pub fn with_physical_segment(mut self, segment: Arc<GxLinkSegment>) -> Self {
        self.physical_segments.push(segment);
        self
    }

    pub fn upstream_service_node(&self) -> &Arc<GxServiceNode> {
        if self.direction_ab {
            &self.parent.node_a
        } else {
            &self.parent.node_b
        }
    }

    pub fn downstream_service_node(&self) -> &Arc<GxServiceNode> {
        if self.direction_ab {
            &self.parent.node_b
        } else {
            &self.parent.node_a
        }
    }

    /// Physical path geometry in travel direction, or the line between the service nodes.
    pub fn geometry(&self) -> Option<LineString<f64>> {
        let path: Vec<LineString<f64>> = self
            .physical_segments
            .iter()
            .filter_map(|segment| segment.directed_geometry())
            .collect();
        if !path.is_empty() && path.len() == self.physical_segments.len() {
            return Some(concatenate(&path));
        }
        line_between(
            self.upstream_service_node().position(),
            self.downstream_service_node().position(),
        )
    }
}

/// Joins consecutive lines, dropping repeated joint coordinates.
pub(crate) fn concatenate(lines: &[LineString<f64>]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for line in lines {
        for coord in &line.0 {
            if coords.last() != Some(coord) {
                coords.push(*coord);
            }
        }
    }
    LineString::new(coords)
}

managed_entity!(GxServiceNode, GxServiceLeg, GxServiceLegSegment);

#[derive(Clone, Debug, Default)]
pub struct GxServiceNetworkLayer {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    /// Xml id of the physical layer the services run on.
    pub parent_layer_xml_id: Option<String>,
    pub service_nodes: Vec<Arc<GxServiceNode>>,
    pub legs: Vec<Arc<GxServiceLeg>>,
    pub leg_segments: Vec<Arc<GxServiceLegSegment>>,
}

managed_entity!(GxServiceNetworkLayer);

impl GxServiceNetworkLayer {
    pub fn new(id: i64, xml_id: impl Into<String>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            ..Default::default()
        }
    }

    pub fn on_parent(mut self, parent: &GxNetworkLayer) -> Self {
        self.parent_layer_xml_id = Some(parent.xml_id.clone());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.service_nodes.is_empty() && self.legs.is_empty() && self.leg_segments.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct GxServiceNetwork {
    pub crs: Option<GxCrs>,
    pub layers: Vec<GxServiceNetworkLayer>,
}

impl GxServiceNetwork {
    pub fn new(crs: Option<GxCrs>) -> Self {
        Self {
            crs,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: GxServiceNetworkLayer) -> Self {
        self.layers.push(layer);
        self
    }
}
