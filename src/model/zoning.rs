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

//! # Zoning Model
//!
//! Zones, the connectoids that attach them to the physical network and the
//! virtual network of connectoid edges and segments.

use std::sync::Arc;

use geo_types::{Geometry, LineString, Point};
use serde::{Deserialize, Serialize};

use crate::geometry::GxCrs;
use crate::model::network::{line_between, GxLinkSegment, GxMode, GxNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GxZoneKind {
    /// Origin-destination zone.
    Od,
    /// Transfer zone, e.g. a stop or platform.
    Transfer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxZone {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub kind: GxZoneKind,
    /// Point or area depending on the source data, absent when unknown.
    pub geometry: Option<Geometry<f64>>,
}

impl GxZone {
    pub fn new(id: i64, xml_id: impl Into<String>, kind: GxZoneKind) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            kind,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<Geometry<f64>>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A zone reachable through a connectoid.
#[derive(Clone, Debug, PartialEq)]
pub struct GxAccessZone {
    pub zone: Arc<GxZone>,
    /// Explicitly allowed modes; empty means every mode.
    pub allowed_modes: Vec<Arc<GxMode>>,
    pub length_km: Option<f64>,
}

impl GxAccessZone {
    pub fn new(zone: Arc<GxZone>) -> Self {
        Self {
            zone,
            allowed_modes: Vec::new(),
            length_km: None,
        }
    }

    pub fn with_mode(mut self, mode: Arc<GxMode>) -> Self {
        self.allowed_modes.push(mode);
        self
    }

    pub fn with_length(mut self, length_km: f64) -> Self {
        self.length_km = Some(length_km);
        self
    }

    pub fn has_explicit_modes(&self) -> bool {
        !self.allowed_modes.is_empty()
    }
}

/// Where a connectoid meets the physical network.
#[derive(Clone, Debug, PartialEq)]
pub enum GxConnectoidAccess {
    /// Undirected access through a node.
    Node(Arc<GxNode>),
    /// Directed access through one end of a link segment.
    Segment {
        segment: Arc<GxLinkSegment>,
        node_downstream: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxConnectoid {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub access: GxConnectoidAccess,
    pub access_zones: Vec<GxAccessZone>,
}

impl GxConnectoid {
    pub fn undirected(id: i64, xml_id: impl Into<String>, node: Arc<GxNode>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            access: GxConnectoidAccess::Node(node),
            access_zones: Vec::new(),
        }
    }

    pub fn directed(id: i64, xml_id: impl Into<String>, segment: Arc<GxLinkSegment>, node_downstream: bool) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            access: GxConnectoidAccess::Segment {
                segment,
                node_downstream,
            },
            access_zones: Vec::new(),
        }
    }

    pub fn with_access_zone(mut self, access_zone: GxAccessZone) -> Self {
        self.access_zones.push(access_zone);
        self
    }

    pub fn is_directed(&self) -> bool {
        matches!(self.access, GxConnectoidAccess::Segment { .. })
    }

    /// Physical node the connectoid attaches to.
    pub fn access_node(&self) -> &Arc<GxNode> {
        match &self.access {
            GxConnectoidAccess::Node(node) => node,
            GxConnectoidAccess::Segment {
                segment,
                node_downstream: true,
            } => segment.downstream_node(),
            GxConnectoidAccess::Segment { segment, .. } => segment.upstream_node(),
        }
    }

    pub fn access_segment(&self) -> Option<&Arc<GxLinkSegment>> {
        match &self.access {
            GxConnectoidAccess::Segment { segment, .. } => Some(segment),
            GxConnectoidAccess::Node(_) => None,
        }
    }

    pub fn position(&self) -> Option<Point<f64>> {
        self.access_node().position
    }
}

/// Virtual link between a zone centroid and a connectoid access node.
#[derive(Clone, Debug, PartialEq)]
pub struct GxConnectoidEdge {
    pub id: i64,
    pub edge_id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub length_km: f64,
    pub vertex_a: Arc<GxNode>,
    pub vertex_b: Arc<GxNode>,
}

impl GxConnectoidEdge {
    pub fn new(id: i64, xml_id: impl Into<String>, vertex_a: Arc<GxNode>, vertex_b: Arc<GxNode>, length_km: f64) -> Self {
        Self {
            id,
            edge_id: id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            length_km,
            vertex_a,
            vertex_b,
        }
    }

    pub fn geometry(&self) -> Option<LineString<f64>> {
        line_between(self.vertex_a.position, self.vertex_b.position)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxConnectoidSegment {
    pub id: i64,
    pub segment_id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub parent: Arc<GxConnectoidEdge>,
    pub direction_ab: bool,
    pub capacity_pcuh: Option<f64>,
}

impl GxConnectoidSegment {
    pub fn new(id: i64, xml_id: impl Into<String>, parent: Arc<GxConnectoidEdge>, direction_ab: bool) -> Self {
        Self {
            id,
            segment_id: id,
            xml_id: xml_id.into(),
            external_id: None,
            parent,
            direction_ab,
            capacity_pcuh: None,
        }
    }

    pub fn upstream_vertex(&self) -> &Arc<GxNode> {
        if self.direction_ab {
            &self.parent.vertex_a
        } else {
            &self.parent.vertex_b
        }
    }

    pub fn downstream_vertex(&self) -> &Arc<GxNode> {
        if self.direction_ab {
            &self.parent.vertex_b
        } else {
            &self.parent.vertex_a
        }
    }

    /// Parent geometry always runs from vertex A to vertex B.
    pub fn is_parent_geometry_in_segment_direction(&self) -> bool {
        self.direction_ab
    }
}

managed_entity!(GxZone, GxConnectoid, GxConnectoidEdge, GxConnectoidSegment);

/// Virtual network connecting zones to the physical network.
#[derive(Clone, Debug, Default)]
pub struct GxVirtualNetwork {
    pub connectoid_edges: Vec<Arc<GxConnectoidEdge>>,
    pub connectoid_segments: Vec<Arc<GxConnectoidSegment>>,
}

impl GxVirtualNetwork {
    pub fn is_empty(&self) -> bool {
        self.connectoid_edges.is_empty() && self.connectoid_segments.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct GxZoning {
    pub crs: Option<GxCrs>,
    pub od_zones: Vec<Arc<GxZone>>,
    pub transfer_zones: Vec<Arc<GxZone>>,
    pub od_connectoids: Vec<Arc<GxConnectoid>>,
    pub transfer_connectoids: Vec<Arc<GxConnectoid>>,
    pub virtual_network: GxVirtualNetwork,
}

impl GxZoning {
    pub fn new(crs: Option<GxCrs>) -> Self {
        Self {
            crs,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::network::{GxLink, GxLinkSegmentType};

    #[test]
    fn directed_connectoid_resolves_access_node() {
        let a = Arc::new(GxNode::new(1, "a").with_position(0.0, 0.0));
        let b = Arc::new(GxNode::new(2, "b").with_position(1.0, 0.0));
        let link = Arc::new(GxLink::new(1, "l", a, b, 0.1));
        let segment = Arc::new(GxLinkSegment::new(
            1,
            "s",
            link,
            true,
            Arc::new(GxLinkSegmentType::new(1, "t", "road")),
        ));
        let downstream = GxConnectoid::directed(1, "c1", segment.clone(), true);
        let upstream = GxConnectoid::directed(2, "c2", segment, false);
        assert_eq!(downstream.access_node().xml_id, "b");
        assert_eq!(upstream.access_node().xml_id, "a");
        assert!(downstream.is_directed());
        assert_eq!(upstream.position(), Some(Point::new(0.0, 0.0)));
    }
}
