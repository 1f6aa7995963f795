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

//! # Physical Network Model
//!
//! Modes, nodes, links and directed link segments grouped into layers.

use std::collections::BTreeMap;
use std::sync::Arc;

use geo_types::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};

use crate::geometry::GxCrs;

/// Capacity per lane used when neither segment nor type define one.
pub const DEFAULT_CAPACITY_PER_LANE_PCUH: f64 = 1800.0;
/// Jam density per lane used when the segment type defines none.
pub const DEFAULT_MAX_DENSITY_PER_LANE_PCUKM: f64 = 180.0;

/// Predefined transport mode kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GxModeKind {
    Car,
    Bus,
    Train,
    Tram,
    Ferry,
    GoodsVehicle,
    HeavyGoodsVehicle,
    LargeHeavyGoodsVehicle,
    Bicycle,
    CarShare,
    CarHighOccupancy,
    Pedestrian,
    MotorBike,
    Subway,
    LightRail,
    Custom,
}

impl GxModeKind {
    /// Canonical value of the kind.
    pub fn value(&self) -> &'static str {
        match self {
            GxModeKind::Car => "car",
            GxModeKind::Bus => "bus",
            GxModeKind::Train => "train",
            GxModeKind::Tram => "tram",
            GxModeKind::Ferry => "ferry",
            GxModeKind::GoodsVehicle => "goods",
            GxModeKind::HeavyGoodsVehicle => "hgv",
            GxModeKind::LargeHeavyGoodsVehicle => "lhgv",
            GxModeKind::Bicycle => "bicycle",
            GxModeKind::CarShare => "car_share",
            GxModeKind::CarHighOccupancy => "car_hov",
            GxModeKind::Pedestrian => "pedestrian",
            GxModeKind::MotorBike => "motor_bike",
            GxModeKind::Subway => "subway",
            GxModeKind::LightRail => "lightrail",
            GxModeKind::Custom => "custom",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxMode {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: String,
    pub kind: GxModeKind,
    pub max_speed_kmh: f64,
}

impl GxMode {
    pub fn new(id: i64, xml_id: impl Into<String>, kind: GxModeKind) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: kind.value().to_string(),
            kind,
            max_speed_kmh: 130.0,
        }
    }

    /// Creates a custom mode identified by its name.
    pub fn custom(id: i64, xml_id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut mode = Self::new(id, xml_id, GxModeKind::Custom);
        mode.name = name.into();
        mode
    }

    pub fn with_max_speed(mut self, max_speed_kmh: f64) -> Self {
        self.max_speed_kmh = max_speed_kmh;
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxNode {
    pub id: i64,
    pub node_id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub position: Option<Point<f64>>,
}

impl GxNode {
    pub fn new(id: i64, xml_id: impl Into<String>) -> Self {
        Self {
            id,
            node_id: id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            position: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// Straight line between two optional positions.
pub(crate) fn line_between(a: Option<Point<f64>>, b: Option<Point<f64>>) -> Option<LineString<f64>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(LineString::new(vec![a.0, b.0])),
        _ => None,
    }
}

fn squared_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxLink {
    pub id: i64,
    pub link_id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub length_km: f64,
    pub node_a: Arc<GxNode>,
    pub node_b: Arc<GxNode>,
    pub geometry: Option<LineString<f64>>,
}

impl GxLink {
    pub fn new(id: i64, xml_id: impl Into<String>, node_a: Arc<GxNode>, node_b: Arc<GxNode>, length_km: f64) -> Self {
        Self {
            id,
            link_id: id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            length_km,
            node_a,
            node_b,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: LineString<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Explicit geometry, or the straight line from node A to node B.
    pub fn geometry_or_nodes(&self) -> Option<LineString<f64>> {
        self.geometry
            .clone()
            .or_else(|| line_between(self.node_a.position, self.node_b.position))
    }

    /// Straight line between the end nodes in the requested direction.
    pub fn vertex_line(&self, direction_ab: bool) -> Option<LineString<f64>> {
        if direction_ab {
            line_between(self.node_a.position, self.node_b.position)
        } else {
            line_between(self.node_b.position, self.node_a.position)
        }
    }

    /// Whether the explicit geometry starts at node A.
    ///
    /// True when there is no explicit geometry or no node position to compare with.
    pub fn geometry_runs_ab(&self) -> bool {
        let first = match self.geometry.as_ref().and_then(|g| g.0.first()) {
            Some(first) => *first,
            None => return true,
        };
        match (self.node_a.position, self.node_b.position) {
            (Some(a), Some(b)) => squared_distance(first, a.0) <= squared_distance(first, b.0),
            _ => true,
        }
    }
}

/// Mode specific properties of a link segment type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GxModeProperties {
    pub max_speed_kmh: f64,
    pub critical_speed_kmh: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxLinkSegmentType {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: String,
    pub capacity_per_lane_pcuh: Option<f64>,
    pub max_density_per_lane_pcukm: Option<f64>,
    /// Properties keyed by mode id; a mode without entry is banned.
    pub mode_properties: BTreeMap<i64, GxModeProperties>,
}

impl GxLinkSegmentType {
    pub fn new(id: i64, xml_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: name.into(),
            capacity_per_lane_pcuh: None,
            max_density_per_lane_pcukm: None,
            mode_properties: BTreeMap::new(),
        }
    }

    pub fn with_mode(mut self, mode: &GxMode, max_speed_kmh: f64, critical_speed_kmh: f64) -> Self {
        self.mode_properties.insert(
            mode.id,
            GxModeProperties {
                max_speed_kmh,
                critical_speed_kmh,
            },
        );
        self
    }

    pub fn with_capacity_per_lane(mut self, capacity_pcuh: f64) -> Self {
        self.capacity_per_lane_pcuh = Some(capacity_pcuh);
        self
    }

    pub fn is_mode_allowed(&self, mode: &GxMode) -> bool {
        self.mode_properties.contains_key(&mode.id)
    }

    pub fn critical_speed_kmh(&self, mode: &GxMode) -> Option<f64> {
        self.mode_properties.get(&mode.id).map(|p| p.critical_speed_kmh)
    }

    pub fn max_density_per_lane_or_default(&self) -> f64 {
        self.max_density_per_lane_pcukm
            .unwrap_or(DEFAULT_MAX_DENSITY_PER_LANE_PCUKM)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxLinkSegment {
    pub id: i64,
    pub segment_id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub parent: Arc<GxLink>,
    pub direction_ab: bool,
    pub lanes: i32,
    pub physical_speed_kmh: Option<f64>,
    pub capacity_per_lane_pcuh: Option<f64>,
    pub segment_type: Arc<GxLinkSegmentType>,
}

impl GxLinkSegment {
    pub fn new(
        id: i64,
        xml_id: impl Into<String>,
        parent: Arc<GxLink>,
        direction_ab: bool,
        segment_type: Arc<GxLinkSegmentType>,
    ) -> Self {
        Self {
            id,
            segment_id: id,
            xml_id: xml_id.into(),
            external_id: None,
            parent,
            direction_ab,
            lanes: 1,
            physical_speed_kmh: None,
            capacity_per_lane_pcuh: None,
            segment_type,
        }
    }

    pub fn with_lanes(mut self, lanes: i32) -> Self {
        self.lanes = lanes;
        self
    }

    pub fn with_physical_speed(mut self, speed_kmh: f64) -> Self {
        self.physical_speed_kmh = Some(speed_kmh);
        self
    }

    pub fn upstream_node(&self) -> &Arc<GxNode> {
        if self.direction_ab {
            &self.parent.node_a
        } else {
            &self.parent.node_b
        }
    }

    pub fn downstream_node(&self) -> &Arc<GxNode> {
        if self.direction_ab {
            &self.parent.node_b
        } else {
            &self.parent.node_a
        }
    }

    pub fn is_mode_allowed(&self, mode: &GxMode) -> bool {
        self.segment_type.is_mode_allowed(mode)
    }

    /// Lowest of the physical, type and mode speed limits; `None` when banned.
    pub fn modelled_speed_limit_kmh(&self, mode: &GxMode) -> Option<f64> {
        let properties = self.segment_type.mode_properties.get(&mode.id)?;
        let mut limit = properties.max_speed_kmh.min(mode.max_speed_kmh);
        if let Some(physical) = self.physical_speed_kmh {
            limit = limit.min(physical);
        }
        Some(limit)
    }

    /// Capacity across all lanes.
    pub fn capacity_or_default_pcuh(&self) -> f64 {
        let per_lane = self
            .capacity_per_lane_pcuh
            .or(self.segment_type.capacity_per_lane_pcuh)
            .unwrap_or(DEFAULT_CAPACITY_PER_LANE_PCUH);
        per_lane * f64::from(self.lanes)
    }

    pub fn is_parent_geometry_in_segment_direction(&self) -> bool {
        self.parent.geometry_runs_ab() == self.direction_ab
    }

    /// Parent link geometry, or the vertex line in segment direction.
    pub fn geometry(&self) -> Option<LineString<f64>> {
        self.parent
            .geometry
            .clone()
            .or_else(|| self.parent.vertex_line(self.direction_ab))
    }

    /// Geometry oriented from upstream to downstream node.
    pub fn directed_geometry(&self) -> Option<LineString<f64>> {
        let mut geometry = self.geometry()?;
        if self.parent.geometry.is_some() && !self.is_parent_geometry_in_segment_direction() {
            geometry.0.reverse();
        }
        Some(geometry)
    }
}

managed_entity!(GxMode, GxNode, GxLink, GxLinkSegmentType, GxLinkSegment);

/// One physical network layer.
#[derive(Clone, Debug, Default)]
pub struct GxNetworkLayer {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub modes: Vec<Arc<GxMode>>,
    pub nodes: Vec<Arc<GxNode>>,
    pub links: Vec<Arc<GxLink>>,
    pub link_segments: Vec<Arc<GxLinkSegment>>,
}

managed_entity!(GxNetworkLayer);

impl GxNetworkLayer {
    pub fn new(id: i64, xml_id: impl Into<String>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            ..Default::default()
        }
    }

    /// Modes registered on the layer, ordered by id, whether or not any
    /// segment allows them.
    pub fn supported_modes(&self) -> Vec<Arc<GxMode>> {
        let mut modes = self.modes.clone();
        modes.sort_by_key(|mode| mode.id);
        modes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty() && self.link_segments.is_empty()
    }
}

/// Physical network with its source coordinate reference system.
#[derive(Clone, Debug, Default)]
pub struct GxNetwork {
    pub crs: Option<GxCrs>,
    pub layers: Vec<GxNetworkLayer>,
}

impl GxNetwork {
    pub fn new(crs: Option<GxCrs>) -> Self {
        Self {
            crs,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: GxNetworkLayer) -> Self {
        self.layers.push(layer);
        self
    }
}
