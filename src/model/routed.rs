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

//! # Routed Services Model
//!
//! Routed services group trips over service leg segments. Each layer holds
//! the services of one service network layer, grouped by mode.

use std::sync::Arc;

use geo_types::{LineString, MultiLineString};
use serde::{Deserialize, Serialize};

use crate::geometry::GxCrs;
use crate::model::network::GxMode;
use crate::model::service::{concatenate, GxServiceLegSegment};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GxTripKind {
    /// Explicit departures.
    Schedule,
    /// Departures derived from a frequency.
    Frequency,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxRoutedTrip {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub kind: GxTripKind,
    pub leg_segments: Vec<Arc<GxServiceLegSegment>>,
}

impl GxRoutedTrip {
    pub fn new(id: i64, xml_id: impl Into<String>, kind: GxTripKind) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            kind,
            leg_segments: Vec::new(),
        }
    }

    pub fn with_leg_segment(mut self, segment: Arc<GxServiceLegSegment>) -> Self {
        self.leg_segments.push(segment);
        self
    }

    /// Concatenated geometry of the traversed leg segments.
    pub fn geometry(&self) -> Option<LineString<f64>> {
        let parts = self
            .leg_segments
            .iter()
            .map(|segment| segment.geometry())
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(concatenate(&parts))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GxRoutedService {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub name_description: Option<String>,
    pub service_description: Option<String>,
    pub mode: Arc<GxMode>,
    pub trips: Vec<Arc<GxRoutedTrip>>,
}

impl GxRoutedService {
    pub fn new(id: i64, xml_id: impl Into<String>, mode: Arc<GxMode>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            external_id: None,
            name: None,
            name_description: None,
            service_description: None,
            mode,
            trips: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_trip(mut self, trip: Arc<GxRoutedTrip>) -> Self {
        self.trips.push(trip);
        self
    }

    pub fn trips_of(&self, kind: GxTripKind) -> impl Iterator<Item = &Arc<GxRoutedTrip>> {
        self.trips.iter().filter(move |trip| trip.kind == kind)
    }

    /// One line per trip that has a geometry; `None` when no trip has one.
    pub fn geometry(&self) -> Option<MultiLineString<f64>> {
        let lines: Vec<LineString<f64>> = self.trips.iter().filter_map(|trip| trip.geometry()).collect();
        if lines.is_empty() {
            None
        } else {
            Some(MultiLineString::new(lines))
        }
    }
}

managed_entity!(GxRoutedTrip, GxRoutedService);

#[derive(Clone, Debug, Default)]
pub struct GxRoutedServicesLayer {
    pub id: i64,
    pub xml_id: String,
    pub external_id: Option<String>,
    pub services: Vec<Arc<GxRoutedService>>,
}

managed_entity!(GxRoutedServicesLayer);

impl GxRoutedServicesLayer {
    pub fn new(id: i64, xml_id: impl Into<String>) -> Self {
        Self {
            id,
            xml_id: xml_id.into(),
            ..Default::default()
        }
    }

    pub fn with_service(mut self, service: Arc<GxRoutedService>) -> Self {
        self.services.push(service);
        self
    }

    /// Services grouped by mode, modes ordered by id, services in layer order.
    pub fn services_by_mode(&self) -> Vec<(Arc<GxMode>, Vec<&GxRoutedService>)> {
        let mut groups: Vec<(Arc<GxMode>, Vec<&GxRoutedService>)> = Vec::new();
        for service in &self.services {
            match groups.iter().position(|(mode, _)| mode.id == service.mode.id) {
                Some(index) => groups[index].1.push(service.as_ref()),
                None => groups.push((service.mode.clone(), vec![service.as_ref()])),
            }
        }
        groups.sort_by_key(|(mode, _)| mode.id);
        groups
    }
}

#[derive(Clone, Debug, Default)]
pub struct GxRoutedServices {
    /// Coordinate system of the underlying service network.
    pub crs: Option<GxCrs>,
    pub layers: Vec<GxRoutedServicesLayer>,
}

impl GxRoutedServices {
    pub fn new(crs: Option<GxCrs>) -> Self {
        Self {
            crs,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: GxRoutedServicesLayer) -> Self {
        self.layers.push(layer);
        self
    }
}
