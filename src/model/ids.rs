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

//! # Id Mapping
//!
//! Every written reference to an entity, its own `mapped_id` included, goes
//! through an id mapper so one export uses one consistent id scheme.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::network::{GxLink, GxLinkSegment, GxLinkSegmentType, GxMode, GxNetworkLayer, GxNode};
use crate::model::routed::{GxRoutedService, GxRoutedServicesLayer, GxRoutedTrip};
use crate::model::service::{GxServiceLeg, GxServiceLegSegment, GxServiceNetworkLayer, GxServiceNode};
use crate::model::zoning::{GxConnectoid, GxConnectoidEdge, GxConnectoidSegment, GxZone};
use crate::model::GxManagedEntity;

/// Which id of an entity is written as its mapped id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GxIdMapperType {
    /// Internal numeric id.
    Id,
    /// Xml id.
    #[default]
    Xml,
    /// External id, falling back to the xml id when absent.
    External,
}

/// Maps an entity to the string id written to the output.
pub type GxIdMapper<T> = Arc<dyn Fn(&T) -> String>;

/// Creates the mapper of the given type for any managed entity.
pub fn id_mapper<T: GxManagedEntity + 'static>(kind: GxIdMapperType) -> GxIdMapper<T> {
    match kind {
        GxIdMapperType::Id => Arc::new(|e: &T| e.id().to_string()),
        GxIdMapperType::Xml => Arc::new(|e: &T| e.xml_id().to_string()),
        GxIdMapperType::External => Arc::new(|e: &T| {
            e.external_id()
                .map(str::to_string)
                .unwrap_or_else(|| e.xml_id().to_string())
        }),
    }
}

/// The full set of id mappers shared by all exporters of one run.
#[derive(Clone)]
pub struct GxIdMappers {
    pub kind: GxIdMapperType,
    pub mode: GxIdMapper<GxMode>,
    pub network_layer: GxIdMapper<GxNetworkLayer>,
    pub node: GxIdMapper<GxNode>,
    pub link: GxIdMapper<GxLink>,
    pub link_segment: GxIdMapper<GxLinkSegment>,
    pub link_segment_type: GxIdMapper<GxLinkSegmentType>,
    pub zone: GxIdMapper<GxZone>,
    pub connectoid: GxIdMapper<GxConnectoid>,
    pub connectoid_edge: GxIdMapper<GxConnectoidEdge>,
    pub connectoid_segment: GxIdMapper<GxConnectoidSegment>,
    pub service_layer: GxIdMapper<GxServiceNetworkLayer>,
    pub service_node: GxIdMapper<GxServiceNode>,
    pub service_leg: GxIdMapper<GxServiceLeg>,
    pub service_leg_segment: GxIdMapper<GxServiceLegSegment>,
    pub routed_layer: GxIdMapper<GxRoutedServicesLayer>,
    pub routed_service: GxIdMapper<GxRoutedService>,
    pub routed_trip: GxIdMapper<GxRoutedTrip>,
}

impl GxIdMappers {
    pub fn new(kind: GxIdMapperType) -> Self {
        Self {
            kind,
            mode: id_mapper(kind),
            network_layer: id_mapper(kind),
            node: id_mapper(kind),
            link: id_mapper(kind),
            link_segment: id_mapper(kind),
            link_segment_type: id_mapper(kind),
            zone: id_mapper(kind),
            connectoid: id_mapper(kind),
            connectoid_edge: id_mapper(kind),
            connectoid_segment: id_mapper(kind),
            service_layer: id_mapper(kind),
            service_node: id_mapper(kind),
            service_leg: id_mapper(kind),
            service_leg_segment: id_mapper(kind),
            routed_layer: id_mapper(kind),
            routed_service: id_mapper(kind),
            routed_trip: id_mapper(kind),
        }
    }

    /// Replaces the node mapper, e.g. to prefix ids.
    pub fn with_node_mapper(mut self, mapper: GxIdMapper<GxNode>) -> Self {
        self.node = mapper;
        self
    }

    /// Replaces the mode mapper.
    pub fn with_mode_mapper(mut self, mapper: GxIdMapper<GxMode>) -> Self {
        self.mode = mapper;
        self
    }
}

impl Default for GxIdMappers {
    fn default() -> Self {
        Self::new(GxIdMapperType::default())
    }
}

impl fmt::Debug for GxIdMappers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GxIdMappers").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_mapper_falls_back_to_xml() {
        let with_ext = GxNode::new(1, "n1").with_external_id("osm:42");
        let without_ext = GxNode::new(2, "n2");
        let mapper = id_mapper::<GxNode>(GxIdMapperType::External);
        assert_eq!(mapper(&with_ext), "osm:42");
        assert_eq!(mapper(&without_ext), "n2");
        assert_eq!(id_mapper::<GxNode>(GxIdMapperType::Id)(&with_ext), "1");
    }

    #[test]
    fn mapper_type_parses_from_snake_case() {
        let kind: GxIdMapperType = serde_json::from_str("\"external\"").expect("parse");
        assert_eq!(kind, GxIdMapperType::External);
    }
}
