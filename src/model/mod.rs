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

//! # Domain Model Module
//!
//! A minimal in-memory transport model: physical network layers, zoning with
//! its virtual network, service network layers and routed services. The
//! exporters only read these structures; building and validating them is the
//! caller's concern.
//!
//! ## Module Components
//!
//! - **ids**: Id mapper types and the shared mapper bundle
//! - **network**: Modes, nodes, links, link segments and their types
//! - **zoning**: Zones, connectoids and the virtual network
//! - **service**: Service nodes, legs and leg segments
//! - **routed**: Routed trips and services grouped by mode

macro_rules! managed_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::GxManagedEntity for $ty {
                fn id(&self) -> i64 {
                    self.id
                }

                fn xml_id(&self) -> &str {
                    &self.xml_id
                }

                fn external_id(&self) -> Option<&str> {
                    self.external_id.as_deref()
                }
            }
        )+
    };
}

pub mod ids;
pub mod network;
pub mod routed;
pub mod service;
pub mod zoning;

pub use ids::{GxIdMapper, GxIdMapperType, GxIdMappers};
pub use network::{
    GxLink, GxLinkSegment, GxLinkSegmentType, GxMode, GxModeKind, GxModeProperties, GxNetwork,
    GxNetworkLayer, GxNode,
};
pub use routed::{GxRoutedService, GxRoutedServices, GxRoutedServicesLayer, GxRoutedTrip, GxTripKind};
pub use service::{GxServiceLeg, GxServiceLegSegment, GxServiceNetwork, GxServiceNetworkLayer, GxServiceNode};
pub use zoning::{
    GxAccessZone, GxConnectoid, GxConnectoidAccess, GxConnectoidEdge, GxConnectoidSegment,
    GxVirtualNetwork, GxZone, GxZoneKind, GxZoning,
};

/// Identity shared by every persisted domain entity.
pub trait GxManagedEntity {
    /// Internal numeric id, unique per entity kind.
    fn id(&self) -> i64;
    /// Id as known in the native xml representation.
    fn xml_id(&self) -> &str;
    /// Id in the source the entity was parsed from, if any.
    fn external_id(&self) -> Option<&str>;
}
