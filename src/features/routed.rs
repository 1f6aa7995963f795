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

//! Feature context of routed services.

use geo_types::Geometry;

use crate::context::{GxEntityType, GxFeatureContext};
use crate::errors::Result;
use crate::features::{join_ids, mapped_and_id, xml_and_external};
use crate::geometry::GxGeometryType;
use crate::model::{GxIdMappers, GxRoutedService, GxTripKind};

/// Services are written as the multi-line of their trips; `trips_schd` and
/// `trips_freq` list the mapped trip ids per trip kind.
pub fn routed_service_context(ids: &GxIdMappers) -> Result<GxFeatureContext<GxRoutedService>> {
    let scheduled = ids.routed_trip.clone();
    let frequency = ids.routed_trip.clone();
    let builder = mapped_and_id(GxFeatureContext::builder(GxEntityType::RoutedService), &ids.routed_service);
    xml_and_external(builder)
        .optional_string("name", |s: &GxRoutedService| s.name.clone())
        .optional_string("name_descr", |s: &GxRoutedService| s.name_description.clone())
        .optional_string("serv_descr", |s: &GxRoutedService| s.service_description.clone())
        .string("trips_schd", move |s: &GxRoutedService| {
            join_ids(s.trips_of(GxTripKind::Schedule).map(|t| t.as_ref()), &scheduled)
        })
        .string("trips_freq", move |s: &GxRoutedService| {
            join_ids(s.trips_of(GxTripKind::Frequency).map(|t| t.as_ref()), &frequency)
        })
        .geometry(GxGeometryType::MultiLineString, |s: &GxRoutedService| {
            s.geometry().map(Geometry::MultiLineString)
        })
        .build()
}
