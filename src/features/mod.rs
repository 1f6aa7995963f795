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

//! # Feature Context Builders
//!
//! One builder per persisted entity type. Each returns the validated feature
//! context for the active id mappers (and, for link segments, the modes
//! supported on the layer). Geometry attributes yield raw source geometries;
//! the entity writer applies the coordinate transform.
//!
//! ## Module Components
//!
//! - **network**: nodes, links, link segments
//! - **zoning**: od/transfer zones, connectoids, connectoid edges and segments
//! - **service**: service nodes, legs, leg segments
//! - **routed**: routed services

pub mod network;
pub mod routed;
pub mod service;
pub mod zoning;

use crate::context::GxFeatureContextBuilder;
use crate::model::{GxIdMapper, GxManagedEntity};

pub use network::{link_context, link_segment_context, node_context};
pub use routed::routed_service_context;
pub use service::{service_leg_context, service_leg_segment_context, service_node_context};
pub use zoning::{connectoid_context, connectoid_edge_context, connectoid_segment_context, zone_context};

/// Adds `mapped_id` and `id`.
pub(crate) fn mapped_and_id<T>(builder: GxFeatureContextBuilder<T>, mapper: &GxIdMapper<T>) -> GxFeatureContextBuilder<T>
where
    T: GxManagedEntity + 'static,
{
    let mapper = mapper.clone();
    builder
        .string("mapped_id", move |e: &T| mapper(e))
        .long("id", |e: &T| e.id())
}

/// Adds `xml_id` and `ext_id`.
pub(crate) fn xml_and_external<T>(builder: GxFeatureContextBuilder<T>) -> GxFeatureContextBuilder<T>
where
    T: GxManagedEntity + 'static,
{
    builder
        .string("xml_id", |e: &T| e.xml_id().to_string())
        .optional_string("ext_id", |e: &T| e.external_id().map(str::to_string))
}

/// Joins mapped ids with `,`.
pub(crate) fn join_ids<'a, T, I>(items: I, mapper: &GxIdMapper<T>) -> String
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| mapper(item))
        .collect::<Vec<_>>()
        .join(",")
}
