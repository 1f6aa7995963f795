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

//! # Geometry Partition Module
//!
//! Splits an entity collection whose members carry different geometry shapes
//! into geometry-homogeneous buckets, one per output container.
//!
//! Buckets are ordered by geometry type name. Members keep their source order
//! within a bucket. Members without geometry cannot be represented in a
//! geometry column; they are skipped with a warning and reported back.

use std::collections::BTreeMap;

use geo_types::Geometry;

use crate::geometry::GxGeometryType;

/// Geometry-homogeneous subset of a collection.
#[derive(Debug)]
pub struct GxGeometryBucket<'a, T> {
    pub geometry_type: GxGeometryType,
    pub members: Vec<&'a T>,
}

impl<T> GxGeometryBucket<'_, T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of partitioning one collection.
#[derive(Debug)]
pub struct GxPartition<'a, T> {
    pub buckets: Vec<GxGeometryBucket<'a, T>>,
    pub skipped: Vec<&'a T>,
}

impl<'a, T> GxPartition<'a, T> {
    /// Whether more than one shape is present, which decides geometry suffixes on names.
    pub fn is_mixed(&self) -> bool {
        self.buckets.len() > 1
    }

    pub fn bucket(&self, geometry_type: GxGeometryType) -> Option<&GxGeometryBucket<'a, T>> {
        self.buckets.iter().find(|b| b.geometry_type == geometry_type)
    }

    /// Members placed in a bucket.
    pub fn placed(&self) -> usize {
        self.buckets.iter().map(GxGeometryBucket::len).sum()
    }
}

/// Buckets `entities` by the runtime shape `geometry_of` reports.
pub fn partition_by_geometry<'a, T, I, F>(entities: I, geometry_of: F, label: &str) -> GxPartition<'a, T>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<&Geometry<f64>>,
{
    let mut grouped: BTreeMap<GxGeometryType, Vec<&'a T>> = BTreeMap::new();
    let mut skipped = Vec::new();
    for entity in entities {
        match geometry_of(entity) {
            Some(geometry) => grouped
                .entry(GxGeometryType::classify(geometry))
                .or_default()
                .push(entity),
            None => skipped.push(entity),
        }
    }

    if !skipped.is_empty() {
        log::warn!(
            "IGNORE {} {} without geometry, not persisted",
            skipped.len(),
            label
        );
    }

    GxPartition {
        buckets: grouped
            .into_iter()
            .map(|(geometry_type, members)| GxGeometryBucket {
                geometry_type,
                members,
            })
            .collect(),
        skipped,
    }
}
