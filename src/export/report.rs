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

//! Outcome of one export run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::context::GxEntityType;
use crate::geometry::GxGeometryType;

/// One schema written during the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GxFeatureClassReport {
    pub schema: String,
    /// Physical output, `None` for in-memory drivers.
    pub path: Option<PathBuf>,
    pub entity_type: GxEntityType,
    pub geometry_type: GxGeometryType,
    pub rows: usize,
    /// Rows written with an empty geometry column.
    pub null_geometries: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GxExportReport {
    pub feature_classes: Vec<GxFeatureClassReport>,
    /// Members left out per entity type because they carry no geometry.
    pub skipped: BTreeMap<GxEntityType, usize>,
    pub warnings: Vec<String>,
    pub stores_released: usize,
    pub manifest: Option<PathBuf>,
}

impl GxExportReport {
    pub fn feature_class(&self, schema: &str) -> Option<&GxFeatureClassReport> {
        self.feature_classes.iter().find(|f| f.schema == schema)
    }

    pub fn schemas(&self) -> Vec<&str> {
        self.feature_classes.iter().map(|f| f.schema.as_str()).collect()
    }

    pub fn rows_of(&self, entity_type: GxEntityType) -> usize {
        self.feature_classes
            .iter()
            .filter(|f| f.entity_type == entity_type)
            .map(|f| f.rows)
            .sum()
    }

    pub fn skipped_of(&self, entity_type: GxEntityType) -> usize {
        self.skipped.get(&entity_type).copied().unwrap_or(0)
    }

    pub fn total_rows(&self) -> usize {
        self.feature_classes.iter().map(|f| f.rows).sum()
    }
}
