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

//! # Output Naming Module
//!
//! Composes schema and file names from a layer prefix, an optional sub-key, a
//! base file name and an optional geometry suffix, joined by `_` in that order:
//!
//! ```text
//! layer_0_mode_bus_planit_service
//! planit_zones_od_polygon
//! ```
//!
//! The same [`GxOutputName`] value is used to create the store, register the
//! schema and open the row writer, so the three cannot disagree.
//!
//! Parts are not escaped. Layer and mode ids may contain `_` themselves, so
//! layer `a` with mode `b_mode_c` and layer `a_mode_b` with mode `c` both give
//! `layer_a_mode_b_mode_c_<base>`. An export session refuses the second
//! schema of a name it already wrote instead of overwriting it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{GxError, Result};
use crate::geometry::GxGeometryType;

pub const NAME_SEPARATOR: &str = "_";

/// Deterministic name of one output container.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GxOutputName {
    layer_prefix: Option<String>,
    sub_key: Option<String>,
    base_name: String,
    geometry: Option<GxGeometryType>,
}

fn checked(part: &str, what: &str) -> Result<String> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Err(GxError::naming(format!("{} is blank", what)));
    }
    if trimmed.contains(|c: char| c == '/' || c == '\\') {
        return Err(GxError::naming(format!("{} '{}' contains a path separator", what, trimmed)));
    }
    Ok(trimmed.to_string())
}

impl GxOutputName {
    /// Name made of a base file name only.
    pub fn new(base_name: &str) -> Result<Self> {
        Ok(Self {
            layer_prefix: None,
            sub_key: None,
            base_name: checked(base_name, "base file name")?,
            geometry: None,
        })
    }

    /// Layer scoped name, prefixed `<prefix>_<layer id>`.
    pub fn for_layer(prefix: &str, layer_id: &str, base_name: &str) -> Result<Self> {
        let prefix = checked(prefix, "layer prefix")?;
        let layer_id = checked(layer_id, "layer id")?;
        Ok(Self {
            layer_prefix: Some(format!("{}{}{}", prefix, NAME_SEPARATOR, layer_id)),
            ..Self::new(base_name)?
        })
    }

    pub fn with_sub_key(mut self, sub_key: &str) -> Result<Self> {
        self.sub_key = Some(checked(sub_key, "sub key")?);
        Ok(self)
    }

    /// Mode partitioned name, sub-key `mode_<mode id>`.
    pub fn with_mode(self, mode_id: &str) -> Result<Self> {
        let mode_id = checked(mode_id, "mode id")?;
        self.with_sub_key(&format!("mode{}{}", NAME_SEPARATOR, mode_id))
    }

    /// Adds the lower-cased geometry type as suffix.
    pub fn with_geometry(mut self, geometry: GxGeometryType) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn layer_prefix(&self) -> Option<&str> {
        self.layer_prefix.as_deref()
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Schema name, identical to the file stem.
    pub fn schema_name(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        parts.extend(self.layer_prefix.iter().cloned());
        parts.extend(self.sub_key.iter().cloned());
        parts.push(self.base_name.clone());
        parts.extend(self.geometry.map(|g| g.suffix()));
        parts.join(NAME_SEPARATOR)
    }

    /// File path in `directory` with `extension`, leading dot optional.
    pub fn file_path(&self, directory: &Path, extension: &str) -> PathBuf {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            directory.join(self.schema_name())
        } else {
            directory.join(format!("{}.{}", self.schema_name(), extension))
        }
    }
}

impl fmt::Display for GxOutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.schema_name())
    }
}

/// Lower-cased extension without a leading dot.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
