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

//! Run manifest listing every written output with its size, row count and
//! BLAKE3 content hash.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::GxEntityType;
use crate::errors::{GxError, Result};
use crate::geometry::GxGeometryType;

pub const MANIFEST_FILE_NAME: &str = "geox_manifest.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GxManifestFile {
    pub path: String,
    pub schema: String,
    pub entity_type: GxEntityType,
    pub geometry_type: GxGeometryType,
    pub rows: usize,
    pub size: u64,
    pub hash: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GxManifest {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub total_rows: usize,
    pub total_size: u64,
    pub files: Vec<GxManifestFile>,
    pub metadata: BTreeMap<String, String>,
}

impl Default for GxManifest {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            total_rows: 0,
            total_size: 0,
            files: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

impl GxManifest {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GxError::internal(format!("Failed to serialize manifest: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GxError::configuration(format!("Invalid manifest JSON: {}", e)))
    }

    /// Writes the manifest into `directory` and returns its path.
    pub fn write_to(&self, directory: &Path) -> Result<PathBuf> {
        let path = directory.join(MANIFEST_FILE_NAME);
        fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

#[derive(Debug, Default)]
pub struct GxManifestBuilder {
    manifest: GxManifest,
}

impl GxManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.manifest.version = version.to_string();
        self
    }

    pub fn add_file(mut self, file: GxManifestFile) -> Self {
        self.manifest.total_rows += file.rows;
        self.manifest.total_size += file.size;
        self.manifest.files.push(file);
        self
    }

    /// Hashes the file at `path` and adds it.
    pub fn add_output(
        self,
        path: &Path,
        schema: &str,
        entity_type: GxEntityType,
        geometry_type: GxGeometryType,
        rows: usize,
    ) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(self.add_file(GxManifestFile {
            path: path.display().to_string(),
            schema: schema.to_string(),
            entity_type,
            geometry_type,
            rows,
            size: bytes.len() as u64,
            hash: compute_hash(&bytes),
        }))
    }

    pub fn add_metadata(mut self, key: &str, value: &str) -> Self {
        self.manifest.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> GxManifest {
        self.manifest
    }
}

pub fn compute_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
