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

//! # Datastore Module
//!
//! The seam between the exporter and concrete output formats. A datastore is
//! a container of named schemas; every schema maps to one physical output
//! named after the schema. Drivers are looked up by file extension.
//!
//! ## Module Components
//!
//! - **GxDataStore** / **GxFeatureWriter**: store and row writer traits
//! - **GxDataStoreFactory**: creates stores for one extension
//! - **GxDriverRegistry**: extension to factory lookup
//! - **csv** ([csv.rs](csv/index.html)): CSV with a WKT geometry column
//! - **geojson** ([geojson.rs](geojson/index.html)): GeoJSON FeatureCollections
//! - **memory** ([memory.rs](memory/index.html)): in-memory store for tests and dry runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geox::datastore::GxDriverRegistry;
//!
//! let drivers = GxDriverRegistry::with_defaults();
//! let factory = drivers.driver_for_path(&path).expect("driver");
//! let mut store = factory.create(&path)?;
//! store.create_schema(&schema)?;
//! let mut writer = store.feature_writer(&schema.name)?;
//! ```

#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod memory;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::attribute::GxAttributeValue;
use crate::errors::{GxError, Result};
use crate::naming::normalize_extension;
use crate::schema::GxCompiledSchema;

#[cfg(feature = "csv")]
pub use self::csv::GxCsvDriver;
#[cfg(feature = "geojson")]
pub use self::geojson::GxGeoJsonDriver;
pub use self::memory::{GxMemoryDriver, GxMemoryStoreState};

/// One feature: values in schema field order, geometry last.
#[derive(Clone, Debug, PartialEq)]
pub struct GxFeatureRow {
    pub values: Vec<GxAttributeValue>,
}

impl GxFeatureRow {
    pub fn new(values: Vec<GxAttributeValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Appends rows to one schema of a store.
pub trait GxFeatureWriter {
    fn append(&mut self, row: GxFeatureRow) -> Result<()>;

    /// Flushes pending rows and returns the number of rows appended.
    fn close(self: Box<Self>) -> Result<usize>;
}

/// An open output container.
pub trait GxDataStore {
    /// Path the store was opened at.
    fn path(&self) -> &Path;

    /// Registers a new schema. Fails if the name is taken.
    fn create_schema(&mut self, schema: &GxCompiledSchema) -> Result<()>;

    fn has_schema(&self, name: &str) -> bool;

    /// Drops a schema and its output.
    fn remove_schema(&mut self, name: &str) -> Result<()>;

    fn schema_names(&self) -> Vec<String>;

    /// Physical output of a registered schema, if the driver writes files.
    fn output_path(&self, schema_name: &str) -> Option<PathBuf>;

    /// Row writer scoped to a registered schema.
    fn feature_writer<'a>(&'a mut self, schema_name: &str) -> Result<Box<dyn GxFeatureWriter + 'a>>;

    /// Releases the store. Idempotent.
    fn dispose(&mut self) -> Result<()>;

    fn is_disposed(&self) -> bool;
}

impl fmt::Debug for dyn GxDataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GxDataStore")
            .field("path", &self.path())
            .field("schemas", &self.schema_names())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Creates stores for one output format.
pub trait GxDataStoreFactory {
    /// Display name of the driver.
    fn name(&self) -> &str;

    fn create(&self, path: &Path) -> Result<Box<dyn GxDataStore>>;
}

/// Output drivers keyed by lower-cased file extension.
#[derive(Clone, Default)]
pub struct GxDriverRegistry {
    factories: BTreeMap<String, Arc<dyn GxDataStoreFactory>>,
}

impl GxDriverRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every driver compiled into the crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "csv")]
        registry.register("csv", Arc::new(GxCsvDriver));
        #[cfg(feature = "geojson")]
        {
            registry.register("geojson", Arc::new(GxGeoJsonDriver));
            registry.register("json", Arc::new(GxGeoJsonDriver));
        }
        registry.register("mem", Arc::new(GxMemoryDriver::new()));
        registry
    }

    /// Registers or replaces the driver for an extension.
    pub fn register(&mut self, extension: &str, factory: Arc<dyn GxDataStoreFactory>) -> &mut Self {
        self.factories.insert(normalize_extension(extension), factory);
        self
    }

    pub fn driver_for(&self, extension: &str) -> Option<Arc<dyn GxDataStoreFactory>> {
        self.factories.get(&normalize_extension(extension)).cloned()
    }

    pub fn driver_for_path(&self, path: &Path) -> Option<Arc<dyn GxDataStoreFactory>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.driver_for(ext))
    }

    pub fn extensions(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

impl fmt::Debug for GxDriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GxDriverRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

/// Directory holding the outputs of a store opened at `path`.
pub(crate) fn store_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Extension of `path` or `fallback`.
pub(crate) fn store_extension(path: &Path, fallback: &str) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
        .unwrap_or_else(|| fallback.to_string())
}

pub(crate) fn ensure_open(disposed: bool, path: &Path) -> Result<()> {
    if disposed {
        return Err(GxError::driver(format!("datastore {} is disposed", path.display())));
    }
    Ok(())
}

/// Checks a row against the field count of its schema.
pub(crate) fn check_row_width(row: &GxFeatureRow, expected: usize, schema: &str) -> Result<()> {
    if row.len() != expected {
        return Err(GxError::schema(format!(
            "row with {} values does not match {} fields of schema {}",
            row.len(),
            expected,
            schema
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drivers_resolve_by_extension_case_insensitively() {
        let drivers = GxDriverRegistry::with_defaults();
        assert!(drivers.driver_for(".MEM").is_some());
        assert!(drivers.driver_for_path(Path::new("out/nodes.mem")).is_some());
        assert!(drivers.driver_for("shp").is_none());
        assert!(drivers.driver_for_path(Path::new("out/nodes")).is_none());
    }

    #[test]
    fn store_directory_defaults_to_current() {
        assert_eq!(store_directory(Path::new("nodes.csv")), PathBuf::from("."));
        assert_eq!(store_directory(Path::new("/tmp/x/nodes.csv")), PathBuf::from("/tmp/x"));
    }
}
