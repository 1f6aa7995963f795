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

//! # Datastore Registry Module
//!
//! Cache of open datastores for one export run, keyed by entity type and, for
//! entities whose geometry shape varies, by geometry type.
//!
//! Per key the lifecycle is absent, open, disposed. Opening an open key
//! returns the existing store. [`GxDataStoreRegistry::reset`] disposes every
//! store and empties the cache; it also runs when the registry is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::GxEntityType;
use crate::datastore::{GxDataStore, GxDriverRegistry};
use crate::errors::{GxError, Result};
use crate::geometry::GxGeometryType;
use crate::schema::GxCompiledSchema;

/// Identity of a cached datastore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GxDataStoreKey {
    pub entity_type: GxEntityType,
    pub geometry_type: Option<GxGeometryType>,
}

impl GxDataStoreKey {
    /// Key for entities with one fixed geometry shape.
    pub fn entity(entity_type: GxEntityType) -> Self {
        Self {
            entity_type,
            geometry_type: None,
        }
    }

    /// Key for one geometry bucket of a mixed-geometry entity type.
    pub fn with_geometry(entity_type: GxEntityType, geometry_type: GxGeometryType) -> Self {
        Self {
            entity_type,
            geometry_type: Some(geometry_type),
        }
    }
}

impl fmt::Display for GxDataStoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.geometry_type {
            Some(geometry) => write!(f, "{} ({})", self.entity_type, geometry),
            None => write!(f, "{}", self.entity_type),
        }
    }
}

/// Open datastores of one export run.
pub struct GxDataStoreRegistry {
    drivers: GxDriverRegistry,
    stores: BTreeMap<GxDataStoreKey, Box<dyn GxDataStore>>,
}

impl GxDataStoreRegistry {
    pub fn new(drivers: GxDriverRegistry) -> Self {
        Self {
            drivers,
            stores: BTreeMap::new(),
        }
    }

    pub fn drivers(&self) -> &GxDriverRegistry {
        &self.drivers
    }

    /// Returns the store for `key`, creating it at `path` when absent.
    ///
    /// The driver is chosen by the extension of `path`. An existing store is
    /// returned unchanged, whatever `path` says.
    pub fn open(&mut self, key: GxDataStoreKey, path: &Path) -> Result<&mut dyn GxDataStore> {
        if self.stores.contains_key(&key) {
            log::info!(
                "Datastore for {} already exists, reusing it instead of creating one at {}",
                key,
                path.display()
            );
        } else {
            let factory = self.drivers.driver_for_path(path).ok_or_else(|| {
                log::error!("No output driver available for {}", path.display());
                GxError::driver(format!(
                    "no output driver for extension of {} (known: {})",
                    path.display(),
                    self.drivers.extensions().join(", ")
                ))
            })?;
            let store = factory.create(path).map_err(|e| {
                GxError::driver(format!("Unable to create new datastore for {}: {}", key, e))
            })?;
            log::debug!("Created {} datastore for {} at {}", factory.name(), key, path.display());
            self.stores.insert(key, store);
        }
        self.get(key)
    }

    /// The open store for `key`.
    pub fn get(&mut self, key: GxDataStoreKey) -> Result<&mut dyn GxDataStore> {
        match self.stores.get_mut(&key) {
            Some(store) => Ok(store.as_mut()),
            None => Err(GxError::configuration(format!("No datastore open for {}", key))),
        }
    }

    pub fn contains(&self, key: GxDataStoreKey) -> bool {
        self.stores.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn keys(&self) -> Vec<GxDataStoreKey> {
        self.stores.keys().copied().collect()
    }

    /// Registers `schema` on the store for `key`, dropping an existing schema of that name first.
    pub fn register_schema(&mut self, key: GxDataStoreKey, schema: &GxCompiledSchema) -> Result<()> {
        let store = self.get(key)?;
        if store.has_schema(&schema.name) {
            log::info!("Schema {} already present, recreating it", schema.name);
            store.remove_schema(&schema.name)?;
        }
        store.create_schema(schema)
    }

    /// Disposes every open store and clears the cache. Returns the number of stores released.
    pub fn reset(&mut self) -> usize {
        let released = self.stores.len();
        for (key, mut store) in std::mem::take(&mut self.stores) {
            if let Err(e) = store.dispose() {
                log::warn!("Failed to dispose datastore for {}: {}", key, e);
            }
        }
        if released > 0 {
            log::debug!("Released {} datastores", released);
        }
        released
    }
}

impl Drop for GxDataStoreRegistry {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for GxDataStoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GxDataStoreRegistry")
            .field("drivers", &self.drivers)
            .field("keys", &self.keys())
            .finish()
    }
}
