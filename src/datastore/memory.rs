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

//! # In-Memory Datastore
//!
//! Keeps schemas and rows in memory. The driver remembers every store it
//! created and hands out their shared state, so callers can inspect what an
//! export produced without touching the filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::datastore::{check_row_width, ensure_open, GxDataStore, GxDataStoreFactory, GxFeatureRow, GxFeatureWriter};
use crate::errors::{GxError, Result};
use crate::schema::GxCompiledSchema;

/// Observable state of one in-memory store.
#[derive(Clone, Debug, Default)]
pub struct GxMemoryStoreState {
    pub path: PathBuf,
    pub schemas: BTreeMap<String, GxCompiledSchema>,
    pub rows: BTreeMap<String, Vec<GxFeatureRow>>,
    /// Number of times a schema was dropped and recreated.
    pub recreated: usize,
    pub disposed: bool,
}

impl GxMemoryStoreState {
    pub fn rows_of(&self, schema_name: &str) -> &[GxFeatureRow] {
        self.rows.get(schema_name).map(Vec::as_slice).unwrap_or(&[])
    }
}

type SharedState = Arc<Mutex<GxMemoryStoreState>>;

fn lock(state: &SharedState) -> Result<MutexGuard<'_, GxMemoryStoreState>> {
    state
        .lock()
        .map_err(|_| GxError::internal("memory datastore lock poisoned"))
}

/// Driver creating [`GxMemoryStore`]s.
#[derive(Clone, Debug, Default)]
pub struct GxMemoryDriver {
    created: Arc<Mutex<Vec<SharedState>>>,
}

impl GxMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots of every store created so far, in creation order.
    pub fn stores(&self) -> Vec<GxMemoryStoreState> {
        let created = match self.created.lock() {
            Ok(created) => created,
            Err(_) => return Vec::new(),
        };
        created
            .iter()
            .filter_map(|state| state.lock().ok().map(|s| s.clone()))
            .collect()
    }

    /// Snapshot of the store holding `schema_name`.
    pub fn store_with_schema(&self, schema_name: &str) -> Option<GxMemoryStoreState> {
        self.stores()
            .into_iter()
            .find(|state| state.schemas.contains_key(schema_name))
    }

    /// Rows written to `schema_name` in any store.
    pub fn rows_of(&self, schema_name: &str) -> Vec<GxFeatureRow> {
        self.store_with_schema(schema_name)
            .map(|state| state.rows_of(schema_name).to_vec())
            .unwrap_or_default()
    }
}

impl GxDataStoreFactory for GxMemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn create(&self, path: &Path) -> Result<Box<dyn GxDataStore>> {
        let state: SharedState = Arc::new(Mutex::new(GxMemoryStoreState {
            path: path.to_path_buf(),
            ..Default::default()
        }));
        self.created
            .lock()
            .map_err(|_| GxError::internal("memory driver lock poisoned"))?
            .push(state.clone());
        Ok(Box::new(GxMemoryStore {
            path: path.to_path_buf(),
            state,
        }))
    }
}

/// Store keeping rows in shared memory.
#[derive(Debug)]
pub struct GxMemoryStore {
    path: PathBuf,
    state: SharedState,
}

impl GxDataStore for GxMemoryStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn create_schema(&mut self, schema: &GxCompiledSchema) -> Result<()> {
        let mut state = lock(&self.state)?;
        ensure_open(state.disposed, &self.path)?;
        if state.schemas.contains_key(&schema.name) {
            return Err(GxError::schema(format!("schema {} already exists", schema.name)));
        }
        schema.fields()?;
        state.schemas.insert(schema.name.clone(), schema.clone());
        state.rows.insert(schema.name.clone(), Vec::new());
        Ok(())
    }

    fn has_schema(&self, name: &str) -> bool {
        lock(&self.state)
            .map(|state| state.schemas.contains_key(name))
            .unwrap_or(false)
    }

    fn remove_schema(&mut self, name: &str) -> Result<()> {
        let mut state = lock(&self.state)?;
        ensure_open(state.disposed, &self.path)?;
        if state.schemas.remove(name).is_some() {
            state.rows.remove(name);
            state.recreated += 1;
        }
        Ok(())
    }

    fn schema_names(&self) -> Vec<String> {
        lock(&self.state)
            .map(|state| state.schemas.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn output_path(&self, _schema_name: &str) -> Option<PathBuf> {
        None
    }

    fn feature_writer<'a>(&'a mut self, schema_name: &str) -> Result<Box<dyn GxFeatureWriter + 'a>> {
        let state = lock(&self.state)?;
        ensure_open(state.disposed, &self.path)?;
        let schema = state
            .schemas
            .get(schema_name)
            .ok_or_else(|| GxError::schema_not_found(schema_name, self.path.display().to_string()))?;
        let width = schema.fields()?.len();
        Ok(Box::new(GxMemoryFeatureWriter {
            state: self.state.clone(),
            schema: schema_name.to_string(),
            width,
            pending: Vec::new(),
        }))
    }

    fn dispose(&mut self) -> Result<()> {
        lock(&self.state)?.disposed = true;
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        lock(&self.state).map(|state| state.disposed).unwrap_or(true)
    }
}

struct GxMemoryFeatureWriter {
    state: SharedState,
    schema: String,
    width: usize,
    pending: Vec<GxFeatureRow>,
}

impl GxFeatureWriter for GxMemoryFeatureWriter {
    fn append(&mut self, row: GxFeatureRow) -> Result<()> {
        check_row_width(&row, self.width, &self.schema)?;
        self.pending.push(row);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<usize> {
        let GxMemoryFeatureWriter {
            state,
            schema,
            pending,
            ..
        } = *self;
        let count = pending.len();
        lock(&state)?.rows.entry(schema).or_default().extend(pending);
        Ok(count)
    }
}
