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

//! # CSV Datastore
//!
//! One CSV file per schema, `<directory>/<schema>.csv`, with a header of
//! physical column names. Geometries are written as WKT in the last column.
//! Registering a schema creates the file with its header, so an empty entity
//! collection still yields a file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::datastore::{
    check_row_width, ensure_open, store_directory, store_extension, GxDataStore, GxDataStoreFactory, GxFeatureRow,
    GxFeatureWriter,
};
use crate::errors::{GxError, Result};
use crate::schema::GxCompiledSchema;

/// Driver for `.csv` outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct GxCsvDriver;

impl GxDataStoreFactory for GxCsvDriver {
    fn name(&self) -> &str {
        "csv"
    }

    fn create(&self, path: &Path) -> Result<Box<dyn GxDataStore>> {
        let directory = store_directory(path);
        fs::create_dir_all(&directory)?;
        Ok(Box::new(GxCsvStore {
            path: path.to_path_buf(),
            directory,
            extension: store_extension(path, "csv"),
            schemas: BTreeMap::new(),
            disposed: false,
        }))
    }
}

/// Directory of CSV files, one per schema.
#[derive(Debug)]
pub struct GxCsvStore {
    path: PathBuf,
    directory: PathBuf,
    extension: String,
    schemas: BTreeMap<String, Vec<String>>,
    disposed: bool,
}

impl GxCsvStore {
    fn file_of(&self, schema_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", schema_name, self.extension))
    }
}

impl GxDataStore for GxCsvStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn create_schema(&mut self, schema: &GxCompiledSchema) -> Result<()> {
        ensure_open(self.disposed, &self.path)?;
        if self.schemas.contains_key(&schema.name) {
            return Err(GxError::schema(format!("schema {} already exists", schema.name)));
        }
        let columns: Vec<String> = schema
            .fields()?
            .iter()
            .map(|field| field.column_name().to_string())
            .collect();

        let file = File::create(self.file_of(&schema.name))?;
        let mut csv_writer = ::csv::Writer::from_writer(BufWriter::new(file));
        csv_writer.write_record(&columns)?;
        csv_writer
            .flush()
            .map_err(|e| GxError::driver(format!("CSV flush error: {}", e)))?;

        self.schemas.insert(schema.name.clone(), columns);
        Ok(())
    }

    fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    fn remove_schema(&mut self, name: &str) -> Result<()> {
        ensure_open(self.disposed, &self.path)?;
        if self.schemas.remove(name).is_some() {
            let file = self.file_of(name);
            if file.exists() {
                fs::remove_file(file)?;
            }
        }
        Ok(())
    }

    fn schema_names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    fn output_path(&self, schema_name: &str) -> Option<PathBuf> {
        self.schemas
            .contains_key(schema_name)
            .then(|| self.file_of(schema_name))
    }

    fn feature_writer<'a>(&'a mut self, schema_name: &str) -> Result<Box<dyn GxFeatureWriter + 'a>> {
        ensure_open(self.disposed, &self.path)?;
        let width = self
            .schemas
            .get(schema_name)
            .map(Vec::len)
            .ok_or_else(|| GxError::schema_not_found(schema_name, self.path.display().to_string()))?;
        let file = OpenOptions::new()
            .append(true)
            .open(self.file_of(schema_name))?;
        let writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        Ok(Box::new(GxCsvFeatureWriter {
            writer,
            schema: schema_name.to_string(),
            width,
            count: 0,
        }))
    }

    fn dispose(&mut self) -> Result<()> {
        self.disposed = true;
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

struct GxCsvFeatureWriter {
    writer: ::csv::Writer<BufWriter<File>>,
    schema: String,
    width: usize,
    count: usize,
}

impl GxFeatureWriter for GxCsvFeatureWriter {
    fn append(&mut self, row: GxFeatureRow) -> Result<()> {
        check_row_width(&row, self.width, &self.schema)?;
        let record: Vec<String> = row.values.iter().map(|value| value.to_text()).collect();
        self.writer.write_record(&record)?;
        self.count += 1;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|e| GxError::driver(format!("CSV flush error: {}", e)))?;
        Ok(self.count)
    }
}
