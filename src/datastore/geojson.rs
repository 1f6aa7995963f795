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

//! # GeoJSON Datastore
//!
//! One FeatureCollection per schema, `<directory>/<schema>.geojson`. When the
//! schema carries an SRID, the collection gets a named `crs` member
//! (`urn:ogc:def:crs:EPSG::<srid>`). Features are buffered per schema and the
//! file is rewritten when a row writer closes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use geo_types::{Coord, Geometry, LineString, Polygon};
use serde_json::{json, Map, Value};

use crate::attribute::GxAttributeValue;
use crate::datastore::{
    check_row_width, ensure_open, store_directory, store_extension, GxDataStore, GxDataStoreFactory, GxFeatureRow,
    GxFeatureWriter,
};
use crate::errors::{GxError, Result};
use crate::schema::{GxCompiledSchema, GxSchemaField};

/// Driver for `.geojson` and `.json` outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct GxGeoJsonDriver;

impl GxDataStoreFactory for GxGeoJsonDriver {
    fn name(&self) -> &str {
        "geojson"
    }

    fn create(&self, path: &Path) -> Result<Box<dyn GxDataStore>> {
        let directory = store_directory(path);
        fs::create_dir_all(&directory)?;
        Ok(Box::new(GxGeoJsonStore {
            path: path.to_path_buf(),
            directory,
            extension: store_extension(path, "geojson"),
            collections: BTreeMap::new(),
            disposed: false,
        }))
    }
}

#[derive(Debug)]
struct GxCollection {
    fields: Vec<GxSchemaField>,
    srid: Option<String>,
    features: Vec<Value>,
}

/// Directory of GeoJSON files, one per schema.
#[derive(Debug)]
pub struct GxGeoJsonStore {
    path: PathBuf,
    directory: PathBuf,
    extension: String,
    collections: BTreeMap<String, GxCollection>,
    disposed: bool,
}

impl GxGeoJsonStore {
    fn file_of(&self, schema_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", schema_name, self.extension))
    }
}

fn write_collection(path: &Path, name: &str, collection: &GxCollection) -> Result<()> {
    let mut document = Map::new();
    document.insert("type".to_string(), json!("FeatureCollection"));
    document.insert("name".to_string(), json!(name));
    if let Some(srid) = &collection.srid {
        document.insert(
            "crs".to_string(),
            json!({
                "type": "name",
                "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", srid) }
            }),
        );
    }
    document.insert("features".to_string(), Value::Array(collection.features.clone()));
    fs::write(path, serde_json::to_string_pretty(&Value::Object(document))?)?;
    Ok(())
}

fn position(c: &Coord<f64>) -> Value {
    json!([c.x, c.y])
}

fn positions(line: &LineString<f64>) -> Value {
    Value::Array(line.0.iter().map(position).collect())
}

fn rings(polygon: &Polygon<f64>) -> Value {
    let mut all = vec![positions(polygon.exterior())];
    all.extend(polygon.interiors().iter().map(positions));
    Value::Array(all)
}

/// GeoJSON geometry object.
pub fn geometry_to_geojson(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position(&p.0) }),
        Geometry::Line(l) => json!({
            "type": "LineString",
            "coordinates": [position(&l.start), position(&l.end)]
        }),
        Geometry::LineString(l) => json!({ "type": "LineString", "coordinates": positions(l) }),
        Geometry::Polygon(p) => json!({ "type": "Polygon", "coordinates": rings(p) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| position(&p.0)).collect::<Vec<_>>()
        }),
        Geometry::MultiLineString(ml) => json!({
            "type": "MultiLineString",
            "coordinates": ml.0.iter().map(positions).collect::<Vec<_>>()
        }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(rings).collect::<Vec<_>>()
        }),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(geometry_to_geojson).collect::<Vec<_>>()
        }),
        Geometry::Rect(r) => geometry_to_geojson(&Geometry::Polygon(r.to_polygon())),
        Geometry::Triangle(t) => geometry_to_geojson(&Geometry::Polygon(t.to_polygon())),
    }
}

impl GxDataStore for GxGeoJsonStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn create_schema(&mut self, schema: &GxCompiledSchema) -> Result<()> {
        ensure_open(self.disposed, &self.path)?;
        if self.collections.contains_key(&schema.name) {
            return Err(GxError::schema(format!("schema {} already exists", schema.name)));
        }
        let fields = schema.fields()?;
        let collection = GxCollection {
            srid: fields.iter().find_map(|f| f.srid.clone()),
            fields,
            features: Vec::new(),
        };
        write_collection(&self.file_of(&schema.name), &schema.name, &collection)?;
        self.collections.insert(schema.name.clone(), collection);
        Ok(())
    }

    fn has_schema(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    fn remove_schema(&mut self, name: &str) -> Result<()> {
        ensure_open(self.disposed, &self.path)?;
        if self.collections.remove(name).is_some() {
            let file = self.file_of(name);
            if file.exists() {
                fs::remove_file(file)?;
            }
        }
        Ok(())
    }

    fn schema_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    fn output_path(&self, schema_name: &str) -> Option<PathBuf> {
        self.collections
            .contains_key(schema_name)
            .then(|| self.file_of(schema_name))
    }

    fn feature_writer<'a>(&'a mut self, schema_name: &str) -> Result<Box<dyn GxFeatureWriter + 'a>> {
        ensure_open(self.disposed, &self.path)?;
        let path = self.file_of(schema_name);
        let store_path = self.path.display().to_string();
        let collection = self
            .collections
            .get_mut(schema_name)
            .ok_or_else(|| GxError::schema_not_found(schema_name, store_path))?;
        Ok(Box::new(GxGeoJsonFeatureWriter {
            collection,
            name: schema_name.to_string(),
            path,
            pending: Vec::new(),
        }))
    }

    fn dispose(&mut self) -> Result<()> {
        self.disposed = true;
        self.collections.clear();
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

struct GxGeoJsonFeatureWriter<'a> {
    collection: &'a mut GxCollection,
    name: String,
    path: PathBuf,
    pending: Vec<Value>,
}

impl GxFeatureWriter for GxGeoJsonFeatureWriter<'_> {
    fn append(&mut self, row: GxFeatureRow) -> Result<()> {
        check_row_width(&row, self.collection.fields.len(), &self.name)?;
        let mut properties = Map::new();
        let mut geometry = Value::Null;
        for (field, value) in self.collection.fields.iter().zip(row.values.iter()) {
            match value {
                GxAttributeValue::Geometry(g) => geometry = geometry_to_geojson(g),
                other if field.field_type.is_geometry() => {
                    if !other.is_null() {
                        return Err(GxError::schema(format!(
                            "field {} of {} expects a geometry",
                            field.column_name(),
                            self.name
                        )));
                    }
                }
                other => {
                    properties.insert(field.column_name().to_string(), other.to_json());
                }
            }
        }
        self.pending.push(json!({
            "type": "Feature",
            "properties": Value::Object(properties),
            "geometry": geometry,
        }));
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<usize> {
        let GxGeoJsonFeatureWriter {
            collection,
            name,
            path,
            pending,
        } = *self;
        let count = pending.len();
        collection.features.extend(pending);
        write_collection(&path, &name, collection)?;
        Ok(count)
    }
}
