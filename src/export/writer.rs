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

//! # Entity Writer Module
//!
//! Streams one row per entity into a registered schema. The geometry
//! attribute goes through the configured coordinate transform; every other
//! attribute is written as extracted. A failing row aborts the whole entity
//! type with an error naming the layer log prefix and the entity type. Rows
//! already written are not rolled back.

use geo_types::Geometry;
use serde::{Deserialize, Serialize};

use crate::attribute::{GxAttributeDescriptor, GxAttributeValue};
use crate::context::GxFeatureContext;
use crate::datastore::{GxDataStore, GxFeatureRow};
use crate::errors::{GxError, Result};
use crate::geometry::{normalize, GxGeometryTransformer, GxGeometryType};
use crate::schema::GxCompiledSchema;

/// Statistics about one entity write pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GxWriteStats {
    /// Total number of rows written.
    pub rows_written: usize,
    /// Rows whose geometry column is empty.
    pub null_geometries: usize,
}

/// Writes entity collections into datastore schemas.
pub struct GxEntityWriter<'t> {
    transformer: Option<&'t dyn GxGeometryTransformer>,
    log_prefix: String,
}

impl<'t> GxEntityWriter<'t> {
    /// Creates a writer without coordinate transform.
    pub fn new(log_prefix: impl Into<String>) -> Self {
        Self {
            transformer: None,
            log_prefix: log_prefix.into(),
        }
    }

    /// Applies `transformer` to every geometry before it is written.
    pub fn with_transformer(mut self, transformer: Option<&'t dyn GxGeometryTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn log_prefix(&self) -> &str {
        &self.log_prefix
    }

    /// Writes `entities` into the schema named by `schema`.
    ///
    /// The context must be the one the schema was compiled from; a mismatch in
    /// fields or geometry type is a configuration error.
    pub fn write<'e, T: 'e, I>(
        &self,
        store: &mut dyn GxDataStore,
        schema: &GxCompiledSchema,
        context: &GxFeatureContext<T>,
        entities: I,
    ) -> Result<GxWriteStats>
    where
        I: IntoIterator<Item = &'e T>,
    {
        self.check_context(schema, context)?;

        let entity = context.entity_type();
        let mut feature_writer = store.feature_writer(&schema.name)?;
        let mut stats = GxWriteStats::default();

        for instance in entities {
            let row = self
                .build_row(context, instance, &mut stats)
                .map_err(|e| GxError::write(self.log_prefix.as_str(), entity.name(), e.to_string()))?;
            feature_writer
                .append(row)
                .map_err(|e| GxError::write(self.log_prefix.as_str(), entity.name(), e.to_string()))?;
            stats.rows_written += 1;
        }

        feature_writer
            .close()
            .map_err(|e| GxError::write(self.log_prefix.as_str(), entity.name(), e.to_string()))?;

        log::info!(
            "{} Persisted {} {} feature(s) to {}",
            self.log_prefix,
            stats.rows_written,
            entity,
            schema.name
        );
        if stats.null_geometries > 0 {
            log::warn!(
                "{} {} {} feature(s) without geometry in {}",
                self.log_prefix,
                stats.null_geometries,
                entity,
                schema.name
            );
        }
        Ok(stats)
    }

    fn check_context<T>(&self, schema: &GxCompiledSchema, context: &GxFeatureContext<T>) -> Result<()> {
        let entity = context.entity_type();
        if schema.geometry_type != context.geometry_type() {
            return Err(GxError::configuration(format!(
                "{} schema {} holds {} geometries, {} context declares {}",
                self.log_prefix,
                schema.name,
                schema.geometry_type,
                entity,
                context.geometry_type()
            )));
        }
        let fields = schema.fields()?;
        let declared: Vec<&str> = context.attributes().iter().map(GxAttributeDescriptor::name).collect();
        let compiled: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        if declared != compiled {
            return Err(GxError::configuration(format!(
                "{} {} context does not match schema {}",
                self.log_prefix, entity, schema.name
            )));
        }
        Ok(())
    }

    fn build_row<T>(&self, context: &GxFeatureContext<T>, instance: &T, stats: &mut GxWriteStats) -> Result<GxFeatureRow> {
        let geometry_name = context.geometry_attribute_name();
        let mut values = Vec::with_capacity(context.len());
        for attribute in context.attributes() {
            let raw = attribute.extract(instance);
            let value = if attribute.name() == geometry_name {
                match raw {
                    GxAttributeValue::Geometry(geometry) => {
                        GxAttributeValue::Geometry(self.transform(&geometry)?)
                    }
                    GxAttributeValue::Null => {
                        stats.null_geometries += 1;
                        GxAttributeValue::Null
                    }
                    other => {
                        return Err(GxError::configuration(format!(
                            "geometry attribute {} produced a non-geometry value {:?}",
                            attribute.name(),
                            other
                        )))
                    }
                }
            } else {
                raw
            };
            if !value.fits(attribute.declared_type()) {
                let found = value
                    .as_geometry()
                    .map(|g| GxGeometryType::classify(g).to_string())
                    .unwrap_or_else(|| format!("{:?}", value));
                return Err(GxError::configuration(format!(
                    "attribute {} declared {} but produced {}",
                    attribute.name(),
                    attribute.declared_type(),
                    found
                )));
            }
            values.push(value);
        }
        Ok(GxFeatureRow::new(values))
    }

    fn transform(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        let transformed = match self.transformer {
            Some(transformer) => transformer.transform(geometry)?,
            None => geometry.clone(),
        };
        Ok(normalize(transformed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GxEntityType;
    use crate::datastore::{GxDataStoreFactory, GxMemoryDriver};
    use crate::geometry::{GxCoordTransform, GxCrs};
    use crate::schema::compile;
    use geo_types::{coord, Coord, Point};
    use std::path::Path;

    struct Stop {
        name: &'static str,
        at: Option<(f64, f64)>,
    }

    fn context() -> GxFeatureContext<Stop> {
        GxFeatureContext::builder(GxEntityType::ServiceNode)
            .string("name", |s: &Stop| s.name.to_string())
            .geometry(GxGeometryType::Point, |s: &Stop| {
                s.at.map(|(x, y)| Geometry::Point(Point::new(x, y)))
            })
            .build()
            .expect("context")
    }

    #[test]
    fn writes_rows_through_transform() {
        let driver = GxMemoryDriver::new();
        let mut store = driver.create(Path::new("stops.mem")).expect("store");
        let context = context();
        let schema = compile(&context, Some(&GxCrs::epsg(3857)), "stops").schema;
        store.create_schema(&schema).expect("schema");

        let shift = GxCoordTransform::new(|c: Coord<f64>| Ok(coord! { x: c.x * 2.0, y: c.y }));
        let writer = GxEntityWriter::new("[layer: 0]").with_transformer(Some(&shift as &dyn GxGeometryTransformer));
        let stops = vec![
            Stop { name: "a", at: Some((1.0, 1.0)) },
            Stop { name: "b", at: None },
        ];
        let stats = writer
            .write(store.as_mut(), &schema, &context, &stops)
            .expect("write");
        assert_eq!(stats.rows_written, 2);
        assert_eq!(stats.null_geometries, 1);

        let rows = driver.rows_of("stops");
        assert_eq!(
            rows[0].values[1],
            GxAttributeValue::Geometry(Geometry::Point(Point::new(2.0, 1.0)))
        );
    }

    #[test]
    fn transform_failure_names_prefix_and_entity() {
        let driver = GxMemoryDriver::new();
        let mut store = driver.create(Path::new("stops.mem")).expect("store");
        let context = context();
        let schema = compile(&context, None, "stops").schema;
        store.create_schema(&schema).expect("schema");

        let failing = GxCoordTransform::new(|_c: Coord<f64>| Err(GxError::transform("outside area of use")));
        let writer = GxEntityWriter::new("[layer: 3]").with_transformer(Some(&failing as &dyn GxGeometryTransformer));
        let stops = vec![Stop { name: "a", at: Some((1.0, 1.0)) }];
        match writer.write(store.as_mut(), &schema, &context, &stops) {
            Err(GxError::Write { context, entity, message }) => {
                assert_eq!(context, "[layer: 3]");
                assert_eq!(entity, "service node");
                assert!(message.contains("outside area of use"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mismatched_schema_is_configuration_error() {
        let driver = GxMemoryDriver::new();
        let mut store = driver.create(Path::new("stops.mem")).expect("store");
        let context = context();
        let schema = GxCompiledSchema {
            name: "stops".into(),
            field_spec: "id:Long,*geom:Point".into(),
            geometry_type: GxGeometryType::Point,
        };
        store.create_schema(&schema).expect("schema");
        let writer = GxEntityWriter::new("[layer: 0]");
        let stops: Vec<Stop> = Vec::new();
        assert!(matches!(
            writer.write(store.as_mut(), &schema, &context, &stops),
            Err(GxError::Configuration { .. })
        ));
    }
}
