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

//! # Export Session
//!
//! One session per top-level export call. It owns the datastore registry and
//! runs the shared per feature class flow: output name, store, compiled
//! schema, schema registration, entity writer. Dropping a session releases
//! every store it opened, so an early return through `?` still disposes the
//! open outputs; `finish` releases them explicitly and returns the report.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::GxWriterSettings;
use crate::context::{GxEntityType, GxFeatureContext};
use crate::datastore::GxDriverRegistry;
use crate::errors::{GxError, Result};
use crate::export::manifest::GxManifestBuilder;
use crate::export::report::{GxExportReport, GxFeatureClassReport};
use crate::export::writer::{GxEntityWriter, GxWriteStats};
use crate::geometry::{GxCrs, GxGeometryTransformer};
use crate::model::GxIdMappers;
use crate::naming::GxOutputName;
use crate::registry::{GxDataStoreKey, GxDataStoreRegistry};
use crate::schema;

/// Everything needed to open a session; shared by all exporters.
#[derive(Clone)]
pub struct GxSessionOptions {
    pub writer: GxWriterSettings,
    pub drivers: GxDriverRegistry,
    /// Defaults to mappers of `writer.id_mapper`.
    pub ids: Option<GxIdMappers>,
    pub transformer: Option<Arc<dyn GxGeometryTransformer>>,
}

impl GxSessionOptions {
    pub fn new(writer: GxWriterSettings) -> Self {
        Self {
            writer,
            drivers: GxDriverRegistry::with_defaults(),
            ids: None,
            transformer: None,
        }
    }

    pub fn with_drivers(mut self, drivers: GxDriverRegistry) -> Self {
        self.drivers = drivers;
        self
    }

    pub fn with_id_mappers(mut self, ids: GxIdMappers) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Transform from the source into the destination CRS.
    pub fn with_transformer(mut self, transformer: Arc<dyn GxGeometryTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn open(&self) -> Result<GxExportSession> {
        GxExportSession::new(self.clone())
    }
}

impl std::fmt::Debug for GxSessionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GxSessionOptions")
            .field("writer", &self.writer)
            .field("drivers", &self.drivers)
            .field("ids", &self.ids)
            .field("transformer", &self.transformer.is_some())
            .finish()
    }
}

pub struct GxExportSession {
    settings: GxWriterSettings,
    ids: GxIdMappers,
    transformer: Option<Arc<dyn GxGeometryTransformer>>,
    registry: GxDataStoreRegistry,
    report: GxExportReport,
    /// Schema names registered in this session and the entity type behind each.
    registered: HashMap<String, GxEntityType>,
}

impl GxExportSession {
    pub fn new(options: GxSessionOptions) -> Result<Self> {
        options.writer.validate()?;
        options.writer.log_settings("[writer]");
        fs::create_dir_all(&options.writer.output_directory)?;
        let ids = options
            .ids
            .unwrap_or_else(|| GxIdMappers::new(options.writer.id_mapper));
        Ok(Self {
            settings: options.writer,
            ids,
            transformer: options.transformer,
            registry: GxDataStoreRegistry::new(options.drivers),
            report: GxExportReport::default(),
            registered: HashMap::new(),
        })
    }

    pub fn settings(&self) -> &GxWriterSettings {
        &self.settings
    }

    pub fn ids(&self) -> &GxIdMappers {
        &self.ids
    }

    pub fn registry(&self) -> &GxDataStoreRegistry {
        &self.registry
    }

    pub fn report(&self) -> &GxExportReport {
        &self.report
    }

    pub fn destination_crs(&self) -> Option<&GxCrs> {
        self.settings.destination_crs.as_ref()
    }

    /// Checks that geometries in `source` can be written in the destination CRS.
    ///
    /// A destination without a source is a configuration error, as is a
    /// destination that differs from the source while no transformer is set.
    pub fn check_source_crs(&self, source: Option<&GxCrs>, what: &str) -> Result<()> {
        let destination = match self.destination_crs() {
            Some(destination) => destination,
            None => return Ok(()),
        };
        let source = source.ok_or_else(|| {
            GxError::configuration(format!(
                "{} has no coordinate reference system, cannot write it in {}",
                what, destination
            ))
        })?;
        let same = source == destination
            || matches!(
                (source.identifier_code(), destination.identifier_code()),
                (Some(a), Some(b)) if a == b
            );
        if !same && self.transformer.is_none() {
            return Err(GxError::configuration(format!(
                "no geometry transform from {} to {} for {}",
                source, destination, what
            )));
        }
        Ok(())
    }

    /// `<layer prefix>_<layer id>_<base>` name.
    pub fn layer_name(&self, layer_id: &str, base_name: &str) -> Result<GxOutputName> {
        GxOutputName::for_layer(&self.settings.layer_prefix, layer_id, base_name)
    }

    /// Writes one feature class.
    ///
    /// Name, path and schema are derived once from `name`, so the schema the
    /// store registers and the one the row writer asks for are the same. A
    /// schema name already written earlier in this session is a naming error;
    /// stores only drop and recreate schemas left by a previous run.
    pub fn write_feature_class<'e, T: 'e, I>(
        &mut self,
        name: &GxOutputName,
        key: GxDataStoreKey,
        context: &GxFeatureContext<T>,
        entities: I,
        log_prefix: &str,
    ) -> Result<GxWriteStats>
    where
        I: IntoIterator<Item = &'e T>,
    {
        let entity = context.entity_type();
        let schema_name = name.schema_name();
        let path = name.file_path(&self.settings.output_directory, &self.settings.file_extension);
        let wrap = |e: GxError| GxError::write(log_prefix, entity.name(), e.to_string());

        if let Some(previous) = self.registered.get(&schema_name) {
            return Err(GxError::naming(format!(
                "{} output '{}' clashes with the {} output of the same name",
                entity, schema_name, previous
            )));
        }
        self.registered.insert(schema_name.clone(), entity);

        self.registry.open(key, &path).map_err(wrap)?;

        let compilation = schema::compile(context, self.settings.destination_crs.as_ref(), schema_name.as_str());
        if let Some(warning) = &compilation.warning {
            log::warn!("{} {}", log_prefix, warning);
            let message = match self.destination_crs() {
                Some(crs) => format!("destination CRS {} has no identifier, outputs carry no srid", crs),
                None => "no destination CRS, outputs carry no srid".to_string(),
            };
            if !self.report.warnings.contains(&message) {
                self.report.warnings.push(message);
            }
        }
        self.registry.register_schema(key, &compilation.schema).map_err(wrap)?;

        let writer = GxEntityWriter::new(log_prefix).with_transformer(self.transformer.as_deref());
        let store = self.registry.get(key)?;
        let stats = writer.write(store, &compilation.schema, context, entities)?;
        let output = store.output_path(&schema_name);

        self.report.feature_classes.push(GxFeatureClassReport {
            schema: schema_name,
            path: output,
            entity_type: entity,
            geometry_type: context.geometry_type(),
            rows: stats.rows_written,
            null_geometries: stats.null_geometries,
        });
        Ok(stats)
    }

    /// Records members left out for lack of geometry.
    pub fn record_skipped(&mut self, entity_type: GxEntityType, count: usize, log_prefix: &str) {
        if count == 0 {
            return;
        }
        *self.report.skipped.entry(entity_type).or_insert(0) += count;
        self.warn(format!("{} {} {}(s) without geometry not persisted", log_prefix, count, entity_type));
    }

    pub fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.report.warnings.push(message);
    }

    /// Releases every store, writes the manifest when enabled and returns the report.
    pub fn finish(mut self) -> Result<GxExportReport> {
        self.report.stores_released = self.registry.reset();
        if self.settings.write_manifest {
            let path = self.write_manifest()?;
            self.report.manifest = Some(path);
        }
        log::info!(
            "Export finished: {} feature class(es), {} row(s)",
            self.report.feature_classes.len(),
            self.report.total_rows()
        );
        Ok(std::mem::take(&mut self.report))
    }

    fn write_manifest(&self) -> Result<std::path::PathBuf> {
        let mut builder = GxManifestBuilder::new();
        if let Some(crs) = self.destination_crs() {
            builder = builder.add_metadata("destination_crs", &crs.to_string());
        }
        builder = builder.add_metadata("id_mapper", &format!("{:?}", self.settings.id_mapper));
        for class in &self.report.feature_classes {
            if let Some(path) = class.path.as_deref().filter(|p| Path::exists(p)) {
                builder = builder.add_output(path, &class.schema, class.entity_type, class.geometry_type, class.rows)?;
            }
        }
        let path = builder.build().write_to(&self.settings.output_directory)?;
        log::info!("Manifest written to {}", path.display());
        Ok(path)
    }
}

impl std::fmt::Debug for GxExportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GxExportSession")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("feature_classes", &self.report.feature_classes.len())
            .finish()
    }
}
