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

//! Zoning exporter: zones split by geometry shape, connectoids and the
//! virtual network.

use std::sync::Arc;

use crate::config::{GxExportConfig, GxZoningSettings};
use crate::context::GxEntityType;
use crate::errors::Result;
use crate::export::report::GxExportReport;
use crate::export::session::{GxExportSession, GxSessionOptions};
use crate::features::{connectoid_context, connectoid_edge_context, connectoid_segment_context, zone_context};
use crate::model::{GxConnectoid, GxZone, GxZoning};
use crate::naming::GxOutputName;
use crate::partition::partition_by_geometry;
use crate::registry::GxDataStoreKey;

const LOG_PREFIX: &str = "[zoning]";

#[derive(Debug, Clone)]
pub struct GxZoningExporter {
    options: GxSessionOptions,
    settings: GxZoningSettings,
}

impl GxZoningExporter {
    pub fn new(options: GxSessionOptions, settings: GxZoningSettings) -> Self {
        Self { options, settings }
    }

    pub fn from_config(config: &GxExportConfig) -> Self {
        Self::new(GxSessionOptions::new(config.writer.clone()), config.zoning.clone())
    }

    pub fn options_mut(&mut self) -> &mut GxSessionOptions {
        &mut self.options
    }

    pub fn settings(&self) -> &GxZoningSettings {
        &self.settings
    }

    pub fn write(&self, zoning: &GxZoning) -> Result<GxExportReport> {
        let mut session = self.options.open()?;
        self.write_into(&mut session, zoning)?;
        session.finish()
    }

    pub(crate) fn write_into(&self, session: &mut GxExportSession, zoning: &GxZoning) -> Result<()> {
        session.check_source_crs(zoning.crs.as_ref(), "zoning")?;
        self.settings.log_settings(LOG_PREFIX);

        if self.settings.persist_od_zones {
            write_zones(session, &zoning.od_zones, GxEntityType::OdZone, &self.settings.od_zones_file_name)?;
        }
        if self.settings.persist_transfer_zones {
            write_zones(
                session,
                &zoning.transfer_zones,
                GxEntityType::TransferZone,
                &self.settings.transfer_zones_file_name,
            )?;
        }
        if self.settings.persist_od_connectoids {
            write_connectoids(
                session,
                &zoning.od_connectoids,
                GxEntityType::OdConnectoid,
                &self.settings.od_connectoids_file_name,
            )?;
        }
        if self.settings.persist_transfer_connectoids {
            write_connectoids(
                session,
                &zoning.transfer_connectoids,
                GxEntityType::TransferConnectoid,
                &self.settings.transfer_connectoids_file_name,
            )?;
        }
        if self.settings.persist_virtual_network {
            self.write_virtual_network(session, zoning)?;
        }
        Ok(())
    }

    fn write_virtual_network(&self, session: &mut GxExportSession, zoning: &GxZoning) -> Result<()> {
        let virtual_network = &zoning.virtual_network;
        if virtual_network.is_empty() {
            log::info!("{} No virtual network present, connectoid edges and segments skipped", LOG_PREFIX);
            return Ok(());
        }

        let context = connectoid_edge_context(session.ids())?;
        let name = GxOutputName::new(&self.settings.connectoid_edges_file_name)?;
        session.write_feature_class(
            &name,
            GxDataStoreKey::entity(GxEntityType::ConnectoidEdge),
            &context,
            virtual_network.connectoid_edges.iter().map(Arc::as_ref),
            LOG_PREFIX,
        )?;

        let context = connectoid_segment_context(session.ids())?;
        let name = GxOutputName::new(&self.settings.connectoid_segments_file_name)?;
        session.write_feature_class(
            &name,
            GxDataStoreKey::entity(GxEntityType::ConnectoidSegment),
            &context,
            virtual_network.connectoid_segments.iter().map(Arc::as_ref),
            LOG_PREFIX,
        )?;
        Ok(())
    }
}

/// One feature class per geometry shape; names only carry the shape when
/// more than one shape is present.
fn write_zones(session: &mut GxExportSession, zones: &[Arc<GxZone>], entity_type: GxEntityType, base_name: &str) -> Result<()> {
    let label = format!("{}s", entity_type);
    let partition = partition_by_geometry(zones.iter().map(Arc::as_ref), |z: &GxZone| z.geometry.as_ref(), &label);
    session.record_skipped(entity_type, partition.skipped.len(), LOG_PREFIX);
    if partition.buckets.is_empty() {
        log::info!("{} No {} with geometry to persist", LOG_PREFIX, label);
        return Ok(());
    }

    for bucket in &partition.buckets {
        let mut name = GxOutputName::new(base_name)?;
        if partition.is_mixed() {
            name = name.with_geometry(bucket.geometry_type);
        }
        let context = zone_context(session.ids(), entity_type, bucket.geometry_type)?;
        session.write_feature_class(
            &name,
            GxDataStoreKey::with_geometry(entity_type, bucket.geometry_type),
            &context,
            bucket.members.iter().copied(),
            LOG_PREFIX,
        )?;
    }
    Ok(())
}

fn write_connectoids(
    session: &mut GxExportSession,
    connectoids: &[Arc<GxConnectoid>],
    entity_type: GxEntityType,
    base_name: &str,
) -> Result<()> {
    if connectoids.is_empty() {
        log::info!("{} No {}s present", LOG_PREFIX, entity_type);
        return Ok(());
    }
    let context = connectoid_context(session.ids(), entity_type)?;
    let name = GxOutputName::new(base_name)?;
    session.write_feature_class(
        &name,
        GxDataStoreKey::entity(entity_type),
        &context,
        connectoids.iter().map(Arc::as_ref),
        LOG_PREFIX,
    )?;
    Ok(())
}
