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

//! Routed services exporter. Every layer is split by mode into
//! `<layer>_mode_<mode id>_<base>` feature classes; modes without services
//! produce no output.

use crate::config::{GxExportConfig, GxRoutedServicesSettings};
use crate::context::GxEntityType;
use crate::errors::Result;
use crate::export::report::GxExportReport;
use crate::export::session::{GxExportSession, GxSessionOptions};
use crate::features::routed_service_context;
use crate::model::GxRoutedServices;
use crate::registry::GxDataStoreKey;

#[derive(Debug, Clone)]
pub struct GxRoutedServicesExporter {
    options: GxSessionOptions,
    settings: GxRoutedServicesSettings,
}

impl GxRoutedServicesExporter {
    pub fn new(options: GxSessionOptions, settings: GxRoutedServicesSettings) -> Self {
        Self { options, settings }
    }

    pub fn from_config(config: &GxExportConfig) -> Self {
        Self::new(GxSessionOptions::new(config.writer.clone()), config.routed_services.clone())
    }

    pub fn options_mut(&mut self) -> &mut GxSessionOptions {
        &mut self.options
    }

    pub fn settings(&self) -> &GxRoutedServicesSettings {
        &self.settings
    }

    pub fn write(&self, routed_services: &GxRoutedServices) -> Result<GxExportReport> {
        let mut session = self.options.open()?;
        self.write_into(&mut session, routed_services)?;
        session.finish()
    }

    pub(crate) fn write_into(&self, session: &mut GxExportSession, routed_services: &GxRoutedServices) -> Result<()> {
        session.check_source_crs(routed_services.crs.as_ref(), "routed services")?;
        self.settings.log_settings("[routed services]");
        if !self.settings.persist_services {
            return Ok(());
        }

        let context = routed_service_context(session.ids())?;
        for layer in &routed_services.layers {
            let layer_id = (session.ids().routed_layer)(layer);
            let prefix = format!("[layer: {}]", layer_id);
            let groups = layer.services_by_mode();
            if groups.is_empty() {
                log::info!("{} No routed services, skipped", prefix);
                continue;
            }

            for (mode, services) in groups {
                if services.is_empty() {
                    continue;
                }
                let mode_id = (session.ids().mode)(mode.as_ref());
                let name = session
                    .layer_name(&layer_id, &self.settings.services_file_name)?
                    .with_mode(&mode_id)?;
                let stats = session.write_feature_class(
                    &name,
                    GxDataStoreKey::entity(GxEntityType::RoutedService),
                    &context,
                    services.iter().copied(),
                    &prefix,
                )?;
                if stats.null_geometries > 0 {
                    log::debug!("{} {} service(s) of mode {} have no trip geometry", prefix, stats.null_geometries, mode_id);
                }
            }
        }
        Ok(())
    }
}
