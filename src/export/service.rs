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

//! Service network exporter: service nodes, legs and leg segments per layer.

use std::sync::Arc;

use crate::config::{GxExportConfig, GxServiceNetworkSettings};
use crate::context::GxEntityType;
use crate::errors::Result;
use crate::export::report::GxExportReport;
use crate::export::session::{GxExportSession, GxSessionOptions};
use crate::features::{service_leg_context, service_leg_segment_context, service_node_context};
use crate::model::{GxServiceNetwork, GxServiceNetworkLayer};
use crate::registry::GxDataStoreKey;

#[derive(Debug, Clone)]
pub struct GxServiceNetworkExporter {
    options: GxSessionOptions,
    settings: GxServiceNetworkSettings,
}

impl GxServiceNetworkExporter {
    pub fn new(options: GxSessionOptions, settings: GxServiceNetworkSettings) -> Self {
        Self { options, settings }
    }

    pub fn from_config(config: &GxExportConfig) -> Self {
        Self::new(GxSessionOptions::new(config.writer.clone()), config.service_network.clone())
    }

    pub fn options_mut(&mut self) -> &mut GxSessionOptions {
        &mut self.options
    }

    pub fn settings(&self) -> &GxServiceNetworkSettings {
        &self.settings
    }

    pub fn write(&self, service_network: &GxServiceNetwork) -> Result<GxExportReport> {
        let mut session = self.options.open()?;
        self.write_into(&mut session, service_network)?;
        session.finish()
    }

    pub(crate) fn write_into(&self, session: &mut GxExportSession, service_network: &GxServiceNetwork) -> Result<()> {
        session.check_source_crs(service_network.crs.as_ref(), "service network")?;
        self.settings.log_settings("[service network]");

        for layer in &service_network.layers {
            let layer_id = (session.ids().service_layer)(layer);
            let prefix = format!("[layer: {}]", layer_id);
            if layer.is_empty() {
                log::info!("{} Empty service network layer, skipped", prefix);
                continue;
            }
            if let Some(parent) = &layer.parent_layer_xml_id {
                log::debug!("{} Services run on physical layer {}", prefix, parent);
            }
            self.write_layer(session, layer, &layer_id, &prefix)?;
        }
        Ok(())
    }

    fn write_layer(
        &self,
        session: &mut GxExportSession,
        layer: &GxServiceNetworkLayer,
        layer_id: &str,
        prefix: &str,
    ) -> Result<()> {
        if self.settings.persist_service_nodes {
            let context = service_node_context(session.ids())?;
            let name = session.layer_name(layer_id, &self.settings.service_nodes_file_name)?;
            session.write_feature_class(
                &name,
                GxDataStoreKey::entity(GxEntityType::ServiceNode),
                &context,
                layer.service_nodes.iter().map(Arc::as_ref),
                prefix,
            )?;
        }

        if self.settings.persist_service_legs {
            let context = service_leg_context(session.ids())?;
            let name = session.layer_name(layer_id, &self.settings.service_legs_file_name)?;
            session.write_feature_class(
                &name,
                GxDataStoreKey::entity(GxEntityType::ServiceLeg),
                &context,
                layer.legs.iter().map(Arc::as_ref),
                prefix,
            )?;
        }

        if self.settings.persist_service_leg_segments {
            let context = service_leg_segment_context(session.ids())?;
            let name = session.layer_name(layer_id, &self.settings.service_leg_segments_file_name)?;
            session.write_feature_class(
                &name,
                GxDataStoreKey::entity(GxEntityType::ServiceLegSegment),
                &context,
                layer.leg_segments.iter().map(Arc::as_ref),
                prefix,
            )?;
        }
        Ok(())
    }
}
