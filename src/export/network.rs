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

//! Physical network exporter: nodes, links and link segments per layer.

use std::sync::Arc;

use crate::config::{GxExportConfig, GxNetworkSettings};
use crate::context::GxEntityType;
use crate::errors::Result;
use crate::export::report::GxExportReport;
use crate::export::session::{GxExportSession, GxSessionOptions};
use crate::features::{link_context, link_segment_context, node_context};
use crate::model::{GxNetwork, GxNetworkLayer};
use crate::registry::GxDataStoreKey;

#[derive(Debug, Clone)]
pub struct GxNetworkExporter {
    options: GxSessionOptions,
    settings: GxNetworkSettings,
}

impl GxNetworkExporter {
    pub fn new(options: GxSessionOptions, settings: GxNetworkSettings) -> Self {
        Self { options, settings }
    }

    pub fn from_config(config: &GxExportConfig) -> Self {
        Self::new(GxSessionOptions::new(config.writer.clone()), config.network.clone())
    }

    pub fn options(&self) -> &GxSessionOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut GxSessionOptions {
        &mut self.options
    }

    pub fn settings(&self) -> &GxNetworkSettings {
        &self.settings
    }

    pub fn write(&self, network: &GxNetwork) -> Result<GxExportReport> {
        let mut session = self.options.open()?;
        self.write_into(&mut session, network)?;
        session.finish()
    }

    pub(crate) fn write_into(&self, session: &mut GxExportSession, network: &GxNetwork) -> Result<()> {
        session.check_source_crs(network.crs.as_ref(), "network")?;
        self.settings.log_settings("[network]");

        for layer in &network.layers {
            let layer_id = (session.ids().network_layer)(layer);
            let prefix = format!("[layer: {}]", layer_id);
            if layer.is_empty() {
                log::info!("{} Empty network layer, skipped", prefix);
                continue;
            }
            self.write_layer(session, layer, &layer_id, &prefix)?;
        }
        Ok(())
    }

    fn write_layer(&self, session: &mut GxExportSession, layer: &GxNetworkLayer, layer_id: &str, prefix: &str) -> Result<()> {
        if self.settings.persist_nodes {
            let context = node_context(session.ids())?;
            let name = session.layer_name(layer_id, &self.settings.nodes_file_name)?;
            session.write_feature_class(
                &name,
                GxDataStoreKey::entity(GxEntityType::Node),
                &context,
                layer.nodes.iter().map(Arc::as_ref),
                prefix,
            )?;
        }

        if self.settings.persist_links {
            let context = link_context(session.ids())?;
            let name = session.layer_name(layer_id, &self.settings.links_file_name)?;
            session.write_feature_class(
                &name,
                GxDataStoreKey::entity(GxEntityType::Link),
                &context,
                layer.links.iter().map(Arc::as_ref),
                prefix,
            )?;
        }

        if self.settings.persist_link_segments {
            let modes = layer.supported_modes();
            log::debug!("{} {} supported mode(s) on link segments", prefix, modes.len());
            let context = link_segment_context(session.ids(), &modes)?;
            let name = session.layer_name(layer_id, &self.settings.link_segments_file_name)?;
            session.write_feature_class(
                &name,
                GxDataStoreKey::entity(GxEntityType::LinkSegment),
                &context,
                layer.link_segments.iter().map(Arc::as_ref),
                prefix,
            )?;
        }
        Ok(())
    }
}
