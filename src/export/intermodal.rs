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

//! Intermodal exporter: network and zoning, optionally followed by the
//! service network and its routed services, all in one session so they share
//! id mapping, output directory and datastores.

use crate::config::GxExportConfig;
use crate::errors::Result;
use crate::export::network::GxNetworkExporter;
use crate::export::report::GxExportReport;
use crate::export::routed::GxRoutedServicesExporter;
use crate::export::service::GxServiceNetworkExporter;
use crate::export::session::GxSessionOptions;
use crate::export::zoning::GxZoningExporter;
use crate::model::{GxNetwork, GxRoutedServices, GxServiceNetwork, GxZoning};

#[derive(Debug, Clone)]
pub struct GxIntermodalExporter {
    options: GxSessionOptions,
    config: GxExportConfig,
}

impl GxIntermodalExporter {
    pub fn new(options: GxSessionOptions, config: GxExportConfig) -> Self {
        Self { options, config }
    }

    pub fn from_config(config: GxExportConfig) -> Self {
        Self::new(GxSessionOptions::new(config.writer.clone()), config)
    }

    pub fn options_mut(&mut self) -> &mut GxSessionOptions {
        &mut self.options
    }

    pub fn config(&self) -> &GxExportConfig {
        &self.config
    }

    /// Network and zoning only.
    pub fn write(&self, network: &GxNetwork, zoning: &GxZoning) -> Result<GxExportReport> {
        self.write_all(network, zoning, None)
    }

    pub fn write_with_services(
        &self,
        network: &GxNetwork,
        zoning: &GxZoning,
        service_network: &GxServiceNetwork,
        routed_services: &GxRoutedServices,
    ) -> Result<GxExportReport> {
        self.write_all(network, zoning, Some((service_network, routed_services)))
    }

    fn write_all(
        &self,
        network: &GxNetwork,
        zoning: &GxZoning,
        services: Option<(&GxServiceNetwork, &GxRoutedServices)>,
    ) -> Result<GxExportReport> {
        let mut session = self.options.open()?;

        GxNetworkExporter::new(self.options.clone(), self.config.network.clone()).write_into(&mut session, network)?;
        GxZoningExporter::new(self.options.clone(), self.config.zoning.clone()).write_into(&mut session, zoning)?;

        match services {
            Some((service_network, routed_services)) => {
                GxServiceNetworkExporter::new(self.options.clone(), self.config.service_network.clone())
                    .write_into(&mut session, service_network)?;
                GxRoutedServicesExporter::new(self.options.clone(), self.config.routed_services.clone())
                    .write_into(&mut session, routed_services)?;
            }
            None => log::info!("[intermodal] No service network provided, services not persisted"),
        }

        session.finish()
    }
}
