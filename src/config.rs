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

//! # Export Configuration
//!
//! Settings for the writer as a whole and for each exporter. Every struct has
//! sensible defaults, builder-style setters and loads from JSON or YAML, so a
//! partial document only overrides what it names.
//!
//! ## Module Components
//!
//! - **GxWriterSettings**: output directory, file extension, destination CRS,
//!   id mapper type, layer prefix, manifest flag
//! - **GxNetworkSettings / GxZoningSettings / GxServiceNetworkSettings /
//!   GxRoutedServicesSettings**: file names and persist flags per entity type
//! - **GxExportConfig**: all of the above in one document
//!
//! ## Usage
//!
//! ```rust
//! use geox::config::GxExportConfig;
//!
//! let config = GxExportConfig::from_yaml_str("writer:\n  output_directory: out\n  file_extension: .geojson\n").unwrap();
//! assert_eq!(config.writer.file_extension, ".geojson");
//! assert_eq!(config.network.nodes_file_name, "planit_nodes");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{GxError, Result};
use crate::geometry::GxCrs;
use crate::model::GxIdMapperType;
use crate::naming::normalize_extension;

pub const DEFAULT_FILE_EXTENSION: &str = ".csv";
pub const DEFAULT_LAYER_PREFIX: &str = "layer";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxWriterSettings {
    pub output_directory: PathBuf,
    /// Selects the output driver, leading dot optional.
    pub file_extension: String,
    /// `None` keeps source coordinates.
    pub destination_crs: Option<GxCrs>,
    pub id_mapper: GxIdMapperType,
    pub layer_prefix: String,
    pub write_manifest: bool,
}

impl Default for GxWriterSettings {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            destination_crs: None,
            id_mapper: GxIdMapperType::default(),
            layer_prefix: DEFAULT_LAYER_PREFIX.to_string(),
            write_manifest: false,
        }
    }
}

impl GxWriterSettings {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
            ..Default::default()
        }
    }

    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_directory = directory.into();
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_destination_crs(mut self, crs: GxCrs) -> Self {
        self.destination_crs = Some(crs);
        self
    }

    pub fn with_id_mapper(mut self, id_mapper: GxIdMapperType) -> Self {
        self.id_mapper = id_mapper;
        self
    }

    pub fn with_layer_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.layer_prefix = prefix.into();
        self
    }

    pub fn with_manifest(mut self, enabled: bool) -> Self {
        self.write_manifest = enabled;
        self
    }

    /// Extension without leading dot, lower-cased.
    pub fn extension(&self) -> String {
        normalize_extension(&self.file_extension)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_directory.as_os_str().is_empty() {
            return Err(GxError::configuration("output directory is not set"));
        }
        if self.extension().is_empty() {
            return Err(GxError::configuration("file extension is not set"));
        }
        if self.layer_prefix.trim().is_empty() {
            return Err(GxError::configuration("layer prefix is blank"));
        }
        Ok(())
    }

    pub fn log_settings(&self, prefix: &str) {
        log::info!("{} Output directory: {}", prefix, self.output_directory.display());
        log::info!("{} File extension: {}", prefix, self.file_extension);
        match &self.destination_crs {
            Some(crs) => log::info!("{} Destination CRS: {}", prefix, crs),
            None => log::info!("{} Destination CRS: source", prefix),
        }
        log::info!("{} Id mapping: {:?}", prefix, self.id_mapper);
        log::info!("{} Layer prefix: {}", prefix, self.layer_prefix);
        log::info!("{} Manifest: {}", prefix, self.write_manifest);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxNetworkSettings {
    pub nodes_file_name: String,
    pub links_file_name: String,
    pub link_segments_file_name: String,
    pub persist_nodes: bool,
    pub persist_links: bool,
    pub persist_link_segments: bool,
}

impl Default for GxNetworkSettings {
    fn default() -> Self {
        Self {
            nodes_file_name: "planit_nodes".to_string(),
            links_file_name: "planit_links".to_string(),
            link_segments_file_name: "planit_link_segments".to_string(),
            persist_nodes: true,
            persist_links: true,
            persist_link_segments: true,
        }
    }
}

impl GxNetworkSettings {
    pub fn with_nodes_file_name(mut self, name: impl Into<String>) -> Self {
        self.nodes_file_name = name.into();
        self
    }

    pub fn with_links_file_name(mut self, name: impl Into<String>) -> Self {
        self.links_file_name = name.into();
        self
    }

    pub fn with_link_segments_file_name(mut self, name: impl Into<String>) -> Self {
        self.link_segments_file_name = name.into();
        self
    }

    pub fn with_persist_nodes(mut self, persist: bool) -> Self {
        self.persist_nodes = persist;
        self
    }

    pub fn with_persist_links(mut self, persist: bool) -> Self {
        self.persist_links = persist;
        self
    }

    pub fn with_persist_link_segments(mut self, persist: bool) -> Self {
        self.persist_link_segments = persist;
        self
    }

    pub fn log_settings(&self, prefix: &str) {
        log_entity(prefix, "Nodes", &self.nodes_file_name, self.persist_nodes);
        log_entity(prefix, "Links", &self.links_file_name, self.persist_links);
        log_entity(prefix, "Link segments", &self.link_segments_file_name, self.persist_link_segments);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxZoningSettings {
    pub od_zones_file_name: String,
    pub transfer_zones_file_name: String,
    pub od_connectoids_file_name: String,
    pub transfer_connectoids_file_name: String,
    pub connectoid_edges_file_name: String,
    pub connectoid_segments_file_name: String,
    pub persist_od_zones: bool,
    pub persist_transfer_zones: bool,
    pub persist_od_connectoids: bool,
    pub persist_transfer_connectoids: bool,
    /// Connectoid edges and segments.
    pub persist_virtual_network: bool,
}

impl Default for GxZoningSettings {
    fn default() -> Self {
        Self {
            od_zones_file_name: "planit_zones_od".to_string(),
            transfer_zones_file_name: "planit_zones_transfer".to_string(),
            od_connectoids_file_name: "planit_connectoids_od".to_string(),
            transfer_connectoids_file_name: "planit_connectoids_transfer".to_string(),
            connectoid_edges_file_name: "planit_connectoid_edges".to_string(),
            connectoid_segments_file_name: "planit_connectoid_segments".to_string(),
            persist_od_zones: true,
            persist_transfer_zones: true,
            persist_od_connectoids: true,
            persist_transfer_connectoids: true,
            persist_virtual_network: true,
        }
    }
}

impl GxZoningSettings {
    pub fn with_od_zones_file_name(mut self, name: impl Into<String>) -> Self {
        self.od_zones_file_name = name.into();
        self
    }

    pub fn with_transfer_zones_file_name(mut self, name: impl Into<String>) -> Self {
        self.transfer_zones_file_name = name.into();
        self
    }

    pub fn with_persist_od_zones(mut self, persist: bool) -> Self {
        self.persist_od_zones = persist;
        self
    }

    pub fn with_persist_transfer_zones(mut self, persist: bool) -> Self {
        self.persist_transfer_zones = persist;
        self
    }

    pub fn with_persist_od_connectoids(mut self, persist: bool) -> Self {
        self.persist_od_connectoids = persist;
        self
    }

    pub fn with_persist_transfer_connectoids(mut self, persist: bool) -> Self {
        self.persist_transfer_connectoids = persist;
        self
    }

    pub fn with_persist_virtual_network(mut self, persist: bool) -> Self {
        self.persist_virtual_network = persist;
        self
    }

    pub fn log_settings(&self, prefix: &str) {
        log_entity(prefix, "OD zones", &self.od_zones_file_name, self.persist_od_zones);
        log_entity(prefix, "Transfer zones", &self.transfer_zones_file_name, self.persist_transfer_zones);
        log_entity(prefix, "OD connectoids", &self.od_connectoids_file_name, self.persist_od_connectoids);
        log_entity(
            prefix,
            "Transfer connectoids",
            &self.transfer_connectoids_file_name,
            self.persist_transfer_connectoids,
        );
        log_entity(
            prefix,
            "Connectoid edges",
            &self.connectoid_edges_file_name,
            self.persist_virtual_network,
        );
        log_entity(
            prefix,
            "Connectoid segments",
            &self.connectoid_segments_file_name,
            self.persist_virtual_network,
        );
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxServiceNetworkSettings {
    pub service_nodes_file_name: String,
    pub service_legs_file_name: String,
    pub service_leg_segments_file_name: String,
    pub persist_service_nodes: bool,
    pub persist_service_legs: bool,
    pub persist_service_leg_segments: bool,
}

impl Default for GxServiceNetworkSettings {
    fn default() -> Self {
        Self {
            service_nodes_file_name: "planit_service_nodes".to_string(),
            service_legs_file_name: "planit_service_legs".to_string(),
            service_leg_segments_file_name: "planit_service_leg_segments".to_string(),
            persist_service_nodes: true,
            persist_service_legs: true,
            persist_service_leg_segments: true,
        }
    }
}

impl GxServiceNetworkSettings {
    pub fn with_service_nodes_file_name(mut self, name: impl Into<String>) -> Self {
        self.service_nodes_file_name = name.into();
        self
    }

    pub fn with_persist_service_nodes(mut self, persist: bool) -> Self {
        self.persist_service_nodes = persist;
        self
    }

    pub fn with_persist_service_legs(mut self, persist: bool) -> Self {
        self.persist_service_legs = persist;
        self
    }

    pub fn with_persist_service_leg_segments(mut self, persist: bool) -> Self {
        self.persist_service_leg_segments = persist;
        self
    }

    pub fn log_settings(&self, prefix: &str) {
        log_entity(prefix, "Service nodes", &self.service_nodes_file_name, self.persist_service_nodes);
        log_entity(prefix, "Service legs", &self.service_legs_file_name, self.persist_service_legs);
        log_entity(
            prefix,
            "Service leg segments",
            &self.service_leg_segments_file_name,
            self.persist_service_leg_segments,
        );
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxRoutedServicesSettings {
    pub services_file_name: String,
    pub persist_services: bool,
}

impl Default for GxRoutedServicesSettings {
    fn default() -> Self {
        Self {
            services_file_name: "planit_service".to_string(),
            persist_services: true,
        }
    }
}

impl GxRoutedServicesSettings {
    pub fn with_services_file_name(mut self, name: impl Into<String>) -> Self {
        self.services_file_name = name.into();
        self
    }

    pub fn with_persist_services(mut self, persist: bool) -> Self {
        self.persist_services = persist;
        self
    }

    pub fn log_settings(&self, prefix: &str) {
        log_entity(prefix, "Routed services", &self.services_file_name, self.persist_services);
    }
}

/// Complete configuration of one export run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GxExportConfig {
    pub writer: GxWriterSettings,
    pub network: GxNetworkSettings,
    pub zoning: GxZoningSettings,
    pub service_network: GxServiceNetworkSettings,
    pub routed_services: GxRoutedServicesSettings,
}

impl GxExportConfig {
    pub fn new(writer: GxWriterSettings) -> Self {
        Self {
            writer,
            ..Default::default()
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| GxError::configuration(format!("Invalid JSON configuration: {}", e)))
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| GxError::configuration(format!("Invalid YAML configuration: {}", e)))
    }

    /// Loads a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Self::from_json_str(&source),
            "yaml" | "yml" => Self::from_yaml_str(&source),
            other => Err(GxError::configuration(format!(
                "Unsupported configuration format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn log_settings(&self) {
        self.writer.log_settings("[writer]");
        self.network.log_settings("[network]");
        self.zoning.log_settings("[zoning]");
        self.service_network.log_settings("[service network]");
        self.routed_services.log_settings("[routed services]");
    }
}

fn log_entity(prefix: &str, label: &str, file_name: &str, persist: bool) {
    if persist {
        log::info!("{} {} file: {}", prefix, label, file_name);
    } else {
        log::info!("{} {}: not persisted", prefix, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GxExportConfig::from_json_str(
            r#"{"writer": {"destination_crs": {"name": "WGS 84", "identifiers": ["4326"]}, "id_mapper": "id"},
                "zoning": {"persist_virtual_network": false}}"#,
        )
        .unwrap();
        assert_eq!(config.writer.destination_crs, Some(GxCrs::new("WGS 84").with_identifier("4326")));
        assert_eq!(config.writer.id_mapper, GxIdMapperType::Id);
        assert_eq!(config.writer.file_extension, ".csv");
        assert!(!config.zoning.persist_virtual_network);
        assert!(config.zoning.persist_od_zones);
        assert_eq!(config.routed_services.services_file_name, "planit_service");
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.yml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "writer:\n  layer_prefix: lyr\nnetwork:\n  persist_links: false").unwrap();
        let config = GxExportConfig::load(&path).unwrap();
        assert_eq!(config.writer.layer_prefix, "lyr");
        assert!(!config.network.persist_links);

        let unsupported = dir.path().join("export.toml");
        fs::write(&unsupported, "").unwrap();
        assert!(matches!(
            GxExportConfig::load(&unsupported),
            Err(GxError::Configuration { .. })
        ));
    }

    #[test]
    fn writer_validation() {
        assert!(GxWriterSettings::default().validate().is_ok());
        assert!(GxWriterSettings::default().with_file_extension(".").validate().is_err());
        assert!(GxWriterSettings::default().with_layer_prefix(" ").validate().is_err());
        assert_eq!(GxWriterSettings::default().with_file_extension(".GeoJSON").extension(), "geojson");
    }
}
