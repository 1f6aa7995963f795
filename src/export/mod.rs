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

//! # Export Module
//!
//! Top-level operations that turn a transport model into feature classes.
//!
//! ## Module Components
//!
//! - **Session** ([session.rs](session/index.html)): shared per feature class
//!   flow and store lifetime of one export call
//! - **Writer** ([writer.rs](writer/index.html)): row loop over one entity collection
//! - **Network / Zoning / Service / Routed / Intermodal**: exporters per model part
//! - **Report** ([report.rs](report/index.html)): feature classes written, skipped members, warnings
//! - **Manifest** ([manifest.rs](manifest/index.html)): sizes and BLAKE3 hashes of the outputs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use geox::config::{GxNetworkSettings, GxWriterSettings};
//! use geox::export::{GxNetworkExporter, GxSessionOptions};
//! use geox::model::GxNetwork;
//!
//! let options = GxSessionOptions::new(GxWriterSettings::new("out"));
//! let exporter = GxNetworkExporter::new(options, GxNetworkSettings::default());
//! let report = exporter.write(&GxNetwork::default())?;
//! println!("{} rows", report.total_rows());
//! # Ok::<(), geox::errors::GxError>(())
//! ```

pub mod intermodal;
pub mod manifest;
pub mod network;
pub mod report;
pub mod routed;
pub mod service;
pub mod session;
pub mod writer;
pub mod zoning;

pub use intermodal::GxIntermodalExporter;
pub use manifest::{compute_hash, GxManifest, GxManifestBuilder, GxManifestFile, MANIFEST_FILE_NAME};
pub use network::GxNetworkExporter;
pub use report::{GxExportReport, GxFeatureClassReport};
pub use routed::GxRoutedServicesExporter;
pub use service::GxServiceNetworkExporter;
pub use session::{GxExportSession, GxSessionOptions};
pub use writer::{GxEntityWriter, GxWriteStats};
pub use zoning::GxZoningExporter;
