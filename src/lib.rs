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

//! # GeoX Core Library
//!
//! GeoX writes an in-memory transport network model (physical network,
//! zoning, service network, routed services) into geometry bearing feature
//! classes, one per entity type and geometry shape.
//!
//! ## Module Overview
//!
//! - **errors**: GxError and the crate Result alias
//! - **geometry**: geometry shape tags, coordinate reference systems, transforms, WKT
//! - **attribute**: typed attribute values and descriptors
//! - **context**: per entity type feature contexts and their builder
//! - **model**: the transport model entities and id mapping
//! - **features**: feature context definitions for every persisted entity type
//! - **mode_names**: short mode tokens used in column names
//! - **schema**: compiles feature contexts into schema strings
//! - **partition**: splits mixed geometry collections into homogeneous buckets
//! - **naming**: output schema and file names
//! - **datastore**: output drivers (CSV, GeoJSON, memory)
//! - **registry**: open datastores of one export run
//! - **config**: writer and exporter settings
//! - **export**: entity writer, session, exporters, report and manifest
//!
//! ## Feature Flags
//!
//! - `csv`: CSV output driver
//! - `geojson`: GeoJSON output driver
//! - `full`: all drivers (default)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use geox::{GxCrs, GxNetwork, GxNetworkExporter, GxNetworkLayer, GxNode, GxSessionOptions, GxWriterSettings};
//! use geox::config::GxNetworkSettings;
//!
//! let mut layer = GxNetworkLayer::new(0, "road");
//! layer.nodes.push(Arc::new(GxNode::new(1, "n1").with_position(4.9, 52.4)));
//! let network = GxNetwork::new(Some(GxCrs::epsg(4326))).with_layer(layer);
//!
//! let writer = GxWriterSettings::new("out").with_destination_crs(GxCrs::epsg(4326));
//! let exporter = GxNetworkExporter::new(GxSessionOptions::new(writer), GxNetworkSettings::default());
//! let report = exporter.write(&network)?;
//! assert_eq!(report.schemas(), vec!["layer_road_planit_nodes"]);
//! # Ok::<(), geox::GxError>(())
//! ```
//!
//! ## Architecture
//!
//! 1. **Feature contexts** declare the columns of an entity type
//! 2. **Schemas** are compiled from a context plus the destination CRS
//! 3. **Partitions** split collections whose members differ in geometry shape
//! 4. **Names** are derived once and used for both schema and file
//! 5. **Registry** caches one datastore per entity type (and shape) until reset
//! 6. **Entity writer** streams one row per entity
//!
//! ## Error Handling
//!
//! All operations return `Result<T, GxError>`. Entities without geometry and
//! missing SRIDs are logged warnings; driver and write failures abort the
//! affected export after every open datastore has been released.

pub mod attribute;
pub mod config;
pub mod context;
pub mod datastore;
pub mod errors;
pub mod export;
pub mod features;
pub mod geometry;
pub mod mode_names;
pub mod model;
pub mod naming;
pub mod partition;
pub mod registry;
pub mod schema;

pub use attribute::{GxAttributeDescriptor, GxAttributeType, GxAttributeValue};
pub use config::{
    GxExportConfig, GxNetworkSettings, GxRoutedServicesSettings, GxServiceNetworkSettings, GxWriterSettings,
    GxZoningSettings,
};
pub use context::{GxEntityType, GxFeatureContext, GxFeatureContextBuilder, GEOMETRY_ATTRIBUTE};
pub use datastore::{GxDataStore, GxDataStoreFactory, GxDriverRegistry, GxFeatureRow, GxFeatureWriter, GxMemoryDriver};
pub use errors::{GxError, Result};
pub use export::{
    GxEntityWriter, GxExportReport, GxExportSession, GxFeatureClassReport, GxIntermodalExporter, GxManifest,
    GxNetworkExporter, GxRoutedServicesExporter, GxServiceNetworkExporter, GxSessionOptions, GxWriteStats,
    GxZoningExporter,
};
pub use geometry::{GxCoordTransform, GxCrs, GxGeometryTransformer, GxGeometryType, GxIdentityTransform};
pub use model::{
    GxAccessZone, GxConnectoid, GxConnectoidEdge, GxConnectoidSegment, GxIdMapperType, GxIdMappers, GxLink,
    GxLinkSegment, GxLinkSegmentType, GxMode, GxModeKind, GxNetwork, GxNetworkLayer, GxNode, GxRoutedService,
    GxRoutedServices, GxRoutedServicesLayer, GxRoutedTrip, GxServiceLeg, GxServiceLegSegment, GxServiceNetwork,
    GxServiceNetworkLayer, GxServiceNode, GxTripKind, GxVirtualNetwork, GxZone, GxZoneKind, GxZoning,
};
pub use naming::GxOutputName;
pub use partition::{partition_by_geometry, GxGeometryBucket, GxPartition};
pub use registry::{GxDataStoreKey, GxDataStoreRegistry};
pub use schema::{compile, GxCompiledSchema, GxSchemaWarning};
