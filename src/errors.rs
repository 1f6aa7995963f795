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

//! # GeoX Error Module
//!
//! This module defines the error types and utilities used throughout GeoX
//! for consistent error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! - **Explicit Error Types**: Each error variant represents a specific category
//!   of failure, making it easier to handle errors appropriately
//! - **Context-Rich**: Row-level failures carry the layer log prefix and the
//!   entity type that was being written
//! - **Fatal vs. Partial**: Partial-data conditions (missing geometry, missing
//!   SRID) are logged warnings and never become errors
//! - **Serde Support**: Errors can be serialized/deserialized for structured
//!   logging and export reports
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors
//! - **Configuration**: Feature contexts, writers and settings out of sync
//! - **Schema**: Malformed attribute declarations or field specs
//! - **Naming**: Blank layer prefixes or base names
//! - **Driver**: Output driver lookup or store creation failures
//! - **SchemaNotFound**: Row writer requested for an unregistered schema
//! - **Write**: Row-level failure wrapped with layer and entity context
//! - **Transform**: Coordinate transformation failures
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures
//!
//! ## Usage
//!
//! ```rust
//! use geox::errors::{Result, GxError};
//!
//! fn example(base: &str) -> Result<String> {
//!     if base.trim().is_empty() {
//!         return Err(GxError::naming("base file name is blank"));
//!     }
//!     Ok(base.to_string())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout GeoX.
pub type Result<T> = std::result::Result<T, GxError>;

/// Canonical error enumeration for GeoX.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GxError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Builder and writer disagree, or settings are unusable.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Errors caused by malformed attribute declarations or schema strings.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Output names that cannot be composed.
    #[error("naming error: {message}")]
    Naming { message: String },

    /// Output driver lookup or datastore creation failed.
    #[error("driver error: {message}")]
    Driver { message: String },

    /// A row writer was requested for a schema the store does not hold.
    #[error("schema '{schema}' not found in datastore {store}")]
    SchemaNotFound { schema: String, store: String },

    /// A row-level failure while persisting entities of one type.
    #[error("{context} Unable to persist entities for {entity}: {message}")]
    Write {
        context: String,
        entity: String,
        message: String,
    },

    /// Coordinate transformation failed.
    #[error("transform error: {0}")]
    Transform(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for GxError {
    fn from(err: io::Error) -> Self {
        GxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GxError {
    fn from(err: serde_json::Error) -> Self {
        GxError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for GxError {
    fn from(err: serde_yaml::Error) -> Self {
        GxError::Serde(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for GxError {
    fn from(err: csv::Error) -> Self {
        GxError::driver(format!("CSV write error: {}", err))
    }
}

impl GxError {
    /// Helper to construct configuration errors.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        GxError::Configuration {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        GxError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct naming errors.
    pub fn naming<T: Into<String>>(message: T) -> Self {
        GxError::Naming {
            message: message.into(),
        }
    }

    /// Helper to construct driver errors.
    pub fn driver<T: Into<String>>(message: T) -> Self {
        GxError::Driver {
            message: message.into(),
        }
    }

    /// Helper to construct missing-schema errors.
    pub fn schema_not_found(schema: impl Into<String>, store: impl Into<String>) -> Self {
        GxError::SchemaNotFound {
            schema: schema.into(),
            store: store.into(),
        }
    }

    /// Wraps a row-level failure with the layer log prefix and entity type.
    pub fn write(
        context: impl Into<String>,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        GxError::Write {
            context: context.into(),
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Helper to construct transform errors.
    pub fn transform<T: Into<String>>(message: T) -> Self {
        GxError::Transform(message.into())
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        GxError::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_names_prefix_and_entity() {
        let err = GxError::write("[layer: 0]", "link segment", "boom");
        let text = err.to_string();
        assert!(text.starts_with("[layer: 0] Unable to persist entities for link segment"));
        assert!(text.ends_with("boom"));
    }

    #[test]
    fn errors_roundtrip_through_json() {
        let err = GxError::schema_not_found("layer_0_planit_nodes", "mem://nodes");
        let json = serde_json::to_string(&err).expect("serialize");
        let back: GxError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, err);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn csv_errors_become_driver_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: GxError = csv::Error::from(io).into();
        match err {
            GxError::Driver { message } => assert!(message.contains("disk full")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
