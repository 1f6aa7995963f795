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

//! # Schema Module
//!
//! Compiles a feature context into the flat schema string consumed by output
//! drivers and parses such strings back into field definitions.
//!
//! ## Format
//!
//! ```text
//! mapped_id:String,id:Long,...,*geom:Point:srid=4326
//! ```
//!
//! Fields are separated by `,`, names and types by `:`. The geometry field is
//! last and is the only one that may carry the `srid=<code>` suffix, taken
//! from the first identifier of the destination coordinate reference system.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::GxAttributeType;
use crate::context::GxFeatureContext;
use crate::errors::{GxError, Result};
use crate::geometry::{GxCrs, GxGeometryType};

pub const FIELD_DELIMITER: char = ',';
pub const TYPE_DELIMITER: char = ':';
const SRID_PREFIX: &str = "srid=";

/// Named field specification of one output container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GxCompiledSchema {
    pub name: String,
    pub field_spec: String,
    pub geometry_type: GxGeometryType,
}

impl GxCompiledSchema {
    /// Parses the field spec into field definitions.
    pub fn fields(&self) -> Result<Vec<GxSchemaField>> {
        parse_field_spec(&self.field_spec)
    }

    /// The SRID attached to the geometry field, if any.
    pub fn srid(&self) -> Option<String> {
        self.fields()
            .ok()
            .and_then(|fields| fields.into_iter().find_map(|f| f.srid))
    }

    /// Same field spec under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_spec: self.field_spec.clone(),
            geometry_type: self.geometry_type,
        }
    }
}

impl fmt::Display for GxCompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.field_spec)
    }
}

/// Non-fatal condition raised while compiling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GxSchemaWarning {
    /// No destination CRS, or one without identifiers; the geometry column has no SRID.
    MissingSrid { schema: String, crs: Option<String> },
}

impl fmt::Display for GxSchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GxSchemaWarning::MissingSrid { schema, crs: Some(crs) } => write!(
                f,
                "destination CRS {} exposes no identifier, schema {} written without srid",
                crs, schema
            ),
            GxSchemaWarning::MissingSrid { schema, crs: None } => {
                write!(f, "no destination CRS, schema {} written without srid", schema)
            }
        }
    }
}

/// Compiler output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GxSchemaCompilation {
    pub schema: GxCompiledSchema,
    pub warning: Option<GxSchemaWarning>,
}

/// Serializes a feature context into a named schema.
///
/// The geometry attribute is last by construction of the context, so the SRID
/// suffix is appended once to the whole string.
pub fn compile<T>(context: &GxFeatureContext<T>, crs: Option<&GxCrs>, name: impl Into<String>) -> GxSchemaCompilation {
    let name = name.into();
    let mut field_spec = context
        .attributes()
        .iter()
        .map(|attribute| format!("{}{}{}", attribute.name(), TYPE_DELIMITER, attribute.declared_type().tag()))
        .collect::<Vec<_>>()
        .join(&FIELD_DELIMITER.to_string());

    let warning = match crs.and_then(GxCrs::identifier_code) {
        Some(code) => {
            field_spec.push(TYPE_DELIMITER);
            field_spec.push_str(SRID_PREFIX);
            field_spec.push_str(code);
            None
        }
        None => Some(GxSchemaWarning::MissingSrid {
            schema: name.clone(),
            crs: crs.map(|c| c.name.clone()),
        }),
    };

    GxSchemaCompilation {
        schema: GxCompiledSchema {
            name,
            field_spec,
            geometry_type: context.geometry_type(),
        },
        warning,
    }
}

/// One field of a parsed schema string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GxSchemaField {
    /// Name as written in the spec, including any `*` marker.
    pub name: String,
    pub field_type: GxAttributeType,
    /// Marked with `*` as the default geometry.
    pub default_geometry: bool,
    pub srid: Option<String>,
}

impl GxSchemaField {
    /// Physical column name.
    pub fn column_name(&self) -> &str {
        self.name.trim_start_matches('*')
    }
}

/// Parses a schema string back into fields.
pub fn parse_field_spec(field_spec: &str) -> Result<Vec<GxSchemaField>> {
    if field_spec.trim().is_empty() {
        return Err(GxError::schema("empty field spec"));
    }
    let mut fields = Vec::new();
    for raw in field_spec.split(FIELD_DELIMITER) {
        let mut parts = raw.split(TYPE_DELIMITER);
        let name = parts.next().unwrap_or_default().trim();
        let tag = parts
            .next()
            .ok_or_else(|| GxError::schema(format!("field '{}' has no type", raw)))?
            .trim();
        if name.is_empty() {
            return Err(GxError::schema(format!("field '{}' has no name", raw)));
        }
        let field_type = GxAttributeType::from_tag(tag)
            .ok_or_else(|| GxError::schema(format!("field '{}' has unknown type '{}'", name, tag)))?;
        let mut srid = None;
        for option in parts {
            match option.trim().strip_prefix(SRID_PREFIX) {
                Some(code) if field_type.is_geometry() => srid = Some(code.to_string()),
                _ => {
                    return Err(GxError::schema(format!(
                        "field '{}' has unsupported option '{}'",
                        name, option
                    )))
                }
            }
        }
        fields.push(GxSchemaField {
            name: name.to_string(),
            field_type,
            default_geometry: name.starts_with('*'),
            srid,
        });
    }
    Ok(fields)
}
