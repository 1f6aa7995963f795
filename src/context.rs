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

//! # Feature Context Module
//!
//! An entity feature context is the ordered list of attribute descriptors one
//! entity type exposes in its output, together with the entity-type tag and
//! the name of its geometry attribute.
//!
//! ## Invariants
//!
//! Enforced by [`GxFeatureContextBuilder::build`]:
//!
//! - attribute names are non-empty, unique and free of `,` and `:`
//! - physical column names fit the ten character limit of fixed-width
//!   tabular formats
//! - exactly one geometry attribute exists, it carries the configured
//!   geometry attribute name and it is the last attribute
//!
//! Contexts are built once per write pass from the active id mappers,
//! destination CRS and mode set, and discarded afterwards.

use std::collections::HashSet;
use std::fmt;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};

use crate::attribute::{GxAttributeDescriptor, GxAttributeType, GxAttributeValue};
use crate::errors::{GxError, Result};
use crate::geometry::GxGeometryType;

/// Name of the geometry attribute in every context built by this crate.
pub const GEOMETRY_ATTRIBUTE: &str = "*geom";

/// Maximum physical column name length.
pub const MAX_COLUMN_NAME_LEN: usize = 10;

/// Entity type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GxEntityType {
    Node,
    Link,
    LinkSegment,
    OdZone,
    TransferZone,
    OdConnectoid,
    TransferConnectoid,
    ConnectoidEdge,
    ConnectoidSegment,
    ServiceNode,
    ServiceLeg,
    ServiceLegSegment,
    RoutedService,
}

impl GxEntityType {
    /// Readable name used in log lines and errors.
    pub fn name(&self) -> &'static str {
        match self {
            GxEntityType::Node => "node",
            GxEntityType::Link => "link",
            GxEntityType::LinkSegment => "link segment",
            GxEntityType::OdZone => "od zone",
            GxEntityType::TransferZone => "transfer zone",
            GxEntityType::OdConnectoid => "od connectoid",
            GxEntityType::TransferConnectoid => "transfer connectoid",
            GxEntityType::ConnectoidEdge => "connectoid edge",
            GxEntityType::ConnectoidSegment => "connectoid segment",
            GxEntityType::ServiceNode => "service node",
            GxEntityType::ServiceLeg => "service leg",
            GxEntityType::ServiceLegSegment => "service leg segment",
            GxEntityType::RoutedService => "routed service",
        }
    }
}

impl fmt::Display for GxEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated, ordered attribute declaration for one entity type.
pub struct GxFeatureContext<T> {
    entity_type: GxEntityType,
    attributes: Vec<GxAttributeDescriptor<T>>,
    geometry_attribute_name: String,
}

impl<T: 'static> GxFeatureContext<T> {
    pub fn builder(entity_type: GxEntityType) -> GxFeatureContextBuilder<T> {
        GxFeatureContextBuilder::new(entity_type)
    }
}

impl<T> GxFeatureContext<T> {
    pub fn entity_type(&self) -> GxEntityType {
        self.entity_type
    }

    pub fn attributes(&self) -> &[GxAttributeDescriptor<T>] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn geometry_attribute_name(&self) -> &str {
        &self.geometry_attribute_name
    }

    /// The geometry attribute, always the last one.
    pub fn geometry_attribute(&self) -> &GxAttributeDescriptor<T> {
        &self.attributes[self.attributes.len() - 1]
    }

    /// Declared geometry shape of the geometry attribute.
    pub fn geometry_type(&self) -> GxGeometryType {
        self.geometry_attribute()
            .declared_type()
            .geometry_type()
            .unwrap_or(GxGeometryType::GeometryCollection)
    }

    /// Physical column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|a| a.column_name().to_string())
            .collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&GxAttributeDescriptor<T>> {
        self.attributes
            .iter()
            .find(|a| a.name() == name || a.column_name() == name)
    }
}

impl<T> fmt::Debug for GxFeatureContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GxFeatureContext")
            .field("entity_type", &self.entity_type)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Accumulates attribute descriptors and validates them on [`build`](Self::build).
pub struct GxFeatureContextBuilder<T> {
    entity_type: GxEntityType,
    attributes: Vec<GxAttributeDescriptor<T>>,
    geometry_attribute_name: String,
}

impl<T: 'static> GxFeatureContextBuilder<T> {
    pub fn new(entity_type: GxEntityType) -> Self {
        Self {
            entity_type,
            attributes: Vec::new(),
            geometry_attribute_name: GEOMETRY_ATTRIBUTE.to_string(),
        }
    }

    pub fn with_geometry_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.geometry_attribute_name = name.into();
        self
    }

    pub fn attribute(mut self, descriptor: GxAttributeDescriptor<T>) -> Self {
        self.attributes.push(descriptor);
        self
    }

    pub fn attributes(mut self, descriptors: impl IntoIterator<Item = GxAttributeDescriptor<T>>) -> Self {
        self.attributes.extend(descriptors);
        self
    }

    pub fn string<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::String, move |e| {
            GxAttributeValue::String(extract(e))
        }))
    }

    pub fn optional_string<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> Option<String> + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::String, move |e| {
            extract(e).into()
        }))
    }

    pub fn long<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> i64 + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::Long, move |e| {
            GxAttributeValue::Long(extract(e))
        }))
    }

    pub fn integer<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> i32 + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::Integer, move |e| {
            GxAttributeValue::Integer(extract(e))
        }))
    }

    pub fn double<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> Option<f64> + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::Double, move |e| {
            extract(e).into()
        }))
    }

    pub fn float<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> Option<f32> + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::Float, move |e| {
            extract(e).into()
        }))
    }

    pub fn boolean<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.attribute(GxAttributeDescriptor::new(name, GxAttributeType::Boolean, move |e| {
            GxAttributeValue::Boolean(extract(e))
        }))
    }

    /// Appends the geometry attribute under the configured geometry name.
    pub fn geometry<F>(self, geometry_type: GxGeometryType, extract: F) -> Self
    where
        F: Fn(&T) -> Option<Geometry<f64>> + 'static,
    {
        let name = self.geometry_attribute_name.clone();
        self.attribute(GxAttributeDescriptor::new(
            name,
            GxAttributeType::Geometry(geometry_type),
            move |e| extract(e).into(),
        ))
    }

    /// Validates the declaration and produces the context.
    pub fn build(self) -> Result<GxFeatureContext<T>> {
        let entity = self.entity_type.name();
        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            let name = attribute.name();
            if attribute.column_name().is_empty() {
                return Err(GxError::schema(format!("{} declares an attribute with an empty name", entity)));
            }
            if name.contains(',') || name.contains(':') {
                return Err(GxError::schema(format!(
                    "{} attribute '{}' contains a reserved delimiter",
                    entity, name
                )));
            }
            if attribute.column_name().chars().count() > MAX_COLUMN_NAME_LEN {
                return Err(GxError::schema(format!(
                    "{} attribute '{}' exceeds {} characters",
                    entity, name, MAX_COLUMN_NAME_LEN
                )));
            }
            if !seen.insert(attribute.column_name().to_string()) {
                return Err(GxError::schema(format!("{} attribute '{}' is declared twice", entity, name)));
            }
        }

        let geometry_positions: Vec<usize> = self
            .attributes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_geometry())
            .map(|(i, _)| i)
            .collect();
        match geometry_positions.as_slice() {
            [] => {
                return Err(GxError::schema(format!("{} declares no geometry attribute", entity)));
            }
            [position] => {
                if *position != self.attributes.len() - 1 {
                    return Err(GxError::schema(format!(
                        "{} geometry attribute must be declared last",
                        entity
                    )));
                }
                if self.attributes[*position].name() != self.geometry_attribute_name {
                    return Err(GxError::schema(format!(
                        "{} geometry attribute is named '{}', expected '{}'",
                        entity,
                        self.attributes[*position].name(),
                        self.geometry_attribute_name
                    )));
                }
            }
            _ => {
                return Err(GxError::schema(format!(
                    "{} declares {} geometry attributes",
                    entity,
                    geometry_positions.len()
                )));
            }
        }

        Ok(GxFeatureContext {
            entity_type: self.entity_type,
            attributes: self.attributes,
            geometry_attribute_name: self.geometry_attribute_name,
        })
    }
}
