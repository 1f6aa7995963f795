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

//! # Attribute Module
//!
//! Typed output columns. An attribute descriptor couples a column name and a
//! declared type with a pure extraction function over one entity type.

use std::fmt;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::{to_wkt, GxGeometryType};

/// Declared column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GxAttributeType {
    String,
    Long,
    Integer,
    Double,
    Float,
    Boolean,
    Geometry(GxGeometryType),
}

impl GxAttributeType {
    /// Type tag as it appears in schema strings.
    pub fn tag(&self) -> &'static str {
        match self {
            GxAttributeType::String => "String",
            GxAttributeType::Long => "Long",
            GxAttributeType::Integer => "Integer",
            GxAttributeType::Double => "Double",
            GxAttributeType::Float => "Float",
            GxAttributeType::Boolean => "Boolean",
            GxAttributeType::Geometry(geometry) => geometry.gis_name(),
        }
    }

    /// Parses a schema type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "String" => Some(GxAttributeType::String),
            "Long" => Some(GxAttributeType::Long),
            "Integer" => Some(GxAttributeType::Integer),
            "Double" => Some(GxAttributeType::Double),
            "Float" => Some(GxAttributeType::Float),
            "Boolean" => Some(GxAttributeType::Boolean),
            other => GxGeometryType::from_tag(other).map(GxAttributeType::Geometry),
        }
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, GxAttributeType::Geometry(_))
    }

    pub fn geometry_type(&self) -> Option<GxGeometryType> {
        match self {
            GxAttributeType::Geometry(geometry) => Some(*geometry),
            _ => None,
        }
    }
}

impl fmt::Display for GxAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Extracted column value.
#[derive(Clone, Debug, PartialEq)]
pub enum GxAttributeValue {
    Null,
    String(String),
    Long(i64),
    Integer(i32),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Geometry(Geometry<f64>),
}

impl GxAttributeValue {
    /// Whether the value may populate a column of the declared type.
    ///
    /// Nulls fit every column; integral values widen into floating columns.
    pub fn fits(&self, declared: GxAttributeType) -> bool {
        match (self, declared) {
            (GxAttributeValue::Null, _) => true,
            (GxAttributeValue::String(_), GxAttributeType::String) => true,
            (GxAttributeValue::Long(_), GxAttributeType::Long) => true,
            (GxAttributeValue::Integer(_), GxAttributeType::Integer | GxAttributeType::Long) => true,
            (
                GxAttributeValue::Double(_) | GxAttributeValue::Float(_),
                GxAttributeType::Double | GxAttributeType::Float,
            ) => true,
            (GxAttributeValue::Boolean(_), GxAttributeType::Boolean) => true,
            (GxAttributeValue::Geometry(geometry), GxAttributeType::Geometry(expected)) => {
                expected.accepts(GxGeometryType::classify(geometry))
            }
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GxAttributeValue::Null)
    }

    pub fn as_geometry(&self) -> Option<&Geometry<f64>> {
        match self {
            GxAttributeValue::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// Plain text rendering used by tabular drivers; geometries become WKT.
    pub fn to_text(&self) -> String {
        match self {
            GxAttributeValue::Null => String::new(),
            GxAttributeValue::String(s) => s.clone(),
            GxAttributeValue::Long(v) => v.to_string(),
            GxAttributeValue::Integer(v) => v.to_string(),
            GxAttributeValue::Double(v) => v.to_string(),
            GxAttributeValue::Float(v) => v.to_string(),
            GxAttributeValue::Boolean(v) => v.to_string(),
            GxAttributeValue::Geometry(g) => to_wkt(g),
        }
    }

    /// JSON rendering for property maps. Non-finite numbers become null.
    pub fn to_json(&self) -> Value {
        match self {
            GxAttributeValue::Null => Value::Null,
            GxAttributeValue::String(s) => Value::String(s.clone()),
            GxAttributeValue::Long(v) => Value::from(*v),
            GxAttributeValue::Integer(v) => Value::from(*v),
            GxAttributeValue::Double(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            GxAttributeValue::Float(v) => serde_json::Number::from_f64(f64::from(*v))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            GxAttributeValue::Boolean(v) => Value::Bool(*v),
            GxAttributeValue::Geometry(g) => Value::String(to_wkt(g)),
        }
    }
}

impl From<String> for GxAttributeValue {
    fn from(value: String) -> Self {
        GxAttributeValue::String(value)
    }
}

impl From<&str> for GxAttributeValue {
    fn from(value: &str) -> Self {
        GxAttributeValue::String(value.to_string())
    }
}

impl From<i64> for GxAttributeValue {
    fn from(value: i64) -> Self {
        GxAttributeValue::Long(value)
    }
}

impl From<i32> for GxAttributeValue {
    fn from(value: i32) -> Self {
        GxAttributeValue::Integer(value)
    }
}

impl From<f64> for GxAttributeValue {
    fn from(value: f64) -> Self {
        GxAttributeValue::Double(value)
    }
}

impl From<f32> for GxAttributeValue {
    fn from(value: f32) -> Self {
        GxAttributeValue::Float(value)
    }
}

impl From<bool> for GxAttributeValue {
    fn from(value: bool) -> Self {
        GxAttributeValue::Boolean(value)
    }
}

impl From<Geometry<f64>> for GxAttributeValue {
    fn from(value: Geometry<f64>) -> Self {
        GxAttributeValue::Geometry(value)
    }
}

impl<T: Into<GxAttributeValue>> From<Option<T>> for GxAttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(GxAttributeValue::Null)
    }
}

/// Extraction function of one attribute.
pub type GxExtractor<T> = Box<dyn Fn(&T) -> GxAttributeValue>;

/// One named, typed, extractable output column.
pub struct GxAttributeDescriptor<T> {
    name: String,
    declared_type: GxAttributeType,
    extractor: GxExtractor<T>,
}

impl<T> GxAttributeDescriptor<T> {
    pub fn new<F>(name: impl Into<String>, declared_type: GxAttributeType, extractor: F) -> Self
    where
        F: Fn(&T) -> GxAttributeValue + 'static,
    {
        Self {
            name: name.into(),
            declared_type,
            extractor: Box::new(extractor),
        }
    }

    /// Name as declared, including any geometry marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column name in the physical output, without the `*` geometry marker.
    pub fn column_name(&self) -> &str {
        self.name.trim_start_matches('*')
    }

    pub fn declared_type(&self) -> GxAttributeType {
        self.declared_type
    }

    pub fn is_geometry(&self) -> bool {
        self.declared_type.is_geometry()
    }

    /// Extracts the raw value from one entity.
    pub fn extract(&self, entity: &T) -> GxAttributeValue {
        (self.extractor)(entity)
    }
}

impl<T> fmt::Debug for GxAttributeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GxAttributeDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;

    #[test]
    fn tags_roundtrip() {
        for tag in ["String", "Long", "Integer", "Double", "Float", "Boolean", "LineString"] {
            let parsed = GxAttributeType::from_tag(tag).expect("known tag");
            assert_eq!(parsed.tag(), tag);
        }
        assert!(GxAttributeType::from_tag("Decimal").is_none());
    }

    #[test]
    fn values_fit_declared_types() {
        assert!(GxAttributeValue::Null.fits(GxAttributeType::Boolean));
        assert!(GxAttributeValue::Integer(3).fits(GxAttributeType::Long));
        assert!(!GxAttributeValue::String("x".into()).fits(GxAttributeType::Long));
        let point = GxAttributeValue::Geometry(Geometry::Point(Point::new(1.0, 1.0)));
        assert!(point.fits(GxAttributeType::Geometry(GxGeometryType::Point)));
        assert!(!point.fits(GxAttributeType::Geometry(GxGeometryType::LineString)));
    }

    #[test]
    fn optional_values_become_null() {
        let missing: Option<i64> = None;
        assert_eq!(GxAttributeValue::from(missing), GxAttributeValue::Null);
        assert_eq!(GxAttributeValue::from(Some("a")), GxAttributeValue::String("a".into()));
        assert_eq!(GxAttributeValue::Double(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn descriptor_extracts_and_strips_marker() {
        let descriptor: GxAttributeDescriptor<(i64, f64)> =
            GxAttributeDescriptor::new("*geom", GxAttributeType::Geometry(GxGeometryType::Point), |e: &(i64, f64)| {
                GxAttributeValue::Geometry(Geometry::Point(Point::new(e.1, e.1)))
            });
        assert_eq!(descriptor.column_name(), "geom");
        assert!(descriptor.is_geometry());
        assert!(descriptor.extract(&(1, 2.0)).as_geometry().is_some());
    }
}
