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

//! # Geometry Module
//!
//! Geometry shape tags, runtime classification, coordinate reference system
//! descriptors and the transform seam used when writing geometry columns.
//!
//! ## Module Components
//!
//! - **GxGeometryType**: Tagged enumeration of the shapes an output can hold
//! - **GxCrs**: Named coordinate reference system with identifier codes
//! - **GxGeometryTransformer**: Transform applied to every geometry column value
//! - **to_wkt**: Well-known-text encoding used by tabular drivers
//!
//! Output containers hold exactly one geometry shape, so every geometry value
//! is classified before it is routed to a store.

use std::cmp::Ordering;
use std::fmt;

use geo_types::{Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::errors::{GxError, Result};

/// Geometry shapes supported by output containers.
///
/// Ordering follows the GIS type name so that geometry buckets are emitted
/// alphabetically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GxGeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GxGeometryType {
    /// All supported shapes.
    pub const ALL: [GxGeometryType; 7] = [
        GxGeometryType::Point,
        GxGeometryType::LineString,
        GxGeometryType::Polygon,
        GxGeometryType::MultiPoint,
        GxGeometryType::MultiLineString,
        GxGeometryType::MultiPolygon,
        GxGeometryType::GeometryCollection,
    ];

    /// Classifies a geometry value by its runtime shape.
    ///
    /// `Line` is reported as a line string, `Rect` and `Triangle` as polygons,
    /// matching how [`normalize`] rewrites them.
    pub fn classify(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => GxGeometryType::Point,
            Geometry::Line(_) | Geometry::LineString(_) => GxGeometryType::LineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => GxGeometryType::Polygon,
            Geometry::MultiPoint(_) => GxGeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GxGeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GxGeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GxGeometryType::GeometryCollection,
        }
    }

    /// Type name as used in schema strings.
    pub fn gis_name(&self) -> &'static str {
        match self {
            GxGeometryType::Point => "Point",
            GxGeometryType::LineString => "LineString",
            GxGeometryType::Polygon => "Polygon",
            GxGeometryType::MultiPoint => "MultiPoint",
            GxGeometryType::MultiLineString => "MultiLineString",
            GxGeometryType::MultiPolygon => "MultiPolygon",
            GxGeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Lower-cased type name used as a file name suffix.
    pub fn suffix(&self) -> String {
        self.gis_name().to_lowercase()
    }

    /// Parses a schema type tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        GxGeometryType::ALL
            .iter()
            .copied()
            .find(|t| t.gis_name().eq_ignore_ascii_case(tag))
    }

    /// Whether a value of shape `other` may be stored in a column declared as `self`.
    pub fn accepts(&self, other: GxGeometryType) -> bool {
        *self == other || *self == GxGeometryType::GeometryCollection
    }
}

impl Ord for GxGeometryType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gis_name().cmp(other.gis_name())
    }
}

impl PartialOrd for GxGeometryType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GxGeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gis_name())
    }
}

/// Rewrites `Line`, `Rect` and `Triangle` into their general counterparts.
pub fn normalize(geometry: Geometry<f64>) -> Geometry<f64> {
    match geometry {
        Geometry::Line(line) => Geometry::LineString(LineString::new(vec![line.start, line.end])),
        Geometry::Rect(rect) => Geometry::Polygon(rect.to_polygon()),
        Geometry::Triangle(triangle) => Geometry::Polygon(triangle.to_polygon()),
        other => other,
    }
}

/// Coordinate reference system descriptor.
///
/// Only the identifier codes matter to the exporter; the first one becomes
/// the SRID attached to geometry columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GxCrs {
    /// Human readable name, e.g. `WGS 84`.
    pub name: String,
    /// Identifier codes in authority order, e.g. `["4326"]`.
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl GxCrs {
    /// Creates a coordinate reference system without identifiers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifiers: Vec::new(),
        }
    }

    /// Creates an EPSG coordinate reference system.
    pub fn epsg(code: u32) -> Self {
        Self {
            name: format!("EPSG:{}", code),
            identifiers: vec![code.to_string()],
        }
    }

    /// Adds an identifier code.
    pub fn with_identifier(mut self, code: impl Into<String>) -> Self {
        self.identifiers.push(code.into());
        self
    }

    /// First identifier code, if any.
    pub fn identifier_code(&self) -> Option<&str> {
        self.identifiers
            .iter()
            .map(|code| code.trim())
            .find(|code| !code.is_empty())
    }
}

impl fmt::Display for GxCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identifier_code() {
            Some(code) => write!(f, "{} ({})", self.name, code),
            None => f.write_str(&self.name),
        }
    }
}

/// Transform applied to raw entity geometries before they are written.
pub trait GxGeometryTransformer {
    /// Returns the geometry expressed in the destination system.
    fn transform(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>>;
}

/// Leaves geometries untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct GxIdentityTransform;

impl GxGeometryTransformer for GxIdentityTransform {
    fn transform(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        Ok(geometry.clone())
    }
}

/// Applies a fallible per-coordinate mapping to every vertex.
pub struct GxCoordTransform<F>
where
    F: Fn(Coord<f64>) -> Result<Coord<f64>>,
{
    map: F,
}

impl<F> GxCoordTransform<F>
where
    F: Fn(Coord<f64>) -> Result<Coord<f64>>,
{
    pub fn new(map: F) -> Self {
        Self { map }
    }

    fn line(&self, line: &LineString<f64>) -> Result<LineString<f64>> {
        let coords = line
            .0
            .iter()
            .map(|c| (self.map)(*c))
            .collect::<Result<Vec<_>>>()?;
        Ok(LineString::new(coords))
    }

    fn polygon(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        let exterior = self.line(polygon.exterior())?;
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.line(ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }
}

impl<F> GxGeometryTransformer for GxCoordTransform<F>
where
    F: Fn(Coord<f64>) -> Result<Coord<f64>>,
{
    fn transform(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        let transformed = match normalize(geometry.clone()) {
            Geometry::Point(p) => Geometry::Point(Point::from((self.map)(p.0)?)),
            Geometry::LineString(l) => Geometry::LineString(self.line(&l)?),
            Geometry::Polygon(p) => Geometry::Polygon(self.polygon(&p)?),
            Geometry::MultiPoint(mp) => Geometry::MultiPoint(MultiPoint::new(
                mp.0.iter()
                    .map(|p| (self.map)(p.0).map(Point::from))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Geometry::MultiLineString(ml) => Geometry::MultiLineString(MultiLineString::new(
                ml.0.iter().map(|l| self.line(l)).collect::<Result<Vec<_>>>()?,
            )),
            Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon::new(
                mp.0.iter().map(|p| self.polygon(p)).collect::<Result<Vec<_>>>()?,
            )),
            Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(GeometryCollection(
                gc.0.iter().map(|g| self.transform(g)).collect::<Result<Vec<_>>>()?,
            )),
            other => {
                return Err(GxError::transform(format!(
                    "unsupported geometry {:?}",
                    GxGeometryType::classify(&other)
                )))
            }
        };
        Ok(transformed)
    }
}

/// Encodes a geometry as well-known text.
pub fn to_wkt(geometry: &Geometry<f64>) -> String {
    fn coord(c: &Coord<f64>) -> String {
        format!("{} {}", c.x, c.y)
    }
    fn ring(line: &LineString<f64>) -> String {
        let parts: Vec<String> = line.0.iter().map(coord).collect();
        format!("({})", parts.join(", "))
    }
    fn polygon(p: &Polygon<f64>) -> String {
        let mut rings = vec![ring(p.exterior())];
        rings.extend(p.interiors().iter().map(ring));
        format!("({})", rings.join(", "))
    }

    match geometry {
        Geometry::Point(p) => format!("POINT ({})", coord(&p.0)),
        Geometry::Line(l) => format!("LINESTRING ({}, {})", coord(&l.start), coord(&l.end)),
        Geometry::LineString(l) => format!("LINESTRING {}", ring(l)),
        Geometry::Polygon(p) => format!("POLYGON {}", polygon(p)),
        Geometry::MultiPoint(mp) => {
            let parts: Vec<String> = mp.0.iter().map(|p| format!("({})", coord(&p.0))).collect();
            format!("MULTIPOINT ({})", parts.join(", "))
        }
        Geometry::MultiLineString(ml) => {
            let parts: Vec<String> = ml.0.iter().map(ring).collect();
            format!("MULTILINESTRING ({})", parts.join(", "))
        }
        Geometry::MultiPolygon(mp) => {
            let parts: Vec<String> = mp.0.iter().map(polygon).collect();
            format!("MULTIPOLYGON ({})", parts.join(", "))
        }
        Geometry::GeometryCollection(gc) => {
            let parts: Vec<String> = gc.0.iter().map(to_wkt).collect();
            format!("GEOMETRYCOLLECTION ({})", parts.join(", "))
        }
        Geometry::Rect(r) => to_wkt(&Geometry::Polygon(r.to_polygon())),
        Geometry::Triangle(t) => to_wkt(&Geometry::Polygon(t.to_polygon())),
    }
}
