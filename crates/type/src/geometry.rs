// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::fmt::{self, Display, Formatter};

/// Geometry subtypes a geometry column can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
	Geometry,
	Point,
	LineString,
	Polygon,
	MultiPoint,
	MultiLineString,
	MultiPolygon,
	GeometryCollection,
	CircularString,
	CompoundCurve,
	CurvePolygon,
	MultiCurve,
	MultiSurface,
	Curve,
	Surface,
}

impl GeometryType {
	pub fn name(&self) -> &'static str {
		match self {
			GeometryType::Geometry => "GEOMETRY",
			GeometryType::Point => "POINT",
			GeometryType::LineString => "LINESTRING",
			GeometryType::Polygon => "POLYGON",
			GeometryType::MultiPoint => "MULTIPOINT",
			GeometryType::MultiLineString => "MULTILINESTRING",
			GeometryType::MultiPolygon => "MULTIPOLYGON",
			GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
			GeometryType::CircularString => "CIRCULARSTRING",
			GeometryType::CompoundCurve => "COMPOUNDCURVE",
			GeometryType::CurvePolygon => "CURVEPOLYGON",
			GeometryType::MultiCurve => "MULTICURVE",
			GeometryType::MultiSurface => "MULTISURFACE",
			GeometryType::Curve => "CURVE",
			GeometryType::Surface => "SURFACE",
		}
	}

	pub fn from_name(name: &str) -> Option<GeometryType> {
		match name.to_ascii_uppercase().as_str() {
			"GEOMETRY" => Some(GeometryType::Geometry),
			"POINT" => Some(GeometryType::Point),
			"LINESTRING" => Some(GeometryType::LineString),
			"POLYGON" => Some(GeometryType::Polygon),
			"MULTIPOINT" => Some(GeometryType::MultiPoint),
			"MULTILINESTRING" => Some(GeometryType::MultiLineString),
			"MULTIPOLYGON" => Some(GeometryType::MultiPolygon),
			"GEOMETRYCOLLECTION" => Some(GeometryType::GeometryCollection),
			"CIRCULARSTRING" => Some(GeometryType::CircularString),
			"COMPOUNDCURVE" => Some(GeometryType::CompoundCurve),
			"CURVEPOLYGON" => Some(GeometryType::CurvePolygon),
			"MULTICURVE" => Some(GeometryType::MultiCurve),
			"MULTISURFACE" => Some(GeometryType::MultiSurface),
			"CURVE" => Some(GeometryType::Curve),
			"SURFACE" => Some(GeometryType::Surface),
			_ => None,
		}
	}
}

impl Display for GeometryType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_name_round_trip() {
		assert_eq!(GeometryType::from_name("point"), Some(GeometryType::Point));
		assert_eq!(
			GeometryType::from_name(GeometryType::MultiSurface.name()),
			Some(GeometryType::MultiSurface)
		);
		assert_eq!(GeometryType::from_name("TRIANGLE"), None);
	}
}
