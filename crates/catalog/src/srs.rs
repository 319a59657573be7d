// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use once_cell::sync::Lazy;
use terrapack_core::{Engine, Error, atomic};
use terrapack_type::Value;

use crate::Catalog;

/// Coordinate reference system registry row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialReferenceSystem {
	pub srs_name: String,
	pub srs_id: i64,
	pub organization: String,
	pub organization_coordsys_id: i64,
	pub definition: String,
	pub description: Option<String>,
}

pub static WGS84: Lazy<SpatialReferenceSystem> = Lazy::new(|| SpatialReferenceSystem {
	srs_name: "WGS 84 geodetic".to_string(),
	srs_id: 4326,
	organization: "EPSG".to_string(),
	organization_coordsys_id: 4326,
	definition: "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,\
		 298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],AUTHORITY[\"EPSG\",\"6326\"]],\
		 PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],UNIT[\"degree\",\
		 0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],AUTHORITY[\"EPSG\",\"4326\"]]"
		.to_string(),
	description: Some("longitude/latitude coordinates in decimal degrees".to_string()),
});

pub static UNDEFINED_CARTESIAN: Lazy<SpatialReferenceSystem> =
	Lazy::new(|| SpatialReferenceSystem {
		srs_name: "Undefined Cartesian SRS".to_string(),
		srs_id: -1,
		organization: "NONE".to_string(),
		organization_coordsys_id: -1,
		definition: "undefined".to_string(),
		description: Some("undefined Cartesian coordinate reference system".to_string()),
	});

pub static UNDEFINED_GEOGRAPHIC: Lazy<SpatialReferenceSystem> =
	Lazy::new(|| SpatialReferenceSystem {
		srs_name: "Undefined Geographic SRS".to_string(),
		srs_id: 0,
		organization: "NONE".to_string(),
		organization_coordsys_id: 0,
		definition: "undefined".to_string(),
		description: Some("undefined geographic coordinate reference system".to_string()),
	});

const SELECT: &str = "SELECT srs_name, srs_id, organization, organization_coordsys_id, \
	 definition, description FROM trk_spatial_ref_sys";

fn from_row(row: &[Value]) -> SpatialReferenceSystem {
	SpatialReferenceSystem {
		srs_name: row[0].as_text().unwrap_or_default().to_string(),
		srs_id: row[1].as_integer().unwrap_or_default(),
		organization: row[2].as_text().unwrap_or_default().to_string(),
		organization_coordsys_id: row[3].as_integer().unwrap_or_default(),
		definition: row[4].as_text().unwrap_or_default().to_string(),
		description: row[5].as_text().map(str::to_string),
	}
}

/// The three reference systems every container carries.
pub(crate) fn seed_defaults(engine: &dyn Engine) -> terrapack_core::Result<()> {
	atomic(engine, |engine| {
		for srs in [&*UNDEFINED_CARTESIAN, &*UNDEFINED_GEOGRAPHIC, &*WGS84] {
			insert(engine, srs)?;
		}
		Ok(())
	})
}

fn insert(engine: &dyn Engine, srs: &SpatialReferenceSystem) -> terrapack_core::Result<()> {
	engine.execute(
		"INSERT INTO trk_spatial_ref_sys (srs_name, srs_id, organization, \
		 organization_coordsys_id, definition, description) VALUES (?, ?, ?, ?, ?, ?)",
		&[
			Value::from(srs.srs_name.as_str()),
			Value::from(srs.srs_id),
			Value::from(srs.organization.as_str()),
			Value::from(srs.organization_coordsys_id),
			Value::from(srs.definition.as_str()),
			Value::from(srs.description.clone()),
		],
	)?;
	Ok(())
}

impl Catalog {
	#[tracing::instrument(name = "catalog::create_srs", level = "trace", skip_all)]
	pub fn create_srs(
		engine: &dyn Engine,
		srs: &SpatialReferenceSystem,
	) -> terrapack_core::Result<()> {
		if Catalog::find_srs(engine, srs.srs_id)?.is_some() {
			return Err(Error::already_exists(
				terrapack_core::ObjectKind::Srs,
				srs.srs_id.to_string(),
			));
		}
		insert(engine, srs)
	}

	pub fn find_srs(
		engine: &dyn Engine,
		srs_id: i64,
	) -> terrapack_core::Result<Option<SpatialReferenceSystem>> {
		let rows = engine.query(
			&format!("{} WHERE srs_id = ?", SELECT),
			&[Value::from(srs_id)],
		)?;
		Ok(rows.rows.first().map(|row| from_row(row)))
	}

	pub fn list_srs(engine: &dyn Engine) -> terrapack_core::Result<Vec<SpatialReferenceSystem>> {
		let rows = engine.query(&format!("{} ORDER BY srs_id", SELECT), &[])?;
		Ok(rows.rows.iter().map(|row| from_row(row)).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use terrapack_core::SqliteEngine;

	use crate::schema;

	fn engine() -> SqliteEngine {
		let engine = SqliteEngine::memory().unwrap();
		schema::create_spatial_ref_sys(&engine).unwrap();
		engine
	}

	#[test]
	fn test_defaults_seeded() {
		let engine = engine();
		let all = Catalog::list_srs(&engine).unwrap();
		assert_eq!(
			all.iter().map(|s| s.srs_id).collect::<Vec<_>>(),
			vec![-1, 0, 4326]
		);
		let wgs84 = Catalog::find_srs(&engine, 4326).unwrap().unwrap();
		assert_eq!(wgs84.organization, "EPSG");
	}

	#[test]
	fn test_create_rejects_duplicate_id() {
		let engine = engine();
		let err = Catalog::create_srs(&engine, &WGS84).unwrap_err();
		assert!(matches!(err, Error::AlreadyExists { .. }));

		let custom = SpatialReferenceSystem {
			srs_name: "Web Mercator".to_string(),
			srs_id: 3857,
			organization: "EPSG".to_string(),
			organization_coordsys_id: 3857,
			definition: "PROJCS[\"WGS 84 / Pseudo-Mercator\"]".to_string(),
			description: None,
		};
		Catalog::create_srs(&engine, &custom).unwrap();
		assert_eq!(Catalog::find_srs(&engine, 3857).unwrap(), Some(custom));
	}
}
