// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind};
use terrapack_type::{GeometryType, Value};

use crate::{Catalog, schema};

/// Companion row describing the geometry column of a feature table.
/// `z` and `m` carry the ordinate policy: 0 prohibited, 1 mandatory,
/// 2 optional.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryColumns {
	pub table_name: String,
	pub column_name: String,
	pub geometry_type: GeometryType,
	pub srs_id: i64,
	pub z: u8,
	pub m: u8,
}

impl GeometryColumns {
	pub fn new(
		table_name: impl Into<String>,
		column_name: impl Into<String>,
		geometry_type: GeometryType,
		srs_id: i64,
	) -> GeometryColumns {
		GeometryColumns {
			table_name: table_name.into(),
			column_name: column_name.into(),
			geometry_type,
			srs_id,
			z: 0,
			m: 0,
		}
	}
}

const SELECT: &str = "SELECT table_name, column_name, geometry_type_name, srs_id, z, m \
	 FROM trk_geometry_columns";

fn from_row(row: &[Value]) -> terrapack_core::Result<GeometryColumns> {
	let type_name = row[2].as_text().unwrap_or_default();
	let geometry_type = GeometryType::from_name(type_name).ok_or_else(|| {
		Error::schema_violation(
			schema::GEOMETRY_COLUMNS,
			format!("unknown geometry type `{}`", type_name),
		)
	})?;
	Ok(GeometryColumns {
		table_name: row[0].as_text().unwrap_or_default().to_string(),
		column_name: row[1].as_text().unwrap_or_default().to_string(),
		geometry_type,
		srs_id: row[3].as_integer().unwrap_or_default(),
		z: row[4].as_integer().unwrap_or_default() as u8,
		m: row[5].as_integer().unwrap_or_default() as u8,
	})
}

impl Catalog {
	/// Record the geometry column of a feature table. The contents row
	/// and the reference system must already be registered.
	#[tracing::instrument(name = "catalog::create_geometry_columns", level = "trace", skip_all, fields(table = row.table_name))]
	pub fn create_geometry_columns(
		engine: &dyn Engine,
		row: &GeometryColumns,
	) -> terrapack_core::Result<()> {
		if row.z > 2 || row.m > 2 {
			return Err(Error::column_violation(
				row.table_name.clone(),
				row.column_name.clone(),
				"ordinate policy must be 0, 1 or 2",
			));
		}
		if Catalog::find_contents_raw(engine, &row.table_name)?.is_none() {
			return Err(Error::NotFound {
				kind: ObjectKind::Contents,
				name: row.table_name.clone(),
				table: None,
			});
		}
		if Catalog::find_srs(engine, row.srs_id)?.is_none() {
			return Err(Error::NotFound {
				kind: ObjectKind::Srs,
				name: row.srs_id.to_string(),
				table: Some(row.table_name.clone()),
			});
		}
		engine.execute(
			"INSERT INTO trk_geometry_columns (table_name, column_name, \
			 geometry_type_name, srs_id, z, m) VALUES (?, ?, ?, ?, ?, ?)",
			&[
				Value::from(row.table_name.as_str()),
				Value::from(row.column_name.as_str()),
				Value::from(row.geometry_type.name()),
				Value::from(row.srs_id),
				Value::from(row.z as i64),
				Value::from(row.m as i64),
			],
		)?;
		Ok(())
	}

	pub fn find_geometry_columns(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Option<GeometryColumns>> {
		if !engine.table_exists(schema::GEOMETRY_COLUMNS)? {
			return Ok(None);
		}
		let rows = engine.query(
			&format!("{} WHERE table_name = ?", SELECT),
			&[Value::from(table)],
		)?;
		rows.rows.first().map(|row| from_row(row)).transpose()
	}

	pub(crate) fn drop_geometry_columns(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<usize> {
		if !engine.table_exists(schema::GEOMETRY_COLUMNS)? {
			return Ok(0);
		}
		engine.execute(
			"DELETE FROM trk_geometry_columns WHERE table_name = ?",
			&[Value::from(table)],
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::contents::ContentsType;
	use crate::test_utils::{base_engine, physical_table};
	use crate::Contents;

	fn registered_engine() -> terrapack_core::SqliteEngine {
		let engine = base_engine();
		schema::create_geometry_columns(&engine).unwrap();
		physical_table(&engine, "roads");
		Catalog::create_contents(
			&engine,
			&Contents::new("roads", ContentsType::Features).with_srs(4326),
		)
		.unwrap();
		engine
	}

	#[test]
	fn test_create_and_find() {
		let engine = registered_engine();
		let row = GeometryColumns::new("roads", "geom", GeometryType::LineString, 4326);
		Catalog::create_geometry_columns(&engine, &row).unwrap();
		assert_eq!(
			Catalog::find_geometry_columns(&engine, "roads").unwrap(),
			Some(row)
		);
		assert!(Catalog::find_geometry_columns(&engine, "parcels").unwrap().is_none());
	}

	#[test]
	fn test_requires_contents_row() {
		let engine = registered_engine();
		let row = GeometryColumns::new("parcels", "geom", GeometryType::Polygon, 4326);
		let err = Catalog::create_geometry_columns(&engine, &row).unwrap_err();
		assert!(matches!(err, Error::NotFound { kind: ObjectKind::Contents, .. }));
	}

	#[test]
	fn test_rejects_bad_ordinate_policy() {
		let engine = registered_engine();
		let mut row = GeometryColumns::new("roads", "geom", GeometryType::Point, 4326);
		row.z = 3;
		let err = Catalog::create_geometry_columns(&engine, &row).unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));
	}
}
