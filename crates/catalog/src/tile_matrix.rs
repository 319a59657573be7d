// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind};
use terrapack_type::{Extent, Value};

use crate::{Catalog, schema};

/// Tiling envelope of a tile table: the reference system and the full
/// extent every zoom level subdivides.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMatrixSet {
	pub table_name: String,
	pub srs_id: i64,
	pub extent: Extent,
}

/// Grid geometry of one zoom level of a tile table.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMatrix {
	pub table_name: String,
	pub zoom_level: i64,
	pub matrix_width: i64,
	pub matrix_height: i64,
	pub tile_width: i64,
	pub tile_height: i64,
	pub pixel_x_size: f64,
	pub pixel_y_size: f64,
}

impl TileMatrix {
	fn validate(&self) -> terrapack_core::Result<()> {
		if self.zoom_level < 0 {
			return Err(Error::schema_violation(
				self.table_name.clone(),
				"zoom level must not be negative",
			));
		}
		let dims = [
			("matrix_width", self.matrix_width),
			("matrix_height", self.matrix_height),
			("tile_width", self.tile_width),
			("tile_height", self.tile_height),
		];
		for (name, value) in dims {
			if value < 1 {
				return Err(Error::column_violation(
					self.table_name.clone(),
					name,
					"must be at least 1",
				));
			}
		}
		if self.pixel_x_size <= 0.0 || self.pixel_y_size <= 0.0 {
			return Err(Error::schema_violation(
				self.table_name.clone(),
				"pixel sizes must be positive",
			));
		}
		Ok(())
	}
}

fn set_from_row(row: &[Value]) -> TileMatrixSet {
	TileMatrixSet {
		table_name: row[0].as_text().unwrap_or_default().to_string(),
		srs_id: row[1].as_integer().unwrap_or_default(),
		extent: Extent::new(
			row[2].as_real().unwrap_or_default(),
			row[3].as_real().unwrap_or_default(),
			row[4].as_real().unwrap_or_default(),
			row[5].as_real().unwrap_or_default(),
		),
	}
}

fn matrix_from_row(row: &[Value]) -> TileMatrix {
	TileMatrix {
		table_name: row[0].as_text().unwrap_or_default().to_string(),
		zoom_level: row[1].as_integer().unwrap_or_default(),
		matrix_width: row[2].as_integer().unwrap_or_default(),
		matrix_height: row[3].as_integer().unwrap_or_default(),
		tile_width: row[4].as_integer().unwrap_or_default(),
		tile_height: row[5].as_integer().unwrap_or_default(),
		pixel_x_size: row[6].as_real().unwrap_or_default(),
		pixel_y_size: row[7].as_real().unwrap_or_default(),
	}
}

impl Catalog {
	#[tracing::instrument(name = "catalog::create_tile_matrix_set", level = "trace", skip_all, fields(table = set.table_name))]
	pub fn create_tile_matrix_set(
		engine: &dyn Engine,
		set: &TileMatrixSet,
	) -> terrapack_core::Result<()> {
		if Catalog::find_contents_raw(engine, &set.table_name)?.is_none() {
			return Err(Error::NotFound {
				kind: ObjectKind::Contents,
				name: set.table_name.clone(),
				table: None,
			});
		}
		if Catalog::find_srs(engine, set.srs_id)?.is_none() {
			return Err(Error::NotFound {
				kind: ObjectKind::Srs,
				name: set.srs_id.to_string(),
				table: Some(set.table_name.clone()),
			});
		}
		engine.execute(
			"INSERT INTO trk_tile_matrix_set (table_name, srs_id, min_x, min_y, \
			 max_x, max_y) VALUES (?, ?, ?, ?, ?, ?)",
			&[
				Value::from(set.table_name.as_str()),
				Value::from(set.srs_id),
				Value::from(set.extent.min_x),
				Value::from(set.extent.min_y),
				Value::from(set.extent.max_x),
				Value::from(set.extent.max_y),
			],
		)?;
		Ok(())
	}

	pub fn find_tile_matrix_set(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Option<TileMatrixSet>> {
		if !engine.table_exists(schema::TILE_MATRIX_SET)? {
			return Ok(None);
		}
		let rows = engine.query(
			"SELECT table_name, srs_id, min_x, min_y, max_x, max_y \
			 FROM trk_tile_matrix_set WHERE table_name = ?",
			&[Value::from(table)],
		)?;
		Ok(rows.rows.first().map(|row| set_from_row(row)))
	}

	#[tracing::instrument(name = "catalog::create_tile_matrix", level = "trace", skip_all, fields(table = matrix.table_name, zoom = matrix.zoom_level))]
	pub fn create_tile_matrix(
		engine: &dyn Engine,
		matrix: &TileMatrix,
	) -> terrapack_core::Result<()> {
		matrix.validate()?;
		if Catalog::find_tile_matrix_set(engine, &matrix.table_name)?.is_none() {
			return Err(Error::schema_violation(
				matrix.table_name.clone(),
				"tile matrix requires a tile matrix set",
			));
		}
		engine.execute(
			"INSERT INTO trk_tile_matrix (table_name, zoom_level, matrix_width, \
			 matrix_height, tile_width, tile_height, pixel_x_size, pixel_y_size) \
			 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
			&[
				Value::from(matrix.table_name.as_str()),
				Value::from(matrix.zoom_level),
				Value::from(matrix.matrix_width),
				Value::from(matrix.matrix_height),
				Value::from(matrix.tile_width),
				Value::from(matrix.tile_height),
				Value::from(matrix.pixel_x_size),
				Value::from(matrix.pixel_y_size),
			],
		)?;
		Ok(())
	}

	/// Zoom levels of a tile table, lowest first.
	pub fn list_tile_matrix(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Vec<TileMatrix>> {
		if !engine.table_exists(schema::TILE_MATRIX)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(
			"SELECT table_name, zoom_level, matrix_width, matrix_height, tile_width, \
			 tile_height, pixel_x_size, pixel_y_size FROM trk_tile_matrix \
			 WHERE table_name = ? ORDER BY zoom_level",
			&[Value::from(table)],
		)?;
		Ok(rows.rows.iter().map(|row| matrix_from_row(row)).collect())
	}

	pub(crate) fn drop_tile_matrix_set(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<usize> {
		if !engine.table_exists(schema::TILE_MATRIX_SET)? {
			return Ok(0);
		}
		engine.execute(
			"DELETE FROM trk_tile_matrix_set WHERE table_name = ?",
			&[Value::from(table)],
		)
	}

	pub(crate) fn drop_tile_matrix(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<usize> {
		if !engine.table_exists(schema::TILE_MATRIX)? {
			return Ok(0);
		}
		engine.execute(
			"DELETE FROM trk_tile_matrix WHERE table_name = ?",
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

	fn tile_engine() -> terrapack_core::SqliteEngine {
		let engine = base_engine();
		schema::create_tile_matrix_set(&engine).unwrap();
		schema::create_tile_matrix(&engine).unwrap();
		physical_table(&engine, "basemap");
		Catalog::create_contents(
			&engine,
			&Contents::new("basemap", ContentsType::Tiles).with_srs(4326),
		)
		.unwrap();
		engine
	}

	fn matrix(zoom: i64, width: i64) -> TileMatrix {
		TileMatrix {
			table_name: "basemap".to_string(),
			zoom_level: zoom,
			matrix_width: width,
			matrix_height: width,
			tile_width: 256,
			tile_height: 256,
			pixel_x_size: 180.0 / (width as f64 * 256.0),
			pixel_y_size: 180.0 / (width as f64 * 256.0),
		}
	}

	#[test]
	fn test_matrix_requires_set() {
		let engine = tile_engine();
		let err = Catalog::create_tile_matrix(&engine, &matrix(0, 1)).unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));
	}

	#[test]
	fn test_zoom_levels_ordered() {
		let engine = tile_engine();
		let set = TileMatrixSet {
			table_name: "basemap".to_string(),
			srs_id: 4326,
			extent: Extent::new(-180.0, -90.0, 180.0, 90.0),
		};
		Catalog::create_tile_matrix_set(&engine, &set).unwrap();
		assert_eq!(Catalog::find_tile_matrix_set(&engine, "basemap").unwrap(), Some(set));

		for zoom in [2, 0, 1] {
			Catalog::create_tile_matrix(&engine, &matrix(zoom, 1 << zoom)).unwrap();
		}
		let levels = Catalog::list_tile_matrix(&engine, "basemap").unwrap();
		assert_eq!(
			levels.iter().map(|m| m.zoom_level).collect::<Vec<_>>(),
			vec![0, 1, 2]
		);
	}

	#[test]
	fn test_dimension_validation() {
		let engine = tile_engine();
		let mut bad = matrix(0, 1);
		bad.tile_width = 0;
		let err = Catalog::create_tile_matrix(&engine, &bad).unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));
	}
}
