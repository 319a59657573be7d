// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

//! Physical schema of the catalog and companion tables. Each `create_*`
//! is create-if-absent so containers can be reopened and upgraded in
//! place.

use terrapack_core::Engine;

use crate::srs;

pub const CONTENTS: &str = "trk_contents";
pub const EXTENSIONS: &str = "trk_extensions";
pub const GEOMETRY_COLUMNS: &str = "trk_geometry_columns";
pub const TILE_MATRIX_SET: &str = "trk_tile_matrix_set";
pub const TILE_MATRIX: &str = "trk_tile_matrix";
pub const EXTENDED_RELATIONS: &str = "trk_extended_relations";
pub const SPATIAL_REF_SYS: &str = "trk_spatial_ref_sys";
pub const SEMANTIC_ANNOTATIONS: &str = "trk_semantic_annotations";
pub const SEMANTIC_ANNOTATION_REFERENCE: &str = "trk_sa_reference";

const CREATE_SPATIAL_REF_SYS: &str = "CREATE TABLE trk_spatial_ref_sys (\
	 srs_name TEXT NOT NULL, \
	 srs_id INTEGER NOT NULL PRIMARY KEY, \
	 organization TEXT NOT NULL, \
	 organization_coordsys_id INTEGER NOT NULL, \
	 definition TEXT NOT NULL, \
	 description TEXT)";

const CREATE_CONTENTS: &str = "CREATE TABLE trk_contents (\
	 table_name TEXT NOT NULL PRIMARY KEY, \
	 data_type TEXT NOT NULL, \
	 identifier TEXT UNIQUE, \
	 description TEXT DEFAULT '', \
	 last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')), \
	 min_x DOUBLE, \
	 min_y DOUBLE, \
	 max_x DOUBLE, \
	 max_y DOUBLE, \
	 srs_id INTEGER, \
	 CONSTRAINT fk_contents_srs FOREIGN KEY (srs_id) REFERENCES trk_spatial_ref_sys (srs_id))";

const CREATE_EXTENSIONS: &str = "CREATE TABLE trk_extensions (\
	 table_name TEXT, \
	 column_name TEXT, \
	 extension_name TEXT NOT NULL, \
	 definition TEXT NOT NULL, \
	 scope TEXT NOT NULL, \
	 CONSTRAINT uq_extensions UNIQUE (table_name, column_name, extension_name))";

const CREATE_GEOMETRY_COLUMNS: &str = "CREATE TABLE trk_geometry_columns (\
	 table_name TEXT NOT NULL, \
	 column_name TEXT NOT NULL, \
	 geometry_type_name TEXT NOT NULL, \
	 srs_id INTEGER NOT NULL, \
	 z TINYINT NOT NULL, \
	 m TINYINT NOT NULL, \
	 CONSTRAINT pk_geometry_columns PRIMARY KEY (table_name, column_name), \
	 CONSTRAINT fk_geometry_columns_contents FOREIGN KEY (table_name) \
	 REFERENCES trk_contents (table_name))";

const CREATE_TILE_MATRIX_SET: &str = "CREATE TABLE trk_tile_matrix_set (\
	 table_name TEXT NOT NULL PRIMARY KEY, \
	 srs_id INTEGER NOT NULL, \
	 min_x DOUBLE NOT NULL, \
	 min_y DOUBLE NOT NULL, \
	 max_x DOUBLE NOT NULL, \
	 max_y DOUBLE NOT NULL)";

const CREATE_TILE_MATRIX: &str = "CREATE TABLE trk_tile_matrix (\
	 table_name TEXT NOT NULL, \
	 zoom_level INTEGER NOT NULL, \
	 matrix_width INTEGER NOT NULL, \
	 matrix_height INTEGER NOT NULL, \
	 tile_width INTEGER NOT NULL, \
	 tile_height INTEGER NOT NULL, \
	 pixel_x_size DOUBLE NOT NULL, \
	 pixel_y_size DOUBLE NOT NULL, \
	 CONSTRAINT pk_tile_matrix PRIMARY KEY (table_name, zoom_level))";

const CREATE_EXTENDED_RELATIONS: &str = "CREATE TABLE trk_extended_relations (\
	 id INTEGER PRIMARY KEY AUTOINCREMENT, \
	 base_table_name TEXT NOT NULL, \
	 base_primary_column TEXT NOT NULL DEFAULT 'id', \
	 related_table_name TEXT NOT NULL, \
	 related_primary_column TEXT NOT NULL DEFAULT 'id', \
	 relation_name TEXT NOT NULL, \
	 mapping_table_name TEXT NOT NULL UNIQUE)";

const CREATE_SEMANTIC_ANNOTATIONS: &str = "CREATE TABLE trk_semantic_annotations (\
	 id INTEGER PRIMARY KEY AUTOINCREMENT, \
	 type TEXT NOT NULL, \
	 title TEXT NOT NULL, \
	 description TEXT, \
	 uri TEXT NOT NULL)";

const CREATE_SEMANTIC_ANNOTATION_REFERENCE: &str = "CREATE TABLE trk_sa_reference (\
	 table_name TEXT NOT NULL, \
	 key_column_name TEXT NOT NULL, \
	 key_value INTEGER NOT NULL, \
	 sa_id INTEGER NOT NULL, \
	 CONSTRAINT fk_sa_reference_annotation FOREIGN KEY (sa_id) \
	 REFERENCES trk_semantic_annotations (id))";

fn create_if_absent(engine: &dyn Engine, table: &str, sql: &str) -> terrapack_core::Result<bool> {
	if engine.table_exists(table)? {
		return Ok(false);
	}
	engine.execute(sql, &[])?;
	Ok(true)
}

pub fn create_spatial_ref_sys(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	let created = create_if_absent(engine, SPATIAL_REF_SYS, CREATE_SPATIAL_REF_SYS)?;
	if created {
		srs::seed_defaults(engine)?;
	}
	Ok(created)
}

pub fn create_contents(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, CONTENTS, CREATE_CONTENTS)
}

pub fn create_extensions(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, EXTENSIONS, CREATE_EXTENSIONS)
}

pub fn create_geometry_columns(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, GEOMETRY_COLUMNS, CREATE_GEOMETRY_COLUMNS)
}

pub fn create_tile_matrix_set(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, TILE_MATRIX_SET, CREATE_TILE_MATRIX_SET)
}

pub fn create_tile_matrix(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, TILE_MATRIX, CREATE_TILE_MATRIX)
}

pub fn create_extended_relations(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, EXTENDED_RELATIONS, CREATE_EXTENDED_RELATIONS)
}

pub fn create_semantic_annotations(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(engine, SEMANTIC_ANNOTATIONS, CREATE_SEMANTIC_ANNOTATIONS)
}

pub fn create_semantic_annotation_reference(engine: &dyn Engine) -> terrapack_core::Result<bool> {
	create_if_absent(
		engine,
		SEMANTIC_ANNOTATION_REFERENCE,
		CREATE_SEMANTIC_ANNOTATION_REFERENCE,
	)
}

/// Tables every container carries, created at open time.
pub fn create_base(engine: &dyn Engine) -> terrapack_core::Result<()> {
	create_spatial_ref_sys(engine)?;
	create_contents(engine)?;
	create_extensions(engine)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use terrapack_core::SqliteEngine;

	#[test]
	fn test_create_base_idempotent() {
		let engine = SqliteEngine::memory().unwrap();
		create_base(&engine).unwrap();
		create_base(&engine).unwrap();
		assert!(engine.table_exists(CONTENTS).unwrap());
		assert!(engine.table_exists(EXTENSIONS).unwrap());
		assert!(engine.table_exists(SPATIAL_REF_SYS).unwrap());
	}

	#[test]
	fn test_companion_tables() {
		let engine = SqliteEngine::memory().unwrap();
		create_base(&engine).unwrap();
		assert!(create_geometry_columns(&engine).unwrap());
		assert!(!create_geometry_columns(&engine).unwrap());
		assert!(create_tile_matrix_set(&engine).unwrap());
		assert!(create_tile_matrix(&engine).unwrap());
		assert!(create_extended_relations(&engine).unwrap());
		assert!(create_semantic_annotations(&engine).unwrap());
		assert!(create_semantic_annotation_reference(&engine).unwrap());
	}
}
