// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

//! Shared fixtures for catalog tests.

use terrapack_core::{Engine, SqliteEngine, quote};
use terrapack_schema::{ColumnDef, TableDef, TableKind, columns};
use terrapack_type::{DataType, GeometryType};

use crate::contents::{Contents, ContentsType};
use crate::schema;

/// In-memory engine with the base catalog tables and default reference
/// systems in place.
pub fn base_engine() -> SqliteEngine {
	let engine = SqliteEngine::memory().expect("in-memory engine");
	schema::create_base(&engine).expect("base catalog tables");
	engine
}

/// `base_engine` plus every companion registry.
pub fn full_engine() -> SqliteEngine {
	let engine = base_engine();
	schema::create_geometry_columns(&engine).expect("geometry columns registry");
	schema::create_tile_matrix_set(&engine).expect("tile matrix set registry");
	schema::create_tile_matrix(&engine).expect("tile matrix registry");
	schema::create_extended_relations(&engine).expect("extended relations registry");
	schema::create_semantic_annotations(&engine).expect("semantic annotations registry");
	schema::create_semantic_annotation_reference(&engine).expect("annotation reference registry");
	engine
}

/// Bare physical table standing in for user data, so contents rows
/// created outside the lifecycle controller pass admission control.
pub fn physical_table(engine: &dyn Engine, name: &str) {
	engine
		.execute(
			&format!("CREATE TABLE {} (id INTEGER PRIMARY KEY)", quote(name)),
			&[],
		)
		.expect("physical table");
}

pub fn attribute_table(name: &str) -> TableDef {
	TableDef::new(
		name,
		TableKind::Attribute,
		vec![
			ColumnDef::primary_key(0, "id"),
			ColumnDef::new(1, "name", DataType::Text),
		],
		vec![],
	)
	.expect("attribute table is valid")
}

pub fn attribute_contents(name: &str) -> Contents {
	Contents::new(name, ContentsType::Attributes)
}

/// Feature table named `name` with a linestring geometry column `geom`
/// registered against WGS 84.
pub fn feature_fixture(name: &str) -> (TableDef, Contents) {
	let table = TableDef::new(
		name,
		TableKind::Feature,
		columns::feature("id", "geom", GeometryType::LineString),
		vec![],
	)
	.expect("feature table is valid");
	let contents = Contents::new(name, ContentsType::Features).with_srs(4326);
	(table, contents)
}

/// Tile-pyramid table named `name` with the mandated tile columns.
pub fn tile_fixture(name: &str) -> (TableDef, Contents) {
	let table = TableDef::tile(name).expect("tile table is valid");
	let contents = Contents::new(name, ContentsType::Tiles).with_srs(4326);
	(table, contents)
}
