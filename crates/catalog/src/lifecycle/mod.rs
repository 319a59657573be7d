// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

//! Table lifecycle controller. Creation registers the physical table and
//! its catalog rows in one scope; removal walks the declarative cleanup
//! table for the contents type so no registry row outlives its table.

use terrapack_core::{Engine, Error, atomic};
use terrapack_schema::{ColumnDef, Ddl, Predicate, Row, RowStore, TableDef, TableKind};
use terrapack_type::{DataType, Value};

use crate::contents::{Contents, ContentsType};
use crate::{Catalog, schema};

/// Registration state of a table name, judged from both sides: the
/// physical table and its contents row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
	/// Neither the table nor a registration exists.
	Absent,
	/// Exactly one side exists: a table nobody registered, or a
	/// registration whose table has gone missing.
	Orphan,
	/// Table and contents row both present.
	Registered,
	/// Registered, with extension rows scoped to the table.
	RegisteredExtended,
}

/// One unit of cascade cleanup. The steps for a contents type are data,
/// not control flow; `cleanup_steps` is the whole policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
	GeometryColumnsRow,
	TileMatrixRows,
	TileMatrixSetRow,
	DropPhysicalTable,
}

/// Companion cleanup owed by each contents type before its registry row
/// may be deleted. Attribute and unrecognized tables have no companion
/// registries; their cleanup is the physical table itself.
pub fn cleanup_steps(data_type: &ContentsType) -> &'static [CleanupStep] {
	match data_type {
		ContentsType::Features => &[CleanupStep::GeometryColumnsRow],
		ContentsType::Tiles | ContentsType::GriddedCoverage => {
			&[CleanupStep::TileMatrixRows, CleanupStep::TileMatrixSetRow]
		}
		ContentsType::Attributes | ContentsType::Other(_) => &[CleanupStep::DropPhysicalTable],
	}
}

fn apply_step(engine: &dyn Engine, table: &str, step: CleanupStep) -> terrapack_core::Result<()> {
	match step {
		CleanupStep::GeometryColumnsRow => {
			Catalog::drop_geometry_columns(engine, table)?;
		}
		CleanupStep::TileMatrixRows => {
			Catalog::drop_tile_matrix(engine, table)?;
		}
		CleanupStep::TileMatrixSetRow => {
			Catalog::drop_tile_matrix_set(engine, table)?;
		}
		CleanupStep::DropPhysicalTable => {
			Ddl::drop_table(engine, table)?;
		}
	}
	Ok(())
}

/// Table kinds and contents types that must agree at registration time.
fn kind_matches(kind: TableKind, data_type: &ContentsType) -> bool {
	match kind {
		TableKind::Feature => *data_type == ContentsType::Features,
		TableKind::Tile => data_type.is_tiled(),
		TableKind::Attribute => *data_type == ContentsType::Attributes,
		TableKind::UserDefined => true,
	}
}

impl Catalog {
	/// Create the companion registries a contents type needs before a
	/// table of that type can be registered.
	pub fn ensure_support(
		engine: &dyn Engine,
		data_type: &ContentsType,
	) -> terrapack_core::Result<()> {
		match data_type {
			ContentsType::Features => {
				schema::create_geometry_columns(engine)?;
			}
			ContentsType::Tiles | ContentsType::GriddedCoverage => {
				schema::create_tile_matrix_set(engine)?;
				schema::create_tile_matrix(engine)?;
			}
			ContentsType::Attributes | ContentsType::Other(_) => {}
		}
		Ok(())
	}

	/// Check the companion registries a contents type needs are in place.
	/// [`Catalog::create_contents`] runs this on every registration; it
	/// never creates the registries behind the caller's back, so call
	/// [`Catalog::ensure_support`] first.
	pub fn verify_create(
		engine: &dyn Engine,
		table: &str,
		data_type: &ContentsType,
	) -> terrapack_core::Result<()> {
		let required: &[&str] = match data_type {
			ContentsType::Features => &[schema::GEOMETRY_COLUMNS],
			ContentsType::Tiles | ContentsType::GriddedCoverage => {
				&[schema::TILE_MATRIX_SET, schema::TILE_MATRIX]
			}
			ContentsType::Attributes | ContentsType::Other(_) => &[],
		};
		for registry in required {
			if !engine.table_exists(registry)? {
				return Err(Error::schema_violation(
					table,
					format!("contents type `{}` requires the `{}` registry", data_type, registry),
				));
			}
		}
		Ok(())
	}

	/// Create the physical table and its contents row in one scope.
	/// Either both exist afterwards or neither does.
	#[tracing::instrument(name = "catalog::register", level = "debug", skip_all, fields(table = table.name))]
	pub fn register(
		engine: &dyn Engine,
		table: &TableDef,
		contents: &Contents,
	) -> terrapack_core::Result<()> {
		if table.name != contents.table_name {
			return Err(Error::schema_violation(
				&table.name,
				format!("contents row names a different table `{}`", contents.table_name),
			));
		}
		if !kind_matches(table.kind, &contents.data_type) {
			return Err(Error::schema_violation(
				&table.name,
				format!("table kind does not admit contents type `{}`", contents.data_type),
			));
		}
		atomic(engine, |engine| {
			Ddl::create_table(engine, table)?;
			Catalog::create_contents(engine, contents)
		})
	}

	/// Cascade-delete a registration without touching the physical table
	/// of feature and tile contents. Attribute and unrecognized tables
	/// drop their physical table as part of the cascade, before the
	/// contents row goes.
	pub fn delete_cascade(engine: &dyn Engine, contents: &Contents) -> terrapack_core::Result<bool> {
		Catalog::delete_by_id_cascade(engine, &contents.table_name, false)
	}

	/// Cascade-delete by table name. With `drop_table` set the physical
	/// table is removed as well, even when the registration itself has
	/// already gone missing.
	#[tracing::instrument(name = "catalog::delete_by_id_cascade", level = "debug", skip_all, fields(table = table, drop_table = drop_table))]
	pub fn delete_by_id_cascade(
		engine: &dyn Engine,
		table: &str,
		drop_table: bool,
	) -> terrapack_core::Result<bool> {
		atomic(engine, |engine| {
			let Some(contents) = Catalog::find_contents_raw(engine, table)? else {
				if drop_table {
					Ddl::drop_table(engine, table)?;
				}
				return Ok(false);
			};
			Catalog::cascade(engine, &contents)?;
			engine.execute(
				"DELETE FROM trk_contents WHERE table_name = ?",
				&[Value::from(table)],
			)?;
			if drop_table {
				Ddl::drop_table(engine, table)?;
			}
			Ok(true)
		})
	}

	/// Cascade-delete several registrations in one scope. Returns how
	/// many contents rows were actually removed.
	pub fn delete_ids_cascade<'a, I>(
		engine: &dyn Engine,
		tables: I,
		drop_tables: bool,
	) -> terrapack_core::Result<usize>
	where
		I: IntoIterator<Item = &'a str>,
	{
		atomic(engine, |engine| {
			let mut removed = 0;
			for table in tables {
				if Catalog::delete_by_id_cascade(engine, table, drop_tables)? {
					removed += 1;
				}
			}
			Ok(removed)
		})
	}

	/// Cascade-delete every registration matching a predicate over the
	/// contents registry (see [`Catalog::contents_def`]).
	pub fn delete_where_cascade(
		engine: &dyn Engine,
		predicate: &Predicate,
		drop_tables: bool,
	) -> terrapack_core::Result<usize> {
		let def = Catalog::contents_def()?;
		let store = RowStore::new(engine, &def);
		let tables: Vec<String> = store
			.query(Some(predicate), None)?
			.iter()
			.filter_map(|row: &Row| {
				row.get("table_name").and_then(Value::as_text).map(str::to_string)
			})
			.collect();
		Catalog::delete_ids_cascade(engine, tables.iter().map(String::as_str), drop_tables)
	}

	/// Remove a table completely: cascade plus the physical table.
	pub fn delete_table(engine: &dyn Engine, table: &str) -> terrapack_core::Result<bool> {
		Catalog::delete_by_id_cascade(engine, table, true)
	}

	fn cascade(engine: &dyn Engine, contents: &Contents) -> terrapack_core::Result<()> {
		let table = contents.table_name.as_str();

		// Relations first: mapping tables reference rows about to go.
		for relation in Catalog::relations_for_table(engine, table)? {
			if relation.mapping_table_name != table {
				Ddl::drop_table(engine, &relation.mapping_table_name)?;
				Catalog::drop_extensions_for_table(engine, &relation.mapping_table_name)?;
			}
		}
		Catalog::drop_relations_for_table(engine, table)?;

		for step in cleanup_steps(&contents.data_type) {
			apply_step(engine, table, *step)?;
		}
		Catalog::drop_annotation_references_for_table(engine, table)?;
		Catalog::drop_extensions_for_table(engine, table)?;
		Ok(())
	}

	pub fn table_state(engine: &dyn Engine, table: &str) -> terrapack_core::Result<TableState> {
		let physical = engine.table_exists(table)?;
		let registered = Catalog::find_contents_raw(engine, table)?.is_some();
		Ok(match (physical, registered) {
			(false, false) => TableState::Absent,
			(true, true) => {
				if Catalog::extensions_for_table(engine, table)?.is_empty() {
					TableState::Registered
				} else {
					TableState::RegisteredExtended
				}
			}
			_ => TableState::Orphan,
		})
	}

	/// The contents row of a table that must be fully registered.
	pub fn require_registered(engine: &dyn Engine, table: &str) -> terrapack_core::Result<Contents> {
		match Catalog::find_contents(engine, table)? {
			Some(contents) => Ok(contents),
			None => Err(Error::NotFound {
				kind: terrapack_core::ObjectKind::Contents,
				name: table.to_string(),
				table: None,
			}),
		}
	}

	/// Table model of the contents registry itself, for predicate-driven
	/// operations over registrations.
	pub fn contents_def() -> terrapack_core::Result<TableDef> {
		TableDef::new(
			schema::CONTENTS,
			TableKind::UserDefined,
			vec![
				ColumnDef::new(0, "table_name", DataType::Text).not_null(),
				ColumnDef::new(1, "data_type", DataType::Text).not_null(),
				ColumnDef::new(2, "identifier", DataType::Text),
				ColumnDef::new(3, "description", DataType::Text),
				ColumnDef::new(4, "last_change", DataType::DateTime),
				ColumnDef::new(5, "min_x", DataType::Double),
				ColumnDef::new(6, "min_y", DataType::Double),
				ColumnDef::new(7, "max_x", DataType::Double),
				ColumnDef::new(8, "max_y", DataType::Double),
				ColumnDef::new(9, "srs_id", DataType::Int),
			],
			Vec::new(),
		)
	}
}
