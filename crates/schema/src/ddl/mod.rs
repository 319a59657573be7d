// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind, quote};
use tracing::instrument;

use crate::column::ColumnDef;
use crate::table::{TableConstraint, TableDef};

pub mod rebuild;
pub mod render;

pub use rebuild::{RebuildPlan, RebuildStep};

/// The DDL engine. Structural edits are two-phase: the physical statement
/// (or rebuild sequence) runs first and the in-memory model is updated
/// only once it succeeded, so model and table never diverge.
pub struct Ddl;

impl Ddl {
	#[instrument(name = "ddl::create_table", level = "debug", skip_all, fields(table = %table.name))]
	pub fn create_table(engine: &dyn Engine, table: &TableDef) -> terrapack_core::Result<()> {
		if engine.table_exists(&table.name)? {
			return Err(Error::table_already_exists(&table.name));
		}
		engine.execute(&render::create_table_sql(table)?, &[])?;
		Ok(())
	}

	/// Idempotent: dropping an absent table is a no-op.
	#[instrument(name = "ddl::drop_table", level = "debug", skip(engine))]
	pub fn drop_table(engine: &dyn Engine, name: &str) -> terrapack_core::Result<()> {
		engine.execute(&format!("DROP TABLE IF EXISTS {}", quote(name)), &[])?;
		Ok(())
	}

	/// Add a column with a single native statement.
	#[instrument(name = "ddl::add_column", level = "debug", skip_all, fields(table = %table.name, column = %column.name))]
	pub fn add_column(
		engine: &dyn Engine,
		table: &mut TableDef,
		column: ColumnDef,
	) -> terrapack_core::Result<()> {
		if table.has_column(&column.name) {
			return Err(Error::already_exists(ObjectKind::Column, &column.name));
		}
		if column.index != table.columns().len() {
			return Err(Error::column_violation(
				&table.name,
				&column.name,
				format!("added column index must be {}", table.columns().len()),
			));
		}
		if column.primary_key {
			return Err(Error::column_violation(
				&table.name,
				&column.name,
				"cannot add a primary key column to an existing table",
			));
		}
		if !column.nullable && column.default.is_none() {
			return Err(Error::column_violation(
				&table.name,
				&column.name,
				"added NOT NULL column requires a default",
			));
		}

		let sql = format!(
			"ALTER TABLE {} ADD COLUMN {}",
			quote(&table.name),
			render::column_sql(&table.name, &column)?
		);
		engine.execute(&sql, &[])?;
		table.push_column(column);
		Ok(())
	}

	/// Rename a column. Emulated via table rebuild: every row value
	/// survives under the new name.
	#[instrument(name = "ddl::rename_column", level = "debug", skip_all, fields(table = %table.name, from = from, to = to))]
	pub fn rename_column(
		engine: &dyn Engine,
		table: &mut TableDef,
		from: &str,
		to: &str,
	) -> terrapack_core::Result<()> {
		if table.column(from).is_none() {
			return Err(Error::column_not_found(&table.name, from));
		}
		if table.has_column(to) {
			return Err(Error::already_exists(ObjectKind::Column, to));
		}

		let columns: Vec<ColumnDef> = table
			.columns()
			.iter()
			.map(|c| {
				let mut column = c.clone();
				if column.name.eq_ignore_ascii_case(from) {
					column.name = to.to_string();
				}
				column
			})
			.collect();
		let constraints: Vec<TableConstraint> = table
			.constraints
			.iter()
			.map(|TableConstraint::Unique(names)| {
				TableConstraint::Unique(
					names
						.iter()
						.map(|n| {
							if n.eq_ignore_ascii_case(from) {
								to.to_string()
							} else {
								n.clone()
							}
						})
						.collect(),
				)
			})
			.collect();

		let mapping: Vec<(String, String)> = table
			.columns()
			.iter()
			.map(|c| {
				if c.name.eq_ignore_ascii_case(from) {
					(to.to_string(), c.name.clone())
				} else {
					(c.name.clone(), c.name.clone())
				}
			})
			.collect();

		let target = TableDef::new(table.name.clone(), table.kind, columns, constraints)?;
		RebuildPlan::prepare(engine, table, &target, &mapping)?.execute(engine)?;
		*table = target;
		Ok(())
	}

	/// Drop one or more columns. Emulated via table rebuild; remaining
	/// columns keep their values and are reindexed.
	#[instrument(name = "ddl::drop_columns", level = "debug", skip_all, fields(table = %table.name))]
	pub fn drop_columns(
		engine: &dyn Engine,
		table: &mut TableDef,
		names: &[&str],
	) -> terrapack_core::Result<()> {
		for name in names {
			if table.column(name).is_none() {
				return Err(Error::column_not_found(&table.name, *name));
			}
		}

		let dropped = |name: &str| names.iter().any(|n| n.eq_ignore_ascii_case(name));

		let columns: Vec<ColumnDef> = table
			.columns()
			.iter()
			.filter(|c| !dropped(&c.name))
			.enumerate()
			.map(|(index, c)| {
				let mut column = c.clone();
				column.index = index;
				column
			})
			.collect();
		// A unique constraint that loses one of its columns changes
		// meaning, so the whole constraint goes with the column.
		let constraints: Vec<TableConstraint> = table
			.constraints
			.iter()
			.filter(|TableConstraint::Unique(cols)| !cols.iter().any(|c| dropped(c)))
			.cloned()
			.collect();
		let mapping: Vec<(String, String)> =
			columns.iter().map(|c| (c.name.clone(), c.name.clone())).collect();

		let target = TableDef::new(table.name.clone(), table.kind, columns, constraints)?;
		RebuildPlan::prepare(engine, table, &target, &mapping)?.execute(engine)?;
		*table = target;
		Ok(())
	}

	pub fn drop_column(
		engine: &dyn Engine,
		table: &mut TableDef,
		name: &str,
	) -> terrapack_core::Result<()> {
		Self::drop_columns(engine, table, &[name])
	}

	/// Replace column definitions (type, nullability, default) in place.
	/// Emulated via table rebuild; stored values are copied across.
	#[instrument(name = "ddl::alter_columns", level = "debug", skip_all, fields(table = %table.name))]
	pub fn alter_columns(
		engine: &dyn Engine,
		table: &mut TableDef,
		replacements: Vec<ColumnDef>,
	) -> terrapack_core::Result<()> {
		let mut columns: Vec<ColumnDef> = table.columns().to_vec();
		for replacement in replacements {
			let Some(position) =
				columns.iter().position(|c| c.name.eq_ignore_ascii_case(&replacement.name))
			else {
				return Err(Error::column_not_found(&table.name, &replacement.name));
			};
			let mut replacement = replacement;
			replacement.index = position;
			columns[position] = replacement;
		}
		let mapping: Vec<(String, String)> =
			columns.iter().map(|c| (c.name.clone(), c.name.clone())).collect();

		let target =
			TableDef::new(table.name.clone(), table.kind, columns, table.constraints.clone())?;
		RebuildPlan::prepare(engine, table, &target, &mapping)?.execute(engine)?;
		*table = target;
		Ok(())
	}

	pub fn alter_column(
		engine: &dyn Engine,
		table: &mut TableDef,
		replacement: ColumnDef,
	) -> terrapack_core::Result<()> {
		Self::alter_columns(engine, table, vec![replacement])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::table::TableKind;
	use crate::test_utils::{memory_engine, sample_table};
	use terrapack_core::Rows;
	use terrapack_type::{DataType, Value};

	fn rows(engine: &dyn Engine, sql: &str) -> Rows {
		engine.query(sql, &[]).unwrap()
	}

	#[test]
	fn test_create_then_create_fails() {
		let engine = memory_engine();
		let table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		let err = Ddl::create_table(&engine, &table).unwrap_err();
		assert!(matches!(err, Error::AlreadyExists { .. }));
	}

	#[test]
	fn test_drop_table_idempotent() {
		let engine = memory_engine();
		let table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		Ddl::drop_table(&engine, "t").unwrap();
		// second drop is a no-op
		Ddl::drop_table(&engine, "t").unwrap();
		assert!(!engine.table_exists("t").unwrap());
	}

	#[test]
	fn test_add_column() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();

		let column = ColumnDef::new(table.columns().len(), "label", DataType::Text)
			.with_default("none");
		Ddl::add_column(&engine, &mut table, column).unwrap();

		assert!(table.has_column("label"));
		engine.execute("INSERT INTO t (name, score) VALUES ('a', 1.0)", &[]).unwrap();
		let result = rows(&engine, "SELECT label FROM t");
		assert_eq!(result.rows[0][0], Value::Text("none".into()));
	}

	#[test]
	fn test_add_column_failure_leaves_model_untouched() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		// physical table missing on purpose: the ALTER fails
		let column = ColumnDef::new(table.columns().len(), "label", DataType::Text);
		let err = Ddl::add_column(&engine, &mut table, column).unwrap_err();
		assert!(matches!(err, Error::Engine { .. }));
		assert!(!table.has_column("label"));
	}

	#[test]
	fn test_rename_column_preserves_values() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		engine.execute("INSERT INTO t (name, score) VALUES ('a', 1.5)", &[]).unwrap();
		engine.execute("INSERT INTO t (name, score) VALUES ('b', 2.5)", &[]).unwrap();

		Ddl::rename_column(&engine, &mut table, "name", "title").unwrap();

		assert!(table.has_column("title"));
		assert!(!table.has_column("name"));
		let result = rows(&engine, "SELECT title, score FROM t ORDER BY id");
		assert_eq!(
			result.rows,
			vec![
				vec![Value::Text("a".into()), Value::Real(1.5)],
				vec![Value::Text("b".into()), Value::Real(2.5)],
			]
		);
	}

	#[test]
	fn test_rename_column_missing() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		let err = Ddl::rename_column(&engine, &mut table, "missing", "x").unwrap_err();
		assert!(matches!(err, Error::NotFound { .. }));
	}

	#[test]
	fn test_drop_column_keeps_other_values() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		engine.execute("INSERT INTO t (name, score) VALUES ('a', 1.5)", &[]).unwrap();

		Ddl::drop_column(&engine, &mut table, "score").unwrap();

		assert!(!table.has_column("score"));
		assert_eq!(table.column("name").unwrap().index, 1);
		let result = rows(&engine, "SELECT id, name FROM t");
		assert_eq!(result.rows, vec![vec![Value::Integer(1), Value::Text("a".into())]]);
	}

	#[test]
	fn test_drop_column_recreates_surviving_index() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		engine.execute("CREATE INDEX t_name ON t (name)", &[]).unwrap();
		engine.execute("CREATE INDEX t_score ON t (score)", &[]).unwrap();

		Ddl::drop_column(&engine, &mut table, "score").unwrap();

		let names = rows(
			&engine,
			"SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 't' AND sql IS NOT NULL",
		);
		assert_eq!(names.rows, vec![vec![Value::Text("t_name".into())]]);
	}

	#[test]
	fn test_alter_column_retype() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		engine.execute("INSERT INTO t (name, score) VALUES ('a', 2.0)", &[]).unwrap();

		Ddl::alter_column(&engine, &mut table, ColumnDef::new(0, "score", DataType::Text))
			.unwrap();

		assert_eq!(table.column("score").unwrap().data_type, DataType::Text);
		// value survived the rebuild copy, stored under the new affinity
		let result = rows(&engine, "SELECT score FROM t");
		assert_eq!(result.rows[0][0], Value::Text("2.0".into()));
	}

	#[test]
	fn test_rebuild_failure_rolls_back() {
		let engine = memory_engine();
		let mut table = sample_table("t");
		Ddl::create_table(&engine, &table).unwrap();
		engine.execute("INSERT INTO t (name) VALUES ('a')", &[]).unwrap();

		// score is NULL in the stored row; forcing it NOT NULL makes the
		// row copy fail mid-rebuild
		let err = Ddl::alter_column(
			&engine,
			&mut table,
			ColumnDef::new(0, "score", DataType::Double).not_null(),
		)
		.unwrap_err();
		assert!(matches!(err, Error::Engine { .. }));

		// original table, row count and values unchanged; no temp table
		assert!(table.column("score").unwrap().nullable);
		let result = rows(&engine, "SELECT name, score FROM t");
		assert_eq!(result.rows, vec![vec![Value::Text("a".into()), Value::Null]]);
		assert!(!engine.table_exists("t_migration").unwrap());
	}

	#[test]
	fn test_drop_required_tile_column_rejected() {
		let engine = memory_engine();
		let mut table = TableDef::tile("tiles").unwrap();
		Ddl::create_table(&engine, &table).unwrap();
		let err = Ddl::drop_column(&engine, &mut table, "zoom_level").unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));
		// physical table untouched
		assert!(engine.table_exists("tiles").unwrap());
		assert!(table.has_column("zoom_level"));
	}

	#[test]
	fn test_rename_updates_unique_constraint() {
		let engine = memory_engine();
		let mut table = TableDef::new(
			"t",
			TableKind::UserDefined,
			vec![
				ColumnDef::primary_key(0, "id"),
				ColumnDef::new(1, "a", DataType::Int),
			],
			vec![TableConstraint::Unique(vec!["a".into()])],
		)
		.unwrap();
		Ddl::create_table(&engine, &table).unwrap();

		Ddl::rename_column(&engine, &mut table, "a", "b").unwrap();
		assert_eq!(table.constraints, vec![TableConstraint::Unique(vec!["b".into()])]);

		engine.execute("INSERT INTO t (b) VALUES (1)", &[]).unwrap();
		assert!(engine.execute("INSERT INTO t (b) VALUES (1)", &[]).is_err());
	}
}
