// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, atomic, quote, quote_join};
use terrapack_type::Value;
use tracing::debug;

use crate::ddl::render;
use crate::table::TableDef;

/// One step of a table rebuild. The whole migration is expressed as data
/// so each step can be rendered and inspected on its own; execution is a
/// plain walk over the list inside one transaction scope.
#[derive(Debug, Clone, PartialEq)]
pub enum RebuildStep {
	CreateTemp(String),
	CopyRows(String),
	DropOriginal(String),
	RenameTemp(String),
	Recreate(String),
}

impl RebuildStep {
	pub fn sql(&self) -> &str {
		match self {
			RebuildStep::CreateTemp(sql)
			| RebuildStep::CopyRows(sql)
			| RebuildStep::DropOriginal(sql)
			| RebuildStep::RenameTemp(sql)
			| RebuildStep::Recreate(sql) => sql,
		}
	}
}

/// Rebuild migration for a schema change the engine cannot express as a
/// single native statement: create a temporary table with the target
/// schema, copy every row across, drop the original, rename the
/// temporary into place and recreate surviving indexes and triggers.
#[derive(Debug)]
pub struct RebuildPlan {
	pub steps: Vec<RebuildStep>,
}

impl RebuildPlan {
	/// Prepare the step list. `mapping` pairs each target column with the
	/// source column it is copied from; source columns with no pair are
	/// dropped.
	pub fn prepare(
		engine: &dyn Engine,
		original: &TableDef,
		target: &TableDef,
		mapping: &[(String, String)],
	) -> terrapack_core::Result<RebuildPlan> {
		let temp = temp_name(engine, &target.name)?;

		let mut temp_def = target.clone();
		temp_def.name = temp.clone();
		let create_temp = render::create_table_sql(&temp_def)?;

		let target_columns: Vec<&str> = mapping.iter().map(|(t, _)| t.as_str()).collect();
		let source_columns: Vec<&str> = mapping.iter().map(|(_, s)| s.as_str()).collect();
		let copy = format!(
			"INSERT INTO {} ({}) SELECT {} FROM {}",
			quote(&temp),
			quote_join(&target_columns),
			quote_join(&source_columns),
			quote(&original.name),
		);

		let drop_original = format!("DROP TABLE {}", quote(&original.name));
		let rename_temp =
			format!("ALTER TABLE {} RENAME TO {}", quote(&temp), quote(&original.name));

		let dropped: Vec<&str> = original
			.columns()
			.iter()
			.map(|c| c.name.as_str())
			.filter(|name| !source_columns.iter().any(|s| s.eq_ignore_ascii_case(name)))
			.collect();

		let mut steps = vec![
			RebuildStep::CreateTemp(create_temp),
			RebuildStep::CopyRows(copy),
			RebuildStep::DropOriginal(drop_original),
			RebuildStep::RenameTemp(rename_temp),
		];

		// Dropping the original takes its indexes and triggers with it;
		// their creation SQL is captured up front and replayed after the
		// rename. Definitions referencing a dropped column are skipped.
		let saved = engine.query(
			"SELECT sql FROM sqlite_master \
			 WHERE tbl_name = ?1 AND type IN ('index', 'trigger') AND sql IS NOT NULL",
			&[Value::Text(original.name.clone())],
		)?;
		for row in &saved.rows {
			if let Some(Value::Text(sql)) = row.first() {
				if dropped.iter().any(|name| references_identifier(sql, name)) {
					debug!(sql, "skipping recreate of definition on dropped column");
					continue;
				}
				steps.push(RebuildStep::Recreate(sql.clone()));
			}
		}

		Ok(RebuildPlan { steps })
	}

	/// Run every step inside one transaction scope. Any failure rolls the
	/// scope back, leaving the original table and no temporary behind.
	pub fn execute(&self, engine: &dyn Engine) -> terrapack_core::Result<()> {
		atomic(engine, |engine| {
			for step in &self.steps {
				engine.execute(step.sql(), &[])?;
			}
			Ok(())
		})
	}
}

fn temp_name(engine: &dyn Engine, table: &str) -> terrapack_core::Result<String> {
	let mut temp = format!("{}_migration", table);
	while engine.table_exists(&temp)? {
		temp.push('_');
	}
	Ok(temp)
}

/// Whether `sql` mentions `identifier` as a standalone word, quoted or
/// bare. A token scan, not a parse; matches how definitions name columns.
fn references_identifier(sql: &str, identifier: &str) -> bool {
	sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
		.any(|token| token.eq_ignore_ascii_case(identifier))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::table::{TableKind, columns};
	use crate::test_utils::memory_engine;

	fn original() -> TableDef {
		TableDef::new("t", TableKind::UserDefined, columns::attribute("id"), vec![]).unwrap()
	}

	#[test]
	fn test_step_order() {
		let engine = memory_engine();
		let original = original();
		let plan = RebuildPlan::prepare(
			&engine,
			&original,
			&original,
			&[("id".to_string(), "id".to_string())],
		)
		.unwrap();

		assert!(matches!(plan.steps[0], RebuildStep::CreateTemp(_)));
		assert!(matches!(plan.steps[1], RebuildStep::CopyRows(_)));
		assert!(matches!(plan.steps[2], RebuildStep::DropOriginal(_)));
		assert!(matches!(plan.steps[3], RebuildStep::RenameTemp(_)));
		assert_eq!(plan.steps.len(), 4);

		assert_eq!(
			plan.steps[1].sql(),
			"INSERT INTO \"t_migration\" (\"id\") SELECT \"id\" FROM \"t\""
		);
	}

	#[test]
	fn test_temp_name_avoids_existing_table() {
		let engine = memory_engine();
		engine.execute("CREATE TABLE t_migration (id INTEGER)", &[]).unwrap();
		assert_eq!(temp_name(&engine, "t").unwrap(), "t_migration_");
	}

	#[test]
	fn test_references_identifier() {
		assert!(references_identifier("CREATE INDEX i ON t (score)", "score"));
		assert!(references_identifier("CREATE INDEX i ON t (\"score\")", "SCORE"));
		assert!(!references_identifier("CREATE INDEX i ON t (score_total)", "score"));
	}
}
