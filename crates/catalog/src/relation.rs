// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind};
use terrapack_type::Value;

use crate::extension::{Extension, ExtensionScope};
use crate::{Catalog, schema};

pub const RELATED_TABLES_EXTENSION: &str = "trk_related_tables";

/// One row of the related-tables registry: a named link from a base
/// table to a related table, resolved through a mapping table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedRelation {
	pub id: Option<i64>,
	pub base_table_name: String,
	pub base_primary_column: String,
	pub related_table_name: String,
	pub related_primary_column: String,
	pub relation_name: String,
	pub mapping_table_name: String,
}

impl ExtendedRelation {
	pub fn new(
		base: impl Into<String>,
		related: impl Into<String>,
		relation_name: impl Into<String>,
		mapping_table: impl Into<String>,
	) -> ExtendedRelation {
		ExtendedRelation {
			id: None,
			base_table_name: base.into(),
			base_primary_column: "id".to_string(),
			related_table_name: related.into(),
			related_primary_column: "id".to_string(),
			relation_name: relation_name.into(),
			mapping_table_name: mapping_table.into(),
		}
	}
}

const SELECT: &str = "SELECT id, base_table_name, base_primary_column, related_table_name, \
	 related_primary_column, relation_name, mapping_table_name FROM trk_extended_relations";

fn from_row(row: &[Value]) -> ExtendedRelation {
	ExtendedRelation {
		id: row[0].as_integer(),
		base_table_name: row[1].as_text().unwrap_or_default().to_string(),
		base_primary_column: row[2].as_text().unwrap_or_default().to_string(),
		related_table_name: row[3].as_text().unwrap_or_default().to_string(),
		related_primary_column: row[4].as_text().unwrap_or_default().to_string(),
		relation_name: row[5].as_text().unwrap_or_default().to_string(),
		mapping_table_name: row[6].as_text().unwrap_or_default().to_string(),
	}
}

impl Catalog {
	/// Register a relation. The mapping table must already exist; its
	/// extension row is written alongside so readers can discover the
	/// mapping by name.
	#[tracing::instrument(name = "catalog::create_relation", level = "trace", skip_all, fields(relation = relation.relation_name))]
	pub fn create_relation(
		engine: &dyn Engine,
		relation: &ExtendedRelation,
	) -> terrapack_core::Result<i64> {
		if !engine.table_exists(&relation.mapping_table_name)? {
			return Err(Error::table_not_found(relation.mapping_table_name.clone()));
		}
		engine.execute(
			"INSERT INTO trk_extended_relations (base_table_name, base_primary_column, \
			 related_table_name, related_primary_column, relation_name, \
			 mapping_table_name) VALUES (?, ?, ?, ?, ?, ?)",
			&[
				Value::from(relation.base_table_name.as_str()),
				Value::from(relation.base_primary_column.as_str()),
				Value::from(relation.related_table_name.as_str()),
				Value::from(relation.related_primary_column.as_str()),
				Value::from(relation.relation_name.as_str()),
				Value::from(relation.mapping_table_name.as_str()),
			],
		)?;
		let id = engine.last_insert_id()?;
		Catalog::register_extension(
			engine,
			&Extension::for_table(
				relation.mapping_table_name.clone(),
				RELATED_TABLES_EXTENSION,
				"related tables mapping",
				ExtensionScope::ReadWrite,
			),
		)?;
		Ok(id)
	}

	pub fn list_relations(engine: &dyn Engine) -> terrapack_core::Result<Vec<ExtendedRelation>> {
		if !engine.table_exists(schema::EXTENDED_RELATIONS)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(&format!("{} ORDER BY id", SELECT), &[])?;
		Ok(rows.rows.iter().map(|row| from_row(row)).collect())
	}

	pub fn relations_for_base(
		engine: &dyn Engine,
		base: &str,
	) -> terrapack_core::Result<Vec<ExtendedRelation>> {
		if !engine.table_exists(schema::EXTENDED_RELATIONS)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(
			&format!("{} WHERE base_table_name = ? ORDER BY id", SELECT),
			&[Value::from(base)],
		)?;
		Ok(rows.rows.iter().map(|row| from_row(row)).collect())
	}

	pub fn drop_relation(engine: &dyn Engine, id: i64) -> terrapack_core::Result<()> {
		let affected = engine.execute(
			"DELETE FROM trk_extended_relations WHERE id = ?",
			&[Value::from(id)],
		)?;
		if affected == 0 {
			return Err(Error::NotFound {
				kind: ObjectKind::Relation,
				name: id.to_string(),
				table: None,
			});
		}
		Ok(())
	}

	/// Relations touching `table` on any side, mapping table included.
	pub(crate) fn relations_for_table(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Vec<ExtendedRelation>> {
		if !engine.table_exists(schema::EXTENDED_RELATIONS)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(
			&format!(
				"{} WHERE base_table_name = ? OR related_table_name = ? \
				 OR mapping_table_name = ? ORDER BY id",
				SELECT
			),
			&[Value::from(table), Value::from(table), Value::from(table)],
		)?;
		Ok(rows.rows.iter().map(|row| from_row(row)).collect())
	}

	/// Forget every relation touching `table`, whichever side it sits on.
	/// Mapping tables themselves are left for the lifecycle controller.
	pub(crate) fn drop_relations_for_table(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<usize> {
		if !engine.table_exists(schema::EXTENDED_RELATIONS)? {
			return Ok(0);
		}
		engine.execute(
			"DELETE FROM trk_extended_relations WHERE base_table_name = ? \
			 OR related_table_name = ? OR mapping_table_name = ?",
			&[Value::from(table), Value::from(table), Value::from(table)],
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::base_engine;

	fn relation_engine() -> terrapack_core::SqliteEngine {
		let engine = base_engine();
		schema::create_extended_relations(&engine).unwrap();
		engine
	}

	#[test]
	fn test_create_requires_mapping_table() {
		let engine = relation_engine();
		let relation = ExtendedRelation::new("roads", "photos", "media", "roads_photos");
		let err = Catalog::create_relation(&engine, &relation).unwrap_err();
		assert!(matches!(err, Error::NotFound { kind: ObjectKind::Table, .. }));
	}

	#[test]
	fn test_create_registers_mapping_extension() {
		let engine = relation_engine();
		engine
			.execute(
				"CREATE TABLE roads_photos (base_id INTEGER NOT NULL, related_id INTEGER NOT NULL)",
				&[],
			)
			.unwrap();
		let relation = ExtendedRelation::new("roads", "photos", "media", "roads_photos");
		let id = Catalog::create_relation(&engine, &relation).unwrap();

		let stored = Catalog::relations_for_base(&engine, "roads").unwrap();
		assert_eq!(stored.len(), 1);
		assert_eq!(stored[0].id, Some(id));
		assert_eq!(stored[0].mapping_table_name, "roads_photos");

		let exts = Catalog::extensions_for_table(&engine, "roads_photos").unwrap();
		assert_eq!(exts.len(), 1);
		assert_eq!(exts[0].extension_name, RELATED_TABLES_EXTENSION);

		Catalog::drop_relation(&engine, id).unwrap();
		assert!(Catalog::list_relations(&engine).unwrap().is_empty());
	}

	#[test]
	fn test_drop_relations_for_either_side() {
		let engine = relation_engine();
		for mapping in ["roads_photos", "photos_roads"] {
			engine
				.execute(
					&format!("CREATE TABLE {} (base_id INTEGER, related_id INTEGER)", mapping),
					&[],
				)
				.unwrap();
		}
		Catalog::create_relation(
			&engine,
			&ExtendedRelation::new("roads", "photos", "media", "roads_photos"),
		)
		.unwrap();
		Catalog::create_relation(
			&engine,
			&ExtendedRelation::new("photos", "roads", "media", "photos_roads"),
		)
		.unwrap();

		assert_eq!(Catalog::drop_relations_for_table(&engine, "roads").unwrap(), 2);
		assert!(Catalog::list_relations(&engine).unwrap().is_empty());
	}
}
