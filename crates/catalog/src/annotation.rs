// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind, atomic};
use terrapack_type::Value;

use crate::extension::{Extension, ExtensionScope};
use crate::{Catalog, schema};

pub const SEMANTIC_ANNOTATIONS_EXTENSION: &str = "trk_semantic_annotations";

/// A reusable semantic tag: a typed, titled annotation that rows of any
/// tracked table can point at through the reference registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticAnnotation {
	pub id: Option<i64>,
	pub annotation_type: String,
	pub title: String,
	pub description: Option<String>,
	pub uri: String,
}

impl SemanticAnnotation {
	pub fn new(
		annotation_type: impl Into<String>,
		title: impl Into<String>,
		uri: impl Into<String>,
	) -> SemanticAnnotation {
		SemanticAnnotation {
			id: None,
			annotation_type: annotation_type.into(),
			title: title.into(),
			description: None,
			uri: uri.into(),
		}
	}
}

/// Binds one row of a user table to an annotation, addressed by the
/// value of a key column.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticAnnotationReference {
	pub table_name: String,
	pub key_column_name: String,
	pub key_value: i64,
	pub sa_id: i64,
}

impl SemanticAnnotationReference {
	pub fn new(table: impl Into<String>, key_value: i64, sa_id: i64) -> SemanticAnnotationReference {
		SemanticAnnotationReference {
			table_name: table.into(),
			key_column_name: "id".to_string(),
			key_value,
			sa_id,
		}
	}

	pub fn with_key_column(mut self, column: impl Into<String>) -> SemanticAnnotationReference {
		self.key_column_name = column.into();
		self
	}
}

const SELECT: &str =
	"SELECT id, type, title, description, uri FROM trk_semantic_annotations";

fn from_row(row: &[Value]) -> SemanticAnnotation {
	SemanticAnnotation {
		id: row[0].as_integer(),
		annotation_type: row[1].as_text().unwrap_or_default().to_string(),
		title: row[2].as_text().unwrap_or_default().to_string(),
		description: row[3].as_text().map(str::to_string),
		uri: row[4].as_text().unwrap_or_default().to_string(),
	}
}

impl Catalog {
	/// Create the annotation registries and record the extension rows
	/// that advertise them. Idempotent, like the other `ensure_*` calls.
	pub fn ensure_semantic_annotations(engine: &dyn Engine) -> terrapack_core::Result<()> {
		schema::create_semantic_annotations(engine)?;
		schema::create_semantic_annotation_reference(engine)?;
		for table in [schema::SEMANTIC_ANNOTATIONS, schema::SEMANTIC_ANNOTATION_REFERENCE] {
			Catalog::register_extension(
				engine,
				&Extension::for_table(
					table,
					SEMANTIC_ANNOTATIONS_EXTENSION,
					"semantic annotations",
					ExtensionScope::ReadWrite,
				),
			)?;
		}
		Ok(())
	}

	/// Whether the container carries the annotation registries, judged
	/// from both the extension rows and the tables themselves.
	pub fn has_semantic_annotations(engine: &dyn Engine) -> terrapack_core::Result<bool> {
		Ok(Catalog::has_extension(engine, SEMANTIC_ANNOTATIONS_EXTENSION)?
			&& engine.table_exists(schema::SEMANTIC_ANNOTATIONS)?
			&& engine.table_exists(schema::SEMANTIC_ANNOTATION_REFERENCE)?)
	}

	#[tracing::instrument(name = "catalog::create_annotation", level = "trace", skip_all, fields(title = annotation.title))]
	pub fn create_annotation(
		engine: &dyn Engine,
		annotation: &SemanticAnnotation,
	) -> terrapack_core::Result<i64> {
		engine.execute(
			"INSERT INTO trk_semantic_annotations (type, title, description, uri) \
			 VALUES (?, ?, ?, ?)",
			&[
				Value::from(annotation.annotation_type.as_str()),
				Value::from(annotation.title.as_str()),
				Value::from(annotation.description.clone()),
				Value::from(annotation.uri.as_str()),
			],
		)?;
		engine.last_insert_id()
	}

	pub fn find_annotation(
		engine: &dyn Engine,
		id: i64,
	) -> terrapack_core::Result<Option<SemanticAnnotation>> {
		if !engine.table_exists(schema::SEMANTIC_ANNOTATIONS)? {
			return Ok(None);
		}
		let rows = engine.query(&format!("{} WHERE id = ?", SELECT), &[Value::from(id)])?;
		Ok(rows.rows.first().map(|row| from_row(row)))
	}

	pub fn list_annotations(
		engine: &dyn Engine,
	) -> terrapack_core::Result<Vec<SemanticAnnotation>> {
		if !engine.table_exists(schema::SEMANTIC_ANNOTATIONS)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(&format!("{} ORDER BY id", SELECT), &[])?;
		Ok(rows.rows.iter().map(|row| from_row(row)).collect())
	}

	/// Bind a row of a user table to an annotation. Both sides must
	/// exist: the annotation row and the table the reference points into.
	#[tracing::instrument(name = "catalog::create_annotation_reference", level = "trace", skip_all, fields(table = reference.table_name))]
	pub fn create_annotation_reference(
		engine: &dyn Engine,
		reference: &SemanticAnnotationReference,
	) -> terrapack_core::Result<()> {
		if !engine.table_exists(&reference.table_name)? {
			return Err(Error::table_not_found(reference.table_name.clone()));
		}
		if Catalog::find_annotation(engine, reference.sa_id)?.is_none() {
			return Err(Error::NotFound {
				kind: ObjectKind::Annotation,
				name: reference.sa_id.to_string(),
				table: Some(reference.table_name.clone()),
			});
		}
		engine.execute(
			"INSERT INTO trk_sa_reference (table_name, key_column_name, key_value, sa_id) \
			 VALUES (?, ?, ?, ?)",
			&[
				Value::from(reference.table_name.as_str()),
				Value::from(reference.key_column_name.as_str()),
				Value::from(reference.key_value),
				Value::from(reference.sa_id),
			],
		)?;
		Ok(())
	}

	/// Every annotation referenced from `table`, deduplicated by the
	/// annotation row, in id order.
	pub fn annotations_for_table(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Vec<SemanticAnnotation>> {
		if !engine.table_exists(schema::SEMANTIC_ANNOTATION_REFERENCE)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(
			"SELECT DISTINCT a.id, a.type, a.title, a.description, a.uri \
			 FROM trk_semantic_annotations a \
			 JOIN trk_sa_reference r ON r.sa_id = a.id \
			 WHERE r.table_name = ? ORDER BY a.id",
			&[Value::from(table)],
		)?;
		Ok(rows.rows.iter().map(|row| from_row(row)).collect())
	}

	pub fn references_for_annotation(
		engine: &dyn Engine,
		sa_id: i64,
	) -> terrapack_core::Result<Vec<SemanticAnnotationReference>> {
		if !engine.table_exists(schema::SEMANTIC_ANNOTATION_REFERENCE)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(
			"SELECT table_name, key_column_name, key_value, sa_id \
			 FROM trk_sa_reference WHERE sa_id = ? ORDER BY table_name, key_value",
			&[Value::from(sa_id)],
		)?;
		Ok(rows
			.rows
			.iter()
			.map(|row| SemanticAnnotationReference {
				table_name: row[0].as_text().unwrap_or_default().to_string(),
				key_column_name: row[1].as_text().unwrap_or_default().to_string(),
				key_value: row[2].as_integer().unwrap_or_default(),
				sa_id: row[3].as_integer().unwrap_or_default(),
			})
			.collect())
	}

	/// Remove an annotation and every reference pointing at it, in one
	/// scope.
	pub fn delete_annotation(engine: &dyn Engine, id: i64) -> terrapack_core::Result<bool> {
		atomic(engine, |engine| {
			engine.execute(
				"DELETE FROM trk_sa_reference WHERE sa_id = ?",
				&[Value::from(id)],
			)?;
			let affected = engine.execute(
				"DELETE FROM trk_semantic_annotations WHERE id = ?",
				&[Value::from(id)],
			)?;
			Ok(affected > 0)
		})
	}

	/// Forget every reference into `table`. Cascade cleanup calls this
	/// so no reference outlives the table it points into; the annotation
	/// rows themselves stay, they may be referenced elsewhere.
	pub(crate) fn drop_annotation_references_for_table(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<usize> {
		if !engine.table_exists(schema::SEMANTIC_ANNOTATION_REFERENCE)? {
			return Ok(0);
		}
		engine.execute(
			"DELETE FROM trk_sa_reference WHERE table_name = ?",
			&[Value::from(table)],
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{base_engine, physical_table};

	fn annotation_engine() -> terrapack_core::SqliteEngine {
		let engine = base_engine();
		Catalog::ensure_semantic_annotations(&engine).unwrap();
		engine
	}

	#[test]
	fn test_ensure_is_idempotent_and_discoverable() {
		let engine = base_engine();
		assert!(!Catalog::has_semantic_annotations(&engine).unwrap());

		Catalog::ensure_semantic_annotations(&engine).unwrap();
		Catalog::ensure_semantic_annotations(&engine).unwrap();
		assert!(Catalog::has_semantic_annotations(&engine).unwrap());

		let exts = Catalog::extensions_for_table(&engine, schema::SEMANTIC_ANNOTATIONS).unwrap();
		assert_eq!(exts.len(), 1);
		assert_eq!(exts[0].extension_name, SEMANTIC_ANNOTATIONS_EXTENSION);
	}

	#[test]
	fn test_reference_requires_annotation_and_table() {
		let engine = annotation_engine();
		physical_table(&engine, "roads");

		let err = Catalog::create_annotation_reference(
			&engine,
			&SemanticAnnotationReference::new("roads", 1, 99),
		)
		.unwrap_err();
		assert!(matches!(err, Error::NotFound { .. }));

		let id = Catalog::create_annotation(
			&engine,
			&SemanticAnnotation::new("theme", "Arterial", "https://example.com/arterial"),
		)
		.unwrap();
		let err = Catalog::create_annotation_reference(
			&engine,
			&SemanticAnnotationReference::new("missing", 1, id),
		)
		.unwrap_err();
		assert!(matches!(err, Error::NotFound { kind: ObjectKind::Table, .. }));

		Catalog::create_annotation_reference(
			&engine,
			&SemanticAnnotationReference::new("roads", 1, id),
		)
		.unwrap();
	}

	#[test]
	fn test_annotations_join_by_table() {
		let engine = annotation_engine();
		physical_table(&engine, "roads");
		physical_table(&engine, "parcels");

		let arterial = Catalog::create_annotation(
			&engine,
			&SemanticAnnotation::new("theme", "Arterial", "https://example.com/arterial"),
		)
		.unwrap();
		let zoned = Catalog::create_annotation(
			&engine,
			&SemanticAnnotation::new("zoning", "Residential", "https://example.com/residential"),
		)
		.unwrap();

		for key in [1, 2] {
			Catalog::create_annotation_reference(
				&engine,
				&SemanticAnnotationReference::new("roads", key, arterial),
			)
			.unwrap();
		}
		Catalog::create_annotation_reference(
			&engine,
			&SemanticAnnotationReference::new("parcels", 7, zoned),
		)
		.unwrap();

		let tagged = Catalog::annotations_for_table(&engine, "roads").unwrap();
		assert_eq!(tagged.len(), 1);
		assert_eq!(tagged[0].title, "Arterial");
		assert_eq!(Catalog::references_for_annotation(&engine, arterial).unwrap().len(), 2);
	}

	#[test]
	fn test_delete_annotation_removes_references() {
		let engine = annotation_engine();
		physical_table(&engine, "roads");
		let id = Catalog::create_annotation(
			&engine,
			&SemanticAnnotation::new("theme", "Arterial", "https://example.com/arterial"),
		)
		.unwrap();
		Catalog::create_annotation_reference(
			&engine,
			&SemanticAnnotationReference::new("roads", 1, id),
		)
		.unwrap();

		assert!(Catalog::delete_annotation(&engine, id).unwrap());
		assert!(Catalog::find_annotation(&engine, id).unwrap().is_none());
		assert!(Catalog::references_for_annotation(&engine, id).unwrap().is_empty());
		assert!(!Catalog::delete_annotation(&engine, id).unwrap());
	}
}
