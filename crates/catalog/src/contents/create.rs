// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind};
use terrapack_type::Value;

use crate::{Catalog, contents::Contents};

impl Catalog {
	/// Register a table in the contents registry. Admission control lives
	/// here: duplicates are rejected, the companion registries the
	/// contents type needs must exist, and the physical table must
	/// already have been created.
	#[tracing::instrument(name = "catalog::create_contents", level = "trace", skip_all, fields(table = contents.table_name))]
	pub fn create_contents(engine: &dyn Engine, contents: &Contents) -> terrapack_core::Result<()> {
		if Catalog::find_contents_raw(engine, &contents.table_name)?.is_some() {
			return Err(Error::already_exists(
				ObjectKind::Contents,
				contents.table_name.clone(),
			));
		}
		Catalog::verify_create(engine, &contents.table_name, &contents.data_type)?;
		if !engine.table_exists(&contents.table_name)? {
			return Err(Error::schema_violation(
				&contents.table_name,
				"table must be created before it can be registered",
			));
		}
		if let Some(srs_id) = contents.srs_id {
			if Catalog::find_srs(engine, srs_id)?.is_none() {
				return Err(Error::NotFound {
					kind: ObjectKind::Srs,
					name: srs_id.to_string(),
					table: Some(contents.table_name.clone()),
				});
			}
		}

		let (min_x, min_y, max_x, max_y) = match contents.extent {
			Some(e) => (
				Value::from(e.min_x),
				Value::from(e.min_y),
				Value::from(e.max_x),
				Value::from(e.max_y),
			),
			None => (Value::Null, Value::Null, Value::Null, Value::Null),
		};

		// Omitting last_change lets the column default stamp the row.
		match &contents.last_change {
			Some(last_change) => engine.execute(
				"INSERT INTO trk_contents (table_name, data_type, identifier, \
				 description, last_change, min_x, min_y, max_x, max_y, srs_id) \
				 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
				&[
					Value::from(contents.table_name.as_str()),
					Value::from(contents.data_type.name()),
					Value::from(contents.identifier.clone()),
					Value::from(contents.description.clone()),
					Value::from(last_change.as_str()),
					min_x,
					min_y,
					max_x,
					max_y,
					Value::from(contents.srs_id),
				],
			)?,
			None => engine.execute(
				"INSERT INTO trk_contents (table_name, data_type, identifier, \
				 description, min_x, min_y, max_x, max_y, srs_id) \
				 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
				&[
					Value::from(contents.table_name.as_str()),
					Value::from(contents.data_type.name()),
					Value::from(contents.identifier.clone()),
					Value::from(contents.description.clone()),
					min_x,
					min_y,
					max_x,
					max_y,
					Value::from(contents.srs_id),
				],
			)?,
		};
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use terrapack_core::Error;
	use terrapack_type::Extent;

	use crate::contents::ContentsType;
	use crate::test_utils::{base_engine, full_engine, physical_table};
	use crate::{Catalog, Contents, schema};

	#[test]
	fn test_create_and_default_timestamp() {
		let engine = full_engine();
		physical_table(&engine, "roads");
		let contents = Contents::new("roads", ContentsType::Features)
			.with_srs(4326)
			.with_extent(Extent::new(-10.0, -10.0, 10.0, 10.0));
		Catalog::create_contents(&engine, &contents).unwrap();

		let stored = Catalog::find_contents_raw(&engine, "roads").unwrap().unwrap();
		assert_eq!(stored.data_type, ContentsType::Features);
		assert_eq!(stored.srs_id, Some(4326));
		assert_eq!(stored.extent, Some(Extent::new(-10.0, -10.0, 10.0, 10.0)));
		// Stamped by the column default on insert.
		let last_change = stored.last_change.unwrap();
		assert!(last_change.ends_with('Z'), "{}", last_change);
	}

	#[test]
	fn test_duplicate_registration_rejected() {
		let engine = base_engine();
		physical_table(&engine, "roads");
		let contents = Contents::new("roads", ContentsType::Attributes);
		Catalog::create_contents(&engine, &contents).unwrap();
		let err = Catalog::create_contents(&engine, &contents).unwrap_err();
		assert!(matches!(err, Error::AlreadyExists { .. }));
	}

	#[test]
	fn test_unknown_srs_rejected() {
		let engine = full_engine();
		physical_table(&engine, "roads");
		let contents = Contents::new("roads", ContentsType::Features).with_srs(99999);
		let err = Catalog::create_contents(&engine, &contents).unwrap_err();
		assert!(matches!(err, Error::NotFound { .. }));
	}

	#[test]
	fn test_feature_row_requires_registry_and_table() {
		let engine = base_engine();
		let contents = Contents::new("roads", ContentsType::Features);

		// No geometry columns registry yet.
		let err = Catalog::create_contents(&engine, &contents).unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));

		// Registry in place, but the physical table is still missing.
		schema::create_geometry_columns(&engine).unwrap();
		let err = Catalog::create_contents(&engine, &contents).unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));

		physical_table(&engine, "roads");
		Catalog::create_contents(&engine, &contents).unwrap();
	}
}
