// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error};
use terrapack_type::Value;

use crate::{Catalog, contents};

impl Catalog {
	/// Look up a contents row and verify the physical table it describes
	/// still exists. A registration whose table has gone missing is a
	/// corrupt container, surfaced as a schema violation rather than a
	/// plain miss.
	pub fn find_contents(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Option<contents::Contents>> {
		let Some(row) = Catalog::find_contents_raw(engine, table)? else {
			return Ok(None);
		};
		if !engine.table_exists(table)? {
			return Err(Error::schema_violation(
				table,
				"registered in the contents registry but the table does not exist",
			));
		}
		Ok(Some(row))
	}

	/// Registry lookup without the physical-table check. Cascade cleanup
	/// reads through this so it can repair exactly the corrupt state
	/// `find_contents` rejects.
	pub(crate) fn find_contents_raw(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Option<contents::Contents>> {
		let rows = engine.query(
			&format!("{} WHERE table_name = ?", contents::SELECT),
			&[Value::from(table)],
		)?;
		Ok(rows.rows.first().map(|row| contents::from_row(row)))
	}
}

#[cfg(test)]
mod tests {
	use terrapack_core::{Engine, Error};

	use crate::contents::ContentsType;
	use crate::test_utils::{base_engine, physical_table};
	use crate::{Catalog, Contents};

	#[test]
	fn test_find_requires_physical_table() {
		let engine = base_engine();
		physical_table(&engine, "ghost");
		Catalog::create_contents(&engine, &Contents::new("ghost", ContentsType::Attributes))
			.unwrap();
		engine.execute("DROP TABLE ghost", &[]).unwrap();

		let err = Catalog::find_contents(&engine, "ghost").unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));

		engine
			.execute("CREATE TABLE ghost (id INTEGER PRIMARY KEY)", &[])
			.unwrap();
		assert!(Catalog::find_contents(&engine, "ghost").unwrap().is_some());
	}

	#[test]
	fn test_find_missing_is_none() {
		let engine = base_engine();
		assert!(Catalog::find_contents(&engine, "nope").unwrap().is_none());
	}
}
