// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::Engine;
use terrapack_type::Value;

use crate::contents::{Contents, ContentsType};
use crate::{Catalog, contents};

impl Catalog {
	pub fn list_contents(engine: &dyn Engine) -> terrapack_core::Result<Vec<Contents>> {
		let rows = engine.query(&format!("{} ORDER BY table_name", contents::SELECT), &[])?;
		Ok(rows.rows.iter().map(|row| contents::from_row(row)).collect())
	}

	/// Names of every tracked table, in registry order.
	pub fn tables(engine: &dyn Engine) -> terrapack_core::Result<Vec<String>> {
		let rows = engine.query(
			"SELECT table_name FROM trk_contents ORDER BY table_name",
			&[],
		)?;
		Ok(rows
			.rows
			.iter()
			.filter_map(|row| row[0].as_text().map(str::to_string))
			.collect())
	}

	pub fn tables_of_type(
		engine: &dyn Engine,
		data_type: &ContentsType,
	) -> terrapack_core::Result<Vec<String>> {
		let rows = engine.query(
			"SELECT table_name FROM trk_contents WHERE data_type = ? ORDER BY table_name",
			&[Value::from(data_type.name())],
		)?;
		Ok(rows
			.rows
			.iter()
			.filter_map(|row| row[0].as_text().map(str::to_string))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use crate::contents::ContentsType;
	use crate::test_utils::{full_engine, physical_table};
	use crate::{Catalog, Contents};

	#[test]
	fn test_listing_filters_by_type() {
		let engine = full_engine();
		for (name, ty) in [
			("roads", ContentsType::Features),
			("basemap", ContentsType::Tiles),
			("owners", ContentsType::Attributes),
			("parcels", ContentsType::Features),
		] {
			physical_table(&engine, name);
			Catalog::create_contents(&engine, &Contents::new(name, ty)).unwrap();
		}

		assert_eq!(Catalog::list_contents(&engine).unwrap().len(), 4);
		assert_eq!(
			Catalog::tables(&engine).unwrap(),
			vec!["basemap", "owners", "parcels", "roads"]
		);
		assert_eq!(
			Catalog::tables_of_type(&engine, &ContentsType::Features).unwrap(),
			vec!["parcels", "roads"]
		);
		assert!(
			Catalog::tables_of_type(&engine, &ContentsType::GriddedCoverage)
				.unwrap()
				.is_empty()
		);
	}
}
