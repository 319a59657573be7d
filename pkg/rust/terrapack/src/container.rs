// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::path::Path;

use terrapack_catalog::contents::{Contents, ContentsType};
use terrapack_catalog::{Catalog, TableState, schema};
use terrapack_core::{Engine, ExtentTransform, SqliteEngine};
use terrapack_schema::{RowStore, TableDef};
use terrapack_type::Extent;

/// An open container: one engine connection with the base catalog tables
/// in place. Everything else goes through [`Catalog`] and [`RowStore`]
/// with the engine this holds.
pub struct Terrapack {
	engine: SqliteEngine,
}

impl Terrapack {
	/// Open or create a container file. The base catalog tables and the
	/// default reference systems are created on first open.
	#[tracing::instrument(name = "terrapack::open", level = "debug", skip_all)]
	pub fn open(path: impl AsRef<Path>) -> terrapack_core::Result<Terrapack> {
		let engine = SqliteEngine::open(path)?;
		schema::create_base(&engine)?;
		Ok(Terrapack { engine })
	}

	/// In-memory container, mostly for tests and scratch work.
	pub fn memory() -> terrapack_core::Result<Terrapack> {
		let engine = SqliteEngine::memory()?;
		schema::create_base(&engine)?;
		Ok(Terrapack { engine })
	}

	pub fn engine(&self) -> &dyn Engine {
		&self.engine
	}

	/// Create and register a table of any contents type. Companion
	/// registries the type needs are created alongside.
	pub fn create_table(
		&self,
		table: &TableDef,
		contents: &Contents,
	) -> terrapack_core::Result<()> {
		Catalog::register(&self.engine, table, contents)
	}

	/// Remove a table and everything the catalog knows about it.
	pub fn drop_table(&self, table: &str) -> terrapack_core::Result<bool> {
		Catalog::delete_table(&self.engine, table)
	}

	pub fn tables(&self) -> terrapack_core::Result<Vec<String>> {
		Catalog::tables(&self.engine)
	}

	pub fn tables_of_type(&self, data_type: &ContentsType) -> terrapack_core::Result<Vec<String>> {
		Catalog::tables_of_type(&self.engine, data_type)
	}

	pub fn table_state(&self, table: &str) -> terrapack_core::Result<TableState> {
		Catalog::table_state(&self.engine, table)
	}

	/// Row access to a table through its model.
	pub fn store<'a>(&'a self, table: &'a TableDef) -> RowStore<'a> {
		RowStore::new(&self.engine, table)
	}

	/// Companion registries for feature tables.
	pub fn ensure_feature_support(&self) -> terrapack_core::Result<()> {
		Catalog::ensure_support(&self.engine, &ContentsType::Features)
	}

	/// Companion registries for tile-pyramid tables.
	pub fn ensure_tile_support(&self) -> terrapack_core::Result<()> {
		Catalog::ensure_support(&self.engine, &ContentsType::Tiles)
	}

	/// Companion registries for related-tables links.
	pub fn ensure_related_tables(&self) -> terrapack_core::Result<()> {
		schema::create_extended_relations(&self.engine)?;
		Ok(())
	}

	/// Switch on the semantic annotations registries.
	pub fn ensure_semantic_annotations(&self) -> terrapack_core::Result<()> {
		Catalog::ensure_semantic_annotations(&self.engine)
	}

	/// Union of every registered extent, reprojected when a target
	/// reference system is given.
	pub fn bounds(
		&self,
		transform: &dyn ExtentTransform,
		target_srs: Option<i64>,
	) -> terrapack_core::Result<Option<Extent>> {
		Catalog::contents_bounds(&self.engine, transform, target_srs)
	}
}

#[cfg(test)]
mod tests {
	use terrapack_catalog::test_utils::{attribute_contents, attribute_table, feature_fixture};
	use terrapack_core::IdentityTransform;
	use terrapack_schema::Row;
	use terrapack_type::{Extent, Value};

	use super::*;

	#[test]
	fn test_open_bootstraps_catalog() {
		let container = Terrapack::memory().unwrap();
		assert!(container.engine().table_exists("trk_contents").unwrap());
		assert!(container.engine().table_exists("trk_spatial_ref_sys").unwrap());
		assert!(container.tables().unwrap().is_empty());
	}

	#[test]
	fn test_table_round_trip() {
		let container = Terrapack::memory().unwrap();
		let table = attribute_table("owners");
		container.create_table(&table, &attribute_contents("owners")).unwrap();
		assert_eq!(container.table_state("owners").unwrap(), TableState::Registered);

		let store = container.store(&table);
		let mut row = Row::new();
		row.set("name", Value::from("alice"));
		let id = store.insert(&row).unwrap();
		assert_eq!(store.count(None).unwrap(), 1);
		store.delete_by_id(id).unwrap();
		assert_eq!(store.count(None).unwrap(), 0);

		assert!(container.drop_table("owners").unwrap());
		assert_eq!(container.table_state("owners").unwrap(), TableState::Absent);
	}

	#[test]
	fn test_bounds_across_tables() {
		let container = Terrapack::memory().unwrap();
		container.ensure_feature_support().unwrap();
		let (table, contents) = feature_fixture("roads");
		let contents = contents.with_extent(Extent::new(0.0, 0.0, 4.0, 4.0));
		container.create_table(&table, &contents).unwrap();

		let bounds = container.bounds(&IdentityTransform, None).unwrap();
		assert_eq!(bounds, Some(Extent::new(0.0, 0.0, 4.0, 4.0)));
	}
}
