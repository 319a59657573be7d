// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::Error;
use terrapack_type::{DataType, GeometryType};

use crate::column::ColumnDef;

/// The four logical table kinds the container distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
	Feature,
	Tile,
	Attribute,
	UserDefined,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
	Unique(Vec<String>),
}

/// Validated table model. Constructed through [`TableDef::new`], which
/// enforces the per-kind structural requirements; afterwards only the DDL
/// engine mutates it, keeping model and physical table in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
	pub name: String,
	pub kind: TableKind,
	columns: Vec<ColumnDef>,
	pub constraints: Vec<TableConstraint>,
}

/// Required column sets for the built-in table kinds.
pub mod columns {
	use super::*;

	pub const ZOOM_LEVEL: &str = "zoom_level";
	pub const TILE_COLUMN: &str = "tile_column";
	pub const TILE_ROW: &str = "tile_row";
	pub const TILE_DATA: &str = "tile_data";

	/// The columns every tile-pyramid table must carry.
	pub fn tile(id: &str) -> Vec<ColumnDef> {
		vec![
			ColumnDef::primary_key(0, id),
			ColumnDef::new(1, ZOOM_LEVEL, DataType::Int).not_null(),
			ColumnDef::new(2, TILE_COLUMN, DataType::Int).not_null(),
			ColumnDef::new(3, TILE_ROW, DataType::Int).not_null(),
			ColumnDef::new(4, TILE_DATA, DataType::Blob).not_null(),
		]
	}

	/// Primary key plus one tagged geometry column.
	pub fn feature(id: &str, geometry: &str, subtype: GeometryType) -> Vec<ColumnDef> {
		vec![ColumnDef::primary_key(0, id), ColumnDef::geometry(1, geometry, subtype)]
	}

	pub fn attribute(id: &str) -> Vec<ColumnDef> {
		vec![ColumnDef::primary_key(0, id)]
	}
}

impl TableDef {
	pub fn new(
		name: impl Into<String>,
		kind: TableKind,
		columns: Vec<ColumnDef>,
		constraints: Vec<TableConstraint>,
	) -> terrapack_core::Result<TableDef> {
		let table = TableDef {
			name: name.into(),
			kind,
			columns,
			constraints,
		};
		table.validate()?;
		Ok(table)
	}

	/// Ready-made tile-pyramid table with the mandated unique constraint.
	pub fn tile(name: impl Into<String>) -> terrapack_core::Result<TableDef> {
		TableDef::new(
			name,
			TableKind::Tile,
			columns::tile("id"),
			vec![TableConstraint::Unique(vec![
				columns::ZOOM_LEVEL.to_string(),
				columns::TILE_COLUMN.to_string(),
				columns::TILE_ROW.to_string(),
			])],
		)
	}

	pub fn columns(&self) -> &[ColumnDef] {
		&self.columns
	}

	pub fn column(&self, name: &str) -> Option<&ColumnDef> {
		self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
	}

	pub fn column_at(&self, index: usize) -> Option<&ColumnDef> {
		self.columns.get(index)
	}

	pub fn has_column(&self, name: &str) -> bool {
		self.column(name).is_some()
	}

	pub fn pk_column(&self) -> Option<&ColumnDef> {
		self.columns.iter().find(|c| c.primary_key)
	}

	pub fn column_names(&self) -> Vec<&str> {
		self.columns.iter().map(|c| c.name.as_str()).collect()
	}

	/// Append a column after a successful physical ALTER. Only the DDL
	/// engine calls this; the column has already been checked against the
	/// model.
	pub(crate) fn push_column(&mut self, column: ColumnDef) {
		self.columns.push(column);
	}

	fn validate(&self) -> terrapack_core::Result<()> {
		if self.name.is_empty() {
			return Err(Error::schema_violation("", "table name is empty"));
		}
		if self.columns.is_empty() {
			return Err(Error::schema_violation(&self.name, "table has no columns"));
		}

		for (position, column) in self.columns.iter().enumerate() {
			if column.name.is_empty() {
				return Err(Error::schema_violation(&self.name, "column name is empty"));
			}
			if self
				.columns
				.iter()
				.filter(|c| c.name.eq_ignore_ascii_case(&column.name))
				.count() > 1
			{
				return Err(Error::column_violation(
					&self.name,
					&column.name,
					"duplicate column name",
				));
			}
			if column.index != position {
				return Err(Error::column_violation(
					&self.name,
					&column.name,
					format!("column index {} does not match position {}", column.index, position),
				));
			}
			if column.geometry.is_some() && column.data_type != DataType::Geometry {
				return Err(Error::column_violation(
					&self.name,
					&column.name,
					"geometry subtype on a non-geometry column",
				));
			}
			if column.data_type == DataType::Geometry && column.geometry.is_none() {
				return Err(Error::column_violation(
					&self.name,
					&column.name,
					"geometry column has no subtype",
				));
			}
		}

		if self.columns.iter().filter(|c| c.primary_key).count() > 1 {
			return Err(Error::schema_violation(&self.name, "more than one primary key column"));
		}
		if let Some(pk) = self.pk_column() {
			if !pk.data_type.is_integer() {
				return Err(Error::column_violation(
					&self.name,
					&pk.name,
					"primary key column must be an integer type",
				));
			}
		}

		for TableConstraint::Unique(names) in &self.constraints {
			for name in names {
				if !self.has_column(name) {
					return Err(Error::column_violation(
						&self.name,
						name,
						"unique constraint references unknown column",
					));
				}
			}
		}

		match self.kind {
			TableKind::Feature => self.validate_feature(),
			TableKind::Tile => self.validate_tile(),
			TableKind::Attribute => self.validate_attribute(),
			TableKind::UserDefined => Ok(()),
		}
	}

	fn validate_feature(&self) -> terrapack_core::Result<()> {
		self.require_pk()?;
		let geometry_columns =
			self.columns.iter().filter(|c| c.data_type == DataType::Geometry).count();
		match geometry_columns {
			0 => Err(Error::schema_violation(&self.name, "feature table has no geometry column")),
			1 => Ok(()),
			_ => Err(Error::schema_violation(
				&self.name,
				"feature table has more than one geometry column",
			)),
		}
	}

	fn validate_tile(&self) -> terrapack_core::Result<()> {
		self.require_pk()?;
		for name in [columns::ZOOM_LEVEL, columns::TILE_COLUMN, columns::TILE_ROW] {
			match self.column(name) {
				None => {
					return Err(Error::column_violation(
						&self.name,
						name,
						"required tile column is missing",
					));
				}
				Some(column) if !column.data_type.is_integer() => {
					return Err(Error::column_violation(
						&self.name,
						name,
						"tile index column must be an integer type",
					));
				}
				Some(_) => {}
			}
		}
		match self.column(columns::TILE_DATA) {
			None => {
				return Err(Error::column_violation(
					&self.name,
					columns::TILE_DATA,
					"required tile column is missing",
				));
			}
			Some(column) if !column.data_type.is_blob() => {
				return Err(Error::column_violation(
					&self.name,
					columns::TILE_DATA,
					"tile data column must be a blob type",
				));
			}
			Some(_) => {}
		}

		let has_unique = self.constraints.iter().any(|TableConstraint::Unique(names)| {
			let mut names: Vec<String> = names.iter().map(|n| n.to_ascii_lowercase()).collect();
			names.sort();
			names == [columns::TILE_COLUMN, columns::TILE_ROW, columns::ZOOM_LEVEL]
		});
		if !has_unique {
			return Err(Error::schema_violation(
				&self.name,
				"tile table requires a unique constraint over zoom_level, tile_column, tile_row",
			));
		}
		Ok(())
	}

	fn validate_attribute(&self) -> terrapack_core::Result<()> {
		self.require_pk()
	}

	fn require_pk(&self) -> terrapack_core::Result<()> {
		if self.pk_column().is_none() {
			return Err(Error::schema_violation(&self.name, "table requires a primary key column"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use terrapack_type::GeometryType;

	#[test]
	fn test_tile_table() {
		let table = TableDef::tile("tiles").unwrap();
		assert_eq!(table.kind, TableKind::Tile);
		assert_eq!(table.columns().len(), 5);
		assert_eq!(table.pk_column().unwrap().name, "id");
	}

	#[test]
	fn test_tile_table_requires_blob_data() {
		let mut cols = columns::tile("id");
		cols[4] = ColumnDef::new(4, columns::TILE_DATA, DataType::Text);
		let err = TableDef::new(
			"tiles",
			TableKind::Tile,
			cols,
			vec![TableConstraint::Unique(vec![
				columns::ZOOM_LEVEL.into(),
				columns::TILE_COLUMN.into(),
				columns::TILE_ROW.into(),
			])],
		)
		.unwrap_err();
		assert!(err.to_string().contains("blob"));
	}

	#[test]
	fn test_tile_table_requires_unique_constraint() {
		let err = TableDef::new("tiles", TableKind::Tile, columns::tile("id"), vec![]).unwrap_err();
		assert!(err.to_string().contains("unique constraint"));
	}

	#[test]
	fn test_duplicate_column_name_rejected() {
		let cols = vec![
			ColumnDef::primary_key(0, "id"),
			ColumnDef::new(1, "name", DataType::Text),
			ColumnDef::new(2, "NAME", DataType::Text),
		];
		let err = TableDef::new("t", TableKind::UserDefined, cols, vec![]).unwrap_err();
		assert!(err.to_string().contains("duplicate column name"));
	}

	#[test]
	fn test_column_index_gap_rejected() {
		let cols = vec![ColumnDef::primary_key(0, "id"), ColumnDef::new(2, "name", DataType::Text)];
		let err = TableDef::new("t", TableKind::UserDefined, cols, vec![]).unwrap_err();
		assert!(matches!(err, Error::SchemaViolation { .. }));
	}

	#[test]
	fn test_feature_requires_exactly_one_geometry() {
		let err = TableDef::new(
			"roads",
			TableKind::Feature,
			columns::attribute("id"),
			vec![],
		)
		.unwrap_err();
		assert!(err.to_string().contains("no geometry column"));

		let mut cols = columns::feature("id", "geom", GeometryType::LineString);
		cols.push(ColumnDef::geometry(2, "geom2", GeometryType::Point));
		let err = TableDef::new("roads", TableKind::Feature, cols, vec![]).unwrap_err();
		assert!(err.to_string().contains("more than one geometry column"));
	}

	#[test]
	fn test_geometry_without_subtype_rejected() {
		let cols = vec![
			ColumnDef::primary_key(0, "id"),
			ColumnDef::new(1, "geom", DataType::Geometry),
		];
		let err = TableDef::new("roads", TableKind::Feature, cols, vec![]).unwrap_err();
		assert!(err.to_string().contains("no subtype"));
	}

	#[test]
	fn test_deep_copy_is_independent() {
		let table = TableDef::tile("tiles").unwrap();
		let mut copy = table.clone();
		copy.push_column(ColumnDef::new(5, "extra", DataType::Text));
		assert_eq!(table.columns().len(), 5);
		assert_eq!(copy.columns().len(), 6);
	}

	#[test]
	fn test_unique_constraint_unknown_column() {
		let err = TableDef::new(
			"t",
			TableKind::UserDefined,
			columns::attribute("id"),
			vec![TableConstraint::Unique(vec!["missing".into()])],
		)
		.unwrap_err();
		assert!(err.to_string().contains("unknown column"));
	}
}
