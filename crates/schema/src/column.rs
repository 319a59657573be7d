// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::Error;
use terrapack_type::{DataType, GeometryType, Value};

/// Validated column of a table model.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
	pub name: String,
	/// Ordinal position within the table, zero based.
	pub index: usize,
	pub data_type: DataType,
	pub nullable: bool,
	pub default: Option<Value>,
	pub max_length: Option<u64>,
	pub primary_key: bool,
	/// Subtype tag, required when `data_type` is [`DataType::Geometry`].
	pub geometry: Option<GeometryType>,
}

impl ColumnDef {
	pub fn new(index: usize, name: impl Into<String>, data_type: DataType) -> ColumnDef {
		ColumnDef {
			name: name.into(),
			index,
			data_type,
			nullable: true,
			default: None,
			max_length: None,
			primary_key: false,
			geometry: None,
		}
	}

	/// Integer primary key column, the row id of the table.
	pub fn primary_key(index: usize, name: impl Into<String>) -> ColumnDef {
		let mut column = ColumnDef::new(index, name, DataType::Int);
		column.primary_key = true;
		column.nullable = false;
		column
	}

	pub fn geometry(index: usize, name: impl Into<String>, subtype: GeometryType) -> ColumnDef {
		let mut column = ColumnDef::new(index, name, DataType::Geometry);
		column.geometry = Some(subtype);
		column
	}

	pub fn not_null(mut self) -> ColumnDef {
		self.nullable = false;
		self
	}

	pub fn with_default(mut self, default: impl Into<Value>) -> ColumnDef {
		self.default = Some(default.into());
		self
	}

	pub fn with_max_length(mut self, max_length: u64) -> ColumnDef {
		self.max_length = Some(max_length);
		self
	}

	/// The DDL-visible type name: the geometry subtype for geometry
	/// columns, otherwise the scalar type token. A geometry column with
	/// no subtype has no renderable type.
	pub fn type_name(&self, table: &str) -> terrapack_core::Result<&'static str> {
		match self.data_type {
			DataType::Geometry => match self.geometry {
				Some(subtype) => Ok(subtype.name()),
				None => Err(Error::column_violation(
					table,
					&self.name,
					"geometry column has no subtype",
				)),
			},
			other => Ok(other.token()),
		}
	}
}
