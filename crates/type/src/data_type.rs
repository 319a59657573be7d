// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::fmt::{self, Display, Formatter};

/// Storage classes the underlying engine supports natively. Every semantic
/// [`DataType`] maps onto exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
	Integer,
	Real,
	Text,
	Blob,
}

/// Semantic column types of the container format.
///
/// The engine itself only knows the four [`StorageClass`]es; the semantic
/// type decides the DDL token that gets emitted and how values are
/// interpreted on the way back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
	Boolean,
	TinyInt,
	SmallInt,
	MediumInt,
	Int,
	Float,
	Double,
	Real,
	Text,
	Blob,
	Date,
	DateTime,
	/// Spatial geometry. The concrete subtype lives on the column
	/// definition, not here, because the subtype is column metadata
	/// rather than a distinct storage shape.
	Geometry,
}

impl DataType {
	pub fn storage_class(&self) -> StorageClass {
		match self {
			DataType::Boolean
			| DataType::TinyInt
			| DataType::SmallInt
			| DataType::MediumInt
			| DataType::Int => StorageClass::Integer,
			DataType::Float | DataType::Double | DataType::Real => StorageClass::Real,
			DataType::Text | DataType::Date | DataType::DateTime => StorageClass::Text,
			DataType::Blob | DataType::Geometry => StorageClass::Blob,
		}
	}

	/// The exact token emitted into DDL for this type.
	pub fn token(&self) -> &'static str {
		match self {
			DataType::Boolean => "BOOLEAN",
			DataType::TinyInt => "TINYINT",
			DataType::SmallInt => "SMALLINT",
			DataType::MediumInt => "MEDIUMINT",
			DataType::Int => "INTEGER",
			DataType::Float => "FLOAT",
			DataType::Double => "DOUBLE",
			DataType::Real => "REAL",
			DataType::Text => "TEXT",
			DataType::Blob => "BLOB",
			DataType::Date => "DATE",
			DataType::DateTime => "DATETIME",
			DataType::Geometry => "GEOMETRY",
		}
	}

	pub fn from_token(token: &str) -> Option<DataType> {
		match token.to_ascii_uppercase().as_str() {
			"BOOLEAN" => Some(DataType::Boolean),
			"TINYINT" => Some(DataType::TinyInt),
			"SMALLINT" => Some(DataType::SmallInt),
			"MEDIUMINT" => Some(DataType::MediumInt),
			"INT" | "INTEGER" => Some(DataType::Int),
			"FLOAT" => Some(DataType::Float),
			"DOUBLE" => Some(DataType::Double),
			"REAL" => Some(DataType::Real),
			"TEXT" => Some(DataType::Text),
			"BLOB" => Some(DataType::Blob),
			"DATE" => Some(DataType::Date),
			"DATETIME" => Some(DataType::DateTime),
			"GEOMETRY" => Some(DataType::Geometry),
			_ => None,
		}
	}

	pub fn is_integer(&self) -> bool {
		matches!(
			self,
			DataType::TinyInt | DataType::SmallInt | DataType::MediumInt | DataType::Int
		)
	}

	pub fn is_numeric(&self) -> bool {
		self.is_integer() || matches!(self, DataType::Float | DataType::Double | DataType::Real)
	}

	pub fn is_text(&self) -> bool {
		matches!(self, DataType::Text | DataType::Date | DataType::DateTime)
	}

	pub fn is_blob(&self) -> bool {
		matches!(self, DataType::Blob | DataType::Geometry)
	}
}

impl Display for DataType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.token())
	}
}
