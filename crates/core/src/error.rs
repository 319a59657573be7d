// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
	Table,
	Column,
	Contents,
	Extension,
	Relation,
	Srs,
	Annotation,
}

impl Display for ObjectKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ObjectKind::Table => f.write_str("table"),
			ObjectKind::Column => f.write_str("column"),
			ObjectKind::Contents => f.write_str("contents row"),
			ObjectKind::Extension => f.write_str("extension row"),
			ObjectKind::Relation => f.write_str("relation row"),
			ObjectKind::Srs => f.write_str("spatial reference system"),
			ObjectKind::Annotation => f.write_str("semantic annotation"),
		}
	}
}

/// Failure taxonomy of the schema layer. Every variant names the table
/// (and where it applies, the column) it concerns.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("schema violation on table `{table}`: {reason}")]
	SchemaViolation {
		table: String,
		column: Option<String>,
		reason: String,
	},

	#[error("{kind} `{name}` not found")]
	NotFound {
		kind: ObjectKind,
		name: String,
		table: Option<String>,
	},

	#[error("{kind} `{name}` already exists")]
	AlreadyExists { kind: ObjectKind, name: String },

	#[error("integrity violation on table `{table}`: {reason}")]
	IntegrityViolation { table: String, reason: String },

	#[error("engine failure: {source}")]
	Engine {
		statement: Option<String>,
		#[source]
		source: rusqlite::Error,
	},
}

impl Error {
	pub fn schema_violation(table: impl Into<String>, reason: impl Into<String>) -> Error {
		Error::SchemaViolation {
			table: table.into(),
			column: None,
			reason: reason.into(),
		}
	}

	pub fn column_violation(
		table: impl Into<String>,
		column: impl Into<String>,
		reason: impl Into<String>,
	) -> Error {
		Error::SchemaViolation {
			table: table.into(),
			column: Some(column.into()),
			reason: reason.into(),
		}
	}

	pub fn table_not_found(name: impl Into<String>) -> Error {
		Error::NotFound {
			kind: ObjectKind::Table,
			name: name.into(),
			table: None,
		}
	}

	pub fn column_not_found(table: impl Into<String>, name: impl Into<String>) -> Error {
		Error::NotFound {
			kind: ObjectKind::Column,
			name: name.into(),
			table: Some(table.into()),
		}
	}

	pub fn table_already_exists(name: impl Into<String>) -> Error {
		Error::AlreadyExists {
			kind: ObjectKind::Table,
			name: name.into(),
		}
	}

	pub fn already_exists(kind: ObjectKind, name: impl Into<String>) -> Error {
		Error::AlreadyExists {
			kind,
			name: name.into(),
		}
	}

	pub fn integrity(table: impl Into<String>, reason: impl Into<String>) -> Error {
		Error::IntegrityViolation {
			table: table.into(),
			reason: reason.into(),
		}
	}

	pub fn engine(statement: impl Into<String>, source: rusqlite::Error) -> Error {
		Error::Engine {
			statement: Some(statement.into()),
			source,
		}
	}
}

impl From<rusqlite::Error> for Error {
	fn from(source: rusqlite::Error) -> Error {
		Error::Engine {
			statement: None,
			source,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_carries_context() {
		let err = Error::column_violation("roads", "geom", "geometry column has no subtype");
		assert_eq!(
			err.to_string(),
			"schema violation on table `roads`: geometry column has no subtype"
		);

		let err = Error::column_not_found("roads", "name");
		assert_eq!(err.to_string(), "column `name` not found");

		let err = Error::table_already_exists("roads");
		assert_eq!(err.to_string(), "table `roads` already exists");
	}
}
