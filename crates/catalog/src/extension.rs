// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::fmt::{self, Display, Formatter};

use terrapack_core::{Engine, Error, ObjectKind};
use terrapack_type::Value;

use crate::{Catalog, schema};

/// Whether readers without the extension may still open the container
/// for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionScope {
	ReadWrite,
	ReadOnly,
}

impl ExtensionScope {
	pub fn name(&self) -> &'static str {
		match self {
			ExtensionScope::ReadWrite => "read-write",
			ExtensionScope::ReadOnly => "read-only",
		}
	}

	pub fn from_name(name: &str) -> Option<ExtensionScope> {
		match name {
			"read-write" => Some(ExtensionScope::ReadWrite),
			"read-only" => Some(ExtensionScope::ReadOnly),
			_ => None,
		}
	}
}

impl Display for ExtensionScope {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// One row of the extensions registry. `table_name` and `column_name`
/// scope the extension: both absent means container-wide, a table with
/// no column means table-wide.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
	pub table_name: Option<String>,
	pub column_name: Option<String>,
	pub extension_name: String,
	pub definition: String,
	pub scope: ExtensionScope,
}

impl Extension {
	pub fn container_wide(
		extension_name: impl Into<String>,
		definition: impl Into<String>,
		scope: ExtensionScope,
	) -> Extension {
		Extension {
			table_name: None,
			column_name: None,
			extension_name: extension_name.into(),
			definition: definition.into(),
			scope,
		}
	}

	pub fn for_table(
		table: impl Into<String>,
		extension_name: impl Into<String>,
		definition: impl Into<String>,
		scope: ExtensionScope,
	) -> Extension {
		Extension {
			table_name: Some(table.into()),
			column_name: None,
			extension_name: extension_name.into(),
			definition: definition.into(),
			scope,
		}
	}

	pub fn for_column(mut self, column: impl Into<String>) -> Extension {
		self.column_name = Some(column.into());
		self
	}
}

const SELECT: &str = "SELECT table_name, column_name, extension_name, definition, scope \
	 FROM trk_extensions";

fn from_row(row: &[Value]) -> terrapack_core::Result<Extension> {
	let scope_name = row[4].as_text().unwrap_or_default();
	let scope = ExtensionScope::from_name(scope_name).ok_or_else(|| {
		Error::schema_violation(
			schema::EXTENSIONS,
			format!("unknown extension scope `{}`", scope_name),
		)
	})?;
	Ok(Extension {
		table_name: row[0].as_text().map(str::to_string),
		column_name: row[1].as_text().map(str::to_string),
		extension_name: row[2].as_text().unwrap_or_default().to_string(),
		definition: row[3].as_text().unwrap_or_default().to_string(),
		scope,
	})
}

// NULL-safe match on the (table, column, name) scoping key.
const KEY: &str = "table_name IS ? AND column_name IS ? AND extension_name = ?";

fn key_params(extension: &Extension) -> [Value; 3] {
	[
		Value::from(extension.table_name.clone()),
		Value::from(extension.column_name.clone()),
		Value::from(extension.extension_name.as_str()),
	]
}

impl Catalog {
	/// Record an extension. Registering the same scoping key again
	/// rewrites the definition and scope in place.
	#[tracing::instrument(name = "catalog::register_extension", level = "trace", skip_all, fields(extension = extension.extension_name))]
	pub fn register_extension(
		engine: &dyn Engine,
		extension: &Extension,
	) -> terrapack_core::Result<()> {
		schema::create_extensions(engine)?;
		let [table, column, name] = key_params(extension);
		let affected = engine.execute(
			&format!("UPDATE trk_extensions SET definition = ?, scope = ? WHERE {}", KEY),
			&[
				Value::from(extension.definition.as_str()),
				Value::from(extension.scope.name()),
				table.clone(),
				column.clone(),
				name.clone(),
			],
		)?;
		if affected == 0 {
			engine.execute(
				"INSERT INTO trk_extensions (table_name, column_name, extension_name, \
				 definition, scope) VALUES (?, ?, ?, ?, ?)",
				&[
					table,
					column,
					name,
					Value::from(extension.definition.as_str()),
					Value::from(extension.scope.name()),
				],
			)?;
		}
		Ok(())
	}

	pub fn has_extension(engine: &dyn Engine, name: &str) -> terrapack_core::Result<bool> {
		if !engine.table_exists(schema::EXTENSIONS)? {
			return Ok(false);
		}
		let rows = engine.query(
			"SELECT COUNT(*) FROM trk_extensions WHERE extension_name = ?",
			&[Value::from(name)],
		)?;
		Ok(rows.scalar().and_then(Value::as_integer).unwrap_or(0) > 0)
	}

	pub fn list_extensions(engine: &dyn Engine) -> terrapack_core::Result<Vec<Extension>> {
		if !engine.table_exists(schema::EXTENSIONS)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(&format!("{} ORDER BY extension_name", SELECT), &[])?;
		rows.rows.iter().map(|row| from_row(row)).collect()
	}

	pub fn extensions_for_table(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<Vec<Extension>> {
		if !engine.table_exists(schema::EXTENSIONS)? {
			return Ok(Vec::new());
		}
		let rows = engine.query(
			&format!("{} WHERE table_name = ? ORDER BY extension_name", SELECT),
			&[Value::from(table)],
		)?;
		rows.rows.iter().map(|row| from_row(row)).collect()
	}

	pub fn drop_extension(engine: &dyn Engine, extension: &Extension) -> terrapack_core::Result<()> {
		let affected = engine.execute(
			&format!("DELETE FROM trk_extensions WHERE {}", KEY),
			&key_params(extension),
		)?;
		if affected == 0 {
			return Err(Error::NotFound {
				kind: ObjectKind::Extension,
				name: extension.extension_name.clone(),
				table: extension.table_name.clone(),
			});
		}
		Ok(())
	}

	/// Forget every extension scoped to `table`. No-op when the registry
	/// itself was never created.
	pub(crate) fn drop_extensions_for_table(
		engine: &dyn Engine,
		table: &str,
	) -> terrapack_core::Result<usize> {
		if !engine.table_exists(schema::EXTENSIONS)? {
			return Ok(0);
		}
		engine.execute(
			"DELETE FROM trk_extensions WHERE table_name = ?",
			&[Value::from(table)],
		)
	}
}
