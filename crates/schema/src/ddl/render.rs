// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{quote, quote_join};
use terrapack_type::Value;

use crate::column::ColumnDef;
use crate::table::{TableConstraint, TableDef};

/// Render the single CREATE TABLE statement for a table model.
pub fn create_table_sql(table: &TableDef) -> terrapack_core::Result<String> {
	let mut parts = Vec::with_capacity(table.columns().len() + table.constraints.len());
	for column in table.columns() {
		parts.push(column_sql(&table.name, column)?);
	}
	for TableConstraint::Unique(names) in &table.constraints {
		parts.push(format!("UNIQUE ({})", quote_join(names)));
	}
	Ok(format!("CREATE TABLE {} ({})", quote(&table.name), parts.join(", ")))
}

/// Render one column definition fragment.
pub fn column_sql(table: &str, column: &ColumnDef) -> terrapack_core::Result<String> {
	let mut sql = format!("{} {}", quote(&column.name), column.type_name(table)?);
	if let Some(max_length) = column.max_length {
		sql.push_str(&format!("({})", max_length));
	}
	if !column.nullable && !column.primary_key {
		sql.push_str(" NOT NULL");
	}
	if let Some(default) = &column.default {
		sql.push_str(" DEFAULT ");
		sql.push_str(&value_literal(default));
	}
	if column.primary_key {
		sql.push_str(" PRIMARY KEY AUTOINCREMENT");
	}
	Ok(sql)
}

/// Render a value as a DDL literal, used for column defaults.
pub fn value_literal(value: &Value) -> String {
	match value {
		Value::Null => "NULL".to_string(),
		Value::Boolean(v) => if *v { "1" } else { "0" }.to_string(),
		Value::Integer(v) => v.to_string(),
		Value::Real(v) => v.to_string(),
		Value::Text(v) => format!("'{}'", v.replace('\'', "''")),
		Value::Blob(v) => {
			let mut hex = String::with_capacity(v.len() * 2 + 3);
			hex.push_str("x'");
			for byte in v {
				hex.push_str(&format!("{:02x}", byte));
			}
			hex.push('\'');
			hex
		}
	}
}
