// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Error, quote};
use terrapack_type::Value;

use crate::table::TableDef;

mod store;

pub use store::RowStore;

/// A field value with an optional symmetric tolerance. Tolerance turns an
/// equality test into an inclusive numeric range and is only legal on
/// numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
	pub value: Value,
	pub tolerance: Option<f64>,
}

impl ColumnValue {
	pub fn new(value: impl Into<Value>) -> ColumnValue {
		ColumnValue {
			value: value.into(),
			tolerance: None,
		}
	}

	pub fn with_tolerance(value: impl Into<Value>, tolerance: f64) -> ColumnValue {
		ColumnValue {
			value: value.into(),
			tolerance: Some(tolerance),
		}
	}
}

/// Paged retrieval window. The order column defaults to the table's
/// primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
	pub order_by: Option<String>,
	pub limit: i64,
	pub offset: i64,
}

impl Page {
	pub fn new(limit: i64, offset: i64) -> Page {
		Page {
			order_by: None,
			limit,
			offset,
		}
	}

	pub fn ordered_by(mut self, column: impl Into<String>) -> Page {
		self.order_by = Some(column.into());
		self
	}
}

/// Parameterized predicate over a table. Column names are validated
/// against the table model; values are always bound, never inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
	clause: String,
	args: Vec<Value>,
}

impl Predicate {
	pub fn eq(table: &TableDef, column: &str, value: impl Into<Value>) -> terrapack_core::Result<Predicate> {
		Self::field(table, column, &ColumnValue::new(value))
	}

	/// LIKE match. Tolerance makes no sense on a pattern match and is
	/// rejected.
	pub fn like(table: &TableDef, column: &str, value: ColumnValue) -> terrapack_core::Result<Predicate> {
		require_column(table, column)?;
		if value.tolerance.is_some() {
			return Err(Error::column_violation(
				&table.name,
				column,
				"tolerance is not supported for LIKE",
			));
		}
		Ok(Predicate {
			clause: format!("{} LIKE ?", quote(column)),
			args: vec![value.value],
		})
	}

	/// Single field test: IS NULL for null values, an inclusive
	/// tolerance range for numeric values with a tolerance, equality
	/// otherwise.
	pub fn field(table: &TableDef, column: &str, value: &ColumnValue) -> terrapack_core::Result<Predicate> {
		let column_def = require_column(table, column)?;

		if let Some(tolerance) = value.tolerance {
			if !column_def.data_type.is_numeric() {
				return Err(Error::column_violation(
					&table.name,
					column,
					"tolerance requires a numeric column",
				));
			}
			let Some(center) = value.value.as_real() else {
				return Err(Error::column_violation(
					&table.name,
					column,
					"tolerance requires a numeric value",
				));
			};
			return Ok(Predicate {
				clause: format!("{} BETWEEN ? AND ?", quote(column)),
				args: vec![Value::Real(center - tolerance), Value::Real(center + tolerance)],
			});
		}

		if value.value.is_null() {
			return Ok(Predicate {
				clause: format!("{} IS NULL", quote(column)),
				args: vec![],
			});
		}

		Ok(Predicate {
			clause: format!("{} = ?", quote(column)),
			args: vec![value.value.clone()],
		})
	}

	/// Conjunction over a field/value map.
	pub fn fields<'a, I>(table: &TableDef, fields: I) -> terrapack_core::Result<Predicate>
	where
		I: IntoIterator<Item = (&'a str, ColumnValue)>,
	{
		let mut combined: Option<Predicate> = None;
		for (column, value) in fields {
			let next = Self::field(table, column, &value)?;
			combined = Some(match combined {
				Some(predicate) => predicate.and(next),
				None => next,
			});
		}
		combined.ok_or_else(|| Error::schema_violation(&table.name, "predicate has no fields"))
	}

	pub fn and(self, other: Predicate) -> Predicate {
		let mut args = self.args;
		args.extend(other.args);
		Predicate {
			clause: format!("({}) AND ({})", self.clause, other.clause),
			args,
		}
	}

	/// Compose with a nested query: `self AND pk IN (nested)`.
	pub fn in_subquery(
		self,
		table: &TableDef,
		nested_sql: &str,
		nested_args: Vec<Value>,
	) -> terrapack_core::Result<Predicate> {
		let Some(pk) = table.pk_column() else {
			return Err(Error::schema_violation(&table.name, "table has no primary key column"));
		};
		let mut args = self.args;
		args.extend(nested_args);
		Ok(Predicate {
			clause: format!("({}) AND {} IN ({})", self.clause, quote(&pk.name), nested_sql),
			args,
		})
	}

	pub fn clause(&self) -> &str {
		&self.clause
	}

	pub fn args(&self) -> &[Value] {
		&self.args
	}
}

fn require_column<'a>(table: &'a TableDef, column: &str) -> terrapack_core::Result<&'a crate::ColumnDef> {
	table.column(column).ok_or_else(|| Error::column_not_found(&table.name, column))
}
