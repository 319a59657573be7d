// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, quote, quote_join};
use terrapack_type::Value;

use crate::query::{ColumnValue, Page, Predicate};
use crate::row::Row;
use crate::table::TableDef;

/// Typed CRUD over any table described by a [`TableDef`].
pub struct RowStore<'a> {
	engine: &'a dyn Engine,
	table: &'a TableDef,
}

impl<'a> RowStore<'a> {
	pub fn new(engine: &'a dyn Engine, table: &'a TableDef) -> RowStore<'a> {
		RowStore { engine, table }
	}

	pub fn table(&self) -> &TableDef {
		self.table
	}

	pub fn query(
		&self,
		predicate: Option<&Predicate>,
		page: Option<&Page>,
	) -> terrapack_core::Result<Vec<Row>> {
		let mut sql = format!(
			"SELECT {} FROM {}",
			quote_join(self.table.column_names()),
			quote(&self.table.name)
		);
		let mut args: Vec<Value> = Vec::new();
		if let Some(predicate) = predicate {
			sql.push_str(" WHERE ");
			sql.push_str(predicate.clause());
			args.extend(predicate.args().iter().cloned());
		}
		if let Some(page) = page {
			let order = match &page.order_by {
				Some(column) => {
					if !self.table.has_column(column) {
						return Err(Error::column_not_found(&self.table.name, column));
					}
					column.clone()
				}
				None => match self.table.pk_column() {
					Some(pk) => pk.name.clone(),
					None => {
						return Err(Error::schema_violation(
							&self.table.name,
							"paged query requires an order column",
						));
					}
				},
			};
			sql.push_str(&format!(
				" ORDER BY {} LIMIT {} OFFSET {}",
				quote(&order),
				page.limit,
				page.offset
			));
		}

		let result = self.engine.query(&sql, &args)?;
		let pk_position = self
			.table
			.pk_column()
			.and_then(|pk| self.table.columns().iter().position(|c| c.name == pk.name));

		Ok(result
			.rows
			.into_iter()
			.map(|values| {
				let mut row = Row::new();
				if let Some(position) = pk_position {
					if let Some(id) = values[position].as_integer() {
						row.set_id(id);
					}
				}
				for (column, value) in self.table.column_names().iter().zip(values) {
					row.set(*column, value);
				}
				row
			})
			.collect())
	}

	pub fn count(&self, predicate: Option<&Predicate>) -> terrapack_core::Result<usize> {
		let mut sql = format!("SELECT count(*) FROM {}", quote(&self.table.name));
		let mut args: Vec<Value> = Vec::new();
		if let Some(predicate) = predicate {
			sql.push_str(" WHERE ");
			sql.push_str(predicate.clause());
			args.extend(predicate.args().iter().cloned());
		}
		let rows = self.engine.query(&sql, &args)?;
		Ok(rows.scalar().and_then(Value::as_integer).unwrap_or(0) as usize)
	}

	/// Insert the row's values; returns the generated id.
	pub fn insert(&self, row: &Row) -> terrapack_core::Result<i64> {
		for (column, _) in row.values() {
			if !self.table.has_column(column) {
				return Err(Error::column_not_found(&self.table.name, column));
			}
		}

		let sql = if row.is_empty() {
			format!("INSERT INTO {} DEFAULT VALUES", quote(&self.table.name))
		} else {
			let columns: Vec<&str> = row.values().map(|(c, _)| c).collect();
			let placeholders = vec!["?"; columns.len()].join(", ");
			format!(
				"INSERT INTO {} ({}) VALUES ({})",
				quote(&self.table.name),
				quote_join(&columns),
				placeholders
			)
		};
		let args: Vec<Value> = row.values().map(|(_, v)| v.clone()).collect();
		self.engine.execute(&sql, &args)?;
		self.engine.last_insert_id()
	}

	/// Update the row identified by its id; returns the affected count,
	/// 0 or 1.
	pub fn update(&self, row: &Row) -> terrapack_core::Result<usize> {
		let Some(pk) = self.table.pk_column() else {
			return Err(Error::schema_violation(
				&self.table.name,
				"update requires a primary key column",
			));
		};
		let Some(id) = row.id() else {
			return Err(Error::schema_violation(
				&self.table.name,
				"update requires a row with an id",
			));
		};

		let mut assignments = Vec::new();
		let mut args = Vec::new();
		for (column, value) in row.values() {
			if column.eq_ignore_ascii_case(&pk.name) {
				continue;
			}
			if !self.table.has_column(column) {
				return Err(Error::column_not_found(&self.table.name, column));
			}
			assignments.push(format!("{} = ?", quote(column)));
			args.push(value.clone());
		}
		if assignments.is_empty() {
			return Err(Error::schema_violation(&self.table.name, "update row has no values"));
		}
		args.push(Value::Integer(id));

		let sql = format!(
			"UPDATE {} SET {} WHERE {} = ?",
			quote(&self.table.name),
			assignments.join(", "),
			quote(&pk.name)
		);
		self.engine.execute(&sql, &args)
	}

	pub fn delete_by_id(&self, id: i64) -> terrapack_core::Result<usize> {
		let Some(pk) = self.table.pk_column() else {
			return Err(Error::schema_violation(
				&self.table.name,
				"delete by id requires a primary key column",
			));
		};
		let sql = format!("DELETE FROM {} WHERE {} = ?", quote(&self.table.name), quote(&pk.name));
		self.engine.execute(&sql, &[Value::Integer(id)])
	}

	pub fn delete_where(&self, predicate: &Predicate) -> terrapack_core::Result<usize> {
		let sql = format!("DELETE FROM {} WHERE {}", quote(&self.table.name), predicate.clause());
		self.engine.execute(&sql, predicate.args())
	}

	pub fn delete_all(&self) -> terrapack_core::Result<usize> {
		self.engine.execute(&format!("DELETE FROM {}", quote(&self.table.name)), &[])
	}

	/// Delete a row: by id when it carries one, otherwise by an
	/// exact-match predicate over all of its current column values.
	pub fn delete(&self, row: &Row) -> terrapack_core::Result<usize> {
		if let Some(id) = row.id() {
			return self.delete_by_id(id);
		}
		if row.is_empty() {
			return Err(Error::schema_violation(
				&self.table.name,
				"delete row carries neither id nor values",
			));
		}
		let predicate = Predicate::fields(
			self.table,
			row.values().map(|(column, value)| (column, ColumnValue::new(value.clone()))),
		)?;
		self.delete_where(&predicate)
	}
}
