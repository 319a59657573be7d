// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_type::Value;

pub(crate) mod sqlite;

/// Result set of a query: column names in select order plus the rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Rows {
	pub columns: Vec<String>,
	pub rows: Vec<Vec<Value>>,
}

impl Rows {
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// The single value of a single-row, single-column result.
	pub fn scalar(&self) -> Option<&Value> {
		match self.rows.as_slice() {
			[row] => row.first(),
			_ => None,
		}
	}
}

/// Statement execution channel to the underlying storage engine.
///
/// The engine is assumed to provide atomic single-statement execution and
/// transaction scoping; everything above is built on those primitives.
/// `begin`/`commit`/`rollback` must nest: an inner scope rolls back only
/// its own work.
pub trait Engine {
	fn execute(&self, sql: &str, params: &[Value]) -> crate::Result<usize>;

	fn query(&self, sql: &str, params: &[Value]) -> crate::Result<Rows>;

	fn table_exists(&self, name: &str) -> crate::Result<bool>;

	/// Row id generated by the most recent insert on this connection.
	fn last_insert_id(&self) -> crate::Result<i64>;

	fn begin(&self) -> crate::Result<()>;

	fn commit(&self) -> crate::Result<()>;

	fn rollback(&self) -> crate::Result<()>;
}

/// Run `body` inside one transaction scope. On error the scope is rolled
/// back before the error is surfaced; partial completion is never
/// observable to callers.
pub fn atomic<E, T>(engine: &E, body: impl FnOnce(&E) -> crate::Result<T>) -> crate::Result<T>
where
	E: Engine + ?Sized,
{
	engine.begin()?;
	match body(engine) {
		Ok(value) => {
			engine.commit()?;
			Ok(value)
		}
		Err(err) => {
			if let Err(rollback_err) = engine.rollback() {
				tracing::warn!("rollback after failed scope also failed: {}", rollback_err);
			}
			Err(err)
		}
	}
}
