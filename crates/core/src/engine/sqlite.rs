// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params_from_iter};
use terrapack_type::Value;
use tracing::debug;

use crate::engine::{Engine, Rows};
use crate::error::Error;

/// Application id stamped into the container file header ("TRPK").
pub const APPLICATION_ID: i64 = 0x5452_504B;

struct Inner {
	conn: Connection,
	/// Open savepoint depth; scopes nest via named savepoints.
	depth: u32,
}

/// The sqlite-backed execution channel. A single connection guarded by a
/// mutex; the engine's native file locking provides the single-writer,
/// multiple-reader discipline.
pub struct SqliteEngine {
	inner: Mutex<Inner>,
}

impl SqliteEngine {
	pub fn open(path: impl AsRef<Path>) -> crate::Result<SqliteEngine> {
		let conn = Connection::open(path)?;
		Self::from_connection(conn)
	}

	pub fn memory() -> crate::Result<SqliteEngine> {
		let conn = Connection::open_in_memory()?;
		Self::from_connection(conn)
	}

	fn from_connection(conn: Connection) -> crate::Result<SqliteEngine> {
		let current: i64 = conn.pragma_query_value(None, "application_id", |row| row.get(0))?;
		if current == 0 {
			conn.pragma_update(None, "application_id", APPLICATION_ID)?;
		}
		Ok(SqliteEngine {
			inner: Mutex::new(Inner { conn, depth: 0 }),
		})
	}

	pub fn application_id(&self) -> crate::Result<i64> {
		let inner = self.inner.lock();
		Ok(inner.conn.pragma_query_value(None, "application_id", |row| row.get(0))?)
	}
}

fn bind(value: &Value) -> rusqlite::types::Value {
	match value {
		Value::Null => rusqlite::types::Value::Null,
		Value::Boolean(v) => rusqlite::types::Value::Integer(*v as i64),
		Value::Integer(v) => rusqlite::types::Value::Integer(*v),
		Value::Real(v) => rusqlite::types::Value::Real(*v),
		Value::Text(v) => rusqlite::types::Value::Text(v.clone()),
		Value::Blob(v) => rusqlite::types::Value::Blob(v.clone()),
	}
}

fn read(value: ValueRef<'_>) -> Value {
	match value {
		ValueRef::Null => Value::Null,
		ValueRef::Integer(v) => Value::Integer(v),
		ValueRef::Real(v) => Value::Real(v),
		ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
		ValueRef::Blob(v) => Value::Blob(v.to_vec()),
	}
}

impl Engine for SqliteEngine {
	fn execute(&self, sql: &str, params: &[Value]) -> crate::Result<usize> {
		let inner = self.inner.lock();
		debug!(sql, "execute");
		inner
			.conn
			.execute(sql, params_from_iter(params.iter().map(bind)))
			.map_err(|e| Error::engine(sql, e))
	}

	fn query(&self, sql: &str, params: &[Value]) -> crate::Result<Rows> {
		let inner = self.inner.lock();
		let mut stmt = inner.conn.prepare(sql).map_err(|e| Error::engine(sql, e))?;
		let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
		let width = columns.len();

		let mut raw = stmt
			.query(params_from_iter(params.iter().map(bind)))
			.map_err(|e| Error::engine(sql, e))?;

		let mut rows = Vec::new();
		while let Some(row) = raw.next().map_err(|e| Error::engine(sql, e))? {
			let mut values = Vec::with_capacity(width);
			for index in 0..width {
				values.push(read(row.get_ref(index).map_err(|e| Error::engine(sql, e))?));
			}
			rows.push(values);
		}

		Ok(Rows { columns, rows })
	}

	fn table_exists(&self, name: &str) -> crate::Result<bool> {
		let inner = self.inner.lock();
		let count: i64 = inner
			.conn
			.query_row(
				"SELECT count(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
				[name],
				|row| row.get(0),
			)
			.map_err(|e| Error::engine("table_exists", e))?;
		Ok(count > 0)
	}

	fn last_insert_id(&self) -> crate::Result<i64> {
		let inner = self.inner.lock();
		Ok(inner.conn.last_insert_rowid())
	}

	fn begin(&self) -> crate::Result<()> {
		let mut inner = self.inner.lock();
		let sql = format!("SAVEPOINT terrapack_{}", inner.depth);
		inner.conn.execute_batch(&sql).map_err(|e| Error::engine(sql.as_str(), e))?;
		inner.depth += 1;
		Ok(())
	}

	fn commit(&self) -> crate::Result<()> {
		let mut inner = self.inner.lock();
		debug_assert!(inner.depth > 0, "commit without open scope");
		if inner.depth == 0 {
			return Ok(());
		}
		let sql = format!("RELEASE terrapack_{}", inner.depth - 1);
		inner.conn.execute_batch(&sql).map_err(|e| Error::engine(sql.as_str(), e))?;
		// Depth moves only once the statement succeeds; a failed RELEASE
		// (e.g. a deferred constraint) keeps the scope open for rollback.
		inner.depth -= 1;
		Ok(())
	}

	fn rollback(&self) -> crate::Result<()> {
		let mut inner = self.inner.lock();
		debug_assert!(inner.depth > 0, "rollback without open scope");
		if inner.depth == 0 {
			return Ok(());
		}
		// ROLLBACK TO unwinds the work but keeps the savepoint open, so it
		// must be released as well.
		let sql = format!(
			"ROLLBACK TO terrapack_{depth}; RELEASE terrapack_{depth}",
			depth = inner.depth - 1
		);
		inner.conn.execute_batch(&sql).map_err(|e| Error::engine(sql.as_str(), e))?;
		inner.depth -= 1;
		Ok(())
	}
}
