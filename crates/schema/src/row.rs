// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use indexmap::IndexMap;
use terrapack_type::Value;

/// Generic row: ordered column values plus the generated id when known.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
	id: Option<i64>,
	values: IndexMap<String, Value>,
}

impl Row {
	pub fn new() -> Row {
		Row::default()
	}

	pub fn with_id(id: i64) -> Row {
		Row {
			id: Some(id),
			values: IndexMap::new(),
		}
	}

	pub fn id(&self) -> Option<i64> {
		self.id
	}

	pub fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}

	pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Row {
		self.values.insert(column.into(), value.into());
		self
	}

	pub fn get(&self, column: &str) -> Option<&Value> {
		self.values.get(column)
	}

	/// Column/value pairs in insertion order.
	pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_get() {
		let mut row = Row::new();
		row.set("name", "a").set("score", 1.5);
		assert_eq!(row.get("name"), Some(&Value::Text("a".into())));
		assert_eq!(row.get("score"), Some(&Value::Real(1.5)));
		assert_eq!(row.id(), None);
		assert_eq!(row.len(), 2);
	}

	#[test]
	fn test_order_preserved() {
		let mut row = Row::new();
		row.set("b", 1i64).set("a", 2i64);
		let names: Vec<&str> = row.values().map(|(n, _)| n).collect();
		assert_eq!(names, vec!["b", "a"]);
	}
}
