// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use std::fmt::{self, Display, Formatter};

use crate::StorageClass;

/// Generic column value as it moves between callers and the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Boolean(bool),
	Integer(i64),
	Real(f64),
	Text(String),
	Blob(Vec<u8>),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn storage_class(&self) -> Option<StorageClass> {
		match self {
			Value::Null => None,
			Value::Boolean(_) | Value::Integer(_) => Some(StorageClass::Integer),
			Value::Real(_) => Some(StorageClass::Real),
			Value::Text(_) => Some(StorageClass::Text),
			Value::Blob(_) => Some(StorageClass::Blob),
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Value::Integer(v) => Some(*v),
			Value::Boolean(v) => Some(*v as i64),
			_ => None,
		}
	}

	pub fn as_real(&self) -> Option<f64> {
		match self {
			Value::Real(v) => Some(*v),
			Value::Integer(v) => Some(*v as f64),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Value::Text(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_blob(&self) -> Option<&[u8]> {
		match self {
			Value::Blob(v) => Some(v),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Boolean(v) => write!(f, "{}", v),
			Value::Integer(v) => write!(f, "{}", v),
			Value::Real(v) => write!(f, "{}", v),
			Value::Text(v) => f.write_str(v),
			Value::Blob(v) => write!(f, "<blob {} bytes>", v.len()),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Integer(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Real(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Value::Blob(v)
	}
}

impl<T> From<Option<T>> for Value
where
	Value: From<T>,
{
	fn from(v: Option<T>) -> Self {
		match v {
			Some(v) => Value::from(v),
			None => Value::Null,
		}
	}
}
