// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

//! Shared fixtures for schema-layer tests.

use terrapack_core::SqliteEngine;
use terrapack_type::DataType;

use crate::column::ColumnDef;
use crate::table::{TableDef, TableKind};

pub fn memory_engine() -> SqliteEngine {
	SqliteEngine::memory().expect("in-memory engine")
}

/// Plain attribute table: integer id, text name, double score.
pub fn sample_table(name: &str) -> TableDef {
	TableDef::new(
		name,
		TableKind::Attribute,
		vec![
			ColumnDef::primary_key(0, "id"),
			ColumnDef::new(1, "name", DataType::Text),
			ColumnDef::new(2, "score", DataType::Double),
		],
		vec![],
	)
	.expect("sample table is valid")
}
