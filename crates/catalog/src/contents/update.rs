// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, Error, ObjectKind};
use terrapack_type::Value;

use crate::{Catalog, contents::Contents};

impl Catalog {
	/// Rewrite every mutable column of a contents row. The table name is
	/// the key and never changes here; renames go through the lifecycle
	/// controller so companion registries move with the row.
	#[tracing::instrument(name = "catalog::update_contents", level = "trace", skip_all, fields(table = contents.table_name))]
	pub fn update_contents(engine: &dyn Engine, contents: &Contents) -> terrapack_core::Result<()> {
		let (min_x, min_y, max_x, max_y) = match contents.extent {
			Some(e) => (
				Value::from(e.min_x),
				Value::from(e.min_y),
				Value::from(e.max_x),
				Value::from(e.max_y),
			),
			None => (Value::Null, Value::Null, Value::Null, Value::Null),
		};
		let affected = engine.execute(
			"UPDATE trk_contents SET data_type = ?, identifier = ?, description = ?, \
			 last_change = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), \
			 min_x = ?, min_y = ?, max_x = ?, max_y = ?, srs_id = ? \
			 WHERE table_name = ?",
			&[
				Value::from(contents.data_type.name()),
				Value::from(contents.identifier.clone()),
				Value::from(contents.description.clone()),
				min_x,
				min_y,
				max_x,
				max_y,
				Value::from(contents.srs_id),
				Value::from(contents.table_name.as_str()),
			],
		)?;
		if affected == 0 {
			return Err(Error::NotFound {
				kind: ObjectKind::Contents,
				name: contents.table_name.clone(),
				table: None,
			});
		}
		Ok(())
	}

	/// Stamp a contents row with the current time. Data mutators call
	/// this after changing the table the row describes.
	pub fn touch_contents(engine: &dyn Engine, table: &str) -> terrapack_core::Result<()> {
		let affected = engine.execute(
			"UPDATE trk_contents SET last_change = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
			 WHERE table_name = ?",
			&[Value::from(table)],
		)?;
		if affected == 0 {
			return Err(Error::NotFound {
				kind: ObjectKind::Contents,
				name: table.to_string(),
				table: None,
			});
		}
		Ok(())
	}
}
