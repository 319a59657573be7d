// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

//! `trk_contents` registry. Every user table the container tracks has
//! exactly one row here; companion registries hang off it by table name.

mod bounding_box;
mod create;
mod find;
mod list;
mod update;

use std::fmt::{self, Display, Formatter};

use terrapack_type::{Extent, Value};

/// What a tracked table holds. Open set: readers must pass through
/// unrecognized type names rather than reject them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentsType {
	Features,
	Tiles,
	Attributes,
	GriddedCoverage,
	Other(String),
}

impl ContentsType {
	pub fn name(&self) -> &str {
		match self {
			ContentsType::Features => "features",
			ContentsType::Tiles => "tiles",
			ContentsType::Attributes => "attributes",
			ContentsType::GriddedCoverage => "2d-gridded-coverage",
			ContentsType::Other(name) => name,
		}
	}

	pub fn from_name(name: &str) -> ContentsType {
		match name {
			"features" => ContentsType::Features,
			"tiles" => ContentsType::Tiles,
			"attributes" => ContentsType::Attributes,
			"2d-gridded-coverage" => ContentsType::GriddedCoverage,
			other => ContentsType::Other(other.to_string()),
		}
	}

	/// Tile-shaped contents share the tile matrix companion tables.
	pub fn is_tiled(&self) -> bool {
		matches!(self, ContentsType::Tiles | ContentsType::GriddedCoverage)
	}
}

impl Display for ContentsType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// One row of the contents registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Contents {
	pub table_name: String,
	pub data_type: ContentsType,
	pub identifier: Option<String>,
	pub description: Option<String>,
	/// ISO-8601 UTC timestamp; filled by the engine on insert when absent.
	pub last_change: Option<String>,
	pub extent: Option<Extent>,
	pub srs_id: Option<i64>,
}

impl Contents {
	pub fn new(table_name: impl Into<String>, data_type: ContentsType) -> Contents {
		let table_name = table_name.into();
		Contents {
			identifier: Some(table_name.clone()),
			table_name,
			data_type,
			description: None,
			last_change: None,
			extent: None,
			srs_id: None,
		}
	}

	pub fn with_extent(mut self, extent: Extent) -> Contents {
		self.extent = Some(extent);
		self
	}

	pub fn with_srs(mut self, srs_id: i64) -> Contents {
		self.srs_id = Some(srs_id);
		self
	}
}

pub(crate) const SELECT: &str = "SELECT table_name, data_type, identifier, description, \
	 last_change, min_x, min_y, max_x, max_y, srs_id FROM trk_contents";

pub(crate) fn from_row(row: &[Value]) -> Contents {
	let extent = match (
		row[5].as_real(),
		row[6].as_real(),
		row[7].as_real(),
		row[8].as_real(),
	) {
		(Some(min_x), Some(min_y), Some(max_x), Some(max_y)) => {
			Some(Extent::new(min_x, min_y, max_x, max_y))
		}
		_ => None,
	};
	Contents {
		table_name: row[0].as_text().unwrap_or_default().to_string(),
		data_type: ContentsType::from_name(row[1].as_text().unwrap_or_default()),
		identifier: row[2].as_text().map(str::to_string),
		description: row[3].as_text().map(str::to_string),
		last_change: row[4].as_text().map(str::to_string),
		extent,
		srs_id: row[9].as_integer(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_type_names_round_trip() {
		for ty in [
			ContentsType::Features,
			ContentsType::Tiles,
			ContentsType::Attributes,
			ContentsType::GriddedCoverage,
		] {
			assert_eq!(ContentsType::from_name(ty.name()), ty);
		}
		assert_eq!(
			ContentsType::from_name("vendor-index"),
			ContentsType::Other("vendor-index".to_string())
		);
		assert!(ContentsType::GriddedCoverage.is_tiled());
		assert!(!ContentsType::Attributes.is_tiled());
	}
}
