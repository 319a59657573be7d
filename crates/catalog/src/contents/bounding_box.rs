// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_core::{Engine, ExtentTransform};
use terrapack_type::Extent;

use crate::Catalog;

impl Catalog {
	/// Union of every tracked table's extent, reprojected into
	/// `target_srs` when one is given. Rows without an extent or without
	/// a reference system to project from are skipped; `None` means no
	/// row contributed.
	pub fn contents_bounds(
		engine: &dyn Engine,
		transform: &dyn ExtentTransform,
		target_srs: Option<i64>,
	) -> terrapack_core::Result<Option<Extent>> {
		let mut union: Option<Extent> = None;
		for contents in Catalog::list_contents(engine)? {
			let Some(extent) = contents.extent else {
				continue;
			};
			let extent = match (target_srs, contents.srs_id) {
				(Some(to), Some(from)) if to != from => {
					transform.transform(&extent, from, to)?
				}
				(Some(_), None) => continue,
				_ => extent,
			};
			union = Some(match union {
				Some(acc) => acc.union(&extent),
				None => extent,
			});
		}
		Ok(union)
	}
}

#[cfg(test)]
mod tests {
	use terrapack_core::{ExtentTransform, IdentityTransform};
	use terrapack_type::Extent;

	use crate::contents::ContentsType;
	use crate::test_utils::{base_engine, full_engine, physical_table};
	use crate::{Catalog, Contents};

	struct Doubling;

	impl ExtentTransform for Doubling {
		fn transform(
			&self,
			extent: &Extent,
			_from_srs: i64,
			_to_srs: i64,
		) -> terrapack_core::Result<Extent> {
			Ok(Extent::new(
				extent.min_x * 2.0,
				extent.min_y * 2.0,
				extent.max_x * 2.0,
				extent.max_y * 2.0,
			))
		}
	}

	#[test]
	fn test_union_skips_extent_less_rows() {
		let engine = full_engine();
		for name in ["roads", "parcels", "owners"] {
			physical_table(&engine, name);
		}
		Catalog::create_contents(
			&engine,
			&Contents::new("roads", ContentsType::Features)
				.with_srs(4326)
				.with_extent(Extent::new(0.0, 0.0, 2.0, 2.0)),
		)
		.unwrap();
		Catalog::create_contents(
			&engine,
			&Contents::new("parcels", ContentsType::Features)
				.with_srs(4326)
				.with_extent(Extent::new(-1.0, -1.0, 1.0, 1.0)),
		)
		.unwrap();
		Catalog::create_contents(&engine, &Contents::new("owners", ContentsType::Attributes))
			.unwrap();

		let bounds = Catalog::contents_bounds(&engine, &IdentityTransform, None)
			.unwrap()
			.unwrap();
		assert_eq!(bounds, Extent::new(-1.0, -1.0, 2.0, 2.0));
	}

	#[test]
	fn test_union_reprojects_mismatched_srs() {
		let engine = full_engine();
		physical_table(&engine, "roads");
		Catalog::create_contents(
			&engine,
			&Contents::new("roads", ContentsType::Features)
				.with_srs(0)
				.with_extent(Extent::new(1.0, 1.0, 2.0, 2.0)),
		)
		.unwrap();

		let bounds = Catalog::contents_bounds(&engine, &Doubling, Some(4326))
			.unwrap()
			.unwrap();
		assert_eq!(bounds, Extent::new(2.0, 2.0, 4.0, 4.0));
	}

	#[test]
	fn test_union_empty_registry() {
		let engine = base_engine();
		assert!(
			Catalog::contents_bounds(&engine, &IdentityTransform, None)
				.unwrap()
				.is_none()
		);
	}
}
