// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

use terrapack_type::Extent;

/// Coordinate projection seam. The container layer treats reprojection as
/// an opaque collaborator; only the bounding-box union consumes it.
pub trait ExtentTransform {
	fn transform(&self, extent: &Extent, from_srs: i64, to_srs: i64) -> crate::Result<Extent>;
}

/// Transform that leaves extents untouched regardless of the requested
/// spatial reference systems.
pub struct IdentityTransform;

impl ExtentTransform for IdentityTransform {
	fn transform(&self, extent: &Extent, _from_srs: i64, _to_srs: i64) -> crate::Result<Extent> {
		Ok(*extent)
	}
}
