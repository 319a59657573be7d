// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

/// Axis-aligned spatial extent of a table's contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Extent {
	pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Extent {
		Extent {
			min_x,
			min_y,
			max_x,
			max_y,
		}
	}

	/// Component-wise union: min of the minimums, max of the maximums.
	pub fn union(&self, other: &Extent) -> Extent {
		Extent {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}
}
