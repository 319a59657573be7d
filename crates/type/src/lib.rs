// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod data_type;
mod extent;
mod geometry;
mod value;

pub use data_type::{DataType, StorageClass};
pub use extent::Extent;
pub use geometry::GeometryType;
pub use value::Value;
