// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod annotation;
pub mod contents;
mod extension;
mod geometry_columns;
pub mod lifecycle;
mod relation;
pub mod schema;
mod srs;
pub mod test_utils;
mod tile_matrix;

pub use annotation::{
	SEMANTIC_ANNOTATIONS_EXTENSION, SemanticAnnotation, SemanticAnnotationReference,
};
pub use contents::{Contents, ContentsType};
pub use extension::{Extension, ExtensionScope};
pub use geometry_columns::GeometryColumns;
pub use lifecycle::{CleanupStep, TableState, cleanup_steps};
pub use relation::{ExtendedRelation, RELATED_TABLES_EXTENSION};
pub use srs::{SpatialReferenceSystem, UNDEFINED_CARTESIAN, UNDEFINED_GEOGRAPHIC, WGS84};
pub use tile_matrix::{TileMatrix, TileMatrixSet};

pub use terrapack_core::Result;

/// Catalog operations. A unit struct with static operations over the
/// execution channel; all state lives in the container itself.
pub struct Catalog;
