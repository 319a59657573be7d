// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod container;

pub use container::Terrapack;

pub use terrapack_catalog as catalog;
pub use terrapack_catalog::{
	Catalog, CleanupStep, Contents, ContentsType, Extension, ExtensionScope, ExtendedRelation,
	GeometryColumns, SemanticAnnotation, SemanticAnnotationReference, SpatialReferenceSystem,
	TableState, TileMatrix, TileMatrixSet,
};
pub use terrapack_core as core;
pub use terrapack_core::{Engine, Error, ExtentTransform, IdentityTransform, Result, SqliteEngine};
pub use terrapack_schema as schema;
pub use terrapack_schema::{
	ColumnDef, ColumnValue, Ddl, Page, Predicate, Row, RowStore, TableConstraint, TableDef,
	TableKind,
};
pub use terrapack_type as r#type;
pub use terrapack_type::{DataType, Extent, GeometryType, StorageClass, Value};
