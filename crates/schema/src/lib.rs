// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod column;
pub mod ddl;
pub mod query;
mod row;
mod table;
pub mod test_utils;

pub use column::ColumnDef;
pub use ddl::Ddl;
pub use query::{ColumnValue, Page, Predicate, RowStore};
pub use row::Row;
pub use table::{TableConstraint, TableDef, TableKind, columns};

pub use terrapack_core::Result;
