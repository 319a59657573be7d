// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Terrapack

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod engine;
mod error;
mod ident;
mod projection;

pub use engine::sqlite::SqliteEngine;
pub use engine::{Engine, Rows, atomic};
pub use error::{Error, ObjectKind};
pub use ident::{quote, quote_join};
pub use projection::{ExtentTransform, IdentityTransform};

pub type Result<T> = std::result::Result<T, Error>;
