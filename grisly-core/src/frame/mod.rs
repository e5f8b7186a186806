//! Minimal in-memory columnar table.
//!
//! Provides just the table operations the text pipeline and the waterfall
//! join need: column lookup, row-index augmentation, filtering by row index,
//! hash equi-join, concatenation, stable sort and column drop.
//!
//! Layout:
//! - Strings live in a [`StrArena`](crate::arena::StrArena), other types in
//!   `Vec<Option<T>>`
//! - Every operation returns a new [`Frame`]; inputs are never mutated

mod join;
mod ops;
mod stats;
mod types;

pub use join::{WaterfallOptions, DEFAULT_INDEX_COLUMN};
pub use ops::RIGHT_SUFFIX;
pub use stats::{PassStats, WaterfallStats};
pub use types::{AnyValue, Column, ColumnData, Frame, RightMatch};
