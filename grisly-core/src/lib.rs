//! Batch text normalization and waterfall joins over columnar string data.
//!
//! - [`analyzer`]: per-value transforms (Unicode normalization, diacritic
//!   stripping, bracket-span removal, word dedup and mapping) and the
//!   parallel column driver
//! - [`arena`]: contiguous nullable string column storage
//! - [`frame`]: a small in-memory table engine and the waterfall join
//! - [`expr`]: column expressions and the process-wide operation registry

pub mod analyzer;
pub mod arena;
pub mod expr;
pub mod frame;

pub use grisly_types::{
    ConfigError, DataType, Error, NormalizationForm, Result, RowIndex, SchemaError,
};
