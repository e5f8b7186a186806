//! Core types and errors for the grisly text-processing toolkit.
//!
//! This crate holds the plain types shared by the algorithms in
//! `grisly-core`. Keeping them separate keeps the boundaries clean:
//!
//! - **Configuration values** such as [`NormalizationForm`] parse and validate
//!   once, before any row is touched
//! - **Errors** are split by when they can happen: [`ConfigError`] for bad
//!   parameters and [`SchemaError`] for tables that do not fit the operation
//! - **No algorithms** live here

#![warn(missing_docs)]

use core::fmt;
use core::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Stable, zero-based position of a row in the left table of a join.
///
/// Assigned before the first join pass and used both to mark rows as
/// claimed and to restore the original row order afterwards.
pub type RowIndex = u32;

/// Result alias used across the workspace.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unicode normalization form.
///
/// Parsing is case-insensitive and also accepts the transposed spellings
/// `NKFC` / `NKFD`.
///
/// ```
/// use grisly_types::NormalizationForm;
///
/// assert_eq!("nfkc".parse::<NormalizationForm>().unwrap(), NormalizationForm::Nfkc);
/// assert!("NFX".parse::<NormalizationForm>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum NormalizationForm {
    /// Canonical decomposition followed by canonical composition.
    Nfc,
    /// Canonical decomposition.
    Nfd,
    /// Compatibility decomposition followed by canonical composition.
    Nfkc,
    /// Compatibility decomposition.
    Nfkd,
}

impl NormalizationForm {
    /// All forms, in declaration order.
    pub const ALL: [NormalizationForm; 4] = [
        NormalizationForm::Nfc,
        NormalizationForm::Nfd,
        NormalizationForm::Nfkc,
        NormalizationForm::Nfkd,
    ];

    /// Canonical upper-case name of the form.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            NormalizationForm::Nfc => "NFC",
            NormalizationForm::Nfd => "NFD",
            NormalizationForm::Nfkc => "NFKC",
            NormalizationForm::Nfkd => "NFKD",
        }
    }

    /// Returns `true` for the compatibility forms (NFKC, NFKD).
    #[inline]
    pub const fn is_compatibility(self) -> bool {
        matches!(self, NormalizationForm::Nfkc | NormalizationForm::Nfkd)
    }
}

impl FromStr for NormalizationForm {
    type Err = ConfigError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NFC" => Ok(NormalizationForm::Nfc),
            "NFD" => Ok(NormalizationForm::Nfd),
            "NFKC" | "NKFC" => Ok(NormalizationForm::Nfkc),
            "NFKD" | "NKFD" => Ok(NormalizationForm::Nfkd),
            _ => Err(ConfigError::UnknownForm(s.to_owned())),
        }
    }
}

impl TryFrom<String> for NormalizationForm {
    type Error = ConfigError;

    fn try_from(value: String) -> core::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NormalizationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Nullable UTF-8 strings.
    Utf8,
    /// Nullable signed 64-bit integers.
    Int64,
    /// Nullable unsigned 32-bit integers (row indices).
    UInt32,
    /// Nullable 64-bit floats.
    Float64,
    /// Nullable booleans.
    Boolean,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Utf8 => "str",
            DataType::Int64 => "i64",
            DataType::UInt32 => "u32",
            DataType::Float64 => "f64",
            DataType::Boolean => "bool",
        };
        f.write_str(name)
    }
}

/// Invalid operation parameters.
///
/// Always raised before any row or join pass is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The normalization form name is not one of NFC, NFD, NFKC, NFKD.
    #[error("unknown normalization form `{0}` (expected NFC, NFD, NFKC or NFKD)")]
    UnknownForm(String),
    /// A waterfall join was requested without any left key columns.
    #[error("waterfall join requires at least one left key column")]
    EmptyLeftOn,
    /// Positional bracket pairing got a different number of open and close delimiters.
    #[error("{open} open delimiters cannot be paired with {close} close delimiters")]
    BracketCountMismatch {
        /// Number of open delimiters supplied.
        open: usize,
        /// Number of close delimiters supplied.
        close: usize,
    },
    /// A bracket delimiter was the empty string.
    #[error("bracket delimiters must not be empty")]
    EmptyDelimiter,
    /// No operation is registered under this name.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    /// Operation arguments could not be decoded.
    #[error("invalid arguments for `{operation}`: {reason}")]
    InvalidKwargs {
        /// Registered operation name.
        operation: String,
        /// Decoder message.
        reason: String,
    },
}

/// A table does not have the shape an operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A named column is absent from its table.
    #[error("column `{column}` not found")]
    ColumnNotFound {
        /// The missing column name.
        column: String,
    },
    /// A column has the wrong type for the operation.
    #[error("column `{column}` has type {found}, expected {expected}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Required type.
        expected: DataType,
        /// Actual type.
        found: DataType,
    },
    /// Join key columns have different types.
    #[error("cannot join `{left}` ({left_type}) with `{right}` ({right_type})")]
    JoinKeyMismatch {
        /// Left key column.
        left: String,
        /// Right key column.
        right: String,
        /// Left key type.
        left_type: DataType,
        /// Right key type.
        right_type: DataType,
    },
    /// Two columns in one table share a name.
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    /// A column does not have the table's height.
    #[error("column `{column}` has {found} rows, expected {expected}")]
    LengthMismatch {
        /// Column name.
        column: String,
        /// Table height.
        expected: usize,
        /// Column length.
        found: usize,
    },
    /// Tables to concatenate have different schemas.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Any failure raised by the toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Incompatible table shape.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_parse_canonical_names() {
        for form in NormalizationForm::ALL {
            assert_eq!(form.as_str().parse::<NormalizationForm>(), Ok(form));
        }
    }

    #[test]
    fn form_parse_is_case_insensitive() {
        assert_eq!("nfc".parse(), Ok(NormalizationForm::Nfc));
        assert_eq!(" Nfkd ".parse(), Ok(NormalizationForm::Nfkd));
    }

    #[test]
    fn form_parse_accepts_transposed_spelling() {
        assert_eq!("NKFC".parse(), Ok(NormalizationForm::Nfkc));
        assert_eq!("NKFD".parse(), Ok(NormalizationForm::Nfkd));
    }

    #[test]
    fn form_parse_unknown() {
        assert_eq!(
            "NFX".parse::<NormalizationForm>(),
            Err(ConfigError::UnknownForm("NFX".into()))
        );
        assert!("".parse::<NormalizationForm>().is_err());
    }

    #[test]
    fn form_try_from_string_goes_through_parser() {
        assert_eq!(
            NormalizationForm::try_from(String::from("nfd")),
            Ok(NormalizationForm::Nfd)
        );
        assert!(NormalizationForm::try_from(String::from("nfz")).is_err());
    }

    #[test]
    fn compatibility_flag() {
        assert!(!NormalizationForm::Nfc.is_compatibility());
        assert!(NormalizationForm::Nfkd.is_compatibility());
    }

    #[test]
    fn error_messages() {
        let err = Error::from(SchemaError::ColumnNotFound {
            column: "zip".into(),
        });
        assert_eq!(err.to_string(), "column `zip` not found");

        let err = Error::from(ConfigError::BracketCountMismatch { open: 2, close: 1 });
        assert_eq!(
            err.to_string(),
            "2 open delimiters cannot be paired with 1 close delimiters"
        );
    }

    #[test]
    fn type_mismatch_display() {
        let err = SchemaError::TypeMismatch {
            column: "id".into(),
            expected: DataType::Utf8,
            found: DataType::Int64,
        };
        assert_eq!(err.to_string(), "column `id` has type i64, expected str");
    }
}
