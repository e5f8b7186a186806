//! Column and table types.

use grisly_types::{DataType, RowIndex, SchemaError};

use crate::arena::StrArena;

/// One cell, borrowed from its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyValue<'a> {
    /// Missing value.
    Null,
    /// String cell.
    Utf8(&'a str),
    /// Signed integer cell.
    Int64(i64),
    /// Unsigned 32-bit cell (row indices).
    UInt32(u32),
    /// Float cell.
    Float64(f64),
    /// Boolean cell.
    Boolean(bool),
}

impl AnyValue<'_> {
    /// Returns `true` for [`AnyValue::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, AnyValue::Null)
    }
}

/// How many right rows a left row may pick up in one inner join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RightMatch {
    /// Every matching right row (plain inner-join multiplicity).
    All,
    /// Only the first matching right row, in right-table order.
    #[default]
    First,
}

/// Typed, nullable column storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Strings, arena-backed.
    Utf8(StrArena),
    /// Signed integers.
    Int64(Vec<Option<i64>>),
    /// Unsigned 32-bit integers.
    UInt32(Vec<Option<u32>>),
    /// Floats.
    Float64(Vec<Option<f64>>),
    /// Booleans.
    Boolean(Vec<Option<bool>>),
}

fn gather_vec<T: Copy>(values: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
    rows.iter()
        .map(|&row| values.get(row).copied().flatten())
        .collect()
}

impl ColumnData {
    /// Logical type.
    pub fn dtype(&self) -> DataType {
        match self {
            ColumnData::Utf8(_) => DataType::Utf8,
            ColumnData::Int64(_) => DataType::Int64,
            ColumnData::UInt32(_) => DataType::UInt32,
            ColumnData::Float64(_) => DataType::Float64,
            ColumnData::Boolean(_) => DataType::Boolean,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Utf8(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::UInt32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row`; out-of-range rows read as null.
    pub fn get(&self, row: usize) -> AnyValue<'_> {
        let value = match self {
            ColumnData::Utf8(v) => v.get(row).map(AnyValue::Utf8),
            ColumnData::Int64(v) => v.get(row).copied().flatten().map(AnyValue::Int64),
            ColumnData::UInt32(v) => v.get(row).copied().flatten().map(AnyValue::UInt32),
            ColumnData::Float64(v) => v.get(row).copied().flatten().map(AnyValue::Float64),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(AnyValue::Boolean),
        };
        value.unwrap_or(AnyValue::Null)
    }

    /// New column holding `rows`, in that order.
    pub fn gather(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Utf8(v) => ColumnData::Utf8(v.gather(rows)),
            ColumnData::Int64(v) => ColumnData::Int64(gather_vec(v, rows)),
            ColumnData::UInt32(v) => ColumnData::UInt32(gather_vec(v, rows)),
            ColumnData::Float64(v) => ColumnData::Float64(gather_vec(v, rows)),
            ColumnData::Boolean(v) => ColumnData::Boolean(gather_vec(v, rows)),
        }
    }

    /// Appends the rows of `other`, which must have the same type.
    pub(crate) fn append(&mut self, other: &ColumnData) -> Result<(), DataType> {
        match (self, other) {
            (ColumnData::Utf8(a), ColumnData::Utf8(b)) => a.extend_from(b),
            (ColumnData::Int64(a), ColumnData::Int64(b)) => a.extend_from_slice(b),
            (ColumnData::UInt32(a), ColumnData::UInt32(b)) => a.extend_from_slice(b),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => a.extend_from_slice(b),
            (ColumnData::Boolean(a), ColumnData::Boolean(b)) => a.extend_from_slice(b),
            (_, other) => return Err(other.dtype()),
        }
        Ok(())
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Creates a column from typed data.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// String column from optional values.
    pub fn utf8<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut arena = StrArena::new();
        for value in values {
            match value {
                Some(s) => arena.push(s.as_ref()),
                None => arena.push_null(),
            };
        }
        Self::new(name, ColumnData::Utf8(arena))
    }

    /// Signed integer column.
    pub fn int64(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int64(values.into_iter().collect()))
    }

    /// Unsigned 32-bit column.
    pub fn uint32(name: impl Into<String>, values: impl IntoIterator<Item = Option<u32>>) -> Self {
        Self::new(name, ColumnData::UInt32(values.into_iter().collect()))
    }

    /// Float column.
    pub fn float64(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float64(values.into_iter().collect()))
    }

    /// Boolean column.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    /// Column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed storage.
    #[inline]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Logical type.
    #[inline]
    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the column has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at `row`.
    #[inline]
    pub fn get(&self, row: usize) -> AnyValue<'_> {
        self.data.get(row)
    }

    /// Same data under a new name.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The string storage of a `Utf8` column.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::TypeMismatch` for any other type.
    pub fn as_utf8(&self) -> Result<&StrArena, SchemaError> {
        match &self.data {
            ColumnData::Utf8(arena) => Ok(arena),
            other => Err(SchemaError::TypeMismatch {
                column: self.name.clone(),
                expected: DataType::Utf8,
                found: other.dtype(),
            }),
        }
    }

    /// The values of a `UInt32` column.
    pub(crate) fn as_row_index(&self) -> Result<&[Option<RowIndex>], SchemaError> {
        match &self.data {
            ColumnData::UInt32(values) => Ok(values),
            other => Err(SchemaError::TypeMismatch {
                column: self.name.clone(),
                expected: DataType::UInt32,
                found: other.dtype(),
            }),
        }
    }
}

/// In-memory columnar table.
///
/// All columns have the same number of rows and distinct names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub(crate) columns: Vec<Column>,
    pub(crate) height: usize,
}

impl Frame {
    /// Builds a table from columns.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateColumn` if two columns share a name and
    /// `SchemaError::LengthMismatch` if their lengths differ.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let height = columns.first().map_or(0, Column::len);

        for (i, column) in columns.iter().enumerate() {
            if column.len() != height {
                return Err(SchemaError::LengthMismatch {
                    column: column.name.clone(),
                    expected: height,
                    found: column.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { columns, height })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the table has no rows.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// All columns, in order.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// `(name, type)` for every column.
    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.columns.iter().map(|c| (c.name(), c.dtype())).collect()
    }

    /// Position of the column called `name`.
    #[inline]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns `true` if a column called `name` exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Column by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ColumnNotFound` if it does not exist.
    pub fn column(&self, name: &str) -> Result<&Column, SchemaError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                column: name.to_owned(),
            })
    }

    /// All cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<AnyValue<'_>>> {
        (row < self.height).then(|| self.columns.iter().map(|c| c.get(row)).collect())
    }
}
