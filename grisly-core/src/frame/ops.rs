//! Relational operations: select, filter, gather, join, concat, sort.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use grisly_types::{RowIndex, SchemaError};

use crate::frame::types::{AnyValue, Column, Frame, RightMatch};

/// Suffix appended to right columns whose name clashes with a left column.
pub const RIGHT_SUFFIX: &str = "_right";

/// Hashable form of a non-null join key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum JoinKey<'a> {
    Utf8(&'a str),
    Int64(i64),
    UInt32(u32),
    Float64(u64),
    Boolean(bool),
}

impl<'a> JoinKey<'a> {
    /// Null keys never match anything.
    #[inline]
    fn from_value(value: AnyValue<'a>) -> Option<Self> {
        match value {
            AnyValue::Null => None,
            AnyValue::Utf8(s) => Some(JoinKey::Utf8(s)),
            AnyValue::Int64(v) => Some(JoinKey::Int64(v)),
            AnyValue::UInt32(v) => Some(JoinKey::UInt32(v)),
            AnyValue::Float64(v) => Some(JoinKey::Float64(canonical_bits(v))),
            AnyValue::Boolean(v) => Some(JoinKey::Boolean(v)),
        }
    }
}

/// Bit pattern with `-0.0 == 0.0` and all NaNs equal.
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl Frame {
    fn from_parts(columns: Vec<Column>, height: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == height));
        Self { columns, height }
    }

    /// Keeps only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame, SchemaError> {
        let columns = names
            .iter()
            .map(|name| self.column(name.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Frame::new(columns)
    }

    /// Adds `column`, replacing any existing column with the same name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::LengthMismatch` unless the column has the
    /// table's height (any height is accepted for a table without columns).
    pub fn with_column(&self, column: Column) -> Result<Frame, SchemaError> {
        if !self.columns.is_empty() && column.len() != self.height {
            return Err(SchemaError::LengthMismatch {
                column: column.name().to_owned(),
                expected: self.height,
                found: column.len(),
            });
        }

        let height = column.len();
        let mut columns = self.columns.clone();
        match self.column_index(column.name()) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Ok(Self::from_parts(columns, height))
    }

    /// Prepends a `UInt32` column numbering the rows `0..height`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateColumn` if `name` is already taken.
    pub fn with_row_index(&self, name: &str) -> Result<Frame, SchemaError> {
        if self.contains(name) {
            return Err(SchemaError::DuplicateColumn(name.to_owned()));
        }

        let index = Column::uint32(name, (0..self.height).map(|row| Some(row as RowIndex)));
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(index);
        columns.extend(self.columns.iter().cloned());
        Ok(Self::from_parts(columns, self.height))
    }

    /// Removes a column.
    pub fn drop(&self, name: &str) -> Result<Frame, SchemaError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                column: name.to_owned(),
            })?;

        let mut columns = self.columns.clone();
        columns.remove(idx);
        let height = if columns.is_empty() { 0 } else { self.height };
        Ok(Self::from_parts(columns, height))
    }

    /// New table holding `rows`, in that order.
    pub fn take(&self, rows: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name(), c.data().gather(rows)))
            .collect();
        let height = if self.columns.is_empty() { 0 } else { rows.len() };
        Self::from_parts(columns, height)
    }

    /// Keeps the rows whose mask entry is `true`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::LengthMismatch` if the mask length differs from the height.
    pub fn filter_mask(&self, mask: &[bool]) -> Result<Frame, SchemaError> {
        if mask.len() != self.height {
            return Err(SchemaError::LengthMismatch {
                column: "<mask>".to_owned(),
                expected: self.height,
                found: mask.len(),
            });
        }

        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(row, &keep)| keep.then_some(row))
            .collect();
        Ok(self.take(&rows))
    }

    /// Keeps the rows whose `UInt32` index column satisfies `keep`.
    ///
    /// Rows with a null index are dropped.
    pub fn filter_index<F>(&self, name: &str, mut keep: F) -> Result<Frame, SchemaError>
    where
        F: FnMut(RowIndex) -> bool,
    {
        let index = self.column(name)?.as_row_index()?;
        let rows: Vec<usize> = index
            .iter()
            .enumerate()
            .filter_map(|(row, idx)| match idx {
                Some(idx) if keep(*idx) => Some(row),
                _ => None,
            })
            .collect();
        Ok(self.take(&rows))
    }

    /// Stable ascending sort on a `UInt32` column; nulls go last.
    pub fn sort_by_index(&self, name: &str) -> Result<Frame, SchemaError> {
        let index = self.column(name)?.as_row_index()?;
        let mut rows: Vec<usize> = (0..self.height).collect();
        rows.sort_by_key(|&row| match index[row] {
            Some(idx) => (false, idx),
            None => (true, 0),
        });
        Ok(self.take(&rows))
    }

    /// Stacks tables vertically.
    ///
    /// An empty slice gives an empty table.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::SchemaMismatch` unless every table has the same
    /// column names and types in the same order.
    pub fn concat(frames: &[Frame]) -> Result<Frame, SchemaError> {
        let Some((first, rest)) = frames.split_first() else {
            return Ok(Frame::empty());
        };

        let mut columns = first.columns.clone();
        let mut height = first.height;

        for frame in rest {
            if frame.width() != columns.len() {
                return Err(SchemaError::SchemaMismatch(format!(
                    "expected {} columns, found {}",
                    columns.len(),
                    frame.width()
                )));
            }
            for (acc, next) in columns.iter_mut().zip(&frame.columns) {
                if acc.name() != next.name() {
                    return Err(SchemaError::SchemaMismatch(format!(
                        "expected column `{}`, found `{}`",
                        acc.name(),
                        next.name()
                    )));
                }
                let expected = acc.dtype();
                let mut data = acc.data().clone();
                data.append(next.data()).map_err(|found| {
                    SchemaError::SchemaMismatch(format!(
                        "column `{}` is {expected} in one table and {found} in another",
                        acc.name()
                    ))
                })?;
                *acc = Column::new(acc.name(), data);
            }
            height += frame.height;
        }

        Ok(Self::from_parts(columns, height))
    }

    /// Hash inner equi-join on `self[left_on] == right[right_on]`.
    ///
    /// Output rows follow left-row order, then right-row order. Output
    /// columns are all left columns followed by all right columns; a right
    /// column whose name is already used gets the `_right` suffix. Null keys
    /// never match.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ColumnNotFound` for a missing key column and
    /// `SchemaError::JoinKeyMismatch` if the key types differ.
    pub fn inner_join(
        &self,
        right: &Frame,
        left_on: &str,
        right_on: &str,
        right_match: RightMatch,
    ) -> Result<Frame, SchemaError> {
        let left_key = self.column(left_on)?;
        let right_key = right.column(right_on)?;
        check_join_types(left_key, right_key)?;

        let mut table: FxHashMap<JoinKey<'_>, SmallVec<[usize; 1]>> = FxHashMap::default();
        for row in 0..right.height {
            if let Some(key) = JoinKey::from_value(right_key.get(row)) {
                let rows = table.entry(key).or_default();
                if right_match == RightMatch::All || rows.is_empty() {
                    rows.push(row);
                }
            }
        }

        let mut left_rows = Vec::new();
        let mut right_rows = Vec::new();
        for row in 0..self.height {
            let Some(key) = JoinKey::from_value(left_key.get(row)) else {
                continue;
            };
            if let Some(matches) = table.get(&key) {
                for &r in matches {
                    left_rows.push(row);
                    right_rows.push(r);
                }
            }
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.width() + right.width());
        columns.extend(
            self.columns
                .iter()
                .map(|c| Column::new(c.name(), c.data().gather(&left_rows))),
        );
        for c in &right.columns {
            let name = if self.contains(c.name()) {
                format!("{}{RIGHT_SUFFIX}", c.name())
            } else {
                c.name().to_owned()
            };
            columns.push(Column::new(name, c.data().gather(&right_rows)));
        }

        Frame::new(columns)
    }
}

/// Key columns must have the same type.
pub(crate) fn check_join_types(left: &Column, right: &Column) -> Result<(), SchemaError> {
    if left.dtype() != right.dtype() {
        return Err(SchemaError::JoinKeyMismatch {
            left: left.name().to_owned(),
            right: right.name().to_owned(),
            left_type: left.dtype(),
            right_type: right.dtype(),
        });
    }
    Ok(())
}
