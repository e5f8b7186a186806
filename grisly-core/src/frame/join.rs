//! Waterfall join: priority-ordered equi-joins that claim each left row once.
//!
//! Pass `i` joins the left rows no earlier pass claimed against the right
//! table on `left_on[i] == right_on`. Rows matched in a pass are added to the
//! claimed set and skipped by every later pass. The pass outputs are stacked,
//! sorted back into left-table order and stripped of the temporary row index.

use grisly_types::{ConfigError, Result};

use crate::frame::ops::check_join_types;
use crate::frame::stats::{PassStats, WaterfallStats};
use crate::frame::types::{Frame, RightMatch};

/// Name of the temporary row-index column added to the left table.
pub const DEFAULT_INDEX_COLUMN: &str = "__grisly_row_index";

/// Options for [`Frame::waterfall_join_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterfallOptions {
    /// How many right rows a left row keeps when its key matches several.
    pub right_match: RightMatch,
    /// Temporary row-index column; must not exist in the left table.
    pub index_column: String,
}

impl Default for WaterfallOptions {
    fn default() -> Self {
        Self {
            right_match: RightMatch::First,
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
        }
    }
}

impl WaterfallOptions {
    /// Sets the right-match policy.
    pub fn right_match(mut self, right_match: RightMatch) -> Self {
        self.right_match = right_match;
        self
    }

    /// Sets the temporary row-index column name.
    pub fn index_column(mut self, name: impl Into<String>) -> Self {
        self.index_column = name.into();
        self
    }
}

impl Frame {
    /// Waterfall join with default options.
    ///
    /// See [`Frame::waterfall_join_with`].
    pub fn waterfall_join<S: AsRef<str>>(
        &self,
        right: &Frame,
        left_on: &[S],
        right_on: &str,
    ) -> Result<(Frame, WaterfallStats)> {
        self.waterfall_join_with(right, left_on, right_on, &WaterfallOptions::default())
    }

    /// Joins `self` to `right` trying each `left_on` key in order.
    ///
    /// Each left row is claimed by the first key on which it matches and is
    /// never joined again; rows matching no key are dropped. Output rows are in left-table order. Output columns are
    /// the left columns followed by the right columns, clashing right names
    /// suffixed with `_right`.
    ///
    /// # Errors
    ///
    /// All checks run before the first pass:
    /// - `ConfigError::EmptyLeftOn` if `left_on` is empty
    /// - `SchemaError::ColumnNotFound` for a missing key column
    /// - `SchemaError::JoinKeyMismatch` if a left key's type differs from the right key's
    /// - `SchemaError::DuplicateColumn` if the index column name is taken or
    ///   the output would contain the same name twice
    pub fn waterfall_join_with<S: AsRef<str>>(
        &self,
        right: &Frame,
        left_on: &[S],
        right_on: &str,
        options: &WaterfallOptions,
    ) -> Result<(Frame, WaterfallStats)> {
        let Some(first_key) = left_on.first() else {
            return Err(ConfigError::EmptyLeftOn.into());
        };

        let right_key = right.column(right_on)?;
        for key in left_on {
            check_join_types(self.column(key.as_ref())?, right_key)?;
        }

        let index = options.index_column.as_str();
        let indexed = self.with_row_index(index)?;

        // Zero-row join: fixes the output schema and surfaces name clashes up front.
        let skeleton = indexed.take(&[]).inner_join(
            &right.take(&[]),
            first_key.as_ref(),
            right_on,
            options.right_match,
        )?;

        let mut claimed = vec![false; self.height()];
        let mut parts = Vec::with_capacity(left_on.len() + 1);
        parts.push(skeleton);
        let mut stats = WaterfallStats {
            left_rows: self.height(),
            passes: Vec::with_capacity(left_on.len()),
        };

        for key in left_on {
            let key = key.as_ref();
            let candidates = indexed.filter_index(index, |row| !claimed[row as usize])?;
            let joined = candidates.inner_join(right, key, right_on, options.right_match)?;

            let mut matched = 0;
            for row in joined.column(index)?.as_row_index()?.iter().flatten() {
                let slot = &mut claimed[*row as usize];
                if !*slot {
                    *slot = true;
                    matched += 1;
                }
            }

            log::debug!(
                "waterfall pass {} on `{}`: {} of {} candidates matched",
                stats.passes.len() + 1,
                key,
                matched,
                candidates.height()
            );

            stats.passes.push(PassStats {
                key: key.to_string(),
                dtype: self.column(key)?.dtype(),
                candidates: candidates.height(),
                matched,
            });
            parts.push(joined);
        }

        let output = Frame::concat(&parts)?.sort_by_index(index)?.drop(index)?;
        log::info!("waterfall join: {}", stats);

        Ok((output, stats))
    }
}
