//! Contiguous storage for a column of nullable strings.
//!
//! Every value of a string column lives in one shared buffer. Rows are
//! referenced by `(offset, len)` spans; a null row has no span.
//!
//! ## Memory Layout
//!
//! ```text
//! Buffer: [row0][row2][row3]...[free space]
//!         ^     ^     ^
//!         |     |     |
//! Spans: (0,5) None (5,7) (12,4) ...
//! ```
//!
//! ## Performance
//!
//! - Append: O(len) copy, amortized O(1) growth
//! - Retrieval: O(1) slice from buffer
//! - Transforms can write straight into the buffer via [`StrArena::push_with`],
//!   so a batch pass allocates once per column instead of once per row

use std::ops::Range;

/// Location of one non-null value inside the arena buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueSpan {
    offset: usize,
    len: usize,
}

impl ValueSpan {
    /// Creates a new value span.
    #[inline(always)]
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Returns the byte offset in the arena.
    #[inline(always)]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Returns the byte length.
    #[inline(always)]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Returns `true` for an empty string value.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    const fn range(self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Arena-backed nullable UTF-8 column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrArena {
    /// Contiguous storage buffer
    buffer: String,
    /// One entry per row; `None` marks a null
    spans: Vec<Option<ValueSpan>>,
}

impl StrArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new arena with pre-allocated capacity.
    pub fn with_capacity(bytes: usize, rows: usize) -> Self {
        Self {
            buffer: String::with_capacity(bytes),
            spans: Vec::with_capacity(rows),
        }
    }

    /// Returns the number of rows stored, nulls included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if no rows are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of null rows.
    pub fn null_count(&self) -> usize {
        self.spans.iter().filter(|s| s.is_none()).count()
    }

    /// Total bytes of string data held.
    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clears all rows (keeps capacity).
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.spans.clear();
    }

    /// Appends a non-null value and returns its row number.
    #[inline]
    pub fn push(&mut self, text: &str) -> usize {
        self.push_with(|buf| buf.push_str(text))
    }

    /// Appends a null row and returns its row number.
    #[inline]
    pub fn push_null(&mut self) -> usize {
        let row = self.spans.len();
        self.spans.push(None);
        row
    }

    /// Appends an optional value.
    #[inline]
    pub fn push_opt(&mut self, value: Option<&str>) -> usize {
        match value {
            Some(text) => self.push(text),
            None => self.push_null(),
        }
    }

    /// Appends a non-null value produced by `write`.
    ///
    /// `write` receives the arena buffer and must only append to it; whatever
    /// it appends becomes the new row.
    #[inline]
    pub fn push_with<F>(&mut self, write: F) -> usize
    where
        F: FnOnce(&mut String),
    {
        let row = self.spans.len();
        let offset = self.buffer.len();
        write(&mut self.buffer);
        debug_assert!(
            self.buffer.len() >= offset,
            "arena writer truncated previous rows"
        );
        self.spans
            .push(Some(ValueSpan::new(offset, self.buffer.len() - offset)));
        row
    }

    /// Gets a row. Returns `None` for null rows and out-of-range indices.
    #[inline(always)]
    pub fn get(&self, row: usize) -> Option<&str> {
        let span = (*self.spans.get(row)?)?;
        self.buffer.get(span.range())
    }

    /// Returns `true` if the row exists and is null.
    #[inline]
    pub fn is_null(&self, row: usize) -> bool {
        matches!(self.spans.get(row), Some(None))
    }

    /// Iterates rows in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<&str>> + '_ {
        self.spans
            .iter()
            .map(move |span| span.and_then(|s| self.buffer.get(s.range())))
    }

    /// Appends every row of `other`, preserving order.
    pub fn extend_from(&mut self, other: &StrArena) {
        let base = self.buffer.len();
        self.buffer.push_str(&other.buffer);
        self.spans.extend(
            other
                .spans
                .iter()
                .map(|span| span.map(|s| ValueSpan::new(s.offset + base, s.len))),
        );
    }

    /// Builds a new arena holding the given rows, in the given order.
    ///
    /// Out-of-range indices produce null rows.
    pub fn gather(&self, rows: &[usize]) -> StrArena {
        let mut out = StrArena::with_capacity(0, rows.len());
        for &row in rows {
            out.push_opt(self.get(row));
        }
        out
    }
}

impl<'a> FromIterator<Option<&'a str>> for StrArena {
    fn from_iter<I: IntoIterator<Item = Option<&'a str>>>(iter: I) -> Self {
        let mut arena = StrArena::new();
        for value in iter {
            arena.push_opt(value);
        }
        arena
    }
}

impl<'a> FromIterator<&'a str> for StrArena {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Some).collect()
    }
}
