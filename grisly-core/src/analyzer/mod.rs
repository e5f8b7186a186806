//! Elementwise text transforms.
//!
//! This module provides the per-value components:
//! - **Tokenizer**: Splits text into whitespace-delimited words
//! - **Normalizer**: Unicode normalization forms and diacritic stripping
//! - **Brackets**: Removes nested bracketed spans
//! - **Words**: Word deduplication and word-level mapping
//!
//! Every component implements [`StringTransform`]. Transforms hold no
//! per-call state, so one instance can be shared across threads and applied
//! to rows in any order; row `i` of the output depends only on row `i` of
//! the input.

pub mod brackets;
pub mod normalizer;
pub mod tokenizer;
pub mod words;

use core::fmt;
use std::ops::Range;

use rayon::prelude::*;

use crate::arena::StrArena;

pub use brackets::{BracketSpanRemover, BracketSpec};
pub use normalizer::{DiacriticStripper, UnicodeNormalizer};
pub use tokenizer::WordTokenizer;
pub use words::{UniqueWordsFilter, WordMapper};

/// Columns with at least this many rows are processed in parallel.
pub const PARALLEL_THRESHOLD: usize = 16 * 1024;

/// Rows handled by one parallel task.
const CHUNK_ROWS: usize = 4 * 1024;

/// A pure string-to-string function applied once per row.
pub trait StringTransform: Send + Sync + fmt::Debug {
    /// Registered operation name.
    fn name(&self) -> &'static str;

    /// Appends the transformed `input` to `out`.
    ///
    /// Must only append; never fails for well-formed input.
    fn apply_into(&self, input: &str, out: &mut String);

    /// Transforms one nullable value. Null in, null out.
    fn apply(&self, value: Option<&str>) -> Option<String> {
        value.map(|input| {
            let mut out = String::with_capacity(input.len());
            self.apply_into(input, &mut out);
            out
        })
    }
}

fn apply_chunk<T>(transform: &T, input: &StrArena, rows: Range<usize>) -> StrArena
where
    T: StringTransform + ?Sized,
{
    let mut out = StrArena::with_capacity(0, rows.len());
    for row in rows {
        match input.get(row) {
            Some(value) => out.push_with(|buf| transform.apply_into(value, buf)),
            None => out.push_null(),
        };
    }
    out
}

/// Applies `transform` to every row of a string column.
///
/// Null rows stay null and row order is preserved. Large columns are split
/// into contiguous chunks that run on the rayon pool; the chunk outputs are
/// stitched back together in order.
pub fn apply_elementwise<T>(transform: &T, input: &StrArena) -> StrArena
where
    T: StringTransform + ?Sized,
{
    let len = input.len();
    if len < PARALLEL_THRESHOLD {
        return apply_chunk(transform, input, 0..len);
    }

    let starts: Vec<usize> = (0..len).step_by(CHUNK_ROWS).collect();
    log::trace!(
        "{}: {} rows in {} parallel chunks",
        transform.name(),
        len,
        starts.len()
    );

    let chunks: Vec<StrArena> = starts
        .par_iter()
        .map(|&start| apply_chunk(transform, input, start..(start + CHUNK_ROWS).min(len)))
        .collect();

    let bytes = chunks.iter().map(StrArena::byte_len).sum();
    let mut out = StrArena::with_capacity(bytes, len);
    for chunk in &chunks {
        out.extend_from(chunk);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use grisly_types::NormalizationForm;

    #[test]
    fn elementwise_keeps_nulls_and_order() {
        let input: StrArena = [Some("a a"), None, Some("b c b"), Some("")]
            .into_iter()
            .collect();
        let out = apply_elementwise(&UniqueWordsFilter::new(), &input);
        let values: Vec<_> = out.iter().collect();
        assert_eq!(values, vec![Some("a"), None, Some("b c"), Some("")]);
    }

    #[test]
    fn elementwise_parallel_matches_sequential() {
        let rows = PARALLEL_THRESHOLD + CHUNK_ROWS / 2 + 7;
        let owned: Vec<Option<String>> = (0..rows)
            .map(|i| (i % 5 != 0).then(|| format!("Caf\u{00E9} ({i}) {}", i % 3)))
            .collect();
        let input: StrArena = owned.iter().map(Option::as_deref).collect();

        let stripper = DiacriticStripper::new();
        let out = apply_elementwise(&stripper, &input);
        assert_eq!(out.len(), rows);

        for (i, value) in out.iter().enumerate() {
            assert_eq!(value.map(str::to_owned), stripper.apply(owned[i].as_deref()));
        }
    }

    #[test]
    fn elementwise_works_through_trait_objects() {
        let transform: Box<dyn StringTransform> =
            Box::new(UnicodeNormalizer::new(NormalizationForm::Nfd));
        let input: StrArena = ["\u{00E9}"].into_iter().collect();
        let out = apply_elementwise(transform.as_ref(), &input);
        assert_eq!(out.get(0), Some("e\u{0301}"));
    }

    #[test]
    fn elementwise_empty_column() {
        let out = apply_elementwise(&DiacriticStripper::new(), &StrArena::new());
        assert!(out.is_empty());
    }
}
