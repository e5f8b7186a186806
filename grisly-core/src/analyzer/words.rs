//! Word-level filters built on [`WordTokenizer`].
//!
//! Both filters rejoin the words they keep with a single ASCII space, so any
//! original run of whitespace (tabs, newlines, repeated spaces) collapses.

use rustc_hash::{FxHashMap, FxHashSet};

use super::tokenizer::WordTokenizer;
use super::StringTransform;

/// Drops repeated words, keeping the first occurrence of each.
///
/// Comparison is exact: `The` and `the` are different words.
///
/// ```
/// use grisly_core::analyzer::words::UniqueWordsFilter;
///
/// let filter = UniqueWordsFilter::new();
/// assert_eq!(filter.filter("the cat and the dog"), "the cat and dog");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueWordsFilter {
    tokenizer: WordTokenizer,
}

impl UniqueWordsFilter {
    /// Creates a new filter.
    pub const fn new() -> Self {
        Self {
            tokenizer: WordTokenizer::new(),
        }
    }

    fn write(&self, input: &str, out: &mut String) {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut first = true;

        self.tokenizer.tokenize(input, |word, _| {
            if seen.insert(word) {
                if !first {
                    out.push(' ');
                }
                out.push_str(word);
                first = false;
            }
        });
    }

    /// Filters into an existing String buffer, clearing it first.
    #[inline]
    pub fn filter_into(&self, input: &str, out: &mut String) {
        out.clear();
        self.write(input, out);
    }

    /// Filters and returns a new String.
    #[inline]
    pub fn filter(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.write(input, &mut out);
        out
    }
}

impl StringTransform for UniqueWordsFilter {
    fn name(&self) -> &'static str {
        "unique_words"
    }

    fn apply_into(&self, input: &str, out: &mut String) {
        self.write(input, out);
    }
}

/// Replaces whole words through a lookup table.
///
/// Lookup is exact-match on the complete word; words that are not keys are
/// kept unchanged. Replacements are not looked up again, so `a -> b` and
/// `b -> c` map `a` to `b`.
///
/// ```
/// use grisly_core::analyzer::words::WordMapper;
///
/// let mapper = WordMapper::new([("red", "blue")]);
/// assert_eq!(mapper.map("red car is red"), "blue car is blue");
/// ```
#[derive(Debug, Default, Clone)]
pub struct WordMapper {
    tokenizer: WordTokenizer,
    table: FxHashMap<String, String>,
}

impl WordMapper {
    /// Builds a mapper from `(word, replacement)` pairs.
    ///
    /// A key given more than once keeps its last replacement.
    pub fn new<I, K, V>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            tokenizer: WordTokenizer::new(),
            table,
        }
    }

    /// Number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` for an empty table (the mapper is then a whitespace-collapsing no-op).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Replacement for `word`, if any.
    #[inline]
    pub fn get(&self, word: &str) -> Option<&str> {
        self.table.get(word).map(String::as_str)
    }

    fn write(&self, input: &str, out: &mut String) {
        let mut first = true;

        self.tokenizer.tokenize(input, |word, _| {
            if !first {
                out.push(' ');
            }
            out.push_str(self.get(word).unwrap_or(word));
            first = false;
        });
    }

    /// Maps into an existing String buffer, clearing it first.
    #[inline]
    pub fn map_into(&self, input: &str, out: &mut String) {
        out.clear();
        self.write(input, out);
    }

    /// Maps and returns a new String.
    #[inline]
    pub fn map(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.write(input, &mut out);
        out
    }
}

impl StringTransform for WordMapper {
    fn name(&self) -> &'static str {
        "map_words"
    }

    fn apply_into(&self, input: &str, out: &mut String) {
        self.write(input, out);
    }
}
