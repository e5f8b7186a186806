//! Whitespace Word Tokenizer
//!
//! Splits a string into the maximal runs of non-whitespace characters it
//! contains. This is the word boundary shared by the word-level filters
//! ([`unique_words`](super::words::UniqueWordsFilter) and
//! [`map_words`](super::words::WordMapper)).
//!
//! ## What It Does
//!
//! Given input like `"  the\tcat\u{00A0}sat "`, it emits each word with its
//! ordinal position:
//!
//! ```ignore
//! ("the", 0)
//! ("cat", 1)
//! ("sat", 2)
//! ```
//!
//! ## Key Features
//!
//! - **Zero Allocation**: Tokens are slices of the original string
//! - **Streaming**: Uses a callback to emit tokens, no intermediate collection
//! - **Unicode Boundaries**: Any run of Unicode whitespace separates tokens
//!   (ASCII bytes take a table-free fast path)
//!
//! ## The Input Contract
//!
//! None. Leading, trailing and repeated whitespace are all allowed and never
//! produce empty tokens. Punctuation is part of the token it touches; this is
//! not a natural-language tokenizer.

use smallvec::SmallVec;

#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

#[inline(always)]
fn is_ws(ch: char) -> bool {
    if ch.is_ascii() {
        is_ascii_ws(ch as u8)
    } else {
        ch.is_whitespace()
    }
}

/// Streaming whitespace tokenizer.
///
/// Stateless and `Copy`; one instance can be shared by every thread.
///
/// ## Example
///
/// ```
/// use grisly_core::analyzer::tokenizer::WordTokenizer;
///
/// let mut count = 0;
/// WordTokenizer::new().tokenize("hello  world\tfoo", |_text, _pos| count += 1);
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes `input` and emits `(text, position)` for every token, left to right.
    #[inline(always)]
    #[allow(clippy::needless_lifetimes)]
    pub fn tokenize<'n, F>(&self, input: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let mut start: Option<usize> = None;
        let mut pos = 0u32;

        for (i, ch) in input.char_indices() {
            if is_ws(ch) {
                if let Some(s) = start.take() {
                    emit(&input[s..i], pos);
                    pos = pos.saturating_add(1);
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }

        if let Some(s) = start {
            emit(&input[s..], pos);
        }
    }

    /// Collects the tokens of `input` into a small vector.
    #[inline]
    pub fn split<'n>(&self, input: &'n str) -> SmallVec<[&'n str; 16]> {
        let mut out = SmallVec::new();
        self.tokenize(input, |text, _| out.push(text));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(&str, u32)> {
        let mut out = Vec::new();
        WordTokenizer::new().tokenize(input, |text, pos| out.push((text, pos)));
        out
    }

    #[test]
    fn single_word() {
        let out = collect("hello");
        assert_eq!(out, vec![("hello", 0)]);
    }

    #[test]
    fn two_words() {
        let out = collect("hello world");
        assert_eq!(out, vec![("hello", 0), ("world", 1)]);
    }

    #[test]
    fn positions_are_sequential() {
        let out = collect("the quick brown fox");
        assert_eq!(out.len(), 4);
        for (i, (_, pos)) in out.iter().enumerate() {
            assert_eq!(*pos, i as u32);
        }
    }

    #[test]
    fn empty_emits_nothing() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn whitespace_only_emits_nothing() {
        assert!(collect(" \t\r\n ").is_empty());
        assert!(collect("\u{3000}\u{00A0}").is_empty());
    }

    #[test]
    fn runs_of_whitespace_collapse() {
        let out = collect("  a \t\n b   c  ");
        let words: Vec<_> = out.iter().map(|(t, _)| *t).collect();
        assert_eq!(words, vec!["a", "b", "c"]);
    }

    #[test]
    fn unicode_whitespace_separates() {
        let words = WordTokenizer::new().split("a\u{00A0}b\u{2003}c\u{3000}d\u{0085}e");
        assert_eq!(words.as_slice(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn vertical_tab_and_form_feed_separate() {
        let words = WordTokenizer::new().split("a\x0Bb\x0Cc");
        assert_eq!(words.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn zero_width_space_is_not_whitespace() {
        let words = WordTokenizer::new().split("a\u{200B}b");
        assert_eq!(words.as_slice(), ["a\u{200B}b"]);
    }

    #[test]
    fn punctuation_stays_attached() {
        let words = WordTokenizer::new().split("hello, world!");
        assert_eq!(words.as_slice(), ["hello,", "world!"]);
    }

    #[test]
    fn multibyte_tokens() {
        let words = WordTokenizer::new().split("café 日本 🌍");
        assert_eq!(words.as_slice(), ["café", "日本", "🌍"]);
    }

    #[test]
    fn tokens_are_slices_of_input() {
        let input = String::from("hello world");
        let base = input.as_ptr() as usize;
        let end = base + input.len();

        WordTokenizer::new().tokenize(&input, |text, _| {
            let ptr = text.as_ptr() as usize;
            assert!(ptr >= base && ptr < end);
        });
    }

    #[test]
    fn tokenizer_is_reusable() {
        let t = WordTokenizer::new();

        let mut n = 0usize;
        t.tokenize("hello world", |_, _| n += 1);
        assert_eq!(n, 2);

        n = 0;
        t.tokenize("one two three", |_, _| n += 1);
        assert_eq!(n, 3);
    }
}
