//! Bracketed span removal.
//!
//! Deletes every span enclosed by a configured bracket pair, delimiters
//! included. Pairs nest: a span ends only at a close delimiter belonging to
//! the most recently opened pair, so `a(b[c)d]e)f` keeps `a` and `f`.
//!
//! ## Scan
//!
//! ```text
//! input : a ( b [ c ] d ) e
//! stack :   (   ([  (     -
//! output: a               e
//! ```
//!
//! - open delimiter of any pair: push it (output is suppressed while the stack is non-empty)
//! - close delimiter of the pair on top: pop
//! - any other close delimiter: ordinary content (suppressed, or copied when the stack is empty)
//! - end of input with a non-empty stack: the rest of the input is dropped
//!
//! Only bytes that can start a delimiter are inspected; the runs in between are
//! skipped with `memchr` when there are at most three distinct lead bytes.

use memchr::{memchr, memchr2, memchr3};
use smallvec::SmallVec;

use grisly_types::ConfigError;

use super::StringTransform;

/// Default open delimiters.
pub const DEFAULT_OPEN: &str = "([{<";

/// Default close delimiters.
pub const DEFAULT_CLOSE: &str = ")]}>";

/// Ordered list of `(open, close)` delimiter pairs.
///
/// Built either positionally (the i-th open delimiter pairs with the i-th
/// close delimiter) or, with `any_combination`, as the cross product of all
/// open and close delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSpec {
    pairs: Vec<(String, String)>,
}

impl Default for BracketSpec {
    fn default() -> Self {
        let pairs = DEFAULT_OPEN
            .chars()
            .zip(DEFAULT_CLOSE.chars())
            .map(|(o, c)| (o.to_string(), c.to_string()))
            .collect();
        Self { pairs }
    }
}

impl BracketSpec {
    /// Builds a pair set from open and close delimiter lists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyDelimiter` if any delimiter is empty and
    /// `ConfigError::BracketCountMismatch` if `any_combination` is off and the
    /// two lists have different lengths.
    pub fn new<O, C>(open: O, close: C, any_combination: bool) -> Result<Self, ConfigError>
    where
        O: IntoIterator,
        O::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let open: Vec<String> = open.into_iter().map(Into::into).collect();
        let close: Vec<String> = close.into_iter().map(Into::into).collect();

        if open.iter().chain(close.iter()).any(String::is_empty) {
            return Err(ConfigError::EmptyDelimiter);
        }

        let pairs = if any_combination {
            open.iter()
                .flat_map(|o| close.iter().map(move |c| (o.clone(), c.clone())))
                .collect()
        } else {
            if open.len() != close.len() {
                return Err(ConfigError::BracketCountMismatch {
                    open: open.len(),
                    close: close.len(),
                });
            }
            open.into_iter().zip(close).collect()
        };

        Ok(Self { pairs })
    }

    /// Builds a pair set where every character is a single-character delimiter.
    ///
    /// ```
    /// use grisly_core::analyzer::brackets::BracketSpec;
    ///
    /// let spec = BracketSpec::from_chars("([", ")]", false).unwrap();
    /// assert_eq!(spec.pairs().len(), 2);
    ///
    /// let spec = BracketSpec::from_chars("([", ")]", true).unwrap();
    /// assert_eq!(spec.pairs().len(), 4);
    /// ```
    pub fn from_chars(open: &str, close: &str, any_combination: bool) -> Result<Self, ConfigError> {
        Self::new(
            open.chars().map(String::from),
            close.chars().map(String::from),
            any_combination,
        )
    }

    /// The configured pairs, in order.
    #[inline]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns `true` when no pairs are configured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug, Clone)]
struct OpenDelim {
    text: String,
    /// Indices into `BracketSpanRemover::closes` that end a span opened here.
    closes: SmallVec<[usize; 4]>,
}

/// Stack-based remover for bracketed spans.
///
/// # Examples
///
/// ```
/// use grisly_core::analyzer::brackets::BracketSpanRemover;
///
/// let remover = BracketSpanRemover::default();
/// assert_eq!(remover.remove("a(b)c"), "ac");
/// assert_eq!(remover.remove("a(bc"), "a");
/// assert_eq!(remover.remove("x [y (z)] w"), "x  w");
/// ```
#[derive(Debug, Clone)]
pub struct BracketSpanRemover {
    spec: BracketSpec,
    /// Distinct open delimiters, longest first.
    opens: Vec<OpenDelim>,
    /// Distinct close delimiters.
    closes: Vec<String>,
    /// Bytes that can start any delimiter.
    lead_set: [bool; 256],
    lead_bytes: SmallVec<[u8; 8]>,
}

impl Default for BracketSpanRemover {
    fn default() -> Self {
        Self::new(BracketSpec::default())
    }
}

impl BracketSpanRemover {
    /// Compiles a remover for `spec`.
    pub fn new(spec: BracketSpec) -> Self {
        let mut opens: Vec<OpenDelim> = Vec::new();
        let mut closes: Vec<String> = Vec::new();

        for (open, close) in spec.pairs() {
            let close_idx = match closes.iter().position(|c| c == close) {
                Some(idx) => idx,
                None => {
                    closes.push(close.clone());
                    closes.len() - 1
                }
            };

            match opens.iter_mut().find(|o| &o.text == open) {
                Some(entry) => {
                    if !entry.closes.contains(&close_idx) {
                        entry.closes.push(close_idx);
                    }
                }
                None => opens.push(OpenDelim {
                    text: open.clone(),
                    closes: smallvec::smallvec![close_idx],
                }),
            }
        }

        // Longest open delimiter wins when several share a prefix.
        opens.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

        let mut lead_set = [false; 256];
        let mut lead_bytes = SmallVec::new();
        for delim in opens.iter().map(|o| &o.text).chain(closes.iter()) {
            if let Some(&b) = delim.as_bytes().first() {
                if !lead_set[b as usize] {
                    lead_set[b as usize] = true;
                    lead_bytes.push(b);
                }
            }
        }

        Self {
            spec,
            opens,
            closes,
            lead_set,
            lead_bytes,
        }
    }

    /// Builds the pair set and compiles it in one step.
    pub fn from_chars(open: &str, close: &str, any_combination: bool) -> Result<Self, ConfigError> {
        BracketSpec::from_chars(open, close, any_combination).map(Self::new)
    }

    /// The pair set this remover was built from.
    #[inline]
    pub fn spec(&self) -> &BracketSpec {
        &self.spec
    }

    /// Position of the next byte at or after `from` that can start a delimiter.
    #[inline]
    fn next_candidate(&self, bytes: &[u8], from: usize) -> Option<usize> {
        let hay = bytes.get(from..)?;
        let found = match self.lead_bytes.as_slice() {
            [] => None,
            [a] => memchr(*a, hay),
            [a, b] => memchr2(*a, *b, hay),
            [a, b, c] => memchr3(*a, *b, *c, hay),
            _ => hay.iter().position(|&b| self.lead_set[b as usize]),
        };
        found.map(|pos| from + pos)
    }

    #[inline]
    fn match_open(&self, rest: &str) -> Option<(usize, usize)> {
        self.opens
            .iter()
            .position(|o| rest.starts_with(o.text.as_str()))
            .map(|idx| (idx, self.opens[idx].text.len()))
    }

    #[inline]
    fn match_close(&self, open_idx: usize, rest: &str) -> Option<usize> {
        self.opens[open_idx]
            .closes
            .iter()
            .map(|&c| self.closes[c].as_str())
            .filter(|close| rest.starts_with(close))
            .map(str::len)
            .max()
    }

    fn write(&self, input: &str, out: &mut String) {
        let bytes = input.as_bytes();
        let mut stack: SmallVec<[usize; 8]> = SmallVec::new();
        // Start of the run that will be copied once the next span opens.
        let mut copy_from = 0usize;
        let mut i = 0usize;

        while let Some(at) = self.next_candidate(bytes, i) {
            // Lead bytes of UTF-8 strings are never continuation bytes, so `at`
            // is always a char boundary.
            let Some(rest) = input.get(at..) else {
                i = at + 1;
                continue;
            };

            if let Some(&top) = stack.last() {
                if let Some(len) = self.match_close(top, rest) {
                    stack.pop();
                    i = at + len;
                    if stack.is_empty() {
                        copy_from = i;
                    }
                    continue;
                }
                if let Some((open, len)) = self.match_open(rest) {
                    stack.push(open);
                    i = at + len;
                    continue;
                }
            } else if let Some((open, len)) = self.match_open(rest) {
                out.push_str(&input[copy_from..at]);
                stack.push(open);
                i = at + len;
                continue;
            }

            i = at + 1;
        }

        if stack.is_empty() {
            out.push_str(&input[copy_from..]);
        }
    }

    /// Removes bracketed spans into an existing String buffer, clearing it first.
    #[inline]
    pub fn remove_into(&self, input: &str, out: &mut String) {
        out.clear();
        self.write(input, out);
    }

    /// Removes bracketed spans and returns a new String.
    #[inline]
    pub fn remove(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.write(input, &mut out);
        out
    }
}

impl StringTransform for BracketSpanRemover {
    fn name(&self) -> &'static str {
        "remove_bracketed_content"
    }

    fn apply_into(&self, input: &str, out: &mut String) {
        self.write(input, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remove(input: &str) -> String {
        BracketSpanRemover::default().remove(input)
    }

    fn remove_with(input: &str, open: &str, close: &str, any: bool) -> String {
        BracketSpanRemover::from_chars(open, close, any)
            .unwrap()
            .remove(input)
    }

    #[test]
    fn simple_span() {
        assert_eq!(remove_with("a(b)c", "(", ")", false), "ac");
    }

    #[test]
    fn unmatched_open_drops_rest() {
        assert_eq!(remove_with("a(bc", "(", ")", false), "a");
        assert_eq!(remove("keep [drop (more"), "keep ");
    }

    #[test]
    fn unmatched_close_outside_span_is_literal() {
        assert_eq!(remove("a)b]c"), "a)b]c");
        assert_eq!(remove("x) (y) z"), "x)  z");
    }

    #[test]
    fn nested_same_type() {
        assert_eq!(remove("a((b)c)d"), "ad");
        assert_eq!(remove("a(((b)))c"), "ac");
    }

    #[test]
    fn nested_mixed_types() {
        assert_eq!(remove("x [y (z)] w"), "x  w");
        assert_eq!(remove("a{b<c>d}e"), "ae");
    }

    #[test]
    fn foreign_close_inside_span_is_suppressed() {
        assert_eq!(remove("a(b]c)d"), "ad");
        assert_eq!(remove("a(b[c)d]e)f"), "af");
    }

    #[test]
    fn several_spans() {
        assert_eq!(remove("John (Jack) Smith [Jr]"), "John  Smith ");
        assert_eq!(remove("(a)b(c)d(e)"), "bd");
    }

    #[test]
    fn no_brackets_is_identity() {
        assert_eq!(remove("plain text"), "plain text");
        assert_eq!(remove(""), "");
    }

    #[test]
    fn only_brackets() {
        assert_eq!(remove("()"), "");
        assert_eq!(remove("([]{}<>)"), "");
    }

    #[test]
    fn positional_pairing_ignores_cross_pairs() {
        assert_eq!(remove_with("a(b]c", "([", ")]", false), "a");
        assert_eq!(remove_with("a(b]c)d", "([", ")]", false), "ad");
    }

    #[test]
    fn any_combination_accepts_every_close() {
        assert_eq!(remove_with("a(b]c", "([", ")]", true), "ac");
        assert_eq!(remove_with("a[b)c", "([", ")]", true), "ac");
    }

    #[test]
    fn any_combination_still_nests() {
        assert_eq!(remove_with("a(b[c)d]e", "([", ")]", true), "ae");
    }

    #[test]
    fn same_open_and_close_delimiter() {
        assert_eq!(remove_with("say \"hi\" now", "\"", "\"", false), "say  now");
    }

    #[test]
    fn multi_char_delimiters() {
        let spec = BracketSpec::new(["<!--"], ["-->"], false).unwrap();
        let remover = BracketSpanRemover::new(spec);
        assert_eq!(remover.remove("a<!-- note -->b"), "ab");
        assert_eq!(remover.remove("a<!- no -->b"), "a<!- no -->b");
    }

    #[test]
    fn longest_open_delimiter_wins() {
        let spec = BracketSpec::new(["(", "(("], [")", "))"], false).unwrap();
        let remover = BracketSpanRemover::new(spec);
        assert_eq!(remover.remove("a((b)c))d"), "ad");
    }

    #[test]
    fn multibyte_delimiters_and_content() {
        assert_eq!(remove_with("日本「東京」都", "「", "」", false), "日本都");
        assert_eq!(remove_with("café «crème» noir", "«", "»", false), "café  noir");
        assert_eq!(remove("naïve (señor) ü"), "naïve  ü");
    }

    #[test]
    fn many_lead_bytes_use_table_scan() {
        let remover = BracketSpanRemover::from_chars("([{<«", ")]}>»", false).unwrap();
        assert!(remover.lead_bytes.len() > 3);
        assert_eq!(remover.remove("a«b»c<d>e"), "ace");
    }

    #[test]
    fn output_never_longer_than_input() {
        let samples = ["a(b)c", "a)b(", ")))", "((((", "x<y>z]", "«a» (b) [c"];
        for s in samples {
            assert!(remove(s).len() <= s.len());
        }
    }

    #[test]
    fn empty_spec_is_identity() {
        let spec = BracketSpec::new(Vec::<String>::new(), Vec::<String>::new(), false).unwrap();
        let remover = BracketSpanRemover::new(spec);
        assert!(remover.spec().is_empty());
        assert_eq!(remover.remove("a(b)c"), "a(b)c");
    }

    #[test]
    fn spec_count_mismatch() {
        assert_eq!(
            BracketSpec::from_chars("([", ")", false),
            Err(ConfigError::BracketCountMismatch { open: 2, close: 1 })
        );
        assert!(BracketSpec::from_chars("([", ")", true).is_ok());
    }

    #[test]
    fn spec_empty_delimiter() {
        assert_eq!(
            BracketSpec::new(["("], [""], false),
            Err(ConfigError::EmptyDelimiter)
        );
    }

    #[test]
    fn spec_cross_product_order() {
        let spec = BracketSpec::from_chars("([", ")]", true).unwrap();
        let pairs: Vec<(&str, &str)> = spec
            .pairs()
            .iter()
            .map(|(o, c)| (o.as_str(), c.as_str()))
            .collect();
        assert_eq!(pairs, vec![("(", ")"), ("(", "]"), ("[", ")"), ("[", "]")]);
    }

    #[test]
    fn default_spec() {
        assert_eq!(
            BracketSpec::default(),
            BracketSpec::from_chars(DEFAULT_OPEN, DEFAULT_CLOSE, false).unwrap()
        );
    }

    #[test]
    fn remove_into_clears_buffer() {
        let remover = BracketSpanRemover::default();
        let mut buf = String::from("stale");
        remover.remove_into("a(b)c", &mut buf);
        assert_eq!(buf, "ac");
    }
}
