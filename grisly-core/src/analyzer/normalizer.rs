use unicode_normalization::char::is_combining_mark;
use unicode_normalization::{
    is_nfc_quick, is_nfd_quick, is_nfkc_quick, is_nfkd_quick, IsNormalized, UnicodeNormalization,
};

use grisly_types::NormalizationForm;

use super::StringTransform;

/// Converts text to one of the four Unicode normalization forms.
///
/// Pure ASCII input and input that passes the Unicode quick-check for the
/// target form are copied through without running the (de)composition
/// iterators. Output is idempotent: normalizing twice with the same form
/// gives the same string as normalizing once.
///
/// # Examples
///
/// ```
/// use grisly_core::analyzer::normalizer::UnicodeNormalizer;
/// use grisly_types::NormalizationForm;
///
/// let nfc = UnicodeNormalizer::new(NormalizationForm::Nfc);
/// assert_eq!(nfc.normalize("cafe\u{0301}"), "café");
///
/// let nfkc = UnicodeNormalizer::new(NormalizationForm::Nfkc);
/// assert_eq!(nfkc.normalize("ﬁle"), "file");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeNormalizer {
    form: NormalizationForm,
}

impl UnicodeNormalizer {
    /// Creates a normalizer for `form`.
    pub const fn new(form: NormalizationForm) -> Self {
        Self { form }
    }

    /// The target form.
    #[inline]
    pub const fn form(&self) -> NormalizationForm {
        self.form
    }

    /// Returns `true` when `input` is known to already be in the target form.
    #[inline]
    fn already_normalized(&self, input: &str) -> bool {
        if input.is_ascii() {
            return true;
        }
        let chars = input.chars();
        let quick = match self.form {
            NormalizationForm::Nfc => is_nfc_quick(chars),
            NormalizationForm::Nfd => is_nfd_quick(chars),
            NormalizationForm::Nfkc => is_nfkc_quick(chars),
            NormalizationForm::Nfkd => is_nfkd_quick(chars),
        };
        quick == IsNormalized::Yes
    }

    #[inline]
    fn write(&self, input: &str, out: &mut String) {
        if self.already_normalized(input) {
            out.push_str(input);
            return;
        }
        match self.form {
            NormalizationForm::Nfc => out.extend(input.nfc()),
            NormalizationForm::Nfd => out.extend(input.nfd()),
            NormalizationForm::Nfkc => out.extend(input.nfkc()),
            NormalizationForm::Nfkd => out.extend(input.nfkd()),
        }
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());
        self.write(input, out);
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.write(input, &mut out);
        out
    }
}

impl StringTransform for UnicodeNormalizer {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply_into(&self, input: &str, out: &mut String) {
        self.write(input, out);
    }
}

/// Strips combining marks after canonical decomposition.
///
/// The input is decomposed as NFD and every codepoint whose general category
/// is Mark (`Mn`, `Mc`, `Me`) is dropped. The result is not recomposed.
/// Characters without a canonical decomposition (`ø`, `ł`, `æ`, `ß`, the `ﬁ`
/// ligature) are left as they are.
///
/// # Examples
///
/// ```
/// use grisly_core::analyzer::normalizer::DiacriticStripper;
///
/// assert_eq!(DiacriticStripper::new().strip("café"), "cafe");
/// assert_eq!(DiacriticStripper::new().strip("Łódź"), "Łodz");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiacriticStripper;

impl DiacriticStripper {
    /// Creates a new stripper.
    pub const fn new() -> Self {
        Self
    }

    #[inline]
    fn write(&self, input: &str, out: &mut String) {
        if input.is_ascii() {
            out.push_str(input);
            return;
        }
        out.extend(input.nfd().filter(|&c| !is_combining_mark(c)));
    }

    /// Strips marks into an existing String buffer, clearing it first.
    #[inline]
    pub fn strip_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());
        self.write(input, out);
    }

    /// Strips marks and returns a new String.
    #[inline]
    pub fn strip(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.write(input, &mut out);
        out
    }
}

impl StringTransform for DiacriticStripper {
    fn name(&self) -> &'static str {
        "remove_diacritics"
    }

    fn apply_into(&self, input: &str, out: &mut String) {
        self.write(input, out);
    }
}
