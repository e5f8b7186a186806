use grisly_core::analyzer::{
    BracketSpanRemover, DiacriticStripper, StringTransform, UnicodeNormalizer, UniqueWordsFilter,
    WordMapper,
};
use grisly_core::NormalizationForm;

const SAMPLES: &[&str] = &[
    "",
    "plain ascii",
    "Café crème",
    "e\u{0301}te\u{0301}",
    "\u{FB01}ne \u{2460} \u{FF21}",
    "\u{1E9B}\u{0323}",
    "한국어 \u{1100}\u{1161}\u{11A8}",
    "Ångström (Å) \u{212B}",
    "mixed \u{0041}\u{030A}\u{0323} marks",
];

#[test]
fn normalize_is_idempotent() {
    for form in NormalizationForm::ALL {
        let normalizer = UnicodeNormalizer::new(form);
        for s in SAMPLES {
            let once = normalizer.normalize(s);
            assert_eq!(normalizer.normalize(&once), once, "{form} on {s:?}");
        }
    }
}

#[test]
fn every_operation_propagates_null() {
    let transforms: Vec<Box<dyn StringTransform>> = vec![
        Box::new(UnicodeNormalizer::new(NormalizationForm::Nfkc)),
        Box::new(DiacriticStripper::new()),
        Box::new(BracketSpanRemover::default()),
        Box::new(UniqueWordsFilter::new()),
        Box::new(WordMapper::new([("a", "b")])),
    ];
    for t in &transforms {
        assert_eq!(t.apply(None), None, "{}", t.name());
        assert!(t.apply(Some("x")).is_some(), "{}", t.name());
    }
}

#[test]
fn diacritics_removed() {
    assert_eq!(DiacriticStripper::new().strip("café"), "cafe");
}

#[test]
fn bracket_examples() {
    let remover = BracketSpanRemover::from_chars("(", ")", false).unwrap();
    assert_eq!(remover.remove("a(b)c"), "ac");
    assert_eq!(remover.remove("a(bc"), "a");
}

#[test]
fn bracket_output_never_longer() {
    let remover = BracketSpanRemover::from_chars("([{<", ")]}>", true).unwrap();
    for s in SAMPLES
        .iter()
        .copied()
        .chain(["a(b[c)d]e", ")))(((", "<<x>> (y", "[é(ü)]ö"])
    {
        assert!(remover.remove(s).len() <= s.len(), "{s:?}");
    }
}

#[test]
fn unique_words_example() {
    assert_eq!(
        UniqueWordsFilter::new().filter("the cat and the dog"),
        "the cat and dog"
    );
}

#[test]
fn unique_words_keeps_first_appearance_order() {
    let out = UniqueWordsFilter::new().filter("c a c b a d b");
    assert_eq!(out, "c a b d");
}

#[test]
fn map_words_example() {
    let mapper = WordMapper::new([("red", "blue")]);
    assert_eq!(mapper.map("red car is red"), "blue car is blue");
}

#[test]
fn strip_after_nfd_equals_strip() {
    let nfd = UnicodeNormalizer::new(NormalizationForm::Nfd);
    let strip = DiacriticStripper::new();
    for s in SAMPLES {
        assert_eq!(strip.strip(&nfd.normalize(s)), strip.strip(s), "{s:?}");
    }
}
