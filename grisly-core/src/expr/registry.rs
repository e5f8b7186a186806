//! Process-wide table of elementwise operations.
//!
//! Maps an operation name to a constructor that validates JSON keyword
//! arguments and returns a ready transform. The table is built once, on first
//! use, and never changes afterwards.

use std::sync::Arc;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use serde_json::Value;

use grisly_types::ConfigError;

use crate::analyzer::{
    BracketSpanRemover, DiacriticStripper, StringTransform, UnicodeNormalizer, UniqueWordsFilter,
    WordMapper,
};
use crate::expr::kwargs::{decode, BracketKwargs, MapWordsKwargs, NoKwargs, NormalizeKwargs};

/// Shared, thread-safe transform.
pub type SharedTransform = Arc<dyn StringTransform>;

/// Builds a transform from keyword arguments.
pub type Constructor = fn(&Value) -> Result<SharedTransform, ConfigError>;

lazy_static! {
    static ref REGISTRY: Registry = Registry::builtin();
}

/// Operation name to constructor.
pub struct Registry {
    entries: FxHashMap<&'static str, Constructor>,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl Registry {
    /// The global registry with every built-in operation.
    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    fn builtin() -> Self {
        let mut entries: FxHashMap<&'static str, Constructor> = FxHashMap::default();
        entries.insert("normalize", normalize);
        entries.insert("remove_diacritics", remove_diacritics);
        entries.insert("remove_bracketed_content", remove_bracketed_content);
        entries.insert("unique_words", unique_words);
        entries.insert("map_words", map_words);

        let registry = Self { entries };
        log::debug!("registered operations: {}", registry.names().join(", "));
        registry
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Validates `kwargs` and builds the transform registered as `name`.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnknownOperation` for an unregistered name, otherwise
    /// whatever the operation's validation reports.
    pub fn build(&self, name: &str, kwargs: &Value) -> Result<SharedTransform, ConfigError> {
        let constructor = self
            .entries
            .get(name)
            .ok_or_else(|| ConfigError::UnknownOperation(name.to_string()))?;
        constructor(kwargs)
    }
}

fn normalize(kwargs: &Value) -> Result<SharedTransform, ConfigError> {
    let args: NormalizeKwargs = decode("normalize", kwargs)?;
    Ok(Arc::new(UnicodeNormalizer::new(args.form()?)))
}

fn remove_diacritics(kwargs: &Value) -> Result<SharedTransform, ConfigError> {
    decode::<NoKwargs>("remove_diacritics", kwargs)?;
    Ok(Arc::new(DiacriticStripper::new()))
}

fn remove_bracketed_content(kwargs: &Value) -> Result<SharedTransform, ConfigError> {
    let args: BracketKwargs = decode("remove_bracketed_content", kwargs)?;
    Ok(Arc::new(BracketSpanRemover::new(args.into_spec()?)))
}

fn unique_words(kwargs: &Value) -> Result<SharedTransform, ConfigError> {
    decode::<NoKwargs>("unique_words", kwargs)?;
    Ok(Arc::new(UniqueWordsFilter::new()))
}

fn map_words(kwargs: &Value) -> Result<SharedTransform, ConfigError> {
    let args: MapWordsKwargs = decode("map_words", kwargs)?;
    Ok(Arc::new(WordMapper::new(args.mapping)))
}
