//! Column expressions over string transforms.
//!
//! An [`Expr`] names a source column and an ordered chain of transforms.
//! Every transform is validated when it is added, so evaluating an
//! expression can only fail on the table's shape, never on its parameters.
//!
//! ```
//! use grisly_core::expr::{col, StringExpr};
//! use grisly_core::frame::{AnyValue, Column, Frame};
//! use grisly_core::NormalizationForm;
//!
//! let frame = Frame::new(vec![Column::utf8("name", [Some("Café (old) café")])]).unwrap();
//! let expr = col("name")
//!     .normalize(NormalizationForm::Nfc)
//!     .remove_diacritics()
//!     .remove_bracketed_content("(", ")", false)
//!     .unwrap()
//!     .unique_words()
//!     .alias("clean");
//!
//! let out = frame.with_expr(&expr).unwrap();
//! assert_eq!(out.column("clean").unwrap().get(0), AnyValue::Utf8("Cafe cafe"));
//! ```

pub mod kwargs;
pub mod registry;

use std::sync::Arc;

use serde_json::Value;

use grisly_types::{ConfigError, NormalizationForm, SchemaError};

use crate::analyzer::{
    apply_elementwise, BracketSpanRemover, BracketSpec, DiacriticStripper, StringTransform,
    UnicodeNormalizer, UniqueWordsFilter, WordMapper,
};
use crate::arena::StrArena;
use crate::frame::{Column, ColumnData, Frame};

pub use registry::{Constructor, Registry, SharedTransform};

/// A string column run through a chain of transforms.
#[derive(Debug, Clone)]
pub struct Expr {
    column: String,
    alias: Option<String>,
    chain: Vec<SharedTransform>,
}

/// Reference to the column called `name`.
pub fn col(name: impl Into<String>) -> Expr {
    Expr {
        column: name.into(),
        alias: None,
        chain: Vec::new(),
    }
}

impl Expr {
    /// Source column name.
    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Name of the produced column: the alias, or the source column.
    #[inline]
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column)
    }

    /// Names the produced column.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// Registered names of the chained transforms, in order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.chain.iter().map(|t| t.name()).collect()
    }

    /// Appends a transform.
    pub fn then<T: StringTransform + 'static>(self, transform: T) -> Self {
        self.then_shared(Arc::new(transform))
    }

    /// Appends an already shared transform.
    pub fn then_shared(mut self, transform: SharedTransform) -> Self {
        self.chain.push(transform);
        self
    }

    /// Appends the registered operation `name` built from JSON `kwargs`.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnknownOperation` or the operation's own validation error.
    pub fn call(self, name: &str, kwargs: &Value) -> Result<Self, ConfigError> {
        let transform = Registry::global().build(name, kwargs)?;
        Ok(self.then_shared(transform))
    }

    /// Runs the chain over the source column of `frame`.
    ///
    /// # Errors
    ///
    /// `SchemaError::ColumnNotFound` if the column is missing and
    /// `SchemaError::TypeMismatch` if it is not a string column.
    pub fn evaluate(&self, frame: &Frame) -> Result<Column, SchemaError> {
        let source = frame.column(&self.column)?.as_utf8()?;

        let mut current: Option<StrArena> = None;
        for transform in &self.chain {
            let input = current.as_ref().unwrap_or(source);
            current = Some(apply_elementwise(transform.as_ref(), input));
        }

        let data = current.unwrap_or_else(|| source.clone());
        Ok(Column::new(self.output_name(), ColumnData::Utf8(data)))
    }
}

/// One method per text operation, each returning the extended expression.
pub trait StringExpr: Sized {
    /// Converts to the given Unicode normalization form.
    fn normalize(self, form: NormalizationForm) -> Self;

    /// Removes combining marks after canonical decomposition.
    fn remove_diacritics(self) -> Self;

    /// Removes bracketed spans; every character is a single-character delimiter.
    ///
    /// # Errors
    ///
    /// `ConfigError::BracketCountMismatch` when `any_combination` is off and
    /// the delimiter counts differ.
    fn remove_bracketed_content(
        self,
        open_brackets: &str,
        close_brackets: &str,
        any_combination: bool,
    ) -> Result<Self, ConfigError>;

    /// Removes bracketed spans for a prebuilt pair set.
    fn remove_brackets(self, spec: BracketSpec) -> Self;

    /// Drops repeated words.
    fn unique_words(self) -> Self;

    /// Replaces whole words through `mapping`.
    fn map_words<I, K, V>(self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
}

impl StringExpr for Expr {
    fn normalize(self, form: NormalizationForm) -> Self {
        self.then(UnicodeNormalizer::new(form))
    }

    fn remove_diacritics(self) -> Self {
        self.then(DiacriticStripper::new())
    }

    fn remove_bracketed_content(
        self,
        open_brackets: &str,
        close_brackets: &str,
        any_combination: bool,
    ) -> Result<Self, ConfigError> {
        let spec = BracketSpec::from_chars(open_brackets, close_brackets, any_combination)?;
        Ok(self.remove_brackets(spec))
    }

    fn remove_brackets(self, spec: BracketSpec) -> Self {
        self.then(BracketSpanRemover::new(spec))
    }

    fn unique_words(self) -> Self {
        self.then(UniqueWordsFilter::new())
    }

    fn map_words<I, K, V>(self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.then(WordMapper::new(mapping))
    }
}

impl Frame {
    /// Evaluates `expr` and adds the result, replacing a same-named column.
    pub fn with_expr(&self, expr: &Expr) -> Result<Frame, SchemaError> {
        self.with_column(expr.evaluate(self)?)
    }

    /// Evaluates every expression against `self`, then adds the results in order.
    ///
    /// Expressions never see each other's output.
    pub fn with_exprs(&self, exprs: &[Expr]) -> Result<Frame, SchemaError> {
        let columns = exprs
            .iter()
            .map(|e| e.evaluate(self))
            .collect::<Result<Vec<_>, _>>()?;

        let mut frame = self.clone();
        for column in columns {
            frame = frame.with_column(column)?;
        }
        Ok(frame)
    }
}
