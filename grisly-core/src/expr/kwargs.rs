//! JSON keyword arguments accepted by the registered operations.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use grisly_types::{ConfigError, NormalizationForm};

use crate::analyzer::brackets::{BracketSpec, DEFAULT_CLOSE, DEFAULT_OPEN};

/// Decodes `kwargs` for `operation`. `null` reads as `{}`.
pub(crate) fn decode<T: DeserializeOwned>(operation: &str, kwargs: &Value) -> Result<T, ConfigError> {
    let result = if kwargs.is_null() {
        T::deserialize(&Value::Object(serde_json::Map::new()))
    } else {
        T::deserialize(kwargs)
    };

    result.map_err(|e| ConfigError::InvalidKwargs {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}

/// `normalize {form}`.
///
/// The form is kept as text so an unknown name surfaces as
/// `ConfigError::UnknownForm` rather than a decode error.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizeKwargs {
    /// Form name, e.g. `"NFKC"`.
    pub form: String,
}

impl NormalizeKwargs {
    /// Parsed normalization form.
    pub fn form(&self) -> Result<NormalizationForm, ConfigError> {
        self.form.parse()
    }
}

/// Operations that take no arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoKwargs {}

/// Delimiters as one string of single-character delimiters or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Delimiters {
    /// `"([{"`: every character is a delimiter.
    Chars(String),
    /// `["(", "<<"]`: every element is a delimiter.
    List(Vec<String>),
}

impl Delimiters {
    /// Individual delimiters, in order.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Delimiters::Chars(s) => s.chars().map(String::from).collect(),
            Delimiters::List(list) => list,
        }
    }
}

/// `remove_bracketed_content {open_brackets, close_brackets, any_combination}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BracketKwargs {
    /// Open delimiters, default `([{<`.
    pub open_brackets: Delimiters,
    /// Close delimiters, default `)]}>`.
    pub close_brackets: Delimiters,
    /// Pair every open with every close.
    pub any_combination: bool,
}

impl Default for BracketKwargs {
    fn default() -> Self {
        Self {
            open_brackets: Delimiters::Chars(DEFAULT_OPEN.to_string()),
            close_brackets: Delimiters::Chars(DEFAULT_CLOSE.to_string()),
            any_combination: false,
        }
    }
}

impl BracketKwargs {
    /// Validated pair set.
    pub fn into_spec(self) -> Result<BracketSpec, ConfigError> {
        BracketSpec::new(
            self.open_brackets.into_vec(),
            self.close_brackets.into_vec(),
            self.any_combination,
        )
    }
}

/// `map_words {mapping}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapWordsKwargs {
    /// Word to replacement.
    pub mapping: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_reads_as_empty_object() {
        let kwargs: BracketKwargs = decode("remove_bracketed_content", &Value::Null).unwrap();
        assert_eq!(kwargs.open_brackets, Delimiters::Chars("([{<".into()));
        assert!(!kwargs.any_combination);
        assert!(decode::<NoKwargs>("unique_words", &Value::Null).is_ok());
    }

    #[test]
    fn delimiters_accept_string_or_list() {
        let kwargs: BracketKwargs = decode(
            "remove_bracketed_content",
            &json!({"open_brackets": "(", "close_brackets": [")"]}),
        )
        .unwrap();
        assert_eq!(kwargs.open_brackets.clone().into_vec(), vec!["("]);
        assert_eq!(kwargs.close_brackets.clone().into_vec(), vec![")"]);
        assert_eq!(kwargs.into_spec().unwrap().pairs().len(), 1);
    }

    #[test]
    fn multi_char_list_delimiters() {
        let kwargs: BracketKwargs = decode(
            "remove_bracketed_content",
            &json!({"open_brackets": ["<<", "("], "close_brackets": [">>", ")"]}),
        )
        .unwrap();
        let spec = kwargs.into_spec().unwrap();
        assert_eq!(spec.pairs()[0], ("<<".to_string(), ">>".to_string()));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = decode::<NoKwargs>("remove_diacritics", &json!({"strict": true})).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidKwargs { ref operation, .. } if operation == "remove_diacritics"
        ));
    }

    #[test]
    fn missing_required_field() {
        assert!(decode::<NormalizeKwargs>("normalize", &json!({})).is_err());
        assert!(decode::<MapWordsKwargs>("map_words", &Value::Null).is_err());
    }

    #[test]
    fn normalize_form_errors_are_unknown_form() {
        let kwargs: NormalizeKwargs = decode("normalize", &json!({"form": "NFX"})).unwrap();
        assert_eq!(kwargs.form(), Err(ConfigError::UnknownForm("NFX".into())));

        let kwargs: NormalizeKwargs = decode("normalize", &json!({"form": "nfkd"})).unwrap();
        assert_eq!(kwargs.form(), Ok(NormalizationForm::Nfkd));
    }

    #[test]
    fn mismatched_bracket_counts() {
        let kwargs: BracketKwargs = decode(
            "remove_bracketed_content",
            &json!({"open_brackets": "([", "close_brackets": ")"}),
        )
        .unwrap();
        assert_eq!(
            kwargs.into_spec(),
            Err(ConfigError::BracketCountMismatch { open: 2, close: 1 })
        );
    }
}
