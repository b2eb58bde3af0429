//! Phrase tables and i18n field naming.
//!
//! A translatable field comes in two parts: a plain field holding the
//! base-language text (`name`) and an i18n field (`name_i18n`) holding the
//! text id of the phrase. The [`PhraseTable`] maps text ids to their
//! translations.
//!
//! # Examples
//!
//! ```
//! use elect_core::{PhraseTable, i18n_field_name};
//!
//! let mut table = PhraseTable::new();
//! table.insert("office_mayor", "en", "Mayor");
//! table.insert("office_mayor", "es", "Alcalde");
//!
//! assert_eq!(i18n_field_name("name"), "name_i18n");
//! assert_eq!(table.get("office_mayor").map(|t| t.len()), Some(2));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Suffix marking an i18n reference field.
pub const I18N_SUFFIX: &str = "_i18n";

/// Translations of one phrase: language code to text.
pub type I18nText = BTreeMap<String, String>;

/// Returns the i18n field name paired with a plain field.
#[inline]
#[must_use]
pub fn i18n_field_name(field: &str) -> String {
    format!("{field}{I18N_SUFFIX}")
}

/// Returns the plain field name for an i18n field, or `None` if `field` is
/// not an i18n field.
///
/// # Examples
///
/// ```
/// use elect_core::simple_field_name;
///
/// assert_eq!(simple_field_name("name_i18n"), Some("name"));
/// assert_eq!(simple_field_name("name"), None);
/// ```
#[inline]
#[must_use]
pub fn simple_field_name(field: &str) -> Option<&str> {
    field
        .strip_suffix(I18N_SUFFIX)
        .filter(|simple| !simple.is_empty())
}

/// Merged translations: text id to language code to text.
///
/// Backed by ordered maps so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseTable {
    phrases: BTreeMap<String, I18nText>,
}

impl PhraseTable {
    /// Creates an empty table.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the translation of `text_id` in `lang`, replacing any previous one.
    pub fn insert(&mut self, text_id: impl Into<String>, lang: impl Into<String>, word: impl Into<String>) {
        self.phrases
            .entry(text_id.into())
            .or_default()
            .insert(lang.into(), word.into());
    }

    /// Adds every `(text_id, word)` pair of one language.
    pub fn merge_language<I>(&mut self, lang: &str, words: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (text_id, word) in words {
            self.insert(text_id, lang, word);
        }
    }

    /// Returns the translations of a phrase.
    #[inline]
    #[must_use]
    pub fn get(&self, text_id: &str) -> Option<&I18nText> {
        self.phrases.get(text_id)
    }

    /// Returns the translations of a phrase, treating an unknown id as a
    /// broken reference from `context`.
    pub fn resolve(&self, text_id: &str, context: &str) -> Result<&I18nText, SchemaError> {
        self.get(text_id)
            .ok_or_else(|| SchemaError::broken_text_id(text_id, context))
    }

    /// Returns the translation of a phrase in one language.
    pub fn translation(
        &self,
        text_id: &str,
        lang: &str,
        context: &str,
    ) -> Result<&str, SchemaError> {
        self.resolve(text_id, context)?
            .get(lang)
            .map(String::as_str)
            .ok_or_else(|| SchemaError::MissingTranslation {
                text_id: text_id.to_owned(),
                lang: lang.to_owned(),
            })
    }

    /// Returns the phrases that have a non-empty translation in `base_lang`,
    /// in text id order.
    #[must_use]
    pub fn published(&self, base_lang: &str) -> Vec<Phrase> {
        self.phrases
            .iter()
            .filter(|(_, translations)| {
                translations
                    .get(base_lang)
                    .is_some_and(|word| !word.is_empty())
            })
            .map(|(id, translations)| Phrase {
                id: id.clone(),
                translations: translations.clone(),
            })
            .collect()
    }

    /// Number of phrases.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Returns `true` if the table holds no phrases.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Iterates over phrases in text id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &I18nText)> {
        self.phrases.iter()
    }
}

/// A published phrase: its id plus one entry per language.
///
/// Serializes flat, e.g. `{"id": "office_mayor", "en": "Mayor", "es": "Alcalde"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// The text id.
    pub id: String,

    /// Translations keyed by language code.
    #[serde(flatten)]
    pub translations: I18nText,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PhraseTable {
        let mut table = PhraseTable::new();
        table.insert("t1", "en", "Hello");
        table.insert("t1", "fr", "Bonjour");
        table.insert("t2", "fr", "Seulement");
        table.insert("t3", "en", "");
        table
    }

    #[test]
    fn test_simple_field_name_requires_prefix() {
        assert_eq!(simple_field_name("_i18n"), None);
        assert_eq!(simple_field_name("title_i18n"), Some("title"));
        // A trailing 'n' must not be eaten the way character stripping would.
        assert_eq!(simple_field_name("division_i18n"), Some("division"));
    }

    #[test]
    fn test_merge_language_is_order_independent() {
        let english = vec![("t1".to_owned(), "Hello".to_owned())];
        let french = vec![("t1".to_owned(), "Bonjour".to_owned())];

        let mut forward = PhraseTable::new();
        forward.merge_language("en", english.clone());
        forward.merge_language("fr", french.clone());

        let mut backward = PhraseTable::new();
        backward.merge_language("fr", french);
        backward.merge_language("en", english);

        assert_eq!(forward, backward);
        let t1 = forward.get("t1").unwrap();
        assert_eq!(t1.get("en").map(String::as_str), Some("Hello"));
        assert_eq!(t1.get("fr").map(String::as_str), Some("Bonjour"));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let table = sample_table();
        let err = table.resolve("missing", "body 'x'").unwrap_err();
        assert!(matches!(err, SchemaError::BrokenTextId { .. }));
    }

    #[test]
    fn test_translation_missing_language() {
        let table = sample_table();
        assert_eq!(table.translation("t1", "fr", "ctx").unwrap(), "Bonjour");
        let err = table.translation("t2", "en", "ctx").unwrap_err();
        assert!(matches!(err, SchemaError::MissingTranslation { .. }));
    }

    #[test]
    fn test_published_drops_phrases_without_base_language() {
        let table = sample_table();
        let published = table.published("en");
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, "t1");
    }

    #[test]
    fn test_phrase_serializes_flat() {
        let table = sample_table();
        let phrase = &table.published("en")[0];
        let json = serde_json::to_value(phrase).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "t1", "en": "Hello", "fr": "Bonjour"})
        );
    }
}
