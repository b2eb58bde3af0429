//! Merging of per-language phrase files into one [`PhraseTable`].
//!
//! Each file in the phrase directory is named after its language code
//! (`es.yaml`) and holds a `texts` mapping. Files are parsed in parallel,
//! then reduced one at a time in sorted path order, so a language that
//! appears twice resolves the same way on every platform.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use elect_core::{I18nText, PhraseTable, SchemaError, i18n_field_name};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::DataError;
use crate::walker::PhraseFileWalker;

/// Key of the phrase mapping inside a phrase file.
const KEY_TEXTS: &str = "texts";

/// A scalar as written in a phrase file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// A single word of a phrase file.
///
/// An empty value (`es:` with nothing after it) is an untranslated word and
/// holds `None`. Numbers and booleans are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseWord(Option<String>);

impl<'de> Deserialize<'de> for PhraseWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let scalar = Option::<Scalar>::deserialize(deserializer)?;
        Ok(Self(scalar.map(Scalar::into_text)))
    }
}

impl PhraseWord {
    /// Returns the word, or `None` if it is untranslated.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// One entry of a phrase file's `texts` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PhraseEntry {
    /// The word in the file's language.
    Word(PhraseWord),
    /// Words keyed by language code; only the file's column is used.
    Columns(BTreeMap<String, PhraseWord>),
}

#[derive(Debug, Deserialize)]
struct PhraseFile {
    #[serde(default)]
    texts: Option<BTreeMap<String, PhraseEntry>>,
}

/// Returns the language code of a phrase file: its file stem.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use elect_data::lang_code_from_path;
///
/// assert_eq!(lang_code_from_path(Utf8Path::new("i18n/auto/zh.yaml")), Some("zh"));
/// ```
#[must_use]
pub fn lang_code_from_path(path: &Utf8Path) -> Option<&str> {
    path.file_stem().filter(|stem| !stem.is_empty())
}

/// Projects a `texts` mapping onto one language: `text_id -> word`.
///
/// Untranslated words and column entries without a `lang` column are left
/// out.
#[must_use]
pub fn project_words(texts: &BTreeMap<String, PhraseEntry>, lang: &str) -> Vec<(String, String)> {
    texts
        .iter()
        .filter_map(|(text_id, entry)| {
            let word = match entry {
                PhraseEntry::Word(word) => word,
                PhraseEntry::Columns(columns) => columns.get(lang)?,
            };
            Some((text_id.clone(), word.as_deref()?.to_owned()))
        })
        .collect()
}

/// Reads one phrase file, returning its language code and words.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, if its name yields no
/// language code, or if it has no `texts` mapping.
pub fn read_phrase_file(path: &Utf8Path) -> Result<(String, Vec<(String, String)>), DataError> {
    let lang = lang_code_from_path(path)
        .ok_or_else(|| SchemaError::invalid_value("file name", path.as_str(), "<lang_code>.yaml"))?;
    let file: PhraseFile = elect_yaml::read_value(path)?;
    let texts = file
        .texts
        .ok_or_else(|| SchemaError::missing_key(KEY_TEXTS, format!("phrase file {path}")))?;
    Ok((lang.to_owned(), project_words(&texts, lang)))
}

/// Merges phrase files into a table.
///
/// Files are parsed in parallel; the merge itself runs on the calling
/// thread, in the order of `paths`.
///
/// # Errors
///
/// Returns the first failure in `paths` order.
pub fn merge_phrases(paths: &[Utf8PathBuf]) -> Result<PhraseTable, DataError> {
    let parsed: Vec<_> = paths
        .par_iter()
        .map(|path| read_phrase_file(path))
        .collect();

    let mut table = PhraseTable::new();
    for (path, result) in paths.iter().zip(parsed) {
        let (lang, words) = result?;
        debug!(path = %path, lang = %lang, words = words.len(), "Merging phrase file");
        table.merge_language(&lang, words);
    }
    Ok(table)
}

/// Discovers the phrase files of `dir` and merges them.
pub fn read_phrase_dir(dir: &Utf8Path) -> Result<PhraseTable, DataError> {
    let paths = PhraseFileWalker::new(dir).collect_paths()?;
    let table = merge_phrases(&paths)?;
    info!(dir = %dir, files = paths.len(), phrases = table.len(), "Merged phrases");
    Ok(table)
}

/// A base-language field and its optional translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nField {
    /// The base-language value.
    pub value: String,
    /// Translations, present when the source references a phrase.
    pub translations: Option<I18nText>,
}

/// Reads `field` from a source object together with its i18n reference.
///
/// The base field is required. The `<field>_i18n` reference is optional,
/// but when present it must name a phrase in `phrases`.
///
/// # Errors
///
/// Returns [`SchemaError::MissingKey`] for an absent base field,
/// [`SchemaError::InvalidValue`] for non-string values and
/// [`SchemaError::BrokenTextId`] for an unknown text id.
pub fn i18n_field(
    source: &Map<String, Value>,
    field: &str,
    phrases: &PhraseTable,
    context: &str,
) -> Result<I18nField, SchemaError> {
    let value = string_field(source, field, context)?
        .ok_or_else(|| SchemaError::missing_key(field, context))?
        .to_owned();

    let i18n_name = i18n_field_name(field);
    let translations = match string_field(source, &i18n_name, context)? {
        Some(text_id) => Some(phrases.resolve(text_id, context)?.clone()),
        None => None,
    };

    Ok(I18nField {
        value,
        translations,
    })
}

/// Returns an optional string field, rejecting values of another type.
pub(crate) fn string_field<'a>(
    source: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<Option<&'a str>, SchemaError> {
    match source.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(SchemaError::invalid_value(field, context, "a string")),
    }
}
