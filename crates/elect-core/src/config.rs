//! Configuration structures for the elect toolkit.
//!
//! This module provides configuration types for all pipeline stages:
//!
//! - [`PathsConfig`] - Where source data, phrase files and outputs live
//! - [`AssemblyConfig`] - Which sources feed the document and how it is ordered
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with the values used by the
//! elections repository layout, and can be partially overridden from a JSON
//! file via [`Config::from_json_file`].

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hash::fx_hash_set;

/// Default category order; also the whitelist of recognized categories.
const DEFAULT_CATEGORY_ORDER: &[&str] = &[
    "category_federal",
    "category_state",
    "category_city_county",
    "category_school",
    "category_bart",
    "category_judicial",
    "category_party",
];

/// Default order of the non-English languages on rendered pages.
const DEFAULT_NON_ENGLISH_ORDER: &[&str] = &["zh", "es", "tl"];

/// Default page base names handed to the renderer.
const DEFAULT_PAGE_BASES: &[&str] = &[
    "index",
    "bodies",
    "district_types",
    "jurisdictions",
    "phrases",
    "languages",
];

/// Default source files (without extension) read from the pre-data directory.
const DEFAULT_SOURCES: &[&str] = &[
    "categories",
    "languages",
    "bodies",
    "offices",
    "district_types",
    "office_types",
];

fn to_owned_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Filesystem layout of the data repository.
///
/// Relative paths are resolved against [`root`](Self::root).
///
/// # Examples
///
/// ```
/// use elect_core::PathsConfig;
///
/// let config = PathsConfig::default();
/// assert_eq!(config.pre_data_dir, "pre_data");
/// assert_eq!(config.phrase_dir(), "i18n/auto");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Repository root.
    pub root: Utf8PathBuf,

    /// Directory holding the hand-authored source YAML files.
    pub pre_data_dir: Utf8PathBuf,

    /// Directory holding the language files.
    pub lang_dir: Utf8PathBuf,

    /// Subdirectory of [`lang_dir`](Self::lang_dir) with one `<lang>.yaml` per language.
    pub lang_auto_subdir: String,

    /// Output path of the source document (`make-json`).
    pub json_output: Utf8PathBuf,

    /// Output path of the canonical document (`build`).
    pub canonical_output: Utf8PathBuf,

    /// Optional type-definitions file used to validate source objects.
    pub type_definitions: Option<Utf8PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            pre_data_dir: Utf8PathBuf::from("pre_data"),
            lang_dir: Utf8PathBuf::from("i18n"),
            lang_auto_subdir: "auto".to_owned(),
            json_output: Utf8PathBuf::from("data/elect.json"),
            canonical_output: Utf8PathBuf::from("_build/canonical.json"),
            type_definitions: None,
        }
    }
}

impl PathsConfig {
    /// Resolves `path` against the root unless it is already absolute.
    #[must_use]
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.root.join(path)
        }
    }

    /// Directory containing the per-language phrase files, relative to the root.
    #[must_use]
    pub fn phrase_dir(&self) -> Utf8PathBuf {
        self.lang_dir.join(&self.lang_auto_subdir)
    }

    /// Path of a named source file (`<pre_data_dir>/<name>.yaml`), resolved.
    #[must_use]
    pub fn source_path(&self, name: &str) -> Utf8PathBuf {
        self.resolve(&self.pre_data_dir.join(format!("{name}.yaml")))
    }
}

/// Settings controlling how the canonical document is assembled.
///
/// # Examples
///
/// ```
/// use elect_core::AssemblyConfig;
///
/// let config = AssemblyConfig::default();
/// assert_eq!(config.base_language, "en");
/// assert_eq!(config.category_order.len(), 7);
/// assert!(config.include_court_of_appeals);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Source files (without extension) merged into the source document.
    pub sources: Vec<String>,

    /// Whether the generated court-of-appeals collections are added.
    pub include_court_of_appeals: bool,

    /// Base language; phrases without it are not published.
    pub base_language: String,

    /// Ordered category whitelist.
    pub category_order: Vec<String>,

    /// Order of the non-English language codes.
    pub non_english_order: Vec<String>,

    /// Page base names passed through to the renderer.
    pub page_bases: Vec<String>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            sources: to_owned_vec(DEFAULT_SOURCES),
            include_court_of_appeals: true,
            base_language: "en".to_owned(),
            category_order: to_owned_vec(DEFAULT_CATEGORY_ORDER),
            non_english_order: to_owned_vec(DEFAULT_NON_ENGLISH_ORDER),
            page_bases: to_owned_vec(DEFAULT_PAGE_BASES),
        }
    }
}

impl AssemblyConfig {
    /// Returns the base language followed by the non-English order.
    #[must_use]
    pub fn language_codes(&self) -> Vec<String> {
        let mut codes = Vec::with_capacity(self.non_english_order.len() + 1);
        codes.push(self.base_language.clone());
        codes.extend(self.non_english_order.iter().cloned());
        codes
    }
}

/// Root configuration for the elect toolkit.
///
/// # Examples
///
/// ```
/// use elect_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository layout.
    pub paths: PathsConfig,

    /// Assembly settings.
    pub assembly: AssemblyConfig,
}

impl Config {
    /// Loads a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks the settings that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assembly.base_language.is_empty() {
            return Err(ConfigError::invalid_option(
                "base_language",
                "must not be empty",
            ));
        }

        let mut seen = fx_hash_set();
        for category in &self.assembly.category_order {
            if !seen.insert(category.as_str()) {
                return Err(ConfigError::invalid_option(
                    "category_order",
                    format!("duplicate entry '{category}'"),
                ));
            }
        }

        if self
            .assembly
            .non_english_order
            .contains(&self.assembly.base_language)
        {
            return Err(ConfigError::invalid_option(
                "non_english_order",
                "must not contain the base language",
            ));
        }

        Ok(())
    }

    /// Checks that the repository root exists.
    pub fn require_root(&self) -> Result<(), ConfigError> {
        if self.paths.root.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::MissingDirectory(self.paths.root.clone()))
        }
    }
}
