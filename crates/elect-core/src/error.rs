//! Error types for the elect-core crate.
//!
//! This module provides two error types shared across the workspace:
//!
//! - [`SchemaError`] for malformed or inconsistent source data. Every schema
//!   error is fatal: the pipeline stops and no partial output is written.
//! - [`ConfigError`] for configuration loading and validation failures.

use camino::Utf8PathBuf;

/// Errors raised when source data does not have the expected shape.
///
/// # Examples
///
/// ```
/// use elect_core::SchemaError;
///
/// let error = SchemaError::missing_key("fields", "type 'office'");
/// assert!(error.to_string().contains("fields"));
/// assert!(error.to_string().contains("office"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A required key is absent.
    #[error("required key missing: '{key}' in {context}")]
    MissingKey {
        /// The missing key.
        key: String,
        /// Where the key was expected (e.g. `body 'ca_senate'`).
        context: String,
    },

    /// A `_meta._type` value is not one of the recognized file types.
    #[error("bad file type: {0:?}")]
    UnknownFileType(String),

    /// A type references a mixin that is not defined.
    #[error("type '{type_name}' references unknown mixin '{mixin_id}'")]
    UnknownMixin {
        /// The type declaring the mixin.
        type_name: String,
        /// The unresolved mixin id.
        mixin_id: String,
    },

    /// Objects reference categories outside the configured category order.
    #[error("unrecognized categories: {}", .0.join(", "))]
    UnknownCategories(Vec<String>),

    /// An i18n field points at a text id that is not in the phrase table.
    #[error("unknown text id '{text_id}' referenced by {context}")]
    BrokenTextId {
        /// The unresolved text id.
        text_id: String,
        /// The referencing object.
        context: String,
    },

    /// A phrase has no translation in a language that is required.
    #[error("text id '{text_id}' has no '{lang}' translation")]
    MissingTranslation {
        /// The phrase id.
        text_id: String,
        /// The missing language code.
        lang: String,
    },

    /// An object carries a field its type does not declare.
    #[error("{type_name} '{object_id}': undeclared field '{field}'")]
    UndeclaredField {
        /// The type the object was checked against.
        type_name: String,
        /// The object id.
        object_id: String,
        /// The offending field name.
        field: String,
    },

    /// A value has the wrong shape (e.g. a list where a mapping is needed).
    #[error("invalid value for '{key}' in {context}: expected {expected}")]
    InvalidValue {
        /// The key holding the value.
        key: String,
        /// Where the value was found.
        context: String,
        /// Description of the expected shape.
        expected: &'static str,
    },
}

impl SchemaError {
    /// Creates a new [`SchemaError::MissingKey`] error.
    #[inline]
    pub fn missing_key(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.into(),
            context: context.into(),
        }
    }

    /// Creates a new [`SchemaError::InvalidValue`] error.
    #[inline]
    pub fn invalid_value(
        key: impl Into<String>,
        context: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            context: context.into(),
            expected,
        }
    }

    /// Creates a new [`SchemaError::BrokenTextId`] error.
    #[inline]
    pub fn broken_text_id(text_id: impl Into<String>, context: impl Into<String>) -> Self {
        Self::BrokenTextId {
            text_id: text_id.into(),
            context: context.into(),
        }
    }
}

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use elect_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
