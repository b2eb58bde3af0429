//! Error types for the elect-data crate.
//!
//! # Error Recovery Strategy
//!
//! Every [`DataError`] is fatal: a broken phrase file or an inconsistent
//! source stops the pipeline before any output is written. Filtered records
//! (offices without a translated name) are not errors and are only logged.

use elect_core::SchemaError;
use elect_yaml::YamlError;

/// Errors that can occur while building or assembling election data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Failed to walk the phrase directory.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// A YAML source could not be read or is malformed.
    #[error(transparent)]
    Yaml(#[from] YamlError),

    /// A node could not be converted to JSON.
    #[error("failed to convert to JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Source data violates the schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DataError {
    /// Returns `true` if this error reports inconsistent source data rather
    /// than an I/O or parsing problem.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        match self {
            Self::Schema(_) => true,
            Self::Yaml(err) => err.is_schema_error(),
            Self::Walk(_) | Self::NonUtf8Path(_) | Self::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_are_classified() {
        let err = DataError::from(SchemaError::UnknownCategories(vec!["category_moon".to_owned()]));
        assert!(err.is_schema_error());
        assert_eq!(err.to_string(), "unrecognized categories: category_moon");

        let err = DataError::from(YamlError::UnsupportedKey("[1]".to_owned()));
        assert!(!err.is_schema_error());

        let err = DataError::NonUtf8Path(std::path::PathBuf::from("x"));
        assert!(!err.is_schema_error());
    }
}
