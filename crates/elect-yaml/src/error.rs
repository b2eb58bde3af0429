//! Error types for the elect-yaml crate.
//!
//! # Error Recovery Strategy
//!
//! None of these errors are recoverable: a file that cannot be read, parsed
//! or typed aborts the run. The only tolerated condition (a `manual` file
//! passed to the normalizer) is not an error at all, see
//! [`NormalizeOutcome::Skipped`](crate::NormalizeOutcome::Skipped).

use camino::{Utf8Path, Utf8PathBuf};
use elect_core::SchemaError;

/// Errors that can occur while reading or writing YAML documents.
#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The file that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid YAML, or does not match the requested shape.
    #[error("failed to parse YAML file {path}: {source}")]
    Parse {
        /// The file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A document's top level is not a mapping.
    #[error("top level of {0} is not a mapping")]
    NotAMapping(Utf8PathBuf),

    /// A document's header or content violates the schema.
    #[error("for file {path}: {source}")]
    Schema {
        /// The offending file.
        path: Utf8PathBuf,
        /// The schema violation.
        #[source]
        source: SchemaError,
    },

    /// A document's header violates the schema (no file involved yet).
    #[error(transparent)]
    InvalidDocument(#[from] SchemaError),

    /// A mapping key cannot be written in block style.
    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),
}

impl YamlError {
    /// Creates a new [`YamlError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`YamlError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Attaches a file path to a pathless schema error.
    #[must_use]
    pub fn with_path(self, path: &Utf8Path) -> Self {
        match self {
            Self::InvalidDocument(source) => Self::Schema {
                path: path.to_owned(),
                source,
            },
            other => other,
        }
    }

    /// Returns `true` if this error reports a schema violation.
    #[inline]
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::InvalidDocument(_))
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Parse { path, .. }
            | Self::Schema { path, .. }
            | Self::NotAMapping(path) => Some(path.as_path()),
            Self::InvalidDocument(_) | Self::UnsupportedKey(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_path_wraps_schema_errors() {
        let err = YamlError::from(SchemaError::UnknownFileType("odd".to_owned()));
        assert!(err.path().is_none());

        let err = err.with_path(Utf8Path::new("pre_data/bodies.yaml"));
        assert!(err.is_schema_error());
        assert_eq!(err.path().map(Utf8Path::as_str), Some("pre_data/bodies.yaml"));
        assert!(err.to_string().contains("pre_data/bodies.yaml"));
        assert!(err.to_string().contains("odd"));
    }

    #[test]
    fn test_with_path_keeps_other_errors() {
        let err = YamlError::read("a.yaml", io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = err.with_path(Utf8Path::new("b.yaml"));
        assert_eq!(err.path().map(Utf8Path::as_str), Some("a.yaml"));
        assert!(!err.is_schema_error());
    }
}
