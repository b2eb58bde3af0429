//! File type tags.
//!
//! Every YAML source file declares a [`FileType`] in its `_meta` header. The
//! tag decides which warning comment is written into the header and whether
//! the normalizer may rewrite the file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Warning written into the header of auto-generated files.
const AUTO_GENERATED_COMMENT: &str =
    "WARNING: this file is auto-generated. Do not edit it by hand; changes will be overwritten.";

/// Warning written into the header of auto-updated files.
const AUTO_UPDATED_COMMENT: &str = "WARNING: this file is auto-updated. \
     Hand edits are kept, but the file is re-serialized in canonical form.";

/// The `_meta._type` tag of a YAML source file.
///
/// # Examples
///
/// ```
/// use elect_core::FileType;
///
/// let file_type: FileType = "auto_generated".parse().unwrap();
/// assert!(file_type.is_normalizable());
/// assert!(!FileType::Manual.is_normalizable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Written by hand; never rewritten by tooling.
    Manual,

    /// Produced entirely by tooling.
    AutoGenerated,

    /// Hand-maintained but periodically rewritten by tooling.
    AutoUpdated,
}

impl FileType {
    /// All file types, in declaration order.
    pub const ALL: [Self; 3] = [Self::Manual, Self::AutoGenerated, Self::AutoUpdated];

    /// Returns the tag as written in YAML.
    ///
    /// # Examples
    ///
    /// ```
    /// use elect_core::FileType;
    ///
    /// assert_eq!(FileType::AutoUpdated.as_str(), "auto_updated");
    /// ```
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::AutoGenerated => "auto_generated",
            Self::AutoUpdated => "auto_updated",
        }
    }

    /// Returns the fixed warning comment for this type, if it has one.
    #[inline]
    #[must_use]
    pub const fn comment(self) -> Option<&'static str> {
        match self {
            Self::Manual => None,
            Self::AutoGenerated => Some(AUTO_GENERATED_COMMENT),
            Self::AutoUpdated => Some(AUTO_UPDATED_COMMENT),
        }
    }

    /// Returns `true` if tooling may rewrite files of this type.
    ///
    /// This is a whitelist: only the two automatic types qualify.
    #[inline]
    #[must_use]
    pub const fn is_normalizable(self) -> bool {
        matches!(self, Self::AutoGenerated | Self::AutoUpdated)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|file_type| file_type.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownFileType(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_type() {
        for file_type in FileType::ALL {
            assert_eq!(file_type.as_str().parse::<FileType>().unwrap(), file_type);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "handmade".parse::<FileType>().unwrap_err();
        assert_eq!(err, SchemaError::UnknownFileType("handmade".to_owned()));
    }

    #[test]
    fn test_is_normalizable() {
        assert!(!FileType::Manual.is_normalizable());
        assert!(FileType::AutoGenerated.is_normalizable());
        assert!(FileType::AutoUpdated.is_normalizable());
    }

    #[test]
    fn test_comments_are_distinct() {
        assert!(FileType::Manual.comment().is_none());
        let generated = FileType::AutoGenerated.comment().unwrap();
        let updated = FileType::AutoUpdated.comment().unwrap();
        assert_ne!(generated, updated);
        assert!(!generated.contains('\n'));
        assert!(!updated.contains('\n'));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&FileType::AutoGenerated).unwrap(),
            r#""auto_generated""#
        );
        let file_type: FileType = serde_json::from_str(r#""manual""#).unwrap();
        assert_eq!(file_type, FileType::Manual);
    }
}
