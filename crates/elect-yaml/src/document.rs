//! YAML documents with a typed `_meta` header.
//!
//! Every source document carries a header:
//!
//! ```yaml
//! _meta:
//!   _type: auto_generated
//!   _type_comment: 'WARNING: this file is auto-generated. ...'
//!   comments: free text
//! ```
//!
//! `_type` decides whether tooling may rewrite the file. The check is a
//! whitelist: only `auto_generated` and `auto_updated` files are rewritten,
//! `manual` files are left alone, and anything else is a schema error.

use std::fs;

use camino::Utf8Path;
use elect_core::{FileType, SchemaError};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::emitter::YamlEmitter;
use crate::error::YamlError;

/// Key of the header mapping.
pub const KEY_META: &str = "_meta";
/// Header key holding the [`FileType`].
pub const KEY_FILE_TYPE: &str = "_type";
/// Header key holding the fixed warning comment of the file type.
pub const KEY_FILE_TYPE_COMMENT: &str = "_type_comment";
/// Header key holding free-text comments.
pub const KEY_META_COMMENTS: &str = "comments";

/// A YAML document: a top-level mapping, header included.
///
/// # Examples
///
/// ```
/// use elect_core::FileType;
/// use elect_yaml::YamlDocument;
///
/// let mut doc = YamlDocument::new();
/// doc.insert("offices", serde_yaml::Value::Null);
/// doc.set_header(Some(FileType::AutoUpdated), Some("refreshed nightly")).unwrap();
///
/// assert_eq!(doc.file_type().unwrap(), FileType::AutoUpdated);
/// assert!(doc.is_normalizable().unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YamlDocument {
    data: Mapping,
}

impl From<Mapping> for YamlDocument {
    fn from(data: Mapping) -> Self {
        Self { data }
    }
}

impl YamlDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the top-level mapping.
    #[inline]
    #[must_use]
    pub const fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    /// Returns a top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Sets a top-level value.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.data.insert(Value::from(key), value);
    }

    /// Iterates over the top-level entries other than the header.
    pub fn content(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.data
            .iter()
            .filter(|(key, _)| key.as_str() != Some(KEY_META))
    }

    /// Returns the header.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingKey`] if there is no `_meta` key and
    /// [`SchemaError::InvalidValue`] if it is not a mapping.
    pub fn meta(&self) -> Result<&Mapping, SchemaError> {
        self.data
            .get(KEY_META)
            .ok_or_else(|| SchemaError::missing_key(KEY_META, "document"))?
            .as_mapping()
            .ok_or_else(|| SchemaError::invalid_value(KEY_META, "document", "a mapping"))
    }

    /// Returns the declared file type.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the header or `_type` is missing, or if
    /// `_type` is not a recognized file type.
    pub fn file_type(&self) -> Result<FileType, SchemaError> {
        file_type_from_meta(self.meta()?)
    }

    /// Returns `true` if tooling may rewrite this document.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`file_type`](Self::file_type) fails; an unknown
    /// type is never treated as "not normalizable".
    pub fn is_normalizable(&self) -> Result<bool, SchemaError> {
        Ok(self.file_type()?.is_normalizable())
    }

    /// Refreshes the header.
    ///
    /// With `file_type` given, it replaces the stored type; without it, the
    /// stored type is required. The fixed warning comment of the resulting
    /// type is written (and a stale one removed for `manual`). `comments`,
    /// when given, replaces the free-text comments.
    ///
    /// Returns the resulting file type.
    pub fn set_header(
        &mut self,
        file_type: Option<FileType>,
        comments: Option<&str>,
    ) -> Result<FileType, SchemaError> {
        let meta = self
            .data
            .entry(Value::from(KEY_META))
            .or_insert_with(|| Value::Mapping(Mapping::new()))
            .as_mapping_mut()
            .ok_or_else(|| SchemaError::invalid_value(KEY_META, "document", "a mapping"))?;

        let file_type = match file_type {
            Some(file_type) => {
                meta.insert(KEY_FILE_TYPE.into(), file_type.as_str().into());
                file_type
            }
            None => file_type_from_meta(meta)?,
        };

        match file_type.comment() {
            Some(comment) => {
                meta.insert(KEY_FILE_TYPE_COMMENT.into(), comment.into());
            }
            None => {
                meta.remove(KEY_FILE_TYPE_COMMENT);
            }
        }

        if let Some(comments) = comments {
            meta.insert(KEY_META_COMMENTS.into(), comments.into());
        }

        Ok(file_type)
    }

    /// Consumes the document, returning it as a YAML value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Mapping(self.data)
    }
}

fn file_type_from_meta(meta: &Mapping) -> Result<FileType, SchemaError> {
    let value = meta
        .get(KEY_FILE_TYPE)
        .ok_or_else(|| SchemaError::missing_key(KEY_FILE_TYPE, KEY_META))?;
    match value {
        Value::String(tag) => tag.parse(),
        other => Err(SchemaError::UnknownFileType(format!("{other:?}"))),
    }
}

/// Reads a YAML file whose top level is a mapping.
///
/// No schema is enforced here; ask the document for its file type to
/// enforce the header.
///
/// # Errors
///
/// Returns [`YamlError::Read`], [`YamlError::Parse`] or
/// [`YamlError::NotAMapping`].
pub fn read(path: &Utf8Path) -> Result<YamlDocument, YamlError> {
    match read_value::<Value>(path)? {
        Value::Mapping(data) => Ok(YamlDocument { data }),
        _ => Err(YamlError::NotAMapping(path.to_owned())),
    }
}

/// Reads a YAML file into any deserializable type.
pub fn read_value<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, YamlError> {
    let text = fs::read_to_string(path).map_err(|e| YamlError::read(path, e))?;
    serde_yaml::from_str(&text).map_err(|e| YamlError::parse(path, e))
}

/// Reads a file and reports whether it may be rewritten by tooling.
///
/// Schema errors are reported with the file path.
pub fn is_file_normalizable(path: &Utf8Path) -> Result<bool, YamlError> {
    let doc = read(path)?;
    doc.is_normalizable()
        .map_err(|e| YamlError::from(e).with_path(path))
}

/// What [`DocumentWriter::normalize`] did with a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// The file was rewritten; holds the text written.
    Rewritten(String),
    /// The file type does not allow rewriting; nothing was written.
    Skipped(FileType),
}

/// Writes documents through a [`YamlEmitter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentWriter {
    emitter: YamlEmitter,
}

impl DocumentWriter {
    /// Creates a writer using `emitter`.
    #[must_use]
    pub const fn new(emitter: YamlEmitter) -> Self {
        Self { emitter }
    }

    /// Returns the emitter.
    #[inline]
    #[must_use]
    pub const fn emitter(&self) -> &YamlEmitter {
        &self.emitter
    }

    /// Refreshes the header of `doc` and writes it to `path`.
    ///
    /// See [`YamlDocument::set_header`] for the header rules. The text is
    /// rendered completely before the file is touched.
    ///
    /// Returns the text written.
    pub fn write_with_header(
        &self,
        doc: &mut YamlDocument,
        path: &Utf8Path,
        file_type: Option<FileType>,
        comments: Option<&str>,
    ) -> Result<String, YamlError> {
        let file_type = doc
            .set_header(file_type, comments)
            .map_err(|e| YamlError::from(e).with_path(path))?;
        let text = self.emitter.emit(&Value::Mapping(doc.data.clone()))?;
        fs::write(path, &text).map_err(|source| YamlError::Write {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path, file_type = %file_type, "Wrote YAML document");
        Ok(text)
    }

    /// Rewrites a file in canonical form if its type allows it.
    ///
    /// Manual files are skipped (logged, not an error). Normalizable files
    /// are written back with their existing type, which refreshes the
    /// warning comment and the formatting.
    pub fn normalize(&self, path: &Utf8Path) -> Result<NormalizeOutcome, YamlError> {
        let mut doc = read(path)?;
        let file_type = doc
            .file_type()
            .map_err(|e| YamlError::from(e).with_path(path))?;

        if !file_type.is_normalizable() {
            info!(path = %path, file_type = %file_type, "skipping normalization");
            return Ok(NormalizeOutcome::Skipped(file_type));
        }

        let text = self.write_with_header(&mut doc, path, None, None)?;
        info!(path = %path, "normalized");
        Ok(NormalizeOutcome::Rewritten(text))
    }
}
