//! Canonical YAML I/O for the elect toolkit.
//!
//! Source files are YAML documents with a `_meta` header declaring their
//! [`FileType`](elect_core::FileType). This crate reads them, writes them
//! back in one canonical form, and rewrites ("normalizes") the files that
//! tooling is allowed to touch.
//!
//! # Overview
//!
//! - [`YamlEmitter`]: block-style serializer with an injected [`ScalarStyleRule`]
//! - [`YamlDocument`]: a top-level mapping plus its `_meta` header logic
//! - [`DocumentWriter`]: writes documents with a refreshed header and normalizes files
//!
//! # Example
//!
//! ```ignore
//! use elect_yaml::{DocumentWriter, NormalizeOutcome};
//! use camino::Utf8Path;
//!
//! let writer = DocumentWriter::default();
//! match writer.normalize(Utf8Path::new("pre_data/offices.yaml"))? {
//!     NormalizeOutcome::Rewritten(_) => println!("normalized"),
//!     NormalizeOutcome::Skipped(file_type) => println!("left alone ({file_type})"),
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod document;
mod emitter;
mod error;

pub use document::{
    DocumentWriter, KEY_FILE_TYPE, KEY_FILE_TYPE_COMMENT, KEY_META, KEY_META_COMMENTS,
    NormalizeOutcome, YamlDocument, is_file_normalizable, read, read_value,
};
pub use emitter::{ScalarStyle, ScalarStyleRule, YamlEmitter, literal_for_multiline};
pub use error::YamlError;
