//! Core types, errors, and utilities for the elect data toolkit.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Error types for consistent error handling ([`SchemaError`], [`ConfigError`])
//! - Configuration structures ([`Config`])
//! - Domain types (file types, phrase tables, canonical records)
//! - The [`TypeRegistry`] built from a type-definitions document
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod schema;
pub mod types;

pub use config::{AssemblyConfig, Config, PathsConfig};
pub use error::{ConfigError, SchemaError};
pub use hash::{FxHashMap, FxHashSet, fx_hash_set};
pub use schema::{FieldSpec, TypeDefinition, TypeRegistry};
pub use types::{
    Body, Category, CourtOffice, District, DistrictSummary, FileType, I18N_SUFFIX, I18nText,
    Language, Office, Phrase, PhraseTable, RawObject, i18n_field_name, simple_field_name,
};
