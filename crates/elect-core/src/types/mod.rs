//! Domain types for the elect toolkit.
//!
//! # Module Organization
//!
//! - [`file_type`] - The `_meta._type` tag of YAML source files
//! - [`i18n`] - Phrase tables and i18n field naming
//! - [`record`] - Canonical records (bodies, offices, categories, ...)
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use elect_core::{Body, FileType, PhraseTable};
//! ```

pub mod file_type;
pub mod i18n;
pub mod record;

pub use file_type::FileType;
pub use i18n::{I18N_SUFFIX, I18nText, Phrase, PhraseTable, i18n_field_name, simple_field_name};
pub use record::{
    Body, Category, CourtOffice, District, DistrictSummary, Language, Office, RawObject,
};
