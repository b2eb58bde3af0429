//! Phrase merging, source building and canonical assembly for election data.
//!
//! This crate turns the hand-authored YAML sources of the elections site
//! into the canonical JSON document consumed by the page renderer.
//!
//! # Overview
//!
//! - [`PhraseFileWalker`] and [`merge_phrases`]: per-language phrase files,
//!   parsed in parallel and merged in sorted order into a
//!   [`PhraseTable`](elect_core::PhraseTable)
//! - [`SourceDocument`]: phrases, configured source files and generated
//!   court-of-appeals collections in one JSON object
//! - [`Assembler`]: validated, typed and grouped [`CanonicalDocument`]
//!
//! # Example
//!
//! ```ignore
//! use elect_core::Config;
//! use elect_data::{Assembler, SourceDocument};
//!
//! let config = Config::default();
//! let source = SourceDocument::build(&config)?;
//! std::fs::write("data/elect.json", source.to_json_pretty()?)?;
//!
//! let canonical = Assembler::new(&config.assembly, 2024).assemble(source)?;
//! println!("{} bodies", canonical.bodies_count);
//! ```
//!
//! # Architecture
//!
//! ```text
//! SourceDocument::build
//!     │
//!     ├── NODE_HANDLERS
//!     │       ├── phrases ── PhraseFileWalker → merge_phrases (rayon)
//!     │       ├── districts ─┐
//!     │       └── court_offices ─ court of appeals divisions
//!     │
//!     └── assembly.sources ── <pre_data_dir>/<name>.yaml
//!
//! Assembler::assemble
//!     ├── base-language fields from *_i18n references
//!     ├── typed records (Body, Office, Category, Language, ...)
//!     └── grouping by category + whitelist check
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod assembler;
mod court;
mod election;
mod error;
mod phrases;
mod sources;
mod walker;

pub use assembler::{Assembler, CanonicalDocument};
pub use court::{JusticeKind, court_of_appeals_districts, court_of_appeals_offices};
pub use election::{election_info, next_election_year};
pub use error::DataError;
pub use phrases::{
    I18nField, PhraseEntry, PhraseWord, i18n_field, lang_code_from_path, merge_phrases, project_words,
    read_phrase_dir, read_phrase_file,
};
pub use sources::{KEY_PHRASES, NODE_HANDLERS, NodeHandler, SourceDocument, to_json_pretty};
pub use walker::PhraseFileWalker;
