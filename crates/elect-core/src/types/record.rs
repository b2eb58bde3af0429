//! Canonical records.
//!
//! Each collection of the canonical document has an explicit record type
//! with named optional fields. Records are built by the assembler in
//! `elect-data` and only serialized afterwards; fields are declared in
//! alphabetical order so the JSON output reads like a sorted dump.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::i18n::I18nText;

/// A governing body (e.g. a board or a legislature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Category the body is grouped under.
    pub category_id: String,
    /// Number of districts the body is elected from.
    pub district_count: Option<u64>,
    /// Short descriptive election facts (term, next election, ...).
    pub election_info: Vec<String>,
    /// Body id.
    pub id: String,
    /// Base-language name.
    pub name: String,
    /// Translations of the name, when the source references a phrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_i18n: Option<I18nText>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Number of seats.
    pub seat_count: Option<u64>,
    /// Twitter handle.
    pub twitter: Option<String>,
    /// Official website.
    pub url: Option<String>,
    /// Wikipedia article.
    pub wikipedia: Option<String>,
}

/// An elected office.
///
/// Only offices with a translated name are published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    /// Category the office is grouped under.
    pub category_id: String,
    /// Short descriptive election facts.
    pub election_info: Vec<String>,
    /// Office id.
    pub id: String,
    /// Base-language name.
    pub name: String,
    /// Translations of the name.
    pub name_i18n: I18nText,
    /// Number of seats, 1 unless the source says otherwise.
    pub seat_count: u64,
    /// Twitter handle.
    pub twitter: Option<String>,
    /// Official website.
    pub url: Option<String>,
}

/// A category used to group bodies and offices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: String,
    /// Base-language name.
    pub name: String,
    /// Translations of the name, when the source references a phrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_i18n: Option<I18nText>,
}

/// A language the site is published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code (`en`, `es`, ...).
    pub code: String,
    /// Language id.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// A generated electoral district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    /// Code of the district within its district type (e.g. the division number).
    pub district_code: u32,
    /// District type the district belongs to.
    pub district_type_id: String,
    /// District id.
    pub id: String,
}

/// The canonical view of a district: just its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictSummary {
    /// Display name (the district code).
    pub name: String,
}

/// A generated court office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtOffice {
    /// Office id.
    pub id: String,
    /// Office type the office belongs to.
    pub office_type_id: String,
    /// Number of seats, when more than the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_count: Option<u32>,
}

/// An object passed through without a dedicated record type.
///
/// Serializes flat: its fields next to the promoted `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    /// Object id.
    pub id: String,
    /// Remaining fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}
