//! Assembly of the canonical document from a [`SourceDocument`].
//!
//! Assembly runs in three phases:
//!
//! 1. Every `<field>_i18n` reference in every collection gets its plain
//!    `<field>` set to the base-language translation.
//! 2. Each collection is turned into typed records, in id order.
//! 3. Bodies and offices are grouped by category, and the categories used
//!    are checked against the configured category order.
//!
//! Any inconsistency aborts assembly with a [`SchemaError`].

use std::collections::{BTreeMap, BTreeSet};

use elect_core::{
    AssemblyConfig, Body, Category, DistrictSummary, Language, Office, Phrase, PhraseTable,
    RawObject, SchemaError, TypeRegistry, simple_field_name,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::election::election_info;
use crate::error::DataError;
use crate::phrases::{i18n_field, string_field};
use crate::sources::{KEY_PHRASES, SourceDocument};

const KEY_BODIES: &str = "bodies";
const KEY_OFFICES: &str = "offices";
const KEY_CATEGORIES: &str = "categories";
const KEY_LANGUAGES: &str = "languages";
const KEY_DISTRICTS: &str = "districts";
const KEY_DISTRICT_TYPES: &str = "district_types";
const KEY_OFFICE_TYPES: &str = "office_types";

/// Collections checked against the type registry, with their type names.
const TYPED_COLLECTIONS: [(&str, &str); 4] = [
    (KEY_BODIES, "body"),
    (KEY_OFFICES, "office"),
    (KEY_CATEGORIES, "category"),
    (KEY_LANGUAGES, "language"),
];

/// The assembled document handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    /// Bodies in id order.
    pub bodies: Vec<Body>,
    /// Bodies grouped by category id.
    pub bodies_by_category: BTreeMap<String, Vec<Body>>,
    /// Number of bodies.
    pub bodies_count: usize,
    /// Categories in display order.
    pub categories: Vec<Category>,
    /// Categories by id.
    pub category_map: BTreeMap<String, Category>,
    /// District types in id order.
    pub district_types: Vec<RawObject>,
    /// District display names.
    pub districts: Vec<DistrictSummary>,
    /// Base language followed by the other languages, in display order.
    pub language_codes: Vec<String>,
    /// Languages by code.
    pub language_map: BTreeMap<String, Language>,
    /// Languages in id order.
    pub languages: Vec<Language>,
    /// Total seats of the published offices.
    pub office_count: u64,
    /// Office types in id order.
    pub office_types: Vec<RawObject>,
    /// Published offices in id order.
    pub offices: Vec<Office>,
    /// Published offices grouped by category id.
    pub offices_by_category: BTreeMap<String, Vec<Office>>,
    /// Page base names.
    pub page_bases: Vec<String>,
    /// Published phrases by text id.
    pub phrases: BTreeMap<String, Phrase>,
}

/// Builds a [`CanonicalDocument`].
///
/// # Examples
///
/// ```ignore
/// use elect_core::Config;
/// use elect_data::{Assembler, SourceDocument};
///
/// let config = Config::default();
/// let source = SourceDocument::build(&config)?;
/// let canonical = Assembler::new(&config.assembly, 2024).assemble(source)?;
/// println!("{} offices", canonical.office_count);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    config: &'a AssemblyConfig,
    registry: Option<&'a TypeRegistry>,
    current_year: i64,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler; `current_year` drives the next-election texts.
    #[must_use]
    pub const fn new(config: &'a AssemblyConfig, current_year: i64) -> Self {
        Self {
            config,
            registry: None,
            current_year,
        }
    }

    /// Validates source objects against `registry` before assembly.
    #[must_use]
    pub const fn with_registry(mut self, registry: &'a TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Assembles the canonical document.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Schema`] for missing required fields, broken
    /// text ids, missing base-language translations, categories outside the
    /// configured order, and malformed collections.
    pub fn assemble(&self, mut source: SourceDocument) -> Result<CanonicalDocument, DataError> {
        let phrases = source.phrases()?;

        if let Some(registry) = self.registry {
            validate_collections(&source, registry)?;
        }
        self.add_base_language_fields(&mut source, &phrases)?;

        let bodies = self.bodies(&source, &phrases)?;
        let offices = self.offices(&source, &phrases)?;
        let bodies_by_category = group_by_category(&bodies, |body| &body.category_id);
        let offices_by_category = group_by_category(&offices, |office| &office.category_id);
        self.check_categories(bodies_by_category.keys().chain(offices_by_category.keys()))?;

        let category_map = category_map(&source, &phrases)?;
        let categories = self.ordered_categories(&category_map)?;
        let languages = languages(&source)?;
        let language_map = language_map(&languages)?;

        let office_count = offices.iter().map(|office| office.seat_count).sum();
        let phrases = phrases
            .published(&self.config.base_language)
            .into_iter()
            .map(|phrase| (phrase.id.clone(), phrase))
            .collect();

        let doc = CanonicalDocument {
            bodies_count: bodies.len(),
            bodies,
            bodies_by_category,
            categories,
            category_map,
            district_types: raw_objects(&source, KEY_DISTRICT_TYPES)?,
            districts: districts(&source)?,
            language_codes: self.config.language_codes(),
            language_map,
            languages,
            office_count,
            office_types: raw_objects(&source, KEY_OFFICE_TYPES)?,
            offices,
            offices_by_category,
            page_bases: self.config.page_bases.clone(),
            phrases,
        };

        info!(
            bodies = doc.bodies_count,
            offices = doc.offices.len(),
            seats = doc.office_count,
            "Assembled canonical document"
        );
        Ok(doc)
    }

    /// Sets `<field>` from every `<field>_i18n` reference.
    fn add_base_language_fields(
        &self,
        source: &mut SourceDocument,
        phrases: &PhraseTable,
    ) -> Result<(), SchemaError> {
        let lang = self.config.base_language.as_str();

        for (node_name, node) in source.nodes_mut() {
            if node_name == KEY_PHRASES {
                continue;
            }
            let Value::Object(objects) = node else {
                continue;
            };

            for (object_id, object) in objects {
                let Value::Object(fields) = object else {
                    continue;
                };
                let context = format!("{node_name} '{object_id}'");

                let mut derived = Vec::new();
                for (field, value) in fields.iter() {
                    let Some(simple) = simple_field_name(field) else {
                        continue;
                    };
                    let text_id = value
                        .as_str()
                        .ok_or_else(|| SchemaError::invalid_value(field, &context, "a text id"))?;
                    let word = phrases.translation(text_id, lang, &context)?;
                    debug!(object = %context, field = simple, value = word, "Setting field");
                    derived.push((simple.to_owned(), Value::from(word)));
                }
                fields.extend(derived);
            }
        }
        Ok(())
    }

    fn bodies(
        &self,
        source: &SourceDocument,
        phrases: &PhraseTable,
    ) -> Result<Vec<Body>, SchemaError> {
        let mut bodies = Vec::new();
        for (id, data) in objects(source, KEY_BODIES)? {
            let context = format!("body '{id}'");
            let name = i18n_field(data, "name", phrases, &context)?;
            bodies.push(Body {
                category_id: required_string(data, "category_id", &context)?,
                district_count: data.get("district_count").and_then(Value::as_u64),
                election_info: election_info(data, self.current_year),
                id: id.clone(),
                name: name.value,
                name_i18n: name.translations,
                notes: optional_string(data, "notes", &context)?,
                seat_count: data.get("seat_count").and_then(Value::as_u64),
                twitter: optional_string(data, "twitter", &context)?,
                url: optional_string(data, "url", &context)?,
                wikipedia: optional_string(data, "wikipedia", &context)?,
            });
        }
        Ok(bodies)
    }

    fn offices(
        &self,
        source: &SourceDocument,
        phrases: &PhraseTable,
    ) -> Result<Vec<Office>, SchemaError> {
        let mut offices = Vec::new();
        for (id, data) in objects(source, KEY_OFFICES)? {
            if !data.contains_key("name_i18n") {
                debug!(office = %id, "Skipping office without name_i18n");
                continue;
            }
            let context = format!("office '{id}'");
            let name = i18n_field(data, "name", phrases, &context)?;
            let Some(name_i18n) = name.translations else {
                return Err(SchemaError::invalid_value("name_i18n", context, "a text id"));
            };
            offices.push(Office {
                category_id: required_string(data, "category_id", &context)?,
                election_info: election_info(data, self.current_year),
                id: id.clone(),
                name: name.value,
                name_i18n,
                seat_count: data.get("seat_count").and_then(Value::as_u64).unwrap_or(1),
                twitter: optional_string(data, "twitter", &context)?,
                url: optional_string(data, "url", &context)?,
            });
        }
        Ok(offices)
    }

    fn ordered_categories(
        &self,
        category_map: &BTreeMap<String, Category>,
    ) -> Result<Vec<Category>, SchemaError> {
        self.config
            .category_order
            .iter()
            .map(|id| {
                category_map
                    .get(id)
                    .cloned()
                    .ok_or_else(|| SchemaError::missing_key(id.as_str(), KEY_CATEGORIES))
            })
            .collect()
    }

    fn check_categories<'c>(
        &self,
        used: impl Iterator<Item = &'c String>,
    ) -> Result<(), SchemaError> {
        let unknown: BTreeSet<&String> = used
            .filter(|id| !self.config.category_order.contains(*id))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::UnknownCategories(
                unknown.into_iter().cloned().collect(),
            ))
        }
    }
}

fn validate_collections(source: &SourceDocument, registry: &TypeRegistry) -> Result<(), SchemaError> {
    for (collection, type_name) in TYPED_COLLECTIONS {
        for (id, data) in objects(source, collection)? {
            registry.validate_object(type_name, id, data)?;
        }
    }
    Ok(())
}

/// Iterates over a collection's objects in id order.
fn objects<'s>(
    source: &'s SourceDocument,
    key: &str,
) -> Result<Vec<(&'s String, &'s Map<String, Value>)>, SchemaError> {
    let Some(collection) = source.collection(key)? else {
        return Ok(Vec::new());
    };
    collection
        .iter()
        .map(|(id, value)| {
            value
                .as_object()
                .map(|data| (id, data))
                .ok_or_else(|| SchemaError::invalid_value(id.as_str(), key, "a mapping"))
        })
        .collect()
}

fn required_string(data: &Map<String, Value>, field: &str, context: &str) -> Result<String, SchemaError> {
    string_field(data, field, context)?
        .map(str::to_owned)
        .ok_or_else(|| SchemaError::missing_key(field, context))
}

fn optional_string(
    data: &Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<Option<String>, SchemaError> {
    Ok(string_field(data, field, context)?.map(str::to_owned))
}

fn category_map(
    source: &SourceDocument,
    phrases: &PhraseTable,
) -> Result<BTreeMap<String, Category>, SchemaError> {
    let mut map = BTreeMap::new();
    for (id, data) in objects(source, KEY_CATEGORIES)? {
        let name = i18n_field(data, "name", phrases, &format!("category '{id}'"))?;
        map.insert(
            id.clone(),
            Category {
                id: id.clone(),
                name: name.value,
                name_i18n: name.translations,
            },
        );
    }
    Ok(map)
}

fn languages(source: &SourceDocument) -> Result<Vec<Language>, SchemaError> {
    objects(source, KEY_LANGUAGES)?
        .into_iter()
        .map(|(id, data)| {
            let context = format!("language '{id}'");
            Ok(Language {
                code: required_string(data, "code", &context)?,
                id: id.clone(),
                name: optional_string(data, "name", &context)?,
                notes: optional_string(data, "notes", &context)?,
            })
        })
        .collect()
}

/// Languages by code; two languages may not share a code.
fn language_map(languages: &[Language]) -> Result<BTreeMap<String, Language>, SchemaError> {
    let mut map = BTreeMap::new();
    for lang in languages {
        if let Some(previous) = map.insert(lang.code.clone(), lang.clone()) {
            return Err(SchemaError::invalid_value(
                "code",
                format!("language '{}' (same as language '{}')", lang.id, previous.id),
                "a code unique among languages",
            ));
        }
    }
    Ok(map)
}

fn raw_objects(source: &SourceDocument, key: &str) -> Result<Vec<RawObject>, SchemaError> {
    objects(source, key)?
        .into_iter()
        .map(|(id, data)| {
            let fields = data
                .iter()
                .filter(|(field, _)| field.as_str() != "id")
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            Ok(RawObject {
                id: id.clone(),
                fields,
            })
        })
        .collect()
}

fn districts(source: &SourceDocument) -> Result<Vec<DistrictSummary>, SchemaError> {
    let Some(node) = source.get(KEY_DISTRICTS) else {
        return Ok(Vec::new());
    };
    let items = node
        .as_array()
        .ok_or_else(|| SchemaError::invalid_value(KEY_DISTRICTS, "source document", "a list"))?;

    items
        .iter()
        .map(|item| {
            let name = match item.get("district_code") {
                Some(Value::String(code)) => code.clone(),
                Some(Value::Number(code)) => code.to_string(),
                Some(_) => {
                    return Err(SchemaError::invalid_value(
                        "district_code",
                        KEY_DISTRICTS,
                        "a number or string",
                    ));
                }
                None => return Err(SchemaError::missing_key("district_code", KEY_DISTRICTS)),
            };
            Ok(DistrictSummary { name })
        })
        .collect()
}

fn group_by_category<T: Clone>(
    items: &[T],
    category: impl Fn(&T) -> &String,
) -> BTreeMap<String, Vec<T>> {
    let mut grouped: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for item in items {
        grouped
            .entry(category(item).clone())
            .or_default()
            .push(item.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn source(value: Value) -> SourceDocument {
        serde_json::from_value(value).unwrap()
    }

    fn config() -> AssemblyConfig {
        AssemblyConfig {
            category_order: vec!["category_city_county".to_owned()],
            ..AssemblyConfig::default()
        }
    }

    fn base() -> Value {
        json!({
            "phrases": {
                "category_city": {"en": "City/County", "es": "Ciudad/Condado"},
                "office_mayor": {"en": "Mayor", "es": "Alcalde"},
                "draft": {"es": "Borrador"},
            },
            "categories": {
                "category_city_county": {"name_i18n": "category_city"},
            },
        })
    }

    fn assemble(value: Value) -> Result<CanonicalDocument, DataError> {
        let config = config();
        Assembler::new(&config, 2023).assemble(source(value))
    }

    #[test]
    fn test_office_with_defaults() {
        let mut value = base();
        value["offices"] = json!({
            "mayor": {"name_i18n": "office_mayor", "category_id": "category_city_county"},
            "clerk": {"name": "Clerk", "category_id": "category_city_county"},
        });
        let doc = assemble(value).unwrap();

        assert_eq!(doc.offices.len(), 1);
        let mayor = &doc.offices[0];
        assert_eq!(mayor.id, "mayor");
        assert_eq!(mayor.name, "Mayor");
        assert_eq!(mayor.seat_count, 1);
        assert_eq!(mayor.name_i18n.get("es").map(String::as_str), Some("Alcalde"));
        assert_eq!(doc.office_count, 1);
        assert_eq!(doc.offices_by_category["category_city_county"], doc.offices);
    }

    #[test]
    fn test_body_fields() {
        let mut value = base();
        value["bodies"] = json!({
            "sf_bos": {
                "name": "Board of Supervisors",
                "category_id": "category_city_county",
                "seat_count": 11,
                "term_length": 4,
                "seed_year": 2020,
                "partisan": false,
                "url": "https://sfbos.org",
            },
        });
        let doc = assemble(value).unwrap();

        assert_eq!(doc.bodies_count, 1);
        let body = &doc.bodies[0];
        assert_eq!(body.seat_count, Some(11));
        assert_eq!(body.election_info, ["4 year term", "2024 next", "non-partisan"]);
        assert_eq!(body.url.as_deref(), Some("https://sfbos.org"));
        assert!(body.name_i18n.is_none());
    }

    #[test]
    fn test_body_requires_category() {
        let mut value = base();
        value["bodies"] = json!({"sf_bos": {"name": "Board"}});
        let err = assemble(value).unwrap_err();
        assert!(err.to_string().contains("category_id"));
        assert!(err.to_string().contains("sf_bos"));
    }

    #[test]
    fn test_office_requires_category() {
        let mut value = base();
        value["offices"] = json!({"mayor": {"name_i18n": "office_mayor"}});
        let err = assemble(value).unwrap_err();
        assert!(matches!(
            err,
            DataError::Schema(SchemaError::MissingKey { ref key, .. }) if key == "category_id"
        ));
    }

    #[test]
    fn test_unknown_categories_are_listed_sorted() {
        let mut value = base();
        value["bodies"] = json!({
            "a": {"name": "A", "category_id": "category_sea"},
            "b": {"name": "B", "category_id": "category_moon"},
        });
        let err = assemble(value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unrecognized categories: category_moon, category_sea"
        );
    }

    #[test]
    fn test_unknown_category_reported_before_missing_definition() {
        let mut config = config();
        config.category_order.push("category_party".to_owned());
        let mut value = base();
        value["bodies"] = json!({"b": {"name": "B", "category_id": "category_moon"}});

        let err = Assembler::new(&config, 2023).assemble(source(value)).unwrap_err();
        assert!(matches!(
            err,
            DataError::Schema(SchemaError::UnknownCategories(ref ids)) if ids == &["category_moon"]
        ));
    }

    #[test]
    fn test_broken_text_id_is_fatal() {
        let mut value = base();
        value["offices"] = json!({"mayor": {"name_i18n": "office_nope", "category_id": "category_city_county"}});
        let err = assemble(value).unwrap_err();
        assert!(matches!(err, DataError::Schema(SchemaError::BrokenTextId { .. })));
    }

    #[test]
    fn test_missing_base_translation_is_fatal() {
        let mut value = base();
        value["offices"] = json!({"x": {"name_i18n": "draft", "category_id": "category_city_county"}});
        let err = assemble(value).unwrap_err();
        assert!(matches!(err, DataError::Schema(SchemaError::MissingTranslation { .. })));
    }

    #[test]
    fn test_categories_follow_configured_order() {
        let doc = assemble(base()).unwrap();
        assert_eq!(doc.categories.len(), 1);
        assert_eq!(doc.categories[0].name, "City/County");
        assert!(doc.category_map["category_city_county"].name_i18n.is_some());

        let mut config = config();
        config.category_order.push("category_party".to_owned());
        let err = Assembler::new(&config, 2023).assemble(source(base())).unwrap_err();
        assert!(err.to_string().contains("category_party"));
    }

    #[test]
    fn test_published_phrases_need_base_language() {
        let doc = assemble(base()).unwrap();
        assert!(doc.phrases.contains_key("office_mayor"));
        assert!(!doc.phrases.contains_key("draft"));
        assert_eq!(doc.phrases["office_mayor"].id, "office_mayor");
    }

    #[test]
    fn test_languages_keyed_by_code() {
        let mut value = base();
        value["languages"] = json!({
            "lang_spanish": {"code": "es", "name": "Español"},
            "lang_chinese": {"code": "zh"},
        });
        let doc = assemble(value).unwrap();
        assert_eq!(doc.languages.len(), 2);
        assert_eq!(doc.languages[0].id, "lang_chinese");
        assert_eq!(doc.language_map["es"].name.as_deref(), Some("Español"));

        let mut value = base();
        value["languages"] = json!({"lang_x": {"name": "X"}});
        let err = assemble(value).unwrap_err();
        assert!(err.to_string().contains("code"));
    }

    #[test]
    fn test_duplicate_language_code_is_rejected() {
        let mut value = base();
        value["languages"] = json!({
            "lang_spanish": {"code": "es"},
            "lang_spanish_mx": {"code": "es"},
        });
        let err = assemble(value).unwrap_err();
        assert!(matches!(
            err,
            DataError::Schema(SchemaError::InvalidValue { ref key, ref context, .. })
                if key == "code" && context.contains("lang_spanish_mx")
        ));
    }

    #[test]
    fn test_passthrough_and_districts() {
        let mut value = base();
        value["district_types"] = json!({"sf_district": {"name": "Supervisorial", "id": "stale"}});
        value["districts"] = json!([{"district_code": 3}, {"district_code": "7"}]);
        let doc = assemble(value).unwrap();

        assert_eq!(doc.district_types[0].id, "sf_district");
        assert!(!doc.district_types[0].fields.contains_key("id"));
        let names: Vec<_> = doc.districts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["3", "7"]);
        assert!(doc.office_types.is_empty());
    }

    #[test]
    fn test_static_context() {
        let doc = assemble(base()).unwrap();
        assert_eq!(doc.language_codes, ["en", "zh", "es", "tl"]);
        assert_eq!(doc.page_bases[0], "index");
    }

    #[test]
    fn test_registry_validation() {
        let registry = TypeRegistry::from_document(&json!({
            "mixins": {},
            "types": {"office": {"fields": {"name_i18n": {"required": true}, "category_id": {}}}},
        }))
        .unwrap();
        let config = config();

        let mut value = base();
        value["offices"] = json!({"mayor": {"name_i18n": "office_mayor", "category_id": "category_city_county", "color": "red"}});
        let err = Assembler::new(&config, 2023)
            .with_registry(&registry)
            .assemble(source(value))
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Schema(SchemaError::UndeclaredField { ref field, .. }) if field == "color"
        ));
    }

    #[test]
    fn test_missing_phrases_node() {
        let err = assemble(json!({"bodies": {}})).unwrap_err();
        assert!(err.to_string().contains("phrases"));
    }
}
