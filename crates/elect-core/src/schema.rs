//! Type registry built from a type-definitions document.
//!
//! A type-definitions document has two required top-level keys:
//!
//! ```yaml
//! mixins:
//!   named:
//!     name: {required: true}
//!     name_i18n: {}
//! types:
//!   office:
//!     mixin_id: named
//!     fields:
//!       category_id: {required: true}
//!       seat_count: {}
//! ```
//!
//! Each type may pull in the fields of one mixin; its own `fields` entries
//! override mixin entries with the same name. Types are processed in
//! lexicographic order so that error reporting is reproducible.
//!
//! # Examples
//!
//! ```
//! use elect_core::TypeRegistry;
//! use serde_json::json;
//!
//! let document = json!({
//!     "mixins": {"named": {"a": {"v": 1}, "b": {"v": 2}}},
//!     "types": {"office": {"mixin_id": "named", "fields": {"b": {"v": 3}, "c": {"v": 4}}}},
//! });
//! let registry = TypeRegistry::from_document(&document).unwrap();
//! let office = registry.get("office").unwrap();
//! assert_eq!(office.field_names().collect::<Vec<_>>(), ["a", "b", "c"]);
//! assert_eq!(office.fields["b"].attributes["v"], 3);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::hash::{FxHashMap, FxHashSet};

const KEY_MIXINS: &str = "mixins";
const KEY_TYPES: &str = "types";
const KEY_MIXIN_ID: &str = "mixin_id";
const KEY_FIELDS: &str = "fields";
const ATTR_REQUIRED: &str = "required";

/// Field attributes: attribute name to value.
type Attributes = BTreeMap<String, Value>;

/// The declared metadata of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Declared attributes (e.g. `required: true`).
    pub attributes: Attributes,
}

impl FieldSpec {
    /// Returns `true` if the field declares `required: true`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.attributes.get(ATTR_REQUIRED) == Some(&Value::Bool(true))
    }
}

/// A type with its resolved fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    /// Type name.
    pub type_name: String,
    /// Resolved fields (mixin fields overlaid with the type's own).
    pub fields: BTreeMap<String, FieldSpec>,
    /// The type's entry exactly as it appeared in the document.
    pub raw_schema: Value,
}

impl TypeDefinition {
    /// Iterates over field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// All types of a type-definitions document, keyed by type name.
///
/// Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDefinition>,
}

impl TypeRegistry {
    /// Builds the registry from a parsed type-definitions document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingKey`] if `mixins`, `types` or a type's
    /// `fields` is absent, [`SchemaError::UnknownMixin`] if a `mixin_id`
    /// does not resolve, and [`SchemaError::InvalidValue`] for entries that
    /// are not mappings.
    pub fn from_document(document: &Value) -> Result<Self, SchemaError> {
        let root = as_mapping(document, "document", "type definitions")?;
        let mixins = required_mapping(root, KEY_MIXINS, "type definitions")?;
        let types = required_mapping(root, KEY_TYPES, "type definitions")?;

        let mut mixin_fields: FxHashMap<&str, Attributes> = FxHashMap::default();
        for (mixin_id, fields) in &mixins {
            let context = format!("mixin '{mixin_id}'");
            mixin_fields.insert(mixin_id.as_str(), attribute_maps(fields, &context)?);
        }

        let mut type_names: Vec<&String> = types.keys().collect();
        type_names.sort();

        let mut registry = Self::default();
        for type_name in type_names {
            let raw_schema = &types[type_name.as_str()];
            let context = format!("type '{type_name}'");
            let entry = as_mapping(raw_schema, type_name, &context)?;

            let mut merged = match entry.get(KEY_MIXIN_ID) {
                None | Some(Value::Null) => Attributes::new(),
                Some(Value::String(mixin_id)) => mixin_fields
                    .get(mixin_id.as_str())
                    .cloned()
                    .ok_or_else(|| SchemaError::UnknownMixin {
                        type_name: type_name.clone(),
                        mixin_id: mixin_id.clone(),
                    })?,
                Some(_) => {
                    return Err(SchemaError::invalid_value(KEY_MIXIN_ID, context, "a string"));
                }
            };

            let own = entry
                .get(KEY_FIELDS)
                .ok_or_else(|| SchemaError::missing_key(KEY_FIELDS, context.as_str()))?;
            merged.extend(attribute_maps(own, &context)?);

            let fields = merged
                .into_iter()
                .map(|(name, attributes)| {
                    let attributes = match attributes {
                        Value::Object(map) => map.into_iter().collect(),
                        _ => Attributes::new(),
                    };
                    (name.clone(), FieldSpec { name, attributes })
                })
                .collect();

            registry.types.insert(
                type_name.clone(),
                TypeDefinition {
                    type_name: type_name.clone(),
                    fields,
                    raw_schema: raw_schema.clone(),
                },
            );
        }

        Ok(registry)
    }

    /// Returns a type by name.
    #[inline]
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.types.get(type_name)
    }

    /// Number of types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are defined.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Checks an object against its type.
    ///
    /// Objects of types the registry does not define pass unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingKey`] for the first required field that
    /// is absent and [`SchemaError::UndeclaredField`] for the first key the
    /// type does not declare.
    pub fn validate_object(
        &self,
        type_name: &str,
        object_id: &str,
        object: &Map<String, Value>,
    ) -> Result<(), SchemaError> {
        let Some(definition) = self.get(type_name) else {
            return Ok(());
        };

        if let Some(field) = definition
            .fields
            .values()
            .find(|field| field.is_required() && !object.contains_key(&field.name))
        {
            return Err(SchemaError::missing_key(
                field.name.as_str(),
                format!("{type_name} '{object_id}'"),
            ));
        }

        let declared: FxHashSet<&str> = definition.field_names().collect();
        let mut keys: Vec<&String> = object.keys().collect();
        keys.sort();
        if let Some(field) = keys.into_iter().find(|key| !declared.contains(key.as_str())) {
            return Err(SchemaError::UndeclaredField {
                type_name: type_name.to_owned(),
                object_id: object_id.to_owned(),
                field: field.clone(),
            });
        }

        Ok(())
    }
}

fn as_mapping<'a>(
    value: &'a Value,
    key: &str,
    context: &str,
) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::invalid_value(key, context, "a mapping"))
}

/// Looks up a required key holding a mapping; `null` counts as empty.
fn required_mapping(
    parent: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Map<String, Value>, SchemaError> {
    match parent.get(key) {
        None => Err(SchemaError::missing_key(key, context)),
        Some(Value::Null) => Ok(Map::new()),
        Some(value) => as_mapping(value, key, context).cloned(),
    }
}

/// Reads a `field -> attributes` mapping; `null` attribute maps count as empty.
fn attribute_maps(fields: &Value, context: &str) -> Result<Attributes, SchemaError> {
    let fields = match fields {
        Value::Null => return Ok(Attributes::new()),
        other => as_mapping(other, KEY_FIELDS, context)?,
    };

    fields
        .iter()
        .map(|(name, attributes)| match attributes {
            Value::Null | Value::Object(_) => Ok((name.clone(), attributes.clone())),
            _ => Err(SchemaError::invalid_value(name.as_str(), context, "a mapping")),
        })
        .collect()
}
