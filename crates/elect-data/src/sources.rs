//! The source document: every input of the assembler in one JSON object.
//!
//! The document is built from three kinds of nodes:
//!
//! - `phrases`, the merged phrase table
//! - the top-level keys of each configured source file
//! - generated collections (`districts`, `court_offices`)
//!
//! Generated nodes come from [`NODE_HANDLERS`], a fixed table of named
//! producers.

use camino::Utf8Path;
use elect_core::{Config, FxHashMap, PhraseTable, SchemaError};
use elect_yaml::KEY_META;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::court::{court_of_appeals_districts, court_of_appeals_offices};
use crate::error::DataError;
use crate::phrases::read_phrase_dir;

/// Key of the phrase table node.
pub const KEY_PHRASES: &str = "phrases";

/// Produces one node of the source document, or `None` when disabled.
pub type NodeHandler = fn(&Config) -> Result<Option<Value>, DataError>;

/// Node producers, in build order.
pub const NODE_HANDLERS: [(&str, NodeHandler); 3] = [
    (KEY_PHRASES, phrases_node),
    ("districts", districts_node),
    ("court_offices", court_offices_node),
];

fn phrases_node(config: &Config) -> Result<Option<Value>, DataError> {
    let dir = config.paths.resolve(&config.paths.phrase_dir());
    let table = read_phrase_dir(&dir)?;
    Ok(Some(to_node(&table)?))
}

fn districts_node(config: &Config) -> Result<Option<Value>, DataError> {
    if !config.assembly.include_court_of_appeals {
        return Ok(None);
    }
    Ok(Some(to_node(&court_of_appeals_districts())?))
}

fn court_offices_node(config: &Config) -> Result<Option<Value>, DataError> {
    if !config.assembly.include_court_of_appeals {
        return Ok(None);
    }
    Ok(Some(to_node(&court_of_appeals_offices())?))
}

fn to_node<T: Serialize>(value: &T) -> Result<Value, DataError> {
    Ok(serde_json::to_value(value)?)
}

/// All assembler inputs, keyed by node name.
///
/// Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceDocument {
    nodes: Map<String, Value>,
}

impl SourceDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the document described by `config`.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable or malformed source or phrase file.
    pub fn build(config: &Config) -> Result<Self, DataError> {
        let mut doc = Self::new();
        let mut origins: FxHashMap<String, String> = FxHashMap::default();

        for (name, produce) in NODE_HANDLERS {
            if let Some(node) = produce(config)? {
                doc.insert_from(name, node, "generated", &mut origins);
            }
        }

        for source in &config.assembly.sources {
            let path = config.paths.source_path(source);
            doc.add_source(&path, source, &mut origins)?;
        }

        info!(nodes = doc.nodes.len(), "Built source document");
        Ok(doc)
    }

    fn add_source(
        &mut self,
        path: &Utf8Path,
        source: &str,
        origins: &mut FxHashMap<String, String>,
    ) -> Result<(), DataError> {
        let data: Map<String, Value> = elect_yaml::read_value(path)?;
        debug!(path = %path, keys = data.len(), "Adding source");
        for (key, value) in data {
            if key != KEY_META {
                self.insert_from(&key, value, source, origins);
            }
        }
        Ok(())
    }

    fn insert_from(
        &mut self,
        key: &str,
        value: Value,
        origin: &str,
        origins: &mut FxHashMap<String, String>,
    ) {
        if let Some(previous) = origins.insert(key.to_owned(), origin.to_owned()) {
            warn!(key, previous = %previous, source = origin, "Source node replaced");
        }
        self.nodes.insert(key.to_owned(), value);
    }

    /// Returns a node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.nodes.get(key)
    }

    /// Sets a node, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.nodes.insert(key.into(), value);
    }

    /// Returns a node as a collection of objects keyed by id.
    ///
    /// A missing or `null` node is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidValue`] if the node is not a mapping.
    pub fn collection(&self, key: &str) -> Result<Option<&Map<String, Value>>, SchemaError> {
        match self.nodes.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(SchemaError::invalid_value(key, "source document", "a mapping")),
        }
    }

    /// Mutable access to the node map.
    pub(crate) fn nodes_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.nodes
    }

    /// Returns the phrase table.
    ///
    /// # Errors
    ///
    /// Fails if the `phrases` node is missing or is not a phrase table.
    pub fn phrases(&self) -> Result<PhraseTable, SchemaError> {
        let node = self
            .nodes
            .get(KEY_PHRASES)
            .ok_or_else(|| SchemaError::missing_key(KEY_PHRASES, "source document"))?;
        PhraseTable::deserialize(node).map_err(|_| {
            SchemaError::invalid_value(KEY_PHRASES, "source document", "text ids mapped to translations")
        })
    }

    /// Renders the document as JSON with sorted keys and four-space indent.
    ///
    /// # Errors
    ///
    /// Fails only if a value cannot be represented in JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        to_json_pretty(&self.nodes)
    }
}

/// Renders a value as JSON with four-space indent and a trailing newline.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::with_capacity(4096);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    out.push(b'\n');
    // serde_json only writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
