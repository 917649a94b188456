//! Schema input documents
//!
//! - `SchemaDocument`: the definitions map of `schema.json` (`$defs`, or the
//!   older `definitions` key), kept in document order
//! - `MetaDocument`: protocol version and method tables from `meta.json`
//! - `SchemaRef`: the git ref recorded in the schema directory's `VERSION` file

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};

/// Definition name -> raw schema node, in document order
pub type Definitions = IndexMap<String, Value>;

/// One named schema definition.
///
/// Borrowed view over a `SchemaDocument`; definitions are never mutated.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDefinition<'a> {
    pub name: &'a str,
    pub node: &'a Map<String, Value>,
}

impl<'a> SchemaDefinition<'a> {
    pub fn description(&self) -> Option<&'a str> {
        self.node.get("description").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.node.get(key)
    }
}

/// Parsed `schema.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub definitions: Definitions,

    /// Git ref the schema was taken from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_ref: Option<SchemaRef>,
}

impl SchemaDocument {
    /// Build from a parsed schema file
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(SchemaError::InvalidSchema("schema root is not an object".to_string()));
        };

        let defs = root
            .remove("$defs")
            .or_else(|| root.remove("definitions"))
            .ok_or_else(|| SchemaError::InvalidSchema("no $defs or definitions map".to_string()))?;

        let Value::Object(defs) = defs else {
            return Err(SchemaError::InvalidSchema("$defs is not an object".to_string()));
        };

        Ok(Self::from_definitions(defs.into_iter().collect()))
    }

    pub fn from_definitions(definitions: Definitions) -> Self {
        Self {
            definitions,
            schema_ref: None,
        }
    }

    /// Parse schema text
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Load `schema.json` from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn with_schema_ref(mut self, schema_ref: Option<SchemaRef>) -> Self {
        self.schema_ref = schema_ref;
        self
    }

    /// Object-valued definitions, sorted by name.
    ///
    /// Non-object entries (boolean schemas) carry no shape and are skipped.
    pub fn sorted(&self) -> Vec<SchemaDefinition<'_>> {
        let mut defs: Vec<_> = self
            .definitions
            .iter()
            .filter_map(|(name, node)| {
                node.as_object().map(|node| SchemaDefinition { name, node })
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(b.name));
        defs
    }

    /// Look up a definition by bare name
    pub fn get(&self, name: &str) -> Option<SchemaDefinition<'_>> {
        self.definitions
            .get_key_value(name)
            .and_then(|(name, node)| node.as_object().map(|node| SchemaDefinition { name, node }))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Checksum of the definitions map
    pub fn checksum(&self) -> Result<Checksum> {
        Ok(Checksum::of_json(&self.definitions)?)
    }
}

/// Git ref recorded next to the schema (`VERSION` file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRef(String);

impl SchemaRef {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Read a VERSION file; a missing or blank file means "unknown"
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::new(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_protocol_version() -> u16 {
    1
}

/// Parsed `meta.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDocument {
    /// Protocol version
    #[serde(default = "default_protocol_version")]
    pub version: u16,

    /// Methods that agents handle (name -> method path)
    #[serde(default)]
    pub agent_methods: IndexMap<String, String>,

    /// Methods that clients handle (name -> method path)
    #[serde(default)]
    pub client_methods: IndexMap<String, String>,

    #[serde(skip)]
    pub schema_ref: Option<SchemaRef>,
}

impl MetaDocument {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn with_schema_ref(mut self, schema_ref: Option<SchemaRef>) -> Self {
        self.schema_ref = schema_ref;
        self
    }
}
