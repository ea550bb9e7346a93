//! Namespaces, schemas and auxiliary schemas

use serde::{Deserialize, Serialize};

/// Namespace binding a short prefix to a URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// Property value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Reference,
    Binary,
}

/// Property declared by a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Qualified name (`prefix:local`)
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
}

impl SchemaProperty {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            required: false,
            multiple: false,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}

/// Primary node schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    /// Schema this one inherits from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
    /// Auxiliary schemas applied automatically to new nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mandatory_aux_schemas: Vec<String>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            properties: Vec::new(),
            mandatory_aux_schemas: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: SchemaProperty) -> Self {
        self.properties.push(property);
        self
    }
}

/// Auxiliary schema: a set of properties mixed into nodes of any schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxSchema {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
}

impl AuxSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: SchemaProperty) -> Self {
        self.properties.push(property);
        self
    }
}
