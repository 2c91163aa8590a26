//! Declarative shape descriptions for object and collection types.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::property::SchemaProperty;

/// Ordered property list describing one object type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    target_type: String,
    properties: Vec<SchemaProperty>,
}

impl Schema {
    /// Creates a schema for `target_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if two properties share a name or
    /// a property carries descriptors that do not apply to its type.
    pub fn new(
        target_type: impl Into<String>,
        properties: Vec<SchemaProperty>,
    ) -> SchemaResult<Self> {
        let target_type = target_type.into();
        let mut seen = HashSet::with_capacity(properties.len());
        for property in &properties {
            if !seen.insert(property.name.as_str()) {
                return Err(SchemaError::InvalidSchema {
                    type_name: target_type,
                    reason: format!("duplicate property `{}`", property.name),
                });
            }
            property
                .check_structure()
                .map_err(|reason| SchemaError::InvalidSchema {
                    type_name: target_type.clone(),
                    reason,
                })?;
        }
        Ok(Self {
            target_type,
            properties,
        })
    }

    #[must_use]
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    #[must_use]
    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Shape of a homogeneous collection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    target_type: String,
    item_type: String,
    wrapper_key: Option<String>,
    require_items: bool,
    keyed: bool,
}

impl CollectionSchema {
    /// An ordered collection of `item_type` with no wrapper and no minimum.
    #[must_use]
    pub fn new(target_type: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            item_type: item_type.into(),
            wrapper_key: None,
            require_items: false,
            keyed: false,
        }
    }

    /// Items travel nested one level under `key` on the wire.
    #[must_use]
    pub fn wrapper_key(mut self, key: impl Into<String>) -> Self {
        self.wrapper_key = Some(key.into());
        self
    }

    /// Reject empty input.
    #[must_use]
    pub fn require_items(mut self) -> Self {
        self.require_items = true;
        self
    }

    /// Preserve string keys instead of reindexing to a dense sequence.
    #[must_use]
    pub fn keyed(mut self) -> Self {
        self.keyed = true;
        self
    }

    #[must_use]
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    #[must_use]
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    #[must_use]
    pub fn wrapper(&self) -> Option<&str> {
        self.wrapper_key.as_deref()
    }

    #[must_use]
    pub const fn requires_items(&self) -> bool {
        self.require_items
    }

    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        self.keyed
    }

    /// Nest encoded items under the wrapper key, if one is declared.
    #[must_use]
    pub fn wrap(&self, items: Value) -> Value {
        wrap_items(self.wrapper(), items)
    }
}

/// Nest `items` under `wrapper_key`, or return them bare.
#[must_use]
pub fn wrap_items(wrapper_key: Option<&str>, items: Value) -> Value {
    match wrapper_key {
        Some(key) => {
            let mut map = Map::with_capacity(1);
            map.insert(key.to_owned(), items);
            Value::Object(map)
        }
        None => items,
    }
}

/// Anything the registry can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDefinition {
    Object(Schema),
    Collection(CollectionSchema),
}

impl SchemaDefinition {
    #[must_use]
    pub fn target_type(&self) -> &str {
        match self {
            Self::Object(s) => s.target_type(),
            Self::Collection(c) => c.target_type(),
        }
    }

    #[must_use]
    pub const fn as_collection(&self) -> Option<&CollectionSchema> {
        match self {
            Self::Collection(c) => Some(c),
            Self::Object(_) => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&Schema> {
        match self {
            Self::Object(s) => Some(s),
            Self::Collection(_) => None,
        }
    }
}

impl From<Schema> for SchemaDefinition {
    fn from(schema: Schema) -> Self {
        Self::Object(schema)
    }
}

impl From<CollectionSchema> for SchemaDefinition {
    fn from(schema: CollectionSchema) -> Self {
        Self::Collection(schema)
    }
}
