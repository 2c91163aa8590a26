use chrono::{DateTime, Utc};
use fga_schema::{
    ConstructorArgs, Describe, JsonSerialize, Model, PropertyFormat, PropertyType, Schema,
    SchemaDefinition, SchemaProperty, SchemaRegistry, SchemaResult,
};
use serde_json::Value;

use super::wire_object;

/// Condition attached to a relationship tuple.
///
/// `context` is passed through as-is; its shape is defined by the
/// condition's parameters, not by a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipCondition {
    name: String,
    context: Option<Value>,
}

impl RelationshipCondition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }
}

impl Describe for RelationshipCondition {
    const TYPE_NAME: &'static str = "RelationshipCondition";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("name", PropertyType::String).required(),
                SchemaProperty::new("context", PropertyType::Object),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for RelationshipCondition {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("name", self.name.json_serialize()),
            ("context", self.context.json_serialize()),
        ])
    }
}

impl Model for RelationshipCondition {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            name: args.string("name")?,
            context: args.opaque("context"),
        })
    }
}

/// A `(user, relation, object)` relationship fact.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleKey {
    user: String,
    relation: String,
    object: String,
    condition: Option<RelationshipCondition>,
}

impl TupleKey {
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            relation: relation.into(),
            object: object.into(),
            condition: None,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: RelationshipCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    #[must_use]
    pub const fn condition(&self) -> Option<&RelationshipCondition> {
        self.condition.as_ref()
    }
}

impl Describe for TupleKey {
    const TYPE_NAME: &'static str = "TupleKey";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("user", PropertyType::String).required(),
                SchemaProperty::new("relation", PropertyType::String).required(),
                SchemaProperty::new("object", PropertyType::String).required(),
                SchemaProperty::object("condition", RelationshipCondition::TYPE_NAME),
            ],
        )?
        .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<RelationshipCondition>().map(drop)
    }
}

impl JsonSerialize for TupleKey {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("user", self.user.json_serialize()),
            ("relation", self.relation.json_serialize()),
            ("object", self.object.json_serialize()),
            ("condition", self.condition.json_serialize()),
        ])
    }
}

impl Model for TupleKey {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            user: args.string("user")?,
            relation: args.string("relation")?,
            object: args.string("object")?,
            condition: args.opt_object("condition")?,
        })
    }
}

/// A stored tuple with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    key: TupleKey,
    timestamp: DateTime<Utc>,
}

impl Tuple {
    #[must_use]
    pub const fn new(key: TupleKey, timestamp: DateTime<Utc>) -> Self {
        Self { key, timestamp }
    }

    #[must_use]
    pub const fn key(&self) -> &TupleKey {
        &self.key
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Describe for Tuple {
    const TYPE_NAME: &'static str = "Tuple";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::object("key", TupleKey::TYPE_NAME).required(),
                SchemaProperty::new("timestamp", PropertyType::String)
                    .required()
                    .format(PropertyFormat::DateTime),
            ],
        )?
        .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<TupleKey>().map(drop)
    }
}

impl JsonSerialize for Tuple {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("key", self.key.json_serialize()),
            ("timestamp", self.timestamp.json_serialize()),
        ])
    }
}

impl Model for Tuple {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            key: args.object("key")?,
            timestamp: args.datetime("timestamp")?,
        })
    }
}

indexed_collection! {
    /// Tuple keys, nested under `"tuple_keys"` on the wire.
    TupleKeys of TupleKey, wrapper = "tuple_keys"
}

indexed_collection! {
    /// Stored tuples as a bare array.
    Tuples of Tuple
}
