//! Top-level response bodies.

use fga_schema::{
    ConstructorArgs, Describe, JsonSerialize, Model, PropertyType, Schema, SchemaDefinition,
    SchemaProperty, SchemaRegistry, SchemaResult,
};
use serde_json::{Value, json};

use super::store::Stores;
use super::tuple::Tuples;
use super::wire_object;

/// Page of stores.
#[derive(Debug, Clone, PartialEq)]
pub struct ListStoresResponse {
    stores: Stores,
    continuation_token: String,
}

impl ListStoresResponse {
    #[must_use]
    pub fn new(stores: Stores, continuation_token: impl Into<String>) -> Self {
        Self {
            stores,
            continuation_token: continuation_token.into(),
        }
    }

    #[must_use]
    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Empty on the last page.
    #[must_use]
    pub fn continuation_token(&self) -> &str {
        &self.continuation_token
    }
}

impl Describe for ListStoresResponse {
    const TYPE_NAME: &'static str = "ListStoresResponse";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::object("stores", Stores::TYPE_NAME).required(),
                SchemaProperty::new("continuation_token", PropertyType::String)
                    .default_value(json!("")),
            ],
        )?
        .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Stores>().map(drop)
    }
}

impl JsonSerialize for ListStoresResponse {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("stores", self.stores.items_json()),
            ("continuation_token", self.continuation_token.json_serialize()),
        ])
    }
}

impl Model for ListStoresResponse {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            stores: args.collection("stores")?,
            continuation_token: args.string_or("continuationToken", "")?,
        })
    }
}

/// Page of tuples.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadTuplesResponse {
    tuples: Tuples,
    continuation_token: String,
}

impl ReadTuplesResponse {
    #[must_use]
    pub fn new(tuples: Tuples, continuation_token: impl Into<String>) -> Self {
        Self {
            tuples,
            continuation_token: continuation_token.into(),
        }
    }

    #[must_use]
    pub const fn tuples(&self) -> &Tuples {
        &self.tuples
    }

    #[must_use]
    pub fn continuation_token(&self) -> &str {
        &self.continuation_token
    }
}

impl Describe for ReadTuplesResponse {
    const TYPE_NAME: &'static str = "ReadTuplesResponse";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::object("tuples", Tuples::TYPE_NAME).required(),
                SchemaProperty::new("continuation_token", PropertyType::String)
                    .default_value(json!("")),
            ],
        )?
        .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Tuples>().map(drop)
    }
}

impl JsonSerialize for ReadTuplesResponse {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("tuples", self.tuples.items_json()),
            ("continuation_token", self.continuation_token.json_serialize()),
        ])
    }
}

impl Model for ReadTuplesResponse {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            tuples: args.collection("tuples")?,
            continuation_token: args.string_or("continuation_token", "")?,
        })
    }
}

/// Outcome of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResponse {
    allowed: bool,
    resolution: Option<String>,
}

impl CheckResponse {
    #[must_use]
    pub const fn new(allowed: bool) -> Self {
        Self {
            allowed,
            resolution: None,
        }
    }

    #[must_use]
    pub const fn allowed(&self) -> bool {
        self.allowed
    }

    /// Server-side trace of how the decision was reached, when requested.
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }
}

impl Describe for CheckResponse {
    const TYPE_NAME: &'static str = "CheckResponse";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("allowed", PropertyType::Boolean).default_value(json!(false)),
                SchemaProperty::new("resolution", PropertyType::String),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for CheckResponse {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("allowed", self.allowed.json_serialize()),
            ("resolution", self.resolution.json_serialize()),
        ])
    }
}

impl Model for CheckResponse {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            allowed: args.boolean_or("allowed", false)?,
            resolution: args.opt_string("resolution")?,
        })
    }
}

/// Identifier of a newly written authorization model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAuthorizationModelResponse {
    model: String,
}

impl WriteAuthorizationModelResponse {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    #[must_use]
    pub fn authorization_model_id(&self) -> &str {
        &self.model
    }
}

impl Describe for WriteAuthorizationModelResponse {
    const TYPE_NAME: &'static str = "WriteAuthorizationModelResponse";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("authorization_model_id", PropertyType::String)
                    .required()
                    .parameter_name("model"),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for WriteAuthorizationModelResponse {
    fn json_serialize(&self) -> Value {
        json!({ "authorization_model_id": self.model })
    }
}

impl Model for WriteAuthorizationModelResponse {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            model: args.string("model")?,
        })
    }
}
