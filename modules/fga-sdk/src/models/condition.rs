use std::fmt;

use fga_schema::{
    CollectionConstructor, CollectionSchema, ConstructorArgs, Describe, ItemsSpec, JsonSerialize,
    KeyedCollection, Model, ModelCollection, PropertyType, Schema, SchemaDefinition, SchemaError,
    SchemaProperty, SchemaRegistry, SchemaResult,
};
use serde_json::Value;

use super::wire_object;

/// Type of a condition parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    Unspecified,
    Any,
    Bool,
    String,
    Int,
    Uint,
    Double,
    Duration,
    Timestamp,
    Map,
    List,
    Ipaddress,
}

impl TypeName {
    pub const ALL: [Self; 12] = [
        Self::Unspecified,
        Self::Any,
        Self::Bool,
        Self::String,
        Self::Int,
        Self::Uint,
        Self::Double,
        Self::Duration,
        Self::Timestamp,
        Self::Map,
        Self::List,
        Self::Ipaddress,
    ];

    /// Wire spelling, e.g. `TYPE_NAME_STRING`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "TYPE_NAME_UNSPECIFIED",
            Self::Any => "TYPE_NAME_ANY",
            Self::Bool => "TYPE_NAME_BOOL",
            Self::String => "TYPE_NAME_STRING",
            Self::Int => "TYPE_NAME_INT",
            Self::Uint => "TYPE_NAME_UINT",
            Self::Double => "TYPE_NAME_DOUBLE",
            Self::Duration => "TYPE_NAME_DURATION",
            Self::Timestamp => "TYPE_NAME_TIMESTAMP",
            Self::Map => "TYPE_NAME_MAP",
            Self::List => "TYPE_NAME_LIST",
            Self::Ipaddress => "TYPE_NAME_IPADDRESS",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of one condition parameter; generic types nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionParameter {
    type_name: TypeName,
    generic_types: Vec<ConditionParameter>,
}

impl ConditionParameter {
    #[must_use]
    pub const fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            generic_types: Vec::new(),
        }
    }

    /// A generic type such as `map<string>` or `list<int>`.
    #[must_use]
    pub fn generic(type_name: TypeName, generic_types: Vec<Self>) -> Self {
        Self {
            type_name,
            generic_types,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> TypeName {
        self.type_name
    }

    #[must_use]
    pub fn generic_types(&self) -> &[Self] {
        &self.generic_types
    }
}

impl Describe for ConditionParameter {
    const TYPE_NAME: &'static str = "ConditionParameter";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("type_name", PropertyType::String)
                    .required()
                    .enum_values(TypeName::ALL.map(TypeName::as_str)),
                SchemaProperty::array("generic_types", ItemsSpec::of(PropertyType::SelfRef)),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for ConditionParameter {
    fn json_serialize(&self) -> Value {
        let generic_types = if self.generic_types.is_empty() {
            Value::Null
        } else {
            self.generic_types.json_serialize()
        };
        wire_object([
            ("type_name", Value::from(self.type_name.as_str())),
            ("generic_types", generic_types),
        ])
    }
}

impl Model for ConditionParameter {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        let raw = args.string("typeName")?;
        // Validated input is already in the enum; args built by hand are not.
        let type_name = TypeName::parse(&raw).ok_or_else(|| {
            SchemaError::invalid_type(
                format!("{}.type_name", Self::TYPE_NAME),
                "TypeName",
                raw,
            )
        })?;
        Ok(Self {
            type_name,
            generic_types: args.opt_list("genericTypes")?.unwrap_or_default(),
        })
    }
}

/// Parameters of a condition keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionParameters(KeyedCollection<ConditionParameter>);

impl ConditionParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare parameter `name`, replacing an earlier declaration.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, parameter: ConditionParameter) -> Self {
        self.0.add(name, parameter);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConditionParameter> {
        self.0.get(name)
    }

    #[must_use]
    pub fn inner(&self) -> &KeyedCollection<ConditionParameter> {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Describe for ConditionParameters {
    const TYPE_NAME: &'static str = "ConditionParameters";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(CollectionSchema::new(Self::TYPE_NAME, ConditionParameter::TYPE_NAME)
            .keyed()
            .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<ConditionParameter>().map(drop)
    }
}

impl JsonSerialize for ConditionParameters {
    fn json_serialize(&self) -> Value {
        self.0.json_serialize()
    }
}

impl ModelCollection for ConditionParameters {
    type Item = ConditionParameter;

    fn constructor() -> CollectionConstructor<Self, ConditionParameter> {
        CollectionConstructor::new()
            .empty(Self::new)
            .add_keyed(|parameters, name, parameter| {
                parameters.0.add(name, parameter);
            })
    }
}

/// A named condition expression in an authorization model.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    name: String,
    expression: String,
    parameters: ConditionParameters,
    metadata: Option<Value>,
}

impl Condition {
    #[must_use]
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            parameters: ConditionParameters::new(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: ConditionParameters) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub const fn parameters(&self) -> &ConditionParameters {
        &self.parameters
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}

impl Describe for Condition {
    const TYPE_NAME: &'static str = "Condition";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("name", PropertyType::String).required(),
                SchemaProperty::new("expression", PropertyType::String).required(),
                SchemaProperty::object("parameters", ConditionParameters::TYPE_NAME),
                SchemaProperty::new("metadata", PropertyType::Object),
            ],
        )?
        .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<ConditionParameters>().map(drop)
    }
}

impl JsonSerialize for Condition {
    fn json_serialize(&self) -> Value {
        let parameters = if self.parameters.is_empty() {
            Value::Null
        } else {
            self.parameters.json_serialize()
        };
        wire_object([
            ("name", self.name.json_serialize()),
            ("expression", self.expression.json_serialize()),
            ("parameters", parameters),
            ("metadata", self.metadata.json_serialize()),
        ])
    }
}

impl Model for Condition {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            name: args.string("name")?,
            expression: args.string("expression")?,
            parameters: args.opt_collection("parameters")?.unwrap_or_default(),
            metadata: None,
        })
    }

    fn assign(&mut self, field: &str, value: fga_schema::Transformed) -> SchemaResult<bool> {
        if field != "metadata" {
            return Ok(false);
        }
        self.metadata = Some(value.to_json());
        Ok(true)
    }
}

indexed_collection! {
    /// Conditions, nested under `"conditions"` on the wire.
    Conditions of Condition, wrapper = "conditions"
}
