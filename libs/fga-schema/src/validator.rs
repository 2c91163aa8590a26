//! Schema-driven validation of decoded payloads.
//!
//! [`SchemaValidator::validate`] walks a `serde_json::Value` against the
//! registered schema of a target type and produces a [`Transformed`] tree.
//! The typed entry points then hand that tree to the type's [`Model`] or
//! [`ModelCollection`] implementation.
//!
//! Missing required properties of one object are collected and reported
//! together. Every other failure (type, format, enum, nested object) stops
//! validation at the offending value.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{ErrorKind, SchemaError, SchemaResult};
use crate::model::{Model, ModelCollection};
use crate::property::{PropertyFormat, PropertyType, SchemaProperty};
use crate::registry::SchemaRegistry;
use crate::schema::{CollectionSchema, Schema, SchemaDefinition};
use crate::transformed::{
    DATE_FORMAT, Transformed, TransformedCollection, TransformedField, TransformedObject,
};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Knobs for lenient input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Accept `"42"` for `integer` and `"4.2"` for `number` properties.
    pub numeric_strings: bool,
    /// Treat an explicit `null` on an optional, non-`null` property as absent.
    pub null_as_absent: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            numeric_strings: true,
            null_as_absent: true,
        }
    }
}

/// Validates decoded data against schemas held in a [`SchemaRegistry`].
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    registry: Arc<SchemaRegistry>,
    options: ValidationOptions,
}

impl SchemaValidator {
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            options: ValidationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    #[must_use]
    pub const fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validate `data` against the schema registered for `type_name`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UndefinedItemType`] if `type_name` (or a referenced type) is unknown
    /// - [`SchemaError::InvalidItemType`] on the first mismatching value
    /// - [`SchemaError::MissingRequiredFields`] listing every absent required property
    /// - [`SchemaError::EmptyCollection`] for an empty collection that requires items
    pub fn validate(&self, data: &Value, type_name: &str) -> SchemaResult<Transformed> {
        self.validate_at(data, type_name, type_name)
    }

    /// Validate `data` and materialize it as `T`.
    ///
    /// Registers `T` (and its dependencies) on first use.
    ///
    /// # Errors
    ///
    /// Everything [`validate`](Self::validate) reports, plus construction errors of `T`.
    pub fn validate_and_transform<T: Model>(&self, data: &Value) -> SchemaResult<T> {
        self.registry.ensure::<T>()?;
        let transformed = self.validate(data, T::TYPE_NAME)?;
        T::from_transformed(transformed)
    }

    /// Validate `data` and materialize it as the collection `C`.
    ///
    /// # Errors
    ///
    /// Everything [`validate`](Self::validate) reports, plus construction
    /// errors of `C` and its items.
    pub fn validate_and_transform_collection<C: ModelCollection>(
        &self,
        data: &Value,
    ) -> SchemaResult<C> {
        self.registry.ensure::<C>()?;
        let transformed = self.validate(data, C::TYPE_NAME)?;
        C::from_transformed(transformed)
    }

    fn validate_at(&self, data: &Value, type_name: &str, path: &str) -> SchemaResult<Transformed> {
        let definition = self.registry.require(type_name)?;
        match definition.as_ref() {
            SchemaDefinition::Object(schema) => self.validate_object(schema, data, path),
            SchemaDefinition::Collection(schema) => self.validate_collection(schema, data, path),
        }
    }

    fn validate_object(&self, schema: &Schema, data: &Value, path: &str) -> SchemaResult<Transformed> {
        let Value::Object(map) = data else {
            return Err(SchemaError::invalid_type(
                path,
                schema.target_type(),
                json_kind(data),
            ));
        };

        let mut missing = Vec::new();
        let mut fields = Vec::with_capacity(schema.properties().len());
        for property in schema.properties() {
            let field_path = format!("{path}.{}", property.name);
            let raw = map
                .get(&property.name)
                .filter(|value| !self.treat_as_absent(property, value));

            let value = match (raw, &property.default) {
                (Some(value), _) => self.transform_property(schema, property, value, &field_path)?,
                (None, _) if property.required => {
                    missing.push(property.name.clone());
                    continue;
                }
                (None, Some(default)) => {
                    self.transform_property(schema, property, default, &field_path)?
                }
                (None, None) => continue,
            };

            fields.push(TransformedField {
                name: property.name.clone(),
                parameter_name: property.parameter_name.clone(),
                value,
            });
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingRequiredFields {
                type_name: schema.target_type().to_owned(),
                missing,
            });
        }

        tracing::trace!(type_name = schema.target_type(), fields = fields.len(), "validated object");
        Ok(Transformed::Object(TransformedObject {
            type_name: schema.target_type().to_owned(),
            fields,
        }))
    }

    fn treat_as_absent(&self, property: &SchemaProperty, value: &Value) -> bool {
        self.options.null_as_absent
            && value.is_null()
            && !property.required
            && property.property_type != PropertyType::Null
    }

    fn validate_collection(
        &self,
        schema: &CollectionSchema,
        data: &Value,
        path: &str,
    ) -> SchemaResult<Transformed> {
        let mut current = data;
        let mut wrapper_key = None;
        if let Some(key) = schema.wrapper()
            && let Value::Object(map) = data
            && let Some(inner) = map.get(key)
        {
            current = inner;
            wrapper_key = Some(key.to_owned());
        }

        let raw_entries: Vec<(String, &Value)> = match current {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            Value::Object(map) if schema.is_keyed() => {
                map.iter().map(|(key, item)| (key.clone(), item)).collect()
            }
            Value::Object(map) => map
                .values()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(SchemaError::invalid_type(
                    path,
                    schema.target_type(),
                    json_kind(other),
                ));
            }
        };

        if schema.requires_items() && raw_entries.is_empty() {
            return Err(SchemaError::EmptyCollection {
                type_name: schema.target_type().to_owned(),
            });
        }

        let item_type = schema.item_type();
        if !self.registry.has_schema(item_type) {
            return Err(SchemaError::UndefinedItemType {
                type_name: item_type.to_owned(),
            });
        }

        let mut entries = Vec::with_capacity(raw_entries.len());
        for (key, item) in raw_entries {
            let item_path = format!("{path}[{key}]");
            let value = self.nested(item, item_type, &item_path)?;
            entries.push((key, value));
        }

        Ok(Transformed::Collection(TransformedCollection {
            type_name: schema.target_type().to_owned(),
            wrapper_key,
            keyed: schema.is_keyed(),
            entries,
        }))
    }

    /// Validate a value referenced from a parent, folding its own failures
    /// into a mismatch at `path`.
    fn nested(&self, data: &Value, type_name: &str, path: &str) -> SchemaResult<Transformed> {
        self.validate_at(data, type_name, path).map_err(|err| {
            let already_here = matches!(
                &err,
                SchemaError::InvalidItemType { path: p, cause: None, .. } if p == path
            );
            if err.kind() != ErrorKind::InvalidItemType || already_here {
                return err;
            }
            SchemaError::InvalidItemType {
                path: path.to_owned(),
                expected: type_name.to_owned(),
                actual: json_kind(data).to_owned(),
                cause: Some(Box::new(err)),
            }
        })
    }

    fn transform_property(
        &self,
        schema: &Schema,
        property: &SchemaProperty,
        value: &Value,
        path: &str,
    ) -> SchemaResult<Transformed> {
        let mismatch = || SchemaError::invalid_type(path, property.expected(), json_kind(value));

        match property.property_type {
            PropertyType::String => {
                let Value::String(s) = value else {
                    return Err(mismatch());
                };
                if let Some(allowed) = &property.enum_values
                    && !allowed.iter().any(|candidate| candidate == s)
                {
                    return Err(SchemaError::invalid_type(
                        path,
                        format!("one of [{}]", allowed.join(", ")),
                        format!("\"{s}\""),
                    ));
                }
                match property.format {
                    None => Ok(Transformed::String(s.clone())),
                    Some(PropertyFormat::Date) => parse_date(s)
                        .map(Transformed::Date)
                        .ok_or_else(|| SchemaError::invalid_type(path, property.expected(), format!("\"{s}\""))),
                    Some(PropertyFormat::DateTime) => parse_datetime(s)
                        .map(Transformed::DateTime)
                        .ok_or_else(|| SchemaError::invalid_type(path, property.expected(), format!("\"{s}\""))),
                }
            }
            PropertyType::Integer => match value {
                Value::Number(n) => n.as_i64().map(Transformed::Integer).ok_or_else(mismatch),
                Value::String(s) if self.options.numeric_strings => s
                    .trim()
                    .parse::<i64>()
                    .map(Transformed::Integer)
                    .map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            PropertyType::Number => match value {
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Ok(Transformed::Integer(i)),
                    None => n.as_f64().map(Transformed::Number).ok_or_else(mismatch),
                },
                Value::String(s) if self.options.numeric_strings => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Transformed::Number)
                    .ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
            PropertyType::Boolean => value.as_bool().map(Transformed::Bool).ok_or_else(mismatch),
            PropertyType::Null => {
                if value.is_null() {
                    Ok(Transformed::Null)
                } else {
                    Err(mismatch())
                }
            }
            PropertyType::Object => match &property.class_name {
                Some(class) => self.nested(value, class, path),
                None if value.is_object() || value.is_array() => Ok(Transformed::Opaque(value.clone())),
                None => Err(mismatch()),
            },
            PropertyType::SelfRef => self.nested(value, schema.target_type(), path),
            PropertyType::Array => {
                let Value::Array(elements) = value else {
                    return Err(mismatch());
                };
                let Some(items) = &property.items else {
                    return Ok(Transformed::Opaque(value.clone()));
                };
                let mut element = SchemaProperty::new(property.name.clone(), items.item_type);
                element.class_name.clone_from(&items.class_name);
                elements
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        self.transform_property(schema, &element, item, &format!("{path}[{index}]"))
                    })
                    .collect::<SchemaResult<Vec<_>>>()
                    .map(Transformed::List)
            }
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// RFC 3339 with any offset, or a naive timestamp taken as UTC.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
