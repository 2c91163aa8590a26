//! Per-type strategy traits that stand in for runtime reflection.
//!
//! A type opts into materialization by describing its schema ([`Describe`])
//! and by either binding constructor arguments ([`Model`]) or choosing a
//! collection construction strategy ([`ModelCollection`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::binder::ConstructorArgs;
use crate::error::{SchemaError, SchemaResult};
use crate::registry::SchemaRegistry;
use crate::schema::SchemaDefinition;
use crate::transformed::{Transformed, TransformedCollection, format_date, format_datetime};

/// Serialization back to the wire-compatible tree.
pub trait JsonSerialize {
    fn json_serialize(&self) -> Value;
}

impl JsonSerialize for Value {
    fn json_serialize(&self) -> Value {
        self.clone()
    }
}

impl JsonSerialize for String {
    fn json_serialize(&self) -> Value {
        Value::String(self.clone())
    }
}

impl JsonSerialize for bool {
    fn json_serialize(&self) -> Value {
        Value::Bool(*self)
    }
}

impl JsonSerialize for i64 {
    fn json_serialize(&self) -> Value {
        Value::from(*self)
    }
}

impl JsonSerialize for f64 {
    fn json_serialize(&self) -> Value {
        Value::from(*self)
    }
}

impl JsonSerialize for DateTime<Utc> {
    fn json_serialize(&self) -> Value {
        Value::String(format_datetime(self))
    }
}

impl JsonSerialize for NaiveDate {
    fn json_serialize(&self) -> Value {
        Value::String(format_date(*self))
    }
}

impl<T: JsonSerialize> JsonSerialize for Option<T> {
    fn json_serialize(&self) -> Value {
        self.as_ref().map_or(Value::Null, JsonSerialize::json_serialize)
    }
}

impl<T: JsonSerialize + ?Sized> JsonSerialize for Box<T> {
    fn json_serialize(&self) -> Value {
        (**self).json_serialize()
    }
}

impl<T: JsonSerialize> JsonSerialize for [T] {
    fn json_serialize(&self) -> Value {
        Value::Array(self.iter().map(JsonSerialize::json_serialize).collect())
    }
}

impl<T: JsonSerialize> JsonSerialize for Vec<T> {
    fn json_serialize(&self) -> Value {
        self.as_slice().json_serialize()
    }
}

/// A type that can describe its own schema.
pub trait Describe {
    /// Registry key for this type.
    const TYPE_NAME: &'static str;

    /// The schema this type is validated against.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] when the definition is malformed.
    fn definition() -> SchemaResult<SchemaDefinition>;

    /// Register the schemas of every type this one refers to by name.
    ///
    /// Called once, right after this type's own schema is first inserted.
    ///
    /// # Errors
    ///
    /// Propagates registration failures of the dependencies.
    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        let _ = registry;
        Ok(())
    }
}

/// An object type constructed from validated fields.
pub trait Model: Describe + JsonSerialize + Sized {
    /// Bind constructor parameters from the validated fields.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingRequiredConstructorParameter`] when a
    /// parameter has no field, alias or default to bind to.
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self>;

    /// Assign a validated field that no constructor parameter consumed.
    ///
    /// Returns `Ok(true)` when the field was taken. The default keeps nothing.
    ///
    /// # Errors
    ///
    /// Implementations may reject values they cannot store.
    fn assign(&mut self, field: &str, value: Transformed) -> SchemaResult<bool> {
        let _ = (field, value);
        Ok(false)
    }

    /// Materialize from a validated tree node.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidItemType`] if `value` is not an object
    /// of this type, or any error raised while binding it.
    fn from_transformed(value: Transformed) -> SchemaResult<Self> {
        match value {
            Transformed::Object(object) => {
                let mut args = ConstructorArgs::new(object);
                let mut instance = Self::construct(&mut args)?;
                for (field, value) in args.into_remaining() {
                    if !instance.assign(&field, value)? {
                        tracing::trace!(
                            type_name = Self::TYPE_NAME,
                            field = %field,
                            "validated field left unbound"
                        );
                    }
                }
                Ok(instance)
            }
            other => Err(SchemaError::invalid_type(
                Self::TYPE_NAME,
                Self::TYPE_NAME,
                other.kind_name(),
            )),
        }
    }
}

/// A collection type built from materialized items.
pub trait ModelCollection: Describe + JsonSerialize + Sized {
    type Item: Model;

    /// How instances of this collection are assembled.
    fn constructor() -> CollectionConstructor<Self, Self::Item>;

    /// Materialize from a validated tree node.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidItemType`] if `value` is not a collection,
    /// errors from item materialization, or
    /// [`SchemaError::CouldNotAddItemsToCollection`] when no strategy applies.
    fn from_transformed(value: Transformed) -> SchemaResult<Self> {
        match value {
            Transformed::Collection(collection) => Self::constructor().build(collection),
            other => Err(SchemaError::invalid_type(
                Self::TYPE_NAME,
                Self::TYPE_NAME,
                other.kind_name(),
            )),
        }
    }
}

/// Position handed to an offset-assignment strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offset {
    Index(usize),
    Key(String),
}

type FromItemsFn<C, T> = fn(Vec<T>) -> C;
type AddFn<C, T> = fn(&mut C, T);
type AddKeyedFn<C, T> = fn(&mut C, String, T);
type SetOffsetFn<C, T> = fn(&mut C, Offset, T);

/// The construction strategies a collection type supports.
///
/// Strategies are tried in order: a whole-array factory (ordered data only),
/// repeated `add` in the two-argument form for keyed data or one-argument
/// form for ordered data, then offset assignment. `add` and offset assignment
/// start from the `empty` constructor. Keyed data never goes through a
/// strategy that would drop its keys.
pub struct CollectionConstructor<C, T> {
    empty: Option<fn() -> C>,
    from_items: Option<FromItemsFn<C, T>>,
    add: Option<AddFn<C, T>>,
    add_keyed: Option<AddKeyedFn<C, T>>,
    set_offset: Option<SetOffsetFn<C, T>>,
}

impl<C, T> Default for CollectionConstructor<C, T> {
    fn default() -> Self {
        Self {
            empty: None,
            from_items: None,
            add: None,
            add_keyed: None,
            set_offset: None,
        }
    }
}

impl<C, T: Model> CollectionConstructor<C, T> {
    /// A constructor with no strategies; building with it always fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn empty(mut self, empty: fn() -> C) -> Self {
        self.empty = Some(empty);
        self
    }

    #[must_use]
    pub fn from_items(mut self, from_items: FromItemsFn<C, T>) -> Self {
        self.from_items = Some(from_items);
        self
    }

    #[must_use]
    pub fn add(mut self, add: AddFn<C, T>) -> Self {
        self.add = Some(add);
        self
    }

    #[must_use]
    pub fn add_keyed(mut self, add_keyed: AddKeyedFn<C, T>) -> Self {
        self.add_keyed = Some(add_keyed);
        self
    }

    #[must_use]
    pub fn set_offset(mut self, set_offset: SetOffsetFn<C, T>) -> Self {
        self.set_offset = Some(set_offset);
        self
    }

    /// Materialize every entry and assemble the collection.
    ///
    /// # Errors
    ///
    /// Returns item materialization errors, or
    /// [`SchemaError::CouldNotAddItemsToCollection`] when none of the
    /// configured strategies applies to this data.
    pub fn build(&self, collection: TransformedCollection) -> SchemaResult<C> {
        let TransformedCollection {
            type_name,
            keyed,
            entries,
            ..
        } = collection;

        let mut items = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            items.push((key, T::from_transformed(value)?));
        }

        if !keyed && let Some(from_items) = self.from_items {
            return Ok(from_items(items.into_iter().map(|(_, item)| item).collect()));
        }

        if let Some(empty) = self.empty {
            if keyed && let Some(add_keyed) = self.add_keyed {
                let mut target = empty();
                for (key, item) in items {
                    add_keyed(&mut target, key, item);
                }
                return Ok(target);
            }
            if !keyed && let Some(add) = self.add {
                let mut target = empty();
                for (_, item) in items {
                    add(&mut target, item);
                }
                return Ok(target);
            }
            if let Some(set_offset) = self.set_offset {
                let mut target = empty();
                for (index, (key, item)) in items.into_iter().enumerate() {
                    let offset = if keyed {
                        Offset::Key(key)
                    } else {
                        Offset::Index(index)
                    };
                    set_offset(&mut target, offset, item);
                }
                return Ok(target);
            }
        }

        Err(SchemaError::CouldNotAddItemsToCollection { type_name })
    }
}
