#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Schema-driven validation and materialization of FGA wire payloads.
//!
//! The pipeline runs in two stages:
//!
//! 1. [`SchemaValidator::validate`] checks decoded JSON against the schema
//!    registered for a type and yields a [`Transformed`] tree.
//! 2. The type's [`Model`] or [`ModelCollection`] implementation binds that
//!    tree into a typed value.
//!
//! [`SchemaValidator::validate_and_transform`] runs both. Schemas live in an
//! explicit [`SchemaRegistry`] that fills lazily from [`Describe`] impls.
//!
//! ```
//! use std::sync::Arc;
//! use fga_schema::{
//!     ConstructorArgs, Describe, JsonSerialize, Model, PropertyType, Schema,
//!     SchemaDefinition, SchemaProperty, SchemaRegistry, SchemaResult, SchemaValidator,
//! };
//! use serde_json::{Value, json};
//!
//! struct User {
//!     id: String,
//! }
//!
//! impl Describe for User {
//!     const TYPE_NAME: &'static str = "User";
//!     fn definition() -> SchemaResult<SchemaDefinition> {
//!         Ok(Schema::new("User", vec![SchemaProperty::new("id", PropertyType::String).required()])?.into())
//!     }
//! }
//!
//! impl JsonSerialize for User {
//!     fn json_serialize(&self) -> Value {
//!         json!({ "id": self.id })
//!     }
//! }
//!
//! impl Model for User {
//!     fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
//!         Ok(Self { id: args.string("id")? })
//!     }
//! }
//!
//! let validator = SchemaValidator::new(Arc::new(SchemaRegistry::new()));
//! let user: User = validator.validate_and_transform(&json!({ "id": "anne" })).unwrap();
//! assert_eq!(user.id, "anne");
//! ```

pub mod binder;
pub mod collections;
pub mod error;
pub mod model;
pub mod property;
pub mod registry;
pub mod schema;
pub mod transformed;
pub mod validator;

pub use binder::ConstructorArgs;
pub use collections::{Collection, IndexedCollection, KeyedCollection};
pub use error::{ErrorKind, SchemaError, SchemaResult};
pub use model::{CollectionConstructor, Describe, JsonSerialize, Model, ModelCollection, Offset};
pub use property::{ItemsSpec, PropertyFormat, PropertyType, SchemaProperty};
pub use registry::SchemaRegistry;
pub use schema::{CollectionSchema, Schema, SchemaDefinition, wrap_items};
pub use transformed::{
    DATE_FORMAT, Transformed, TransformedCollection, TransformedField, TransformedObject,
    format_date, format_datetime,
};
pub use validator::{SchemaValidator, ValidationOptions};
