//! Response decoding boundary.
//!
//! Every model built from a server response passes through
//! [`ResponseDecoder`], which turns parse and schema errors into a
//! [`Outcome::Failure`] instead of propagating them.

use std::sync::Arc;

use fga_result::{Outcome, attempt};
use fga_schema::{Model, ModelCollection, SchemaRegistry, SchemaValidator};
use serde_json::Value;

use crate::config::SdkConfig;
use crate::error::SdkError;

/// Decodes response bodies into typed models.
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    validator: SchemaValidator,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDecoder {
    /// A decoder with its own registry and default validation options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_validator(SchemaValidator::new(Arc::new(SchemaRegistry::new())))
    }

    #[must_use]
    pub fn from_config(config: &SdkConfig) -> Self {
        Self::with_validator(
            SchemaValidator::new(Arc::new(SchemaRegistry::new()))
                .with_options(config.validation_options()),
        )
    }

    /// Share an existing validator, and with it its registry.
    #[must_use]
    pub const fn with_validator(validator: SchemaValidator) -> Self {
        Self { validator }
    }

    #[must_use]
    pub const fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// Parse `body` and materialize it as `T`.
    pub fn decode<T: Model>(&self, body: &[u8]) -> Outcome<T, SdkError> {
        attempt(|| -> Result<T, SdkError> {
            let value = parse(body)?;
            Ok(self.validator.validate_and_transform::<T>(&value)?)
        })
        .failure(|err| log_rejected(T::TYPE_NAME, err))
    }

    /// Parse `body` and materialize it as the collection `C`.
    pub fn decode_collection<C: ModelCollection>(&self, body: &[u8]) -> Outcome<C, SdkError> {
        attempt(|| -> Result<C, SdkError> {
            let value = parse(body)?;
            Ok(self.validator.validate_and_transform_collection::<C>(&value)?)
        })
        .failure(|err| log_rejected(C::TYPE_NAME, err))
    }

    /// Materialize an already-parsed payload as `T`.
    pub fn decode_value<T: Model>(&self, value: &Value) -> Outcome<T, SdkError> {
        attempt(|| -> Result<T, SdkError> {
            Ok(self.validator.validate_and_transform::<T>(value)?)
        })
        .failure(|err| log_rejected(T::TYPE_NAME, err))
    }
}

fn parse(body: &[u8]) -> Result<Value, SdkError> {
    serde_json::from_slice(body).map_err(|source| SdkError::Response { source })
}

fn log_rejected(type_name: &str, err: &SdkError) {
    tracing::debug!(type_name, error = %err, "response rejected");
}
