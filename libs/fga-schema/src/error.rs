//! Error taxonomy for schema definition, validation and materialization.

use thiserror::Error;

/// Broad failure categories shared by every [`SchemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No schema is registered for a referenced type.
    UndefinedItemType,
    /// A value does not satisfy its property (type, format, enum, missing fields).
    InvalidItemType,
    /// A collection that requires items received none.
    EmptyCollection,
    /// A constructor parameter could not be bound.
    MissingRequiredConstructorParameter,
    /// A collection type exposes no usable construction strategy.
    CouldNotAddItemsToCollection,
    /// A schema definition is malformed or conflicts with a registered one.
    InvalidSchema,
}

/// Errors raised while defining schemas or materializing data against them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("no schema registered for type `{type_name}`")]
    UndefinedItemType { type_name: String },

    /// Fail-fast mismatch. `cause` holds the nested failure when the value
    /// was an object or collection that failed its own validation.
    #[error("invalid value at `{path}`: expected {expected}, got {actual}")]
    InvalidItemType {
        path: String,
        expected: String,
        actual: String,
        #[source]
        cause: Option<Box<SchemaError>>,
    },

    /// All missing required properties of one object, reported together.
    #[error("`{type_name}` is missing required field(s): {}", .missing.join(", "))]
    MissingRequiredFields {
        type_name: String,
        missing: Vec<String>,
    },

    #[error("collection `{type_name}` requires at least one item")]
    EmptyCollection { type_name: String },

    #[error("cannot bind required constructor parameter `{parameter}` of `{type_name}`")]
    MissingRequiredConstructorParameter { type_name: String, parameter: String },

    #[error("could not add items to collection `{type_name}`: no construction strategy available")]
    CouldNotAddItemsToCollection { type_name: String },

    #[error("invalid schema for `{type_name}`: {reason}")]
    InvalidSchema { type_name: String, reason: String },

    #[error("a different schema is already registered for `{type_name}`")]
    ConflictingSchema { type_name: String },
}

impl SchemaError {
    /// Build a type mismatch without a nested cause.
    #[must_use]
    pub fn invalid_type(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidItemType {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
            cause: None,
        }
    }

    /// The taxonomy bucket this error belongs to.
    ///
    /// Missing required fields are reported as [`ErrorKind::InvalidItemType`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UndefinedItemType { .. } => ErrorKind::UndefinedItemType,
            Self::InvalidItemType { .. } | Self::MissingRequiredFields { .. } => {
                ErrorKind::InvalidItemType
            }
            Self::EmptyCollection { .. } => ErrorKind::EmptyCollection,
            Self::MissingRequiredConstructorParameter { .. } => {
                ErrorKind::MissingRequiredConstructorParameter
            }
            Self::CouldNotAddItemsToCollection { .. } => ErrorKind::CouldNotAddItemsToCollection,
            Self::InvalidSchema { .. } | Self::ConflictingSchema { .. } => ErrorKind::InvalidSchema,
        }
    }

    /// Field names of an aggregated missing-fields error; empty otherwise.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingRequiredFields { missing, .. } => missing,
            _ => &[],
        }
    }

    /// The innermost error along the chain of nested causes.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::InvalidItemType {
                cause: Some(inner), ..
            } => inner.root_cause(),
            _ => self,
        }
    }
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_reported_as_invalid_item_type() {
        let err = SchemaError::MissingRequiredFields {
            type_name: "Store".to_owned(),
            missing: vec!["id".to_owned(), "name".to_owned()],
        };
        assert_eq!(err.kind(), ErrorKind::InvalidItemType);
        assert_eq!(err.to_string(), "`Store` is missing required field(s): id, name");
        assert_eq!(err.missing_fields(), ["id", "name"]);
    }

    #[test]
    fn root_cause_follows_nested_chain() {
        let inner = SchemaError::MissingRequiredFields {
            type_name: "TupleKey".to_owned(),
            missing: vec!["user".to_owned()],
        };
        let outer = SchemaError::InvalidItemType {
            path: "tuple.key".to_owned(),
            expected: "TupleKey".to_owned(),
            actual: "object".to_owned(),
            cause: Some(Box::new(inner.clone())),
        };
        assert_eq!(outer.root_cause(), &inner);
        assert!(std::error::Error::source(&outer).is_some());
    }
}
