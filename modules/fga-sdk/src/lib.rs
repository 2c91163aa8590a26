#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! FGA SDK
//!
//! Typed wire models for an FGA authorization server and the boundary that
//! turns response bodies into them:
//!
//! - [`ResponseDecoder`] - body to model, failures as [`Outcome::Failure`]
//! - [`models`] - stores, tuples, conditions, expansion trees, responses
//! - [`SdkConfig`] - validation and logging settings (YAML + `FGA_*` env)
//! - [`init_tracing`] - installs the global subscriber
//! - [`SdkError`] - error types
//!
//! ## Usage
//!
//! ```
//! use fga_sdk::{ListStoresResponse, ResponseDecoder};
//!
//! let decoder = ResponseDecoder::new();
//! let body = br#"{
//!     "stores": [{
//!         "id": "s1",
//!         "name": "Demo",
//!         "created_at": "2024-01-01T00:00:00Z",
//!         "updated_at": "2024-01-01T00:00:00Z"
//!     }]
//! }"#;
//!
//! let page = decoder.decode::<ListStoresResponse>(body).val();
//! assert_eq!(page.stores()[0].name(), "Demo");
//! assert_eq!(page.continuation_token(), "");
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod telemetry;

// Re-export main types at crate root
pub use config::{LoggingConfig, SdkConfig, ValidationConfig};
pub use error::SdkError;
pub use fga_result::Outcome;
pub use models::{
    CheckResponse, Condition, ConditionParameter, ConditionParameters, Conditions, Leaf,
    ListStoresResponse, Node, ReadTuplesResponse, RelationshipCondition, Store, Stores, Tuple,
    TupleKey, TupleKeys, Tuples, TypeName, WriteAuthorizationModelResponse,
};
pub use response::ResponseDecoder;
pub use telemetry::init_tracing;
