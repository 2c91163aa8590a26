//! Wire models materialized from FGA responses.
//!
//! Each type describes its own schema and binds itself from validated
//! fields; see [`fga_schema::Model`]. `json_serialize` emits the same shape
//! the server sends, so decoded values can be re-encoded unchanged.

use serde_json::{Map, Value};

/// Build a wire object, dropping `null` entries.
pub(crate) fn wire_object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    let mut map = Map::with_capacity(N);
    for (name, value) in fields {
        if !value.is_null() {
            map.insert(name.to_owned(), value);
        }
    }
    Value::Object(map)
}

/// Declares an ordered collection newtype over [`fga_schema::IndexedCollection`].
///
/// With `wrapper = "key"` the collection decodes from and encodes to
/// `{"key": [...]}`; without it, a bare array.
macro_rules! indexed_collection {
    ($(#[$meta:meta])* $name:ident of $item:ty, wrapper = $wrapper:literal) => {
        indexed_collection!(@define $(#[$meta])* $name, $item, Some($wrapper));
    };
    ($(#[$meta:meta])* $name:ident of $item:ty) => {
        indexed_collection!(@define $(#[$meta])* $name, $item, None);
    };
    (@define $(#[$meta:meta])* $name:ident, $item:ty, $wrapper:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(::fga_schema::IndexedCollection<$item>);

        impl $name {
            const WRAPPER: Option<&'static str> = $wrapper;

            #[must_use]
            pub fn new(items: impl IntoIterator<Item = $item>) -> Self {
                Self(::fga_schema::IndexedCollection::from_items(items))
            }

            #[must_use]
            pub fn inner(&self) -> &::fga_schema::IndexedCollection<$item> {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> ::fga_schema::IndexedCollection<$item> {
                self.0
            }

            /// The items as a bare array, as they appear inside a parent object.
            #[must_use]
            pub fn items_json(&self) -> ::serde_json::Value {
                ::fga_schema::JsonSerialize::json_serialize(&self.0)
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = ::fga_schema::IndexedCollection<$item>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = ::std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl ::fga_schema::Describe for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn definition() -> ::fga_schema::SchemaResult<::fga_schema::SchemaDefinition> {
                let schema = ::fga_schema::CollectionSchema::new(
                    Self::TYPE_NAME,
                    <$item as ::fga_schema::Describe>::TYPE_NAME,
                );
                Ok(match Self::WRAPPER {
                    Some(key) => schema.wrapper_key(key),
                    None => schema,
                }
                .into())
            }

            fn register_dependencies(
                registry: &::fga_schema::SchemaRegistry,
            ) -> ::fga_schema::SchemaResult<()> {
                registry.ensure::<$item>().map(drop)
            }
        }

        impl ::fga_schema::JsonSerialize for $name {
            fn json_serialize(&self) -> ::serde_json::Value {
                ::fga_schema::wrap_items(Self::WRAPPER, self.items_json())
            }
        }

        impl ::fga_schema::ModelCollection for $name {
            type Item = $item;

            fn constructor() -> ::fga_schema::CollectionConstructor<Self, $item> {
                ::fga_schema::CollectionConstructor::new()
                    .from_items(|items| Self(::fga_schema::IndexedCollection::from_items(items)))
            }
        }
    };
}

pub mod condition;
pub mod node;
pub mod responses;
pub mod store;
pub mod tuple;

pub use condition::{Condition, ConditionParameter, ConditionParameters, Conditions, TypeName};
pub use node::{Leaf, Node};
pub use responses::{
    CheckResponse, ListStoresResponse, ReadTuplesResponse, WriteAuthorizationModelResponse,
};
pub use store::{Store, Stores};
pub use tuple::{RelationshipCondition, Tuple, TupleKey, TupleKeys, Tuples};
