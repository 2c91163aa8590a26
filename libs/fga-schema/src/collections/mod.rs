//! Homogeneous typed containers.
//!
//! [`IndexedCollection`] is dense and ordered, [`KeyedCollection`] maps
//! string keys to items in insertion order. Both share the [`Collection`]
//! capability. Transforms (`filter`, `map`, `with_items`) return new
//! collections and leave the receiver untouched.

mod indexed;
mod keyed;

pub use indexed::IndexedCollection;
pub use keyed::KeyedCollection;

use std::any::{Any, type_name};

use crate::error::SchemaError;
use crate::model::JsonSerialize;

/// What every typed collection offers regardless of its keying.
pub trait Collection: JsonSerialize {
    type Item;

    /// Number of items.
    fn count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Items in iteration order.
    fn items(&self) -> impl Iterator<Item = &Self::Item>;
}

/// Recover a `T` from a type-erased value, rejecting anything else.
fn downcast_item<C: ?Sized, T: Any>(value: Box<dyn Any>) -> Result<T, SchemaError> {
    value.downcast::<T>().map(|item| *item).map_err(|_| {
        SchemaError::invalid_type(type_name::<C>(), type_name::<T>(), "a value of another type")
    })
}
