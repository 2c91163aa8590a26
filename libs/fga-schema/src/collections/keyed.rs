use std::any::Any;
use std::ops::Index;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Collection, downcast_item};
use crate::error::SchemaResult;
use crate::model::JsonSerialize;

/// String-keyed collection of `T`, iterated in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedCollection<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for KeyedCollection<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T> KeyedCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_map<K: Into<String>>(entries: impl IntoIterator<Item = (K, T)>) -> Self {
        Self {
            items: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// List positions become the keys `"0"`, `"1"`, ...
    #[must_use]
    pub fn from_list(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
        }
    }

    /// Insert or replace the item under `key`, returning the previous one.
    ///
    /// A replaced key keeps its original position.
    pub fn add(&mut self, key: impl Into<String>, item: T) -> Option<T> {
        self.items.insert(key.into(), item)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Remove `key`; the remaining entries keep their order.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.items.shift_remove(key)
    }

    #[must_use]
    pub fn first(&self) -> Option<(&str, &T)> {
        self.items.first().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn first_where(&self, mut predicate: impl FnMut(&str, &T) -> bool) -> Option<(&str, &T)> {
        self.items
            .iter()
            .find(|(k, v)| predicate(k, v))
            .map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&str, &T) -> bool) -> Self
    where
        T: Clone,
    {
        Self {
            items: self
                .items
                .iter()
                .filter(|(k, v)| predicate(k, v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(&str, &T) -> U) -> KeyedCollection<U> {
        KeyedCollection {
            items: self.items.iter().map(|(k, v)| (k.clone(), f(k, v))).collect(),
        }
    }

    #[must_use]
    pub fn reduce<A>(&self, initial: A, mut f: impl FnMut(A, &str, &T) -> A) -> A {
        self.items.iter().fold(initial, |acc, (k, v)| f(acc, k, v))
    }

    #[must_use]
    pub fn every(&self, mut predicate: impl FnMut(&str, &T) -> bool) -> bool {
        self.items.iter().all(|(k, v)| predicate(k, v))
    }

    #[must_use]
    pub fn some(&self, mut predicate: impl FnMut(&str, &T) -> bool) -> bool {
        self.items.iter().any(|(k, v)| predicate(k, v))
    }

    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// A copy of the entries.
    #[must_use]
    pub fn to_array(&self) -> Vec<(String, T)>
    where
        T: Clone,
    {
        self.items.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// A new collection with `entries` merged over these; later keys win.
    #[must_use]
    pub fn with_items<K: Into<String>>(&self, entries: impl IntoIterator<Item = (K, T)>) -> Self
    where
        T: Clone,
    {
        let mut merged = self.items.clone();
        merged.extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        Self { items: merged }
    }

    #[must_use]
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, T> {
        self.items
    }
}

impl<T: Any> KeyedCollection<T> {
    /// Insert a type-erased value under `key` after checking it is a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidItemType`](crate::SchemaError::InvalidItemType)
    /// and leaves the collection unchanged if `value` is not a `T`.
    pub fn try_add_any(
        &mut self,
        key: impl Into<String>,
        value: Box<dyn Any>,
    ) -> SchemaResult<Option<T>> {
        let item = downcast_item::<Self, T>(value)?;
        Ok(self.add(key, item))
    }
}

impl<T: JsonSerialize> JsonSerialize for KeyedCollection<T> {
    fn json_serialize(&self) -> Value {
        let mut map = Map::with_capacity(self.items.len());
        for (key, item) in &self.items {
            map.insert(key.clone(), item.json_serialize());
        }
        Value::Object(map)
    }
}

impl<T: JsonSerialize> Collection for KeyedCollection<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.items.len()
    }

    fn items(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }
}

impl<T> Index<&str> for KeyedCollection<T> {
    type Output = T;

    fn index(&self, key: &str) -> &T {
        &self.items[key]
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for KeyedCollection<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

impl<K: Into<String>, T> Extend<(K, T)> for KeyedCollection<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        self.items
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

impl<T> IntoIterator for KeyedCollection<T> {
    type Item = (String, T);
    type IntoIter = indexmap::map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a KeyedCollection<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = indexmap::map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
