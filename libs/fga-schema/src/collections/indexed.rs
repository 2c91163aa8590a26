use std::any::Any;
use std::ops::{Index, IndexMut};

use serde_json::Value;

use super::{Collection, downcast_item};
use crate::error::SchemaResult;
use crate::model::JsonSerialize;

/// Dense, ordered collection of `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for IndexedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> IndexedCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Flatten one level of nesting: `[[a, b], [c]]` becomes `[a, b, c]`.
    #[must_use]
    pub fn from_nested<I>(groups: impl IntoIterator<Item = I>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            items: groups.into_iter().flatten().collect(),
        }
    }

    /// Append an item.
    pub fn add(&mut self, item: T) -> &mut Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Replace the item at `index`, returning the previous one.
    ///
    /// An index at or past the end appends, keeping positions dense.
    pub fn set(&mut self, index: usize, item: T) -> Option<T> {
        match self.items.get_mut(index) {
            Some(slot) => Some(std::mem::replace(slot, item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    /// Remove the item at `index`; later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    #[must_use]
    pub fn first_where(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self
    where
        T: Clone,
    {
        Self {
            items: self.items.iter().filter(|item| predicate(item)).cloned().collect(),
        }
    }

    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> IndexedCollection<U> {
        IndexedCollection {
            items: self.items.iter().map(f).collect(),
        }
    }

    #[must_use]
    pub fn reduce<A>(&self, initial: A, f: impl FnMut(A, &T) -> A) -> A {
        self.items.iter().fold(initial, f)
    }

    #[must_use]
    pub fn every(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().all(predicate)
    }

    #[must_use]
    pub fn some(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().any(predicate)
    }

    /// A copy of the items.
    #[must_use]
    pub fn to_array(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// A new collection holding these items followed by `items`.
    #[must_use]
    pub fn with_items(&self, items: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone,
    {
        let mut merged = self.items.clone();
        merged.extend(items);
        Self { items: merged }
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
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
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T: Any> IndexedCollection<T> {
    /// Append a type-erased value after checking it is a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidItemType`](crate::SchemaError::InvalidItemType)
    /// and leaves the collection unchanged if `value` is not a `T`.
    pub fn try_add_any(&mut self, value: Box<dyn Any>) -> SchemaResult<&mut Self> {
        let item = downcast_item::<Self, T>(value)?;
        Ok(self.add(item))
    }
}

impl<T: JsonSerialize> JsonSerialize for IndexedCollection<T> {
    fn json_serialize(&self) -> Value {
        Value::Array(self.items.iter().map(JsonSerialize::json_serialize).collect())
    }
}

impl<T: JsonSerialize> Collection for IndexedCollection<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.items.len()
    }

    fn items(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T> Index<usize> for IndexedCollection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for IndexedCollection<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for IndexedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

impl<T> Extend<T> for IndexedCollection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for IndexedCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a IndexedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> From<Vec<T>> for IndexedCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}
