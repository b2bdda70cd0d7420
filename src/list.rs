//! List and MutableList: ordered sequences over an [`ArrayStore`].
//!
//! `List` exposes no mutators. `MutableList` wraps a `List` and adds them;
//! `freeze` hands the same store over without copying, while `to_mutable`
//! copies so the source list stays untouched.

use crate::array_store::{ArrayStore, IntoIter, Iter, RangeIter};
use crate::collection::{Collection, Indexed};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::index_range::{Direction, IndexRange};
use core::fmt;
use core::ops::Deref;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct List<T> {
    store: ArrayStore<T>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            store: ArrayStore::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.store.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.store.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.store.last()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.store.iter()
    }

    pub fn iter_range(&self, range: IndexRange, direction: Direction) -> Result<RangeIter<'_, T>> {
        self.store.iter_range(range, direction)
    }
}

impl<T: PartialEq> List<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.store.contains(item)
    }

    pub fn position(&self, item: &T) -> Option<usize> {
        self.store.position(item)
    }
}

impl<T: Clone> List<T> {
    /// New list holding copies of the items in `range`.
    pub fn slice(&self, range: IndexRange) -> Result<List<T>> {
        Ok(List {
            store: self.store.copy_range(range)?,
        })
    }

    pub fn to_mutable(&self) -> MutableList<T> {
        MutableList {
            inner: self.clone(),
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.store.to_vec()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt(f)
    }
}

impl<T> Collection for List<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<T> Indexed for List<T> {
    fn get(&self, index: usize) -> Result<&T> {
        self.store.get(index)
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            store: iter.into_iter().collect(),
        }
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            store: items.into(),
        }
    }
}

impl<T> From<MutableList<T>> for List<T> {
    fn from(list: MutableList<T>) -> Self {
        list.freeze()
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.iter()
    }
}

/// Growable list; reads go through `Deref<Target = List<T>>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MutableList<T> {
    inner: List<T>,
}

impl<T> MutableList<T> {
    pub fn new() -> Self {
        Self { inner: List::new() }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: List {
                store: ArrayStore::with_capacity(capacity)?,
            },
        })
    }

    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            inner: List {
                store: ArrayStore::with_config(config)?,
            },
        })
    }

    pub fn append(&mut self, item: T) {
        self.inner.store.append(item);
    }

    pub fn append_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.inner.store.append_all(items);
    }

    pub fn prepend(&mut self, item: T) {
        self.inner.store.prepend(item);
    }

    pub fn prepend_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.inner.store.prepend_all(items);
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.inner.store.insert(index, item)
    }

    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, index: usize, items: I) -> Result<()> {
        self.inner.store.insert_all(index, items)
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.inner.store.remove(index)
    }

    pub fn remove_range(&mut self, range: IndexRange) -> Result<Vec<T>> {
        self.inner.store.remove_range(range)
    }

    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        self.inner.store.set(index, item)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.inner.store.get_mut(index)
    }

    pub fn clear(&mut self) {
        self.inner.store.clear();
    }

    /// Converts into an immutable `List` without copying the buffer.
    pub fn freeze(self) -> List<T> {
        self.inner
    }
}

impl<T> Deref for MutableList<T> {
    type Target = List<T>;

    fn deref(&self) -> &List<T> {
        &self.inner
    }
}

impl<T> Default for MutableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> Collection for MutableList<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> Indexed for MutableList<T> {
    fn get(&self, index: usize) -> Result<&T> {
        self.inner.get(index)
    }
}

impl<T> FromIterator<T> for MutableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for MutableList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<T> IntoIterator for MutableList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
