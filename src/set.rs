//! Set and MutableSet over a [`HashStore`].

use crate::collection::Collection;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::hash_store::{HashStore, IntoIter, Iter};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Deref;
use hashbrown::hash_map::DefaultHashBuilder;

pub struct Set<T, S = DefaultHashBuilder> {
    store: HashStore<T, S>,
}

impl<T> Set<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            store: HashStore::new(),
        }
    }
}

impl<T, S> Set<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get(q)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.store.iter()
    }

    pub fn is_subset(&self, other: &Set<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|x| other.contains(x))
    }

    /// Read access to the backing store (capacity, probe statistics).
    pub fn store(&self) -> &HashStore<T, S> {
        &self.store
    }
}

impl<T, S> Set<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    /// Items in either set.
    pub fn unite(&self, other: &Set<T, S>) -> Set<T, S> {
        let mut store = self.store.clone();
        store.extend(other.iter().filter(|x| !self.contains(*x)).cloned());
        Set { store }
    }

    /// Items in both sets.
    pub fn intersect(&self, other: &Set<T, S>) -> Set<T, S> {
        let mut store = self.store.clone();
        store.retain(|x| other.contains(x));
        Set { store }
    }

    /// Items in `self` but not in `other`.
    pub fn subtract(&self, other: &Set<T, S>) -> Set<T, S> {
        let mut store = self.store.clone();
        store.retain(|x| !other.contains(x));
        Set { store }
    }

    pub fn to_mutable(&self) -> MutableSet<T, S> {
        MutableSet {
            inner: self.clone(),
        }
    }
}

impl<T: Clone, S: Clone> Clone for Set<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T> Default for Set<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Set<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt(f)
    }
}

impl<T, S> PartialEq for Set<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl<T, S> Eq for Set<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> Collection for Set<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    type Item = T;

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<T, S> FromIterator<T> for Set<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            store: iter.into_iter().collect(),
        }
    }
}

impl<T, S> From<MutableSet<T, S>> for Set<T, S> {
    fn from(set: MutableSet<T, S>) -> Self {
        set.inner
    }
}

impl<T, S> IntoIterator for Set<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.into_iter()
    }
}

impl<'a, T, S> IntoIterator for &'a Set<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.iter()
    }
}

/// Set with in-place mutation; reads go through `Deref<Target = Set<T, S>>`.
pub struct MutableSet<T, S = DefaultHashBuilder> {
    inner: Set<T, S>,
}

impl<T> MutableSet<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self { inner: Set::new() }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Set {
                store: HashStore::with_capacity(capacity)?,
            },
        })
    }

    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            inner: Set {
                store: HashStore::with_config(config)?,
            },
        })
    }
}

impl<T, S> MutableSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            inner: Set {
                store: HashStore::with_hasher(hasher),
            },
        }
    }

    /// Adds `item`; returns false if an equal item was already present (it
    /// is replaced).
    pub fn insert(&mut self, item: T) -> bool {
        self.inner.store.insert(item).is_none()
    }

    /// Adds `item`, returning the equal item it replaced.
    pub fn replace(&mut self, item: T) -> Option<T> {
        self.inner.store.insert(item)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.store.remove(q).is_some()
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.store.remove(q)
    }

    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.inner.store.retain(keep);
    }

    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.inner.store.reserve(additional)
    }

    pub fn clear(&mut self) {
        self.inner.store.clear();
    }

    /// Converts into an immutable `Set` without copying the table.
    pub fn freeze(self) -> Set<T, S> {
        self.inner
    }
}

impl<T, S> Deref for MutableSet<T, S> {
    type Target = Set<T, S>;

    fn deref(&self) -> &Set<T, S> {
        &self.inner
    }
}

impl<T: Clone, S: Clone> Clone for MutableSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for MutableSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for MutableSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T, S> Collection for MutableSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    type Item = T;

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T, S> FromIterator<T> for MutableSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T, S> Extend<T> for MutableSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.store.extend(iter);
    }
}

impl<T, S> IntoIterator for MutableSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
