//! Map and MutableMap: key/value tables stored as [`MapEntry`] items in a
//! [`HashStore`]. An entry's equality and hash come from its key alone, so
//! the set machinery doubles as a map.

use crate::collection::Collection;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::hash_store::{self, HashStore};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::ops::Deref;
use hashbrown::hash_map::DefaultHashBuilder;

/// Key/value pair whose identity is the key.
#[derive(Clone, Debug)]
pub struct MapEntry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> MapEntry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: PartialEq, V> PartialEq for MapEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for MapEntry<K, V> {}

// Must hash exactly like `K` so that lookups by key find the entry.
impl<K: Hash, V> Hash for MapEntry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

pub struct Map<K, V, S = DefaultHashBuilder> {
    store: HashStore<MapEntry<K, V>, S>,
}

impl<K, V> Map<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            store: HashStore::new(),
        }
    }
}

impl<K, V, S> Map<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.store.hash_of(key);
        self.store.find_hashed(hash, |e| e.key.borrow() == key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(key)?;
        self.store.get_at(index).map(|e| (&e.key, &e.value))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).is_some()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.store.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn store(&self) -> &HashStore<MapEntry<K, V>, S> {
        &self.store
    }
}

impl<K, V, S> Map<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    pub fn to_mutable(&self) -> MutableMap<K, V, S> {
        MutableMap {
            inner: self.clone(),
        }
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for Map<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<K, V> Default for Map<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Map<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.store.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

impl<K, V, S> PartialEq for Map<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for Map<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Collection for Map<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = MapEntry<K, V>;

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<K, V, S> FromIterator<(K, V)> for Map<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            store: iter.into_iter().map(|(k, v)| MapEntry::new(k, v)).collect(),
        }
    }
}

impl<K, V, S> From<MutableMap<K, V, S>> for Map<K, V, S> {
    fn from(map: MutableMap<K, V, S>) -> Self {
        map.inner
    }
}

impl<K, V, S> IntoIterator for Map<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.store.into_iter(),
        }
    }
}

/// Borrowing iterator over `(key, value)` pairs.
pub struct Iter<'a, K, V> {
    inner: hash_store::Iter<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Owning iterator over `(key, value)` pairs.
pub struct IntoIter<K, V> {
    inner: hash_store::IntoIter<MapEntry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(MapEntry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// Map with in-place mutation; reads go through `Deref<Target = Map<K, V, S>>`.
pub struct MutableMap<K, V, S = DefaultHashBuilder> {
    inner: Map<K, V, S>,
}

impl<K, V> MutableMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self { inner: Map::new() }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Map {
                store: HashStore::with_capacity(capacity)?,
            },
        })
    }

    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            inner: Map {
                store: HashStore::with_config(config)?,
            },
        })
    }
}

impl<K, V, S> MutableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            inner: Map {
                store: HashStore::with_hasher(hasher),
            },
        }
    }

    /// Sets `key` to `value`, returning the previous value for that key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.inner
            .store
            .insert(MapEntry::new(key, value))
            .map(|old| old.value)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.inner.store.hash_of(key);
        self.inner
            .store
            .remove_hashed(hash, |e| e.key.borrow() == key)
            .map(|e| e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.inner.find(key)?;
        self.inner.store.get_mut_at(index).map(|e| &mut e.value)
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.store.retain(|e| keep(&e.key, &e.value));
    }

    pub fn clear(&mut self) {
        self.inner.store.clear();
    }

    /// Converts into an immutable `Map` without copying the table.
    pub fn freeze(self) -> Map<K, V, S> {
        self.inner
    }
}

impl<K, V, S> Deref for MutableMap<K, V, S> {
    type Target = Map<K, V, S>;

    fn deref(&self) -> &Map<K, V, S> {
        &self.inner
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for MutableMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for MutableMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for MutableMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<K, V, S> Collection for MutableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = MapEntry<K, V>;

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, S> FromIterator<(K, V)> for MutableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for MutableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.inner
            .store
            .extend(iter.into_iter().map(|(k, v)| MapEntry::new(k, v)));
    }
}

impl<K, V, S> IntoIterator for MutableMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
