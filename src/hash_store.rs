//! HashStore: Robin Hood open-addressing set with a bounded probe distance.
//!
//! The slot array holds `capacity + probe_limit + 1` entries. Every item sits
//! within `probe_limit` slots of its home index, so a lookup touches at most
//! that many slots. When an insert finds no slot inside the bound, the table
//! doubles and rehashes from the stored hashes (or widens the bound, see
//! `SPARSE_LIMIT`); `T: Hash` is never called again after insertion.

use crate::config::{self, StoreConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::error::Result;
use crate::reentrancy::DebugReentrancy;
use crate::robin_hood::{self, LayoutViolation, Placement, Slot};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

// Once the table has this many slots per live item, a failed insert widens the
// probe limit instead of doubling again. The analytic limit bounds the typical
// cluster, not the worst one: with a good hasher and enough items (tens of
// thousands at α = 0.75) some cluster eventually outgrows it, and holding it
// fixed would cost hundreds of slots per item.
pub(crate) const SPARSE_LIMIT: usize = 64;

#[derive(Clone)]
struct Table<T> {
    slots: Vec<Option<Slot<T>>>,
    capacity: usize,
    limit: usize,
}

impl<T: Eq> Table<T> {
    fn new(capacity: usize, limit: usize) -> Self {
        Self {
            slots: robin_hood::empty_slots(capacity, limit),
            capacity,
            limit,
        }
    }

    fn find<F: FnMut(&T) -> bool>(&self, hash: u64, eq: F) -> Option<usize> {
        robin_hood::find_slot(&self.slots, self.capacity, self.limit, hash, eq)
    }

    fn insert(&mut self, slot: Slot<T>) -> Placement<T> {
        robin_hood::insert_slot(&mut self.slots, self.capacity, self.limit, slot, |a, b| a == b)
    }

    fn remove_at(&mut self, index: usize) -> Option<Slot<T>> {
        robin_hood::remove_slot(&mut self.slots, self.capacity, index)
    }

    /// Makes room after `pending` failed to place. Doubles capacity, unless
    /// `pending` shares its full hash with `limit` or more entries (no capacity
    /// separates those) or the table already has `SPARSE_LIMIT` slots per live
    /// item; then the probe limit doubles instead.
    fn grow_for(&mut self, pending: &Slot<T>, len: usize) {
        let twins = self
            .slots
            .iter()
            .flatten()
            .filter(|s| s.hash == pending.hash)
            .count();
        if twins >= self.limit || self.capacity >= SPARSE_LIMIT.saturating_mul(len.max(1)) {
            let widened = self.limit * 2;
            log::warn!(
                "hash store probe limit widened {} -> {} (capacity {}, live {}, identical hashes {})",
                self.limit,
                widened,
                self.capacity,
                len,
                twins
            );
            self.rebuild(self.capacity, widened, len);
        } else {
            self.rebuild(self.capacity * 2, self.limit, len);
        }
    }

    /// Rehashes every entry into a fresh table of `capacity`, growing by the
    /// same rule as `grow_for` until all entries fit.
    fn rebuild(&mut self, mut capacity: usize, mut limit: usize, len: usize) {
        let old_capacity = self.capacity;
        let mut entries: Vec<Slot<T>> = self.slots.drain(..).flatten().collect();
        loop {
            let mut slots = robin_hood::empty_slots(capacity, limit);
            match place_all(&mut slots, capacity, limit, entries) {
                Ok(()) => {
                    log::debug!(
                        "hash store rehash: capacity {} -> {}, probe limit {}, live {}",
                        old_capacity,
                        capacity,
                        limit,
                        len
                    );
                    self.slots = slots;
                    self.capacity = capacity;
                    self.limit = limit;
                    return;
                }
                Err(rest) => {
                    entries = rest;
                    if capacity >= SPARSE_LIMIT.saturating_mul(len.max(1)) {
                        limit *= 2;
                    } else {
                        capacity *= 2;
                    }
                }
            }
        }
    }
}

// Places distinct entries into empty `slots`. On failure, every entry (placed
// or not) is handed back.
fn place_all<T: Eq>(
    slots: &mut [Option<Slot<T>>],
    capacity: usize,
    limit: usize,
    entries: Vec<Slot<T>>,
) -> core::result::Result<(), Vec<Slot<T>>> {
    let mut entries = entries.into_iter();
    while let Some(entry) = entries.next() {
        if let Placement::Full(entry) =
            robin_hood::insert_slot(slots, capacity, limit, entry, |a, b| a == b)
        {
            let mut rest: Vec<Slot<T>> = slots.iter_mut().filter_map(Option::take).collect();
            rest.push(entry);
            rest.extend(entries);
            return Err(rest);
        }
    }
    Ok(())
}

pub struct HashStore<T, S = DefaultHashBuilder> {
    hasher: S,
    table: Table<T>,
    len: usize,
    load_factor: f64,
    reentrancy: DebugReentrancy,
}

impl<T> HashStore<T>
where
    T: Eq + Hash,
{
    /// Empty store with the default capacity (16) and load factor (0.75).
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(&StoreConfig::default().with_capacity(capacity))
    }

    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<T> Default for HashStore<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> HashStore<T, S> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Home-index modulus; the slot array is `capacity + probe_limit + 1` long.
    pub fn capacity(&self) -> usize {
        self.table.capacity
    }

    pub fn probe_limit(&self) -> usize {
        self.table.limit
    }

    /// Target load factor the probe limit was derived from.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Longest distance any stored item sits from its home index.
    pub fn max_probe_distance(&self) -> usize {
        robin_hood::max_probe_distance(&self.table.slots, self.table.capacity)
    }

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.table.slots.get(index)?.as_ref().map(|s| &s.item)
    }

    // Callers must not change anything that feeds `Eq` or `Hash`.
    pub(crate) fn get_mut_at(&mut self, index: usize) -> Option<&mut T> {
        self.table.slots.get_mut(index)?.as_mut().map(|s| &mut s.item)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.slots.iter(),
            remaining: self.len,
        }
    }
}

impl<T, S> HashStore<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(hasher, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Validates `config`; a capacity of zero is rounded up to one.
    pub fn with_config_and_hasher(config: &StoreConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(hasher, config.capacity.max(1), config.load_factor))
    }

    fn from_parts(hasher: S, capacity: usize, load_factor: f64) -> Self {
        let limit = robin_hood::probe_distance_limit(load_factor);
        Self {
            hasher,
            table: Table::new(capacity, limit),
            len: 0,
            load_factor,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn hash_of<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Stores `item`, returning the equal item it replaced, if any.
    ///
    /// May rehash the whole table: O(n) for that call, amortized O(1).
    pub fn insert(&mut self, item: T) -> Option<T> {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(&item);
        let mut pending = Slot { item, hash };
        loop {
            match self.table.insert(pending) {
                Placement::Inserted(_) => {
                    self.len += 1;
                    return None;
                }
                Placement::Replaced(_, old) => return Some(old),
                Placement::Full(slot) => {
                    self.table.grow_for(&slot, self.len);
                    pending = slot;
                }
            }
        }
    }

    /// Slot index of the item equal to `q`.
    pub fn find<Q>(&self, q: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(q);
        self.table.find(hash, |item| item.borrow() == q)
    }

    /// Lookup with a caller-computed hash and predicate. `hash` must be what
    /// [`hash_of`](Self::hash_of) returns for the matching item.
    pub fn find_hashed<F>(&self, hash: u64, eq: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let _g = self.reentrancy.enter();
        self.table.find(hash, eq)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(q)?;
        self.get_at(index)
    }

    /// Removes and returns the item equal to `q`, closing the gap by
    /// backward shift.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(q);
        self.remove_hashed(hash, |item| item.borrow() == q)
    }

    pub fn remove_hashed<F>(&mut self, hash: u64, eq: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let _g = self.reentrancy.enter();
        let index = self.table.find(hash, eq)?;
        let removed = self.table.remove_at(index)?;
        self.len -= 1;
        Some(removed.item)
    }

    /// Keeps only the items for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let _g = self.reentrancy.enter();
        let mut index = 0;
        while index < self.table.slots.len() {
            let discard = matches!(&self.table.slots[index], Some(s) if !keep(&s.item));
            if discard {
                // The next entry of the cluster may shift into `index`.
                if self.table.remove_at(index).is_some() {
                    self.len -= 1;
                }
            } else {
                index += 1;
            }
        }
    }

    /// Pre-sizes the table so that `len() + additional` items fit at the
    /// target load factor.
    ///
    /// Fails with `InvalidCapacity`, leaving the store untouched, if that
    /// capacity exceeds `MAX_CAPACITY`.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let _g = self.reentrancy.enter();
        let needed = self.len.saturating_add(additional);
        // Float-to-int casts saturate, so huge requests land on usize::MAX.
        let wanted = (needed as f64 / self.load_factor).ceil() as usize;
        config::validate_capacity(wanted)?;
        if wanted > self.table.capacity {
            let limit = self.table.limit;
            self.table.rebuild(wanted, limit, self.len);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        for slot in &mut self.table.slots {
            *slot = None;
        }
        self.len = 0;
    }

    /// Empties the store, yielding every item. Capacity and probe limit stay.
    pub fn drain(&mut self) -> IntoIter<T> {
        let _g = self.reentrancy.enter();
        let fresh = robin_hood::empty_slots(self.table.capacity, self.table.limit);
        let slots = core::mem::replace(&mut self.table.slots, fresh);
        let remaining = core::mem::take(&mut self.len);
        IntoIter {
            inner: slots.into_iter(),
            remaining,
        }
    }

    /// Checks every layout invariant of the slot array.
    pub fn check_layout(&self) -> core::result::Result<(), LayoutViolation> {
        robin_hood::check_layout(&self.table.slots, self.table.capacity, self.table.limit)
    }
}

impl<T: Clone, S: Clone> Clone for HashStore<T, S> {
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
            len: self.len,
            load_factor: self.load_factor,
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashStore<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for HashStore<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|item| other.contains(item))
    }
}

impl<T, S> Eq for HashStore<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> Extend<T> for HashStore<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        // An oversized hint only skips presizing; inserts still grow the table.
        let _ = self.reserve(iter.size_hint().0);
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T, S> FromIterator<T> for HashStore<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Self::with_hasher(S::default());
        store.extend(iter);
        store
    }
}

/// Iterator over the items of a `HashStore` in slot order.
pub struct Iter<'a, T> {
    inner: core::slice::Iter<'a, Option<Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.find_map(|s| s.as_ref().map(|s| &s.item))?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// Owning iterator from `HashStore::into_iter` or `HashStore::drain`.
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<Option<Slot<T>>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<T> {
        let item = self.inner.find_map(|s| s.map(|s| s.item))?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, S> IntoIterator for HashStore<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.slots.into_iter(),
            remaining: self.len,
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashStore<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
