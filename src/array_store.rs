//! ArrayStore: positional storage over a single resizable slot buffer.
//!
//! Slots `[0, count)` hold live items in order; slots `[count, capacity)` are
//! always `None`, so removed items are dropped as soon as they leave the
//! store. Growth allocates `2 * (count + k)` slots and moves items across in
//! one pass, leaving the `k`-slot gap already open at the insertion point;
//! when the buffer is large enough the tail is rotated in place instead.

use crate::config::{self, ShrinkPolicy, StoreConfig};
use crate::error::{check_index, check_insert_index, check_range, CollectionError, Result};
use crate::index_range::{Direction, IndexRange, Stride};
use core::fmt;
use core::hash::{Hash, Hasher};

pub struct ArrayStore<T> {
    buffer: Vec<Option<T>>,
    count: usize,
    shrink: ShrinkPolicy,
}

fn empty_buffer<T>(capacity: usize) -> Vec<Option<T>> {
    let mut buffer = Vec::with_capacity(capacity);
    buffer.resize_with(capacity, || None);
    buffer
}

impl<T> ArrayStore<T> {
    /// Empty store with no allocated slots.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            count: 0,
            shrink: ShrinkPolicy::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        config::validate_capacity(capacity)?;
        Ok(Self {
            buffer: empty_buffer(capacity),
            count: 0,
            shrink: ShrinkPolicy::default(),
        })
    }

    /// Uses `capacity` and `shrink_policy`; the load factor is not consulted.
    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        let mut store = Self::with_capacity(config.capacity)?;
        store.shrink = config.shrink_policy;
        Ok(store)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn shrink_policy(&self) -> ShrinkPolicy {
        self.shrink
    }

    pub fn append(&mut self, item: T) {
        self.place(self.count, vec![item]);
    }

    pub fn append_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let items: Vec<T> = items.into_iter().collect();
        self.place(self.count, items);
    }

    pub fn prepend(&mut self, item: T) {
        self.place(0, vec![item]);
    }

    pub fn prepend_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let items: Vec<T> = items.into_iter().collect();
        self.place(0, items);
    }

    /// Inserts before the item currently at `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        check_insert_index(index, self.count)?;
        self.place(index, vec![item]);
        Ok(())
    }

    /// Inserts `items` as a contiguous run starting at `index`, keeping their order.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, index: usize, items: I) -> Result<()> {
        check_insert_index(index, self.count)?;
        let items: Vec<T> = items.into_iter().collect();
        self.place(index, items);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.count)?;
        let mut removed = self.close(IndexRange::with_len(index, 1));
        removed
            .pop()
            .ok_or(CollectionError::IndexOutOfRange { index, len: self.count })
    }

    /// Removes every item in `range` and returns them in order.
    pub fn remove_range(&mut self, range: IndexRange) -> Result<Vec<T>> {
        check_range(range, self.count)?;
        Ok(self.close(range))
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.count)?;
        self.buffer[index]
            .as_ref()
            .ok_or(CollectionError::IndexOutOfRange { index, len: self.count })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.count)?;
        let len = self.count;
        self.buffer[index]
            .as_mut()
            .ok_or(CollectionError::IndexOutOfRange { index, len })
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        check_index(index, self.count)?;
        let len = self.count;
        self.buffer[index]
            .replace(item)
            .ok_or(CollectionError::IndexOutOfRange { index, len })
    }

    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Drops every item; the buffer keeps its capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.buffer[..self.count] {
            *slot = None;
        }
        self.count = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.buffer[..self.count].iter(),
        }
    }

    /// Iterates the items in `range`, forward or in reverse.
    pub fn iter_range(&self, range: IndexRange, direction: Direction) -> Result<RangeIter<'_, T>> {
        check_range(range, self.count)?;
        Ok(RangeIter {
            slots: &self.buffer,
            stride: range.stride(direction),
        })
    }

    // Opens a gap of `items.len()` slots at `at` and fills it. `at <= count`.
    fn place(&mut self, at: usize, items: Vec<T>) {
        let k = items.len();
        if k == 0 {
            return;
        }
        self.open_gap(at, k);
        for (slot, item) in self.buffer[at..at + k].iter_mut().zip(items) {
            *slot = Some(item);
        }
        self.count += k;
    }

    fn open_gap(&mut self, at: usize, k: usize) {
        let needed = self.count + k;
        if needed > self.buffer.len() {
            let new_capacity = 2 * needed;
            let mut fresh = empty_buffer(new_capacity);
            for (i, slot) in self.buffer[..self.count].iter_mut().enumerate() {
                let dst = if i < at { i } else { i + k };
                fresh[dst] = slot.take();
            }
            log::debug!(
                "array store grow: capacity {} -> {} (live {}, gap {} at {})",
                self.buffer.len(),
                new_capacity,
                self.count,
                k,
                at
            );
            self.buffer = fresh;
        } else {
            // The k slots past `count` are empty; rotating brings them to `at`.
            self.buffer[at..needed].rotate_right(k);
        }
    }

    // Takes the items in `range` out and closes the gap. `range` is in bounds.
    fn close(&mut self, range: IndexRange) -> Vec<T> {
        let k = range.len();
        if k == 0 {
            return Vec::new();
        }
        let removed: Vec<T> = self.buffer[range.as_range()]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        let remaining = self.count - k;

        if self.shrink == ShrinkPolicy::Quarter && remaining < self.buffer.len() / 4 {
            let new_capacity = 2 * remaining;
            let mut fresh = empty_buffer(new_capacity);
            let survivors = self.buffer[..self.count]
                .iter_mut()
                .filter_map(Option::take);
            for (slot, item) in fresh.iter_mut().zip(survivors) {
                *slot = Some(item);
            }
            log::debug!(
                "array store shrink: capacity {} -> {} (live {})",
                self.buffer.len(),
                new_capacity,
                remaining
            );
            self.buffer = fresh;
        } else {
            self.buffer[range.start()..self.count].rotate_left(k);
        }
        self.count = remaining;
        removed
    }
}

impl<T: PartialEq> ArrayStore<T> {
    pub fn position(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }
}

impl<T: Clone> ArrayStore<T> {
    /// Independent store holding clones of the items in `range`.
    pub fn copy_range(&self, range: IndexRange) -> Result<ArrayStore<T>> {
        let items = self.iter_range(range, Direction::Forward)?;
        let mut copy = ArrayStore::with_capacity(range.len())?;
        copy.shrink = self.shrink;
        copy.append_all(items.cloned());
        Ok(copy)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for ArrayStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ArrayStore<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            count: self.count,
            shrink: self.shrink,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArrayStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ArrayStore<T> {}

impl<T: Hash> Hash for ArrayStore<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.count.hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T> FromIterator<T> for ArrayStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Self::new();
        store.append_all(iter);
        store
    }
}

impl<T> Extend<T> for ArrayStore<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<T> From<Vec<T>> for ArrayStore<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

/// Iterator over the items of an `ArrayStore` in positional order.
pub struct Iter<'a, T> {
    inner: core::slice::Iter<'a, Option<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().rev().find_map(Option::as_ref)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// Iterator over a window of an `ArrayStore`, see [`ArrayStore::iter_range`].
pub struct RangeIter<'a, T> {
    slots: &'a [Option<T>],
    stride: Stride,
}

impl<'a, T> Iterator for RangeIter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let i = self.stride.next()?;
        self.slots[i].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stride.size_hint()
    }
}

/// Owning iterator returned by `ArrayStore::into_iter`.
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<Option<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.find_map(|slot| slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.by_ref().rev().find_map(|slot| slot)
    }
}

impl<T> IntoIterator for ArrayStore<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.buffer.truncate(self.count);
        IntoIter {
            inner: self.buffer.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a ArrayStore<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    impl<T> ArrayStore<T> {
        /// Checks `count <= capacity`, live prefix all `Some`, tail all `None`.
        fn assert_layout(&self) {
            assert!(self.count <= self.buffer.len());
            assert!(self.buffer[..self.count].iter().all(Option::is_some));
            assert!(self.buffer[self.count..].iter().all(Option::is_none));
        }
    }

    fn items<T: Clone>(s: &ArrayStore<T>) -> Vec<T> {
        s.to_vec()
    }

    /// Scenario: append 1, append 2, insert(1, 9), remove(0) leaves [9, 2].
    #[test]
    fn append_insert_remove_scenario() {
        let mut s = ArrayStore::new();
        s.append(1);
        s.append(2);
        s.insert(1, 9).unwrap();
        assert_eq!(s.remove(0).unwrap(), 1);
        assert_eq!(items(&s), vec![9, 2]);
        s.assert_layout();
    }

    /// Invariant: growth allocates 2 * (count + k) and keeps relative order
    /// with the new items landing in the gap.
    #[test]
    fn grow_opens_gap_in_one_pass() {
        let mut s = ArrayStore::with_capacity(2).unwrap();
        s.append_all([1, 2]);
        assert_eq!(s.capacity(), 2);
        s.insert_all(1, [7, 8, 9]).unwrap();
        assert_eq!(s.capacity(), 2 * (2 + 3));
        assert_eq!(items(&s), vec![1, 7, 8, 9, 2]);
        s.assert_layout();
    }

    /// Invariant: inserts that fit shift in place without reallocating.
    #[test]
    fn insert_within_capacity_shifts_in_place() {
        let mut s = ArrayStore::with_capacity(8).unwrap();
        s.append_all([1, 2, 3]);
        s.prepend(0);
        s.insert(2, 10).unwrap();
        assert_eq!(s.capacity(), 8);
        assert_eq!(items(&s), vec![0, 1, 10, 2, 3]);
        s.prepend_all([-2, -1]);
        assert_eq!(items(&s), vec![-2, -1, 0, 1, 10, 2, 3]);
        s.assert_layout();
    }

    /// Invariant: invalid indices are rejected and leave the store unchanged.
    #[test]
    fn out_of_range_has_no_side_effects() {
        let mut s: ArrayStore<i32> = [1, 2, 3].into_iter().collect();
        let cap = s.capacity();
        assert_eq!(
            s.insert(4, 0),
            Err(CollectionError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            s.remove(3),
            Err(CollectionError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(s.get(3).is_err());
        assert!(s.set(5, 1).is_err());
        let r = IndexRange::new(1, 4).unwrap();
        assert_eq!(
            s.remove_range(r),
            Err(CollectionError::IndexRangeOutOfRange { range: r, len: 3 })
        );
        assert!(s.insert_all(9, [1, 2]).is_err());
        assert_eq!(items(&s), vec![1, 2, 3]);
        assert_eq!(s.capacity(), cap);
        s.assert_layout();
    }

    /// Invariant: removal below a quarter of capacity shrinks to 2 * count.
    #[test]
    fn quarter_policy_shrinks() {
        let mut s = ArrayStore::with_capacity(16).unwrap();
        s.append_all(0..5);
        let removed = s.remove_range(IndexRange::new(1, 3).unwrap()).unwrap();
        assert_eq!(removed, vec![1, 2]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.capacity(), 6);
        assert_eq!(items(&s), vec![0, 3, 4]);
        s.assert_layout();
    }

    #[test]
    fn never_policy_keeps_buffer() {
        let config = StoreConfig::default()
            .with_capacity(16)
            .with_shrink_policy(ShrinkPolicy::Never);
        let mut s = ArrayStore::with_config(&config).unwrap();
        s.append_all(0..5);
        s.remove_range(IndexRange::new(0, 4).unwrap()).unwrap();
        assert_eq!(s.capacity(), 16);
        assert_eq!(items(&s), vec![4]);
        s.assert_layout();
    }

    /// Invariant: removed items are dropped immediately; no stale references
    /// linger in the vacated tail.
    #[test]
    fn removal_releases_references() {
        let tracked = Rc::new(());
        let config = StoreConfig::default().with_shrink_policy(ShrinkPolicy::Never);
        let mut s = ArrayStore::with_config(&config).unwrap();
        for _ in 0..4 {
            s.append(Rc::clone(&tracked));
        }
        assert_eq!(Rc::strong_count(&tracked), 5);
        drop(s.remove(1).unwrap());
        assert_eq!(Rc::strong_count(&tracked), 4);
        drop(s.remove_range(IndexRange::new(0, 2).unwrap()).unwrap());
        assert_eq!(Rc::strong_count(&tracked), 2);
        s.clear();
        assert_eq!(Rc::strong_count(&tracked), 1);
        s.assert_layout();
    }

    #[test]
    fn ranged_iteration_both_directions() {
        let s: ArrayStore<i32> = (0..6).collect();
        let r = IndexRange::new(1, 4).unwrap();
        let fwd: Vec<i32> = s.iter_range(r, Direction::Forward).unwrap().copied().collect();
        let rev: Vec<i32> = s.iter_range(r, Direction::Reverse).unwrap().copied().collect();
        assert_eq!(fwd, vec![1, 2, 3]);
        assert_eq!(rev, vec![3, 2, 1]);
        assert!(s.iter_range(IndexRange::new(4, 7).unwrap(), Direction::Forward).is_err());
        let back: Vec<i32> = s.iter().rev().copied().collect();
        assert_eq!(back, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn copy_range_is_independent() {
        let mut s: ArrayStore<String> = ["a", "b", "c"].iter().map(|x| x.to_string()).collect();
        let copy = s.copy_range(IndexRange::new(1, 3).unwrap()).unwrap();
        s.set(1, "z".to_string()).unwrap();
        assert_eq!(copy.to_vec(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(s.get(1).unwrap(), "z");
    }

    #[test]
    fn accessors_and_equality() {
        let mut s: ArrayStore<i32> = vec![4, 5, 6].into();
        assert_eq!(s.first(), Some(&4));
        assert_eq!(s.last(), Some(&6));
        *s.get_mut(0).unwrap() = 40;
        assert_eq!(s.position(&5), Some(1));
        assert!(!s.contains(&4));
        let t: ArrayStore<i32> = vec![40, 5, 6].into();
        assert_eq!(s, t);
        assert_eq!(format!("{:?}", s), "[40, 5, 6]");
        let owned: Vec<i32> = s.into_iter().rev().collect();
        assert_eq!(owned, vec![6, 5, 40]);
    }

    #[test]
    fn empty_batches_are_noops() {
        let mut s: ArrayStore<i32> = ArrayStore::new();
        s.append_all(Vec::new());
        s.insert_all(0, Vec::new()).unwrap();
        assert_eq!(s.capacity(), 0);
        assert!(s.remove_range(IndexRange::empty()).unwrap().is_empty());
        assert!(s.is_empty());
    }

    /// Item whose equality reads back into the store that holds it.
    struct Peeker {
        id: u32,
        store: std::rc::Weak<std::cell::RefCell<ArrayStore<Peeker>>>,
        reads: Rc<std::cell::Cell<usize>>,
    }

    impl PartialEq for Peeker {
        fn eq(&self, other: &Self) -> bool {
            if let Some(store) = self.store.upgrade() {
                let store = store.borrow();
                assert_eq!(store.first().map(|p| p.id), Some(10));
                self.reads.set(self.reads.get() + store.len());
            }
            self.id == other.id
        }
    }

    /// Invariant: searches take `&self` and hold no state across calls to
    /// `PartialEq`, so an item may read its own store while being compared.
    /// Writes need `&mut` and cannot happen from there.
    #[test]
    fn equality_may_read_the_store_during_search() {
        let store = Rc::new(std::cell::RefCell::new(ArrayStore::new()));
        let reads = Rc::new(std::cell::Cell::new(0));
        let peeker = |id| Peeker {
            id,
            store: Rc::downgrade(&store),
            reads: Rc::clone(&reads),
        };
        for id in [10, 20, 30] {
            store.borrow_mut().append(peeker(id));
        }

        assert_eq!(store.borrow().position(&peeker(30)), Some(2));
        assert_eq!(reads.get(), 9, "three comparisons, each saw three items");
        assert!(store.borrow().contains(&peeker(20)));
        assert!(!store.borrow().contains(&peeker(40)));
        assert_eq!(store.borrow().len(), 3);
        store.borrow().assert_layout();
    }
}
