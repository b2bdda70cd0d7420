//! Traits shared by the list, set and map façades.

use crate::error::Result;

/// Anything that holds a countable number of items.
pub trait Collection {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positional access, bounds-checked against `[0, len)`.
pub trait Indexed: Collection {
    fn get(&self, index: usize) -> Result<&Self::Item>;

    fn first(&self) -> Option<&Self::Item> {
        self.get(0).ok()
    }

    fn last(&self) -> Option<&Self::Item> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        self.get(len - 1).ok()
    }
}
