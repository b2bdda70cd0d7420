//! Store configuration: initial capacity, load-factor target and shrink policy.

use crate::error::{CollectionError, Result};

/// Largest capacity either store accepts. Slot buffers are `Vec`s, whose
/// length is bounded by `isize::MAX` bytes; this caps the slot count well
/// below that so `capacity + probe_limit + 1` and `2 * (count + k)` never
/// overflow.
pub const MAX_CAPACITY: usize = (isize::MAX as usize) / 64;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// How the array store reacts when removals leave most of its buffer empty.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ShrinkPolicy {
    /// Reallocate to `2 * count` once fewer than a quarter of the slots are live.
    #[default]
    Quarter,
    /// Keep the buffer; only close the gap and clear vacated slots.
    Never,
}

/// Construction parameters shared by [`ArrayStore`](crate::ArrayStore) and
/// [`HashStore`](crate::HashStore). The array store ignores `load_factor`; the
/// hash store ignores `shrink_policy`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub capacity: usize,
    pub load_factor: f64,
    pub shrink_policy: ShrinkPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            shrink_policy: ShrinkPolicy::Quarter,
        }
    }
}

impl StoreConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_shrink_policy(mut self, shrink_policy: ShrinkPolicy) -> Self {
        self.shrink_policy = shrink_policy;
        self
    }

    /// Dense tables: a high load factor (longer probe bound) and eager shrinking.
    pub fn compact() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: 0.9,
            shrink_policy: ShrinkPolicy::Quarter,
        }
    }

    /// Sparse tables: a low load factor (probe bound of one) and no shrinking.
    pub fn sparse() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: 0.5,
            shrink_policy: ShrinkPolicy::Never,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.capacity)?;
        validate_load_factor(self.load_factor)
    }
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity > MAX_CAPACITY {
        return Err(CollectionError::InvalidCapacity {
            requested: capacity,
            max: MAX_CAPACITY,
        });
    }
    Ok(())
}

pub(crate) fn validate_load_factor(load_factor: f64) -> Result<()> {
    // NaN fails both comparisons.
    if load_factor > 0.0 && load_factor < 1.0 {
        Ok(())
    } else {
        Err(CollectionError::InvalidLoadFactor { load_factor })
    }
}
