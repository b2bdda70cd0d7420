//! Error type shared by both stores and the façades built on them.

use crate::index_range::IndexRange;
use thiserror::Error;

/// Failures reported by construction and positional operations.
///
/// Every variant is raised before any mutation happens, so a store that
/// returns one of these is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// Requested capacity cannot be represented by the backing buffer.
    #[error("invalid capacity {requested}: must not exceed {max}")]
    InvalidCapacity { requested: usize, max: usize },

    /// Load factor outside the open interval (0, 1).
    #[error("invalid load factor {load_factor}: must lie strictly between 0 and 1")]
    InvalidLoadFactor { load_factor: f64 },

    #[error("index {index} out of range: valid indices are [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("range {range} out of range: valid ranges lie within [0, {len})")]
    IndexRangeOutOfRange { range: IndexRange, len: usize },

    /// A range whose start lies after its end.
    #[error("inverted range: start {start} is greater than end {end}")]
    InvertedRange { start: usize, end: usize },
}

impl CollectionError {
    /// Short, stable label for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidCapacity { .. } | Self::InvalidLoadFactor { .. } => "config",
            Self::IndexOutOfRange { .. } | Self::IndexRangeOutOfRange { .. } => "bounds",
            Self::InvertedRange { .. } => "range",
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectionError>;

/// Checks that `index` addresses a live item, i.e. lies in `[0, len)`.
#[inline]
pub fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(CollectionError::IndexOutOfRange { index, len })
    }
}

/// Checks that `index` is a valid insertion point, i.e. lies in `[0, len]`.
#[inline]
pub fn check_insert_index(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(CollectionError::IndexOutOfRange { index, len: len + 1 })
    }
}

#[inline]
pub fn check_range(range: IndexRange, len: usize) -> Result<()> {
    if range.end() <= len {
        Ok(())
    } else {
        Err(CollectionError::IndexRangeOutOfRange { range, len })
    }
}
