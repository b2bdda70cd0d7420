//! IndexRange: half-open `[start, end)` window over positional indices.

use crate::error::{CollectionError, Result};
use core::fmt;
use core::ops::Range;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct IndexRange {
    start: usize,
    end: usize,
}

/// Traversal order for [`IndexRange::stride`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl IndexRange {
    /// Builds `[start, end)`; fails if `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(CollectionError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds `[start, start + len)`, saturating at `usize::MAX`.
    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    /// `[0, len)`, the full window over a container of `len` items.
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    pub const fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// True if `other` lies entirely inside `self`. Empty ranges are
    /// contained wherever their start is within `[start, end]`.
    pub fn contains_range(&self, other: IndexRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Walks the range one index at a time in the given direction.
    pub fn stride(&self, direction: Direction) -> Stride {
        Stride {
            range: self.iter(),
            direction,
        }
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Converts a std range; inverted ranges collapse to empty at `start`.
impl From<Range<usize>> for IndexRange {
    fn from(r: Range<usize>) -> Self {
        Self {
            start: r.start,
            end: r.end.max(r.start),
        }
    }
}

impl IntoIterator for IndexRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..self.end
    }
}

impl IntoIterator for &IndexRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..self.end
    }
}

/// Iterator over the indices of an [`IndexRange`] with a step of +1 or -1.
#[derive(Clone, Debug)]
pub struct Stride {
    range: Range<usize>,
    direction: Direction,
}

impl Iterator for Stride {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        match self.direction {
            Direction::Forward => self.range.next(),
            Direction::Reverse => self.range.next_back(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Stride {
    fn next_back(&mut self) -> Option<usize> {
        match self.direction {
            Direction::Forward => self.range.next_back(),
            Direction::Reverse => self.range.next(),
        }
    }
}

impl ExactSizeIterator for Stride {}
