//! Robin Hood probing over an explicit slot slice.
//!
//! These functions own no state: each takes the slot slice, the home-index
//! modulus (`capacity`) and the probe bound (`limit`). The slice is expected
//! to hold `capacity + limit + 1` slots. [`HashStore`](crate::HashStore)
//! wraps them; tests drive them directly.
//!
//! Layout invariants maintained by every function here:
//! - an entry at index `i` satisfies `home <= i < home + limit`;
//! - home indices never decrease along a cluster (a run of occupied slots);
//! - the slots from `capacity + limit - 1` onward are always empty, so probe
//!   and shift loops terminate without wrapping or explicit bounds checks.

use thiserror::Error;

/// An occupied slot: the item plus the hash it was inserted with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot<T> {
    pub item: T,
    pub hash: u64,
}

/// Outcome of [`insert_slot`].
#[derive(Debug, PartialEq, Eq)]
pub enum Placement<T> {
    /// Stored at the given index in a previously empty or displaced slot.
    Inserted(usize),
    /// An equal item lived at the index; it was overwritten and is returned.
    Replaced(usize, T),
    /// No slot within the probe bound; the slot is handed back untouched.
    Full(Slot<T>),
}

/// Maximum probe distance for a target load factor `load_factor` in (0, 1):
/// `round(ln(1 - α) / -α)`, never less than one.
pub fn probe_distance_limit(load_factor: f64) -> usize {
    let d = ((1.0 - load_factor).ln() / -load_factor).round();
    if d.is_finite() && d >= 1.0 {
        d as usize
    } else {
        1
    }
}

#[inline]
pub fn home_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

#[inline]
pub fn table_len(capacity: usize, limit: usize) -> usize {
    capacity + limit + 1
}

pub fn empty_slots<T>(capacity: usize, limit: usize) -> Vec<Option<Slot<T>>> {
    let mut slots = Vec::with_capacity(table_len(capacity, limit));
    slots.resize_with(table_len(capacity, limit), || None);
    slots
}

/// Returns the index holding an item with `hash` for which `eq` holds.
///
/// Stops early at an empty slot or at an entry whose home lies past the
/// target's home; by the ordering invariant the item cannot appear later.
pub fn find_slot<T, F>(
    slots: &[Option<Slot<T>>],
    capacity: usize,
    limit: usize,
    hash: u64,
    mut eq: F,
) -> Option<usize>
where
    F: FnMut(&T) -> bool,
{
    let home = home_index(hash, capacity);
    for (i, slot) in slots[home..home + limit].iter().enumerate() {
        let occupant = slot.as_ref()?;
        if home_index(occupant.hash, capacity) > home {
            return None;
        }
        if occupant.hash == hash && eq(&occupant.item) {
            return Some(home + i);
        }
    }
    None
}

/// Places `new`, replacing an equal item or displacing the first entry whose
/// home lies past `new`'s home.
///
/// Displacement shifts the rest of that cluster one slot right. If any entry
/// in the run would leave its probe bound, nothing moves and `Full` is
/// returned, as it is when the bound is exhausted.
pub fn insert_slot<T, F>(
    slots: &mut [Option<Slot<T>>],
    capacity: usize,
    limit: usize,
    new: Slot<T>,
    mut eq: F,
) -> Placement<T>
where
    F: FnMut(&T, &T) -> bool,
{
    let home = home_index(new.hash, capacity);
    for i in home..home + limit {
        let probe = slots[i].as_ref().map(|occupant| {
            (
                home_index(occupant.hash, capacity),
                occupant.hash == new.hash && eq(&occupant.item, &new.item),
            )
        });
        match probe {
            None => {
                slots[i] = Some(new);
                return Placement::Inserted(i);
            }
            Some((_, true)) => {
                return match slots[i].replace(new) {
                    Some(old) => Placement::Replaced(i, old.item),
                    None => Placement::Inserted(i),
                };
            }
            Some((occupant_home, false)) if occupant_home > home => {
                return match shiftable_run_end(slots, capacity, limit, i) {
                    Some(end) => {
                        log::trace!("robin hood displace: run [{}, {}) shifted right", i, end);
                        slots[i..=end].rotate_right(1);
                        slots[i] = Some(new);
                        Placement::Inserted(i)
                    }
                    None => Placement::Full(new),
                };
            }
            Some(_) => {}
        }
    }
    Placement::Full(new)
}

// First empty slot after `start` if every entry in `[start, end)` can move one
// slot right without exceeding its bound.
fn shiftable_run_end<T>(
    slots: &[Option<Slot<T>>],
    capacity: usize,
    limit: usize,
    start: usize,
) -> Option<usize> {
    for (offset, slot) in slots[start..].iter().enumerate() {
        let j = start + offset;
        match slot {
            None => return Some(j),
            Some(occupant) => {
                if j + 1 >= home_index(occupant.hash, capacity) + limit {
                    return None;
                }
            }
        }
    }
    None
}

/// Clears `index` and closes the gap by shifting the following entries of the
/// cluster one slot left. Stops at an empty slot or at an entry already at its
/// home index.
pub fn remove_slot<T>(slots: &mut [Option<Slot<T>>], capacity: usize, index: usize) -> Option<Slot<T>> {
    let removed = slots.get_mut(index)?.take()?;
    let mut hole = index;
    loop {
        let next = hole + 1;
        let movable = match slots.get(next) {
            Some(Some(occupant)) => home_index(occupant.hash, capacity) < next,
            _ => false,
        };
        if !movable {
            break;
        }
        slots[hole] = slots[next].take();
        hole = next;
    }
    Some(removed)
}

/// Largest `index - home` over all occupied slots.
pub fn max_probe_distance<T>(slots: &[Option<Slot<T>>], capacity: usize) -> usize {
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|s| i - home_index(s.hash, capacity)))
        .max()
        .unwrap_or(0)
}

/// Broken layout invariant found by [`check_layout`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutViolation {
    #[error("table has {actual} slots, expected {expected}")]
    Length { expected: usize, actual: usize },
    #[error("entry at {index} lies outside its probe window starting at {home}")]
    OutOfBound { index: usize, home: usize },
    #[error("home indices decrease between slots {index} and {}", .index + 1)]
    Unordered { index: usize },
    #[error("slots {first} and {second} hold equal items")]
    Duplicate { first: usize, second: usize },
}

/// Verifies every layout invariant; intended for tests and debugging.
pub fn check_layout<T: Eq>(
    slots: &[Option<Slot<T>>],
    capacity: usize,
    limit: usize,
) -> Result<(), LayoutViolation> {
    let expected = table_len(capacity, limit);
    if slots.len() != expected {
        return Err(LayoutViolation::Length {
            expected,
            actual: slots.len(),
        });
    }
    for (index, slot) in slots.iter().enumerate() {
        let Some(entry) = slot else { continue };
        let home = home_index(entry.hash, capacity);
        if index < home || index >= home + limit {
            return Err(LayoutViolation::OutOfBound { index, home });
        }
        if let Some(Some(next)) = slots.get(index + 1) {
            if home_index(next.hash, capacity) < home {
                return Err(LayoutViolation::Unordered { index });
            }
        }
        // Equal items share a hash and therefore a home; they would sit in the
        // same contiguous group.
        for (offset, other) in slots[index + 1..].iter().enumerate() {
            let Some(other) = other else { break };
            if home_index(other.hash, capacity) != home {
                break;
            }
            if other.hash == entry.hash && other.item == entry.item {
                return Err(LayoutViolation::Duplicate {
                    first: index,
                    second: index + 1 + offset,
                });
            }
        }
    }
    Ok(())
}
