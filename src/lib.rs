//! rh-collections: value-semantics lists, sets and maps built on two storage
//! engines, a contiguous array store and a Robin Hood hash store.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the algorithmic work in two small engines whose invariants
//!   can be checked directly, and make everything else a thin façade.
//! - Layers:
//!   - `robin_hood`: free functions over an explicit slot slice (find,
//!     insert with displacement, backward-shift removal, layout check).
//!   - `ArrayStore<T>`: one resizable slot buffer with amortized O(1)
//!     append/prepend and O(distance) insert/remove anywhere.
//!   - `HashStore<T, S>`: owns the slot array, hasher and probe bound; grows
//!     by doubling and rehashing when an insert cannot place its item.
//!   - `List`, `Set`, `Map` and their `Mutable*` forms: immutable wrappers
//!     and mutable wrappers around the same stores.
//!
//! Constraints
//! - Single-threaded: the hash store is `!Send`/`!Sync` through its reentrancy
//!   guard marker; callers serialize access themselves. The array store has
//!   no guard: its searches take `&self` and keep no state across `PartialEq`
//!   calls, so reentrant reads are harmless and writes need `&mut`.
//! - No tombstones: removal always closes gaps, so no stale item lingers in
//!   a slot after it leaves a store.
//! - Bounded probing: an item is never more than `probe_limit - 1` slots
//!   past its home index, so a lookup touches at most `probe_limit` slots.
//!
//! Probe bound
//! - Starts at `round(ln(1 - α) / -α)` for the target load factor α (two
//!   for the default α = 0.75). That value bounds a typical cluster, not the
//!   largest one, so growth normally doubles capacity and keeps the bound.
//! - The bound doubles instead, with a warning, when the pending item shares
//!   its full hash with `probe_limit` or more stored items, or when capacity
//!   is already 64 slots per live item. The second case is reached by any
//!   hasher once the store is large enough: with the default hasher at
//!   α = 0.75, some tens of thousands of items usually end up with a bound of
//!   four.
//! - `probe_limit()` is the bound lookups rely on; `max_probe_distance()`
//!   is always below it.
//!
//! Hasher and rehashing invariants
//! - Each slot stores the `u64` hash computed at insertion; growth rehashes
//!   from the stored hash and never calls `T: Hash` again.
//! - Lookups accept any `Q` with `T: Borrow<Q>`; `Q` must hash and compare
//!   like `T` (the same contract as std maps).
//!
//! Immutability
//! - Immutable façades expose no `&mut` access. `Mutable*::freeze` hands the
//!   store over without copying; `to_mutable` copies, so the source keeps
//!   its contents. There is no structural sharing.
//!
//! Errors
//! - Construction and positional operations return `Result<_, CollectionError>`
//!   and validate before mutating. Absence (`find`, `remove`) is an `Option`.
//!
//! Logging
//! - Resizes and rehashes are reported through the `log` facade at debug
//!   level; the library installs no logger.

pub mod array_store;
pub mod collection;
pub mod config;
pub mod error;
pub mod hash_store;
#[cfg(test)]
mod hash_store_proptest;
pub mod index_range;
pub mod list;
pub mod map;
mod reentrancy;
pub mod robin_hood;
pub mod set;

// Public surface
pub use array_store::ArrayStore;
pub use collection::{Collection, Indexed};
pub use config::{ShrinkPolicy, StoreConfig};
pub use error::{CollectionError, Result};
pub use hash_store::HashStore;
pub use index_range::{Direction, IndexRange};
pub use list::{List, MutableList};
pub use map::{Map, MapEntry, MutableMap};
pub use set::{MutableSet, Set};
