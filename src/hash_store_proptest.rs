#![cfg(test)]

// Property tests for HashStore kept inside the crate so they can call the
// layout checker after every operation.

use crate::config::StoreConfig;
use crate::hash_store::{HashStore, SPARSE_LIMIT};
use crate::robin_hood::probe_distance_limit;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations shrink toward earlier keys and shorter scripts.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    Remove(usize),
    Find(usize),
    Contains(String),
    Retain(u8),
    Reserve(usize),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => idx.clone().prop_map(Op::Insert),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Find),
            1 => "[a-z]{0,4}".prop_map(Op::Contains),
            1 => any::<u8>().prop_map(Op::Retain),
            1 => (0usize..40).prop_map(Op::Reserve),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Collision-heavy hasher: keeps only the low four bits of a strong hash, so
// at most sixteen distinct hashes exist.
#[derive(Clone, Default)]
struct NarrowBuildHasher;
struct NarrowHasher(std::collections::hash_map::DefaultHasher);
impl BuildHasher for NarrowBuildHasher {
    type Hasher = NarrowHasher;
    fn build_hasher(&self) -> Self::Hasher {
        NarrowHasher(Default::default())
    }
}
impl Hasher for NarrowHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }
    fn finish(&self) -> u64 {
        self.0.finish() & 0xF
    }
}

fn run_script<S: BuildHasher>(
    mut sut: HashStore<Key, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashSet<Key> = HashSet::new();
    for op in ops {
        match op {
            Op::Insert(i) => {
                let k = key_from(pool, i);
                let replaced = sut.insert(k.clone());
                let fresh = model.insert(k.clone());
                prop_assert_eq!(replaced.is_none(), fresh);
                if let Some(old) = replaced {
                    prop_assert_eq!(old, k);
                }
            }
            Op::Remove(i) => {
                let k = key_from(pool, i);
                let removed = sut.remove(k.0.as_str());
                prop_assert_eq!(removed.is_some(), model.remove(&k));
                prop_assert!(!sut.contains(&k));
            }
            Op::Find(i) => {
                let k = key_from(pool, i);
                let at = sut.find(&k);
                prop_assert_eq!(at.is_some(), model.contains(&k));
                if let Some(index) = at {
                    prop_assert_eq!(sut.get_at(index), Some(&k));
                }
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains(&Key(s.clone())));
            }
            Op::Retain(mask) => {
                let keep = |k: &Key| (k.0.len() as u8) & mask & 3 != 0 || k.0.is_empty();
                sut.retain(|k| keep(k));
                model.retain(|k| keep(k));
            }
            Op::Reserve(n) => {
                let limit = sut.probe_limit();
                prop_assert!(sut.reserve(n).is_ok());
                prop_assert!(sut.probe_limit() >= limit);
            }
            Op::Iterate => {
                let seen: BTreeSet<Key> = sut.iter().cloned().collect();
                let expected: BTreeSet<Key> = model.iter().cloned().collect();
                prop_assert_eq!(seen.len(), sut.len(), "iter yields each item once");
                prop_assert_eq!(seen, expected);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        if let Err(violation) = sut.check_layout() {
            return Err(TestCaseError::fail(format!("layout: {violation}")));
        }
        prop_assert!(sut.max_probe_distance() < sut.probe_limit());
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashSet.
// Invariants exercised across random operation sequences:
// - insert replaces equal items and reports it; len tracks distinct items.
// - find/contains parity with the model, including borrowed `&str` lookups.
// - every item stays within the probe bound and the cluster order holds.
// - iter yields every live item exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: HashStore<Key> = HashStore::with_capacity(2).unwrap();
        run_script(sut, &pool, ops)?;
    }
}

// Property: the same invariants hold at a high load factor, where the probe
// bound is wider and clusters run longer.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_compact((pool, ops) in arb_scenario()) {
        let config = StoreConfig::compact().with_capacity(1);
        let sut: HashStore<Key> = HashStore::with_config(&config).unwrap();
        run_script(sut, &pool, ops)?;
    }
}

// Property: same invariants under a hasher with only sixteen distinct
// outputs. Growth cannot separate equal hashes, so the probe limit widens.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = HashStore::with_config_and_hasher(
            &StoreConfig::default().with_capacity(4),
            NarrowBuildHasher,
        )
        .unwrap();
        run_script(sut, &pool, ops)?;
    }
}

// Property: the probe bound holds for integer keys inserted in bulk, and a
// second store built from the same items compares equal.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_bulk_insert_respects_bound(items in proptest::collection::vec(any::<u32>(), 0..400)) {
        let mut sut: HashStore<u32> = HashStore::with_capacity(1).unwrap();
        for &x in &items {
            sut.insert(x);
        }
        let model: HashSet<u32> = items.iter().copied().collect();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.check_layout().is_ok());
        prop_assert!(model.iter().all(|x| sut.contains(x)));
        let rebuilt: HashStore<u32> = model.into_iter().collect();
        prop_assert!(rebuilt == sut);
    }
}

// Property: with the default hasher the probe limit keeps its analytic value
// while the table is dense. An insert may widen it only after capacity has
// reached `SPARSE_LIMIT` slots per item already stored.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_limit_widens_only_when_sparse(
        items in proptest::collection::vec(any::<u64>(), 0..600),
        compact in any::<bool>(),
    ) {
        let base = if compact { StoreConfig::compact() } else { StoreConfig::default() };
        let config = base.with_capacity(1);
        let analytic = probe_distance_limit(config.load_factor);
        let mut sut: HashStore<u64> = HashStore::with_config(&config).unwrap();
        prop_assert_eq!(sut.probe_limit(), analytic);
        for x in items {
            let (limit, len) = (sut.probe_limit(), sut.len());
            sut.insert(x);
            if sut.probe_limit() > limit {
                prop_assert!(
                    sut.capacity() >= SPARSE_LIMIT * len.max(1),
                    "widened {} -> {} at capacity {} with {} items",
                    limit, sut.probe_limit(), sut.capacity(), len
                );
            } else {
                prop_assert_eq!(sut.probe_limit(), limit);
            }
            if sut.probe_limit() == analytic {
                prop_assert!(sut.max_probe_distance() < analytic);
            }
        }
        prop_assert!(sut.check_layout().is_ok());
    }
}
