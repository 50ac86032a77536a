//! Bounded, insertion-order-preserving cache used for both the decoded
//! record cache and the resolved-path cache.
//!
//! This mirrors the reference implementation's `Cache` built on an
//! `OrderedDict`: `insert` appends a *new* key at the most-recent end and
//! evicts the least-recent entry once the size limit is exceeded, but
//! re-inserting an already-present key only replaces its value — it does
//! **not** move that key to the most-recent end. Only [`Cache::touch`] does
//! that. This asymmetry is preserved deliberately for fidelity to the
//! reference semantics (see `SPEC_FULL.md` §9's open questions).

use std::collections::HashMap;
use std::hash::Hash;

/// Default number of entries cached by [`crate::enumerator::MftEnumerator`].
pub const DEFAULT_RECORD_CACHE_SIZE: usize = 102_400;
/// Default number of entries cached while building an [`crate::tree::MftTree`].
pub const DEFAULT_TREE_CACHE_SIZE: usize = 1_024;

/// Tunable cache sizes for the two cache instances an enumerator owns.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub record_cache_size: usize,
    pub path_cache_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            record_cache_size: DEFAULT_RECORD_CACHE_SIZE,
            path_cache_size: DEFAULT_RECORD_CACHE_SIZE,
        }
    }
}

impl CacheConfig {
    /// The cache sizes used while building an [`crate::tree::MftTree`],
    /// smaller than the enumeration default because the tree holds every
    /// record's path-relevant state at once.
    #[must_use]
    pub fn for_tree_build() -> Self {
        Self {
            record_cache_size: DEFAULT_TREE_CACHE_SIZE,
            path_cache_size: DEFAULT_TREE_CACHE_SIZE,
        }
    }
}

#[derive(Debug)]
pub struct Cache<K, V> {
    map: HashMap<K, V>,
    order: Vec<K>,
    limit: usize,
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
            limit,
        }
    }

    /// Adds a new key at the most-recent end, or replaces the value of an
    /// existing key in place (without changing its recency). Evicts the
    /// least-recent entry if the map now exceeds the size limit.
    pub fn insert(&mut self, key: K, value: V) {
        if self.map.contains_key(&key) {
            self.map.insert(key, value);
            return;
        }
        self.order.push(key.clone());
        self.map.insert(key, value);
        if self.map.len() > self.limit {
            let oldest = self.order.remove(0);
            self.map.remove(&oldest);
        }
    }

    #[must_use]
    pub fn exists(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Moves an existing key to the most-recent end.
    pub fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos);
            self.order.push(k);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut cache = Cache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        assert_eq!(cache.len(), 2);
        assert!(!cache.exists(&1));
        assert!(cache.exists(&2));
        assert!(cache.exists(&3));
    }

    #[test]
    fn reinsert_does_not_refresh_recency() {
        let mut cache = Cache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        // re-inserting 1 should NOT protect it from eviction
        cache.insert(1, "a-updated");
        cache.insert(3, "c");

        assert!(!cache.exists(&1));
        assert!(cache.exists(&2));
        assert!(cache.exists(&3));
    }

    #[test]
    fn touch_protects_the_touched_key() {
        let mut cache = Cache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.touch(&1);
        cache.insert(3, "c");

        assert!(cache.exists(&1));
        assert!(!cache.exists(&2));
        assert!(cache.exists(&3));
    }

    #[test]
    fn size_never_exceeds_limit_under_any_sequence() {
        let mut cache = Cache::new(3);
        for i in 0..50 {
            cache.insert(i, i * 2);
            if i % 3 == 0 {
                cache.touch(&i);
            }
            assert!(cache.len() <= 3);
        }
    }

    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8),
        Touch(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Insert),
            any::<u8>().prop_map(Op::Touch),
        ]
    }

    proptest! {
        #[test]
        fn size_never_exceeds_limit_for_arbitrary_op_sequences(
            limit in 1usize..16,
            ops in proptest::collection::vec(op_strategy(), 0..200),
        ) {
            let mut cache = Cache::new(limit);
            for op in ops {
                match op {
                    Op::Insert(k) => cache.insert(k, k),
                    Op::Touch(k) => cache.touch(&k),
                }
                prop_assert!(cache.len() <= limit);
            }
        }

        #[test]
        fn touching_the_most_recent_key_never_evicts_it(
            keys in proptest::collection::vec(0u8..10, 4..20),
        ) {
            let mut cache = Cache::new(2);
            for &k in &keys {
                cache.insert(k, k);
            }
            let last = *keys.last().unwrap();
            cache.touch(&last);
            cache.insert(200, 200);
            prop_assert!(cache.exists(&last));
        }
    }
}
