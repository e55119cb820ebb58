//! Keyed in-memory cache with a pluggable eviction policy.
//!
//! Recency is tracked with a logical clock rather than wall time, so
//! ordering is exact and tests are deterministic.

use std::collections::HashMap;

/// What a policy sees about each cached entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryStats {
    pub key: String,
    /// Logical time of insertion.
    pub inserted_at: u64,
    /// Logical time of the last `get` or `insert`.
    pub last_access: u64,
}

/// Decides when a cache is full and which entry leaves.
pub trait EvictionPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// Maximum number of entries, or `None` for unbounded.
    fn capacity(&self) -> Option<usize>;

    /// Pick the entry to drop from `candidates`. `None` keeps everything.
    fn select_victim(&self, candidates: &[CacheEntryStats]) -> Option<String>;
}

/// Keep every entry for the life of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverEvict;

impl EvictionPolicy for NeverEvict {
    fn name(&self) -> &str {
        "never"
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn select_victim(&self, _candidates: &[CacheEntryStats]) -> Option<String> {
        None
    }
}

/// Bounded cache dropping the least recently accessed entry.
#[derive(Debug, Clone, Copy)]
pub struct LeastRecentlyUsed {
    capacity: usize,
}

impl LeastRecentlyUsed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}

impl EvictionPolicy for LeastRecentlyUsed {
    fn name(&self) -> &str {
        "lru"
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn select_victim(&self, candidates: &[CacheEntryStats]) -> Option<String> {
        candidates
            .iter()
            .min_by_key(|entry| entry.last_access)
            .map(|entry| entry.key.clone())
    }
}

/// Policy for a configured entry limit; `0` means never evict.
pub fn policy_for_limit(max_entries: usize) -> Box<dyn EvictionPolicy> {
    if max_entries == 0 {
        Box::new(NeverEvict)
    } else {
        Box::new(LeastRecentlyUsed::new(max_entries))
    }
}

struct Slot<V> {
    value: V,
    inserted_at: u64,
    last_access: u64,
}

pub struct Cache<V> {
    entries: HashMap<String, Slot<V>>,
    policy: Box<dyn EvictionPolicy>,
    clock: u64,
    evictions: u64,
}

impl<V: Clone> Cache<V> {
    pub fn new(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            clock: 0,
            evictions: 0,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(Box::new(NeverEvict))
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up `key`, marking it as recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.tick();
        self.entries.get_mut(key).map(|slot| {
            slot.last_access = now;
            slot.value.clone()
        })
    }

    /// Look up `key` without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`. Returns the entries evicted to make room.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Vec<(String, V)> {
        self.insert_where(key, value, |_| true)
    }

    /// Like [`insert`](Self::insert), but only entries for which `evictable`
    /// holds may be dropped. If none qualify the cache temporarily exceeds
    /// its capacity.
    pub fn insert_where(
        &mut self,
        key: impl Into<String>,
        value: V,
        evictable: impl Fn(&V) -> bool,
    ) -> Vec<(String, V)> {
        let key = key.into();
        let now = self.tick();

        if let Some(slot) = self.entries.get_mut(&key) {
            slot.value = value;
            slot.last_access = now;
            return Vec::new();
        }

        let mut evicted = Vec::new();
        if let Some(capacity) = self.policy.capacity() {
            while self.entries.len() >= capacity {
                let candidates: Vec<CacheEntryStats> = self
                    .entries
                    .iter()
                    .filter(|(_, slot)| evictable(&slot.value))
                    .map(|(k, slot)| CacheEntryStats {
                        key: k.clone(),
                        inserted_at: slot.inserted_at,
                        last_access: slot.last_access,
                    })
                    .collect();

                let Some(victim) = self.policy.select_victim(&candidates) else {
                    break;
                };
                match self.entries.remove(&victim) {
                    Some(slot) => {
                        self.evictions += 1;
                        evicted.push((victim, slot.value));
                    }
                    None => break,
                }
            }
        }

        self.entries.insert(
            key,
            Slot {
                value,
                inserted_at: now,
                last_access: now,
            },
        );
        evicted
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|slot| slot.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries dropped by the policy since creation.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_cache_keeps_everything() {
        let mut cache = Cache::unbounded();
        for i in 0..100 {
            assert!(cache.insert(format!("k{i}"), i).is_empty());
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.evictions(), 0);
        assert_eq!(cache.policy_name(), "never");
    }

    #[test]
    fn overwrite_does_not_grow() {
        let mut cache = Cache::new(Box::new(LeastRecentlyUsed::new(2)));
        cache.insert("a", 1);
        cache.insert("a", 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(2));
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut cache = Cache::new(Box::new(LeastRecentlyUsed::new(2)));
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Touch "a" so "b" becomes the oldest.
        assert_eq!(cache.get("a"), Some(1));

        let evicted = cache.insert("c", 3);
        assert_eq!(evicted, vec![("b".to_string(), 2)]);
        assert!(cache.contains("a"));
        assert!(cache.contains("c"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn peek_does_not_refresh_recency() {
        let mut cache = Cache::new(Box::new(LeastRecentlyUsed::new(2)));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.peek("a"), Some(&1));

        let evicted = cache.insert("c", 3);
        assert_eq!(evicted[0].0, "a");
    }

    #[test]
    fn pinned_entries_are_not_evicted() {
        let mut cache = Cache::new(Box::new(LeastRecentlyUsed::new(1)));
        cache.insert("busy", -1);
        let evicted = cache.insert_where("next", 5, |v| *v >= 0);
        assert!(evicted.is_empty());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_limit_means_never_evict() {
        assert_eq!(policy_for_limit(0).capacity(), None);
        assert_eq!(policy_for_limit(3).capacity(), Some(3));
        assert_eq!(LeastRecentlyUsed::new(0).capacity(), Some(1));
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = Cache::unbounded();
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.remove("a"), Some(1));
        assert_eq!(cache.remove("a"), None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
