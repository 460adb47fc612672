//! Memoized row orderings
//!
//! Turning pages or toggling rows leaves the query, filter and sort alone, so
//! the filtered and sorted order can be reused. A hit must render exactly what
//! a fresh computation would.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::trace;

use argo_core::quality::QualityFilter;
use argo_core::table::SortField;
use argo_core::view_state::SortState;

/// Inputs that determine a row ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey<F> {
    pub query: String,
    pub quality_filter: QualityFilter,
    pub sort: SortState<F>,
}

struct CacheEntries<F> {
    orders: AHashMap<OrderKey<F>, Arc<[usize]>>,
    /// Least recently used first
    access_order: Vec<OrderKey<F>>,
}

/// LRU cache of row orderings for one record collection
pub struct QueryCache<F> {
    entries: RwLock<CacheEntries<F>>,
    max_entries: usize,
}

impl<F: SortField> QueryCache<F> {
    /// Create a cache holding at most `max_entries` orderings; 0 disables it
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(CacheEntries {
                orders: AHashMap::new(),
                access_order: Vec::new(),
            }),
            max_entries,
        }
    }

    /// Cached ordering for `key`, or compute and remember it
    pub fn get_or_insert_with(
        &self,
        key: OrderKey<F>,
        compute: impl FnOnce() -> Vec<usize>,
    ) -> Arc<[usize]> {
        if self.max_entries == 0 {
            return compute().into();
        }

        {
            let mut entries = self.entries.write();
            if let Some(order) = entries.orders.get(&key).cloned() {
                entries.access_order.retain(|k| k != &key);
                entries.access_order.push(key);
                trace!("order cache hit");
                return order;
            }
        }

        let order: Arc<[usize]> = compute().into();

        let mut entries = self.entries.write();
        if entries.orders.len() >= self.max_entries && !entries.orders.contains_key(&key) {
            if !entries.access_order.is_empty() {
                let evicted = entries.access_order.remove(0);
                entries.orders.remove(&evicted);
            }
        }
        entries.access_order.retain(|k| k != &key);
        entries.access_order.push(key.clone());
        entries.orders.insert(key, order.clone());
        order
    }

    pub fn len(&self) -> usize {
        self.entries.read().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.orders.clear();
        entries.access_order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argo_core::records::ProfileField;
    use argo_core::view_state::SortDirection;

    fn key(query: &str) -> OrderKey<ProfileField> {
        OrderKey {
            query: query.to_string(),
            quality_filter: QualityFilter::All,
            sort: SortState::new(ProfileField::Id, SortDirection::Asc),
        }
    }

    #[test]
    fn test_hit_skips_computation() {
        let cache = QueryCache::new(4);
        let first = cache.get_or_insert_with(key("a"), || vec![2, 0, 1]);
        let second = cache.get_or_insert_with(key("a"), || panic!("should be cached"));
        assert_eq!(&*first, &*second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = QueryCache::new(2);
        cache.get_or_insert_with(key("a"), || vec![0]);
        cache.get_or_insert_with(key("b"), || vec![1]);
        // Touch "a" so "b" becomes the eviction candidate
        cache.get_or_insert_with(key("a"), || unreachable!());
        cache.get_or_insert_with(key("c"), || vec![2]);

        assert_eq!(cache.len(), 2);
        let recomputed = cache.get_or_insert_with(key("b"), || vec![9]);
        assert_eq!(&*recomputed, &[9]);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = QueryCache::new(0);
        cache.get_or_insert_with(key("a"), || vec![0]);
        assert!(cache.is_empty());
    }
}
