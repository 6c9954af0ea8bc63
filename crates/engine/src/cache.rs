//! Query cache keyed by resource identity.
//!
//! Reads store their result under a [`QueryKey`]; writes invalidate the
//! affected keys and the next read refetches. Month-scoped entries are
//! dropped on invalidation so months visited once do not pile up. The
//! unscoped ones are only marked stale and stay available through
//! [`QueryCache::peek`] while a refetch is pending or has failed.

use std::collections::HashMap;

use crate::{Category, Period, Summary, Transaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Categories,
    Transactions(Period),
    RecentTransactions,
    Summary(Period),
}

impl QueryKey {
    /// Keys whose contents derive from the transactions table.
    #[must_use]
    pub fn is_transaction_derived(self) -> bool {
        !matches!(self, Self::Categories)
    }

    #[must_use]
    pub fn period(self) -> Option<Period> {
        match self {
            Self::Transactions(period) | Self::Summary(period) => Some(period),
            Self::Categories | Self::RecentTransactions => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CachedValue {
    Categories(Vec<Category>),
    Transactions(Vec<Transaction>),
    Summary(Summary),
}

#[derive(Debug)]
struct Entry {
    value: CachedValue,
    stale: bool,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh value under `key`.
    #[must_use]
    pub fn get(&self, key: QueryKey) -> Option<&CachedValue> {
        self.entries
            .get(&key)
            .filter(|entry| !entry.stale)
            .map(|entry| &entry.value)
    }

    /// Value under `key`, stale or not.
    #[must_use]
    pub fn peek(&self, key: QueryKey) -> Option<&CachedValue> {
        self.entries.get(&key).map(|entry| &entry.value)
    }

    /// Absent keys count as stale.
    #[must_use]
    pub fn is_stale(&self, key: QueryKey) -> bool {
        self.entries.get(&key).is_none_or(|entry| entry.stale)
    }

    pub fn store(&mut self, key: QueryKey, value: CachedValue) {
        self.entries.insert(key, Entry { value, stale: false });
    }

    /// Invalidates every key matching `predicate`: month-scoped entries are
    /// removed, the rest are marked stale.
    pub fn invalidate(&mut self, predicate: impl Fn(QueryKey) -> bool) {
        self.entries.retain(|key, entry| {
            if !predicate(*key) {
                return true;
            }
            entry.stale = true;
            key.period().is_none()
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// After a category write: joined names and colors may have changed too.
    pub fn invalidate_categories(&mut self) {
        self.invalidate(|_| true);
    }

    pub fn invalidate_transactions(&mut self) {
        self.invalidate(QueryKey::is_transaction_derived);
    }

    /// Drops everything, e.g. when the signed-in identity changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn categories(&self) -> Option<&[Category]> {
        match self.get(QueryKey::Categories) {
            Some(CachedValue::Categories(items)) => Some(items),
            _ => None,
        }
    }

    pub fn transactions(&self, key: QueryKey) -> Option<&[Transaction]> {
        match self.get(key) {
            Some(CachedValue::Transactions(items)) => Some(items),
            _ => None,
        }
    }

    pub fn summary(&self, period: Period) -> Option<&Summary> {
        match self.get(QueryKey::Summary(period)) {
            Some(CachedValue::Summary(summary)) => Some(summary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> (QueryCache, Period) {
        let period = Period::new(2024, 3).unwrap();
        let mut cache = QueryCache::new();
        cache.store(QueryKey::Categories, CachedValue::Categories(vec![]));
        cache.store(
            QueryKey::Transactions(period),
            CachedValue::Transactions(vec![]),
        );
        cache.store(
            QueryKey::RecentTransactions,
            CachedValue::Transactions(vec![]),
        );
        cache.store(
            QueryKey::Summary(period),
            CachedValue::Summary(Summary::default()),
        );
        (cache, period)
    }

    #[test]
    fn transaction_writes_keep_categories_fresh() {
        let (mut cache, period) = filled();
        cache.invalidate_transactions();

        assert!(!cache.is_stale(QueryKey::Categories));
        assert!(cache.is_stale(QueryKey::Transactions(period)));
        assert!(cache.is_stale(QueryKey::RecentTransactions));
        assert!(cache.is_stale(QueryKey::Summary(period)));
        assert!(cache.summary(period).is_none());
        assert!(cache.peek(QueryKey::Summary(period)).is_none());
        assert!(cache.peek(QueryKey::RecentTransactions).is_some());
    }

    #[test]
    fn visited_months_are_evicted_on_invalidation() {
        let mut cache = QueryCache::new();
        let mut period = Period::new(2024, 1).unwrap();
        for _ in 0..12 {
            cache.store(
                QueryKey::Transactions(period),
                CachedValue::Transactions(vec![]),
            );
            cache.store(
                QueryKey::Summary(period),
                CachedValue::Summary(Summary::default()),
            );
            period = period.next();
        }
        cache.store(QueryKey::Categories, CachedValue::Categories(vec![]));
        assert_eq!(cache.len(), 25);

        cache.invalidate_transactions();
        assert_eq!(cache.len(), 1);
        assert!(cache.categories().is_some());

        cache.invalidate_categories();
        assert_eq!(cache.len(), 1);
        assert!(cache.peek(QueryKey::Categories).is_some());
        assert!(cache.categories().is_none());
    }

    #[test]
    fn category_writes_invalidate_everything() {
        let (mut cache, period) = filled();
        cache.invalidate_categories();

        assert!(cache.categories().is_none());
        assert!(cache.transactions(QueryKey::Transactions(period)).is_none());
        assert!(cache.is_stale(QueryKey::RecentTransactions));
    }

    #[test]
    fn store_refreshes_a_stale_entry() {
        let (mut cache, _) = filled();
        cache.invalidate_categories();
        cache.store(QueryKey::Categories, CachedValue::Categories(vec![]));
        assert_eq!(cache.categories(), Some(&[][..]));
    }

    #[test]
    fn clear_drops_every_entry() {
        let (mut cache, period) = filled();
        cache.clear();
        assert!(cache.peek(QueryKey::Categories).is_none());
        assert!(cache.peek(QueryKey::Summary(period)).is_none());
        assert!(cache.is_stale(QueryKey::Transactions(Period::new(1999, 12).unwrap())));
    }
}
