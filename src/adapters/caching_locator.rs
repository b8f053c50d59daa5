//! Bounded memoisation in front of a [`FilingLocator`].
//!
//! Locate results are keyed by `(filer, kind, range)` and retrieved documents by
//! source URL. Each cache holds at most `capacity` entries and evicts the least
//! recently used one. Errors are never cached.

use crate::domain::error::FilingscopeError;
use crate::domain::filing::{DateRange, DocumentKind, FilerId, FilingReference};
use crate::ports::filing_locator::FilingLocator;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Fixed-capacity LRU map. Capacity 0 stores nothing.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    recency: VecDeque<K>,
}

impl<K: Clone + Eq + Hash, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            recency: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.recency.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.recency.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}

type LocateKey = (FilerId, DocumentKind, DateRange);

pub struct CachingLocator<L> {
    inner: L,
    located: RefCell<BoundedCache<LocateKey, Vec<FilingReference>>>,
    documents: RefCell<BoundedCache<String, String>>,
}

impl<L: FilingLocator> CachingLocator<L> {
    pub fn new(inner: L, capacity: usize) -> Self {
        Self {
            inner,
            located: RefCell::new(BoundedCache::new(capacity)),
            documents: RefCell::new(BoundedCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: FilingLocator> FilingLocator for CachingLocator<L> {
    fn locate(
        &self,
        filer: &FilerId,
        kind: DocumentKind,
        range: &DateRange,
    ) -> Result<Vec<FilingReference>, FilingscopeError> {
        let key = (filer.clone(), kind, *range);
        if let Some(hit) = self.located.borrow_mut().get(&key) {
            log::debug!("cache hit: {} {} ({})", filer, kind, range);
            return Ok(hit);
        }

        let references = self.inner.locate(filer, kind, range)?;
        self.located.borrow_mut().insert(key, references.clone());
        Ok(references)
    }

    fn retrieve(&self, reference: &FilingReference) -> Result<String, FilingscopeError> {
        if let Some(hit) = self.documents.borrow_mut().get(&reference.url) {
            log::debug!("cache hit: {}", reference.url);
            return Ok(hit);
        }

        let text = self.inner.retrieve(reference)?;
        self.documents
            .borrow_mut()
            .insert(reference.url.clone(), text.clone());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filing::FilingDate;
    use std::cell::Cell;

    #[test]
    fn bounded_cache_evicts_least_recently_used() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));

        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn bounded_cache_reinsert_refreshes() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        cache.insert("c", 3);
        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = BoundedCache::new(0);
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
    }

    struct CountingLocator {
        locates: Cell<usize>,
        retrieves: Cell<usize>,
        fail: bool,
    }

    impl CountingLocator {
        fn new(fail: bool) -> Self {
            Self {
                locates: Cell::new(0),
                retrieves: Cell::new(0),
                fail,
            }
        }
    }

    impl FilingLocator for CountingLocator {
        fn locate(
            &self,
            filer: &FilerId,
            kind: DocumentKind,
            _range: &DateRange,
        ) -> Result<Vec<FilingReference>, FilingscopeError> {
            self.locates.set(self.locates.get() + 1);
            if self.fail {
                return Err(FilingscopeError::Retrieval {
                    filer: filer.to_string(),
                    reason: "unavailable".into(),
                });
            }
            Ok(vec![FilingReference::new(
                filer.clone(),
                FilingDate::parse("2024-11-14"),
                format!("mem://{}", filer),
                kind,
            )])
        }

        fn retrieve(&self, reference: &FilingReference) -> Result<String, FilingscopeError> {
            self.retrieves.set(self.retrieves.get() + 1);
            Ok(format!("<doc for {}/>", reference.filer))
        }
    }

    #[test]
    fn repeated_calls_hit_cache() {
        let locator = CachingLocator::new(CountingLocator::new(false), 8);
        let filer = FilerId::parse("1350694").unwrap();
        let range = DateRange::default();

        let first = locator.locate(&filer, DocumentKind::Holdings, &range).unwrap();
        let second = locator.locate(&filer, DocumentKind::Holdings, &range).unwrap();
        assert_eq!(first, second);
        assert_eq!(locator.inner().locates.get(), 1);

        locator.retrieve(&first[0]).unwrap();
        locator.retrieve(&first[0]).unwrap();
        assert_eq!(locator.inner().retrieves.get(), 1);
    }

    #[test]
    fn different_kind_is_a_different_key() {
        let locator = CachingLocator::new(CountingLocator::new(false), 8);
        let filer = FilerId::parse("1350694").unwrap();
        let range = DateRange::default();

        locator.locate(&filer, DocumentKind::Holdings, &range).unwrap();
        locator.locate(&filer, DocumentKind::Ownership, &range).unwrap();
        assert_eq!(locator.inner().locates.get(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let locator = CachingLocator::new(CountingLocator::new(true), 8);
        let filer = FilerId::parse("1350694").unwrap();
        let range = DateRange::default();

        assert!(locator.locate(&filer, DocumentKind::Holdings, &range).is_err());
        assert!(locator.locate(&filer, DocumentKind::Holdings, &range).is_err());
        assert_eq!(locator.inner().locates.get(), 2);
    }
}
