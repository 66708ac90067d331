use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use devex_types::Pagination;

use crate::error::{StoreError, StoreResult};

/// A record that can live in a [`Collection`].
///
/// Identifiers are store-assigned, unique, and ordered; with time-ordered
/// ids, id order is creation order.
pub trait Document: Clone + Send + Sync + 'static {
    type Id: Copy + Ord + fmt::Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// Typed find contract: optional filter predicate, optional comparator,
/// skip/limit window.
///
/// This is the engine-side equivalent of a document store's
/// find(filter, sort, skip, limit): filters are predicates over the record,
/// sorts are comparators, and pagination maps onto skip/limit. Unsorted
/// queries return id order.
pub struct Query<'a, T> {
    filter: Option<Box<dyn Fn(&T) -> bool + 'a>>,
    sort: Option<Box<dyn Fn(&T, &T) -> Ordering + 'a>>,
    skip: usize,
    limit: Option<usize>,
}

impl<'a, T> Query<'a, T> {
    pub fn new() -> Self {
        Self {
            filter: None,
            sort: None,
            skip: 0,
            limit: None,
        }
    }

    /// Keep only records matching the predicate.
    pub fn filter(mut self, pred: impl Fn(&T) -> bool + 'a) -> Self {
        self.filter = Some(Box::new(pred));
        self
    }

    /// Order results by the comparator (stable).
    pub fn sort_by(mut self, cmp: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.sort = Some(Box::new(cmp));
        self
    }

    /// Skip the first `n` matching records.
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Return at most `n` records.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Apply a page window: skip/limit derived from page and page size.
    pub fn paginate(self, pagination: &Pagination) -> Self {
        let p = pagination.normalized();
        self.skip(p.skip()).limit(p.page_size)
    }
}

impl<T> Default for Query<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory document collection.
///
/// Records are held in a `BTreeMap` keyed by id behind a `RwLock`: reads
/// clone, writes hold the lock for the whole read-modify-write, so
/// [`Collection::update`] and [`Collection::get_or_insert_with`] are atomic
/// with respect to concurrent callers.
pub struct Collection<T: Document> {
    rows: RwLock<BTreeMap<T::Id, T>>,
}

impl<T: Document> Collection<T> {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.rows.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.read().expect("lock poisoned").is_empty()
    }

    /// Insert a record under its own id.
    ///
    /// Ids are store-assigned and unique; a colliding insert is an error,
    /// not an overwrite.
    pub fn insert(&self, doc: T) -> StoreResult<T::Id> {
        let id = doc.id();
        let mut rows = self.rows.write().expect("lock poisoned");
        if rows.contains_key(&id) {
            return Err(StoreError::DuplicateId(format!("{id:?}")));
        }
        rows.insert(id, doc);
        Ok(id)
    }

    /// Fetch a record by id. `None` if absent.
    pub fn get(&self, id: T::Id) -> Option<T> {
        self.rows.read().expect("lock poisoned").get(&id).cloned()
    }

    /// Whether a record with this id exists.
    pub fn contains(&self, id: T::Id) -> bool {
        self.rows.read().expect("lock poisoned").contains_key(&id)
    }

    /// First record matching the predicate, in id order.
    pub fn find_one(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let rows = self.rows.read().expect("lock poisoned");
        rows.values().find(|doc| pred(doc)).cloned()
    }

    /// Run a [`Query`]: filter, then sort, then the skip/limit window.
    pub fn find(&self, query: Query<'_, T>) -> Vec<T> {
        let rows = self.rows.read().expect("lock poisoned");
        let mut matched: Vec<T> = match &query.filter {
            Some(pred) => rows.values().filter(|doc| pred(doc)).cloned().collect(),
            None => rows.values().cloned().collect(),
        };
        drop(rows);

        if let Some(cmp) = &query.sort {
            matched.sort_by(|a, b| cmp(a, b));
        }

        let end = query
            .limit
            .map(|limit| (query.skip + limit).min(matched.len()))
            .unwrap_or(matched.len());
        if query.skip >= matched.len() {
            return Vec::new();
        }
        matched[query.skip..end].to_vec()
    }

    /// Count records matching the predicate.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        let rows = self.rows.read().expect("lock poisoned");
        rows.values().filter(|doc| pred(doc)).count()
    }

    /// Atomically mutate the record with this id. Returns the updated copy
    /// and the closure's result. The closure runs under the write lock, so
    /// read-modify-write sequences (vote toggles, save toggles) cannot
    /// interleave.
    pub fn update<R>(&self, id: T::Id, f: impl FnOnce(&mut T) -> R) -> Option<(T, R)> {
        let mut rows = self.rows.write().expect("lock poisoned");
        let doc = rows.get_mut(&id)?;
        let out = f(doc);
        Some((doc.clone(), out))
    }

    /// Atomically mutate the first record matching the predicate.
    pub fn find_one_and_update<R>(
        &self,
        pred: impl Fn(&T) -> bool,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<(T, R)> {
        let mut rows = self.rows.write().expect("lock poisoned");
        let doc = rows.values_mut().find(|doc| pred(doc))?;
        let out = f(doc);
        Some((doc.clone(), out))
    }

    /// Find-or-create: return the first record matching the predicate, or
    /// insert the record produced by `make`. Atomic — two concurrent calls
    /// with the same predicate cannot both create.
    ///
    /// Returns the record and whether it was created by this call.
    pub fn get_or_insert_with(
        &self,
        pred: impl Fn(&T) -> bool,
        make: impl FnOnce() -> T,
    ) -> StoreResult<(T, bool)> {
        let mut rows = self.rows.write().expect("lock poisoned");
        if let Some(existing) = rows.values().find(|doc| pred(doc)) {
            return Ok((existing.clone(), false));
        }
        let doc = make();
        let id = doc.id();
        if rows.contains_key(&id) {
            return Err(StoreError::DuplicateId(format!("{id:?}")));
        }
        rows.insert(id, doc.clone());
        Ok((doc, true))
    }

    /// Mutate every record matching the predicate. Returns how many changed.
    pub fn update_many(&self, pred: impl Fn(&T) -> bool, f: impl Fn(&mut T)) -> usize {
        let mut rows = self.rows.write().expect("lock poisoned");
        let mut changed = 0;
        for doc in rows.values_mut().filter(|doc| pred(doc)) {
            f(doc);
            changed += 1;
        }
        changed
    }

    /// Delete by id. Returns `true` if the record existed.
    pub fn delete(&self, id: T::Id) -> bool {
        self.rows.write().expect("lock poisoned").remove(&id).is_some()
    }

    /// Delete every record matching the predicate. Returns how many were
    /// removed.
    pub fn delete_many(&self, pred: impl Fn(&T) -> bool) -> usize {
        let mut rows = self.rows.write().expect("lock poisoned");
        let doomed: Vec<T::Id> = rows
            .values()
            .filter(|doc| pred(doc))
            .map(|doc| doc.id())
            .collect();
        for id in &doomed {
            rows.remove(id);
        }
        doomed.len()
    }

    /// All records in id order, for snapshot persistence.
    pub fn export(&self) -> Vec<T> {
        self.rows
            .read()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Replace the collection contents, for snapshot restore.
    pub fn restore(&self, docs: Vec<T>) {
        let mut rows = self.rows.write().expect("lock poisoned");
        rows.clear();
        for doc in docs {
            rows.insert(doc.id(), doc);
        }
    }
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("record_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Widget {
        id: u32,
        name: String,
        weight: u32,
    }

    impl Document for Widget {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn widget(id: u32, name: &str, weight: u32) -> Widget {
        Widget {
            id,
            name: name.to_string(),
            weight,
        }
    }

    fn seeded() -> Collection<Widget> {
        let c = Collection::new();
        c.insert(widget(1, "anvil", 90)).unwrap();
        c.insert(widget(2, "bolt", 5)).unwrap();
        c.insert(widget(3, "crate", 40)).unwrap();
        c.insert(widget(4, "drill", 40)).unwrap();
        c
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_get() {
        let c = Collection::new();
        let id = c.insert(widget(7, "gear", 12)).unwrap();
        assert_eq!(id, 7);
        assert_eq!(c.get(7).unwrap().name, "gear");
        assert!(c.get(8).is_none());
    }

    #[test]
    fn insert_duplicate_id_is_an_error() {
        let c = Collection::new();
        c.insert(widget(1, "first", 1)).unwrap();
        let err = c.insert(widget(1, "second", 2)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
        // Original record untouched.
        assert_eq!(c.get(1).unwrap().name, "first");
    }

    #[test]
    fn delete_present_and_missing() {
        let c = seeded();
        assert!(c.delete(2));
        assert!(!c.delete(2));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn contains_and_len() {
        let c = seeded();
        assert!(c.contains(1));
        assert!(!c.contains(99));
        assert_eq!(c.len(), 4);
        assert!(!c.is_empty());
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[test]
    fn find_without_sort_returns_id_order() {
        let c = Collection::new();
        c.insert(widget(3, "c", 0)).unwrap();
        c.insert(widget(1, "a", 0)).unwrap();
        c.insert(widget(2, "b", 0)).unwrap();
        let all = c.find(Query::new());
        let ids: Vec<u32> = all.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn find_with_filter_and_sort() {
        let c = seeded();
        let heavy = c.find(
            Query::new()
                .filter(|w: &Widget| w.weight >= 40)
                .sort_by(|a, b| b.weight.cmp(&a.weight)),
        );
        let names: Vec<&str> = heavy.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["anvil", "crate", "drill"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let c = seeded();
        // crate and drill tie on weight; id order must be preserved.
        let tied = c.find(
            Query::new()
                .filter(|w: &Widget| w.weight == 40)
                .sort_by(|a, b| a.weight.cmp(&b.weight)),
        );
        let ids: Vec<u32> = tied.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn skip_and_limit_window() {
        let c = seeded();
        let page = c.find(Query::new().skip(1).limit(2));
        let ids: Vec<u32> = page.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn skip_past_end_is_empty() {
        let c = seeded();
        assert!(c.find(Query::new().skip(10)).is_empty());
        assert!(c.find(Query::new().skip(4).limit(5)).is_empty());
    }

    #[test]
    fn paginate_maps_to_skip_limit() {
        let c = seeded();
        let page = c.find(Query::new().paginate(&Pagination::new(2, 3)));
        let ids: Vec<u32> = page.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn find_one_and_count() {
        let c = seeded();
        assert_eq!(c.find_one(|w| w.name == "bolt").unwrap().id, 2);
        assert!(c.find_one(|w| w.name == "nope").is_none());
        assert_eq!(c.count(|w| w.weight == 40), 2);
    }

    // -----------------------------------------------------------------------
    // Atomic updates
    // -----------------------------------------------------------------------

    #[test]
    fn update_returns_updated_copy_and_closure_result() {
        let c = seeded();
        let (updated, new_weight) = c
            .update(2, |w| {
                w.weight += 1;
                w.weight
            })
            .unwrap();
        assert_eq!(updated.weight, 6);
        assert_eq!(new_weight, 6);
        assert_eq!(c.get(2).unwrap().weight, 6);
        assert!(c.update(99, |_| {}).is_none());
    }

    #[test]
    fn find_one_and_update_targets_first_match() {
        let c = seeded();
        let (updated, _) = c
            .find_one_and_update(|w| w.weight == 40, |w| w.name.push('!'))
            .unwrap();
        assert_eq!(updated.id, 3);
        assert_eq!(c.get(3).unwrap().name, "crate!");
        assert_eq!(c.get(4).unwrap().name, "drill");
    }

    #[test]
    fn update_many_counts_changes() {
        let c = seeded();
        let changed = c.update_many(|w| w.weight >= 40, |w| w.weight = 0);
        assert_eq!(changed, 3);
        assert_eq!(c.count(|w| w.weight == 0), 3);
    }

    #[test]
    fn delete_many_removes_matches() {
        let c = seeded();
        let removed = c.delete_many(|w| w.weight == 40);
        assert_eq!(removed, 2);
        assert_eq!(c.len(), 2);
        assert!(!c.contains(3));
        assert!(!c.contains(4));
    }

    // -----------------------------------------------------------------------
    // Find-or-create
    // -----------------------------------------------------------------------

    #[test]
    fn get_or_insert_finds_existing() {
        let c = seeded();
        let (found, created) = c
            .get_or_insert_with(|w| w.name == "bolt", || widget(99, "bolt", 0))
            .unwrap();
        assert!(!created);
        assert_eq!(found.id, 2);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn get_or_insert_creates_when_absent() {
        let c = seeded();
        let (made, created) = c
            .get_or_insert_with(|w| w.name == "nut", || widget(5, "nut", 1))
            .unwrap();
        assert!(created);
        assert_eq!(made.id, 5);
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn get_or_insert_is_idempotent() {
        let c = Collection::new();
        for _ in 0..3 {
            c.get_or_insert_with(|w: &Widget| w.name == "only", || widget(1, "only", 0))
                .unwrap();
        }
        assert_eq!(c.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_updates_do_not_interleave() {
        use std::sync::Arc;
        use std::thread;

        let c = Arc::new(Collection::new());
        c.insert(widget(1, "counter", 0)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&c);
                thread::spawn(move || {
                    for _ in 0..100 {
                        c.update(1, |w| w.weight += 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        // Every read-modify-write ran under the write lock: no lost updates.
        assert_eq!(c.get(1).unwrap().weight, 800);
    }

    #[test]
    fn concurrent_find_or_create_creates_once() {
        use std::sync::Arc;
        use std::thread;

        let c: Arc<Collection<Widget>> = Arc::new(Collection::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let c = Arc::clone(&c);
                thread::spawn(move || {
                    c.get_or_insert_with(
                        |w: &Widget| w.name == "singleton",
                        || widget(100 + i, "singleton", 0),
                    )
                    .unwrap()
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(c.count(|w| w.name == "singleton"), 1);
    }

    // -----------------------------------------------------------------------
    // Export / restore
    // -----------------------------------------------------------------------

    #[test]
    fn export_restore_roundtrip() {
        let c = seeded();
        let rows = c.export();
        assert_eq!(rows.len(), 4);

        let fresh: Collection<Widget> = Collection::new();
        fresh.restore(rows);
        assert_eq!(fresh.len(), 4);
        assert_eq!(fresh.get(3).unwrap().name, "crate");
    }

    #[test]
    fn restore_replaces_contents() {
        let c = seeded();
        c.restore(vec![widget(9, "lone", 1)]);
        assert_eq!(c.len(), 1);
        assert!(c.contains(9));
        assert!(!c.contains(1));
    }

    #[test]
    fn debug_format() {
        let c = seeded();
        let debug = format!("{c:?}");
        assert!(debug.contains("Collection"));
        assert!(debug.contains("record_count"));
    }
}
