use crate::NodePath;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// UI expand/collapse state reported by the host for a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandState {
    Collapsed,
    Expanded,
}

/// Cached state for one node path.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// Last expand/collapse state the host reported, if any.
    pub expand: Option<ExpandState>,

    /// Children snapshot from the last successful fetch, if any.
    pub children: Option<Vec<T>>,

    /// When the children snapshot was written.
    pub loaded_at: Option<Instant>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            expand: None,
            children: None,
            loaded_at: None,
        }
    }
}

/// Ticket handed out when a child fetch begins.
///
/// Carries the cache generation observed at fetch start; a write presenting a
/// ticket older than the current generation is discarded, so a fetch that was
/// outstanding across an invalidation cannot resurrect stale children.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
}

/// Path-keyed store of expand state and child snapshots.
///
/// Owned by the explorer session and passed explicitly to node operations.
/// Safe for concurrent sibling fetches; lock poisoning is recovered rather
/// than propagated since entries are plain data.
///
/// There is no eviction beyond explicit invalidation: the entry count is
/// bounded by the visible tree size.
pub struct NodeCache<T> {
    entries: RwLock<HashMap<NodePath, CacheEntry<T>>>,
    generation: AtomicU64,
}

impl<T: Clone> NodeCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn get(&self, path: &NodePath) -> Option<CacheEntry<T>> {
        read_lock(&self.entries).get(path).cloned()
    }

    /// Children snapshot for a path, if a fetch has completed since the last
    /// invalidation.
    pub fn children(&self, path: &NodePath) -> Option<Vec<T>> {
        read_lock(&self.entries)
            .get(path)
            .and_then(|entry| entry.children.clone())
    }

    /// Marks the start of a child fetch for stale-result detection.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    /// Stores a children snapshot fetched under `ticket`.
    ///
    /// Returns `false` (and stores nothing) if the cache was invalidated
    /// after the ticket was issued; the abandoned result is simply dropped.
    pub fn put_children(&self, path: &NodePath, ticket: FetchTicket, children: Vec<T>) -> bool {
        if ticket.generation != self.generation.load(Ordering::Acquire) {
            log::debug!("Discarding stale children fetch for {}", path);
            return false;
        }

        let mut entries = write_lock(&self.entries);
        let entry = entries.entry(path.clone()).or_default();
        entry.children = Some(children);
        entry.loaded_at = Some(Instant::now());
        true
    }

    /// Removes the entry for `path`; with `include_descendants`, removes every
    /// entry whose path is prefixed by `path` as well.
    ///
    /// Bumps the generation so in-flight fetches are abandoned.
    pub fn invalidate(&self, path: &NodePath, include_descendants: bool) {
        self.generation.fetch_add(1, Ordering::AcqRel);

        let mut entries = write_lock(&self.entries);
        if include_descendants {
            entries.retain(|entry_path, _| !entry_path.is_self_or_descendant_of(path));
        } else {
            entries.remove(path);
        }
    }

    /// Drops every entry. Used by the explicit full-refresh command.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        write_lock(&self.entries).clear();
    }

    /// Best-effort expand-state storage: creates the entry if the host
    /// reports state for a path not yet cached.
    pub fn store_expand_state(&self, path: &NodePath, state: ExpandState) {
        let mut entries = write_lock(&self.entries);
        entries.entry(path.clone()).or_default().expand = Some(state);
    }

    pub fn expand_state(&self, path: &NodePath) -> Option<ExpandState> {
        read_lock(&self.entries).get(path).and_then(|e| e.expand)
    }

    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.entries).is_empty()
    }
}

impl<T: Clone> Default for NodeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn read_lock<K, V>(lock: &RwLock<HashMap<K, V>>) -> RwLockReadGuard<'_, HashMap<K, V>> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn write_lock<K, V>(lock: &RwLock<HashMap<K, V>>) -> RwLockWriteGuard<'_, HashMap<K, V>> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pid() -> Uuid {
        Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap()
    }

    fn db_path(name: &str) -> NodePath {
        NodePath::Database {
            profile_id: pid(),
            database: name.into(),
        }
    }

    fn table_path(db: &str, name: &str) -> NodePath {
        NodePath::Table {
            profile_id: pid(),
            database: db.into(),
            name: name.into(),
        }
    }

    fn column_path(db: &str, table: &str, name: &str) -> NodePath {
        NodePath::Column {
            profile_id: pid(),
            database: db.into(),
            table: table.into(),
            name: name.into(),
        }
    }

    #[test]
    fn put_and_get_children() {
        let cache: NodeCache<String> = NodeCache::new();
        let ticket = cache.begin_fetch();

        assert!(cache.put_children(&db_path("shop"), ticket, vec!["orders".into()]));
        assert_eq!(
            cache.children(&db_path("shop")),
            Some(vec!["orders".to_string()])
        );
    }

    #[test]
    fn invalidate_with_descendants_removes_every_prefixed_entry() {
        let cache: NodeCache<String> = NodeCache::new();
        let ticket = cache.begin_fetch();

        cache.put_children(&db_path("shop"), ticket, vec![]);
        cache.put_children(&table_path("shop", "orders"), ticket, vec![]);
        cache.put_children(&column_path("shop", "orders", "id"), ticket, vec![]);
        cache.put_children(&db_path("crm"), ticket, vec![]);

        cache.invalidate(&db_path("shop"), true);

        assert!(cache.get(&db_path("shop")).is_none());
        assert!(cache.get(&table_path("shop", "orders")).is_none());
        assert!(cache.get(&column_path("shop", "orders", "id")).is_none());
        // Sibling database untouched.
        assert!(cache.get(&db_path("crm")).is_some());
    }

    #[test]
    fn invalidate_without_descendants_removes_only_the_entry() {
        let cache: NodeCache<String> = NodeCache::new();
        let ticket = cache.begin_fetch();

        cache.put_children(&db_path("shop"), ticket, vec![]);
        cache.put_children(&table_path("shop", "orders"), ticket, vec![]);

        cache.invalidate(&db_path("shop"), false);

        assert!(cache.get(&db_path("shop")).is_none());
        assert!(cache.get(&table_path("shop", "orders")).is_some());
    }

    #[test]
    fn stale_fetch_is_discarded_after_invalidation() {
        let cache: NodeCache<String> = NodeCache::new();

        let ticket = cache.begin_fetch();
        cache.invalidate(&db_path("shop"), true);

        assert!(!cache.put_children(&db_path("shop"), ticket, vec!["stale".into()]));
        assert!(cache.children(&db_path("shop")).is_none());

        // A fresh ticket taken after the invalidation writes fine.
        let ticket = cache.begin_fetch();
        assert!(cache.put_children(&db_path("shop"), ticket, vec!["fresh".into()]));
    }

    #[test]
    fn expand_state_creates_entry_for_uncached_path() {
        let cache: NodeCache<String> = NodeCache::new();
        let path = table_path("shop", "orders");

        assert!(cache.expand_state(&path).is_none());
        cache.store_expand_state(&path, ExpandState::Expanded);
        assert_eq!(cache.expand_state(&path), Some(ExpandState::Expanded));

        cache.store_expand_state(&path, ExpandState::Collapsed);
        assert_eq!(cache.expand_state(&path), Some(ExpandState::Collapsed));
    }

    #[test]
    fn clear_empties_the_cache_and_abandons_fetches() {
        let cache: NodeCache<String> = NodeCache::new();
        let ticket = cache.begin_fetch();
        cache.put_children(&db_path("shop"), ticket, vec![]);

        let in_flight = cache.begin_fetch();
        cache.clear();

        assert!(cache.is_empty());
        assert!(!cache.put_children(&db_path("shop"), in_flight, vec![]));
    }
}
