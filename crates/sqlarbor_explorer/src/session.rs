//! Explorer session: connections, child fetching, and mutation application.
//!
//! The session owns one [`NodeCache`] and one lazily-connected connection per
//! profile. The cache only ever reflects confirmed server state: child
//! snapshots are written after a successful fetch, and a mutation's subtree is
//! invalidated only once the server has accepted at least one statement of it.

use crate::node::ObjectNode;
use sqlarbor_core::{
    metadata, ColumnInfo, Connection, ConnectionProfile, DbDriver, DbError, GroupKind,
    HistoryEntry, HistoryStore, NodeCache, NodePath, ProfileStore, QueryRequest, QueryResult,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use uuid::Uuid;

/// One live connection, serialized so only one statement runs on it at a
/// time. Sibling fetches on different connections still run concurrently.
pub type SharedConnection = Arc<Mutex<Box<dyn Connection>>>;

/// Callback invoked after the cache changed. `None` means the whole tree
/// must re-render, `Some(path)` scopes the refresh to a subtree.
pub type RefreshListener = Box<dyn Fn(Option<&NodePath>) + Send + Sync>;

/// Where editor-run queries execute.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTarget {
    pub profile_id: Uuid,
    pub database: Option<String>,
}

pub struct ExplorerSession {
    driver: Arc<dyn DbDriver>,
    profiles: RwLock<Vec<ConnectionProfile>>,
    connections: Mutex<HashMap<Uuid, SharedConnection>>,
    cache: NodeCache<ObjectNode>,
    history: Option<Mutex<HistoryStore>>,
    profile_store: Option<ProfileStore>,
    listeners: Mutex<Vec<RefreshListener>>,
    query_target: RwLock<Option<QueryTarget>>,
}

impl ExplorerSession {
    pub fn new(driver: Arc<dyn DbDriver>) -> Self {
        Self {
            driver,
            profiles: RwLock::new(Vec::new()),
            connections: Mutex::new(HashMap::new()),
            cache: NodeCache::new(),
            history: None,
            profile_store: None,
            listeners: Mutex::new(Vec::new()),
            query_target: RwLock::new(None),
        }
    }

    pub fn with_history(mut self, store: HistoryStore) -> Self {
        self.history = Some(Mutex::new(store));
        self
    }

    /// Backs profiles with persistent storage: saved profiles are loaded now,
    /// and every add/remove is written back.
    pub fn with_profile_store(mut self, store: ProfileStore) -> Result<Self, DbError> {
        self.profiles = RwLock::new(store.load()?);
        self.profile_store = Some(store);
        Ok(self)
    }

    pub fn cache(&self) -> &NodeCache<ObjectNode> {
        &self.cache
    }

    // --- profiles -----------------------------------------------------------

    pub fn profiles(&self) -> Vec<ConnectionProfile> {
        read_lock(&self.profiles).clone()
    }

    pub fn profile(&self, profile_id: Uuid) -> Option<ConnectionProfile> {
        read_lock(&self.profiles)
            .iter()
            .find(|p| p.id == profile_id)
            .cloned()
    }

    pub fn add_profile(&self, profile: ConnectionProfile) {
        log::info!("Adding connection profile '{}'", profile.name);
        write_lock(&self.profiles).push(profile);
        self.persist_profiles();
        self.emit_refresh(None);
    }

    /// Removes a profile, closing its connection and dropping every cache
    /// entry under it.
    pub fn remove_profile(&self, profile_id: Uuid) -> Result<(), DbError> {
        if let Some(shared) = mutex_lock(&self.connections).remove(&profile_id) {
            if let Err(e) = mutex_lock(&shared).close() {
                log::warn!("Error closing connection {}: {}", profile_id, e);
            }
        }

        write_lock(&self.profiles).retain(|p| p.id != profile_id);
        self.persist_profiles();

        let mut target = write_lock(&self.query_target);
        if target.as_ref().is_some_and(|t| t.profile_id == profile_id) {
            *target = None;
        }
        drop(target);

        self.cache
            .invalidate(&NodePath::Connection { profile_id }, true);
        self.emit_refresh(None);
        Ok(())
    }

    fn persist_profiles(&self) {
        if let Some(store) = &self.profile_store {
            if let Err(e) = store.save(&read_lock(&self.profiles)) {
                log::warn!("Failed to persist connection profiles: {}", e);
            }
        }
    }

    // --- connections and statements -----------------------------------------

    /// Connection for a profile, connecting on first use. A cached connection
    /// that fails its ping is closed and replaced.
    pub fn connection(&self, profile_id: Uuid) -> Result<SharedConnection, DbError> {
        let mut connections = mutex_lock(&self.connections);
        if let Some(shared) = connections.get(&profile_id) {
            if mutex_lock(shared).ping().is_ok() {
                return Ok(shared.clone());
            }
            log::warn!("Connection for {} failed ping, reconnecting", profile_id);
        }
        if let Some(dead) = connections.remove(&profile_id) {
            if let Err(e) = mutex_lock(&dead).close() {
                log::debug!("Error closing dead connection: {}", e);
            }
        }

        let profile = self
            .profile(profile_id)
            .ok_or_else(|| DbError::InvalidProfile(format!("unknown profile: {}", profile_id)))?;

        log::info!("Connecting to '{}' ({})", profile.name, profile.address_label());
        let connection = self.driver.connect(&profile)?;
        let shared: SharedConnection = Arc::new(Mutex::new(connection));
        connections.insert(profile_id, shared.clone());
        Ok(shared)
    }

    /// Runs a closure against a live connection, for metadata reads that need
    /// the trait object directly.
    pub fn with_connection<R>(
        &self,
        profile_id: Uuid,
        f: impl FnOnce(&dyn Connection) -> Result<R, DbError>,
    ) -> Result<R, DbError> {
        let shared = self.connection(profile_id)?;
        let guard = mutex_lock(&shared);
        f(guard.as_ref())
    }

    /// Executes one statement against the profile's connection, optionally
    /// switching the database context first.
    pub fn execute(
        &self,
        profile_id: Uuid,
        database: Option<&str>,
        sql: &str,
    ) -> Result<QueryResult, DbError> {
        let shared = self.connection(profile_id)?;
        let req = QueryRequest::new(sql).with_database(database.map(str::to_string));

        log::debug!("Executing on {}: {}", profile_id, sql);
        mutex_lock(&shared).execute(&req)
    }

    /// Runs the editor query against the current query target and records it
    /// in history.
    pub fn run_query(&self, sql: &str) -> Result<QueryResult, DbError> {
        let target = self
            .query_target()
            .ok_or_else(|| DbError::QueryFailed("no connection selected for query".to_string()))?;

        let started = Instant::now();
        let result = self.execute(target.profile_id, target.database.as_deref(), sql)?;
        let elapsed = started.elapsed();

        self.record_history(HistoryEntry::new(
            sql.to_string(),
            target.database.clone(),
            self.profile(target.profile_id).map(|p| p.name),
            elapsed,
            (!result.columns.is_empty()).then(|| result.row_count()),
        ));

        Ok(result)
    }

    /// Applies a mutation as an ordered statement sequence.
    ///
    /// Stops at the first failure. The subtree under `refresh_root` is
    /// invalidated only if at least one statement was accepted by the server;
    /// a sequence that fails on its first statement leaves the cache exactly
    /// as it was.
    pub fn apply_mutation(
        &self,
        refresh_root: &NodePath,
        statements: &[String],
    ) -> Result<(), DbError> {
        let mut applied = 0usize;

        for sql in statements {
            match self.execute(refresh_root.profile_id(), refresh_root.database(), sql) {
                Ok(_) => applied += 1,
                Err(e) => {
                    log::error!(
                        "Mutation failed after {} of {} statements: {}",
                        applied,
                        statements.len(),
                        e
                    );
                    if applied > 0 {
                        self.cache.invalidate(refresh_root, true);
                        self.emit_refresh(Some(refresh_root));
                    }
                    return Err(e);
                }
            }
        }

        self.cache.invalidate(refresh_root, true);
        self.emit_refresh(Some(refresh_root));
        Ok(())
    }

    // --- child fetching -----------------------------------------------------

    /// Root of the tree: one node per saved profile. No server round-trip.
    pub fn root_nodes(&self) -> Vec<ObjectNode> {
        read_lock(&self.profiles)
            .iter()
            .map(ObjectNode::connection)
            .collect()
    }

    /// Children of a node, from cache when present, fetched otherwise.
    ///
    /// A fetch outstanding across an invalidation is discarded by the cache
    /// ticket; the freshly fetched children are still returned to the caller.
    pub fn children_of(&self, path: &NodePath) -> Result<Vec<ObjectNode>, DbError> {
        if let Some(children) = self.cache.children(path) {
            return Ok(children);
        }

        let ticket = self.cache.begin_fetch();
        let children = self.fetch_children(path)?;
        self.cache.put_children(path, ticket, children.clone());
        Ok(children)
    }

    fn fetch_children(&self, path: &NodePath) -> Result<Vec<ObjectNode>, DbError> {
        let profile_id = path.profile_id();

        match path {
            NodePath::Connection { .. } => {
                let databases =
                    self.with_connection(profile_id, |conn| metadata::list_databases(conn))?;
                let mut children: Vec<ObjectNode> = databases
                    .iter()
                    .map(|info| ObjectNode::database(profile_id, info))
                    .collect();
                children.push(ObjectNode::user_group(profile_id));
                Ok(children)
            }
            NodePath::Database { database, .. } => Ok([
                GroupKind::Tables,
                GroupKind::Views,
                GroupKind::Procedures,
                GroupKind::Functions,
                GroupKind::Triggers,
            ]
            .iter()
            .map(|group| ObjectNode::group(profile_id, database, *group))
            .collect()),
            NodePath::Group {
                database, group, ..
            } => self.fetch_group_children(profile_id, database, *group),
            NodePath::UserGroup { .. } => {
                let users = self.with_connection(profile_id, |conn| metadata::list_users(conn))?;
                Ok(users
                    .iter()
                    .map(|info| ObjectNode::user(profile_id, info))
                    .collect())
            }
            NodePath::Table { database, name, .. } => {
                let columns = self.table_columns(profile_id, database, name)?;
                Ok(columns
                    .iter()
                    .map(|info| ObjectNode::column(profile_id, database, name, info))
                    .collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn fetch_group_children(
        &self,
        profile_id: Uuid,
        database: &str,
        group: GroupKind,
    ) -> Result<Vec<ObjectNode>, DbError> {
        self.with_connection(profile_id, |conn| match group {
            GroupKind::Tables => Ok(metadata::list_tables(conn, database)?
                .iter()
                .map(|info| ObjectNode::table(profile_id, database, info))
                .collect()),
            GroupKind::Views => Ok(metadata::list_views(conn, database)?
                .iter()
                .map(|info| ObjectNode::view(profile_id, database, info))
                .collect()),
            GroupKind::Procedures => Ok(metadata::list_procedures(conn, database)?
                .iter()
                .map(|info| ObjectNode::procedure(profile_id, database, info))
                .collect()),
            GroupKind::Functions => Ok(metadata::list_functions(conn, database)?
                .iter()
                .map(|info| ObjectNode::function(profile_id, database, info))
                .collect()),
            GroupKind::Triggers => Ok(metadata::list_triggers(conn, database)?
                .iter()
                .map(|info| ObjectNode::trigger(profile_id, database, info))
                .collect()),
        })
    }

    /// Column metadata for a table, fetched fresh so DDL built from it never
    /// trusts a stale snapshot.
    pub fn table_columns(
        &self,
        profile_id: Uuid,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnInfo>, DbError> {
        self.with_connection(profile_id, |conn| {
            metadata::list_columns(conn, database, table)
        })
    }

    // --- refresh ------------------------------------------------------------

    pub fn subscribe_refresh(&self, listener: RefreshListener) {
        mutex_lock(&self.listeners).push(listener);
    }

    fn emit_refresh(&self, scope: Option<&NodePath>) {
        for listener in mutex_lock(&self.listeners).iter() {
            listener(scope);
        }
    }

    /// Full refresh: drops every cached entry and re-renders the tree.
    pub fn refresh_all(&self) {
        self.cache.clear();
        self.emit_refresh(None);
    }

    /// Drops the cached subtree under `path` so the next expansion re-fetches.
    pub fn refresh_subtree(&self, path: &NodePath) {
        self.cache.invalidate(path, true);
        self.emit_refresh(Some(path));
    }

    // --- query target -------------------------------------------------------

    pub fn set_query_target(&self, profile_id: Uuid, database: Option<String>) {
        *write_lock(&self.query_target) = Some(QueryTarget {
            profile_id,
            database,
        });
    }

    pub fn query_target(&self) -> Option<QueryTarget> {
        read_lock(&self.query_target).clone()
    }

    // --- history ------------------------------------------------------------

    fn record_history(&self, entry: HistoryEntry) {
        if let Some(history) = &self.history {
            let mut store = mutex_lock(history);
            store.add(entry);
            if let Err(e) = store.save() {
                log::warn!("Failed to persist query history: {}", e);
            }
        }
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        match &self.history {
            Some(history) => mutex_lock(history).entries().to_vec(),
            None => Vec::new(),
        }
    }

    // --- import -------------------------------------------------------------

    /// Executes a SQL script file against the scope's connection.
    ///
    /// Statements run in file order through [`Self::apply_mutation`], so a
    /// partially applied script invalidates the scope while a script that
    /// fails on its first statement leaves the cache untouched.
    pub fn import_sql(&self, scope: &NodePath, file: &Path) -> Result<usize, DbError> {
        let content = fs::read_to_string(file)?;
        let statements = split_sql_statements(&content);
        if statements.is_empty() {
            return Ok(0);
        }

        log::info!(
            "Importing {} statements from {}",
            statements.len(),
            file.display()
        );
        self.apply_mutation(scope, &statements)?;
        Ok(statements.len())
    }
}

/// Splits a SQL script into statements on trailing semicolons, skipping blank
/// lines and `--`/`#` comment lines. Semicolons inside string literals are
/// not handled; dumps produced by the exporter never contain multi-line
/// literals with trailing semicolons.
pub fn split_sql_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") || trimmed.starts_with('#') {
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);

        if trimmed.ends_with(';') {
            push_statement(&mut statements, &current);
            current.clear();
        }
    }

    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let stmt = raw.trim().trim_end_matches(';').trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn mutex_lock<T: ?Sized>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_comments_and_multiline_statements() {
        let script = "\
-- schema
CREATE TABLE t (
    id INT
);
# data
INSERT INTO t VALUES (1);
INSERT INTO t VALUES (2)";

        let statements = split_sql_statements(script);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE t"));
        assert!(statements[0].contains("id INT"));
        assert_eq!(statements[1], "INSERT INTO t VALUES (1)");
        assert_eq!(statements[2], "INSERT INTO t VALUES (2)");
    }

    #[test]
    fn split_of_blank_script_is_empty() {
        assert!(split_sql_statements("").is_empty());
        assert!(split_sql_statements("\n-- nothing here\n\n").is_empty());
    }
}
