use sqlarbor_core::{
    Connection, ConnectionProfile, DbDriver, DbError, DbKind, QueryRequest, QueryResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Scripted result for one SQL statement.
#[derive(Debug, Clone)]
pub enum FakeQueryOutcome {
    Success(QueryResult),
    Error(String),
}

impl FakeQueryOutcome {
    fn into_result(&self) -> Result<QueryResult, DbError> {
        match self {
            Self::Success(result) => Ok(result.clone()),
            Self::Error(message) => Err(DbError::query_failed(message.clone())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDriverStats {
    pub executed_requests: Vec<QueryRequest>,
    pub close_calls: usize,
    pub connect_calls: usize,
}

#[derive(Default)]
struct FakeDriverState {
    query_outcomes: RwLock<HashMap<String, FakeQueryOutcome>>,
    default_outcome: RwLock<Option<FakeQueryOutcome>>,
    executed_requests: Mutex<Vec<QueryRequest>>,
    connect_error: RwLock<Option<String>>,
    ping_error: RwLock<Option<String>>,
    close_calls: AtomicUsize,
    connect_calls: AtomicUsize,
}

/// Deterministic in-memory driver: outcomes are keyed by exact SQL text, and
/// every executed request is recorded for assertions.
#[derive(Clone)]
pub struct FakeDriver {
    kind: DbKind,
    state: Arc<FakeDriverState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            kind: DbKind::MySQL,
            state: Arc::new(FakeDriverState::default()),
        }
    }

    pub fn with_query_result(self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.set_query_outcome(sql, FakeQueryOutcome::Success(result));
        self
    }

    pub fn with_query_error(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.set_query_outcome(sql, FakeQueryOutcome::Error(message.into()));
        self
    }

    pub fn with_default_result(self, result: QueryResult) -> Self {
        *rwlock_write(&self.state.default_outcome) = Some(FakeQueryOutcome::Success(result));
        self
    }

    pub fn with_connect_error(self, message: impl Into<String>) -> Self {
        *rwlock_write(&self.state.connect_error) = Some(message.into());
        self
    }

    pub fn with_ping_error(self, message: impl Into<String>) -> Self {
        *rwlock_write(&self.state.ping_error) = Some(message.into());
        self
    }

    /// Re-script an outcome after construction, e.g. to fail a statement the
    /// second time a test runs it.
    pub fn set_query_outcome(&self, sql: impl Into<String>, outcome: FakeQueryOutcome) {
        rwlock_write(&self.state.query_outcomes).insert(sql.into(), outcome);
    }

    pub fn clear_query_outcome(&self, sql: &str) {
        rwlock_write(&self.state.query_outcomes).remove(sql);
    }

    pub fn stats(&self) -> FakeDriverStats {
        FakeDriverStats {
            executed_requests: mutex_lock(&self.state.executed_requests).clone(),
            close_calls: self.state.close_calls.load(Ordering::Relaxed),
            connect_calls: self.state.connect_calls.load(Ordering::Relaxed),
        }
    }

    /// SQL texts executed so far, in order.
    pub fn executed_sql(&self) -> Vec<String> {
        mutex_lock(&self.state.executed_requests)
            .iter()
            .map(|req| req.sql.clone())
            .collect()
    }

    pub fn as_driver_arc(self) -> Arc<dyn DbDriver> {
        Arc::new(self)
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DbDriver for FakeDriver {
    fn kind(&self) -> DbKind {
        self.kind
    }

    fn connect_with_password(
        &self,
        profile: &ConnectionProfile,
        _password: Option<&str>,
    ) -> Result<Box<dyn Connection>, DbError> {
        if let Some(message) = rwlock_read(&self.state.connect_error).clone() {
            return Err(DbError::connection_failed(message));
        }

        self.state.connect_calls.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(FakeConnection {
            kind: self.kind,
            state: self.state.clone(),
            active_database: RwLock::new(profile.config.database.clone()),
        }))
    }

    fn test_connection(&self, _profile: &ConnectionProfile) -> Result<(), DbError> {
        if let Some(message) = rwlock_read(&self.state.connect_error).clone() {
            return Err(DbError::connection_failed(message));
        }
        Ok(())
    }
}

struct FakeConnection {
    kind: DbKind,
    state: Arc<FakeDriverState>,
    active_database: RwLock<Option<String>>,
}

impl Connection for FakeConnection {
    fn ping(&self) -> Result<(), DbError> {
        if let Some(message) = rwlock_read(&self.state.ping_error).clone() {
            return Err(DbError::connection_failed(message));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DbError> {
        self.state.close_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn execute(&self, req: &QueryRequest) -> Result<QueryResult, DbError> {
        mutex_lock(&self.state.executed_requests).push(req.clone());

        if let Some(database) = req.database.clone() {
            *rwlock_write(&self.active_database) = Some(database);
        }

        if let Some(outcome) = rwlock_read(&self.state.query_outcomes).get(&req.sql).cloned() {
            return outcome.into_result();
        }

        if let Some(outcome) = rwlock_read(&self.state.default_outcome).clone() {
            return outcome.into_result();
        }

        Ok(QueryResult::empty())
    }

    fn active_database(&self) -> Option<String> {
        rwlock_read(&self.active_database).clone()
    }

    fn set_active_database(&self, database: Option<&str>) -> Result<(), DbError> {
        *rwlock_write(&self.active_database) = database.map(str::to_string);
        Ok(())
    }

    fn kind(&self) -> DbKind {
        self.kind
    }
}

fn rwlock_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn rwlock_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn mutex_lock<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlarbor_core::DbConfig;

    #[test]
    fn execute_uses_configured_outcome_and_records_requests() {
        let driver = FakeDriver::new()
            .with_query_error("SELECT boom", "boom")
            .with_default_result(QueryResult::empty());

        let profile = ConnectionProfile::new("fake", DbConfig::default());
        let connection = driver.connect(&profile).expect("fake connect");

        assert!(connection.execute(&QueryRequest::new("SELECT 1")).is_ok());
        assert!(matches!(
            connection.execute(&QueryRequest::new("SELECT boom")),
            Err(DbError::QueryFailed(_))
        ));

        assert_eq!(driver.executed_sql(), vec!["SELECT 1", "SELECT boom"]);
    }

    #[test]
    fn request_database_switches_active_database() {
        let driver = FakeDriver::new();
        let profile = ConnectionProfile::new(
            "fake",
            DbConfig::default().with_database("shop"),
        );
        let connection = driver.connect(&profile).expect("fake connect");

        assert_eq!(connection.active_database().as_deref(), Some("shop"));

        let req = QueryRequest::new("SELECT 1").with_database(Some("crm".to_string()));
        connection.execute(&req).expect("query should execute");

        assert_eq!(connection.active_database().as_deref(), Some("crm"));
    }

    #[test]
    fn connect_error_blocks_connection() {
        let driver = FakeDriver::new().with_connect_error("server gone");
        let profile = ConnectionProfile::new("fake", DbConfig::default());

        assert!(matches!(
            driver.connect(&profile),
            Err(DbError::ConnectionFailed(_))
        ));
    }
}
