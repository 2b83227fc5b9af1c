use crate::{ConnectionProfile, DbError, DbKind, QueryRequest, QueryResult};

/// Factory for creating database connections.
///
/// The explorer session holds one driver and connects lazily when a
/// connection node is first expanded.
pub trait DbDriver: Send + Sync {
    /// Returns the server flavor this driver handles.
    fn kind(&self) -> DbKind;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Create a connection without providing a password.
    ///
    /// Delegates to `connect_with_password(profile, None)`.
    fn connect(&self, profile: &ConnectionProfile) -> Result<Box<dyn Connection>, DbError> {
        self.connect_with_password(profile, None)
    }

    /// Create a connection with an optional password.
    ///
    /// The password is provided separately from the profile so credentials
    /// never end up in persisted config.
    fn connect_with_password(
        &self,
        profile: &ConnectionProfile,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection>, DbError>;

    /// Test if a connection can be established without keeping it open.
    fn test_connection(&self, profile: &ConnectionProfile) -> Result<(), DbError>;
}

/// Active database connection.
///
/// The explorer interacts exclusively through this trait and only interprets
/// success or failure of each statement, never transport details.
/// Implementations must be thread-safe (`Send + Sync`) so sibling child
/// fetches can run concurrently.
pub trait Connection: Send + Sync {
    /// Check if the connection is still alive.
    ///
    /// Typically sends a lightweight query like `SELECT 1`.
    fn ping(&self) -> Result<(), DbError>;

    /// Close the connection and release resources.
    fn close(&mut self) -> Result<(), DbError>;

    /// Execute a SQL statement synchronously.
    fn execute(&self, req: &QueryRequest) -> Result<QueryResult, DbError>;

    /// The database `USE`d by the connection right now, if any.
    fn active_database(&self) -> Option<String>;

    /// Switch the connection's current database.
    fn set_active_database(&self, database: Option<&str>) -> Result<(), DbError>;

    /// Returns the server flavor for this connection.
    fn kind(&self) -> DbKind;
}
