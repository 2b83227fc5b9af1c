use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported server flavors. Both speak the MySQL wire protocol; the
/// distinction only matters for display and a few dialect corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DbKind {
    #[default]
    MySQL,
    MariaDB,
}

impl DbKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DbKind::MySQL => "MySQL",
            DbKind::MariaDB => "MariaDB",
        }
    }
}

/// Server connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,

    /// Default database selected after connecting. `None` means the user
    /// browses the whole server and picks databases from the tree.
    pub database: Option<String>,
}

impl DbConfig {
    pub fn new(host: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new("localhost", 3306, "root")
    }
}

/// A saved connection profile.
///
/// Passwords are never part of the profile; the host supplies credentials
/// when the driver actually connects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub kind: DbKind,
    pub config: DbConfig,
}

impl ConnectionProfile {
    pub fn new(name: impl Into<String>, config: DbConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: DbKind::MySQL,
            config,
        }
    }

    pub fn with_kind(mut self, kind: DbKind) -> Self {
        self.kind = kind;
        self
    }

    /// Label shown next to the connection node, e.g. `root@localhost:3306`.
    pub fn address_label(&self) -> String {
        format!(
            "{}@{}:{}",
            self.config.user, self.config.host, self.config.port
        )
    }
}
