use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which kind of database-scoped group container a `NodePath::Group` names.
///
/// User accounts are server-scoped, so they get their own `UserGroup` path
/// variant directly under the connection instead of a `GroupKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Tables,
    Views,
    Procedures,
    Functions,
    Triggers,
}

impl GroupKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            GroupKind::Tables => "Tables",
            GroupKind::Views => "Views",
            GroupKind::Procedures => "Procedures",
            GroupKind::Functions => "Functions",
            GroupKind::Triggers => "Triggers",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            GroupKind::Tables => "tables",
            GroupKind::Views => "views",
            GroupKind::Procedures => "procedures",
            GroupKind::Functions => "functions",
            GroupKind::Triggers => "triggers",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "tables" => Some(GroupKind::Tables),
            "views" => Some(GroupKind::Views),
            "procedures" => Some(GroupKind::Procedures),
            "functions" => Some(GroupKind::Functions),
            "triggers" => Some(GroupKind::Triggers),
            _ => None,
        }
    }
}

/// Typed identity of a node in the explorer tree.
///
/// Every node is located by its connection profile and the chain of ancestor
/// names down to itself. `NodePath` replaces fragile string concatenation with
/// a typed enum that can be constructed, matched, and round-tripped via
/// `Display`/`FromStr`.
///
/// Encoding uses pipe (`|`) as the separator since it cannot appear in MySQL
/// identifiers, unlike underscore which is common in table and schema names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    Connection {
        profile_id: Uuid,
    },
    Database {
        profile_id: Uuid,
        database: String,
    },
    Group {
        profile_id: Uuid,
        database: String,
        group: GroupKind,
    },
    Table {
        profile_id: Uuid,
        database: String,
        name: String,
    },
    Column {
        profile_id: Uuid,
        database: String,
        table: String,
        name: String,
    },
    View {
        profile_id: Uuid,
        database: String,
        name: String,
    },
    Procedure {
        profile_id: Uuid,
        database: String,
        name: String,
    },
    Function {
        profile_id: Uuid,
        database: String,
        name: String,
    },
    Trigger {
        profile_id: Uuid,
        database: String,
        name: String,
    },
    UserGroup {
        profile_id: Uuid,
    },
    User {
        profile_id: Uuid,
        name: String,
        host: String,
    },
}

/// Simple kind enum for cheap matching without data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Connection,
    Database,
    TableGroup,
    ViewGroup,
    ProcedureGroup,
    FunctionGroup,
    TriggerGroup,
    UserGroup,
    Table,
    Column,
    View,
    Procedure,
    Function,
    Trigger,
    User,
}

impl NodeKind {
    /// All kinds, used by the dispatcher tests to probe every mismatch.
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Connection,
        NodeKind::Database,
        NodeKind::TableGroup,
        NodeKind::ViewGroup,
        NodeKind::ProcedureGroup,
        NodeKind::FunctionGroup,
        NodeKind::TriggerGroup,
        NodeKind::UserGroup,
        NodeKind::Table,
        NodeKind::Column,
        NodeKind::View,
        NodeKind::Procedure,
        NodeKind::Function,
        NodeKind::Trigger,
        NodeKind::User,
    ];

    /// Columns are the only true leaves; everything else can expand.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Column
                | NodeKind::View
                | NodeKind::Procedure
                | NodeKind::Function
                | NodeKind::Trigger
                | NodeKind::User
        )
    }
}

impl NodePath {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Connection { .. } => NodeKind::Connection,
            Self::Database { .. } => NodeKind::Database,
            Self::Group { group, .. } => match group {
                GroupKind::Tables => NodeKind::TableGroup,
                GroupKind::Views => NodeKind::ViewGroup,
                GroupKind::Procedures => NodeKind::ProcedureGroup,
                GroupKind::Functions => NodeKind::FunctionGroup,
                GroupKind::Triggers => NodeKind::TriggerGroup,
            },
            Self::UserGroup { .. } => NodeKind::UserGroup,
            Self::Table { .. } => NodeKind::Table,
            Self::Column { .. } => NodeKind::Column,
            Self::View { .. } => NodeKind::View,
            Self::Procedure { .. } => NodeKind::Procedure,
            Self::Function { .. } => NodeKind::Function,
            Self::Trigger { .. } => NodeKind::Trigger,
            Self::User { .. } => NodeKind::User,
        }
    }

    pub fn profile_id(&self) -> Uuid {
        match self {
            Self::Connection { profile_id }
            | Self::Database { profile_id, .. }
            | Self::Group { profile_id, .. }
            | Self::Table { profile_id, .. }
            | Self::Column { profile_id, .. }
            | Self::View { profile_id, .. }
            | Self::Procedure { profile_id, .. }
            | Self::Function { profile_id, .. }
            | Self::Trigger { profile_id, .. }
            | Self::UserGroup { profile_id }
            | Self::User { profile_id, .. } => *profile_id,
        }
    }

    /// The database this path lives in, if any. Connections and user accounts
    /// are server-scoped.
    pub fn database(&self) -> Option<&str> {
        match self {
            Self::Connection { .. } | Self::UserGroup { .. } | Self::User { .. } => None,
            Self::Database { database, .. }
            | Self::Group { database, .. }
            | Self::Table { database, .. }
            | Self::Column { database, .. }
            | Self::View { database, .. }
            | Self::Procedure { database, .. }
            | Self::Function { database, .. }
            | Self::Trigger { database, .. } => Some(database),
        }
    }

    /// The name of the entity itself (last path segment).
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            Self::Connection { .. } => None,
            Self::Database { database, .. } => Some(database),
            Self::Group { group, .. } => Some(group.display_name()),
            Self::UserGroup { .. } => Some("Users"),
            Self::Table { name, .. }
            | Self::Column { name, .. }
            | Self::View { name, .. }
            | Self::Procedure { name, .. }
            | Self::Function { name, .. }
            | Self::Trigger { name, .. }
            | Self::User { name, .. } => Some(name),
        }
    }

    /// Reconstructs the parent path, or `None` for connection roots.
    pub fn parent(&self) -> Option<NodePath> {
        match self {
            Self::Connection { .. } => None,
            Self::Database { profile_id, .. } => Some(Self::Connection {
                profile_id: *profile_id,
            }),
            Self::Group {
                profile_id,
                database,
                ..
            } => Some(Self::Database {
                profile_id: *profile_id,
                database: database.clone(),
            }),
            Self::Table {
                profile_id,
                database,
                ..
            } => Some(Self::Group {
                profile_id: *profile_id,
                database: database.clone(),
                group: GroupKind::Tables,
            }),
            Self::Column {
                profile_id,
                database,
                table,
                ..
            } => Some(Self::Table {
                profile_id: *profile_id,
                database: database.clone(),
                name: table.clone(),
            }),
            Self::View {
                profile_id,
                database,
                ..
            } => Some(Self::Group {
                profile_id: *profile_id,
                database: database.clone(),
                group: GroupKind::Views,
            }),
            Self::Procedure {
                profile_id,
                database,
                ..
            } => Some(Self::Group {
                profile_id: *profile_id,
                database: database.clone(),
                group: GroupKind::Procedures,
            }),
            Self::Function {
                profile_id,
                database,
                ..
            } => Some(Self::Group {
                profile_id: *profile_id,
                database: database.clone(),
                group: GroupKind::Functions,
            }),
            Self::Trigger {
                profile_id,
                database,
                ..
            } => Some(Self::Group {
                profile_id: *profile_id,
                database: database.clone(),
                group: GroupKind::Triggers,
            }),
            Self::UserGroup { profile_id } => Some(Self::Connection {
                profile_id: *profile_id,
            }),
            Self::User { profile_id, .. } => Some(Self::UserGroup {
                profile_id: *profile_id,
            }),
        }
    }

    /// Prefix test used for subtree invalidation: is `self` equal to
    /// `ancestor` or located anywhere below it?
    pub fn is_self_or_descendant_of(&self, ancestor: &NodePath) -> bool {
        if self == ancestor {
            return true;
        }

        let mut current = self.parent();
        while let Some(path) = current {
            if &path == ancestor {
                return true;
            }
            current = path.parent();
        }

        false
    }
}

// Prefix tags used in the pipe-delimited encoding.
const P_CONNECTION: &str = "C";
const P_DATABASE: &str = "DB";
const P_GROUP: &str = "G";
const P_TABLE: &str = "T";
const P_COLUMN: &str = "CL";
const P_VIEW: &str = "V";
const P_PROCEDURE: &str = "PR";
const P_FUNCTION: &str = "FN";
const P_TRIGGER: &str = "TG";
const P_USER_GROUP: &str = "UG";
const P_USER: &str = "U";

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection { profile_id } => write!(f, "{}|{}", P_CONNECTION, profile_id),
            Self::Database {
                profile_id,
                database,
            } => write!(f, "{}|{}|{}", P_DATABASE, profile_id, database),
            Self::Group {
                profile_id,
                database,
                group,
            } => write!(f, "{}|{}|{}|{}", P_GROUP, profile_id, database, group.tag()),
            Self::Table {
                profile_id,
                database,
                name,
            } => write!(f, "{}|{}|{}|{}", P_TABLE, profile_id, database, name),
            Self::Column {
                profile_id,
                database,
                table,
                name,
            } => write!(
                f,
                "{}|{}|{}|{}|{}",
                P_COLUMN, profile_id, database, table, name
            ),
            Self::View {
                profile_id,
                database,
                name,
            } => write!(f, "{}|{}|{}|{}", P_VIEW, profile_id, database, name),
            Self::Procedure {
                profile_id,
                database,
                name,
            } => write!(f, "{}|{}|{}|{}", P_PROCEDURE, profile_id, database, name),
            Self::Function {
                profile_id,
                database,
                name,
            } => write!(f, "{}|{}|{}|{}", P_FUNCTION, profile_id, database, name),
            Self::Trigger {
                profile_id,
                database,
                name,
            } => write!(f, "{}|{}|{}|{}", P_TRIGGER, profile_id, database, name),
            Self::UserGroup { profile_id } => write!(f, "{}|{}", P_USER_GROUP, profile_id),
            Self::User {
                profile_id,
                name,
                host,
            } => write!(f, "{}|{}|{}|{}", P_USER, profile_id, name, host),
        }
    }
}

/// Error returned when parsing a `NodePath` from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodePathError {
    pub input: String,
}

impl fmt::Display for ParseNodePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid node path: {:?}", self.input)
    }
}

impl std::error::Error for ParseNodePathError {}

impl FromStr for NodePath {
    type Err = ParseNodePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNodePathError {
            input: s.to_string(),
        };

        let parts: Vec<&str> = s.splitn(5, '|').collect();
        if parts.len() < 2 {
            return Err(err());
        }

        let profile_id = Uuid::parse_str(parts[1]).map_err(|_| err())?;
        let field = |idx: usize| parts.get(idx).map(|p| p.to_string()).ok_or_else(err);

        match parts[0] {
            P_CONNECTION => Ok(Self::Connection { profile_id }),
            P_DATABASE => Ok(Self::Database {
                profile_id,
                database: field(2)?,
            }),
            P_GROUP => {
                let database = field(2)?;
                let group = GroupKind::from_tag(parts.get(3).ok_or_else(err)?).ok_or_else(err)?;
                Ok(Self::Group {
                    profile_id,
                    database,
                    group,
                })
            }
            P_TABLE => Ok(Self::Table {
                profile_id,
                database: field(2)?,
                name: field(3)?,
            }),
            P_COLUMN => Ok(Self::Column {
                profile_id,
                database: field(2)?,
                table: field(3)?,
                name: field(4)?,
            }),
            P_VIEW => Ok(Self::View {
                profile_id,
                database: field(2)?,
                name: field(3)?,
            }),
            P_PROCEDURE => Ok(Self::Procedure {
                profile_id,
                database: field(2)?,
                name: field(3)?,
            }),
            P_FUNCTION => Ok(Self::Function {
                profile_id,
                database: field(2)?,
                name: field(3)?,
            }),
            P_TRIGGER => Ok(Self::Trigger {
                profile_id,
                database: field(2)?,
                name: field(3)?,
            }),
            P_USER_GROUP => Ok(Self::UserGroup { profile_id }),
            P_USER => Ok(Self::User {
                profile_id,
                name: field(2)?,
                host: field(3)?,
            }),
            _ => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid() -> Uuid {
        Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap()
    }

    fn roundtrip(path: NodePath) {
        let s = path.to_string();
        let parsed: NodePath = s.parse().unwrap_or_else(|e| {
            panic!("Failed to parse {:?}: {}", s, e);
        });
        assert_eq!(path, parsed, "Roundtrip failed for: {}", s);
    }

    #[test]
    fn roundtrip_all_variants() {
        roundtrip(NodePath::Connection { profile_id: pid() });
        roundtrip(NodePath::Database {
            profile_id: pid(),
            database: "shop".into(),
        });
        roundtrip(NodePath::Group {
            profile_id: pid(),
            database: "shop".into(),
            group: GroupKind::Tables,
        });
        roundtrip(NodePath::Table {
            profile_id: pid(),
            database: "shop".into(),
            name: "orders".into(),
        });
        roundtrip(NodePath::Column {
            profile_id: pid(),
            database: "shop".into(),
            table: "orders".into(),
            name: "id".into(),
        });
        roundtrip(NodePath::View {
            profile_id: pid(),
            database: "shop".into(),
            name: "open_orders".into(),
        });
        roundtrip(NodePath::Procedure {
            profile_id: pid(),
            database: "shop".into(),
            name: "close_day".into(),
        });
        roundtrip(NodePath::Function {
            profile_id: pid(),
            database: "shop".into(),
            name: "total_of".into(),
        });
        roundtrip(NodePath::Trigger {
            profile_id: pid(),
            database: "shop".into(),
            name: "orders_audit".into(),
        });
        roundtrip(NodePath::UserGroup { profile_id: pid() });
        roundtrip(NodePath::User {
            profile_id: pid(),
            name: "app".into(),
            host: "%".into(),
        });
    }

    #[test]
    fn invalid_parse_is_rejected() {
        assert!("".parse::<NodePath>().is_err());
        assert!("X|foo".parse::<NodePath>().is_err());
        assert!("T|not-a-uuid|shop|orders".parse::<NodePath>().is_err());
        assert!("T|12345678-1234-1234-1234-123456789abc"
            .parse::<NodePath>()
            .is_err());
        assert!("G|12345678-1234-1234-1234-123456789abc|shop|widgets"
            .parse::<NodePath>()
            .is_err());
    }

    #[test]
    fn parent_chain_reaches_connection() {
        let column = NodePath::Column {
            profile_id: pid(),
            database: "shop".into(),
            table: "orders".into(),
            name: "id".into(),
        };

        let table = column.parent().unwrap();
        assert_eq!(table.kind(), NodeKind::Table);

        let group = table.parent().unwrap();
        assert_eq!(group.kind(), NodeKind::TableGroup);

        let database = group.parent().unwrap();
        assert_eq!(database.kind(), NodeKind::Database);

        let connection = database.parent().unwrap();
        assert_eq!(connection.kind(), NodeKind::Connection);
        assert!(connection.parent().is_none());
    }

    #[test]
    fn descendant_test_follows_ancestry_not_names() {
        let database = NodePath::Database {
            profile_id: pid(),
            database: "shop".into(),
        };
        let column = NodePath::Column {
            profile_id: pid(),
            database: "shop".into(),
            table: "orders".into(),
            name: "id".into(),
        };
        let other_db_table = NodePath::Table {
            profile_id: pid(),
            database: "crm".into(),
            name: "orders".into(),
        };

        assert!(column.is_self_or_descendant_of(&database));
        assert!(database.is_self_or_descendant_of(&database));
        assert!(!other_db_table.is_self_or_descendant_of(&database));
        assert!(!database.is_self_or_descendant_of(&column));
    }

    #[test]
    fn user_parent_is_server_scoped_user_group() {
        let user = NodePath::User {
            profile_id: pid(),
            name: "app".into(),
            host: "%".into(),
        };
        let group = user.parent().unwrap();
        assert_eq!(group.kind(), NodeKind::UserGroup);
        assert!(group.database().is_none());
        assert_eq!(group.parent().unwrap().kind(), NodeKind::Connection);
    }
}
