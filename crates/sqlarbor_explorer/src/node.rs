//! Tree node data.
//!
//! An [`ObjectNode`] is what a child fetch produces and what the cache
//! stores: a typed path plus the label text the host renders. All behavior
//! lives in the session and dispatcher; nodes are plain data.

use sqlarbor_core::{
    ColumnInfo, ConnectionProfile, DatabaseInfo, FunctionInfo, GroupKind, NodeKind, NodePath,
    ProcedureInfo, TableInfo, TriggerInfo, UserInfo, ViewInfo,
};
use uuid::Uuid;

/// One node of the explorer tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub path: NodePath,

    /// Primary display text.
    pub label: String,

    /// Secondary text shown dimmed next to the label: address for
    /// connections, column type, trigger table, account host.
    pub detail: Option<String>,
}

impl ObjectNode {
    pub fn connection(profile: &ConnectionProfile) -> Self {
        Self {
            path: NodePath::Connection {
                profile_id: profile.id,
            },
            label: profile.name.clone(),
            detail: Some(profile.address_label()),
        }
    }

    pub fn database(profile_id: Uuid, info: &DatabaseInfo) -> Self {
        Self {
            path: NodePath::Database {
                profile_id,
                database: info.name.clone(),
            },
            label: info.name.clone(),
            detail: info.is_current.then(|| "active".to_string()),
        }
    }

    pub fn group(profile_id: Uuid, database: &str, group: GroupKind) -> Self {
        Self {
            path: NodePath::Group {
                profile_id,
                database: database.to_string(),
                group,
            },
            label: group.display_name().to_string(),
            detail: None,
        }
    }

    pub fn user_group(profile_id: Uuid) -> Self {
        Self {
            path: NodePath::UserGroup { profile_id },
            label: "Users".to_string(),
            detail: None,
        }
    }

    pub fn table(profile_id: Uuid, database: &str, info: &TableInfo) -> Self {
        Self {
            path: NodePath::Table {
                profile_id,
                database: database.to_string(),
                name: info.name.clone(),
            },
            label: info.name.clone(),
            detail: info.comment.clone(),
        }
    }

    pub fn column(profile_id: Uuid, database: &str, table: &str, info: &ColumnInfo) -> Self {
        let detail = if info.is_primary_key {
            format!("{} (PK)", info.type_name)
        } else {
            info.type_name.clone()
        };

        Self {
            path: NodePath::Column {
                profile_id,
                database: database.to_string(),
                table: table.to_string(),
                name: info.name.clone(),
            },
            label: info.name.clone(),
            detail: Some(detail),
        }
    }

    pub fn view(profile_id: Uuid, database: &str, info: &ViewInfo) -> Self {
        Self {
            path: NodePath::View {
                profile_id,
                database: database.to_string(),
                name: info.name.clone(),
            },
            label: info.name.clone(),
            detail: None,
        }
    }

    pub fn procedure(profile_id: Uuid, database: &str, info: &ProcedureInfo) -> Self {
        Self {
            path: NodePath::Procedure {
                profile_id,
                database: database.to_string(),
                name: info.name.clone(),
            },
            label: info.name.clone(),
            detail: None,
        }
    }

    pub fn function(profile_id: Uuid, database: &str, info: &FunctionInfo) -> Self {
        Self {
            path: NodePath::Function {
                profile_id,
                database: database.to_string(),
                name: info.name.clone(),
            },
            label: info.name.clone(),
            detail: None,
        }
    }

    pub fn trigger(profile_id: Uuid, database: &str, info: &TriggerInfo) -> Self {
        Self {
            path: NodePath::Trigger {
                profile_id,
                database: database.to_string(),
                name: info.name.clone(),
            },
            label: info.name.clone(),
            detail: info.table.clone(),
        }
    }

    pub fn user(profile_id: Uuid, info: &UserInfo) -> Self {
        Self {
            path: NodePath::User {
                profile_id,
                name: info.name.clone(),
                host: info.host.clone(),
            },
            label: info.name.clone(),
            detail: Some(info.host.clone()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.path.kind()
    }

    /// Name of the underlying entity; falls back to the label for nodes
    /// without one (connections).
    pub fn name(&self) -> &str {
        self.path.entity_name().unwrap_or(&self.label)
    }
}
