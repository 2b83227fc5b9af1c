mod error;
mod history;
pub mod metadata;
mod node_cache;
mod node_path;
mod profile;
mod query;
mod schema;
pub mod sql_generation;
mod store;
mod traits;
mod value;

pub use error::DbError;
pub use history::{HistoryEntry, HistoryStore};
pub use node_cache::{CacheEntry, ExpandState, FetchTicket, NodeCache};
pub use node_path::{GroupKind, NodeKind, NodePath, ParseNodePathError};
pub use profile::{ConnectionProfile, DbConfig, DbKind};
pub use query::{ColumnMeta, QueryRequest, QueryResult, Row};
pub use schema::{
    ColumnInfo, DatabaseInfo, FunctionInfo, ProcedureInfo, TableInfo, TriggerInfo, UserInfo,
    ViewInfo,
};
pub use store::ProfileStore;
pub use traits::{Connection, DbDriver};
pub use value::Value;

pub use chrono;
