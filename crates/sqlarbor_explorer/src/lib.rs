//! Database object explorer for MySQL-family servers.
//!
//! Everything is host-agnostic: the embedding application implements
//! [`ExplorerHost`] for its prompts and editors, renders the tree through
//! [`TreeDataProvider`], and routes user actions through
//! [`CommandDispatcher`]. The [`ExplorerSession`] in the middle owns the
//! connections and a cache that only ever reflects confirmed server state.

pub mod dispatch;
pub mod export;
pub mod host;
pub mod node;
pub mod provider;
pub mod session;

pub use dispatch::{CommandDispatcher, CommandId, DispatchOutcome};
pub use host::{Confirmation, ExplorerHost, FilePurpose};
pub use node::ObjectNode;
pub use provider::{Collapsible, IconKind, TreeDataProvider, TreeItem};
pub use session::{
    split_sql_statements, ExplorerSession, QueryTarget, RefreshListener, SharedConnection,
};
