//! Pull-based tree contract for the host's tree view.
//!
//! The host asks for children on demand and renders the [`TreeItem`] this
//! provider derives per node; it learns about data changes through the
//! session's refresh events, scoped to the smallest changed subtree.

use crate::node::ObjectNode;
use crate::session::{ExplorerSession, RefreshListener};
use sqlarbor_core::{DbError, ExpandState, NodeKind, NodePath};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Server,
    Database,
    Folder,
    Table,
    Column,
    View,
    Procedure,
    Function,
    Trigger,
    User,
}

impl IconKind {
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Connection => IconKind::Server,
            NodeKind::Database => IconKind::Database,
            NodeKind::TableGroup
            | NodeKind::ViewGroup
            | NodeKind::ProcedureGroup
            | NodeKind::FunctionGroup
            | NodeKind::TriggerGroup
            | NodeKind::UserGroup => IconKind::Folder,
            NodeKind::Table => IconKind::Table,
            NodeKind::Column => IconKind::Column,
            NodeKind::View => IconKind::View,
            NodeKind::Procedure => IconKind::Procedure,
            NodeKind::Function => IconKind::Function,
            NodeKind::Trigger => IconKind::Trigger,
            NodeKind::User => IconKind::User,
        }
    }
}

/// Whether and how a tree row can expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapsible {
    None,
    Collapsed,
    Expanded,
}

/// Render-ready description of one tree row.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeItem {
    pub path: NodePath,
    pub label: String,
    pub description: Option<String>,
    pub icon: IconKind,
    pub collapsible: Collapsible,
}

pub struct TreeDataProvider {
    session: Arc<ExplorerSession>,
}

impl TreeDataProvider {
    pub fn new(session: Arc<ExplorerSession>) -> Self {
        Self { session }
    }

    /// Children of a node; `None` asks for the tree roots. Errors are
    /// returned so the host can render an error placeholder for just that
    /// node while its siblings stay usable.
    pub fn children(&self, parent: Option<&NodePath>) -> Result<Vec<ObjectNode>, DbError> {
        match parent {
            None => Ok(self.session.root_nodes()),
            Some(path) => self.session.children_of(path),
        }
    }

    /// Render state for one node. Expandable nodes reopen in the state the
    /// host last reported for them.
    pub fn tree_item(&self, node: &ObjectNode) -> TreeItem {
        let kind = node.kind();
        let collapsible = if kind.is_leaf() {
            Collapsible::None
        } else {
            match self.session.cache().expand_state(&node.path) {
                Some(ExpandState::Expanded) => Collapsible::Expanded,
                _ => Collapsible::Collapsed,
            }
        };

        TreeItem {
            path: node.path.clone(),
            label: node.label.clone(),
            description: node.detail.clone(),
            icon: IconKind::for_kind(kind),
            collapsible,
        }
    }

    pub fn note_expanded(&self, path: &NodePath) {
        self.session
            .cache()
            .store_expand_state(path, ExpandState::Expanded);
    }

    pub fn note_collapsed(&self, path: &NodePath) {
        self.session
            .cache()
            .store_expand_state(path, ExpandState::Collapsed);
    }

    /// Host-initiated refresh; `None` reloads everything.
    pub fn refresh(&self, scope: Option<&NodePath>) {
        match scope {
            None => self.session.refresh_all(),
            Some(path) => self.session.refresh_subtree(path),
        }
    }

    pub fn subscribe(&self, listener: RefreshListener) {
        self.session.subscribe_refresh(listener);
    }
}
