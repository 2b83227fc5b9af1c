//! Command dispatch.
//!
//! Every user action arrives here as a [`CommandId`] plus the node it was
//! invoked on. Each command declares which node kinds it accepts; a mismatch
//! is logged and ignored so a stale context menu can never panic or run DDL
//! against the wrong object. Destructive commands confirm first, and a
//! dismissed prompt cancels the command without touching the server.

use crate::export;
use crate::host::{Confirmation, ExplorerHost, FilePurpose};
use crate::node::ObjectNode;
use crate::session::ExplorerSession;
use sqlarbor_core::{metadata, sql_generation as sql, DbError, GroupKind, NodeKind, NodePath};
use std::sync::Arc;

/// Every command the explorer exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Refresh,
    AddConnection,
    DeleteConnection,
    NewQuery,
    RunQuery,
    OpenHistory,

    AddDatabase,
    DeleteDatabase,
    SetActiveDatabase,
    ImportData,
    ExportData,

    RenameTable,
    DropTable,
    TruncateTable,
    ShowTableSource,
    SelectTemplate,
    InsertTemplate,
    UpdateTemplate,
    DeleteTemplate,
    CopyInsertStatement,
    CopyUpdateStatement,
    AddColumnTemplate,
    IndexTemplate,

    RenameColumn,
    UpdateColumnTemplate,
    DropColumn,

    CreateTableTemplate,
    CreateViewTemplate,
    CreateProcedureTemplate,
    CreateFunctionTemplate,
    CreateTriggerTemplate,
    CreateUserTemplate,

    ShowViewSource,
    ShowProcedureSource,
    ShowFunctionSource,
    ShowTriggerSource,

    DropView,
    DropProcedure,
    DropFunction,
    DropTrigger,
    DropUser,
    GrantTemplate,
    ChangePassword,

    CopyName,
}

impl CommandId {
    pub const ALL: [CommandId; 44] = [
        CommandId::Refresh,
        CommandId::AddConnection,
        CommandId::DeleteConnection,
        CommandId::NewQuery,
        CommandId::RunQuery,
        CommandId::OpenHistory,
        CommandId::AddDatabase,
        CommandId::DeleteDatabase,
        CommandId::SetActiveDatabase,
        CommandId::ImportData,
        CommandId::ExportData,
        CommandId::RenameTable,
        CommandId::DropTable,
        CommandId::TruncateTable,
        CommandId::ShowTableSource,
        CommandId::SelectTemplate,
        CommandId::InsertTemplate,
        CommandId::UpdateTemplate,
        CommandId::DeleteTemplate,
        CommandId::CopyInsertStatement,
        CommandId::CopyUpdateStatement,
        CommandId::AddColumnTemplate,
        CommandId::IndexTemplate,
        CommandId::RenameColumn,
        CommandId::UpdateColumnTemplate,
        CommandId::DropColumn,
        CommandId::CreateTableTemplate,
        CommandId::CreateViewTemplate,
        CommandId::CreateProcedureTemplate,
        CommandId::CreateFunctionTemplate,
        CommandId::CreateTriggerTemplate,
        CommandId::CreateUserTemplate,
        CommandId::ShowViewSource,
        CommandId::ShowProcedureSource,
        CommandId::ShowFunctionSource,
        CommandId::ShowTriggerSource,
        CommandId::DropView,
        CommandId::DropProcedure,
        CommandId::DropFunction,
        CommandId::DropTrigger,
        CommandId::DropUser,
        CommandId::GrantTemplate,
        CommandId::ChangePassword,
        CommandId::CopyName,
    ];

    /// Node kinds this command accepts. Empty means the command runs without
    /// a target node (and ignores any node it is handed).
    pub fn expected_kinds(&self) -> &'static [NodeKind] {
        match self {
            CommandId::Refresh
            | CommandId::AddConnection
            | CommandId::RunQuery
            | CommandId::OpenHistory => &[],

            CommandId::NewQuery | CommandId::ImportData => {
                &[NodeKind::Connection, NodeKind::Database]
            }
            CommandId::ExportData => &[NodeKind::Database, NodeKind::Table],

            CommandId::DeleteConnection | CommandId::AddDatabase => &[NodeKind::Connection],
            CommandId::DeleteDatabase | CommandId::SetActiveDatabase => &[NodeKind::Database],

            CommandId::RenameTable
            | CommandId::DropTable
            | CommandId::TruncateTable
            | CommandId::ShowTableSource
            | CommandId::SelectTemplate
            | CommandId::InsertTemplate
            | CommandId::UpdateTemplate
            | CommandId::DeleteTemplate
            | CommandId::CopyInsertStatement
            | CommandId::CopyUpdateStatement
            | CommandId::AddColumnTemplate
            | CommandId::IndexTemplate => &[NodeKind::Table],

            CommandId::RenameColumn
            | CommandId::UpdateColumnTemplate
            | CommandId::DropColumn => &[NodeKind::Column],

            CommandId::CreateTableTemplate => &[NodeKind::TableGroup],
            CommandId::CreateViewTemplate => &[NodeKind::ViewGroup],
            CommandId::CreateProcedureTemplate => &[NodeKind::ProcedureGroup],
            CommandId::CreateFunctionTemplate => &[NodeKind::FunctionGroup],
            CommandId::CreateTriggerTemplate => &[NodeKind::TriggerGroup],
            CommandId::CreateUserTemplate => &[NodeKind::UserGroup],

            CommandId::ShowViewSource => &[NodeKind::View],
            CommandId::ShowProcedureSource => &[NodeKind::Procedure],
            CommandId::ShowFunctionSource => &[NodeKind::Function],
            CommandId::ShowTriggerSource => &[NodeKind::Trigger],

            CommandId::DropView => &[NodeKind::View],
            CommandId::DropProcedure => &[NodeKind::Procedure],
            CommandId::DropFunction => &[NodeKind::Function],
            CommandId::DropTrigger => &[NodeKind::Trigger],
            CommandId::DropUser | CommandId::GrantTemplate | CommandId::ChangePassword => {
                &[NodeKind::User]
            }

            CommandId::CopyName => &NodeKind::ALL,
        }
    }
}

/// How a dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command ran to completion.
    Done,
    /// The user dismissed a prompt or declined a confirmation.
    Cancelled,
    /// The node kind did not match the command; logged and ignored.
    WrongTarget,
    /// A statement or IO operation failed; the error was reported to the host.
    Failed,
}

enum Flow {
    Done,
    Cancelled,
}

pub struct CommandDispatcher {
    session: Arc<ExplorerSession>,
    host: Arc<dyn ExplorerHost>,
}

impl CommandDispatcher {
    pub fn new(session: Arc<ExplorerSession>, host: Arc<dyn ExplorerHost>) -> Self {
        Self { session, host }
    }

    pub fn session(&self) -> &Arc<ExplorerSession> {
        &self.session
    }

    /// Runs a command against a node. Never panics: kind mismatches are
    /// logged no-ops and errors are reported through the host.
    pub fn dispatch(&self, command: CommandId, node: Option<&ObjectNode>) -> DispatchOutcome {
        let expected = command.expected_kinds();
        if !expected.is_empty() {
            match node {
                Some(n) if expected.contains(&n.kind()) => {}
                Some(n) => {
                    log::warn!("Ignoring {:?} invoked on a {:?} node", command, n.kind());
                    return DispatchOutcome::WrongTarget;
                }
                None => {
                    log::warn!("Ignoring {:?} invoked without a target node", command);
                    return DispatchOutcome::WrongTarget;
                }
            }
        }

        match self.run(command, node) {
            Ok(Flow::Done) => DispatchOutcome::Done,
            Ok(Flow::Cancelled) => DispatchOutcome::Cancelled,
            Err(e) => {
                log::error!("{:?} failed: {}", command, e);
                self.host.notify_error(&e.to_string());
                DispatchOutcome::Failed
            }
        }
    }

    fn run(&self, command: CommandId, node: Option<&ObjectNode>) -> Result<Flow, DbError> {
        match command {
            CommandId::Refresh => {
                self.session.refresh_all();
                Ok(Flow::Done)
            }
            CommandId::AddConnection => match self.host.prompt_connection() {
                Some(profile) => {
                    let name = profile.name.clone();
                    self.session.add_profile(profile);
                    self.host.notify_info(&format!("Connection '{}' added", name));
                    Ok(Flow::Done)
                }
                None => Ok(Flow::Cancelled),
            },
            CommandId::DeleteConnection => {
                let node = required(node)?;
                if self.declined(&format!("Delete connection '{}'?", node.label)) {
                    return Ok(Flow::Cancelled);
                }
                self.session.remove_profile(node.path.profile_id())?;
                Ok(Flow::Done)
            }
            CommandId::NewQuery => {
                let node = required(node)?;
                self.session.set_query_target(
                    node.path.profile_id(),
                    node.path.database().map(str::to_string),
                );
                self.host.open_editor("");
                Ok(Flow::Done)
            }
            CommandId::RunQuery => self.run_editor_query(),
            CommandId::OpenHistory => {
                self.host.open_editor(&self.render_history());
                Ok(Flow::Done)
            }

            CommandId::AddDatabase => self.add_database(required(node)?),
            CommandId::DeleteDatabase => self.delete_database(required(node)?),
            CommandId::SetActiveDatabase => {
                let node = required(node)?;
                let database = node.path.database().map(str::to_string);
                self.session
                    .set_query_target(node.path.profile_id(), database.clone());
                self.host.notify_info(&format!(
                    "Active database: {}",
                    database.as_deref().unwrap_or("(none)")
                ));
                Ok(Flow::Done)
            }
            CommandId::ImportData => self.import_data(required(node)?),
            CommandId::ExportData => self.export_data(required(node)?),

            CommandId::RenameTable => self.rename_table(required(node)?),
            CommandId::DropTable => self.drop_table(required(node)?),
            CommandId::TruncateTable => self.truncate_table(required(node)?),
            CommandId::ShowTableSource
            | CommandId::ShowViewSource
            | CommandId::ShowProcedureSource
            | CommandId::ShowFunctionSource
            | CommandId::ShowTriggerSource => self.show_source(required(node)?),

            CommandId::SelectTemplate
            | CommandId::InsertTemplate
            | CommandId::UpdateTemplate
            | CommandId::DeleteTemplate
            | CommandId::AddColumnTemplate
            | CommandId::IndexTemplate => self.table_template(command, required(node)?),
            CommandId::CopyInsertStatement | CommandId::CopyUpdateStatement => {
                self.copy_statement(command, required(node)?)
            }

            CommandId::RenameColumn => self.rename_column(required(node)?),
            CommandId::UpdateColumnTemplate => self.update_column_template(required(node)?),
            CommandId::DropColumn => self.drop_column(required(node)?),

            CommandId::CreateTableTemplate
            | CommandId::CreateViewTemplate
            | CommandId::CreateProcedureTemplate
            | CommandId::CreateFunctionTemplate
            | CommandId::CreateTriggerTemplate => self.group_template(command, required(node)?),
            CommandId::CreateUserTemplate => {
                self.host.open_editor(&sql::create_user_template());
                Ok(Flow::Done)
            }

            CommandId::DropView
            | CommandId::DropProcedure
            | CommandId::DropFunction
            | CommandId::DropTrigger => self.drop_database_object(required(node)?),
            CommandId::DropUser => self.drop_user(required(node)?),
            CommandId::GrantTemplate | CommandId::ChangePassword => {
                self.user_template(command, required(node)?)
            }

            CommandId::CopyName => {
                let node = required(node)?;
                self.host.copy_text(node.name());
                Ok(Flow::Done)
            }
        }
    }

    // --- queries and history ------------------------------------------------

    fn run_editor_query(&self) -> Result<Flow, DbError> {
        let Some(sql_text) = self.host.active_editor_sql() else {
            self.host.notify_error("No active SQL editor");
            return Ok(Flow::Cancelled);
        };

        let result = self.session.run_query(&sql_text)?;
        self.host.show_results(&result);

        let summary = match result.affected_rows {
            Some(n) => format!("{} rows affected", n),
            None => format!(
                "{} rows, {} columns",
                result.row_count(),
                result.column_count()
            ),
        };
        self.host.notify_info(&summary);
        Ok(Flow::Done)
    }

    fn render_history(&self) -> String {
        let mut out = String::new();
        for entry in self.session.history_entries() {
            out.push_str(&format!(
                "-- {} [{}] {}ms\n{};\n\n",
                entry.formatted_timestamp(),
                entry.database.as_deref().unwrap_or("-"),
                entry.execution_time_ms,
                entry.sql
            ));
        }
        out
    }

    // --- database commands --------------------------------------------------

    fn add_database(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let Some(name) = self.host.prompt_input("New database name", None) else {
            return Ok(Flow::Cancelled);
        };
        sql::validate_identifier(&name)?;

        self.session
            .apply_mutation(&node.path, &[sql::create_database(name.trim())])?;
        Ok(Flow::Done)
    }

    fn delete_database(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Database {
            profile_id,
            database,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        if self.declined(&format!(
            "Drop database '{}'? This cannot be undone.",
            database
        )) {
            return Ok(Flow::Cancelled);
        }

        let refresh_root = NodePath::Connection {
            profile_id: *profile_id,
        };
        self.session
            .apply_mutation(&refresh_root, &[sql::drop_database(database)])?;
        Ok(Flow::Done)
    }

    fn import_data(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let Some(file) = self.host.pick_path(FilePurpose::ImportSql) else {
            return Ok(Flow::Cancelled);
        };

        let count = self.session.import_sql(&node.path, &file)?;
        self.host
            .notify_info(&format!("Imported {} statements", count));
        Ok(Flow::Done)
    }

    fn export_data(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let Some(dir) = self.host.pick_path(FilePurpose::ExportDirectory) else {
            return Ok(Flow::Cancelled);
        };

        let written = match &node.path {
            NodePath::Database {
                profile_id,
                database,
            } => export::export_database(&self.session, *profile_id, database, &dir)?,
            NodePath::Table {
                profile_id,
                database,
                name,
            } => export::export_table(&self.session, *profile_id, database, name, &dir)?,
            other => return Err(wrong_path(other)),
        };

        self.host
            .notify_info(&format!("Exported to {}", written.display()));
        Ok(Flow::Done)
    }

    // --- table commands -----------------------------------------------------

    fn rename_table(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Table {
            profile_id,
            database,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        let Some(new_name) = self.host.prompt_input("New table name", Some(name)) else {
            return Ok(Flow::Cancelled);
        };
        let new_name = new_name.trim().to_string();
        if new_name == *name {
            return Ok(Flow::Cancelled);
        }
        sql::validate_identifier(&new_name)?;

        let refresh_root = tables_group(*profile_id, database);
        self.session.apply_mutation(
            &refresh_root,
            &[sql::rename_table(database, name, &new_name)],
        )?;
        Ok(Flow::Done)
    }

    fn drop_table(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Table {
            profile_id,
            database,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        if self.declined(&format!(
            "Drop table '{}.{}'? This cannot be undone.",
            database, name
        )) {
            return Ok(Flow::Cancelled);
        }

        let refresh_root = tables_group(*profile_id, database);
        self.session
            .apply_mutation(&refresh_root, &[sql::drop_table(database, name)])?;
        Ok(Flow::Done)
    }

    fn truncate_table(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Table { database, name, .. } = &node.path else {
            return Err(wrong_path(&node.path));
        };

        if self.declined(&format!(
            "Truncate table '{}.{}'? All rows will be deleted.",
            database, name
        )) {
            return Ok(Flow::Cancelled);
        }

        self.session
            .apply_mutation(&node.path, &[sql::truncate_table(database, name)])?;
        Ok(Flow::Done)
    }

    fn table_template(&self, command: CommandId, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Table {
            profile_id,
            database,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        let template = match command {
            CommandId::SelectTemplate => sql::select_star(database, name),
            CommandId::AddColumnTemplate => sql::add_column_template(database, name),
            CommandId::IndexTemplate => sql::create_index_template(database, name),
            _ => {
                let columns = self.session.table_columns(*profile_id, database, name)?;
                match command {
                    CommandId::InsertTemplate => sql::insert_template(database, name, &columns),
                    CommandId::UpdateTemplate => sql::update_template(database, name, &columns),
                    _ => sql::delete_template(database, name, &columns),
                }
            }
        };

        self.session
            .set_query_target(*profile_id, Some(database.clone()));
        self.host.open_editor(&template);
        Ok(Flow::Done)
    }

    /// Like the INSERT/UPDATE templates, but onto the clipboard instead of
    /// into an editor.
    fn copy_statement(&self, command: CommandId, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Table {
            profile_id,
            database,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        let columns = self.session.table_columns(*profile_id, database, name)?;
        let statement = match command {
            CommandId::CopyInsertStatement => sql::insert_template(database, name, &columns),
            _ => sql::update_template(database, name, &columns),
        };
        self.host.copy_text(&statement);
        Ok(Flow::Done)
    }

    // --- column commands ----------------------------------------------------

    fn rename_column(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Column {
            profile_id,
            database,
            table,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        let Some(new_name) = self.host.prompt_input("New column name", Some(name)) else {
            return Ok(Flow::Cancelled);
        };
        let new_name = new_name.trim().to_string();
        if new_name == *name {
            return Ok(Flow::Cancelled);
        }
        sql::validate_identifier(&new_name)?;

        let column = self.column_info(*profile_id, database, table, name)?;
        let refresh_root = NodePath::Table {
            profile_id: *profile_id,
            database: database.clone(),
            name: table.clone(),
        };
        self.session.apply_mutation(
            &refresh_root,
            &[sql::rename_column(database, table, &column, &new_name)],
        )?;
        Ok(Flow::Done)
    }

    fn update_column_template(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Column {
            profile_id,
            database,
            table,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        let column = self.column_info(*profile_id, database, table, name)?;
        self.session
            .set_query_target(*profile_id, Some(database.clone()));
        self.host
            .open_editor(&sql::update_column_template(database, table, &column));
        Ok(Flow::Done)
    }

    fn drop_column(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Column {
            profile_id,
            database,
            table,
            name,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        if self.declined(&format!(
            "Drop column '{}' from '{}.{}'? This cannot be undone.",
            name, database, table
        )) {
            return Ok(Flow::Cancelled);
        }

        let refresh_root = NodePath::Table {
            profile_id: *profile_id,
            database: database.clone(),
            name: table.clone(),
        };
        self.session
            .apply_mutation(&refresh_root, &[sql::drop_column(database, table, name)])?;
        Ok(Flow::Done)
    }

    fn column_info(
        &self,
        profile_id: uuid::Uuid,
        database: &str,
        table: &str,
        name: &str,
    ) -> Result<sqlarbor_core::ColumnInfo, DbError> {
        self.session
            .table_columns(profile_id, database, table)?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                DbError::InvalidName(format!("unknown column: {}.{}.{}", database, table, name))
            })
    }

    // --- group templates ----------------------------------------------------

    fn group_template(&self, command: CommandId, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::Group {
            profile_id,
            database,
            ..
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        let template = match command {
            CommandId::CreateTableTemplate => sql::create_table_template(database),
            CommandId::CreateViewTemplate => sql::create_view_template(database),
            CommandId::CreateProcedureTemplate => sql::create_procedure_template(database),
            CommandId::CreateFunctionTemplate => sql::create_function_template(database),
            _ => sql::create_trigger_template(database),
        };

        self.session
            .set_query_target(*profile_id, Some(database.clone()));
        self.host.open_editor(&template);
        Ok(Flow::Done)
    }

    // --- show source --------------------------------------------------------

    fn show_source(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        // SHOW CREATE puts the DDL in column 1 for tables and views, and in
        // column 2 (after sql_mode) for routines and triggers.
        let (statement, ddl_column) = match &node.path {
            NodePath::Table { database, name, .. } => (sql::show_create_table(database, name), 1),
            NodePath::View { database, name, .. } => (sql::show_create_view(database, name), 1),
            NodePath::Procedure { database, name, .. } => {
                (sql::show_create_procedure(database, name), 2)
            }
            NodePath::Function { database, name, .. } => {
                (sql::show_create_function(database, name), 2)
            }
            NodePath::Trigger { database, name, .. } => {
                (sql::show_create_trigger(database, name), 2)
            }
            other => return Err(wrong_path(other)),
        };

        let result = self.session.execute(
            node.path.profile_id(),
            node.path.database(),
            &statement,
        )?;

        let ddl = metadata::single_text(&result, ddl_column)
            .or_else(|| metadata::single_text(&result, 1))
            .ok_or_else(|| {
                DbError::QueryFailed(format!("empty result for: {}", statement))
            })?;

        self.host.open_editor(&ddl);
        Ok(Flow::Done)
    }

    // --- drops of database-scoped leaves ------------------------------------

    fn drop_database_object(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let profile_id = node.path.profile_id();
        let (database, name, group, statement) = match &node.path {
            NodePath::View { database, name, .. } => (
                database,
                name,
                GroupKind::Views,
                sql::drop_view(database, name),
            ),
            NodePath::Procedure { database, name, .. } => (
                database,
                name,
                GroupKind::Procedures,
                sql::drop_procedure(database, name),
            ),
            NodePath::Function { database, name, .. } => (
                database,
                name,
                GroupKind::Functions,
                sql::drop_function(database, name),
            ),
            NodePath::Trigger { database, name, .. } => (
                database,
                name,
                GroupKind::Triggers,
                sql::drop_trigger(database, name),
            ),
            other => return Err(wrong_path(other)),
        };

        if self.declined(&format!(
            "Drop '{}.{}'? This cannot be undone.",
            database, name
        )) {
            return Ok(Flow::Cancelled);
        }

        let refresh_root = NodePath::Group {
            profile_id,
            database: database.clone(),
            group,
        };
        self.session.apply_mutation(&refresh_root, &[statement])?;
        Ok(Flow::Done)
    }

    // --- user commands ------------------------------------------------------

    fn drop_user(&self, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::User {
            profile_id,
            name,
            host,
        } = &node.path
        else {
            return Err(wrong_path(&node.path));
        };

        if self.declined(&format!("Drop user '{}'@'{}'?", name, host)) {
            return Ok(Flow::Cancelled);
        }

        let refresh_root = NodePath::UserGroup {
            profile_id: *profile_id,
        };
        self.session
            .apply_mutation(&refresh_root, &[sql::drop_user(name, host)])?;
        Ok(Flow::Done)
    }

    fn user_template(&self, command: CommandId, node: &ObjectNode) -> Result<Flow, DbError> {
        let NodePath::User { name, host, .. } = &node.path else {
            return Err(wrong_path(&node.path));
        };

        let template = match command {
            CommandId::GrantTemplate => sql::grant_template(name, host),
            _ => sql::change_password_template(name, host),
        };
        self.host.open_editor(&template);
        Ok(Flow::Done)
    }

    fn declined(&self, message: &str) -> bool {
        self.host.confirm(message) == Confirmation::Declined
    }
}

fn required<'a>(node: Option<&'a ObjectNode>) -> Result<&'a ObjectNode, DbError> {
    node.ok_or_else(|| DbError::NotSupported("command requires a target node".to_string()))
}

fn wrong_path(path: &NodePath) -> DbError {
    DbError::NotSupported(format!("command does not apply to {}", path))
}

fn tables_group(profile_id: uuid::Uuid, database: &str) -> NodePath {
    NodePath::Group {
        profile_id,
        database: database.to_string(),
        group: GroupKind::Tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_listed_once() {
        for (i, a) in CommandId::ALL.iter().enumerate() {
            for b in &CommandId::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn node_free_commands_accept_no_kinds() {
        assert!(CommandId::Refresh.expected_kinds().is_empty());
        assert!(CommandId::RunQuery.expected_kinds().is_empty());
        assert_eq!(CommandId::DropTable.expected_kinds(), &[NodeKind::Table]);
        assert_eq!(CommandId::CopyName.expected_kinds().len(), NodeKind::ALL.len());
    }
}
