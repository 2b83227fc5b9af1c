//! Server metadata queries.
//!
//! Each `list_*` function pairs a `*_sql` builder with a row mapper so tests
//! can key fake query outcomes on the exact statement text the explorer
//! sends. All catalog access goes through `information_schema` except
//! databases (SHOW DATABASES) and accounts (mysql.user).

use crate::{
    ColumnInfo, Connection, DatabaseInfo, DbError, FunctionInfo, ProcedureInfo, QueryRequest,
    QueryResult, Row, TableInfo, TriggerInfo, UserInfo, ViewInfo,
};

/// System schemas hidden from the tree.
const SYSTEM_SCHEMAS: [&str; 4] = ["information_schema", "performance_schema", "mysql", "sys"];

pub fn list_databases_sql() -> String {
    "SHOW DATABASES".to_string()
}

pub fn list_databases(conn: &dyn Connection) -> Result<Vec<DatabaseInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_databases_sql()))?;
    let current = conn.active_database();

    let mut databases: Vec<DatabaseInfo> = result
        .rows
        .iter()
        .filter_map(|row| text_at(row, 0))
        .filter(|name| !SYSTEM_SCHEMAS.contains(&name.as_str()))
        .map(|name| DatabaseInfo {
            is_current: current.as_deref() == Some(name.as_str()),
            name,
        })
        .collect();

    databases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(databases)
}

pub fn list_tables_sql(database: &str) -> String {
    format!(
        "SELECT table_name, table_comment FROM information_schema.tables \
         WHERE table_schema = '{}' AND table_type = 'BASE TABLE' ORDER BY table_name",
        escape(database)
    )
}

pub fn list_tables(conn: &dyn Connection, database: &str) -> Result<Vec<TableInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_tables_sql(database)))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| {
            Some(TableInfo {
                name: text_at(row, 0)?,
                comment: text_at(row, 1).filter(|c| !c.is_empty()),
            })
        })
        .collect())
}

pub fn list_views_sql(database: &str) -> String {
    format!(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = '{}' AND table_type = 'VIEW' ORDER BY table_name",
        escape(database)
    )
}

pub fn list_views(conn: &dyn Connection, database: &str) -> Result<Vec<ViewInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_views_sql(database)))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| Some(ViewInfo { name: text_at(row, 0)? }))
        .collect())
}

pub fn list_columns_sql(database: &str, table: &str) -> String {
    format!(
        "SELECT column_name, column_type, is_nullable, column_key, column_default \
         FROM information_schema.columns \
         WHERE table_schema = '{}' AND table_name = '{}' ORDER BY ordinal_position",
        escape(database),
        escape(table)
    )
}

pub fn list_columns(
    conn: &dyn Connection,
    database: &str,
    table: &str,
) -> Result<Vec<ColumnInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_columns_sql(database, table)))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| {
            Some(ColumnInfo {
                name: text_at(row, 0)?,
                type_name: text_at(row, 1).unwrap_or_default(),
                nullable: text_at(row, 2).as_deref() == Some("YES"),
                is_primary_key: text_at(row, 3).as_deref() == Some("PRI"),
                default_value: text_at(row, 4),
            })
        })
        .collect())
}

pub fn list_procedures_sql(database: &str) -> String {
    routines_sql(database, "PROCEDURE")
}

pub fn list_procedures(
    conn: &dyn Connection,
    database: &str,
) -> Result<Vec<ProcedureInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_procedures_sql(database)))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| Some(ProcedureInfo { name: text_at(row, 0)? }))
        .collect())
}

pub fn list_functions_sql(database: &str) -> String {
    routines_sql(database, "FUNCTION")
}

pub fn list_functions(conn: &dyn Connection, database: &str) -> Result<Vec<FunctionInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_functions_sql(database)))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| Some(FunctionInfo { name: text_at(row, 0)? }))
        .collect())
}

fn routines_sql(database: &str, routine_type: &str) -> String {
    format!(
        "SELECT routine_name FROM information_schema.routines \
         WHERE routine_schema = '{}' AND routine_type = '{}' ORDER BY routine_name",
        escape(database),
        routine_type
    )
}

pub fn list_triggers_sql(database: &str) -> String {
    format!(
        "SELECT trigger_name, event_object_table FROM information_schema.triggers \
         WHERE trigger_schema = '{}' ORDER BY trigger_name",
        escape(database)
    )
}

pub fn list_triggers(conn: &dyn Connection, database: &str) -> Result<Vec<TriggerInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_triggers_sql(database)))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| {
            Some(TriggerInfo {
                name: text_at(row, 0)?,
                table: text_at(row, 1),
            })
        })
        .collect())
}

pub fn list_users_sql() -> String {
    "SELECT user, host FROM mysql.user ORDER BY user, host".to_string()
}

pub fn list_users(conn: &dyn Connection) -> Result<Vec<UserInfo>, DbError> {
    let result = conn.execute(&QueryRequest::new(list_users_sql()))?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| {
            Some(UserInfo {
                name: text_at(row, 0)?,
                host: text_at(row, 1).unwrap_or_else(|| "%".to_string()),
            })
        })
        .collect())
}

/// First column of the first row as text, used for SHOW CREATE output where
/// the DDL sits in the second column.
pub fn single_text(result: &QueryResult, column: usize) -> Option<String> {
    result.rows.first().and_then(|row| text_at(row, column))
}

fn text_at(row: &Row, idx: usize) -> Option<String> {
    row.get(idx).and_then(|value| {
        if value.is_null() {
            None
        } else {
            Some(value.as_display_string())
        }
    })
}

fn escape(name: &str) -> String {
    name.replace('\'', "''")
}
