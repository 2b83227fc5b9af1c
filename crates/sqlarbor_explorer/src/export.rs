//! SQL dump export.
//!
//! Writes plain `.sql` files: the `SHOW CREATE` DDL followed by one INSERT
//! per row. The output splits cleanly back into statements, so a dump can be
//! re-imported through the session's import path.

use crate::session::ExplorerSession;
use sqlarbor_core::chrono::Local;
use sqlarbor_core::{metadata, sql_generation as sql, DbError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Dumps a single table into `<dir>/<database>.<table>.sql`.
pub fn export_table(
    session: &ExplorerSession,
    profile_id: Uuid,
    database: &str,
    table: &str,
    dir: &Path,
) -> Result<PathBuf, DbError> {
    let mut content = header(&format!("{}.{}", database, table));
    content.push_str(&table_section(session, profile_id, database, table)?);

    let path = dir.join(format!("{}.{}.sql", database, table));
    fs::write(&path, content)?;
    log::info!("Exported table {}.{} to {}", database, table, path.display());
    Ok(path)
}

/// Dumps a whole database into `<dir>/<database>.sql`: the CREATE DATABASE
/// statement followed by every base table's DDL and rows.
pub fn export_database(
    session: &ExplorerSession,
    profile_id: Uuid,
    database: &str,
    dir: &Path,
) -> Result<PathBuf, DbError> {
    let tables =
        session.with_connection(profile_id, |conn| metadata::list_tables(conn, database))?;

    let mut content = header(database);
    content.push_str(&sql::create_database(database));
    content.push_str(";\n\n");

    for table in &tables {
        content.push_str(&table_section(session, profile_id, database, &table.name)?);
    }

    let path = dir.join(format!("{}.sql", database));
    fs::write(&path, content)?;
    log::info!(
        "Exported database {} ({} tables) to {}",
        database,
        tables.len(),
        path.display()
    );
    Ok(path)
}

fn table_section(
    session: &ExplorerSession,
    profile_id: Uuid,
    database: &str,
    table: &str,
) -> Result<String, DbError> {
    let create = session.execute(
        profile_id,
        Some(database),
        &sql::show_create_table(database, table),
    )?;
    let ddl = metadata::single_text(&create, 1).ok_or_else(|| {
        DbError::QueryFailed(format!("no DDL returned for {}.{}", database, table))
    })?;

    let rows = session.execute(
        profile_id,
        Some(database),
        &format!("SELECT * FROM {}", sql::qualified(database, table)),
    )?;

    let mut section = ddl;
    section.push_str(";\n\n");
    for row in &rows.rows {
        section.push_str(&sql::insert_with_values(database, table, row));
        section.push('\n');
    }
    section.push('\n');
    Ok(section)
}

fn header(subject: &str) -> String {
    format!(
        "-- Dump of {}\n-- Generated {}\n\n",
        subject,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
