//! Canned metadata result sets wired to the exact SQL the explorer sends.

use crate::FakeDriver;
use sqlarbor_core::{metadata, ColumnMeta, QueryResult, Row, Value};

pub fn text_row(values: &[&str]) -> Row {
    values.iter().map(|v| Value::Text(v.to_string())).collect()
}

/// Single-text-column result, one row per name.
pub fn names_result(column: &str, names: &[&str]) -> QueryResult {
    QueryResult::table(
        vec![ColumnMeta::named(column)],
        names.iter().map(|n| text_row(&[n])).collect(),
    )
}

pub fn wire_databases(driver: &FakeDriver, names: &[&str]) {
    driver.set_query_outcome(
        metadata::list_databases_sql(),
        crate::FakeQueryOutcome::Success(names_result("Database", names)),
    );
}

pub fn wire_tables(driver: &FakeDriver, database: &str, names: &[&str]) {
    let rows = names.iter().map(|n| text_row(&[n, ""])).collect();
    driver.set_query_outcome(
        metadata::list_tables_sql(database),
        crate::FakeQueryOutcome::Success(QueryResult::table(
            vec![
                ColumnMeta::named("table_name"),
                ColumnMeta::named("table_comment"),
            ],
            rows,
        )),
    );
}

pub fn wire_views(driver: &FakeDriver, database: &str, names: &[&str]) {
    driver.set_query_outcome(
        metadata::list_views_sql(database),
        crate::FakeQueryOutcome::Success(names_result("table_name", names)),
    );
}

/// Columns as (name, type, nullable, primary_key).
pub fn wire_columns(
    driver: &FakeDriver,
    database: &str,
    table: &str,
    columns: &[(&str, &str, bool, bool)],
) {
    let rows = columns
        .iter()
        .map(|(name, type_name, nullable, pk)| {
            vec![
                Value::Text(name.to_string()),
                Value::Text(type_name.to_string()),
                Value::Text(if *nullable { "YES" } else { "NO" }.to_string()),
                Value::Text(if *pk { "PRI" } else { "" }.to_string()),
                Value::Null,
            ]
        })
        .collect();

    driver.set_query_outcome(
        metadata::list_columns_sql(database, table),
        crate::FakeQueryOutcome::Success(QueryResult::table(
            vec![
                ColumnMeta::named("column_name"),
                ColumnMeta::named("column_type"),
                ColumnMeta::named("is_nullable"),
                ColumnMeta::named("column_key"),
                ColumnMeta::named("column_default"),
            ],
            rows,
        )),
    );
}

pub fn wire_procedures(driver: &FakeDriver, database: &str, names: &[&str]) {
    driver.set_query_outcome(
        metadata::list_procedures_sql(database),
        crate::FakeQueryOutcome::Success(names_result("routine_name", names)),
    );
}

pub fn wire_functions(driver: &FakeDriver, database: &str, names: &[&str]) {
    driver.set_query_outcome(
        metadata::list_functions_sql(database),
        crate::FakeQueryOutcome::Success(names_result("routine_name", names)),
    );
}

/// Triggers as (name, table).
pub fn wire_triggers(driver: &FakeDriver, database: &str, triggers: &[(&str, &str)]) {
    let rows = triggers
        .iter()
        .map(|(name, table)| text_row(&[name, table]))
        .collect();

    driver.set_query_outcome(
        metadata::list_triggers_sql(database),
        crate::FakeQueryOutcome::Success(QueryResult::table(
            vec![
                ColumnMeta::named("trigger_name"),
                ColumnMeta::named("event_object_table"),
            ],
            rows,
        )),
    );
}

/// Users as (user, host).
pub fn wire_users(driver: &FakeDriver, users: &[(&str, &str)]) {
    let rows = users
        .iter()
        .map(|(user, host)| text_row(&[user, host]))
        .collect();

    driver.set_query_outcome(
        metadata::list_users_sql(),
        crate::FakeQueryOutcome::Success(QueryResult::table(
            vec![ColumnMeta::named("user"), ColumnMeta::named("host")],
            rows,
        )),
    );
}

/// The sample server used by scenario tests: a `shop` database with `orders`
/// and `users` tables, and an empty `crm` database.
pub fn wire_shop_server(driver: &FakeDriver) {
    wire_databases(driver, &["crm", "shop"]);
    wire_tables(driver, "shop", &["orders", "users"]);
    wire_tables(driver, "crm", &[]);
    wire_views(driver, "shop", &["open_orders"]);
    wire_views(driver, "crm", &[]);
    wire_columns(
        driver,
        "shop",
        "users",
        &[
            ("id", "int", false, true),
            ("name", "varchar(255)", true, false),
        ],
    );
    wire_columns(
        driver,
        "shop",
        "orders",
        &[
            ("id", "int", false, true),
            ("user_id", "int", false, false),
        ],
    );
    wire_procedures(driver, "shop", &["close_day"]);
    wire_functions(driver, "shop", &["order_total"]);
    wire_triggers(driver, "shop", &[("orders_audit", "orders")]);
    wire_procedures(driver, "crm", &[]);
    wire_functions(driver, "crm", &[]);
    wire_triggers(driver, "crm", &[]);
    wire_users(driver, &[("app", "%"), ("root", "localhost")]);
}
