//! MySQL statement and template generation.
//!
//! Two flavors live here: statements the explorer executes directly (drops,
//! renames, truncate) and editor templates handed to the host with
//! placeholders the user fills in before running.

use crate::schema::ColumnInfo;
use crate::{DbError, Value};

/// Quote an identifier with backticks, escaping embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `db`.`name` reference.
pub fn qualified(database: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(database), quote_ident(name))
}

/// Rejects names that are empty or contain characters MySQL identifiers
/// cannot hold even quoted (NUL) or that we refuse on principle (pipe is the
/// node-path separator).
pub fn validate_identifier(name: &str) -> Result<(), DbError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DbError::InvalidName("name must not be empty".to_string()));
    }
    if trimmed.len() > 64 {
        return Err(DbError::InvalidName(format!(
            "name too long ({} > 64): {}",
            trimmed.len(),
            trimmed
        )));
    }
    if trimmed.contains('\0') || trimmed.contains('|') {
        return Err(DbError::InvalidName(format!(
            "name contains forbidden characters: {}",
            trimmed
        )));
    }
    Ok(())
}

// --- statements executed directly -----------------------------------------

pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {}", quote_ident(name))
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE {}", quote_ident(name))
}

pub fn drop_table(database: &str, table: &str) -> String {
    format!("DROP TABLE {}", qualified(database, table))
}

pub fn truncate_table(database: &str, table: &str) -> String {
    format!("TRUNCATE TABLE {}", qualified(database, table))
}

pub fn rename_table(database: &str, old: &str, new: &str) -> String {
    format!(
        "ALTER TABLE {} RENAME TO {}",
        qualified(database, old),
        qualified(database, new)
    )
}

pub fn drop_column(database: &str, table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {}",
        qualified(database, table),
        quote_ident(column)
    )
}

/// MySQL renames a column with CHANGE, which requires restating the type.
pub fn rename_column(database: &str, table: &str, column: &ColumnInfo, new_name: &str) -> String {
    format!(
        "ALTER TABLE {} CHANGE {} {} {}{}",
        qualified(database, table),
        quote_ident(&column.name),
        quote_ident(new_name),
        column.type_name,
        if column.nullable { "" } else { " NOT NULL" }
    )
}

pub fn drop_view(database: &str, view: &str) -> String {
    format!("DROP VIEW {}", qualified(database, view))
}

pub fn drop_procedure(database: &str, procedure: &str) -> String {
    format!("DROP PROCEDURE {}", qualified(database, procedure))
}

pub fn drop_function(database: &str, function: &str) -> String {
    format!("DROP FUNCTION {}", qualified(database, function))
}

pub fn drop_trigger(database: &str, trigger: &str) -> String {
    format!("DROP TRIGGER {}", qualified(database, trigger))
}

pub fn drop_user(user: &str, host: &str) -> String {
    format!("DROP USER '{}'@'{}'", user, host)
}

// --- show-source statements ------------------------------------------------

pub fn show_create_table(database: &str, table: &str) -> String {
    format!("SHOW CREATE TABLE {}", qualified(database, table))
}

pub fn show_create_view(database: &str, view: &str) -> String {
    format!("SHOW CREATE VIEW {}", qualified(database, view))
}

pub fn show_create_procedure(database: &str, procedure: &str) -> String {
    format!("SHOW CREATE PROCEDURE {}", qualified(database, procedure))
}

pub fn show_create_function(database: &str, function: &str) -> String {
    format!("SHOW CREATE FUNCTION {}", qualified(database, function))
}

pub fn show_create_trigger(database: &str, trigger: &str) -> String {
    format!("SHOW CREATE TRIGGER {}", qualified(database, trigger))
}

// --- editor templates -------------------------------------------------------

pub fn select_star(database: &str, table: &str) -> String {
    format!("SELECT * FROM {} LIMIT 100;", qualified(database, table))
}

pub fn insert_template(database: &str, table: &str, columns: &[ColumnInfo]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    let values: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({})\nVALUES ({});",
        qualified(database, table),
        names.join(", "),
        values.join(", ")
    )
}

/// INSERT with concrete row values, used by the SQL dump exporter.
pub fn insert_with_values(database: &str, table: &str, row: &[Value]) -> String {
    let literals: Vec<String> = row.iter().map(Value::to_sql_literal).collect();
    format!(
        "INSERT INTO {} VALUES ({});",
        qualified(database, table),
        literals.join(", ")
    )
}

pub fn update_template(database: &str, table: &str, columns: &[ColumnInfo]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .filter(|c| !c.is_primary_key)
        .map(|c| format!("{} = ?", quote_ident(&c.name)))
        .collect();
    format!(
        "UPDATE {}\nSET {}\nWHERE {};",
        qualified(database, table),
        assignments.join(",\n    "),
        where_on_primary_key(columns)
    )
}

pub fn delete_template(database: &str, table: &str, columns: &[ColumnInfo]) -> String {
    format!(
        "DELETE FROM {}\nWHERE {};",
        qualified(database, table),
        where_on_primary_key(columns)
    )
}

fn where_on_primary_key(columns: &[ColumnInfo]) -> String {
    let keys: Vec<String> = columns
        .iter()
        .filter(|c| c.is_primary_key)
        .map(|c| format!("{} = ?", quote_ident(&c.name)))
        .collect();

    if keys.is_empty() {
        "<condition>".to_string()
    } else {
        keys.join(" AND ")
    }
}

pub fn add_column_template(database: &str, table: &str) -> String {
    format!(
        "ALTER TABLE {}\n    ADD COLUMN <name> <type> NULL COMMENT '';",
        qualified(database, table)
    )
}

pub fn update_column_template(database: &str, table: &str, column: &ColumnInfo) -> String {
    format!(
        "ALTER TABLE {}\n    CHANGE {} {} {}{};",
        qualified(database, table),
        quote_ident(&column.name),
        quote_ident(&column.name),
        column.type_name,
        if column.nullable { "" } else { " NOT NULL" }
    )
}

pub fn create_index_template(database: &str, table: &str) -> String {
    format!(
        "ALTER TABLE {}\n    ADD INDEX <index_name> (<column>);",
        qualified(database, table)
    )
}

pub fn create_table_template(database: &str) -> String {
    format!(
        "CREATE TABLE {}.<table_name> (\n    id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,\n    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;",
        quote_ident(database)
    )
}

pub fn create_view_template(database: &str) -> String {
    format!(
        "CREATE VIEW {}.<view_name> AS\nSELECT 1;",
        quote_ident(database)
    )
}

pub fn create_procedure_template(database: &str) -> String {
    format!(
        "DELIMITER $$\nCREATE PROCEDURE {}.<procedure_name>()\nBEGIN\n\nEND$$\nDELIMITER ;",
        quote_ident(database)
    )
}

pub fn create_function_template(database: &str) -> String {
    format!(
        "DELIMITER $$\nCREATE FUNCTION {}.<function_name>() RETURNS INT DETERMINISTIC\nBEGIN\n    RETURN 0;\nEND$$\nDELIMITER ;",
        quote_ident(database)
    )
}

pub fn create_trigger_template(database: &str) -> String {
    format!(
        "DELIMITER $$\nCREATE TRIGGER {}.<trigger_name> BEFORE INSERT ON <table_name>\nFOR EACH ROW BEGIN\n\nEND$$\nDELIMITER ;",
        quote_ident(database)
    )
}

pub fn create_user_template() -> String {
    "CREATE USER '<user>'@'%' IDENTIFIED BY '<password>';".to_string()
}

pub fn grant_template(user: &str, host: &str) -> String {
    format!(
        "GRANT ALL PRIVILEGES ON <database>.* TO '{}'@'{}';\nFLUSH PRIVILEGES;",
        user, host
    )
}

pub fn change_password_template(user: &str, host: &str) -> String {
    format!(
        "ALTER USER '{}'@'{}' IDENTIFIED BY '<new_password>';",
        user, host
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, type_name: &str, pk: bool) -> ColumnInfo {
        ColumnInfo {
            name: name.into(),
            type_name: type_name.into(),
            nullable: !pk,
            is_primary_key: pk,
            default_value: None,
        }
    }

    #[test]
    fn identifiers_are_backtick_quoted_and_escaped() {
        assert_eq!(quote_ident("orders"), "`orders`");
        assert_eq!(quote_ident("we`ird"), "`we``ird`");
        assert_eq!(qualified("shop", "orders"), "`shop`.`orders`");
    }

    #[test]
    fn validate_identifier_rejects_bad_names() {
        assert!(validate_identifier("orders").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("   ").is_err());
        assert!(validate_identifier("a|b").is_err());
        assert!(validate_identifier(&"x".repeat(65)).is_err());
    }

    #[test]
    fn drop_and_rename_statements_are_qualified() {
        assert_eq!(drop_table("shop", "orders"), "DROP TABLE `shop`.`orders`");
        assert_eq!(
            rename_table("shop", "users", "customers"),
            "ALTER TABLE `shop`.`users` RENAME TO `shop`.`customers`"
        );
        assert_eq!(drop_user("app", "%"), "DROP USER 'app'@'%'");
    }

    #[test]
    fn rename_column_restates_type_and_nullability() {
        let col = column("name", "varchar(255)", false);
        assert_eq!(
            rename_column("shop", "users", &col, "full_name"),
            "ALTER TABLE `shop`.`users` CHANGE `name` `full_name` varchar(255)"
        );

        let pk = column("id", "int", true);
        assert_eq!(
            rename_column("shop", "users", &pk, "user_id"),
            "ALTER TABLE `shop`.`users` CHANGE `id` `user_id` int NOT NULL"
        );
    }

    #[test]
    fn update_template_sets_non_keys_and_filters_on_keys() {
        let columns = vec![
            column("id", "int", true),
            column("name", "varchar(255)", false),
        ];
        let sql = update_template("shop", "users", &columns);
        assert_eq!(
            sql,
            "UPDATE `shop`.`users`\nSET `name` = ?\nWHERE `id` = ?;"
        );
    }

    #[test]
    fn delete_template_without_primary_key_leaves_placeholder() {
        let columns = vec![column("note", "text", false)];
        let sql = delete_template("shop", "scratch", &columns);
        assert!(sql.ends_with("WHERE <condition>;"));
    }

    #[test]
    fn insert_with_values_renders_literals() {
        let row = vec![
            Value::Int(1),
            Value::Text("O'Brien".into()),
            Value::Null,
        ];
        assert_eq!(
            insert_with_values("shop", "users", &row),
            "INSERT INTO `shop`.`users` VALUES (1, 'O''Brien', NULL);"
        );
    }
}
