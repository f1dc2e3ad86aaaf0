//! Joins raw catalog rows into the [`Database`] / [`Table`] / [`Field`] graph.
//!
//! The assembler never re-sorts: every sequence keeps the order the catalog
//! reader produced for the selected sort mode.

use crate::catalog::{ColumnRow, DatabaseRow, TableRow};
use crate::models::{Database, Field, Table};
use crate::units::{RowCount, SizeMeasure};

/// Fields of `schema.table`, in the order they appear in `columns`.
///
/// Matching is exact and case-sensitive. Column comments are not part of the
/// column listing, so every field's description is `None`.
pub fn assemble_fields(columns: &[ColumnRow], schema: &str, table: &str) -> Vec<Field> {
    columns
        .iter()
        .filter(|column| column.belongs_to(schema, table))
        .map(|column| Field {
            name: column.name.clone(),
            description: None,
            data_type: column.data_type.clone(),
            default: column.default_value.clone(),
            nullable: column.nullable,
        })
        .collect()
}

/// One [`Table`] per table row, each with its matching fields.
pub fn assemble_tables(tables: Vec<TableRow>, columns: &[ColumnRow]) -> Vec<Table> {
    tables
        .into_iter()
        .map(|row| {
            let fields = assemble_fields(columns, &row.schema, &row.name);
            Table {
                size: SizeMeasure::from_catalog(row.size_bytes),
                rows: RowCount::from_catalog(row.row_estimate),
                schema: row.schema,
                name: row.name,
                description: row.description,
                fields,
            }
        })
        .collect()
}

/// Wraps a database row together with its (possibly empty) tables.
pub fn assemble_database(row: DatabaseRow, tables: Vec<Table>) -> Database {
    Database {
        size: SizeMeasure::from_catalog(row.size_bytes),
        name: row.name,
        description: row.description,
        owner: row.owner,
        tables,
    }
}

/// Pairs each database row with the table list at the same position.
///
/// A database without a corresponding entry in `tables_by_database` gets an
/// empty table list.
pub fn assemble_databases(
    databases: Vec<DatabaseRow>,
    tables_by_database: Vec<Vec<Table>>,
) -> Vec<Database> {
    let mut tables_by_database = tables_by_database.into_iter();
    databases
        .into_iter()
        .map(|row| assemble_database(row, tables_by_database.next().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(schema: &str, table: &str, name: &str, nullable: bool) -> ColumnRow {
        ColumnRow {
            schema: schema.to_string(),
            table_name: table.to_string(),
            name: name.to_string(),
            data_type: "text".to_string(),
            default_value: None,
            nullable,
        }
    }

    fn table_row(schema: &str, name: &str) -> TableRow {
        TableRow {
            schema: schema.to_string(),
            name: name.to_string(),
            description: None,
            size_bytes: 8192,
            row_estimate: -1,
        }
    }

    fn database_row(name: &str) -> DatabaseRow {
        DatabaseRow {
            name: name.to_string(),
            owner: "postgres".to_string(),
            description: None,
            size_bytes: 7_500_000,
        }
    }

    #[test]
    fn test_assemble_fields_filters_and_keeps_order() {
        let columns = vec![
            column("public", "users", "id", false),
            column("public", "orders", "id", false),
            column("public", "users", "email", true),
            column("audit", "users", "changed_at", false),
            column("public", "users", "name", true),
        ];

        let fields = assemble_fields(&columns, "public", "users");
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "email", "name"]);
        assert!(fields.iter().all(|f| f.description.is_none()));
        assert!(!fields[0].nullable);
        assert!(fields[1].nullable);
    }

    #[test]
    fn test_assemble_fields_is_case_sensitive() {
        let columns = vec![column("public", "Users", "id", false)];
        assert!(assemble_fields(&columns, "public", "users").is_empty());
        assert_eq!(assemble_fields(&columns, "public", "Users").len(), 1);
    }

    #[test]
    fn test_assemble_fields_carries_type_and_default() {
        let mut row = column("public", "users", "id", false);
        row.data_type = "integer".to_string();
        row.default_value = Some("nextval('users_id_seq'::regclass)".to_string());

        let fields = assemble_fields(&[row], "public", "users");
        assert_eq!(fields[0].data_type, "integer");
        assert_eq!(
            fields[0].default.as_deref(),
            Some("nextval('users_id_seq'::regclass)")
        );
    }

    #[test]
    fn test_assemble_tables() {
        let tables = vec![table_row("public", "users"), table_row("audit", "events")];
        let columns = vec![
            column("audit", "events", "at", false),
            column("public", "users", "id", false),
        ];

        let assembled = assemble_tables(tables, &columns);
        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].qualified_name(), "public.users");
        assert_eq!(assembled[0].fields[0].name, "id");
        assert_eq!(assembled[1].fields[0].name, "at");
        assert_eq!(assembled[0].size.bytes(), 8192);
        // never-analyzed tables report an estimate of -1
        assert_eq!(assembled[0].rows.count(), 0);
    }

    #[test]
    fn test_assemble_tables_without_columns() {
        let assembled = assemble_tables(vec![table_row("public", "users")], &[]);
        assert!(assembled[0].fields.is_empty());
    }

    #[test]
    fn test_assemble_databases_pairs_by_position() {
        let users = assemble_tables(vec![table_row("public", "users")], &[]);
        let databases = assemble_databases(
            vec![database_row("shop"), database_row("analytics"), database_row("empty")],
            vec![users, Vec::new()],
        );

        assert_eq!(databases.len(), 3);
        assert_eq!(databases[0].name, "shop");
        assert_eq!(databases[0].tables.len(), 1);
        assert!(databases[1].tables.is_empty());
        assert!(databases[2].tables.is_empty());
        assert_eq!(databases[2].size.bytes(), 7_500_000);
        assert_eq!(databases[2].owner, "postgres");
    }
}
