//! PostgreSQL catalog reader.
//!
//! # Security Guarantees
//! - Only `pg_catalog` and `information_schema` are queried
//! - Sessions run with `default_transaction_read_only = on`
//! - Connection strings are redacted in every error and log line

use super::{CatalogReader, ColumnRow, DatabaseRow, ServerDsn, TableRow};
use crate::config::SortMode;
use crate::error::{INSUFFICIENT_PRIVILEGE, PglsError, Result, redact_database_url};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{ConnectOptions, Connection, FromRow};
use std::str::FromStr;

/// Reported as `application_name` on every session.
const APPLICATION_NAME: &str = "pgls";

/// Connectable, non-template databases other than `postgres`. Sizes are only
/// computed where the role holds CONNECT, since `pg_database_size` raises a
/// privilege error otherwise.
const DATABASES_QUERY: &str = r"
    SELECT d.datname::text AS name,
           COALESCE(r.rolname::text, '') AS owner,
           shobj_description(d.oid, 'pg_database') AS description,
           CASE
               WHEN has_database_privilege(d.oid, 'CONNECT') THEN pg_database_size(d.oid)
               ELSE 0
           END AS size_bytes
      FROM pg_database d
      LEFT JOIN pg_roles r ON r.oid = d.datdba
     WHERE NOT d.datistemplate
       AND d.datname <> 'postgres'
       AND d.datallowconn
";

/// Ordinary and partitioned tables outside the system schemas.
const TABLES_QUERY: &str = r"
    SELECT n.nspname::text AS schema,
           c.relname::text AS name,
           obj_description(c.oid, 'pg_class') AS description,
           pg_table_size(c.oid) AS size_bytes,
           c.reltuples::bigint AS row_estimate
      FROM pg_class c
      JOIN pg_namespace n ON n.oid = c.relnamespace
     WHERE c.relkind IN ('r', 'p')
       AND n.nspname NOT IN ('pg_catalog', 'information_schema')
       AND n.nspname NOT LIKE 'pg\_toast%'
";

/// Columns of every relation outside the system schemas; the assembler
/// keeps the ones belonging to listed tables.
const COLUMNS_QUERY: &str = r"
    SELECT c.table_schema::text AS schema,
           c.table_name::text AS table_name,
           c.column_name::text AS name,
           c.data_type::text AS data_type,
           c.column_default::text AS default_value,
           (c.is_nullable = 'YES') AS nullable
      FROM information_schema.columns c
     WHERE c.table_schema NOT IN ('pg_catalog', 'information_schema')
     ORDER BY c.table_schema, c.table_name, c.ordinal_position
";

impl SortMode {
    /// `ORDER BY` expression for the database listing.
    const fn databases_order_by(self) -> &'static str {
        match self {
            Self::Name => "d.datname",
            Self::Size => "size_bytes DESC",
        }
    }

    /// `ORDER BY` expression for the table listing.
    const fn tables_order_by(self) -> &'static str {
        match self {
            Self::Name => "n.nspname, c.relname",
            Self::Size => "size_bytes DESC",
        }
    }
}

/// Builds the database listing query for `sort`.
pub fn databases_query(sort: SortMode) -> String {
    format!("{DATABASES_QUERY} ORDER BY {}", sort.databases_order_by())
}

/// Builds the table listing query for `sort`.
pub fn tables_query(sort: SortMode) -> String {
    format!("{TABLES_QUERY} ORDER BY {}", sort.tables_order_by())
}

/// Whether a driver error is PostgreSQL's `insufficient_privilege`.
fn is_privilege_error(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE)
    )
}

/// Catalog reader backed by short-lived sqlx connections.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    dsn: ServerDsn,
}

impl PgCatalog {
    /// Creates a reader for the server behind `dsn`. Nothing is connected yet.
    pub const fn new(dsn: ServerDsn) -> Self {
        Self { dsn }
    }

    /// Parses `dsn` and creates a reader for it.
    ///
    /// # Errors
    /// Returns a configuration error if the connection string is invalid.
    pub fn from_dsn(dsn: &str) -> Result<Self> {
        ServerDsn::parse(dsn).map(Self::new)
    }

    /// The server this reader targets.
    pub const fn dsn(&self) -> &ServerDsn {
        &self.dsn
    }

    /// Opens a read-only session on `database`.
    async fn connect(&self, database: &str) -> Result<PgConnection> {
        let target = self.dsn.for_database(database);
        tracing::debug!("Connecting to {}", redact_database_url(&target));

        let options = PgConnectOptions::from_str(&target)
            .map_err(|e| PglsError::connection_failed(&target, e))?
            .application_name(APPLICATION_NAME)
            .options([("default_transaction_read_only", "on")]);

        options.connect().await.map_err(|e| {
            if is_privilege_error(&e) {
                PglsError::insufficient_privilege(database, e.to_string())
            } else {
                PglsError::connection_failed(&target, e)
            }
        })
    }

    /// Runs `sql` on a fresh connection to `database` and closes it again.
    ///
    /// The connection is closed before the query result is inspected, so a
    /// failed query never leaks its session.
    async fn fetch<T>(&self, database: &str, sql: &str, resource: &str) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.connect(database).await?;

        tracing::trace!("Querying {} in '{}'", resource, database);
        let result = sqlx::query_as::<_, T>(sql).fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::debug!("Failed to close connection to '{}': {}", database, e);
        }

        result.map_err(|e| {
            if is_privilege_error(&e) {
                PglsError::insufficient_privilege(database, format!("Cannot read {resource}"))
            } else {
                PglsError::query_failed(format!("Failed to query {resource} in '{database}'"), e)
            }
        })
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn list_databases(&self, sort: SortMode) -> Result<Vec<DatabaseRow>> {
        let rows: Vec<DatabaseRow> = self
            .fetch(super::MAINTENANCE_DATABASE, &databases_query(sort), "pg_database")
            .await?;

        tracing::debug!("Listed {} databases (sort: {})", rows.len(), sort);
        Ok(rows)
    }

    async fn list_tables(&self, database: &str, sort: SortMode) -> Result<Vec<TableRow>> {
        let rows: Vec<TableRow> = self
            .fetch(database, &tables_query(sort), "pg_class")
            .await?;

        tracing::debug!("Listed {} tables in '{}'", rows.len(), database);
        Ok(rows)
    }

    async fn list_columns(&self, database: &str) -> Result<Vec<ColumnRow>> {
        let rows: Vec<ColumnRow> = self
            .fetch(database, COLUMNS_QUERY, "information_schema.columns")
            .await?;

        tracing::debug!("Listed {} columns in '{}'", rows.len(), database);
        Ok(rows)
    }
}
