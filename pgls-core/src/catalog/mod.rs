//! Catalog reading: the three fixed metadata queries and their typed rows.
//!
//! # Module Structure
//! - `postgres`: the sqlx-backed [`CatalogReader`] (feature `postgresql`)
//!
//! Every reader call owns its connection: it connects to the target
//! database, runs one query and closes the connection, also when the query
//! fails. Nothing is pooled or reused across databases.

#[cfg(feature = "postgresql")]
pub mod postgres;

use crate::config::SortMode;
use crate::error::{PglsError, Result, redact_database_url};
use async_trait::async_trait;
use std::fmt;
use url::Url;

/// Database every server is expected to have; used for the database listing
/// and excluded from the listing itself.
pub const MAINTENANCE_DATABASE: &str = "postgres";

/// One row of the database listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgresql", derive(sqlx::FromRow))]
pub struct DatabaseRow {
    /// Database name
    pub name: String,
    /// Owner role name
    pub owner: String,
    /// Comment set with `COMMENT ON DATABASE`
    pub description: Option<String>,
    /// Storage size in bytes, `0` when the role may not connect
    pub size_bytes: i64,
}

/// One row of the table listing of a single database.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgresql", derive(sqlx::FromRow))]
pub struct TableRow {
    /// Schema the table lives in
    pub schema: String,
    /// Table name
    pub name: String,
    /// Comment set with `COMMENT ON TABLE`
    pub description: Option<String>,
    /// Table size in bytes, excluding indexes
    pub size_bytes: i64,
    /// Planner row estimate; `-1` if the table was never analyzed
    pub row_estimate: i64,
}

/// One row of the column listing of a single database.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgresql", derive(sqlx::FromRow))]
pub struct ColumnRow {
    /// Schema of the owning table
    pub schema: String,
    /// Name of the owning table
    pub table_name: String,
    /// Column name
    pub name: String,
    /// Type name as reported by `information_schema`
    pub data_type: String,
    /// Default expression, if any
    pub default_value: Option<String>,
    /// Whether the column accepts NULL
    pub nullable: bool,
}

impl ColumnRow {
    /// Whether this column belongs to `schema.table` (exact, case-sensitive).
    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table_name == table
    }
}

/// Read-only access to a server's catalog.
///
/// Implementations report a denied privilege as
/// [`PglsError::InsufficientPrivilege`] so callers can recover from it by
/// kind without inspecting driver errors.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Lists connectable, non-template databases except the maintenance one.
    async fn list_databases(&self, sort: SortMode) -> Result<Vec<DatabaseRow>>;

    /// Lists the user tables of `database`.
    async fn list_tables(&self, database: &str, sort: SortMode) -> Result<Vec<TableRow>>;

    /// Lists every column of every user table of `database`, in physical
    /// column order per table.
    async fn list_columns(&self, database: &str) -> Result<Vec<ColumnRow>>;
}

/// Base connection string of a server, without a database name.
///
/// Per-database targets are derived from it by appending the database name
/// as the URL path; query parameters such as `sslmode` are kept.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerDsn {
    base: Url,
}

impl ServerDsn {
    /// Parses and validates a base connection string.
    ///
    /// # Errors
    /// Returns a configuration error if the string is not a
    /// `postgres://`/`postgresql://` URL. The host may be left out, in which
    /// case the driver falls back to `PGHOST`, the local socket or `localhost`.
    pub fn parse(dsn: &str) -> Result<Self> {
        let mut base = Url::parse(dsn.trim()).map_err(|e| {
            PglsError::configuration(format!(
                "Invalid connection string {}: {e}",
                redact_database_url(dsn)
            ))
        })?;

        if !matches!(base.scheme(), "postgres" | "postgresql") {
            return Err(PglsError::configuration(
                "Connection string must use postgres:// or postgresql:// scheme",
            ));
        }

        let path = base.path().trim_matches('/');
        if !path.is_empty() {
            tracing::warn!(
                "Ignoring database '{}' in connection string; every database is visited",
                path
            );
        }
        base.set_path("");

        Ok(Self { base })
    }

    /// Connection string targeting `database` on this server.
    pub fn for_database(&self, database: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push(database);
        }
        url.to_string()
    }

    /// Connection string targeting the maintenance database.
    pub fn maintenance(&self) -> String {
        self.for_database(MAINTENANCE_DATABASE)
    }

    /// The base connection string with its password masked.
    pub fn redacted(&self) -> String {
        redact_database_url(self.base.as_str())
    }
}

impl fmt::Debug for ServerDsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServerDsn").field(&self.redacted()).finish()
    }
}

impl fmt::Display for ServerDsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
