//! Per-database traversal of a server.
//!
//! [`walk_databases`] is the streaming path used for tree output: the
//! database list is fetched on the first poll, then each poll fetches,
//! assembles and yields exactly one database. [`collect_databases`] is the
//! fetch-everything path used for snapshot output.

use crate::assemble::{assemble_database, assemble_databases, assemble_tables};
use crate::catalog::{CatalogReader, DatabaseRow};
use crate::config::ListingOptions;
use crate::error::{PglsError, Result};
use crate::models::{Database, Table};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// Fetches the tables (and, unless hidden, their columns) of one database.
///
/// A privilege error from either query is absorbed: the database is listed
/// with no tables and the walk continues. Any other error is returned.
pub async fn fetch_tables<C>(
    catalog: &C,
    database: &str,
    options: ListingOptions,
) -> Result<Vec<Table>>
where
    C: CatalogReader + ?Sized,
{
    if !options.show_tables {
        return Ok(Vec::new());
    }

    let result = async {
        let tables = catalog.list_tables(database, options.sort).await?;
        let columns = if options.show_fields {
            catalog.list_columns(database).await?
        } else {
            Vec::new()
        };
        Ok::<_, PglsError>(assemble_tables(tables, &columns))
    }
    .await;

    match result {
        Err(e) if e.is_insufficient_privilege() => {
            tracing::warn!("Skipping tables of '{}': {}", database, e);
            Ok(Vec::new())
        }
        other => other,
    }
}

async fn fetch_database<C>(
    catalog: &C,
    row: DatabaseRow,
    options: ListingOptions,
) -> Result<Database>
where
    C: CatalogReader + ?Sized,
{
    tracing::info!("Visiting database '{}'", row.name);
    let tables = fetch_tables(catalog, &row.name, options).await?;
    Ok(assemble_database(row, tables))
}

/// Streams assembled databases one at a time.
///
/// Nothing is fetched for a database until the previous one has been
/// consumed, so output for earlier databases is already visible when a
/// later fetch fails. The first error ends the stream's useful output;
/// callers using `try_next` stop there.
pub fn walk_databases<'a, C>(
    catalog: &'a C,
    options: ListingOptions,
) -> BoxStream<'a, Result<Database>>
where
    C: CatalogReader + ?Sized,
{
    log_reserved_options(options);

    stream::once(async move { catalog.list_databases(options.sort).await })
        .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<_, PglsError>)))
        .try_flatten()
        .and_then(move |row| fetch_database(catalog, row, options))
        .boxed()
}

/// Fetches every database's tables first and assembles them afterwards.
///
/// # Errors
/// Returns the first unrecoverable catalog error.
pub async fn collect_databases<C>(catalog: &C, options: ListingOptions) -> Result<Vec<Database>>
where
    C: CatalogReader + ?Sized,
{
    log_reserved_options(options);

    let rows = catalog.list_databases(options.sort).await?;
    let mut tables_by_database = Vec::with_capacity(rows.len());
    for row in &rows {
        tracing::info!("Visiting database '{}'", row.name);
        tables_by_database.push(fetch_tables(catalog, &row.name, options).await?);
    }

    Ok(assemble_databases(rows, tables_by_database))
}

fn log_reserved_options(options: ListingOptions) {
    tracing::debug!(
        "Views ({}) and indexes ({}) are not listed yet",
        if options.show_views { "shown" } else { "hidden" },
        if options.show_indexes { "shown" } else { "hidden" },
    );
}
