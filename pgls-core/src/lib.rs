//! Core library for pgls, a read-only PostgreSQL catalog inspector.
//!
//! pgls connects to a server, enumerates its databases, tables and columns,
//! and prints them as an indented, colorized tree annotated with sizes and
//! row estimates.
//!
//! # Guarantees
//! - Only catalog views are queried; user data is never read
//! - Every connection is opened read-only and closed after a single query
//! - Passwords in connection strings never appear in logs or errors
//!
//! # Architecture
//! The library is a linear pipeline:
//! - [`catalog`] reads raw, typed catalog rows (one connection per call)
//! - [`assemble`] joins rows into the [`models`] object graph
//! - [`walk`] drives the reader and assembler one database at a time
//! - [`render`] prints each database subtree as soon as it is assembled

pub mod assemble;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod units;
pub mod walk;

// Re-export commonly used types
pub use catalog::{CatalogReader, ColumnRow, DatabaseRow, ServerDsn, TableRow};
#[cfg(feature = "postgresql")]
pub use catalog::postgres::PgCatalog;
pub use config::{ListingOptions, SortMode};
pub use error::{PglsError, Result};
pub use logging::init_logging;
pub use models::{Database, Field, Table};
pub use render::{Palette, TreeRenderer};
pub use units::{RowCount, SizeMeasure, format_count, format_size};
pub use walk::{collect_databases, walk_databases};
