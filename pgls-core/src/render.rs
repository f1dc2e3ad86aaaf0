//! Indented tree output.
//!
//! Nodes are printed depth-first, pre-order: the node line, its description
//! (if any), then its children. Each level is indented by two spaces.
//!
//! ```text
//! • shop (7 MiB) (database)
//!   Storefront
//!
//!   • public.orders (2 MiB, 12k rows) (table)
//!     • id | bigint
//!     • note | text (nullable)
//! ```

use crate::error::{PglsError, Result};
use crate::models::{Database, Field, Table};
use colored::{Color, Colorize};
use std::io::{self, Write};

const INDENT: &str = "  ";
const BULLET: &str = "• ";

/// Colors for each kind of text in the tree; `None` leaves text unstyled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Database names
    pub database: Option<Color>,
    /// `schema.table` names
    pub table: Option<Color>,
    /// Field names
    pub field: Option<Color>,
    /// Sizes, row counts, node kinds and descriptions
    pub annotation: Option<Color>,
    /// The nullable marker
    pub warning: Option<Color>,
}

impl Palette {
    /// No escape sequences at all.
    pub const fn plain() -> Self {
        Self {
            database: None,
            table: None,
            field: None,
            annotation: None,
            warning: None,
        }
    }

    /// Terminal colors. Whether escapes are emitted is still subject to
    /// `colored`'s terminal and `NO_COLOR` detection.
    pub const fn colored() -> Self {
        Self {
            database: Some(Color::Cyan),
            table: Some(Color::Blue),
            field: Some(Color::Green),
            annotation: Some(Color::BrightWhite),
            warning: Some(Color::Red),
        }
    }

    fn paint(text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) => text.color(color).to_string(),
            None => text.to_string(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}

/// Writes database subtrees to `out`.
#[derive(Debug)]
pub struct TreeRenderer<W> {
    out: W,
    palette: Palette,
}

impl<W: Write> TreeRenderer<W> {
    /// Creates a renderer writing to `out` with `palette`.
    pub const fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    /// Writes one database with all its tables and fields, then flushes so
    /// the subtree is visible before the next database is fetched.
    ///
    /// # Errors
    /// Returns an I/O error if writing to the output fails.
    pub fn render_database(&mut self, database: &Database) -> Result<()> {
        self.database(database, 0)
            .and_then(|()| self.out.flush())
            .map_err(|e| {
                PglsError::io(format!("Failed to write database '{}'", database.name), e)
            })
    }

    /// Gives back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn indent(&mut self, depth: usize) -> io::Result<()> {
        write!(self.out, "{}", INDENT.repeat(depth))
    }

    fn description(&mut self, description: Option<&str>, depth: usize) -> io::Result<()> {
        let Some(description) = description else {
            return Ok(());
        };
        self.indent(depth)?;
        writeln!(self.out, "{}", Palette::paint(description, self.palette.annotation))?;
        writeln!(self.out)
    }

    fn database(&mut self, database: &Database, depth: usize) -> io::Result<()> {
        let palette = self.palette;
        self.indent(depth)?;
        writeln!(
            self.out,
            "{BULLET}{} {} {}",
            Palette::paint(&database.name, palette.database),
            Palette::paint(&format!("({})", database.size), palette.annotation),
            Palette::paint("(database)", palette.annotation),
        )?;

        self.description(database.description.as_deref(), depth.saturating_add(1))?;

        for table in &database.tables {
            self.table(table, depth.saturating_add(1))?;
        }
        Ok(())
    }

    fn table(&mut self, table: &Table, depth: usize) -> io::Result<()> {
        let palette = self.palette;
        self.indent(depth)?;
        writeln!(
            self.out,
            "{BULLET}{} {} {}",
            Palette::paint(&table.qualified_name(), palette.table),
            Palette::paint(&format!("({}, {})", table.size, table.rows), palette.annotation),
            Palette::paint("(table)", palette.annotation),
        )?;

        self.description(table.description.as_deref(), depth.saturating_add(1))?;

        for field in &table.fields {
            self.field(field, depth.saturating_add(1))?;
        }
        Ok(())
    }

    fn field(&mut self, field: &Field, depth: usize) -> io::Result<()> {
        let palette = self.palette;
        self.indent(depth)?;
        write!(
            self.out,
            "{BULLET}{} | {}",
            Palette::paint(&field.name, palette.field),
            field.data_type,
        )?;
        if field.nullable {
            write!(self.out, " {}", Palette::paint("(nullable)", palette.warning))?;
        }
        writeln!(self.out)
    }
}

/// Writes `databases` as one pretty-printed JSON array.
///
/// # Errors
/// Returns an I/O error if writing fails, or a serialization error if the
/// graph cannot be encoded.
pub fn write_snapshot<W: Write>(mut out: W, databases: &[Database]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, databases).map_err(|e| {
        if e.is_io() {
            PglsError::io("Failed to write snapshot", io::Error::from(e))
        } else {
            PglsError::Serialization {
                context: "Failed to encode databases".to_string(),
                source: e,
            }
        }
    })?;

    writeln!(out)
        .and_then(|()| out.flush())
        .map_err(|e| PglsError::io("Failed to write snapshot", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{RowCount, SizeMeasure};

    fn field(name: &str, data_type: &str, nullable: bool) -> Field {
        Field {
            name: name.to_string(),
            description: None,
            data_type: data_type.to_string(),
            default: None,
            nullable,
        }
    }

    fn shop() -> Database {
        Database {
            name: "shop".to_string(),
            description: Some("Storefront".to_string()),
            owner: "shop_owner".to_string(),
            size: SizeMeasure::new(7 * 1024 * 1024),
            tables: vec![
                Table {
                    schema: "public".to_string(),
                    name: "orders".to_string(),
                    description: None,
                    size: SizeMeasure::new(2 * 1024 * 1024),
                    rows: RowCount::new(12_000),
                    fields: vec![field("id", "bigint", false), field("note", "text", true)],
                },
                Table {
                    schema: "audit".to_string(),
                    name: "events".to_string(),
                    description: Some("Append-only log".to_string()),
                    size: SizeMeasure::new(512),
                    rows: RowCount::new(3),
                    fields: vec![field("at", "timestamp with time zone", false)],
                },
            ],
        }
    }

    fn render_plain(database: &Database) -> String {
        let mut renderer = TreeRenderer::new(Vec::new(), Palette::plain());
        renderer.render_database(database).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_render_plain_tree() {
        let expected = "\
• shop (7 MiB) (database)
  Storefront

  • public.orders (2 MiB, 12k rows) (table)
    • id | bigint
    • note | text (nullable)
  • audit.events (512 bytes, 3 rows) (table)
    Append-only log

    • at | timestamp with time zone
";
        assert_eq!(render_plain(&shop()), expected);
    }

    #[test]
    fn test_render_database_without_tables() {
        let database = Database {
            name: "locked".to_string(),
            description: None,
            owner: "admin".to_string(),
            size: SizeMeasure::new(0),
            tables: Vec::new(),
        };
        assert_eq!(render_plain(&database), "• locked (0 bytes) (database)\n");
    }

    #[test]
    fn test_nullable_marker_only_on_nullable_fields() {
        let output = render_plain(&shop());
        for line in output.lines().filter(|line| line.contains(" | ")) {
            let nullable = line.contains("note");
            assert_eq!(line.ends_with(" (nullable)"), nullable, "line: {line}");
        }
    }

    #[test]
    fn test_plain_palette_emits_no_escapes() {
        assert!(!render_plain(&shop()).contains('\u{1b}'));
    }

    #[test]
    fn test_colored_palette_emits_escapes() {
        colored::control::set_override(true);
        let mut renderer = TreeRenderer::new(Vec::new(), Palette::colored());
        renderer.render_database(&shop()).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(output.contains(&"shop".cyan().to_string()));
        assert!(output.contains(&"public.orders".blue().to_string()));
        assert!(output.contains(&"(nullable)".red().to_string()));
    }

    #[test]
    fn test_write_snapshot() {
        let mut out = Vec::new();
        write_snapshot(&mut out, &[shop()]).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["name"], "shop");
        assert_eq!(json[0]["owner"], "shop_owner");
        assert_eq!(json[0]["tables"][1]["schema"], "audit");
        assert_eq!(json[0]["tables"][0]["fields"][1]["nullable"], true);
        assert!(out.ends_with(b"\n"));
    }

    #[test]
    fn test_write_snapshot_of_nothing() {
        let mut out = Vec::new();
        write_snapshot(&mut out, &[]).unwrap();
        assert_eq!(out, b"[]\n");
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut renderer = TreeRenderer::new(Broken, Palette::plain());
        let error = renderer.render_database(&shop()).unwrap_err();
        assert!(matches!(error, PglsError::Io { .. }));
        assert!(error.to_string().contains("'shop'"));
    }
}
