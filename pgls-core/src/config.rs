//! Listing configuration shared by the catalog reader, the traversal and the
//! command line.

use crate::error::PglsError;
use std::fmt;
use std::str::FromStr;

/// Ordering applied by the catalog queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Databases by name, tables by schema then name
    #[default]
    Name,
    /// Largest storage size first
    Size,
}

impl SortMode {
    /// All supported modes, in help-text order.
    pub const ALL: [Self; 2] = [Self::Name, Self::Size];

    /// The command-line spelling of this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = PglsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PglsError::configuration(format!(
                    "Unknown sort mode '{s}' (expected one of: name, size)"
                ))
            })
    }
}

/// What to list and in which order.
///
/// Views and indexes are accepted for forward compatibility but are not
/// listed yet; their flags are carried without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Ordering of databases and tables
    pub sort: SortMode,
    /// Fetch and render tables
    pub show_tables: bool,
    /// Fetch and render table columns
    pub show_fields: bool,
    /// Reserved: views are not listed yet
    pub show_views: bool,
    /// Reserved: indexes are not listed yet
    pub show_indexes: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            sort: SortMode::Name,
            show_tables: true,
            show_fields: true,
            show_views: true,
            show_indexes: true,
        }
    }
}

impl ListingOptions {
    /// Creates options with everything shown, sorted by name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort mode.
    pub const fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Shows or hides tables. Hiding tables also skips the column fetch.
    pub const fn with_tables(mut self, show: bool) -> Self {
        self.show_tables = show;
        self
    }

    /// Shows or hides table columns.
    pub const fn with_fields(mut self, show: bool) -> Self {
        self.show_fields = show;
        self
    }

    /// Records the views flag.
    pub const fn with_views(mut self, show: bool) -> Self {
        self.show_views = show;
        self
    }

    /// Records the indexes flag.
    pub const fn with_indexes(mut self, show: bool) -> Self {
        self.show_indexes = show;
        self
    }

    /// Whether the column query has to run for each database.
    pub const fn fetches_columns(&self) -> bool {
        self.show_tables && self.show_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_from_str() {
        assert_eq!("name".parse::<SortMode>().unwrap(), SortMode::Name);
        assert_eq!("SIZE".parse::<SortMode>().unwrap(), SortMode::Size);
        assert_eq!(" size ".parse::<SortMode>().unwrap(), SortMode::Size);
    }

    #[test]
    fn test_unknown_sort_mode_is_rejected() {
        let error = "rows".parse::<SortMode>().unwrap_err();
        assert!(matches!(error, PglsError::Configuration { .. }));
        assert!(error.to_string().contains("'rows'"));
    }

    #[test]
    fn test_sort_mode_display_round_trips() {
        for mode in SortMode::ALL {
            assert_eq!(mode.to_string().parse::<SortMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_listing_options_default_shows_everything() {
        let options = ListingOptions::new();
        assert_eq!(options.sort, SortMode::Name);
        assert!(options.show_tables);
        assert!(options.show_fields);
        assert!(options.show_views);
        assert!(options.show_indexes);
        assert!(options.fetches_columns());
    }

    #[test]
    fn test_hidden_tables_skip_columns() {
        let options = ListingOptions::new().with_tables(false);
        assert!(!options.fetches_columns());

        let options = ListingOptions::new().with_fields(false);
        assert!(options.show_tables);
        assert!(!options.fetches_columns());
    }

    #[test]
    fn test_builder_methods() {
        let options = ListingOptions::new()
            .with_sort(SortMode::Size)
            .with_views(false)
            .with_indexes(false);

        assert_eq!(options.sort, SortMode::Size);
        assert!(!options.show_views);
        assert!(!options.show_indexes);
        assert!(options.show_tables);
    }
}
