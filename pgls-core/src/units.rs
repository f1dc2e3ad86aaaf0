//! Human-readable sizes and row counts.
//!
//! Both formatters pick the largest unit whose threshold the value meets and
//! round half-up to a whole number of that unit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary size units, largest first.
const SIZE_UNITS: &[(u64, &str)] = &[
    (1 << 40, "TiB"),
    (1 << 30, "GiB"),
    (1 << 20, "MiB"),
    (1 << 10, "KiB"),
];

/// Decimal row count suffixes, largest first. The suffix never changes with
/// the value: "1 rows" and "1k rows" are the intended output.
const COUNT_UNITS: &[(u64, &str)] = &[
    (1_000_000_000, "kkk rows"),
    (1_000_000, "kk rows"),
    (1_000, "k rows"),
];

/// Divides `value` by `unit`, rounding half-up without overflowing.
/// A zero `unit` leaves `value` unchanged.
const fn div_round(value: u64, unit: u64) -> u64 {
    let (Some(quotient), Some(remainder)) = (value.checked_div(unit), value.checked_rem(unit))
    else {
        return value;
    };
    if remainder >= unit.div_ceil(2) {
        quotient.saturating_add(1)
    } else {
        quotient
    }
}

/// Formats a byte count, e.g. `1536` as `"2 KiB"`.
///
/// ```rust
/// use pgls_core::units::format_size;
///
/// assert_eq!(format_size(0), "0 bytes");
/// assert_eq!(format_size(1024 * 1024 * 128), "128 MiB");
/// ```
pub fn format_size(bytes: u64) -> String {
    SIZE_UNITS
        .iter()
        .find(|(threshold, _)| bytes >= *threshold)
        .map_or_else(
            || format!("{bytes} bytes"),
            |(threshold, suffix)| format!("{} {suffix}", div_round(bytes, *threshold)),
        )
}

/// Formats a row count, e.g. `1500` as `"2k rows"`.
///
/// ```rust
/// use pgls_core::units::format_count;
///
/// assert_eq!(format_count(500), "500 rows");
/// assert_eq!(format_count(3_200), "3k rows");
/// ```
pub fn format_count(count: u64) -> String {
    COUNT_UNITS
        .iter()
        .find(|(threshold, _)| count >= *threshold)
        .map_or_else(
            || format!("{count} rows"),
            |(threshold, suffix)| format!("{}{suffix}", div_round(count, *threshold)),
        )
}

/// Storage size in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeMeasure(u64);

impl SizeMeasure {
    /// Wraps a byte count.
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Converts a catalog value; negative values are clamped to zero.
    pub fn from_catalog(bytes: i64) -> Self {
        Self(u64::try_from(bytes).unwrap_or(0))
    }

    /// The raw byte count.
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Short display form, see [`format_size`].
    pub fn human(self) -> String {
        format_size(self.0)
    }
}

impl fmt::Display for SizeMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human())
    }
}

/// Row count, usually a planner estimate rather than a live count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowCount(u64);

impl RowCount {
    /// Wraps a row count.
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    /// Converts a catalog estimate. `pg_class.reltuples` is `-1` for tables
    /// that were never vacuumed or analyzed; that reads as zero rows.
    pub fn from_catalog(estimate: i64) -> Self {
        Self(u64::try_from(estimate).unwrap_or(0))
    }

    /// The raw count.
    pub const fn count(self) -> u64 {
        self.0
    }

    /// Short display form, see [`format_count`].
    pub fn human(self) -> String {
        format_count(self.0)
    }
}

impl fmt::Display for RowCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human())
    }
}
