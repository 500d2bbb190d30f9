//! Common type definitions for the sales data model.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Keyword used by platform selectors for "no platform filter".
pub const ALL_PLATFORMS: &str = "All";

/// Sales region; each region maps to one sales column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// North America (`NA_Sales`).
    NorthAmerica,
    /// Europe (`EU_Sales`).
    Europe,
    /// Japan (`JP_Sales`).
    Japan,
    /// Rest of the world (`Other_Sales`).
    Other,
    /// Worldwide aggregate (`Global_Sales`).
    Global,
}

impl Region {
    /// Every region, in dashboard tab order.
    pub const ALL: [Self; 5] = [
        Self::NorthAmerica,
        Self::Europe,
        Self::Japan,
        Self::Other,
        Self::Global,
    ];

    /// Name of the dataset column holding this region's sales.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA_Sales",
            Self::Europe => "EU_Sales",
            Self::Japan => "JP_Sales",
            Self::Other => "Other_Sales",
            Self::Global => "Global_Sales",
        }
    }

    /// Stable identifier used in file names and config keys.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::NorthAmerica => "north_america",
            Self::Europe => "europe",
            Self::Japan => "japan",
            Self::Other => "other",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Platform selection applied before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlatformFilter {
    /// No filter.
    #[default]
    All,
    /// Only records of this platform.
    Only(String),
}

impl PlatformFilter {
    /// Returns true when a record of `platform` passes the filter.
    #[must_use]
    pub fn matches(&self, platform: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == platform,
        }
    }

    /// Returns true for the unfiltered selection.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<String> for PlatformFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_PLATFORMS) {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }
}

impl From<&str> for PlatformFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PlatformFilter> for String {
    fn from(value: PlatformFilter) -> Self {
        match value {
            PlatformFilter::All => ALL_PLATFORMS.to_string(),
            PlatformFilter::Only(platform) => platform,
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_PLATFORMS),
            Self::Only(platform) => f.write_str(platform),
        }
    }
}

/// Sort direction for ranked breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest totals first.
    #[default]
    Descending,
    /// Smallest totals first.
    Ascending,
}

/// Inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First year, inclusive.
    pub min: i32,
    /// Last year, inclusive.
    pub max: i32,
}

impl YearRange {
    /// Creates a range from two bounds given in any order.
    #[must_use]
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns true when `year` lies inside the range.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }

    /// Restricts this range to `bounds`. A range that lies entirely outside
    /// collapses onto the nearest bound.
    #[must_use]
    pub fn clamp_to(&self, bounds: &Self) -> Self {
        Self::new(
            self.min.clamp(bounds.min, bounds.max),
            self.max.clamp(bounds.min, bounds.max),
        )
    }

    /// Smallest range covering every year yielded by `years`, if any.
    pub fn spanning(years: impl IntoIterator<Item = i32>) -> Option<Self> {
        years.into_iter().fold(None, |range, year| match range {
            None => Some(Self::new(year, year)),
            Some(r) => Some(Self::new(r.min.min(year), r.max.max(year))),
        })
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// One row of the sales dataset. Sales values are in millions of units and
/// `None` when the column was absent or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Game title.
    pub name: String,
    /// Platform code (e.g. `Wii`, `PS2`).
    pub platform: String,
    /// Release year; 0 marks an unknown year.
    pub year: i32,
    /// Genre.
    pub genre: String,
    /// Publisher.
    pub publisher: String,
    /// North America sales.
    pub na_sales: Option<f64>,
    /// Europe sales.
    pub eu_sales: Option<f64>,
    /// Japan sales.
    pub jp_sales: Option<f64>,
    /// Rest-of-world sales.
    pub other_sales: Option<f64>,
    /// Worldwide sales.
    pub global_sales: Option<f64>,
}

impl SalesRecord {
    /// Raw sales value for `region`.
    #[must_use]
    pub const fn sales(&self, region: Region) -> Option<f64> {
        match region {
            Region::NorthAmerica => self.na_sales,
            Region::Europe => self.eu_sales,
            Region::Japan => self.jp_sales,
            Region::Other => self.other_sales,
            Region::Global => self.global_sales,
        }
    }

    /// Sales value for `region` when present and strictly positive; the only
    /// values that take part in an aggregation.
    #[must_use]
    pub fn positive_sales(&self, region: Region) -> Option<f64> {
        self.sales(region).filter(|value| *value > 0.0)
    }
}

/// Ordered, logically immutable collection of sales records. Filtering
/// produces a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    /// Wraps `records` in load order.
    #[must_use]
    pub const fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order.
    #[must_use]
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Iterates over the records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    /// Derives a table holding only the records accepted by `predicate`.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&SalesRecord) -> bool,
    {
        Self::new(
            self.records
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
        )
    }

    /// Derives a table restricted to records released inside `range`.
    #[must_use]
    pub fn within_years(&self, range: &YearRange) -> Self {
        self.filter(|record| range.contains(record.year))
    }

    /// Distinct platforms in first-appearance order.
    #[must_use]
    pub fn platforms(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert(record.platform.as_str()))
            .map(|record| record.platform.clone())
            .collect()
    }
}

impl FromIterator<SalesRecord> for SalesTable {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
