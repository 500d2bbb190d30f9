//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use vgsales_common::{LoggingConfig, PlatformFilter, Region, Result, SortOrder, YearRange};

use crate::validator::ConfigValidator;

/// Main configuration structure for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input dataset configuration.
    pub dataset: DatasetConfig,
    /// Dashboard behavior and initial filter state.
    pub dashboard: DashboardConfig,
    /// Chart output configuration.
    pub output: OutputConfig,
    /// Aggregation cache configuration.
    pub cache: CacheConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Input dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path of the delimited sales file.
    pub path: PathBuf,
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: char,
}

/// Dashboard behavior and initial filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Language code for titles and labels (e.g. `en-US`, `pt-BR`).
    pub language: String,
    /// Initial year-range selection; the full valid range when absent.
    pub year_range: Option<YearRange>,
    /// Number of rows in the top games and top genres charts.
    pub top_n: usize,
    /// Sort direction of the top games and top genres charts.
    pub sort_order: SortOrder,
    /// Platforms below this share of a region's total are merged into the
    /// pie chart's OTHERS slice.
    pub others_threshold_percent: f64,
    /// Initial platform selections per region tab.
    pub tabs: BTreeMap<Region, TabSelection>,
}

/// Platform selections of one region tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabSelection {
    /// Platform filter of the top games chart.
    pub games_platform: PlatformFilter,
    /// Platform filter of the top genres chart.
    pub genres_platform: PlatformFilter,
}

/// Output format for rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG bitmaps.
    #[default]
    Png,
    /// SVG documents.
    Svg,
    /// Declarative chart specifications as JSON.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }
}

/// Chart output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one sub-directory per region tab.
    pub directory: PathBuf,
    /// Rendered format.
    pub format: OutputFormat,
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
    /// Background color as `#rrggbb`.
    pub background: String,
    /// Category palette as `#rrggbb` values, cycled across bars and slices.
    pub palette: Vec<String>,
}

/// Aggregation cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether aggregation results are memoized.
    pub enabled: bool,
    /// Maximum number of cached aggregation results.
    pub max_capacity: u64,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }

    /// Initial selection for `region`, defaulting to `All` for both charts.
    #[must_use]
    pub fn tab_selection(&self, region: Region) -> TabSelection {
        self.dashboard.tabs.get(&region).cloned().unwrap_or_default()
    }
}
