//! Regional sales aggregation.
//!
//! Every breakdown only sees records whose sales value for the requested
//! region is present and strictly positive. Results are ordered by total,
//! ties broken by key ascending so output is deterministic.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use vgsales_common::{PlatformFilter, Region, SalesRecord, SalesTable, SortOrder, YearRange};

use crate::traits::SalesAggregator;

/// Label of the synthetic slice grouping long-tail platforms.
pub const OTHERS_LABEL: &str = "OTHERS";

/// Default number of rows in ranked breakdowns.
pub const DEFAULT_LIMIT: usize = 10;

/// Total sales of one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSales {
    /// Platform code.
    pub platform: String,
    /// Summed sales, in millions.
    pub total: f64,
}

/// One slice of the platform pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    /// Platform code, or [`OTHERS_LABEL`].
    pub platform: String,
    /// Summed sales, in millions.
    pub total: f64,
    /// Share of the grand total, in percent.
    pub percentage: f64,
}

/// Total sales of one game on one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSales {
    /// Game title.
    pub name: String,
    /// Platform the sales were made on.
    pub platform: String,
    /// Summed sales, in millions.
    pub total: f64,
}

/// Total sales of one genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreSales {
    /// Genre.
    pub genre: String,
    /// Platform when the breakdown was filtered to one; `None` when totals
    /// span every platform.
    pub platform: Option<String>,
    /// Summed sales, in millions.
    pub total: f64,
}

/// Parameters shared by every breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesQuery {
    /// Region whose sales column is summed.
    pub region: Region,
    /// Release-year window; `None` keeps every year.
    pub years: Option<YearRange>,
    /// Platform selection.
    pub platform: PlatformFilter,
    /// Direction of ranked breakdowns.
    pub order: SortOrder,
    /// Maximum rows of ranked breakdowns.
    pub limit: usize,
}

impl SalesQuery {
    /// Query over every year and platform of `region`, descending, top 10.
    #[must_use]
    pub const fn new(region: Region) -> Self {
        Self {
            region,
            years: None,
            platform: PlatformFilter::All,
            order: SortOrder::Descending,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Sets the year window.
    #[must_use]
    pub fn with_years(mut self, years: Option<YearRange>) -> Self {
        self.years = years;
        self
    }

    /// Sets the platform filter.
    #[must_use]
    pub fn with_platform(mut self, platform: PlatformFilter) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

fn compare_totals(a: f64, b: f64, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Descending => b.total_cmp(&a),
        SortOrder::Ascending => a.total_cmp(&b),
    }
}

/// Sums positive `region` sales of the records passing `filter`, grouped by
/// `key`. Records without a known release year (year <= 0) never count.
/// Groups keep first-appearance order of their keys in the input.
fn sum_by<'a, K, F>(
    table: &'a SalesTable,
    region: Region,
    filter: &PlatformFilter,
    key: F,
) -> Vec<(K, f64)>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(&'a SalesRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, f64)> = Vec::new();

    let counted = table
        .iter()
        .filter(|record| record.year > 0 && filter.matches(&record.platform));
    for record in counted {
        let Some(value) = record.positive_sales(region) else {
            continue;
        };
        let group = key(record);
        match index.get(&group) {
            Some(&slot) => groups[slot].1 += value,
            None => {
                index.insert(group.clone(), groups.len());
                groups.push((group, value));
            }
        }
    }

    groups
}

/// Total sales per platform, largest first. Platforms without positive
/// sales are absent.
#[instrument(skip(table), fields(records = table.len()))]
pub fn platform_totals(
    table: &SalesTable,
    region: Region,
    filter: &PlatformFilter,
) -> Vec<PlatformSales> {
    let mut totals: Vec<PlatformSales> = sum_by(table, region, filter, |r| r.platform.as_str())
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(platform, total)| PlatformSales {
            platform: platform.to_string(),
            total,
        })
        .collect();

    totals.sort_by(|a, b| {
        compare_totals(a.total, b.total, SortOrder::Descending)
            .then_with(|| a.platform.cmp(&b.platform))
    });

    debug!("{} platforms with sales in {}", totals.len(), region);
    totals
}

/// Platform shares of the grand total. Platforms whose share is below
/// `threshold_percent` are merged into a trailing [`OTHERS_LABEL`] slice,
/// which is present only when something was merged.
#[instrument(skip(table), fields(records = table.len()))]
pub fn platform_shares(
    table: &SalesTable,
    region: Region,
    filter: &PlatformFilter,
    threshold_percent: f64,
) -> Vec<PlatformShare> {
    let totals = platform_totals(table, region, filter);
    let grand_total: f64 = totals.iter().map(|p| p.total).sum();
    if grand_total <= 0.0 {
        return Vec::new();
    }

    let mut shares = Vec::with_capacity(totals.len() + 1);
    let mut others_total = 0.0;
    let mut merged = 0usize;

    for PlatformSales { platform, total } in totals {
        let percentage = total / grand_total * 100.0;
        if percentage < threshold_percent {
            others_total += total;
            merged += 1;
        } else {
            shares.push(PlatformShare {
                platform,
                total,
                percentage,
            });
        }
    }

    if merged > 0 {
        debug!("Merged {} platforms into {}", merged, OTHERS_LABEL);
        shares.push(PlatformShare {
            platform: OTHERS_LABEL.to_string(),
            total: others_total,
            percentage: others_total / grand_total * 100.0,
        });
    }

    shares
}

/// Best (or worst, for [`SortOrder::Ascending`]) selling games. A title sold
/// on several platforms yields one row per platform.
#[instrument(skip(table), fields(records = table.len()))]
pub fn top_games(
    table: &SalesTable,
    region: Region,
    filter: &PlatformFilter,
    order: SortOrder,
    limit: usize,
) -> Vec<GameSales> {
    let mut games: Vec<GameSales> = sum_by(table, region, filter, |r| {
        (r.name.as_str(), r.platform.as_str())
    })
    .into_iter()
    .map(|((name, platform), total)| GameSales {
        name: name.to_string(),
        platform: platform.to_string(),
        total,
    })
    .collect();

    games.sort_by(|a, b| {
        compare_totals(a.total, b.total, order)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.platform.cmp(&b.platform))
    });
    games.truncate(limit);
    games
}

/// Best (or worst) selling genres. With [`PlatformFilter::All`] each genre
/// appears once with its total across platforms.
#[instrument(skip(table), fields(records = table.len()))]
pub fn top_genres(
    table: &SalesTable,
    region: Region,
    filter: &PlatformFilter,
    order: SortOrder,
    limit: usize,
) -> Vec<GenreSales> {
    let platform = match filter {
        PlatformFilter::All => None,
        PlatformFilter::Only(platform) => Some(platform),
    };

    let mut genres: Vec<GenreSales> = sum_by(table, region, filter, |r| r.genre.as_str())
        .into_iter()
        .map(|(genre, total)| GenreSales {
            genre: genre.to_string(),
            platform: platform.cloned(),
            total,
        })
        .collect();

    genres.sort_by(|a, b| compare_totals(a.total, b.total, order).then_with(|| a.genre.cmp(&b.genre)));
    genres.truncate(limit);
    genres
}

/// [`SalesAggregator`] over an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct TableAggregator {
    table: Arc<SalesTable>,
}

impl TableAggregator {
    /// Aggregates over `table`.
    #[must_use]
    pub const fn new(table: Arc<SalesTable>) -> Self {
        Self { table }
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    fn scoped(&self, years: Option<&YearRange>) -> std::borrow::Cow<'_, SalesTable> {
        match years {
            Some(range) => std::borrow::Cow::Owned(self.table.within_years(range)),
            None => std::borrow::Cow::Borrowed(self.table.as_ref()),
        }
    }
}

impl SalesAggregator for TableAggregator {
    fn platform_totals(&self, query: &SalesQuery) -> Vec<PlatformSales> {
        platform_totals(
            &self.scoped(query.years.as_ref()),
            query.region,
            &query.platform,
        )
    }

    fn platform_shares(&self, query: &SalesQuery, threshold_percent: f64) -> Vec<PlatformShare> {
        platform_shares(
            &self.scoped(query.years.as_ref()),
            query.region,
            &query.platform,
            threshold_percent,
        )
    }

    fn top_games(&self, query: &SalesQuery) -> Vec<GameSales> {
        top_games(
            &self.scoped(query.years.as_ref()),
            query.region,
            &query.platform,
            query.order,
            query.limit,
        )
    }

    fn top_genres(&self, query: &SalesQuery) -> Vec<GenreSales> {
        top_genres(
            &self.scoped(query.years.as_ref()),
            query.region,
            &query.platform,
            query.order,
            query.limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgsales_common::test_utils::{assert_approx_eq, sales_fixtures::*};

    #[test]
    fn test_unknown_year_records_are_ignored() {
        let table = SalesTable::new(vec![
            record("A", "Wii", 2006, "Sports", 1.0),
            record("B", "DS", 0, "Misc", 5.0),
            record("C", "DS", -3, "Misc", 2.0),
        ]);
        let region = Region::NorthAmerica;

        let totals = platform_totals(&table, region, &PlatformFilter::All);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].platform, "Wii");

        let shares = platform_shares(&table, region, &PlatformFilter::All, 1.0);
        assert_eq!(shares.len(), 1);
        assert_approx_eq(shares[0].percentage, 100.0, 1e-9);

        let games = top_games(&table, region, &PlatformFilter::All, SortOrder::Descending, 10);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "A");

        let genres = top_genres(&table, region, &PlatformFilter::from("DS"), SortOrder::Descending, 10);
        assert!(genres.is_empty());

        let aggregator = TableAggregator::new(Arc::new(table));
        let query = SalesQuery::new(region);
        assert_eq!(aggregator.platform_totals(&query), totals);
    }

    #[test]
    fn test_same_title_on_two_platforms_stays_split() {
        let table = SalesTable::new(vec![
            record("Tetris", "GB", 1989, "Puzzle", 1.0),
            record("Tetris", "NES", 1988, "Puzzle", 2.0),
        ]);

        let games = top_games(
            &table,
            Region::NorthAmerica,
            &PlatformFilter::All,
            SortOrder::Descending,
            10,
        );

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].platform, "NES");
        assert_approx_eq(games[0].total, 2.0, 1e-9);
        assert_eq!(games[1].platform, "GB");
        assert_approx_eq(games[1].total, 1.0, 1e-9);
    }

    #[test]
    fn test_non_positive_sales_give_empty_breakdowns() {
        let table = SalesTable::new(vec![
            record("A", "Wii", 2006, "Sports", 0.0),
            record("B", "DS", 2007, "Misc", -1.0),
        ]);

        assert!(platform_totals(&table, Region::NorthAmerica, &PlatformFilter::All).is_empty());
        assert!(platform_shares(&table, Region::NorthAmerica, &PlatformFilter::All, 1.0).is_empty());
        assert!(top_games(
            &table,
            Region::NorthAmerica,
            &PlatformFilter::All,
            SortOrder::Descending,
            10
        )
        .is_empty());
    }

    #[test]
    fn test_absent_region_values_are_excluded() {
        let table = SalesTable::new(vec![record("A", "Wii", 2006, "Sports", 5.0)]);
        // The fixture only populates North America and Global.
        assert!(platform_totals(&table, Region::Europe, &PlatformFilter::All).is_empty());
        assert_eq!(platform_totals(&table, Region::Global, &PlatformFilter::All).len(), 1);
    }

    #[test]
    fn test_platform_totals_sorted_descending() {
        let totals = platform_totals(&sample_table(), Region::NorthAmerica, &PlatformFilter::All);
        let platforms: Vec<&str> = totals.iter().map(|p| p.platform.as_str()).collect();

        assert_eq!(platforms, ["Wii", "GB", "NES", "X360", "PS3", "DS", "PS"]);
        assert_approx_eq(totals[0].total, 41.49 + 15.85, 1e-9);
    }

    #[test]
    fn test_long_tail_merged_into_others() {
        let table = SalesTable::new(vec![
            record("A", "Wii", 2006, "Sports", 90.0),
            record("B", "DS", 2006, "Misc", 9.5),
            record("C", "NGage", 2004, "Misc", 0.3),
            record("D", "PCFX", 1996, "Misc", 0.2),
        ]);

        let shares = platform_shares(&table, Region::NorthAmerica, &PlatformFilter::All, 1.0);

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].platform, "Wii");
        assert_eq!(shares[2].platform, OTHERS_LABEL);
        assert_approx_eq(shares[2].total, 0.5, 1e-9);
        assert_approx_eq(shares[2].percentage, 0.5, 1e-9);
        assert_approx_eq(shares.iter().map(|s| s.percentage).sum(), 100.0, 1e-9);
    }

    #[test]
    fn test_no_others_slice_when_nothing_merged() {
        let table = SalesTable::new(vec![
            record("A", "Wii", 2006, "Sports", 3.0),
            record("B", "DS", 2006, "Misc", 1.0),
        ]);

        let shares = platform_shares(&table, Region::NorthAmerica, &PlatformFilter::All, 1.0);
        assert!(shares.iter().all(|s| s.platform != OTHERS_LABEL));
        assert_approx_eq(shares[1].percentage, 25.0, 1e-9);
    }

    #[test]
    fn test_genres_collapse_across_platforms_before_truncation() {
        let table = SalesTable::new(vec![
            record("A", "Wii", 2006, "Sports", 3.0),
            record("B", "DS", 2006, "Sports", 3.0),
            record("C", "DS", 2006, "Puzzle", 5.0),
        ]);

        let genres = top_genres(
            &table,
            Region::NorthAmerica,
            &PlatformFilter::All,
            SortOrder::Descending,
            1,
        );

        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].genre, "Sports");
        assert_eq!(genres[0].platform, None);
        assert_approx_eq(genres[0].total, 6.0, 1e-9);
    }

    #[test]
    fn test_genres_for_one_platform_keep_platform() {
        let genres = top_genres(
            &sample_table(),
            Region::NorthAmerica,
            &PlatformFilter::from("GB"),
            SortOrder::Descending,
            10,
        );

        assert_eq!(genres.len(), 2);
        assert_eq!(genres[0].genre, "Puzzle");
        assert!(genres.iter().all(|g| g.platform.as_deref() == Some("GB")));
    }

    #[test]
    fn test_ascending_order_and_ties() {
        let table = SalesTable::new(vec![
            record("Zelda", "NES", 1986, "Adventure", 1.0),
            record("Asteroids", "2600", 1980, "Shooter", 1.0),
            record("Pong", "2600", 1977, "Sports", 0.5),
        ]);

        let games = top_games(
            &table,
            Region::NorthAmerica,
            &PlatformFilter::All,
            SortOrder::Ascending,
            10,
        );
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Pong", "Asteroids", "Zelda"]);
    }

    #[test]
    fn test_table_aggregator_applies_year_window() {
        let aggregator = TableAggregator::new(Arc::new(sample_table()));
        let query = SalesQuery::new(Region::NorthAmerica)
            .with_years(Some(YearRange::new(2005, 2010)))
            .with_limit(2);

        let games = aggregator.top_games(&query);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].name, "Wii Sports");
        assert_eq!(games[1].name, "Mario Kart Wii");

        let platforms: Vec<String> = aggregator
            .platform_totals(&query)
            .into_iter()
            .map(|p| p.platform)
            .collect();
        assert_eq!(platforms, ["Wii", "DS"]);
    }
}
