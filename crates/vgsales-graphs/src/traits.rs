//! Aggregation trait shared by the plain and the memoizing aggregator.

use crate::aggregator::{GameSales, GenreSales, PlatformSales, PlatformShare, SalesQuery};

/// Source of the four regional breakdowns a dashboard tab displays.
pub trait SalesAggregator {
    /// Total sales per platform, largest first.
    fn platform_totals(&self, query: &SalesQuery) -> Vec<PlatformSales>;

    /// Platform shares with long-tail platforms merged into `OTHERS`.
    fn platform_shares(&self, query: &SalesQuery, threshold_percent: f64) -> Vec<PlatformShare>;

    /// Ranked games, one row per (title, platform).
    fn top_games(&self, query: &SalesQuery) -> Vec<GameSales>;

    /// Ranked genres.
    fn top_genres(&self, query: &SalesQuery) -> Vec<GenreSales>;
}
