//! Memoizing aggregator backed by a `moka` cache.

use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument};

use crate::aggregator::{
    GameSales, GenreSales, PlatformSales, PlatformShare, SalesQuery, TableAggregator,
};
use crate::traits::SalesAggregator;

/// Breakdown kind, part of every cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakdownKind {
    /// Platform totals.
    PlatformTotals,
    /// Platform shares; carries the threshold's bit pattern.
    PlatformShares(u64),
    /// Ranked games.
    TopGames,
    /// Ranked genres.
    TopGenres,
}

/// Cache key: the breakdown kind plus the complete query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Breakdown kind.
    pub kind: BreakdownKind,
    /// Query the result was computed for.
    pub query: SalesQuery,
}

#[derive(Debug, Clone)]
enum CachedData {
    PlatformTotals(Vec<PlatformSales>),
    PlatformShares(Vec<PlatformShare>),
    TopGames(Vec<GameSales>),
    TopGenres(Vec<GenreSales>),
}

/// Hit and miss counters of a [`CachedAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to aggregate.
    pub misses: u64,
}

/// [`SalesAggregator`] that memoizes every breakdown by its full query.
pub struct CachedAggregator {
    inner: TableAggregator,
    cache: Cache<CacheKey, CachedData>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for CachedAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedAggregator")
            .field("entries", &self.cache.entry_count())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl CachedAggregator {
    /// Wraps `inner` with a cache holding up to `max_capacity` results.
    #[must_use]
    pub fn new(inner: TableAggregator, max_capacity: u64) -> Self {
        info!("Aggregation cache enabled, capacity {}", max_capacity);
        Self {
            inner,
            cache: Cache::new(max_capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Current hit and miss counts.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of cached results.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drops every cached result.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        debug!("Aggregation cache cleared");
    }

    fn lookup<F>(&self, key: CacheKey, compute: F) -> CachedData
    where
        F: FnOnce(&TableAggregator) -> CachedData,
    {
        if let Some(data) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for {:?}", key.kind);
            return data;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for {:?}", key.kind);
        let data = compute(&self.inner);
        self.cache.insert(key, data.clone());
        data
    }
}

impl SalesAggregator for CachedAggregator {
    #[instrument(skip(self))]
    fn platform_totals(&self, query: &SalesQuery) -> Vec<PlatformSales> {
        let key = CacheKey {
            kind: BreakdownKind::PlatformTotals,
            query: query.clone(),
        };
        match self.lookup(key, |inner| {
            CachedData::PlatformTotals(inner.platform_totals(query))
        }) {
            CachedData::PlatformTotals(data) => data,
            _ => self.inner.platform_totals(query),
        }
    }

    #[instrument(skip(self))]
    fn platform_shares(&self, query: &SalesQuery, threshold_percent: f64) -> Vec<PlatformShare> {
        let key = CacheKey {
            kind: BreakdownKind::PlatformShares(threshold_percent.to_bits()),
            query: query.clone(),
        };
        match self.lookup(key, |inner| {
            CachedData::PlatformShares(inner.platform_shares(query, threshold_percent))
        }) {
            CachedData::PlatformShares(data) => data,
            _ => self.inner.platform_shares(query, threshold_percent),
        }
    }

    #[instrument(skip(self))]
    fn top_games(&self, query: &SalesQuery) -> Vec<GameSales> {
        let key = CacheKey {
            kind: BreakdownKind::TopGames,
            query: query.clone(),
        };
        match self.lookup(key, |inner| CachedData::TopGames(inner.top_games(query))) {
            CachedData::TopGames(data) => data,
            _ => self.inner.top_games(query),
        }
    }

    #[instrument(skip(self))]
    fn top_genres(&self, query: &SalesQuery) -> Vec<GenreSales> {
        let key = CacheKey {
            kind: BreakdownKind::TopGenres,
            query: query.clone(),
        };
        match self.lookup(key, |inner| CachedData::TopGenres(inner.top_genres(query))) {
            CachedData::TopGenres(data) => data,
            _ => self.inner.top_genres(query),
        }
    }
}
