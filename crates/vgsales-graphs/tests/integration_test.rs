//! Integration tests for vgsales-graphs

use proptest::prelude::*;
use std::sync::Arc;
use vgsales_common::test_utils::{assert_approx_eq, property_testing::*, sales_fixtures};
use vgsales_common::{PlatformFilter, Region, SalesTable, SortOrder};
use vgsales_graphs::{
    platform_shares, platform_totals, top_games, top_genres, CachedAggregator, ChartSpecBuilder,
    SalesAggregator, SalesQuery, TableAggregator, OTHERS_LABEL,
};
use vgsales_i18n::{Locale, Messages};

fn positive_total(table: &SalesTable, region: Region) -> f64 {
    table.iter().filter_map(|r| r.positive_sales(region)).sum()
}

#[test]
fn test_tab_charts_from_sample_table() {
    let messages = Messages::new(Locale::EnUs).unwrap();
    let builder = ChartSpecBuilder::new(&messages);
    let aggregator = TableAggregator::new(Arc::new(sales_fixtures::sample_table()));
    let query = SalesQuery::new(Region::Japan);

    let pie = builder
        .platform_share(&aggregator.platform_shares(&query, 1.0), 1.0)
        .unwrap();
    let bars = builder
        .platform_totals(&aggregator.platform_totals(&query))
        .unwrap();
    let games = builder
        .top_games(&aggregator.top_games(&query), &query.platform)
        .unwrap();
    let genres = builder.top_genres(&aggregator.top_genres(&query)).unwrap();

    assert_eq!(pie.title, "Sales share");
    assert_eq!(bars.points[0].label, "GB");
    assert_eq!(games.points[0].label, "Pokemon Red/Pokemon Blue");
    assert_eq!(genres.points[0].label, "Role-Playing");
    // X360 and PCFX each hold well under 1% of Japanese sales.
    assert_eq!(pie.points.last().unwrap().label, OTHERS_LABEL);
}

#[test]
fn test_cached_and_plain_aggregators_agree_through_trait() {
    let table = Arc::new(sales_fixtures::sample_table());
    let aggregators: Vec<Box<dyn SalesAggregator>> = vec![
        Box::new(TableAggregator::new(Arc::clone(&table))),
        Box::new(CachedAggregator::new(TableAggregator::new(table), 32)),
    ];
    let query = SalesQuery::new(Region::Global)
        .with_platform(PlatformFilter::from("Wii"))
        .with_order(SortOrder::Ascending);

    let results: Vec<_> = aggregators.iter().map(|a| a.top_games(&query)).collect();
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0][0].name, "Mario Kart Wii");
}

proptest! {
    #[test]
    fn platform_totals_sum_to_region_total(records in records_strategy(60)) {
        let table = SalesTable::new(records);
        let totals = platform_totals(&table, Region::NorthAmerica, &PlatformFilter::All);

        let summed: f64 = totals.iter().map(|p| p.total).sum();
        assert_approx_eq(summed, positive_total(&table, Region::NorthAmerica), 1e-6);
        prop_assert!(totals.iter().all(|p| p.total > 0.0));
        prop_assert!(totals.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn platform_percentages_sum_to_hundred(
        records in records_strategy(60),
        threshold in 0.0f64..20.0,
    ) {
        let table = SalesTable::new(records);
        let shares = platform_shares(&table, Region::Global, &PlatformFilter::All, threshold);

        if shares.is_empty() {
            prop_assert!(positive_total(&table, Region::Global) <= 0.0);
        } else {
            let percent: f64 = shares.iter().map(|s| s.percentage).sum();
            assert_approx_eq(percent, 100.0, 1e-6);
            let others = shares.iter().filter(|s| s.platform == OTHERS_LABEL).count();
            prop_assert!(others <= 1);
            if others == 1 {
                prop_assert_eq!(&shares.last().unwrap().platform, OTHERS_LABEL);
            }
            prop_assert!(shares
                .iter()
                .filter(|s| s.platform != OTHERS_LABEL)
                .all(|s| s.percentage >= threshold));
        }
    }

    #[test]
    fn top_games_respect_limit_and_order(
        records in records_strategy(60),
        limit in 0usize..12,
        ascending in any::<bool>(),
    ) {
        let table = SalesTable::new(records);
        let order = if ascending { SortOrder::Ascending } else { SortOrder::Descending };
        let games = top_games(&table, Region::NorthAmerica, &PlatformFilter::All, order, limit);

        prop_assert!(games.len() <= limit);
        let sorted = games.windows(2).all(|w| match order {
            SortOrder::Descending => w[0].total >= w[1].total,
            SortOrder::Ascending => w[0].total <= w[1].total,
        });
        prop_assert!(sorted);
    }

    #[test]
    fn genres_unique_without_platform_filter(records in records_strategy(60), limit in 1usize..12) {
        let table = SalesTable::new(records);
        let genres = top_genres(&table, Region::Global, &PlatformFilter::All, SortOrder::Descending, limit);

        let mut names: Vec<&str> = genres.iter().map(|g| g.genre.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), genres.len());
        prop_assert!(genres.iter().all(|g| g.platform.is_none()));
    }

    #[test]
    fn platform_filter_restricts_rows(records in records_strategy(60), platform in platform_strategy()) {
        let table = SalesTable::new(records);
        let filter = PlatformFilter::from(platform.as_str());
        let games = top_games(&table, Region::NorthAmerica, &filter, SortOrder::Descending, 100);

        prop_assert!(games.iter().all(|g| g.platform == platform));
    }
}
