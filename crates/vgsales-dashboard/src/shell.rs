//! Headless dashboard shell: filter state, control handling and views.
//!
//! The shell holds one year-range selection shared by every tab and a pair
//! of platform selections per region tab. Each [`Control`] goes through
//! [`Dashboard::apply`]; views are recomputed from scratch on every render.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use vgsales_common::{
    PlatformFilter, Region, Result, SalesError, SalesTable, SortOrder, YearRange, ALL_PLATFORMS,
};
use vgsales_config::{Config, TabSelection};
use vgsales_data::NormalizedTable;
use vgsales_graphs::{
    CachedAggregator, ChartSpec, ChartSpecBuilder, SalesAggregator, SalesQuery, TableAggregator,
};
use vgsales_i18n::Messages;

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Moves the year slider. Out-of-bounds years are clamped.
    SetYearRange(YearRange),
    /// Changes the platform of a tab's top games chart.
    SelectGamesPlatform(Region, PlatformFilter),
    /// Changes the platform of a tab's top genres chart.
    SelectGenresPlatform(Region, PlatformFilter),
}

/// Analysis knobs fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    /// Rows of the ranked charts.
    pub top_n: usize,
    /// Direction of the ranked charts.
    pub sort_order: SortOrder,
    /// Long-tail threshold of the pie chart, in percent.
    pub others_threshold_percent: f64,
}

impl DashboardSettings {
    /// Settings taken from the dashboard section of `config`.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            top_n: config.dashboard.top_n,
            sort_order: config.dashboard.sort_order,
            others_threshold_percent: config.dashboard.others_threshold_percent,
        }
    }
}

/// Current filter selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    /// Selected years; `None` when the dataset has no valid year.
    pub years: Option<YearRange>,
    /// Platform selections per tab.
    pub tabs: BTreeMap<Region, TabSelection>,
}

impl DashboardState {
    /// Selections of `region`'s tab.
    #[must_use]
    pub fn tab(&self, region: Region) -> TabSelection {
        self.tabs.get(&region).cloned().unwrap_or_default()
    }
}

/// State of the year-range control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearControl {
    /// Control label.
    pub label: String,
    /// Selectable years.
    pub bounds: Option<YearRange>,
    /// Selected years.
    pub selected: Option<YearRange>,
    /// Whether the control accepts input.
    pub enabled: bool,
    /// Shown instead of the slider when disabled.
    pub notice: Option<String>,
}

/// One rendered region tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    /// Region of the tab.
    pub region: Region,
    /// Localized tab title.
    pub name: String,
    /// Localized heading above the charts.
    pub heading: String,
    /// Label of both platform selectors.
    pub platform_label: String,
    /// Values of both platform selectors, `All` first. Each value parses
    /// back into the matching [`PlatformFilter`].
    pub platform_options: Vec<String>,
    /// Localized caption of the `All` option.
    pub all_platforms_label: String,
    /// Current selection of the games selector.
    pub games_platform: PlatformFilter,
    /// Current selection of the genres selector.
    pub genres_platform: PlatformFilter,
    /// Platform share pie chart.
    pub platform_share: ChartSpec,
    /// Platform totals bar chart.
    pub platform_totals: ChartSpec,
    /// Top games bar chart.
    pub top_games: ChartSpec,
    /// Top genres bar chart.
    pub top_genres: ChartSpec,
}

impl TabView {
    /// The four charts with their file stems, in display order.
    #[must_use]
    pub fn charts(&self) -> [(&'static str, &ChartSpec); 4] {
        [
            ("platform_share", &self.platform_share),
            ("platform_totals", &self.platform_totals),
            ("top_games", &self.top_games),
            ("top_genres", &self.top_genres),
        ]
    }
}

/// The whole rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Page title.
    pub title: String,
    /// Banner shown when rows were dropped for lacking a release year.
    pub warning: Option<String>,
    /// Year-range control.
    pub year_control: YearControl,
    /// Region tabs in display order.
    pub tabs: Vec<TabView>,
    /// Footer text.
    pub footer: String,
}

/// Message key of a region's localized name.
#[must_use]
pub const fn region_message_key(region: Region) -> &'static str {
    match region {
        Region::NorthAmerica => "region-north-america",
        Region::Europe => "region-europe",
        Region::Japan => "region-japan",
        Region::Other => "region-other",
        Region::Global => "region-global",
    }
}

/// The dashboard.
pub struct Dashboard {
    table: Arc<SalesTable>,
    aggregator: Box<dyn SalesAggregator>,
    bounds: Option<YearRange>,
    dropped: usize,
    messages: Messages,
    settings: DashboardSettings,
    state: DashboardState,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("records", &self.table.len())
            .field("bounds", &self.bounds)
            .field("dropped", &self.dropped)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Builds the dashboard over `normalized` with the initial selections of
    /// `config`. An initial year range is clamped to the valid years; initial
    /// platforms that do not occur in the selected years fall back to `All`.
    ///
    /// # Errors
    ///
    /// Fails when the localized messages cannot be loaded.
    #[instrument(skip_all, fields(records = normalized.table.len()))]
    pub fn new(normalized: NormalizedTable, config: &Config) -> Result<Self> {
        let NormalizedTable {
            table,
            year_range: bounds,
            dropped,
        } = normalized;
        let table = Arc::new(table);

        let inner = TableAggregator::new(Arc::clone(&table));
        let aggregator: Box<dyn SalesAggregator> = if config.cache.enabled {
            Box::new(CachedAggregator::new(inner, config.cache.max_capacity))
        } else {
            Box::new(inner)
        };

        let years = match (bounds, config.dashboard.year_range) {
            (Some(bounds), Some(initial)) => Some(initial.clamp_to(&bounds)),
            (bounds, _) => bounds,
        };

        let mut dashboard = Self {
            table,
            aggregator,
            bounds,
            dropped,
            messages: Messages::for_language(&config.dashboard.language)?,
            settings: DashboardSettings::from_config(config),
            state: DashboardState {
                years,
                tabs: BTreeMap::new(),
            },
        };

        for region in Region::ALL {
            let selection = config.tab_selection(region);
            let checked = TabSelection {
                games_platform: dashboard.known_or_all(selection.games_platform),
                genres_platform: dashboard.known_or_all(selection.genres_platform),
            };
            dashboard.state.tabs.insert(region, checked);
        }

        info!(
            "Dashboard ready: {} records, years {}",
            dashboard.table.len(),
            years.map_or_else(|| "none".to_string(), |y| y.to_string())
        );
        Ok(dashboard)
    }

    /// Current selections.
    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Valid release years of the dataset.
    #[must_use]
    pub const fn year_bounds(&self) -> Option<YearRange> {
        self.bounds
    }

    /// Rows dropped for lacking a release year.
    #[must_use]
    pub const fn dropped_rows(&self) -> usize {
        self.dropped
    }

    /// Localized messages in use.
    #[must_use]
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Platforms released in the selected years, in first-appearance order.
    #[must_use]
    pub fn platforms(&self) -> Vec<String> {
        match &self.state.years {
            Some(years) => self.table.within_years(years).platforms(),
            None => self.table.platforms(),
        }
    }

    fn is_known(&self, filter: &PlatformFilter) -> bool {
        match filter {
            PlatformFilter::All => true,
            PlatformFilter::Only(platform) => self.platforms().iter().any(|p| p == platform),
        }
    }

    fn known_or_all(&self, filter: PlatformFilter) -> PlatformFilter {
        if self.is_known(&filter) {
            filter
        } else {
            warn!("Platform '{}' has no releases in the selected years, using All", filter);
            PlatformFilter::All
        }
    }

    /// Applies one control change and returns the tabs needing a re-render.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] and leaves the state unchanged when
    /// the year control is disabled or a selector names a platform absent
    /// from the selected years.
    #[instrument(skip(self))]
    pub fn apply(&mut self, control: Control) -> Result<Vec<Region>> {
        match control {
            Control::SetYearRange(requested) => {
                let bounds = self.bounds.ok_or_else(|| {
                    SalesError::validation_field(
                        "Year filter is disabled: the dataset has no valid release year",
                        "year_range",
                    )
                })?;
                let years = requested.clamp_to(&bounds);
                if years != requested {
                    debug!("Clamped year range {} to {}", requested, years);
                }
                self.state.years = Some(years);

                // Selections no longer offered by the selectors reset to All.
                let available = self.platforms();
                for selection in self.state.tabs.values_mut() {
                    for filter in [&mut selection.games_platform, &mut selection.genres_platform] {
                        if let PlatformFilter::Only(platform) = filter {
                            if !available.contains(platform) {
                                debug!("Resetting platform '{}' to All", platform);
                                *filter = PlatformFilter::All;
                            }
                        }
                    }
                }
                Ok(Region::ALL.to_vec())
            }
            Control::SelectGamesPlatform(region, filter) => {
                self.check_platform(&filter)?;
                self.state.tabs.entry(region).or_default().games_platform = filter;
                Ok(vec![region])
            }
            Control::SelectGenresPlatform(region, filter) => {
                self.check_platform(&filter)?;
                self.state.tabs.entry(region).or_default().genres_platform = filter;
                Ok(vec![region])
            }
        }
    }

    fn check_platform(&self, filter: &PlatformFilter) -> Result<()> {
        if self.is_known(filter) {
            Ok(())
        } else {
            Err(SalesError::validation_field(
                format!("Unknown platform '{filter}' for the selected years"),
                "platform",
            ))
        }
    }

    fn query(&self, region: Region) -> SalesQuery {
        SalesQuery::new(region)
            .with_years(self.state.years)
            .with_order(self.settings.sort_order)
            .with_limit(self.settings.top_n)
    }

    /// Renders one region tab.
    ///
    /// # Errors
    ///
    /// Fails when a localized message cannot be formatted.
    #[instrument(skip(self))]
    pub fn render_tab(&self, region: Region) -> Result<TabView> {
        let selection = self.state.tab(region);
        let builder = ChartSpecBuilder::new(&self.messages);
        let threshold = self.settings.others_threshold_percent;
        let query = self.query(region);

        let games_query = query.clone().with_platform(selection.games_platform.clone());
        let genres_query = query.clone().with_platform(selection.genres_platform.clone());

        let name = self.messages.get(region_message_key(region))?;
        let platform_options: Vec<String> = std::iter::once(ALL_PLATFORMS.to_string())
            .chain(self.platforms())
            .collect();

        Ok(TabView {
            region,
            heading: self
                .messages
                .get_with_args("tab-heading", &[("region", name.clone())])?,
            name,
            platform_label: self.messages.get("platform-select-label")?,
            platform_options,
            all_platforms_label: self.messages.get("platform-all")?,
            platform_share: builder.platform_share(
                &self.aggregator.platform_shares(&query, threshold),
                threshold,
            )?,
            platform_totals: builder.platform_totals(&self.aggregator.platform_totals(&query))?,
            top_games: builder.top_games(
                &self.aggregator.top_games(&games_query),
                &selection.games_platform,
            )?,
            top_genres: builder.top_genres(&self.aggregator.top_genres(&genres_query))?,
            games_platform: selection.games_platform,
            genres_platform: selection.genres_platform,
        })
    }

    /// Renders the whole page.
    ///
    /// # Errors
    ///
    /// Fails when a localized message cannot be formatted.
    pub fn render(&self) -> Result<DashboardView> {
        let warning = if self.dropped > 0 {
            Some(
                self.messages
                    .get_with_args("dropped-rows-warning", &[("count", self.dropped.to_string())])?,
            )
        } else {
            None
        };

        let year_control = YearControl {
            label: self.messages.get("year-range-label")?,
            bounds: self.bounds,
            selected: self.state.years,
            enabled: self.bounds.is_some(),
            notice: match self.bounds {
                Some(_) => None,
                None => Some(self.messages.get("year-range-disabled")?),
            },
        };

        let tabs = Region::ALL
            .into_iter()
            .map(|region| self.render_tab(region))
            .collect::<Result<Vec<_>>>()?;

        Ok(DashboardView {
            title: self.messages.get("dashboard-title")?,
            warning,
            year_control,
            tabs,
            footer: self.messages.get("footer-coming-soon")?,
        })
    }
}
