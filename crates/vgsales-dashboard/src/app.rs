//! One-shot run: load, normalize, render and export.

use crate::error::DashboardResult;
use crate::export::{DashboardExporter, Manifest};
use crate::shell::Dashboard;
use tracing::{info, instrument};
use vgsales_common::format_millions;
use vgsales_config::Config;
use vgsales_data::{normalize, DataLoader};

/// Loads the configured dataset and builds the dashboard over it.
///
/// # Errors
///
/// Fails when the dataset cannot be read or lacks a required column, or
/// the localized messages cannot be loaded.
#[instrument(skip_all, fields(dataset = %config.dataset.path.display()))]
pub fn build_dashboard(config: &Config) -> DashboardResult<Dashboard> {
    let rows = DataLoader::with_delimiter(config.dataset.delimiter)?
        .load_path(&config.dataset.path)?;
    let normalized = normalize(rows);
    Ok(Dashboard::new(normalized, config)?)
}

/// Builds the dashboard with its initial selections and exports every tab.
///
/// # Errors
///
/// Fails when the dashboard cannot be built or the output cannot be written.
pub fn run(config: &Config) -> DashboardResult<Manifest> {
    let dashboard = build_dashboard(config)?;
    let view = dashboard.render()?;

    for tab in &view.tabs {
        let total: f64 = tab.platform_totals.points.iter().map(|p| p.value).sum();
        info!(
            "{}: {} across {} platforms",
            tab.name,
            format_millions(total),
            tab.platform_totals.points.len()
        );
    }
    if let Some(warning) = &view.warning {
        info!("{}", warning);
    }

    DashboardExporter::from_config(&config.output)?.export(&view)
}
