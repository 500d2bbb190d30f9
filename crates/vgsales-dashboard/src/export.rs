//! Writes a rendered dashboard to disk, one directory per region tab.

use crate::error::DashboardResult;
use crate::shell::{DashboardView, TabView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use vgsales_common::{Region, YearRange};
use vgsales_config::{OutputConfig, OutputFormat};
use vgsales_graphs::ChartRenderer;

/// File name of the export manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Charts written for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabManifest {
    /// Region of the tab.
    pub region: Region,
    /// Localized tab title.
    pub name: String,
    /// Chart files relative to the output directory.
    pub charts: Vec<PathBuf>,
}

/// Summary of one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// When the export finished.
    pub generated_at: DateTime<Utc>,
    /// Page title.
    pub title: String,
    /// Dropped-rows banner, if shown.
    pub warning: Option<String>,
    /// Selected years at export time.
    pub years: Option<YearRange>,
    /// Chart format.
    pub format: OutputFormat,
    /// Exported tabs in display order.
    pub tabs: Vec<TabManifest>,
}

/// Exports dashboard views through a [`ChartRenderer`].
#[derive(Debug, Clone)]
pub struct DashboardExporter {
    directory: PathBuf,
    renderer: ChartRenderer,
}

impl DashboardExporter {
    /// Creates an exporter for the output section of the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured colors do not parse.
    pub fn from_config(output: &OutputConfig) -> DashboardResult<Self> {
        Ok(Self {
            directory: output.directory.clone(),
            renderer: ChartRenderer::from_config(output)?,
        })
    }

    /// Output directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Renders every chart of `view` and writes `manifest.json`.
    ///
    /// # Errors
    ///
    /// Fails when a directory cannot be created or a chart cannot be
    /// rendered or written.
    #[instrument(skip_all, fields(directory = %self.directory.display()))]
    pub fn export(&self, view: &DashboardView) -> DashboardResult<Manifest> {
        fs::create_dir_all(&self.directory)?;

        let tabs = view
            .tabs
            .iter()
            .map(|tab| self.export_tab(tab))
            .collect::<DashboardResult<Vec<_>>>()?;

        let manifest = Manifest {
            generated_at: Utc::now(),
            title: view.title.clone(),
            warning: view.warning.clone(),
            years: view.year_control.selected,
            format: self.renderer.format(),
            tabs,
        };

        let manifest_path = self.directory.join(MANIFEST_FILE);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
        info!(
            "Exported {} tabs to {}",
            manifest.tabs.len(),
            self.directory.display()
        );
        Ok(manifest)
    }

    fn export_tab(&self, tab: &TabView) -> DashboardResult<TabManifest> {
        let relative_dir = PathBuf::from(tab.region.slug());
        fs::create_dir_all(self.directory.join(&relative_dir))?;

        let mut charts = Vec::with_capacity(4);
        for (stem, spec) in tab.charts() {
            let relative = relative_dir.join(self.renderer.file_name(stem));
            self.renderer.render_to_file(spec, &self.directory.join(&relative))?;
            debug!("Wrote {}", relative.display());
            charts.push(relative);
        }

        Ok(TabManifest {
            region: tab.region,
            name: tab.name.clone(),
            charts,
        })
    }
}
