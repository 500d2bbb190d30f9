//! Declarative chart specifications.
//!
//! A [`ChartSpec`] is everything a renderer needs to draw one chart: kind,
//! localized texts, axes and data points. Building one has no side effects.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vgsales_common::{PlatformFilter, Result, MILLIONS_SUFFIX};
use vgsales_i18n::Messages;

use crate::aggregator::{GameSales, GenreSales, PlatformSales, PlatformShare, OTHERS_LABEL};

/// Bar direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Categories along the x axis.
    Vertical,
    /// Categories along the y axis.
    Horizontal,
}

/// Chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartKind {
    /// Bar chart.
    Bar {
        /// Bar direction.
        orientation: Orientation,
    },
    /// Pie chart.
    Pie,
}

/// One axis of a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Axis title; empty for none.
    pub title: String,
    /// Suffix appended to tick labels of a value axis.
    pub tick_suffix: Option<String>,
}

impl AxisSpec {
    fn category(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tick_suffix: None,
        }
    }

    fn millions(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tick_suffix: Some(MILLIONS_SUFFIX.to_string()),
        }
    }
}

/// One bar or slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category label.
    pub label: String,
    /// Value, in millions.
    pub value: f64,
    /// Share of the total, for pie slices.
    pub percentage: Option<f64>,
    /// Lines shown when hovering the point.
    pub hover: Vec<String>,
    /// Points with equal keys share a color.
    pub color_key: String,
}

/// Complete description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Chart kind.
    pub kind: ChartKind,
    /// Centered title.
    pub title: String,
    /// Small gray note drawn beside the plot.
    pub annotation: Option<String>,
    /// Horizontal axis, for bar charts.
    pub x_axis: Option<AxisSpec>,
    /// Vertical axis, for bar charts.
    pub y_axis: Option<AxisSpec>,
    /// Bars or slices in display order.
    pub points: Vec<ChartPoint>,
    /// Whether a legend is drawn.
    pub show_legend: bool,
}

impl ChartSpec {
    /// Returns true when the chart has nothing to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Builds localized chart specifications from aggregation results.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpecBuilder<'a> {
    messages: &'a Messages,
}

impl<'a> ChartSpecBuilder<'a> {
    /// Uses `messages` for every title, label and annotation.
    #[must_use]
    pub const fn new(messages: &'a Messages) -> Self {
        Self { messages }
    }

    fn hover_total(&self, value: f64) -> Result<String> {
        self.messages
            .get_with_args("hover-total", &[("value", format!("{value:.2}"))])
    }

    fn hover_platform(&self, platform: &str) -> Result<String> {
        self.messages
            .get_with_args("hover-platform", &[("platform", platform.to_string())])
    }

    /// Pie chart of platform shares.
    ///
    /// # Errors
    ///
    /// Fails when a message cannot be formatted.
    pub fn platform_share(&self, shares: &[PlatformShare], threshold_percent: f64) -> Result<ChartSpec> {
        let points = shares
            .iter()
            .map(|share| {
                let label = if share.platform == OTHERS_LABEL {
                    self.messages.get("others-label")?
                } else {
                    share.platform.clone()
                };
                Ok(ChartPoint {
                    hover: vec![self.hover_platform(&label)?, self.hover_total(share.total)?],
                    label,
                    value: share.total,
                    percentage: Some(share.percentage),
                    color_key: share.platform.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ChartSpec {
            kind: ChartKind::Pie,
            title: self.messages.get("chart-platform-share-title")?,
            annotation: Some(self.messages.get_with_args(
                "annotation-platform-share",
                &[("threshold", threshold_percent.to_string())],
            )?),
            x_axis: None,
            y_axis: None,
            points,
            show_legend: true,
        })
    }

    /// Vertical bar chart of platform totals, one color per platform.
    ///
    /// # Errors
    ///
    /// Fails when a message cannot be formatted.
    pub fn platform_totals(&self, totals: &[PlatformSales]) -> Result<ChartSpec> {
        let points = totals
            .iter()
            .map(|platform| {
                Ok(ChartPoint {
                    label: platform.platform.clone(),
                    value: platform.total,
                    percentage: None,
                    hover: vec![
                        self.hover_platform(&platform.platform)?,
                        self.hover_total(platform.total)?,
                    ],
                    color_key: platform.platform.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ChartSpec {
            kind: ChartKind::Bar {
                orientation: Orientation::Vertical,
            },
            title: self.messages.get("chart-platform-totals-title")?,
            annotation: Some(self.messages.get("annotation-platform-totals")?),
            x_axis: Some(AxisSpec::category(self.messages.get("axis-platform")?)),
            y_axis: Some(AxisSpec::millions(self.messages.get("axis-total")?)),
            points,
            show_legend: true,
        })
    }

    /// Horizontal bar chart of ranked games. Without a platform filter the
    /// hover names the platform, and titles listed more than once carry it in
    /// their label.
    ///
    /// # Errors
    ///
    /// Fails when a message cannot be formatted.
    pub fn top_games(&self, games: &[GameSales], filter: &PlatformFilter) -> Result<ChartSpec> {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for game in games {
            *occurrences.entry(game.name.as_str()).or_default() += 1;
        }

        let points = games
            .iter()
            .map(|game| {
                let mut hover = vec![self.hover_total(game.total)?];
                if filter.is_all() {
                    hover.push(self.hover_platform(&game.platform)?);
                }
                let label = if occurrences.get(game.name.as_str()).copied().unwrap_or(0) > 1 {
                    format!("{} ({})", game.name, game.platform)
                } else {
                    game.name.clone()
                };
                Ok(ChartPoint {
                    color_key: label.clone(),
                    label,
                    value: game.total,
                    percentage: None,
                    hover,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.ranked(self.messages.get("chart-top-games-title")?, points)
    }

    /// Horizontal bar chart of ranked genres.
    ///
    /// # Errors
    ///
    /// Fails when a message cannot be formatted.
    pub fn top_genres(&self, genres: &[GenreSales]) -> Result<ChartSpec> {
        let points = genres
            .iter()
            .map(|genre| {
                Ok(ChartPoint {
                    label: genre.genre.clone(),
                    value: genre.total,
                    percentage: None,
                    hover: vec![self.hover_total(genre.total)?],
                    color_key: genre.genre.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.ranked(self.messages.get("chart-top-genres-title")?, points)
    }

    fn ranked(&self, title: String, points: Vec<ChartPoint>) -> Result<ChartSpec> {
        Ok(ChartSpec {
            kind: ChartKind::Bar {
                orientation: Orientation::Horizontal,
            },
            title,
            annotation: None,
            x_axis: Some(AxisSpec::millions(self.messages.get("axis-total")?)),
            y_axis: Some(AxisSpec::category(String::new())),
            points,
            show_legend: false,
        })
    }
}
