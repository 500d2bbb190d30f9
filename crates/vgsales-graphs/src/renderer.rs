//! Chart rendering with plotters.

use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, instrument};
use vgsales_common::{format_percentage, truncate_string, Result, SalesError};
use vgsales_config::{OutputConfig, OutputFormat};

use crate::chart::{ChartKind, ChartSpec, Orientation};
use crate::utils::{color_slots, parse_hex_color, value_axis_max};

/// Font family used for every text.
pub const FONT_FAMILY: &str = "sans-serif";

const TITLE_SIZE: u32 = 20;
const LABEL_SIZE: u32 = 12;
const ANNOTATION_HEIGHT: u32 = 24;
const LEGEND_WIDTH: u32 = 140;
const LEGEND_ROW: i32 = 18;
const MAX_LABEL_CHARS: usize = 18;
const ANNOTATION_GRAY: RGBColor = RGBColor(128, 128, 128);

/// Draws [`ChartSpec`]s as PNG or SVG images, or writes them as JSON.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    format: OutputFormat,
    width: u32,
    height: u32,
    background: RGBColor,
    palette: Vec<RGBColor>,
}

impl ChartRenderer {
    /// Creates a renderer from the output configuration.
    ///
    /// # Errors
    ///
    /// Fails when a color is not `#rrggbb` or the palette is empty.
    pub fn from_config(output: &OutputConfig) -> Result<Self> {
        let palette = output
            .palette
            .iter()
            .map(|color| parse_hex_color(color))
            .collect::<Result<Vec<_>>>()?;
        if palette.is_empty() {
            return Err(SalesError::validation_field(
                "Palette needs at least one color",
                "output.palette",
            ));
        }

        Ok(Self {
            format: output.format,
            width: output.width,
            height: output.height,
            background: parse_hex_color(&output.background)?,
            palette,
        })
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// File name for a chart called `stem` in this renderer's format.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.format.extension())
    }

    /// Renders `spec` to `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written or drawing fails.
    #[instrument(skip(self, spec), fields(title = %spec.title, path = %path.display()))]
    pub fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Png => {
                let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
                self.draw(&root, spec)?;
                root.present()?;
            }
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
                self.draw(&root, spec)?;
                root.present()?;
            }
            OutputFormat::Json => {
                let writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(writer, spec)?;
            }
        }

        debug!("Rendered chart with {} points", spec.points.len());
        Ok(())
    }

    /// Renders `spec` as an SVG document in memory.
    ///
    /// # Errors
    ///
    /// Fails when drawing fails.
    pub fn render_svg(&self, spec: &ChartSpec) -> Result<String> {
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            self.draw(&root, spec)?;
            root.present()?;
        }
        Ok(buffer)
    }

    fn color(&self, slot: usize) -> RGBColor {
        self.palette.get(slot).copied().unwrap_or(BLACK)
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&self.background)?;

        let (body, footer) = root.split_vertically(self.height.saturating_sub(ANNOTATION_HEIGHT));
        if let Some(annotation) = &spec.annotation {
            let style = (FONT_FAMILY, LABEL_SIZE).into_font().color(&ANNOTATION_GRAY);
            footer.draw_text(annotation, &style, (8, 4))?;
        }

        let slots = color_slots(
            spec.points.iter().map(|point| point.color_key.as_str()),
            self.palette.len(),
        );

        let plot = if spec.show_legend && !spec.is_empty() {
            let (plot, legend) = body.split_horizontally(self.width.saturating_sub(LEGEND_WIDTH));
            self.draw_legend(&legend, spec, &slots)?;
            plot
        } else {
            body
        };

        if spec.is_empty() {
            plot.titled(&spec.title, (FONT_FAMILY, TITLE_SIZE))?;
            return Ok(());
        }

        match spec.kind {
            ChartKind::Pie => self.draw_pie(&plot, spec, &slots),
            ChartKind::Bar {
                orientation: Orientation::Vertical,
            } => self.draw_vertical_bars(&plot, spec, &slots),
            ChartKind::Bar {
                orientation: Orientation::Horizontal,
            } => self.draw_horizontal_bars(&plot, spec, &slots),
        }
    }

    fn draw_legend<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        slots: &[usize],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let mut seen: Vec<&str> = Vec::new();
        let entries = spec.points.iter().zip(slots).filter(|(point, _)| {
            let fresh = !seen.contains(&point.color_key.as_str());
            if fresh {
                seen.push(point.color_key.as_str());
            }
            fresh
        });

        let style = label_style();
        for (row, (point, slot)) in (0..).zip(entries) {
            let top = 32 + row * LEGEND_ROW;
            area.draw(&Rectangle::new(
                [(8, top), (20, top + 12)],
                self.color(*slot).filled(),
            ))?;
            area.draw_text(
                &truncate_string(&point.color_key, MAX_LABEL_CHARS),
                &style,
                (26, top),
            )?;
        }
        Ok(())
    }

    fn draw_pie<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        slots: &[usize],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let area = area.titled(&spec.title, (FONT_FAMILY, TITLE_SIZE))?;
        let (width, height) = area.dim_in_pixel();
        let center = (
            i32::try_from(width / 2).unwrap_or(i32::MAX),
            i32::try_from(height / 2).unwrap_or(i32::MAX),
        );
        let radius = f64::from(width.min(height)) * 0.35;

        let sizes: Vec<f64> = spec.points.iter().map(|point| point.value).collect();
        let colors: Vec<RGBColor> = slots.iter().map(|slot| self.color(*slot)).collect();
        let labels: Vec<String> = spec
            .points
            .iter()
            .map(|point| match point.percentage {
                Some(percentage) => format!("{} {}", point.label, format_percentage(percentage)),
                None => point.label.clone(),
            })
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(label_style());
        area.draw(&pie)?;
        Ok(())
    }

    fn draw_vertical_bars<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        slots: &[usize],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let count = spec.points.len();
        let labels: Vec<&str> = spec.points.iter().map(|p| p.label.as_str()).collect();
        let y_max = value_axis_max(spec.points.iter().map(|p| p.value));
        let suffix = tick_suffix(spec.y_axis.as_ref());

        let mut chart = ChartBuilder::on(area)
            .caption(&spec.title, (FONT_FAMILY, TITLE_SIZE))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..count).into_segmented(), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count)
            .x_label_formatter(&|value| segment_label(&labels, value))
            .y_label_formatter(&|value| format!("{value:.1}{suffix}"))
            .x_desc(axis_title(spec.x_axis.as_ref()))
            .y_desc(axis_title(spec.y_axis.as_ref()))
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .draw()?;

        chart.draw_series(spec.points.iter().zip(slots).enumerate().map(
            |(index, (point, slot))| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(index), 0.0),
                        (SegmentValue::Exact(index + 1), point.value),
                    ],
                    self.color(*slot).filled(),
                );
                bar.set_margin(0, 0, 4, 4);
                bar
            },
        ))?;
        Ok(())
    }

    fn draw_horizontal_bars<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        slots: &[usize],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let count = spec.points.len();
        let labels: Vec<&str> = spec.points.iter().map(|p| p.label.as_str()).collect();
        let x_max = value_axis_max(spec.points.iter().map(|p| p.value));
        let suffix = tick_suffix(spec.x_axis.as_ref());

        let mut chart = ChartBuilder::on(area)
            .caption(&spec.title, (FONT_FAMILY, TITLE_SIZE))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(140)
            .build_cartesian_2d(0.0..x_max, (0..count).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(count)
            .y_label_formatter(&|value| segment_label(&labels, value))
            .x_label_formatter(&|value| format!("{value:.1}{suffix}"))
            .x_desc(axis_title(spec.x_axis.as_ref()))
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .draw()?;

        chart.draw_series(spec.points.iter().zip(slots).enumerate().map(
            |(index, (point, slot))| {
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(index)),
                        (point.value, SegmentValue::Exact(index + 1)),
                    ],
                    self.color(*slot).filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            },
        ))?;
        Ok(())
    }
}

fn tick_suffix(axis: Option<&crate::chart::AxisSpec>) -> &str {
    axis.and_then(|axis| axis.tick_suffix.as_deref())
        .unwrap_or_default()
}

fn label_style() -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, LABEL_SIZE).into_font())
}

fn axis_title(axis: Option<&crate::chart::AxisSpec>) -> &str {
    axis.map_or("", |axis| axis.title.as_str())
}

fn segment_label(labels: &[&str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::Exact(index) | SegmentValue::CenterOf(index) => labels
            .get(*index)
            .map_or_else(String::new, |label| truncate_string(label, MAX_LABEL_CHARS)),
        SegmentValue::Last => String::new(),
    }
}
