//! Static Chart Renderer
//! Draws report views with plotters, to SVG for the HTML export and to PNG
//! for image export.
//!
//! Every view follows its `ViewSpec`:
//! 1. Title caption at the top
//! 2. Bars/points/slices/areas colored by the view's color scheme
//! 3. Value labels, tick rotation and legend as configured
//!
//! Plotters only rotates text by right angles, so any tick angle of 45°
//! or more is drawn vertical.

use crate::charts::layout::{self, BarMark};
use crate::charts::palette::{self, ColorScale, ColorScheme, Rgb};
use crate::data::aggregate::{DramaPoint, DramaSummary, YearCategoryCount};
use crate::report::{ChartKind, DerivedTable, LegendPosition, Orientation, View, ViewSpec};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};
use std::path::Path;
use thiserror::Error;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const TITLE_SIZE: i32 = 18;
const AXIS_SIZE: i32 = 14;
const TICK_SIZE: i32 = 12;
const LEGEND_WIDTH: u32 = 150;

// Hall-of-fame table column widths (fractions of the table width)
const TABLE_COLS: [f64; 5] = [0.28, 0.08, 0.34, 0.12, 0.18];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Bitmap buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a view to an SVG document string.
    pub fn render_svg(view: &View, size: (u32, u32)) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            Self::draw(&root, view).map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        Ok(svg)
    }

    /// Render a view to an in-memory RGB image.
    pub fn render_image(view: &View, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        let (width, height) = size;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            Self::draw(&root, view).map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))
    }

    /// Render a view and write it as a PNG file.
    pub fn save_png(view: &View, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
        Self::render_image(view, size)?.save(path)?;
        Ok(())
    }

    fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, view: &View) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let spec = &view.spec;

        match (spec.kind, &view.table) {
            (ChartKind::Scatter, DerivedTable::Points(points)) => {
                Self::draw_scatter(root, spec, points)
            }
            (ChartKind::Area, DerivedTable::YearCategoryCounts(rows)) => {
                Self::draw_area(root, spec, rows)
            }
            (ChartKind::Table, DerivedTable::TopDramas(rows)) => Self::draw_table(root, spec, rows),
            (ChartKind::Bar | ChartKind::Pie, table) => {
                let counts = table
                    .labeled_counts()
                    .ok_or_else(|| format!("'{}' has no counts to draw", spec.title))?;
                match (spec.kind, spec.orientation) {
                    (ChartKind::Pie, _) => Self::draw_pie(root, spec, &counts),
                    (_, Orientation::Vertical) => Self::draw_bars(root, spec, &counts),
                    (_, Orientation::Horizontal) => Self::draw_hbars(root, spec, &counts),
                }
            }
            (kind, _) => Err(format!("'{}' cannot be drawn as {:?}", spec.title, kind).into()),
        }
    }

    fn tick_style(spec: &ViewSpec) -> TextStyle<'static> {
        let font = (FONT, TICK_SIZE).into_font();
        if spec.tick_angle >= 45 {
            font.transform(FontTransform::Rotate90).into()
        } else {
            font.into()
        }
    }

    fn value_axis_max(bars: &[BarMark]) -> u32 {
        let max = bars.iter().map(|b| b.value).max().unwrap_or(0);
        ((max as f64 * 1.15).ceil() as u32).max(max + 1)
    }

    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ViewSpec,
        counts: &[(String, u32)],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let bars = layout::colored_bars(counts, spec.color);
        let n = bars.len() as i32;
        let y_max = Self::value_axis_max(&bars);
        let x_area = if spec.tick_angle >= 45 { 110 } else { 45 };

        let mut chart = ChartBuilder::on(root)
            .caption(spec.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(x_area)
            .y_label_area_size(55)
            .build_cartesian_2d((0..n.max(1)).into_segmented(), 0u32..y_max)?;

        let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
        let category = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len().max(1))
            .x_label_formatter(&category)
            .x_label_style(Self::tick_style(spec))
            .x_desc(spec.x_title)
            .y_desc(spec.y_title)
            .axis_desc_style((FONT, AXIS_SIZE))
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let i = i as i32;
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bar.value)],
                rgb(bar.color).filled(),
            );
            rect.set_margin(0, 0, 6, 6);
            rect
        }))?;

        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let i = i as i32;
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bar.value)],
                WHITE.stroke_width(1),
            );
            rect.set_margin(0, 0, 6, 6);
            rect
        }))?;

        if spec.text_labels {
            chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
                Text::new(
                    bar.value.to_string(),
                    (SegmentValue::CenterOf(i as i32), bar.value),
                    (FONT, TICK_SIZE)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Bottom)),
                )
            }))?;
        }

        Ok(())
    }

    fn draw_hbars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ViewSpec,
        counts: &[(String, u32)],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let bars = layout::colored_bars(counts, spec.color);
        let n = bars.len() as i32;
        let x_max = Self::value_axis_max(&bars);

        let mut chart = ChartBuilder::on(root)
            .caption(spec.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(170)
            .build_cartesian_2d(0u32..x_max, (0..n.max(1)).into_segmented())?;

        let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
        let category = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(bars.len().max(1))
            .y_label_formatter(&category)
            .x_desc(spec.x_title)
            .y_desc(spec.y_title)
            .axis_desc_style((FONT, AXIS_SIZE))
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let i = i as i32;
            let mut rect = Rectangle::new(
                [(0, SegmentValue::Exact(i)), (bar.value, SegmentValue::Exact(i + 1))],
                rgb(bar.color).filled(),
            );
            rect.set_margin(4, 4, 0, 0);
            rect
        }))?;

        if spec.text_labels {
            chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
                Text::new(
                    format!(" {}", bar.value),
                    (bar.value, SegmentValue::CenterOf(i as i32)),
                    (FONT, TICK_SIZE)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Left, VPos::Center)),
                )
            }))?;
        }

        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ViewSpec,
        points: &[DramaPoint],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let (x_min, x_max) = layout::padded_range(points.iter().map(|p| p.episodes as f64), 0.05);
        let (y_min, y_max) = layout::padded_range(points.iter().map(|p| p.rating), 0.08);
        let scale = match spec.color {
            ColorScheme::Continuous(scale) => scale,
            ColorScheme::Discrete(_) => ColorScale::Turbo,
        };
        let colors = layout::point_colors(points, scale);

        let mut chart = ChartBuilder::on(root)
            .caption(spec.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_title)
            .y_desc(spec.y_title)
            .axis_desc_style((FONT, AXIS_SIZE))
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.1}", v))
            .draw()?;

        chart.draw_series(points.iter().zip(&colors).map(|(p, c)| {
            Circle::new((p.episodes as f64, p.rating), 5, rgb(*c).filled())
        }))?;

        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ViewSpec,
        counts: &[(String, u32)],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let area = root.titled(spec.title, (FONT, TITLE_SIZE))?;
        let (width, height) = area.dim_in_pixel();
        let (plot, legend) = area.split_horizontally(width.saturating_sub(LEGEND_WIDTH) as i32);
        let (plot_w, _) = plot.dim_in_pixel();

        let radius = (plot_w.min(height) as f64) * 0.38;
        let center = (plot_w as f64 / 2.0, height as f64 / 2.0);
        let slices = layout::pie_slices(counts, spec.color, spec.pull_largest);

        for slice in &slices {
            let (dx, dy) = slice.offset(radius);
            let outline: Vec<(i32, i32)> = slice
                .outline(180)
                .into_iter()
                .map(|(x, y)| {
                    (
                        (center.0 + dx + x * radius).round() as i32,
                        (center.1 + dy + y * radius).round() as i32,
                    )
                })
                .collect();

            plot.draw(&Polygon::new(outline.clone(), rgb(slice.color).filled()))?;
            let mut closed = outline;
            if let Some(first) = closed.first().copied() {
                closed.push(first);
            }
            plot.draw(&PathElement::new(closed, WHITE.stroke_width(1)))?;
        }

        let text_style = (FONT, TICK_SIZE)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for slice in &slices {
            let (dx, dy) = slice.offset(radius);
            let angle = slice.mid_angle();
            let x = center.0 + dx + angle.cos() * radius * 0.65;
            let y = center.1 + dy + angle.sin() * radius * 0.65;
            let mut lines = slice.text();
            let percent = lines.split_off(lines.find('\n').unwrap_or(lines.len()));
            plot.draw(&Text::new(lines, (x as i32, y as i32 - 8), text_style.clone()))?;
            plot.draw(&Text::new(
                percent.trim().to_string(),
                (x as i32, y as i32 + 8),
                text_style.clone(),
            ))?;
        }

        let entries: Vec<(String, Rgb)> = slices.iter().map(|s| (s.label.clone(), s.color)).collect();
        Self::draw_legend(&legend, None, &entries)?;
        Ok(())
    }

    fn draw_area<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ViewSpec,
        rows: &[YearCategoryCount],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let stacked = layout::stack_by_year(rows, spec.color);
        let (width, _) = root.dim_in_pixel();
        let legend_width = match spec.legend {
            LegendPosition::Right => LEGEND_WIDTH,
            LegendPosition::Hidden => 0,
        };
        let (plot, legend) = root.split_horizontally(width.saturating_sub(legend_width) as i32);

        let first = stacked.years.first().copied().unwrap_or(0) as f64;
        let last = stacked.years.last().copied().unwrap_or(0) as f64;
        let last = if last > first { last } else { first + 1.0 };
        let y_max = (stacked.max_total() as f64 * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(&plot)
            .caption(spec.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(first..last, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_labels(stacked.years.len().clamp(2, 12))
            .x_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(spec.x_title)
            .y_desc(spec.y_title)
            .axis_desc_style((FONT, AXIS_SIZE))
            .draw()?;

        // Top of the stack first so lower series paint over it.
        for series in stacked.series.iter().rev() {
            let color = rgb(series.color);
            let points: Vec<(f64, f64)> = stacked
                .years
                .iter()
                .zip(&series.upper)
                .map(|(y, v)| (*y as f64, *v as f64))
                .collect();

            chart.draw_series(
                AreaSeries::new(points.clone(), 0.0, color.mix(0.85)).border_style(color),
            )?;
            chart.draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;
            chart.draw_series(
                points
                    .iter()
                    .map(|p| Circle::new(*p, 3, rgb(palette::DARK_SLATE_GREY).stroke_width(1))),
            )?;
        }

        if spec.legend == LegendPosition::Right {
            let entries: Vec<(String, Rgb)> = stacked
                .series
                .iter()
                .map(|s| (s.name.clone(), s.color))
                .collect();
            Self::draw_legend(&legend, Some("Content Rating"), &entries)?;
        }
        Ok(())
    }

    fn draw_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        title: Option<&str>,
        entries: &[(String, Rgb)],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let mut y = 50;
        if let Some(title) = title {
            area.draw(&Text::new(title.to_string(), (10, y), (FONT, AXIS_SIZE).into_font()))?;
            y += 24;
        }
        for (name, color) in entries {
            area.draw(&Rectangle::new([(10, y), (24, y + 14)], rgb(*color).filled()))?;
            area.draw(&Text::new(name.clone(), (30, y), (FONT, TICK_SIZE).into_font()))?;
            y += 22;
        }
        Ok(())
    }

    fn draw_table<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ViewSpec,
        rows: &[DramaSummary],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let area = root.titled(spec.title, (FONT, TITLE_SIZE))?;
        let (width, _) = area.dim_in_pixel();
        let table_w = width.saturating_sub(30) as f64;
        let (header_h, row_h) = (30, 25);

        let mut x_edges = vec![10i32];
        for pct in TABLE_COLS {
            let last = *x_edges.last().unwrap_or(&10);
            x_edges.push(last + (table_w * pct) as i32);
        }

        let header_style = (FONT, 12).into_font().style(FontStyle::Bold).color(&BLACK);
        let cell_style = (FONT, 11).into_font().color(&BLACK);

        let mut y = 10;
        for (i, header) in spec.headers.iter().enumerate().take(TABLE_COLS.len()) {
            let (x0, x1) = (x_edges[i], x_edges[i + 1]);
            area.draw(&Rectangle::new(
                [(x0, y), (x1, y + header_h)],
                rgb(palette::YELLOW_GREEN).filled(),
            ))?;
            area.draw(&Rectangle::new([(x0, y), (x1, y + header_h)], WHITE.stroke_width(1)))?;
            area.draw(&Text::new(header.to_string(), (x0 + 5, y + 8), header_style.clone()))?;
        }
        y += header_h;

        for row in layout::table_cells(rows) {
            for (i, cell) in row.iter().enumerate() {
                let (x0, x1) = (x_edges[i], x_edges[i + 1]);
                area.draw(&Rectangle::new(
                    [(x0, y), (x1, y + row_h)],
                    rgb(palette::LIGHT_YELLOW).filled(),
                ))?;
                area.draw(&Rectangle::new([(x0, y), (x1, y + row_h)], WHITE.stroke_width(1)))?;
                let max_chars = ((x1 - x0 - 10) / 6).max(1) as usize;
                area.draw(&Text::new(
                    clip(cell, max_chars),
                    (x0 + 5, y + 6),
                    cell_style.clone(),
                ))?;
            }
            y += row_h;
        }
        Ok(())
    }
}

/// Shorten `text` to `max_chars`, marking the cut with an ellipsis.
fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_keeps_short_text() {
        assert_eq!(clip("Netflix", 10), "Netflix");
        assert_eq!(clip("Drama, Romance, Life", 8), "Drama, …");
    }
}
