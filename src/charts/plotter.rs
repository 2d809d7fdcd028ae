//! Chart Plotter Module
//! Draws report views interactively inside the window using egui_plot.

use crate::charts::layout;
use crate::charts::palette::{self, ColorScale, ColorScheme, Rgb};
use crate::data::aggregate::{DramaPoint, DramaSummary, YearCategoryCount};
use crate::report::{ChartKind, DerivedTable, LegendPosition, Orientation, View, ViewSpec};
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke};
use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

/// Height of every plot in the report viewer.
pub const PLOT_HEIGHT: f32 = 360.0;

pub fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

/// Creates the interactive charts of the report viewer.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one view. `id` keeps plot state apart between chapters.
    pub fn draw_view(ui: &mut egui::Ui, id: usize, view: &View) {
        let spec = &view.spec;
        ui.label(RichText::new(spec.title).size(16.0).strong());

        if view.table.is_empty() {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        match (spec.kind, &view.table) {
            (ChartKind::Scatter, DerivedTable::Points(points)) => {
                Self::draw_scatter(ui, id, spec, points)
            }
            (ChartKind::Area, DerivedTable::YearCategoryCounts(rows)) => {
                Self::draw_area(ui, id, spec, rows)
            }
            (ChartKind::Table, DerivedTable::TopDramas(rows)) => Self::draw_table(ui, id, spec, rows),
            (ChartKind::Pie, table) => {
                if let Some(counts) = table.labeled_counts() {
                    Self::draw_pie(ui, spec, &counts);
                }
            }
            (ChartKind::Bar, table) => {
                if let Some(counts) = table.labeled_counts() {
                    Self::draw_bars(ui, id, spec, &counts);
                }
            }
            (kind, _) => {
                ui.label(
                    RichText::new(format!("Cannot draw this view as {:?}", kind))
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        }
    }

    fn draw_bars(ui: &mut egui::Ui, id: usize, spec: &ViewSpec, counts: &[(String, u32)]) {
        let marks = layout::colored_bars(counts, spec.color);
        let horizontal = spec.orientation == Orientation::Horizontal;
        let labels: Vec<String> = marks.iter().map(|m| m.label.clone()).collect();

        let bars: Vec<Bar> = marks
            .iter()
            .enumerate()
            .map(|(i, mark)| {
                Bar::new(i as f64, mark.value as f64)
                    .width(0.8)
                    .fill(color32(mark.color))
                    .stroke(Stroke::new(1.0, Color32::WHITE))
                    .name(&mark.label)
            })
            .collect();
        let mut chart = BarChart::new(bars).name(spec.title);
        if horizontal {
            chart = chart.horizontal();
        }

        let category = move |value: f64| -> String {
            let idx = value.round();
            if (value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };

        let mut plot = Plot::new(format!("view_{}", id))
            .height(PLOT_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(spec.x_title)
            .y_axis_label(spec.y_title);
        plot = if horizontal {
            plot.y_axis_formatter(move |mark, _range| category(mark.value))
                .include_x(0.0)
        } else {
            plot.x_axis_formatter(move |mark, _range| category(mark.value))
                .include_y(0.0)
        };

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);

            if spec.text_labels {
                for (i, mark) in marks.iter().enumerate() {
                    let (position, anchor) = if horizontal {
                        (PlotPoint::new(mark.value as f64, i as f64), Align2::LEFT_CENTER)
                    } else {
                        (PlotPoint::new(i as f64, mark.value as f64), Align2::CENTER_BOTTOM)
                    };
                    plot_ui.text(Text::new(position, format!(" {} ", mark.value)).anchor(anchor));
                }
            }
        });
    }

    fn draw_scatter(ui: &mut egui::Ui, id: usize, spec: &ViewSpec, points: &[DramaPoint]) {
        let scale = match spec.color {
            ColorScheme::Continuous(scale) => scale,
            ColorScheme::Discrete(_) => ColorScale::Turbo,
        };
        let colors = layout::point_colors(points, scale);

        Plot::new(format!("view_{}", id))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.x_title)
            .y_axis_label(spec.y_title)
            .show(ui, |plot_ui| {
                for (point, color) in points.iter().zip(colors) {
                    let hover = format!(
                        "{}\n{} | {}",
                        point.name,
                        point.genre.as_deref().unwrap_or("-"),
                        point.year.map(|y| y.to_string()).unwrap_or_default()
                    );
                    plot_ui.points(
                        Points::new(vec![[point.episodes as f64, point.rating]])
                            .radius(4.0)
                            .color(color32(color))
                            .name(hover),
                    );
                }
            });
    }

    fn draw_area(ui: &mut egui::Ui, id: usize, spec: &ViewSpec, rows: &[YearCategoryCount]) {
        let stacked = layout::stack_by_year(rows, spec.color);

        let mut plot = Plot::new(format!("view_{}", id))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(spec.x_title)
            .y_axis_label(spec.y_title)
            .include_y(0.0);
        if spec.legend == LegendPosition::Right {
            plot = plot.legend(Legend::default().position(Corner::RightTop));
        }

        plot.show(ui, |plot_ui| {
            let zero = vec![0u32; stacked.years.len()];
            let mut lower: &[u32] = &zero;

            for series in &stacked.series {
                let color = color32(series.color);

                // Trapezoids between neighbouring years keep each polygon convex.
                for i in 1..stacked.years.len() {
                    let (x0, x1) = (stacked.years[i - 1] as f64, stacked.years[i] as f64);
                    let band = vec![
                        [x0, lower[i - 1] as f64],
                        [x1, lower[i] as f64],
                        [x1, series.upper[i] as f64],
                        [x0, series.upper[i - 1] as f64],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(band))
                            .fill_color(color.gamma_multiply(0.85))
                            .stroke(Stroke::NONE)
                            .name(&series.name),
                    );
                }

                let top: Vec<[f64; 2]> = stacked
                    .years
                    .iter()
                    .zip(&series.upper)
                    .map(|(y, v)| [*y as f64, *v as f64])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(top.clone()))
                        .color(color)
                        .width(1.5)
                        .name(&series.name),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(top))
                        .radius(3.0)
                        .color(color32(palette::DARK_SLATE_GREY))
                        .name(&series.name),
                );

                lower = &series.upper;
            }
        });
    }

    fn draw_pie(ui: &mut egui::Ui, spec: &ViewSpec, counts: &[(String, u32)]) {
        let slices = layout::pie_slices(counts, spec.color, spec.pull_largest);

        ui.horizontal(|ui| {
            let size = egui::vec2(PLOT_HEIGHT, PLOT_HEIGHT);
            let (response, painter) = ui.allocate_painter(size, Sense::hover());
            let center = response.rect.center();
            let radius = (PLOT_HEIGHT * 0.38) as f64;

            for slice in &slices {
                let (dx, dy) = slice.offset(radius);
                let to_screen = |(x, y): (f64, f64)| {
                    egui::pos2(
                        center.x + (dx + x * radius) as f32,
                        center.y + (dy + y * radius) as f32,
                    )
                };
                let outline: Vec<egui::Pos2> =
                    slice.outline(180).into_iter().map(to_screen).collect();
                let apex = outline[0];
                let fill = color32(slice.color);

                // Triangle fan: a slice wider than half the pie is not convex.
                for edge in outline[1..].windows(2) {
                    painter.add(egui::Shape::convex_polygon(
                        vec![apex, edge[0], edge[1]],
                        fill,
                        Stroke::new(0.5, fill),
                    ));
                }
                if let (Some(first), Some(last)) = (outline.get(1), outline.last()) {
                    let edge = Stroke::new(1.0, Color32::WHITE);
                    painter.line_segment([apex, *first], edge);
                    painter.line_segment([apex, *last], edge);
                }
            }

            for slice in &slices {
                let (dx, dy) = slice.offset(radius);
                let angle = slice.mid_angle();
                let pos = egui::pos2(
                    center.x + (dx + angle.cos() * radius * 0.65) as f32,
                    center.y + (dy + angle.sin() * radius * 0.65) as f32,
                );
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    slice.text(),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }

            ui.vertical(|ui| {
                ui.add_space(20.0);
                for slice in &slices {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, color32(slice.color));
                        ui.label(RichText::new(&slice.label).size(13.0));
                    });
                }
            });
        });
    }

    fn draw_table(ui: &mut egui::Ui, id: usize, spec: &ViewSpec, rows: &[DramaSummary]) {
        let header_bg = color32(palette::YELLOW_GREEN);
        let cell_bg = color32(palette::LIGHT_YELLOW);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("table_{}", id)))
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in spec.headers {
                            ui.label(
                                RichText::new(*header)
                                    .strong()
                                    .size(12.0)
                                    .color(Color32::BLACK)
                                    .background_color(header_bg),
                            );
                        }
                        ui.end_row();

                        for row in layout::table_cells(rows) {
                            for cell in row {
                                ui.label(
                                    RichText::new(cell)
                                        .size(11.0)
                                        .color(Color32::BLACK)
                                        .background_color(cell_bg),
                                );
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
