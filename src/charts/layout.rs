//! Chart Layout
//! Backend independent geometry shared by the static (plotters) and the
//! interactive (egui_plot) renderers: bar colors, pie slices, area stacks
//! and table cell text.

use crate::charts::palette::{ColorScale, ColorScheme, Rgb};
use crate::data::aggregate::{DramaPoint, DramaSummary, YearCategoryCount};
use std::f64::consts::{FRAC_PI_2, TAU};

/// One labeled, colored bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub label: String,
    pub value: u32,
    pub color: Rgb,
}

/// Color each `(label, count)` pair. Continuous schemes span the observed
/// count range, discrete ones cycle through the palette.
pub fn colored_bars(counts: &[(String, u32)], scheme: ColorScheme) -> Vec<BarMark> {
    let min = counts.iter().map(|(_, c)| *c).min().unwrap_or(0) as f64;
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;

    counts
        .iter()
        .enumerate()
        .map(|(i, (label, value))| BarMark {
            label: label.clone(),
            value: *value,
            color: match scheme {
                ColorScheme::Continuous(scale) => scale.map(*value as f64, min, max),
                ColorScheme::Discrete(palette) => palette.color(i),
            },
        })
        .collect()
}

/// Colors of scatter points, mapped on rating.
pub fn point_colors(points: &[DramaPoint], scale: ColorScale) -> Vec<Rgb> {
    let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, p| {
        (acc.0.min(p.rating), acc.1.max(p.rating))
    });
    points
        .iter()
        .map(|p| scale.map(p.rating, min, max))
        .collect()
}

/// Axis range padded by `pad` of its span on both sides.
pub fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |acc, v| {
        (acc.0.min(v), acc.1.max(v))
    });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let span = if max > min { max - min } else { 1.0 };
    (min - span * pad, max + span * pad)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u32,
    pub fraction: f64,
    /// Angles in radians on screen (y down). Slices run counterclockwise
    /// from 12 o'clock, so `end_angle < start_angle`.
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Rgb,
    /// Radial offset as a fraction of the radius.
    pub pull: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// `"label\n12.3%"`
    pub fn text(&self) -> String {
        format!("{}\n{:.1}%", self.label, self.fraction * 100.0)
    }

    /// Offset of the slice center for its pull, for a given radius.
    pub fn offset(&self, radius: f64) -> (f64, f64) {
        let angle = self.mid_angle();
        (
            angle.cos() * radius * self.pull,
            angle.sin() * radius * self.pull,
        )
    }

    /// Outline points of the slice (apex first), unit radius, unpulled.
    pub fn outline(&self, segments_per_turn: usize) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        let steps = ((sweep.abs() / TAU) * segments_per_turn as f64).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push((0.0, 0.0));
        for i in 0..=steps {
            let a = self.start_angle + sweep * i as f64 / steps as f64;
            points.push((a.cos(), a.sin()));
        }
        points
    }
}

/// Lay out pie slices in input order; the largest slice (first on ties)
/// is pulled out by `pull_largest`.
pub fn pie_slices(counts: &[(String, u32)], scheme: ColorScheme, pull_largest: f64) -> Vec<PieSlice> {
    let total: u32 = counts.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        return Vec::new();
    }
    let largest = counts
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u32)>, (i, (_, c))| match best {
            Some((_, b)) if b >= *c => best,
            _ => Some((i, *c)),
        })
        .map(|(i, _)| i);

    let bars = colored_bars(counts, scheme);
    let mut angle = -FRAC_PI_2;
    bars.into_iter()
        .enumerate()
        .map(|(i, bar)| {
            let fraction = bar.value as f64 / total as f64;
            let start = angle;
            angle -= fraction * TAU;
            PieSlice {
                label: bar.label,
                value: bar.value,
                fraction,
                start_angle: start,
                end_angle: angle,
                color: bar.color,
                pull: if Some(i) == largest { pull_largest } else { 0.0 },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaSeries {
    pub name: String,
    pub color: Rgb,
    /// Count per year, zero where the pair was not observed.
    pub values: Vec<u32>,
    /// Top edge of this series in the stack.
    pub upper: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedArea {
    pub years: Vec<i64>,
    pub series: Vec<AreaSeries>,
}

impl StackedArea {
    pub fn max_total(&self) -> u32 {
        self.series
            .last()
            .and_then(|s| s.upper.iter().max().copied())
            .unwrap_or(0)
    }
}

/// Stack two-key counts: one series per category in first-seen order,
/// over the ascending set of observed years.
pub fn stack_by_year(rows: &[YearCategoryCount], scheme: ColorScheme) -> StackedArea {
    let mut years: Vec<i64> = rows.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();

    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        if !names.contains(&row.category.as_str()) {
            names.push(&row.category);
        }
    }

    let mut below = vec![0u32; years.len()];
    let series = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut values = vec![0u32; years.len()];
            for row in rows.iter().filter(|r| r.category == *name) {
                if let Ok(pos) = years.binary_search(&row.year) {
                    values[pos] += row.count;
                }
            }
            let upper: Vec<u32> = below.iter().zip(&values).map(|(b, v)| b + v).collect();
            below.clone_from(&upper);
            AreaSeries {
                name: name.to_string(),
                color: match scheme {
                    ColorScheme::Discrete(palette) => palette.color(i),
                    ColorScheme::Continuous(scale) => {
                        scale.sample(i as f64 / names.len().max(2).saturating_sub(1) as f64)
                    }
                },
                values,
                upper,
            }
        })
        .collect();

    StackedArea { years, series }
}

/// Display text of the hall-of-fame rows.
pub fn table_cells(rows: &[DramaSummary]) -> Vec<[String; 5]> {
    rows.iter()
        .map(|r| {
            [
                r.name.clone(),
                r.rating.map(|v| v.to_string()).unwrap_or_default(),
                r.genre.clone().unwrap_or_default(),
                r.year.map(|v| v.to_string()).unwrap_or_default(),
                r.network.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::palette::Palette;

    fn days() -> Vec<(String, u32)> {
        vec![
            ("Friday".to_string(), 3),
            ("Saturday".to_string(), 3),
            ("Monday".to_string(), 2),
        ]
    }

    #[test]
    fn bars_span_the_color_scale() {
        let bars = colored_bars(&days(), ColorScheme::Continuous(ColorScale::Blues));
        assert_eq!(bars[0].color, ColorScale::Blues.sample(1.0));
        assert_eq!(bars[2].color, ColorScale::Blues.sample(0.0));
    }

    #[test]
    fn pie_slices_cover_the_circle_and_pull_first_largest() {
        let slices = pie_slices(&days(), ColorScheme::Discrete(Palette::T10), 0.1);
        assert_eq!(slices.len(), 3);
        assert!((slices[0].start_angle + FRAC_PI_2).abs() < 1e-12);
        assert!((slices[2].end_angle + FRAC_PI_2 + TAU).abs() < 1e-9);
        let pulls: Vec<f64> = slices.iter().map(|s| s.pull).collect();
        assert_eq!(pulls, vec![0.1, 0.0, 0.0]);
        assert_eq!(slices[2].text(), "Monday\n25.0%");
        assert_eq!(slices[1].color, Palette::T10.color(1));
    }

    #[test]
    fn pie_runs_counterclockwise_from_the_top() {
        let slices = pie_slices(&days(), ColorScheme::Discrete(Palette::T10), 0.1);
        assert!(slices.iter().all(|s| s.end_angle < s.start_angle));
        // First slice sits left of 12 o'clock, the last one right of it.
        assert!(slices[0].offset(1.0).0 < 0.0);
        assert!(slices[2].mid_angle().cos() > 0.0);
    }

    #[test]
    fn empty_pie_has_no_slices() {
        assert!(pie_slices(&[], ColorScheme::Discrete(Palette::T10), 0.1).is_empty());
    }

    #[test]
    fn slice_outline_starts_at_apex() {
        let slices = pie_slices(&days(), ColorScheme::Discrete(Palette::T10), 0.0);
        let outline = slices[0].outline(64);
        assert_eq!(outline[0], (0.0, 0.0));
        let first = outline[1];
        assert!(first.0.abs() < 1e-12 && (first.1 + 1.0).abs() < 1e-12);
    }

    #[test]
    fn stack_fills_unobserved_pairs_with_zero_for_drawing() {
        let rows = vec![
            YearCategoryCount { year: 2019, category: "15+".into(), count: 2 },
            YearCategoryCount { year: 2020, category: "15+".into(), count: 1 },
            YearCategoryCount { year: 2020, category: "18+".into(), count: 3 },
        ];
        let area = stack_by_year(&rows, ColorScheme::Discrete(Palette::Purp));
        assert_eq!(area.years, vec![2019, 2020]);
        assert_eq!(area.series[0].name, "15+");
        assert_eq!(area.series[1].values, vec![0, 3]);
        assert_eq!(area.series[1].upper, vec![2, 4]);
        assert_eq!(area.max_total(), 4);
    }

    #[test]
    fn padded_range_handles_empty_and_flat_input() {
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        assert_eq!(padded_range([5.0, 5.0].into_iter(), 0.5), (4.5, 5.5));
    }

    #[test]
    fn table_cells_leave_missing_values_blank() {
        let rows = vec![DramaSummary {
            name: "Move to Heaven".into(),
            rating: Some(9.2),
            genre: None,
            year: Some(2021),
            network: Some("Netflix".into()),
        }];
        assert_eq!(
            table_cells(&rows),
            vec![[
                "Move to Heaven".to_string(),
                "9.2".to_string(),
                String::new(),
                "2021".to_string(),
                "Netflix".to_string(),
            ]]
        );
    }
}
