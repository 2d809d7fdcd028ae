//! Report Views
//! The eight chapters of the report: what each one aggregates and how it
//! is meant to be drawn.

use crate::charts::palette::{ColorScale, ColorScheme, Palette};
use crate::config::ReportSettings;
use crate::data::aggregate::{
    AggregateError, CategoryCount, DramaPoint, DramaSummary, ViewAggregator, YearCategoryCount,
    YearCount,
};
use crate::data::schema;
use crate::data::DramaTable;
use crate::report::narrative;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Scatter,
    Pie,
    Area,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegendPosition {
    Hidden,
    Right,
}

/// Fixed styling of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub color: ColorScheme,
    pub orientation: Orientation,
    /// Draw the value next to each bar.
    pub text_labels: bool,
    /// Category tick label rotation in degrees.
    pub tick_angle: u16,
    pub legend: LegendPosition,
    /// Offset of the largest pie slice, as a fraction of the radius.
    pub pull_largest: f64,
    /// Header row of table views.
    pub headers: &'static [&'static str],
}

impl ViewSpec {
    fn new(kind: ChartKind, title: &'static str, color: ColorScheme) -> Self {
        Self {
            kind,
            title,
            x_title: "",
            y_title: "",
            color,
            orientation: Orientation::Vertical,
            text_labels: false,
            tick_angle: 0,
            legend: LegendPosition::Hidden,
            pull_largest: 0.0,
            headers: &[],
        }
    }

    /// Bar chart colored by value, with labels outside the bars.
    fn bar(title: &'static str, scale: ColorScale) -> Self {
        Self {
            text_labels: true,
            ..Self::new(ChartKind::Bar, title, ColorScheme::Continuous(scale))
        }
    }

    fn axes(mut self, x_title: &'static str, y_title: &'static str) -> Self {
        self.x_title = x_title;
        self.y_title = y_title;
        self
    }

    fn tick_angle(mut self, degrees: u16) -> Self {
        self.tick_angle = degrees;
        self
    }

    fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }
}

/// Small aggregation result feeding one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum DerivedTable {
    YearCounts(Vec<YearCount>),
    CategoryCounts(Vec<CategoryCount>),
    Points(Vec<DramaPoint>),
    YearCategoryCounts(Vec<YearCategoryCount>),
    TopDramas(Vec<DramaSummary>),
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        match self {
            DerivedTable::YearCounts(rows) => rows.len(),
            DerivedTable::CategoryCounts(rows) => rows.len(),
            DerivedTable::Points(rows) => rows.len(),
            DerivedTable::YearCategoryCounts(rows) => rows.len(),
            DerivedTable::TopDramas(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(label, count)` pairs for tables that are a single count per key.
    pub fn labeled_counts(&self) -> Option<Vec<(String, u32)>> {
        match self {
            DerivedTable::YearCounts(rows) => Some(
                rows.iter()
                    .map(|r| (r.year.to_string(), r.count))
                    .collect(),
            ),
            DerivedTable::CategoryCounts(rows) => Some(
                rows.iter()
                    .map(|r| (r.category.clone(), r.count))
                    .collect(),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub spec: ViewSpec,
    pub table: DerivedTable,
}

/// A view with its heading and prose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub heading: &'static str,
    pub lead: &'static str,
    pub view: View,
    pub caption: Option<&'static str>,
}

/// The whole document, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: &'static str,
    pub introduction: &'static str,
    pub chapters: Vec<Chapter>,
    /// Narrative blocks after the last chapter.
    pub closing: Vec<&'static str>,
    /// Fingerprint of the CSV the report was computed from.
    pub source_fingerprint: String,
}

/// Compute every view of the report from the loaded table, in document order.
pub fn compute_report(
    table: &DramaTable,
    settings: &ReportSettings,
) -> Result<Report, AggregateError> {
    let df = table.frame();
    let top = Some(settings.top_categories);
    let mut chapters = Vec::with_capacity(8);

    debug!("Computing releases by year");
    chapters.push(Chapter {
        heading: narrative::SURGE_HEADING,
        lead: narrative::SURGE_LEAD,
        view: View {
            spec: ViewSpec::bar("Number of K-Dramas by Year", ColorScale::Blues)
                .axes("Year of Release", "Number of Dramas"),
            table: DerivedTable::YearCounts(ViewAggregator::count_by_year(df)?),
        },
        caption: None,
    });

    debug!("Computing episode count vs rating");
    chapters.push(Chapter {
        heading: narrative::SHORT_HEADING,
        lead: narrative::SHORT_LEAD,
        view: View {
            spec: ViewSpec::new(
                ChartKind::Scatter,
                "Episode Count vs. Rating",
                ColorScheme::Continuous(ColorScale::Turbo),
            )
            .axes("Number of Episodes", "Rating"),
            table: DerivedTable::Points(ViewAggregator::episode_rating_points(df)?),
        },
        caption: Some(narrative::SHORT_CAPTION),
    });

    debug!("Computing top genres");
    chapters.push(Chapter {
        heading: narrative::GENRE_HEADING,
        lead: narrative::GENRE_LEAD,
        view: View {
            spec: ViewSpec::bar("Top 10 Most Common Genres in K-Dramas", ColorScale::PuRd)
                .axes("Genre", "Number of Dramas")
                .tick_angle(45),
            table: DerivedTable::CategoryCounts(ViewAggregator::explode_count(
                df,
                schema::GENRE,
                top,
            )?),
        },
        caption: Some(narrative::GENRE_CAPTION),
    });

    debug!("Computing top networks");
    chapters.push(Chapter {
        heading: narrative::NETWORK_HEADING,
        lead: narrative::NETWORK_LEAD,
        view: View {
            spec: ViewSpec::bar(
                "Top Networks by Number of High-Ranking Dramas",
                ColorScale::Peach,
            )
            .axes("Network", "Number of Dramas")
            .tick_angle(45),
            table: DerivedTable::CategoryCounts(ViewAggregator::explode_count(
                df,
                schema::NETWORK,
                top,
            )?),
        },
        caption: Some(narrative::NETWORK_CAPTION),
    });

    debug!("Computing air days");
    chapters.push(Chapter {
        heading: narrative::RHYTHM_HEADING,
        lead: narrative::RHYTHM_LEAD,
        view: View {
            spec: ViewSpec {
                pull_largest: 0.1,
                ..ViewSpec::new(
                    ChartKind::Pie,
                    "Proportion of Dramas Aired on Different Days",
                    ColorScheme::Discrete(Palette::T10),
                )
            },
            table: DerivedTable::CategoryCounts(ViewAggregator::explode_count(
                df,
                schema::AIRED_ON,
                None,
            )?),
        },
        caption: Some(narrative::RHYTHM_CAPTION),
    });

    debug!("Computing content rating trends");
    chapters.push(Chapter {
        heading: narrative::BOLDNESS_HEADING,
        lead: narrative::BOLDNESS_LEAD,
        view: View {
            spec: ViewSpec {
                legend: LegendPosition::Right,
                ..ViewSpec::new(
                    ChartKind::Area,
                    "Content Rating Trends Over the Years",
                    ColorScheme::Discrete(Palette::Purp),
                )
                .axes("Year of Release", "Number of Dramas")
            },
            table: DerivedTable::YearCategoryCounts(ViewAggregator::count_by_year_and(
                df,
                schema::CONTENT_RATING,
            )?),
        },
        caption: Some(narrative::BOLDNESS_CAPTION),
    });

    debug!("Computing top tags");
    chapters.push(Chapter {
        heading: narrative::THEMES_HEADING,
        lead: narrative::THEMES_LEAD,
        view: View {
            spec: ViewSpec::bar("Top 10 Most Common Tags in K-Dramas", ColorScale::Burg)
                .axes("Number of Dramas", "Tag")
                .horizontal(),
            table: DerivedTable::CategoryCounts(ViewAggregator::explode_count(
                df,
                schema::TAGS,
                top,
            )?),
        },
        caption: Some(narrative::THEMES_CAPTION),
    });

    debug!("Computing hall of fame");
    chapters.push(Chapter {
        heading: narrative::FAME_HEADING,
        lead: narrative::FAME_LEAD,
        view: View {
            spec: ViewSpec {
                headers: &["Drama Name", "Rating", "Genre", "Year of Release", "Network"],
                ..ViewSpec::new(
                    ChartKind::Table,
                    "Top 10 K-Dramas by Rating",
                    ColorScheme::Discrete(Palette::T10),
                )
            },
            table: DerivedTable::TopDramas(ViewAggregator::top_by_rating(
                df,
                settings.top_dramas,
            )?),
        },
        caption: None,
    });

    info!(
        "Computed {} views from {} dramas",
        chapters.len(),
        table.height()
    );

    Ok(Report {
        title: narrative::TITLE,
        introduction: narrative::INTRODUCTION,
        chapters,
        closing: vec![narrative::FAME_CAPTION, narrative::EPILOGUE],
        source_fingerprint: table.fingerprint().to_string(),
    })
}
