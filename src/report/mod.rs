//! Report module - views, prose and memoized computation

mod cache;
pub mod narrative;
mod views;

pub use cache::ReportCache;
pub use views::{
    compute_report, Chapter, ChartKind, DerivedTable, LegendPosition, Orientation, Report, View,
    ViewSpec,
};
