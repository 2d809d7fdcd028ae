//! Memoized report computation, keyed by the loaded file's fingerprint.

use crate::config::ReportSettings;
use crate::data::aggregate::AggregateError;
use crate::data::DramaTable;
use crate::report::views::{compute_report, Report};
use std::sync::Arc;
use tracing::debug;

/// Holds the last computed report. A reload of an unchanged file reuses
/// it; any other table or settings recompute.
#[derive(Default)]
pub struct ReportCache {
    key: Option<String>,
    report: Option<Arc<Report>>,
    hits: usize,
    misses: usize,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        table: &DramaTable,
        settings: &ReportSettings,
    ) -> Result<Arc<Report>, AggregateError> {
        let key = format!(
            "{}:{}:{}",
            table.fingerprint(),
            settings.top_categories,
            settings.top_dramas
        );

        if let (Some(cached), Some(report)) = (&self.key, &self.report) {
            if *cached == key {
                self.hits += 1;
                debug!("Report cache hit for {}", &key[..12.min(key.len())]);
                return Ok(Arc::clone(report));
            }
        }

        self.misses += 1;
        let report = Arc::new(compute_report(table, settings)?);
        self.key = Some(key);
        self.report = Some(Arc::clone(&report));
        Ok(report)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
