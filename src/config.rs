//! Report settings. Only hard-coded defaults; nothing is read from the
//! environment or from disk.

use serde::Serialize;
use std::path::PathBuf;

/// Dataset shipped next to the binary.
pub const DEFAULT_CSV: &str = "top100_kdrama_aug_2023.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSettings {
    pub csv_path: PathBuf,
    /// Categories kept by the genre, network and tag views.
    pub top_categories: usize,
    /// Rows of the hall-of-fame table.
    pub top_dramas: usize,
    /// Pixel size of exported chart images.
    pub chart_size: (u32, u32),
    pub html_file_name: String,
    pub json_file_name: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV),
            top_categories: 10,
            top_dramas: 10,
            chart_size: (900, 560),
            html_file_name: "kdrama_report.html".to_string(),
            json_file_name: "kdrama_views.json".to_string(),
        }
    }
}

impl ReportSettings {
    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }
}
