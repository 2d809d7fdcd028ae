//! K-Drama Report - the top 100 K-dramas of August 2023 as a narrative
//! report with interactive charts.

use eframe::egui;
use kdrama_report::config::ReportSettings;
use kdrama_report::gui::ReportApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    init_logging();

    let settings = ReportSettings::default();
    info!("Starting with data source {}", settings.csv_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("K-Drama Report"),
        ..Default::default()
    };

    eframe::run_native(
        "K-Drama Report",
        options,
        Box::new(|cc| Ok(Box::new(ReportApp::new(cc, settings)))),
    )
}

/// `RUST_LOG` wins over the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
