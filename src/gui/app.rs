//! K-Drama Report Main Application
//! Main window with control panel and report viewer.

use crate::config::ReportSettings;
use crate::data::{DramaLoader, DramaTable};
use crate::export::{PlottersSvg, ReportExporter};
use crate::gui::{ControlPanel, ControlPanelAction, ReportViewer};
use crate::report::ReportCache;
use anyhow::{Context, Result};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{error, info};

/// CSV loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete(Box<DramaTable>),
    Error(String),
}

/// Main application window.
pub struct ReportApp {
    settings: ReportSettings,
    loader: DramaLoader,
    cache: ReportCache,
    control_panel: ControlPanel,
    viewer: ReportViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ReportApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: ReportSettings) -> Self {
        let mut app = Self {
            settings,
            loader: DramaLoader::new(),
            cache: ReportCache::new(),
            control_panel: ControlPanel::new(),
            viewer: ReportViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        // The bundled dataset is loaded right away when it is present.
        let default_csv = app.settings.csv_path.clone();
        if default_csv.exists() {
            app.start_loading(default_csv);
        } else {
            app.control_panel
                .set_progress(0.0, "Select the K-drama CSV file to begin");
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.settings = self.settings.clone().with_csv_path(&path);
            self.start_loading(path);
        }
    }

    /// Read the CSV in a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        self.control_panel.set_source(&path);
        self.control_panel.set_progress(5.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(
                20.0,
                format!("Reading {}...", path.display()),
            ));

            match DramaLoader::read(&path) {
                Ok(table) => {
                    let _ = tx.send(LoadResult::Complete(Box::new(table)));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            for result in drain_load_results(&rx) {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(table) => {
                        self.loader.set_table(*table);
                        self.build_report();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(message) => {
                        error!("Loading failed: {}", message);
                        self.viewer.clear();
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", message));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Compute (or reuse) the report for the loaded table.
    fn build_report(&mut self) {
        let Some(table) = self.loader.get_table() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        self.control_panel.set_progress(60.0, "Computing views...");
        let summary = match table.network_fill() {
            Some(fill) => format!("{} dramas, missing networks set to {}", table.height(), fill),
            None => format!("{} dramas", table.height()),
        };
        let hits_before = self.cache.hits();

        match self.cache.get_or_compute(table, &self.settings) {
            Ok(report) => {
                let reused = self.cache.hits() > hits_before;
                info!(
                    "Report ready with {} chapters{}",
                    report.chapters.len(),
                    if reused { " (unchanged file)" } else { "" }
                );
                self.viewer.set_report(report);
                self.control_panel.summary = Some(summary);
                self.control_panel.report_ready = true;
                self.control_panel.set_progress(
                    100.0,
                    if reused {
                        "Complete! File unchanged, report reused"
                    } else {
                        "Complete! Report ready"
                    },
                );
            }
            Err(e) => {
                error!("Report computation failed: {}", e);
                self.viewer.clear();
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_export(&mut self, action: ControlPanelAction) {
        match self.export(action) {
            Ok(Some(status)) => self.control_panel.set_progress(100.0, &status),
            Ok(None) => {}
            Err(e) => {
                error!("Export failed: {:#}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }

    /// Run one export. `Ok(None)` when the user cancelled the dialog.
    fn export(&mut self, action: ControlPanelAction) -> Result<Option<String>> {
        let Some(report) = self.viewer.report().cloned() else {
            return Ok(Some("No report to export".to_string()));
        };
        let Some(dir) = Self::pick_export_dir(self.settings.csv_path.parent()) else {
            return Ok(None);
        };

        let status = match action {
            ControlPanelAction::ExportHtml => {
                let path = ReportExporter::write_html(&report, &PlottersSvg, &dir, &self.settings)
                    .context("HTML export failed")?;
                if let Err(e) = ReportExporter::open(&path) {
                    return Ok(Some(format!("Saved {} ({})", path.display(), e)));
                }
                format!("Complete! Opened {}", path.display())
            }
            ControlPanelAction::ExportPngs => {
                let written = ReportExporter::write_pngs(&report, &dir, &self.settings)
                    .context("Chart image export failed")?;
                format!("Complete! {} chart images saved", written.len())
            }
            ControlPanelAction::ExportJson => {
                let path = ReportExporter::write_json(&report, &dir, &self.settings)
                    .context("JSON export failed")?;
                format!("Complete! Saved {}", path.display())
            }
            _ => return Ok(None),
        };
        Ok(Some(status))
    }

    fn pick_export_dir(start: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title("Export folder");
        if let Some(dir) = start.filter(|d| d.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }
}

/// Take every pending message. A loader thread that went away without a
/// final message is reported as an error so loading always ends.
fn drain_load_results(rx: &Receiver<LoadResult>) -> Vec<LoadResult> {
    let mut results = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(result) => results.push(result),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                let finished = results
                    .iter()
                    .any(|r| matches!(r, LoadResult::Complete(_) | LoadResult::Error(_)));
                if !finished {
                    results.push(LoadResult::Error(
                        "Loader stopped before finishing".to_string(),
                    ));
                }
                break;
            }
        }
    }
    results
}

impl eframe::App for ReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.is_loading);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => {
                            let path = self.settings.csv_path.clone();
                            self.start_loading(path);
                        }
                        ControlPanelAction::ExportHtml
                        | ControlPanelAction::ExportPngs
                        | ControlPanelAction::ExportJson => self.handle_export(action),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_loader_ends_with_an_error() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Progress(20.0, "Reading...".to_string()))
            .unwrap();
        drop(tx);

        let results = drain_load_results(&rx);
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], LoadResult::Progress(..)));
        assert!(matches!(results[1], LoadResult::Error(ref m) if m.contains("stopped")));
    }

    #[test]
    fn finished_loader_adds_nothing() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Error("bad file".to_string())).unwrap();
        drop(tx);

        let results = drain_load_results(&rx);
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], LoadResult::Error(ref m) if m == "bad file"));
    }

    #[test]
    fn running_loader_is_left_alone() {
        let (tx, rx) = channel::<LoadResult>();
        assert!(drain_load_results(&rx).is_empty());
        drop(tx);
    }
}
