//! Control Panel Widget
//! Left side panel with the data source, export buttons and progress.

use egui::{Color32, RichText};
use std::path::{Path, PathBuf};

/// Left side control panel with file selection and export controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    /// One line describing the loaded table.
    pub summary: Option<String>,
    pub progress: f32,
    pub status: String,
    pub report_ready: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            summary: None,
            progress: 0.0,
            status: "Ready".to_string(),
            report_ready: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source(&mut self, path: &Path) {
        self.csv_path = Some(path.to_path_buf());
        self.summary = None;
        self.report_ready = false;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📺 K-Drama Report")
                    .size(22.0)
                    .color(Color32::from_rgb(219, 112, 147)),
            );
            ui.label(
                RichText::new("Top 100, August 2023")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!busy, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });

                if let Some(summary) = &self.summary {
                    ui.add_space(4.0);
                    ui.label(RichText::new(summary).size(11.0).color(Color32::GRAY));
                }
            });

        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!busy && self.csv_path.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("🔄 Reload").size(14.0))
                    .min_size(egui::vec2(150.0, 28.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("📤 Export").size(14.0).strong());
        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.report_ready && !busy, |ui| {
                let exports = [
                    ("🌐 HTML Report", ControlPanelAction::ExportHtml),
                    ("🖼 Chart Images", ControlPanelAction::ExportPngs),
                    ("🧾 View Tables (JSON)", ControlPanelAction::ExportJson),
                ];
                for (label, export) in exports {
                    let button = egui::Button::new(RichText::new(label).size(14.0))
                        .min_size(egui::vec2(200.0, 30.0));
                    if ui.add(button).clicked() {
                        action = export;
                    }
                    ui.add_space(6.0);
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    ExportHtml,
    ExportPngs,
    ExportJson,
}
