//! Report Viewer Widget
//! Central scrollable panel showing the report in reading order: title,
//! introduction, one card per chapter and the closing prose.

use crate::charts::ChartPlotter;
use crate::report::Report;
use egui::{Color32, RichText, ScrollArea};
use std::sync::Arc;

const CARD_WIDTH: f32 = 820.0;
const CARD_SPACING: f32 = 18.0;

#[derive(Default)]
pub struct ReportViewer {
    report: Option<Arc<Report>>,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.report = None;
    }

    pub fn set_report(&mut self, report: Arc<Report>) {
        self.report = Some(report);
    }

    pub fn report(&self) -> Option<&Arc<Report>> {
        self.report.as_ref()
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.set_max_width(CARD_WIDTH);

                    ui.add_space(CARD_SPACING);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(report.title).size(26.0).strong());
                    });
                    ui.add_space(8.0);
                    ui.label(RichText::new(report.introduction).size(14.0));
                    ui.add_space(CARD_SPACING);

                    for (i, chapter) in report.chapters.iter().enumerate() {
                        egui::Frame::none()
                            .rounding(8.0)
                            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
                            .fill(ui.visuals().extreme_bg_color)
                            .inner_margin(12.0)
                            .show(ui, |ui| {
                                ui.set_width(CARD_WIDTH - 24.0);
                                ui.vertical(|ui| {
                                    ui.label(
                                        RichText::new(chapter.heading)
                                            .size(20.0)
                                            .strong()
                                            .color(Color32::from_rgb(219, 112, 147)),
                                    );
                                    ui.add_space(6.0);
                                    ui.label(RichText::new(chapter.lead).size(13.0));
                                    ui.add_space(10.0);

                                    ChartPlotter::draw_view(ui, i, &chapter.view);

                                    if let Some(caption) = chapter.caption {
                                        ui.add_space(10.0);
                                        ui.label(RichText::new(caption).size(13.0).italics());
                                    }
                                });
                            });
                        ui.add_space(CARD_SPACING);
                    }

                    for block in &report.closing {
                        ui.label(RichText::new(*block).size(14.0).italics());
                        ui.add_space(10.0);
                    }
                    ui.add_space(CARD_SPACING);
                });
            });
    }
}
