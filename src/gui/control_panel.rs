//! Control Panel Widget
//! Left side panel: data source, cleaning summary, export and status.

use crime_dashboard::charts::Captions;
use crime_dashboard::data::CleaningReport;
use crime_dashboard::DashboardConfig;
use egui::{Color32, RichText};

/// Left side panel with dataset details and the snapshot export.
pub struct ControlPanel {
    pub status: String,
    pub is_error: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            is_error: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        config: &DashboardConfig,
        report: Option<CleaningReport>,
        captions: &Captions,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Crime Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(220, 20, 20)),
            );
            ui.label(RichText::new("Toronto MCI").size(11.0).color(Color32::GRAY));
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
                egui::Grid::new("data_source")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Incidents:");
                        ui.label(RichText::new(config.incident_path.display().to_string()).size(12.0));
                        ui.end_row();
                        ui.label("Boundaries:");
                        ui.label(RichText::new(config.boundary_path.display().to_string()).size(12.0));
                        ui.end_row();
                    });
            });

        if let Some(report) = report {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            // ===== Cleaning Section =====
            ui.label(RichText::new("🧹 Cleaning").size(14.0).strong());
            ui.add_space(5.0);
            egui::Grid::new("cleaning_report")
                .num_columns(2)
                .striped(true)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    let rows = [
                        ("Rows read", report.rows_in),
                        ("Missing values", report.dropped_missing),
                        ("NSA neighbourhood", report.dropped_sentinel),
                        ("Duplicates", report.dropped_duplicates),
                        ("Rows kept", report.rows_out),
                    ];
                    for (label, value) in rows {
                        ui.label(RichText::new(label).size(12.0));
                        ui.label(RichText::new(value.to_string()).size(12.0));
                        ui.end_row();
                    }
                });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new(format!("🖼 {}", captions.export_button)).size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportSnapshot;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Error: {}", error);
        self.is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ExportSnapshot,
}
