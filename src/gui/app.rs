//! Crime Dashboard Main Application
//! Main window with control panel and dashboard.

use crate::gui::{ControlPanel, ControlPanelAction, Dashboard};
use crime_dashboard::aggregate::{AggregationPolicy, Aggregator};
use crime_dashboard::charts::{Captions, StaticChartRenderer};
use crime_dashboard::{build_context, DashboardConfig, DataContext};
use egui::{Color32, RichText, SidePanel};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Dataset loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(DataContext),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    aggregator: Aggregator,
    captions: &'static Captions,
    control_panel: ControlPanel,
    dashboard: Dashboard,

    data: Option<DataContext>,
    fatal_error: Option<String>,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            aggregator: Aggregator::new(AggregationPolicy::from(&config)),
            captions: Captions::for_locale(config.locale),
            config,
            control_panel: ControlPanel::new(),
            dashboard: Dashboard::new(),
            data: None,
            fatal_error: None,
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load and clean the dataset in a background thread.
    fn start_loading(&mut self) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status(self.captions.loading);

        let config = self.config.clone();
        thread::spawn(move || {
            let mut progress = |status: &str| {
                let _ = tx.send(LoadResult::Progress(status.to_string()));
            };
            let result = build_context(&config, &mut progress);

            let _ = match result {
                Ok(data) => tx.send(LoadResult::Complete(data)),
                Err(e) => {
                    log::error!("{:#}", e);
                    tx.send(LoadResult::Error(format!("{:#}", e)))
                }
            };
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self, ctx: &egui::Context) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete(data) => {
                        let report = data.cleaning_report();
                        self.control_panel.set_status(&format!(
                            "Loaded {} incidents, {} neighbourhoods",
                            report.rows_out,
                            data.boundaries().len()
                        ));
                        self.control_panel.export_enabled = true;
                        self.dashboard.prepare_map(ctx, &data, &self.aggregator);
                        self.data = Some(data);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_error(&error);
                        self.fatal_error = Some(error);
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

    /// Write PNG snapshots of every chart into a folder the user picks.
    fn handle_export_snapshot(&mut self) {
        let Some(data) = self.data.as_ref() else {
            self.control_panel.set_status("No data loaded");
            return;
        };

        let dir = match rfd::FileDialog::new()
            .set_title(self.captions.export_button)
            .pick_folder()
        {
            Some(dir) => dir,
            None => return, // User cancelled
        };

        self.control_panel.set_status("Rendering charts...");
        match StaticChartRenderer::export_snapshot(data, &self.aggregator, self.captions, &dir) {
            Ok(report) => {
                if report.failed.is_empty() {
                    self.control_panel
                        .set_status(&format!("Exported {} charts", report.written.len()));
                } else {
                    self.control_panel.set_error(&format!(
                        "Exported {} charts, {} failed",
                        report.written.len(),
                        report.failed.len()
                    ));
                }
                if let Err(e) = open::that(&dir) {
                    log::warn!("Could not open {}: {}", dir.display(), e);
                }
            }
            Err(e) => self.control_panel.set_error(&e.to_string()),
        }
    }

    fn show_fatal_error(ui: &mut egui::Ui, error: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(
                RichText::new("⚠ Dashboard unavailable")
                    .size(24.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            ui.add_space(10.0);
            ui.label(RichText::new(error).size(14.0));
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results(ctx);

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let report = self.data.as_ref().map(|d| d.cleaning_report());
                    let action = self.control_panel.show(ui, &self.config, report, self.captions);

                    match action {
                        ControlPanelAction::ExportSnapshot => self.handle_export_snapshot(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.fatal_error {
                Self::show_fatal_error(ui, error);
            } else if let Some(data) = &self.data {
                self.dashboard.show(ui, data, &self.aggregator, self.captions);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new(&self.control_panel.status).size(18.0));
                    });
                });
            }
        });
    }
}
