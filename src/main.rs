//! Crime Dashboard - Toronto Major Crime Indicators viewer
//!
//! Downloads the incident table on first run, cleans it and shows the charts.

mod gui;

use crime_dashboard::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    pretty_env_logger::init();

    let config = std::env::current_dir()
        .map_err(|e| log::warn!("Cannot resolve working directory: {}", e))
        .ok()
        .and_then(|dir| {
            DashboardConfig::discover(&dir)
                .map_err(|e| log::error!("{}, using defaults", e))
                .ok()
        })
        .unwrap_or_default();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Crimes in Toronto Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Crime Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
