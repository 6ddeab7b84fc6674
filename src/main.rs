//! District Lens - Congressional District Data Explorer
//!
//! A Rust application for exploring per-district socio-economic data with
//! interactive bar charts and choropleth maps.

mod charts;
mod config;
mod data;
mod geo;
mod gui;

use eframe::egui;
use gui::DistrictLensApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let render_config = config::RenderConfig::load_or_default();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("District Lens"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "District Lens",
        options,
        Box::new(move |cc| Ok(Box::new(DistrictLensApp::new(cc, render_config)))),
    )
}
