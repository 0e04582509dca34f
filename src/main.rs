//! Keystone GUI
//!
//! Hotseat play for two players on one screen.

use keystone::ui::KeystoneApp;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keystone=info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Keystone"),
        ..Default::default()
    };

    eframe::run_native(
        "Keystone",
        options,
        Box::new(|cc| Ok(Box::new(KeystoneApp::new(cc)))),
    )
}
