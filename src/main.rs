mod app;
mod color;
mod config;
mod data;
mod render;
mod state;
mod ui;

use app::SeedViewApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Seed View – MiniSEED Viewer",
        options,
        Box::new(|cc| Ok(Box::new(SeedViewApp::new(cc)))),
    )
}
