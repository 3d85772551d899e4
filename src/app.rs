use std::path::PathBuf;

use eframe::egui;

use crate::config::{PlotBackend, ViewerConfig};
use crate::render::LineStripRenderer;
use crate::state::AppState;
use crate::ui::{gpu_plot, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SeedViewApp {
    pub state: AppState,
}

impl SeedViewApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = ViewerConfig::load(cc.storage);
        cc.egui_ctx.set_visuals(config.visuals());

        let mut state = AppState::with_config(config);

        match cc.wgpu_render_state.as_ref() {
            Some(render_state) => {
                LineStripRenderer::install(render_state);
                state.gpu_available = true;
            }
            None => {
                log::warn!("No wgpu render state, GPU backend disabled");
                state.set_backend(PlotBackend::Plot);
            }
        }

        Self { state }
    }

    /// Load files dropped onto the window, in drop order.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        for path in dropped {
            self.state.load_path(&path);
        }
    }
}

impl eframe::App for SeedViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        let files_hovered = ctx.input(|i| !i.raw.hovered_files.is_empty());

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: trace tree / drop target ----
        egui::SidePanel::left("trace_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, files_hovered);
            });

        // ---- Central panel: plots ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.config.backend {
            PlotBackend::Plot => plot::waveform_plots(ui, &self.state),
            PlotBackend::Gpu => gpu_plot::gpu_waveform(ui, &mut self.state),
        });

        // ---- Stream table window ----
        let mut open = self.state.show_stream_table;
        if let Some(stream) = &self.state.stream {
            let ranges = self.state.amplitude_ranges();
            egui::Window::new("Stream")
                .open(&mut open)
                .default_width(720.0)
                .show(ctx, |ui| panels::stream_table(ui, stream, ranges));
        }
        self.state.show_stream_table = open;
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.state.config.save(storage);
    }
}
