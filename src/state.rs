use std::path::Path;
use std::sync::Arc;

use eframe::egui::Color32;
use egui_plot::PlotPoint;

use crate::color::{generate_palette, to_rgb_f32};
use crate::config::{PlotBackend, ViewerConfig};
use crate::data::loader::load_file;
use crate::data::model::{Stream, Trace};
use crate::render::{PanZoom, StripVertex, pack_strips};

// ---------------------------------------------------------------------------
// Plot series cache
// ---------------------------------------------------------------------------

/// Ready-to-draw line for one plotted trace in the egui_plot backend.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    /// Index of the trace in the stream.
    pub index: usize,
    pub name: String,
    pub color: Color32,
    /// `(epoch seconds, amplitude)` per sample.
    pub points: Vec<PlotPoint>,
}

impl PlotSeries {
    fn new(index: usize, trace: &Trace, color: Color32) -> Self {
        let points = trace
            .times()
            .zip(trace.data.iter())
            .map(|(t, &y)| PlotPoint::new(t, y))
            .collect();
        Self {
            index,
            name: trace.id.to_string(),
            color,
            points,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded stream (None until the user loads a file).
    pub stream: Option<Stream>,

    /// Trace the context menu acts on.
    pub selected: Option<usize>,

    /// Traces shown in the plot area, in display order.
    pub plotted: Vec<usize>,

    /// Pan/zoom of the GPU view.
    pub view: PanZoom,

    /// Persisted user settings (backend, last directory, ...).
    pub config: ViewerConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the wgpu line-strip renderer was installed.
    pub gpu_available: bool,

    /// Whether the stream table window is open.
    pub show_stream_table: bool,

    /// Bumped whenever `gpu_vertices` changes so the GPU copy is refreshed.
    geometry_generation: u64,

    gpu_vertices: Arc<Vec<StripVertex>>,

    /// Lines for the plotted traces, rebuilt with the plotted list.
    plot_series: Vec<PlotSeries>,

    /// `min_max` of every stream trace, rebuilt with the stream.
    amplitude_ranges: Vec<Option<(f64, f64)>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(ViewerConfig::default())
    }
}

impl AppState {
    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            stream: None,
            selected: None,
            plotted: Vec::new(),
            view: PanZoom::default(),
            config,
            status_message: None,
            gpu_available: false,
            show_stream_table: false,
            geometry_generation: 0,
            gpu_vertices: Arc::new(Vec::new()),
            plot_series: Vec::new(),
            amplitude_ranges: Vec::new(),
        }
    }

    /// Replace the loaded stream; selection and plots are cleared.
    pub fn set_stream(&mut self, stream: Stream) {
        self.amplitude_ranges = stream.traces.iter().map(Trace::min_max).collect();
        self.stream = Some(stream);
        self.selected = None;
        self.status_message = None;
        self.set_plotted(Vec::new());
    }

    /// Load a MiniSEED file. Non-existent paths are skipped.
    ///
    /// Returns whether a new stream was loaded.
    pub fn load_path(&mut self, path: &Path) -> bool {
        if !path.exists() {
            log::warn!("Skipping non-existent path {}", path.display());
            return false;
        }

        match load_file(path) {
            Ok(stream) => {
                log::info!("Loaded {} trace(s) from {}", stream.len(), path.display());
                if let Some(dir) = path.parent() {
                    self.config.last_directory = Some(dir.to_path_buf());
                }
                self.set_stream(stream);
                true
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
                false
            }
        }
    }

    /// Select the trace at `index`; out-of-range indices are ignored.
    pub fn select_trace(&mut self, index: usize) {
        let in_range = self.stream.as_ref().is_some_and(|st| index < st.len());
        if in_range {
            self.selected = Some(index);
        }
    }

    pub fn selected_trace(&self) -> Option<&Trace> {
        let st = self.stream.as_ref()?;
        st.get(self.selected?)
    }

    /// Show only the selected trace.
    pub fn plot_selected(&mut self) {
        if let Some(index) = self.selected {
            log::info!("Plotting trace {index}");
            self.set_plotted(vec![index]);
        }
    }

    /// Show every trace of the stream.
    pub fn plot_all(&mut self) {
        let n = self.stream.as_ref().map_or(0, Stream::len);
        log::info!("Plotting all {n} trace(s)");
        self.set_plotted((0..n).collect());
    }

    pub fn plotted_traces(&self) -> Vec<(usize, &Trace)> {
        let Some(st) = &self.stream else {
            return Vec::new();
        };
        self.plotted
            .iter()
            .filter_map(|&i| st.get(i).map(|tr| (i, tr)))
            .collect()
    }

    pub fn set_backend(&mut self, backend: PlotBackend) {
        self.config.backend = backend;
    }

    pub fn gpu_vertices(&self) -> Arc<Vec<StripVertex>> {
        Arc::clone(&self.gpu_vertices)
    }

    pub fn geometry_generation(&self) -> u64 {
        self.geometry_generation
    }

    pub fn plot_series(&self) -> &[PlotSeries] {
        &self.plot_series
    }

    /// Amplitude range of each stream trace, by index.
    pub fn amplitude_ranges(&self) -> &[Option<(f64, f64)>] {
        &self.amplitude_ranges
    }

    fn set_plotted(&mut self, plotted: Vec<usize>) {
        self.plotted = plotted;
        self.view.reset();

        let palette = generate_palette(self.stream.as_ref().map_or(0, Stream::len));
        let traces = self.plotted_traces();
        let colors: Vec<[f32; 3]> = traces
            .iter()
            .filter_map(|(i, _)| palette.get(*i).copied().map(to_rgb_f32))
            .collect();
        let series: Vec<PlotSeries> = traces
            .iter()
            .map(|&(i, tr)| {
                let color = palette.get(i).copied().unwrap_or(Color32::WHITE);
                PlotSeries::new(i, tr, color)
            })
            .collect();
        let refs: Vec<&Trace> = traces.iter().map(|(_, tr)| *tr).collect();
        let vertices = pack_strips(&refs, &colors);

        self.plot_series = series;
        self.gpu_vertices = Arc::new(vertices);
        self.geometry_generation += 1;
    }
}
