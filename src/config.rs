use std::path::PathBuf;

use eframe::egui;
use serde::{Deserialize, Serialize};

/// Storage key under which the config JSON is kept in eframe's app storage.
pub const STORAGE_KEY: &str = "seed_view_config";

/// Which widget renders the plotted traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlotBackend {
    /// egui_plot line charts with a date axis.
    #[default]
    Plot,
    /// wgpu line strips with pan/zoom.
    Gpu,
}

impl PlotBackend {
    pub fn label(self) -> &'static str {
        match self {
            PlotBackend::Plot => "Plot",
            PlotBackend::Gpu => "GPU",
        }
    }
}

/// User settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory the open dialog starts in.
    pub last_directory: Option<PathBuf>,
    pub backend: PlotBackend,
    /// Minimum height of each stacked plot, in points.
    pub min_plot_height: f32,
    pub dark_mode: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            last_directory: None,
            backend: PlotBackend::Plot,
            min_plot_height: 200.0,
            dark_mode: true,
        }
    }
}

impl ViewerConfig {
    /// Read the config from app storage, falling back to defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(text) = storage.and_then(|s| s.get_string(STORAGE_KEY)) else {
            return Self::default();
        };
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Ignoring stored config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(self) {
            Ok(text) => storage.set_string(STORAGE_KEY, text),
            Err(e) => log::error!("Failed to serialise config: {e}"),
        }
    }

    /// Directory for the open dialog: last used, else the home directory.
    pub fn start_directory(&self) -> Option<PathBuf> {
        self.last_directory.clone().or_else(dirs::home_dir)
    }

    /// egui visuals for the configured theme.
    pub fn visuals(&self) -> egui::Visuals {
        if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = ViewerConfig::from_json(r#"{ "backend": "Gpu" }"#);
        assert_eq!(cfg.backend, PlotBackend::Gpu);
        assert_eq!(cfg.min_plot_height, 200.0);
        assert!(cfg.dark_mode);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        assert_eq!(ViewerConfig::from_json("not json"), ViewerConfig::default());
    }

    #[test]
    fn missing_storage_gives_defaults() {
        assert_eq!(ViewerConfig::load(None), ViewerConfig::default());
    }

    #[test]
    fn last_directory_wins_over_home() {
        let cfg = ViewerConfig {
            last_directory: Some(PathBuf::from("/data/seed")),
            ..Default::default()
        };
        assert_eq!(cfg.start_directory(), Some(PathBuf::from("/data/seed")));
    }

    #[test]
    fn start_directory_falls_back_to_home() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.start_directory(), dirs::home_dir());
    }

    #[test]
    fn visuals_follow_dark_mode() {
        let mut cfg = ViewerConfig::default();
        assert!(cfg.visuals().dark_mode);
        cfg.dark_mode = false;
        assert!(!cfg.visuals().dark_mode);
    }
}
