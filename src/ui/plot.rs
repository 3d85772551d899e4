use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints};

use crate::data::model::{format_time, from_epoch_seconds};
use crate::state::AppState;

/// Height taken by the title label above each plot.
const TITLE_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Waveform plots (central panel)
// ---------------------------------------------------------------------------

/// Render one plot per plotted trace, stacked in a scroll area.
pub fn waveform_plots(ui: &mut Ui, state: &AppState) {
    let series = state.plot_series();
    if series.is_empty() {
        empty_hint(ui, state);
        return;
    }

    let plot_height = stacked_plot_height(
        ui.available_height(),
        series.len(),
        state.config.min_plot_height,
    );

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for s in series {
                ui.label(RichText::new(&s.name).strong());

                let line = Line::new(PlotPoints::Borrowed(&s.points))
                    .name(&s.name)
                    .color(s.color)
                    .width(1.0);

                Plot::new(("waveform", s.index))
                    .height(plot_height)
                    .x_axis_label("Time (UTC)")
                    .x_axis_formatter(|mark, _range| axis_time_label(mark.value))
                    .label_formatter(hover_label)
                    .allow_boxed_zoom(true)
                    .allow_drag(true)
                    .allow_scroll(false)
                    .allow_zoom(true)
                    .show(ui, |plot_ui| {
                        plot_ui.line(line);
                    });
            }
        });
}

fn empty_hint(ui: &mut Ui, state: &AppState) {
    let text = if state.stream.is_some() {
        "Right-click a trace and choose “Plot Trace”"
    } else {
        "Open a MiniSEED file to view traces  (File → Open…)"
    };
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

/// Height of each plot widget: an equal share of the area minus its title,
/// never below `min`.
pub fn stacked_plot_height(available: f32, count: usize, min: f32) -> f32 {
    if count == 0 {
        return min;
    }
    (available / count as f32 - TITLE_HEIGHT).max(min)
}

/// Tick label for an epoch-seconds axis value.
pub fn axis_time_label(secs: f64) -> String {
    match from_epoch_seconds(secs) {
        Some(t) => t.format("%H:%M:%S%.3f").to_string(),
        None => String::new(),
    }
}

/// Cursor read-out: full UTC time of the x position and the amplitude.
fn hover_label(name: &str, value: &PlotPoint) -> String {
    let time = from_epoch_seconds(value.x)
        .map(|t| format_time(&t))
        .unwrap_or_default();
    if name.is_empty() {
        format!("{time}\n{:.3}", value.y)
    } else {
        format!("{name}\n{time}\n{:.3}", value.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plots_share_space_above_minimum() {
        assert_eq!(stacked_plot_height(900.0, 3, 200.0), 300.0 - TITLE_HEIGHT);
        assert_eq!(stacked_plot_height(300.0, 0, 200.0), 200.0);
    }

    #[test]
    fn crowded_plots_keep_the_full_minimum_height() {
        assert_eq!(stacked_plot_height(300.0, 3, 200.0), 200.0);
        // the share only just covers the minimum, the title pushes it below
        assert_eq!(stacked_plot_height(630.0, 3, 200.0), 200.0);
    }

    #[test]
    fn axis_labels_are_utc_clock_time() {
        assert_eq!(axis_time_label(1_262_304_061.5), "00:01:01.500");
        assert_eq!(axis_time_label(f64::INFINITY), "");
    }

    #[test]
    fn hover_label_shows_time_and_amplitude() {
        let text = hover_label("XX.A..HHZ", &PlotPoint::new(1_262_304_000.0, 12.3456));
        assert_eq!(text, "XX.A..HHZ\n2010-01-01T00:00:00.000000Z\n12.346");
        assert!(hover_label("", &PlotPoint::new(0.0, 1.0)).starts_with("1970-01-01T"));
    }
}
