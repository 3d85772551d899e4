use eframe::egui::{self, Align2, Color32, FontId, PointerButton, Sense, Ui};
use eframe::egui_wgpu;

use crate::color::trace_color;
use crate::render::LineStripCallback;
use crate::render::view::normalize;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GPU line-strip view (central panel)
// ---------------------------------------------------------------------------

/// Render the plotted traces as GPU line strips with mouse pan/zoom.
///
/// * primary drag: pan
/// * secondary drag: zoom each axis around the press point
/// * wheel: uniform zoom
/// * double click: reset
pub fn gpu_waveform(ui: &mut Ui, state: &mut AppState) {
    if !state.gpu_available {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("GPU rendering needs the wgpu backend");
        });
        return;
    }
    if state.plotted.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Right-click a trace and choose “Plot Trace”");
        });
        return;
    }

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

    if let Some(cur) = response.interact_pointer_pos() {
        let prev = cur - response.drag_delta();
        if response.dragged_by(PointerButton::Primary) {
            state.view.drag_pan(normalize(prev, rect), normalize(cur, rect));
        } else if response.dragged_by(PointerButton::Secondary) {
            let press = ui.input(|i| i.pointer.press_origin()).unwrap_or(prev);
            state
                .view
                .drag_zoom(normalize(press, rect), normalize(prev, rect), normalize(cur, rect));
        }
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            state.view.wheel(scroll);
        }
    }

    if response.double_clicked() {
        state.view.reset();
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::BLACK);
    painter.add(egui_wgpu::Callback::new_paint_callback(
        rect,
        LineStripCallback {
            view: state.view.uniform(),
            vertices: state.gpu_vertices(),
            generation: state.geometry_generation(),
        },
    ));

    // legend
    let n_total = state.stream.as_ref().map_or(0, |st| st.len());
    for (row, (index, tr)) in state.plotted_traces().into_iter().enumerate() {
        painter.text(
            rect.left_top() + egui::vec2(8.0, 8.0 + row as f32 * 16.0),
            Align2::LEFT_TOP,
            tr.id.to_string(),
            FontId::monospace(12.0),
            trace_color(index, n_total),
        );
    }
}
