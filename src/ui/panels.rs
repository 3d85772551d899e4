use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::PlotBackend;
use crate::data::export::{export_stats_json, export_trace_csv};
use crate::data::model::Stream;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – trace tree
// ---------------------------------------------------------------------------

/// What the user asked for while the tree was drawn; applied afterwards so
/// the tree can borrow the stream.
enum TreeAction {
    Select(usize),
    Plot(usize),
    PlotAll,
}

/// Render the left trace panel. It doubles as the drop target hint.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, files_hovered: bool) {
    ui.heading("Traces");
    ui.separator();

    if files_hovered {
        ui.label(RichText::new("Drop MiniSEED file(s) to load").color(Color32::LIGHT_BLUE));
        ui.separator();
    }

    let Some(stream) = &state.stream else {
        ui.label("No file loaded.");
        ui.label("Use File → Open… or drop a file here.");
        return;
    };

    if stream.is_empty() {
        ui.label("File contains no waveform samples.");
        return;
    }

    let mut action: Option<TreeAction> = None;
    let selected = state.selected;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (index, tr) in stream.traces.iter().enumerate() {
                let header_text = format!("{index}: {}", tr.id);
                let mut header = RichText::new(header_text).monospace();
                if selected == Some(index) {
                    header = header.strong();
                }

                let resp = egui::CollapsingHeader::new(header)
                    .id_salt(("trace", index))
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for (key, value) in tr.stats() {
                            let stat = ui.label(RichText::new(format!("{key}: {value}")).monospace());
                            if stat.secondary_clicked() {
                                action = Some(TreeAction::Select(index));
                            }
                            stat.context_menu(|ui: &mut Ui| trace_menu(ui, index, &mut action));
                        }
                    });

                let header_resp = resp.header_response;
                if header_resp.secondary_clicked() {
                    action = Some(TreeAction::Select(index));
                }
                header_resp.context_menu(|ui: &mut Ui| trace_menu(ui, index, &mut action));
            }
        });

    match action {
        Some(TreeAction::Select(i)) => state.select_trace(i),
        Some(TreeAction::Plot(i)) => {
            state.select_trace(i);
            state.plot_selected();
        }
        Some(TreeAction::PlotAll) => state.plot_all(),
        None => {}
    }
}

fn trace_menu(ui: &mut Ui, index: usize, action: &mut Option<TreeAction>) {
    if ui.button("Plot Trace").clicked() {
        *action = Some(TreeAction::Plot(index));
        ui.close_menu();
    }
    if ui.button("Plot All Traces").clicked() {
        *action = Some(TreeAction::PlotAll);
        ui.close_menu();
    }
}

// ---------------------------------------------------------------------------
// Stream table
// ---------------------------------------------------------------------------

/// Tabular overview of every trace in the stream.
///
/// `ranges` holds the precomputed amplitude range of each trace, by index.
pub fn stream_table(ui: &mut Ui, stream: &Stream, ranges: &[Option<(f64, f64)>]) {
    ui.label(RichText::new(stream.source.display().to_string()).weak());
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto())
        .column(Column::auto().at_least(120.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["#", "id", "starttime", "endtime", "sampling_rate", "npts", "min / max"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (index, tr) in stream.traces.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(index.to_string());
                    });
                    row.col(|ui| {
                        ui.monospace(tr.id.to_string());
                    });
                    for (_, value) in tr.stats() {
                        row.col(|ui| {
                            ui.monospace(value);
                        });
                    }
                    row.col(|ui| {
                        if let Some((min, max)) = ranges.get(index).copied().flatten() {
                            ui.monospace(format!("{min} / {max}"));
                        }
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                ui.close_menu();
                open_file_dialog(state);
            }
            ui.separator();
            let has_selection = state.selected_trace().is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Export trace as CSV…"))
                .clicked()
            {
                ui.close_menu();
                export_trace_dialog(state);
            }
            if ui
                .add_enabled(state.stream.is_some(), egui::Button::new("Export stats as JSON…"))
                .clicked()
            {
                ui.close_menu();
                export_stats_dialog(state);
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            if ui.checkbox(&mut state.show_stream_table, "Stream table").clicked() {
                ui.close_menu();
            }
            if ui.checkbox(&mut state.config.dark_mode, "Dark mode").clicked() {
                ui.ctx().set_visuals(state.config.visuals());
                ui.close_menu();
            }
            if ui.button("Reset GPU view").clicked() {
                state.view.reset();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Backend:");
        for backend in [PlotBackend::Plot, PlotBackend::Gpu] {
            let enabled = backend == PlotBackend::Plot || state.gpu_available;
            let selected = state.config.backend == backend;
            let resp = ui.add_enabled(enabled, egui::SelectableLabel::new(selected, backend.label()));
            if resp.clicked() {
                state.set_backend(backend);
            }
        }

        ui.separator();

        if let Some(st) = &state.stream {
            let name = st
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!("{} trace(s) in {name}, {} plotted", st.len(), state.plotted.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Choose MiniSEED File")
        .add_filter("MiniSEED Files", &["mseed", "miniseed", "ms"]);
    if let Some(dir) = state.config.start_directory() {
        dialog = dialog.set_directory(dir);
    }

    let Some(path) = dialog.pick_file() else {
        return;
    };
    state.load_path(&path);
}

fn export_trace_dialog(state: &mut AppState) {
    let Some(trace) = state.selected_trace() else {
        state.status_message = Some("Select a trace first".to_string());
        return;
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export trace")
        .add_filter("CSV", &["csv"])
        .set_file_name(format!("{}.csv", trace.id))
        .save_file()
    else {
        return;
    };

    if let Err(e) = export_trace_csv(trace, &path) {
        log::error!("Failed to export trace: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}

fn export_stats_dialog(state: &mut AppState) {
    let Some(stream) = &state.stream else {
        return;
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export stream stats")
        .add_filter("JSON", &["json"])
        .set_file_name("stats.json")
        .save_file()
    else {
        return;
    };

    if let Err(e) = export_stats_json(stream, &path) {
        log::error!("Failed to export stats: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
