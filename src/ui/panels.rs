use eframe::egui::{self, Color32, RichText, Ui};

use crate::reactive::Artifact;
use crate::state::{AppState, DENSITY_OUTPUT, NOTICE_TTL, SUMMARY_OUTPUT};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – threshold control
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // The graph owns the live range once a table is loaded.
    let (min, max) = match &state.graph {
        Some(graph) => (graph.input().min(), graph.input().max()),
        None => (state.config.slider.min, state.config.slider.max),
    };
    let mut value = state.threshold();
    let enabled = state.graph.is_some();

    let response = ui.add_enabled(
        enabled,
        egui::Slider::new(&mut value, min..=max)
            .text("Max Body Mass")
            .step_by(1.0),
    );
    if response.changed() {
        state.set_threshold(value);
    }

    if state.config.variant.has_reset() {
        ui.add_space(8.0);
        if ui.add_enabled(enabled, egui::Button::new("Reset")).clicked() {
            state.reset();
        }
    }

    if let Some(msg) = state.active_notice() {
        ui.add_space(8.0);
        ui.label(RichText::new(msg).italics());
        ui.ctx().request_repaint_after(NOTICE_TTL);
    }
}

// ---------------------------------------------------------------------------
// Central panel – outputs
// ---------------------------------------------------------------------------

/// Render the heading, summary table and (rich variant) density plot.
pub fn main_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Palmer Penguins");

    if state.graph.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Open a penguin table to begin  (File → Open…)");
        });
        return;
    }

    // Read every output before drawing so they share one snapshot.
    let outputs = state.outputs();
    let nothing_below = state.nothing_below_threshold();
    let palette = state.palette.as_ref();
    let find = |name: &str| {
        outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, artifact)| artifact.as_ref())
    };

    if let Some(counts) = find(SUMMARY_OUTPUT).and_then(Artifact::as_summary) {
        table::summary_table(ui, counts, palette);
    }
    if nothing_below {
        ui.label(RichText::new("No penguins below this threshold").italics());
    }

    if let Some(spec) = find(DENSITY_OUTPUT).and_then(Artifact::as_density) {
        ui.separator();
        plot::density_plot(ui, spec, palette);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        if let Some(graph) = &mut state.graph {
            let total = graph.source().len();
            let visible = graph.derived().len();
            let summary_runs = graph.output_recomputes(SUMMARY_OUTPUT).unwrap_or(0);
            ui.label(format!("{total} penguins loaded, {visible} below threshold"))
                .on_hover_text(format!(
                    "input generation {}, filtered {} times, summary rebuilt {summary_runs} times",
                    graph.generation(),
                    graph.derived_recomputes()
                ));
        }

        if let Some(path) = &state.data_path {
            ui.separator();
            ui.label(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguin table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
