use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::SpeciesPalette;
use crate::data::summary::SpeciesCount;

// ---------------------------------------------------------------------------
// Summary table (central panel)
// ---------------------------------------------------------------------------

/// Render the per-species row counts.
pub fn summary_table(ui: &mut Ui, counts: &[SpeciesCount], palette: Option<&SpeciesPalette>) {
    if counts.is_empty() {
        ui.label("No penguins below the threshold.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(60.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Species");
            });
            header.col(|ui| {
                ui.strong("size");
            });
        })
        .body(|mut body| {
            for count in counts {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let mut text = RichText::new(&count.species);
                        if let Some(p) = palette {
                            text = text.color(p.color_for(&count.species));
                        }
                        ui.label(text);
                    });
                    row.col(|ui| {
                        ui.label(count.size.to_string());
                    });
                });
            }
        });
}
