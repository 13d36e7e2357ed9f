use eframe::egui::{self, Stroke, Ui, Visuals};
use egui_plot::{Legend, Line, Plot, PlotPoints, Polygon};

use crate::color::{SpeciesPalette, with_alpha};
use crate::data::density::{DensitySpec, PlotTheme};

// ---------------------------------------------------------------------------
// Density plot (central panel, rich variant)
// ---------------------------------------------------------------------------

fn visuals_for(theme: PlotTheme) -> Visuals {
    match theme {
        PlotTheme::Light => Visuals::light(),
        PlotTheme::Dark => Visuals::dark(),
    }
}

/// Render per-species body mass densities as filled areas.
pub fn density_plot(ui: &mut Ui, spec: &DensitySpec, palette: Option<&SpeciesPalette>) {
    if spec.curves.iter().all(|c| c.points.is_empty()) {
        ui.label("Not enough penguins below the threshold to estimate a density.");
        return;
    }

    ui.scope(|ui: &mut Ui| {
        *ui.visuals_mut() = visuals_for(spec.theme);

        Plot::new("density_plot")
            .legend(Legend::default())
            .x_axis_label(spec.x_label.as_str())
            .y_axis_label(spec.y_label.as_str())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                for curve in &spec.curves {
                    if curve.points.is_empty() {
                        continue;
                    }
                    let color = palette
                        .map(|p| p.color_for(&curve.species))
                        .unwrap_or(egui::Color32::LIGHT_BLUE);
                    let fill = with_alpha(color, spec.fill_alpha);

                    // egui only fills convex polygons, so the area under the
                    // curve is drawn one trapezoid per grid step.
                    for w in curve.points.windows(2) {
                        let [x0, y0] = w[0];
                        let [x1, y1] = w[1];
                        let quad: PlotPoints = vec![[x0, 0.0], [x0, y0], [x1, y1], [x1, 0.0]].into();
                        plot_ui.polygon(Polygon::new(quad).fill_color(fill).stroke(Stroke::NONE));
                    }

                    let outline: PlotPoints = curve.points.iter().copied().collect();
                    plot_ui.line(Line::new(outline).name(curve.species.as_str()).color(color).width(1.5));
                }
            });
    });
}
