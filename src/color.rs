use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Same colour with the given opacity in `0.0..=1.0`.
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

// ---------------------------------------------------------------------------
// Species → Color32
// ---------------------------------------------------------------------------

/// Stable species colours, assigned over the full species set of the table so
/// a species keeps its colour whatever the slider filters out.
#[derive(Debug, Clone)]
pub struct SpeciesPalette {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SpeciesPalette {
    pub fn new(species: &BTreeSet<String>) -> Self {
        let mapping = species
            .iter()
            .cloned()
            .zip(generate_palette(species.len()))
            .collect();

        SpeciesPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, species: &str) -> Color32 {
        self.mapping
            .get(species)
            .copied()
            .unwrap_or(self.default_color)
    }
}
