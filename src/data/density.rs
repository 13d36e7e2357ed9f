use std::collections::BTreeMap;

use serde::Deserialize;

use super::model::{BODY_MASS_COLUMN, PenguinTable};

/// Number of evaluation points per curve.
pub const GRID_POINTS: usize = 512;
/// How far (in bandwidths) the grid extends past the sample range.
const GRID_CUT: f64 = 3.0;
/// Fill opacity for the per-species areas.
pub const FILL_ALPHA: f32 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotTheme {
    #[default]
    Light,
    Dark,
}

/// Kernel density estimate for one species.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub species: String,
    pub bandwidth: f64,
    /// `[x, density]` pairs, empty when the group cannot be estimated.
    pub points: Vec<[f64; 2]>,
}

/// Everything the plot renderer needs: mass on x, one filled area per species.
#[derive(Debug, Clone, PartialEq)]
pub struct DensitySpec {
    pub x_label: String,
    pub y_label: String,
    pub fill_alpha: f32,
    pub theme: PlotTheme,
    pub curves: Vec<DensityCurve>,
}

/// Build a density plot specification for the selected rows, one curve per
/// species (ordered by name).
pub fn density_spec(table: &PenguinTable, rows: &[usize]) -> DensitySpec {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for &idx in rows {
        let p = &table.rows[idx];
        if let Some(mass) = p.body_mass_g {
            groups.entry(p.species.as_str()).or_default().push(mass);
        }
    }

    let curves = groups
        .into_iter()
        .map(|(species, samples)| kde(species, samples))
        .collect();

    DensitySpec {
        x_label: BODY_MASS_COLUMN.to_string(),
        y_label: "density".to_string(),
        fill_alpha: FILL_ALPHA,
        theme: PlotTheme::Light,
        curves,
    }
}

fn kde(species: &str, mut samples: Vec<f64>) -> DensityCurve {
    samples.sort_by(f64::total_cmp);

    // A single observation has no spread to estimate from.
    let Some(bw) = silverman_bandwidth(&samples) else {
        return DensityCurve {
            species: species.to_string(),
            bandwidth: 0.0,
            points: Vec::new(),
        };
    };

    let lo = samples[0] - GRID_CUT * bw;
    let hi = samples[samples.len() - 1] + GRID_CUT * bw;
    let step = (hi - lo) / (GRID_POINTS - 1) as f64;
    let norm = 1.0 / (samples.len() as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());

    let points = (0..GRID_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            let sum: f64 = samples
                .iter()
                .map(|&s| {
                    let u = (x - s) / bw;
                    (-0.5 * u * u).exp()
                })
                .sum();
            [x, sum * norm]
        })
        .collect();

    DensityCurve {
        species: species.to_string(),
        bandwidth: bw,
        points,
    }
}

/// Silverman's rule of thumb (`nrd0`) on sorted samples.
///
/// Falls back to the standard deviation, then the magnitude of the first
/// sample, then 1.0 when the robust spread is zero.
fn silverman_bandwidth(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n < 2 {
        return None;
    }
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let var = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();
    let iqr = quantile(sorted, 0.75) - quantile(sorted, 0.25);

    let mut lo = sd.min(iqr / 1.34);
    if lo == 0.0 {
        lo = sd;
    }
    if lo == 0.0 {
        lo = sorted[0].abs();
    }
    if lo == 0.0 {
        lo = 1.0;
    }
    Some(0.9 * lo * (n as f64).powf(-0.2))
}

/// Linear-interpolation quantile on sorted data (R type 7).
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let below = h.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    sorted[below] + (h - below as f64) * (sorted[above] - sorted[below])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(points: &[[f64; 2]]) -> f64 {
        points
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum()
    }

    #[test]
    fn quantile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&data, 0.0), 1.0);
        assert_eq!(quantile(&data, 1.0), 4.0);
        assert!((quantile(&data, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&data, 0.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn one_curve_per_species_in_name_order() {
        let table = PenguinTable::from_pairs([
            ("Gentoo", 5000.0),
            ("Gentoo", 5400.0),
            ("Adelie", 3200.0),
            ("Adelie", 3700.0),
            ("Adelie", 4100.0),
        ]);
        let spec = density_spec(&table, &[0, 1, 2, 3, 4]);
        let names: Vec<_> = spec.curves.iter().map(|c| c.species.as_str()).collect();
        assert_eq!(names, vec!["Adelie", "Gentoo"]);
        assert_eq!(spec.x_label, BODY_MASS_COLUMN);
        assert_eq!(spec.fill_alpha, 0.2);
        assert_eq!(spec.theme, PlotTheme::Light);
    }

    #[test]
    fn curve_integrates_to_about_one() {
        let table = PenguinTable::from_pairs([
            ("Adelie", 3200.0),
            ("Adelie", 3450.0),
            ("Adelie", 3700.0),
            ("Adelie", 3800.0),
            ("Adelie", 4100.0),
        ]);
        let spec = density_spec(&table, &[0, 1, 2, 3, 4]);
        let curve = &spec.curves[0];
        assert_eq!(curve.points.len(), GRID_POINTS);
        assert!(curve.bandwidth > 0.0);
        let total = area(&curve.points);
        assert!((total - 1.0).abs() < 0.01, "area was {total}");
    }

    #[test]
    fn single_sample_gives_empty_curve() {
        let table = PenguinTable::from_pairs([("Adelie", 3200.0), ("Gentoo", 5000.0)]);
        let spec = density_spec(&table, &[0]);
        assert_eq!(spec.curves.len(), 1);
        assert!(spec.curves[0].points.is_empty());
    }

    #[test]
    fn identical_samples_still_get_a_bandwidth() {
        let bw = silverman_bandwidth(&[4000.0, 4000.0, 4000.0]).unwrap();
        assert!((bw - 0.9 * 4000.0 * 3f64.powf(-0.2)).abs() < 1e-9);
    }

    #[test]
    fn identical_samples_draw_a_peak_at_the_value() {
        let table =
            PenguinTable::from_pairs([("Adelie", 4000.0), ("Adelie", 4000.0), ("Adelie", 4000.0)]);
        let spec = density_spec(&table, &[0, 1, 2]);
        let curve = &spec.curves[0];
        assert_eq!(curve.points.len(), GRID_POINTS);
        let peak = curve
            .points
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, p| if p[1] > best.1 { (p[0], p[1]) } else { best });
        assert!((peak.0 - 4000.0).abs() < curve.bandwidth);
    }
}
