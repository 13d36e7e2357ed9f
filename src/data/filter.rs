use super::model::PenguinTable;

/// Return indices of penguins whose body mass is strictly below `threshold`.
///
/// Rows with a missing mass never pass, mirroring a `NaN < t` comparison.
pub fn below_threshold(table: &PenguinTable, threshold: f64) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, p)| p.body_mass_g.is_some_and(|mass| mass < threshold))
        .map(|(i, _)| i)
        .collect()
}
