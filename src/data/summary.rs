use std::collections::BTreeMap;

use super::model::PenguinTable;

/// One line of the grouped summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCount {
    pub species: String,
    pub size: usize,
}

/// Count the selected rows per species, ordered by species name.
///
/// Only species present among `rows` appear, the same shape as a pandas
/// `groupby("Species", as_index=False).size()`.
pub fn species_counts(table: &PenguinTable, rows: &[usize]) -> Vec<SpeciesCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &idx in rows {
        *counts.entry(table.rows[idx].species.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(species, size)| SpeciesCount {
            species: species.to_string(),
            size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_grouped_and_sorted() {
        let table = PenguinTable::from_pairs([
            ("Gentoo", 5000.0),
            ("Adelie", 3200.0),
            ("Chinstrap", 3400.0),
            ("Adelie", 3300.0),
        ]);
        let counts = species_counts(&table, &[0, 1, 2, 3]);
        let flat: Vec<_> = counts.iter().map(|c| (c.species.as_str(), c.size)).collect();
        assert_eq!(flat, vec![("Adelie", 2), ("Chinstrap", 1), ("Gentoo", 1)]);
    }

    #[test]
    fn absent_species_are_omitted() {
        let table = PenguinTable::from_pairs([("Adelie", 3200.0), ("Gentoo", 5000.0)]);
        let counts = species_counts(&table, &[0]);
        assert_eq!(
            counts,
            vec![SpeciesCount {
                species: "Adelie".into(),
                size: 1
            }]
        );
        assert!(species_counts(&table, &[]).is_empty());
    }
}
