use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Column holding the species label.
pub const SPECIES_COLUMN: &str = "Species";
/// Column holding the body mass in grams.
pub const BODY_MASS_COLUMN: &str = "Body Mass (g)";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a non-core column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell for the columns the dashboard does not interpret
/// (island, sex, bill measurements, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NA"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as a number, if it holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Guess the type of a textual cell. `NA` and empty strings are missing.
    pub fn parse(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() || s == "NA" {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Penguin – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Penguin {
    pub species: String,
    /// `None` when the measurement is missing in the source.
    pub body_mass_g: Option<f64>,
    /// Remaining columns: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl Penguin {
    pub fn new(species: impl Into<String>, body_mass_g: Option<f64>) -> Self {
        Self {
            species: species.into(),
            body_mass_g,
            extra: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// PenguinTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct PenguinTable {
    pub rows: Vec<Penguin>,
    /// Column names in source order, including the two core columns.
    pub column_names: Vec<String>,
    /// Sorted set of every species label in the table.
    pub species: BTreeSet<String>,
}

impl PenguinTable {
    /// Build the table and its species index.
    pub fn from_rows(rows: Vec<Penguin>, column_names: Vec<String>) -> Self {
        let species = rows.iter().map(|p| p.species.clone()).collect();
        PenguinTable {
            rows,
            column_names,
            species,
        }
    }

    /// Table with only the two core columns, mostly for tests and fixtures.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let rows = pairs
            .into_iter()
            .map(|(species, mass)| Penguin::new(species, Some(mass)))
            .collect();
        Self::from_rows(
            rows,
            vec![SPECIES_COLUMN.to_string(), BODY_MASS_COLUMN.to_string()],
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_guesses_types() {
        assert_eq!(CellValue::parse("3750"), CellValue::Integer(3750));
        assert_eq!(CellValue::parse("39.1"), CellValue::Float(39.1));
        assert_eq!(CellValue::parse("NA"), CellValue::Null);
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::parse("Torgersen"),
            CellValue::String("Torgersen".into())
        );
    }

    #[test]
    fn species_index_is_sorted_and_unique() {
        let table = PenguinTable::from_pairs([
            ("Gentoo", 5000.0),
            ("Adelie", 3200.0),
            ("Adelie", 4100.0),
        ]);
        let species: Vec<_> = table.species.iter().cloned().collect();
        assert_eq!(species, vec!["Adelie", "Gentoo"]);
        assert_eq!(table.len(), 3);
    }
}
