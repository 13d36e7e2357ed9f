use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Species, its islands, row count, body mass mean and spread.
const SPECIES: [(&str, &[&str], usize, f64, f64); 3] = [
    ("Adelie", &["Torgersen", "Biscoe", "Dream"], 152, 3700.0, 458.0),
    ("Chinstrap", &["Dream"], 68, 3733.0, 384.0),
    ("Gentoo", &["Biscoe"], 124, 5076.0, 504.0),
];

/// Roughly one row in this many has no recorded mass or sex.
const MISSING_EVERY: u64 = 170;

struct Row {
    species: &'static str,
    island: &'static str,
    mass: Option<i64>,
    sex: Option<&'static str>,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (species, islands, count, mean, sd) in SPECIES {
        for _ in 0..count {
            let missing = rng.next_u64() % MISSING_EVERY == 0;
            let mass = (rng.gauss(mean, sd) / 25.0).round() as i64 * 25;
            rows.push(Row {
                species,
                island: rng.pick(islands),
                mass: (!missing).then_some(mass.clamp(2500, 6500)),
                sex: (!missing).then(|| rng.pick(&["female", "male"])),
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["Species", "Island", "Body Mass (g)", "Sex"])?;
    for row in rows {
        let mass = row.mass.map(|m| m.to_string()).unwrap_or_else(|| "NA".into());
        writer.write_record([row.species, row.island, mass.as_str(), row.sex.unwrap_or("NA")])?;
    }
    writer.flush()?;
    Ok(())
}

fn to_batch(rows: &[Row]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Species", DataType::Utf8, false),
        Field::new("Island", DataType::Utf8, false),
        Field::new("Body Mass (g)", DataType::Int64, true),
        Field::new("Sex", DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.species))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.island))),
        Arc::new(rows.iter().map(|r| r.mass).collect::<Int64Array>()),
        Arc::new(rows.iter().map(|r| r.sex).collect::<StringArray>()),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_parquet(batch: &RecordBatch, path: &str) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "penguins.csv")?;
    let batch = to_batch(&rows)?;
    write_parquet(&batch, "penguins.parquet")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!("Wrote {} penguins to penguins.csv and penguins.parquet", rows.len());
    Ok(())
}
