use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{BODY_MASS_COLUMN, CellValue, Penguin, PenguinTable, SPECIES_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a penguin table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, `NA` or empty cells are missing values
/// * `.json`    – `[{ "Species": "Adelie", "Body Mass (g)": 3750, ... }, ...]`
/// * `.parquet` – flat columns of strings / integers / floats / bools
///
/// Every format must provide the `Species` and `Body Mass (g)` columns.
pub fn load_file(path: &Path) -> Result<PenguinTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} penguins ({} species) from {}",
        table.len(),
        table.species.len(),
        path.display()
    );
    Ok(table)
}

/// Turn one row of generic cells into a [`Penguin`], pulling the two core
/// columns out of `cells`.
fn build_row(row: usize, mut cells: BTreeMap<String, CellValue>) -> Result<Penguin, DataError> {
    let species = match cells.remove(SPECIES_COLUMN) {
        Some(CellValue::Null) | None => {
            return Err(DataError::MissingValue {
                row,
                column: SPECIES_COLUMN.to_string(),
            });
        }
        Some(other) => other.to_string(),
    };

    let body_mass_g = match cells.remove(BODY_MASS_COLUMN) {
        Some(CellValue::Null) | None => None,
        Some(v) => Some(v.as_f64().ok_or_else(|| DataError::NotANumber {
            row,
            column: BODY_MASS_COLUMN.to_string(),
            value: v.to_string(),
        })?),
    };

    Ok(Penguin {
        species,
        body_mass_g,
        extra: cells,
    })
}

fn require_columns(columns: &[String]) -> Result<(), DataError> {
    for required in [SPECIES_COLUMN, BODY_MASS_COLUMN] {
        if !columns.iter().any(|c| c == required) {
            return Err(DataError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<PenguinTable> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<PenguinTable> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    require_columns(&headers)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), CellValue::parse(v)))
            .collect();
        rows.push(build_row(row_no, cells)?);
    }

    Ok(PenguinTable::from_rows(rows, headers))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<PenguinTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<PenguinTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }

        let cells = obj
            .iter()
            .map(|(k, v)| (k.clone(), json_to_cell(v)))
            .collect();
        rows.push(build_row(i, cells)?);
    }

    // An empty array has no columns to check.
    if !records.is_empty() {
        require_columns(&columns)?;
    }
    Ok(PenguinTable::from_rows(rows, columns))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::parse(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the bundled `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<PenguinTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    require_columns(&columns)?;

    let reader = builder.build().context("building parquet reader")?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let cells = schema
                .fields()
                .iter()
                .zip(batch.columns())
                .map(|(field, col)| (field.name().clone(), extract_cell(col, row)))
                .collect();
            rows.push(build_row(rows.len(), cells)?);
        }
    }

    Ok(PenguinTable::from_rows(rows, columns))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => {
            log::warn!("unsupported parquet column type {other:?}, keeping it as text");
            CellValue::String(format!("{other:?}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(text.as_bytes())
    }

    fn write_parquet(batches: &[RecordBatch]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer =
            ArrowWriter::try_new(file.as_file_mut(), batches[0].schema(), None).unwrap();
        for batch in batches {
            writer.write(batch).unwrap();
        }
        writer.close().unwrap();
        file
    }

    fn species_column(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    #[test]
    fn csv_reads_core_and_extra_columns() {
        let table = read_csv(csv_reader(
            "Species,Island,Body Mass (g)\n\
             Adelie,Torgersen,3750\n\
             Gentoo,Biscoe,5000\n",
        ))
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].species, "Adelie");
        assert_eq!(table.rows[0].body_mass_g, Some(3750.0));
        assert_eq!(
            table.rows[1].extra.get("Island"),
            Some(&CellValue::String("Biscoe".into()))
        );
        assert_eq!(table.column_names, vec!["Species", "Island", "Body Mass (g)"]);
    }

    #[test]
    fn csv_na_mass_is_missing() {
        let table = read_csv(csv_reader("Species,Body Mass (g)\nAdelie,NA\nAdelie,\n")).unwrap();
        assert!(table.rows.iter().all(|p| p.body_mass_g.is_none()));
    }

    #[test]
    fn csv_without_mass_column_is_rejected() {
        let err = read_csv(csv_reader("Species,Island\nAdelie,Dream\n")).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::MissingColumn(col)) => assert_eq!(col, BODY_MASS_COLUMN),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_text_mass_is_rejected() {
        let err = read_csv(csv_reader("Species,Body Mass (g)\nAdelie,heavy\n")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NotANumber { row: 0, .. })
        ));
    }

    #[test]
    fn json_records_are_parsed() {
        let table = parse_json(
            r#"[
                {"Species": "Adelie", "Body Mass (g)": 3200, "Sex": "female"},
                {"Species": "Chinstrap", "Body Mass (g)": 3725.5, "Sex": null},
                {"Species": "Gentoo", "Body Mass (g)": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1].body_mass_g, Some(3725.5));
        assert_eq!(table.rows[1].extra.get("Sex"), Some(&CellValue::Null));
        assert_eq!(table.rows[2].body_mass_g, None);
        assert_eq!(table.species.len(), 3);
    }

    #[test]
    fn json_missing_species_value_is_rejected() {
        let err = parse_json(r#"[{"Species": null, "Body Mass (g)": 3000}]"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingValue { row: 0, .. })
        ));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Species,Body Mass (g)").unwrap();
        writeln!(file, "Adelie,3200").unwrap();
        file.flush().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn parquet_integer_mass_with_null() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(SPECIES_COLUMN, DataType::Utf8, false),
            Field::new("Island", DataType::Utf8, false),
            Field::new(BODY_MASS_COLUMN, DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                species_column(&["Adelie", "Gentoo", "Chinstrap"]),
                Arc::new(StringArray::from(vec!["Dream", "Biscoe", "Dream"])),
                Arc::new(Int64Array::from(vec![Some(3750), None, Some(3800)])),
            ],
        )
        .unwrap();
        let file = write_parquet(&[batch]);

        let table = load_file(file.path()).unwrap();
        let masses: Vec<_> = table.rows.iter().map(|p| p.body_mass_g).collect();
        assert_eq!(masses, vec![Some(3750.0), None, Some(3800.0)]);
        assert_eq!(
            table.rows[1].extra.get("Island"),
            Some(&CellValue::String("Biscoe".into()))
        );
        assert_eq!(table.column_names, vec![SPECIES_COLUMN, "Island", BODY_MASS_COLUMN]);
        assert_eq!(table.species.len(), 3);
    }

    #[test]
    fn parquet_text_mass_reports_row_across_batches() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(SPECIES_COLUMN, DataType::Utf8, false),
            Field::new(BODY_MASS_COLUMN, DataType::Utf8, true),
        ]));
        let first = RecordBatch::try_new(
            schema.clone(),
            vec![
                species_column(&["Adelie", "Adelie"]),
                Arc::new(StringArray::from(vec![None::<&str>, None])),
            ],
        )
        .unwrap();
        let second = RecordBatch::try_new(
            schema,
            vec![
                species_column(&["Gentoo"]),
                Arc::new(StringArray::from(vec![Some("heavy")])),
            ],
        )
        .unwrap();
        let file = write_parquet(&[first, second]);

        let err = load_file(file.path()).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::NotANumber { row, value, .. }) => {
                assert_eq!(*row, 2);
                assert_eq!(value, "heavy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parquet_without_species_column_is_rejected() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            BODY_MASS_COLUMN,
            DataType::Int64,
            true,
        )]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![3200]))]).unwrap();
        let file = write_parquet(&[batch]);

        let err = load_file(file.path()).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::MissingColumn(col)) => assert_eq!(col, SPECIES_COLUMN),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
