use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int32Type, Int64Type, Schema,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use serde_json::Value as JsonValue;

use super::model::{CellValue, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Csv,
    Json,
    Parquet,
}

impl FileFormat {
    /// Unknown or missing extensions are treated as comma-delimited text.
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "parquet" | "pq" => FileFormat::Parquet,
            "json" => FileFormat::Json,
            _ => FileFormat::Csv,
        }
    }
}

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` (default) – header row, one record per line
/// * `.json`          – `[{ "col": value, ... }, ...]`
/// * `.parquet`       – flat int / float / bool / string columns
pub fn load_file(path: &Path) -> Result<Table> {
    match FileFormat::from_path(path) {
        FileFormat::Csv => load_csv(path),
        FileFormat::Json => load_json(path),
        FileFormat::Parquet => load_parquet(path),
    }
}

/// Write `table` to `path` in the format implied by its extension.
/// The header is always written; there is no index column.
pub fn save_file(table: &Table, path: &Path) -> Result<()> {
    match FileFormat::from_path(path) {
        FileFormat::Csv => save_csv(table, path),
        FileFormat::Json => save_json(table, path),
        FileFormat::Parquet => save_parquet(table, path),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        bail!("no columns to parse from file");
    }

    let mut raw_rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        raw_rows.push(record);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_kind(raw_rows.iter().map(|r| r.get(col).unwrap_or(""))))
        .collect();

    let rows = raw_rows
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(&kinds)
                .map(|(raw, &kind)| parse_cell(raw, kind))
                .collect()
        })
        .collect();

    Table::new(headers, rows)
}

fn is_missing(s: &str) -> bool {
    matches!(
        s.trim(),
        "" | "NA" | "N/A" | "NaN" | "nan" | "null" | "NULL" | "None"
    )
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Column dtype the way a dataframe reader guesses it: integer, then float,
/// then bool, falling back to text. Missing cells do not vote.
fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let (mut any, mut all_int, mut all_float, mut all_bool) = (false, true, true, true);
    for raw in cells {
        if is_missing(raw) {
            continue;
        }
        let s = raw.trim();
        any = true;
        all_int &= s.parse::<i64>().is_ok();
        all_float &= s.parse::<f64>().is_ok();
        all_bool &= parse_bool(s).is_some();
    }
    if !any {
        ColumnKind::Empty
    } else if all_int {
        ColumnKind::Integer
    } else if all_float {
        ColumnKind::Float
    } else if all_bool {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn parse_cell(raw: &str, kind: ColumnKind) -> CellValue {
    if is_missing(raw) {
        return CellValue::Null;
    }
    let s = raw.trim();
    match kind {
        ColumnKind::Integer => s.parse().map_or(CellValue::Null, CellValue::Integer),
        ColumnKind::Float => s.parse().map_or(CellValue::Null, CellValue::Float),
        ColumnKind::Bool => parse_bool(s).map_or(CellValue::Null, CellValue::Bool),
        ColumnKind::Text => CellValue::Text(raw.to_string()),
        ColumnKind::Empty => CellValue::Null,
    }
}

/// Text form of a cell as written to delimited files. Floats always keep a
/// decimal point so they read back as floats.
pub fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
            format!("{v:.1}")
        }
        CellValue::Float(v) => format!("{v}"),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer
        .write_record(table.columns())
        .context("writing CSV header")?;
    for (row_no, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(format_cell))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as written by
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "time": 0.5, "pressure": 101.2, "sensor": "A" },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen order; keys missing from a record are null.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows: Vec<Vec<CellValue>> = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    promote_mixed_numeric(columns.len(), &mut rows);
    Table::new(columns, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

/// A column holding both integers and floats becomes a float column.
fn promote_mixed_numeric(n_columns: usize, rows: &mut [Vec<CellValue>]) {
    for col in 0..n_columns {
        let has_float = rows.iter().any(|r| matches!(r[col], CellValue::Float(_)));
        let all_numeric = rows
            .iter()
            .all(|r| matches!(r[col], CellValue::Float(_) | CellValue::Integer(_) | CellValue::Null));
        if has_float && all_numeric {
            for row in rows.iter_mut() {
                if let CellValue::Integer(i) = row[col] {
                    row[col] = CellValue::Float(i as f64);
                }
            }
        }
    }
}

fn save_json(table: &Table, path: &Path) -> Result<()> {
    let records: Vec<serde_json::Map<String, JsonValue>> = table
        .rows()
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(col, cell)| -> serde_json::Result<(String, JsonValue)> {
                    Ok((col.clone(), serde_json::to_value(cell)?))
                })
                .collect::<serde_json::Result<_>>()
        })
        .collect::<serde_json::Result<_>>()
        .context("serialising records")?;
    let file = File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, &records).context("writing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&columns)
                .map(|(array, name)| {
                    extract_cell(array, row)
                        .with_context(|| format!("Row {row}: failed to read '{name}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Table::new(columns, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::Text(array_value_to_string(col.as_ref(), row)?),
    };
    Ok(cell)
}

fn save_parquet(table: &Table, path: &Path) -> Result<()> {
    let mut fields = Vec::with_capacity(table.columns().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for (idx, name) in table.columns().iter().enumerate() {
        let (data_type, array): (DataType, ArrayRef) = match table.column_kind(idx) {
            ColumnKind::Integer => {
                let values: Vec<Option<i64>> = table
                    .column(idx)
                    .map(|c| match c {
                        CellValue::Integer(i) => Some(*i),
                        _ => None,
                    })
                    .collect();
                (DataType::Int64, Arc::new(Int64Array::from(values)))
            }
            ColumnKind::Float | ColumnKind::Empty => {
                let values: Vec<Option<f64>> = table.column(idx).map(CellValue::as_f64).collect();
                (DataType::Float64, Arc::new(Float64Array::from(values)))
            }
            ColumnKind::Bool => {
                let values: Vec<Option<bool>> = table
                    .column(idx)
                    .map(|c| match c {
                        CellValue::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect();
                (DataType::Boolean, Arc::new(BooleanArray::from(values)))
            }
            ColumnKind::Text => {
                let values: Vec<Option<String>> = table
                    .column(idx)
                    .map(|c| (!c.is_null()).then(|| format_cell(c)))
                    .collect();
                (DataType::Utf8, Arc::new(StringArray::from(values)))
            }
        };
        fields.push(Field::new(name.as_str(), data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
