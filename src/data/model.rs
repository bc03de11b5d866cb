use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common dataframe dtypes.
///
/// Equality and ordering are type-sensitive (`Integer(1) != Float(1.0)`) and
/// floats compare by `total_cmp`, so two tables loaded from identical bytes
/// always compare equal.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for missing and non-numeric cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred dtype of a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
    /// Every cell is missing.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float | ColumnKind::Empty)
    }
}

// ---------------------------------------------------------------------------
// Table – ordered columns and rows of cells
// ---------------------------------------------------------------------------

/// A rectangular table. Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                bail!("duplicate column name '{name}'");
            }
        }
        for (row_no, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!(
                    "row {row_no} has {} values but the header has {} columns",
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Infer the dtype of column `idx` from its non-missing cells.
    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        let mut kind = ColumnKind::Empty;
        for cell in self.column(idx) {
            let cell_kind = match cell {
                CellValue::Null => continue,
                CellValue::Bool(_) => ColumnKind::Bool,
                CellValue::Integer(_) => ColumnKind::Integer,
                CellValue::Float(_) => ColumnKind::Float,
                CellValue::Text(_) => ColumnKind::Text,
            };
            kind = match (kind, cell_kind) {
                (ColumnKind::Empty, k) => k,
                (a, b) if a == b => a,
                (ColumnKind::Integer, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Integer) => {
                    ColumnKind::Float
                }
                _ => return ColumnKind::Text,
            };
        }
        kind
    }

    /// A column is numeric when every cell is a number or missing. Columns of
    /// a table without rows count as numeric.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.column_index(name)
            .is_some_and(|idx| self.column_kind(idx).is_numeric())
    }

    /// Indices of all numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&idx| self.column_kind(idx).is_numeric())
            .collect()
    }

    /// New table holding only the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// New table with the named columns in the given order.
    /// Names that are not columns of this table are skipped.
    pub fn project(&self, names: &[String]) -> Table {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Replace every cell of the listed columns with `f(cell)`, failing on the
    /// first error. `self` is left untouched; the result is a fresh table.
    pub fn try_map_columns<F, E>(&self, columns: &[usize], mut f: F) -> std::result::Result<Table, E>
    where
        F: FnMut(&str, &CellValue) -> std::result::Result<CellValue, E>,
    {
        let mut rows = self.rows.clone();
        for row in &mut rows {
            for &idx in columns {
                let mapped = f(&self.columns[idx], &row[idx])?;
                row[idx] = mapped;
            }
        }
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }
}

// ---------------------------------------------------------------------------
// Dataset – one loaded table and its filter/transform lineage
// ---------------------------------------------------------------------------

/// Stable identity of a loaded dataset, independent of its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(pub u64);

#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: DatasetId,
    /// Unique among the currently loaded datasets.
    pub display_name: String,
    /// Where the table came from; `save` writes back here.
    pub source_path: PathBuf,
    /// The table on display (post filter / transform).
    pub current: Table,
    /// The table every filter pass starts from.
    pub baseline: Table,
}

impl Dataset {
    pub fn new(id: DatasetId, display_name: String, source_path: PathBuf, table: Table) -> Self {
        Self {
            id,
            display_name,
            source_path,
            baseline: table.clone(),
            current: table,
        }
    }
}
