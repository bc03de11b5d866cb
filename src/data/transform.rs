use crate::error::{EngineError, EngineResult};

use super::model::{CellValue, Dataset, Table};

/// Natural log of every numeric column of `table`; other columns pass through.
///
/// Fails on the first value that is zero or negative instead of letting
/// `-inf`/`NaN` reach the display. Missing cells stay missing and integer
/// columns come back as floats.
pub fn log_table(table: &Table) -> EngineResult<Table> {
    let numeric = table.numeric_columns();
    table.try_map_columns(&numeric, |column, cell| match cell.as_f64() {
        None => Ok(CellValue::Null),
        Some(v) if v > 0.0 => Ok(CellValue::Float(v.ln())),
        Some(v) => Err(EngineError::Transform(format!(
            "column '{column}' contains {v}, log is only defined for positive values"
        ))),
    })
}

/// Log-transform the dataset's current table.
///
/// On success the pre-transform table becomes the new baseline, so later
/// filter passes run over untransformed values while the display shows the
/// transformed ones. Applying twice transforms twice. On failure the dataset
/// is untouched.
pub fn apply_log(dataset: &mut Dataset) -> EngineResult<()> {
    let transformed = log_table(&dataset.current)?;
    dataset.baseline = std::mem::replace(&mut dataset.current, transformed);
    log::info!(
        "Log transform applied to '{}' ({} rows)",
        dataset.display_name,
        dataset.current.len()
    );
    Ok(())
}
