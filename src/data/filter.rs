use std::fmt;

use crate::error::{EngineError, EngineResult};

use super::model::Table;

// ---------------------------------------------------------------------------
// Filter grammar: whitespace-separated `(operator, number)` pairs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Less,
    Greater,
    Equal,
}

impl FilterOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(FilterOp::Less),
            ">" => Some(FilterOp::Greater),
            "=" => Some(FilterOp::Equal),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            FilterOp::Less => "<",
            FilterOp::Greater => ">",
            FilterOp::Equal => "=",
        }
    }

    /// Whether `value <op> operand` holds.
    pub fn holds(self, value: f64, operand: f64) -> bool {
        match self {
            FilterOp::Less => value < operand,
            FilterOp::Greater => value > operand,
            FilterOp::Equal => value == operand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPair {
    pub op: FilterOp,
    pub value: f64,
}

impl fmt::Display for FilterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.value)
    }
}

/// Parse free filter text such as `"> 10 < 50"` into ordered pairs.
///
/// An operator not immediately followed by a numeric literal is skipped, as
/// is any literal without a preceding operator, so sloppy input narrows less
/// instead of failing. The only hard error is a `NaN` operand, which no value
/// could ever compare against.
pub fn parse_filter_expression(text: &str) -> EngineResult<Vec<FilterPair>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let Some(op) = FilterOp::from_token(tokens[i]) else {
            i += 1;
            continue;
        };
        let operand = tokens
            .get(i + 1)
            .filter(|tok| FilterOp::from_token(tok).is_none())
            .and_then(|tok| tok.parse::<f64>().ok());
        match operand {
            Some(value) if value.is_nan() => {
                return Err(EngineError::Filter(format!(
                    "'{} {}' compares against NaN",
                    op.symbol(),
                    tokens[i + 1]
                )));
            }
            Some(value) => {
                pairs.push(FilterPair { op, value });
                i += 2;
            }
            None => {
                log::debug!("skipping operator '{}' without a numeric operand", op.symbol());
                i += 1;
            }
        }
    }

    Ok(pairs)
}

// ---------------------------------------------------------------------------
// Filter columns and their expressions
// ---------------------------------------------------------------------------

/// Ordered set of the columns designated as filterable for the active dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    columns: Vec<String>,
}

impl FilterSpec {
    /// Duplicates keep their first position.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for col in columns {
            let col = col.into();
            if !unique.contains(&col) {
                unique.push(col);
            }
        }
        Self { columns: unique }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Listed columns that `table` does not have.
    pub fn missing_from(&self, table: &Table) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect()
    }
}

/// Raw filter text bound to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilterExpression {
    pub column: String,
    pub text: String,
}

impl ColumnFilterExpression {
    pub fn new(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Keep the rows whose cell in `column` satisfies `pair`. Missing cells never do.
pub fn apply_pair(table: &Table, column: usize, pair: FilterPair) -> Table {
    table.filter_rows(|row| {
        row[column]
            .as_f64()
            .is_some_and(|v| pair.op.holds(v, pair.value))
    })
}

/// Run one filter pass over `baseline`.
///
/// Expressions are applied in the order given, and within an expression pair
/// by pair in parse order; everything composes with AND. Expressions for
/// columns outside `spec`, absent from `baseline`, or not numeric are ignored.
/// The result is always a fresh table.
pub fn evaluate(
    baseline: &Table,
    spec: &FilterSpec,
    expressions: &[ColumnFilterExpression],
) -> EngineResult<Table> {
    let mut result = baseline.clone();

    for expr in expressions {
        if !spec.contains(&expr.column) {
            log::debug!("column '{}' is not in the filter set, ignored", expr.column);
            continue;
        }
        let Some(idx) = baseline.column_index(&expr.column) else {
            continue;
        };
        if !baseline.is_numeric_column(&expr.column) {
            log::debug!("column '{}' is not numeric, filter ignored", expr.column);
            continue;
        }

        for pair in parse_filter_expression(&expr.text)? {
            let before = result.len();
            result = apply_pair(&result, idx, pair);
            log::debug!("{} {pair}: {before} -> {} rows", expr.column, result.len());
        }
    }

    Ok(result)
}
