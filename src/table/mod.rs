// src/table/mod.rs

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A single cell value, tagged once at load time.
///
/// Readers assign the variant when the dataset is built; everything
/// downstream (SQL literals, CSV re-serialization) is a match on the tag,
/// never a re-inspection of the raw input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDateTime),
    Text(String),
    /// Anything the readers cannot classify (spreadsheet error cells,
    /// ISO durations). Carried as its source text, rendered unquoted.
    Other(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Plain textual form, as written into the CSV artifact. `Null` is empty;
/// dates keep their time part when it is non-midnight.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Date(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Value::Text(s) | Value::Other(s) => f.write_str(s),
        }
    }
}

/// Inferred semantic kind of a whole column.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Date,
    Text,
}

/// A named column with its kind and cells, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

/// Name + kind view of a column, for the schema log.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
}

/// In-memory tabular data: ordered named columns, each holding the same
/// number of cells. Readers enforce the equal-length invariant by padding
/// short rows with nulls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].values.len() == w[1].values.len()),
            "columns must hold the same number of cells"
        );
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Cells of row `idx` in column order. Panics if `idx` is out of range.
    pub fn row(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().map(move |c| &c.values[idx])
    }

    pub fn schema(&self) -> Vec<ColumnDef> {
        self.columns
            .iter()
            .map(|c| ColumnDef {
                name: c.name.clone(),
                kind: c.kind,
            })
            .collect()
    }
}
