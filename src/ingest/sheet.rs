use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use super::derive::{clean_headers, parse_datetime, unify_kinds};
use crate::table::{Column, ColumnKind, Dataset, Value};

/// Largest magnitude at which an f64 still holds every integer exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Read the first worksheet of an xlsx or ods workbook into a typed
/// dataset. Cells arrive already typed, so kinds come from the value tags
/// rather than from string classification.
pub fn read_sheet(path: &Path) -> Result<Dataset> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening `{}`", source))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("`{}` has no sheets", source))?
        .with_context(|| format!("reading first sheet of `{}`", source))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| anyhow!("`{}` has no header row", source))?;
    let raw_headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();
    let headers = clean_headers(&source, &raw_headers)?;

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, slot) in cells.iter_mut().enumerate() {
            slot.push(row.get(idx).map(convert_cell).unwrap_or(Value::Null));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, mut values)| {
            let kind = derive_column_kind(&values);
            if kind == ColumnKind::Float {
                promote_ints(&mut values);
            }
            Column { name, kind, values }
        })
        .collect();

    Ok(Dataset::new(columns))
}

/// Map one spreadsheet cell onto the closed value set.
fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT {
                Value::Int(*f as i64)
            } else {
                Value::Float(*f)
            }
        }
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.to_string())
            }
        }
        Data::DateTime(dt) => dt.as_datetime().map(Value::Date).unwrap_or(Value::Null),
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(Value::Date)
            .unwrap_or_else(|| Value::Text(s.clone())),
        Data::DurationIso(s) => Value::Other(s.clone()),
        Data::Error(e) => Value::Other(e.to_string()),
    }
}

fn tag_of(value: &Value) -> Option<ColumnKind> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(ColumnKind::Boolean),
        Value::Int(_) => Some(ColumnKind::Integer),
        Value::Float(_) => Some(ColumnKind::Float),
        Value::Date(_) => Some(ColumnKind::Date),
        Value::Text(_) | Value::Other(_) => Some(ColumnKind::Text),
    }
}

fn derive_column_kind(values: &[Value]) -> ColumnKind {
    values
        .iter()
        .filter_map(tag_of)
        .reduce(unify_kinds)
        .unwrap_or(ColumnKind::Text)
}

/// Widen the integer cells of a float column so the column holds one tag.
fn promote_ints(values: &mut [Value]) {
    for v in values.iter_mut() {
        if let Value::Int(i) = *v {
            *v = Value::Float(i as f64);
        }
    }
}
