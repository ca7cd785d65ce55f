use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::table::{ColumnKind, Value};

const DATETIME_LAYOUTS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];
const DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date or date-time cell. Date-only layouts land on midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Classify one non-empty cell. Boolean is checked before the numeric
/// kinds so that integer-looking boolean literals never land on Integer.
pub fn classify_cell(cell: &str) -> ColumnKind {
    if parse_bool(cell).is_some() {
        ColumnKind::Boolean
    } else if cell.parse::<i64>().is_ok() {
        ColumnKind::Integer
    } else if cell.parse::<f64>().is_ok() {
        ColumnKind::Float
    } else if parse_datetime(cell).is_some() {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}

/// Combine the kinds of two cells in the same column. Integer widens to
/// Float; any other disagreement falls back to Text.
pub fn unify_kinds(a: ColumnKind, b: ColumnKind) -> ColumnKind {
    use ColumnKind::*;
    match (a, b) {
        (x, y) if x == y => x,
        (Integer, Float) | (Float, Integer) => Float,
        _ => Text,
    }
}

/// Trim header names, rejecting an empty header row or a header that is
/// empty after trimming.
pub fn clean_headers(source: &str, raw: &[String]) -> Result<Vec<String>> {
    if raw.is_empty() {
        return Err(anyhow!("`{}` has no header row", source));
    }
    raw.iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = name.trim();
            if name.is_empty() {
                Err(anyhow!("header at index {} in `{}` is empty", idx, source))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

/// For each column, fold the classes of all non-empty cells into one kind.
/// A column with no samples defaults to Text.
pub fn derive_kinds(headers: &[String], rows: &[Vec<String>]) -> Vec<ColumnKind> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut kind: Option<ColumnKind> = None;
            for row in rows {
                let cell = row.get(idx).map(|s| s.trim()).unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                let class = classify_cell(cell);
                kind = Some(match kind {
                    None => class,
                    Some(prev) => {
                        let merged = unify_kinds(prev, class);
                        if merged == ColumnKind::Text && prev != class {
                            debug!(
                                "column `{}` mixes {:?} and {:?}, treating as text",
                                name, prev, class
                            );
                        }
                        merged
                    }
                });
            }
            kind.unwrap_or(ColumnKind::Text)
        })
        .collect()
}

/// Turn one raw cell into a `Value` of the column's kind. Empty cells are
/// null; a cell that no longer parses under the derived kind stays text.
pub fn coerce_cell(cell: &str, kind: ColumnKind) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    let parsed = match kind {
        ColumnKind::Integer => cell.parse().ok().map(Value::Int),
        ColumnKind::Float => cell.parse().ok().map(Value::Float),
        ColumnKind::Boolean => parse_bool(cell).map(Value::Bool),
        ColumnKind::Date => parse_datetime(cell).map(Value::Date),
        ColumnKind::Text => Some(Value::Text(cell.to_string())),
    };
    parsed.unwrap_or_else(|| Value::Text(cell.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn classify_checks_boolean_before_numbers() {
        assert_eq!(classify_cell("true"), ColumnKind::Boolean);
        assert_eq!(classify_cell("FALSE"), ColumnKind::Boolean);
        assert_eq!(classify_cell("7"), ColumnKind::Integer);
        assert_eq!(classify_cell("-7.5"), ColumnKind::Float);
        assert_eq!(classify_cell("2024-03-05"), ColumnKind::Date);
        assert_eq!(classify_cell("2024/03/05 10:30:00"), ColumnKind::Date);
        assert_eq!(classify_cell("O'Brien"), ColumnKind::Text);
    }

    #[test]
    fn integer_widens_to_float() {
        let headers = vec!["x".to_string()];
        let kinds = derive_kinds(&headers, &rows(&[&["1"], &["2.5"], &["3"]]));
        assert_eq!(kinds, vec![ColumnKind::Float]);
    }

    #[test]
    fn mixed_kinds_fall_back_to_text() {
        let headers = vec!["x".to_string()];
        let kinds = derive_kinds(&headers, &rows(&[&["1"], &["hello"]]));
        assert_eq!(kinds, vec![ColumnKind::Text]);
    }

    #[test]
    fn empty_column_defaults_to_text() {
        let headers = vec!["x".to_string()];
        let kinds = derive_kinds(&headers, &rows(&[&[""], &["  "]]));
        assert_eq!(kinds, vec![ColumnKind::Text]);
    }

    #[test]
    fn date_layouts_with_and_without_time() {
        let day = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(
            parse_datetime("2023-01-15"),
            day.and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            parse_datetime("2023/01/15 08:30:00"),
            day.and_hms_opt(8, 30, 0)
        );
        assert_eq!(parse_datetime("15/01/2023"), None);
    }

    #[test]
    fn coerce_handles_nulls_and_fallback() {
        assert_eq!(coerce_cell("", ColumnKind::Integer), Value::Null);
        assert_eq!(coerce_cell("42", ColumnKind::Integer), Value::Int(42));
        assert_eq!(coerce_cell("42", ColumnKind::Float), Value::Float(42.0));
        assert_eq!(
            coerce_cell("True", ColumnKind::Boolean),
            Value::Bool(true)
        );
        // kind says integer but the cell does not parse: keep the text
        assert_eq!(
            coerce_cell("n/a", ColumnKind::Integer),
            Value::Text("n/a".into())
        );
    }

    #[test]
    fn clean_headers_rejects_blanks() {
        let ok = clean_headers("t.csv", &[" id ".into(), "name".into()]).unwrap();
        assert_eq!(ok, vec!["id".to_string(), "name".to_string()]);
        assert!(clean_headers("t.csv", &[]).is_err());
        assert!(clean_headers("t.csv", &["id".into(), "  ".into()]).is_err());
    }
}
