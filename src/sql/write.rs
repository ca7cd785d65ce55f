use std::fmt::Write as _;

use crate::table::{Dataset, Value};

use super::types::sql_type_for;

/// Wrap a table or column name in backticks, doubling any embedded
/// backtick. No other validation is applied to the name.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Append one cell's SQL literal.
///
/// Strings are single-quoted with embedded quotes doubled; dates are
/// quoted as `'YYYY-MM-DD'` (any time-of-day is dropped); everything else
/// is its plain textual form, unquoted, with nulls as bare `NULL`.
fn push_literal(sql: &mut String, value: &Value) {
    match value {
        Value::Null => sql.push_str("NULL"),
        Value::Bool(b) => {
            let _ = write!(sql, "{}", b);
        }
        Value::Int(i) => {
            let _ = write!(sql, "{}", i);
        }
        Value::Float(x) => {
            let _ = write!(sql, "{}", x);
        }
        Value::Date(dt) => {
            let _ = write!(sql, "'{}'", dt.format("%Y-%m-%d"));
        }
        Value::Text(s) => {
            sql.push('\'');
            for ch in s.chars() {
                if ch == '\'' {
                    sql.push_str("''");
                } else {
                    sql.push(ch);
                }
            }
            sql.push('\'');
        }
        Value::Other(s) => sql.push_str(s),
    }
}

/// Render the complete SQL text: one `CREATE TABLE`, a blank line, then
/// one `INSERT` per row in row order, values in column order.
pub fn generate_sql(dataset: &Dataset, table_name: &str) -> String {
    let table = quote_ident(table_name);
    let mut sql = String::new();

    let _ = writeln!(sql, "CREATE TABLE {} (", table);
    for col in &dataset.columns {
        let _ = writeln!(sql, "  {} {},", quote_ident(&col.name), sql_type_for(col.kind));
    }
    // strip the comma after the last column before closing the parenthesis
    sql.truncate(sql.trim_end_matches(['\n', ',']).len());
    sql.push_str("\n);\n\n");

    for idx in 0..dataset.row_count() {
        let _ = write!(sql, "INSERT INTO {} VALUES (", table);
        for (i, value) in dataset.row(idx).enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            push_literal(&mut sql, value);
        }
        sql.push_str(");\n");
    }

    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnKind};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn people_round_trip() {
        let ds = Dataset::new(vec![
            Column {
                name: "id".into(),
                kind: ColumnKind::Integer,
                values: vec![Value::Int(1), Value::Int(2)],
            },
            Column {
                name: "name".into(),
                kind: ColumnKind::Text,
                values: vec![Value::Text("A'1".into()), Value::Null],
            },
            Column {
                name: "joined".into(),
                kind: ColumnKind::Date,
                values: vec![date(2023, 1, 15), date(2023, 2, 20)],
            },
        ]);

        let expected = "CREATE TABLE `people` (\n  \
                        `id` INT,\n  \
                        `name` TEXT,\n  \
                        `joined` DATE\n);\n\n\
                        INSERT INTO `people` VALUES (1, 'A''1', '2023-01-15');\n\
                        INSERT INTO `people` VALUES (2, NULL, '2023-02-20');\n";
        assert_eq!(generate_sql(&ds, "people"), expected);
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let ds = Dataset::new(vec![Column {
            name: "name".into(),
            kind: ColumnKind::Text,
            values: vec![Value::Text("O'Brien".into())],
        }]);
        let sql = generate_sql(&ds, "t");
        assert!(sql.contains("VALUES ('O''Brien');"));
    }

    #[test]
    fn time_of_day_is_dropped_from_date_literals() {
        let ds = Dataset::new(vec![Column {
            name: "at".into(),
            kind: ColumnKind::Date,
            values: vec![Value::Date(
                NaiveDate::from_ymd_opt(2024, 3, 5)
                    .unwrap()
                    .and_hms_opt(18, 2, 37)
                    .unwrap(),
            )],
        }]);
        let sql = generate_sql(&ds, "t");
        assert!(sql.contains("VALUES ('2024-03-05');"));
    }

    #[test]
    fn unquoted_literal_forms() {
        let ds = Dataset::new(vec![
            Column {
                name: "ok".into(),
                kind: ColumnKind::Boolean,
                values: vec![Value::Bool(true), Value::Null],
            },
            Column {
                name: "score".into(),
                kind: ColumnKind::Float,
                values: vec![Value::Float(2.5), Value::Float(3.0)],
            },
            Column {
                name: "misc".into(),
                kind: ColumnKind::Text,
                values: vec![Value::Other("PT1H".into()), Value::Text("x".into())],
            },
        ]);
        let sql = generate_sql(&ds, "t");
        assert!(sql.contains("VALUES (true, 2.5, PT1H);"));
        assert!(sql.contains("VALUES (NULL, 3, 'x');"));
    }

    #[test]
    fn identifiers_tolerate_spaces_and_backticks() {
        let ds = Dataset::new(vec![Column {
            name: "first name".into(),
            kind: ColumnKind::Text,
            values: vec![],
        }]);
        let sql = generate_sql(&ds, "weird `table`");
        assert!(sql.starts_with("CREATE TABLE `weird ``table``` (\n"));
        assert!(sql.contains("  `first name` TEXT\n);"));
    }

    #[test]
    fn schema_only_when_there_are_no_rows() {
        let ds = Dataset::new(vec![Column {
            name: "id".into(),
            kind: ColumnKind::Integer,
            values: vec![],
        }]);
        let sql = generate_sql(&ds, "empty");
        assert_eq!(sql, "CREATE TABLE `empty` (\n  `id` INT\n);\n\n");
        assert!(!sql.contains("INSERT"));
    }

    #[test]
    fn no_columns_still_closes_the_parenthesis() {
        let ds = Dataset::default();
        assert_eq!(generate_sql(&ds, "t"), "CREATE TABLE `t` (\n);\n\n");
    }
}
