use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use tracing::warn;

use super::derive::{clean_headers, coerce_cell, derive_kinds};
use crate::table::{Column, Dataset};

/// Read a CSV file into a typed dataset.
///
/// The first record is the header row. All cells are collected as strings
/// first; per-column kinds are then derived over every non-empty cell and
/// each cell is coerced once into its column's kind.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let source = source_name(path);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening `{}`", source))?;

    let raw_headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading header row of `{}`", source))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let headers = clean_headers(&source, &raw_headers)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut warned_oversized = false;
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("reading `{}` data row {}", source, idx + 1))?;
        let mut cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        if cells.len() > headers.len() && !warned_oversized {
            warn!(
                "some rows in `{}` have more cells than headers ({} headers)",
                source,
                headers.len()
            );
            warned_oversized = true;
        }
        cells.truncate(headers.len());
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    let kinds = derive_kinds(&headers, &rows);

    let columns = headers
        .into_iter()
        .zip(kinds)
        .enumerate()
        .map(|(idx, (name, kind))| Column {
            name,
            kind,
            values: rows.iter().map(|row| coerce_cell(&row[idx], kind)).collect(),
        })
        .collect();

    Ok(Dataset::new(columns))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
