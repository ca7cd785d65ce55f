use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::info;

use crate::table::Dataset;

/// Write the generated SQL text as `<table_name>.sql` inside `dir`.
///
/// Goes through a temp file and a rename so a failure mid-write never
/// leaves a partial artifact behind.
pub fn write_sql<P: AsRef<Path>>(dir: P, table_name: &str, sql: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(format!("{}.sql", table_name));
    let tmp_path = dir.join(format!(".{}.sql.tmp", table_name));

    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    tmp.write_all(sql.as_bytes())
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    drop(tmp);

    fs::rename(&tmp_path, &path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;

    info!(path = %path.display(), bytes = sql.len(), "wrote sql artifact");
    Ok(path)
}

/// Re-serialize the dataset as `<table_name>.csv` inside `dir`: a header
/// row, then every row's cells in their plain textual form (nulls empty).
pub fn write_csv<P: AsRef<Path>>(dir: P, table_name: &str, dataset: &Dataset) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(format!("{}.csv", table_name));
    let tmp_path = dir.join(format!(".{}.csv.tmp", table_name));

    let file = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing csv header")?;
    for idx in 0..dataset.row_count() {
        writer
            .write_record(dataset.row(idx).map(|v| v.to_string()))
            .with_context(|| format!("writing csv row {}", idx + 1))?;
    }
    writer.flush().context("flushing csv writer")?;
    drop(writer);

    fs::rename(&tmp_path, &path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;

    info!(path = %path.display(), rows = dataset.row_count(), "wrote csv artifact");
    Ok(path)
}
