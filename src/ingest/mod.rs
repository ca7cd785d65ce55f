pub mod csv;
pub mod derive;
pub mod sheet;

use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::table::Dataset;

/// Supported source file formats, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Ods,
}

impl SourceFormat {
    /// Pick the format from the file extension, case-insensitively.
    /// Anything else is rejected before any parsing happens.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("xlsx") => Ok(SourceFormat::Xlsx),
            Some("ods") => Ok(SourceFormat::Ods),
            _ => Err(anyhow!(
                "unsupported file format `{}` (expected .csv, .xlsx or .ods)",
                path.display()
            )),
        }
    }
}

/// Parse `path` into a typed dataset, dispatching on its extension.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let format = SourceFormat::from_path(path)?;
    info!(path = %path.display(), ?format, "loading input");
    match format {
        SourceFormat::Csv => csv::read_csv(path),
        SourceFormat::Xlsx | SourceFormat::Ods => sheet::read_sheet(path),
    }
}
