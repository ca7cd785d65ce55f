use anyhow::{Context, Result};
use sheet2sql::{emit, ingest, sql};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process::exit,
};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) parse arguments ──────────────────────────────────────────
    let args: Vec<String> = env::args().collect();
    if !(3..=4).contains(&args.len()) {
        eprintln!("Usage: {} <INPUT_FILE> <TABLE_NAME> [OUT_DIR]", args[0]);
        exit(1);
    }
    let input = PathBuf::from(&args[1]);
    let table_name = args[2].clone();
    let out_dir = args.get(3).map(PathBuf::from).unwrap_or_else(|| ".".into());

    // ─── 3) run the pipeline; one error message on any failure ───────
    if let Err(e) = run(&input, &table_name, &out_dir) {
        error!("conversion failed: {:#}", e);
        exit(1);
    }
}

fn run(input: &Path, table_name: &str, out_dir: &Path) -> Result<()> {
    let dataset = ingest::load_dataset(input)?;
    info!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "loaded dataset"
    );
    debug!(
        schema = %serde_json::to_string(&dataset.schema()).context("serializing schema")?,
        "inferred schema"
    );

    let sql_text = sql::generate_sql(&dataset, table_name);
    debug!("sql preview:\n{}", preview(&sql_text, 1000));

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    emit::write_sql(out_dir, table_name, &sql_text)?;
    emit::write_csv(out_dir, table_name, &dataset)?;

    info!("done");
    Ok(())
}

/// First `limit` characters of the generated SQL, with a marker when cut.
fn preview(sql: &str, limit: usize) -> String {
    if sql.chars().count() <= limit {
        sql.to_string()
    } else {
        let cut: String = sql.chars().take(limit).collect();
        format!("{}...", cut)
    }
}
