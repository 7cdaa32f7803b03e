//! World Cup match table reconciliation
//!
//! Loads every configured era's source files, normalizes them into one
//! canonical match table and writes it as CSV.
//!
//! ## Flow
//!
//! - **Load** each era's inputs from `DATA_DIR`
//! - **Normalize** with that era's own stage/team/city strategy
//! - **Reconcile** historical kickoffs against the reference table
//! - **Merge** era outputs in chronological order
//! - **Export** to `OUTPUT_PATH`

use anyhow::{Context, Result};
use tracing::{error, info, info_span};

use worldcup_reconcile::config::EtlConfig;
use worldcup_reconcile::{export, logging, pipelines};

fn main() -> Result<()> {
    // Load .env before config and logging read the environment
    dotenvy::dotenv().ok();

    let (run_id, _log_guard) = logging::init_logging();

    let config = EtlConfig::from_env();
    let eras: Vec<&str> = config.eras.iter().map(|e| e.label()).collect();

    let root_span = info_span!(
        "worldcup_etl",
        run_id = %run_id,
        eras = ?eras,
    );
    let _enter = root_span.enter();

    info!(
        data_dir = %config.data_dir.display(),
        output = %config.output_path.display(),
        gazetteer = ?config.gazetteer_path,
        "Starting reconciliation run"
    );

    if config.eras.is_empty() {
        error!("ERAS selected no known era; nothing to do");
        anyhow::bail!("no eras selected");
    }

    let (records, summary) = pipelines::run_all(&config)
        .with_context(|| format!("pipeline run failed (data dir {})", config.data_dir.display()))?;

    let written = export::write_canonical_csv(&config.output_path, &records)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;

    info!(
        event = "run_complete",
        rows = written,
        missing_datetime = summary.missing_datetime,
        "Done: {}",
        summary
    );
    Ok(())
}
