use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use super::backend::LopdfBackend;
use super::conflict::{ConflictDecision, ConflictPolicy, FixedPolicy, PromptPolicy};
use super::pipeline::{IngestConfig, Orchestrator};
use super::store::{DB_SCHEMA_VERSION, RecordStore};
use crate::cli::{ConflictMode, IngestArgs};
use crate::model::{BatchSummary, IngestPaths, IngestRunManifest};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: IngestArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(
        pdf_dir = %args.pdf_dir.display(),
        db_path = %args.db_path.display(),
        on_conflict = args.on_conflict.as_str(),
        run_id = %run_id,
        "starting ingest"
    );

    let mut store = RecordStore::open(&args.db_path)
        .context("cannot ingest without a record store")?;

    let mut warnings = Vec::new();
    if let Err(error) = store.ensure_schema() {
        warn!(error = %error, "schema setup failed; continuing");
        warnings.push(error.to_string());
    }

    let config = IngestConfig::new(args.pdf_dir.clone());
    let backend = LopdfBackend;

    let summary = match args.on_conflict {
        ConflictMode::Prompt => {
            let policy = PromptPolicy::new(io::stdin().lock(), io::stdout(), &args.confirm_token);
            run_batch(&config, &backend, &mut store, policy)?
        }
        ConflictMode::Overwrite => run_batch(
            &config,
            &backend,
            &mut store,
            FixedPolicy(ConflictDecision::Overwrite),
        )?,
        ConflictMode::Skip => run_batch(
            &config,
            &backend,
            &mut store,
            FixedPolicy(ConflictDecision::Skip),
        )?,
    };

    let records_total = match store.count() {
        Ok(count) => count,
        Err(error) => {
            warn!(error = %error, "failed to count stored records");
            warnings.push(error.to_string());
            0
        }
    };

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = IngestRunManifest {
            manifest_version: 1,
            run_id: run_id.clone(),
            db_schema_version: DB_SCHEMA_VERSION.to_string(),
            started_at,
            updated_at: now_utc_string(),
            conflict_mode: args.on_conflict.as_str().to_string(),
            paths: IngestPaths {
                pdf_dir: args.pdf_dir.display().to_string(),
                db_path: args.db_path.display().to_string(),
            },
            counts: summary.counts.clone(),
            records_total,
            files: summary.files,
            warnings,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote ingest run manifest");
    }

    info!(run_id = %run_id, records = records_total, "ingest completed");

    Ok(())
}

fn run_batch<P: ConflictPolicy>(
    config: &IngestConfig,
    backend: &LopdfBackend,
    store: &mut RecordStore,
    policy: P,
) -> Result<BatchSummary> {
    Orchestrator::new(config, backend, store, policy)?.run()
}
