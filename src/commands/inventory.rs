use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::InventoryArgs;
use crate::commands::ingest::{IngestConfig, validate_document};
use crate::model::{PdfEntry, PdfInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let config = IngestConfig::new(args.pdf_dir.clone());
    let manifest = build_manifest(&config)?;

    for entry in manifest.pdfs.iter().filter(|entry| !entry.eligible) {
        warn!(
            file = %entry.filename,
            reason = %entry.rejection.as_deref().unwrap_or_default(),
            "document not eligible for extraction"
        );
    }

    if args.dry_run {
        info!(
            pdf_count = manifest.pdf_count,
            eligible = manifest.eligible_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.pdf_dir.join("pdf_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(
        pdf_count = manifest.pdf_count,
        eligible = manifest.eligible_count,
        "inventory completed"
    );

    Ok(())
}

pub fn build_manifest(config: &IngestConfig) -> Result<PdfInventoryManifest> {
    let pdf_paths = discover_documents(&config.pdf_dir, &config.extension)?;

    let mut pdfs = Vec::with_capacity(pdf_paths.len());
    for path in pdf_paths {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("path has no file name: {}", path.display()))?;
        let size_bytes = fs::metadata(&path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        let sha256 = sha256_file(&path)?;
        let verdict = validate_document(&path, config);

        pdfs.push(PdfEntry {
            filename,
            size_bytes,
            sha256,
            eligible: verdict.is_ok(),
            rejection: verdict.err().map(|err| err.to_string()),
        });
    }

    let eligible_count = pdfs.iter().filter(|entry| entry.eligible).count();

    Ok(PdfInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: config.pdf_dir.display().to_string(),
        pdf_count: pdfs.len(),
        eligible_count,
        pdfs,
    })
}

/// Lists regular files directly under `dir` whose extension matches
/// `extension` case-insensitively, sorted by path. Symlinks count when they
/// resolve to a regular file; dangling ones are logged and left out.
pub fn discover_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if !has_extension(&path, extension) {
            continue;
        }

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => documents.push(path),
            Ok(_) => {}
            Err(err) => warn!(path = %path.display(), error = %err, "skipping unresolvable entry"),
        }
    }

    documents.sort();
    Ok(documents)
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
