use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use super::backend::DocumentBackend;
use super::conflict::{ConflictDecision, ConflictPolicy};
use super::cufe::CufeMatcher;
use super::error::IngestError;
use super::extract::extract_metadata;
use super::store::RecordStore;
use super::{DOCUMENT_EXTENSION, DOCUMENT_SIGNATURE};
use crate::commands::inventory::discover_documents;
use crate::model::{BatchSummary, ExtractionResult, FileOutcome, FileReport};

/// Where to look and what a conforming document looks like.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub pdf_dir: PathBuf,
    pub extension: String,
    pub signature: Vec<u8>,
}

impl IngestConfig {
    pub fn new(pdf_dir: PathBuf) -> Self {
        Self {
            pdf_dir,
            extension: DOCUMENT_EXTENSION.to_string(),
            signature: DOCUMENT_SIGNATURE.to_vec(),
        }
    }
}

/// Runs validation, extraction and persistence over a directory, one file
/// at a time. Per-file failures end up in the summary and never stop the batch.
pub struct Orchestrator<'a, P: ConflictPolicy> {
    config: &'a IngestConfig,
    backend: &'a dyn DocumentBackend,
    store: &'a mut RecordStore,
    policy: P,
    matcher: CufeMatcher,
}

impl<'a, P: ConflictPolicy> Orchestrator<'a, P> {
    pub fn new(
        config: &'a IngestConfig,
        backend: &'a dyn DocumentBackend,
        store: &'a mut RecordStore,
        policy: P,
    ) -> Result<Self> {
        Ok(Self {
            config,
            backend,
            store,
            policy,
            matcher: CufeMatcher::new()?,
        })
    }

    pub fn run(&mut self) -> Result<BatchSummary> {
        let documents = discover_documents(&self.config.pdf_dir, &self.config.extension)?;
        info!(
            pdf_dir = %self.config.pdf_dir.display(),
            pdf_count = documents.len(),
            "found candidate documents"
        );

        let mut summary = BatchSummary::default();
        for path in &documents {
            let report = self.process_file(path);
            log_report(&report);
            summary.push(report);
        }

        let counts = &summary.counts;
        info!(
            pdf_count = counts.pdf_count,
            inserted = counts.inserted,
            overwritten = counts.overwritten,
            kept_existing = counts.kept_existing,
            no_identifier = counts.no_identifier,
            rejected = counts.rejected,
            extraction_failed = counts.extraction_failed,
            storage_failed = counts.storage_failed,
            "batch completed"
        );

        Ok(summary)
    }

    pub fn process_file(&mut self, path: &Path) -> FileReport {
        let extraction = extract_metadata(path, self.config, self.backend, &self.matcher);

        if let Some(error) = extraction.error {
            let outcome = if error.is_rejection() {
                FileOutcome::Rejected
            } else {
                FileOutcome::ExtractionFailed
            };
            return report(extraction.result, outcome, Some(&error));
        }

        let result = extraction.result;
        let Some(record) = result.to_record() else {
            return report(result, FileOutcome::NoIdentifier, None);
        };

        let existing = match self.store.find(&record.file_name) {
            Ok(existing) => existing,
            Err(error) => return report(result, FileOutcome::StorageFailed, Some(&error)),
        };

        let outcome = match existing {
            None => FileOutcome::Inserted,
            Some(existing) => match self.policy.decide(&record.file_name, &existing) {
                ConflictDecision::Overwrite => FileOutcome::Overwritten,
                ConflictDecision::Skip => return report(result, FileOutcome::KeptExisting, None),
            },
        };

        match self.store.upsert(&record) {
            Ok(()) => report(result, outcome, None),
            Err(error) => report(result, FileOutcome::StorageFailed, Some(&error)),
        }
    }
}

fn report(
    extraction: ExtractionResult,
    outcome: FileOutcome,
    error: Option<&IngestError>,
) -> FileReport {
    FileReport {
        extraction,
        outcome,
        detail: error.map(ToString::to_string),
    }
}

fn log_report(report: &FileReport) {
    let file = &report.extraction.file_name;
    let outcome = report.outcome.as_str();
    let detail = report.detail.as_deref().unwrap_or_default();

    match report.outcome {
        FileOutcome::Inserted | FileOutcome::Overwritten => info!(
            file = %file,
            pages = report.extraction.page_count,
            cufe = %report.extraction.cufe.as_deref().unwrap_or_default(),
            size_bytes = report.extraction.size_bytes,
            outcome,
            "stored invoice record"
        ),
        FileOutcome::KeptExisting => info!(file = %file, outcome, "kept existing record"),
        FileOutcome::NoIdentifier => info!(
            file = %file,
            pages = report.extraction.page_count,
            outcome,
            "no CUFE found"
        ),
        FileOutcome::Rejected | FileOutcome::ExtractionFailed | FileOutcome::StorageFailed => {
            warn!(file = %file, outcome, detail = %detail, "file skipped")
        }
    }
}
