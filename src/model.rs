use serde::{Deserialize, Serialize};

/// Row of the `facturas` table, keyed by `file_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub file_name: String,
    pub page_count: u32,
    pub cufe: Option<String>,
    pub size_bytes: u64,
}

/// What the extractor learned about one file. `cufe` is `None` when the file
/// was rejected, failed to parse, or carried no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub file_name: String,
    pub page_count: u32,
    pub cufe: Option<String>,
    pub size_bytes: u64,
}

impl ExtractionResult {
    pub fn empty(file_name: String, size_bytes: u64) -> Self {
        Self {
            file_name,
            page_count: 0,
            cufe: None,
            size_bytes,
        }
    }

    /// Only results with an identifier become records.
    pub fn to_record(&self) -> Option<InvoiceRecord> {
        let cufe = self.cufe.clone()?;
        Some(InvoiceRecord {
            file_name: self.file_name.clone(),
            page_count: self.page_count,
            cufe: Some(cufe),
            size_bytes: self.size_bytes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Rejected,
    ExtractionFailed,
    NoIdentifier,
    Inserted,
    Overwritten,
    KeptExisting,
    StorageFailed,
}

impl FileOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::ExtractionFailed => "extraction_failed",
            Self::NoIdentifier => "no_identifier",
            Self::Inserted => "inserted",
            Self::Overwritten => "overwritten",
            Self::KeptExisting => "kept_existing",
            Self::StorageFailed => "storage_failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub extraction: ExtractionResult,
    pub outcome: FileOutcome,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestCounts {
    pub pdf_count: usize,
    pub rejected: usize,
    pub extraction_failed: usize,
    pub no_identifier: usize,
    pub inserted: usize,
    pub overwritten: usize,
    pub kept_existing: usize,
    pub storage_failed: usize,
}

impl IngestCounts {
    pub fn record(&mut self, outcome: FileOutcome) {
        self.pdf_count += 1;
        let slot = match outcome {
            FileOutcome::Rejected => &mut self.rejected,
            FileOutcome::ExtractionFailed => &mut self.extraction_failed,
            FileOutcome::NoIdentifier => &mut self.no_identifier,
            FileOutcome::Inserted => &mut self.inserted,
            FileOutcome::Overwritten => &mut self.overwritten,
            FileOutcome::KeptExisting => &mut self.kept_existing,
            FileOutcome::StorageFailed => &mut self.storage_failed,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub counts: IngestCounts,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn push(&mut self, report: FileReport) {
        self.counts.record(report.outcome);
        self.files.push(report);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestPaths {
    pub pdf_dir: String,
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub started_at: String,
    pub updated_at: String,
    pub conflict_mode: String,
    pub paths: IngestPaths,
    pub counts: IngestCounts,
    pub records_total: i64,
    pub files: Vec<FileReport>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfEntry {
    pub filename: String,
    pub size_bytes: u64,
    pub sha256: String,
    pub eligible: bool,
    pub rejection: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub pdf_count: usize,
    pub eligible_count: usize,
    pub pdfs: Vec<PdfEntry>,
}
