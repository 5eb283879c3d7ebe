use std::fs;
use std::path::Path;

use tracing::debug;

use super::backend::DocumentBackend;
use super::cufe::CufeMatcher;
use super::error::IngestError;
use super::pipeline::IngestConfig;
use super::validate::{display_name, validate_document};
use crate::model::ExtractionResult;

/// Extraction result plus the error that cut it short, if any. A missing
/// identifier is not an error.
#[derive(Debug)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub error: Option<IngestError>,
}

impl Extraction {
    fn completed(result: ExtractionResult) -> Self {
        Self {
            result,
            error: None,
        }
    }

    fn failed(file_name: String, size_bytes: u64, error: IngestError) -> Self {
        Self {
            result: ExtractionResult::empty(file_name, size_bytes),
            error: Some(error),
        }
    }
}

pub fn extract_metadata(
    path: &Path,
    config: &IngestConfig,
    backend: &dyn DocumentBackend,
    matcher: &CufeMatcher,
) -> Extraction {
    let file_name = display_name(path);

    let size_bytes = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(source) => {
            return Extraction::failed(
                file_name.clone(),
                0,
                IngestError::Unreadable { file_name, source },
            );
        }
    };

    if let Err(error) = validate_document(path, config) {
        return Extraction::failed(file_name, size_bytes, error);
    }

    match scan_pages(path, backend, matcher) {
        Ok((page_count, cufe)) => Extraction::completed(ExtractionResult {
            file_name,
            page_count,
            cufe,
            size_bytes,
        }),
        Err(err) => {
            let error = IngestError::Parse {
                file_name: file_name.clone(),
                message: format!("{err:#}"),
            };
            Extraction::failed(file_name, size_bytes, error)
        }
    }
}

/// Walks pages in order and stops at the first page carrying an identifier.
fn scan_pages(
    path: &Path,
    backend: &dyn DocumentBackend,
    matcher: &CufeMatcher,
) -> anyhow::Result<(u32, Option<String>)> {
    let document = backend.open(path)?;
    let page_count = document.page_count();

    let cufe = (0..page_count)
        .map(|index| document.page_text(index).map(|text| (index, text)))
        .find_map(|page| match page {
            Ok((index, text)) => matcher.find(&text).map(|cufe| {
                debug!(path = %path.display(), page = index, "found CUFE");
                Ok(cufe)
            }),
            Err(err) => Some(Err(err)),
        })
        .transpose()?;

    let page_count = u32::try_from(page_count)?;
    Ok((page_count, cufe))
}
