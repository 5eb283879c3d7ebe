use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::IngestError;
use super::pipeline::IngestConfig;
use crate::commands::inventory::has_extension;

/// Checks the extension, then the leading signature bytes. Nothing past the
/// signature is read.
pub fn validate_document(path: &Path, config: &IngestConfig) -> Result<(), IngestError> {
    let file_name = display_name(path);

    if !has_extension(path, &config.extension) {
        return Err(IngestError::Format {
            file_name,
            reason: format!("extension is not .{}", config.extension),
        });
    }

    let header = read_header(path, config.signature.len()).map_err(|source| {
        IngestError::Unreadable {
            file_name: file_name.clone(),
            source,
        }
    })?;

    if header != config.signature {
        return Err(IngestError::Format {
            file_name,
            reason: format!(
                "signature {:?} does not match expected {:?}",
                String::from_utf8_lossy(&header),
                String::from_utf8_lossy(&config.signature)
            ),
        });
    }

    Ok(())
}

fn read_header(path: &Path, len: usize) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(len);
    file.take(len as u64).read_to_end(&mut header)?;
    Ok(header)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
