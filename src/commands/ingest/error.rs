use std::path::PathBuf;

use thiserror::Error;

/// Per-file and startup failures of the ingest pipeline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Wrong extension or signature bytes.
    #[error("{file_name}: {reason}")]
    Format { file_name: String, reason: String },

    /// The file could not be opened or read before parsing.
    #[error("failed to read {file_name}: {source}")]
    Unreadable {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The document parser could not open the file or read one of its pages.
    #[error("failed to process {file_name}: {message}")]
    Parse { file_name: String, message: String },

    #[error("storage error while {action}: {source}")]
    Storage {
        action: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The directory holding the record store could not be created. Fatal.
    #[error("failed to create record store directory {}: {source}", .path.display())]
    StoreDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record store could not be opened. Fatal for the whole run.
    #[error("failed to open record store {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

impl IngestError {
    pub(crate) fn storage(action: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Storage {
            action: action.into(),
            source,
        }
    }

    /// Format-class errors mean the document never reached the parser.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Unreadable { .. })
    }
}
