mod backend;
mod conflict;
mod cufe;
mod error;
mod extract;
mod pipeline;
mod run;
mod store;
mod validate;

pub use pipeline::IngestConfig;
pub use run::run;
pub use store::RecordStore;
pub use validate::validate_document;

pub(crate) const DOCUMENT_EXTENSION: &str = "pdf";
pub(crate) const DOCUMENT_SIGNATURE: &[u8; 5] = b"%PDF-";
