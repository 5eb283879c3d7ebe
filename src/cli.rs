use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "facturas",
    version,
    about = "Extract CUFE identifiers from invoice PDFs into a local SQLite store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Ingest(IngestArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = "pdf_sample")]
    pub pdf_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long, default_value = "pdf_sample")]
    pub pdf_dir: PathBuf,

    #[arg(long, default_value = "facturas.db")]
    pub db_path: PathBuf,

    #[arg(long, value_enum, default_value_t = ConflictMode::Prompt)]
    pub on_conflict: ConflictMode,

    /// Answer that confirms an overwrite when `--on-conflict prompt` is used.
    #[arg(long, default_value = "s")]
    pub confirm_token: String,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ConflictMode {
    Prompt,
    Overwrite,
    Skip,
}

impl ConflictMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "facturas.db")]
    pub db_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
