use std::io::{BufRead, Write};

use tracing::warn;

use crate::model::InvoiceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    Overwrite,
    Skip,
}

/// Decides what happens when a file name is already stored.
pub trait ConflictPolicy {
    fn decide(&mut self, file_name: &str, existing: &InvoiceRecord) -> ConflictDecision;
}

/// Always answers the same way. Used for unattended runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub ConflictDecision);

impl ConflictPolicy for FixedPolicy {
    fn decide(&mut self, _file_name: &str, _existing: &InvoiceRecord) -> ConflictDecision {
        self.0
    }
}

/// Asks on `output` and reads one line from `input`. Only the confirm token
/// (case-insensitive) overwrites; anything else, EOF included, skips.
pub struct PromptPolicy<R, W> {
    input: R,
    output: W,
    confirm_token: String,
}

impl<R: BufRead, W: Write> PromptPolicy<R, W> {
    pub fn new(input: R, output: W, confirm_token: impl Into<String>) -> Self {
        Self {
            input,
            output,
            confirm_token: confirm_token.into(),
        }
    }

    fn ask(&mut self, file_name: &str, existing: &InvoiceRecord) -> std::io::Result<String> {
        write!(
            self.output,
            "Data for '{}' already exists (cufe {}, {} pages). Overwrite? ({}/n): ",
            file_name,
            existing.cufe.as_deref().unwrap_or("-"),
            existing.page_count,
            self.confirm_token
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> ConflictPolicy for PromptPolicy<R, W> {
    fn decide(&mut self, file_name: &str, existing: &InvoiceRecord) -> ConflictDecision {
        match self.ask(file_name, existing) {
            Ok(answer) if answer.trim().eq_ignore_ascii_case(&self.confirm_token) => {
                ConflictDecision::Overwrite
            }
            Ok(_) => ConflictDecision::Skip,
            Err(err) => {
                warn!(file = %file_name, error = %err, "conflict prompt failed; keeping existing record");
                ConflictDecision::Skip
            }
        }
    }
}
