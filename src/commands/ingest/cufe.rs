use anyhow::{Context, Result};
use regex::Regex;

/// 95 to 100 hex digits, possibly broken across lines, between word boundaries.
const CUFE_PATTERN: &str = r"\b(?:[0-9a-fA-F][\r\n]*){95,100}\b";

#[derive(Debug, Clone)]
pub struct CufeMatcher {
    pattern: Regex,
}

impl CufeMatcher {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(CUFE_PATTERN).context("failed to compile CUFE regex")?;
        Ok(Self { pattern })
    }

    /// First identifier in `text`, with line breaks removed.
    pub fn find(&self, text: &str) -> Option<String> {
        self.pattern
            .find(text)
            .map(|found| found.as_str().replace(['\r', '\n'], ""))
    }
}
