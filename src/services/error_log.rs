//! Error log writer - capability layer
//!
//! Append-only text log with an explicit lifecycle: constructed at run
//! start, one flushed entry per failure, never truncated or rotated.

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::Result;
use tracing::debug;

/// Error log writer
pub struct ErrorLog {
    path: String,
}

impl ErrorLog {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Append one timestamped entry and flush it.
    pub async fn append(&self, message: &str) -> Result<()> {
        debug!("Appending to {}: {}", self.path, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let entry = format!(
            "{} - {}\n",
            chrono::Local::now().format("%a %b %e %H:%M:%S %Y"),
            message
        );
        file.write_all(entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Append a row-level failure with its spreadsheet row number and the
    /// full error detail.
    pub async fn append_row_error(&self, sheet_row: usize, detail: &str) -> Result<()> {
        self.append(&format!("row {} error: {}", sheet_row, detail))
            .await
    }
}
