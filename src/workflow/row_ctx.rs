//! Row processing context
//!
//! Wraps "which row am I working on" for logging and error reporting.

use std::fmt::Display;

use crate::utils::logging::truncate_text;

/// Row processing context
#[derive(Debug, Clone)]
pub struct RowCtx {
    /// Zero-based index into the table
    pub index: usize,

    /// Spreadsheet row number (header is row 1, data starts at row 2) —
    /// what operators see when they open the file
    pub sheet_row: usize,

    /// Truncated name preview for log lines
    pub name_preview: String,
}

impl RowCtx {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            sheet_row: index + 2,
            name_preview: truncate_text(name, 20),
        }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} ({})", self.sheet_row, self.name_preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_row_accounts_for_the_header() {
        let ctx = RowCtx::new(0, "Headache");
        assert_eq!(ctx.sheet_row, 2);
        assert_eq!(RowCtx::new(4, "Fever").sheet_row, 6);
    }

    #[test]
    fn long_names_are_truncated_in_the_preview() {
        let ctx = RowCtx::new(0, "Disorders of the autonomic nervous system");
        assert!(ctx.name_preview.len() <= 23); // 20 chars + ellipsis
        assert!(ctx.name_preview.ends_with("..."));
    }
}
