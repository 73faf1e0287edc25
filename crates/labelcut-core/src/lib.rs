//! Order-sheet splitting for e-commerce shipping workflows.
//!
//! Uploaded sheets carry a shipping label in one region of each page and a
//! tax invoice in another. This crate crops those regions into derivative
//! pages and assembles them into output documents:
//!
//! - [`classify`]: keyword-based page classification from extracted text
//! - [`crop::OutputBuilder`]: validated rectangular crop extraction
//! - [`policy::split_sheets`]: fixed and content-gated split pipelines
//! - [`merge::merge_presplit`]: pairwise interleave of two pre-split documents

pub mod classify;
pub mod config;
pub mod crop;
pub mod document;
pub mod error;
pub mod merge;
pub mod policy;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use classify::{classify, Classification};
pub use config::{CropRect, KeywordTable, SplitConfig, TargetSize};
pub use crop::OutputBuilder;
pub use document::SheetDocument;
pub use error::{PageSkip, SkipReason, SplitError};
pub use merge::{merge_presplit, MergeOutcome};
pub use policy::{split_sheets, OutputLayout, SplitMode, SplitOutput, SplitReport};

/// Parse PDF bytes and return the page count.
pub fn get_page_count(bytes: &[u8]) -> Result<u32, SplitError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| SplitError::UnsupportedInput(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pdf::sample_pdf;

    #[test]
    fn page_count_of_sample_document() {
        let bytes = sample_pdf(4, 595.0, 842.0);
        assert_eq!(get_page_count(&bytes).unwrap(), 4);
    }

    #[test]
    fn page_count_rejects_garbage() {
        assert!(matches!(
            get_page_count(b"%PDF-nope"),
            Err(SplitError::UnsupportedInput(_))
        ));
    }
}
