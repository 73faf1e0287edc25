use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Not a loadable PDF: {0}")]
    UnsupportedInput(String),

    #[error("Crop rectangle [{x} {y} {width} {height}] violates bounds of {page_width}x{page_height}pt page")]
    InvalidCrop {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        page_width: f64,
        page_height: f64,
    },

    #[error("No usable pages: all {} pages were skipped", .0.len())]
    NoValidPages(Vec<PageSkip>),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("PDF operation failed: {0}")]
    Operation(String),
}

/// Why a page was left out of a content-gated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSkip {
    /// Zero-based page index in the source document.
    pub page: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Extracted text was shorter than the configured minimum.
    InsufficientText { len: usize, min: usize },
    /// Enough text, but it matched neither keyword set.
    NoKeywordMatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InsufficientText { len, min } => {
                write!(f, "insufficient text ({} chars, minimum {})", len, min)
            }
            SkipReason::NoKeywordMatch => write!(f, "no keyword match"),
        }
    }
}
