//! Split configuration: crop geometry, classification keywords, scaling.
//!
//! Everything the pipeline can be tuned with lives here as plain data. The
//! config is built once per service (or per request, with caller overrides)
//! and passed by reference; nothing in the pipeline mutates it.

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// A4 sheet size in points, the geometry the order sheets are printed on.
pub const A4_WIDTH: f64 = 595.0;
pub const A4_HEIGHT: f64 = 842.0;

/// 4x6-class thermal label stock in points.
pub const THERMAL_WIDTH: f64 = 213.0;
pub const THERMAL_HEIGHT: f64 = 354.0;

/// Pages whose trimmed extracted text is shorter than this classify as
/// Neither regardless of keyword content.
pub const DEFAULT_MIN_TEXT_LEN: usize = 20;

/// Axis-aligned crop rectangle in page coordinates (origin bottom-left,
/// units are points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the rectangle against the source page bounds.
    ///
    /// A rectangle that fails is rejected, never clamped: clamping would
    /// produce mis-cropped output with no diagnostic.
    pub fn validate(&self, page_width: f64, page_height: f64) -> Result<(), SplitError> {
        let inside = self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= page_width
            && self.y + self.height <= page_height;

        if inside {
            Ok(())
        } else {
            Err(SplitError::InvalidCrop {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                page_width,
                page_height,
            })
        }
    }

    /// Uniform scale factor that fits this rectangle inside `target`.
    ///
    /// Both axes get the same factor, so the aspect ratio is preserved and
    /// the longer side touches the target box.
    pub fn fit_scale(&self, target: TargetSize) -> f64 {
        (target.width / self.width).min(target.height / self.height)
    }
}

/// Target canvas for normalizing crops to a fixed print size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: f64,
    pub height: f64,
}

/// Classification keyword sets, kept as data so the lists can be tuned and
/// extended without touching control flow.
///
/// The sets are intentionally broad and overlapping: source sheets interleave
/// both content types per page, and the merge policy decides what a dual
/// match means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub label: Vec<String>,
    pub invoice: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            label: vec![
                "ordered through".to_string(),
                "soni singh".to_string(),
                "label".to_string(),
            ],
            invoice: vec![
                "tax invoice".to_string(),
                "fssai license number".to_string(),
                "declaration".to_string(),
                "invoice".to_string(),
            ],
        }
    }
}

/// Immutable configuration threaded into the split pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Region of each source page holding the shipping label.
    pub label_rect: CropRect,
    /// Region of each source page holding the tax invoice.
    pub invoice_rect: CropRect,
    /// When set, every crop is uniformly scaled to fit this box.
    pub target: Option<TargetSize>,
    pub min_text_len: usize,
    pub keywords: KeywordTable,
}

impl Default for SplitConfig {
    /// A4 sheet split into top (label) and bottom (invoice) halves, no
    /// scaling.
    fn default() -> Self {
        let half = A4_HEIGHT / 2.0;
        Self {
            label_rect: CropRect::new(0.0, half, A4_WIDTH, half),
            invoice_rect: CropRect::new(0.0, 0.0, A4_WIDTH, half),
            target: None,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            keywords: KeywordTable::default(),
        }
    }
}

impl SplitConfig {
    /// Default geometry normalized to thermal label stock.
    pub fn thermal() -> Self {
        Self {
            target: Some(TargetSize {
                width: THERMAL_WIDTH,
                height: THERMAL_HEIGHT,
            }),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_rects_cover_a4_halves() {
        let config = SplitConfig::default();
        assert!(config.label_rect.validate(A4_WIDTH, A4_HEIGHT).is_ok());
        assert!(config.invoice_rect.validate(A4_WIDTH, A4_HEIGHT).is_ok());
        assert_eq!(config.label_rect.y, A4_HEIGHT / 2.0);
        assert_eq!(config.invoice_rect.y, 0.0);
        assert_eq!(
            config.label_rect.height + config.invoice_rect.height,
            A4_HEIGHT
        );
    }

    #[test]
    fn validate_rejects_negative_origin() {
        let rect = CropRect::new(-1.0, 0.0, 100.0, 100.0);
        assert!(matches!(
            rect.validate(595.0, 842.0),
            Err(SplitError::InvalidCrop { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        assert!(CropRect::new(0.0, 0.0, 0.0, 100.0).validate(595.0, 842.0).is_err());
        assert!(CropRect::new(0.0, 0.0, 100.0, 0.0).validate(595.0, 842.0).is_err());
    }

    #[test]
    fn validate_rejects_overflow() {
        // 1pt past the right edge
        let rect = CropRect::new(500.0, 0.0, 96.0, 100.0);
        assert!(rect.validate(595.0, 842.0).is_err());
    }

    #[test]
    fn validate_accepts_exact_fit() {
        let rect = CropRect::new(0.0, 0.0, 595.0, 842.0);
        assert!(rect.validate(595.0, 842.0).is_ok());
    }

    #[test]
    fn fit_scale_picks_limiting_axis() {
        let rect = CropRect::new(0.0, 421.0, 595.0, 421.0);
        let scale = rect.fit_scale(TargetSize {
            width: THERMAL_WIDTH,
            height: THERMAL_HEIGHT,
        });
        // Width is the limiting axis for a half-A4 landscape region.
        assert!((scale - THERMAL_WIDTH / 595.0).abs() < 1e-12);
        assert!(421.0 * scale < THERMAL_HEIGHT);
    }

    #[test]
    fn thermal_preset_keeps_default_geometry() {
        let config = SplitConfig::thermal();
        assert_eq!(config.label_rect, SplitConfig::default().label_rect);
        assert_eq!(config.invoice_rect, SplitConfig::default().invoice_rect);
        assert_eq!(
            config.target,
            Some(TargetSize {
                width: THERMAL_WIDTH,
                height: THERMAL_HEIGHT
            })
        );
    }

    #[test]
    fn invalid_crop_error_carries_bounds() {
        let err = CropRect::new(0.0, 500.0, 595.0, 400.0)
            .validate(595.0, 842.0)
            .unwrap_err();
        match err {
            SplitError::InvalidCrop {
                y,
                height,
                page_height,
                ..
            } => {
                assert_eq!(y, 500.0);
                assert_eq!(height, 400.0);
                assert_eq!(page_height, 842.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
