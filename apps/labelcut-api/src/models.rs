//! Request/response models for the labelcut API

use labelcut_core::{PageSkip, SplitConfig, TargetSize};
use serde::Serialize;

/// Caller overrides for the crop geometry, collected from the multipart
/// form. Absent fields fall back to the configured defaults; malformed
/// values are rejected before this struct is built, never defaulted.
#[derive(Debug, Default, Clone)]
pub struct CropOverrides {
    pub label_x: Option<f64>,
    pub label_y: Option<f64>,
    pub label_width: Option<f64>,
    pub label_height: Option<f64>,
    pub invoice_x: Option<f64>,
    pub invoice_y: Option<f64>,
    pub invoice_width: Option<f64>,
    pub invoice_height: Option<f64>,
    pub target_width: Option<f64>,
    pub target_height: Option<f64>,
}

impl CropOverrides {
    /// Form field names this struct accepts.
    pub const FIELDS: [&'static str; 10] = [
        "labelX",
        "labelY",
        "labelWidth",
        "labelHeight",
        "invoiceX",
        "invoiceY",
        "invoiceWidth",
        "invoiceHeight",
        "targetWidth",
        "targetHeight",
    ];

    pub fn set(&mut self, name: &str, value: f64) {
        match name {
            "labelX" => self.label_x = Some(value),
            "labelY" => self.label_y = Some(value),
            "labelWidth" => self.label_width = Some(value),
            "labelHeight" => self.label_height = Some(value),
            "invoiceX" => self.invoice_x = Some(value),
            "invoiceY" => self.invoice_y = Some(value),
            "invoiceWidth" => self.invoice_width = Some(value),
            "invoiceHeight" => self.invoice_height = Some(value),
            "targetWidth" => self.target_width = Some(value),
            "targetHeight" => self.target_height = Some(value),
            _ => {}
        }
    }

    /// Apply the overrides on top of the configured defaults.
    pub fn apply(&self, base: &SplitConfig) -> Result<SplitConfig, String> {
        let mut config = base.clone();

        if let Some(v) = self.label_x {
            config.label_rect.x = v;
        }
        if let Some(v) = self.label_y {
            config.label_rect.y = v;
        }
        if let Some(v) = self.label_width {
            config.label_rect.width = v;
        }
        if let Some(v) = self.label_height {
            config.label_rect.height = v;
        }
        if let Some(v) = self.invoice_x {
            config.invoice_rect.x = v;
        }
        if let Some(v) = self.invoice_y {
            config.invoice_rect.y = v;
        }
        if let Some(v) = self.invoice_width {
            config.invoice_rect.width = v;
        }
        if let Some(v) = self.invoice_height {
            config.invoice_rect.height = v;
        }

        match (self.target_width, self.target_height) {
            (Some(width), Some(height)) => {
                config.target = Some(TargetSize { width, height });
            }
            (None, None) => {}
            _ => {
                return Err(
                    "targetWidth and targetHeight must be supplied together".to_string()
                );
            }
        }

        Ok(config)
    }
}

/// JSON body returned for the two-document layout.
#[derive(Debug, Serialize)]
pub struct SplitPairResponse {
    pub labels_base64: String,
    pub invoices_base64: String,
    /// Total pages emitted across both documents.
    pub emitted: usize,
    pub skipped: Vec<PageSkip>,
}
