//! HTTP handlers for the labelcut API

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{CropOverrides, SplitPairResponse};
use crate::state::AppState;
use labelcut_core::{merge_presplit, split_sheets, OutputLayout, SplitMode, SplitOutput};

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Split an uploaded order sheet into label and invoice pages.
///
/// Multipart form: `pdf` (file, required), `mode` (`fixed` | `gated`),
/// `layout` (`merged` | `separate`), plus optional numeric crop overrides
/// (`labelX`, ..., `targetHeight`). Merged layout responds with the PDF
/// itself; separate layout responds with JSON carrying both documents
/// base64-encoded and the skip report.
pub async fn split(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut pdf: Option<Vec<u8>> = None;
    let mut overrides = CropOverrides::default();
    let mut mode = SplitMode::Fixed;
    let mut layout = OutputLayout::Interleaved;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "pdf" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::InvalidRequest(format!("Read error: {}", e)))?;
                pdf = Some(data.to_vec());
            }
            "mode" => mode = parse_mode(&text_field(field).await?)?,
            "layout" => layout = parse_layout(&text_field(field).await?)?,
            _ if CropOverrides::FIELDS.contains(&name.as_str()) => {
                let raw = text_field(field).await?;
                let value: f64 = raw.trim().parse().map_err(|_| {
                    ApiError::InvalidRequest(format!("Invalid number for {}: {}", name, raw))
                })?;
                overrides.set(&name, value);
            }
            _ => {}
        }
    }

    let pdf = pdf.ok_or_else(|| ApiError::InvalidRequest("No PDF uploaded".into()))?;
    let config = overrides
        .apply(&state.config)
        .map_err(ApiError::InvalidRequest)?;

    tracing::info!(
        "Splitting {} byte upload (mode {:?}, layout {:?})",
        pdf.len(),
        mode,
        layout
    );

    let report = split_sheets(&pdf, &config, mode, layout)?;

    for skip in &report.skipped {
        tracing::info!("Skipped page {}: {}", skip.page, skip.reason);
    }
    tracing::info!(
        "Emitted {} pages, skipped {}",
        report.emitted,
        report.skipped.len()
    );

    match report.output {
        SplitOutput::Merged(bytes) => Ok(pdf_response(bytes, "labels_merged.pdf")),
        SplitOutput::Pair { labels, invoices } => Ok(Json(SplitPairResponse {
            labels_base64: BASE64.encode(&labels),
            invoices_base64: BASE64.encode(&invoices),
            emitted: report.emitted,
            skipped: report.skipped,
        })
        .into_response()),
    }
}

/// Interleave two pre-split documents (all labels + all invoices) pairwise.
pub async fn merge(mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut labels: Option<Vec<u8>> = None;
    let mut invoices: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "labels" => labels = Some(bytes_field(field).await?),
            "invoices" => invoices = Some(bytes_field(field).await?),
            _ => {}
        }
    }

    let labels =
        labels.ok_or_else(|| ApiError::InvalidRequest("No labels document uploaded".into()))?;
    let invoices =
        invoices.ok_or_else(|| ApiError::InvalidRequest("No invoices document uploaded".into()))?;

    let outcome = merge_presplit(&labels, &invoices)?;

    let dropped = outcome.dropped_labels + outcome.dropped_invoices;
    if dropped > 0 {
        tracing::warn!(
            "Page count mismatch: dropped {} label and {} invoice pages",
            outcome.dropped_labels,
            outcome.dropped_invoices
        );
    }
    tracing::info!("Merged {} page pairs", outcome.pairs);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                "attachment; filename=\"labels_merged.pdf\"".to_string(),
            ),
            ("X-Dropped-Pages".to_string(), dropped.to_string()),
        ],
        outcome.bytes,
    )
        .into_response())
}

async fn text_field(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Field read error: {}", e)))
}

async fn bytes_field(field: Field<'_>) -> Result<Vec<u8>, ApiError> {
    Ok(field
        .bytes()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Read error: {}", e)))?
        .to_vec())
}

fn parse_mode(raw: &str) -> Result<SplitMode, ApiError> {
    match raw.trim() {
        "fixed" => Ok(SplitMode::Fixed),
        "gated" => Ok(SplitMode::ContentGated),
        other => Err(ApiError::InvalidRequest(format!(
            "Unknown mode: {} (expected fixed or gated)",
            other
        ))),
    }
}

fn parse_layout(raw: &str) -> Result<OutputLayout, ApiError> {
    match raw.trim() {
        "merged" => Ok(OutputLayout::Interleaved),
        "separate" => Ok(OutputLayout::Separate),
        other => Err(ApiError::InvalidRequest(format!(
            "Unknown layout: {} (expected merged or separate)",
            other
        ))),
    }
}

fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
