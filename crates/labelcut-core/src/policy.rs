//! Merge policies: how cropped, classified pages become output documents.
//!
//! The repository's request variants are configurations of one pipeline, not
//! separate code paths: a [`SplitMode`] decides which crops each page
//! receives and an [`OutputLayout`] decides how the results are distributed
//! across one or two documents. Output order is a deterministic function of
//! source page order and policy.

use crate::classify::{classify, Classification};
use crate::config::{CropRect, SplitConfig};
use crate::crop::OutputBuilder;
use crate::document::SheetDocument;
use crate::error::{PageSkip, SkipReason, SplitError};

/// Which crop(s) each page receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Every page gets both the label and the invoice crop, regardless of
    /// content.
    Fixed,
    /// Classify first; emit only the crops the page's text calls for.
    ContentGated,
}

/// How emitted pages are distributed across output documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// One document: label, invoice, label, invoice, ...
    Interleaved,
    /// Two parallel documents: all labels, all invoices.
    Separate,
}

/// The serialized result of a split.
pub enum SplitOutput {
    Merged(Vec<u8>),
    Pair { labels: Vec<u8>, invoices: Vec<u8> },
}

pub struct SplitReport {
    pub output: SplitOutput,
    /// Total pages emitted across all outputs.
    pub emitted: usize,
    /// Pages the content gate left out, in source order.
    pub skipped: Vec<PageSkip>,
}

/// Which crops one page gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PagePlan {
    pub label: bool,
    pub invoice: bool,
}

/// Decide a page's crops from its extracted text, or the reason to skip it.
pub(crate) fn plan_page(text: &str, config: &SplitConfig) -> Result<PagePlan, SkipReason> {
    let class = classify(text, &config.keywords, config.min_text_len);
    if class == Classification::Neither {
        let len = text.trim().len();
        if len < config.min_text_len {
            return Err(SkipReason::InsufficientText {
                len,
                min: config.min_text_len,
            });
        }
        return Err(SkipReason::NoKeywordMatch);
    }
    Ok(PagePlan {
        label: class.is_label(),
        invoice: class.is_invoice(),
    })
}

enum Sinks {
    One(OutputBuilder),
    Two {
        labels: OutputBuilder,
        invoices: OutputBuilder,
    },
}

impl Sinks {
    fn for_layout(layout: OutputLayout, source: &SheetDocument) -> Self {
        match layout {
            OutputLayout::Interleaved => Sinks::One(OutputBuilder::from_source(source)),
            OutputLayout::Separate => Sinks::Two {
                labels: OutputBuilder::from_source(source),
                invoices: OutputBuilder::from_source(source),
            },
        }
    }

    fn label_sink(&mut self) -> &mut OutputBuilder {
        match self {
            Sinks::One(builder) => builder,
            Sinks::Two { labels, .. } => labels,
        }
    }

    fn invoice_sink(&mut self) -> &mut OutputBuilder {
        match self {
            Sinks::One(builder) => builder,
            Sinks::Two { invoices, .. } => invoices,
        }
    }

    /// Total pages pushed across all builders.
    fn emitted(&self) -> usize {
        match self {
            Sinks::One(builder) => builder.page_count(),
            Sinks::Two { labels, invoices } => labels.page_count() + invoices.page_count(),
        }
    }

    fn finish(self) -> Result<SplitOutput, SplitError> {
        match self {
            Sinks::One(builder) => Ok(SplitOutput::Merged(builder.finish()?)),
            Sinks::Two { labels, invoices } => Ok(SplitOutput::Pair {
                labels: labels.finish()?,
                invoices: invoices.finish()?,
            }),
        }
    }
}

/// Split an uploaded order sheet into label and invoice pages.
///
/// Pages are processed strictly in source order; any failure aborts the
/// whole request with no partial output. In [`SplitMode::ContentGated`] a
/// document that yields zero emitted pages fails with
/// [`SplitError::NoValidPages`] carrying every skip reason.
pub fn split_sheets(
    bytes: &[u8],
    config: &SplitConfig,
    mode: SplitMode,
    layout: OutputLayout,
) -> Result<SplitReport, SplitError> {
    let source = SheetDocument::load(bytes.to_vec())?;

    let texts = match mode {
        SplitMode::Fixed => None,
        SplitMode::ContentGated => Some(source.page_texts()?),
    };

    let label_scale = scale_for(&config.label_rect, config);
    let invoice_scale = scale_for(&config.invoice_rect, config);

    let mut sinks = Sinks::for_layout(layout, &source);
    let mut skipped = Vec::new();

    for index in 0..source.page_count() {
        let plan = match &texts {
            None => PagePlan {
                label: true,
                invoice: true,
            },
            Some(texts) => match plan_page(&texts[index], config) {
                Ok(plan) => plan,
                Err(reason) => {
                    skipped.push(PageSkip {
                        page: index,
                        reason,
                    });
                    continue;
                }
            },
        };

        let (page_width, page_height) = source.page_size(index)?;

        if plan.label {
            config.label_rect.validate(page_width, page_height)?;
            sinks
                .label_sink()
                .push_crop(&source, index, &config.label_rect, label_scale)?;
        }
        if plan.invoice {
            config.invoice_rect.validate(page_width, page_height)?;
            sinks
                .invoice_sink()
                .push_crop(&source, index, &config.invoice_rect, invoice_scale)?;
        }
    }

    let emitted = sinks.emitted();
    if emitted == 0 && mode == SplitMode::ContentGated {
        return Err(SplitError::NoValidPages(skipped));
    }

    Ok(SplitReport {
        output: sinks.finish()?,
        emitted,
        skipped,
    })
}

fn scale_for(rect: &CropRect, config: &SplitConfig) -> f64 {
    config.target.map(|t| rect.fit_scale(t)).unwrap_or(1.0)
}
