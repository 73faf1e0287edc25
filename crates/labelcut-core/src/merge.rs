//! Interleaving merge for externally pre-split label and invoice documents.

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId};

use crate::error::SplitError;

/// Result of a pre-split merge.
pub struct MergeOutcome {
    pub bytes: Vec<u8>,
    /// Label/invoice pairs emitted.
    pub pairs: usize,
    /// Pages of the labels document past the pair count.
    pub dropped_labels: usize,
    /// Pages of the invoices document past the pair count.
    pub dropped_invoices: usize,
}

/// Interleave an all-labels document with an all-invoices document pairwise:
/// label 1, invoice 1, label 2, invoice 2, ... up to the shorter page count.
///
/// Excess pages in the longer document are dropped, not an error; callers
/// that need equal counts must pre-validate. The drop is reported in the
/// outcome so the service layer can log it.
pub fn merge_presplit(labels: &[u8], invoices: &[u8]) -> Result<MergeOutcome, SplitError> {
    let mut dest = Document::load_mem(labels)
        .map_err(|e| SplitError::UnsupportedInput(format!("labels document: {}", e)))?;
    let source = Document::load_mem(invoices)
        .map_err(|e| SplitError::UnsupportedInput(format!("invoices document: {}", e)))?;

    let label_pages = page_refs(&dest);
    let invoice_pages = page_refs(&source);
    let source_max_id = source.max_id;

    // Import the invoice document with remapped ids so nothing collides.
    let id_offset = dest.max_id;
    let mut imported = BTreeMap::new();
    for (old_id, object) in source.objects.into_iter() {
        imported.insert(
            (old_id.0 + id_offset, old_id.1),
            remap_refs(object, id_offset),
        );
    }
    dest.objects.extend(imported);
    dest.max_id = source_max_id + id_offset;

    let pairs = label_pages.len().min(invoice_pages.len());
    let mut interleaved = Vec::with_capacity(pairs * 2);
    for index in 0..pairs {
        interleaved.push(label_pages[index]);
        let invoice = invoice_pages[index];
        interleaved.push((invoice.0 + id_offset, invoice.1));
    }

    rebuild_page_tree(&mut dest, &interleaved)?;

    // Excess pages and the imported catalog are now unreachable.
    dest.prune_objects();
    dest.compress();

    let mut bytes = Vec::new();
    dest.save_to(&mut bytes)
        .map_err(|e| SplitError::Operation(format!("save failed: {}", e)))?;

    Ok(MergeOutcome {
        bytes,
        pairs,
        dropped_labels: label_pages.len() - pairs,
        dropped_invoices: invoice_pages.len() - pairs,
    })
}

/// Page object ids in document order.
fn page_refs(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Recursively shift every object reference by `offset`.
fn remap_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(entries) => Object::Array(
            entries
                .into_iter()
                .map(|entry| remap_refs(entry, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Point the destination's page tree at the interleaved page list and
/// reparent every kept page into it.
fn rebuild_page_tree(doc: &mut Document, pages: &[ObjectId]) -> Result<(), SplitError> {
    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| SplitError::Operation(format!("malformed page tree: {}", e)))?;

    match doc.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(root)) => {
            root.set(
                "Kids",
                Object::Array(pages.iter().map(|&id| Object::Reference(id)).collect()),
            );
            root.set("Count", Object::Integer(pages.len() as i64));
        }
        _ => {
            return Err(SplitError::Operation(
                "pages root is not a dictionary".into(),
            ));
        }
    }

    for &id in pages {
        if let Some(Object::Dictionary(page)) = doc.objects.get_mut(&id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }
    Ok(())
}
