//! Loaded source document: page geometry and extracted text.

use lopdf::{Document, Object, ObjectId};

use crate::error::SplitError;

/// An uploaded order sheet, parsed once per request.
///
/// The document is never mutated; derivative pages are always copies built
/// by [`crate::crop::OutputBuilder`]. The original bytes are kept alongside
/// the parsed form because text extraction works from bytes.
pub struct SheetDocument {
    doc: Document,
    bytes: Vec<u8>,
    page_ids: Vec<ObjectId>,
}

impl SheetDocument {
    /// Parse uploaded bytes. Anything lopdf cannot load is rejected up front,
    /// before any page processing starts.
    pub fn load(bytes: Vec<u8>) -> Result<Self, SplitError> {
        let doc = Document::load_mem(&bytes)
            .map_err(|e| SplitError::UnsupportedInput(e.to_string()))?;
        // get_pages is keyed by 1-based page number, so iteration order is
        // document order.
        let page_ids = doc.get_pages().values().copied().collect();
        Ok(Self {
            doc,
            bytes,
            page_ids,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub(crate) fn doc(&self) -> &Document {
        &self.doc
    }

    /// Object id of the page at `index` (zero-based).
    pub(crate) fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    /// Page width and height in points.
    pub fn page_size(&self, index: usize) -> Result<(f64, f64), SplitError> {
        let [_, _, width, height] = self.page_box(index)?;
        Ok((width, height))
    }

    /// MediaBox of the page at `index` as `[x, y, width, height]`, inheriting
    /// from the page tree when the page dictionary omits it.
    pub fn page_box(&self, index: usize) -> Result<[f64; 4], SplitError> {
        let page_id = self
            .page_id(index)
            .ok_or_else(|| SplitError::Operation(format!("page {} out of range", index)))?;

        let mut dict = self.dict_at(page_id)?;
        // Inheritable attribute; cap the walk in case of a cyclic Parent chain.
        for _ in 0..16 {
            if let Ok(media_box) = dict.get(b"MediaBox") {
                return self.parse_rect(media_box);
            }
            match dict.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent_id) => dict = self.dict_at(parent_id)?,
                Err(_) => break,
            }
        }

        Err(SplitError::Operation(format!(
            "page {} has no MediaBox",
            index
        )))
    }

    /// Per-page plain text of the whole document.
    ///
    /// The result is padded or truncated to the page count so indexes stay
    /// aligned with the page list even when trailing pages are blank.
    pub fn page_texts(&self) -> Result<Vec<String>, SplitError> {
        let mut texts = pdf_extract::extract_text_from_mem_by_pages(&self.bytes)
            .map_err(|e| SplitError::Extraction(e.to_string()))?;
        texts.resize(self.page_count(), String::new());
        Ok(texts)
    }

    fn dict_at(&self, id: ObjectId) -> Result<&lopdf::Dictionary, SplitError> {
        self.doc
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|e| SplitError::Operation(format!("bad page tree node {:?}: {}", id, e)))
    }

    /// Parse a PDF rectangle array into `[x, y, width, height]`.
    fn parse_rect(&self, obj: &Object) -> Result<[f64; 4], SplitError> {
        let arr = match obj {
            Object::Array(a) => a,
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .and_then(Object::as_array)
                .map_err(|e| SplitError::Operation(format!("bad MediaBox reference: {}", e)))?,
            _ => {
                return Err(SplitError::Operation("MediaBox is not an array".into()));
            }
        };

        if arr.len() != 4 {
            return Err(SplitError::Operation(format!(
                "MediaBox has {} elements, expected 4",
                arr.len()
            )));
        }

        let mut corners = [0.0f64; 4];
        for (slot, obj) in corners.iter_mut().zip(arr) {
            *slot = self.number(obj)?;
        }

        // [x1, y1, x2, y2] -> [x, y, width, height]
        Ok([
            corners[0],
            corners[1],
            corners[2] - corners[0],
            corners[3] - corners[1],
        ])
    }

    fn number(&self, obj: &Object) -> Result<f64, SplitError> {
        match obj {
            Object::Integer(i) => Ok(*i as f64),
            Object::Real(r) => Ok(*r as f64),
            Object::Reference(id) => {
                let resolved = self
                    .doc
                    .get_object(*id)
                    .map_err(|e| SplitError::Operation(format!("bad number reference: {}", e)))?;
                self.number(resolved)
            }
            _ => Err(SplitError::Operation(
                "expected number in rectangle".into(),
            )),
        }
    }
}
