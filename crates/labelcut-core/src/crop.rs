//! Crop extraction: output pages restricted to a crop rectangle.
//!
//! An [`OutputBuilder`] imports every object of the source document into a
//! fresh document once, then appends page copies that share the source
//! content streams and resources but carry their own MediaBox/CropBox. After
//! the last crop the old page tree is rebuilt around the copies and orphaned
//! source structure is pruned away.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::config::CropRect;
use crate::document::SheetDocument;
use crate::error::SplitError;

/// Accumulates cropped page copies into a fresh output document.
pub struct OutputBuilder {
    dest: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputBuilder {
    /// Seed a builder from a source document. The source itself is left
    /// untouched; its objects are cloned into the destination.
    pub fn from_source(source: &SheetDocument) -> Self {
        let mut dest = Document::with_version("1.5");
        for (id, object) in source.doc().objects.iter() {
            dest.objects.insert(*id, object.clone());
        }
        dest.max_id = source.doc().max_id;

        // Reserve the id now; the pages dictionary is written in finish().
        let pages_id = dest.new_object_id();
        Self {
            dest,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Append a copy of page `page_index` whose visible region is `rect`,
    /// uniformly scaled by `scale`.
    ///
    /// The rectangle must already be validated against the page bounds. With
    /// `scale == 1.0` the copy's canvas is exactly `rect.width x rect.height`
    /// points; the crop region fills it at 1:1 scale.
    pub fn push_crop(
        &mut self,
        source: &SheetDocument,
        page_index: usize,
        rect: &CropRect,
        scale: f64,
    ) -> Result<(), SplitError> {
        let src_id = source
            .page_id(page_index)
            .ok_or_else(|| SplitError::Operation(format!("page {} out of range", page_index)))?;

        let mut page = source
            .doc()
            .get_object(src_id)
            .and_then(Object::as_dict)
            .map_err(|e| SplitError::Operation(format!("bad page object: {}", e)))?
            .clone();

        // Resources may be inherited from the old page tree; the copy's new
        // tree has no ancestors to inherit from, so pin them on the page.
        if page.get(b"Resources").is_err() {
            if let Some(resources) = inherited(source.doc(), src_id, b"Resources") {
                page.set("Resources", resources);
            }
        }

        if (scale - 1.0).abs() > f64::EPSILON {
            let contents = content_refs(&page)?;
            let prefix = self.dest.add_object(Stream::new(
                Dictionary::new(),
                format!("q {} 0 0 {} 0 0 cm\n", scale, scale).into_bytes(),
            ));
            let suffix = self
                .dest
                .add_object(Stream::new(Dictionary::new(), b"Q".to_vec()));

            let mut wrapped = vec![Object::Reference(prefix)];
            wrapped.extend(contents.into_iter().map(Object::Reference));
            wrapped.push(Object::Reference(suffix));
            page.set("Contents", Object::Array(wrapped));
        }

        // The scaled rectangle becomes both the canvas and the clip region,
        // so viewers show only the crop.
        let corners = [
            rect.x * scale,
            rect.y * scale,
            (rect.x + rect.width) * scale,
            (rect.y + rect.height) * scale,
        ];
        let bounds = Object::Array(
            corners
                .iter()
                .map(|v| Object::Real(*v as f32))
                .collect::<Vec<_>>(),
        );
        page.set("MediaBox", bounds.clone());
        page.set("CropBox", bounds);
        page.set("Parent", Object::Reference(self.pages_id));

        let page_id = self.dest.add_object(Object::Dictionary(page));
        self.kids.push(page_id);
        Ok(())
    }

    /// Number of pages pushed so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Rebuild the page tree around the pushed copies, drop orphaned source
    /// structure and serialize.
    pub fn finish(mut self) -> Result<Vec<u8>, SplitError> {
        let kids = self
            .kids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect::<Vec<_>>();
        self.dest.objects.insert(
            self.pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Count", Object::Integer(self.kids.len() as i64)),
                ("Kids", Object::Array(kids)),
            ])),
        );

        let catalog_id = self.dest.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.dest.trailer.set("Root", Object::Reference(catalog_id));

        // The source catalog and page tree are unreachable from the new root.
        self.dest.prune_objects();
        self.dest.compress();

        let mut buffer = Vec::new();
        self.dest
            .save_to(&mut buffer)
            .map_err(|e| SplitError::Operation(format!("save failed: {}", e)))?;
        Ok(buffer)
    }
}

/// Ordered content stream references of a page, empty for a contentless page.
fn content_refs(page: &Dictionary) -> Result<Vec<ObjectId>, SplitError> {
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => Ok(vec![*id]),
        Ok(Object::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_reference()
                    .map_err(|_| SplitError::Operation("non-reference content entry".into()))
            })
            .collect(),
        Ok(_) => Err(SplitError::Operation("unsupported Contents value".into())),
        Err(_) => Ok(Vec::new()),
    }
}

/// Resolve an inheritable page attribute by walking the Parent chain.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    for _ in 0..16 {
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_object(parent_id).ok()?.as_dict().ok()?;
    }
    None
}
