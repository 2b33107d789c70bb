// SPDX-License-Identifier: MIT
//
// PDF reader — open, inspect, and split existing PDF documents using the
// `lopdf` crate. Backs the PDF split tool page.

use std::path::Path;

use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::{debug, info, instrument, warn};
use utilbox_core::PageRange;
use utilbox_core::error::UtilboxError;

/// Reads and splits existing PDF files.
///
/// Wraps `lopdf::Document` and provides the page-level extraction operations
/// behind the split tool: single pages, contiguous ranges, split-at-a-page,
/// and one-document-per-page.
#[derive(Debug)]
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, UtilboxError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            UtilboxError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, UtilboxError> {
        let document = Document::load_mem(data).map_err(|err| {
            UtilboxError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    // -- Extraction -----------------------------------------------------------

    /// Extract a single page (1-indexed) into a new standalone PDF document.
    ///
    /// Returns the serialised bytes of the single-page PDF.
    #[instrument(skip(self), fields(page_number))]
    pub fn extract_page(&self, page_number: u32) -> Result<Vec<u8>, UtilboxError> {
        let total = self.page_count() as u32;
        if page_number == 0 || page_number > total {
            return Err(UtilboxError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number, total
            )));
        }
        let output = self.build_document_from_pages(&[page_number])?;
        debug!(page_number, output_bytes = output.len(), "Page extracted");
        Ok(output)
    }

    /// Extract a contiguous, 1-indexed, inclusive page range into a new PDF.
    #[instrument(skip(self), fields(start = range.start, end = range.end))]
    pub fn extract_range(&self, range: PageRange) -> Result<Vec<u8>, UtilboxError> {
        let total = self.page_count() as u32;
        if range.is_empty() || range.start == 0 || range.end > total {
            return Err(UtilboxError::PdfError(format!(
                "page range {}-{} out of range (document has {} pages)",
                range.start, range.end, total
            )));
        }
        let numbers: Vec<u32> = (range.start..=range.end).collect();
        self.build_document_from_pages(&numbers)
    }

    /// Split the document at `after_page` (1-indexed, inclusive) producing two
    /// byte-vectors: pages [1..=after_page] and pages [after_page+1..=end].
    #[instrument(skip(self), fields(after_page))]
    pub fn split(&self, after_page: u32) -> Result<(Vec<u8>, Vec<u8>), UtilboxError> {
        let total = self.page_count() as u32;
        if after_page == 0 || after_page >= total {
            return Err(UtilboxError::PdfError(format!(
                "split point {} invalid for {} page document",
                after_page, total
            )));
        }

        info!(after_page, total, "Splitting PDF");

        let first = self.extract_range(PageRange::new(1, after_page))?;
        let second = self.extract_range(PageRange::new(after_page + 1, total))?;

        Ok((first, second))
    }

    /// Split the document into one single-page PDF per page, in order.
    ///
    /// This is the split tool's default mode: drop in a document, get every
    /// page back as its own file.
    #[instrument(skip(self))]
    pub fn split_all(&self) -> Result<Vec<Vec<u8>>, UtilboxError> {
        let total = self.page_count() as u32;
        if total == 0 {
            return Err(UtilboxError::PdfError("document has no pages".into()));
        }

        info!(total, "Splitting PDF into single pages");

        (1..=total)
            .map(|page| self.build_document_from_pages(&[page]))
            .collect()
    }

    // -- Helpers --------------------------------------------------------------

    /// Build a new standalone PDF containing the given source pages (1-indexed,
    /// in the order given), returning the serialised bytes.
    ///
    /// Each page object and everything it transitively references is
    /// deep-cloned into the new document; a fresh /Pages tree and /Catalog are
    /// created, and every cloned page is re-parented onto the new tree.
    fn build_document_from_pages(&self, page_numbers: &[u32]) -> Result<Vec<u8>, UtilboxError> {
        let pages = self.document.get_pages();
        let mut target = Document::with_version("1.5");

        // Reserve the /Pages node id up front so cloned pages can point at it.
        let pages_root_id = target.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(page_numbers.len());
        for &page_number in page_numbers {
            let page_id: ObjectId = *pages.get(&page_number).ok_or_else(|| {
                UtilboxError::PdfError(format!(
                    "page {} not found in page tree",
                    page_number
                ))
            })?;

            let page_object = self.document.get_object(page_id).map_err(|err| {
                UtilboxError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
            })?;

            let cloned = deep_clone_object(&self.document, &mut target, page_object)?;
            let cloned_id = target.add_object(cloned);

            if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
                page_dict.set("Parent", Object::Reference(pages_root_id));
            }
            kids.push(Object::Reference(cloned_id));
        }

        let count = kids.len() as i64;
        target.objects.insert(
            pages_root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_root_id,
        });
        target.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        target.save_to(&mut output).map_err(|err| {
            UtilboxError::PdfError(format!("failed to serialise extracted pages: {}", err))
        })?;

        Ok(output)
    }
}

/// Deep-clone a single lopdf Object from `source` into `target`, recursively
/// resolving references (except /Parent, which is deliberately skipped and
/// patched by the caller to avoid circular cloning).
fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
) -> Result<Object, UtilboxError> {
    match object {
        Object::Dictionary(dict) => {
            let mut new_dict = lopdf::Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            // Resolve in the source, clone the referent, and reference the
            // clone in the target.
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let cloned = deep_clone_object(source, target, referenced)?;
                    let new_id = target.add_object(cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let mut new_dict = lopdf::Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        // All other object types (Boolean, Integer, Real, String, Name, Null)
        // are trivially cloneable.
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::PdfWriter;
    use utilbox_core::PaperSize;

    /// Enough lines of text to force the writer onto several pages.
    fn multi_page_pdf(lines: usize) -> Vec<u8> {
        let text: String = (0..lines)
            .map(|i| format!("line number {i}\n"))
            .collect();
        PdfWriter::new(PaperSize::A4).create_from_text(&text).unwrap()
    }

    #[test]
    fn page_count_matches_generated_document() {
        let pdf = multi_page_pdf(130);
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        assert!(reader.page_count() >= 2, "expected a multi-page document");
    }

    #[test]
    fn extract_page_produces_single_page_pdf() {
        let pdf = multi_page_pdf(130);
        let reader = PdfReader::from_bytes(&pdf).unwrap();

        let single = reader.extract_page(1).unwrap();
        let single_reader = PdfReader::from_bytes(&single).unwrap();
        assert_eq!(single_reader.page_count(), 1);
    }

    #[test]
    fn extract_page_out_of_range_fails() {
        let pdf = multi_page_pdf(10);
        let reader = PdfReader::from_bytes(&pdf).unwrap();

        assert!(reader.extract_page(0).is_err());
        assert!(reader.extract_page(999).is_err());
    }

    #[test]
    fn split_partitions_all_pages() {
        let pdf = multi_page_pdf(130);
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        let total = reader.page_count();

        let (first, second) = reader.split(1).unwrap();
        let first_count = PdfReader::from_bytes(&first).unwrap().page_count();
        let second_count = PdfReader::from_bytes(&second).unwrap().page_count();

        assert_eq!(first_count, 1);
        assert_eq!(first_count + second_count, total);
    }

    #[test]
    fn split_rejects_boundary_points() {
        let pdf = multi_page_pdf(130);
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        let total = reader.page_count() as u32;

        assert!(reader.split(0).is_err());
        assert!(reader.split(total).is_err());
    }

    #[test]
    fn split_all_yields_one_document_per_page() {
        let pdf = multi_page_pdf(130);
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        let total = reader.page_count();

        let parts = reader.split_all().unwrap();
        assert_eq!(parts.len(), total);
        for part in parts {
            assert_eq!(PdfReader::from_bytes(&part).unwrap().page_count(), 1);
        }
    }

    #[test]
    fn extract_range_respects_bounds() {
        let pdf = multi_page_pdf(130);
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        let total = reader.page_count() as u32;

        let range = reader.extract_range(PageRange::new(1, 2)).unwrap();
        assert_eq!(PdfReader::from_bytes(&range).unwrap().page_count(), 2);

        assert!(reader.extract_range(PageRange::new(2, 1)).is_err());
        assert!(reader.extract_range(PageRange::new(1, total + 1)).is_err());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = PdfReader::from_bytes(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, UtilboxError::PdfError(_)));
    }

    #[test]
    fn open_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, multi_page_pdf(5)).unwrap();

        let reader = PdfReader::open(&path).unwrap();
        assert!(reader.page_count() >= 1);
        assert!(reader.source_path().unwrap().contains("doc.pdf"));
    }
}
