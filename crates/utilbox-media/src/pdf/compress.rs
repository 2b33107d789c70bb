// SPDX-License-Identifier: MIT
//
// PDF compression — flate-compress content streams and report the size
// change. Backs the PDF compression tool page.

use lopdf::Document;
use tracing::{info, instrument};
use utilbox_core::SizeReport;
use utilbox_core::error::UtilboxError;

/// Compresses PDF documents in memory.
///
/// Re-serialises the document with all content streams flate-compressed.
/// Already-compressed documents may not shrink; the size report reflects
/// whatever actually happened, including growth.
pub struct PdfCompressor;

impl PdfCompressor {
    /// Compress a PDF supplied as bytes, returning the compressed bytes and
    /// a before/after size report.
    #[instrument(skip(data), fields(bytes_len = data.len()))]
    pub fn compress_bytes(data: &[u8]) -> Result<(Vec<u8>, SizeReport), UtilboxError> {
        let mut document = Document::load_mem(data).map_err(|err| {
            UtilboxError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        document.compress();

        let mut output = Vec::new();
        document.save_to(&mut output).map_err(|err| {
            UtilboxError::PdfError(format!("failed to serialise compressed PDF: {}", err))
        })?;

        let report = SizeReport::new(data.len() as u64, output.len() as u64);
        info!(
            input_bytes = report.input_bytes,
            output_bytes = report.output_bytes,
            "PDF compression complete"
        );

        Ok((output, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::writer::PdfWriter;
    use utilbox_core::PaperSize;

    fn sample_pdf() -> Vec<u8> {
        let text: String = (0..200)
            .map(|i| format!("paragraph {i}: the quick brown fox jumps over the lazy dog\n"))
            .collect();
        PdfWriter::new(PaperSize::A4).create_from_text(&text).unwrap()
    }

    #[test]
    fn output_is_still_a_valid_pdf() {
        let pdf = sample_pdf();
        let pages_before = PdfReader::from_bytes(&pdf).unwrap().page_count();

        let (compressed, _) = PdfCompressor::compress_bytes(&pdf).unwrap();
        let pages_after = PdfReader::from_bytes(&compressed).unwrap().page_count();

        assert_eq!(pages_before, pages_after);
    }

    #[test]
    fn report_matches_actual_sizes() {
        let pdf = sample_pdf();
        let (compressed, report) = PdfCompressor::compress_bytes(&pdf).unwrap();
        assert_eq!(report.input_bytes, pdf.len() as u64);
        assert_eq!(report.output_bytes, compressed.len() as u64);
    }

    #[test]
    fn garbage_input_is_rejected() {
        let err = PdfCompressor::compress_bytes(b"not a pdf").unwrap_err();
        assert!(matches!(err, UtilboxError::PdfError(_)));
    }
}
