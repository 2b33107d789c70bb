// SPDX-License-Identifier: MIT
//
// Core domain types for the utilbox engine.

use serde::{Deserialize, Serialize};

/// Media formats the engine accepts or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaFormat {
    Pdf,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
    PlainText,
}

impl MediaFormat {
    /// MIME type string, as sent in download responses by the tool pages.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::WebP => "image/webp",
            Self::PlainText => "text/plain",
        }
    }

    /// Canonical file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
            Self::PlainText => "txt",
        }
    }

    /// Infer a format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Whether this format is a raster image.
    pub fn is_raster(&self) -> bool {
        matches!(
            self,
            Self::Jpeg | Self::Png | Self::Gif | Self::Bmp | Self::Tiff | Self::WebP
        )
    }
}

/// Standard paper sizes for PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Inclusive 1-indexed page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of pages covered, or 0 for an inverted range.
    pub fn len(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Before/after byte counts for the compression tools.
///
/// The tool pages display the percentage saved next to the download button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl SizeReport {
    pub fn new(input_bytes: u64, output_bytes: u64) -> Self {
        Self {
            input_bytes,
            output_bytes,
        }
    }

    /// Percentage of the input size saved. Negative when the output grew,
    /// which can happen for already-compressed inputs.
    pub fn percent_saved(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        let saved = self.input_bytes as f64 - self.output_bytes as f64;
        saved / self.input_bytes as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_round_trip() {
        for format in [
            MediaFormat::Pdf,
            MediaFormat::Jpeg,
            MediaFormat::Png,
            MediaFormat::Gif,
            MediaFormat::Bmp,
            MediaFormat::Tiff,
            MediaFormat::WebP,
            MediaFormat::PlainText,
        ] {
            assert_eq!(MediaFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn jpeg_alias_extensions() {
        assert_eq!(MediaFormat::from_extension("JPEG"), Some(MediaFormat::Jpeg));
        assert_eq!(MediaFormat::from_extension("tif"), Some(MediaFormat::Tiff));
        assert_eq!(MediaFormat::from_extension("heic"), None);
    }

    #[test]
    fn pdf_is_not_raster() {
        assert!(!MediaFormat::Pdf.is_raster());
        assert!(!MediaFormat::PlainText.is_raster());
        assert!(MediaFormat::WebP.is_raster());
    }

    #[test]
    fn page_range_len() {
        assert_eq!(PageRange::new(2, 5).len(), 4);
        assert_eq!(PageRange::new(3, 3).len(), 1);
        assert!(PageRange::new(5, 2).is_empty());
    }

    #[test]
    fn size_report_percentages() {
        let report = SizeReport::new(1000, 250);
        assert!((report.percent_saved() - 75.0).abs() < 1e-9);

        let grew = SizeReport::new(100, 130);
        assert!(grew.percent_saved() < 0.0);

        assert_eq!(SizeReport::new(0, 0).percent_saved(), 0.0);
    }
}
