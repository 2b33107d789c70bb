// SPDX-License-Identifier: MIT
//
// Format conversion for the converter tool pages.
//
// Supported paths: raster image to raster image (re-encode), raster image to
// PDF (embed on a page), and plain text to PDF (flowed layout). Anything
// else is refused explicitly — there is no silent fallback format.

use image::ImageFormat;
use tracing::{debug, info, instrument};
use utilbox_core::error::UtilboxError;
use utilbox_core::{MediaFormat, PaperSize};

use crate::image::processor::ImageProcessor;
use crate::pdf::writer::PdfWriter;

/// Converts uploads between the formats the tool pages accept.
pub struct MediaConverter {
    /// Paper size used when the target is PDF.
    paper_size: PaperSize,
}

impl MediaConverter {
    pub fn new(paper_size: PaperSize) -> Self {
        Self { paper_size }
    }

    /// Convert `data` from `from` to `to`, returning the converted bytes.
    ///
    /// Identical source and target formats pass the bytes through untouched.
    #[instrument(skip(self, data), fields(bytes_len = data.len(), from = from.mime_type(), to = to.mime_type()))]
    pub fn convert(
        &self,
        data: &[u8],
        from: MediaFormat,
        to: MediaFormat,
    ) -> Result<Vec<u8>, UtilboxError> {
        if from == to {
            debug!("source and target formats match, passing through");
            return Ok(data.to_vec());
        }

        info!(from = from.mime_type(), to = to.mime_type(), "Converting");

        match (from, to) {
            // Raster → raster: decode and re-encode.
            (f, t) if f.is_raster() && t.is_raster() => {
                let processor = ImageProcessor::from_bytes(data)?;
                match raster_image_format(t) {
                    // JPEG cannot carry alpha, so it gets the dedicated path.
                    ImageFormat::Jpeg => processor.to_jpeg_bytes(90),
                    format => processor.to_format_bytes(format),
                }
            }

            // Raster → PDF: embed the image on a single page.
            (f, MediaFormat::Pdf) if f.is_raster() => {
                PdfWriter::new(self.paper_size).create_from_image(data)
            }

            // Text → PDF: flow the text onto pages.
            (MediaFormat::PlainText, MediaFormat::Pdf) => {
                let text = String::from_utf8_lossy(data);
                PdfWriter::new(self.paper_size).create_from_text(&text)
            }

            _ => Err(UtilboxError::UnsupportedConversion {
                from: from.mime_type().to_string(),
                to: to.mime_type().to_string(),
            }),
        }
    }
}

/// Map a raster `MediaFormat` onto the `image` crate's format enum.
fn raster_image_format(format: MediaFormat) -> ImageFormat {
    match format {
        MediaFormat::Jpeg => ImageFormat::Jpeg,
        MediaFormat::Png => ImageFormat::Png,
        MediaFormat::Gif => ImageFormat::Gif,
        MediaFormat::Bmp => ImageFormat::Bmp,
        MediaFormat::Tiff => ImageFormat::Tiff,
        MediaFormat::WebP => ImageFormat::WebP,
        // Callers guard on is_raster() before reaching this point.
        MediaFormat::Pdf | MediaFormat::PlainText => ImageFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn png_fixture() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(24, 24, Rgba([10, 180, 90, 255])));
        ImageProcessor::from_dynamic(img).to_png_bytes().unwrap()
    }

    fn converter() -> MediaConverter {
        MediaConverter::new(PaperSize::A4)
    }

    #[test]
    fn png_to_jpeg_re_encodes() {
        let jpeg = converter()
            .convert(&png_fixture(), MediaFormat::Png, MediaFormat::Jpeg)
            .unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let decoded = ImageProcessor::from_bytes(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 24));
    }

    #[test]
    fn jpeg_to_png_re_encodes() {
        let jpeg = converter()
            .convert(&png_fixture(), MediaFormat::Png, MediaFormat::Jpeg)
            .unwrap();
        let png = converter()
            .convert(&jpeg, MediaFormat::Jpeg, MediaFormat::Png)
            .unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn raster_to_pdf_embeds_the_image() {
        let pdf = converter()
            .convert(&png_fixture(), MediaFormat::Png, MediaFormat::Pdf)
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn text_to_pdf_flows_the_text() {
        let pdf = converter()
            .convert(b"hello from the converter", MediaFormat::PlainText, MediaFormat::Pdf)
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn same_format_passes_through() {
        let png = png_fixture();
        let out = converter()
            .convert(&png, MediaFormat::Png, MediaFormat::Png)
            .unwrap();
        assert_eq!(out, png);
    }

    #[test]
    fn pdf_to_raster_is_refused() {
        let err = converter()
            .convert(b"%PDF-1.5 stub", MediaFormat::Pdf, MediaFormat::Png)
            .unwrap_err();
        assert!(matches!(err, UtilboxError::UnsupportedConversion { .. }));
    }

    #[test]
    fn garbage_raster_input_fails_decode() {
        let err = converter()
            .convert(b"not an image", MediaFormat::Png, MediaFormat::Jpeg)
            .unwrap_err();
        assert!(matches!(err, UtilboxError::InvalidImageInput(_)));
    }
}
