// SPDX-License-Identifier: MIT
//
// Image processor — decode, resize, compress, and re-encode uploads for the
// image tool pages. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};
use utilbox_core::error::UtilboxError;
use utilbox_core::{SizeReport, ToolConfig};

/// Image processing pipeline operating on a single in-memory image.
///
/// Transformations are non-destructive: each consumes `self` and returns a
/// new `ImageProcessor` wrapping the result, so operations chain.
///
/// ```ignore
/// let bytes = ImageProcessor::from_bytes(&upload)?
///     .resize(1200, 1200)?
///     .to_jpeg_bytes(80)?;
/// ```
#[derive(Debug)]
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, UtilboxError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            UtilboxError::InvalidImageInput(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, UtilboxError> {
        if data.is_empty() {
            return Err(UtilboxError::InvalidImageInput("empty input".into()));
        }
        let img = image::load_from_memory(data).map_err(|err| {
            UtilboxError::InvalidImageInput(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Like [`ImageProcessor::from_bytes`], but enforcing the upload and
    /// pixel bounds from the given configuration. Oversized inputs are
    /// rejected before (or immediately after) decoding, ahead of any
    /// processing work.
    #[instrument(skip(data, config), fields(data_len = data.len()))]
    pub fn from_bytes_bounded(data: &[u8], config: &ToolConfig) -> Result<Self, UtilboxError> {
        if data.len() as u64 > config.max_input_bytes {
            return Err(UtilboxError::InputTooLarge {
                size: data.len() as u64,
                limit: config.max_input_bytes,
            });
        }
        let processor = Self::from_bytes(data)?;
        let pixels = processor.width() as u64 * processor.height() as u64;
        if pixels > config.max_pixels {
            return Err(UtilboxError::ImageTooLarge {
                pixels,
                limit: config.max_pixels,
            });
        }
        Ok(processor)
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Resize the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio. Uses Lanczos3 filtering for high-quality downscaling.
    /// Images already inside the box are returned unchanged.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn resize(self, max_width: u32, max_height: u32) -> Result<Self, UtilboxError> {
        if max_width == 0 || max_height == 0 {
            return Err(UtilboxError::InvalidImageInput(format!(
                "resize target {}x{} has a zero dimension",
                max_width, max_height
            )));
        }
        if self.image.width() <= max_width && self.image.height() <= max_height {
            debug!("Image already fits the target box");
            return Ok(self);
        }
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_width,
            max_height,
            "Resizing image"
        );
        let resized = self
            .image
            .resize(max_width, max_height, image::imageops::FilterType::Lanczos3);
        debug!(new_w = resized.width(), new_h = resized.height(), "Resize complete");
        Ok(Self { image: resized })
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    #[instrument(skip(self), fields(width, height))]
    pub fn resize_exact(self, width: u32, height: u32) -> Result<Self, UtilboxError> {
        if width == 0 || height == 0 {
            return Err(UtilboxError::InvalidImageInput(format!(
                "resize target {}x{} has a zero dimension",
                width, height
            )));
        }
        let resized = self
            .image
            .resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Ok(Self { image: resized })
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, UtilboxError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    /// Out-of-range quality values are clamped.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, UtilboxError> {
        let quality = quality.clamp(1, 100);
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| UtilboxError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode the current image in an arbitrary raster format.
    pub fn to_format_bytes(&self, format: ImageFormat) -> Result<Vec<u8>, UtilboxError> {
        encode_to_format(&self.image, format)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), UtilboxError> {
        self.image.save(path.as_ref()).map_err(|err| {
            UtilboxError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }

    // -- Compression ----------------------------------------------------------

    /// The image compression tool: optionally downscale to fit within
    /// `max_dimension`, then re-encode as JPEG at `quality`. Returns the
    /// encoded bytes and a size report for display.
    #[instrument(skip(data), fields(data_len = data.len(), quality))]
    pub fn compress_bytes(
        data: &[u8],
        quality: u8,
        max_dimension: Option<u32>,
    ) -> Result<(Vec<u8>, SizeReport), UtilboxError> {
        let mut processor = Self::from_bytes(data)?;
        if let Some(max_dim) = max_dimension {
            processor = processor.resize(max_dim, max_dim)?;
        }
        let output = processor.to_jpeg_bytes(quality)?;
        let report = SizeReport::new(data.len() as u64, output.len() as u64);
        info!(
            input_bytes = report.input_bytes,
            output_bytes = report.output_bytes,
            "Image compression complete"
        );
        Ok((output, report))
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
pub(crate) fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, UtilboxError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| UtilboxError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([90, 120, 200, 255])))
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = ImageProcessor::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, UtilboxError::InvalidImageInput(_)));
    }

    #[test]
    fn from_bytes_rejects_empty() {
        let err = ImageProcessor::from_bytes(&[]).unwrap_err();
        assert!(matches!(err, UtilboxError::InvalidImageInput(_)));
    }

    #[test]
    fn bounded_rejects_oversized_upload() {
        let png = ImageProcessor::from_dynamic(test_image(4, 4))
            .to_png_bytes()
            .unwrap();
        let config = ToolConfig {
            max_input_bytes: 8,
            ..ToolConfig::default()
        };
        let err = ImageProcessor::from_bytes_bounded(&png, &config).unwrap_err();
        assert!(matches!(err, UtilboxError::InputTooLarge { .. }));
    }

    #[test]
    fn bounded_rejects_too_many_pixels() {
        let png = ImageProcessor::from_dynamic(test_image(100, 100))
            .to_png_bytes()
            .unwrap();
        let config = ToolConfig {
            max_pixels: 50 * 50,
            ..ToolConfig::default()
        };
        let err = ImageProcessor::from_bytes_bounded(&png, &config).unwrap_err();
        assert!(matches!(err, UtilboxError::ImageTooLarge { .. }));
    }

    #[test]
    fn resize_preserves_aspect_ratio() {
        let processor = ImageProcessor::from_dynamic(test_image(400, 200));
        let resized = processor.resize(100, 100).unwrap();
        assert_eq!(resized.width(), 100);
        assert_eq!(resized.height(), 50);
    }

    #[test]
    fn resize_never_upscales() {
        let processor = ImageProcessor::from_dynamic(test_image(40, 20));
        let resized = processor.resize(100, 100).unwrap();
        assert_eq!((resized.width(), resized.height()), (40, 20));
    }

    #[test]
    fn resize_rejects_zero_target() {
        let processor = ImageProcessor::from_dynamic(test_image(40, 20));
        assert!(processor.resize(0, 100).is_err());
    }

    #[test]
    fn resize_exact_ignores_aspect() {
        let processor = ImageProcessor::from_dynamic(test_image(400, 200));
        let resized = processor.resize_exact(64, 64).unwrap();
        assert_eq!((resized.width(), resized.height()), (64, 64));
    }

    #[test]
    fn jpeg_round_trip() {
        let processor = ImageProcessor::from_dynamic(test_image(32, 32));
        let bytes = processor.to_jpeg_bytes(85).unwrap();
        let back = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (32, 32));
    }

    #[test]
    fn compress_reports_sizes() {
        let png = ImageProcessor::from_dynamic(test_image(300, 300))
            .to_png_bytes()
            .unwrap();
        let (jpeg, report) = ImageProcessor::compress_bytes(&png, 60, Some(150)).unwrap();
        assert_eq!(report.input_bytes, png.len() as u64);
        assert_eq!(report.output_bytes, jpeg.len() as u64);
        let out = ImageProcessor::from_bytes(&jpeg).unwrap();
        assert_eq!((out.width(), out.height()), (150, 150));
    }

    #[test]
    fn save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageProcessor::from_dynamic(test_image(16, 16))
            .save(&path)
            .unwrap();
        let reopened = ImageProcessor::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (16, 16));
    }
}
