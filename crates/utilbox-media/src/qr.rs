// SPDX-License-Identifier: MIT
//
// QR code generation for the QR tool page.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::{debug, info, instrument};
use utilbox_core::error::UtilboxError;

use crate::image::processor::encode_to_format;

/// Generates QR code images from text or URLs.
///
/// Output is a black-on-white PNG with medium error correction and a quiet
/// zone, rendered at no less than the configured minimum pixel size.
pub struct QrGenerator {
    /// Minimum output width/height in pixels.
    min_size: u32,
    /// Whether to render the surrounding quiet zone.
    quiet_zone: bool,
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self {
            min_size: 256,
            quiet_zone: true,
        }
    }
}

impl QrGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum output size in pixels. The rendered image may be
    /// slightly larger so that every module stays a whole number of pixels.
    pub fn min_size(mut self, pixels: u32) -> Self {
        self.min_size = pixels.max(1);
        self
    }

    /// Enable or disable the quiet zone border.
    pub fn quiet_zone(mut self, enabled: bool) -> Self {
        self.quiet_zone = enabled;
        self
    }

    /// Encode `content` into a QR code and return it as PNG bytes.
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub fn generate_png(&self, content: &str) -> Result<Vec<u8>, UtilboxError> {
        if content.is_empty() {
            return Err(UtilboxError::QrError("no content to encode".into()));
        }

        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::M)
            .map_err(|err| UtilboxError::QrError(format!("cannot encode content: {}", err)))?;

        info!(
            version = ?code.version(),
            min_size = self.min_size,
            "QR code encoded"
        );

        let rendered = code
            .render::<Luma<u8>>()
            .quiet_zone(self.quiet_zone)
            .min_dimensions(self.min_size, self.min_size)
            .build();

        let png = encode_to_format(&DynamicImage::ImageLuma8(rendered), ImageFormat::Png)?;
        debug!(output_bytes = png.len(), "QR PNG encoded");
        Ok(png)
    }
}
