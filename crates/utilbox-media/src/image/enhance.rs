// SPDX-License-Identifier: MIT
//
// Image enhancement pipeline — brightness, contrast, saturation, and
// sharpness adjustment for the photo enhancement tool page.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utilbox_core::error::UtilboxError;

use crate::image::processor::encode_to_format;

/// Adjustment values for one enhancement pass.
///
/// Each field is independently bounded to [-50, +50]; values outside that
/// range are clamped to the nearest bound rather than rejected, matching the
/// tolerant slider behaviour of the tool page. A value of 0 means "leave
/// this property alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnhanceSettings {
    /// Constant offset added to every channel.
    pub brightness: i32,
    /// Scales each channel's distance from mid-gray 128 by `1 + contrast/100`.
    pub contrast: i32,
    /// Scales each channel's distance from the pixel's own luminance by
    /// `1 + saturation/100`.
    pub saturation: i32,
    /// Scales every channel by `1 + sharpness/100` when positive; values of
    /// zero or below are a no-op.
    pub sharpness: i32,
}

/// Permitted range for every adjustment value.
pub const SETTING_MIN: i32 = -50;
pub const SETTING_MAX: i32 = 50;

impl EnhanceSettings {
    /// The "auto enhance" preset. Fixed values, applied identically
    /// regardless of image content.
    pub const AUTO: Self = Self {
        brightness: 10,
        contrast: 15,
        saturation: 20,
        sharpness: 10,
    };

    /// Return a copy with every field clamped to the permitted range.
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.clamp(SETTING_MIN, SETTING_MAX),
            contrast: self.contrast.clamp(SETTING_MIN, SETTING_MAX),
            saturation: self.saturation.clamp(SETTING_MIN, SETTING_MAX),
            sharpness: self.sharpness.clamp(SETTING_MIN, SETTING_MAX),
        }
    }

    /// Whether this settings record changes anything at all.
    pub fn is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 0 && self.saturation == 0 && self.sharpness <= 0
    }
}

/// Enhances photos for the image enhancement tool page.
///
/// The pipeline is a pure function of (image, settings): one combined
/// brightness/contrast/saturation pass over the pixel buffer, then a
/// sharpness pass over the result. The source image is never mutated; every
/// call produces a freshly allocated buffer of identical dimensions.
///
/// Recomputation after a settings change is the caller's explicit call —
/// there is no timer or debounce policy in the engine.
#[derive(Debug)]
pub struct ImageEnhancer {
    /// The working image (kept as `DynamicImage` for flexibility).
    image: DynamicImage,
}

impl ImageEnhancer {
    // -- Construction ---------------------------------------------------------

    /// Create an enhancer from raw image bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, UtilboxError> {
        if data.is_empty() {
            return Err(UtilboxError::InvalidImageInput("empty input".into()));
        }
        let image = image::load_from_memory(data).map_err(|err| {
            UtilboxError::InvalidImageInput(format!("failed to decode image: {}", err))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            "Image loaded for enhancement"
        );
        Ok(Self { image })
    }

    /// Create an enhancer from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, UtilboxError> {
        let image = image::open(path.as_ref()).map_err(|err| {
            UtilboxError::InvalidImageInput(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Borrow the current working image.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the enhancer and return the underlying image.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Enhancement pipeline -------------------------------------------------

    /// Apply the full enhancement pipeline and return a new enhancer wrapping
    /// the result.
    ///
    /// Pass 1 applies brightness, contrast, and saturation in a single sweep
    /// over the pixel buffer; pass 2 applies sharpness to the result. Output
    /// dimensions always equal input dimensions, and every channel is clamped
    /// to [0, 255]. Alpha is untouched.
    #[instrument(skip(self), fields(settings = ?settings))]
    pub fn enhance(self, settings: EnhanceSettings) -> Result<Self, UtilboxError> {
        let (width, height) = (self.image.width(), self.image.height());
        if width == 0 || height == 0 {
            return Err(UtilboxError::InvalidImageInput(format!(
                "image has degenerate dimensions {}x{}",
                width, height
            )));
        }

        let settings = settings.clamped();
        if settings.is_identity() {
            debug!("Settings change nothing, returning input unchanged");
            return Ok(self);
        }
        info!(width, height, ?settings, "Enhancing image");

        let rgba = self.image.to_rgba8();
        let colored = apply_color_pass(&rgba, settings);
        let sharpened = apply_sharpness_pass(&colored, settings.sharpness);

        debug!("Enhancement complete");
        Ok(Self {
            image: DynamicImage::ImageRgba8(sharpened),
        })
    }

    /// Apply the fixed auto-enhance preset.
    #[instrument(skip(self))]
    pub fn auto_enhance(self) -> Result<Self, UtilboxError> {
        self.enhance(EnhanceSettings::AUTO)
    }

    // -- Byte-level entry point -----------------------------------------------

    /// Enhance encoded image bytes, re-encoding the result in the same format
    /// as the input.
    ///
    /// This is the whole tool-page operation in one call: decode, enhance,
    /// encode. Formats the engine cannot re-encode surface an error rather
    /// than silently switching formats.
    #[instrument(skip(data), fields(data_len = data.len(), settings = ?settings))]
    pub fn enhance_bytes(
        data: &[u8],
        settings: EnhanceSettings,
    ) -> Result<Vec<u8>, UtilboxError> {
        if data.is_empty() {
            return Err(UtilboxError::InvalidImageInput("empty input".into()));
        }
        let format = image::guess_format(data).map_err(|err| {
            UtilboxError::InvalidImageInput(format!("unrecognised image data: {}", err))
        })?;

        let enhanced = Self::from_bytes(data)?.enhance(settings)?;
        // The JPEG encoder rejects alpha channels, so flatten first.
        let output = if format == ImageFormat::Jpeg {
            encode_to_format(&DynamicImage::ImageRgb8(enhanced.image.to_rgb8()), format)?
        } else {
            encode_to_format(&enhanced.image, format)?
        };
        debug!(output_bytes = output.len(), ?format, "Enhanced bytes encoded");
        Ok(output)
    }
}

// -- Pixel passes -------------------------------------------------------------

/// Pass 1: brightness offset, contrast scaling about mid-gray 128, and
/// saturation scaling about the pixel's own luminance, in that order, with a
/// single clamp to [0, 255] at the end.
///
/// Steps whose setting is 0 are skipped entirely so that a zero settings
/// record reproduces the input bit for bit.
fn apply_color_pass(rgba: &RgbaImage, settings: EnhanceSettings) -> RgbaImage {
    let offset = settings.brightness as f32;
    let contrast_factor = 1.0 + settings.contrast as f32 / 100.0;
    let saturation_factor = 1.0 + settings.saturation as f32 / 100.0;

    let apply_brightness = settings.brightness != 0;
    let apply_contrast = settings.contrast != 0;
    let apply_saturation = settings.saturation != 0;

    RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let (mut r, mut g, mut b) = (r as f32, g as f32, b as f32);

        if apply_brightness {
            r += offset;
            g += offset;
            b += offset;
        }

        if apply_contrast {
            r = (r - 128.0) * contrast_factor + 128.0;
            g = (g - 128.0) * contrast_factor + 128.0;
            b = (b - 128.0) * contrast_factor + 128.0;
        }

        if apply_saturation {
            // Rec. 601 luminance is the pivot each channel scales around.
            let luminance = 0.299 * r + 0.587 * g + 0.114 * b;
            r = luminance + (r - luminance) * saturation_factor;
            g = luminance + (g - luminance) * saturation_factor;
            b = luminance + (b - luminance) * saturation_factor;
        }

        Rgba([clamp_channel(r), clamp_channel(g), clamp_channel(b), a])
    })
}

/// Pass 2: scale every channel by `1 + sharpness/100` when sharpness is
/// positive. Not a spatial kernel — the tool's "sharpen" slider is a global
/// contrast boost over the already colour-adjusted buffer.
fn apply_sharpness_pass(rgba: &RgbaImage, sharpness: i32) -> RgbaImage {
    if sharpness <= 0 {
        return rgba.clone();
    }
    let factor = 1.0 + sharpness as f32 / 100.0;

    RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgba([
            clamp_channel(r as f32 * factor),
            clamp_channel(g as f32 * factor),
            clamp_channel(b as f32 * factor),
            a,
        ])
    })
}

/// Clamp a computed channel value to [0, 255] and round to the nearest integer.
fn clamp_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}
