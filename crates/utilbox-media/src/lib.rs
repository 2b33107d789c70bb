// SPDX-License-Identifier: MIT
//
// utilbox-media — Media processing for the utilbox tool pages.
//
// Provides the image tools (enhance, resize, compress), PDF tools (split,
// compress, create from text or images), QR code generation, and format
// conversion between the types the tool pages accept.

pub mod convert;
pub mod image;
pub mod pdf;
pub mod qr;

// Re-export the primary structs so callers can use `utilbox_media::ImageEnhancer` etc.
// The `self::` prefix disambiguates the local `image` module from the `image` crate.
pub use convert::MediaConverter;
pub use self::image::enhance::{EnhanceSettings, ImageEnhancer};
pub use self::image::processor::ImageProcessor;
pub use pdf::compress::PdfCompressor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use qr::QrGenerator;
