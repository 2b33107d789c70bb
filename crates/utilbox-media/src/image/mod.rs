// SPDX-License-Identifier: MIT
//
// Image module — enhancement, resizing, compression, and encoding.

pub mod enhance;
pub mod processor;

pub use enhance::{EnhanceSettings, ImageEnhancer};
pub use processor::ImageProcessor;
