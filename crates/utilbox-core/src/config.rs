// SPDX-License-Identifier: MIT
//
// Engine configuration and resource bounds.

use serde::{Deserialize, Serialize};

/// Engine-wide settings and per-request resource bounds.
///
/// Every tool call is request-scoped, so the only resource policy the engine
/// needs is an upper bound on what a single call may consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Maximum accepted upload size in bytes.
    pub max_input_bytes: u64,
    /// Maximum decoded image size in pixels (width x height).
    pub max_pixels: u64,
    /// Default JPEG quality for the image compression tool (1-100).
    pub jpeg_quality: u8,
    /// Default paper size for PDF output.
    pub default_paper_size: crate::PaperSize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 25 * 1024 * 1024,
            max_pixels: 40_000_000,
            jpeg_quality: 80,
            default_paper_size: crate::PaperSize::A4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ToolConfig::default();
        assert!(config.max_input_bytes > 0);
        assert!(config.max_pixels > 0);
        assert!((1..=100).contains(&config.jpeg_quality));
    }

    #[test]
    fn json_round_trip() {
        let config = ToolConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ToolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_input_bytes, config.max_input_bytes);
        assert_eq!(back.jpeg_quality, config.jpeg_quality);
    }
}
