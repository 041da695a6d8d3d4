//! Configuration for segmentation sessions.
//!
//! All tunable parameters live in [`SegmenterConfig`]: block sizes for
//! segmentation and reference capture, and how the label overlay is painted.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use colorseg::SegmenterConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = SegmenterConfig::from_json_file(Path::new("colorseg.json"))?;
//!
//! // Or use defaults
//! let config = SegmenterConfig::default();
//! # Ok::<(), colorseg::SegmentationError>(())
//! ```
//!
//! Missing fields fall back to their defaults, so a file only needs the values
//! it changes.

use std::path::Path;

use image::Rgb;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::constants::{blocks, overlay};
use crate::segmentation::Label;
use crate::{Result, SegmentationError};

/// Complete configuration for a segmentation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Side of each classified block
    pub block_size: u32,

    /// Side of the grid blocks sampled by a background capture
    pub background_block_size: u32,

    /// Side of the centered square sampled by an object capture
    pub object_region_size: u32,

    /// Overlay weight when blending over the grayscale frame (0.0-1.0)
    pub overlay_alpha: f32,

    /// Colors painted for each label
    pub colors: OverlayColors,
}

/// Hex colors painted over each class of block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayColors {
    /// Background color, e.g. `"#000000"`
    pub background: String,

    /// Object color, e.g. `"#FF0000"`
    pub object: String,
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            background: overlay::BACKGROUND_COLOR.to_string(),
            object: overlay::OBJECT_COLOR.to_string(),
        }
    }
}

impl OverlayColors {
    /// Parse the configured color of a label
    pub fn rgb(&self, label: Label) -> Result<Rgb<u8>> {
        let hex = match label {
            Label::Background => &self.background,
            Label::Object => &self.object,
        };
        let color: Srgb<u8> = hex
            .parse()
            .map_err(|e| SegmentationError::config(format!("Invalid {} color '{}'", label, hex), e))?;
        Ok(Rgb([color.red, color.green, color.blue]))
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            block_size: blocks::SEGMENT_BLOCK_SIZE,
            background_block_size: blocks::BACKGROUND_BLOCK_SIZE,
            object_region_size: blocks::OBJECT_REGION_SIZE,
            overlay_alpha: overlay::BLEND_ALPHA,
            colors: OverlayColors::default(),
        }
    }
}

impl SegmenterConfig {
    /// Check every parameter, reporting the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(SegmentationError::invalid("block_size", self.block_size));
        }
        if self.background_block_size == 0 {
            return Err(SegmentationError::invalid(
                "background_block_size",
                self.background_block_size,
            ));
        }
        if self.object_region_size == 0 {
            return Err(SegmentationError::invalid(
                "object_region_size",
                self.object_region_size,
            ));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(SegmentationError::invalid("overlay_alpha", self.overlay_alpha));
        }
        self.colors.rgb(Label::Background)?;
        self.colors.rgb(Label::Object)?;
        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SegmentationError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            SegmentationError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SegmentationError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            SegmentationError::config(format!("Failed to write {}", path.display()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SegmenterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.block_size, 8);
        assert_eq!(config.background_block_size, 128);
        assert_eq!(config.object_region_size, 50);
    }

    #[test]
    fn test_default_colors() {
        let colors = OverlayColors::default();
        assert_eq!(colors.rgb(Label::Background).unwrap(), Rgb([0, 0, 0]));
        assert_eq!(colors.rgb(Label::Object).unwrap(), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_invalid_color() {
        let colors = OverlayColors {
            background: "#00000".to_string(),
            object: "not a color".to_string(),
        };
        assert!(matches!(
            colors.rgb(Label::Object),
            Err(SegmentationError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SegmenterConfig {
            block_size: 0,
            ..SegmenterConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SegmenterConfig {
            overlay_alpha: 1.5,
            ..SegmenterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SegmenterConfig =
            serde_json::from_str(r##"{ "block_size": 16, "colors": { "object": "#00FF00" } }"##)
                .unwrap();
        assert_eq!(config.block_size, 16);
        assert_eq!(config.background_block_size, 128);
        assert_eq!(config.colors.background, "#000000");
        assert_eq!(config.colors.rgb(Label::Object).unwrap(), Rgb([0, 255, 0]));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let config = SegmenterConfig {
            block_size: 12,
            overlay_alpha: 0.25,
            ..SegmenterConfig::default()
        };
        config.to_json_file(&path).unwrap();

        let loaded = SegmenterConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let result = SegmenterConfig::from_json_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(SegmentationError::ConfigError { .. })));
    }
}
